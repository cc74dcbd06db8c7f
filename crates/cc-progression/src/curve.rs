//! Experience curve evaluator.
//!
//! Every class maps experience to level through the same closed-form curve,
//! parameterised by its [`CurveParams`]:
//!
//! ```text
//! exp(L) = round(basis * (L-1)^(0.9 + a/250) * L * (L+1) / (6 + L^2 / (50 * b)) + (L-1) * extra)
//! ```
//!
//! The inverse scan is bounded by the level cap, so a degenerate curve can
//! never loop forever; it simply stops at the cap.

use cc_core::CurveParams;

/// Cumulative experience required to reach `level`. Level 1 (and 0) needs none.
///
/// Rounds half away from zero. A curve producing a non-finite value
/// saturates to `i64::MAX` so the level is unreachable.
pub fn experience_for_level(curve: &CurveParams, level: u32) -> i64 {
    if level <= 1 {
        return 0;
    }
    let l = f64::from(level);
    let power = (l - 1.0).powf(0.9 + curve.acceleration_a / 250.0);
    let divisor = 6.0 + l * l / 50.0 / curve.acceleration_b;
    let raw = curve.basis * power * l * (l + 1.0) / divisor + (l - 1.0) * curve.extra;
    if raw.is_finite() {
        // `as` saturates on overflow.
        raw.round() as i64
    } else {
        i64::MAX
    }
}

/// Greatest level in `1..=cap` whose required experience is `<= experience`.
///
/// Experience of zero or less is level 1. A cap of 0 is treated as 1.
pub fn level_for_experience(curve: &CurveParams, experience: i64, cap: u32) -> u32 {
    let cap = cap.max(1);
    if experience <= 0 {
        return 1;
    }
    for level in 2..=cap {
        if experience_for_level(curve, level) > experience {
            return level - 1;
        }
    }
    cap
}

/// Fraction of the way from the current level to the next, in `0.0..1.0`.
///
/// Returns 0.0 at the cap, or when the curve does not increase between the
/// two levels.
pub fn progress_to_next(curve: &CurveParams, experience: i64, cap: u32) -> f64 {
    let level = level_for_experience(curve, experience, cap);
    if level >= cap {
        return 0.0;
    }
    let floor = experience_for_level(curve, level);
    let ceiling = experience_for_level(curve, level + 1);
    let span = ceiling.saturating_sub(floor);
    if span <= 0 {
        return 0.0;
    }
    let into = experience.saturating_sub(floor).max(0);
    (into as f64 / span as f64).clamp(0.0, 1.0)
}

/// Experience reproducing `level` and `progress` toward the next level on `curve`.
///
/// The result always stays strictly below the next level's requirement, so
/// rounding can never push the actor over a level boundary. At the cap the
/// level's own requirement is returned.
pub fn experience_at_progress(curve: &CurveParams, level: u32, progress: f64, cap: u32) -> i64 {
    let floor = experience_for_level(curve, level);
    if level >= cap {
        return floor;
    }
    let ceiling = experience_for_level(curve, level + 1);
    let span = ceiling.saturating_sub(floor);
    if span <= 0 {
        return floor;
    }
    let offset = (span as f64 * progress.clamp(0.0, 1.0)).round() as i64;
    floor.saturating_add(offset.min(span - 1))
}

/// Experience still needed to reach the next level, or `None` at the cap.
pub fn experience_to_next(curve: &CurveParams, experience: i64, cap: u32) -> Option<i64> {
    let level = level_for_experience(curve, experience, cap);
    if level >= cap {
        return None;
    }
    Some(
        experience_for_level(curve, level + 1)
            .saturating_sub(experience.max(0))
            .max(0),
    )
}
