use std::collections::{BTreeMap, BTreeSet};

use cc_core::{ClassId, Combinator, LevelScope, SkillId, UnlockCondition};

/// The slice of an actor's state that unlock conditions read.
///
/// Built fresh before each evaluation phase; never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterSnapshot {
    /// Level of the active class.
    pub active_level: u32,
    /// Level of the dual-mode base class, `None` outside dual mode.
    pub base_level: Option<u32>,
    /// Derived level of every class in the ledger.
    pub class_levels: BTreeMap<ClassId, u32>,
    /// Every skill the actor currently knows.
    pub known_skills: BTreeSet<SkillId>,
}

impl CharacterSnapshot {
    /// Derived level of a held class.
    pub fn level_of(&self, class: ClassId) -> Option<u32> {
        self.class_levels.get(&class).copied()
    }
}

/// Decide whether `condition` holds for `snapshot`.
///
/// Never fails: anything that cannot currently be satisfied (an empty
/// group, a base-level condition outside dual mode, a class not held)
/// evaluates to `false`.
pub fn evaluate(condition: &UnlockCondition, snapshot: &CharacterSnapshot) -> bool {
    if !condition.is_satisfiable() {
        return false;
    }
    match condition {
        UnlockCondition::Level {
            scope: LevelScope::Active,
            threshold,
        } => snapshot.active_level >= *threshold,
        UnlockCondition::Level {
            scope: LevelScope::Base,
            threshold,
        } => snapshot.base_level.is_some_and(|level| level >= *threshold),
        UnlockCondition::SkillSet { required } => required.is_subset(&snapshot.known_skills),
        UnlockCondition::ClassThresholds {
            combinator,
            thresholds,
        } => {
            let mut met = thresholds.iter().map(|t| {
                snapshot
                    .level_of(t.class)
                    .is_some_and(|level| level >= t.level)
            });
            match combinator {
                Combinator::All => met.all(|m| m),
                Combinator::Any => met.any(|m| m),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_core::ClassThreshold;

    fn snapshot(levels: &[(u32, u32)]) -> CharacterSnapshot {
        CharacterSnapshot {
            active_level: 1,
            base_level: None,
            class_levels: levels.iter().map(|&(c, l)| (ClassId(c), l)).collect(),
            known_skills: BTreeSet::new(),
        }
    }

    fn group(combinator: Combinator, pairs: &[(u32, u32)]) -> UnlockCondition {
        UnlockCondition::ClassThresholds {
            combinator,
            thresholds: pairs
                .iter()
                .map(|&(c, l)| ClassThreshold {
                    class: ClassId(c),
                    level: l,
                })
                .collect(),
        }
    }

    #[test]
    fn and_group_needs_every_threshold() {
        let condition = group(Combinator::All, &[(2, 10), (3, 5)]);
        assert!(!evaluate(&condition, &snapshot(&[(2, 10), (3, 4)])));
        assert!(evaluate(&condition, &snapshot(&[(2, 10), (3, 5)])));
    }

    #[test]
    fn or_group_needs_one_threshold() {
        let condition = group(Combinator::Any, &[(2, 10), (3, 5)]);
        assert!(evaluate(&condition, &snapshot(&[(2, 1), (3, 5)])));
        assert!(!evaluate(&condition, &snapshot(&[(2, 9), (3, 4)])));
    }

    #[test]
    fn class_not_held_fails_threshold() {
        let condition = group(Combinator::All, &[(7, 1)]);
        assert!(!evaluate(&condition, &snapshot(&[(2, 50)])));
        let either = group(Combinator::Any, &[(7, 1), (2, 5)]);
        assert!(evaluate(&either, &snapshot(&[(2, 50)])));
    }

    #[test]
    fn empty_group_is_never_satisfied() {
        assert!(!evaluate(&group(Combinator::All, &[]), &snapshot(&[(1, 99)])));
        assert!(!evaluate(&group(Combinator::Any, &[]), &snapshot(&[(1, 99)])));
    }

    #[test]
    fn active_level_threshold() {
        let mut snap = snapshot(&[]);
        snap.active_level = 4;
        assert!(!evaluate(&UnlockCondition::active_level(5), &snap));
        snap.active_level = 5;
        assert!(evaluate(&UnlockCondition::active_level(5), &snap));
    }

    #[test]
    fn base_level_fails_closed_without_dual_mode() {
        let mut snap = snapshot(&[]);
        snap.active_level = 99;
        assert!(!evaluate(&UnlockCondition::base_level(1), &snap));
        snap.base_level = Some(3);
        assert!(evaluate(&UnlockCondition::base_level(3), &snap));
        assert!(!evaluate(&UnlockCondition::base_level(4), &snap));
    }

    #[test]
    fn skill_set_needs_every_skill() {
        let mut snap = snapshot(&[]);
        snap.known_skills = [SkillId(1), SkillId(2), SkillId(9)].into_iter().collect();
        let condition = UnlockCondition::skills([SkillId(2), SkillId(1), SkillId(2)]);
        assert!(evaluate(&condition, &snap));
        let missing = UnlockCondition::skills([SkillId(1), SkillId(3)]);
        assert!(!evaluate(&missing, &snap));
        assert!(!evaluate(&UnlockCondition::skills([]), &snap));
    }
}
