//! Progression mode policy.
//!
//! [`Policy`] owns the configuration and the database and implements every
//! mode-dependent rule: where experience goes, which level drives
//! parameters, how a class swap carries experience over, and when the
//! unlock orchestrator runs.

use std::collections::{BTreeMap, BTreeSet};

use cc_core::{
    ActorDefinition, ClassDefinition, ClassId, CurveParams, Database, ParamTable, SkillTypeId,
    UnlockRule,
};
use cc_notetag::{parse_actor_note, parse_class_note};
use tracing::{debug, info, warn};

use crate::actor::ActorProgress;
use crate::config::{DualLevelUp, ProgressionConfig, ProgressionMode, StatGainSource};
use crate::curve;
use crate::error::{ProgressError, ProgressResult};
use crate::event::{EventLog, ProgressEventKind};
use crate::ledger::ClassRecord;
use crate::prerequisite::CharacterSnapshot;
use crate::unlock::{self, UnlockBook};

/// Levels captured before an experience change.
#[derive(Debug, Clone)]
struct Levels {
    active: u32,
    base: Option<u32>,
    classes: BTreeMap<ClassId, u32>,
}

impl Levels {
    /// Whether any class held in both captures derived a higher level.
    fn class_rose(&self, after: &Levels) -> bool {
        after
            .classes
            .iter()
            .any(|(class, &to)| self.classes.get(class).is_some_and(|&from| to > from))
    }
}

/// Mode-dependent progression rules over a fixed database.
#[derive(Debug, Clone)]
pub struct Policy {
    config: ProgressionConfig,
    db: Database,
    class_rules: Vec<UnlockRule>,
}

impl Policy {
    /// Build the policy, decoding class unlock rules from class notes once.
    pub fn new(config: ProgressionConfig, db: Database) -> Self {
        if let Some(source) = config.stat_gain() {
            warn!(?source, "stat gain level-up is experimental");
        }
        let class_rules = db
            .classes()
            .flat_map(|class| parse_class_note(class.id, &class.note).learn_rules)
            .collect();
        Self {
            config,
            db,
            class_rules,
        }
    }

    /// The configuration.
    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    /// The database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Unlock rules decoded from class notes.
    pub fn class_rules(&self) -> &[UnlockRule] {
        &self.class_rules
    }

    /// Effective level cap.
    pub fn level_cap(&self) -> u32 {
        self.config
            .level_cap
            .unwrap_or_else(|| self.db.max_level())
            .max(1)
    }

    fn class(&self, class: ClassId) -> ProgressResult<&ClassDefinition> {
        Ok(self.db.class(class)?)
    }

    /// Curve coefficients of a class. A class without a definition is a
    /// configuration error.
    pub fn curve(&self, class: ClassId) -> ProgressResult<&CurveParams> {
        Ok(&self.class(class)?.curve)
    }

    /// Level `experience` reaches on the class's curve.
    pub fn class_level(&self, class: ClassId, experience: i64) -> ProgressResult<u32> {
        Ok(curve::level_for_experience(
            self.curve(class)?,
            experience,
            self.level_cap(),
        ))
    }

    // -- Queries ------------------------------------------------------------

    /// Experience counted toward a held class. In shared mode every held
    /// class reads the common pool.
    pub fn experience_of(&self, progress: &ActorProgress, class: ClassId) -> Option<i64> {
        let stored = progress.ledger.experience_of(class)?;
        if self.config.is_shared() {
            Some(progress.shared_experience)
        } else {
            Some(stored)
        }
    }

    /// Derived level of a held class, `None` if it is not held or has no curve.
    pub fn level_of(&self, progress: &ActorProgress, class: ClassId) -> Option<u32> {
        let experience = self.experience_of(progress, class)?;
        self.class_level(class, experience).ok()
    }

    /// Level of the active class.
    pub fn current_level(&self, progress: &ActorProgress) -> u32 {
        self.level_of(progress, progress.active).unwrap_or(1)
    }

    /// Level of the dual-mode base class.
    pub fn base_level(&self, progress: &ActorProgress) -> Option<u32> {
        let base = progress.base.as_ref()?;
        self.class_level(base.class, base.experience).ok()
    }

    /// Level that drives parameters: the base level in dual mode, otherwise
    /// the active class level.
    pub fn parameter_level(&self, progress: &ActorProgress) -> u32 {
        self.base_level(progress)
            .unwrap_or_else(|| self.current_level(progress))
    }

    /// Experience still needed for the active class's next level, `None` at the cap.
    pub fn experience_to_next(&self, progress: &ActorProgress) -> Option<i64> {
        let experience = self.experience_of(progress, progress.active)?;
        let curve = self.curve(progress.active).ok()?;
        curve::experience_to_next(curve, experience, self.level_cap())
    }

    /// Base value of a parameter.
    pub fn param_base(&self, progress: &ActorProgress, param: usize) -> i64 {
        match self.config.mode {
            ProgressionMode::Dual {
                level_up: DualLevelUp::StatGain { .. },
            } => progress.stat_params.get(param).copied().unwrap_or(0),
            ProgressionMode::Dual {
                level_up: DualLevelUp::Normal,
            } => {
                let Some(base) = progress.base.as_ref() else {
                    return 0;
                };
                let level = self.base_level(progress).unwrap_or(1);
                self.class(base.class)
                    .map(|c| c.params.value(param, level))
                    .unwrap_or(0)
            }
            ProgressionMode::Shared { .. } | ProgressionMode::PerClass => {
                let level = self.current_level(progress);
                self.class(progress.active)
                    .map(|c| c.params.value(param, level))
                    .unwrap_or(0)
            }
        }
    }

    /// Maximum HP.
    pub fn max_hp(&self, progress: &ActorProgress) -> i64 {
        self.param_base(progress, ParamTable::MAX_HP).max(1)
    }

    /// Maximum MP.
    pub fn max_mp(&self, progress: &ActorProgress) -> i64 {
        self.param_base(progress, ParamTable::MAX_MP).max(0)
    }

    /// Skill types usable right now: the active class's plus every innate one.
    pub fn skill_types(&self, progress: &ActorProgress) -> BTreeSet<SkillTypeId> {
        let mut types = progress.innate_skill_types.clone();
        if let Ok(class) = self.class(progress.active) {
            types.extend(class.skill_types.iter().copied());
        }
        types
    }

    /// Derived level of every held class.
    fn class_levels(&self, progress: &ActorProgress) -> BTreeMap<ClassId, u32> {
        progress
            .ledger
            .iter()
            .filter_map(|r| Some((r.class, self.level_of(progress, r.class)?)))
            .collect()
    }

    /// The state unlock conditions are evaluated against.
    pub fn snapshot(&self, progress: &ActorProgress) -> CharacterSnapshot {
        CharacterSnapshot {
            active_level: self.current_level(progress),
            base_level: self.base_level(progress),
            class_levels: self.class_levels(progress),
            known_skills: progress.known_skills(),
        }
    }

    // -- Setup --------------------------------------------------------------

    /// Build the starting state for an actor and run the initial unlock pass.
    pub fn setup(
        &self,
        definition: &ActorDefinition,
        events: &mut EventLog,
    ) -> ProgressResult<ActorProgress> {
        let actor = definition.id;
        let notes = parse_actor_note(&definition.note);
        let cap = self.level_cap();
        let start_level = definition.initial_level.clamp(1, cap);
        let start_class = definition.class_id;
        let start_experience = curve::experience_for_level(self.curve(start_class)?, start_level);

        let mut progress = ActorProgress {
            actor,
            ledger: Default::default(),
            active: start_class,
            shared_experience: start_experience,
            base: None,
            stat_params: Vec::new(),
            hp: 0,
            mp: 0,
            class_skills: BTreeSet::new(),
            innate_skills: BTreeSet::new(),
            innate_skill_types: BTreeSet::new(),
            unlocks: UnlockBook::default(),
        };
        progress.ledger.grant(start_class, start_experience, true)?;

        let grants = notes.grants.iter().map(|&c| (c, true));
        let disabled = notes.disabled_grants.iter().map(|&c| (c, false));
        for (class, enabled) in grants.chain(disabled) {
            if self.db.class(class).is_err() {
                warn!(%actor, %class, "granted class has no definition; skipped");
                continue;
            }
            if progress.ledger.contains(class) {
                debug!(%actor, %class, "class granted twice; skipped");
                continue;
            }
            progress.ledger.grant(class, 0, enabled)?;
        }

        if self.config.is_dual() {
            let base_class = notes
                .default_class
                .or_else(|| progress.ledger.iter().next().map(|r| r.class))
                .ok_or(ProgressError::MissingBaseClass(actor))?;
            let base_experience =
                curve::experience_for_level(self.curve(base_class)?, start_level);
            progress.base = Some(ClassRecord::new(base_class, base_experience, true));
        }

        if self.config.stat_gain().is_some() {
            let level = self.parameter_level(&progress);
            let table = &self.class(start_class)?.params;
            progress.stat_params = (0..table.param_count())
                .map(|param| table.value(param, level))
                .collect();
        }

        let level = self.current_level(&progress);
        progress.class_skills = self.class(start_class)?.skills_up_to(level).collect();
        progress.hp = self.max_hp(&progress);
        progress.mp = self.max_mp(&progress);
        progress.unlocks = UnlockBook::new(
            notes
                .innate_skills
                .into_iter()
                .chain(self.class_rules.iter().cloned()),
        );

        info!(%actor, class = %start_class, level, "actor set up");
        unlock::run_pass(self, &mut progress, events);
        Ok(progress)
    }

    // -- Experience ---------------------------------------------------------

    fn levels(&self, progress: &ActorProgress) -> Levels {
        Levels {
            active: self.current_level(progress),
            base: self.base_level(progress),
            classes: self.class_levels(progress),
        }
    }

    /// Add experience according to the mode. Negative amounts are allowed
    /// and clamp at zero.
    pub fn gain_experience(
        &self,
        progress: &mut ActorProgress,
        amount: i64,
        events: &mut EventLog,
    ) -> ProgressResult<()> {
        let before = self.levels(progress);
        match self.config.mode {
            ProgressionMode::Shared { .. } => {
                progress.shared_experience = add_experience(progress.shared_experience, amount);
            }
            ProgressionMode::PerClass => {
                let record = self.active_record(progress)?;
                record.experience = add_experience(record.experience, amount);
            }
            ProgressionMode::Dual { .. } => {
                let record = self.active_record(progress)?;
                record.experience = add_experience(record.experience, amount);
                if let Some(base) = progress.base.as_mut() {
                    base.experience = add_experience(base.experience, amount);
                }
            }
        }
        self.settle_levels(progress, before, events)
    }

    /// Add experience to the dual-mode base progression only.
    pub fn gain_base_experience(
        &self,
        progress: &mut ActorProgress,
        amount: i64,
        events: &mut EventLog,
    ) -> ProgressResult<()> {
        let before = self.levels(progress);
        let Some(base) = progress.base.as_mut() else {
            warn!(actor = %progress.actor, "base experience outside dual mode ignored");
            return Ok(());
        };
        base.experience = add_experience(base.experience, amount);
        self.settle_levels(progress, before, events)
    }

    /// Overwrite the experience of a class (the pool in shared mode, the
    /// base record in dual mode when `class` is the base class and not held).
    pub fn set_experience(
        &self,
        progress: &mut ActorProgress,
        class: ClassId,
        amount: i64,
        events: &mut EventLog,
    ) -> ProgressResult<()> {
        let before = self.levels(progress);
        let amount = amount.max(0);
        if self.config.is_shared() && progress.ledger.contains(class) {
            progress.shared_experience = amount;
        } else if let Some(record) = progress.ledger.get_mut(class) {
            record.experience = amount;
        } else if let Some(base) = progress.base.as_mut().filter(|b| b.class == class) {
            base.experience = amount;
        } else {
            return Err(ProgressError::ClassNotHeld(class));
        }
        self.settle_levels(progress, before, events)
    }

    fn active_record<'a>(
        &self,
        progress: &'a mut ActorProgress,
    ) -> ProgressResult<&'a mut ClassRecord> {
        let active = progress.active;
        progress
            .ledger
            .get_mut(active)
            .ok_or(ProgressError::ClassNotHeld(active))
    }

    /// Apply the consequences of an experience change: learnings, level-up
    /// events, stat gains and vital clamping. One unlock pass runs when the
    /// active, base or any held class level rose.
    fn settle_levels(
        &self,
        progress: &mut ActorProgress,
        before: Levels,
        events: &mut EventLog,
    ) -> ProgressResult<()> {
        let actor = progress.actor;
        let after = self.levels(progress);
        let mut levelled = false;

        if after.active > before.active {
            let class = self.class(progress.active)?;
            info!(%actor, class = %class.id, from = before.active, to = after.active, "level up");
            events.push(ProgressEventKind::LevelUp {
                actor,
                class: class.id,
                from: before.active,
                to: after.active,
            });
            for skill in class.skills_up_to(after.active) {
                if progress.class_skills.insert(skill) {
                    events.push(ProgressEventKind::SkillLearned { actor, skill });
                }
            }
            levelled = true;
        }

        let base_gain = before.base.zip(after.base).filter(|(from, to)| to > from);
        if let Some((from, to)) = base_gain {
            self.base_level_up(progress, from, to, events)?;
            levelled = true;
        }

        if before.class_rose(&after) {
            debug!(%actor, "held class level rose");
            levelled = true;
        }

        self.clamp_vitals(progress);
        if levelled {
            unlock::run_pass(self, progress, events);
        }
        Ok(())
    }

    fn base_level_up(
        &self,
        progress: &mut ActorProgress,
        from: u32,
        to: u32,
        events: &mut EventLog,
    ) -> ProgressResult<()> {
        let actor = progress.actor;
        let base_class = progress
            .base_class()
            .ok_or(ProgressError::MissingBaseClass(actor))?;
        if let Some(source) = self.config.stat_gain() {
            self.apply_stat_gain(progress, source, from, to)?;
        }
        info!(%actor, class = %base_class, from, to, "base level up");
        events.push(ProgressEventKind::BaseLevelUp {
            actor,
            class: base_class,
            from,
            to,
        });
        Ok(())
    }

    /// Accumulate parameters for base levels `from` to `to` from the active
    /// class's table.
    fn apply_stat_gain(
        &self,
        progress: &mut ActorProgress,
        source: StatGainSource,
        from: u32,
        to: u32,
    ) -> ProgressResult<()> {
        let table = &self.class(progress.active)?.params;
        if progress.stat_params.len() < table.param_count() {
            progress.stat_params.resize(table.param_count(), 0);
        }
        let gained = i64::from(to - from);
        for (param, value) in progress.stat_params.iter_mut().enumerate() {
            let delta = match source {
                StatGainSource::CurrentLevel => table.value(param, to) - table.value(param, from),
                StatGainSource::LevelOne => table.value(param, 1) * gained,
            };
            *value += delta;
        }
        debug!(actor = %progress.actor, ?source, params = ?progress.stat_params, "stat gain applied");
        Ok(())
    }

    fn clamp_vitals(&self, progress: &mut ActorProgress) {
        progress.hp = progress.hp.clamp(0, self.max_hp(progress));
        progress.mp = progress.mp.clamp(0, self.max_mp(progress));
    }

    // -- Class swaps ----------------------------------------------------------

    /// Make `target` the active class.
    ///
    /// In per-class and dual mode the target's record takes `experience`; in
    /// shared mode the pool is kept, or re-expressed on the target curve at
    /// the same level and progress when `maintain_level` is set. A target
    /// not yet held is granted first. Class skills are re-derived; innate
    /// skills are kept. Not an unlock trigger.
    pub fn perform_class_swap(
        &self,
        progress: &mut ActorProgress,
        target: ClassId,
        experience: i64,
        events: &mut EventLog,
    ) -> ProgressResult<()> {
        let actor = progress.actor;
        let from = progress.active;
        let target_class = self.class(target)?;
        let cap = self.level_cap();

        let pool = match self.config.mode {
            ProgressionMode::Shared {
                maintain_level: true,
            } => {
                let old_curve = self.curve(from)?;
                let level = curve::level_for_experience(old_curve, progress.shared_experience, cap);
                let progress_fraction =
                    curve::progress_to_next(old_curve, progress.shared_experience, cap);
                curve::experience_at_progress(&target_class.curve, level, progress_fraction, cap)
            }
            _ => progress.shared_experience,
        };
        let vitals = self.config.preserve_vital_ratio.then(|| {
            (
                ratio(progress.hp, self.max_hp(progress)),
                ratio(progress.mp, self.max_mp(progress)),
            )
        });

        let shared = self.config.is_shared();
        match progress.ledger.get_mut(target) {
            Some(record) if !shared => record.experience = experience.max(0),
            Some(_) => {}
            None => {
                progress.ledger.grant(target, experience, true)?;
                events.push(ProgressEventKind::ClassGranted {
                    actor,
                    class: target,
                });
            }
        }
        progress.shared_experience = pool;
        progress.active = target;

        let level = self.current_level(progress);
        progress.class_skills = target_class.skills_up_to(level).collect();
        if let Some((hp_ratio, mp_ratio)) = vitals {
            progress.hp = (hp_ratio * self.max_hp(progress) as f64).round() as i64;
            progress.mp = (mp_ratio * self.max_mp(progress) as f64).round() as i64;
        }
        self.clamp_vitals(progress);

        info!(%actor, %from, to = %target, level, "class swapped");
        events.push(ProgressEventKind::ClassSwapped {
            actor,
            from,
            to: target,
            level,
        });
        Ok(())
    }

    /// Switch to `target` by command: grant it if missing, refuse disabled
    /// or already-active targets, otherwise reuse its stored experience.
    pub fn change_class(
        &self,
        progress: &mut ActorProgress,
        target: ClassId,
        events: &mut EventLog,
    ) -> ProgressResult<()> {
        if progress.active == target {
            return Err(ProgressError::AlreadyActive(target));
        }
        let experience = match progress.ledger.get(target) {
            None => 0,
            Some(record) if !record.enabled => return Err(ProgressError::ClassDisabled(target)),
            Some(record) => record.experience,
        };
        self.perform_class_swap(progress, target, experience, events)
    }

    // -- Ledger commands ------------------------------------------------------

    /// Grant (or re-enable) a class.
    pub fn add_class(
        &self,
        progress: &mut ActorProgress,
        class: ClassId,
        events: &mut EventLog,
    ) -> ProgressResult<()> {
        self.curve(class)?;
        progress.ledger.grant(class, 0, true)?;
        events.push(ProgressEventKind::ClassGranted {
            actor: progress.actor,
            class,
        });
        Ok(())
    }

    /// Disable a class. The active class may be disabled; it stays active
    /// until the next swap.
    pub fn disable_class(
        &self,
        progress: &mut ActorProgress,
        class: ClassId,
        events: &mut EventLog,
    ) -> ProgressResult<()> {
        progress.ledger.disable(class)?;
        events.push(ProgressEventKind::ClassDisabled {
            actor: progress.actor,
            class,
        });
        Ok(())
    }

    /// Remove a class, discarding its experience.
    ///
    /// Revoking the active class first swaps to the first other class in
    /// grant order. The sole class cannot be revoked.
    pub fn revoke_class(
        &self,
        progress: &mut ActorProgress,
        class: ClassId,
        events: &mut EventLog,
    ) -> ProgressResult<()> {
        if !progress.ledger.contains(class) {
            return Err(ProgressError::ClassNotHeld(class));
        }
        if progress.active == class {
            let fallback = progress
                .ledger
                .fallback_for(class)
                .ok_or(ProgressError::SoleClass(class))?;
            let experience = progress.ledger.experience_of(fallback).unwrap_or(0);
            self.perform_class_swap(progress, fallback, experience, events)?;
        }
        progress.ledger.remove(class)?;
        events.push(ProgressEventKind::ClassRevoked {
            actor: progress.actor,
            class,
        });
        Ok(())
    }
}

fn add_experience(current: i64, amount: i64) -> i64 {
    current.saturating_add(amount).max(0)
}

fn ratio(current: i64, max: i64) -> f64 {
    if max <= 0 {
        1.0
    } else {
        current as f64 / max as f64
    }
}
