//! Host-facing progression engine.
//!
//! [`Progression`] owns the policy, the per-actor state and the event log.
//! Every command the host can issue goes through here, and every refused
//! command is logged before its error is returned.

use std::collections::{BTreeMap, BTreeSet};

use cc_core::{ActorId, ClassId, Database, SkillId, SkillTypeId};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::actor::ActorProgress;
use crate::config::ProgressionConfig;
use crate::error::{ProgressError, ProgressResult};
use crate::event::{EventLog, ProgressEvent};
use crate::ledger::ClassRecord;
use crate::policy::Policy;

/// Ledger command issued by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassAction {
    /// Grant a class, or re-enable a disabled one.
    Add,
    /// Disable a held class.
    Disable,
    /// Remove a class and its experience.
    Remove,
}

/// Visibility of the class change menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuAccess {
    /// Shown and selectable.
    #[default]
    Enabled,
    /// Shown but not selectable.
    Disabled,
    /// Not shown.
    Hidden,
}

/// The class change menu entry as the host should draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry<'a> {
    /// Entry text.
    pub label: &'a str,
    /// Whether choosing the entry opens the class change screen.
    pub selectable: bool,
}

/// Everything needed to restore an engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SaveState {
    /// Per-actor state, ordered by actor id.
    pub actors: Vec<ActorProgress>,
    /// Menu entry visibility.
    #[serde(default)]
    pub menu_access: MenuAccess,
}

/// The progression engine.
#[derive(Debug)]
pub struct Progression {
    policy: Policy,
    actors: BTreeMap<ActorId, ActorProgress>,
    menu_access: MenuAccess,
    events: EventLog,
}

impl Progression {
    /// Create an engine with no actors set up.
    pub fn new(config: ProgressionConfig, db: Database) -> Self {
        let events = EventLog::new(config.max_events);
        Self {
            policy: Policy::new(config, db),
            actors: BTreeMap::new(),
            menu_access: MenuAccess::default(),
            events,
        }
    }

    /// The mode policy.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// The configuration.
    pub fn config(&self) -> &ProgressionConfig {
        self.policy.config()
    }

    /// The database.
    pub fn database(&self) -> &Database {
        self.policy.database()
    }

    /// Events recorded since the last drain.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Take every recorded event, oldest first.
    pub fn drain_events(&mut self) -> Vec<ProgressEvent> {
        self.events.drain()
    }

    // -- Setup ----------------------------------------------------------------

    /// Set up an actor from its definition. Setting up an actor twice is a no-op.
    pub fn setup_actor(&mut self, actor: ActorId) -> ProgressResult<()> {
        if self.actors.contains_key(&actor) {
            return Ok(());
        }
        let definition = self.policy.database().actor(actor)?;
        let progress = self.policy.setup(definition, &mut self.events)?;
        self.actors.insert(actor, progress);
        Ok(())
    }

    /// Set up every actor in the database.
    pub fn setup_all(&mut self) -> ProgressResult<()> {
        let ids: Vec<ActorId> = self.policy.database().actors().map(|a| a.id).collect();
        for id in ids {
            self.setup_actor(id)?;
        }
        Ok(())
    }

    /// State of a set-up actor.
    pub fn actor(&self, actor: ActorId) -> ProgressResult<&ActorProgress> {
        self.actors
            .get(&actor)
            .ok_or(ProgressError::ActorNotSetUp(actor))
    }

    /// Every set-up actor, ordered by id.
    pub fn actors(&self) -> impl Iterator<Item = &ActorProgress> {
        self.actors.values()
    }

    fn with_actor<T>(
        &mut self,
        actor: ActorId,
        op: impl FnOnce(&Policy, &mut ActorProgress, &mut EventLog) -> ProgressResult<T>,
    ) -> ProgressResult<T> {
        let progress = self
            .actors
            .get_mut(&actor)
            .ok_or(ProgressError::ActorNotSetUp(actor))?;
        let result = op(&self.policy, progress, &mut self.events);
        if let Err(err) = &result {
            if err.is_invalid_operation() {
                warn!(%actor, error = %err, "command ignored");
            } else {
                warn!(%actor, error = %err, "command failed");
            }
        }
        result
    }

    // -- Commands -------------------------------------------------------------

    /// Grant, disable, or remove a class.
    pub fn modify_classes(
        &mut self,
        actor: ActorId,
        class: ClassId,
        action: ClassAction,
    ) -> ProgressResult<()> {
        self.with_actor(actor, |policy, progress, events| match action {
            ClassAction::Add => policy.add_class(progress, class, events),
            ClassAction::Disable => policy.disable_class(progress, class, events),
            ClassAction::Remove => policy.revoke_class(progress, class, events),
        })
    }

    /// Set the class change menu entry's visibility.
    pub fn set_menu_access(&mut self, access: MenuAccess) {
        self.menu_access = access;
    }

    /// Current menu entry visibility.
    pub fn menu_access(&self) -> MenuAccess {
        self.menu_access
    }

    /// The menu entry to draw, or `None` when it is not added or hidden.
    pub fn menu_entry(&self) -> Option<MenuEntry<'_>> {
        let menu = &self.policy.config().menu;
        if !menu.add_entry || self.menu_access == MenuAccess::Hidden {
            return None;
        }
        Some(MenuEntry {
            label: &menu.label,
            selectable: self.menu_access == MenuAccess::Enabled,
        })
    }

    /// Add experience according to the mode.
    pub fn gain_experience(&mut self, actor: ActorId, amount: i64) -> ProgressResult<()> {
        self.with_actor(actor, |policy, progress, events| {
            policy.gain_experience(progress, amount, events)
        })
    }

    /// Add experience to the dual-mode base progression only.
    pub fn gain_base_experience(&mut self, actor: ActorId, amount: i64) -> ProgressResult<()> {
        self.with_actor(actor, |policy, progress, events| {
            policy.gain_base_experience(progress, amount, events)
        })
    }

    /// Overwrite one class's experience.
    pub fn set_experience(
        &mut self,
        actor: ActorId,
        class: ClassId,
        amount: i64,
    ) -> ProgressResult<()> {
        self.with_actor(actor, |policy, progress, events| {
            policy.set_experience(progress, class, amount, events)
        })
    }

    /// Switch the active class by command.
    pub fn change_class(&mut self, actor: ActorId, class: ClassId) -> ProgressResult<()> {
        self.with_actor(actor, |policy, progress, events| {
            policy.change_class(progress, class, events)
        })
    }

    /// Low-level swap to `class` with the given experience.
    pub fn perform_class_swap(
        &mut self,
        actor: ActorId,
        class: ClassId,
        experience: i64,
    ) -> ProgressResult<()> {
        self.with_actor(actor, |policy, progress, events| {
            policy.perform_class_swap(progress, class, experience, events)
        })
    }

    /// Set current HP and MP, clamped to their maxima.
    pub fn set_vitals(&mut self, actor: ActorId, hp: i64, mp: i64) -> ProgressResult<()> {
        self.with_actor(actor, |policy, progress, _| {
            progress.hp = hp.clamp(0, policy.max_hp(progress));
            progress.mp = mp.clamp(0, policy.max_mp(progress));
            Ok(())
        })
    }

    // -- Queries --------------------------------------------------------------

    /// Derived level of a held class.
    pub fn level_of(&self, actor: ActorId, class: ClassId) -> ProgressResult<Option<u32>> {
        let progress = self.actor(actor)?;
        Ok(self.policy.level_of(progress, class))
    }

    /// Level of the active class.
    pub fn current_level(&self, actor: ActorId) -> ProgressResult<u32> {
        Ok(self.policy.current_level(self.actor(actor)?))
    }

    /// Level of the dual-mode base class.
    pub fn base_level(&self, actor: ActorId) -> ProgressResult<Option<u32>> {
        Ok(self.policy.base_level(self.actor(actor)?))
    }

    /// Experience counted toward a held class.
    pub fn experience_of(&self, actor: ActorId, class: ClassId) -> ProgressResult<Option<i64>> {
        Ok(self.policy.experience_of(self.actor(actor)?, class))
    }

    /// Experience still needed for the next level of the active class.
    pub fn experience_to_next(&self, actor: ActorId) -> ProgressResult<Option<i64>> {
        Ok(self.policy.experience_to_next(self.actor(actor)?))
    }

    /// Returns true if the active class is at the level cap.
    pub fn is_max_level(&self, actor: ActorId) -> ProgressResult<bool> {
        Ok(self.current_level(actor)? >= self.policy.level_cap())
    }

    /// Classes the actor could switch to: enabled and not active, in grant order.
    pub fn available_classes(&self, actor: ActorId) -> ProgressResult<Vec<ClassId>> {
        let progress = self.actor(actor)?;
        Ok(progress
            .ledger
            .iter()
            .filter(|r| r.enabled && r.class != progress.active)
            .map(|r| r.class)
            .collect())
    }

    /// The full ledger, in grant order.
    pub fn classes(&self, actor: ActorId) -> ProgressResult<Vec<ClassRecord>> {
        Ok(self.actor(actor)?.ledger.iter().cloned().collect())
    }

    /// The active class.
    pub fn active_class(&self, actor: ActorId) -> ProgressResult<ClassId> {
        Ok(self.actor(actor)?.active)
    }

    /// Base value of a parameter.
    pub fn param_base(&self, actor: ActorId, param: usize) -> ProgressResult<i64> {
        Ok(self.policy.param_base(self.actor(actor)?, param))
    }

    /// Maximum HP.
    pub fn max_hp(&self, actor: ActorId) -> ProgressResult<i64> {
        Ok(self.policy.max_hp(self.actor(actor)?))
    }

    /// Maximum MP.
    pub fn max_mp(&self, actor: ActorId) -> ProgressResult<i64> {
        Ok(self.policy.max_mp(self.actor(actor)?))
    }

    /// Every skill the actor knows.
    pub fn known_skills(&self, actor: ActorId) -> ProgressResult<BTreeSet<SkillId>> {
        Ok(self.actor(actor)?.known_skills())
    }

    /// Skill types the actor can use.
    pub fn skill_types(&self, actor: ActorId) -> ProgressResult<BTreeSet<SkillTypeId>> {
        Ok(self.policy.skill_types(self.actor(actor)?))
    }

    // -- Persistence ----------------------------------------------------------

    /// Snapshot every actor for the host's save file.
    pub fn save_state(&self) -> SaveState {
        SaveState {
            actors: self.actors.values().cloned().collect(),
            menu_access: self.menu_access,
        }
    }

    /// Replace all actor state with a saved snapshot.
    ///
    /// Every actor and class the snapshot names must exist in the database;
    /// nothing is replaced otherwise.
    pub fn load_state(&mut self, state: SaveState) -> ProgressResult<()> {
        let db = self.policy.database();
        for progress in &state.actors {
            db.actor(progress.actor)?;
            db.class(progress.active)?;
            for record in progress.ledger.iter() {
                db.class(record.class)?;
            }
            if let Some(base) = &progress.base {
                db.class(base.class)?;
            }
            if !progress.ledger.contains(progress.active) {
                return Err(ProgressError::ClassNotHeld(progress.active));
            }
        }
        self.actors = state
            .actors
            .into_iter()
            .map(|progress| (progress.actor, progress))
            .collect();
        self.menu_access = state.menu_access;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MenuConfig, ProgressionMode};
    use crate::event::ProgressEventKind;
    use crate::fixtures::{self, HAROLD, MAGE, PALADIN, SAGE, THERESE, WARRIOR};

    fn per_class() -> ProgressionConfig {
        ProgressionConfig::default().with_mode(ProgressionMode::PerClass)
    }

    #[test]
    fn setup_all_registers_every_actor() {
        let engine = fixtures::engine(ProgressionConfig::default());
        assert_eq!(engine.actors().count(), 3);
        assert_eq!(engine.active_class(THERESE).unwrap(), WARRIOR);
    }

    #[test]
    fn setup_twice_is_noop() {
        let mut engine = fixtures::engine(per_class());
        engine.gain_experience(HAROLD, 100).unwrap();
        engine.setup_actor(HAROLD).unwrap();
        assert_eq!(engine.experience_of(HAROLD, WARRIOR).unwrap(), Some(100));
    }

    #[test]
    fn unknown_actor_errors() {
        let mut engine = Progression::new(ProgressionConfig::default(), fixtures::database());
        assert!(matches!(
            engine.gain_experience(HAROLD, 10),
            Err(ProgressError::ActorNotSetUp(_))
        ));
        assert!(matches!(
            engine.setup_actor(cc_core::ActorId(40)),
            Err(ProgressError::UnknownActor(_))
        ));
    }

    #[test]
    fn modify_classes_round_trip() {
        let mut engine = fixtures::engine(ProgressionConfig::default());
        engine
            .modify_classes(HAROLD, PALADIN, ClassAction::Add)
            .unwrap();
        engine
            .modify_classes(HAROLD, PALADIN, ClassAction::Disable)
            .unwrap();
        engine
            .modify_classes(HAROLD, PALADIN, ClassAction::Remove)
            .unwrap();
        let kinds: Vec<ProgressEventKind> =
            engine.drain_events().into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ProgressEventKind::ClassGranted {
                    actor: HAROLD,
                    class: PALADIN
                },
                ProgressEventKind::ClassDisabled {
                    actor: HAROLD,
                    class: PALADIN
                },
                ProgressEventKind::ClassRevoked {
                    actor: HAROLD,
                    class: PALADIN
                },
            ]
        );
        assert!(engine.events().is_empty());
    }

    #[test]
    fn invalid_commands_leave_state() {
        let mut engine = fixtures::engine(ProgressionConfig::default());
        let before = engine.actor(HAROLD).unwrap().clone();
        let err = engine
            .modify_classes(HAROLD, WARRIOR, ClassAction::Add)
            .unwrap_err();
        assert!(err.is_invalid_operation());
        let err = engine
            .modify_classes(HAROLD, WARRIOR, ClassAction::Remove)
            .unwrap_err();
        assert!(matches!(err, ProgressError::SoleClass(_)));
        assert_eq!(engine.actor(HAROLD).unwrap(), &before);
    }

    #[test]
    fn available_classes_excludes_active_and_disabled() {
        let engine = fixtures::engine(ProgressionConfig::default());
        assert_eq!(engine.available_classes(THERESE).unwrap(), vec![MAGE]);
        let all: Vec<ClassId> = engine
            .classes(THERESE)
            .unwrap()
            .iter()
            .map(|r| r.class)
            .collect();
        assert_eq!(all, vec![WARRIOR, MAGE, SAGE]);
    }

    #[test]
    fn queries_follow_active_class() {
        let mut engine = fixtures::engine(per_class());
        engine.gain_experience(THERESE, 593).unwrap();
        assert_eq!(engine.current_level(THERESE).unwrap(), 5);
        assert_eq!(engine.level_of(THERESE, MAGE).unwrap(), Some(1));
        assert_eq!(engine.level_of(THERESE, PALADIN).unwrap(), None);
        assert_eq!(engine.base_level(THERESE).unwrap(), None);
        assert_eq!(engine.experience_to_next(THERESE).unwrap(), Some(407));
        assert_eq!(engine.max_hp(THERESE).unwrap(), 180);
        assert_eq!(engine.max_mp(THERESE).unwrap(), 18);
        assert_eq!(engine.param_base(THERESE, 2).unwrap(), 24);
        assert!(!engine.is_max_level(THERESE).unwrap());
        assert!(engine.known_skills(THERESE).unwrap().contains(&cc_core::SkillId(10)));
        assert!(engine
            .skill_types(THERESE)
            .unwrap()
            .contains(&fixtures::ARTS_TYPE));
    }

    #[test]
    fn set_vitals_clamps_to_maxima() {
        let mut engine = fixtures::engine(ProgressionConfig::default());
        engine.set_vitals(HAROLD, 500, -3).unwrap();
        let progress = engine.actor(HAROLD).unwrap();
        assert_eq!(progress.hp, 100);
        assert_eq!(progress.mp, 0);
    }

    #[test]
    fn menu_entry_follows_config_and_access() {
        let menu = MenuConfig {
            label: "Job Change".to_string(),
            ..MenuConfig::default()
        };
        let mut engine = fixtures::engine(ProgressionConfig {
            menu,
            ..ProgressionConfig::default()
        });
        assert_eq!(
            engine.menu_entry(),
            Some(MenuEntry {
                label: "Job Change",
                selectable: true
            })
        );
        engine.set_menu_access(MenuAccess::Disabled);
        assert_eq!(engine.menu_entry().map(|e| e.selectable), Some(false));
        engine.set_menu_access(MenuAccess::Hidden);
        assert_eq!(engine.menu_entry(), None);
    }

    #[test]
    fn menu_entry_absent_when_not_added() {
        let menu = MenuConfig {
            add_entry: false,
            ..MenuConfig::default()
        };
        let engine = fixtures::engine(ProgressionConfig {
            menu,
            ..ProgressionConfig::default()
        });
        assert_eq!(engine.menu_entry(), None);
    }

    #[test]
    fn menu_access_is_saved() {
        let mut engine = fixtures::engine(ProgressionConfig::default());
        engine.set_menu_access(MenuAccess::Hidden);
        assert_eq!(engine.menu_access(), MenuAccess::Hidden);
        assert_eq!(engine.save_state().menu_access, MenuAccess::Hidden);
    }

    #[test]
    fn save_and_load_through_json() {
        let mut engine = fixtures::engine(per_class());
        engine.gain_experience(THERESE, 600).unwrap();
        engine.change_class(THERESE, MAGE).unwrap();
        let json = serde_json::to_string(&engine.save_state()).unwrap();

        let mut restored = Progression::new(per_class(), fixtures::database());
        restored
            .load_state(serde_json::from_str(&json).unwrap())
            .unwrap();
        assert_eq!(restored.active_class(THERESE).unwrap(), MAGE);
        assert_eq!(restored.level_of(THERESE, WARRIOR).unwrap(), Some(5));
        assert_eq!(
            restored.actor(THERESE).unwrap(),
            engine.actor(THERESE).unwrap()
        );

        // Granted rules stay retired after a reload.
        restored.gain_experience(THERESE, 1).unwrap();
        assert!(restored.drain_events().iter().all(|e| !matches!(
            e.kind,
            ProgressEventKind::SkillLearned {
                skill: cc_core::SkillId(10),
                ..
            }
        )));
    }

    #[test]
    fn load_rejects_unknown_classes() {
        let engine = fixtures::engine(ProgressionConfig::default());
        let mut state = engine.save_state();
        state.actors[0].active = ClassId(99);
        let mut other = Progression::new(ProgressionConfig::default(), fixtures::database());
        assert!(matches!(
            other.load_state(state),
            Err(ProgressError::UnknownClass(ClassId(99)))
        ));
        assert_eq!(other.actors().count(), 0);
    }

    #[test]
    fn event_log_respects_capacity() {
        let mut engine = fixtures::engine(per_class().with_max_events(2));
        engine.modify_classes(HAROLD, MAGE, ClassAction::Add).unwrap();
        engine.modify_classes(HAROLD, PALADIN, ClassAction::Add).unwrap();
        engine.change_class(HAROLD, MAGE).unwrap();
        assert_eq!(engine.events().len(), 2);
        assert!(matches!(
            engine.events().events()[1].kind,
            ProgressEventKind::ClassSwapped { .. }
        ));
    }

    #[test]
    fn max_level_with_cap() {
        let mut engine = fixtures::engine(per_class().with_level_cap(4));
        engine.gain_experience(HAROLD, 10_000).unwrap();
        assert!(engine.is_max_level(HAROLD).unwrap());
        assert_eq!(engine.current_level(HAROLD).unwrap(), 4);
    }
}
