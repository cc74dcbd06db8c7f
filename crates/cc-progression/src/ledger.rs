//! Per-actor class ledger: every class ever granted, in grant order.

use cc_core::ClassId;
use serde::{Deserialize, Serialize};

use crate::error::{ProgressError, ProgressResult};

/// One class held by an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    /// The class.
    pub class: ClassId,
    /// Experience accumulated in this class.
    pub experience: i64,
    /// Disabled classes stay in the ledger but cannot be selected.
    pub enabled: bool,
}

impl ClassRecord {
    /// Create a record.
    pub fn new(class: ClassId, experience: i64, enabled: bool) -> Self {
        Self {
            class,
            experience: experience.max(0),
            enabled,
        }
    }
}

/// What [`ClassLedger::grant`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantOutcome {
    /// A new record was appended.
    Added,
    /// An existing disabled record was enabled again, keeping its experience.
    Reenabled,
}

/// Ordered collection of class records with at most one record per class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassLedger {
    records: Vec<ClassRecord>,
}

impl ClassLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a class.
    ///
    /// An existing disabled record is re-enabled instead of duplicated and
    /// keeps its experience; `experience` only seeds new records. Granting
    /// a held class disabled changes nothing and fails.
    pub fn grant(
        &mut self,
        class: ClassId,
        experience: i64,
        enabled: bool,
    ) -> ProgressResult<GrantOutcome> {
        match self.get_mut(class) {
            Some(record) if record.enabled => Err(ProgressError::AlreadyEnabled(class)),
            Some(_) if !enabled => Err(ProgressError::AlreadyDisabled(class)),
            Some(record) => {
                record.enabled = true;
                Ok(GrantOutcome::Reenabled)
            }
            None => {
                self.records.push(ClassRecord::new(class, experience, enabled));
                Ok(GrantOutcome::Added)
            }
        }
    }

    /// Disable a class. Absent classes count as already disabled.
    pub fn disable(&mut self, class: ClassId) -> ProgressResult<()> {
        match self.get_mut(class) {
            Some(record) if record.enabled => {
                record.enabled = false;
                Ok(())
            }
            _ => Err(ProgressError::AlreadyDisabled(class)),
        }
    }

    /// Remove a class record, discarding its experience.
    ///
    /// The ledger never removes its last record.
    pub fn remove(&mut self, class: ClassId) -> ProgressResult<ClassRecord> {
        let index = self
            .records
            .iter()
            .position(|r| r.class == class)
            .ok_or(ProgressError::ClassNotHeld(class))?;
        if self.records.len() == 1 {
            return Err(ProgressError::SoleClass(class));
        }
        Ok(self.records.remove(index))
    }

    /// First record in grant order other than `class`, enabled or not.
    pub fn fallback_for(&self, class: ClassId) -> Option<ClassId> {
        self.records.iter().map(|r| r.class).find(|&c| c != class)
    }

    /// Look up a record.
    pub fn get(&self, class: ClassId) -> Option<&ClassRecord> {
        self.records.iter().find(|r| r.class == class)
    }

    /// Look up a record mutably.
    pub fn get_mut(&mut self, class: ClassId) -> Option<&mut ClassRecord> {
        self.records.iter_mut().find(|r| r.class == class)
    }

    /// Returns true if the class is in the ledger, enabled or not.
    pub fn contains(&self, class: ClassId) -> bool {
        self.get(class).is_some()
    }

    /// Returns true if the class is held and enabled.
    pub fn is_enabled(&self, class: ClassId) -> bool {
        self.get(class).is_some_and(|r| r.enabled)
    }

    /// Stored experience for a class, if held.
    pub fn experience_of(&self, class: ClassId) -> Option<i64> {
        self.get(class).map(|r| r.experience)
    }

    /// Records in grant order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassRecord> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no class is held.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ledger_with(classes: &[u32]) -> ClassLedger {
        let mut ledger = ClassLedger::new();
        for &c in classes {
            ledger.grant(ClassId(c), 0, true).unwrap();
        }
        ledger
    }

    #[test]
    fn grant_appends_in_order() {
        let ledger = ledger_with(&[3, 1, 2]);
        let order: Vec<u32> = ledger.iter().map(|r| r.class.0).collect();
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn grant_enabled_twice_fails() {
        let mut ledger = ledger_with(&[1]);
        assert!(matches!(
            ledger.grant(ClassId(1), 50, true),
            Err(ProgressError::AlreadyEnabled(ClassId(1)))
        ));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn grant_reenables_disabled_record() {
        let mut ledger = ClassLedger::new();
        ledger.grant(ClassId(1), 120, false).unwrap();
        assert!(!ledger.is_enabled(ClassId(1)));
        assert_eq!(
            ledger.grant(ClassId(1), 0, true).unwrap(),
            GrantOutcome::Reenabled
        );
        assert!(ledger.is_enabled(ClassId(1)));
        assert_eq!(ledger.experience_of(ClassId(1)), Some(120));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn disabled_grant_of_disabled_record_fails() {
        let mut ledger = ClassLedger::new();
        ledger.grant(ClassId(1), 120, false).unwrap();
        assert!(matches!(
            ledger.grant(ClassId(1), 0, false),
            Err(ProgressError::AlreadyDisabled(ClassId(1)))
        ));
        assert!(!ledger.is_enabled(ClassId(1)));
        assert_eq!(ledger.experience_of(ClassId(1)), Some(120));
    }

    #[test]
    fn disable_twice_fails() {
        let mut ledger = ledger_with(&[1]);
        ledger.disable(ClassId(1)).unwrap();
        assert!(matches!(
            ledger.disable(ClassId(1)),
            Err(ProgressError::AlreadyDisabled(_))
        ));
        assert!(matches!(
            ledger.disable(ClassId(9)),
            Err(ProgressError::AlreadyDisabled(_))
        ));
    }

    #[test]
    fn remove_discards_experience() {
        let mut ledger = ledger_with(&[1, 2]);
        ledger.get_mut(ClassId(2)).unwrap().experience = 500;
        let removed = ledger.remove(ClassId(2)).unwrap();
        assert_eq!(removed.experience, 500);
        ledger.grant(ClassId(2), 0, true).unwrap();
        assert_eq!(ledger.experience_of(ClassId(2)), Some(0));
    }

    #[test]
    fn remove_sole_class_fails() {
        let mut ledger = ledger_with(&[1]);
        assert!(matches!(
            ledger.remove(ClassId(1)),
            Err(ProgressError::SoleClass(_))
        ));
        assert!(matches!(
            ledger.remove(ClassId(5)),
            Err(ProgressError::ClassNotHeld(_))
        ));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn fallback_is_first_other_record() {
        let mut ledger = ledger_with(&[1, 2, 3]);
        assert_eq!(ledger.fallback_for(ClassId(1)), Some(ClassId(2)));
        assert_eq!(ledger.fallback_for(ClassId(2)), Some(ClassId(1)));
        ledger.disable(ClassId(2)).unwrap();
        assert_eq!(ledger.fallback_for(ClassId(1)), Some(ClassId(2)));
        assert_eq!(ledger_with(&[4]).fallback_for(ClassId(4)), None);
    }

    #[test]
    fn new_record_experience_clamped() {
        assert_eq!(ClassRecord::new(ClassId(1), -10, true).experience, 0);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Grant(u32, bool),
        Disable(u32),
        Remove(u32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u32..6, any::<bool>()).prop_map(|(c, e)| Op::Grant(c, e)),
            (0u32..6).prop_map(Op::Disable),
            (0u32..6).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn ledger_never_duplicates(ops in proptest::collection::vec(op_strategy(), 0..60)) {
            let mut ledger = ClassLedger::new();
            for op in ops {
                let _ = match op {
                    Op::Grant(c, enabled) => ledger.grant(ClassId(c), 0, enabled).map(|_| ()),
                    Op::Disable(c) => ledger.disable(ClassId(c)),
                    Op::Remove(c) => ledger.remove(ClassId(c)).map(|_| ()),
                };
                let mut seen = std::collections::BTreeSet::new();
                for record in ledger.iter() {
                    prop_assert!(seen.insert(record.class));
                }
            }
        }
    }
}
