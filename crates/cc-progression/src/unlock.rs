//! Unlock orchestrator: moves satisfied rules from pending to granted.
//!
//! A pass runs in two phases. Level and class-threshold rules are evaluated
//! together against one snapshot and committed as a batch. Skill-set rules
//! then run in order against a refreshed snapshot, so they see every skill
//! granted earlier in the same pass. A pass never starts another pass.

use cc_core::{UnlockRule, UnlockTarget};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::actor::ActorProgress;
use crate::error::ProgressError;
use crate::event::{EventLog, ProgressEventKind};
use crate::policy::Policy;
use crate::prerequisite::evaluate;

/// Pending and granted unlock rules for one actor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnlockBook {
    pending: Vec<UnlockRule>,
    granted: Vec<UnlockRule>,
}

impl UnlockBook {
    /// A book with every rule pending. Duplicate rules are kept once.
    pub fn new(rules: impl IntoIterator<Item = UnlockRule>) -> Self {
        let mut pending: Vec<UnlockRule> = Vec::new();
        for rule in rules {
            if !pending.contains(&rule) {
                pending.push(rule);
            }
        }
        Self {
            pending,
            granted: Vec::new(),
        }
    }

    /// Rules not yet satisfied.
    pub fn pending(&self) -> &[UnlockRule] {
        &self.pending
    }

    /// Rules already committed. They are never evaluated again.
    pub fn granted(&self) -> &[UnlockRule] {
        &self.granted
    }

    /// Returns true if `rule` has been committed.
    pub fn is_granted(&self, rule: &UnlockRule) -> bool {
        self.granted.contains(rule)
    }
}

/// Run one unlock pass for `progress`. Returns the number of rules committed.
pub(crate) fn run_pass(
    policy: &Policy,
    progress: &mut ActorProgress,
    events: &mut EventLog,
) -> usize {
    let pending = std::mem::take(&mut progress.unlocks.pending);
    let (skill_rules, level_rules): (Vec<_>, Vec<_>) = pending
        .into_iter()
        .partition(|rule| rule.condition.depends_on_skills());

    let snapshot = policy.snapshot(progress);
    let (ready, mut still_pending): (Vec<_>, Vec<_>) = level_rules
        .into_iter()
        .partition(|rule| evaluate(&rule.condition, &snapshot));
    let mut committed = 0;
    for rule in ready {
        commit(policy, progress, &rule, events);
        progress.unlocks.granted.push(rule);
        committed += 1;
    }

    let mut snapshot = policy.snapshot(progress);
    for rule in skill_rules {
        if evaluate(&rule.condition, &snapshot) {
            commit(policy, progress, &rule, events);
            progress.unlocks.granted.push(rule);
            committed += 1;
            snapshot = policy.snapshot(progress);
        } else {
            still_pending.push(rule);
        }
    }

    progress.unlocks.pending = still_pending;
    if committed > 0 {
        debug!(actor = %progress.actor, committed, "unlock pass");
    }
    committed
}

fn commit(
    policy: &Policy,
    progress: &mut ActorProgress,
    rule: &UnlockRule,
    events: &mut EventLog,
) {
    let actor = progress.actor;
    match rule.target {
        UnlockTarget::Skill(skill) => {
            let Ok(definition) = policy.database().skill(skill) else {
                warn!(%actor, %skill, "unlock rule names an unknown skill; retired without learning");
                return;
            };
            if progress.innate_skills.insert(skill) {
                progress.innate_skill_types.insert(definition.skill_type);
                info!(%actor, %skill, "skill learned");
                events.push(ProgressEventKind::SkillLearned { actor, skill });
            } else {
                debug!(%actor, %skill, "skill already learned");
            }
        }
        UnlockTarget::Class(class) => match progress.ledger.grant(class, 0, true) {
            Ok(_) => {
                info!(%actor, %class, "class unlocked");
                events.push(ProgressEventKind::ClassUnlocked { actor, class });
            }
            Err(ProgressError::AlreadyEnabled(_)) => {
                warn!(%actor, %class, "unlocked class is already enabled");
            }
            Err(err) => {
                warn!(%actor, %class, error = %err, "class unlock failed");
            }
        },
    }
}
