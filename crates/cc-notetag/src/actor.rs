//! Actor annotations: starting class grants, the dual-mode base class, and
//! innate skill rules.

use cc_core::{ClassId, SkillId, UnlockCondition, UnlockRule};

use crate::scan::{
    NoteWarning, RawTag, parse_id_list, parse_pair, parse_threshold_groups, scan_tags,
    split_leading_id,
};

/// Everything an actor's note declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorNotes {
    /// Classes granted enabled at game start, in note order.
    pub grants: Vec<ClassId>,
    /// Classes granted disabled at game start, in note order.
    pub disabled_grants: Vec<ClassId>,
    /// The dual-mode base class, if declared.
    pub default_class: Option<ClassId>,
    /// Innate skill rules, in note order.
    pub innate_skills: Vec<UnlockRule>,
    /// Problems found while reading the note.
    pub warnings: Vec<NoteWarning>,
}

/// Read an actor's note text.
///
/// ```
/// use cc_core::{ClassId, SkillId};
/// use cc_notetag::parse_actor_note;
///
/// let notes = parse_actor_note("<LaziGiveClass: 2,3>\n<LaziInnateSkill:7,10>");
/// assert_eq!(notes.grants, vec![ClassId(2), ClassId(3)]);
/// assert_eq!(notes.innate_skills.len(), 1);
/// ```
pub fn parse_actor_note(note: &str) -> ActorNotes {
    let mut notes = ActorNotes::default();
    for tag in scan_tags(note) {
        match tag.name.as_str() {
            "giveclass" => {
                let ids = parse_id_list(&tag, &tag.value, &mut notes.warnings);
                notes.grants.extend(ids.into_iter().map(ClassId));
            }
            "giveclassdisable" => {
                let ids = parse_id_list(&tag, &tag.value, &mut notes.warnings);
                notes.disabled_grants.extend(ids.into_iter().map(ClassId));
            }
            "giveclassdefault" => read_default(&tag, &mut notes),
            "innateskill" => {
                if let Some(rule) = read_innate(&tag, &mut notes.warnings) {
                    notes.innate_skills.push(rule);
                }
            }
            "innateskillbase" => match parse_pair(&tag.value) {
                Some((skill, level)) => notes.innate_skills.push(UnlockRule::skill(
                    SkillId(skill),
                    UnlockCondition::base_level(level),
                )),
                None => notes
                    .warnings
                    .push(NoteWarning::new(&tag.source, "expected skill,level")),
            },
            _ => {}
        }
    }
    notes
}

fn read_default(tag: &RawTag, notes: &mut ActorNotes) {
    let Ok(id) = tag.value.trim().parse() else {
        notes
            .warnings
            .push(NoteWarning::new(&tag.source, "expected a class id"));
        return;
    };
    if notes.default_class.is_some() {
        notes.warnings.push(NoteWarning::new(
            &tag.source,
            "base class already declared, ignoring",
        ));
        return;
    }
    notes.default_class = Some(ClassId(id));
}

/// `S,L` | `S ReqSkills:a,b` | `S ReqANDClass:|c,l|...` | `S ReqORClass:|c,l|...`
fn read_innate(tag: &RawTag, warnings: &mut Vec<NoteWarning>) -> Option<UnlockRule> {
    let Some((skill, rest)) = split_leading_id(&tag.value) else {
        warnings.push(NoteWarning::new(&tag.source, "expected a skill id"));
        return None;
    };
    let skill = SkillId(skill);
    let compact: String = rest.chars().filter(|c| !c.is_whitespace()).collect();
    let lower = compact.to_lowercase();

    if let Some(level) = lower.strip_prefix(',') {
        return match level.parse() {
            Ok(level) => Some(UnlockRule::skill(skill, UnlockCondition::active_level(level))),
            Err(_) => {
                warnings.push(NoteWarning::new(&tag.source, "expected skill,level"));
                None
            }
        };
    }
    if let Some(list) = lower.strip_prefix("reqskills:") {
        let ids = parse_id_list(tag, list, warnings);
        if ids.is_empty() {
            warnings.push(NoteWarning::new(
                &tag.source,
                "no required skills listed, rule can never unlock",
            ));
        }
        return Some(UnlockRule::skill(
            skill,
            UnlockCondition::skills(ids.into_iter().map(SkillId)),
        ));
    }
    if let Some(groups) = lower.strip_prefix("reqandclass:") {
        let thresholds = parse_threshold_groups(tag, groups, warnings);
        warn_if_empty(tag, thresholds.is_empty(), warnings);
        return Some(UnlockRule::skill(skill, UnlockCondition::all_of(thresholds)));
    }
    if let Some(groups) = lower.strip_prefix("reqorclass:") {
        let thresholds = parse_threshold_groups(tag, groups, warnings);
        warn_if_empty(tag, thresholds.is_empty(), warnings);
        return Some(UnlockRule::skill(skill, UnlockCondition::any_of(thresholds)));
    }

    warnings.push(NoteWarning::new(
        &tag.source,
        format!("unrecognised innate skill requirement '{rest}'"),
    ));
    None
}

pub(crate) fn warn_if_empty(tag: &RawTag, empty: bool, warnings: &mut Vec<NoteWarning>) {
    if empty {
        warnings.push(NoteWarning::new(
            &tag.source,
            "no valid class,level pairs, rule can never unlock",
        ));
    }
}
