//! Class annotations: conditions under which an actor learns the class.

use cc_core::{ClassId, UnlockCondition, UnlockRule};

use crate::actor::warn_if_empty;
use crate::scan::{NoteWarning, parse_threshold_groups, scan_tags};

/// Everything a class's note declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassNotes {
    /// Rules that unlock the annotated class, in note order.
    pub learn_rules: Vec<UnlockRule>,
    /// Problems found while reading the note.
    pub warnings: Vec<NoteWarning>,
}

/// Read the note of class `class`.
pub fn parse_class_note(class: ClassId, note: &str) -> ClassNotes {
    let mut notes = ClassNotes::default();
    for tag in scan_tags(note) {
        let condition = match tag.name.as_str() {
            "learnableclass" | "learnableclassbase" => {
                let Ok(level) = tag.value.trim().parse() else {
                    notes
                        .warnings
                        .push(NoteWarning::new(&tag.source, "expected a level"));
                    continue;
                };
                if tag.name == "learnableclass" {
                    UnlockCondition::active_level(level)
                } else {
                    UnlockCondition::base_level(level)
                }
            }
            "learnableclassand" | "learnableclassor" => {
                let thresholds = parse_threshold_groups(&tag, &tag.value, &mut notes.warnings);
                warn_if_empty(&tag, thresholds.is_empty(), &mut notes.warnings);
                if tag.name == "learnableclassand" {
                    UnlockCondition::all_of(thresholds)
                } else {
                    UnlockCondition::any_of(thresholds)
                }
            }
            _ => continue,
        };
        notes.learn_rules.push(UnlockRule::class(class, condition));
    }
    notes
}
