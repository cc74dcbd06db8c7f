use std::path::Path;

use colored::Colorize;

use cc_core::{Database, UnlockCondition, UnlockRule, UnlockTarget, ValidationIssue};
use cc_notetag::{parse_actor_note, parse_class_note};

pub fn run(db_path: &Path) -> Result<(), String> {
    let db = super::load_database(db_path)?;

    let mut issues = db.validate();
    issues.extend(check_notes(&db));

    for issue in &issues {
        let level = if issue.is_error {
            "error".red().bold()
        } else {
            "warning".yellow().bold()
        };
        eprintln!("  {level}: {}: {}", issue.entity, issue.message);
    }

    let errors = issues.iter().filter(|i| i.is_error).count();
    let warnings = issues.len() - errors;
    if errors > 0 {
        return Err(format!(
            "check failed with {errors} error(s) and {warnings} warning(s)"
        ));
    }

    println!("  All checks passed.");
    println!(
        "  {} classes, {} skills, {} actors, {} warning(s)",
        db.classes().count(),
        db.skills().count(),
        db.actors().count(),
        warnings
    );
    Ok(())
}

/// Decode every annotation and report malformed tags and dangling ids.
fn check_notes(db: &Database) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for class in db.classes() {
        let label = format!("{} '{}'", class.id, class.name);
        let notes = parse_class_note(class.id, &class.note);
        for warning in &notes.warnings {
            issues.push(ValidationIssue::warning(&label, warning.to_string()));
        }
        for rule in &notes.learn_rules {
            check_rule(db, &label, rule, &mut issues);
        }
    }

    for actor in db.actors() {
        let label = format!("{} '{}'", actor.id, actor.name);
        let notes = parse_actor_note(&actor.note);
        for warning in &notes.warnings {
            issues.push(ValidationIssue::warning(&label, warning.to_string()));
        }
        let granted = notes
            .grants
            .iter()
            .chain(&notes.disabled_grants)
            .chain(&notes.default_class);
        for &class in granted {
            if db.class(class).is_err() {
                issues.push(ValidationIssue::warning(
                    &label,
                    format!("annotation grants unknown {class}"),
                ));
            }
        }
        for rule in &notes.innate_skills {
            check_rule(db, &label, rule, &mut issues);
        }
    }

    issues
}

fn check_rule(db: &Database, label: &str, rule: &UnlockRule, issues: &mut Vec<ValidationIssue>) {
    let unknown_target = match rule.target {
        UnlockTarget::Skill(skill) => db.skill(skill).is_err().then_some(skill),
        UnlockTarget::Class(_) => None,
    };
    if let Some(skill) = unknown_target {
        issues.push(ValidationIssue::warning(
            label,
            format!("unlock rule teaches unknown {skill}"),
        ));
    }
    match &rule.condition {
        UnlockCondition::SkillSet { required } => {
            for &skill in required {
                if db.skill(skill).is_err() {
                    issues.push(ValidationIssue::warning(
                        label,
                        format!("'{rule}' requires unknown {skill}"),
                    ));
                }
            }
        }
        UnlockCondition::ClassThresholds { thresholds, .. } => {
            for threshold in thresholds {
                if db.class(threshold.class).is_err() {
                    issues.push(ValidationIssue::warning(
                        label,
                        format!("'{rule}' requires unknown {}", threshold.class),
                    ));
                }
            }
        }
        UnlockCondition::Level { .. } => {}
    }
}
