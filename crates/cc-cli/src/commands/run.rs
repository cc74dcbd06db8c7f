use std::fs;
use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use serde::Deserialize;

use cc_core::{ActorId, ClassId, Database};
use cc_progression::{
    ClassAction, MenuAccess, Progression, ProgressionConfig, ProgressEvent, ProgressEventKind,
    ProgressResult,
};

/// A scripted sequence of host commands.
#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(default)]
    config: ProgressionConfig,
    /// Actors to set up, in order. Every actor when absent.
    #[serde(default)]
    actors: Option<Vec<ActorId>>,
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Step {
    GainExp {
        actor: ActorId,
        amount: i64,
    },
    GainBaseExp {
        actor: ActorId,
        amount: i64,
    },
    SetExp {
        actor: ActorId,
        class: ClassId,
        amount: i64,
    },
    ChangeClass {
        actor: ActorId,
        class: ClassId,
    },
    ModifyClasses {
        actor: ActorId,
        class: ClassId,
        action: ClassAction,
    },
    MenuAccess {
        access: MenuAccess,
    },
}

impl Step {
    fn apply(&self, engine: &mut Progression) -> ProgressResult<()> {
        match *self {
            Step::GainExp { actor, amount } => engine.gain_experience(actor, amount),
            Step::GainBaseExp { actor, amount } => engine.gain_base_experience(actor, amount),
            Step::SetExp {
                actor,
                class,
                amount,
            } => engine.set_experience(actor, class, amount),
            Step::ChangeClass { actor, class } => engine.change_class(actor, class),
            Step::ModifyClasses {
                actor,
                class,
                action,
            } => engine.modify_classes(actor, class, action),
            Step::MenuAccess { access } => {
                engine.set_menu_access(access);
                Ok(())
            }
        }
    }

    fn describe(&self, db: &Database) -> String {
        match *self {
            Step::GainExp { actor, amount } => {
                format!("{} gains {amount} exp", actor_name(db, actor))
            }
            Step::GainBaseExp { actor, amount } => {
                format!("{} gains {amount} base exp", actor_name(db, actor))
            }
            Step::SetExp {
                actor,
                class,
                amount,
            } => format!(
                "{} sets {} exp to {amount}",
                actor_name(db, actor),
                super::class_label(db, class)
            ),
            Step::ChangeClass { actor, class } => format!(
                "{} changes to {}",
                actor_name(db, actor),
                super::class_label(db, class)
            ),
            Step::ModifyClasses {
                actor,
                class,
                action,
            } => format!(
                "{} {:?} {}",
                actor_name(db, actor),
                action,
                super::class_label(db, class)
            ),
            Step::MenuAccess { access } => format!("menu access {access:?}"),
        }
    }
}

pub fn run(db_path: &Path, scenario_path: &Path, save: Option<&Path>) -> Result<(), String> {
    let db = super::load_database(db_path)?;
    let json = fs::read_to_string(scenario_path)
        .map_err(|e| format!("cannot read '{}': {e}", scenario_path.display()))?;
    let scenario: Scenario = serde_json::from_str(&json)
        .map_err(|e| format!("invalid scenario '{}': {e}", scenario_path.display()))?;

    let mut engine = Progression::new(scenario.config, db);
    match &scenario.actors {
        Some(actors) => {
            for &actor in actors {
                engine
                    .setup_actor(actor)
                    .map_err(|e| format!("setup failed: {e}"))?;
            }
        }
        None => engine
            .setup_all()
            .map_err(|e| format!("setup failed: {e}"))?,
    }
    let events = engine.drain_events();
    print_events(engine.database(), &events);

    for (index, step) in scenario.steps.iter().enumerate() {
        let label = format!("[step {:>2}]", index + 1).dimmed();
        println!("  {label} {}", step.describe(engine.database()));
        match step.apply(&mut engine) {
            Ok(()) => {}
            Err(e) if e.is_invalid_operation() => {
                println!("  {}  {e}", "IGNORED".yellow().bold());
            }
            Err(e) => return Err(format!("step {} failed: {e}", index + 1)),
        }
        let events = engine.drain_events();
        print_events(engine.database(), &events);
    }

    println!();
    print_summary(&engine)?;

    if let Some(path) = save {
        let json = serde_json::to_string_pretty(&engine.save_state())
            .map_err(|e| format!("cannot encode save state: {e}"))?;
        fs::write(path, json).map_err(|e| format!("cannot write '{}': {e}", path.display()))?;
        println!("  Save state written to {}", path.display());
    }

    Ok(())
}

fn actor_name(db: &Database, actor: ActorId) -> String {
    match db.actor(actor) {
        Ok(definition) => definition.name.clone(),
        Err(_) => actor.to_string(),
    }
}

fn print_events(db: &Database, events: &[ProgressEvent]) {
    for event in events {
        let line = match &event.kind {
            ProgressEventKind::LevelUp {
                actor,
                class,
                from,
                to,
            } => format!(
                "{} {} {} level {from} -> {to}",
                "LEVEL".green().bold(),
                actor_name(db, *actor),
                super::class_label(db, *class)
            ),
            ProgressEventKind::BaseLevelUp { actor, from, to, .. } => format!(
                "{} {} base level {from} -> {to}",
                "LEVEL".green().bold(),
                actor_name(db, *actor)
            ),
            ProgressEventKind::SkillLearned { actor, skill } => {
                let name = db
                    .skill(*skill)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|_| skill.to_string());
                format!("{} {} learned {name}", "SKILL".cyan().bold(), actor_name(db, *actor))
            }
            ProgressEventKind::ClassUnlocked { actor, class } => format!(
                "{} {} unlocked {}",
                "CLASS".magenta().bold(),
                actor_name(db, *actor),
                super::class_label(db, *class)
            ),
            ProgressEventKind::ClassSwapped {
                actor,
                from,
                to,
                level,
            } => format!(
                "{} {} {} -> {} (level {level})",
                "SWAP".blue().bold(),
                actor_name(db, *actor),
                super::class_label(db, *from),
                super::class_label(db, *to)
            ),
            ProgressEventKind::ClassGranted { actor, class } => format!(
                "{} {} gained {}",
                "CLASS".magenta().bold(),
                actor_name(db, *actor),
                super::class_label(db, *class)
            ),
            ProgressEventKind::ClassDisabled { actor, class } => format!(
                "{} {} disabled {}",
                "CLASS".magenta().bold(),
                actor_name(db, *actor),
                super::class_label(db, *class)
            ),
            ProgressEventKind::ClassRevoked { actor, class } => format!(
                "{} {} lost {}",
                "CLASS".magenta().bold(),
                actor_name(db, *actor),
                super::class_label(db, *class)
            ),
        };
        println!("    {line}");
    }
}

fn print_summary(engine: &Progression) -> Result<(), String> {
    let db = engine.database();
    println!("  {}", "Actors".bold().underline());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Actor", "Active", "Level", "Base", "HP", "MP", "Classes", "Skills"]);

    for progress in engine.actors() {
        let actor = progress.actor;
        let level = engine.current_level(actor).map_err(|e| e.to_string())?;
        let base_level = engine.base_level(actor).map_err(|e| e.to_string())?;
        let base = match (progress.base_class(), base_level) {
            (Some(class), Some(level)) => format!("{} {level}", super::class_label(db, class)),
            _ => "-".to_string(),
        };
        let max_hp = engine.max_hp(actor).map_err(|e| e.to_string())?;
        let max_mp = engine.max_mp(actor).map_err(|e| e.to_string())?;

        let mut classes = Vec::new();
        for record in progress.ledger.iter() {
            let level = engine
                .level_of(actor, record.class)
                .map_err(|e| e.to_string())?
                .map_or_else(|| "?".to_string(), |l| l.to_string());
            let mut entry = format!("{} L{level}", super::class_label(db, record.class));
            if !record.enabled {
                entry.push_str(" (disabled)");
            }
            classes.push(entry);
        }

        let skills: Vec<String> = progress
            .known_skills()
            .into_iter()
            .map(|s| db.skill(s).map(|d| d.name.clone()).unwrap_or_else(|_| s.to_string()))
            .collect();

        table.add_row(vec![
            actor_name(db, actor),
            super::class_label(db, progress.active),
            level.to_string(),
            base,
            format!("{}/{max_hp}", progress.hp),
            format!("{}/{max_mp}", progress.mp),
            classes.join(", "),
            skills.join(", "),
        ]);
    }

    println!("{table}");
    println!();
    println!("  Menu access: {:?}", engine.menu_access());
    match engine.menu_entry() {
        Some(entry) if entry.selectable => println!("  Menu entry: {}", entry.label),
        Some(entry) => println!("  Menu entry: {} (not selectable)", entry.label),
        None => println!("  Menu entry: -"),
    }
    Ok(())
}
