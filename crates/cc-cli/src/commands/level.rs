use std::path::Path;

use cc_progression::curve::{experience_to_next, level_for_experience, progress_to_next};

pub fn run(db_path: &Path, class: u32, exp: i64) -> Result<(), String> {
    let db = super::load_database(db_path)?;
    let class = super::find_class(&db, class)?;
    let cap = db.max_level();

    let level = level_for_experience(&class.curve, exp, cap);
    println!("  {} with {exp} exp: level {level}", class.name);
    match experience_to_next(&class.curve, exp, cap) {
        Some(needed) => {
            let percent = progress_to_next(&class.curve, exp, cap) * 100.0;
            println!("  {needed} exp to level {} ({percent:.1}% there)", level + 1);
        }
        None => println!("  max level"),
    }
    Ok(())
}
