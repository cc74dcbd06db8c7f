use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use cc_progression::curve::experience_for_level;

pub fn run(db_path: &Path, class: u32, to: Option<u32>) -> Result<(), String> {
    let db = super::load_database(db_path)?;
    let class = super::find_class(&db, class)?;
    let last = to.unwrap_or(db.max_level()).clamp(1, db.max_level().max(1));

    println!(
        "  {} {} {}",
        "Curve".bold(),
        class.name,
        format!(
            "(basis={}, extra={}, a={}, b={})",
            class.curve.basis,
            class.curve.extra,
            class.curve.acceleration_a,
            class.curve.acceleration_b
        )
        .dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Level", "Total Exp", "To Next"]);

    for level in 1..=last {
        let total = experience_for_level(&class.curve, level);
        let to_next = if level < db.max_level() {
            (experience_for_level(&class.curve, level + 1) - total).to_string()
        } else {
            "-".to_string()
        };
        table.add_row(vec![level.to_string(), total.to_string(), to_next]);
    }

    println!("{table}");
    Ok(())
}
