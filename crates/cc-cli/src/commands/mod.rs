pub mod check;
pub mod curve;
pub mod level;
pub mod run;

use std::fs;
use std::path::Path;

use cc_core::{ClassDefinition, ClassId, Database};

/// Read and decode a database file.
fn load_database(path: &Path) -> Result<Database, String> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {e}", path.display()))?;
    Database::from_json(&json).map_err(|e| format!("invalid database '{}': {e}", path.display()))
}

/// Look up a class by raw id.
fn find_class(db: &Database, id: u32) -> Result<&ClassDefinition, String> {
    db.class(ClassId(id)).map_err(|e| e.to_string())
}

/// Display label for a class id: its name when known.
fn class_label(db: &Database, id: ClassId) -> String {
    match db.class(id) {
        Ok(class) => class.name.clone(),
        Err(_) => id.to_string(),
    }
}
