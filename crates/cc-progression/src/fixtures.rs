//! Shared test database.
//!
//! Class curves and their first level thresholds:
//! - 1 Warrior (25, 20, 30, 30): 0, 45, 141, 315, 593, 1000, 1563
//! - 2 Mage (30, 20, 30, 30): 0, 50, 162, 366, 695, 1180, 1852
//! - 3 Paladin (40, 30, 40, 20): 0, 70, 227, 516, 986, 1683, 2654
//! - 4 Sage (30, 20, 30, 30), unlocked at base level 5

use cc_core::{
    ActorDefinition, ActorId, ClassDefinition, ClassId, CurveParams, Database, Learning,
    ParamTable, SkillDefinition, SkillId, SkillTypeId,
};

use crate::config::ProgressionConfig;
use crate::engine::Progression;

pub(crate) const ARTS_TYPE: SkillTypeId = SkillTypeId(1);
pub(crate) const MAGIC_TYPE: SkillTypeId = SkillTypeId(2);

pub(crate) const HAROLD: ActorId = ActorId(1);
pub(crate) const THERESE: ActorId = ActorId(2);
pub(crate) const MARSHA: ActorId = ActorId(3);

pub(crate) const WARRIOR: ClassId = ClassId(1);
pub(crate) const MAGE: ClassId = ClassId(2);
pub(crate) const PALADIN: ClassId = ClassId(3);
pub(crate) const SAGE: ClassId = ClassId(4);

/// Value at level L is `start + step * (L - 1)`.
fn row(start: i64, step: i64) -> Vec<i64> {
    std::iter::once(0)
        .chain((0..99).map(|i| start + step * i))
        .collect()
}

fn class(
    id: ClassId,
    name: &str,
    curve: CurveParams,
    params: [(i64, i64); 3],
    learnings: &[(u32, u32)],
    skill_type: SkillTypeId,
    note: &str,
) -> ClassDefinition {
    let mut class = ClassDefinition::new(id, name);
    class.curve = curve;
    class.params = ParamTable::new(params.iter().map(|&(s, d)| row(s, d)).collect());
    class.learnings = learnings
        .iter()
        .map(|&(level, skill)| Learning {
            level,
            skill: SkillId(skill),
        })
        .collect();
    class.skill_types = vec![skill_type];
    class.note = note.to_string();
    class
}

pub(crate) fn plain_actor() -> ActorDefinition {
    ActorDefinition::new(HAROLD, "Harold", WARRIOR)
}

pub(crate) fn database() -> Database {
    let mut db = Database::new(99);
    db.insert_class(class(
        WARRIOR,
        "Warrior",
        CurveParams::new(25.0, 20.0, 30.0, 30.0),
        [(100, 20), (10, 2), (12, 3)],
        &[(1, 1), (5, 2)],
        ARTS_TYPE,
        "",
    ));
    db.insert_class(class(
        MAGE,
        "Mage",
        CurveParams::default(),
        [(80, 10), (50, 10), (6, 1)],
        &[(1, 3), (3, 4)],
        MAGIC_TYPE,
        "",
    ));
    db.insert_class(class(
        PALADIN,
        "Paladin",
        CurveParams::new(40.0, 30.0, 40.0, 20.0),
        [(150, 30), (20, 5), (14, 4)],
        &[(1, 5)],
        ARTS_TYPE,
        "<LaziLearnableClassAND:|1,5||2,3|>",
    ));
    db.insert_class(class(
        SAGE,
        "Sage",
        CurveParams::default(),
        [(90, 12), (60, 12), (8, 2)],
        &[],
        MAGIC_TYPE,
        "<LaziLearnableClassBase:5>",
    ));

    for (id, name, skill_type) in [
        (1, "Slash", ARTS_TYPE),
        (2, "Cleave", ARTS_TYPE),
        (3, "Fire", MAGIC_TYPE),
        (4, "Ice", MAGIC_TYPE),
        (5, "Smite", ARTS_TYPE),
        (10, "Focus", ARTS_TYPE),
        (20, "Spark", MAGIC_TYPE),
        (21, "Storm", MAGIC_TYPE),
    ] {
        db.insert_skill(SkillDefinition::new(SkillId(id), name, skill_type));
    }

    db.insert_actor(plain_actor());
    db.insert_actor(ActorDefinition::new(THERESE, "Therese", WARRIOR).with_note(
        "<LaziGiveClass: 2>\n<LaziGiveClassDisable: 4>\n\
         <LaziInnateSkill:10,5>\n<LaziInnateSkill:21 ReqSkills:10,3>",
    ));
    db.insert_actor(
        ActorDefinition::new(MARSHA, "Marsha", MAGE)
            .with_note("<LaziGiveClassDefault: 1>\n<LaziInnateSkillBASE:20,3>"),
    );
    db
}

pub(crate) fn engine(config: ProgressionConfig) -> Progression {
    let mut engine = Progression::new(config, database());
    engine.setup_all().unwrap();
    engine.drain_events();
    engine
}
