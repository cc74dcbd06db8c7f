use serde::{Deserialize, Serialize};

use crate::id::{ClassId, SkillId, SkillTypeId};

/// The four coefficients that shape a class's experience curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveParams {
    /// Base experience scale.
    pub basis: f64,
    /// Flat experience added per level.
    pub extra: f64,
    /// Exponent acceleration.
    pub acceleration_a: f64,
    /// Denominator acceleration.
    pub acceleration_b: f64,
}

impl CurveParams {
    /// Create a curve from its four coefficients.
    pub fn new(basis: f64, extra: f64, acceleration_a: f64, acceleration_b: f64) -> Self {
        Self {
            basis,
            extra,
            acceleration_a,
            acceleration_b,
        }
    }

    /// Returns true if every coefficient is finite and strictly positive.
    pub fn is_well_formed(&self) -> bool {
        [self.basis, self.extra, self.acceleration_a, self.acceleration_b]
            .iter()
            .all(|c| c.is_finite() && *c > 0.0)
    }
}

impl Default for CurveParams {
    fn default() -> Self {
        Self::new(30.0, 20.0, 30.0, 30.0)
    }
}

/// Per-parameter, per-level base values for a class.
///
/// Row 0 is max HP, row 1 max MP, the rest are combat stats. Each row is
/// indexed by level; index 0 is unused by convention. Reading past the end
/// of a row yields the row's last value, and an absent row yields 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamTable {
    rows: Vec<Vec<i64>>,
}

impl ParamTable {
    /// Row index of max HP.
    pub const MAX_HP: usize = 0;
    /// Row index of max MP.
    pub const MAX_MP: usize = 1;

    /// Build a table from raw rows.
    pub fn new(rows: Vec<Vec<i64>>) -> Self {
        Self { rows }
    }

    /// Base value of `param` at `level`.
    pub fn value(&self, param: usize, level: u32) -> i64 {
        let Some(row) = self.rows.get(param) else {
            return 0;
        };
        row.get(level as usize)
            .or_else(|| row.last())
            .copied()
            .unwrap_or(0)
    }

    /// Number of parameter rows.
    pub fn param_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A skill a class teaches once its level reaches `level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Learning {
    /// Level at which the skill is learned.
    pub level: u32,
    /// The skill learned.
    pub skill: SkillId,
}

/// A class as authored in the game database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDefinition {
    /// Class id.
    pub id: ClassId,
    /// Display name.
    pub name: String,
    /// Experience curve coefficients.
    #[serde(default)]
    pub curve: CurveParams,
    /// Base parameter values by level.
    #[serde(default)]
    pub params: ParamTable,
    /// Skills taught by this class, by level.
    #[serde(default)]
    pub learnings: Vec<Learning>,
    /// Skill types this class grants access to.
    #[serde(default)]
    pub skill_types: Vec<SkillTypeId>,
    /// Free-form annotation text.
    #[serde(default)]
    pub note: String,
}

impl ClassDefinition {
    /// Create a class with the default curve and no parameters or learnings.
    pub fn new(id: ClassId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            curve: CurveParams::default(),
            params: ParamTable::default(),
            learnings: Vec::new(),
            skill_types: Vec::new(),
            note: String::new(),
        }
    }

    /// Skills taught at or below `level`, in authoring order.
    pub fn skills_up_to(&self, level: u32) -> impl Iterator<Item = SkillId> + '_ {
        self.learnings
            .iter()
            .filter(move |l| l.level <= level)
            .map(|l| l.skill)
    }
}
