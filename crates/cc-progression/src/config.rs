//! Engine configuration, built once at startup and read by every component.

use serde::{Deserialize, Serialize};

/// How a dual-mode base level-up changes parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum DualLevelUp {
    /// Parameters are read from the base class table at the base level.
    #[default]
    Normal,
    /// Parameters accumulate on every base level gained. Experimental.
    StatGain {
        /// Where each level's increment comes from.
        source: StatGainSource,
    },
}

/// Increment source for [`DualLevelUp::StatGain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatGainSource {
    /// The active class's table difference between the old and new level.
    CurrentLevel,
    /// The active class's level-1 value, once per level gained.
    LevelOne,
}

/// The progression mode, fixed for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ProgressionMode {
    /// One experience pool drives the level of whichever class is active.
    Shared {
        /// Keep level and percent-to-next when switching classes instead of
        /// reusing the raw experience number.
        #[serde(default)]
        maintain_level: bool,
    },
    /// Every class keeps its own experience.
    PerClass,
    /// A fixed base class drives level and parameters; the active class,
    /// with its own experience, drives skills.
    Dual {
        /// Parameter behaviour on base level-up.
        #[serde(default)]
        level_up: DualLevelUp,
    },
}

impl Default for ProgressionMode {
    fn default() -> Self {
        Self::Shared {
            maintain_level: false,
        }
    }
}

/// Menu entry settings, carried for hosts that draw the class change menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Whether the class change entry is added to the main menu.
    pub add_entry: bool,
    /// Text of the menu entry.
    pub label: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            add_entry: true,
            label: "Class Change".to_string(),
        }
    }
}

/// Configuration for the progression engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Progression mode.
    pub mode: ProgressionMode,
    /// Keep HP/MP at the same fraction of their maxima across a class swap.
    pub preserve_vital_ratio: bool,
    /// Level cap. Falls back to the database's max level when unset.
    pub level_cap: Option<u32>,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
    /// Menu entry settings.
    pub menu: MenuConfig,
}

impl ProgressionConfig {
    /// Decode a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the progression mode.
    pub fn with_mode(mut self, mode: ProgressionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable or disable HP/MP ratio preservation on class swaps.
    pub fn with_vital_ratio(mut self, preserve: bool) -> Self {
        self.preserve_vital_ratio = preserve;
        self
    }

    /// Set the level cap.
    pub fn with_level_cap(mut self, cap: u32) -> Self {
        self.level_cap = Some(cap);
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Returns true in dual mode.
    pub fn is_dual(&self) -> bool {
        matches!(self.mode, ProgressionMode::Dual { .. })
    }

    /// Returns true in shared mode.
    pub fn is_shared(&self) -> bool {
        matches!(self.mode, ProgressionMode::Shared { .. })
    }

    /// The stat gain source, when dual mode accumulates parameters.
    pub fn stat_gain(&self) -> Option<StatGainSource> {
        match self.mode {
            ProgressionMode::Dual {
                level_up: DualLevelUp::StatGain { source },
            } => Some(source),
            _ => None,
        }
    }
}
