//! Tunable settings for composition and simulation.
//!
//! Loaded from RON; every field has a default so partial documents work.
//!
//! ```ron
//! BattleConfig(
//!     composer: ComposerConfig(max_per_type: 11),
//!     simulation: SimulationConfig(max_rounds: Some(500)),
//! )
//! ```

use serde::{Deserialize, Serialize};

use crate::board::DeploymentZone;
use crate::error::{BattleError, Result};

/// Maximum instances of one unit type in a composed army.
pub const MAX_PER_TYPE: u32 = 11;

/// Army composition settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Cap on instances sharing a type label.
    pub max_per_type: u32,
    /// Cells composed units are placed into.
    pub zone: DeploymentZone,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            max_per_type: MAX_PER_TYPE,
            zone: DeploymentZone::LEFT,
        }
    }
}

/// Battle simulation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Stop after this many rounds. `None` runs until a side stops acting.
    pub max_rounds: Option<u32>,
}

/// Top-level configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Composition settings.
    pub composer: ComposerConfig,
    /// Simulation settings.
    pub simulation: SimulationConfig,
}

impl BattleConfig {
    /// Parse a configuration from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        ron::from_str(ron).map_err(|e| BattleError::ConfigError(e.to_string()))
    }
}
