//! # Battle Core
//!
//! Deterministic army composition and battle simulation on a fixed grid.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No system randomness
//! - No floating-point math (uses fixed-point)
//!
//! ## Crate Structure
//!
//! - [`board`] - Grid geometry and deployment zones
//! - [`unit`] - Unit templates and battle instances
//! - [`army`] - Armies, unit handles and the battlefield view
//! - [`composer`] - Budgeted army composition and placement
//! - [`targeting`] - Target selection helpers
//! - [`pathfinding`] - A* over the battle grid
//! - [`policy`] - Attack-decision policies
//! - [`simulation`] - Round-based battle loop
//! - [`data`] - RON unit catalogs
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod army;
pub mod board;
pub mod composer;
pub mod config;
pub mod data;
pub mod error;
pub mod math;
pub mod pathfinding;
pub mod policy;
pub mod simulation;
pub mod targeting;
pub mod unit;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::army::{Army, Battlefield, Side, UnitHandle};
    pub use crate::board::{DeploymentZone, Flank, GridPos, BOARD_HEIGHT, BOARD_WIDTH};
    pub use crate::composer::{compose_army, place_in_zone, ArmyComposer};
    pub use crate::config::{BattleConfig, ComposerConfig, SimulationConfig};
    pub use crate::data::UnitCatalog;
    pub use crate::error::{BattleError, Result};
    pub use crate::math::Fixed;
    pub use crate::pathfinding::{find_path, find_unit_path, NavGrid};
    pub use crate::policy::AttackPolicy;
    pub use crate::simulation::{
        AttackRecord, BattleLog, BattleOutcome, BattleReport, BattleSimulator, TracingBattleLog,
    };
    pub use crate::targeting::{frontmost, suitable_targets};
    pub use crate::unit::{AttackType, Unit, UnitTemplate};
}
