//! Error types for the battle core.

use thiserror::Error;

use crate::army::UnitHandle;

/// Result type alias using [`BattleError`].
pub type Result<T> = std::result::Result<T, BattleError>;

/// Top-level error type for the battle core.
///
/// Expected edge cases (empty catalogs, zero budgets, unreachable cells)
/// never produce one of these; they degrade to empty results instead.
#[derive(Debug, Error)]
pub enum BattleError {
    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path (or label) of the document that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Battle configuration could not be parsed.
    #[error("Invalid battle configuration: {0}")]
    ConfigError(String),

    /// A catalog entry failed validation.
    #[error("Invalid unit template '{name}': {reason}")]
    InvalidTemplate {
        /// Template name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// No route between two cells.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// An attack-decision policy failed while resolving a unit's turn.
    #[error("Attack policy of {unit} failed: {message}")]
    PolicyFailed {
        /// Unit whose policy failed.
        unit: UnitHandle,
        /// Error message reported by the policy.
        message: String,
    },

    /// A policy returned a target that does not exist on the battlefield.
    #[error("Attack policy of {attacker} returned unknown target {target}")]
    InvalidTarget {
        /// Unit whose policy produced the target.
        attacker: UnitHandle,
        /// The handle that could not be resolved.
        target: UnitHandle,
    },
}

impl BattleError {
    /// Convenience constructor for policy implementations.
    pub fn policy(unit: UnitHandle, message: impl Into<String>) -> Self {
        Self::PolicyFailed {
            unit,
            message: message.into(),
        }
    }
}
