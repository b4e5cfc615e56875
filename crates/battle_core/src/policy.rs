//! Per-unit attack-decision capability.
//!
//! Each unit may carry a policy that decides what it does on its turn. The
//! simulator calls it and only observes the outcome: a target, or nothing.
//! Damage and any other state change are the policy's own side effects,
//! applied through the [`Battlefield`].

use crate::army::{Battlefield, UnitHandle};
use crate::error::Result;

/// Decides a unit's attack for one turn.
pub trait AttackPolicy {
    /// Resolve the turn of `attacker`.
    ///
    /// Returns the unit that was attacked, or `None` when the unit found no
    /// target or chose not to act. An error aborts the whole battle.
    fn decide_attack(
        &mut self,
        attacker: UnitHandle,
        field: &mut Battlefield<'_>,
    ) -> Result<Option<UnitHandle>>;
}

impl<F> AttackPolicy for F
where
    F: FnMut(UnitHandle, &mut Battlefield<'_>) -> Result<Option<UnitHandle>>,
{
    fn decide_attack(
        &mut self,
        attacker: UnitHandle,
        field: &mut Battlefield<'_>,
    ) -> Result<Option<UnitHandle>> {
        self(attacker, field)
    }
}
