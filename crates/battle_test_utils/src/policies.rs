//! Attack-decision policies for tests and demo battles.
//!
//! [`FrontlinePolicy`] is the reference behaviour: engage the first
//! exposed enemy the unit can reach, step next to it and strike. The others
//! exercise specific simulator paths.

use std::collections::VecDeque;

use battle_core::army::{Army, Battlefield, UnitHandle};
use battle_core::board::{GridPos, BOARD_HEIGHT};
use battle_core::error::{BattleError, Result};
use battle_core::pathfinding::find_unit_path;
use battle_core::policy::AttackPolicy;
use battle_core::targeting::suitable_targets;
use battle_core::unit::Unit;
use tracing::trace;

/// Number of horizontal bands the board is split into for targeting.
pub const ROWS: usize = 3;

/// Band a cell belongs to, top band first.
#[must_use]
pub fn row_of(pos: GridPos) -> usize {
    let y = pos.y.clamp(0, BOARD_HEIGHT - 1) as usize;
    y * ROWS / BOARD_HEIGHT as usize
}

/// Group the placed units of an army into bands, keeping army order within
/// each band.
#[must_use]
pub fn group_rows(army: &Army) -> [Vec<&Unit>; ROWS] {
    let mut rows: [Vec<&Unit>; ROWS] = std::array::from_fn(|_| Vec::new());
    for unit in army.units() {
        if let Some(pos) = unit.position {
            rows[row_of(pos)].push(unit);
        }
    }
    rows
}

/// Damage `attacker` deals to `target` after percentage bonuses.
///
/// The attacker's bonus against the target's type is added, the target's
/// defence against the attacker's type subtracted.
#[must_use]
pub fn damage_against(attacker: &Unit, target: &Unit) -> u32 {
    let attack = attacker
        .attack_bonuses
        .get(&target.unit_type)
        .copied()
        .unwrap_or(0);
    let defence = target
        .defence_bonuses
        .get(&attacker.unit_type)
        .copied()
        .unwrap_or(0);
    let percent = i64::from(100 + attack - defence).max(0);
    (i64::from(attacker.base_attack) * percent / 100) as u32
}

/// Reference policy: attack the first reachable frontline enemy.
///
/// Candidates are the exposed unit of each band (see
/// [`suitable_targets`]). Candidates this unit cannot damage are skipped,
/// so every reported attack removes health. The unit moves along the path
/// to the cell next to its target before striking. When `stationary` is
/// set it strikes from where it stands and only adjacent targets count.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontlinePolicy {
    /// Never leave the current cell.
    pub stationary: bool,
}

impl FrontlinePolicy {
    /// A policy that only attacks adjacent enemies.
    #[must_use]
    pub const fn stationary() -> Self {
        Self { stationary: true }
    }
}

impl AttackPolicy for FrontlinePolicy {
    fn decide_attack(
        &mut self,
        attacker: UnitHandle,
        field: &mut Battlefield<'_>,
    ) -> Result<Option<UnitHandle>> {
        let Some(me) = field.unit(attacker) else {
            return Ok(None);
        };
        let enemy = attacker.side.opponent();

        let choice = {
            let rows = group_rows(field.army(enemy));
            let candidates = suitable_targets(&rows, enemy.flank());
            let everyone: Vec<&Unit> = field.units().map(|(_, unit)| unit).collect();

            candidates.into_iter().find_map(|target| {
                let damage = damage_against(me, target);
                if damage == 0 {
                    return None;
                }
                let path = find_unit_path(me, target, everyone.iter().copied());
                let usable = if self.stationary {
                    path.len() == 2
                } else {
                    !path.is_empty()
                };
                if !usable {
                    return None;
                }
                let handle = field.handle_of(target)?;
                let step = path.len().checked_sub(2).and_then(|i| path.get(i).copied());
                Some((handle, step, damage))
            })
        };

        let Some((target, step, damage)) = choice else {
            trace!(unit = %attacker, "No reachable target");
            return Ok(None);
        };

        if let Some(unit) = field.unit_mut(attacker) {
            unit.position = step.or(unit.position);
        }
        if let Some(unit) = field.unit_mut(target) {
            unit.take_damage(damage);
        }
        Ok(Some(target))
    }
}

/// Never attacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverAttack;

impl AttackPolicy for NeverAttack {
    fn decide_attack(&mut self, _: UnitHandle, _: &mut Battlefield<'_>) -> Result<Option<UnitHandle>> {
        Ok(None)
    }
}

/// Fails every turn with the given message.
#[derive(Debug, Clone)]
pub struct FailingPolicy {
    /// Message carried by the error.
    pub message: String,
}

impl FailingPolicy {
    /// Create a failing policy.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl AttackPolicy for FailingPolicy {
    fn decide_attack(&mut self, attacker: UnitHandle, _: &mut Battlefield<'_>) -> Result<Option<UnitHandle>> {
        Err(BattleError::policy(attacker, self.message.clone()))
    }
}

/// Plays back a fixed list of decisions, one per turn, then stops attacking.
///
/// A scripted target that exists takes the attacker's base attack as
/// damage. Handles are returned as scripted, existing or not.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPolicy {
    script: VecDeque<Option<UnitHandle>>,
}

impl ScriptedPolicy {
    /// Create a policy from its decisions.
    pub fn new(script: impl IntoIterator<Item = Option<UnitHandle>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Decisions not yet played.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl AttackPolicy for ScriptedPolicy {
    fn decide_attack(
        &mut self,
        attacker: UnitHandle,
        field: &mut Battlefield<'_>,
    ) -> Result<Option<UnitHandle>> {
        let Some(target) = self.script.pop_front().flatten() else {
            return Ok(None);
        };
        let damage = field.unit(attacker).map_or(0, |u| u.base_attack);
        if let Some(unit) = field.unit_mut(target) {
            unit.take_damage(damage);
        }
        Ok(Some(target))
    }
}
