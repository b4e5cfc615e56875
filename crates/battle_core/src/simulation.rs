//! Round-based battle simulation.
//!
//! Each round every living unit of both armies takes one turn, strongest
//! base attack first. A unit's turn is resolved by its attack policy; the
//! simulator only records whether an attack landed. The battle ends after
//! the first round in which either side failed to land an attack, or in
//! which either side was wiped out.
//!
//! # Determinism
//!
//! Turn order is a stable sort of the player army followed by the computer
//! army, so units with equal attack act in army order. Given deterministic
//! policies, the same armies always produce the same battle.
//!
//! # Example
//!
//! ```
//! use battle_core::army::{Army, Battlefield, UnitHandle};
//! use battle_core::error::Result;
//! use battle_core::policy::AttackPolicy;
//! use battle_core::simulation::{BattleOutcome, BattleSimulator};
//! use battle_core::unit::{Unit, UnitTemplate};
//!
//! struct Strike;
//!
//! impl AttackPolicy for Strike {
//!     fn decide_attack(
//!         &mut self,
//!         attacker: UnitHandle,
//!         field: &mut Battlefield<'_>,
//!     ) -> Result<Option<UnitHandle>> {
//!         let damage = field.unit(attacker).map_or(0, |u| u.base_attack);
//!         let enemy = attacker.side.opponent();
//!         let Some(index) = field.army(enemy).units().iter().position(|u| u.is_alive()) else {
//!             return Ok(None);
//!         };
//!         let target = UnitHandle::new(enemy, index);
//!         if let Some(unit) = field.unit_mut(target) {
//!             unit.take_damage(damage);
//!         }
//!         Ok(Some(target))
//!     }
//! }
//!
//! let template = UnitTemplate::new("Swordsman", "Infantry", 30, 10, 5);
//! let mut player = Army::from_units(vec![Unit::from_template(&template).with_policy(Strike)]);
//! let mut computer = Army::from_units(vec![Unit::from_template(&template).with_policy(Strike)]);
//!
//! let report = BattleSimulator::default().simulate(&mut player, &mut computer, None)?;
//! assert_eq!(report.outcome, BattleOutcome::PlayerVictory);
//! assert_eq!(report.rounds, 3);
//! # Ok::<(), battle_core::error::BattleError>(())
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::army::{Army, Battlefield, Side, UnitHandle};
use crate::config::SimulationConfig;
use crate::error::{BattleError, Result};
use crate::unit::Unit;

/// Receives every landed attack.
pub trait BattleLog {
    /// Called once per successful attack, after the attacker's policy ran.
    fn record_attack(&mut self, attacker: &Unit, target: &Unit);
}

impl<F> BattleLog for F
where
    F: FnMut(&Unit, &Unit),
{
    fn record_attack(&mut self, attacker: &Unit, target: &Unit) {
        self(attacker, target);
    }
}

/// One landed attack, as captured by a `Vec<AttackRecord>` log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRecord {
    /// Attacker name.
    pub attacker: String,
    /// Target name.
    pub target: String,
    /// Target health after the attack.
    pub target_health: u32,
}

impl BattleLog for Vec<AttackRecord> {
    fn record_attack(&mut self, attacker: &Unit, target: &Unit) {
        self.push(AttackRecord {
            attacker: attacker.name.clone(),
            target: target.name.clone(),
            target_health: target.health,
        });
    }
}

/// Log sink that emits one `tracing` event per attack.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingBattleLog;

impl BattleLog for TracingBattleLog {
    fn record_attack(&mut self, attacker: &Unit, target: &Unit) {
        info!(
            attacker = %attacker.name,
            attacker_health = attacker.health,
            target = %target.name,
            target_health = target.health,
            "Attack"
        );
    }
}

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleOutcome {
    /// Only the player army has survivors.
    PlayerVictory,
    /// Only the computer army has survivors.
    ComputerVictory,
    /// Neither army has survivors.
    MutualDestruction,
    /// Both armies have survivors but at least one side stopped attacking.
    Stalemate,
    /// The configured round limit was reached.
    RoundLimit,
}

impl BattleOutcome {
    /// The winning side, if any.
    #[must_use]
    pub const fn winner(self) -> Option<Side> {
        match self {
            Self::PlayerVictory => Some(Side::Player),
            Self::ComputerVictory => Some(Side::Computer),
            _ => None,
        }
    }
}

/// Summary of a finished battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleReport {
    /// Rounds played.
    pub rounds: u32,
    /// Attacks landed across all rounds.
    pub attacks: u32,
    /// Final result.
    pub outcome: BattleOutcome,
}

/// Runs battles between two armies.
#[derive(Debug, Clone, Default)]
pub struct BattleSimulator {
    config: SimulationConfig,
}

impl BattleSimulator {
    /// Create a simulator with the given settings.
    #[must_use]
    pub const fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Run the battle to completion.
    ///
    /// Units without a policy pass their turn. Every landed attack is
    /// reported to `log` when one is given.
    ///
    /// # Errors
    ///
    /// A policy error aborts the battle and is returned unchanged; the
    /// armies keep whatever state the battle reached. A policy that names a
    /// target missing from the battlefield aborts it with
    /// [`BattleError::InvalidTarget`].
    pub fn simulate(
        &self,
        player: &mut Army,
        computer: &mut Army,
        mut log: Option<&mut dyn BattleLog>,
    ) -> Result<BattleReport> {
        let mut rounds = 0u32;
        let mut attacks = 0u32;
        let mut limit_reached = false;

        loop {
            if self.config.max_rounds.is_some_and(|limit| rounds >= limit) {
                limit_reached = true;
                break;
            }

            let order = turn_order(player, computer);
            if order.is_empty() {
                break;
            }
            rounds += 1;
            debug!(round = rounds, units = order.len(), "Round started");

            let mut player_attacked = false;
            let mut computer_attacked = false;

            for handle in order {
                let army = match handle.side {
                    Side::Player => &mut *player,
                    Side::Computer => &mut *computer,
                };
                let Some(unit) = army.get_mut(handle.index) else {
                    continue;
                };
                if !unit.is_alive() {
                    continue;
                }
                let Some(mut policy) = unit.take_policy() else {
                    trace!(unit = %handle, "No policy, turn passed");
                    continue;
                };

                let mut field = Battlefield::new(player, computer);
                let decision = policy.decide_attack(handle, &mut field);
                if let Some(unit) = field.unit_mut(handle) {
                    unit.restore_policy(policy);
                }

                let Some(target) = decision? else {
                    continue;
                };
                let (Some(attacker_unit), Some(target_unit)) =
                    (field.unit(handle), field.unit(target))
                else {
                    return Err(BattleError::InvalidTarget {
                        attacker: handle,
                        target,
                    });
                };

                trace!(attacker = %handle, target = %target, "Attack landed");
                if let Some(log) = log.as_deref_mut() {
                    log.record_attack(attacker_unit, target_unit);
                }
                attacks += 1;
                match handle.side {
                    Side::Player => player_attacked = true,
                    Side::Computer => computer_attacked = true,
                }
            }

            debug!(
                round = rounds,
                player_attacked, computer_attacked, "Round finished"
            );

            if !player_attacked || !computer_attacked {
                break;
            }
            if !player.has_alive() || !computer.has_alive() {
                break;
            }
        }

        let outcome = if limit_reached {
            BattleOutcome::RoundLimit
        } else {
            match (player.has_alive(), computer.has_alive()) {
                (true, false) => BattleOutcome::PlayerVictory,
                (false, true) => BattleOutcome::ComputerVictory,
                (false, false) => BattleOutcome::MutualDestruction,
                (true, true) => BattleOutcome::Stalemate,
            }
        };

        info!(rounds, attacks, ?outcome, "Battle finished");
        Ok(BattleReport {
            rounds,
            attacks,
            outcome,
        })
    }
}

/// Living units of both armies, strongest base attack first.
///
/// Equal attacks keep their relative order: player army before computer
/// army, each in army order.
#[must_use]
pub fn turn_order(player: &Army, computer: &Army) -> Vec<UnitHandle> {
    let mut order: Vec<(UnitHandle, u32)> = [(Side::Player, player), (Side::Computer, computer)]
        .into_iter()
        .flat_map(|(side, army)| {
            army.units()
                .iter()
                .enumerate()
                .filter(|(_, unit)| unit.is_alive())
                .map(move |(index, unit)| (UnitHandle::new(side, index), unit.base_attack))
        })
        .collect();
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.into_iter().map(|(handle, _)| handle).collect()
}

/// Run a battle with default settings and no log sink.
///
/// # Errors
///
/// See [`BattleSimulator::simulate`].
pub fn simulate_battle(player: &mut Army, computer: &mut Army) -> Result<BattleReport> {
    BattleSimulator::default().simulate(player, computer, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::AttackPolicy;
    use crate::unit::UnitTemplate;

    /// Hits the first living enemy for the attacker's base attack.
    struct FirstAlive;

    impl AttackPolicy for FirstAlive {
        fn decide_attack(
            &mut self,
            attacker: UnitHandle,
            field: &mut Battlefield<'_>,
        ) -> Result<Option<UnitHandle>> {
            let damage = field.unit(attacker).map_or(0, |u| u.base_attack);
            let enemy = attacker.side.opponent();
            let Some(index) = field.army(enemy).units().iter().position(Unit::is_alive) else {
                return Ok(None);
            };
            let target = UnitHandle::new(enemy, index);
            if let Some(unit) = field.unit_mut(target) {
                unit.take_damage(damage);
            }
            Ok(Some(target))
        }
    }

    struct Passive;

    impl AttackPolicy for Passive {
        fn decide_attack(&mut self, _: UnitHandle, _: &mut Battlefield<'_>) -> Result<Option<UnitHandle>> {
            Ok(None)
        }
    }

    struct Failing;

    impl AttackPolicy for Failing {
        fn decide_attack(&mut self, attacker: UnitHandle, _: &mut Battlefield<'_>) -> Result<Option<UnitHandle>> {
            Err(BattleError::policy(attacker, "out of arrows"))
        }
    }

    struct Bogus;

    impl AttackPolicy for Bogus {
        fn decide_attack(&mut self, _: UnitHandle, _: &mut Battlefield<'_>) -> Result<Option<UnitHandle>> {
            Ok(Some(UnitHandle::new(Side::Computer, 99)))
        }
    }

    fn unit(name: &str, health: u32, attack: u32) -> Unit {
        Unit::from_template(&UnitTemplate::new(name, "Infantry", health, attack, 5))
    }

    #[test]
    fn test_empty_armies_return_immediately() {
        let mut calls = 0;
        let mut log = |_: &Unit, _: &Unit| calls += 1;
        let report = BattleSimulator::default()
            .simulate(&mut Army::new(), &mut Army::new(), Some(&mut log))
            .unwrap();

        assert_eq!(report.rounds, 0);
        assert_eq!(report.attacks, 0);
        assert_eq!(report.outcome, BattleOutcome::MutualDestruction);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_passive_side_ends_battle_in_one_round() {
        let mut player = Army::from_units(vec![
            unit("A", 100, 10).with_policy(FirstAlive),
            unit("B", 100, 10).with_policy(FirstAlive),
        ]);
        let mut computer = Army::from_units(vec![unit("C", 100, 10).with_policy(Passive)]);
        let mut records: Vec<AttackRecord> = Vec::new();

        let report = BattleSimulator::default()
            .simulate(&mut player, &mut computer, Some(&mut records))
            .unwrap();

        assert_eq!(report.rounds, 1);
        assert_eq!(report.attacks, 2);
        assert_eq!(report.outcome, BattleOutcome::Stalemate);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].target_health, 80);
    }

    #[test]
    fn test_missing_policy_is_no_target() {
        let mut player = Army::from_units(vec![unit("A", 100, 10).with_policy(FirstAlive)]);
        let mut computer = Army::from_units(vec![unit("C", 100, 10)]);

        let report = simulate_battle(&mut player, &mut computer).unwrap();
        assert_eq!(report.rounds, 1);
        assert_eq!(report.attacks, 1);
        assert_eq!(computer.units()[0].health, 90);
    }

    #[test]
    fn test_fight_to_the_death() {
        let mut player = Army::from_units(vec![unit("Hero", 100, 40).with_policy(FirstAlive)]);
        let mut computer = Army::from_units(vec![
            unit("Goblin", 30, 5).with_policy(FirstAlive),
            unit("Goblin", 30, 5).with_policy(FirstAlive),
        ]);

        let report = simulate_battle(&mut player, &mut computer).unwrap();
        assert_eq!(report.outcome, BattleOutcome::PlayerVictory);
        assert_eq!(report.outcome.winner(), Some(Side::Player));
        assert!(!computer.has_alive());
        // Round 1: hero kills goblin 0, goblin 1 hits back. Round 2: hero kills goblin 1.
        assert_eq!(report.rounds, 2);
        assert_eq!(player.units()[0].health, 95);
    }

    #[test]
    fn test_turn_order_by_attack_then_army_order() {
        let player = Army::from_units(vec![unit("p0", 10, 5), unit("p1", 10, 9)]);
        let computer = Army::from_units(vec![unit("c0", 10, 9), unit("c1", 10, 5)]);

        let order = turn_order(&player, &computer);
        assert_eq!(
            order,
            vec![
                UnitHandle::new(Side::Player, 1),
                UnitHandle::new(Side::Computer, 0),
                UnitHandle::new(Side::Player, 0),
                UnitHandle::new(Side::Computer, 1),
            ]
        );
    }

    #[test]
    fn test_turn_order_skips_dead() {
        let mut dead = unit("dead", 10, 50);
        dead.take_damage(10);
        let player = Army::from_units(vec![dead, unit("alive", 10, 1)]);
        let order = turn_order(&player, &Army::new());
        assert_eq!(order, vec![UnitHandle::new(Side::Player, 1)]);
    }

    #[test]
    fn test_unit_killed_mid_round_loses_turn() {
        // The computer unit is slower and dies before its turn comes up.
        let mut player = Army::from_units(vec![unit("Fast", 50, 100).with_policy(FirstAlive)]);
        let mut computer = Army::from_units(vec![unit("Slow", 50, 10).with_policy(FirstAlive)]);
        let mut records: Vec<AttackRecord> = Vec::new();

        let report = BattleSimulator::default()
            .simulate(&mut player, &mut computer, Some(&mut records))
            .unwrap();

        assert_eq!(report.rounds, 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].attacker, "Fast");
        assert_eq!(player.units()[0].health, 50);
    }

    #[test]
    fn test_policy_error_aborts_battle() {
        let mut player = Army::from_units(vec![unit("A", 100, 10).with_policy(Failing)]);
        let mut computer = Army::from_units(vec![unit("C", 100, 5).with_policy(FirstAlive)]);

        let result = simulate_battle(&mut player, &mut computer);
        assert!(matches!(result, Err(BattleError::PolicyFailed { .. })));
        // Aborted before the computer unit's turn.
        assert_eq!(player.units()[0].health, 100);
        // The policy is put back even when it fails.
        assert!(player.units()[0].has_policy());
    }

    #[test]
    fn test_unknown_target_is_an_error() {
        let mut player = Army::from_units(vec![unit("A", 100, 10).with_policy(Bogus)]);
        let mut computer = Army::from_units(vec![unit("C", 100, 5)]);

        let result = simulate_battle(&mut player, &mut computer);
        assert!(matches!(result, Err(BattleError::InvalidTarget { .. })));
    }

    #[test]
    fn test_round_limit() {
        let mut player = Army::from_units(vec![unit("A", 1000, 1).with_policy(FirstAlive)]);
        let mut computer = Army::from_units(vec![unit("C", 1000, 1).with_policy(FirstAlive)]);
        let simulator = BattleSimulator::new(SimulationConfig {
            max_rounds: Some(5),
        });

        let report = simulator.simulate(&mut player, &mut computer, None).unwrap();
        assert_eq!(report.rounds, 5);
        assert_eq!(report.attacks, 10);
        assert_eq!(report.outcome, BattleOutcome::RoundLimit);
        assert_eq!(player.units()[0].health, 995);
    }

    #[test]
    fn test_log_calls_bounded_by_living_units() {
        let mut player = Army::from_units(
            (0..4)
                .map(|i| unit(&format!("p{i}"), 20, 3 + i).with_policy(FirstAlive))
                .collect(),
        );
        let mut computer = Army::from_units(
            (0..3)
                .map(|i| unit(&format!("c{i}"), 25, 4 + i).with_policy(FirstAlive))
                .collect(),
        );
        let mut per_round_cap = Vec::new();
        let mut records: Vec<AttackRecord> = Vec::new();

        loop {
            let alive = player.alive().count() + computer.alive().count();
            per_round_cap.push(alive);
            let simulator = BattleSimulator::new(SimulationConfig { max_rounds: Some(1) });
            records.clear();
            let report = simulator
                .simulate(&mut player, &mut computer, Some(&mut records))
                .unwrap();
            assert!(records.len() <= alive);
            if report.outcome != BattleOutcome::RoundLimit || report.attacks == 0 {
                break;
            }
            if !player.has_alive() || !computer.has_alive() {
                break;
            }
        }
        assert!(!per_round_cap.is_empty());
    }
}
