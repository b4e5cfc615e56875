//! Determinism testing utilities.
//!
//! Provides a harness for verifying that composition and battles produce
//! identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! Battles must replay exactly from the same catalog and budget. Sources of
//! non-determinism include:
//!
//! - **Floating-point math**: Efficiency ratios are compared exactly with
//!   [`battle_core::math::cmp_ratio`].
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Nothing observable may depend on it; composition walks the ranked
//!   template list, never the per-type counters.
//!
//! - **Frontier ties**: A* breaks equal scores by insertion order.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Each module in isolation
//! 2. **Property tests**: Random catalogs and budgets still replay exactly
//! 3. **Parallel tests**: Running N battles on separate threads all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use battle_core::army::Army;
use battle_core::config::SimulationConfig;
use battle_core::simulation::{BattleReport, BattleSimulator};

/// Round limit for harness battles, so zero-damage armies still finish.
pub const HARNESS_ROUND_LIMIT: u32 = 1000;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
}

impl DeterminismResult {
    fn from_hashes(hashes: Vec<u64>) -> Self {
        let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
        Self {
            is_deterministic,
            hashes,
        }
    }

    /// Get all unique hashes (should be 1 for a deterministic run).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Battle is non-deterministic!\n\
                 Runs: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a scenario multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the scenario
/// * `setup` - Function to create the initial state
/// * `run` - Function that plays the scenario out
/// * `hash` - Function to compute the final state hash
pub fn verify_determinism<S, Setup, Run, HashFn>(
    runs: usize,
    setup: Setup,
    run: Run,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Run: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let hashes = (0..runs)
        .map(|_| {
            let mut state = setup();
            run(&mut state);
            hash(&state)
        })
        .collect();

    DeterminismResult::from_hashes(hashes)
}

/// Hash the observable state of two armies.
#[must_use]
pub fn armies_hash(player: &Army, computer: &Army) -> u64 {
    let mut hasher = DefaultHasher::new();
    for army in [player, computer] {
        army.points().hash(&mut hasher);
        army.len().hash(&mut hasher);
        for unit in army.units() {
            unit.name.hash(&mut hasher);
            unit.unit_type.hash(&mut hasher);
            unit.health.hash(&mut hasher);
            unit.position.hash(&mut hasher);
        }
    }
    hasher.finish()
}

/// Play one battle and hash the result.
///
/// A failed battle hashes its error message, so two runs that fail the same
/// way still match.
pub fn battle_hash(player: &mut Army, computer: &mut Army) -> u64 {
    let simulator = BattleSimulator::new(SimulationConfig {
        max_rounds: Some(HARNESS_ROUND_LIMIT),
    });
    let report: Result<BattleReport, String> = simulator
        .simulate(player, computer, None)
        .map_err(|e| e.to_string());
    compute_hash(&(armies_hash(player, computer), report))
}

/// Play the battle built by `setup_fn` several times and compare the final
/// states.
pub fn verify_battle_determinism<F>(setup_fn: F, runs: usize) -> DeterminismResult
where
    F: Fn() -> (Army, Army),
{
    verify_determinism(
        runs,
        || {
            let (player, computer) = setup_fn();
            (player, computer, 0)
        },
        |(player, computer, hash)| *hash = battle_hash(player, computer),
        |(_, _, hash)| *hash,
    )
}

/// Play N copies of a battle on scoped threads and compare the results.
///
/// Each thread builds its own armies, so policies need not be `Send`.
///
/// # Panics
///
/// Panics if a battle thread panics.
pub fn run_parallel_battles<F>(setup_fn: F, num_sims: usize) -> DeterminismResult
where
    F: Fn() -> (Army, Army) + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_sims)
            .map(|_| {
                s.spawn(|| {
                    let (mut player, mut computer) = setup_fn();
                    battle_hash(&mut player, &mut computer)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("battle thread panicked"))
            .collect()
    });

    DeterminismResult::from_hashes(hashes)
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for catalogs, budgets and board cells.
pub mod strategies {
    use battle_core::board::{GridPos, BOARD_HEIGHT, BOARD_WIDTH};
    use battle_core::unit::UnitTemplate;
    use proptest::prelude::*;

    /// Generate a type label, including the empty label.
    pub fn arb_unit_type() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["Infantry", "Archer", "Cavalry", "Siege", "Mage", ""])
            .prop_map(String::from)
    }

    /// Generate health values (1-300).
    pub fn arb_health() -> impl Strategy<Value = u32> {
        1u32..300u32
    }

    /// Generate a template. Cost may be zero.
    pub fn arb_template() -> impl Strategy<Value = UnitTemplate> {
        (0u32..20, arb_unit_type(), arb_health(), 0u32..80, 0u32..60).prop_map(
            |(id, unit_type, health, attack, cost)| {
                UnitTemplate::new(format!("Unit{id}"), unit_type, health, attack, cost)
            },
        )
    }

    /// Generate a catalog of up to `max_len` templates.
    pub fn arb_catalog(max_len: usize) -> impl Strategy<Value = Vec<UnitTemplate>> {
        proptest::collection::vec(arb_template(), 0..max_len)
    }

    /// Generate a point budget.
    pub fn arb_budget() -> impl Strategy<Value = u32> {
        0u32..1500
    }

    /// Generate a cell on the board.
    pub fn arb_grid_pos() -> impl Strategy<Value = GridPos> {
        (0..BOARD_WIDTH, 0..BOARD_HEIGHT).prop_map(|(x, y)| GridPos::new(x, y))
    }

    /// Generate a set of obstacle cells.
    pub fn arb_obstacles(max_len: usize) -> impl Strategy<Value = Vec<GridPos>> {
        proptest::collection::vec(arb_grid_pos(), 0..max_len)
    }
}
