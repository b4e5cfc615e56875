//! Army previews and demo battles.
//!
//! A demo battle composes both armies from the same catalog and budget,
//! the computer on the left flank and the player on the right, and lets
//! every unit fight with [`FrontlinePolicy`].

use battle_core::army::{Army, Side};
use battle_core::board::{DeploymentZone, GridPos, BOARD_HEIGHT, BOARD_WIDTH};
use battle_core::composer::ArmyComposer;
use battle_core::config::{BattleConfig, ComposerConfig, SimulationConfig};
use battle_core::error::Result;
use battle_core::simulation::{BattleReport, BattleSimulator, TracingBattleLog};
use battle_core::unit::{Unit, UnitTemplate};
use battle_test_utils::fixtures::arm_with;
use battle_test_utils::policies::FrontlinePolicy;

/// Round limit applied when the configuration sets none.
pub const DEMO_ROUND_LIMIT: u32 = 1000;

/// Armies and report of a finished demo battle.
#[derive(Debug)]
pub struct DemoBattle {
    /// Player army after the battle.
    pub player: Army,
    /// Computer army after the battle.
    pub computer: Army,
    /// Battle summary.
    pub report: BattleReport,
}

/// Composer for one side: the configured settings, deployed on that side's
/// flank. The computer keeps the configured zone.
#[must_use]
pub fn composer_for(side: Side, config: &ComposerConfig) -> ArmyComposer {
    let zone = match side {
        Side::Computer => config.zone,
        Side::Player => DeploymentZone::for_flank(side.flank()),
    };
    ArmyComposer::new(ComposerConfig { zone, ..*config })
}

/// Simulation settings for a demo: the configured ones, capped at
/// [`DEMO_ROUND_LIMIT`] rounds unless a limit is already set.
#[must_use]
pub fn demo_simulation(config: &BattleConfig) -> SimulationConfig {
    SimulationConfig {
        max_rounds: config.simulation.max_rounds.or(Some(DEMO_ROUND_LIMIT)),
    }
}

/// Compose both armies and run the battle.
///
/// # Errors
///
/// Propagates any error raised during the battle.
pub fn run_demo(catalog: &[UnitTemplate], budget: u32, config: &BattleConfig) -> Result<DemoBattle> {
    let mut computer = composer_for(Side::Computer, &config.composer).compose(catalog, budget);
    let mut player = composer_for(Side::Player, &config.composer).compose(catalog, budget);
    arm_with(&mut computer, FrontlinePolicy::default);
    arm_with(&mut player, FrontlinePolicy::default);

    tracing::info!(
        player_units = player.len(),
        computer_units = computer.len(),
        budget,
        "Starting demo battle"
    );

    let mut log = TracingBattleLog;
    let report = BattleSimulator::new(demo_simulation(config)).simulate(
        &mut player,
        &mut computer,
        Some(&mut log),
    )?;

    Ok(DemoBattle {
        player,
        computer,
        report,
    })
}

fn position_label(pos: Option<GridPos>) -> String {
    pos.map_or_else(|| "-".to_string(), |p| p.to_string())
}

/// One line per unit plus a points summary.
#[must_use]
pub fn preview(army: &Army) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<16} {:<12} {:>7} {:>6} {:>5}  cell\n",
        "name", "type", "health", "attack", "cost"
    ));
    for unit in army.units() {
        out.push_str(&format!(
            "{:<16} {:<12} {:>3}/{:<3} {:>6} {:>5}  {}\n",
            unit.name,
            unit.unit_type,
            unit.health,
            unit.max_health,
            unit.base_attack,
            unit.cost,
            position_label(unit.position)
        ));
    }
    out.push_str(&format!("{} units, {} points spent\n", army.len(), army.points()));
    out
}

/// Character for a living unit: first letter of its type, upper case for
/// the player and lower case for the computer.
fn unit_char(unit: &Unit, side: Side) -> char {
    let base = unit.unit_type.chars().next().unwrap_or('u');
    match side {
        Side::Player => base.to_ascii_uppercase(),
        Side::Computer => base.to_ascii_lowercase(),
    }
}

/// Render living, placed units on the board.
#[must_use]
pub fn render_board(player: &Army, computer: &Army) -> String {
    let width = BOARD_WIDTH as usize;
    let mut cells = vec!['.'; width * BOARD_HEIGHT as usize];

    for (side, army) in [(Side::Computer, computer), (Side::Player, player)] {
        for unit in army.alive() {
            if let Some(pos) = unit.position.filter(|p| p.in_bounds()) {
                cells[pos.y as usize * width + pos.x as usize] = unit_char(unit, side);
            }
        }
    }

    let mut out = String::with_capacity(cells.len() + BOARD_HEIGHT as usize);
    for row in cells.chunks(width) {
        out.extend(row);
        out.push('\n');
    }
    out
}
