//! Test fixtures and helpers.
//!
//! Pre-built catalogs and army configurations for consistent testing.

use battle_core::army::{Army, Side};
use battle_core::board::{DeploymentZone, GridPos};
use battle_core::composer::ArmyComposer;
use battle_core::config::ComposerConfig;
use battle_core::policy::AttackPolicy;
use battle_core::unit::{AttackType, Unit, UnitTemplate};

use crate::policies::FrontlinePolicy;

/// Create a template with empty bonus tables.
#[must_use]
pub fn template(name: &str, unit_type: &str, health: u32, base_attack: u32, cost: u32) -> UnitTemplate {
    UnitTemplate::new(name, unit_type, health, base_attack, cost)
}

/// A small mixed catalog covering every attack type.
#[must_use]
pub fn standard_catalog() -> Vec<UnitTemplate> {
    let mut knight = template("Knight", "Cavalry", 120, 25, 20);
    knight.attack_bonuses.insert("Archer".to_string(), 50);
    let mut pikeman = template("Pikeman", "Infantry", 90, 15, 10);
    pikeman.defence_bonuses.insert("Cavalry".to_string(), 30);

    vec![
        template("Swordsman", "Infantry", 100, 20, 12),
        pikeman,
        template("Archer", "Archer", 50, 30, 15).with_attack_type(AttackType::Ranged),
        knight,
        template("Mage", "Mage", 40, 35, 25).with_attack_type(AttackType::Magic),
        template("Catapult", "Siege", 60, 45, 40).with_attack_type(AttackType::Siege),
    ]
}

/// A fresh unit standing on `(x, y)`.
#[must_use]
pub fn unit_at(name: &str, x: i32, y: i32) -> Unit {
    Unit::from_template(&template(name, "Infantry", 30, 8, 5)).at(GridPos::new(x, y))
}

/// Attach a fresh policy from `make` to every unit of `army`.
pub fn arm_with<P, F>(army: &mut Army, mut make: F)
where
    P: AttackPolicy + 'static,
    F: FnMut() -> P,
{
    for unit in army.units_mut() {
        unit.set_policy(Box::new(make()));
    }
}

/// Compose an army for `side` in its own deployment zone.
#[must_use]
pub fn compose_for(side: Side, catalog: &[UnitTemplate], budget: u32) -> Army {
    let config = ComposerConfig {
        zone: DeploymentZone::for_flank(side.flank()),
        ..ComposerConfig::default()
    };
    ArmyComposer::new(config).compose(catalog, budget)
}

/// Two composed armies on opposite flanks, every unit using
/// [`FrontlinePolicy`]. Returns `(player, computer)`.
#[must_use]
pub fn frontline_armies(catalog: &[UnitTemplate], budget: u32) -> (Army, Army) {
    let mut player = compose_for(Side::Player, catalog, budget);
    let mut computer = compose_for(Side::Computer, catalog, budget);
    arm_with(&mut player, FrontlinePolicy::default);
    arm_with(&mut computer, FrontlinePolicy::default);
    (player, computer)
}
