//! Unit templates and the unit instances placed on the board.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::GridPos;
use crate::policy::AttackPolicy;

/// How a unit delivers its attack.
///
/// Carried through composition untouched; damage rules live in the
/// attack-decision policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AttackType {
    /// Close combat, sword and spear.
    #[default]
    Melee,
    /// Bows and crossbows.
    Ranged,
    /// Spells.
    Magic,
    /// Siege engines.
    Siege,
}

/// Immutable unit type definition from which instances are produced.
///
/// # Example RON
///
/// ```ron
/// UnitTemplate(
///     name: "Swordsman",
///     unit_type: "Infantry",
///     health: 100,
///     base_attack: 20,
///     cost: 12,
///     attack_type: Melee,
///     attack_bonuses: { "Cavalry": 50 },
///     defence_bonuses: {},
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitTemplate {
    /// Display name.
    pub name: String,

    /// Category label ("Infantry", "Archer", ...). Drives the per-type cap.
    #[serde(default)]
    pub unit_type: String,

    /// Starting health points.
    pub health: u32,

    /// Base damage per attack. Also the turn-order key.
    pub base_attack: u32,

    /// Point cost when composing an army.
    pub cost: u32,

    /// Attack delivery.
    #[serde(default)]
    pub attack_type: AttackType,

    /// Percentage attack modifiers keyed by target unit type.
    #[serde(default)]
    pub attack_bonuses: BTreeMap<String, i32>,

    /// Percentage defence modifiers keyed by attacker unit type.
    #[serde(default)]
    pub defence_bonuses: BTreeMap<String, i32>,
}

impl UnitTemplate {
    /// Create a template with empty bonus tables.
    pub fn new(
        name: impl Into<String>,
        unit_type: impl Into<String>,
        health: u32,
        base_attack: u32,
        cost: u32,
    ) -> Self {
        Self {
            name: name.into(),
            unit_type: unit_type.into(),
            health,
            base_attack,
            cost,
            attack_type: AttackType::default(),
            attack_bonuses: BTreeMap::new(),
            defence_bonuses: BTreeMap::new(),
        }
    }

    /// Set the attack type.
    pub fn with_attack_type(mut self, attack_type: AttackType) -> Self {
        self.attack_type = attack_type;
        self
    }

    /// Label used to count instances against the per-type cap.
    ///
    /// The trimmed `unit_type`, else the name, else `"UNKNOWN"`.
    #[must_use]
    pub fn type_key(&self) -> &str {
        let label = self.unit_type.trim();
        if !label.is_empty() {
            label
        } else if !self.name.is_empty() {
            self.name.as_str()
        } else {
            "UNKNOWN"
        }
    }
}

/// A placed, stateful unit belonging to an army.
///
/// Two instances can hold identical stats; they are told apart by where
/// they are stored, never by value.
pub struct Unit {
    /// Display name.
    pub name: String,
    /// Category label.
    pub unit_type: String,
    /// Current health. The unit is alive while this is above zero.
    pub health: u32,
    /// Health at creation.
    pub max_health: u32,
    /// Base damage per attack.
    pub base_attack: u32,
    /// Point cost.
    pub cost: u32,
    /// Attack delivery.
    pub attack_type: AttackType,
    /// Percentage attack modifiers.
    pub attack_bonuses: BTreeMap<String, i32>,
    /// Percentage defence modifiers.
    pub defence_bonuses: BTreeMap<String, i32>,
    /// Board cell, `None` until placed.
    pub position: Option<GridPos>,
    policy: Option<Box<dyn AttackPolicy>>,
}

impl Unit {
    /// Produce a fresh, unplaced instance from a template.
    #[must_use]
    pub fn from_template(template: &UnitTemplate) -> Self {
        Self {
            name: template.name.clone(),
            unit_type: template.unit_type.clone(),
            health: template.health,
            max_health: template.health,
            base_attack: template.base_attack,
            cost: template.cost,
            attack_type: template.attack_type,
            attack_bonuses: template.attack_bonuses.clone(),
            defence_bonuses: template.defence_bonuses.clone(),
            position: None,
            policy: None,
        }
    }

    /// Place the unit on a cell.
    pub fn at(mut self, pos: GridPos) -> Self {
        self.position = Some(pos);
        self
    }

    /// Attach an attack-decision policy.
    pub fn with_policy(mut self, policy: impl AttackPolicy + 'static) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    /// Replace the attack-decision policy.
    pub fn set_policy(&mut self, policy: Box<dyn AttackPolicy>) {
        self.policy = Some(policy);
    }

    /// Whether a policy is attached.
    #[must_use]
    pub fn has_policy(&self) -> bool {
        self.policy.is_some()
    }

    pub(crate) fn take_policy(&mut self) -> Option<Box<dyn AttackPolicy>> {
        self.policy.take()
    }

    pub(crate) fn restore_policy(&mut self, policy: Box<dyn AttackPolicy>) {
        // A policy may install a replacement for itself mid-turn; keep that one.
        if self.policy.is_none() {
            self.policy = Some(policy);
        }
    }

    /// Whether the unit can still act and be targeted.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Apply damage, returning how much health was actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health);
        self.health -= dealt;
        dealt
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("name", &self.name)
            .field("unit_type", &self.unit_type)
            .field("health", &self.health)
            .field("base_attack", &self.base_attack)
            .field("cost", &self.cost)
            .field("position", &self.position)
            .field("has_policy", &self.policy.is_some())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{} hp]", self.name, self.health)?;
        if let Some(pos) = self.position {
            write!(f, " at {pos}")?;
        }
        Ok(())
    }
}
