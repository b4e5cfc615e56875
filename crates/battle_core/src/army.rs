//! Armies and the two-army battlefield view handed to attack policies.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Flank, GridPos};
use crate::unit::Unit;

/// One of the two armies in a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// The human player's army, deployed on the right flank.
    Player,
    /// The generated army, deployed on the left flank.
    Computer,
}

impl Side {
    /// The opposing side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Computer,
            Self::Computer => Self::Player,
        }
    }

    /// Board edge this side is deployed against.
    #[must_use]
    pub const fn flank(self) -> Flank {
        match self {
            Self::Player => Flank::Right,
            Self::Computer => Flank::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Computer => write!(f, "computer"),
        }
    }
}

/// Identifies a unit for the duration of a battle: its side and its slot
/// in that side's army.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitHandle {
    /// Owning army.
    pub side: Side,
    /// Index into the army's unit list.
    pub index: usize,
}

impl UnitHandle {
    /// Create a handle.
    #[must_use]
    pub const fn new(side: Side, index: usize) -> Self {
        Self { side, index }
    }
}

impl fmt::Display for UnitHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.side, self.index)
    }
}

/// An ordered collection of unit instances plus the points spent on them.
#[derive(Debug, Default)]
pub struct Army {
    units: Vec<Unit>,
    points: u32,
}

impl Army {
    /// Create an empty army.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an army from units, spent points summed from their costs.
    #[must_use]
    pub fn from_units(units: Vec<Unit>) -> Self {
        let points = units.iter().map(|u| u.cost).fold(0u32, u32::saturating_add);
        Self { units, points }
    }

    /// Create an army with an explicit spent-points figure.
    #[must_use]
    pub fn with_points(units: Vec<Unit>, points: u32) -> Self {
        Self { units, points }
    }

    /// Points spent on this army.
    #[must_use]
    pub const fn points(&self) -> u32 {
        self.points
    }

    /// All units, dead or alive, in army order.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Mutable access to the units.
    pub fn units_mut(&mut self) -> &mut [Unit] {
        &mut self.units
    }

    /// Append a unit.
    pub fn push(&mut self, unit: Unit) {
        self.units.push(unit);
    }

    /// Number of units, dead ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Check if the army holds no units at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Unit at a slot.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Unit> {
        self.units.get(index)
    }

    /// Mutable unit at a slot.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Unit> {
        self.units.get_mut(index)
    }

    /// Living units.
    pub fn alive(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.is_alive())
    }

    /// Check if at least one unit is alive.
    #[must_use]
    pub fn has_alive(&self) -> bool {
        self.units.iter().any(Unit::is_alive)
    }

    /// Sum of current health over living units.
    #[must_use]
    pub fn total_health(&self) -> u64 {
        self.alive().map(|u| u64::from(u.health)).sum()
    }

    /// Slot of a unit stored in this army, by identity.
    ///
    /// Structurally equal units in other armies (or other slots) do not match.
    #[must_use]
    pub fn index_of(&self, unit: &Unit) -> Option<usize> {
        self.units.iter().position(|u| std::ptr::eq(u, unit))
    }

    /// Check if this exact instance belongs to the army.
    #[must_use]
    pub fn contains(&self, unit: &Unit) -> bool {
        self.index_of(unit).is_some()
    }
}

/// Mutable view over both armies of a running battle.
///
/// Attack policies receive this to look up targets and apply damage.
pub struct Battlefield<'a> {
    player: &'a mut Army,
    computer: &'a mut Army,
}

impl<'a> Battlefield<'a> {
    /// Borrow both armies.
    pub fn new(player: &'a mut Army, computer: &'a mut Army) -> Self {
        Self { player, computer }
    }

    /// One side's army.
    #[must_use]
    pub fn army(&self, side: Side) -> &Army {
        match side {
            Side::Player => &*self.player,
            Side::Computer => &*self.computer,
        }
    }

    /// One side's army, mutably.
    pub fn army_mut(&mut self, side: Side) -> &mut Army {
        match side {
            Side::Player => &mut *self.player,
            Side::Computer => &mut *self.computer,
        }
    }

    /// Resolve a handle.
    #[must_use]
    pub fn unit(&self, handle: UnitHandle) -> Option<&Unit> {
        self.army(handle.side).get(handle.index)
    }

    /// Resolve a handle mutably.
    pub fn unit_mut(&mut self, handle: UnitHandle) -> Option<&mut Unit> {
        self.army_mut(handle.side).get_mut(handle.index)
    }

    /// Handle of a unit by identity, searching both armies.
    #[must_use]
    pub fn handle_of(&self, unit: &Unit) -> Option<UnitHandle> {
        [Side::Player, Side::Computer].into_iter().find_map(|side| {
            self.army(side)
                .index_of(unit)
                .map(|index| UnitHandle::new(side, index))
        })
    }

    /// Every unit on the field with its handle, player army first.
    pub fn units(&self) -> impl Iterator<Item = (UnitHandle, &Unit)> {
        let player = self
            .player
            .units()
            .iter()
            .enumerate()
            .map(|(i, u)| (UnitHandle::new(Side::Player, i), u));
        let computer = self
            .computer
            .units()
            .iter()
            .enumerate()
            .map(|(i, u)| (UnitHandle::new(Side::Computer, i), u));
        player.chain(computer)
    }

    /// Living unit standing on a cell, if any.
    #[must_use]
    pub fn unit_at(&self, pos: GridPos) -> Option<UnitHandle> {
        self.units()
            .find(|(_, u)| u.is_alive() && u.position == Some(pos))
            .map(|(handle, _)| handle)
    }
}
