//! Player state and resource management.
//!
//! This module contains:
//! - Resource kinds and the `ResourceHand` counter
//! - Player struct with resources, territory and per-turn claim tracking

use crate::board::PlayerId;
use crate::hex::HexCoord;
use crate::terrain::Rgb;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Resource kinds produced by improvements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Resource {
    /// Produced by farms
    Food,
    /// Produced by lumber camps
    Wood,
    /// Produced by quarries
    Stone,
}

impl Resource {
    /// All resource types
    pub const ALL: [Resource; 3] = [Resource::Food, Resource::Wood, Resource::Stone];

    /// Lowercase display name
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Food => "food",
            Resource::Wood => "wood",
            Resource::Stone => "stone",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A hand of resources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHand {
    pub food: u32,
    pub wood: u32,
    pub stone: u32,
}

impl ResourceHand {
    /// Create an empty hand
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hand with specific amounts
    pub fn with_amounts(food: u32, wood: u32, stone: u32) -> Self {
        Self { food, wood, stone }
    }

    /// Total number of resources
    pub fn total(&self) -> u32 {
        self.food.saturating_add(self.wood).saturating_add(self.stone)
    }

    /// Check if hand is empty
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Get count of a specific resource
    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Food => self.food,
            Resource::Wood => self.wood,
            Resource::Stone => self.stone,
        }
    }

    fn slot_mut(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Food => &mut self.food,
            Resource::Wood => &mut self.wood,
            Resource::Stone => &mut self.stone,
        }
    }

    /// Add resources to hand
    pub fn add(&mut self, resource: Resource, amount: u32) {
        let slot = self.slot_mut(resource);
        *slot = slot.saturating_add(amount);
    }

    /// Add another hand to this one
    pub fn add_hand(&mut self, other: &ResourceHand) {
        for (resource, amount) in other.entries() {
            self.add(resource, amount);
        }
    }

    /// Add every entry of an amount table
    pub fn add_all(&mut self, gains: &[(Resource, u32)]) {
        for &(resource, amount) in gains {
            self.add(resource, amount);
        }
    }

    /// Check if this hand covers every entry of a cost table
    pub fn can_afford(&self, cost: &[(Resource, u32)]) -> bool {
        cost.iter()
            .all(|&(resource, amount)| self.get(resource) >= amount)
    }

    /// Deduct a cost table, all or nothing. Returns false (and leaves the hand
    /// untouched) if any entry is not covered.
    pub fn try_spend(&mut self, cost: &[(Resource, u32)]) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        for &(resource, amount) in cost {
            *self.slot_mut(resource) -= amount;
        }
        true
    }

    /// Non-zero entries in `Resource::ALL` order
    pub fn entries(&self) -> impl Iterator<Item = (Resource, u32)> + '_ {
        Resource::ALL
            .into_iter()
            .map(|resource| (resource, self.get(resource)))
            .filter(|&(_, amount)| amount > 0)
    }
}

impl std::fmt::Display for ResourceHand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .entries()
            .map(|(resource, amount)| format!("{amount} {resource}"))
            .collect();
        if parts.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

/// A single player's state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Index into the player list
    pub id: PlayerId,
    /// Territory colour
    pub color: Rgb,
    /// Current resources
    pub resources: ResourceHand,
    /// Every hex this player has claimed
    pub owned_hexes: HashSet<HexCoord>,
    /// Claims made during the current turn
    pub claims_this_turn: u32,
}

impl Player {
    /// Create a new player
    pub fn new(id: PlayerId, color: Rgb, resources: ResourceHand) -> Self {
        Self {
            id,
            color,
            resources,
            owned_hexes: HashSet::new(),
            claims_this_turn: 0,
        }
    }

    /// Display number (1-based)
    pub fn number(&self) -> u32 {
        u32::from(self.id) + 1
    }

    pub fn owns(&self, coord: &HexCoord) -> bool {
        self.owned_hexes.contains(coord)
    }

    /// Called at end of turn
    pub fn end_turn(&mut self) {
        self.claims_this_turn = 0;
    }
}
