//! Board representation: improvements and the sparse per-hex record store.
//!
//! This module contains:
//! - Improvement kinds with their cost, yield and point tables
//! - `HexRecord` (owner + improvement for one hex)
//! - `Board`, a lazily populated map from raw hex coordinates to records
//!
//! Records are keyed by the raw coordinate, not the terrain-wrapped one, so two
//! coordinates that wrap onto the same terrain cell are tracked separately.

use crate::hex::HexCoord;
use crate::player::Resource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Player identifier (index into the player list)
pub type PlayerId = u8;

/// Improvement costs, in the order they are charged
pub mod costs {
    use crate::player::Resource;

    /// Cost of a farm: 2 wood
    pub const FARM: &[(Resource, u32)] = &[(Resource::Wood, 2)];

    /// Cost of a lumber camp: 3 wood
    pub const LUMBER_CAMP: &[(Resource, u32)] = &[(Resource::Wood, 3)];

    /// Cost of a quarry: 2 wood, 1 stone
    pub const QUARRY: &[(Resource, u32)] = &[(Resource::Wood, 2), (Resource::Stone, 1)];

    /// Cost of a settlement: 5 wood, 3 stone, 2 food
    pub const SETTLEMENT: &[(Resource, u32)] =
        &[(Resource::Wood, 5), (Resource::Stone, 3), (Resource::Food, 2)];
}

/// Something built on an owned hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Improvement {
    /// Generates food
    Farm,
    /// Generates wood
    LumberCamp,
    /// Generates stone
    Quarry,
    /// No yield; anchors where its owner may claim and settle next
    Settlement,
}

impl Improvement {
    /// All improvement kinds, in build-menu order
    pub const ALL: [Improvement; 4] = [
        Improvement::Farm,
        Improvement::LumberCamp,
        Improvement::Quarry,
        Improvement::Settlement,
    ];

    /// Resources required to build
    pub fn cost(&self) -> &'static [(Resource, u32)] {
        match self {
            Improvement::Farm => costs::FARM,
            Improvement::LumberCamp => costs::LUMBER_CAMP,
            Improvement::Quarry => costs::QUARRY,
            Improvement::Settlement => costs::SETTLEMENT,
        }
    }

    /// Resources generated for the owner at the end of each of their turns
    pub fn yield_per_turn(&self) -> &'static [(Resource, u32)] {
        match self {
            Improvement::Farm => &[(Resource::Food, 2)],
            Improvement::LumberCamp => &[(Resource::Wood, 2)],
            Improvement::Quarry => &[(Resource::Stone, 1)],
            Improvement::Settlement => &[],
        }
    }

    /// Points this improvement adds to its owner's score
    pub fn points(&self) -> u32 {
        match self {
            Improvement::Farm | Improvement::LumberCamp => 2,
            Improvement::Quarry => 3,
            Improvement::Settlement => 5,
        }
    }

    /// Snake-case identifier used in logs and scripts
    pub fn name(&self) -> &'static str {
        match self {
            Improvement::Farm => "farm",
            Improvement::LumberCamp => "lumber_camp",
            Improvement::Quarry => "quarry",
            Improvement::Settlement => "settlement",
        }
    }
}

impl std::fmt::Display for Improvement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown improvement name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown improvement '{0}'")]
pub struct UnknownImprovement(pub String);

impl FromStr for Improvement {
    type Err = UnknownImprovement;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "farm" => Ok(Improvement::Farm),
            "lumber_camp" | "lumbercamp" | "lumber" => Ok(Improvement::LumberCamp),
            "quarry" => Ok(Improvement::Quarry),
            "settlement" => Ok(Improvement::Settlement),
            _ => Err(UnknownImprovement(s.to_string())),
        }
    }
}

/// Ownership and improvement of one hex
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexRecord {
    /// Player who claimed this hex
    pub owner: Option<PlayerId>,
    /// What has been built here
    pub improvement: Option<Improvement>,
}

impl HexRecord {
    /// Whether an improvement can still go here (one per hex)
    pub fn is_unimproved(&self) -> bool {
        self.improvement.is_none()
    }

    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }

    pub fn is_settlement_of(&self, player: PlayerId) -> bool {
        self.is_owned_by(player) && self.improvement == Some(Improvement::Settlement)
    }
}

/// Sparse hex-record store; records are created on first access and never removed.
///
/// Not serialisable directly (JSON maps need string keys); use [`Board::to_json`].
#[derive(Debug, Clone, Default)]
pub struct Board {
    hexes: HashMap<HexCoord, HexRecord>,
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Record for a coordinate, created on first access
    pub fn get_or_create(&mut self, coord: HexCoord) -> &mut HexRecord {
        self.hexes.entry(coord).or_default()
    }

    /// Copy of the record for a coordinate; the default record if never touched
    pub fn record(&self, coord: HexCoord) -> HexRecord {
        self.hexes.get(&coord).copied().unwrap_or_default()
    }

    /// Number of records materialised so far
    pub fn len(&self) -> usize {
        self.hexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hexes.is_empty()
    }

    /// Set the owner of a hex
    pub fn set_owner(&mut self, coord: HexCoord, player: PlayerId) {
        self.get_or_create(coord).owner = Some(player);
    }

    /// Put an improvement on a hex
    pub fn place_improvement(&mut self, coord: HexCoord, improvement: Improvement) {
        self.get_or_create(coord).improvement = Some(improvement);
    }

    /// Convert to JSON-friendly format (arrays instead of a coordinate-keyed map).
    ///
    /// Only records that carry an owner or an improvement are emitted, sorted by
    /// coordinate.
    pub fn to_json(&self) -> BoardJson {
        let mut hexes: Vec<HexJson> = self
            .hexes
            .iter()
            .filter(|(_, record)| record.owner.is_some() || record.improvement.is_some())
            .map(|(coord, record)| HexJson {
                col: coord.col,
                row: coord.row,
                owner: record.owner,
                improvement: record.improvement,
            })
            .collect();
        hexes.sort_by_key(|h| (h.col, h.row));
        BoardJson { hexes }
    }
}

/// JSON-friendly board representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardJson {
    pub hexes: Vec<HexJson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexJson {
    pub col: i32,
    pub row: i32,
    pub owner: Option<PlayerId>,
    pub improvement: Option<Improvement>,
}
