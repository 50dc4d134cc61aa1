//! Game configuration: rules constants, player roster and world generation.
//!
//! Every field has a default, so a JSON file only needs to mention what it
//! changes.

use crate::board::PlayerId;
use crate::hex::HexGrid;
use crate::player::ResourceHand;
use crate::terrain::{NoiseParams, Rgb};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Claims a player may make per turn
pub const MAX_CLAIMS_PER_TURN: u32 = 1;

/// Score that ends the game at the end of a round
pub const POINTS_TO_WIN: u32 = 3;

/// Turn number at which the game ends on points
pub const MAX_TURNS: u32 = 20;

/// Resources each player starts with
pub const STARTING_RESOURCES: ResourceHand = ResourceHand {
    food: 10,
    wood: 10,
    stone: 10,
};

/// Largest roster a `PlayerId` can index
pub const MAX_PLAYERS: usize = PlayerId::MAX as usize + 1;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("At least one player is required")]
    NoPlayers,

    #[error("Too many players: {0} (max {})", MAX_PLAYERS)]
    TooManyPlayers(usize),

    #[error("World dimensions must be positive, got {width}x{height}")]
    EmptyWorld { width: usize, height: usize },

    #[error("Hex size must be positive, got {0}")]
    InvalidHexSize(f64),
}

/// Turn rules and roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub points_to_win: u32,
    pub max_turns: u32,
    pub max_claims_per_turn: u32,
    pub starting_resources: ResourceHand,
    /// One colour per player, in turn order
    pub players: Vec<Rgb>,
    /// Keep at most this many log entries (`None` keeps everything)
    pub log_capacity: Option<usize>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            points_to_win: POINTS_TO_WIN,
            max_turns: MAX_TURNS,
            max_claims_per_turn: MAX_CLAIMS_PER_TURN,
            starting_resources: STARTING_RESOURCES,
            players: vec![Rgb::new(200, 0, 0), Rgb::new(0, 0, 200)],
            log_capacity: None,
        }
    }
}

impl RulesConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players.is_empty() {
            return Err(ConfigError::NoPlayers);
        }
        if self.players.len() > MAX_PLAYERS {
            return Err(ConfigError::TooManyPlayers(self.players.len()));
        }
        Ok(())
    }
}

/// Terrain and geometry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
    /// Centre-to-corner hex size in pixels
    pub hex_size: f64,
    pub noise: NoiseParams,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 60,
            hex_size: HexGrid::DEFAULT_SIZE,
            noise: NoiseParams::default(),
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyWorld {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.hex_size.is_finite() && self.hex_size > 0.0) {
            return Err(ConfigError::InvalidHexSize(self.hex_size));
        }
        Ok(())
    }

    pub fn grid(&self) -> HexGrid {
        HexGrid::new(self.hex_size)
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rules: RulesConfig,
    pub world: WorldConfig,
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rules.validate()?;
        self.world.validate()
    }
}
