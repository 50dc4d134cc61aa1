//! Younger Dryas - a hex territory game engine
//!
//! This crate provides the core game logic for Younger Dryas, including:
//! - Flat-topped hex geometry and pixel <-> hex conversion
//! - Noise-generated terrain with biome classification
//! - Player state and the resource economy
//! - Turn-based rules engine with claim, build and victory logic
//!
//! # Architecture
//!
//! The engine has no rendering or input handling of its own. A presentation
//! layer translates screen positions through [`HexGrid`], calls the
//! [`GameState`] mutators, and re-reads state and the action log afterwards.
//! It can be compiled to:
//! - Native Rust, driven by the `dryas` command-line runner
//! - WebAssembly for a browser front end (feature `wasm`)
//!
//! # Modules
//!
//! - [`hex`]: Offset hex coordinates and pixel geometry
//! - [`terrain`]: Noise terrain and biome colours
//! - [`board`]: Improvements and the sparse hex-record store
//! - [`player`]: Resources and player state
//! - [`actions`]: Actions, events and the action log
//! - [`game`]: Game state machine
//! - [`world`]: Grid and terrain bundled for a presentation layer
//! - [`config`]: Rules and world configuration

pub mod actions;
pub mod board;
pub mod config;
pub mod game;
pub mod hex;
pub mod player;
pub mod terrain;
pub mod world;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{ActionKind, ActionLog, EventPayload, GameAction, GameEvent};
pub use board::{costs, Board, HexRecord, Improvement, PlayerId};
pub use config::{
    ConfigError, GameConfig, RulesConfig, WorldConfig, MAX_CLAIMS_PER_TURN, MAX_TURNS,
    POINTS_TO_WIN,
};
pub use game::{
    GamePhase, GameState, GameStateJson, RuleViolation, CLAIM_RADIUS, MIN_SETTLEMENT_SPACING,
    POINTS_PER_HEX,
};
pub use hex::{HexCoord, HexGrid};
pub use player::{Player, Resource, ResourceHand};
pub use terrain::{NoiseParams, Rgb, Terrain, TerrainType};
pub use world::World;
