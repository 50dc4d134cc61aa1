//! Core game state machine.
//!
//! This module contains the main `GameState` struct and all rules logic:
//! claiming, building, per-turn resource yield and victory evaluation.
//!
//! Every mutator re-validates before it touches anything, so a check and the
//! mutation it guards always happen as one step.

use crate::actions::{ActionKind, ActionLog, EventPayload, GameAction, GameEvent};
use crate::board::{Board, BoardJson, HexRecord, Improvement, PlayerId};
use crate::config::{ConfigError, RulesConfig};
use crate::hex::HexCoord;
use crate::player::{Player, ResourceHand};
use crate::terrain::Rgb;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Points for each owned hex
pub const POINTS_PER_HEX: u32 = 1;

/// Manhattan radius around an owned settlement inside which new hexes can be claimed
pub const CLAIM_RADIUS: u32 = 2;

/// Minimum Manhattan distance between two settlements of the same player
pub const MIN_SETTLEMENT_SPACING: u32 = 4;

/// Why a claim or build was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleViolation {
    #[error("game is over")]
    GameOver,

    #[error("no claims remaining this turn")]
    ClaimLimitReached,

    #[error("hex is already owned")]
    AlreadyOwned,

    #[error("no settlement within range")]
    NoSettlementInRange,

    #[error("must own the hex")]
    NotOwner,

    #[error("hex already has an improvement")]
    AlreadyImproved,

    #[error("insufficient resources")]
    InsufficientResources,

    #[error("too close to another settlement")]
    TooCloseToSettlement,
}

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Normal play
    Active,

    /// Game is over; `winner` is `None` for a tie
    GameOver { winner: Option<PlayerId> },
}

/// The complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// All players, in turn order
    pub players: Vec<Player>,
    /// Index of the player whose turn it is
    pub current_player: PlayerId,
    /// Current game phase
    pub phase: GamePhase,
    /// Round number (starts at 1, increments when play returns to player 0)
    pub turn_number: u32,
    board: Board,
    log: ActionLog,
    rules: RulesConfig,
}

impl GameState {
    /// Create a standard two-player game with the default rules
    pub fn new() -> Self {
        Self::build(RulesConfig::default())
    }

    /// Create a game with custom rules
    pub fn with_rules(rules: RulesConfig) -> Result<Self, ConfigError> {
        rules.validate()?;
        Ok(Self::build(rules))
    }

    fn build(rules: RulesConfig) -> Self {
        let players = rules
            .players
            .iter()
            .enumerate()
            .map(|(i, color)| Player::new(i as PlayerId, *color, rules.starting_resources))
            .collect();

        Self {
            players,
            current_player: 0,
            phase: GamePhase::Active,
            turn_number: 1,
            board: Board::new(),
            log: ActionLog::with_capacity(rules.log_capacity),
            rules,
        }
    }

    /// Rules this game was created with
    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Get the number of players
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Get a player by ID
    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(usize::from(id))
    }

    /// The player whose turn it is
    pub fn active_player(&self) -> &Player {
        &self.players[usize::from(self.current_player)]
    }

    fn active_player_mut(&mut self) -> &mut Player {
        &mut self.players[usize::from(self.current_player)]
    }

    /// Claims the active player may still make this turn
    pub fn claims_remaining(&self) -> u32 {
        self.rules
            .max_claims_per_turn
            .saturating_sub(self.active_player().claims_this_turn)
    }

    /// Check if the game is finished
    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver { .. })
    }

    /// The winner, if the game is finished and was not a tie
    pub fn winner(&self) -> Option<PlayerId> {
        match self.phase {
            GamePhase::GameOver { winner } => winner,
            GamePhase::Active => None,
        }
    }

    /// The hex-record store
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Record for a hex, created on first access
    pub fn get_hex(&mut self, coord: HexCoord) -> &HexRecord {
        self.board.get_or_create(coord)
    }

    /// Copy of the record for a hex without materialising it
    pub fn hex(&self, coord: HexCoord) -> HexRecord {
        self.board.record(coord)
    }

    /// Settlement hexes owned by a player
    pub fn settlements_of(&self, player: PlayerId) -> impl Iterator<Item = HexCoord> + '_ {
        self.get_player(player)
            .into_iter()
            .flat_map(|p| p.owned_hexes.iter().copied())
            .filter(move |coord| self.board.record(*coord).is_settlement_of(player))
    }

    fn has_settlement(&self, player: PlayerId) -> bool {
        self.settlements_of(player).next().is_some()
    }

    // ==================== Claiming ====================

    /// Why the active player may not claim `coord`, if anything
    pub fn check_claim(&self, coord: HexCoord) -> Result<(), RuleViolation> {
        if self.is_game_over() {
            return Err(RuleViolation::GameOver);
        }

        let player = self.active_player();
        if player.claims_this_turn >= self.rules.max_claims_per_turn {
            return Err(RuleViolation::ClaimLimitReached);
        }

        if self.board.record(coord).owner.is_some() {
            return Err(RuleViolation::AlreadyOwned);
        }

        // Before the first settlement anything unowned is fair game
        if !self.has_settlement(player.id) {
            return Ok(());
        }

        let in_range = coord
            .within_manhattan(CLAIM_RADIUS)
            .any(|nearby| self.board.record(nearby).is_settlement_of(player.id));
        if !in_range {
            return Err(RuleViolation::NoSettlementInRange);
        }

        Ok(())
    }

    /// Check if the active player can claim this hex
    pub fn can_claim(&self, coord: HexCoord) -> bool {
        self.check_claim(coord).is_ok()
    }

    /// Attempt to claim a hex for the active player
    pub fn claim_hex(&mut self, coord: HexCoord) -> bool {
        if let Err(reason) = self.check_claim(coord) {
            if reason != RuleViolation::GameOver {
                self.log_action(
                    ActionKind::ClaimHex,
                    format!("Failed to claim hex at {coord} - {reason}"),
                    EventPayload::Claim {
                        coord,
                        success: false,
                        reason: Some(reason),
                    },
                );
            }
            return false;
        }

        let player_id = self.current_player;
        self.board.set_owner(coord, player_id);
        let player = self.active_player_mut();
        player.owned_hexes.insert(coord);
        player.claims_this_turn += 1;

        self.log_action(
            ActionKind::ClaimHex,
            format!("Claimed hex at {coord}"),
            EventPayload::Claim {
                coord,
                success: true,
                reason: None,
            },
        );
        true
    }

    // ==================== Building ====================

    /// Why the active player may not build `improvement` on `coord`, if anything
    pub fn check_build(&self, coord: HexCoord, improvement: Improvement) -> Result<(), RuleViolation> {
        if self.is_game_over() {
            return Err(RuleViolation::GameOver);
        }

        let player = self.active_player();
        let record = self.board.record(coord);

        if !record.is_owned_by(player.id) {
            return Err(RuleViolation::NotOwner);
        }
        if !record.is_unimproved() {
            return Err(RuleViolation::AlreadyImproved);
        }
        if !player.resources.can_afford(improvement.cost()) {
            return Err(RuleViolation::InsufficientResources);
        }

        if improvement == Improvement::Settlement
            && self
                .settlements_of(player.id)
                .any(|existing| existing.manhattan_distance(&coord) < MIN_SETTLEMENT_SPACING)
        {
            return Err(RuleViolation::TooCloseToSettlement);
        }

        Ok(())
    }

    /// Check if the active player can build the improvement here
    pub fn can_build(&self, coord: HexCoord, improvement: Improvement) -> bool {
        self.check_build(coord, improvement).is_ok()
    }

    /// Attempt to build an improvement on a hex
    pub fn build_improvement(&mut self, coord: HexCoord, improvement: Improvement) -> bool {
        if let Err(reason) = self.check_build(coord, improvement) {
            if reason != RuleViolation::GameOver {
                self.log_build_failure(coord, improvement, reason);
            }
            return false;
        }

        if !self.active_player_mut().resources.try_spend(improvement.cost()) {
            self.log_build_failure(coord, improvement, RuleViolation::InsufficientResources);
            return false;
        }

        self.board.place_improvement(coord, improvement);

        self.log_action(
            ActionKind::BuildImprovement,
            format!("Built {improvement} at {coord}"),
            EventPayload::Build {
                coord,
                improvement,
                success: true,
                reason: None,
            },
        );
        true
    }

    fn log_build_failure(&mut self, coord: HexCoord, improvement: Improvement, reason: RuleViolation) {
        self.log_action(
            ActionKind::BuildImprovement,
            format!("Failed to build {improvement} at {coord} - {reason}"),
            EventPayload::Build {
                coord,
                improvement,
                success: false,
                reason: Some(reason),
            },
        );
    }

    // ==================== Turn Management ====================

    /// End the active player's turn.
    ///
    /// Pays out improvement yields, hands play to the next player and, when
    /// play returns to player 0, advances the round and evaluates victory.
    pub fn end_turn(&mut self) {
        if self.is_game_over() {
            return;
        }

        let gained = self.pending_yield(self.current_player);
        self.active_player_mut().resources.add_hand(&gained);

        self.log_action(
            ActionKind::EndTurn,
            format!("Ended turn, gained resources: {gained}"),
            EventPayload::TurnEnded {
                resources_gained: gained,
            },
        );

        self.active_player_mut().end_turn();

        let next = (usize::from(self.current_player) + 1) % self.player_count();
        self.current_player = next as PlayerId;

        if self.current_player == 0 {
            self.turn_number += 1;
            self.check_round_end();
        }
    }

    /// Resources a player's improvements will produce at the end of their turn
    pub fn pending_yield(&self, player: PlayerId) -> ResourceHand {
        let mut gained = ResourceHand::new();
        if let Some(p) = self.get_player(player) {
            for coord in &p.owned_hexes {
                if let Some(improvement) = self.board.record(*coord).improvement {
                    gained.add_all(improvement.yield_per_turn());
                }
            }
        }
        gained
    }

    // ==================== Scoring ====================

    /// Score for a player: territory plus improvements
    pub fn calculate_points(&self, player: PlayerId) -> u32 {
        let Some(p) = self.get_player(player) else {
            return 0;
        };

        let territory = p.owned_hexes.len() as u32 * POINTS_PER_HEX;
        let improvements: u32 = p
            .owned_hexes
            .iter()
            .filter_map(|coord| self.board.record(*coord).improvement)
            .map(|improvement| improvement.points())
            .sum();

        territory + improvements
    }

    /// Scores of every player, indexed by player id
    pub fn scores(&self) -> Vec<u32> {
        (0..self.player_count())
            .map(|i| self.calculate_points(i as PlayerId))
            .collect()
    }

    /// Decide whether the round that just ended finishes the game.
    ///
    /// `None` means play continues; `Some(winner)` means the game is over with
    /// that winner (`Some(None)` is a tie).
    fn round_outcome(&self) -> Option<Option<PlayerId>> {
        let scores = self.scores();

        // Players are checked in turn order, so the earliest seat takes a shared threshold
        if let Some(id) = scores.iter().position(|&s| s >= self.rules.points_to_win) {
            return Some(Some(id as PlayerId));
        }

        if self.turn_number >= self.rules.max_turns {
            let best = scores.iter().copied().max().unwrap_or(0);
            let mut leaders = scores
                .iter()
                .enumerate()
                .filter(|&(_, &s)| s == best)
                .map(|(i, _)| i as PlayerId);
            let winner = match (leaders.next(), leaders.next()) {
                (Some(only), None) => Some(only),
                _ => None,
            };
            return Some(winner);
        }

        None
    }

    fn check_round_end(&mut self) {
        let Some(winner) = self.round_outcome() else {
            return;
        };

        self.phase = GamePhase::GameOver { winner };

        match winner {
            Some(id) => {
                let points = self.calculate_points(id);
                self.log_action(
                    ActionKind::EndTurn,
                    format!("Game Over! Player {} wins with {points} points!", u32::from(id) + 1),
                    EventPayload::GameOver {
                        winner: Some(id),
                        points: Some(points),
                    },
                );
            }
            None => {
                self.log_action(
                    ActionKind::EndTurn,
                    "Game Over! It's a tie!".to_string(),
                    EventPayload::GameOver {
                        winner: None,
                        points: None,
                    },
                );
            }
        }
    }

    // ==================== Actions ====================

    /// Apply an action for the active player; returns whether it took effect
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::ClaimHex(coord) => self.claim_hex(coord),
            GameAction::BuildImprovement(coord, improvement) => {
                self.build_improvement(coord, improvement)
            }
            GameAction::EndTurn => {
                if self.is_game_over() {
                    return false;
                }
                self.end_turn();
                true
            }
        }
    }

    /// Actions the active player could take with `coord` selected
    pub fn valid_actions(&self, coord: HexCoord) -> Vec<GameAction> {
        let mut actions = Vec::new();
        if self.is_game_over() {
            return actions;
        }

        if self.can_claim(coord) {
            actions.push(GameAction::ClaimHex(coord));
        }
        for improvement in Improvement::ALL {
            if self.can_build(coord, improvement) {
                actions.push(GameAction::BuildImprovement(coord, improvement));
            }
        }
        actions.push(GameAction::EndTurn);

        actions
    }

    // ==================== Log ====================

    fn log_action(&mut self, action: ActionKind, message: String, payload: EventPayload) {
        let player = self.current_player;
        let line = format!(
            "Turn {} - Player {}: {message}",
            self.turn_number,
            u32::from(player) + 1
        );
        self.log.record(
            GameEvent {
                action,
                player,
                timestamp: Utc::now(),
                turn_number: self.turn_number,
                payload,
            },
            line,
        );
    }

    /// The last `count` log lines, most recent last
    pub fn recent_logs(&self, count: usize) -> Vec<String> {
        self.log.recent(count)
    }

    /// Full event and message log
    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    // ==================== Snapshot ====================

    /// JSON-friendly snapshot of the whole state
    pub fn to_json(&self) -> GameStateJson {
        GameStateJson {
            players: self
                .players
                .iter()
                .map(|p| {
                    let mut owned_hexes: Vec<HexCoord> = p.owned_hexes.iter().copied().collect();
                    owned_hexes.sort();
                    PlayerJson {
                        id: p.id,
                        color: p.color,
                        resources: p.resources,
                        owned_hexes,
                        claims_this_turn: p.claims_this_turn,
                        points: self.calculate_points(p.id),
                    }
                })
                .collect(),
            current_player: self.current_player,
            turn_number: self.turn_number,
            phase: self.phase,
            board: self.board.to_json(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialisable snapshot of a `GameState`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateJson {
    pub players: Vec<PlayerJson>,
    pub current_player: PlayerId,
    pub turn_number: u32,
    pub phase: GamePhase,
    pub board: BoardJson,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerJson {
    pub id: PlayerId,
    pub color: Rgb,
    pub resources: ResourceHand,
    pub owned_hexes: Vec<HexCoord>,
    pub claims_this_turn: u32,
    pub points: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn game_with(points_to_win: u32, max_turns: u32) -> GameState {
        GameState::with_rules(RulesConfig {
            points_to_win,
            max_turns,
            ..RulesConfig::default()
        })
        .unwrap()
    }

    /// End turns until it's `player`'s turn again
    fn pass_to(game: &mut GameState, player: PlayerId) {
        game.end_turn();
        while game.current_player != player && !game.is_game_over() {
            game.end_turn();
        }
    }

    #[test]
    fn test_new_game() {
        let game = GameState::new();
        assert_eq!(game.turn_number, 1);
        assert_eq!(game.current_player, 0);
        assert_eq!(game.phase, GamePhase::Active);
        assert_eq!(game.player_count(), 2);
        assert_eq!(game.players[0].resources, ResourceHand::with_amounts(10, 10, 10));
        assert_eq!(game.players[0].color, Rgb::new(200, 0, 0));
        assert_eq!(game.players[1].color, Rgb::new(0, 0, 200));
    }

    #[test]
    fn test_with_rules_rejects_empty_roster() {
        let rules = RulesConfig {
            players: Vec::new(),
            ..RulesConfig::default()
        };
        assert!(matches!(GameState::with_rules(rules), Err(ConfigError::NoPlayers)));
    }

    #[test]
    fn test_first_claim_anywhere() {
        let mut game = GameState::new();
        assert!(game.can_claim(HexCoord::new(-37, 112)));
        assert!(game.claim_hex(HexCoord::new(-37, 112)));
        assert_eq!(game.hex(HexCoord::new(-37, 112)).owner, Some(0));
        assert!(game.players[0].owns(&HexCoord::new(-37, 112)));
    }

    #[test]
    fn test_claim_limit() {
        let mut game = game_with(100, 100);
        assert!(game.claim_hex(HexCoord::new(0, 0)));
        assert_eq!(game.claims_remaining(), 0);
        assert_eq!(game.check_claim(HexCoord::new(5, 5)), Err(RuleViolation::ClaimLimitReached));
        assert!(!game.claim_hex(HexCoord::new(5, 5)));

        pass_to(&mut game, 0);
        assert_eq!(game.claims_remaining(), 1);
        assert!(game.claim_hex(HexCoord::new(5, 5)));
    }

    #[test]
    fn test_claim_owned_hex_fails() {
        let mut game = game_with(100, 100);
        assert!(game.claim_hex(HexCoord::new(2, 2)));
        game.end_turn();

        assert_eq!(game.check_claim(HexCoord::new(2, 2)), Err(RuleViolation::AlreadyOwned));
        assert!(!game.claim_hex(HexCoord::new(2, 2)));
        assert_eq!(game.hex(HexCoord::new(2, 2)).owner, Some(0));
    }

    #[test]
    fn test_claim_range_after_settlement() {
        let mut game = game_with(100, 100);
        assert!(game.claim_hex(HexCoord::new(0, 0)));
        assert!(game.build_improvement(HexCoord::new(0, 0), Improvement::Settlement));

        pass_to(&mut game, 0);
        assert!(game.can_claim(HexCoord::new(1, 1)));
        assert!(game.can_claim(HexCoord::new(0, -2)));
        assert_eq!(
            game.check_claim(HexCoord::new(2, 1)),
            Err(RuleViolation::NoSettlementInRange)
        );
        assert_eq!(
            game.check_claim(HexCoord::new(40, 0)),
            Err(RuleViolation::NoSettlementInRange)
        );
    }

    #[test]
    fn test_opponent_settlement_does_not_extend_range() {
        let mut game = game_with(100, 100);
        assert!(game.claim_hex(HexCoord::new(0, 0)));
        assert!(game.build_improvement(HexCoord::new(0, 0), Improvement::Settlement));
        game.end_turn();

        assert!(game.claim_hex(HexCoord::new(20, 20)));
        assert!(game.build_improvement(HexCoord::new(20, 20), Improvement::Settlement));
        pass_to(&mut game, 1);

        assert_eq!(
            game.check_claim(HexCoord::new(1, 0)),
            Err(RuleViolation::NoSettlementInRange)
        );
        assert!(game.can_claim(HexCoord::new(21, 20)));
    }

    #[test]
    fn test_claim_range_at_plane_edges() {
        let mut game = game_with(100, 100);
        assert!(game.claim_hex(HexCoord::new(i32::MIN + 1, 0)));
        assert!(game.build_improvement(HexCoord::new(i32::MIN + 1, 0), Improvement::Settlement));
        pass_to(&mut game, 0);

        assert_eq!(
            game.check_claim(HexCoord::new(i32::MAX, 0)),
            Err(RuleViolation::NoSettlementInRange)
        );
        assert!(game.can_claim(HexCoord::new(i32::MIN, 0)));
        assert!(game.claim_hex(HexCoord::new(i32::MIN, 1)));
    }

    #[test]
    fn test_settlement_spacing_at_plane_corners() {
        let low = HexCoord::new(i32::MIN, i32::MIN);
        let high = HexCoord::new(i32::MAX, i32::MAX);

        let mut game = game_with(100, 100);
        assert!(game.claim_hex(low));
        pass_to(&mut game, 0);
        assert!(game.claim_hex(high));

        assert!(game.build_improvement(low, Improvement::Settlement));
        assert_eq!(game.check_build(high, Improvement::Settlement), Ok(()));
        assert!(game.build_improvement(high, Improvement::Settlement));
        assert_eq!(game.settlements_of(0).count(), 2);
    }

    #[test]
    fn test_build_requires_ownership() {
        let mut game = GameState::new();
        assert_eq!(
            game.check_build(HexCoord::new(0, 0), Improvement::Farm),
            Err(RuleViolation::NotOwner)
        );
        assert!(!game.build_improvement(HexCoord::new(0, 0), Improvement::Farm));
        assert_eq!(game.players[0].resources, ResourceHand::with_amounts(10, 10, 10));
    }

    #[test]
    fn test_build_deducts_exact_cost() {
        let mut game = game_with(100, 100);
        assert!(game.claim_hex(HexCoord::new(0, 0)));
        assert!(game.build_improvement(HexCoord::new(0, 0), Improvement::Quarry));

        assert_eq!(game.players[0].resources, ResourceHand::with_amounts(10, 8, 9));
        assert_eq!(game.hex(HexCoord::new(0, 0)).improvement, Some(Improvement::Quarry));
    }

    #[test]
    fn test_one_improvement_per_hex() {
        let mut game = game_with(100, 100);
        assert!(game.claim_hex(HexCoord::new(0, 0)));
        assert!(game.build_improvement(HexCoord::new(0, 0), Improvement::Farm));

        assert_eq!(
            game.check_build(HexCoord::new(0, 0), Improvement::Quarry),
            Err(RuleViolation::AlreadyImproved)
        );
        assert!(!game.build_improvement(HexCoord::new(0, 0), Improvement::Quarry));
        assert_eq!(game.players[0].resources, ResourceHand::with_amounts(10, 8, 10));
    }

    #[test]
    fn test_insufficient_resources_leaves_hand_untouched() {
        let mut game = game_with(100, 100);
        assert!(game.claim_hex(HexCoord::new(0, 0)));
        game.players[0].resources = ResourceHand::with_amounts(2, 4, 3);

        assert_eq!(
            game.check_build(HexCoord::new(0, 0), Improvement::Settlement),
            Err(RuleViolation::InsufficientResources)
        );
        assert!(!game.build_improvement(HexCoord::new(0, 0), Improvement::Settlement));
        assert_eq!(game.players[0].resources, ResourceHand::with_amounts(2, 4, 3));
        assert_eq!(game.hex(HexCoord::new(0, 0)).improvement, None);
    }

    #[test]
    fn test_failures_are_logged_with_reason() {
        let mut game = GameState::new();
        assert!(!game.build_improvement(HexCoord::new(3, 3), Improvement::Farm));
        assert!(game.claim_hex(HexCoord::new(3, 3)));
        assert!(!game.claim_hex(HexCoord::new(4, 4)));

        assert_eq!(
            game.recent_logs(3),
            vec![
                "Turn 1 - Player 1: Failed to build farm at (3, 3) - must own the hex",
                "Turn 1 - Player 1: Claimed hex at (3, 3)",
                "Turn 1 - Player 1: Failed to claim hex at (4, 4) - no claims remaining this turn",
            ]
        );

        let last = game.log().last_event().unwrap();
        assert_eq!(last.action, ActionKind::ClaimHex);
        assert_eq!(
            last.payload,
            EventPayload::Claim {
                coord: HexCoord::new(4, 4),
                success: false,
                reason: Some(RuleViolation::ClaimLimitReached),
            }
        );
    }

    #[test]
    fn test_end_turn_pays_yield_and_logs() {
        let mut game = game_with(100, 100);
        assert!(game.claim_hex(HexCoord::new(0, 0)));
        assert!(game.build_improvement(HexCoord::new(0, 0), Improvement::LumberCamp));
        assert_eq!(game.pending_yield(0), ResourceHand::with_amounts(0, 2, 0));

        game.end_turn();
        assert_eq!(game.players[0].resources, ResourceHand::with_amounts(10, 9, 10));
        assert_eq!(game.players[0].claims_this_turn, 0);
        assert_eq!(game.current_player, 1);
        assert_eq!(game.turn_number, 1);
        assert_eq!(
            game.recent_logs(1),
            vec!["Turn 1 - Player 1: Ended turn, gained resources: 2 wood"]
        );
    }

    #[test]
    fn test_turn_number_advances_on_wrap_only() {
        let rules = RulesConfig {
            points_to_win: 100,
            players: vec![Rgb::new(1, 1, 1), Rgb::new(2, 2, 2), Rgb::new(3, 3, 3)],
            ..RulesConfig::default()
        };
        let mut game = GameState::with_rules(rules).unwrap();

        game.end_turn();
        game.end_turn();
        assert_eq!((game.current_player, game.turn_number), (2, 1));
        game.end_turn();
        assert_eq!((game.current_player, game.turn_number), (0, 2));
    }

    #[test]
    fn test_calculate_points() {
        let mut game = game_with(100, 100);
        assert!(game.claim_hex(HexCoord::new(0, 0)));
        assert!(game.build_improvement(HexCoord::new(0, 0), Improvement::Farm));
        pass_to(&mut game, 0);
        assert!(game.claim_hex(HexCoord::new(1, 0)));

        assert_eq!(game.calculate_points(0), 2 + 2);
        assert_eq!(game.calculate_points(1), 0);
        assert_eq!(game.calculate_points(9), 0);
        assert_eq!(game.scores(), vec![4, 0]);
    }

    #[test]
    fn test_victory_waits_for_round_end() {
        let mut game = GameState::new();
        assert!(game.claim_hex(HexCoord::new(0, 0)));
        assert!(game.build_improvement(HexCoord::new(0, 0), Improvement::Settlement));
        assert_eq!(game.calculate_points(0), 6);

        game.end_turn();
        assert!(!game.is_game_over());

        game.end_turn();
        assert!(game.is_game_over());
        assert_eq!(game.winner(), Some(0));
        assert_eq!(game.turn_number, 2);
        assert_eq!(
            game.recent_logs(1),
            vec!["Turn 2 - Player 1: Game Over! Player 1 wins with 6 points!"]
        );
    }

    #[test]
    fn test_threshold_tie_goes_to_first_seat() {
        let mut game = game_with(1, 100);
        assert!(game.claim_hex(HexCoord::new(0, 0)));
        game.end_turn();
        assert!(game.claim_hex(HexCoord::new(9, 9)));
        game.end_turn();

        assert_eq!(game.phase, GamePhase::GameOver { winner: Some(0) });
    }

    #[test]
    fn test_turn_cap_highest_score_wins() {
        let mut game = game_with(100, 2);
        game.end_turn();
        assert!(game.claim_hex(HexCoord::new(0, 0)));
        game.end_turn();

        assert_eq!(game.phase, GamePhase::GameOver { winner: Some(1) });
    }

    #[test]
    fn test_turn_cap_tie_has_no_winner() {
        let mut game = game_with(100, 2);
        game.end_turn();
        game.end_turn();

        assert!(game.is_game_over());
        assert_eq!(game.winner(), None);
        assert_eq!(game.recent_logs(1), vec!["Turn 2 - Player 1: Game Over! It's a tie!"]);
    }

    #[test]
    fn test_no_mutation_after_game_over() {
        let mut game = game_with(100, 2);
        game.end_turn();
        game.end_turn();
        assert!(game.is_game_over());

        let log_len = game.log().len();
        let turn = game.turn_number;

        assert!(!game.can_claim(HexCoord::new(0, 0)));
        assert!(!game.claim_hex(HexCoord::new(0, 0)));
        assert!(!game.build_improvement(HexCoord::new(0, 0), Improvement::Farm));
        assert!(!game.apply_action(GameAction::EndTurn));
        game.end_turn();

        assert_eq!(game.log().len(), log_len);
        assert_eq!(game.turn_number, turn);
        assert_eq!(game.current_player, 0);
        assert!(game.valid_actions(HexCoord::new(0, 0)).is_empty());
    }

    #[test]
    fn test_get_hex_creates_record() {
        let mut game = GameState::new();
        assert!(game.board().is_empty());
        assert_eq!(*game.get_hex(HexCoord::new(7, -3)), HexRecord::default());
        assert_eq!(game.board().len(), 1);
    }

    #[test]
    fn test_valid_actions() {
        let mut game = GameState::new();
        let coord = HexCoord::new(0, 0);
        assert_eq!(
            game.valid_actions(coord),
            vec![GameAction::ClaimHex(coord), GameAction::EndTurn]
        );

        assert!(game.apply_action(GameAction::ClaimHex(coord)));
        let actions = game.valid_actions(coord);
        assert_eq!(actions.len(), Improvement::ALL.len() + 1);
        assert!(actions.contains(&GameAction::BuildImprovement(coord, Improvement::Settlement)));
    }

    #[test]
    fn test_snapshot() {
        let mut game = GameState::new();
        assert!(game.claim_hex(HexCoord::new(1, 2)));

        let json = game.to_json();
        assert_eq!(json.players[0].owned_hexes, vec![HexCoord::new(1, 2)]);
        assert_eq!(json.players[0].points, 1);
        assert_eq!(json.board.hexes.len(), 1);

        let text = serde_json::to_string(&json).unwrap();
        let back: GameStateJson = serde_json::from_str(&text).unwrap();
        assert_eq!(back, json);
    }
}
