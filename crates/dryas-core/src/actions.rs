//! Game actions that players can take.
//!
//! This module defines the actions a caller can request, the events recorded
//! as a result, and the append-only log that keeps both a machine-readable and
//! a human-readable history.

use crate::board::{Improvement, PlayerId};
use crate::game::RuleViolation;
use crate::hex::HexCoord;
use crate::player::ResourceHand;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// All possible actions a player can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// Claim an unowned hex
    ClaimHex(HexCoord),
    /// Build an improvement on an owned hex
    BuildImprovement(HexCoord, Improvement),
    /// End your turn
    EndTurn,
}

impl GameAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            GameAction::ClaimHex(_) => ActionKind::ClaimHex,
            GameAction::BuildImprovement(..) => ActionKind::BuildImprovement,
            GameAction::EndTurn => ActionKind::EndTurn,
        }
    }
}

/// Category of a logged event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    ClaimHex,
    BuildImprovement,
    EndTurn,
}

/// Action-specific data attached to an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    /// A claim attempt
    Claim {
        coord: HexCoord,
        success: bool,
        reason: Option<RuleViolation>,
    },

    /// A build attempt
    Build {
        coord: HexCoord,
        improvement: Improvement,
        success: bool,
        reason: Option<RuleViolation>,
    },

    /// A turn ended and improvements paid out
    TurnEnded { resources_gained: ResourceHand },

    /// The game finished; `winner` is `None` for a tie
    GameOver {
        winner: Option<PlayerId>,
        points: Option<u32>,
    },
}

/// A recorded event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub action: ActionKind,
    pub player: PlayerId,
    /// Wall-clock time, for display and ordering only
    pub timestamp: DateTime<Utc>,
    pub turn_number: u32,
    pub payload: EventPayload,
}

/// Append-only pair of logs: structured events and the matching display lines.
///
/// Both sequences always have the same length. With a capacity set, the oldest
/// entries of both are dropped together once the cap is exceeded.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    events: VecDeque<GameEvent>,
    messages: VecDeque<String>,
    capacity: Option<usize>,
    recorded: usize,
}

impl ActionLog {
    /// Unbounded log
    pub fn new() -> Self {
        Self::default()
    }

    /// Log that keeps at most `capacity` entries (`None` for unbounded)
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Append one event and its display line
    pub fn record(&mut self, event: GameEvent, message: String) {
        self.events.push_back(event);
        self.messages.push_back(message);
        self.recorded += 1;

        if let Some(cap) = self.capacity {
            while self.events.len() > cap {
                self.events.pop_front();
                self.messages.pop_front();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Entries recorded since creation, including any dropped by the cap
    pub fn total_recorded(&self) -> usize {
        self.recorded
    }

    /// The last `count` display lines, most recent last
    pub fn recent(&self, count: usize) -> Vec<String> {
        let skip = self.messages.len().saturating_sub(count);
        self.messages.iter().skip(skip).cloned().collect()
    }

    pub fn events(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn messages(&self) -> impl Iterator<Item = &String> {
        self.messages.iter()
    }

    pub fn last_event(&self) -> Option<&GameEvent> {
        self.events.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end_turn_event(turn_number: u32) -> GameEvent {
        GameEvent {
            action: ActionKind::EndTurn,
            player: 0,
            timestamp: Utc::now(),
            turn_number,
            payload: EventPayload::TurnEnded {
                resources_gained: ResourceHand::new(),
            },
        }
    }

    #[test]
    fn test_recent_returns_most_recent_last() {
        let mut log = ActionLog::new();
        for i in 1..=7 {
            log.record(end_turn_event(i), format!("entry {i}"));
        }

        assert_eq!(log.recent(3), vec!["entry 5", "entry 6", "entry 7"]);
        assert_eq!(log.recent(100).len(), 7);
        assert!(log.recent(0).is_empty());
    }

    #[test]
    fn test_capacity_drops_oldest_from_both_logs() {
        let mut log = ActionLog::with_capacity(Some(2));
        for i in 1..=4 {
            log.record(end_turn_event(i), format!("entry {i}"));
        }

        assert_eq!(log.len(), 2);
        assert_eq!(log.total_recorded(), 4);
        assert_eq!(log.messages().count(), 2);
        assert_eq!(log.events().next().map(|e| e.turn_number), Some(3));
        assert_eq!(log.recent(5), vec!["entry 3", "entry 4"]);
    }

    #[test]
    fn test_action_kind() {
        let coord = HexCoord::new(1, 1);
        assert_eq!(GameAction::ClaimHex(coord).kind(), ActionKind::ClaimHex);
        assert_eq!(
            GameAction::BuildImprovement(coord, Improvement::Farm).kind(),
            ActionKind::BuildImprovement
        );
        assert_eq!(GameAction::EndTurn.kind(), ActionKind::EndTurn);
    }

    #[test]
    fn test_event_serializes_with_tagged_payload() {
        let event = end_turn_event(4);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["action"], "END_TURN");
        assert_eq!(json["payload"]["type"], "turn_ended");
        assert_eq!(json["turn_number"], 4);
    }
}
