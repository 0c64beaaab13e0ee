//! The single shared game and the serialization point for moves.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use thiserror::Error;

use skirmish_engine::game::{GameState, Snapshot};
use skirmish_engine::logger::{MatchLogger, MoveRecord};
use skirmish_engine::piece::{Direction, PieceId, Player};

use crate::hub::{ClientHub, ClientId};
use crate::protocol::ServerMessage;

#[derive(Debug, Error)]
pub enum RoomError {
    #[error("game state lock poisoned")]
    StatePoisoned,
    #[error("failed to open match log: {0}")]
    MatchLog(#[from] std::io::Error),
}

/// Owns the one shared [`GameState`] and applies moves to it one at a time.
///
/// The engine itself is not safe for concurrent callers; the mutex here is
/// the single-writer discipline the rules require. Readers only ever see
/// complete states because a snapshot is taken under the same lock.
pub struct GameRoom {
    state: Mutex<GameState>,
    hub: ClientHub,
    match_log: Option<Mutex<MatchLogger>>,
    started_at: DateTime<Utc>,
}

impl GameRoom {
    pub fn new(hub: ClientHub) -> Self {
        Self {
            state: Mutex::new(GameState::new()),
            hub,
            match_log: None,
            started_at: Utc::now(),
        }
    }

    /// A room that also appends every accepted move to a JSONL match log.
    pub fn with_match_log(hub: ClientHub, path: impl AsRef<Path>) -> Result<Self, RoomError> {
        let logger = MatchLogger::create(path)?;
        Ok(Self {
            state: Mutex::new(GameState::new()),
            hub,
            match_log: Some(Mutex::new(logger)),
            started_at: Utc::now(),
        })
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn snapshot(&self) -> Result<Snapshot, RoomError> {
        let state = self.state.lock().map_err(|_| RoomError::StatePoisoned)?;
        Ok(state.snapshot())
    }

    /// Apply one move request from a client.
    ///
    /// Identity tokens arrive as raw strings off the wire. Any parse or rule
    /// failure is relayed as an `error` message to the originating client
    /// only; an accepted move broadcasts an `update` (and `gameOver` when the
    /// move ends the game) to every connected client.
    pub fn process_move(
        &self,
        origin: &ClientId,
        player_id: &str,
        character: &str,
        direction: &str,
    ) -> Result<(), RoomError> {
        let parsed = Self::parse_request(player_id, character, direction);
        let (player, piece, direction) = match parsed {
            Ok(parts) => parts,
            Err(message) => {
                tracing::debug!(client_id = %origin, %message, "rejected malformed move");
                self.hub.send_to(origin, ServerMessage::Error { message });
                return Ok(());
            }
        };

        let mut state = self.state.lock().map_err(|_| RoomError::StatePoisoned)?;
        match state.attempt_move(player, piece, direction) {
            Ok(outcome) => {
                tracing::info!(
                    client_id = %origin,
                    %player,
                    piece = %piece,
                    %direction,
                    captured = ?outcome.captured.map(|p| p.label()),
                    "move applied"
                );

                self.record_move(player, piece, direction, &outcome);

                // Broadcast while still holding the state lock so updates
                // enter every client queue in application order. `try_send`
                // never blocks, so no client can stall the game from here.
                self.hub.broadcast(ServerMessage::Update {
                    game_state: state.snapshot(),
                });

                if let Some(verdict) = outcome.verdict {
                    let winner = verdict.winner();
                    tracing::info!(winner = ?winner, "game over");
                    self.hub.broadcast(ServerMessage::GameOver { winner });
                }
            }
            Err(err) => {
                tracing::debug!(
                    client_id = %origin,
                    %player,
                    piece = %piece,
                    %direction,
                    error = %err,
                    "move rejected"
                );
                self.hub.send_to(
                    origin,
                    ServerMessage::Error {
                        message: err.to_string(),
                    },
                );
            }
        }

        Ok(())
    }

    fn parse_request(
        player_id: &str,
        character: &str,
        direction: &str,
    ) -> Result<(Player, PieceId, Direction), String> {
        let player: Player = player_id.parse().map_err(|e| format!("{e}"))?;
        let piece: PieceId = character.parse().map_err(|e| format!("{e}"))?;
        let direction: Direction = direction.parse().map_err(|e| format!("{e}"))?;
        Ok((player, piece, direction))
    }

    // A log write failure must not undo an already-applied move, so it only
    // warns.
    fn record_move(
        &self,
        player: Player,
        piece: PieceId,
        direction: Direction,
        outcome: &skirmish_engine::game::MoveOutcome,
    ) {
        let Some(log) = &self.match_log else {
            return;
        };
        let Ok(mut logger) = log.lock() else {
            tracing::warn!("match log lock poisoned, skipping record");
            return;
        };
        let record = MoveRecord {
            seq: logger.next_seq(),
            player,
            piece: piece.label(),
            direction,
            captured: outcome.captured.map(|p| p.label()),
            winner: outcome.verdict.and_then(|v| v.winner()),
            ts: None,
        };
        if let Err(err) = logger.write(&record) {
            tracing::warn!(error = %err, "failed to append match log record");
        }
    }
}
