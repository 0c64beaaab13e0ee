//! Wire messages exchanged with connected clients.
//!
//! Everything on the socket is JSON with a `type` discriminator. The shapes
//! mirror what the browser client renders: full state snapshots on `init`
//! and `update`, a bare message on `error`, and the winner token on
//! `gameOver`.

use serde::{Deserialize, Serialize};
use skirmish_engine::game::Snapshot;
use skirmish_engine::piece::Player;

/// Messages a client may send to the server.
///
/// Identity fields arrive as plain strings and are parsed into engine types
/// by the room, so a typo'd piece label turns into an `error` reply instead
/// of a dropped connection.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    Move {
        player_id: String,
        character: String,
        direction: String,
    },
}

/// Messages the server pushes to clients.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Full state, sent once to a client right after it connects.
    #[serde(rename_all = "camelCase")]
    Init { game_state: Snapshot },
    /// Full state, broadcast to everyone after each accepted move.
    #[serde(rename_all = "camelCase")]
    Update { game_state: Snapshot },
    /// Rejection notice, sent only to the client whose move failed.
    Error { message: String },
    /// Broadcast when a move ends the game. `winner` is `null` in the
    /// theoretical draw case.
    #[serde(rename_all = "camelCase")]
    GameOver { winner: Option<Player> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_engine::game::GameState;

    #[test]
    fn move_message_parses_from_client_json() {
        let json = r#"{"type":"move","playerId":"A","character":"PA1","direction":"F"}"#;
        let message: ClientMessage = serde_json::from_str(json).expect("parse");
        assert_eq!(
            message,
            ClientMessage::Move {
                player_id: "A".to_string(),
                character: "PA1".to_string(),
                direction: "F".to_string(),
            }
        );
    }

    #[test]
    fn server_messages_carry_wire_discriminators() {
        let snapshot = GameState::new().snapshot();

        let json = serde_json::to_value(ServerMessage::Init {
            game_state: snapshot.clone(),
        })
        .expect("serialize");
        assert_eq!(json["type"], "init");
        assert_eq!(json["gameState"]["currentTurn"], "A");

        let json = serde_json::to_value(ServerMessage::Update {
            game_state: snapshot,
        })
        .expect("serialize");
        assert_eq!(json["type"], "update");

        let json = serde_json::to_value(ServerMessage::Error {
            message: "It's not player B's turn.".to_string(),
        })
        .expect("serialize");
        assert_eq!(json["type"], "error");
        assert_eq!(json["message"], "It's not player B's turn.");

        let json = serde_json::to_value(ServerMessage::GameOver {
            winner: Some(Player::A),
        })
        .expect("serialize");
        assert_eq!(json["type"], "gameOver");
        assert_eq!(json["winner"], "A");
    }

    #[test]
    fn draw_serializes_winner_as_null() {
        let json =
            serde_json::to_value(ServerMessage::GameOver { winner: None }).expect("serialize");
        assert!(json["winner"].is_null());
    }
}
