//! WebSocket lifecycle: register the client, push `init`, then relay moves.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use warp::ws::{Message, WebSocket};

use crate::hub::ClientHub;
use crate::protocol::ClientMessage;
use crate::protocol::ServerMessage;
use crate::room::GameRoom;

/// Drive one client connection to completion.
///
/// On upgrade the client gets a fresh uuid identity and an `init` snapshot;
/// after that every inbound `move` message is forwarded to the room, which
/// answers through the hub. Dropping the registration on exit removes the
/// client from the broadcast list.
pub async fn client_connected(socket: WebSocket, hub: ClientHub, room: Arc<GameRoom>) {
    let (socket_tx, mut socket_rx) = socket.split();

    let mut conn = hub.register();
    let client_id = conn.id().clone();

    // Move the hub receiver into the send pump; the connection handle stays
    // here so the registration lives until this task returns.
    let Some(receiver) = conn.take_receiver() else {
        return;
    };
    let pump_id = client_id.clone();
    tokio::spawn(async move {
        let outbound = ReceiverStream::new(receiver).map(|message| Ok(render(&message)));
        if let Err(err) = outbound.forward(socket_tx).await {
            tracing::debug!(client_id = %pump_id, error = %err, "send pump closed");
        }
    });

    match room.snapshot() {
        Ok(game_state) => {
            hub.send_to(&client_id, ServerMessage::Init { game_state });
        }
        Err(err) => {
            tracing::error!(client_id = %client_id, error = %err, "failed to snapshot for init");
            return;
        }
    }

    while let Some(incoming) = socket_rx.next().await {
        let message = match incoming {
            Ok(message) => message,
            Err(err) => {
                tracing::debug!(client_id = %client_id, error = %err, "websocket read error");
                break;
            }
        };
        if message.is_close() {
            break;
        }
        let Ok(text) = message.to_str() else {
            // Binary frames are not part of the protocol.
            continue;
        };

        match serde_json::from_str::<ClientMessage>(text) {
            Ok(ClientMessage::Move {
                player_id,
                character,
                direction,
            }) => {
                if let Err(err) = room.process_move(&client_id, &player_id, &character, &direction)
                {
                    tracing::error!(client_id = %client_id, error = %err, "room unavailable");
                    break;
                }
            }
            Err(err) => {
                tracing::warn!(
                    client_id = %client_id,
                    error = %err,
                    "ignoring unrecognized message"
                );
            }
        }
    }
    // `conn` drops here and unregisters the client.
}

fn render(message: &ServerMessage) -> Message {
    match serde_json::to_string(message) {
        Ok(json) => Message::text(json),
        Err(err) => {
            let fallback = serde_json::json!({
                "type": "error",
                "message": format!("failed to serialize server message: {err}"),
            })
            .to_string();
            Message::text(fallback)
        }
    }
}
