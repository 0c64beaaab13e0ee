//! Room behavior: single-writer move processing and message fan-out.

use skirmish_web::{ClientHub, GameRoom, ServerMessage};

/// Scripted sequence in which Player A captures all three of B's pieces.
/// Every move is legal for the mover whose turn it is.
const ROUT_OF_B: [(&str, &str, &str); 11] = [
    ("A", "PA1", "F"),
    ("B", "PB1", "F"),
    ("A", "PA1", "F"),
    ("B", "PB1", "R"),
    ("A", "PA1", "R"),
    ("B", "HB2", "FR"),
    ("A", "PA1", "F"),  // captures PB1
    ("B", "HB2", "BL"),
    ("A", "PA1", "F"),  // captures HB1
    ("B", "HB2", "FR"),
    ("A", "HA2", "FR"), // captures HB2, game over
];

fn drain(conn: &mut skirmish_web::ClientConnection) -> Vec<ServerMessage> {
    let mut messages = Vec::new();
    while let Some(message) = conn.try_recv() {
        messages.push(message);
    }
    messages
}

#[test]
fn accepted_move_broadcasts_update_to_all_clients() {
    let hub = ClientHub::new();
    let room = GameRoom::new(hub.clone());
    let mut first = hub.register();
    let mut second = hub.register();
    let origin = first.id().clone();

    room.process_move(&origin, "A", "PA1", "F").expect("room ok");

    for conn in [&mut first, &mut second] {
        let messages = drain(conn);
        assert_eq!(messages.len(), 1);
        match &messages[0] {
            ServerMessage::Update { game_state } => {
                assert_eq!(game_state.move_history, ["A's PA1 moved F"]);
                assert_eq!(game_state.board[3][0].as_deref(), Some("PA1"));
            }
            other => panic!("expected update, got {other:?}"),
        }
    }
}

#[test]
fn rejected_move_errors_only_the_origin() {
    let hub = ClientHub::new();
    let room = GameRoom::new(hub.clone());
    let mut offender = hub.register();
    let mut bystander = hub.register();
    let origin = offender.id().clone();

    room.process_move(&origin, "B", "PB1", "F").expect("room ok");

    let messages = drain(&mut offender);
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages[0],
        ServerMessage::Error {
            message: "It's not player B's turn.".to_string(),
        }
    );
    assert!(drain(&mut bystander).is_empty());
}

#[test]
fn malformed_tokens_become_error_replies() {
    let hub = ClientHub::new();
    let room = GameRoom::new(hub.clone());
    let mut conn = hub.register();
    let origin = conn.id().clone();

    room.process_move(&origin, "C", "PA1", "F").expect("room ok");
    room.process_move(&origin, "A", "XX9", "F").expect("room ok");
    room.process_move(&origin, "A", "PA1", "NE").expect("room ok");

    let messages = drain(&mut conn);
    let texts: Vec<String> = messages
        .into_iter()
        .map(|m| match m {
            ServerMessage::Error { message } => message,
            other => panic!("expected error, got {other:?}"),
        })
        .collect();
    assert_eq!(
        texts,
        [
            "Unknown player: C",
            "Unknown character: XX9",
            "Invalid direction: NE",
        ]
    );
}

#[test]
fn finishing_the_game_broadcasts_game_over() {
    let hub = ClientHub::new();
    let room = GameRoom::new(hub.clone());
    let mut conn = hub.register();
    let origin = conn.id().clone();

    for (player, piece, direction) in ROUT_OF_B {
        room.process_move(&origin, player, piece, direction).expect("room ok");
    }

    let messages = drain(&mut conn);
    // One update per accepted move, then the game-over notice.
    assert_eq!(messages.len(), ROUT_OF_B.len() + 1);
    for message in &messages[..ROUT_OF_B.len()] {
        assert!(matches!(message, ServerMessage::Update { .. }));
    }
    assert_eq!(
        messages[ROUT_OF_B.len()],
        ServerMessage::GameOver {
            winner: Some(skirmish_engine::piece::Player::A),
        }
    );

    // The final board holds only A's pieces.
    if let ServerMessage::Update { game_state } = &messages[ROUT_OF_B.len() - 1] {
        let survivors: Vec<&str> = game_state
            .board
            .iter()
            .flatten()
            .filter_map(|cell| cell.as_deref())
            .collect();
        assert_eq!(survivors.len(), 3);
        assert!(survivors.iter().all(|label| label.contains('A')));
    } else {
        panic!("last update missing");
    }

    // Concluded games refuse further moves.
    room.process_move(&origin, "B", "PB1", "F").expect("room ok");
    let messages = drain(&mut conn);
    assert_eq!(
        messages,
        [ServerMessage::Error {
            message: "The game has concluded; no further moves are accepted.".to_string(),
        }]
    );
}

#[test]
fn concurrent_moves_broadcast_in_application_order() {
    use std::sync::Arc;
    use std::thread;

    let hub = ClientHub::new();
    let room = Arc::new(GameRoom::new(hub.clone()));
    let mut viewer = hub.register();

    // Both sides hammer the room from separate threads. Out-of-turn and
    // out-of-bounds attempts bounce as errors to the (unregistered) origin;
    // whichever attempts land produce updates the viewer must see in
    // application order.
    let mut workers = Vec::new();
    for (player, piece) in [("A", "PA1"), ("B", "PB1")] {
        let room = Arc::clone(&room);
        let origin = format!("worker-{player}");
        workers.push(thread::spawn(move || {
            for _ in 0..20 {
                room.process_move(&origin, player, piece, "F").expect("room ok");
                room.process_move(&origin, player, piece, "B").expect("room ok");
            }
        }));
    }
    for worker in workers {
        worker.join().expect("worker thread");
    }

    // Each update extends the history of the one before it by exactly one
    // entry; a stale snapshot would shrink or diverge.
    let mut previous: Vec<String> = Vec::new();
    let mut updates = 0;
    while let Some(message) = viewer.try_recv() {
        let ServerMessage::Update { game_state } = message else {
            panic!("viewer received {message:?}");
        };
        assert_eq!(game_state.move_history.len(), previous.len() + 1);
        assert_eq!(game_state.move_history[..previous.len()], previous[..]);
        previous = game_state.move_history;
        updates += 1;
    }
    assert!(updates > 0, "no move was ever accepted");
}

#[test]
fn match_log_records_accepted_moves() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("match.jsonl");
    let hub = ClientHub::new();
    let room = GameRoom::with_match_log(hub.clone(), &path).expect("room with log");
    let mut conn = hub.register();
    let origin = conn.id().clone();

    room.process_move(&origin, "A", "PA1", "F").expect("room ok");
    room.process_move(&origin, "B", "PB1", "F").expect("room ok");
    // Rejected moves are not recorded.
    room.process_move(&origin, "B", "PB1", "F").expect("room ok");
    drain(&mut conn);

    let contents = std::fs::read_to_string(&path).expect("read log");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    let first: serde_json::Value = serde_json::from_str(lines[0]).expect("parse");
    assert_eq!(first["seq"], 1);
    assert_eq!(first["player"], "A");
    assert_eq!(first["piece"], "PA1");
}
