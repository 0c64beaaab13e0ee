//! # skirmish-engine: Grid Skirmish Rule Engine
//!
//! The authoritative rule engine for a two-player, turn-based skirmish on a
//! 5x5 grid. Each side fields a fixed three-piece roster (a pawn and two
//! heroes) that moves and captures by per-archetype rules; the engine owns
//! the board, the turn token, the move log, and win detection.
//!
//! ## Core Modules
//!
//! - [`board`] - The 5x5 grid, squares, and occupancy
//! - [`piece`] - Players, archetypes, piece identity, and direction codes
//! - [`rules`] - Direction vocabulary and move-shape geometry per archetype
//! - [`game`] - Game state, `attempt_move`, and win detection
//! - [`logger`] - History formatting and JSONL match recording
//! - [`errors`] - Rejection reasons for proposed moves
//!
//! ## Quick Start
//!
//! ```rust
//! use skirmish_engine::game::GameState;
//! use skirmish_engine::piece::{Direction, PieceId, Player};
//!
//! let mut game = GameState::new();
//!
//! // Player A opens by pushing the pawn forward from (4,0) to (3,0).
//! let outcome = game
//!     .attempt_move(Player::A, PieceId::pawn(Player::A), Direction::F)
//!     .expect("legal opening move");
//!
//! assert!(outcome.captured.is_none());
//! assert_eq!(game.current_turn(), Player::B);
//! assert_eq!(game.move_history(), ["A's PA1 moved F"]);
//! ```
//!
//! ## Concurrency
//!
//! `attempt_move` is a synchronous, non-blocking computation over in-memory
//! state and never suspends. The engine provides no locking; a transport
//! layer sharing one [`game::GameState`] across connections must serialize
//! moves through a single writer.

pub mod board;
pub mod errors;
pub mod game;
pub mod logger;
pub mod piece;
pub mod rules;
