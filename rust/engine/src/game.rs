use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Square};
use crate::errors::MoveError;
use crate::logger::format_history_entry;
use crate::piece::{Direction, PieceId, Player};
use crate::rules;

/// Lifecycle phase of a game.
///
/// A game starts `InProgress` and flips to `Concluded` when one side loses
/// its last board piece; once concluded no further moves are accepted.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    InProgress,
    /// `winner` is `None` only in the theoretical double-elimination case,
    /// which normal play cannot produce (the mover's own piece always
    /// survives its own move).
    Concluded { winner: Option<Player> },
}

/// Result of a successful move.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MoveOutcome {
    /// The opposing piece removed from the board, if the move captured.
    pub captured: Option<PieceId>,
    /// Set when this move ended the game.
    pub verdict: Option<Verdict>,
}

/// How a concluded game ended.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Verdict {
    Winner(Player),
    /// Both rosters empty at once. Unreachable through `attempt_move` and
    /// untested in practice; representable so the win rule stays total.
    Draw,
}

impl Verdict {
    pub fn winner(self) -> Option<Player> {
        match self {
            Verdict::Winner(player) => Some(player),
            Verdict::Draw => None,
        }
    }
}

/// Authoritative state of one game: the board, whose turn it is, both
/// rosters, and the append-only move log.
///
/// The engine is synchronous and single-threaded; callers that share a
/// `GameState` across tasks must serialize access themselves.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    current_turn: Player,
    rosters: [[PieceId; 3]; 2],
    move_history: Vec<String>,
    phase: Phase,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// A fresh game with the canonical placement: each side's pawn, lancer,
    /// and shade on its back rank at columns 0, 1, 2. Player A moves first.
    pub fn new() -> GameState {
        let placements = [
            (PieceId::pawn(Player::A), (4, 0)),
            (PieceId::lancer(Player::A), (4, 1)),
            (PieceId::shade(Player::A), (4, 2)),
            (PieceId::pawn(Player::B), (0, 0)),
            (PieceId::lancer(Player::B), (0, 1)),
            (PieceId::shade(Player::B), (0, 2)),
        ];
        Self::with_placements(Player::A, &placements)
    }

    /// A game set up from an arbitrary position. Intended for tests and
    /// analysis tooling; rosters always contain all six piece ids regardless
    /// of which of them are placed.
    pub fn with_placements(turn: Player, placements: &[(PieceId, (u8, u8))]) -> GameState {
        let mut board = Board::empty();
        for &(piece, (row, col)) in placements {
            let square = Square::new(row as i8, col as i8)
                .unwrap_or_else(|| panic!("placement {piece} at ({row},{col}) is off the board"));
            let evicted = board.place(square, piece);
            debug_assert!(evicted.is_none(), "two pieces placed on {square}");
        }
        GameState {
            board,
            current_turn: turn,
            rosters: [Self::roster_of(Player::A), Self::roster_of(Player::B)],
            move_history: Vec::new(),
            phase: Phase::InProgress,
        }
    }

    fn roster_of(player: Player) -> [PieceId; 3] {
        [
            PieceId::pawn(player),
            PieceId::lancer(player),
            PieceId::shade(player),
        ]
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_turn(&self) -> Player {
        self.current_turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The fixed three-piece roster of a player. Membership never changes;
    /// captured pieces stay listed but occupy no square.
    pub fn roster(&self, player: Player) -> &[PieceId; 3] {
        match player {
            Player::A => &self.rosters[0],
            Player::B => &self.rosters[1],
        }
    }

    pub fn move_history(&self) -> &[String] {
        &self.move_history
    }

    /// Validate and apply one move.
    ///
    /// Validation is fail-fast and atomic: every rejection leaves the state
    /// untouched, and once all checks pass the move always applies in full
    /// (capture, relocation, log entry, turn switch, win evaluation).
    ///
    /// # Errors
    ///
    /// Any [`MoveError`]; see the variant docs for the individual checks.
    pub fn attempt_move(
        &mut self,
        player: Player,
        piece: PieceId,
        direction: Direction,
    ) -> Result<MoveOutcome, MoveError> {
        if matches!(self.phase, Phase::Concluded { .. }) {
            return Err(MoveError::GameConcluded);
        }
        if player != self.current_turn {
            return Err(MoveError::NotYourTurn { player });
        }
        if !self.roster(player).contains(&piece) {
            return Err(MoveError::NotYourPiece { piece, player });
        }
        rules::check_direction(piece.archetype(), direction)?;

        // A roster member can be absent only if the opponent captured it,
        // in which case it is no longer this player's to move.
        let from = self
            .board
            .find(piece)
            .ok_or(MoveError::PieceNotOnBoard { piece })?;

        let (rows, cols) = rules::displacement(player, piece.archetype(), direction);
        let to = from.offset(rows, cols).ok_or(MoveError::OutOfBounds)?;
        rules::check_shape(piece, direction, rows, cols)?;

        let captured = match self.board.get(to) {
            Some(occupant) if occupant.owner() == player => {
                return Err(MoveError::OccupiedBySelf { occupant });
            }
            Some(occupant) => {
                self.board.take(to);
                Some(occupant)
            }
            None => None,
        };

        self.board.take(from);
        self.board.place(to, piece);
        self.move_history
            .push(format_history_entry(player, piece, direction));
        self.current_turn = player.opponent();

        let verdict = self.evaluate_win();
        if let Some(verdict) = verdict {
            self.phase = Phase::Concluded {
                winner: verdict.winner(),
            };
        }

        Ok(MoveOutcome { captured, verdict })
    }

    /// A side is defeated when none of its roster pieces occupies a square.
    fn evaluate_win(&self) -> Option<Verdict> {
        let defeated =
            |player: Player| self.roster(player).iter().all(|&p| self.board.find(p).is_none());
        match (defeated(Player::A), defeated(Player::B)) {
            (false, false) => None,
            (true, false) => Some(Verdict::Winner(Player::B)),
            (false, true) => Some(Verdict::Winner(Player::A)),
            (true, true) => Some(Verdict::Draw),
        }
    }

    /// A serializable view of the full state, in the wire shape the clients
    /// render: rows of piece labels, the turn token, the roster map, and the
    /// human-readable history.
    pub fn snapshot(&self) -> Snapshot {
        let mut players = BTreeMap::new();
        for player in [Player::A, Player::B] {
            players.insert(
                player.to_string(),
                self.roster(player).iter().map(|p| p.label()).collect(),
            );
        }
        Snapshot {
            board: self.board.label_rows(),
            current_turn: self.current_turn,
            players,
            move_history: self.move_history.clone(),
        }
    }
}

/// Point-in-time view of a [`GameState`], serialized for subscribers.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// 5x5 grid of piece labels, `null` for empty cells.
    pub board: Vec<Vec<Option<String>>>,
    pub current_turn: Player,
    /// Player token to the three roster labels of that side.
    pub players: BTreeMap<String, Vec<String>>,
    pub move_history: Vec<String>,
}
