use thiserror::Error;

use crate::piece::{Archetype, Direction, PieceId, Player};

/// Rejection reasons for a proposed move.
///
/// Every variant is a caller-input error: a rejected move mutates no state
/// and the caller may correct and resend. The display texts are the
/// messages relayed to clients on the wire.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum MoveError {
    #[error("It's not player {player}'s turn.")]
    NotYourTurn { player: Player },
    #[error("Character {piece} does not belong to player {player}.")]
    NotYourPiece { piece: PieceId, player: Player },
    #[error("Character {piece} not found on the board.")]
    PieceNotOnBoard { piece: PieceId },
    #[error("Direction {direction} is not legal for a {archetype}.")]
    IllegalDirectionForArchetype {
        direction: Direction,
        archetype: Archetype,
    },
    #[error("Invalid move. Out of bounds.")]
    OutOfBounds,
    #[error("Invalid move for character {piece} in direction {direction}.")]
    IllegalMoveShape {
        piece: PieceId,
        direction: Direction,
    },
    #[error("Destination is occupied by your own {occupant}.")]
    OccupiedBySelf { occupant: PieceId },
    #[error("The game has concluded; no further moves are accepted.")]
    GameConcluded,
}
