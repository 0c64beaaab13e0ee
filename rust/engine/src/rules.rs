use crate::errors::MoveError;
use crate::piece::{Archetype, Direction, PieceId, Player};

/// The direction vocabulary an archetype accepts.
///
/// Pawns and lancers take the four orthogonal codes; shades take only the
/// four diagonal codes.
pub fn allowed_directions(archetype: Archetype) -> &'static [Direction] {
    use Direction::*;
    match archetype {
        Archetype::Pawn | Archetype::Lancer => &[L, R, F, B],
        Archetype::Shade => &[FL, FR, BL, BR],
    }
}

/// Checks that a direction code is in the archetype's vocabulary.
///
/// # Errors
///
/// Returns [`MoveError::IllegalDirectionForArchetype`] when the code is not
/// accepted by the archetype, e.g. a pawn asked to move `FL` or a shade
/// asked to move `F`.
pub fn check_direction(archetype: Archetype, direction: Direction) -> Result<(), MoveError> {
    if allowed_directions(archetype).contains(&direction) {
        Ok(())
    } else {
        Err(MoveError::IllegalDirectionForArchetype {
            direction,
            archetype,
        })
    }
}

/// The (row, col) displacement one legal move produces.
///
/// Row deltas are expressed in the mover's frame: `F` points toward the
/// opponent, which is decreasing rows for Player A and increasing rows for
/// Player B. Lancers leap two rows on `F`/`B`; shades always displace two
/// rows and two columns.
///
/// Callers must have validated the direction with [`check_direction`] first;
/// an out-of-vocabulary combination here is a caller bug.
pub fn displacement(owner: Player, archetype: Archetype, direction: Direction) -> (i8, i8) {
    let row_step = match (archetype, direction) {
        (Archetype::Lancer, Direction::F | Direction::B) => 2,
        (Archetype::Shade, _) => 2,
        _ => 1,
    };
    let rows = direction.row_facing() * owner.forward_sign() * row_step;
    let cols = direction.column_sign() * if archetype == Archetype::Shade { 2 } else { 1 };
    (rows, cols)
}

/// Validates that a displacement matches the archetype's geometric rule.
///
/// Pawn moves and lancer `L`/`R` must displace exactly one cell along one
/// axis; lancer `F`/`B` must be a straight two-row leap; shade moves must be
/// exactly two rows and two columns. The displacement handed to this check
/// comes from [`displacement`] in normal play, so a failure indicates the
/// two rule tables disagree; it is kept as an independent check so the shape
/// rules stay falsifiable on their own.
///
/// # Errors
///
/// Returns [`MoveError::IllegalMoveShape`] when the displacement does not
/// match the rule for the piece and direction.
pub fn check_shape(
    piece: PieceId,
    direction: Direction,
    rows: i8,
    cols: i8,
) -> Result<(), MoveError> {
    let legal = match piece.archetype() {
        Archetype::Pawn => match direction {
            Direction::L | Direction::R => rows == 0 && cols.abs() == 1,
            Direction::F | Direction::B => rows.abs() == 1 && cols == 0,
            _ => false,
        },
        Archetype::Lancer => match direction {
            Direction::L | Direction::R => rows == 0 && cols.abs() == 1,
            Direction::F | Direction::B => rows.abs() == 2 && cols == 0,
            _ => false,
        },
        Archetype::Shade => direction.is_diagonal() && rows.abs() == 2 && cols.abs() == 2,
    };
    if legal {
        Ok(())
    } else {
        Err(MoveError::IllegalMoveShape { piece, direction })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pawns_and_lancers_move_orthogonally() {
        for archetype in [Archetype::Pawn, Archetype::Lancer] {
            assert!(check_direction(archetype, Direction::F).is_ok());
            assert!(matches!(
                check_direction(archetype, Direction::FL),
                Err(MoveError::IllegalDirectionForArchetype { .. })
            ));
        }
    }

    #[test]
    fn shades_move_diagonally_only() {
        assert!(check_direction(Archetype::Shade, Direction::BR).is_ok());
        for dir in [Direction::L, Direction::R, Direction::F, Direction::B] {
            assert!(check_direction(Archetype::Shade, dir).is_err());
        }
    }

    #[test]
    fn forward_is_mirrored_between_players() {
        assert_eq!(
            displacement(Player::A, Archetype::Pawn, Direction::F),
            (-1, 0)
        );
        assert_eq!(
            displacement(Player::B, Archetype::Pawn, Direction::F),
            (1, 0)
        );
        // Left and right are absolute, not mirrored.
        assert_eq!(
            displacement(Player::B, Archetype::Pawn, Direction::L),
            (0, -1)
        );
    }

    #[test]
    fn lancer_leaps_two_rows_forward_and_back() {
        assert_eq!(
            displacement(Player::A, Archetype::Lancer, Direction::F),
            (-2, 0)
        );
        assert_eq!(
            displacement(Player::A, Archetype::Lancer, Direction::B),
            (2, 0)
        );
        assert_eq!(
            displacement(Player::A, Archetype::Lancer, Direction::R),
            (0, 1)
        );
    }

    #[test]
    fn shade_displaces_two_by_two() {
        assert_eq!(
            displacement(Player::A, Archetype::Shade, Direction::FL),
            (-2, -2)
        );
        assert_eq!(
            displacement(Player::B, Archetype::Shade, Direction::FR),
            (2, 2)
        );
    }

    #[test]
    fn single_step_shapes_reject_other_displacements() {
        let pawn = PieceId::pawn(Player::A);
        assert!(check_shape(pawn, Direction::F, -1, 0).is_ok());
        for (rows, cols) in [(-2, 0), (0, 0), (-1, -1), (2, 0)] {
            assert!(matches!(
                check_shape(pawn, Direction::F, rows, cols),
                Err(MoveError::IllegalMoveShape { .. })
            ));
        }
        let lancer = PieceId::lancer(Player::A);
        assert!(check_shape(lancer, Direction::L, 0, -1).is_ok());
        assert!(check_shape(lancer, Direction::L, 0, -2).is_err());
    }

    #[test]
    fn lancer_leap_shape_requires_two_rows_same_column() {
        let lancer = PieceId::lancer(Player::B);
        assert!(check_shape(lancer, Direction::F, 2, 0).is_ok());
        assert!(check_shape(lancer, Direction::F, 1, 0).is_err());
        assert!(check_shape(lancer, Direction::B, -2, 1).is_err());
    }

    #[test]
    fn shade_shape_requires_two_by_two() {
        let shade = PieceId::shade(Player::A);
        assert!(check_shape(shade, Direction::FL, -2, -2).is_ok());
        assert!(check_shape(shade, Direction::FL, -1, -1).is_err());
        assert!(check_shape(shade, Direction::FL, -2, 0).is_err());
    }
}
