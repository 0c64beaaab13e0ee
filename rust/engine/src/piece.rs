use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the two sides in a skirmish.
/// Serializes as the bare token (`"A"` / `"B"`) used on the wire.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    /// Player A, seated on the bottom rows. Moves first.
    A,
    /// Player B, seated on the top rows.
    B,
}

impl Player {
    /// Get the opposing player.
    pub fn opponent(self) -> Player {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    /// Row delta of one step "forward" for this player.
    ///
    /// Player A faces up the board (decreasing row index), Player B faces
    /// down (increasing row index). The asymmetry is a rule, not a quirk.
    pub fn forward_sign(self) -> i8 {
        match self {
            Player::A => -1,
            Player::B => 1,
        }
    }

    /// The single-character token used in piece labels and wire messages.
    pub fn token(self) -> char {
        match self {
            Player::A => 'A',
            Player::B => 'B',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for Player {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Player::A),
            "B" => Ok(Player::B),
            _ => Err(ParseIdError::UnknownPlayer(s.to_string())),
        }
    }
}

/// Movement-rule class of a piece.
///
/// The archetype is carried explicitly on every [`PieceId`] rather than being
/// inferred from the label text, so a label format change can never silently
/// reclassify a piece.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Moves one cell orthogonally (L/R/F/B relative to the owner's facing).
    Pawn,
    /// Moves one cell left/right, or leaps exactly two rows forward/back in a
    /// straight line. The leap ignores intervening occupancy.
    Lancer,
    /// Moves exactly two rows and two columns diagonally (FL/FR/BL/BR only).
    Shade,
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Archetype::Pawn => "pawn",
            Archetype::Lancer => "lancer",
            Archetype::Shade => "shade",
        };
        write!(f, "{name}")
    }
}

/// Identity of a single piece: owner, archetype, and roster index.
///
/// The display form is the composite label from the wire protocol, e.g. the
/// pawn of player A renders as `PA1` and the two heroes as `HA1` (lancer)
/// and `HA2` (shade).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PieceId {
    owner: Player,
    archetype: Archetype,
}

impl PieceId {
    /// The pawn of the given player (`P{owner}1`).
    pub fn pawn(owner: Player) -> PieceId {
        PieceId {
            owner,
            archetype: Archetype::Pawn,
        }
    }

    /// The orthogonal-jumping hero of the given player (`H{owner}1`).
    pub fn lancer(owner: Player) -> PieceId {
        PieceId {
            owner,
            archetype: Archetype::Lancer,
        }
    }

    /// The diagonal-jumping hero of the given player (`H{owner}2`).
    pub fn shade(owner: Player) -> PieceId {
        PieceId {
            owner,
            archetype: Archetype::Shade,
        }
    }

    pub fn owner(self) -> Player {
        self.owner
    }

    pub fn archetype(self) -> Archetype {
        self.archetype
    }

    /// The composite wire label, e.g. `PA1`, `HB2`.
    pub fn label(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, index) = match self.archetype {
            Archetype::Pawn => ('P', 1),
            Archetype::Lancer => ('H', 1),
            Archetype::Shade => ('H', 2),
        };
        write!(f, "{kind}{}{index}", self.owner)
    }
}

impl FromStr for PieceId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ParseIdError::UnknownPiece(s.to_string());
        let mut chars = s.chars();
        let kind = chars.next().ok_or_else(unknown)?;
        let owner = match chars.next() {
            Some('A') => Player::A,
            Some('B') => Player::B,
            _ => return Err(unknown()),
        };
        let index = chars.next().ok_or_else(unknown)?;
        if chars.next().is_some() {
            return Err(unknown());
        }
        match (kind, index) {
            ('P', '1') => Ok(PieceId::pawn(owner)),
            ('H', '1') => Ok(PieceId::lancer(owner)),
            ('H', '2') => Ok(PieceId::shade(owner)),
            _ => Err(unknown()),
        }
    }
}

impl Serialize for PieceId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// Symbolic move direction, relative to the owner's facing.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Direction {
    L,
    R,
    F,
    B,
    FL,
    FR,
    BL,
    BR,
}

impl Direction {
    /// True for the four diagonal codes.
    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::FL | Direction::FR | Direction::BL | Direction::BR
        )
    }

    /// Column delta: -1 for left codes, +1 for right codes, 0 otherwise.
    /// Left/right are absolute board directions, the same for both players.
    pub fn column_sign(self) -> i8 {
        match self {
            Direction::L | Direction::FL | Direction::BL => -1,
            Direction::R | Direction::FR | Direction::BR => 1,
            Direction::F | Direction::B => 0,
        }
    }

    /// Sign of the row component relative to the mover's forward direction:
    /// +1 for forward codes, -1 for backward codes, 0 for pure left/right.
    pub fn row_facing(self) -> i8 {
        match self {
            Direction::F | Direction::FL | Direction::FR => 1,
            Direction::B | Direction::BL | Direction::BR => -1,
            Direction::L | Direction::R => 0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Direction::L => "L",
            Direction::R => "R",
            Direction::F => "F",
            Direction::B => "B",
            Direction::FL => "FL",
            Direction::FR => "FR",
            Direction::BL => "BL",
            Direction::BR => "BR",
        };
        write!(f, "{code}")
    }
}

impl FromStr for Direction {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(Direction::L),
            "R" => Ok(Direction::R),
            "F" => Ok(Direction::F),
            "B" => Ok(Direction::B),
            "FL" => Ok(Direction::FL),
            "FR" => Ok(Direction::FR),
            "BL" => Ok(Direction::BL),
            "BR" => Ok(Direction::BR),
            _ => Err(ParseIdError::UnknownDirection(s.to_string())),
        }
    }
}

/// Failure to parse a wire token into a typed identity.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ParseIdError {
    #[error("Unknown player: {0}")]
    UnknownPlayer(String),
    #[error("Unknown character: {0}")]
    UnknownPiece(String),
    #[error("Invalid direction: {0}")]
    UnknownDirection(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for label in ["PA1", "HA1", "HA2", "PB1", "HB1", "HB2"] {
            let piece: PieceId = label.parse().expect("valid label");
            assert_eq!(piece.label(), label);
        }
    }

    #[test]
    fn malformed_labels_rejected() {
        for label in ["", "P", "PA", "PA2", "HA3", "XA1", "PC1", "PA11"] {
            assert!(label.parse::<PieceId>().is_err(), "{label} should fail");
        }
    }

    #[test]
    fn forward_signs_are_mirrored() {
        assert_eq!(Player::A.forward_sign(), -1);
        assert_eq!(Player::B.forward_sign(), 1);
        assert_eq!(Player::A.opponent(), Player::B);
    }

    #[test]
    fn direction_components() {
        assert_eq!(Direction::FL.column_sign(), -1);
        assert_eq!(Direction::FL.row_facing(), 1);
        assert_eq!(Direction::BR.column_sign(), 1);
        assert_eq!(Direction::BR.row_facing(), -1);
        assert_eq!(Direction::L.row_facing(), 0);
        assert!(!Direction::F.is_diagonal());
        assert!(Direction::BL.is_diagonal());
    }
}
