use crate::piece::{PieceType, TeamType};
use crate::position::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A piece removed from the board by a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedPiece {
    pub piece_type: PieceType,
    pub position: Position,
}

/// One ply: a candidate or executed move.
///
/// Callers build a move from (from, to, piece type, team) only; the
/// capture fields and flags are derived from the board when the move is
/// executed, never trusted from the outside. Equality is structural over
/// the four caller-supplied fields so a recorded move compares equal to
/// the request that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub piece_type: PieceType,
    pub team: TeamType,
    pub captured_piece: Option<CapturedPiece>,
    pub is_en_passant: bool,
    pub is_special_ability: bool,
}

impl Move {
    pub fn new(from: Position, to: Position, piece_type: PieceType, team: TeamType) -> Self {
        Move {
            from,
            to,
            piece_type,
            team,
            captured_piece: None,
            is_en_passant: false,
            is_special_ability: false,
        }
    }

    /// Component-wise displacement `to - from`.
    pub fn delta(&self) -> (i32, i32) {
        self.from.delta(self.to)
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.piece_type == other.piece_type
            && self.team == other.team
    }
}

impl Eq for Move {}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} -> {}", self.team, self.piece_type, self.from, self.to)
    }
}

/// Verdict of a single validation. Pure data: an illegal move is a value,
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub reason: Option<String>,
    pub blocked_by: Option<Position>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        ValidationResult {
            is_valid: true,
            reason: None,
            blocked_by: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        ValidationResult {
            is_valid: false,
            reason: Some(reason.into()),
            blocked_by: None,
        }
    }

    pub fn blocked(reason: impl Into<String>, at: Position) -> Self {
        ValidationResult {
            is_valid: false,
            reason: Some(reason.into()),
            blocked_by: Some(at),
        }
    }
}
