use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Board size constant: the board is BOARD_SIZE x BOARD_SIZE squares.
pub const BOARD_SIZE: i32 = 16;

/// Side length of the four forbidden corner zones.
pub const FORBIDDEN_ZONE_SIZE: i32 = 4;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("position ({x}, {y}) is outside the {BOARD_SIZE}x{BOARD_SIZE} board")]
pub struct PositionError {
    pub x: i32,
    pub y: i32,
}

/// A coordinate on the board. Immutable; every derived value is computed,
/// never cached.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Construct a position, failing if the coordinates fall outside the
    /// board. An out-of-range coordinate is a caller bug, never a playable
    /// square, so it is surfaced as an error at construction time.
    pub fn new(x: i32, y: i32) -> Result<Self, PositionError> {
        if Self::is_valid(x, y) {
            Ok(Position { x, y })
        } else {
            Err(PositionError { x, y })
        }
    }

    pub fn is_valid(x: i32, y: i32) -> bool {
        (0..BOARD_SIZE).contains(&x) && (0..BOARD_SIZE).contains(&y)
    }

    /// True iff this square lies inside one of the four 4x4 corner zones.
    /// Pieces may pass near these zones but may never rest on them.
    pub fn is_in_forbidden_zone(&self) -> bool {
        let low = |c: i32| c < FORBIDDEN_ZONE_SIZE;
        let high = |c: i32| c >= BOARD_SIZE - FORBIDDEN_ZONE_SIZE;
        (low(self.x) || high(self.x)) && (low(self.y) || high(self.y))
    }

    /// Component-wise difference `other - self`.
    pub fn delta(&self, other: Position) -> (i32, i32) {
        (other.x - self.x, other.y - self.y)
    }

    /// Euclidean distance to another square.
    pub fn distance(&self, other: Position) -> f64 {
        let (dx, dy) = self.delta(other);
        ((dx * dx + dy * dy) as f64).sqrt()
    }

    pub fn manhattan_distance(&self, other: Position) -> i32 {
        let (dx, dy) = self.delta(other);
        dx.abs() + dy.abs()
    }

    /// The square `(dx, dy)` away, or None if it falls off the board.
    pub fn offset(&self, dx: i32, dy: i32) -> Option<Position> {
        Position::new(self.x + dx, self.y + dy).ok()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
