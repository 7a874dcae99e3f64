use crate::position::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The nine piece types of the Citadel variant.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    Farmer,
    Ram,
    Trap,
    Knight,
    Templar,
    Scout,
    Trebuchet,
    Treasure,
    King,
}

impl PieceType {
    pub const ALL: [PieceType; 9] = [
        PieceType::Farmer,
        PieceType::Ram,
        PieceType::Trap,
        PieceType::Knight,
        PieceType::Templar,
        PieceType::Scout,
        PieceType::Trebuchet,
        PieceType::Treasure,
        PieceType::King,
    ];

    /// Relative material value, used for advantage scoring. King and
    /// Treasure are worth nothing because losing them ends the game by
    /// other means.
    pub fn point_value(&self) -> u32 {
        match self {
            PieceType::Farmer => 1,
            PieceType::Trap => 2,
            PieceType::Ram => 3,
            PieceType::Scout => 3,
            PieceType::Knight => 4,
            PieceType::Trebuchet => 4,
            PieceType::Templar => 5,
            PieceType::Treasure => 0,
            PieceType::King => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PieceType::Farmer => "Farmer",
            PieceType::Ram => "Ram",
            PieceType::Trap => "Trap",
            PieceType::Knight => "Knight",
            PieceType::Templar => "Templar",
            PieceType::Scout => "Scout",
            PieceType::Trebuchet => "Trebuchet",
            PieceType::Treasure => "Treasure",
            PieceType::King => "King",
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A playing side. Two-player games use Our/Opponent; Opponent2 and
/// Opponent3 join in three- and four-player games.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamType {
    Our,
    Opponent,
    Opponent2,
    Opponent3,
}

impl TeamType {
    pub const ALL: [TeamType; 4] = [
        TeamType::Our,
        TeamType::Opponent,
        TeamType::Opponent2,
        TeamType::Opponent3,
    ];

    /// Unit vector pointing "forward" for this team. Directional rules
    /// (Farmer movement, en-passant removal) are all phrased in terms of
    /// this vector so the same code serves all four board orientations.
    pub fn direction(&self) -> (i32, i32) {
        match self {
            TeamType::Our => (0, 1),
            TeamType::Opponent => (0, -1),
            TeamType::Opponent2 => (1, 0),
            TeamType::Opponent3 => (-1, 0),
        }
    }

    /// The coordinate of `pos` along this team's forward axis.
    pub fn forward_coord(&self, pos: Position) -> i32 {
        match self {
            TeamType::Our | TeamType::Opponent => pos.y,
            TeamType::Opponent2 | TeamType::Opponent3 => pos.x,
        }
    }

    /// Forward-axis coordinate of this team's Farmer starting rank.
    pub fn farmer_rank(&self) -> i32 {
        match self {
            TeamType::Our | TeamType::Opponent2 => 2,
            TeamType::Opponent | TeamType::Opponent3 => 13,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TeamType::Our => "Our",
            TeamType::Opponent => "Opponent",
            TeamType::Opponent2 => "Opponent2",
            TeamType::Opponent3 => "Opponent3",
        }
    }
}

impl fmt::Display for TeamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One piece on the board.
///
/// `en_passant` is a one-ply flag: it is set when a Farmer or King makes
/// its initial two-square advance and cleared for every piece as soon as
/// any other move executes. `GamePiece` values are replaced wholesale on
/// every state transition, never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamePiece {
    pub piece_type: PieceType,
    pub team: TeamType,
    pub position: Position,
    pub en_passant: bool,
    pub has_moved: bool,
}

impl GamePiece {
    pub fn new(piece_type: PieceType, team: TeamType, position: Position) -> Self {
        GamePiece {
            piece_type,
            team,
            position,
            en_passant: false,
            has_moved: false,
        }
    }

    /// Trap invisibility, derived at query time: an enemy Trap is never
    /// shown to an observing team. Visibility is a pure function of
    /// (piece team, viewer team) so simultaneous viewers stay consistent.
    pub fn visible_to(&self, viewer: TeamType) -> bool {
        self.piece_type != PieceType::Trap || self.team == viewer
    }

    /// Copy of this piece relocated to `to`, with the transient en-passant
    /// flag dropped and the moved marker set.
    pub fn moved_to(&self, to: Position) -> Self {
        GamePiece {
            position: to,
            en_passant: false,
            has_moved: true,
            ..*self
        }
    }
}
