//! Board factory: initial piece layouts for 2-4 player games.

use crate::piece::{GamePiece, PieceType, TeamType};
use crate::position::{BOARD_SIZE, Position};
use crate::state::GameError;

/// Files (perpendicular coordinates) a team's home rows occupy. Chosen to
/// clear the forbidden corner zones on every edge.
const HOME_FILES: [i32; 8] = [4, 5, 6, 7, 8, 9, 10, 11];

/// Home rank 1, by file: the main rank with the King and the Treasure in
/// the middle.
const MAIN_RANK: [PieceType; 8] = [
    PieceType::Ram,
    PieceType::Knight,
    PieceType::Templar,
    PieceType::King,
    PieceType::Treasure,
    PieceType::Templar,
    PieceType::Knight,
    PieceType::Ram,
];

/// Home rank 0, by file. The two middle squares stay empty.
const BACK_RANK: [Option<PieceType>; 8] = [
    Some(PieceType::Trap),
    Some(PieceType::Trebuchet),
    Some(PieceType::Scout),
    None,
    None,
    Some(PieceType::Scout),
    Some(PieceType::Trebuchet),
    Some(PieceType::Trap),
];

/// Teams participating in a game of the given size, in turn order.
pub fn teams_for_players(players: u8) -> Result<Vec<TeamType>, GameError> {
    match players {
        2 => Ok(vec![TeamType::Our, TeamType::Opponent]),
        3 => Ok(vec![TeamType::Our, TeamType::Opponent, TeamType::Opponent2]),
        4 => Ok(vec![
            TeamType::Our,
            TeamType::Opponent,
            TeamType::Opponent2,
            TeamType::Opponent3,
        ]),
        n => Err(GameError::PlayerCount(n)),
    }
}

/// Map a home-template coordinate (file, rank) onto the board for the
/// given team. Rank 0 is the team's own edge and ranks grow in the team's
/// forward direction.
fn orient(team: TeamType, file: i32, rank: i32) -> Position {
    let (x, y) = match team {
        TeamType::Our => (file, rank),
        TeamType::Opponent => (file, BOARD_SIZE - 1 - rank),
        TeamType::Opponent2 => (rank, file),
        TeamType::Opponent3 => (BOARD_SIZE - 1 - rank, file),
    };
    // Template coordinates are fixed and in range; this cannot fail.
    Position::new(x, y).expect("home template square off board")
}

fn home_pieces(team: TeamType) -> Vec<GamePiece> {
    let mut pieces = Vec::with_capacity(22);
    for (i, &file) in HOME_FILES.iter().enumerate() {
        if let Some(piece_type) = BACK_RANK[i] {
            pieces.push(GamePiece::new(piece_type, team, orient(team, file, 0)));
        }
        pieces.push(GamePiece::new(MAIN_RANK[i], team, orient(team, file, 1)));
        pieces.push(GamePiece::new(PieceType::Farmer, team, orient(team, file, 2)));
    }
    pieces
}

/// Build the opening board for a game with the given player count.
pub fn initial_board(players: u8) -> Result<Vec<GamePiece>, GameError> {
    let teams = teams_for_players(players)?;
    let mut pieces = Vec::new();
    for team in teams {
        pieces.extend(home_pieces(team));
    }
    Ok(pieces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_two_player_board_piece_counts() {
        let pieces = initial_board(2).unwrap();
        assert_eq!(pieces.len(), 44);

        for team in [TeamType::Our, TeamType::Opponent] {
            let count = |t: PieceType| {
                pieces
                    .iter()
                    .filter(|p| p.team == team && p.piece_type == t)
                    .count()
            };
            assert_eq!(count(PieceType::Farmer), 8);
            assert_eq!(count(PieceType::Ram), 2);
            assert_eq!(count(PieceType::Knight), 2);
            assert_eq!(count(PieceType::Templar), 2);
            assert_eq!(count(PieceType::Scout), 2);
            assert_eq!(count(PieceType::Trebuchet), 2);
            assert_eq!(count(PieceType::Trap), 2);
            assert_eq!(count(PieceType::King), 1);
            assert_eq!(count(PieceType::Treasure), 1);
        }
    }

    #[test]
    fn test_no_two_pieces_share_a_square() {
        for players in 2..=4 {
            let pieces = initial_board(players).unwrap();
            let squares: HashSet<_> = pieces.iter().map(|p| p.position).collect();
            assert_eq!(squares.len(), pieces.len(), "{players}-player overlap");
        }
    }

    #[test]
    fn test_no_piece_starts_in_a_forbidden_zone() {
        let pieces = initial_board(4).unwrap();
        assert!(pieces.iter().all(|p| !p.position.is_in_forbidden_zone()));
    }

    #[test]
    fn test_farmers_sit_on_their_team_rank() {
        let pieces = initial_board(4).unwrap();
        for piece in pieces.iter().filter(|p| p.piece_type == PieceType::Farmer) {
            assert_eq!(
                piece.team.forward_coord(piece.position),
                piece.team.farmer_rank(),
                "{} farmer at {}",
                piece.team,
                piece.position
            );
        }
    }

    #[test]
    fn test_unsupported_player_counts_are_rejected() {
        assert!(initial_board(1).is_err());
        assert!(initial_board(5).is_err());
    }
}
