//! Turn rotation across a variable player count.

use crate::board;
use crate::moves::{Move, ValidationResult};
use crate::piece::TeamType;
use crate::state::{GameError, GameState};

/// Owns the ordered list of participating teams and nothing else. All
/// methods are pure; advancing the turn returns a new state.
pub struct TurnManager {
    teams: Vec<TeamType>,
}

impl TurnManager {
    pub fn new(players: u8) -> Result<Self, GameError> {
        Ok(TurnManager {
            teams: board::teams_for_players(players)?,
        })
    }

    pub fn teams(&self) -> &[TeamType] {
        &self.teams
    }

    fn is_active(&self, team: TeamType, state: &GameState) -> bool {
        !state.is_eliminated(team) && !state.pieces_for_team(team).is_empty()
    }

    /// The team to move after the state's current one, walking forward
    /// cyclically and skipping teams that are eliminated or have no
    /// pieces left. With no other active team the current team is
    /// returned unchanged; the win check is expected to have ended the
    /// game before that degenerate case matters.
    pub fn next_team(&self, state: &GameState) -> TeamType {
        let current = state.current_turn();
        let start = self
            .teams
            .iter()
            .position(|&t| t == current)
            .unwrap_or(0);
        for step in 1..=self.teams.len() {
            let candidate = self.teams[(start + step) % self.teams.len()];
            if candidate != current && self.is_active(candidate, state) {
                return candidate;
            }
        }
        current
    }

    /// The single gate keeping a player from moving another team's
    /// pieces: the move's declared team must equal the current turn.
    pub fn is_valid_turn(&self, mv: &Move, state: &GameState) -> bool {
        mv.team == state.current_turn()
    }

    /// Turn-ownership check phrased as a validation result, so callers
    /// surface it exactly like a geometry rejection.
    pub fn validate_turn(&self, mv: &Move, state: &GameState) -> ValidationResult {
        state.turn_verdict(mv)
    }

    /// New state with the turn handed to the next active team.
    pub fn advance_turn(&self, state: &GameState) -> GameState {
        state.set_current_turn(self.next_team(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{GamePiece, PieceType};
    use crate::position::Position;
    use crate::state::EliminationReason;

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y).unwrap()
    }

    fn piece(piece_type: PieceType, team: TeamType, x: i32, y: i32) -> GamePiece {
        GamePiece::new(piece_type, team, pos(x, y))
    }

    #[test]
    fn test_two_player_turns_toggle() {
        let turns = TurnManager::new(2).unwrap();
        let state = GameState::new(2).unwrap();
        assert_eq!(state.current_turn(), TeamType::Our);

        let after_one = turns.advance_turn(&state);
        assert_eq!(after_one.current_turn(), TeamType::Opponent);
        let after_two = turns.advance_turn(&after_one);
        assert_eq!(after_two.current_turn(), TeamType::Our);
    }

    #[test]
    fn test_four_player_rotation_skips_eliminated_team() {
        let turns = TurnManager::new(4).unwrap();
        let state = GameState::new(4)
            .unwrap()
            .eliminate_player(TeamType::Opponent2, EliminationReason::Surrender);

        // Walk a full lap; Opponent2 must never come up
        let mut current = state.clone();
        for _ in 0..8 {
            current = turns.advance_turn(&current);
            assert_ne!(current.current_turn(), TeamType::Opponent2);
        }
    }

    #[test]
    fn test_team_with_no_pieces_is_skipped() {
        let turns = TurnManager::new(3).unwrap();
        // Opponent2 has no pieces at all
        let state = GameState::from_pieces(
            vec![
                piece(PieceType::King, TeamType::Our, 7, 1),
                piece(PieceType::King, TeamType::Opponent, 7, 14),
            ],
            TeamType::Opponent,
        );
        assert_eq!(turns.next_team(&state), TeamType::Our);
    }

    #[test]
    fn test_sole_survivor_keeps_the_turn() {
        let turns = TurnManager::new(2).unwrap();
        let state = GameState::from_pieces(
            vec![piece(PieceType::King, TeamType::Our, 7, 1)],
            TeamType::Our,
        );
        assert_eq!(turns.next_team(&state), TeamType::Our);
    }

    #[test]
    fn test_turn_ownership_is_a_validation_rejection() {
        let turns = TurnManager::new(2).unwrap();
        let state = GameState::new(2).unwrap();
        let mv = Move::new(pos(11, 13), pos(11, 12), PieceType::Farmer, TeamType::Opponent);

        assert!(!turns.is_valid_turn(&mv, &state));
        let verdict = turns.validate_turn(&mv, &state);
        assert!(!verdict.is_valid);
        assert!(verdict.reason.unwrap().contains("turn"));
    }
}
