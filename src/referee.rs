//! The facade external callers drive the engine through.
//!
//! The referee wires the rule engine, the turn manager, and the win
//! checker together behind the validate-then-execute protocol: a move is
//! either rejected with the state untouched or applied completely, never
//! partially. It holds no game state itself; callers thread states in
//! and out, which is what lets one referee serve many independent games.

use crate::moves::{Move, ValidationResult};
use crate::piece::TeamType;
use crate::position::Position;
use crate::rules::RuleEngine;
use crate::state::{EliminationReason, GameError, GameState, GameStatus};
use crate::turn::TurnManager;
use crate::win::WinConditionChecker;

/// Result of one attempted move: the state to continue from (unchanged on
/// rejection) and the verdict that produced it.
#[derive(Debug)]
pub struct MoveOutcome {
    pub state: GameState,
    pub validation: ValidationResult,
    pub mov: Move,
}

impl MoveOutcome {
    /// Whether the move was actually applied.
    pub fn applied(&self) -> bool {
        self.validation.is_valid
    }

    pub fn status(&self) -> GameStatus {
        self.state.status()
    }
}

pub struct Referee {
    engine: RuleEngine,
    turns: TurnManager,
    win: WinConditionChecker,
}

impl Referee {
    pub fn new(players: u8) -> Result<Self, GameError> {
        Ok(Referee {
            engine: RuleEngine::new(),
            turns: TurnManager::new(players)?,
            win: WinConditionChecker::new(),
        })
    }

    /// Dependency-injected constructor for nonstandard rule sets or
    /// opt-in mate detection.
    pub fn with_parts(engine: RuleEngine, turns: TurnManager, win: WinConditionChecker) -> Self {
        Referee { engine, turns, win }
    }

    pub fn teams(&self) -> &[TeamType] {
        self.turns.teams()
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// A fresh opening state for this referee's player count.
    pub fn new_game(&self) -> Result<GameState, GameError> {
        GameState::new(self.turns.teams().len() as u8)
    }

    /// Full legality verdict for a candidate move: turn ownership first,
    /// then the piece rules. Advisory; the state is never touched.
    pub fn validate(&self, mv: &Move, state: &GameState) -> ValidationResult {
        let turn = self.turns.validate_turn(mv, state);
        if !turn.is_valid {
            return turn;
        }
        self.engine.validate(mv, state)
    }

    /// Attempt the move described by a source and destination square. The
    /// acting piece and team are read off the board, which is the legacy
    /// calling convention UIs use.
    ///
    /// A rejected move returns the incoming state unchanged together with
    /// the reason; an accepted move returns the executed state with the
    /// turn advanced and the win condition applied.
    pub fn try_move(
        &self,
        state: &GameState,
        from: Position,
        to: Position,
    ) -> Result<MoveOutcome, GameError> {
        if state.is_game_over() {
            return Err(GameError::GameOver);
        }
        let piece = state.piece_at(from).ok_or(GameError::NoPieceAt(from))?;
        let mv = Move::new(from, to, piece.piece_type, piece.team);

        let validation = self.validate(&mv, state);
        if !validation.is_valid {
            return Ok(MoveOutcome {
                state: state.clone(),
                validation,
                mov: mv,
            });
        }

        let executed = state.execute_move(&mv)?;
        let mut next = self.turns.advance_turn(&executed);
        if let Some(status) = self.win.check_win_condition(&next, self.turns.teams()) {
            next = next.set_status(status);
        }
        Ok(MoveOutcome {
            state: next,
            validation,
            mov: mv,
        })
    }

    /// External surrender transition: the team is eliminated, the turn
    /// moves on if it was theirs, and the win condition is re-checked.
    pub fn surrender(&self, state: &GameState, team: TeamType) -> GameState {
        let mut next = state.eliminate_player(team, EliminationReason::Surrender);
        if next.current_turn() == team {
            next = self.turns.advance_turn(&next);
        }
        if let Some(status) = self.win.check_win_condition(&next, self.turns.teams()) {
            next = next.set_status(status);
        }
        next
    }

    pub fn legal_moves(&self, state: &GameState, team: TeamType) -> Vec<Move> {
        state.legal_moves(team, &self.engine)
    }

    pub fn valid_moves_from(&self, state: &GameState, from: Position) -> Vec<Position> {
        state.valid_moves_from(from, &self.engine)
    }

    pub fn is_position_under_attack(
        &self,
        state: &GameState,
        position: Position,
        team: TeamType,
    ) -> bool {
        state.is_position_under_attack(position, team, &self.engine)
    }

    pub fn is_in_check(&self, state: &GameState, team: TeamType) -> bool {
        self.win.is_in_check(state, team, &self.engine)
    }

    /// Replay a recorded move list against a fresh board. Each record is
    /// re-validated and re-executed, so a finished game reproduces its
    /// final state exactly or fails loudly.
    pub fn replay(&self, moves: &[Move]) -> Result<GameState, GameError> {
        let mut state = self.new_game()?;
        for mv in moves {
            let outcome = self.try_move(&state, mv.from, mv.to)?;
            if !outcome.applied() {
                return Err(GameError::InvalidMove(
                    outcome
                        .validation
                        .reason
                        .unwrap_or_else(|| format!("recorded move {mv} failed validation")),
                ));
            }
            state = outcome.state;
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y).unwrap()
    }

    #[test]
    fn test_turn_violation_is_rejected_like_any_other() {
        let referee = Referee::new(2).unwrap();
        let state = referee.new_game().unwrap();

        // Opponent tries a geometrically fine farmer advance out of turn
        let outcome = referee.try_move(&state, pos(11, 13), pos(11, 12)).unwrap();
        assert!(!outcome.applied());
        assert_eq!(outcome.state, state);
        assert_eq!(state.current_turn(), TeamType::Our);
    }

    #[test]
    fn test_rejected_move_leaves_board_and_turn_unchanged() {
        let referee = Referee::new(2).unwrap();
        let state = referee.new_game().unwrap();

        // Sideways farmer move
        let outcome = referee.try_move(&state, pos(4, 2), pos(5, 2)).unwrap();
        assert!(!outcome.applied());
        assert_eq!(outcome.state, state);
        assert!(outcome.validation.reason.is_some());
    }

    #[test]
    fn test_accepted_move_advances_the_turn() {
        let referee = Referee::new(2).unwrap();
        let state = referee.new_game().unwrap();

        let outcome = referee.try_move(&state, pos(4, 2), pos(4, 3)).unwrap();
        assert!(outcome.applied());
        assert_eq!(outcome.state.current_turn(), TeamType::Opponent);
        assert_eq!(outcome.state.move_count(), 1);
        assert_eq!(outcome.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_moving_from_an_empty_square_is_an_error() {
        let referee = Referee::new(2).unwrap();
        let state = referee.new_game().unwrap();
        assert!(matches!(
            referee.try_move(&state, pos(8, 8), pos(8, 9)),
            Err(GameError::NoPieceAt(_))
        ));
    }

    #[test]
    fn test_no_moves_after_the_game_ends() {
        let referee = Referee::new(2).unwrap();
        let state = referee.new_game().unwrap();
        let finished = referee.surrender(&state, TeamType::Opponent);
        assert_eq!(finished.status(), GameStatus::Winner(TeamType::Our));
        assert!(matches!(
            referee.try_move(&finished, pos(4, 2), pos(4, 3)),
            Err(GameError::GameOver)
        ));
    }

    #[test]
    fn test_surrender_hands_the_turn_over() {
        let referee = Referee::new(3).unwrap();
        let state = referee.new_game().unwrap();
        let next = referee.surrender(&state, TeamType::Our);
        assert!(next.is_eliminated(TeamType::Our));
        assert_eq!(next.current_turn(), TeamType::Opponent);
        // Two teams remain, so nobody has won yet
        assert!(!next.is_game_over());
    }

    #[test]
    fn test_replaying_recorded_history_reproduces_the_final_state() {
        let referee = Referee::new(2).unwrap();
        let mut state = referee.new_game().unwrap();
        let plies = [
            (pos(6, 2), pos(6, 4)),
            (pos(9, 13), pos(9, 11)),
            (pos(5, 1), pos(6, 3)),
            (pos(10, 14), pos(9, 12)),
            (pos(4, 2), pos(4, 3)),
        ];
        for (from, to) in plies {
            let outcome = referee.try_move(&state, from, to).unwrap();
            assert!(outcome.applied(), "{from} -> {to}: {:?}", outcome.validation);
            state = outcome.state;
        }

        // Persist the records the way a save file would, then replay
        let recorded: Vec<Move> = state.history().iter().map(|r| r.mov.clone()).collect();
        let json = serde_json::to_string(&recorded).unwrap();
        let loaded: Vec<Move> = serde_json::from_str(&json).unwrap();
        let replayed = referee.replay(&loaded).unwrap();

        assert_eq!(replayed.pieces(), state.pieces());
        assert_eq!(replayed.current_turn(), state.current_turn());
        assert_eq!(replayed.move_count(), state.move_count());
    }
}
