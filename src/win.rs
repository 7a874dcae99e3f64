//! Win, loss, and draw detection.

use crate::piece::{PieceType, TeamType};
use crate::rules::RuleEngine;
use crate::state::{GameState, GameStatus};

/// Inspects a state for game-ending conditions.
///
/// The primary condition is king survival: a team is in the running while
/// it is not eliminated and still has its King on the board. Check,
/// checkmate, and stalemate are implemented structurally on top of the
/// full legal-move query, but mate detection ships disabled: the movement
/// rules leave "may a king walk into an attacked square" deliberately
/// unanswered, and a wrong guess would end games early. Construct with
/// [`WinConditionChecker::with_mate_detection`] to opt in.
pub struct WinConditionChecker {
    detect_mate: bool,
}

impl WinConditionChecker {
    pub fn new() -> Self {
        WinConditionChecker { detect_mate: false }
    }

    pub fn with_mate_detection() -> Self {
        WinConditionChecker { detect_mate: true }
    }

    fn survives(&self, state: &GameState, team: TeamType) -> bool {
        !state.is_eliminated(team) && state.has_king(team)
    }

    /// King-count victory check over the participating teams. One
    /// survivor wins; zero is the degenerate simultaneous-loss draw; two
    /// or more means the game goes on.
    pub fn check_win_condition(
        &self,
        state: &GameState,
        teams: &[TeamType],
    ) -> Option<GameStatus> {
        let survivors: Vec<TeamType> = teams
            .iter()
            .copied()
            .filter(|&team| self.survives(state, team))
            .collect();
        match survivors.as_slice() {
            [] => Some(GameStatus::Draw),
            [winner] => Some(GameStatus::Winner(*winner)),
            _ => None,
        }
    }

    /// True iff the team's King stands on a square some enemy move could
    /// reach.
    pub fn is_in_check(&self, state: &GameState, team: TeamType, engine: &RuleEngine) -> bool {
        state
            .pieces()
            .iter()
            .filter(|p| p.team == team && p.piece_type == PieceType::King)
            .any(|king| state.is_position_under_attack(king.position, team, engine))
    }

    fn has_any_legal_move(&self, state: &GameState, team: TeamType, engine: &RuleEngine) -> bool {
        !state.legal_moves(team, engine).is_empty()
    }

    /// In check with no legal move anywhere. Always false unless mate
    /// detection was opted into.
    pub fn is_checkmate(&self, state: &GameState, team: TeamType, engine: &RuleEngine) -> bool {
        self.detect_mate
            && self.is_in_check(state, team, engine)
            && !self.has_any_legal_move(state, team, engine)
    }

    /// Not in check, but no legal move anywhere. Always false unless mate
    /// detection was opted into.
    pub fn is_stalemate(&self, state: &GameState, team: TeamType, engine: &RuleEngine) -> bool {
        self.detect_mate
            && !self.is_in_check(state, team, engine)
            && !self.has_any_legal_move(state, team, engine)
    }
}

impl Default for WinConditionChecker {
    fn default() -> Self {
        Self::new()
    }
}
