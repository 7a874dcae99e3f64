use crate::moves::Move;
use crate::piece::TeamType;
use crate::position::Position;
use crate::referee::Referee;
use crate::state::GameState;
use std::time::Duration;

/// Trait that all bots must implement.
///
/// Bots are external collaborators: the core never calls into them, the
/// arena does, and the arena enforces the time limit. A bot answers with
/// a source and destination square; everything else (validation, capture
/// resolution, turn rotation) stays inside the engine.
pub trait Bot: Send {
    /// Get the name of the bot
    fn name(&self) -> &str;

    /// Pick a move for the current state. The bot is expected to answer
    /// within the time limit; the referee is provided for legal-move and
    /// attack queries.
    fn choose_move(
        &mut self,
        state: &GameState,
        referee: &Referee,
        time_limit: Duration,
    ) -> Option<(Position, Position)>;

    /// Notified when the game starts
    fn game_start(&mut self, _team: TeamType) {}

    /// Notified when a move is made (by any player)
    fn notify_move(&mut self, _mv: &Move) {}

    /// Notified when the game ends
    fn game_end(&mut self) {}
}

/// Baseline bot: plays the first legal move it finds. Deterministic on
/// purpose so arena runs are reproducible; see the demos for a
/// rand-backed variant.
pub struct FirstMoveBot {
    name: String,
}

impl FirstMoveBot {
    pub fn new(name: String) -> Self {
        FirstMoveBot { name }
    }
}

impl Bot for FirstMoveBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(
        &mut self,
        state: &GameState,
        referee: &Referee,
        _time_limit: Duration,
    ) -> Option<(Position, Position)> {
        let moves = referee.legal_moves(state, state.current_turn());
        moves.first().map(|mv| (mv.from, mv.to))
    }
}

/// Greedy material bot: simulates each legal move and keeps the one that
/// maximizes its point-value lead over the strongest surviving enemy.
pub struct GreedyBot {
    name: String,
}

impl GreedyBot {
    pub fn new(name: String) -> Self {
        GreedyBot { name }
    }

    fn evaluate_move(&self, state: &GameState, mv: &Move) -> i64 {
        let Ok(next) = state.execute_move(mv) else {
            return i64::MIN;
        };
        let team = mv.team;

        // Walking into a Trap or a Templar can cost the mover itself;
        // losing the king that way outweighs any material gain
        if !next.has_king(team) {
            return i64::MIN / 2;
        }
        // A move that removes the last enemy king wins outright
        let enemy_kings = TeamType::ALL
            .iter()
            .filter(|&&t| t != team && !next.is_eliminated(t) && next.has_king(t))
            .count();
        if enemy_kings == 0 {
            return i64::MAX / 2;
        }

        let own = next.material_score(team) as i64;
        let best_enemy = TeamType::ALL
            .iter()
            .filter(|&&t| t != team)
            .map(|&t| next.material_score(t) as i64)
            .max()
            .unwrap_or(0);
        own - best_enemy
    }
}

impl Bot for GreedyBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(
        &mut self,
        state: &GameState,
        referee: &Referee,
        _time_limit: Duration,
    ) -> Option<(Position, Position)> {
        let moves = referee.legal_moves(state, state.current_turn());
        moves
            .iter()
            .max_by_key(|mv| self.evaluate_move(state, mv))
            .map(|mv| (mv.from, mv.to))
    }
}
