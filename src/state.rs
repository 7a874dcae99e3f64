//! The immutable game state and its transition function.
//!
//! Every mutation-shaped operation (`execute_move`, `set_current_turn`,
//! `set_status`, `eliminate_player`) returns a new `GameState`; the old
//! value is never touched. Review mode and concurrent readers hold on to
//! historical states freely, and the only discipline callers need is to
//! thread the latest returned state into the next operation.

use crate::board;
use crate::moves::{CapturedPiece, Move, ValidationResult};
use crate::piece::{GamePiece, PieceType, TeamType};
use crate::position::{BOARD_SIZE, Position};
use crate::rules::RuleEngine;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid move: {0}")]
    InvalidMove(String),
    #[error("game already over")]
    GameOver,
    #[error("no piece at {0}")]
    NoPieceAt(Position),
    #[error("unsupported player count {0}, expected 2-4")]
    PlayerCount(u8),
}

/// Lifecycle of a game. Terminal variants are never left except by
/// constructing a fresh game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    NotStarted,
    InProgress,
    Paused,
    Check,
    Checkmate,
    Stalemate,
    Draw,
    Winner(TeamType),
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GameStatus::Checkmate | GameStatus::Stalemate | GameStatus::Draw | GameStatus::Winner(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EliminationReason {
    KingCaptured,
    Surrender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EliminationRecord {
    pub team: TeamType,
    pub reason: EliminationReason,
}

/// One executed ply: the normalized move, every piece it removed, and the
/// full board as it stood before the move. Records own their snapshot;
/// time-travel review reads them without reconstructing live states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub mov: Move,
    pub captures: Vec<CapturedPiece>,
    pub snapshot: Vec<GamePiece>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pieces: Vec<GamePiece>,
    current_turn: TeamType,
    status: GameStatus,
    eliminations: Vec<EliminationRecord>,
    history: Vec<MoveRecord>,
}

impl GameState {
    /// A fresh game for 2-4 players, built from the board factory.
    pub fn new(players: u8) -> Result<Self, GameError> {
        Ok(GameState {
            pieces: board::initial_board(players)?,
            current_turn: TeamType::Our,
            status: GameStatus::NotStarted,
            eliminations: Vec::new(),
            history: Vec::new(),
        })
    }

    /// A state from an explicit piece list. Positions must be unique;
    /// that invariant is the caller's to uphold and is checked here only
    /// in debug builds.
    pub fn from_pieces(pieces: Vec<GamePiece>, current_turn: TeamType) -> Self {
        debug_assert_eq!(
            pieces.iter().map(|p| p.position).collect::<HashSet<_>>().len(),
            pieces.len(),
            "two pieces share a square"
        );
        GameState {
            pieces,
            current_turn,
            status: GameStatus::InProgress,
            eliminations: Vec::new(),
            history: Vec::new(),
        }
    }

    // --- queries ---

    pub fn pieces(&self) -> &[GamePiece] {
        &self.pieces
    }

    pub fn piece_at(&self, position: Position) -> Option<&GamePiece> {
        self.pieces.iter().find(|p| p.position == position)
    }

    pub fn pieces_for_team(&self, team: TeamType) -> Vec<&GamePiece> {
        self.pieces.iter().filter(|p| p.team == team).collect()
    }

    /// The board as one team sees it: enemy Traps are filtered out.
    pub fn visible_pieces(&self, viewer: TeamType) -> Vec<&GamePiece> {
        self.pieces.iter().filter(|p| p.visible_to(viewer)).collect()
    }

    pub fn current_turn(&self) -> TeamType {
        self.current_turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    /// The board as it stood before move `ply` was made.
    pub fn snapshot_at(&self, ply: usize) -> Option<&[GamePiece]> {
        self.history.get(ply).map(|r| r.snapshot.as_slice())
    }

    pub fn is_eliminated(&self, team: TeamType) -> bool {
        self.eliminations.iter().any(|e| e.team == team)
    }

    pub fn elimination_reason(&self, team: TeamType) -> Option<EliminationReason> {
        self.eliminations
            .iter()
            .find(|e| e.team == team)
            .map(|e| e.reason)
    }

    pub fn has_king(&self, team: TeamType) -> bool {
        self.pieces
            .iter()
            .any(|p| p.team == team && p.piece_type == PieceType::King)
    }

    /// Sum of point values of the team's pieces on the board, for
    /// material-advantage display.
    pub fn material_score(&self, team: TeamType) -> u32 {
        self.pieces
            .iter()
            .filter(|p| p.team == team)
            .map(|p| p.piece_type.point_value())
            .sum()
    }

    // --- engine-backed queries ---

    /// Every legal move for a team, found by running the rule engine over
    /// all destination squares for each of the team's pieces. Turn
    /// ownership is deliberately not consulted here.
    pub fn legal_moves(&self, team: TeamType, engine: &RuleEngine) -> Vec<Move> {
        let mut moves = Vec::new();
        for piece in self.pieces.iter().filter(|p| p.team == team) {
            for x in 0..BOARD_SIZE {
                for y in 0..BOARD_SIZE {
                    let to = Position::new(x, y).expect("scan stays on the board");
                    if to == piece.position {
                        continue;
                    }
                    let mv = Move::new(piece.position, to, piece.piece_type, team);
                    if engine.validate(&mv, self).is_valid {
                        moves.push(mv);
                    }
                }
            }
        }
        moves
    }

    /// Legal destination squares for the piece at `from`; drives the
    /// move-indicator highlighting in a UI.
    pub fn valid_moves_from(&self, from: Position, engine: &RuleEngine) -> Vec<Position> {
        let Some(piece) = self.piece_at(from) else {
            return Vec::new();
        };
        let mut destinations = Vec::new();
        for x in 0..BOARD_SIZE {
            for y in 0..BOARD_SIZE {
                let to = Position::new(x, y).expect("scan stays on the board");
                if to == from {
                    continue;
                }
                let mv = Move::new(from, to, piece.piece_type, piece.team);
                if engine.validate(&mv, self).is_valid {
                    destinations.push(to);
                }
            }
        }
        destinations
    }

    /// True iff any enemy of `team` has a legal move ending on `position`.
    pub fn is_position_under_attack(
        &self,
        position: Position,
        team: TeamType,
        engine: &RuleEngine,
    ) -> bool {
        self.pieces
            .iter()
            .filter(|p| p.team != team)
            .any(|p| {
                let mv = Move::new(p.position, position, p.piece_type, p.team);
                engine.validate(&mv, self).is_valid
            })
    }

    // --- transitions ---

    pub fn set_current_turn(&self, team: TeamType) -> GameState {
        GameState {
            current_turn: team,
            ..self.clone()
        }
    }

    pub fn set_status(&self, status: GameStatus) -> GameState {
        GameState {
            status,
            ..self.clone()
        }
    }

    /// Mark a team as out of the game. Its pieces stay on the board; the
    /// turn rotation and the win check simply stop considering it.
    pub fn eliminate_player(&self, team: TeamType, reason: EliminationReason) -> GameState {
        if self.is_eliminated(team) {
            return self.clone();
        }
        let mut eliminations = self.eliminations.clone();
        eliminations.push(EliminationRecord { team, reason });
        GameState {
            eliminations,
            ..self.clone()
        }
    }

    /// The state-transition function. Applies an already-validated move
    /// atomically: all removals are computed against the pre-move board,
    /// then applied as one batch, so special abilities never observe each
    /// other's partial effects.
    ///
    /// Effects, in order of computation:
    /// - the piece at `to` is captured, if hostile;
    /// - a Trap or Templar captured this way takes the attacker with it;
    /// - a diagonal Farmer/King step onto an empty square removes the
    ///   en-passant victim behind the destination instead;
    /// - a Ram charge additionally removes every enemy on the square it
    ///   traverses (capped at its own path), with Trap/Templar victims
    ///   there also costing the Ram itself;
    /// - the surviving mover is relocated, flagged `en_passant` only for
    ///   an initial two-square Farmer/King advance;
    /// - the flag is cleared on every other piece;
    /// - any team whose last King just left the board is eliminated.
    ///
    /// The move is appended to history with the pre-move snapshot.
    pub fn execute_move(&self, mv: &Move) -> Result<GameState, GameError> {
        let mover = *self.piece_at(mv.from).ok_or(GameError::NoPieceAt(mv.from))?;

        let snapshot = self.pieces.clone();
        let (dx, dy) = mv.delta();
        let (fx, fy) = mv.team.direction();
        let forward = dx * fx + dy * fy;
        let lateral = dx * fy.abs() + dy * fx.abs();

        let mut victims: Vec<GamePiece> = Vec::new();
        let mut mover_survives = true;
        let mut is_en_passant = false;

        let lethal_to_attacker =
            |victim: &GamePiece| matches!(victim.piece_type, PieceType::Trap | PieceType::Templar);

        if let Some(target) = self.piece_at(mv.to) {
            if target.team != mv.team {
                victims.push(*target);
                if lethal_to_attacker(target) {
                    mover_survives = false;
                }
            }
        } else if matches!(mover.piece_type, PieceType::Farmer | PieceType::King)
            && forward == 1
            && lateral.abs() == 1
        {
            // En passant: the victim is one square behind the destination
            // along the mover's forward direction.
            if let Some(square) = mv.to.offset(-fx, -fy) {
                if let Some(victim) = self.piece_at(square) {
                    if victim.team != mv.team && victim.en_passant {
                        victims.push(*victim);
                        is_en_passant = true;
                    }
                }
            }
        }

        let charge = mover.piece_type == PieceType::Ram
            && (dx == 0 || dy == 0)
            && dx.abs().max(dy.abs()) == 2;
        if charge {
            let middle = mv
                .from
                .offset(dx.signum(), dy.signum())
                .expect("middle of a two-square charge is on the board");
            if let Some(victim) = self.piece_at(middle) {
                if victim.team != mv.team {
                    victims.push(*victim);
                    if lethal_to_attacker(victim) {
                        mover_survives = false;
                    }
                }
            }
        }

        let flag_en_passant = mover_survives
            && lateral == 0
            && forward == 2
            && match mover.piece_type {
                PieceType::Farmer => {
                    mv.team.forward_coord(mv.from) == mv.team.farmer_rank()
                }
                PieceType::King => !mover.has_moved,
                _ => false,
            };

        let removed: HashSet<Position> = victims.iter().map(|v| v.position).collect();
        let mut pieces = Vec::with_capacity(self.pieces.len());
        for piece in &self.pieces {
            if piece.position == mv.from || removed.contains(&piece.position) {
                continue;
            }
            // Any executed move expires every standing en-passant flag.
            let mut kept = *piece;
            kept.en_passant = false;
            pieces.push(kept);
        }
        if mover_survives {
            let mut moved = mover.moved_to(mv.to);
            moved.en_passant = flag_en_passant;
            pieces.push(moved);
        }

        let mut eliminations = self.eliminations.clone();
        for team in TeamType::ALL {
            let had_king = self
                .pieces
                .iter()
                .any(|p| p.team == team && p.piece_type == PieceType::King);
            let has_king = pieces
                .iter()
                .any(|p| p.team == team && p.piece_type == PieceType::King);
            let already = eliminations.iter().any(|e| e.team == team);
            if had_king && !has_king && !already {
                eliminations.push(EliminationRecord {
                    team,
                    reason: EliminationReason::KingCaptured,
                });
            }
        }

        let captures: Vec<CapturedPiece> = victims
            .iter()
            .map(|v| CapturedPiece {
                piece_type: v.piece_type,
                position: v.position,
            })
            .collect();
        let mut recorded = mv.clone();
        recorded.is_en_passant = is_en_passant;
        recorded.captured_piece = captures.first().copied();

        let mut history = self.history.clone();
        history.push(MoveRecord {
            mov: recorded,
            captures,
            snapshot,
        });

        let status = match self.status {
            GameStatus::NotStarted => GameStatus::InProgress,
            other => other,
        };

        Ok(GameState {
            pieces,
            current_turn: self.current_turn,
            status,
            eliminations,
            history,
        })
    }

    /// Convenience used at the facade boundary: a turn-ownership verdict
    /// phrased as a validation result, like any other rejection.
    pub fn turn_verdict(&self, mv: &Move) -> ValidationResult {
        if mv.team == self.current_turn {
            ValidationResult::valid()
        } else {
            ValidationResult::invalid(format!(
                "it is {}'s turn, not {}'s",
                self.current_turn, mv.team
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y).unwrap()
    }

    fn piece(piece_type: PieceType, team: TeamType, x: i32, y: i32) -> GamePiece {
        GamePiece::new(piece_type, team, pos(x, y))
    }

    fn mv(from: Position, to: Position, piece_type: PieceType, team: TeamType) -> Move {
        Move::new(from, to, piece_type, team)
    }

    fn assert_unique_positions(state: &GameState) {
        let squares: HashSet<_> = state.pieces().iter().map(|p| p.position).collect();
        assert_eq!(squares.len(), state.pieces().len());
    }

    #[test]
    fn test_ram_charge_kills_only_its_own_path() {
        // Enemy farmer on the traversed square, enemy king further on
        let state = GameState::from_pieces(
            vec![
                piece(PieceType::Ram, TeamType::Our, 8, 8),
                piece(PieceType::Farmer, TeamType::Opponent, 8, 9),
                piece(PieceType::King, TeamType::Opponent, 8, 12),
            ],
            TeamType::Our,
        );
        let next = state
            .execute_move(&mv(pos(8, 8), pos(8, 10), PieceType::Ram, TeamType::Our))
            .unwrap();

        assert!(next.piece_at(pos(8, 9)).is_none());
        assert_eq!(next.piece_at(pos(8, 12)).unwrap().piece_type, PieceType::King);
        assert_eq!(next.piece_at(pos(8, 10)).unwrap().piece_type, PieceType::Ram);
        assert_eq!(next.history()[0].captures.len(), 1);
        assert_unique_positions(&next);
    }

    #[test]
    fn test_ram_charge_double_kill() {
        let state = GameState::from_pieces(
            vec![
                piece(PieceType::Ram, TeamType::Our, 8, 8),
                piece(PieceType::Farmer, TeamType::Opponent, 8, 9),
                piece(PieceType::Farmer, TeamType::Opponent, 8, 10),
            ],
            TeamType::Our,
        );
        let next = state
            .execute_move(&mv(pos(8, 8), pos(8, 10), PieceType::Ram, TeamType::Our))
            .unwrap();

        assert!(next.piece_at(pos(8, 9)).is_none());
        assert_eq!(next.piece_at(pos(8, 10)).unwrap().piece_type, PieceType::Ram);
        assert_eq!(next.piece_at(pos(8, 10)).unwrap().team, TeamType::Our);
        assert_eq!(next.history()[0].captures.len(), 2);
    }

    #[test]
    fn test_ram_charge_passes_over_friends() {
        let state = GameState::from_pieces(
            vec![
                piece(PieceType::Ram, TeamType::Our, 8, 8),
                piece(PieceType::Farmer, TeamType::Our, 8, 9),
                piece(PieceType::Farmer, TeamType::Opponent, 8, 10),
            ],
            TeamType::Our,
        );
        let next = state
            .execute_move(&mv(pos(8, 8), pos(8, 10), PieceType::Ram, TeamType::Our))
            .unwrap();

        let friend = next.piece_at(pos(8, 9)).unwrap();
        assert_eq!(friend.team, TeamType::Our);
        assert_eq!(friend.piece_type, PieceType::Farmer);
        assert_eq!(next.history()[0].captures.len(), 1);
        assert_eq!(next.history()[0].captures[0].position, pos(8, 10));
    }

    #[test]
    fn test_farmer_double_step_sets_en_passant_then_enemy_captures() {
        let state = GameState::from_pieces(
            vec![
                piece(PieceType::Farmer, TeamType::Our, 6, 2),
                piece(PieceType::Farmer, TeamType::Opponent, 7, 4),
            ],
            TeamType::Our,
        );
        let after_advance = state
            .execute_move(&mv(pos(6, 2), pos(6, 4), PieceType::Farmer, TeamType::Our))
            .unwrap();
        assert!(after_advance.piece_at(pos(6, 4)).unwrap().en_passant);

        // Enemy farmer takes en passant on the very next ply
        let after_capture = after_advance
            .execute_move(&mv(pos(7, 4), pos(6, 3), PieceType::Farmer, TeamType::Opponent))
            .unwrap();
        assert!(after_capture.piece_at(pos(6, 4)).is_none(), "victim removed");
        assert_eq!(
            after_capture.piece_at(pos(6, 3)).unwrap().team,
            TeamType::Opponent
        );
        assert!(after_capture.history()[1].mov.is_en_passant);
        assert_eq!(after_capture.history()[1].captures[0].position, pos(6, 4));
    }

    #[test]
    fn test_at_most_one_en_passant_flag_survives_any_move() {
        let state = GameState::from_pieces(
            vec![
                piece(PieceType::Farmer, TeamType::Our, 6, 2),
                piece(PieceType::Farmer, TeamType::Opponent, 9, 13),
            ],
            TeamType::Our,
        );
        let first = state
            .execute_move(&mv(pos(6, 2), pos(6, 4), PieceType::Farmer, TeamType::Our))
            .unwrap();
        assert_eq!(first.pieces().iter().filter(|p| p.en_passant).count(), 1);

        // Opponent's own double step: the old flag expires, the new one is set
        let second = first
            .execute_move(&mv(pos(9, 13), pos(9, 11), PieceType::Farmer, TeamType::Opponent))
            .unwrap();
        assert!(!second.piece_at(pos(6, 4)).unwrap().en_passant);
        assert!(second.piece_at(pos(9, 11)).unwrap().en_passant);
        assert_eq!(second.pieces().iter().filter(|p| p.en_passant).count(), 1);
    }

    #[test]
    fn test_king_initial_double_step_sets_en_passant() {
        let state = GameState::from_pieces(
            vec![piece(PieceType::King, TeamType::Our, 7, 1)],
            TeamType::Our,
        );
        let next = state
            .execute_move(&mv(pos(7, 1), pos(7, 3), PieceType::King, TeamType::Our))
            .unwrap();
        assert!(next.piece_at(pos(7, 3)).unwrap().en_passant);

        // A later double-length stride no longer sets the flag
        let later = next
            .execute_move(&mv(pos(7, 3), pos(7, 5), PieceType::King, TeamType::Our))
            .unwrap();
        assert!(!later.piece_at(pos(7, 5)).unwrap().en_passant);
    }

    #[test]
    fn test_templar_retaliates_against_its_attacker() {
        let state = GameState::from_pieces(
            vec![
                piece(PieceType::Farmer, TeamType::Our, 6, 5),
                piece(PieceType::Templar, TeamType::Opponent, 7, 6),
            ],
            TeamType::Our,
        );
        let next = state
            .execute_move(&mv(pos(6, 5), pos(7, 6), PieceType::Farmer, TeamType::Our))
            .unwrap();
        // Mutual destruction: both squares end empty
        assert!(next.piece_at(pos(7, 6)).is_none());
        assert!(next.piece_at(pos(6, 5)).is_none());
        assert_eq!(next.history()[0].captures.len(), 1);
    }

    #[test]
    fn test_capturing_a_trap_costs_the_attacker() {
        let state = GameState::from_pieces(
            vec![
                piece(PieceType::Knight, TeamType::Our, 8, 8),
                piece(PieceType::Trap, TeamType::Opponent, 8, 11),
            ],
            TeamType::Our,
        );
        let next = state
            .execute_move(&mv(pos(8, 8), pos(8, 11), PieceType::Knight, TeamType::Our))
            .unwrap();
        assert!(next.piece_at(pos(8, 11)).is_none());
        assert!(next.pieces().is_empty());
    }

    #[test]
    fn test_scout_disarming_a_trap_dies_with_it() {
        let state = GameState::from_pieces(
            vec![
                piece(PieceType::Scout, TeamType::Our, 8, 8),
                piece(PieceType::Trap, TeamType::Opponent, 8, 10),
            ],
            TeamType::Our,
        );
        let next = state
            .execute_move(&mv(pos(8, 8), pos(8, 10), PieceType::Scout, TeamType::Our))
            .unwrap();
        assert!(next.pieces().is_empty());
    }

    #[test]
    fn test_ram_charge_into_a_trap_destroys_both() {
        let state = GameState::from_pieces(
            vec![
                piece(PieceType::Ram, TeamType::Our, 8, 8),
                piece(PieceType::Trap, TeamType::Opponent, 8, 9),
                piece(PieceType::Farmer, TeamType::Opponent, 8, 10),
            ],
            TeamType::Our,
        );
        let next = state
            .execute_move(&mv(pos(8, 8), pos(8, 10), PieceType::Ram, TeamType::Our))
            .unwrap();
        // Trap on the path and farmer at the destination both die, and so
        // does the Ram
        assert!(next.pieces().is_empty());
        assert_eq!(next.history()[0].captures.len(), 2);
    }

    #[test]
    fn test_losing_the_last_king_eliminates_the_team() {
        let state = GameState::from_pieces(
            vec![
                piece(PieceType::Knight, TeamType::Our, 8, 8),
                piece(PieceType::King, TeamType::Opponent, 8, 11),
                piece(PieceType::Farmer, TeamType::Opponent, 4, 11),
            ],
            TeamType::Our,
        );
        let next = state
            .execute_move(&mv(pos(8, 8), pos(8, 11), PieceType::Knight, TeamType::Our))
            .unwrap();
        assert!(next.is_eliminated(TeamType::Opponent));
        assert_eq!(
            next.elimination_reason(TeamType::Opponent),
            Some(EliminationReason::KingCaptured)
        );
        assert!(!next.is_eliminated(TeamType::Our));
    }

    #[test]
    fn test_history_snapshot_is_the_pre_move_board() {
        let state = GameState::new(2).unwrap();
        let opening = state.pieces().to_vec();
        let next = state
            .execute_move(&mv(pos(4, 2), pos(4, 3), PieceType::Farmer, TeamType::Our))
            .unwrap();

        assert_eq!(next.move_count(), 1);
        assert_eq!(next.snapshot_at(0).unwrap(), opening.as_slice());
        assert!(next.snapshot_at(1).is_none());
        // The original state is untouched
        assert_eq!(state.move_count(), 0);
        assert_eq!(state.pieces(), opening.as_slice());
    }

    #[test]
    fn test_first_move_starts_the_game() {
        let state = GameState::new(2).unwrap();
        assert_eq!(state.status(), GameStatus::NotStarted);
        let next = state
            .execute_move(&mv(pos(4, 2), pos(4, 3), PieceType::Farmer, TeamType::Our))
            .unwrap();
        assert_eq!(next.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_transitions_return_new_values() {
        let state = GameState::new(2).unwrap();
        let turned = state.set_current_turn(TeamType::Opponent);
        assert_eq!(state.current_turn(), TeamType::Our);
        assert_eq!(turned.current_turn(), TeamType::Opponent);

        let paused = state.set_status(GameStatus::Paused);
        assert_eq!(state.status(), GameStatus::NotStarted);
        assert_eq!(paused.status(), GameStatus::Paused);

        let surrendered = state.eliminate_player(TeamType::Our, EliminationReason::Surrender);
        assert!(!state.is_eliminated(TeamType::Our));
        assert!(surrendered.is_eliminated(TeamType::Our));
        // Eliminating twice keeps the first reason
        let again = surrendered.eliminate_player(TeamType::Our, EliminationReason::KingCaptured);
        assert_eq!(
            again.elimination_reason(TeamType::Our),
            Some(EliminationReason::Surrender)
        );
    }

    #[test]
    fn test_no_duplicate_squares_across_a_played_sequence() {
        let mut state = GameState::new(2).unwrap();
        let plies = [
            mv(pos(4, 2), pos(4, 4), PieceType::Farmer, TeamType::Our),
            mv(pos(11, 13), pos(11, 11), PieceType::Farmer, TeamType::Opponent),
            mv(pos(5, 1), pos(4, 3), PieceType::Knight, TeamType::Our),
            mv(pos(10, 14), pos(11, 12), PieceType::Knight, TeamType::Opponent),
        ];
        for ply in &plies {
            state = state.execute_move(ply).unwrap();
            assert_unique_positions(&state);
        }
        assert_eq!(state.move_count(), 4);
    }

    #[test]
    fn test_material_score_uses_point_values() {
        let state = GameState::from_pieces(
            vec![
                piece(PieceType::Farmer, TeamType::Our, 5, 5),
                piece(PieceType::Templar, TeamType::Our, 6, 5),
                piece(PieceType::King, TeamType::Our, 7, 5),
                piece(PieceType::Knight, TeamType::Opponent, 8, 5),
            ],
            TeamType::Our,
        );
        assert_eq!(state.material_score(TeamType::Our), 6);
        assert_eq!(state.material_score(TeamType::Opponent), 4);
    }

    #[test]
    fn test_valid_moves_from_matches_single_validations() {
        let engine = RuleEngine::new();
        let state = GameState::from_pieces(
            vec![piece(PieceType::Treasure, TeamType::Our, 8, 8)],
            TeamType::Our,
        );
        let destinations = state.valid_moves_from(pos(8, 8), &engine);
        assert_eq!(destinations.len(), 4);
        for to in [pos(7, 8), pos(9, 8), pos(8, 7), pos(8, 9)] {
            assert!(destinations.contains(&to));
        }
        assert!(state.valid_moves_from(pos(0, 0), &engine).is_empty());
    }

    #[test]
    fn test_visible_pieces_filters_enemy_traps() {
        let state = GameState::from_pieces(
            vec![
                piece(PieceType::Trap, TeamType::Our, 5, 5),
                piece(PieceType::Trap, TeamType::Opponent, 9, 9),
                piece(PieceType::King, TeamType::Opponent, 7, 14),
            ],
            TeamType::Our,
        );
        let ours = state.visible_pieces(TeamType::Our);
        assert_eq!(ours.len(), 2);
        assert!(ours.iter().all(|p| p.position != pos(9, 9)));

        let theirs = state.visible_pieces(TeamType::Opponent);
        assert_eq!(theirs.len(), 2);
        assert!(theirs.iter().all(|p| p.position != pos(5, 5)));
    }

    #[test]
    fn test_is_position_under_attack() {
        let engine = RuleEngine::new();
        let state = GameState::from_pieces(
            vec![
                piece(PieceType::King, TeamType::Our, 8, 8),
                piece(PieceType::Knight, TeamType::Opponent, 8, 11),
            ],
            TeamType::Our,
        );
        // The knight reaches (8,8) with a three-square orthogonal jump
        assert!(state.is_position_under_attack(pos(8, 8), TeamType::Our, &engine));
        assert!(!state.is_position_under_attack(pos(4, 8), TeamType::Our, &engine));
        // A piece is not "attacked" by its own team
        assert!(!state.is_position_under_attack(pos(8, 11), TeamType::Opponent, &engine));
    }
}
