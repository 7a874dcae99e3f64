//! Per-piece move validators.
//!
//! One validator per piece type, each implementing [`MoveValidator`] over
//! exactly one `PieceType`. Validators are pure: they read the board and
//! the candidate move and return a verdict, nothing else.
//!
//! Shared invariant: any move spanning more than one square must have
//! every square strictly between source and destination empty, unless the
//! piece is an explicit jumper (Knight) or a charging Ram, which clears
//! enemies off its own path instead of being blocked by them.

use crate::moves::{Move, ValidationResult};
use crate::piece::{GamePiece, PieceType, TeamType};
use crate::position::Position;
use crate::rules::MoveValidator;
use crate::state::GameState;

/// All nine Citadel validators, ready for registration.
pub fn all() -> Vec<Box<dyn MoveValidator>> {
    vec![
        Box::new(FarmerValidator),
        Box::new(RamValidator),
        Box::new(TrapValidator),
        Box::new(KnightValidator),
        Box::new(TemplarValidator),
        Box::new(ScoutValidator),
        Box::new(TrebuchetValidator),
        Box::new(TreasureValidator),
        Box::new(KingValidator),
    ]
}

/// Checks shared by every piece type: the move must reference a real
/// piece of the declared type and team, must go somewhere, must not rest
/// in a forbidden zone and must not land on a friendly piece.
fn check_request<'a>(mv: &Move, state: &'a GameState) -> Result<&'a GamePiece, ValidationResult> {
    if mv.from == mv.to {
        return Err(ValidationResult::invalid("move must change square"));
    }
    let piece = state
        .piece_at(mv.from)
        .ok_or_else(|| ValidationResult::invalid(format!("no piece at {}", mv.from)))?;
    if piece.team != mv.team {
        return Err(ValidationResult::invalid(format!(
            "piece at {} belongs to {}, not {}",
            mv.from, piece.team, mv.team
        )));
    }
    if piece.piece_type != mv.piece_type {
        return Err(ValidationResult::invalid(format!(
            "piece at {} is a {}, not a {}",
            mv.from, piece.piece_type, mv.piece_type
        )));
    }
    if mv.to.is_in_forbidden_zone() {
        return Err(ValidationResult::invalid(format!(
            "{} is inside a forbidden corner zone",
            mv.to
        )));
    }
    if let Some(target) = state.piece_at(mv.to) {
        if target.team == mv.team {
            return Err(ValidationResult::invalid(format!(
                "{} is occupied by a friendly piece",
                mv.to
            )));
        }
    }
    Ok(piece)
}

/// Unit step from `from` toward `to` if the two squares share a rank,
/// file, or diagonal; None otherwise.
fn line_step(from: Position, to: Position) -> Option<(i32, i32)> {
    let (dx, dy) = from.delta(to);
    if dx == 0 && dy == 0 {
        return None;
    }
    if dx == 0 || dy == 0 || dx.abs() == dy.abs() {
        Some((dx.signum(), dy.signum()))
    } else {
        None
    }
}

/// Squares strictly between `from` and `to` along a straight line.
fn path_between(from: Position, to: Position) -> Vec<Position> {
    let mut squares = Vec::new();
    if let Some((sx, sy)) = line_step(from, to) {
        let mut cursor = from.offset(sx, sy);
        while let Some(square) = cursor {
            if square == to {
                break;
            }
            squares.push(square);
            cursor = square.offset(sx, sy);
        }
    }
    squares
}

/// First occupied square strictly between `from` and `to`, if any.
fn first_blocker(state: &GameState, from: Position, to: Position) -> Option<Position> {
    path_between(from, to)
        .into_iter()
        .find(|square| state.piece_at(*square).is_some())
}

/// Forward and lateral components of a displacement relative to a team's
/// direction vector. `forward` is positive toward the enemy.
fn oriented_delta(mv: &Move) -> (i32, i32) {
    let (dx, dy) = mv.delta();
    let (fx, fy) = mv.team.direction();
    let forward = dx * fx + dy * fy;
    let lateral = dx * fy.abs() + dy * fx.abs();
    (forward, lateral)
}

/// The square holding an en-passant victim for a diagonal step to `to`:
/// one square behind the destination, seen from the mover's direction.
fn en_passant_victim<'a>(
    state: &'a GameState,
    to: Position,
    team: TeamType,
) -> Option<&'a GamePiece> {
    let (fx, fy) = team.direction();
    let square = to.offset(-fx, -fy)?;
    state
        .piece_at(square)
        .filter(|p| p.team != team && p.en_passant)
}

/// Destination check for the disarming movers (Scout, King): an enemy
/// Trap reads as an empty square to them, and stepping onto it is how the
/// Trap gets triggered.
fn empty_or_hidden_trap(state: &GameState, to: Position, team: TeamType) -> bool {
    match state.piece_at(to) {
        None => true,
        Some(p) => p.team != team && p.piece_type == PieceType::Trap,
    }
}

// ---------------------------------------------------------------------------
// Farmer
// ---------------------------------------------------------------------------

/// Forward-only foot soldier. One square forward onto an empty square,
/// two from the starting rank (flagging itself for en passant), or a
/// single forward-diagonal capture.
pub struct FarmerValidator;

impl MoveValidator for FarmerValidator {
    fn can_validate(&self, piece_type: PieceType) -> bool {
        piece_type == PieceType::Farmer
    }

    fn validate(&self, mv: &Move, state: &GameState) -> ValidationResult {
        if let Err(result) = check_request(mv, state) {
            return result;
        }
        let (forward, lateral) = oriented_delta(mv);
        let (fx, fy) = mv.team.direction();

        match (forward, lateral.abs()) {
            (1, 0) => {
                if state.piece_at(mv.to).is_some() {
                    ValidationResult::invalid(format!("{} is occupied", mv.to))
                } else {
                    ValidationResult::valid()
                }
            }
            (2, 0) => {
                if mv.team.forward_coord(mv.from) != mv.team.farmer_rank() {
                    return ValidationResult::invalid(
                        "Farmer may only advance two squares from its starting rank",
                    );
                }
                let middle = mv
                    .from
                    .offset(fx, fy)
                    .expect("middle of a two-square advance is on the board");
                if state.piece_at(middle).is_some() {
                    return ValidationResult::blocked("advance is blocked", middle);
                }
                if state.piece_at(mv.to).is_some() {
                    return ValidationResult::invalid(format!("{} is occupied", mv.to));
                }
                ValidationResult::valid()
            }
            (1, 1) => {
                if state.piece_at(mv.to).is_some() {
                    // Friendly occupancy was already rejected; an enemy
                    // piece here is a plain diagonal capture.
                    ValidationResult::valid()
                } else if en_passant_victim(state, mv.to, mv.team).is_some() {
                    ValidationResult::valid()
                } else {
                    ValidationResult::invalid("Farmer captures diagonally only")
                }
            }
            _ => ValidationResult::invalid(
                "Farmer moves one or two squares forward, or captures one square diagonally forward",
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Ram
// ---------------------------------------------------------------------------

/// Battering ram. One square in any direction with capture by
/// displacement, or a two-square orthogonal charge that clears every
/// enemy on the traversed squares. Friendly pieces on the charge path are
/// passed over, never harmed; only the destination must be free of them.
pub struct RamValidator;

impl MoveValidator for RamValidator {
    fn can_validate(&self, piece_type: PieceType) -> bool {
        piece_type == PieceType::Ram
    }

    fn validate(&self, mv: &Move, state: &GameState) -> ValidationResult {
        if let Err(result) = check_request(mv, state) {
            return result;
        }
        let (dx, dy) = mv.delta();
        let chebyshev = dx.abs().max(dy.abs());
        let orthogonal = dx == 0 || dy == 0;

        if chebyshev == 1 {
            ValidationResult::valid()
        } else if chebyshev == 2 && orthogonal {
            ValidationResult::valid()
        } else {
            ValidationResult::invalid(
                "Ram moves one square in any direction or charges two squares orthogonally",
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Trap
// ---------------------------------------------------------------------------

/// Hidden hazard. Moves one or two squares strictly diagonally onto empty
/// squares only; it never captures by moving. Its teeth are in
/// `execute_move`, which destroys whatever walks onto it.
pub struct TrapValidator;

impl MoveValidator for TrapValidator {
    fn can_validate(&self, piece_type: PieceType) -> bool {
        piece_type == PieceType::Trap
    }

    fn validate(&self, mv: &Move, state: &GameState) -> ValidationResult {
        if let Err(result) = check_request(mv, state) {
            return result;
        }
        let (dx, dy) = mv.delta();
        if dx.abs() != dy.abs() || !(1..=2).contains(&dx.abs()) {
            return ValidationResult::invalid("Trap moves one or two squares diagonally");
        }
        if let Some(blocker) = first_blocker(state, mv.from, mv.to) {
            return ValidationResult::blocked("path is blocked", blocker);
        }
        if state.piece_at(mv.to).is_some() {
            return ValidationResult::invalid("Trap cannot capture; destination must be empty");
        }
        ValidationResult::valid()
    }
}

// ---------------------------------------------------------------------------
// Knight
// ---------------------------------------------------------------------------

/// The only jumper: an L-shaped leap, exactly three squares orthogonally,
/// or exactly two diagonally, ignoring everything in between.
pub struct KnightValidator;

impl MoveValidator for KnightValidator {
    fn can_validate(&self, piece_type: PieceType) -> bool {
        piece_type == PieceType::Knight
    }

    fn validate(&self, mv: &Move, state: &GameState) -> ValidationResult {
        if let Err(result) = check_request(mv, state) {
            return result;
        }
        let (dx, dy) = mv.delta();
        let (ax, ay) = (dx.abs(), dy.abs());
        let l_shape = (ax == 1 && ay == 2) || (ax == 2 && ay == 1);
        let orthogonal_three = (ax == 3 && ay == 0) || (ax == 0 && ay == 3);
        let diagonal_two = ax == 2 && ay == 2;

        if l_shape || orthogonal_three || diagonal_two {
            ValidationResult::valid()
        } else {
            ValidationResult::invalid(
                "Knight jumps in an L, three squares orthogonally, or two diagonally",
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Templar
// ---------------------------------------------------------------------------

/// Holy guard. One square orthogonally with capture by displacement, or
/// two squares orthogonally through and onto empty squares (no capture at
/// range). Its retaliation against attackers is a state-transition
/// effect, not a movement rule.
pub struct TemplarValidator;

impl MoveValidator for TemplarValidator {
    fn can_validate(&self, piece_type: PieceType) -> bool {
        piece_type == PieceType::Templar
    }

    fn validate(&self, mv: &Move, state: &GameState) -> ValidationResult {
        if let Err(result) = check_request(mv, state) {
            return result;
        }
        let (dx, dy) = mv.delta();
        if dx != 0 && dy != 0 {
            return ValidationResult::invalid("Templar moves orthogonally");
        }
        match dx.abs().max(dy.abs()) {
            1 => ValidationResult::valid(),
            2 => {
                if let Some(blocker) = first_blocker(state, mv.from, mv.to) {
                    return ValidationResult::blocked("path is blocked", blocker);
                }
                if state.piece_at(mv.to).is_some() {
                    return ValidationResult::invalid("Templar cannot capture at range");
                }
                ValidationResult::valid()
            }
            _ => ValidationResult::invalid("Templar moves one or two squares orthogonally"),
        }
    }
}

// ---------------------------------------------------------------------------
// Scout
// ---------------------------------------------------------------------------

/// Fast and unarmed: two or three squares orthogonally over an entirely
/// empty path, never capturing — except that an enemy Trap reads as empty
/// to a Scout, which may step onto it to disarm it.
pub struct ScoutValidator;

impl MoveValidator for ScoutValidator {
    fn can_validate(&self, piece_type: PieceType) -> bool {
        piece_type == PieceType::Scout
    }

    fn validate(&self, mv: &Move, state: &GameState) -> ValidationResult {
        if let Err(result) = check_request(mv, state) {
            return result;
        }
        let (dx, dy) = mv.delta();
        if dx != 0 && dy != 0 {
            return ValidationResult::invalid("Scout moves orthogonally");
        }
        if !(2..=3).contains(&dx.abs().max(dy.abs())) {
            return ValidationResult::invalid("Scout moves two or three squares orthogonally");
        }
        if let Some(blocker) = first_blocker(state, mv.from, mv.to) {
            return ValidationResult::blocked("path is blocked", blocker);
        }
        if !empty_or_hidden_trap(state, mv.to, mv.team) {
            return ValidationResult::invalid("Scout cannot capture by moving");
        }
        ValidationResult::valid()
    }
}

// ---------------------------------------------------------------------------
// Trebuchet
// ---------------------------------------------------------------------------

/// Siege engine. Crawls one or two squares orthogonally onto empty
/// squares. Its ranged attack is a separate special-ability action,
/// represented on `Move` by the `is_special_ability` flag and resolved
/// outside movement validation.
pub struct TrebuchetValidator;

impl MoveValidator for TrebuchetValidator {
    fn can_validate(&self, piece_type: PieceType) -> bool {
        piece_type == PieceType::Trebuchet
    }

    fn validate(&self, mv: &Move, state: &GameState) -> ValidationResult {
        if let Err(result) = check_request(mv, state) {
            return result;
        }
        let (dx, dy) = mv.delta();
        if dx != 0 && dy != 0 {
            return ValidationResult::invalid("Trebuchet moves orthogonally");
        }
        if !(1..=2).contains(&dx.abs().max(dy.abs())) {
            return ValidationResult::invalid("Trebuchet moves one or two squares orthogonally");
        }
        if let Some(blocker) = first_blocker(state, mv.from, mv.to) {
            return ValidationResult::blocked("path is blocked", blocker);
        }
        if state.piece_at(mv.to).is_some() {
            return ValidationResult::invalid("Trebuchet cannot capture by moving");
        }
        ValidationResult::valid()
    }
}

// ---------------------------------------------------------------------------
// Treasure
// ---------------------------------------------------------------------------

/// The prize. Shuffles exactly one square orthogonally onto an empty
/// square and never captures.
pub struct TreasureValidator;

impl MoveValidator for TreasureValidator {
    fn can_validate(&self, piece_type: PieceType) -> bool {
        piece_type == PieceType::Treasure
    }

    fn validate(&self, mv: &Move, state: &GameState) -> ValidationResult {
        if let Err(result) = check_request(mv, state) {
            return result;
        }
        let (dx, dy) = mv.delta();
        let orthogonal_one = (dx.abs() == 1 && dy == 0) || (dx == 0 && dy.abs() == 1);
        if !orthogonal_one {
            return ValidationResult::invalid("Treasure moves one square orthogonally");
        }
        if state.piece_at(mv.to).is_some() {
            return ValidationResult::invalid("Treasure cannot capture");
        }
        ValidationResult::valid()
    }
}

// ---------------------------------------------------------------------------
// King
// ---------------------------------------------------------------------------

/// Strides two or three squares orthogonally over an empty path onto an
/// empty square (an enemy Trap reads as empty and is disarmed by the
/// step). Like the Farmer it may take a single forward-diagonal step, but
/// only to capture en passant.
pub struct KingValidator;

impl MoveValidator for KingValidator {
    fn can_validate(&self, piece_type: PieceType) -> bool {
        piece_type == PieceType::King
    }

    fn validate(&self, mv: &Move, state: &GameState) -> ValidationResult {
        if let Err(result) = check_request(mv, state) {
            return result;
        }
        let (dx, dy) = mv.delta();
        let orthogonal = dx == 0 || dy == 0;
        let span = dx.abs().max(dy.abs());

        if orthogonal && (2..=3).contains(&span) {
            if let Some(blocker) = first_blocker(state, mv.from, mv.to) {
                return ValidationResult::blocked("path is blocked", blocker);
            }
            if !empty_or_hidden_trap(state, mv.to, mv.team) {
                return ValidationResult::invalid("King cannot capture by moving");
            }
            return ValidationResult::valid();
        }

        let (forward, lateral) = oriented_delta(mv);
        if forward == 1 && lateral.abs() == 1 {
            if state.piece_at(mv.to).is_none()
                && en_passant_victim(state, mv.to, mv.team).is_some()
            {
                return ValidationResult::valid();
            }
            return ValidationResult::invalid("King steps diagonally only to capture en passant");
        }

        ValidationResult::invalid("King moves two or three squares orthogonally")
    }
}
