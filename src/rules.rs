//! The rule engine: a registry of per-piece validators.
//!
//! The engine owns no piece rules itself. It routes a candidate move to
//! the single validator claiming the move's piece type and normalizes the
//! failure report when no validator claims it. Adding a piece type means
//! adding one validator and one registration, nothing else.

use crate::moves::{Move, ValidationResult};
use crate::piece::PieceType;
use crate::state::GameState;
use crate::validators;
use std::collections::HashMap;

/// A single capability: deciding legality of one piece type's moves.
///
/// Implementations are read-only and deterministic over (move, state);
/// validation never mutates anything.
pub trait MoveValidator: Send + Sync {
    fn can_validate(&self, piece_type: PieceType) -> bool;
    fn validate(&self, mv: &Move, state: &GameState) -> ValidationResult;
}

pub struct RuleEngine {
    registry: HashMap<PieceType, Box<dyn MoveValidator>>,
}

impl RuleEngine {
    /// An engine with every Citadel piece validator registered.
    pub fn new() -> Self {
        let mut engine = RuleEngine {
            registry: HashMap::new(),
        };
        for validator in validators::all() {
            engine.register(validator);
        }
        engine
    }

    /// An engine with no validators; used to build partial rule sets in
    /// tests and tooling.
    pub fn empty() -> Self {
        RuleEngine {
            registry: HashMap::new(),
        }
    }

    /// Register a validator under the piece type it claims. Each
    /// validator claims exactly one type; a later registration for the
    /// same type replaces the earlier one.
    pub fn register(&mut self, validator: Box<dyn MoveValidator>) {
        if let Some(claimed) = PieceType::ALL
            .into_iter()
            .find(|t| validator.can_validate(*t))
        {
            self.registry.insert(claimed, validator);
        }
    }

    /// Decide legality of a candidate move. Advisory only: the state is
    /// untouched regardless of outcome, and an unknown piece type
    /// degrades to an invalid verdict rather than a panic.
    pub fn validate(&self, mv: &Move, state: &GameState) -> ValidationResult {
        match self.registry.get(&mv.piece_type) {
            Some(validator) => validator.validate(mv, state),
            None => ValidationResult::invalid(format!(
                "no validator registered for piece type {}",
                mv.piece_type
            )),
        }
    }

    pub fn has_validator_for(&self, piece_type: PieceType) -> bool {
        self.registry.contains_key(&piece_type)
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}
