//! Error types for automaton validation and composition.

use crate::state::State;
use crate::symbol::Symbol;
use thiserror::Error;

/// Structural validation failure.
///
/// Validation scans the whole automaton in one pass and collects every
/// offending element, so a single call gives a complete diagnosis instead of
/// failing fast on the first problem.
#[derive(Debug, Error, Clone, Default, PartialEq, Eq)]
#[error("invalid automaton: undeclared states {undeclared_states:?}, undeclared symbols {undeclared_symbols:?}")]
pub struct ValidationError {
    /// States referenced by the initial state, the final-state set, or a
    /// transition endpoint without being declared in the state set.
    pub undeclared_states: Vec<State>,
    /// Symbols used as transition keys without being declared in the
    /// alphabet. Epsilon is exempt for NFAs.
    pub undeclared_symbols: Vec<Symbol>,
}

impl ValidationError {
    pub(crate) fn record_state(&mut self, state: &str) {
        if !self.undeclared_states.iter().any(|s| s == state) {
            self.undeclared_states.push(state.to_string());
        }
    }

    pub(crate) fn record_symbol(&mut self, symbol: &str) {
        if !self.undeclared_symbols.iter().any(|s| s == symbol) {
            self.undeclared_symbols.push(symbol.to_string());
        }
    }

    pub(crate) fn into_result(mut self) -> Result<(), ValidationError> {
        if self.undeclared_states.is_empty() && self.undeclared_symbols.is_empty() {
            Ok(())
        } else {
            self.undeclared_states.sort();
            self.undeclared_symbols.sort();
            Err(self)
        }
    }
}

/// Errors reported by automaton operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    /// The two operands of a synchronized binary operation are defined over
    /// different alphabets. Reported before any traversal begins.
    #[error("operands must be defined over the same alphabet")]
    AlphabetMismatch,

    /// An input string used a symbol outside the automaton's alphabet while
    /// strict-alphabet acceptance was requested.
    #[error("symbol {0:?} is not declared in the alphabet")]
    UndeclaredSymbol(Symbol),

    /// A label handed to an operation that introduces a fresh state is
    /// already taken by an existing state.
    #[error("state {0:?} is already declared")]
    DuplicateState(State),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_collects_without_duplicates() {
        let mut err = ValidationError::default();
        err.record_state("q9");
        err.record_state("q9");
        err.record_symbol("z");
        assert_eq!(err.undeclared_states, vec!["q9"]);
        assert_eq!(err.undeclared_symbols, vec!["z"]);
        assert!(err.clone().into_result().is_err());
    }

    #[test]
    fn test_empty_report_is_ok() {
        assert!(ValidationError::default().into_result().is_ok());
    }

    #[test]
    fn test_display() {
        let err = AutomatonError::UndeclaredSymbol("x".to_string());
        assert_eq!(
            err.to_string(),
            "symbol \"x\" is not declared in the alphabet"
        );
    }
}
