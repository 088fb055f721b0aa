//! The interface shared by both automaton kinds.

use crate::error::{AutomatonError, ValidationError};

/// Operations common to deterministic and non-deterministic automata.
///
/// The two kinds implement this separately; conversions between them
/// ([`crate::DFA::get_nfa`], [`crate::NFA::get_dfa`]) are explicit methods,
/// never implicit coercions. The synchronized operations carry a `Result`
/// because some implementations require both operands to share an alphabet.
pub trait FiniteAutomaton: Sized {
    /// Check whether the automaton accepts the given input, reading one
    /// character per step. Symbols outside the alphabet silently reject,
    /// the same way a missing transition does.
    fn accept(&self, input: &str) -> bool;

    /// Check the structural invariants: the initial state is declared, final
    /// states are declared, and every transition source, symbol, and
    /// destination is declared. Collects every offending element.
    fn validate(&self) -> Result<(), ValidationError>;

    /// `true` iff [`validate`](Self::validate) reports no offending element.
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// An automaton accepting the complement language, subject to the
    /// totality caveat documented by each implementation.
    fn complement(&self) -> Self;

    /// An automaton accepting the union of the two languages.
    fn union(&self, other: &Self) -> Result<Self, AutomatonError>;

    /// An automaton accepting the intersection of the two languages.
    fn intersection(&self, other: &Self) -> Result<Self, AutomatonError>;

    /// The product automaton over the shared alphabet.
    fn product(&self, other: &Self) -> Result<Self, AutomatonError>;
}
