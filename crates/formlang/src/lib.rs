//! Finite automata as explicit data values, with the classical algorithms
//! that operate on them:
//! - Deterministic and non-deterministic acceptance (including epsilon moves)
//! - Structural validation with a complete diagnosis of offending elements
//! - Epsilon closure computation and elimination
//! - Subset construction (NFA to DFA conversion)
//! - Moore partition-refinement minimization
//! - The boolean combinators: complement, union, intersection, difference,
//!   symmetric difference, and the product automaton
//! - Graphviz DOT export
//!
//! Automata are immutable values; every combinator allocates a fresh result.
//! The one exception is [`NFA::renumber`], which relabels its receiver in
//! place to canonicalize presentation after a derivation chain.

mod dfa;
mod dot;
mod error;
mod fa;
mod nfa;
mod state;
mod subset_construction;
mod symbol;

pub use dfa::DFA;
pub use dot::DotStyle;
pub use error::{AutomatonError, ValidationError};
pub use fa::FiniteAutomaton;
pub use nfa::NFA;
pub use state::{State, StateSet};
pub use subset_construction::subset_construction;
pub use symbol::{EPSILON, Symbol, is_epsilon};
