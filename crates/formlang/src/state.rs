//! State types for automata.

use fixedbitset::FixedBitSet;
use std::fmt;

/// A state label. Opaque and hashable; the engine attaches no meaning to it.
pub type State = String;

/// Canonical label for an ordered pair of states, used by the product-style
/// constructions so that distinct traversal orders yield the same identity.
pub(crate) fn pair_label(a: &str, b: &str) -> State {
    format!("({a},{b})")
}

/// Canonical label for a set of states. Callers must pass the members
/// already sorted.
pub(crate) fn set_label(members: &[State]) -> State {
    format!("{{{}}}", members.join(","))
}

/// A set of states over a dense `0..n` index, implemented with a fixed-size
/// bit set. Used where states have been enumerated into dense indices, such
/// as the minimizer's partition blocks.
#[derive(Clone, PartialEq, Eq)]
pub struct StateSet {
    bits: FixedBitSet,
}

impl StateSet {
    /// Create a new empty state set with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    /// Insert a state index into the set.
    pub fn insert(&mut self, state: usize) {
        if state >= self.bits.len() {
            self.bits.grow(state + 1);
        }
        self.bits.insert(state);
    }

    /// Check if the set contains a state index.
    pub fn contains(&self, state: usize) -> bool {
        state < self.bits.len() && self.bits.contains(state)
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// Get the number of states in the set.
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Iterate over all state indices in the set, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.ones()
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_set_basic() {
        let mut set = StateSet::with_capacity(10);
        assert!(set.is_empty());

        set.insert(3);
        set.insert(7);
        assert!(!set.is_empty());
        assert_eq!(set.len(), 2);
        assert!(set.contains(3));
        assert!(set.contains(7));
        assert!(!set.contains(5));
    }

    #[test]
    fn test_state_set_grows() {
        let mut set = StateSet::with_capacity(2);
        set.insert(100);
        assert!(set.contains(100));
        assert!(!set.contains(99));
    }

    #[test]
    fn test_iter_ascending() {
        let mut set = StateSet::with_capacity(8);
        set.insert(5);
        set.insert(1);
        set.insert(3);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_labels() {
        assert_eq!(pair_label("q0", "s1"), "(q0,s1)");
        assert_eq!(
            set_label(&["q0".to_string(), "q2".to_string()]),
            "{q0,q2}"
        );
        assert_eq!(set_label(&[]), "{}");
    }
}
