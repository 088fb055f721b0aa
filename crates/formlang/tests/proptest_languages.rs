//! Property-based tests of the language-level guarantees: conversions and
//! canonicalizations must never change the accepted language, and the
//! boolean combinators must agree with the boolean operators on membership.

use formlang::{DFA, FiniteAutomaton, NFA};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

const STATES: [&str; 4] = ["q0", "q1", "q2", "q3"];
const SYMBOLS: [&str; 2] = ["a", "b"];

fn label_set(labels: &[&str]) -> HashSet<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

/// A random NFA over four states and the alphabet {a,b}, with epsilon
/// transitions allowed (symbol index 2).
fn arb_nfa() -> impl Strategy<Value = NFA> {
    let edge = (0..STATES.len(), 0..SYMBOLS.len() + 1, 0..STATES.len());
    (
        proptest::collection::vec(edge, 0..14),
        proptest::collection::vec(any::<bool>(), STATES.len()),
    )
        .prop_map(|(edges, finals)| {
            let mut transitions: HashMap<String, HashMap<String, HashSet<String>>> =
                HashMap::new();
            for (source, symbol, target) in edges {
                let symbol = SYMBOLS
                    .get(symbol)
                    .map_or_else(String::new, |s| s.to_string());
                transitions
                    .entry(STATES[source].to_string())
                    .or_default()
                    .entry(symbol)
                    .or_default()
                    .insert(STATES[target].to_string());
            }
            let final_states = STATES
                .iter()
                .zip(finals)
                .filter(|(_, is_final)| *is_final)
                .map(|(s, _)| s.to_string())
                .collect();
            NFA::new(
                label_set(&STATES),
                label_set(&SYMBOLS),
                transitions,
                "q0".to_string(),
                final_states,
            )
        })
}

/// A random DFA over three states and the alphabet {a,b} whose transition
/// function is total.
fn arb_total_dfa() -> impl Strategy<Value = DFA> {
    let states = ["q0", "q1", "q2"];
    (
        proptest::collection::vec(0..states.len(), states.len() * SYMBOLS.len()),
        proptest::collection::vec(any::<bool>(), states.len()),
    )
        .prop_map(move |(targets, finals)| {
            let mut transitions: HashMap<String, HashMap<String, String>> = HashMap::new();
            for (i, source) in states.iter().enumerate() {
                for (j, symbol) in SYMBOLS.iter().enumerate() {
                    let target = states[targets[i * SYMBOLS.len() + j]];
                    transitions
                        .entry(source.to_string())
                        .or_default()
                        .insert(symbol.to_string(), target.to_string());
                }
            }
            let final_states = states
                .iter()
                .zip(finals)
                .filter(|(_, is_final)| *is_final)
                .map(|(s, _)| s.to_string())
                .collect();
            DFA::new(
                label_set(&states),
                label_set(&SYMBOLS),
                transitions,
                "q0".to_string(),
                final_states,
            )
        })
}

fn arb_input() -> impl Strategy<Value = String> {
    "[ab]{0,6}"
}

proptest! {
    #[test]
    fn determinization_preserves_language(nfa in arb_nfa(), input in arb_input()) {
        prop_assert_eq!(nfa.accept(&input), nfa.get_dfa().accept(&input));
    }

    #[test]
    fn epsilon_removal_preserves_language(nfa in arb_nfa(), input in arb_input()) {
        let stripped = nfa.remove_epsilon_transitions();
        prop_assert!(!stripped.contains_epsilon_transitions());
        prop_assert_eq!(nfa.accept(&input), stripped.accept(&input));
    }

    #[test]
    fn nfa_minimization_preserves_language(nfa in arb_nfa(), input in arb_input()) {
        let min = nfa.minimize();
        prop_assert!(min.states.len() <= nfa.get_dfa().states.len());
        prop_assert_eq!(nfa.accept(&input), min.accept(&input));
    }

    #[test]
    fn dfa_minimization_never_grows(dfa in arb_total_dfa(), input in arb_input()) {
        let min = dfa.minimize();
        prop_assert!(min.states.len() <= dfa.states.len());
        prop_assert_eq!(dfa.accept(&input), min.accept(&input));
    }

    #[test]
    fn renumbering_is_only_a_relabeling(nfa in arb_nfa(), input in arb_input()) {
        let mut renumbered = nfa.clone();
        renumbered.renumber("r");
        prop_assert_eq!(renumbered.states.len(), nfa.states.len());
        prop_assert_eq!(nfa.accept(&input), renumbered.accept(&input));
    }

    #[test]
    fn complement_is_involutive_on_total_dfa(dfa in arb_total_dfa(), input in arb_input()) {
        prop_assert_eq!(
            dfa.accept(&input),
            dfa.complement().complement().accept(&input)
        );
        prop_assert_eq!(dfa.accept(&input), !dfa.complement().accept(&input));
    }

    #[test]
    fn boolean_combinators_match_membership(
        a in arb_total_dfa(),
        b in arb_total_dfa(),
        input in arb_input(),
    ) {
        let (x, y) = (a.accept(&input), b.accept(&input));
        prop_assert_eq!(a.union(&b).unwrap().accept(&input), x || y);
        prop_assert_eq!(a.intersection(&b).unwrap().accept(&input), x && y);
        prop_assert_eq!(a.difference(&b).unwrap().accept(&input), x && !y);
        prop_assert_eq!(a.symmetric_difference(&b).unwrap().accept(&input), x != y);
    }

    // The synchronized intersection steps both operands together, so an
    // epsilon move available on one side only is never taken; the membership
    // equation holds for epsilon-free operands.
    #[test]
    fn nfa_intersection_matches_membership(
        a in arb_nfa(),
        b in arb_nfa(),
        input in arb_input(),
    ) {
        let a = a.remove_epsilon_transitions();
        let b = b.remove_epsilon_transitions();
        let both = a.intersection(&b).unwrap();
        prop_assert_eq!(both.accept(&input), a.accept(&input) && b.accept(&input));
    }

    #[test]
    fn acceptance_is_pure(nfa in arb_nfa(), input in arb_input()) {
        prop_assert_eq!(nfa.accept(&input), nfa.accept(&input));
    }
}
