//! Subset construction algorithm for converting an NFA to a DFA.

use crate::dfa::DFA;
use crate::nfa::NFA;
use crate::state::{State, set_label};
use crate::symbol::{Symbol, is_epsilon};
use indexmap::IndexSet;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// Convert an NFA to an equivalent DFA using the powerset construction.
///
/// Epsilon transitions are eliminated up front, so every DFA state stands for
/// a plain set of NFA states. Each such set is identified by the canonical
/// label of its sorted members, which makes the output labeling independent
/// of traversal order.
pub fn subset_construction(nfa: &NFA) -> DFA {
    let nfa = nfa.remove_epsilon_transitions();

    let initial: Vec<State> = vec![nfa.initial_state.clone()];
    let mut visited: IndexSet<Vec<State>> = IndexSet::new();
    visited.insert(initial.clone());
    let mut queue: VecDeque<Vec<State>> = VecDeque::new();
    queue.push_back(initial.clone());

    let mut transitions: HashMap<State, HashMap<Symbol, State>> = HashMap::new();

    while let Some(subset) = queue.pop_front() {
        let mut moves: BTreeMap<&Symbol, BTreeSet<&State>> = BTreeMap::new();
        for member in &subset {
            let Some(outgoing) = nfa.transitions.get(member) else {
                continue;
            };
            for (symbol, targets) in outgoing {
                if is_epsilon(symbol) || targets.is_empty() {
                    continue;
                }
                moves.entry(symbol).or_default().extend(targets);
            }
        }

        for (symbol, targets) in moves {
            // Sorted by the BTreeSet, so the label is canonical.
            let successor: Vec<State> = targets.into_iter().cloned().collect();
            transitions
                .entry(set_label(&subset))
                .or_default()
                .insert(symbol.clone(), set_label(&successor));
            if visited.insert(successor.clone()) {
                queue.push_back(successor);
            }
        }
    }

    let states: HashSet<State> = visited.iter().map(|subset| set_label(subset)).collect();
    let final_states: HashSet<State> = visited
        .iter()
        .filter(|subset| {
            subset
                .iter()
                .any(|member| nfa.final_states.contains(member))
        })
        .map(|subset| set_label(subset))
        .collect();

    DFA::new(
        states,
        nfa.alphabet.clone(),
        transitions,
        set_label(&initial),
        final_states,
    )
}
