//! Deterministic Finite Automaton (DFA) implementation with Moore
//! partition-refinement minimization and the synchronized boolean
//! combinators.

use crate::error::{AutomatonError, ValidationError};
use crate::fa::FiniteAutomaton;
use crate::nfa::NFA;
use crate::state::{State, StateSet, pair_label};
use crate::symbol::Symbol;
use indexmap::IndexSet;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// A Deterministic Finite Automaton.
///
/// The transition function is partial: a missing `(state, symbol)` entry
/// means "no move", and a run that hits one dies (rejects) immediately. It is
/// never completed into a total function behind the caller's back; see
/// [`DFA::complete`] for the explicit opt-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DFA {
    /// Set of states.
    pub states: HashSet<State>,
    /// Input alphabet.
    pub alphabet: HashSet<Symbol>,
    /// Transitions: state -> (symbol -> next state).
    pub transitions: HashMap<State, HashMap<Symbol, State>>,
    /// The distinguished state every run starts from.
    pub initial_state: State,
    /// Accepting states, a subset of `states`.
    pub final_states: HashSet<State>,
}

impl DFA {
    /// Create a DFA from its five defining fields.
    pub fn new(
        states: HashSet<State>,
        alphabet: HashSet<Symbol>,
        transitions: HashMap<State, HashMap<Symbol, State>>,
        initial_state: State,
        final_states: HashSet<State>,
    ) -> Self {
        Self {
            states,
            alphabet,
            transitions,
            initial_state,
            final_states,
        }
    }

    /// The transition from a state on a symbol, if defined.
    fn step(&self, state: &str, symbol: &str) -> Option<&State> {
        self.transitions.get(state)?.get(symbol)
    }

    /// Strict-alphabet acceptance: errors on the first input symbol that is
    /// not declared in the alphabet, instead of silently rejecting.
    pub fn try_accept(&self, input: &str) -> Result<bool, AutomatonError> {
        let mut buf = [0u8; 4];
        for c in input.chars() {
            let symbol = c.encode_utf8(&mut buf);
            if !self.alphabet.contains(symbol) {
                return Err(AutomatonError::UndeclaredSymbol(symbol.to_string()));
            }
        }
        Ok(self.accept(input))
    }

    /// Totalize the transition function: add a fresh non-final reject state
    /// under `reject_label` and route every missing `(state, symbol)` pair to
    /// it. After completion, [`complement`](FiniteAutomaton::complement)
    /// accepts exactly the strings this automaton rejects.
    ///
    /// Fails when `reject_label` is already a declared state.
    pub fn complete(&self, reject_label: &str) -> Result<DFA, AutomatonError> {
        if self.states.contains(reject_label) {
            return Err(AutomatonError::DuplicateState(reject_label.to_string()));
        }
        let mut dfa = self.clone();
        dfa.states.insert(reject_label.to_string());
        for state in &dfa.states {
            let moves = dfa.transitions.entry(state.clone()).or_default();
            for symbol in &dfa.alphabet {
                moves
                    .entry(symbol.clone())
                    .or_insert_with(|| reject_label.to_string());
            }
        }
        Ok(dfa)
    }

    /// An automaton accepting the set difference of the two languages.
    /// Requires both operands to share the same alphabet.
    pub fn difference(&self, other: &DFA) -> Result<DFA, AutomatonError> {
        self.binary_operation(other, |a, b| a && !b)
    }

    /// An automaton accepting the symmetric difference of the two languages.
    /// Requires both operands to share the same alphabet.
    pub fn symmetric_difference(&self, other: &DFA) -> Result<DFA, AutomatonError> {
        self.binary_operation(other, |a, b| a != b)
    }

    /// Synchronized-product traversal shared by the four boolean operations.
    ///
    /// Explores reachable state pairs breadth-first, following only symbols
    /// with a defined move on both sides, and marks a pair accepting
    /// according to `accepting(a ∈ F, b ∈ F')`. Only reachable pairs are
    /// materialized, so the result may be smaller than the full cross
    /// product.
    fn binary_operation(
        &self,
        other: &DFA,
        accepting: impl Fn(bool, bool) -> bool,
    ) -> Result<DFA, AutomatonError> {
        if self.alphabet != other.alphabet {
            return Err(AutomatonError::AlphabetMismatch);
        }

        let mut visited: IndexSet<(State, State)> = IndexSet::new();
        let mut queue: VecDeque<(State, State)> = VecDeque::new();
        let start = (self.initial_state.clone(), other.initial_state.clone());
        visited.insert(start.clone());
        queue.push_back(start);

        let mut transitions: HashMap<State, HashMap<Symbol, State>> = HashMap::new();
        let mut final_states: HashSet<State> = HashSet::new();

        while let Some((a, b)) = queue.pop_front() {
            let label = pair_label(&a, &b);
            if accepting(
                self.final_states.contains(&a),
                other.final_states.contains(&b),
            ) {
                final_states.insert(label.clone());
            }

            let common: BTreeSet<&Symbol> =
                match (self.transitions.get(&a), other.transitions.get(&b)) {
                    (Some(ma), Some(mb)) => ma.keys().filter(|s| mb.contains_key(*s)).collect(),
                    _ => BTreeSet::new(),
                };
            for symbol in common {
                let (Some(na), Some(nb)) = (self.step(&a, symbol), other.step(&b, symbol)) else {
                    continue;
                };
                let next = (na.clone(), nb.clone());
                transitions
                    .entry(label.clone())
                    .or_default()
                    .insert(symbol.clone(), pair_label(&next.0, &next.1));
                if visited.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }

        Ok(DFA {
            states: visited.iter().map(|(a, b)| pair_label(a, b)).collect(),
            alphabet: self.alphabet.clone(),
            transitions,
            initial_state: pair_label(&self.initial_state, &other.initial_state),
            final_states,
        })
    }

    /// Minimize via Moore partition refinement.
    ///
    /// Starts from the final/non-final split and repeatedly regroups the
    /// states of each block by signature, where a state's signature maps each
    /// of its defined symbols to the current block of the target. States
    /// whose defined symbol sets differ therefore never share a block. Stops
    /// at the fixpoint and rebuilds the automaton with one `q<index>` state
    /// per block. The refinement is the naive O(n²·|Σ|) one, which is fine
    /// at the scale this library targets.
    pub fn minimize(&self) -> DFA {
        if self.states.is_empty() {
            return self.clone();
        }

        let mut labels: Vec<&State> = self.states.iter().collect();
        labels.sort();
        let ids: HashMap<&str, usize> = labels
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), i))
            .collect();

        let mut non_final = StateSet::with_capacity(labels.len());
        let mut finals = StateSet::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            if self.final_states.contains(label.as_str()) {
                finals.insert(i);
            } else {
                non_final.insert(i);
            }
        }
        let mut blocks: Vec<StateSet> = Vec::new();
        if !non_final.is_empty() {
            blocks.push(non_final);
        }
        if !finals.is_empty() {
            blocks.push(finals);
        }

        loop {
            let mut block_of = vec![0usize; labels.len()];
            for (b, block) in blocks.iter().enumerate() {
                for state in block.iter() {
                    block_of[state] = b;
                }
            }

            let signature = |state: usize| {
                let mut sig: Vec<(&Symbol, usize)> = self
                    .transitions
                    .get(labels[state].as_str())
                    .map(|moves| {
                        moves
                            .iter()
                            .filter_map(|(symbol, target)| {
                                ids.get(target.as_str()).map(|&t| (symbol, block_of[t]))
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                sig.sort();
                sig
            };

            let mut refined: Vec<StateSet> = Vec::new();
            for block in &blocks {
                let mut subs: Vec<(Vec<(&Symbol, usize)>, StateSet)> = Vec::new();
                for state in block.iter() {
                    let sig = signature(state);
                    match subs.iter_mut().find(|(existing, _)| *existing == sig) {
                        Some((_, members)) => members.insert(state),
                        None => {
                            let mut members = StateSet::with_capacity(labels.len());
                            members.insert(state);
                            subs.push((sig, members));
                        }
                    }
                }
                refined.extend(subs.into_iter().map(|(_, members)| members));
            }

            // Refinement only ever splits blocks, so an unchanged block count
            // is the fixpoint.
            let done = refined.len() == blocks.len();
            blocks = refined;
            if done {
                break;
            }
        }

        let mut block_of = vec![0usize; labels.len()];
        for (b, block) in blocks.iter().enumerate() {
            for state in block.iter() {
                block_of[state] = b;
            }
        }
        let block_label = |b: usize| format!("q{b}");

        let states: HashSet<State> = (0..blocks.len()).map(block_label).collect();
        let final_states: HashSet<State> = blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| {
                block
                    .iter()
                    .any(|s| self.final_states.contains(labels[s].as_str()))
            })
            .map(|(b, _)| block_label(b))
            .collect();
        // An undeclared initial state has no block; it is carried through
        // unchanged for validate() to report.
        let initial_state = ids
            .get(self.initial_state.as_str())
            .map(|&i| block_label(block_of[i]))
            .unwrap_or_else(|| self.initial_state.clone());

        let mut transitions: HashMap<State, HashMap<Symbol, State>> = HashMap::new();
        for (b, block) in blocks.iter().enumerate() {
            let Some(representative) = block.iter().next() else {
                continue;
            };
            let Some(moves) = self.transitions.get(labels[representative].as_str()) else {
                continue;
            };
            for (symbol, target) in moves {
                if let Some(&t) = ids.get(target.as_str()) {
                    transitions
                        .entry(block_label(b))
                        .or_default()
                        .insert(symbol.clone(), block_label(block_of[t]));
                }
            }
        }

        DFA {
            states,
            alphabet: self.alphabet.clone(),
            transitions,
            initial_state,
            final_states,
        }
    }

    /// Lift every deterministic transition `δ(p, s) = q` to the singleton-set
    /// form `δ'(p, s) = {q}`. Always defined, never fails.
    pub fn get_nfa(&self) -> NFA {
        let mut transitions: HashMap<State, HashMap<Symbol, HashSet<State>>> = HashMap::new();
        for (source, moves) in &self.transitions {
            let lifted = moves
                .iter()
                .map(|(symbol, target)| (symbol.clone(), HashSet::from([target.clone()])))
                .collect();
            transitions.insert(source.clone(), lifted);
        }
        NFA::new(
            self.states.clone(),
            self.alphabet.clone(),
            transitions,
            self.initial_state.clone(),
            self.final_states.clone(),
        )
    }

    /// Check if the DFA accepts no strings at all, by searching for a final
    /// state reachable from the initial state.
    pub fn is_empty(&self) -> bool {
        if self.final_states.is_empty() {
            return true;
        }

        let mut visited: HashSet<&State> = HashSet::new();
        let mut queue: VecDeque<&State> = VecDeque::new();
        queue.push_back(&self.initial_state);

        while let Some(state) = queue.pop_front() {
            if !visited.insert(state) {
                continue;
            }
            if self.final_states.contains(state) {
                return false;
            }
            if let Some(moves) = self.transitions.get(state) {
                for target in moves.values() {
                    if !visited.contains(target) {
                        queue.push_back(target);
                    }
                }
            }
        }

        true
    }
}

impl FiniteAutomaton for DFA {
    /// Simulate the unique run from the initial state, consuming one
    /// character per step. A missing transition kills the run immediately;
    /// so does an input symbol outside the alphabet. The empty input is
    /// accepted iff the initial state is final.
    fn accept(&self, input: &str) -> bool {
        let mut current = &self.initial_state;
        let mut buf = [0u8; 4];
        for c in input.chars() {
            let symbol = c.encode_utf8(&mut buf);
            match self.step(current, symbol) {
                Some(next) => current = next,
                None => return false,
            }
        }
        self.final_states.contains(current)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut report = ValidationError::default();
        if !self.states.contains(&self.initial_state) {
            report.record_state(&self.initial_state);
        }
        for f in &self.final_states {
            if !self.states.contains(f) {
                report.record_state(f);
            }
        }
        for (source, moves) in &self.transitions {
            if !self.states.contains(source) {
                report.record_state(source);
            }
            for (symbol, target) in moves {
                if !self.alphabet.contains(symbol) {
                    report.record_symbol(symbol);
                }
                if !self.states.contains(target) {
                    report.record_state(target);
                }
            }
        }
        report.into_result()
    }

    /// Flip the final-state set. Correct only when the transition function is
    /// total over the reachable states: a partial DFA rejects dying strings
    /// on both sides of this construction. Call [`DFA::complete`] first when
    /// that matters.
    fn complement(&self) -> Self {
        DFA {
            final_states: self.states.difference(&self.final_states).cloned().collect(),
            ..self.clone()
        }
    }

    fn union(&self, other: &Self) -> Result<Self, AutomatonError> {
        self.binary_operation(other, |a, b| a || b)
    }

    fn intersection(&self, other: &Self) -> Result<Self, AutomatonError> {
        self.binary_operation(other, |a, b| a && b)
    }

    /// The full cross product over `states × other.states`, not restricted to
    /// the pairs reachable from the initial pair. The alphabet is the
    /// intersection of the operand alphabets, and a pair moves on a symbol
    /// only when both components do. Never fails.
    fn product(&self, other: &Self) -> Result<Self, AutomatonError> {
        let alphabet: HashSet<Symbol> = self
            .alphabet
            .intersection(&other.alphabet)
            .cloned()
            .collect();

        let mut states: HashSet<State> = HashSet::new();
        let mut final_states: HashSet<State> = HashSet::new();
        let mut transitions: HashMap<State, HashMap<Symbol, State>> = HashMap::new();

        for p in &self.states {
            for q in &other.states {
                let label = pair_label(p, q);
                if self.final_states.contains(p) && other.final_states.contains(q) {
                    final_states.insert(label.clone());
                }

                let mut outgoing: BTreeSet<&Symbol> = BTreeSet::new();
                if let Some(moves) = self.transitions.get(p) {
                    outgoing.extend(moves.keys());
                }
                if let Some(moves) = other.transitions.get(q) {
                    outgoing.extend(moves.keys());
                }
                for symbol in outgoing {
                    if !alphabet.contains(symbol.as_str()) {
                        continue;
                    }
                    if let (Some(a), Some(b)) = (self.step(p, symbol), other.step(q, symbol)) {
                        transitions
                            .entry(label.clone())
                            .or_default()
                            .insert(symbol.clone(), pair_label(a, b));
                    }
                }

                states.insert(label);
            }
        }

        Ok(DFA {
            states,
            alphabet,
            transitions,
            initial_state: pair_label(&self.initial_state, &other.initial_state),
            final_states,
        })
    }
}
