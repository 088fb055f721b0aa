//! Non-deterministic Finite Automaton (NFA) implementation with epsilon
//! transitions, epsilon elimination, and delegation to the DFA engine for
//! the operations that need a deterministic form.

use crate::dfa::DFA;
use crate::error::{AutomatonError, ValidationError};
use crate::fa::FiniteAutomaton;
use crate::state::{State, pair_label};
use crate::subset_construction::subset_construction;
use crate::symbol::{EPSILON, Symbol, is_epsilon};
use indexmap::IndexSet;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// A Non-deterministic Finite Automaton.
///
/// Transitions are set-valued, and the reserved epsilon label
/// ([`EPSILON`]) keys moves that consume no input. An absent entry means
/// "no move".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NFA {
    /// Set of states.
    pub states: HashSet<State>,
    /// Input alphabet; may additionally carry the epsilon label.
    pub alphabet: HashSet<Symbol>,
    /// Transitions: state -> (symbol or epsilon -> set of next states).
    pub transitions: HashMap<State, HashMap<Symbol, HashSet<State>>>,
    /// The distinguished state every run starts from.
    pub initial_state: State,
    /// Accepting states, a subset of `states`.
    pub final_states: HashSet<State>,
}

impl NFA {
    /// Create an NFA from its five defining fields.
    pub fn new(
        states: HashSet<State>,
        alphabet: HashSet<Symbol>,
        transitions: HashMap<State, HashMap<Symbol, HashSet<State>>>,
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

    /// The set of states reachable from `state` using zero or more epsilon
    /// transitions, always including `state` itself. Epsilon transitions may
    /// form cycles, so the traversal tracks what it has already seen.
    pub fn epsilon_closure(&self, state: &str) -> BTreeSet<State> {
        let mut closure: BTreeSet<State> = BTreeSet::new();
        let mut stack = vec![state.to_string()];

        while let Some(current) = stack.pop() {
            let targets = self
                .transitions
                .get(&current)
                .and_then(|moves| moves.get(EPSILON));
            if !closure.insert(current) {
                continue;
            }
            if let Some(targets) = targets {
                for target in targets {
                    if !closure.contains(target) {
                        stack.push(target.clone());
                    }
                }
            }
        }

        closure
    }

    /// Check if any transition is keyed by the epsilon label.
    pub fn contains_epsilon_transitions(&self) -> bool {
        self.transitions
            .values()
            .any(|moves| moves.contains_key(EPSILON))
    }

    /// An equivalent NFA without epsilon transitions.
    ///
    /// When the automaton has none, this is a plain copy. Otherwise every
    /// state `q` gets, per symbol `s`, the union of the epsilon-closures of
    /// every state reachable via `s` from `q`'s own epsilon-closure; `q`
    /// becomes final when its closure touches a final state. Entries with no
    /// successors stay absent from the new map, and epsilon is dropped from
    /// the alphabet.
    pub fn remove_epsilon_transitions(&self) -> NFA {
        if !self.contains_epsilon_transitions() {
            return self.clone();
        }

        let mut final_states = self.final_states.clone();
        let mut transitions: HashMap<State, HashMap<Symbol, HashSet<State>>> = HashMap::new();

        for state in &self.states {
            let closure = self.epsilon_closure(state);
            if closure.iter().any(|c| self.final_states.contains(c)) {
                final_states.insert(state.clone());
            }

            for symbol in &self.alphabet {
                if is_epsilon(symbol) {
                    continue;
                }
                let mut targets: HashSet<State> = HashSet::new();
                for member in &closure {
                    let Some(dests) = self
                        .transitions
                        .get(member)
                        .and_then(|moves| moves.get(symbol))
                    else {
                        continue;
                    };
                    for dest in dests {
                        targets.extend(self.epsilon_closure(dest));
                    }
                }
                if !targets.is_empty() {
                    transitions
                        .entry(state.clone())
                        .or_default()
                        .insert(symbol.clone(), targets);
                }
            }
        }

        NFA {
            states: self.states.clone(),
            alphabet: self
                .alphabet
                .iter()
                .filter(|s| !is_epsilon(s))
                .cloned()
                .collect(),
            transitions,
            initial_state: self.initial_state.clone(),
            final_states,
        }
    }

    /// An equivalent DFA, via epsilon elimination and the subset
    /// construction.
    pub fn get_dfa(&self) -> DFA {
        subset_construction(self)
    }

    /// Minimize by determinizing, minimizing the DFA, lifting back, and
    /// renumbering. The result accepts the same language; its structure is
    /// generally not that of the original.
    pub fn minimize(&self) -> NFA {
        let mut nfa = self.get_dfa().minimize().get_nfa();
        nfa.renumber("q");
        nfa
    }

    /// Relabel every state to `<prefix><i>` in place, enumerating the
    /// original labels lexicographically so the relabeling is reproducible.
    /// All five fields are rewritten consistently. This is the one operation
    /// that mutates its receiver; it exists purely to canonicalize an
    /// automaton's presentation after a derivation chain.
    pub fn renumber(&mut self, prefix: &str) {
        let mut labels: Vec<&State> = self.states.iter().collect();
        labels.sort();
        let tags: HashMap<State, State> = labels
            .iter()
            .enumerate()
            .map(|(i, s)| ((*s).clone(), format!("{prefix}{i}")))
            .collect();
        // An endpoint missing from the state set keeps its label; validate()
        // is the place that reports it.
        let rename = |label: &State| tags.get(label).cloned().unwrap_or_else(|| label.clone());

        self.states = self.states.iter().map(&rename).collect();
        self.final_states = self.final_states.iter().map(&rename).collect();
        self.initial_state = rename(&self.initial_state);
        self.transitions = relabel_transitions(&self.transitions, rename);
    }

    /// Check if the NFA accepts no strings at all, by searching for a final
    /// state reachable from the initial state through any transition,
    /// epsilon included.
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
                for targets in moves.values() {
                    for target in targets {
                        if !visited.contains(target) {
                            queue.push_back(target);
                        }
                    }
                }
            }
        }

        true
    }
}

/// Rewrite every source and destination of a transition map through `rename`.
fn relabel_transitions(
    transitions: &HashMap<State, HashMap<Symbol, HashSet<State>>>,
    rename: impl Fn(&State) -> State,
) -> HashMap<State, HashMap<Symbol, HashSet<State>>> {
    transitions
        .iter()
        .map(|(source, moves)| {
            let moves = moves
                .iter()
                .map(|(symbol, targets)| (symbol.clone(), targets.iter().map(&rename).collect()))
                .collect();
            (rename(source), moves)
        })
        .collect()
}

impl FiniteAutomaton for NFA {
    /// Breadth-first exploration of `(position, state)` pairs from
    /// `(0, initial_state)`. Epsilon successors keep the position, symbol
    /// successors advance it, and the first pair that has consumed the whole
    /// input in a final state accepts. Already-seen pairs are not re-queued,
    /// which bounds the search even across epsilon cycles.
    fn accept(&self, input: &str) -> bool {
        let symbols: Vec<String> = input.chars().map(String::from).collect();

        let mut visited: HashSet<(usize, State)> = HashSet::new();
        let mut queue: VecDeque<(usize, State)> = VecDeque::new();
        visited.insert((0, self.initial_state.clone()));
        queue.push_back((0, self.initial_state.clone()));

        while let Some((position, state)) = queue.pop_front() {
            if position == symbols.len() && self.final_states.contains(&state) {
                return true;
            }
            let Some(moves) = self.transitions.get(&state) else {
                continue;
            };
            if let Some(targets) = moves.get(EPSILON) {
                for target in targets {
                    if visited.insert((position, target.clone())) {
                        queue.push_back((position, target.clone()));
                    }
                }
            }
            if position < symbols.len() {
                if let Some(targets) = moves.get(&symbols[position]) {
                    for target in targets {
                        if visited.insert((position + 1, target.clone())) {
                            queue.push_back((position + 1, target.clone()));
                        }
                    }
                }
            }
        }

        false
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
            for (symbol, targets) in moves {
                if !is_epsilon(symbol) && !self.alphabet.contains(symbol) {
                    report.record_symbol(symbol);
                }
                for target in targets {
                    if !self.states.contains(target) {
                        report.record_state(target);
                    }
                }
            }
        }
        report.into_result()
    }

    /// Complement through determinization: convert to a DFA, flip its final
    /// states, lift back, renumber, and minimize. Inherits the DFA
    /// complement's totality caveat.
    fn complement(&self) -> Self {
        let mut nfa = self.get_dfa().complement().get_nfa();
        nfa.renumber("q");
        nfa.minimize()
    }

    /// Union by construction: rename both operands into disjoint label
    /// families, then add a fresh initial state with epsilon moves to both
    /// renamed initial states. The result keeps its epsilon transitions.
    /// Never fails; the alphabets need not match.
    fn union(&self, other: &Self) -> Result<Self, AutomatonError> {
        let mut self_labels: Vec<&State> = self.states.iter().collect();
        self_labels.sort();
        let mut other_labels: Vec<&State> = other.states.iter().collect();
        other_labels.sort();

        // Fresh initial state q0; own states become q1.., the operand's s0..
        let initial_state = State::from("q0");
        let self_tags: HashMap<State, State> = self_labels
            .iter()
            .enumerate()
            .map(|(i, s)| ((*s).clone(), format!("q{}", i + 1)))
            .collect();
        let other_tags: HashMap<State, State> = other_labels
            .iter()
            .enumerate()
            .map(|(i, s)| ((*s).clone(), format!("s{i}")))
            .collect();
        let rename_self =
            |label: &State| self_tags.get(label).cloned().unwrap_or_else(|| label.clone());
        let rename_other = |label: &State| {
            other_tags
                .get(label)
                .cloned()
                .unwrap_or_else(|| label.clone())
        };

        let mut states: HashSet<State> = HashSet::new();
        states.insert(initial_state.clone());
        states.extend(self_tags.values().cloned());
        states.extend(other_tags.values().cloned());

        let mut final_states: HashSet<State> =
            self.final_states.iter().map(&rename_self).collect();
        final_states.extend(other.final_states.iter().map(&rename_other));

        let mut transitions = relabel_transitions(&self.transitions, &rename_self);
        transitions.extend(relabel_transitions(&other.transitions, &rename_other));
        transitions.insert(
            initial_state.clone(),
            HashMap::from([(
                EPSILON.to_string(),
                HashSet::from([
                    rename_self(&self.initial_state),
                    rename_other(&other.initial_state),
                ]),
            )]),
        );

        Ok(NFA {
            states,
            alphabet: self.alphabet.union(&other.alphabet).cloned().collect(),
            transitions,
            initial_state,
            final_states,
        })
    }

    /// Synchronized exploration of reachable state pairs, fanning out over
    /// the Cartesian product of the two sides' destination sets for every
    /// shared symbol. A pair is final iff both components are. Requires both
    /// operands to share the same alphabet.
    fn intersection(&self, other: &Self) -> Result<Self, AutomatonError> {
        if self.alphabet != other.alphabet {
            return Err(AutomatonError::AlphabetMismatch);
        }

        let mut visited: IndexSet<(State, State)> = IndexSet::new();
        let mut queue: VecDeque<(State, State)> = VecDeque::new();
        let start = (self.initial_state.clone(), other.initial_state.clone());
        visited.insert(start.clone());
        queue.push_back(start);

        let mut transitions: HashMap<State, HashMap<Symbol, HashSet<State>>> = HashMap::new();
        let mut final_states: HashSet<State> = HashSet::new();

        while let Some((a, b)) = queue.pop_front() {
            let label = pair_label(&a, &b);
            if self.final_states.contains(&a) && other.final_states.contains(&b) {
                final_states.insert(label.clone());
            }

            let (Some(moves_a), Some(moves_b)) =
                (self.transitions.get(&a), other.transitions.get(&b))
            else {
                continue;
            };
            let mut shared: Vec<&Symbol> =
                moves_a.keys().filter(|s| moves_b.contains_key(*s)).collect();
            shared.sort();

            for symbol in shared {
                let (Some(targets_a), Some(targets_b)) = (moves_a.get(symbol), moves_b.get(symbol))
                else {
                    continue;
                };
                let mut successors: HashSet<State> = HashSet::new();
                for x in targets_a {
                    for y in targets_b {
                        successors.insert(pair_label(x, y));
                        let next = (x.clone(), y.clone());
                        if visited.insert(next.clone()) {
                            queue.push_back(next);
                        }
                    }
                }
                if !successors.is_empty() {
                    transitions
                        .entry(label.clone())
                        .or_default()
                        .insert(symbol.clone(), successors);
                }
            }
        }

        Ok(NFA {
            states: visited.iter().map(|(a, b)| pair_label(a, b)).collect(),
            alphabet: self.alphabet.clone(),
            transitions,
            initial_state: pair_label(&self.initial_state, &other.initial_state),
            final_states,
        })
    }

    /// Product through determinization: convert both operands, take the DFA
    /// product, and lift the result back. Never fails.
    fn product(&self, other: &Self) -> Result<Self, AutomatonError> {
        Ok(self.get_dfa().product(&other.get_dfa())?.get_nfa())
    }
}
