//! Graphviz DOT export of automata.
//!
//! The engine only produces DOT source text; laying it out and rasterizing
//! it is the business of an external Graphviz installation. Export reads the
//! five automaton fields and nothing else.

use crate::dfa::DFA;
use crate::nfa::NFA;
use crate::state::State;
use crate::symbol::is_epsilon;
use std::collections::HashSet;

/// Cosmetic options for DOT export.
#[derive(Debug, Clone, Default)]
pub struct DotStyle {
    /// Graph name, also the conventional output file stem.
    pub name: String,
    /// Attributes applied to every node, as `key=value` pairs.
    pub node_attr: Vec<(String, String)>,
    /// Attributes applied to every edge, as `key=value` pairs.
    pub edge_attr: Vec<(String, String)>,
}

impl DotStyle {
    /// A style with the given graph name and no extra attributes.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

fn attr_list(attrs: &[(String, String)]) -> String {
    attrs
        .iter()
        .map(|(key, value)| format!("{key}=\"{}\"", escape(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the shared digraph shape: left-to-right layout, double circles for
/// final states, and a plaintext phantom node arrowing into the initial
/// state. `edges` are `(source, label, target)` triples.
fn render(
    style: &DotStyle,
    states: &HashSet<State>,
    final_states: &HashSet<State>,
    initial_state: &State,
    mut edges: Vec<(State, String, State)>,
) -> String {
    let mut sorted_states: Vec<&State> = states.iter().collect();
    sorted_states.sort();
    edges.sort();

    let mut out = String::new();
    out.push_str(&format!("digraph \"{}\" {{\n", escape(&style.name)));
    out.push_str("    rankdir=LR;\n");
    if !style.node_attr.is_empty() {
        out.push_str(&format!("    node [{}];\n", attr_list(&style.node_attr)));
    }
    if !style.edge_attr.is_empty() {
        out.push_str(&format!("    edge [{}];\n", attr_list(&style.edge_attr)));
    }
    out.push_str("    \"\" [shape=plaintext, label=\"\"];\n");
    for state in sorted_states {
        let shape = if final_states.contains(state) {
            "doublecircle"
        } else {
            "circle"
        };
        out.push_str(&format!("    \"{}\" [shape={shape}];\n", escape(state)));
    }
    out.push_str(&format!("    \"\" -> \"{}\";\n", escape(initial_state)));
    for (source, label, target) in edges {
        out.push_str(&format!(
            "    \"{}\" -> \"{}\" [label=\"{}\"];\n",
            escape(&source),
            escape(&target),
            escape(&label)
        ));
    }
    out.push_str("}\n");
    out
}

impl DFA {
    /// The DOT source of the automaton diagram.
    pub fn to_dot(&self, style: &DotStyle) -> String {
        let edges = self
            .transitions
            .iter()
            .flat_map(|(source, moves)| {
                moves
                    .iter()
                    .map(move |(symbol, target)| (source.clone(), symbol.clone(), target.clone()))
            })
            .collect();
        render(
            style,
            &self.states,
            &self.final_states,
            &self.initial_state,
            edges,
        )
    }
}

impl NFA {
    /// The DOT source of the automaton diagram. Epsilon edges are labeled
    /// with `ε`.
    pub fn to_dot(&self, style: &DotStyle) -> String {
        let edges = self
            .transitions
            .iter()
            .flat_map(|(source, moves)| {
                moves.iter().flat_map(move |(symbol, targets)| {
                    let label = if is_epsilon(symbol) {
                        "ε".to_string()
                    } else {
                        symbol.clone()
                    };
                    targets
                        .iter()
                        .map(move |target| (source.clone(), label.clone(), target.clone()))
                })
            })
            .collect();
        render(
            style,
            &self.states,
            &self.final_states,
            &self.initial_state,
            edges,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Symbol;
    use std::collections::HashMap;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_dfa_to_dot() {
        let mut transitions: HashMap<State, HashMap<Symbol, State>> = HashMap::new();
        transitions
            .entry("q0".to_string())
            .or_default()
            .insert("a".to_string(), "q1".to_string());
        let dfa = DFA::new(
            set(&["q0", "q1"]),
            set(&["a"]),
            transitions,
            "q0".to_string(),
            set(&["q1"]),
        );
        let style = DotStyle::named("example");
        let dot = dfa.to_dot(&style);
        assert!(dot.starts_with("digraph \"example\" {"));
        assert!(dot.contains("rankdir=LR;"));
        assert!(dot.contains("\"q1\" [shape=doublecircle];"));
        assert!(dot.contains("\"q0\" [shape=circle];"));
        assert!(dot.contains("\"\" -> \"q0\";"));
        assert!(dot.contains("\"q0\" -> \"q1\" [label=\"a\"];"));
    }

    #[test]
    fn test_nfa_to_dot_labels_epsilon() {
        let mut transitions: HashMap<State, HashMap<Symbol, HashSet<State>>> = HashMap::new();
        transitions
            .entry("q0".to_string())
            .or_default()
            .insert(String::new(), set(&["q1"]));
        let nfa = NFA::new(
            set(&["q0", "q1"]),
            set(&["a"]),
            transitions,
            "q0".to_string(),
            set(&["q1"]),
        );
        let dot = nfa.to_dot(&DotStyle::named("eps"));
        assert!(dot.contains("\"q0\" -> \"q1\" [label=\"ε\"];"));
    }

    #[test]
    fn test_dot_applies_attributes() {
        let dfa = DFA::new(
            set(&["q0"]),
            set(&[]),
            HashMap::new(),
            "q0".to_string(),
            set(&[]),
        );
        let style = DotStyle {
            name: "styled".to_string(),
            node_attr: vec![("color".to_string(), "blue".to_string())],
            edge_attr: vec![("fontsize".to_string(), "10".to_string())],
        };
        let dot = dfa.to_dot(&style);
        assert!(dot.contains("node [color=\"blue\"];"));
        assert!(dot.contains("edge [fontsize=\"10\"];"));
    }
}
