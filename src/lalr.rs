//! LALR(1) construction: merge canonical LR(1) states that share an LR(0)
//! core, unioning their lookaheads.
//!
//! This is the "build the full canonical collection, then merge" variant:
//! simpler than propagating lookaheads through a separate table, at the
//! cost of building the (larger) canonical automaton first.

use crate::automaton::Automaton;
use crate::grammar::RuleId;
use crate::item::{ItemSet, State, StateId};
use crate::symbol::Symbol;
use std::collections::HashMap;
use tracing::info;

/// The LALR(1) automaton: merged states plus transitions remapped onto
/// merged state ids.
#[derive(Debug, Clone)]
pub struct Lalr1Automaton {
    pub states: Vec<State>,
    pub transitions: HashMap<(StateId, Symbol), StateId>,
}

/// Merges a canonical LR(1) [`Automaton`] into its LALR(1) automaton.
///
/// States are grouped by LR(0) core (`(rule, dot)` pairs, ignoring
/// lookahead); groups are numbered in order of the *first* canonical state
/// that introduced them, so merged ids stay close to BFS discovery order.
pub fn merge(automaton: &Automaton) -> Lalr1Automaton {
    let mut core_to_merged: HashMap<Vec<(RuleId, usize)>, StateId> = HashMap::new();
    let mut merged_items: Vec<ItemSet> = Vec::new();
    let mut canonical_to_merged: HashMap<StateId, StateId> = HashMap::new();

    for state in &automaton.states {
        let core: Vec<(RuleId, usize)> = state.core().into_iter().collect();
        let merged_id = *core_to_merged.entry(core).or_insert_with(|| {
            let id = merged_items.len();
            merged_items.push(ItemSet::new());
            id
        });
        canonical_to_merged.insert(state.id, merged_id);

        for item in &state.items {
            merged_items[merged_id].insert(item.clone());
        }
    }

    let states: Vec<State> = merged_items
        .into_iter()
        .enumerate()
        .map(|(id, items)| State::new(id, items))
        .collect();

    let mut transitions: HashMap<(StateId, Symbol), StateId> = HashMap::new();
    for (&(from, ref symbol), &to) in &automaton.transitions {
        let merged_from = canonical_to_merged[&from];
        let merged_to = canonical_to_merged[&to];
        transitions.insert((merged_from, symbol.clone()), merged_to);
    }

    info!(
        canonical_states = automaton.states.len(),
        merged_states = states.len(),
        "merged canonical LR(1) states into LALR(1) states"
    );

    Lalr1Automaton { states, transitions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::build;
    use crate::grammar::Grammar;

    #[test]
    fn merging_never_increases_state_count() {
        let g = Grammar::from_text("S -> A B\nA -> a |\nB -> b\n", "S").unwrap();
        let canonical = build(&g);
        let merged = merge(&canonical);
        assert!(merged.states.len() <= canonical.states.len());
    }

    #[test]
    fn states_sharing_a_core_are_merged_into_one() {
        // The textbook grammar (Aho et al., 2nd ed., example 4.47) whose
        // canonical LR(1) collection contains two states with identical
        // LR(0) cores ("A -> c ." and "B -> c .") but different lookahead
        // sets ({d} vs {e}), reached via "a" and "b" respectively.
        let text = "\
            S -> a A d
            S -> b B d
            S -> a B e
            S -> b A e
            A -> c
            B -> c
        ";
        let g = Grammar::from_text(text, "S").unwrap();
        let canonical = build(&g);
        let merged = merge(&canonical);
        assert!(merged.states.len() < canonical.states.len());
    }

    #[test]
    fn transitions_are_remapped_onto_merged_ids() {
        let g = Grammar::from_text("S -> a | b\n", "S").unwrap();
        let canonical = build(&g);
        let merged = merge(&canonical);
        for (&(from, _), &to) in &merged.transitions {
            assert!(from < merged.states.len());
            assert!(to < merged.states.len());
        }
    }
}
