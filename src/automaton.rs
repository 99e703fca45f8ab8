//! The canonical LR(1) automaton: closure, goto, and BFS enumeration of
//! states, following the worklist shape of a classic LR(0) construction
//! generalized with per-item lookaheads.

use crate::grammar::Grammar;
use crate::item::{ItemSet, Lr1Item, State, StateId};
use crate::symbol::Symbol;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, trace};

/// Computes the closure of a set of LR(1) items: for every item
/// `[A -> alpha . B beta, a]` with `B` a non-terminal, adds `[B -> . gamma,
/// b]` for every rule `B -> gamma` and every `b` in `FIRST*(beta a)`.
pub fn closure(grammar: &Grammar, items: ItemSet) -> ItemSet {
    let mut result = items;
    let mut changed = true;

    while changed {
        changed = false;
        let current: Vec<Lr1Item> = result.iter().cloned().collect();

        for item in &current {
            let Some(symbol) = item.symbol_after_dot(grammar) else {
                continue;
            };
            if !symbol.is_non_terminal() {
                continue;
            }

            let beta = &grammar.rule(item.rule).rhs[item.dot + 1..];
            let lookaheads = grammar.lookaheads_after(beta, &item.lookahead);

            for rule_id in grammar.rules_for(&symbol) {
                for lookahead in &lookaheads {
                    let new_item = Lr1Item::new(*rule_id, 0, lookahead.clone());
                    if result.insert(new_item) {
                        changed = true;
                    }
                }
            }
        }
    }

    result
}

/// `goto(items, symbol)`: advances the dot over `symbol` in every item that
/// has it immediately after the dot, then closes the result.
pub fn goto(grammar: &Grammar, items: &ItemSet, symbol: &Symbol) -> ItemSet {
    let moved: ItemSet = items
        .iter()
        .filter(|item| item.symbol_after_dot(grammar).as_ref() == Some(symbol))
        .map(Lr1Item::advanced)
        .collect();

    closure(grammar, moved)
}

/// The canonical LR(1) collection: every reachable state plus the
/// transition table between them.
#[derive(Debug, Clone)]
pub struct Automaton {
    pub states: Vec<State>,
    pub transitions: HashMap<(StateId, Symbol), StateId>,
}

/// Builds the canonical LR(1) automaton by BFS from the item set seeded by
/// the augmented rule `[S' -> . S, $]`. The augmented rhs has no literal
/// `$` symbol to shift over — completing `S' -> S .` under lookahead `$` is
/// itself the accept condition, synthesized in `table::build`.
pub fn build(grammar: &Grammar) -> Automaton {
    let initial_item = Lr1Item::new(grammar.augmented_rule_id(), 0, Symbol::eof());
    let initial_items = closure(grammar, ItemSet::from([initial_item]));

    let mut states = vec![State::new(0, initial_items)];
    let mut transitions: HashMap<(StateId, Symbol), StateId> = HashMap::new();
    let mut index_of_items: HashMap<ItemSet, StateId> = HashMap::new();
    index_of_items.insert(states[0].items.clone(), 0);

    let mut worklist: VecDeque<StateId> = VecDeque::new();
    worklist.push_back(0);

    while let Some(state_id) = worklist.pop_front() {
        let items = states[state_id].items.clone();

        let mut symbols: HashSet<Symbol> = HashSet::new();
        for item in &items {
            if let Some(symbol) = item.symbol_after_dot(grammar) {
                symbols.insert(symbol);
            }
        }

        for symbol in symbols {
            let next_items = goto(grammar, &items, &symbol);
            if next_items.is_empty() {
                continue;
            }

            let next_id = if let Some(&existing) = index_of_items.get(&next_items) {
                existing
            } else {
                let new_id = states.len();
                trace!(from = state_id, on = %symbol, to = new_id, "new LR(1) state");
                index_of_items.insert(next_items.clone(), new_id);
                states.push(State::new(new_id, next_items));
                worklist.push_back(new_id);
                new_id
            };

            transitions.insert((state_id, symbol), next_id);
        }
    }

    debug!(states = states.len(), "canonical LR(1) automaton built");
    Automaton { states, transitions }
}
