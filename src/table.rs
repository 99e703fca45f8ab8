//! ACTION/GOTO table synthesis from an LALR(1) automaton, with conflict
//! detection.

use crate::error::{GeneratorError, Result};
use crate::grammar::{Grammar, RuleId};
use crate::item::StateId;
use crate::lalr::Lalr1Automaton;
use crate::symbol::Symbol;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Shift(StateId),
    Goto(StateId),
    Reduce { lhs: Symbol, len: usize, rule: RuleId },
    Accept,
}

/// The finished parsing table: one `(state, symbol) -> Action` map plus,
/// for diagnostics, the set of terminals each state expects.
#[derive(Debug, Clone)]
pub struct ParseTable {
    pub num_states: usize,
    pub actions: HashMap<(StateId, Symbol), Action>,
    pub expected: HashMap<StateId, HashSet<Symbol>>,
}

impl ParseTable {
    pub fn action(&self, state: StateId, symbol: &Symbol) -> Option<&Action> {
        self.actions.get(&(state, symbol.clone()))
    }
}

/// Builds the ACTION/GOTO table from a merged LALR(1) automaton.
///
/// For each state and each item `[A -> alpha . X beta, a]`:
/// - if `X` is a terminal and `goto(state, X)` exists, the cell `(state, X)`
///   gets `Shift(goto(state, X))`;
/// - if `X` is a non-terminal, the cell `(state, X)` gets
///   `Goto(goto(state, X))`;
/// - if the item is complete and its rule is the augmented rule, the cell
///   `(state, $)` gets `Accept`;
/// - if the item is complete otherwise, every cell `(state, a)` for `a` in
///   the item's lookahead gets `Reduce(lhs, len)`.
///
/// Two different actions claiming the same cell is a shift/reduce or
/// reduce/reduce conflict (reported as such); two different shifts
/// claiming the same cell would mean the LALR(1) core-merge invariant was
/// violated and is reported as [`GeneratorError::Internal`].
pub fn build(grammar: &Grammar, automaton: &Lalr1Automaton) -> Result<ParseTable> {
    let mut actions: HashMap<(StateId, Symbol), Action> = HashMap::new();
    let mut expected: HashMap<StateId, HashSet<Symbol>> = HashMap::new();

    for state in &automaton.states {
        for item in &state.items {
            if !item.is_complete(grammar) {
                let Some(symbol) = item.symbol_after_dot(grammar) else {
                    continue;
                };
                let Some(&target) = automaton.transitions.get(&(state.id, symbol.clone())) else {
                    continue;
                };

                if symbol.is_non_terminal() {
                    actions.insert((state.id, symbol), Action::Goto(target));
                    continue;
                }

                let key = (state.id, symbol.clone());
                expected.entry(state.id).or_default().insert(symbol.clone());
                match actions.get(&key) {
                    None => {
                        actions.insert(key, Action::Shift(target));
                    }
                    Some(Action::Shift(existing)) if *existing == target => {}
                    Some(Action::Shift(_)) => {
                        return Err(GeneratorError::Internal(format!(
                            "state {} symbol {} has two distinct shift targets after LALR merge",
                            state.id, symbol
                        )));
                    }
                    Some(Action::Reduce { rule, .. }) => {
                        return Err(GeneratorError::ShiftReduceConflict {
                            state: state.id,
                            symbol: symbol.to_string(),
                            rule: grammar.rule(*rule).to_string(),
                        });
                    }
                    Some(Action::Accept) | Some(Action::Goto(_)) => unreachable!(
                        "a terminal cell cannot already hold Accept or Goto"
                    ),
                }
                continue;
            }

            let rule = grammar.rule(item.rule);
            expected
                .entry(state.id)
                .or_default()
                .insert(item.lookahead.clone());

            if rule.id == grammar.augmented_rule_id() {
                actions.insert((state.id, Symbol::eof()), Action::Accept);
                continue;
            }

            let key = (state.id, item.lookahead.clone());
            match actions.get(&key) {
                None => {
                    actions.insert(
                        key,
                        Action::Reduce {
                            lhs: rule.lhs.clone(),
                            len: rule.reduce_len(),
                            rule: rule.id,
                        },
                    );
                }
                Some(Action::Reduce { rule: other, .. }) if *other == rule.id => {}
                Some(Action::Reduce { rule: other, .. }) => {
                    return Err(GeneratorError::ReduceReduceConflict {
                        state: state.id,
                        symbol: item.lookahead.to_string(),
                        rule1: grammar.rule(*other).to_string(),
                        rule2: rule.to_string(),
                    });
                }
                Some(Action::Shift(_)) => {
                    return Err(GeneratorError::ShiftReduceConflict {
                        state: state.id,
                        symbol: item.lookahead.to_string(),
                        rule: rule.to_string(),
                    });
                }
                Some(Action::Accept) | Some(Action::Goto(_)) => unreachable!(
                    "a lookahead cell cannot already hold Accept or Goto"
                ),
            }
        }
    }

    if automaton.states.is_empty() {
        warn!("LALR(1) automaton has no states");
    }

    Ok(ParseTable {
        num_states: automaton.states.len(),
        actions,
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::build as build_canonical;
    use crate::lalr::merge;

    fn table_for(text: &str, start: &str) -> Result<ParseTable> {
        let g = Grammar::from_text(text, start).unwrap();
        let canonical = build_canonical(&g);
        let merged = merge(&canonical);
        build(&g, &merged)
    }

    #[test]
    fn accept_action_exists_on_eof_in_some_state() {
        let table = table_for("S -> a\n", "S").unwrap();
        assert!(table.actions.values().any(|a| matches!(a, Action::Accept)));
    }

    #[test]
    fn dangling_else_grammar_is_rejected_with_a_shift_reduce_conflict() {
        let text = "\
            S -> if E then S
            S -> if E then S else S
            S -> a
            E -> b
        ";
        let err = table_for(text, "S").unwrap_err();
        assert!(matches!(err, GeneratorError::ShiftReduceConflict { .. }));
    }

    #[test]
    fn epsilon_grammar_builds_a_table_without_conflicts() {
        let text = "\
            S -> A B
            A -> a |
            B -> b
        ";
        let table = table_for(text, "S").unwrap();
        assert!(table.num_states > 0);
    }

    #[test]
    fn expected_tokens_are_recorded_per_state() {
        let table = table_for("S -> a | b\n", "S").unwrap();
        assert!(table.expected[&0].contains(&Symbol::terminal("a")));
        assert!(table.expected[&0].contains(&Symbol::terminal("b")));
    }
}
