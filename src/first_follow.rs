//! NULLABLE, FIRST, and FOLLOW set computation for context-free grammars.
//!
//! Algorithms follow Aho et al., "Compilers: Principles, Techniques, and
//! Tools" (2nd Edition), §4.4, generalized from single-character symbols
//! to named ones and extended with the FIRST* form LR(1) closure needs.

use crate::grammar::{Grammar, Rule};
use crate::symbol::Symbol;
use std::collections::{HashMap, HashSet};

/// Maps a non-terminal to its FIRST set.
pub type FirstSets = HashMap<Symbol, HashSet<Symbol>>;
/// Maps a non-terminal to its FOLLOW set (diagnostics only; not needed by
/// LALR(1) construction itself, see spec §3).
pub type FollowSets = HashMap<Symbol, HashSet<Symbol>>;

/// Computes NULLABLE as a least fixed point: `ε` is (implicitly) nullable,
/// and a non-terminal is nullable iff some alternative consists entirely
/// of nullable symbols.
pub fn compute_nullable(rules: &[Rule]) -> HashSet<Symbol> {
    let mut nullable: HashSet<Symbol> = HashSet::new();
    let mut changed = true;
    while changed {
        changed = false;
        for rule in rules {
            if nullable.contains(&rule.lhs) {
                continue;
            }
            let all_nullable = rule
                .rhs
                .iter()
                .all(|sym| sym.is_epsilon() || nullable.contains(sym));
            if all_nullable {
                nullable.insert(rule.lhs.clone());
                changed = true;
            }
        }
    }
    nullable
}

fn first_of_symbol(first_sets: &FirstSets, sym: &Symbol) -> HashSet<Symbol> {
    if sym.is_terminal() || sym.is_marker() {
        let mut set = HashSet::new();
        set.insert(sym.clone());
        set
    } else {
        first_sets.get(sym).cloned().unwrap_or_default()
    }
}

/// Computes FIRST sets for every non-terminal by fixed-point iteration.
/// Terminals and markers are not stored (their FIRST set is themselves, see
/// [`Grammar::first`]).
pub fn compute_first_sets(
    rules: &[Rule],
    _terminals: &HashSet<Symbol>,
    nullable: &HashSet<Symbol>,
) -> FirstSets {
    let mut first: FirstSets = HashMap::new();
    for rule in rules {
        first.entry(rule.lhs.clone()).or_default();
    }

    let mut changed = true;
    while changed {
        changed = false;
        for rule in rules {
            let rhs_first = first_of_sequence(&first, nullable, &rule.rhs);
            let entry = first.entry(rule.lhs.clone()).or_default();
            let before = entry.len();
            entry.extend(rhs_first.into_iter().filter(|s| !s.is_epsilon()));
            if entry.len() != before {
                changed = true;
            }
        }
    }

    first
}

/// `FIRST*(sequence)`: union of `FIRST(X_i)` while `X_i` is nullable,
/// stopping at the first non-nullable symbol (or the end of `sequence`);
/// includes `ε` iff every symbol in `sequence` is nullable.
pub fn first_of_sequence(
    first_sets: &FirstSets,
    nullable: &HashSet<Symbol>,
    sequence: &[Symbol],
) -> HashSet<Symbol> {
    let mut result = HashSet::new();
    let mut all_nullable = true;

    for sym in sequence {
        let sym_first = first_of_symbol(first_sets, sym);
        result.extend(sym_first.into_iter().filter(|s| !s.is_epsilon()));

        let sym_nullable = sym.is_epsilon() || nullable.contains(sym);
        if !sym_nullable {
            all_nullable = false;
            break;
        }
    }

    if all_nullable {
        result.insert(Symbol::epsilon());
    }
    result
}

/// Computes FOLLOW sets for every non-terminal. Used only for diagnostics
/// (e.g. reporting expected tokens outside of the table itself); LALR(1)
/// construction derives its lookaheads from per-item closure instead.
///
/// `FOLLOW(S)` is seeded with `$` directly: the augmented rule `S' -> S` has
/// nothing after `S` to contribute a lookahead, so unlike a textbook
/// `S' -> S $` this function puts `$` into `FOLLOW(S)` itself rather than
/// relying on propagation from the augmented rule's own (never-computed)
/// FOLLOW set.
pub fn compute_follow_sets(grammar: &Grammar) -> FollowSets {
    let mut follow: FollowSets = HashMap::new();
    for nt in grammar.nonterminals() {
        follow.entry(nt.clone()).or_default();
    }
    follow
        .entry(grammar.original_start().clone())
        .or_default()
        .insert(Symbol::eof());

    let mut changed = true;
    while changed {
        changed = false;

        for rule in grammar.rules() {
            for (i, sym) in rule.rhs.iter().enumerate() {
                if !sym.is_non_terminal() {
                    continue;
                }

                let beta = &rule.rhs[i + 1..];
                let first_beta = grammar.first_of(beta);

                let current = follow.get(sym).cloned().unwrap_or_default();
                let mut updated = current.clone();
                updated.extend(first_beta.iter().filter(|s| !s.is_epsilon()).cloned());

                if beta.is_empty() || first_beta.contains(&Symbol::epsilon()) {
                    let follow_lhs = follow.get(&rule.lhs).cloned().unwrap_or_default();
                    updated.extend(follow_lhs);
                }

                if updated.len() != current.len() {
                    follow.insert(sym.clone(), updated);
                    changed = true;
                }
            }
        }
    }

    follow
}
