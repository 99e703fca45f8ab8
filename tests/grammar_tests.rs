//! Integration-level tests for the grammar model: parsing from text, the
//! augmented start rule, and rule-arena queries.

use lalrgen::{Grammar, Symbol};

#[test]
fn parses_alternatives_on_one_line() {
    let g = Grammar::from_text("S -> a | b | c\n", "S").unwrap();
    assert_eq!(g.rules_for(&Symbol::non_terminal("S")).len(), 3);
}

#[test]
fn rule_arena_is_content_addressed_across_lines() {
    let g = Grammar::from_text("S -> A\nA -> a\nA -> a\n", "S").unwrap();
    // Re-adding "A -> a" is a no-op; only one distinct rule exists.
    assert_eq!(g.rules_for(&Symbol::non_terminal("A")).len(), 1);
}

#[test]
fn empty_grammar_text_is_rejected() {
    assert!(Grammar::from_text("", "S").is_err());
}

#[test]
fn unknown_nonterminal_on_rhs_is_rejected() {
    let err = Grammar::from_text("S -> A\n", "S").unwrap_err();
    assert!(err.to_string().contains("A"));
}

#[test]
fn start_symbol_is_preserved_under_augmentation() {
    let g = Grammar::from_text("S -> a\n", "S").unwrap();
    assert_eq!(g.original_start(), &Symbol::non_terminal("S"));
    assert_ne!(g.start(), g.original_start());
}

#[test]
fn epsilon_alternative_parses_to_the_marker() {
    let g = Grammar::from_text("S -> a |\n", "S").unwrap();
    let rules = g.rules_for(&Symbol::non_terminal("S"));
    let epsilon_rule = rules
        .iter()
        .map(|&id| g.rule(id))
        .find(|r| r.rhs == vec![Symbol::epsilon()]);
    assert!(epsilon_rule.is_some());
    assert_eq!(epsilon_rule.unwrap().reduce_len(), 0);
}

#[test]
fn terminals_are_collected_from_every_rhs() {
    let g = Grammar::from_text(
        "S -> S plus T | T\nT -> T star F | F\nF -> lparen S rparen | i\n",
        "S",
    )
    .unwrap();
    for t in ["plus", "star", "lparen", "rparen", "i"] {
        assert!(
            g.terminals().contains(&Symbol::terminal(t)),
            "missing terminal {t}"
        );
    }
}
