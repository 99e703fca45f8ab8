//! Integration-level tests for the symbol algebra.

use lalrgen::Symbol;

#[test]
fn terminal_and_nonterminal_with_same_name_are_equal() {
    assert_eq!(Symbol::terminal("x"), Symbol::non_terminal("x"));
}

#[test]
fn eof_and_epsilon_are_distinct_markers() {
    assert!(Symbol::eof().is_marker());
    assert!(Symbol::epsilon().is_marker());
    assert_ne!(Symbol::eof(), Symbol::epsilon());
    assert!(Symbol::eof().is_eof());
    assert!(Symbol::epsilon().is_epsilon());
}

#[test]
fn classification_predicates_are_exclusive() {
    let t = Symbol::terminal("int");
    assert!(t.is_terminal());
    assert!(!t.is_non_terminal());
    assert!(!t.is_marker());
}

#[test]
fn symbols_sort_by_name() {
    let mut syms = vec![Symbol::terminal("b"), Symbol::terminal("a"), Symbol::eof()];
    syms.sort();
    assert_eq!(syms[0].name(), "a");
    assert_eq!(syms[1].name(), "b");
}
