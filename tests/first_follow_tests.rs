//! Integration-level tests for NULLABLE/FIRST/FOLLOW set computation.

use lalrgen::first_follow::compute_follow_sets;
use lalrgen::{Grammar, Symbol};

fn nt(name: &str) -> Symbol {
    Symbol::non_terminal(name)
}
fn t(name: &str) -> Symbol {
    Symbol::terminal(name)
}

#[test]
fn first_of_a_nonterminal_is_the_union_over_its_alternatives() {
    let g = Grammar::from_text("S -> A B\nA -> a\n", "S").unwrap();
    assert!(g.first(&nt("A")).contains(&t("a")));
}

#[test]
fn follow_of_start_contains_eof_via_the_augmented_rule() {
    let g = Grammar::from_text("S -> A B\nA -> a\nB -> b\n", "S").unwrap();
    let follow = compute_follow_sets(&g);
    assert!(follow[&nt("S")].contains(&Symbol::eof()));
}

#[test]
fn first_includes_epsilon_for_a_nullable_alternative() {
    let g = Grammar::from_text("S -> A B\nA -> a |\nB -> b\n", "S").unwrap();
    assert!(g.nullable(&nt("A")));
    assert!(g.first(&nt("A")).contains(&t("a")));
}

#[test]
fn first_of_sequence_stops_at_the_first_non_nullable_symbol() {
    let g = Grammar::from_text("S -> A B\nA -> a |\nB -> b\n", "S").unwrap();
    let seq = vec![nt("A"), nt("B")];
    let first = g.first_of(&seq);
    assert!(first.contains(&t("a")));
    assert!(first.contains(&t("b")));
    assert!(!first.contains(&Symbol::epsilon()), "B is not nullable, so A B cannot derive epsilon");
}

#[test]
fn follow_propagates_through_a_trailing_nonterminal() {
    let g = Grammar::from_text("S -> A B\nA -> a\nB -> b\n", "S").unwrap();
    let follow = compute_follow_sets(&g);
    assert!(follow[&nt("A")].contains(&t("b")));
}

#[test]
fn first_and_follow_on_a_left_recursive_grammar() {
    let g = Grammar::from_text("S -> A B\nA -> a A d | d\nB -> b B c | e\n", "S").unwrap();
    let first_s = g.first(&nt("S"));
    assert!(first_s.contains(&t("a")));
    assert!(first_s.contains(&t("d")));

    let follow = compute_follow_sets(&g);
    assert!(follow[&nt("A")].contains(&t("b")));
    assert!(follow[&nt("A")].contains(&t("d")));
    assert!(follow[&nt("B")].contains(&Symbol::eof()));
}
