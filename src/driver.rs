//! The runtime shift-reduce driver: walks a token stream against a built
//! [`ParseTable`], the same stack-machine shape as a hand-rolled SLR(1)/
//! LL(1) `parse` method, generalized to drive any table this crate
//! produces and to report which rules fired.

use crate::error::{GeneratorError, Result};
use crate::item::StateId;
use crate::symbol::Symbol;
use crate::table::{Action, ParseTable};
use crate::tokenizer::Token;

/// One reduction applied while parsing, in the order it was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    pub lhs: String,
    pub len: usize,
}

/// The result of a successful parse: the reductions applied, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub reductions: Vec<Reduction>,
}

/// Drives `tokens` through `table`, starting at state 0.
///
/// On each step, the driver looks at `(current_state, next_token.symbol())`:
/// - `Shift(s)` pushes the token and moves to state `s`;
/// - `Reduce(lhs, len)` pops `len` state/symbol pairs, then performs a
///   `Goto` on `(state_after_pop, lhs)`;
/// - `Accept` ends the parse successfully;
/// - a missing cell is a [`GeneratorError::Parse`], carrying the state's
///   expected-token set.
pub fn run(table: &ParseTable, tokens: &[Token]) -> Result<ParseResult> {
    let mut state_stack: Vec<StateId> = vec![0];
    let mut reductions = Vec::new();
    let mut pos = 0;

    loop {
        let token = tokens.get(pos).ok_or_else(|| {
            GeneratorError::Internal("token stream ended without an eof token".to_string())
        })?;
        let symbol = token.symbol();
        let state = *state_stack.last().unwrap();

        match table.action(state, &symbol) {
            Some(Action::Shift(next)) => {
                state_stack.push(*next);
                pos += 1;
            }
            Some(Action::Reduce { lhs, len, .. }) => {
                for _ in 0..*len {
                    state_stack.pop();
                }
                let state_after_pop = *state_stack.last().unwrap();
                let goto = table
                    .action(state_after_pop, lhs)
                    .ok_or_else(|| {
                        GeneratorError::Internal(format!(
                            "no goto for state {state_after_pop} on {lhs}"
                        ))
                    })?
                    .clone();
                match goto {
                    Action::Goto(next) => state_stack.push(next),
                    _ => {
                        return Err(GeneratorError::Internal(format!(
                            "expected goto action for {lhs}, found {goto:?}"
                        )))
                    }
                }
                reductions.push(Reduction {
                    lhs: lhs.name().to_string(),
                    len: *len,
                });
            }
            Some(Action::Accept) => return Ok(ParseResult { reductions }),
            Some(Action::Goto(_)) | None => {
                let expected = table
                    .expected
                    .get(&state)
                    .map(|set| set.iter().map(|s| s.name().to_string()).collect())
                    .unwrap_or_default();
                return Err(GeneratorError::Parse {
                    token: format!("{}:{}: `{}`", token.loc.line, token.loc.col, token.lexeme),
                    expected,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::build as build_canonical;
    use crate::grammar::Grammar;
    use crate::lalr::merge;
    use crate::table::build as build_table;
    use crate::tokenizer::Loc;

    fn token(kind: &str) -> Token {
        Token {
            kind: kind.to_string(),
            lexeme: kind.to_string(),
            loc: Loc::new("(test)", 0, 0, 0),
        }
    }

    fn table_for(text: &str, start: &str) -> ParseTable {
        let g = Grammar::from_text(text, start).unwrap();
        let canonical = build_canonical(&g);
        let merged = merge(&canonical);
        build_table(&g, &merged).unwrap()
    }

    #[test]
    fn accepts_a_valid_sentence() {
        let table = table_for("S -> a b\n", "S");
        let tokens = vec![token("a"), token("b"), token("eof")];
        let result = run(&table, &tokens).unwrap();
        assert_eq!(result.reductions.len(), 1);
        assert_eq!(result.reductions[0].lhs, "S");
    }

    #[test]
    fn rejects_an_invalid_sentence_with_expected_tokens() {
        let table = table_for("S -> a b\n", "S");
        let tokens = vec![token("a"), token("c"), token("eof")];
        let err = run(&table, &tokens).unwrap_err();
        match err {
            GeneratorError::Parse { expected, .. } => assert!(expected.contains(&"b".to_string())),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn reductions_are_reported_in_bottom_up_order() {
        // E -> E + n | n   left-recursive, so "n + n" reduces n, then E,
        // then the outer E + n.
        let table = table_for("E -> E plus n\nE -> n\n", "E");
        let tokens = vec![token("n"), token("plus"), token("n"), token("eof")];
        let result = run(&table, &tokens).unwrap();
        assert_eq!(result.reductions.len(), 2);
        assert_eq!(result.reductions[0].lhs, "E");
        assert_eq!(result.reductions[1].lhs, "E");
    }
}
