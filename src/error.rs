//! Error types for the LALR(1) table generator.

use thiserror::Error;

/// Errors that can occur while building a grammar, constructing its LALR(1)
/// table, or driving a token stream through the result.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("unknown non-terminal `{0}` appears on a right-hand side but has no productions")]
    UnknownNonTerminal(String),

    #[error("grammar has no productions for its start symbol `{0}`")]
    NoStartProductions(String),

    #[error("production {lhs} -> {rhs:?} mixes epsilon with other symbols")]
    EpsilonMixedWithSymbols { lhs: String, rhs: Vec<String> },

    #[error("grammar has no productions at all")]
    EmptyGrammar,

    #[error(
        "shift/reduce conflict at state {state}, symbol `{symbol}`: \
         can both shift and reduce by {rule}"
    )]
    ShiftReduceConflict {
        state: usize,
        symbol: String,
        rule: String,
    },

    #[error(
        "reduce/reduce conflict at state {state}, symbol `{symbol}`: \
         {rule1} and {rule2} both reduce on this lookahead"
    )]
    ReduceReduceConflict {
        state: usize,
        symbol: String,
        rule1: String,
        rule2: String,
    },

    #[error("internal invariant violated: {0}")]
    Internal(String),

    #[error("invalid grammar text: {0}")]
    GrammarText(String),

    #[error("syntax error at {token}: expected one of {expected:?}")]
    Parse { token: String, expected: Vec<String> },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for `Result`s in this crate.
pub type Result<T> = std::result::Result<T, GeneratorError>;
