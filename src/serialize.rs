//! Serializes a [`ParseTable`] into a compact, integer-keyed encoding and
//! substitutes it into an emitter template.
//!
//! Encoding scheme (matches the original generator's convention):
//! - `Shift(s)`  -> `(s << 1) | 1`
//! - `Goto(s)`   -> `s << 1`
//! - `Reduce(lhs, len)` -> `(lhs, len)`
//! - `Accept`    -> `-1`

use crate::error::{GeneratorError, Result};
use crate::symbol::Symbol;
use crate::table::{Action, ParseTable};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};

/// One cell's encoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedAction {
    /// `(state << 1) | 1` for shift, `state << 1` for goto.
    Transition(i64),
    /// `(lhs name, reduce length)`.
    Reduce(String, usize),
    /// `-1`.
    Accept,
}

/// The encoded table: one cell per `(state, symbol name)`, plus the
/// expected-token lists per state, in deterministic (sorted) order so that
/// the emitted artifact is byte-for-byte stable across runs.
#[derive(Debug, Clone)]
pub struct EncodedTable {
    pub cells: BTreeMap<(usize, String), EncodedAction>,
    pub states: Vec<usize>,
    pub expected_tokens: BTreeMap<usize, Vec<String>>,
}

/// Encodes a [`ParseTable`] using the shift/goto/reduce/accept scheme.
pub fn encode(table: &ParseTable) -> EncodedTable {
    let mut cells = BTreeMap::new();
    let mut expected_tokens: BTreeMap<usize, Vec<String>> = BTreeMap::new();

    for ((state, symbol), action) in &table.actions {
        let encoded = match action {
            Action::Shift(next) => EncodedAction::Transition(((*next as i64) << 1) | 1),
            Action::Goto(next) => EncodedAction::Transition((*next as i64) << 1),
            Action::Reduce { lhs, len, .. } => EncodedAction::Reduce(lhs.name().to_string(), *len),
            Action::Accept => EncodedAction::Accept,
        };
        cells.insert((*state, symbol.name().to_string()), encoded);
    }

    for (state, symbols) in &table.expected {
        let mut names: Vec<String> = symbols.iter().map(|s| s.name().to_string()).collect();
        names.sort();
        expected_tokens.insert(*state, names);
    }

    let states: Vec<usize> = (0..table.num_states).collect();

    EncodedTable {
        cells,
        states,
        expected_tokens,
    }
}

/// Decodes a single cell back into an [`Action`]-shaped description. Used
/// by tests and by tooling that wants to sanity-check a serialized table
/// without re-running the builder.
pub fn decode_cell(encoded: &EncodedAction) -> (&'static str, String) {
    match encoded {
        EncodedAction::Accept => ("accept", "-1".to_string()),
        EncodedAction::Transition(v) if v & 1 == 1 => ("shift", (v >> 1).to_string()),
        EncodedAction::Transition(v) => ("goto", (v >> 1).to_string()),
        EncodedAction::Reduce(lhs, len) => ("reduce", format!("{lhs},{len}")),
    }
}

fn pretty_cells(cells: &BTreeMap<(usize, String), EncodedAction>) -> String {
    let mut out = String::from("{\n");
    for ((state, symbol), action) in cells {
        let value = match action {
            EncodedAction::Transition(v) => v.to_string(),
            EncodedAction::Reduce(lhs, len) => format!("(\"{lhs}\", {len})"),
            EncodedAction::Accept => "-1".to_string(),
        };
        out.push_str(&format!("    ({state}, \"{symbol}\"): {value},\n"));
    }
    out.push('}');
    out
}

fn pretty_expected(expected: &BTreeMap<usize, Vec<String>>) -> String {
    let mut out = String::from("{\n");
    for (state, tokens) in expected {
        let list = tokens
            .iter()
            .map(|t| format!("\"{t}\""))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("    {state}: [{list}],\n"));
    }
    out.push('}');
    out
}

/// Pretty-prints the `identifier -> regex pattern` table for `%patterns%`,
/// sorted by identifier for reproducible output.
fn pretty_patterns(patterns: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = patterns.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = String::from("{\n");
    for (identifier, pattern) in sorted {
        out.push_str(&format!("    \"{identifier}\": r\"{pattern}\",\n"));
    }
    out.push('}');
    out
}

/// Pretty-prints the `literal -> terminal kind` keyword/operator table for
/// `%reserved%`, sorted by literal for reproducible output.
fn pretty_reserved(reserved: &HashMap<String, String>) -> String {
    let sorted: BTreeMap<&String, &String> = reserved.iter().collect();

    let mut out = String::from("{\n");
    for (literal, kind) in sorted {
        out.push_str(&format!("    \"{literal}\": \"{kind}\",\n"));
    }
    out.push('}');
    out
}

/// Substitutes an [`EncodedTable`] plus the tokenizer-facing `patterns`,
/// `filename`, and `reserved` values into a template string containing the
/// sentinels `%parsing_table%`, `%states%`, `%expected_tokens%`,
/// `%patterns%`, `%filename%`, `%reserved%`, and `%id%`.
///
/// `patterns` is the `identifier -> regex pattern` table the emitted
/// tokenizer should use; `reserved` is the `literal -> terminal kind`
/// keyword/operator table (the same shape as [`crate::tokenizer::Lexer`]'s
/// `named_tokens`).
///
/// No attempt is made to escape sentinel-like substrings that happen to
/// appear inside grammar-derived names; a symbol literally spelled
/// `%parsing_table%` would collide. This mirrors the original generator's
/// own behavior and is an accepted limitation.
pub fn emit(
    template: &str,
    encoded: &EncodedTable,
    patterns: &[(String, String)],
    filename: &str,
    reserved: &HashMap<String, String>,
) -> Result<String> {
    if !template.contains("%parsing_table%") {
        return Err(GeneratorError::Internal(
            "emitter template is missing the %parsing_table% sentinel".to_string(),
        ));
    }

    let mut out = template.to_string();
    out = out.replace("%parsing_table%", &pretty_cells(&encoded.cells));
    out = out.replace(
        "%states%",
        &format!(
            "[{}]",
            encoded
                .states
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
    );
    out = out.replace("%expected_tokens%", &pretty_expected(&encoded.expected_tokens));
    out = out.replace("%patterns%", &pretty_patterns(patterns));
    out = out.replace("%filename%", &format!("\"{filename}\""));
    out = out.replace("%reserved%", &pretty_reserved(reserved));

    let digest = Sha256::digest(out.as_bytes());
    let hex = digest.iter().map(|b| format!("{b:02x}")).collect::<String>();
    out = out.replace("%id%", &hex);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::build as build_canonical;
    use crate::grammar::Grammar;
    use crate::lalr::merge;
    use crate::table::build as build_table;

    fn sample_table() -> ParseTable {
        let g = Grammar::from_text("S -> a\n", "S").unwrap();
        let canonical = build_canonical(&g);
        let merged = merge(&canonical);
        build_table(&g, &merged).unwrap()
    }

    #[test]
    fn shift_is_encoded_as_odd_value() {
        let table = sample_table();
        let encoded = encode(&table);
        let shift = encoded
            .cells
            .values()
            .find(|a| matches!(a, EncodedAction::Transition(v) if v % 2 == 1));
        assert!(shift.is_some());
    }

    #[test]
    fn accept_is_encoded_as_minus_one() {
        let table = sample_table();
        let encoded = encode(&table);
        assert!(encoded.cells.values().any(|a| *a == EncodedAction::Accept));
    }

    #[test]
    fn emit_substitutes_all_sentinels_and_a_content_hash() {
        let table = sample_table();
        let encoded = encode(&table);
        let patterns = vec![("integer".to_string(), r"[0-9]+".to_string())];
        let reserved: HashMap<String, String> =
            HashMap::from([("a".to_string(), "a".to_string())]);
        let template = "TABLE = %parsing_table%\nSTATES = %states%\nEXPECTED = %expected_tokens%\nPATTERNS = %patterns%\nFILE = %filename%\nRESERVED = %reserved%\nID = \"%id%\"\n";
        let out = emit(template, &encoded, &patterns, "grammar.txt", &reserved).unwrap();
        assert!(!out.contains('%'));
        assert!(out.contains("TABLE ="));
        assert!(out.contains("FILE = \"grammar.txt\""));
        assert!(out.contains("integer"));
        assert!(out.contains("\"a\": \"a\""));
    }

    #[test]
    fn emit_rejects_a_template_missing_the_table_sentinel() {
        let table = sample_table();
        let encoded = encode(&table);
        let err = emit("no sentinel here", &encoded, &[], "(void)", &HashMap::new()).unwrap_err();
        assert!(matches!(err, GeneratorError::Internal(_)));
    }

    #[test]
    fn decode_round_trips_shift_and_reduce() {
        let (kind, value) = decode_cell(&EncodedAction::Transition(5));
        assert_eq!(kind, "shift");
        assert_eq!(value, "2");

        let (kind, _) = decode_cell(&EncodedAction::Reduce(Symbol::non_terminal("S").name().to_string(), 1));
        assert_eq!(kind, "reduce");
    }
}
