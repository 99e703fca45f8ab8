//! Grammar model: productions, the augmented start rule, and the derived
//! NULLABLE/FIRST sets used by item-set closure.

use crate::error::{GeneratorError, Result};
use crate::first_follow::{compute_first_sets, compute_nullable, first_of_sequence, FirstSets};
use crate::symbol::Symbol;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// The identifier of a rule (production) in a [`Grammar`]'s arena.
///
/// Rules are content-addressed: the pair `(lhs, rhs)` is globally unique,
/// so two `add_rule` calls with identical arguments yield the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub usize);

/// A single production `lhs -> rhs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub id: RuleId,
    pub lhs: Symbol,
    pub rhs: Vec<Symbol>,
}

impl Rule {
    /// The number of symbols to pop on reduce: `rhs.len()`, except that the
    /// explicit epsilon production `[ε]` counts as zero.
    pub fn reduce_len(&self) -> usize {
        if self.rhs.len() == 1 && self.rhs[0].is_epsilon() {
            0
        } else {
            self.rhs.len()
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rhs = self
            .rhs
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{} -> {}", self.lhs, rhs)
    }
}

/// A context-free grammar: an arena of rules plus the derived sets needed
/// to build an LALR(1) table.
#[derive(Debug, Clone)]
pub struct Grammar {
    rules: Vec<Rule>,
    rule_index: HashMap<(Symbol, Vec<Symbol>), RuleId>,
    rules_by_lhs: HashMap<Symbol, Vec<RuleId>>,
    nonterminals: HashSet<Symbol>,
    terminals: HashSet<Symbol>,
    start_symbol: Symbol,
    augmented_start: Symbol,
    augmented_rule: RuleId,
    nullable: HashSet<Symbol>,
    first_sets: FirstSets,
}

/// Incrementally builds a [`Grammar`] before its derived sets are computed.
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    rules: Vec<Rule>,
    rule_index: HashMap<(Symbol, Vec<Symbol>), RuleId>,
    rules_by_lhs: HashMap<Symbol, Vec<RuleId>>,
    nonterminals: HashSet<Symbol>,
    terminals: HashSet<Symbol>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an alternative `lhs -> rhs`. Rejects a rhs that mixes `ε`
    /// with other symbols. Re-adding an identical `(lhs, rhs)` pair is a
    /// no-op: rules are content-addressed.
    pub fn add_rule(&mut self, lhs: Symbol, rhs: Vec<Symbol>) -> Result<RuleId> {
        if rhs.len() > 1 && rhs.iter().any(Symbol::is_epsilon) {
            return Err(GeneratorError::EpsilonMixedWithSymbols {
                lhs: lhs.name().to_string(),
                rhs: rhs.iter().map(|s| s.name().to_string()).collect(),
            });
        }

        let key = (lhs.clone(), rhs.clone());
        if let Some(&id) = self.rule_index.get(&key) {
            return Ok(id);
        }

        let id = RuleId(self.rules.len());
        self.nonterminals.insert(lhs.clone());
        for sym in &rhs {
            if sym.is_non_terminal() {
                self.nonterminals.insert(sym.clone());
            } else if sym.is_terminal() {
                self.terminals.insert(sym.clone());
            }
        }

        let rule = Rule {
            id,
            lhs: lhs.clone(),
            rhs: rhs.clone(),
        };
        self.rules.push(rule);
        self.rules_by_lhs.entry(lhs).or_default().push(id);
        self.rule_index.insert(key, id);
        Ok(id)
    }

    /// Finalizes the grammar: augments the start rule `S' -> S`, checks
    /// that every right-hand-side non-terminal has at least one
    /// production, and computes NULLABLE/FIRST.
    pub fn build(mut self, start: Symbol) -> Result<Grammar> {
        if self.rules.is_empty() {
            return Err(GeneratorError::EmptyGrammar);
        }
        if !self.rules_by_lhs.contains_key(&start) {
            return Err(GeneratorError::NoStartProductions(
                start.name().to_string(),
            ));
        }

        for rule in &self.rules {
            for sym in &rule.rhs {
                if sym.is_non_terminal() && !self.rules_by_lhs.contains_key(sym) {
                    return Err(GeneratorError::UnknownNonTerminal(
                        sym.name().to_string(),
                    ));
                }
            }
        }

        self.terminals.insert(Symbol::eof());

        let augmented_start = Symbol::non_terminal(format!("{}'", start.name()));
        let augmented_rule_id = RuleId(self.rules.len());
        // rhs is `[S]`, not `[S, $]`: the accept condition is the complete
        // item `S' -> S .` under lookahead `$`, not a literal shift over an
        // EOF symbol on the right-hand side. Encoding `$` into the rhs would
        // make `goto(start_state, S)` hand the automaton a real, shiftable
        // EOF transition, which has no Accept action of its own — see
        // `table::build`'s augmented-rule special case.
        let augmented_rule = Rule {
            id: augmented_rule_id,
            lhs: augmented_start.clone(),
            rhs: vec![start.clone()],
        };
        self.nonterminals.insert(augmented_start.clone());
        self.rules_by_lhs
            .entry(augmented_start.clone())
            .or_default()
            .push(augmented_rule_id);
        self.rule_index.insert(
            (augmented_start.clone(), augmented_rule.rhs.clone()),
            augmented_rule_id,
        );
        self.rules.push(augmented_rule);

        let nullable = compute_nullable(&self.rules);
        let first_sets = compute_first_sets(&self.rules, &self.terminals, &nullable);

        Ok(Grammar {
            rules: self.rules,
            rule_index: self.rule_index,
            rules_by_lhs: self.rules_by_lhs,
            nonterminals: self.nonterminals,
            terminals: self.terminals,
            start_symbol: start,
            augmented_start,
            augmented_rule: augmented_rule_id,
            nullable,
            first_sets,
        })
    }
}

impl Grammar {
    /// Starts a fresh [`GrammarBuilder`].
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::new()
    }

    /// The augmented start symbol `S'`, whose single alternative is `[S]`;
    /// the automaton accepts when this rule is complete under lookahead `$`.
    pub fn start(&self) -> &Symbol {
        &self.augmented_start
    }

    /// The grammar's own (pre-augmentation) start symbol `S`.
    pub fn original_start(&self) -> &Symbol {
        &self.start_symbol
    }

    /// The augmented rule `S' -> S`. Its completion under lookahead `$` is
    /// the accept condition (see `table::build`).
    pub fn augmented_rule_id(&self) -> RuleId {
        self.augmented_rule
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.0]
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rules whose left-hand side is `lhs`, in insertion order.
    pub fn rules_for(&self, lhs: &Symbol) -> &[RuleId] {
        self.rules_by_lhs
            .get(lhs)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn nonterminals(&self) -> &HashSet<Symbol> {
        &self.nonterminals
    }

    pub fn terminals(&self) -> &HashSet<Symbol> {
        &self.terminals
    }

    /// Whether `sym` can derive the empty string.
    pub fn nullable(&self, sym: &Symbol) -> bool {
        sym.is_epsilon() || self.nullable.contains(sym)
    }

    /// `FIRST(sym)`.
    pub fn first(&self, sym: &Symbol) -> HashSet<Symbol> {
        if sym.is_terminal() || sym.is_marker() {
            let mut set = HashSet::new();
            set.insert(sym.clone());
            return set;
        }
        self.first_sets.get(sym).cloned().unwrap_or_default()
    }

    /// `FIRST*(sequence)`: FIRST of a sentential form, including `ε` if
    /// every symbol in `sequence` is nullable.
    pub fn first_of(&self, sequence: &[Symbol]) -> HashSet<Symbol> {
        first_of_sequence(&self.first_sets, &self.nullable, sequence)
    }

    /// `FIRST*(beta ++ [lookahead])`, used by LR(1) closure: the set of
    /// terminals that can follow an item whose remaining right-hand side is
    /// `beta` under the item's own lookahead `lookahead`. Never contains
    /// `ε`, since `lookahead` itself is a terminal and therefore
    /// non-nullable.
    pub fn lookaheads_after(&self, beta: &[Symbol], lookahead: &Symbol) -> HashSet<Symbol> {
        let mut result = HashSet::new();
        let mut all_nullable = true;
        for sym in beta {
            let first_sym = self.first(sym);
            for s in &first_sym {
                if !s.is_epsilon() {
                    result.insert(s.clone());
                }
            }
            if !self.nullable(sym) {
                all_nullable = false;
                break;
            }
        }
        if all_nullable {
            result.insert(lookahead.clone());
        }
        result
    }
}

/// Classifies a bare word from grammar text: an identifier starting with
/// an uppercase ASCII letter is a non-terminal, anything else is a
/// terminal. `ε`/`eps` spell the empty string explicitly.
fn classify(word: &str) -> Symbol {
    match word {
        "ε" | "eps" | "epsilon" => Symbol::epsilon(),
        "$" | "EOF" => Symbol::eof(),
        _ if word.starts_with(|c: char| c.is_ascii_uppercase()) => Symbol::non_terminal(word),
        _ => Symbol::terminal(word),
    }
}

impl Grammar {
    /// Parses a grammar from its textual form:
    ///
    /// ```text
    /// Lhs -> sym sym | sym
    /// ```
    ///
    /// Blank lines and lines starting with `#` are ignored. `|` separates
    /// alternatives on one line; an alternative with no symbols means `ε`.
    /// A word is a non-terminal iff it starts with an uppercase ASCII
    /// letter.
    pub fn from_text(text: &str, start: &str) -> Result<Grammar> {
        let mut builder = Grammar::builder();

        for (lineno, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.splitn(2, "->");
            let lhs_str = parts.next().unwrap_or("").trim();
            let rhs_str = parts.next().ok_or_else(|| {
                GeneratorError::GrammarText(format!(
                    "line {}: missing `->` in `{}`",
                    lineno + 1,
                    raw_line
                ))
            })?;

            if lhs_str.is_empty() {
                return Err(GeneratorError::GrammarText(format!(
                    "line {}: empty left-hand side",
                    lineno + 1
                )));
            }
            let lhs = classify(lhs_str);
            if !lhs.is_non_terminal() {
                return Err(GeneratorError::GrammarText(format!(
                    "line {}: left-hand side `{}` must be a non-terminal",
                    lineno + 1,
                    lhs_str
                )));
            }

            for alt in rhs_str.split('|') {
                let rhs: Vec<Symbol> = alt.split_whitespace().map(classify).collect();
                let rhs = if rhs.is_empty() {
                    vec![Symbol::epsilon()]
                } else {
                    rhs
                };
                builder.add_rule(lhs.clone(), rhs)?;
            }
        }

        builder.build(classify(start))
    }
}
