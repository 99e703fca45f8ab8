//! CLI for building an LALR(1) table from a grammar file and either
//! reporting it, emitting it through a template, or driving an input
//! string through the resulting parser.

use crate::automaton;
use crate::driver;
use crate::error::{GeneratorError, Result};
use crate::grammar::Grammar;
use crate::lalr;
use crate::serialize;
use crate::table;
use crate::tokenizer::Lexer;
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "lalrgen", about = "Builds LALR(1) parsing tables from a grammar file")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Builds an LALR(1) table and reports its size and any conflicts.
    Build {
        /// Path to a grammar text file (`Lhs -> a b | c` per line).
        #[arg(long)]
        grammar: PathBuf,
        /// The grammar's start symbol.
        #[arg(long)]
        start: String,
        /// Optional emitter template; if given, the filled-in template is
        /// printed to stdout.
        #[arg(long)]
        template: Option<PathBuf>,
        /// Optional input string to drive through the built table after
        /// construction.
        #[arg(long)]
        input: Option<String>,
    },
}

/// Runs the CLI end to end: parse args, build the grammar and table, then
/// dispatch to whichever of report/emit/drive the flags asked for.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build {
            grammar,
            start,
            template,
            input,
        } => run_build(&grammar, &start, template.as_deref(), input.as_deref()),
    }
}

fn run_build(
    grammar_path: &std::path::Path,
    start: &str,
    template_path: Option<&std::path::Path>,
    input: Option<&str>,
) -> Result<()> {
    let text = fs::read_to_string(grammar_path)?;
    let grammar = Grammar::from_text(&text, start)?;
    info!(rules = grammar.rules().len(), "grammar loaded");

    let canonical = automaton::build(&grammar);
    let merged = lalr::merge(&canonical);
    let parse_table = table::build(&grammar, &merged)?;
    info!(states = parse_table.num_states, "LALR(1) table built");
    println!(
        "built LALR(1) table: {} states, {} cells",
        parse_table.num_states,
        parse_table.actions.len()
    );

    let reserved: HashMap<String, String> = grammar
        .terminals()
        .iter()
        .filter(|t| !t.is_eof())
        .map(|t| (t.name().to_string(), t.name().to_string()))
        .collect();

    if let Some(template_path) = template_path {
        let template = fs::read_to_string(template_path)?;
        let encoded = serialize::encode(&parse_table);
        let patterns = [("integer".to_string(), r"[0-9]+".to_string())];
        let filename = grammar_path.display().to_string();
        let emitted = serialize::emit(&template, &encoded, &patterns, &filename, &reserved)?;
        println!("{emitted}");
    }

    if let Some(input) = input {
        let tokens = Lexer::new(input, reserved, grammar_path.display().to_string()).tokenize();
        match driver::run(&parse_table, &tokens) {
            Ok(result) => {
                println!("accepted, {} reductions applied", result.reductions.len());
            }
            Err(GeneratorError::Parse { token, expected }) => {
                println!("rejected at {token}, expected one of {expected:?}");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
