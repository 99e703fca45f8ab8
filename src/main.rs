//! LALR(1) parsing table generator
//!
//! Builds LALR(1) ACTION/GOTO tables from a context-free grammar:
//! - FIRST/FOLLOW/NULLABLE computation
//! - canonical LR(1) item-set construction (closure, goto)
//! - LALR(1) state merging by LR(0) core
//! - table synthesis with conflict detection
//! - table serialization into an emitter template
//!
//! # Author
//! Juan Manuel Young Hoyos
//!
//! # References
//! Aho, Alfred V. et al. "Compilers: Principles, Techniques, and Tools" (2nd Edition).
//! Addison-Wesley, 2006.

mod automaton;
mod cli;
mod driver;
mod error;
mod first_follow;
mod grammar;
mod item;
mod lalr;
mod serialize;
mod symbol;
mod table;
mod tokenizer;

use std::process;

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
