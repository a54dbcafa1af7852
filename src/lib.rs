//! # wflow
//!
//! wflow is a small interpreted language for simulating rivers, dams and flow
//! transfers over a sequence of days, written in Rust.
//! A program is parsed once and then evaluated once per simulated day against
//! a river registry that persists across days.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

use std::io::Write;

use crate::{
    ast::Statement,
    error::{Error, ParseError},
    interpreter::{lexer::scan, parser::core::parse_program as parse_tokens},
    simulation::{Simulation, SimulationConfig},
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Statement` enums that represent the
/// syntactic structure of a program as a tree. The AST is built by the parser
/// and traversed by the evaluator once per day.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches source lines to AST nodes for error reporting.
/// - Renders nodes as parenthesized text through `Display`.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised during lexing, parsing, or
/// evaluating code. Every error carries the line it refers to and renders as
/// the diagnostic shown to users.
pub mod error;
/// Orchestrates the language pipeline.
///
/// This module ties together lexing, parsing, the variable environment, the
/// river registry and evaluation.
pub mod interpreter;
/// Drives a program over several days.
///
/// Holds the run configuration, owns the river registry and writes the day
/// headers and per-day summaries.
pub mod simulation;

/// Lexes and parses a complete program.
///
/// Lexical and syntax errors are all collected in one pass, in source order.
/// A program with any error must not be evaluated.
///
/// # Errors
/// Every lexical and syntax error found.
///
/// # Examples
/// ```
/// use wflow::parse_program;
///
/// let program = parse_program("river A = 10\noutput A").unwrap();
/// assert_eq!(program.len(), 2);
///
/// let errors = parse_program("river = 10\nflow A B\n@").unwrap_err();
/// assert_eq!(errors.len(), 3);
/// ```
pub fn parse_program(source: &str) -> Result<Vec<Statement>, Vec<ParseError>> {
    let scanned = scan(source);
    let (statements, syntax_errors) = parse_tokens(&scanned.tokens);

    let mut errors = scanned.errors;
    errors.extend(syntax_errors);
    if errors.is_empty() {
        Ok(statements)
    } else {
        errors.sort_by_key(ParseError::line);
        Err(errors)
    }
}

/// Parses `source` and simulates it for the configured days.
///
/// Day headers, program output and summaries are written to `out`.
///
/// # Returns
/// The finished simulation, for inspecting the final river state.
///
/// # Errors
/// - [`Error::Parse`] if the program has lexical or syntax errors. Nothing is
///   evaluated.
/// - [`Error::Runtime`] if a day was aborted. No further days run.
///
/// # Examples
/// ```
/// use wflow::{run_program, simulation::SimulationConfig};
///
/// let config = SimulationConfig::new(1, 5.0).unwrap();
/// let mut out = Vec::new();
/// run_program("river A = 10\noutput A", &config, &mut out).unwrap();
///
/// assert!(String::from_utf8(out).unwrap().contains("A flow: 10.00 L/s"));
///
/// // 'z' is neither a variable nor a river.
/// let result = run_program("print z", &config, &mut std::io::sink());
/// assert!(result.is_err());
/// ```
pub fn run_program(source: &str,
                   config: &SimulationConfig,
                   out: &mut dyn Write)
                   -> Result<Simulation, Error> {
    let program = parse_program(source)?;
    let mut simulation = Simulation::new(*config);
    simulation.run(&program, out)?;
    Ok(simulation)
}
