/// The environment module holds variable scopes.
///
/// A day starts with a root scope binding `rainfall` and `day`. Blocks and dam
/// adjustments push child scopes that are removed again when they finish,
/// whether or not evaluation succeeded.
pub mod environment;
/// The evaluator module executes statements and computes values.
///
/// The evaluator walks the AST once per simulated day, evaluates expressions,
/// applies river statements to the shared registry, and writes the output of
/// `print` and `output`.
///
/// # Responsibilities
/// - Evaluates expressions with numeric, string, boolean and `nil` values.
/// - Applies `river`, `combine`, `flow` and `dam` to the river registry.
/// - Reports runtime errors such as type mismatches, undefined names and
///   invalid dam factors.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a stream of
/// tokens, each corresponding to meaningful language elements such as numbers,
/// strings, identifiers, operators, keywords and line breaks. This is the first
/// stage of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with lexeme and line.
/// - Skips whitespace and comments while keeping line numbers accurate.
/// - Reports lexical errors for invalid or malformed input without stopping.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// the statements of the program, recovering after each syntax error so one
/// pass reports as many errors as possible.
pub mod parser;
/// The river module holds the hydrological state.
///
/// Defines the per-river record and the insertion-ordered registry shared by
/// every day of a simulation.
pub mod river;
/// The value module defines the runtime data types for evaluation.
pub mod value;
