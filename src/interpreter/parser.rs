/// Core parsing logic.
///
/// Contains the program entry point, the per-statement recovery boundary and
/// the expression entry point.
pub mod core;

/// Unary and primary expression parsing.
///
/// Handles prefix operators, literals, names and parenthesized groupings.
pub mod unary;

/// Binary expression parsing.
///
/// Implements the precedence levels from `or` down to multiplication.
pub mod binary;

/// Block parsing.
///
/// Parses brace-delimited statement sequences, recovering from errors inside
/// them statement by statement.
pub mod block;

/// Utility functions for the parser.
///
/// Token expectations, statement terminators and error recovery.
pub mod utils;

/// Statement parsing.
///
/// Dispatches on the leading keyword to the river, dam, variable, print and
/// block forms.
pub mod statement;
