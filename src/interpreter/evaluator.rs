/// Core evaluation logic and context management.
///
/// Contains the per-day runtime context, statement dispatch, variable
/// resolution and scope handling.
pub mod core;

/// Binary operator evaluation logic.
///
/// Handles arithmetic, string concatenation, comparisons, equality and the
/// short-circuiting `and` / `or`.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements arithmetic negation and logical NOT.
pub mod unary;

/// River statement evaluation.
///
/// Executes `river`, `output`, `combine`, `flow` and `dam` against the shared
/// river registry.
pub mod river;
