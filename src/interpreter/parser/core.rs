use std::iter::Peekable;

use crate::{
    ast::{Expr, Statement},
    error::ParseError,
    interpreter::{
        lexer::SourceToken,
        parser::{
            binary::parse_logical_or,
            statement::parse_statement,
            utils::{at_end, expect_statement_end, skip_terminators, synchronize},
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a complete token sequence into top-level statements.
///
/// Parsing never stops at the first syntax error. Each statement is parsed on
/// its own; a failing one is recorded, the parser skips ahead to the next
/// statement boundary and carries on. Failed statements are left out of the
/// returned list.
///
/// # Parameters
/// - `tokens`: Scanned tokens, terminated by `Token::Eof`.
///
/// # Returns
/// The statements that parsed, and every syntax error met.
///
/// # Example
/// ```
/// use wflow::interpreter::{lexer::scan, parser::core::parse_program};
///
/// let scanned = scan("river A = \nriver B = 2\nflow B A");
/// let (statements, errors) = parse_program(&scanned.tokens);
///
/// assert_eq!(statements.len(), 1);
/// assert_eq!(errors.len(), 2);
/// assert_eq!(errors[0].to_string(), "[line 1] Error at '\\n': Expected expression.");
/// ```
#[must_use]
pub fn parse_program(tokens: &[SourceToken]) -> (Vec<Statement>, Vec<ParseError>) {
    let mut tokens = tokens.iter().peekable();
    let mut statements = Vec::new();
    let mut errors = Vec::new();

    loop {
        skip_terminators(&mut tokens);
        if at_end(&mut tokens) {
            break;
        }
        if let Some(statement) = parse_declaration(&mut tokens, &mut errors, false) {
            statements.push(statement);
        }
    }

    tracing::debug!(statements = statements.len(), errors = errors.len(), "parsed program");
    (statements, errors)
}

/// Parses one statement inside a recovery boundary.
///
/// On success the statement is returned together with its terminator. On
/// failure the error is pushed to `errors`, tokens are skipped up to the next
/// statement boundary and `None` is returned.
///
/// # Parameters
/// - `tokens`: Token stream positioned at the start of a statement.
/// - `errors`: Collected syntax errors.
/// - `in_block`: Whether the statement sits inside braces.
pub fn parse_declaration<'a, I>(tokens: &mut Peekable<I>,
                                errors: &mut Vec<ParseError>,
                                in_block: bool)
                                -> Option<Statement>
    where I: Iterator<Item = &'a SourceToken>
{
    let result = parse_statement(tokens, errors).and_then(|statement| {
                                                    if !matches!(statement, Statement::Block { .. }) {
                                                        expect_statement_end(tokens)?;
                                                    }
                                                    Ok(statement)
                                                });

    match result {
        Ok(statement) => Some(statement),
        Err(error) => {
            tracing::trace!(%error, "recovering from syntax error");
            errors.push(error);
            synchronize(tokens, in_block);
            None
        },
    }
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing.
/// It begins at the lowest-precedence level, logical OR, and recursively
/// descends through the precedence hierarchy.
///
/// Grammar: `expression := logical_or`
///
/// # Parameters
/// - `tokens`: Token iterator.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SourceToken>
{
    parse_logical_or(tokens)
}
