use std::iter::Peekable;

use crate::{
    ast::Statement,
    error::ParseError,
    interpreter::{
        lexer::{SourceToken, Token},
        parser::{
            core::{ParseResult, parse_declaration},
            utils::{check, error_at, skip_terminators},
        },
    },
};

/// Parses a block statement delimited by braces.
///
/// A block consists of zero or more statements separated by newlines or `;`.
/// Parsing continues until a closing `}` token is encountered. Each statement
/// inside gets its own recovery boundary, so one bad line does not discard the
/// whole block; its error is pushed to `errors`.
///
/// Grammar: `block := "{" statement* "}"`
///
/// # Parameters
/// - `tokens`: Token stream positioned after the opening brace.
/// - `errors`: Collected syntax errors.
/// - `line`: Line number of the opening brace.
///
/// # Errors
/// `Expected '}' after block.` if the input ends first.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>,
                          errors: &mut Vec<ParseError>,
                          line: usize)
                          -> ParseResult<Statement>
    where I: Iterator<Item = &'a SourceToken>
{
    let mut statements = Vec::new();

    loop {
        skip_terminators(tokens);

        if check(tokens, &Token::RBrace) {
            tokens.next();
            break;
        }
        if tokens.peek().is_none_or(|t| t.token == Token::Eof) {
            return Err(error_at(tokens.peek().copied(), "Expected '}' after block."));
        }

        if let Some(statement) = parse_declaration(tokens, errors, true) {
            statements.push(statement);
        }
    }

    Ok(Statement::Block { statements, line })
}
