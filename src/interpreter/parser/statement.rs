use std::iter::Peekable;

use crate::{
    ast::{DamMode, Expr, Statement},
    error::ParseError,
    interpreter::{
        lexer::{SourceToken, Token},
        parser::{
            block::parse_block,
            core::{ParseResult, parse_expression},
            utils::{check, error_at, expect, parse_identifier},
        },
    },
};

/// Parses a single statement.
///
/// The leading keyword selects the form:
/// - `river NAME [= expr]`
/// - `output NAME`
/// - `combine NAME = NAME (+ NAME)*`
/// - `flow NAME -> NAME`
/// - `dam NAME (open | close | adjust expr)`
/// - `var NAME [= expr]`
/// - `print expr`
/// - `{ statement* }`
///
/// Anything else is parsed as an expression statement. The terminator is left
/// to the caller.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the start of the statement.
/// - `errors`: Collected errors of statements nested inside a block.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>,
                              errors: &mut Vec<ParseError>)
                              -> ParseResult<Statement>
    where I: Iterator<Item = &'a SourceToken>
{
    let Some(&first) = tokens.peek() else {
        return Err(error_at(None, "Expected statement."));
    };
    let line = first.line;

    match first.token {
        Token::River => {
            tokens.next();
            parse_river(tokens, line)
        },
        Token::Output => {
            tokens.next();
            let river = parse_identifier(tokens, "Expected river name after 'output'.")?;
            Ok(Statement::Output { river, line })
        },
        Token::Combine => {
            tokens.next();
            parse_combine(tokens, line)
        },
        Token::Flow => {
            tokens.next();
            let from = parse_identifier(tokens, "Expected source river name.")?;
            expect(tokens, &Token::Arrow, "Expected '->' after source river.")?;
            let to = parse_identifier(tokens, "Expected target river name.")?;
            Ok(Statement::Flow { from, to, line })
        },
        Token::Dam => {
            tokens.next();
            parse_dam(tokens)
        },
        Token::Var => {
            tokens.next();
            let name = parse_identifier(tokens, "Expected variable name.")?;
            let value = parse_initializer(tokens)?;
            Ok(Statement::VariableDeclaration { name, value, line })
        },
        Token::Print => {
            tokens.next();
            let expr = parse_expression(tokens)?;
            Ok(Statement::Print { expr, line })
        },
        Token::LBrace => {
            tokens.next();
            parse_block(tokens, errors, line)
        },
        _ => {
            let expr = parse_expression(tokens)?;
            Ok(Statement::Expression { expr, line })
        },
    }
}

/// Parses the rest of `river NAME [= expr]`.
///
/// # Parameters
/// - `tokens`: Token stream positioned after `river`.
/// - `line`: Line number of the `river` keyword.
fn parse_river<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a SourceToken>
{
    let name = parse_identifier(tokens, "Expected river name after 'river'.")?;
    let flow_rate = parse_initializer(tokens)?;

    Ok(Statement::River { name,
                          flow_rate,
                          line })
}

/// Parses the rest of `combine NAME = NAME (+ NAME)*`.
///
/// Only river names may be combined; `combine C = A + 2` is a syntax error.
fn parse_combine<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a SourceToken>
{
    let name = parse_identifier(tokens, "Expected river name after 'combine'.")?;
    expect(tokens, &Token::Equals, "Expected '=' after river name.")?;

    let mut sources = vec![parse_identifier(tokens, "Expected source river name.")?];
    while check(tokens, &Token::Plus) {
        tokens.next();
        sources.push(parse_identifier(tokens, "Expected source river name after '+'.")?);
    }

    Ok(Statement::Combine { name,
                            sources,
                            line })
}

/// Parses the rest of `dam NAME (open | close | adjust expr)`.
///
/// The statement takes the line of its mode keyword.
fn parse_dam<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a SourceToken>
{
    let river = parse_identifier(tokens, "Expected river name after 'dam'.")?;

    let Some(mode_token) =
        tokens.next_if(|t| matches!(t.token, Token::Open | Token::Close | Token::Adjust))
    else {
        return Err(error_at(tokens.peek().copied(),
                            "Expected 'open', 'close' or 'adjust' after river name."));
    };

    let mode = match mode_token.token {
        Token::Open => DamMode::Open,
        Token::Close => DamMode::Close,
        _ => DamMode::Adjust(parse_expression(tokens)?),
    };

    Ok(Statement::Dam { river,
                        mode,
                        line: mode_token.line })
}

/// Parses an optional `= expr` suffix.
fn parse_initializer<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Option<Expr>>
    where I: Iterator<Item = &'a SourceToken>
{
    if check(tokens, &Token::Equals) {
        tokens.next();
        return parse_expression(tokens).map(Some);
    }
    Ok(None)
}
