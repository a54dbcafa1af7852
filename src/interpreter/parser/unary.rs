use std::iter::Peekable;

use crate::{
    ast::{Expr, LiteralValue, UnaryOperator},
    interpreter::{
        lexer::{SourceToken, Token},
        parser::{
            core::{ParseResult, parse_expression},
            utils::{error_at, expect},
        },
    },
};

/// Parses a unary expression.
///
/// Supports prefix operators:
/// - `-`  (numeric negation)
/// - `!`  (logical not)
///
/// Unary operators are right-associative, so an input like `!-x` is parsed as
/// `!( -x )`.
///
/// Grammar:
/// ```text
///     unary := ("-" | "!") unary
///            | primary
/// ```
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
///
/// # Returns
/// An [`Expr::UnaryOp`] or a primary expression.
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SourceToken>
{
    let Some(operator) = tokens.next_if(|t| matches!(t.token, Token::Minus | Token::Bang)) else {
        return parse_primary(tokens);
    };
    let op = if operator.token == Token::Minus {
        UnaryOperator::Negate
    } else {
        UnaryOperator::Not
    };
    let expr = parse_unary(tokens)?;

    Ok(Expr::UnaryOp { op,
                       expr: Box::new(expr),
                       line: operator.line, })
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions form the base of the expression grammar:
/// - number, string and boolean literals, and `nil`
/// - identifiers, naming a variable or a river
/// - parenthesized expressions
///
/// # Errors
/// `Expected expression.` if the next token starts none of these. The token is
/// not consumed.
fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SourceToken>
{
    let Some(&token) = tokens.peek() else {
        return Err(error_at(None, "Expected expression."));
    };
    let line = token.line;

    let value = match &token.token {
        Token::Number(n) => LiteralValue::Number(*n),
        Token::Str(s) => LiteralValue::Str(s.clone()),
        Token::Bool(b) => LiteralValue::Bool(*b),
        Token::Nil => LiteralValue::Nil,
        Token::Identifier(name) => {
            tokens.next();
            return Ok(Expr::Variable { name: name.clone(),
                                       line });
        },
        Token::LParen => {
            tokens.next();
            return parse_grouping(tokens, line);
        },
        _ => return Err(error_at(Some(token), "Expected expression.")),
    };
    tokens.next();

    Ok(Expr::Literal { value, line })
}

/// Parses the inside of a parenthesized expression.
///
/// Grammar: `grouping := "(" expression ")"`
///
/// # Parameters
/// - `tokens`: Token stream positioned after the opening parenthesis.
/// - `line`: Line number of the opening parenthesis.
fn parse_grouping<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SourceToken>
{
    let expr = parse_expression(tokens)?;
    expect(tokens, &Token::RParen, "Expected ')' after expression.")?;

    Ok(Expr::Grouping { expr: Box::new(expr),
                        line })
}
