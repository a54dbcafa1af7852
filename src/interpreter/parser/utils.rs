use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{SourceToken, Token},
        parser::core::ParseResult,
    },
};

/// Builds a syntax error pointing at `token`.
///
/// At end of input (or on the `Eof` token) the error reads "at end"; a line
/// break is shown as `\n`.
///
/// # Parameters
/// - `token`: The offending token, if any is left.
/// - `message`: What the parser expected instead.
pub(in crate::interpreter::parser) fn error_at(token: Option<&SourceToken>,
                                              message: &str)
                                              -> ParseError {
    let (lexeme, line) = match token {
        Some(SourceToken { token: Token::Eof,
                           line,
                           .. }) => (None, *line),
        Some(SourceToken { token: Token::NewLine,
                           line,
                           .. }) => (Some("\\n".to_string()), *line),
        Some(SourceToken { lexeme, line, .. }) => (Some(lexeme.clone()), *line),
        None => (None, 0),
    };
    ParseError::UnexpectedToken { lexeme,
                                  message: message.to_string(),
                                  line }
}

/// Returns `true` if the next token is `expected`, without consuming it.
pub(in crate::interpreter::parser) fn check<'a, I>(tokens: &mut Peekable<I>, expected: &Token) -> bool
    where I: Iterator<Item = &'a SourceToken>
{
    tokens.peek().is_some_and(|t| &t.token == expected)
}

/// Returns `true` once only `Eof` (or nothing) is left.
pub(in crate::interpreter::parser) fn at_end<'a, I>(tokens: &mut Peekable<I>) -> bool
    where I: Iterator<Item = &'a SourceToken>
{
    tokens.peek().is_none_or(|t| t.token == Token::Eof)
}

/// Consumes the next token if it is `expected`, or fails with `message`.
///
/// A mismatching token is left in the stream for error recovery.
///
/// # Returns
/// The consumed token.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    expected: &Token,
                                                    message: &str)
                                                    -> ParseResult<&'a SourceToken>
    where I: Iterator<Item = &'a SourceToken>
{
    match tokens.next_if(|t| &t.token == expected) {
        Some(token) => Ok(token),
        None => Err(error_at(tokens.peek().copied(), message)),
    }
}

/// Parses a plain identifier and returns its name.
///
/// Keywords are never identifiers, so `river river` is rejected here.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at an identifier.
/// - `message`: Error message if the next token is not an identifier.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>,
                                                              message: &str)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a SourceToken>
{
    let next = tokens.peek().copied();
    match next {
        Some(SourceToken { token: Token::Identifier(name),
                           .. }) => {
            tokens.next();
            Ok(name.clone())
        },
        other => Err(error_at(other, message)),
    }
}

/// Skips line breaks and `;` between statements.
pub(in crate::interpreter::parser) fn skip_terminators<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a SourceToken>
{
    while tokens.next_if(|t| matches!(t.token, Token::NewLine | Token::Semicolon))
                .is_some()
    {}
}

/// Checks that a statement ends here.
///
/// A line break or `;` is consumed. A closing `}` or the end of input also
/// ends a statement but stays in the stream for the enclosing parser.
pub(in crate::interpreter::parser) fn expect_statement_end<'a, I>(tokens: &mut Peekable<I>)
                                                                  -> ParseResult<()>
    where I: Iterator<Item = &'a SourceToken>
{
    let next = tokens.peek().copied();
    match next {
        Some(SourceToken { token: Token::NewLine | Token::Semicolon,
                           .. }) => {
            tokens.next();
            Ok(())
        },
        Some(SourceToken { token: Token::RBrace | Token::Eof,
                           .. })
        | None => Ok(()),
        other => Err(error_at(other, "Expected end of statement.")),
    }
}

/// Discards tokens after a syntax error until a likely statement boundary.
///
/// Skipping stops just past a line break or `;`, or just before a statement
/// keyword. Inside a block it also stops before `}` so that the block can
/// still be closed. Otherwise at least one token is consumed unless the input
/// is exhausted.
///
/// # Parameters
/// - `tokens`: Token stream positioned at the offending token.
/// - `in_block`: Whether the failed statement sits inside braces.
pub(in crate::interpreter::parser) fn synchronize<'a, I>(tokens: &mut Peekable<I>, in_block: bool)
    where I: Iterator<Item = &'a SourceToken>
{
    while let Some(current) = tokens.peek() {
        match current.token {
            Token::Eof => return,
            Token::RBrace if in_block => return,
            _ => {},
        }

        if let Some(skipped) = tokens.next()
           && matches!(skipped.token, Token::NewLine | Token::Semicolon)
        {
            return;
        }

        if tokens.peek().is_some_and(|next| next.token.starts_statement()) {
            return;
        }
    }
}
