use logos::{FilterResult, Lexer, Logos};

use crate::error::ParseError;

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(error = LexicalError)]
pub enum Token {
    /// Numeric literal tokens, such as `42` or `3.14`.
    #[regex(r"[0-9]+(\.[0-9]+)?", parse_number)]
    Number(f64),
    /// String literal tokens, such as `"Rhine"`. The payload excludes the
    /// quotes. Strings may span several lines.
    #[token("\"", lex_string)]
    Str(String),
    /// Boolean literal tokens, `true` or `false`.
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    Bool(bool),
    /// `nil`
    #[token("nil")]
    Nil,
    /// `river`
    #[token("river")]
    River,
    /// `output`
    #[token("output")]
    Output,
    /// `combine`
    #[token("combine")]
    Combine,
    /// `flow`
    #[token("flow")]
    Flow,
    /// `dam`
    #[token("dam")]
    Dam,
    /// `open`
    #[token("open")]
    Open,
    /// `close`
    #[token("close")]
    Close,
    /// `adjust`
    #[token("adjust")]
    Adjust,
    /// `var`
    #[token("var")]
    Var,
    /// `print`
    #[token("print")]
    Print,
    /// `and`
    #[token("and")]
    And,
    /// `or`
    #[token("or")]
    Or,
    /// Identifier tokens; variable or river names such as `rhine` or `x`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `// Comments.`
    #[token("//", skip_line_comment)]
    Comment,
    /// ```
    /// /* Multi line comments. */
    /// ```
    #[token("/*", skip_block_comment)]
    MultiLineComment,
    /// `->`
    #[token("->")]
    Arrow,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `=`
    #[token("=")]
    Equals,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `!`
    #[token("!")]
    Bang,
    /// Line breaks. They terminate statements.
    #[token("\n")]
    NewLine,
    /// Spaces, tabs and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
    /// End of input. Never produced by logos; [`scan`] appends it.
    Eof,
}

impl Token {
    /// Returns `true` if the token begins one of the keyword statements.
    ///
    /// The parser uses this to find a safe place to resume after a syntax
    /// error.
    #[must_use]
    pub const fn starts_statement(&self) -> bool {
        matches!(self,
                 Self::River
                 | Self::Output
                 | Self::Combine
                 | Self::Flow
                 | Self::Dam
                 | Self::Var
                 | Self::Print)
    }
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting and diagnostics.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

/// Errors raised inside the lexer.
///
/// Logos reports unmatched input with the `Default` variant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LexicalError {
    /// The input does not start any token.
    #[default]
    UnexpectedCharacter,
    /// A `"` was never closed.
    UnterminatedString {
        /// The line on which the string starts.
        line: usize,
    },
    /// A `/*` was never closed.
    UnterminatedComment {
        /// The line on which the comment starts.
        line: usize,
    },
}

/// A token together with the text it was scanned from and its line.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceToken {
    /// The token kind and literal payload.
    pub token:  Token,
    /// The exact source text of the token.
    pub lexeme: String,
    /// The line on which the token starts.
    pub line:   usize,
}

/// The outcome of scanning a complete source text.
#[derive(Debug, Default)]
pub struct Scanned {
    /// All tokens found, always terminated by [`Token::Eof`].
    pub tokens: Vec<SourceToken>,
    /// Every lexical error met along the way.
    pub errors: Vec<ParseError>,
}

/// Converts source text into a token sequence.
///
/// Scanning never stops early: an unrecognized character, an unterminated
/// string or an unclosed comment is recorded as an error and the lexer carries on with the rest of
/// the input, so a single pass reports every lexical problem.
///
/// # Parameters
/// - `source`: The program text.
///
/// # Returns
/// The token sequence (ending in [`Token::Eof`]) and the lexical errors.
///
/// # Example
/// ```
/// use wflow::interpreter::lexer::{Token, scan};
///
/// let scanned = scan("river A = 10\noutput A");
///
/// assert!(scanned.errors.is_empty());
/// assert_eq!(scanned.tokens[0].token, Token::River);
/// assert_eq!(scanned.tokens[3].token, Token::Number(10.0));
/// assert_eq!(scanned.tokens[5].line, 2);
/// assert_eq!(scanned.tokens.last().map(|t| &t.token), Some(&Token::Eof));
/// ```
#[must_use]
pub fn scan(source: &str) -> Scanned {
    let mut scanned = Scanned::default();
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: 1 });

    while let Some(result) = lexer.next() {
        let line = lexer.extras.line;
        let lexeme = lexer.slice();

        match result {
            Ok(token) => {
                let is_newline = token == Token::NewLine;
                scanned.tokens.push(SourceToken { token,
                                                  lexeme: lexeme.to_string(),
                                                  line });
                if is_newline {
                    lexer.extras.line += 1;
                } else {
                    lexer.extras.line += count_newlines(lexeme);
                }
            },
            Err(LexicalError::UnexpectedCharacter) => {
                scanned.errors
                       .push(ParseError::UnexpectedCharacter { character: lexeme.to_string(),
                                                               line });
            },
            Err(LexicalError::UnterminatedString { line }) => {
                scanned.errors.push(ParseError::UnterminatedString { line });
                lexer.extras.line += count_newlines(lexeme);
            },
            Err(LexicalError::UnterminatedComment { line }) => {
                scanned.errors.push(ParseError::UnterminatedComment { line });
                lexer.extras.line += count_newlines(lexeme);
            },
        }
    }

    tracing::trace!(tokens = scanned.tokens.len(),
                    errors = scanned.errors.len(),
                    "scanned source");

    scanned.tokens.push(SourceToken { token:  Token::Eof,
                                      lexeme: String::new(),
                                      line:   lexer.extras.line, });
    scanned
}

fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}

/// Parses a numeric literal from the current token slice.
///
/// # Returns
/// - `Some(f64)`: The parsed value.
/// - `None`: If the slice is not a valid number.
fn parse_number(lex: &Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Reads a string literal after its opening quote.
///
/// The closing quote is consumed as part of the token. Line counting is left
/// to [`scan`], which sees the whole lexeme.
fn lex_string(lex: &mut Lexer<Token>) -> Result<String, LexicalError> {
    let remainder = lex.remainder();
    if let Some(end) = remainder.find('"') {
        let text = remainder[..end].to_string();
        lex.bump(end + 1);
        Ok(text)
    } else {
        lex.bump(remainder.len());
        Err(LexicalError::UnterminatedString { line: lex.extras.line })
    }
}

/// Skips a `//` comment up to, but not including, the line break.
fn skip_line_comment(lex: &mut Lexer<Token>) -> logos::Skip {
    let remainder = lex.remainder();
    let end = remainder.find('\n').unwrap_or(remainder.len());
    lex.bump(end);
    logos::Skip
}

/// Skips a `/* ... */` comment, counting the lines it spans.
///
/// An unclosed comment swallows the rest of the input and is reported on the
/// line where it opens.
fn skip_block_comment(lex: &mut Lexer<Token>) -> FilterResult<(), LexicalError> {
    let remainder = lex.remainder();
    if let Some(end) = remainder.find("*/") {
        lex.extras.line += count_newlines(&remainder[..end]);
        lex.bump(end + 2);
        FilterResult::Skip
    } else {
        lex.bump(remainder.len());
        FilterResult::Error(LexicalError::UnterminatedComment { line: lex.extras.line })
    }
}
