#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur during lexing or parsing.
pub enum ParseError {
    /// The lexer met a character that starts no token.
    UnexpectedCharacter {
        /// The offending source text.
        character: String,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// A string literal was opened but never closed.
    UnterminatedString {
        /// The line on which the string starts.
        line: usize,
    },
    /// A block comment was opened but never closed.
    UnterminatedComment {
        /// The line on which the comment starts.
        line: usize,
    },
    /// Found an unexpected token while parsing.
    UnexpectedToken {
        /// The lexeme of the offending token, or `None` at end of input.
        lexeme:  Option<String>,
        /// What the parser expected instead.
        message: String,
        /// The source line where the error occurred.
        line:    usize,
    },
}

impl ParseError {
    /// Gets the line number from `self`.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnexpectedCharacter { line, .. }
            | Self::UnterminatedString { line }
            | Self::UnterminatedComment { line }
            | Self::UnexpectedToken { line, .. } => *line,
        }
    }

    /// Returns `true` for errors raised by the lexer.
    #[must_use]
    pub const fn is_lexical(&self) -> bool {
        matches!(self,
                 Self::UnexpectedCharacter { .. }
                 | Self::UnterminatedString { .. }
                 | Self::UnterminatedComment { .. })
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedCharacter { character, line } => {
                write!(f, "[line {line}] Error: Unexpected character '{character}'.")
            },
            Self::UnterminatedString { line } => {
                write!(f, "[line {line}] Error: Unterminated string.")
            },
            Self::UnterminatedComment { line } => {
                write!(f, "[line {line}] Error: Unterminated comment.")
            },
            Self::UnexpectedToken { lexeme: Some(lexeme),
                                    message,
                                    line, } => {
                write!(f, "[line {line}] Error at '{lexeme}': {message}")
            },
            Self::UnexpectedToken { lexeme: None,
                                    message,
                                    line, } => {
                write!(f, "[line {line}] Error at end: {message}")
            },
        }
    }
}

impl std::error::Error for ParseError {}
