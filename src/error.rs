/// Lexing and parsing errors.
///
/// Defines every error that can be raised before evaluation starts: stray
/// characters, unterminated strings and unexpected tokens. These are collected
/// during the single lex/parse pass rather than aborting it.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised while a simulated day is being
/// evaluated. Any of them aborts the remaining statements of the day and stops
/// the simulation.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Failure of a complete program run.
///
/// The two phases fail differently: parsing reports every error it found in
/// one pass, evaluation stops at the first one.
#[derive(Debug)]
pub enum Error {
    /// The source contained lexical or syntax errors; nothing was evaluated.
    Parse(Vec<ParseError>),
    /// A runtime error aborted the simulation.
    Runtime(RuntimeError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(errors) => {
                for (i, error) in errors.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{error}")?;
                }
                Ok(())
            },
            Self::Runtime(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<Vec<ParseError>> for Error {
    fn from(errors: Vec<ParseError>) -> Self {
        Self::Parse(errors)
    }
}

impl From<RuntimeError> for Error {
    fn from(error: RuntimeError) -> Self {
        Self::Runtime(error)
    }
}
