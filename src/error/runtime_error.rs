#[derive(Debug, Clone, PartialEq)]
/// Represents all errors that can occur while a simulated day is evaluated.
pub enum RuntimeError {
    /// A name is neither bound in any enclosing scope nor a known river.
    UndefinedVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An operand had the wrong kind for its operator or context.
    TypeError {
        /// The operator or construct that rejected the operand.
        operator: String,
        /// Details about the type mismatch.
        details:  String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A dam was given a negative (or otherwise invalid) pass-through factor.
    InvalidDamFactor {
        /// The river whose dam was being set.
        river:  String,
        /// The rejected factor.
        factor: f64,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// Writing simulation output failed.
    Io {
        /// Details reported by the output sink.
        details: String,
        /// The source line where the error occurred, `0` outside statements.
        line:    usize,
    },
}

impl RuntimeError {
    /// Gets the line number from `self`.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UndefinedVariable { line, .. }
            | Self::TypeError { line, .. }
            | Self::InvalidDamFactor { line, .. }
            | Self::Io { line, .. } => *line,
        }
    }

    /// Wraps a failed write to the output sink.
    #[must_use]
    pub fn io(error: &std::io::Error, line: usize) -> Self {
        Self::Io { details: error.to_string(),
                   line }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UndefinedVariable { name, line } => {
                write!(f, "Undefined variable '{name}'.\n[line {line}]")
            },
            Self::TypeError { details, line, .. } => write!(f, "{details}\n[line {line}]"),
            Self::InvalidDamFactor { factor, line, .. } if factor.is_nan() => {
                write!(f, "Dam factor must be a number.\n[line {line}]")
            },
            Self::InvalidDamFactor { line, .. } => {
                write!(f, "Dam factor cannot be negative.\n[line {line}]")
            },
            Self::Io { details, line } => {
                write!(f, "Failed to write output: {details}\n[line {line}]")
            },
        }
    }
}

impl std::error::Error for RuntimeError {}
