use crate::{
    ast::LiteralValue,
    error::RuntimeError,
    interpreter::evaluator::core::EvalResult,
};

/// Represents a runtime value in the interpreter.
///
/// This enum models all the values that variables, expressions and `print`
/// statements can carry. River flows always evaluate to `Number`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A numeric value (double precision floating-point).
    Number(f64),
    /// A string value.
    Str(String),
    /// A boolean value, produced by comparisons, `!` and literals.
    Bool(bool),
    /// The absent value. Uninitialized variables hold `nil`.
    Nil,
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<&LiteralValue> for Value {
    fn from(value: &LiteralValue) -> Self {
        match value {
            LiteralValue::Number(n) => Self::Number(*n),
            LiteralValue::Str(s) => Self::Str(s.clone()),
            LiteralValue::Bool(b) => Self::Bool(*b),
            LiteralValue::Nil => Self::Nil,
        }
    }
}

impl Value {
    /// Converts the value to an `f64`, or returns an error if not numeric.
    ///
    /// # Parameters
    /// - `context`: The operator or construct requiring a number, used in the
    ///   error.
    /// - `line`: Source code line number for error reporting.
    ///
    /// # Example
    /// ```
    /// use wflow::interpreter::value::Value;
    ///
    /// assert_eq!(Value::Number(2.5).as_number("river", 1).unwrap(), 2.5);
    /// assert!(Value::Nil.as_number("river", 1).is_err());
    /// ```
    pub fn as_number(&self, context: &str, line: usize) -> EvalResult<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            _ => Err(RuntimeError::TypeError { operator: context.to_string(),
                                               details:  "Expected number.".to_string(),
                                               line }),
        }
    }

    /// Returns the truthiness of the value.
    ///
    /// `nil` and `false` are falsy; everything else, including `0` and the
    /// empty string, is truthy.
    #[must_use]
    pub const fn is_truthy(&self) -> bool {
        !matches!(self, Self::Nil | Self::Bool(false))
    }

    /// Compares two values for equality by value.
    ///
    /// Values of different kinds are never equal, so `nil` equals only `nil`.
    #[must_use]
    pub fn is_equal(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            _ => false,
        }
    }
}

/// Stringifies a value the way `print` shows it.
///
/// Whole numbers drop their fractional part, so `10.0` prints as `10`.
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) if n.is_infinite() && n.is_sign_positive() => write!(f, "Infinity"),
            Self::Number(n) if n.is_infinite() => write!(f, "-Infinity"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Nil => write!(f, "nil"),
        }
    }
}
