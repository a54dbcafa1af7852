use crate::{
    ast::{BinaryOperator, Expr, LogicalOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::Value,
    },
};

impl Context<'_> {
    /// Evaluates both operands left to right, then applies the operator.
    pub(crate) fn eval_binary_op(&mut self,
                                 left: &Expr,
                                 op: BinaryOperator,
                                 right: &Expr,
                                 line: usize)
                                 -> EvalResult<Value> {
        let left = self.eval(left)?;
        let right = self.eval(right)?;
        eval_binary(op, &left, &right, line)
    }

    /// Evaluates `and` / `or`.
    ///
    /// The right operand is only evaluated when the left one does not decide
    /// the result. The deciding operand itself is returned, not a boolean.
    pub(crate) fn eval_logical(&mut self,
                               left: &Expr,
                               op: LogicalOperator,
                               right: &Expr)
                               -> EvalResult<Value> {
        let left = self.eval(left)?;
        let decided = match op {
            LogicalOperator::Or => left.is_truthy(),
            LogicalOperator::And => !left.is_truthy(),
        };
        if decided { Ok(left) } else { self.eval(right) }
    }
}

/// Evaluates a binary operation between two values.
///
/// Arithmetic and comparisons require two numbers. `+` also concatenates two
/// strings. `==` and `!=` accept any pair of values and never fail.
///
/// # Parameters
/// - `op`: The operator.
/// - `left`: Left operand.
/// - `right`: Right operand.
/// - `line`: Line number for error reporting.
///
/// # Returns
/// An `EvalResult<Value>` containing the evaluated result.
///
/// # Example
/// ```
/// use wflow::{
///     ast::BinaryOperator,
///     interpreter::{evaluator::binary::eval_binary, value::Value},
/// };
///
/// let sum = eval_binary(BinaryOperator::Add, &Value::Number(3.0), &Value::Number(4.0), 1);
/// assert_eq!(sum.unwrap(), Value::Number(7.0));
///
/// let joined = eval_binary(BinaryOperator::Add, &"Rhi".into(), &"ne".into(), 1);
/// assert_eq!(joined.unwrap(), Value::Str("Rhine".to_string()));
///
/// let mixed = eval_binary(BinaryOperator::Add, &Value::Number(1.0), &"a".into(), 1);
/// assert!(mixed.is_err());
/// ```
pub fn eval_binary(op: BinaryOperator,
                   left: &Value,
                   right: &Value,
                   line: usize)
                   -> EvalResult<Value> {
    use BinaryOperator::{
        Add, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Sub,
    };

    match op {
        Equal => Ok(Value::Bool(left.is_equal(right))),
        NotEqual => Ok(Value::Bool(!left.is_equal(right))),
        Add => match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}"))),
            _ => Err(RuntimeError::TypeError { operator: op.to_string(),
                                               details:  "Operands must be two numbers or two strings.".to_string(),
                                               line }),
        },
        Sub => numeric_operands(op, left, right, line).map(|(a, b)| Value::Number(a - b)),
        Mul => numeric_operands(op, left, right, line).map(|(a, b)| Value::Number(a * b)),
        Div => numeric_operands(op, left, right, line).map(|(a, b)| Value::Number(a / b)),
        Less => numeric_operands(op, left, right, line).map(|(a, b)| Value::Bool(a < b)),
        Greater => numeric_operands(op, left, right, line).map(|(a, b)| Value::Bool(a > b)),
        LessEqual => numeric_operands(op, left, right, line).map(|(a, b)| Value::Bool(a <= b)),
        GreaterEqual => {
            numeric_operands(op, left, right, line).map(|(a, b)| Value::Bool(a >= b))
        },
    }
}

/// Extracts two numeric operands or reports a type error naming `op`.
fn numeric_operands(op: BinaryOperator,
                    left: &Value,
                    right: &Value,
                    line: usize)
                    -> EvalResult<(f64, f64)> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(RuntimeError::TypeError { operator: op.to_string(),
                                           details: "Operands must be numbers.".to_string(),
                                           line }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_requires_numbers() {
        let err = eval_binary(BinaryOperator::Less, &Value::Nil, &Value::Number(1.0), 3).unwrap_err();

        assert_eq!(err.to_string(), "Operands must be numbers.\n[line 3]");
    }

    #[test]
    fn nil_equals_only_nil() {
        let eq = |a: &Value, b: &Value| eval_binary(BinaryOperator::Equal, a, b, 1).unwrap();

        assert_eq!(eq(&Value::Nil, &Value::Nil), Value::Bool(true));
        assert_eq!(eq(&Value::Nil, &Value::Bool(false)), Value::Bool(false));
        assert_eq!(eq(&Value::Number(0.0), &Value::Nil), Value::Bool(false));
    }

    #[test]
    fn concatenation_needs_two_strings() {
        let err = eval_binary(BinaryOperator::Add, &"a".into(), &Value::Number(1.0), 7).unwrap_err();

        assert!(matches!(err, RuntimeError::TypeError { ref operator, line: 7, .. } if operator == "+"));
        assert_eq!(err.to_string(), "Operands must be two numbers or two strings.\n[line 7]");
    }

    #[test]
    fn division_by_zero_is_infinite() {
        let v = eval_binary(BinaryOperator::Div, &Value::Number(1.0), &Value::Number(0.0), 1).unwrap();

        assert_eq!(v.to_string(), "Infinity");
    }
}
