use crate::{
    ast::{Expr, UnaryOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::Value,
    },
};

impl Context<'_> {
    pub(crate) fn eval_unary_op(&mut self,
                                op: UnaryOperator,
                                expr: &Expr,
                                line: usize)
                                -> EvalResult<Value> {
        let value = self.eval(expr)?;
        eval_unary(op, &value, line)
    }
}

/// Evaluates a unary operation on a value.
///
/// Supported operators:
/// - `Negate`: numeric negation. Any other operand is a type error.
/// - `Not`: negated truthiness. Never fails.
///
/// # Parameters
/// - `op`: Unary operator.
/// - `value`: Input value.
/// - `line`: Line number for error reporting.
///
/// # Example
/// ```
/// use wflow::{
///     ast::UnaryOperator,
///     interpreter::{evaluator::unary::eval_unary, value::Value},
/// };
///
/// let v = eval_unary(UnaryOperator::Negate, &Value::Number(5.0), 1).unwrap();
/// assert_eq!(v, Value::Number(-5.0));
///
/// // `0` is truthy.
/// let v = eval_unary(UnaryOperator::Not, &Value::Number(0.0), 1).unwrap();
/// assert_eq!(v, Value::Bool(false));
///
/// let v = eval_unary(UnaryOperator::Not, &Value::Nil, 1).unwrap();
/// assert_eq!(v, Value::Bool(true));
/// ```
pub fn eval_unary(op: UnaryOperator, value: &Value, line: usize) -> EvalResult<Value> {
    match op {
        UnaryOperator::Negate => match value {
            Value::Number(n) => Ok(Value::Number(-n)),
            _ => Err(RuntimeError::TypeError { operator: op.to_string(),
                                               details: "Operand must be a number.".to_string(),
                                               line }),
        },
        UnaryOperator::Not => Ok(Value::Bool(!value.is_truthy())),
    }
}
