use std::io::Write;

use crate::{
    ast::{Expr, Statement},
    error::RuntimeError,
    interpreter::{environment::Environment, river::RiverRegistry, value::Value},
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Stores the runtime state of one simulated day.
///
/// ## Usage
///
/// A `Context` is created for every day and dropped at its end. It owns the
/// day's variable scopes and borrows the river registry, which outlives it and
/// carries reservoir levels into the next day. Everything `print` and
/// `output` produce is written to `out`.
pub struct Context<'a> {
    environment: Environment,
    rivers:      &'a mut RiverRegistry,
    rainfall:    f64,
    out:         &'a mut dyn Write,
}

impl<'a> Context<'a> {
    /// Prepares a day for evaluation.
    ///
    /// Resets the transient fields of every known river and binds `rainfall`
    /// and `day` in the root scope.
    ///
    /// # Parameters
    /// - `rivers`: The registry shared by all days of the run.
    /// - `rainfall`: The day's rainfall.
    /// - `day`: The 1-based index of the day.
    /// - `out`: Sink for program output.
    ///
    /// # Example
    /// ```
    /// use wflow::interpreter::{evaluator::core::Context, river::RiverRegistry};
    ///
    /// let mut rivers = RiverRegistry::new();
    /// let mut out = Vec::new();
    /// let mut context = Context::new(&mut rivers, 5.0, 1, &mut out);
    ///
    /// let source = wflow::parse_program("river A\nprint day + rainfall").unwrap();
    /// context.execute(&source).unwrap();
    ///
    /// assert_eq!(String::from_utf8(out).unwrap(), "6\n");
    /// assert_eq!(rivers.get("A").unwrap().intrinsic_flow(), 5.0);
    /// ```
    pub fn new(rivers: &'a mut RiverRegistry,
               rainfall: f64,
               day: u32,
               out: &'a mut dyn Write)
               -> Self {
        rivers.start_day();

        let mut environment = Environment::new();
        environment.define("rainfall", Value::Number(rainfall));
        environment.define("day", Value::Number(f64::from(day)));

        Self { environment,
               rivers,
               rainfall,
               out }
    }

    /// The day's rainfall.
    #[must_use]
    pub const fn rainfall(&self) -> f64 {
        self.rainfall
    }

    /// The variable scopes of the day.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Read access to the shared river registry.
    #[must_use]
    pub fn rivers(&self) -> &RiverRegistry {
        self.rivers
    }

    /// Executes statements in order, stopping at the first runtime error.
    ///
    /// # Parameters
    /// - `statements`: The statements to execute.
    pub fn execute(&mut self, statements: &[Statement]) -> EvalResult<()> {
        for statement in statements {
            self.eval_statement(statement)?;
        }
        Ok(())
    }

    /// Evaluates a single statement.
    ///
    /// River statements are handled in the `river` module; the remaining ones
    /// manage variables, scopes and printing.
    ///
    /// # Parameters
    /// - `statement`: Statement to evaluate.
    pub fn eval_statement(&mut self, statement: &Statement) -> EvalResult<()> {
        match statement {
            Statement::Block { statements, .. } => {
                self.with_scope(|context| context.execute(statements))
            },
            Statement::Expression { expr, .. } => {
                self.eval(expr)?;
                Ok(())
            },
            Statement::Print { expr, line } => {
                let value = self.eval(expr)?;
                self.emit(format_args!("{value}"), *line)
            },
            Statement::VariableDeclaration { name, value, .. } => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Nil,
                };
                self.environment.define(name, value);
                Ok(())
            },
            Statement::River { name,
                               flow_rate,
                               line, } => self.eval_river(name, flow_rate.as_ref(), *line),
            Statement::Output { river, line } => self.eval_output(river, *line),
            Statement::Combine { name,
                                 sources,
                                 .. } => {
                self.eval_combine(name, sources);
                Ok(())
            },
            Statement::Flow { from, to, .. } => {
                self.eval_flow(from, to);
                Ok(())
            },
            Statement::Dam { river, mode, line } => self.eval_dam(river, mode, *line),
        }
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation.
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(Value::from(value)),
            Expr::Variable { name, line } => self.eval_variable(name, *line),
            Expr::Grouping { expr, .. } => self.eval(expr),
            Expr::UnaryOp { op, expr, line } => self.eval_unary_op(*op, expr, *line),
            Expr::BinaryOp { left,
                             op,
                             right,
                             line, } => self.eval_binary_op(left, *op, right, *line),
            Expr::Logical { left, op, right, .. } => self.eval_logical(left, *op, right),
        }
    }

    /// Resolves a name.
    ///
    /// A known river evaluates to its current flow, even where a variable of
    /// the same name is in scope. Anything else is looked up in the scope
    /// chain.
    fn eval_variable(&self, name: &str, line: usize) -> EvalResult<Value> {
        if let Some(river) = self.rivers.get(name) {
            return Ok(Value::Number(river.current_flow()));
        }
        self.environment.get(name, line).cloned()
    }

    /// Runs `f` inside a fresh child scope.
    ///
    /// The scope is popped whether `f` succeeds or fails.
    pub(crate) fn with_scope<T>(&mut self,
                                f: impl FnOnce(&mut Self) -> EvalResult<T>)
                                -> EvalResult<T> {
        self.environment.push_scope();
        let result = f(self);
        self.environment.pop_scope();
        result
    }

    /// Defines a variable in the innermost scope.
    pub(crate) fn define(&mut self, name: &str, value: Value) {
        self.environment.define(name, value);
    }

    /// Writes one line of program output.
    pub(crate) fn emit(&mut self, text: std::fmt::Arguments<'_>, line: usize) -> EvalResult<()> {
        writeln!(self.out, "{text}").map_err(|e| RuntimeError::io(&e, line))
    }

    pub(crate) fn rivers_mut(&mut self) -> &mut RiverRegistry {
        self.rivers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_program;

    fn run_day(source: &str, rivers: &mut RiverRegistry) -> (EvalResult<()>, String) {
        let program = parse_program(source).expect("test program should parse");
        let mut out = Vec::new();
        let result = Context::new(rivers, 5.0, 1, &mut out).execute(&program);
        (result, String::from_utf8(out).expect("output is utf-8"))
    }

    #[test]
    fn block_scope_is_restored_after_error() {
        let mut rivers = RiverRegistry::new();
        let program = parse_program("var x = 1\n{ var x = 2\n print missing }").unwrap();
        let mut out = Vec::new();
        let mut context = Context::new(&mut rivers, 1.0, 1, &mut out);

        assert!(context.execute(&program).is_err());
        assert_eq!(context.environment().depth(), 1);
        assert_eq!(context.environment().lookup("x"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn river_flow_shadows_variable() {
        let mut rivers = RiverRegistry::new();
        let (result, out) = run_day("var A = 99\nriver A = 3\nprint A", &mut rivers);

        assert!(result.is_ok());
        assert_eq!(out, "3\n");
    }

    #[test]
    fn error_stops_remaining_statements() {
        let mut rivers = RiverRegistry::new();
        let (result, out) = run_day("print 1\nprint z\nprint 2", &mut rivers);

        assert!(matches!(result, Err(RuntimeError::UndefinedVariable { ref name, line: 2 }) if name == "z"));
        assert_eq!(out, "1\n");
    }

    #[test]
    fn new_day_resets_transient_fields() {
        let mut rivers = RiverRegistry::new();
        let (result, _) = run_day("river A = 4\nflow A -> B\ndam B close", &mut rivers);
        assert!(result.is_ok());

        let mut out = Vec::new();
        drop(Context::new(&mut rivers, 2.0, 2, &mut out));
        let b = rivers.get("B").unwrap();

        assert_eq!(b.intrinsic_flow(), 0.0);
        assert_eq!(b.incoming_flow(), 0.0);
        assert_eq!(b.dam_factor(), 1.0);
        assert_eq!(b.dam_level(), 9.0);
    }
}
