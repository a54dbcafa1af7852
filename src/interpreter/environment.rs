use std::collections::HashMap;

use crate::{error::RuntimeError, interpreter::{evaluator::core::EvalResult, value::Value}};

/// Chained name → value bindings.
///
/// The root scope lives as long as the environment; nested scopes are pushed
/// on block entry (and around a dam adjustment) and popped on exit. Lookup
/// walks from the innermost scope outward, so inner definitions shadow outer
/// ones.
#[derive(Debug, Default)]
pub struct Environment {
    globals: HashMap<String, Value>,
    scopes:  Vec<HashMap<String, Value>>,
}

impl Environment {
    /// Creates an environment holding only an empty root scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a variable in the current (innermost) scope.
    ///
    /// Re-declaring a name in the same scope overwrites it.
    ///
    /// # Example
    /// ```
    /// use wflow::interpreter::{environment::Environment, value::Value};
    ///
    /// let mut env = Environment::new();
    /// env.define("x", Value::Number(1.0));
    /// env.define("x", Value::Number(2.0));
    ///
    /// assert_eq!(env.get("x", 1).unwrap(), &Value::Number(2.0));
    /// ```
    pub fn define(&mut self, name: &str, value: Value) {
        self.scopes
            .last_mut()
            .unwrap_or(&mut self.globals)
            .insert(name.to_string(), value);
    }

    /// Retrieves a variable, searching the innermost scope first.
    ///
    /// Returns `None` if no active scope defines the name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .or_else(|| self.globals.get(name))
    }

    /// Retrieves a variable or fails with `UndefinedVariable`.
    ///
    /// # Parameters
    /// - `name`: Variable name.
    /// - `line`: Line number for error reporting.
    pub fn get(&self, name: &str, line: usize) -> EvalResult<&Value> {
        self.lookup(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.to_string(),
                                                             line })
    }

    /// Adds a fresh empty scope on top of the chain.
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Removes the innermost scope. The root scope is never removed.
    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Number of scopes currently active, the root included.
    ///
    /// # Example
    /// ```
    /// use wflow::interpreter::environment::Environment;
    ///
    /// let mut env = Environment::new();
    /// env.push_scope();
    /// assert_eq!(env.depth(), 2);
    ///
    /// env.pop_scope();
    /// env.pop_scope();
    /// assert_eq!(env.depth(), 1);
    /// ```
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len() + 1
    }
}
