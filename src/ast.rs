use std::fmt;

/// Represents a literal value in the language.
///
/// `LiteralValue` covers the raw constants that can appear directly in source
/// code: numbers, strings, booleans and `nil`.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A 64-bit floating-point literal. All numbers in the language are reals.
    Number(f64),
    /// A string literal, without its quotes.
    Str(String),
    /// A boolean literal value: `true` or `false`.
    Bool(bool),
    /// The absent value, `nil`.
    Nil,
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// An abstract syntax tree (AST) node representing an expression in the
/// language.
///
/// Every variant records the line it came from so that runtime errors can
/// point back into the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (number, string, boolean or `nil`).
    Literal {
        /// The constant value.
        value: LiteralValue,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a variable or river by name.
    Variable {
        /// Name being referenced.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// A parenthesized expression.
    Grouping {
        /// The enclosed expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// A unary operation (negation or logical not).
    UnaryOp {
        /// The unary operator to apply.
        op:   UnaryOperator,
        /// The operand expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// A binary operation (arithmetic, comparison or equality).
    BinaryOp {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number of the operator.
        line:  usize,
    },
    /// A short-circuiting `and` / `or`.
    Logical {
        /// Left operand, always evaluated.
        left:  Box<Self>,
        /// The operator.
        op:    LogicalOperator,
        /// Right operand, evaluated only when the left does not decide.
        right: Box<Self>,
        /// Line number of the operator.
        line:  usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    /// ## Example
    /// ```
    /// use wflow::ast::Expr;
    ///
    /// let expr = Expr::Variable { name: "x".to_string(),
    ///                             line: 5, };
    ///
    /// assert_eq!(expr.line_number(), 5);
    /// ```
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::Variable { line, .. }
            | Self::Grouping { line, .. }
            | Self::UnaryOp { line, .. }
            | Self::BinaryOp { line, .. }
            | Self::Logical { line, .. } => *line,
        }
    }
}

/// How a `dam` statement sets the pass-through factor of a river.
#[derive(Debug, Clone, PartialEq)]
pub enum DamMode {
    /// `open`: everything passes, factor `1.0`.
    Open,
    /// `close`: nothing passes, factor `0.0`.
    Close,
    /// `adjust <expr>`: the factor is computed. The expression sees `inflow`
    /// and `damLevel` bound to the river's current values.
    Adjust(Expr),
}

/// Represents a statement.
///
/// A program is a sequence of statements, executed once per simulated day.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A braced block with its own variable scope.
    Block {
        /// Statements inside the block.
        statements: Vec<Self>,
        /// Line number of the opening brace.
        line:       usize,
    },
    /// A standalone expression evaluated for its side effects.
    Expression {
        /// The expression to evaluate.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// `print <expr>`
    Print {
        /// The expression whose value is printed.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// `var <name> [= <expr>]`
    VariableDeclaration {
        /// The name of the variable.
        name:  String,
        /// The initial value; `nil` when absent.
        value: Option<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `river <name> [= <expr>]`
    River {
        /// The river being declared or updated.
        name:      String,
        /// The intrinsic flow; the day's rainfall when absent.
        flow_rate: Option<Expr>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `output <name>`
    Output {
        /// The river whose flow is reported.
        river: String,
        /// Line number in the source code.
        line:  usize,
    },
    /// `combine <name> = <source> (+ <source>)*`
    Combine {
        /// The river receiving the combined flow.
        name:    String,
        /// The rivers whose flows are summed, in source order.
        sources: Vec<String>,
        /// Line number in the source code.
        line:    usize,
    },
    /// `flow <from> -> <to>`
    Flow {
        /// The river whose current flow is transferred.
        from: String,
        /// The river receiving the transfer.
        to:   String,
        /// Line number in the source code.
        line: usize,
    },
    /// `dam <river> open | close | adjust <expr>`
    Dam {
        /// The dammed river.
        river: String,
        /// How the factor is chosen.
        mode:  DamMode,
        /// Line number of the mode keyword.
        line:  usize,
    },
}

impl Statement {
    /// Gets the line number from `self`.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Block { line, .. }
            | Self::Expression { line, .. }
            | Self::Print { line, .. }
            | Self::VariableDeclaration { line, .. }
            | Self::River { line, .. }
            | Self::Output { line, .. }
            | Self::Combine { line, .. }
            | Self::Flow { line, .. }
            | Self::Dam { line, .. } => *line,
        }
    }
}

/// Represents a binary operator.
///
/// Binary operators include arithmetic, comparisons and equality.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (e.g. `-x`).
    Negate,
    /// Logical NOT (e.g. `!x`).
    Not,
}

/// Represents a short-circuiting logical operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogicalOperator {
    /// `and`
    And,
    /// `or`
    Or,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOperator::{
            Add, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
            NotEqual => "!=",
        };
        write!(f, "{operator}")
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negate => write!(f, "-"),
            Self::Not => write!(f, "!"),
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
        }
    }
}

/// Renders literals the way the debug printer shows them: numbers always
/// carry a fractional part (`10.0`) and `nil` is spelled out.
impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n:?}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Nil => write!(f, "nil"),
        }
    }
}

/// Fully parenthesized rendering of an expression, operator first.
///
/// ## Example
/// ```
/// use wflow::ast::{BinaryOperator, Expr};
///
/// let expr = Expr::BinaryOp { left:  Box::new(Expr::Literal { value: 1.0.into(),
///                                                             line:  1, }),
///                             op:    BinaryOperator::Add,
///                             right: Box::new(Expr::Variable { name: "x".into(),
///                                                              line: 1, }),
///                             line:  1, };
///
/// assert_eq!(expr.to_string(), "(+ 1.0 x)");
/// ```
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value, .. } => write!(f, "{value}"),
            Self::Variable { name, .. } => write!(f, "{name}"),
            Self::Grouping { expr, .. } => write!(f, "(group {expr})"),
            Self::UnaryOp { op, expr, .. } => write!(f, "({op} {expr})"),
            Self::BinaryOp { left, op, right, .. } => write!(f, "({op} {left} {right})"),
            Self::Logical { left, op, right, .. } => write!(f, "({op} {left} {right})"),
        }
    }
}

/// Fully parenthesized rendering of a statement, keyword first.
impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block { statements, .. } => {
                write!(f, "(block")?;
                for statement in statements {
                    write!(f, " {statement}")?;
                }
                write!(f, ")")
            },
            Self::Expression { expr, .. } => write!(f, "(; {expr})"),
            Self::Print { expr, .. } => write!(f, "(print {expr})"),
            Self::VariableDeclaration { name,
                                        value: Some(value),
                                        .. } => write!(f, "(var {name} {value})"),
            Self::VariableDeclaration { name, value: None, .. } => write!(f, "(var {name})"),
            Self::River { name,
                          flow_rate: Some(flow_rate),
                          .. } => write!(f, "(river {name} = {flow_rate})"),
            Self::River { name, flow_rate: None, .. } => write!(f, "(river {name})"),
            Self::Output { river, .. } => write!(f, "(output {river})"),
            Self::Combine { name, sources, .. } => {
                write!(f, "(combine {name} = {})", sources.join(" + "))
            },
            Self::Flow { from, to, .. } => write!(f, "(flow {from} -> {to})"),
            Self::Dam { river, mode, .. } => match mode {
                DamMode::Open => write!(f, "(dam {river} open)"),
                DamMode::Close => write!(f, "(dam {river} close)"),
                DamMode::Adjust(expr) => write!(f, "(dam {river} adjust {expr})"),
            },
        }
    }
}
