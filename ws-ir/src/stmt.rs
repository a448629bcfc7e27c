use crate::expr::Expr;

/// Statement nodes. `If` is the only nesting construct; there is no `else`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// Expression statement, always a call in well-formed scripts.
    Expr(Expr),
    If { cond: Expr, then_body: Vec<Stmt> },
    Goto(String),
    /// `::name::`
    Label(String),
    /// `target = value`
    Assign { target: Expr, value: Expr },
    Return,
    /// Statements that share one position, e.g. a label and the statement
    /// at its offset. Printed flattened.
    Block(Vec<Stmt>),
}

impl Stmt {
    /// Expression statement calling `namespace.name(args)`.
    pub fn call(namespace: &str, name: &str, args: Vec<Expr>) -> Self {
        Stmt::Expr(Expr::call(Expr::path(namespace, name), args))
    }
}
