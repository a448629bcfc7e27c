use std::fmt;

use ws_isa::MathOp;

/// How a numeric literal was written, so printing keeps `0x` addresses hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Radix {
    #[default]
    Decimal,
    Hex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal {
    pub value: u32,
    pub radix: Radix,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.radix {
            Radix::Decimal => write!(f, "{}", self.value),
            Radix::Hex => write!(f, "0x{:X}", self.value),
        }
    }
}

/// Expression tree nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(Literal),
    /// A bare name: a namespace (`Savemap`) or a label-like identifier.
    Ident(String),
    /// Property access: `object.property`
    Member { object: Box<Expr>, property: String },
    /// Indexed access: `base[index]`
    Index { base: Box<Expr>, index: Box<Expr> },
    /// Call: `callee(args...)`
    Call { callee: Box<Expr>, args: Vec<Expr> },
    /// Binary operation: `lhs op rhs`
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Unary operation: `op expr`
    Unary { op: UnOp, expr: Box<Expr> },
}

impl Expr {
    pub fn num(value: u32) -> Self {
        Expr::Literal(Literal {
            value,
            radix: Radix::Decimal,
        })
    }

    pub fn hex(value: u32) -> Self {
        Expr::Literal(Literal {
            value,
            radix: Radix::Hex,
        })
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    /// `namespace.name`, the callee shape of every opcode call.
    pub fn path(namespace: &str, name: &str) -> Self {
        Expr::ident(namespace).member(name)
    }

    pub fn member(self, property: impl Into<String>) -> Self {
        Expr::Member {
            object: Box::new(self),
            property: property.into(),
        }
    }

    pub fn index(self, index: Expr) -> Self {
        Expr::Index {
            base: Box::new(self),
            index: Box::new(index),
        }
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn unary(op: UnOp, expr: Expr) -> Self {
        Expr::Unary {
            op,
            expr: Box::new(expr),
        }
    }

    /// `(namespace, name)` when this is `Ident.Ident`.
    pub fn as_path(&self) -> Option<(&str, &str)> {
        match self {
            Expr::Member { object, property } => match object.as_ref() {
                Expr::Ident(ns) => Some((ns.as_str(), property.as_str())),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<u32> {
        match self {
            Expr::Literal(lit) => Some(lit.value),
            _ => None,
        }
    }

    /// Callee path and arguments of a `Namespace.name(args)` call.
    pub fn as_path_call(&self) -> Option<(&str, &str, &[Expr])> {
        match self {
            Expr::Call { callee, args } => {
                let (ns, name) = callee.as_path()?;
                Some((ns, name, args.as_slice()))
            }
            _ => None,
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    BitAnd,
    BitOr,
    Shl,
    Shr,
    And,
    Or,
}

impl BinOp {
    /// Binding strength; higher binds tighter. All levels are left-associative.
    pub const fn precedence(self) -> u8 {
        match self {
            BinOp::Or => 1,
            BinOp::And => 2,
            BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge | BinOp::Eq | BinOp::Ne => 3,
            BinOp::BitOr => 4,
            BinOp::BitAnd => 5,
            BinOp::Shl | BinOp::Shr => 6,
            BinOp::Add | BinOp::Sub => 7,
            BinOp::Mul | BinOp::Div => 8,
        }
    }

    /// The opcode operation, if the VM has one (`/` and `!=` do not).
    pub const fn math_op(self) -> Option<MathOp> {
        match self {
            BinOp::Add => Some(MathOp::Add),
            BinOp::Sub => Some(MathOp::Sub),
            BinOp::Mul => Some(MathOp::Mul),
            BinOp::Lt => Some(MathOp::Lt),
            BinOp::Gt => Some(MathOp::Gt),
            BinOp::Le => Some(MathOp::Le),
            BinOp::Ge => Some(MathOp::Ge),
            BinOp::Eq => Some(MathOp::Eq),
            BinOp::BitAnd => Some(MathOp::And),
            BinOp::BitOr => Some(MathOp::Or),
            BinOp::Shl => Some(MathOp::Shl),
            BinOp::Shr => Some(MathOp::Shr),
            BinOp::And => Some(MathOp::LogicalAnd),
            BinOp::Or => Some(MathOp::LogicalOr),
            BinOp::Div | BinOp::Ne => None,
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

impl UnOp {
    pub const fn math_op(self) -> MathOp {
        match self {
            UnOp::Neg => MathOp::Neg,
            UnOp::Not => MathOp::Not,
        }
    }
}

/// The source operator an arithmetic opcode decompiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Unary(UnOp),
    Binary(BinOp),
}

impl From<MathOp> for Operator {
    fn from(op: MathOp) -> Self {
        match op {
            MathOp::Neg => Operator::Unary(UnOp::Neg),
            MathOp::Not => Operator::Unary(UnOp::Not),
            MathOp::Mul => Operator::Binary(BinOp::Mul),
            MathOp::Add => Operator::Binary(BinOp::Add),
            MathOp::Sub => Operator::Binary(BinOp::Sub),
            MathOp::Shl => Operator::Binary(BinOp::Shl),
            MathOp::Shr => Operator::Binary(BinOp::Shr),
            MathOp::Lt => Operator::Binary(BinOp::Lt),
            MathOp::Gt => Operator::Binary(BinOp::Gt),
            MathOp::Le => Operator::Binary(BinOp::Le),
            MathOp::Ge => Operator::Binary(BinOp::Ge),
            MathOp::Eq => Operator::Binary(BinOp::Eq),
            MathOp::And => Operator::Binary(BinOp::BitAnd),
            MathOp::Or => Operator::Binary(BinOp::BitOr),
            MathOp::LogicalAnd => Operator::Binary(BinOp::And),
            MathOp::LogicalOr => Operator::Binary(BinOp::Or),
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::And => "and",
            BinOp::Or => "or",
        };
        f.write_str(s)
    }
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnOp::Neg => "-",
            UnOp::Not => "!",
        };
        f.write_str(s)
    }
}
