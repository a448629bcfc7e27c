//! Shared intermediate forms: the script AST both directions agree on, and
//! the pre-layout emission records the compiler produces.

pub mod emission;
pub mod expr;
pub mod layout;
pub mod stmt;

pub use emission::{Emission, Operand};
pub use expr::{BinOp, Expr, Literal, Operator, Radix, UnOp};
pub use layout::LayoutError;
pub use stmt::Stmt;
