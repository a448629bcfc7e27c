use std::fmt::Write;

use ws_ir::expr::{BinOp, Expr};
use ws_ir::stmt::Stmt;
use ws_isa::symbols;
use ws_isa::{OpcodeFlags, lookup_function};

/// Render statements as script text: two-space indentation, no trailing
/// newline.
pub fn emit_script(stmts: &[Stmt]) -> String {
    let mut out = String::new();
    emit_stmts(&mut out, stmts, 0);
    let len = out.trim_end_matches('\n').len();
    out.truncate(len);
    out
}

fn emit_stmts(out: &mut String, stmts: &[Stmt], indent: usize) {
    for stmt in stmts {
        emit_stmt(out, stmt, indent);
    }
}

fn emit_stmt(out: &mut String, stmt: &Stmt, indent: usize) {
    let pad = "  ".repeat(indent);
    match stmt {
        Stmt::Expr(e) => {
            let _ = writeln!(out, "{pad}{}", emit_expr(e));
        }
        Stmt::If { cond, then_body } => {
            let _ = writeln!(out, "{pad}if {} then", emit_expr(cond));
            emit_stmts(out, then_body, indent + 1);
            let _ = writeln!(out, "{pad}end");
        }
        Stmt::Goto(label) => {
            let _ = writeln!(out, "{pad}goto {label}");
        }
        Stmt::Label(label) => {
            let _ = writeln!(out, "{pad}::{label}::");
        }
        Stmt::Assign { target, value } => {
            let _ = writeln!(out, "{pad}{} = {}", emit_expr(target), emit_expr(value));
        }
        Stmt::Return => {
            let _ = writeln!(out, "{pad}return");
        }
        Stmt::Block(body) => emit_stmts(out, body, indent),
    }
}

/// What a literal stands for in its position.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Symbolic {
    Plain,
    Field,
    Entity,
}

pub fn emit_expr(expr: &Expr) -> String {
    emit_expr_as(expr, Symbolic::Plain)
}

fn emit_expr_as(expr: &Expr, symbolic: Symbolic) -> String {
    match expr {
        Expr::Literal(lit) => {
            let name = u16::try_from(lit.value).ok().and_then(|id| match symbolic {
                Symbolic::Plain => None,
                Symbolic::Field => symbols::defined_field(id).map(|n| format!("Fields.{n}")),
                Symbolic::Entity => symbols::defined_entity(id).map(|n| format!("Entities.{n}")),
            });
            name.unwrap_or_else(|| lit.to_string())
        }
        Expr::Ident(name) => name.clone(),
        Expr::Member { object, property } => {
            format!("{}.{property}", emit_operand(object))
        }
        Expr::Index { base, index } => {
            format!("{}[{}]", emit_operand(base), emit_expr(index))
        }
        Expr::Call { callee, args } => {
            let path = callee.as_path();
            let a: Vec<String> = args
                .iter()
                .enumerate()
                .map(|(i, arg)| emit_expr_as(arg, argument_kind(path, i)))
                .collect();
            format!("{}({})", emit_operand(callee), a.join(", "))
        }
        Expr::Binary { op, lhs, rhs } => {
            let l = emit_expr_paren(lhs, *op, false);
            let r = match rhs.as_ref() {
                Expr::Literal(_) if *op == BinOp::Eq && compares_entity_register(lhs) => {
                    emit_expr_as(rhs, Symbolic::Entity)
                }
                _ => emit_expr_paren(rhs, *op, true),
            };
            format!("{l} {op} {r}")
        }
        Expr::Unary { op, expr } => match expr.as_ref() {
            // `--` would start a comment
            Expr::Binary { .. } | Expr::Unary { .. } => format!("{op}({})", emit_expr(expr)),
            _ => format!("{op}{}", emit_expr(expr)),
        },
    }
}

/// Operand of a binary operator, parenthesized when the tree would not
/// re-parse the same way without it.
fn emit_expr_paren(expr: &Expr, parent: BinOp, is_right: bool) -> String {
    let s = emit_expr(expr);
    match expr {
        Expr::Binary { op, .. }
            if op.precedence() < parent.precedence()
                || (is_right && op.precedence() == parent.precedence()) =>
        {
            format!("({s})")
        }
        _ => s,
    }
}

/// Object of a member access, index or call.
fn emit_operand(expr: &Expr) -> String {
    let s = emit_expr(expr);
    match expr {
        Expr::Binary { .. } | Expr::Unary { .. } => format!("({s})"),
        _ => s,
    }
}

fn argument_kind(path: Option<(&str, &str)>, index: usize) -> Symbolic {
    let Some((namespace, name)) = path else {
        return Symbolic::Plain;
    };
    match (namespace, name, index) {
        ("System", "enter_field", 0) => Symbolic::Field,
        ("System", "call_function", 1) => Symbolic::Entity,
        _ => match lookup_function(namespace, name) {
            Some(def) if def.flags.contains(OpcodeFlags::MODEL_ARG) => Symbolic::Entity,
            _ => Symbolic::Plain,
        },
    }
}

fn compares_entity_register(lhs: &Expr) -> bool {
    lhs.as_path()
        .is_some_and(|(ns, register)| ns == "Special" && symbols::is_entity_register(register))
}
