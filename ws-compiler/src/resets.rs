use ws_ir::{Expr, Stmt};
use ws_isa::lookup_function;

const RESET_NAMESPACE: &str = "System";
const RESET_FUNCTION: &str = "reset_stack";

/// Insert a stack reset ahead of every statement that starts a new
/// expression sequence: each `if`, each assignment, and each call that pops
/// arguments. `if` bodies are handled recursively; blocks are flattened.
pub fn add_resets(stmts: Vec<Stmt>) -> Vec<Stmt> {
    let mut out = Vec::with_capacity(stmts.len() * 2);
    for stmt in stmts {
        match stmt {
            Stmt::If { cond, then_body } => {
                out.push(reset());
                out.push(Stmt::If {
                    cond,
                    then_body: add_resets(then_body),
                });
            }
            Stmt::Assign { .. } => {
                out.push(reset());
                out.push(stmt);
            }
            Stmt::Expr(ref expr) if pops_arguments(expr) => {
                out.push(reset());
                out.push(stmt);
            }
            Stmt::Block(inner) => out.extend(add_resets(inner)),
            other => out.push(other),
        }
    }
    out
}

fn reset() -> Stmt {
    Stmt::call(RESET_NAMESPACE, RESET_FUNCTION, Vec::new())
}

fn pops_arguments(expr: &Expr) -> bool {
    match expr.as_path_call() {
        Some(("System", "call_function", _)) | Some(("Memory", "write", _)) => true,
        Some((namespace, name, _)) => {
            lookup_function(namespace, name).is_some_and(|def| def.stack_params > 0)
        }
        None => false,
    }
}
