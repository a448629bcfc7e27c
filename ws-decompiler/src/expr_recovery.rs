//! Stack simulation: turns straight-line instructions into expressions and
//! statements.

use ws_ir::expr::{Expr, Operator};
use ws_ir::stmt::Stmt;
use ws_isa::symbols::{self, SAVEMAP_BASE};
use ws_isa::{Bank, Granularity, Instruction, Namespace, Opcode, OpcodeKind, PushKind, op};

use crate::error::{DecompileError, Result};

/// The simulated evaluation stack.
#[derive(Debug, Default)]
pub struct ExprStack {
    values: Vec<Expr>,
}

impl ExprStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, expr: Expr) {
        self.values.push(expr);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn top(&self) -> Option<&Expr> {
        self.values.last()
    }

    /// Pop `n` values, returned in push order.
    pub fn pop_n(&mut self, n: usize, line: usize, opcode: &Opcode) -> Result<Vec<Expr>> {
        if self.values.len() < n {
            return Err(self.underflow(n, line, opcode));
        }
        Ok(self.values.split_off(self.values.len() - n))
    }

    pub fn pop(&mut self, line: usize, opcode: &Opcode) -> Result<Expr> {
        match self.values.pop() {
            Some(expr) => Ok(expr),
            None => Err(self.underflow(1, line, opcode)),
        }
    }

    /// Pop two values as `[lhs, rhs]`.
    pub fn pop_pair(&mut self, line: usize, opcode: &Opcode) -> Result<[Expr; 2]> {
        let pair = self.pop_n(2, line, opcode)?;
        pair.try_into().map_err(|_: Vec<Expr>| self.underflow(2, line, opcode))
    }

    fn underflow(&self, needed: usize, line: usize, opcode: &Opcode) -> DecompileError {
        DecompileError::StackUnderflow {
            line,
            mnemonic: opcode.mnemonic().into_owned(),
            needed,
            found: self.values.len(),
        }
    }

    /// Drop everything; returns what was discarded.
    pub fn clear(&mut self) -> Vec<Expr> {
        std::mem::take(&mut self.values)
    }

    pub fn into_vec(self) -> Vec<Expr> {
        self.values
    }
}

/// Simulate one non-branching instruction. Statements it completes are
/// appended to `out`; values it produces stay on `stack`.
pub fn recover_insn(
    insn: &Instruction,
    line: usize,
    stack: &mut ExprStack,
    out: &mut Vec<Stmt>,
) -> Result<()> {
    let opcode = &insn.opcode;
    let def = opcode.def();

    match def.kind {
        OpcodeKind::Nop => {}
        OpcodeKind::Reset => {
            let dropped = stack.clear();
            if !dropped.is_empty() {
                log::warn!("line {line}: RESET discards {} stack values", dropped.len());
            }
        }
        OpcodeKind::Push(kind) => {
            let operand = insn.operands.first().copied().unwrap_or_default();
            stack.push(push_expression(kind, operand));
        }
        OpcodeKind::Math(math) => {
            let expr = match Operator::from(math) {
                Operator::Unary(op) => Expr::unary(op, stack.pop(line, opcode)?),
                Operator::Binary(op) => {
                    let [lhs, rhs] = stack.pop_pair(line, opcode)?;
                    Expr::binary(op, lhs, rhs)
                }
            };
            stack.push(expr);
        }
        OpcodeKind::Write => {
            let value = stack.pop(line, opcode)?;
            let target = stack.pop(line, opcode)?;
            out.push(Stmt::Assign { target, value });
        }
        OpcodeKind::CallFunction => {
            let entity = stack.pop(line, opcode)?;
            let id = u32::from(opcode.code() - op::CALL_FN_BASE);
            out.push(Stmt::call("System", "call_function", vec![Expr::num(id), entity]));
        }
        OpcodeKind::Return => out.push(Stmt::Return),
        OpcodeKind::Generic if def.code == op::WAIT && is_wait_frames(stack.top()) => {
            let args = match stack.pop(line, opcode)? {
                Expr::Call { args, .. } => args,
                other => vec![other],
            };
            out.push(Stmt::call("System", "wait", args));
        }
        OpcodeKind::Generic => {
            let args = stack.pop_n(def.stack_params as usize, line, opcode)?;
            let call = Expr::call(Expr::path(def.namespace.name(), def.name), args);
            if def.pushes_result() {
                stack.push(call);
            } else {
                out.push(Stmt::Expr(call));
            }
        }
        // === Control flow is handled by the structural pass ===
        OpcodeKind::Goto | OpcodeKind::GotoIfFalse => {}
    }

    log::trace!("line {line}: {insn} -> stack depth {}", stack.len());
    Ok(())
}

fn is_wait_frames(top: Option<&Expr>) -> bool {
    top.and_then(Expr::as_path_call)
        .is_some_and(|(ns, name, _)| ns == Namespace::System.name() && name == "wait_frames")
}

/// Source form of a push opcode's operand.
pub fn push_expression(kind: PushKind, operand: u16) -> Expr {
    let value = u32::from(operand);
    match kind {
        PushKind::Constant => Expr::num(value),
        PushKind::Memory(Bank::Savemap, Granularity::Bit) => {
            let address = SAVEMAP_BASE + value / 8;
            let bit = Expr::num(value % 8);
            let byte = match symbols::savemap_name(address, Granularity::Byte) {
                Some(name) => Expr::path("Savemap", name),
                None => Expr::ident("Savemap").index(Expr::hex(address)),
            };
            byte.member("bit").index(bit)
        }
        PushKind::Memory(Bank::Savemap, granularity) => {
            let address = SAVEMAP_BASE + value;
            match symbols::savemap_name(address, granularity) {
                Some(name) => Expr::path("Savemap", name),
                None => Expr::ident("Savemap")
                    .index(Expr::hex(address))
                    .member(granularity.name()),
            }
        }
        PushKind::Memory(Bank::Temp, granularity) => {
            let index = if value < 10 {
                Expr::num(value)
            } else {
                Expr::hex(value)
            };
            Expr::ident("Temp").index(index).member(granularity.name())
        }
        PushKind::Memory(Bank::Special, granularity) => match symbols::special_register(operand) {
            Some((name, g)) if g == granularity => Expr::path("Special", name),
            None if granularity == Granularity::Byte => {
                Expr::path("Special", &symbols::special_placeholder(operand))
            }
            _ => Expr::ident("Special")
                .index(Expr::hex(value))
                .member(granularity.name()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ws_ir::expr::BinOp;
    use ws_isa::lookup;

    fn push(code: u16, operand: u16) -> Instruction {
        Instruction::new(lookup(code).unwrap(), vec![operand])
    }

    fn bare(code: u16) -> Instruction {
        Instruction::new(lookup(code).unwrap(), vec![])
    }

    #[test]
    fn underflow_reports_counts() {
        let mut stack = ExprStack::new();
        stack.push(Expr::num(1));
        let err = recover_insn(&bare(op::ADD), 7, &mut stack, &mut Vec::new()).unwrap_err();
        assert_eq!(
            err,
            DecompileError::StackUnderflow {
                line: 7,
                mnemonic: "ADD".into(),
                needed: 2,
                found: 1
            }
        );
    }

    #[test]
    fn operands_keep_push_order() {
        let mut stack = ExprStack::new();
        let mut out = Vec::new();
        for insn in [push(op::PUSH_CONSTANT, 5), push(op::PUSH_CONSTANT, 3), bare(op::SUB)] {
            recover_insn(&insn, 1, &mut stack, &mut out).unwrap();
        }
        assert_eq!(
            stack.into_vec(),
            [Expr::binary(BinOp::Sub, Expr::num(5), Expr::num(3))]
        );
        assert!(out.is_empty());
    }

    #[test]
    fn reset_clears_the_stack() {
        let mut stack = ExprStack::new();
        let mut out = Vec::new();
        recover_insn(&push(op::PUSH_CONSTANT, 5), 1, &mut stack, &mut out).unwrap();
        recover_insn(&bare(op::RESET), 2, &mut stack, &mut out).unwrap();
        assert!(stack.is_empty());
    }

    #[test]
    fn wait_frames_fold() {
        let mut stack = ExprStack::new();
        let mut out = Vec::new();
        for insn in [push(op::PUSH_CONSTANT, 3), bare(op::WAIT_FRAMES), bare(op::WAIT)] {
            recover_insn(&insn, 1, &mut stack, &mut out).unwrap();
        }
        assert_eq!(out, [Stmt::call("System", "wait", vec![Expr::num(3)])]);
        assert!(stack.is_empty());
    }

    #[test]
    fn unfused_wait_is_a_plain_call() {
        let mut stack = ExprStack::new();
        let mut out = Vec::new();
        for insn in [push(op::PUSH_CONSTANT, 3), bare(op::WAIT)] {
            recover_insn(&insn, 1, &mut stack, &mut out).unwrap();
        }
        assert_eq!(out, [Stmt::call("System", "wait", vec![Expr::num(3)])]);
    }

    #[test]
    fn savemap_pushes() {
        let word = push_expression(PushKind::Memory(Bank::Savemap, Granularity::Word), 0);
        assert_eq!(word, Expr::path("Savemap", "game_progress"));

        // game_progress is a word; the byte view has no name
        let byte = push_expression(PushKind::Memory(Bank::Savemap, Granularity::Byte), 0);
        assert_eq!(byte, Expr::ident("Savemap").index(Expr::hex(0xBA4)).member("byte"));

        let bit = push_expression(PushKind::Memory(Bank::Savemap, Granularity::Bit), 0x1C2E);
        assert_eq!(
            bit,
            Expr::ident("Savemap")
                .index(Expr::hex(0xF29))
                .member("bit")
                .index(Expr::num(6))
        );

        let named_bit = push_expression(PushKind::Memory(Bank::Savemap, Granularity::Bit), 0x1C33);
        assert_eq!(
            named_bit,
            Expr::path("Savemap", "submarine_flags").member("bit").index(Expr::num(3))
        );
    }

    #[test]
    fn temp_index_radix() {
        let low = push_expression(PushKind::Memory(Bank::Temp, Granularity::Byte), 3);
        assert_eq!(low, Expr::ident("Temp").index(Expr::num(3)).member("byte"));
        let high = push_expression(PushKind::Memory(Bank::Temp, Granularity::Word), 0x1A);
        assert_eq!(high, Expr::ident("Temp").index(Expr::hex(0x1A)).member("word"));
    }

    #[test]
    fn special_pushes() {
        let named = push_expression(PushKind::Memory(Bank::Special, Granularity::Byte), 4);
        assert_eq!(named, Expr::path("Special", "entity_direction"));

        let unknown = push_expression(PushKind::Memory(Bank::Special, Granularity::Byte), 0x15);
        assert_eq!(unknown, Expr::path("Special", "unknown_15"));

        // register 4 is a byte register, so a word read stays numeric
        let mismatch = push_expression(PushKind::Memory(Bank::Special, Granularity::Word), 4);
        assert_eq!(mismatch, Expr::ident("Special").index(Expr::hex(4)).member("word"));

        let bit = push_expression(PushKind::Memory(Bank::Special, Granularity::Bit), 11);
        assert_eq!(bit, Expr::path("Special", "battle_result"));
    }
}
