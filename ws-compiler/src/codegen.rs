//! Lowers statements to pre-layout emissions.
//!
//! Expressions compile post-order: operands first, then the operator or
//! function opcode. Memory references resolve through the symbol tables to
//! one `PUSH_<BANK>_<WIDTH>` instruction. `if` becomes its condition, a
//! `GOTO_IF_FALSE` to a fresh `__end_if_<n>` label, the body and the label.

use ws_ir::{Emission, Expr, Operand, Stmt};
use ws_isa::symbols::{entity_id, field_id, savemap_address, special_id};
use ws_isa::{
    Bank, Granularity, Opcode, OpcodeDef, OpcodeKind, PushKind, call_function, lookup_function,
    lookup_kind,
};

use crate::error::{CompileError, Result};

/// What a value-producing reference pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Push {
    Constant(u16),
    Memory(Bank, Granularity, u16),
}

pub fn generate(stmts: &[Stmt]) -> Result<Vec<Emission>> {
    let mut codegen = Codegen::new();
    for stmt in stmts {
        codegen.generate_stmt(stmt)?;
    }
    Ok(codegen.finish())
}

/// Code generation state for one compile call.
#[derive(Debug, Default)]
pub struct Codegen {
    out: Vec<Emission>,
    next_if: usize,
}

impl Codegen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Vec<Emission> {
        self.out
    }

    fn emit(&mut self, emission: Emission) {
        log::trace!("emit {emission:?}");
        self.out.push(emission);
    }

    fn emit_kind(&mut self, kind: OpcodeKind, operands: Vec<Operand>) -> Result<()> {
        let opcode =
            lookup_kind(kind).ok_or_else(|| CompileError::UnknownFunction(format!("{kind:?}")))?;
        self.emit(Emission::insn(opcode, operands));
        Ok(())
    }

    fn end_if_label(&mut self) -> String {
        let label = format!("__end_if_{}", self.next_if);
        self.next_if += 1;
        label
    }

    pub fn generate_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::If { cond, then_body } => {
                let end = self.end_if_label();
                self.generate_expr(cond)?;
                self.emit_kind(OpcodeKind::GotoIfFalse, vec![Operand::Label(end.clone())])?;
                for stmt in then_body {
                    self.generate_stmt(stmt)?;
                }
                self.emit(Emission::Label(end));
            }
            Stmt::Goto(label) => {
                self.emit_kind(OpcodeKind::Goto, vec![Operand::Label(label.clone())])?;
            }
            Stmt::Label(label) => self.emit(Emission::Label(label.clone())),
            Stmt::Return => self.emit_kind(OpcodeKind::Return, Vec::new())?,
            Stmt::Assign { target, value } => {
                self.generate_expr(target)?;
                self.generate_expr(value)?;
                self.emit_kind(OpcodeKind::Write, Vec::new())?;
            }
            Stmt::Expr(expr) => self.generate_call_stmt(expr)?,
            Stmt::Block(stmts) => {
                for stmt in stmts {
                    self.generate_stmt(stmt)?;
                }
            }
        }
        Ok(())
    }

    fn generate_call_stmt(&mut self, expr: &Expr) -> Result<()> {
        let (namespace, name, args) = expr
            .as_path_call()
            .ok_or_else(|| CompileError::NotAStatement(describe(expr)))?;

        match (namespace, name) {
            ("System", "call_function") => {
                let [id, entity] = args else {
                    return Err(argument_count("System.call_function", 2, args.len()));
                };
                let id = id
                    .as_literal()
                    .ok_or_else(|| CompileError::ExpectedLiteral("System.call_function".into()))?;
                let opcode = u16::try_from(id)
                    .ok()
                    .and_then(call_function)
                    .ok_or(CompileError::LiteralOutOfRange(id))?;
                self.generate_expr(entity)?;
                self.emit(Emission::bare(opcode));
            }
            ("Memory", "write") => {
                let [target, value] = args else {
                    return Err(argument_count("Memory.write", 2, args.len()));
                };
                self.generate_expr(target)?;
                self.generate_expr(value)?;
                self.emit_kind(OpcodeKind::Write, Vec::new())?;
            }
            ("System", "wait") => {
                let [frames] = args else {
                    return Err(argument_count("System.wait", 1, args.len()));
                };
                self.generate_expr(frames)?;
                for function in ["wait_frames", "wait"] {
                    let def = function_def("System", function)?;
                    self.emit(Emission::bare(Opcode::Def(def)));
                }
            }
            _ => {
                let def = function_def(namespace, name)?;
                if def.pushes_result() {
                    return Err(CompileError::DiscardedValue(format!("{namespace}.{name}")));
                }
                self.generate_call(def, args)?;
            }
        }
        Ok(())
    }

    fn generate_expr(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Literal(lit) => self.emit_push(Push::Constant(word(lit.value)?), expr),
            Expr::Ident(name) => Err(CompileError::NotAValue(name.clone())),
            Expr::Member { object, property } => {
                let push = member_push(object, property, expr)?;
                self.emit_push(push, expr)
            }
            Expr::Index { base, index } => {
                let push = bit_index_push(base, index, expr)?;
                self.emit_push(push, expr)
            }
            Expr::Call { .. } => self.generate_call_expr(expr),
            Expr::Binary { op, lhs, rhs } => {
                let math = op
                    .math_op()
                    .ok_or_else(|| CompileError::UnsupportedOperator(op.to_string()))?;
                self.generate_expr(lhs)?;
                self.generate_expr(rhs)?;
                self.emit_kind(OpcodeKind::Math(math), Vec::new())
            }
            Expr::Unary { op, expr } => {
                self.generate_expr(expr)?;
                self.emit_kind(OpcodeKind::Math(op.math_op()), Vec::new())
            }
        }
    }

    fn generate_call_expr(&mut self, expr: &Expr) -> Result<()> {
        let (namespace, name, args) = expr
            .as_path_call()
            .ok_or_else(|| CompileError::UnknownFunction(describe(expr)))?;

        if let (Some(bank), Some(granularity)) =
            (Bank::from_name(namespace), Granularity::from_name(name))
        {
            let push = memory_call_push(bank, granularity, args, expr)?;
            return self.emit_push(push, expr);
        }

        let def = function_def(namespace, name)?;
        if !def.pushes_result() {
            return Err(CompileError::NotAValue(format!("{namespace}.{name}")));
        }
        self.generate_call(def, args)
    }

    fn generate_call(&mut self, def: &'static OpcodeDef, args: &[Expr]) -> Result<()> {
        let expected = def.stack_params as usize;
        if args.len() != expected {
            return Err(argument_count(
                &format!("{}.{}", def.namespace, def.name),
                expected,
                args.len(),
            ));
        }
        for arg in args {
            self.generate_expr(arg)?;
        }
        self.emit(Emission::bare(Opcode::Def(def)));
        Ok(())
    }

    fn emit_push(&mut self, push: Push, expr: &Expr) -> Result<()> {
        let (kind, operand) = match push {
            Push::Constant(value) => (PushKind::Constant, value),
            Push::Memory(bank, granularity, operand) => {
                (PushKind::Memory(bank, granularity), operand)
            }
        };
        let opcode = lookup_kind(OpcodeKind::Push(kind))
            .ok_or_else(|| CompileError::UnknownSymbol(describe(expr)))?;
        self.emit(Emission::insn(opcode, vec![Operand::Value(operand)]));
        Ok(())
    }
}

fn function_def(namespace: &str, name: &str) -> Result<&'static OpcodeDef> {
    lookup_function(namespace, name)
        .ok_or_else(|| CompileError::UnknownFunction(format!("{namespace}.{name}")))
}

fn argument_count(function: &str, expected: usize, found: usize) -> CompileError {
    CompileError::ArgumentCount {
        function: function.to_string(),
        expected,
        found,
    }
}

fn word(value: u32) -> Result<u16> {
    u16::try_from(value).map_err(|_| CompileError::LiteralOutOfRange(value))
}

fn literal_arg(arg: &Expr, call: &Expr) -> Result<u32> {
    arg.as_literal()
        .ok_or_else(|| CompileError::ExpectedLiteral(describe(call)))
}

/// Bank operand for an absolute address.
fn bank_offset(bank: Bank, address: u32) -> Result<u16> {
    address
        .checked_sub(bank.base())
        .and_then(|offset| u16::try_from(offset).ok())
        .ok_or(CompileError::OffsetOutOfRange {
            bank: bank.namespace().name(),
            address,
        })
}

/// Bit operand: the bank offset of the byte times eight plus the bit.
fn bit_operand(bank: Bank, address: u32, bit: u32) -> Result<u16> {
    if bit > 7 {
        return Err(CompileError::BitOutOfRange(bit));
    }
    address
        .checked_sub(bank.base())
        .and_then(|offset| offset.checked_mul(8))
        .and_then(|value| u16::try_from(value + bit).ok())
        .ok_or(CompileError::OffsetOutOfRange {
            bank: bank.namespace().name(),
            address,
        })
}

/// `Bank[address].width`, `Special[id].bit` and the named forms
/// `Savemap.x`, `Special.x`, `Entities.x`, `Fields.x`.
fn member_push(object: &Expr, property: &str, expr: &Expr) -> Result<Push> {
    let unknown = || CompileError::UnknownSymbol(describe(expr));

    if let Expr::Index { base, index } = object {
        let (Expr::Ident(bank), Some(address)) = (base.as_ref(), index.as_literal()) else {
            return Err(unknown());
        };
        let bank = Bank::from_name(bank).ok_or_else(unknown)?;
        let granularity = Granularity::from_name(property).ok_or_else(unknown)?;
        return match (bank, granularity) {
            (Bank::Special, Granularity::Bit) => {
                Ok(Push::Memory(bank, granularity, word(address)?))
            }
            // Savemap and Temp bits need an index: `Savemap[a].bit[n]`.
            (_, Granularity::Bit) => Err(unknown()),
            _ => Ok(Push::Memory(bank, granularity, bank_offset(bank, address)?)),
        };
    }

    let Expr::Ident(namespace) = object else {
        return Err(unknown());
    };
    let push = match namespace.as_str() {
        "Savemap" => match savemap_address(property) {
            Some((address, granularity)) => Some(Push::Memory(
                Bank::Savemap,
                granularity,
                bank_offset(Bank::Savemap, address)?,
            )),
            None => None,
        },
        "Special" => special_id(property).map(|(id, g)| Push::Memory(Bank::Special, g, id)),
        "Entities" => entity_id(property).map(Push::Constant),
        "Fields" => field_id(property).map(Push::Constant),
        _ => None,
    };
    push.ok_or_else(unknown)
}

/// `Bank[address].bit[n]` and `Savemap.<byte name>.bit[n]`.
fn bit_index_push(base: &Expr, index: &Expr, expr: &Expr) -> Result<Push> {
    let unknown = || CompileError::UnknownSymbol(describe(expr));

    let Expr::Member { object, property } = base else {
        return Err(unknown());
    };
    if property != "bit" {
        return Err(unknown());
    }
    let bit = index.as_literal().ok_or_else(unknown)?;

    let (bank, address) = match object.as_ref() {
        Expr::Index { base, index } => match (base.as_ref(), index.as_literal()) {
            (Expr::Ident(bank), Some(address)) => {
                (Bank::from_name(bank).ok_or_else(unknown)?, address)
            }
            _ => return Err(unknown()),
        },
        named => match named.as_path() {
            Some(("Savemap", name)) => match savemap_address(name) {
                Some((address, Granularity::Byte)) => (Bank::Savemap, address),
                _ => return Err(unknown()),
            },
            _ => return Err(unknown()),
        },
    };
    Ok(Push::Memory(bank, Granularity::Bit, bit_operand(bank, address, bit)?))
}

/// Call forms `Bank.byte(address)`, `Bank.word(address)` and
/// `Bank.bit(address, bit)`; arguments must be literals.
fn memory_call_push(
    bank: Bank,
    granularity: Granularity,
    args: &[Expr],
    call: &Expr,
) -> Result<Push> {
    let function = || format!("{}.{}", bank.namespace(), granularity);
    let operand = match (granularity, args) {
        (Granularity::Bit, [address, bit]) => {
            bit_operand(bank, literal_arg(address, call)?, literal_arg(bit, call)?)?
        }
        (Granularity::Bit, _) => return Err(argument_count(&function(), 2, args.len())),
        (_, [address]) => bank_offset(bank, literal_arg(address, call)?)?,
        _ => return Err(argument_count(&function(), 1, args.len())),
    };
    Ok(Push::Memory(bank, granularity, operand))
}

/// Short source-like rendering of `expr` for error messages.
fn describe(expr: &Expr) -> String {
    match expr {
        Expr::Literal(lit) => lit.to_string(),
        Expr::Ident(name) => name.clone(),
        Expr::Member { object, property } => format!("{}.{property}", describe(object)),
        Expr::Index { base, index } => format!("{}[{}]", describe(base), describe(index)),
        Expr::Call { callee, .. } => format!("{}(...)", describe(callee)),
        Expr::Binary { op, .. } => format!("`{op}` expression"),
        Expr::Unary { op, .. } => format!("`{op}` expression"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ws_ir::{BinOp, UnOp};
    use ws_isa::{lookup, op};

    fn lower(expr: Expr) -> Result<Vec<Emission>> {
        let mut codegen = Codegen::new();
        codegen.generate_expr(&expr)?;
        Ok(codegen.finish())
    }

    fn push(code: u16, operand: u16) -> Emission {
        Emission::insn(lookup(code).unwrap(), vec![Operand::Value(operand)])
    }

    fn bare(code: u16) -> Emission {
        Emission::bare(lookup(code).unwrap())
    }

    #[test]
    fn memory_references() {
        let cases = [
            (Expr::path("Savemap", "game_progress"), push(op::PUSH_SAVEMAP_WORD, 0)),
            (
                Expr::ident("Savemap").index(Expr::hex(0xC22)).member("byte"),
                push(op::PUSH_SAVEMAP_BYTE, 0x7E),
            ),
            (
                Expr::ident("Savemap").index(Expr::hex(0xF29)).member("bit").index(Expr::num(6)),
                push(op::PUSH_SAVEMAP_BIT, 0x1C2E),
            ),
            (
                Expr::path("Savemap", "chocobos_on_map").member("bit").index(Expr::num(1)),
                push(op::PUSH_SAVEMAP_BIT, 0x7E * 8 + 1),
            ),
            (
                Expr::ident("Temp").index(Expr::num(3)).member("word"),
                push(op::PUSH_TEMP_WORD, 3),
            ),
            (Expr::path("Special", "entity_direction"), push(op::PUSH_SPECIAL_BYTE, 4)),
            (Expr::path("Special", "battle_result"), push(op::PUSH_SPECIAL_BIT, 11)),
            (Expr::path("Special", "unknown_0f"), push(op::PUSH_SPECIAL_BYTE, 15)),
            (
                Expr::ident("Special").index(Expr::hex(4)).member("word"),
                push(op::PUSH_SPECIAL_WORD, 4),
            ),
            (
                Expr::ident("Special").index(Expr::hex(0x12)).member("bit"),
                push(op::PUSH_SPECIAL_BIT, 0x12),
            ),
            (Expr::path("Entities", "highwind"), push(op::PUSH_CONSTANT, 3)),
            (Expr::path("Fields", "highwind_bridge_5"), push(op::PUSH_CONSTANT, 52)),
        ];
        for (expr, expected) in cases {
            assert_eq!(lower(expr.clone()).unwrap(), [expected], "{expr:?}");
        }
    }

    #[test]
    fn memory_call_forms() {
        let call = |ns, name, args| Expr::call(Expr::path(ns, name), args);
        assert_eq!(
            lower(call("Temp", "word", vec![Expr::num(1)])).unwrap(),
            [push(op::PUSH_TEMP_WORD, 1)]
        );
        assert_eq!(
            lower(call("Savemap", "byte", vec![Expr::hex(0xBA5)])).unwrap(),
            [push(op::PUSH_SAVEMAP_BYTE, 1)]
        );
        assert_eq!(
            lower(call("Savemap", "bit", vec![Expr::hex(0xF29), Expr::num(3)])).unwrap(),
            [push(op::PUSH_SAVEMAP_BIT, 0x1C2B)]
        );
        assert_eq!(
            lower(call("Temp", "bit", vec![Expr::num(0), Expr::num(1)])).unwrap_err(),
            CompileError::UnknownSymbol("Temp.bit(...)".into())
        );
        assert_eq!(
            lower(call("Temp", "byte", vec![Expr::ident("x")])).unwrap_err(),
            CompileError::ExpectedLiteral("Temp.byte(...)".into())
        );
    }

    #[test]
    fn operators_are_post_order() {
        let expr = Expr::binary(
            BinOp::Mul,
            Expr::unary(UnOp::Neg, Expr::num(1)),
            Expr::binary(BinOp::Add, Expr::num(2), Expr::num(3)),
        );
        assert_eq!(
            lower(expr).unwrap(),
            [
                push(op::PUSH_CONSTANT, 1),
                bare(op::NEG),
                push(op::PUSH_CONSTANT, 2),
                push(op::PUSH_CONSTANT, 3),
                bare(op::ADD),
                bare(op::MUL),
            ]
        );
    }

    #[test]
    fn missing_operators() {
        for op in [BinOp::Div, BinOp::Ne] {
            let err = lower(Expr::binary(op, Expr::num(1), Expr::num(2))).unwrap_err();
            assert_eq!(err, CompileError::UnsupportedOperator(op.to_string()));
        }
    }

    #[test]
    fn bad_references() {
        let cases = [
            Expr::path("Savemap", "no_such_flag"),
            Expr::path("Special", "unknown_04"),
            Expr::path("Entities", "nobody"),
            Expr::ident("Temp").index(Expr::num(0)).member("bit").index(Expr::num(1)),
            Expr::ident("Savemap").index(Expr::hex(0xC22)).member("bit"),
            Expr::ident("Bank").index(Expr::num(0)).member("byte"),
            Expr::path("Savemap", "game_progress").member("bit").index(Expr::num(0)),
        ];
        for expr in cases {
            assert!(
                matches!(lower(expr.clone()), Err(CompileError::UnknownSymbol(_))),
                "{expr:?}"
            );
        }
    }

    #[test]
    fn range_checks() {
        let bit = |n| {
            Expr::ident("Savemap")
                .index(Expr::hex(0xF29))
                .member("bit")
                .index(Expr::num(n))
        };
        assert_eq!(lower(bit(8)).unwrap_err(), CompileError::BitOutOfRange(8));
        assert_eq!(
            lower(Expr::ident("Savemap").index(Expr::hex(0x100)).member("byte")).unwrap_err(),
            CompileError::OffsetOutOfRange {
                bank: "Savemap",
                address: 0x100
            }
        );
        assert_eq!(
            lower(Expr::num(0x10000)).unwrap_err(),
            CompileError::LiteralOutOfRange(0x10000)
        );
    }

    #[test]
    fn value_and_statement_positions() {
        let stop = Expr::call(Expr::path("Entity", "stop"), vec![]);
        assert_eq!(
            lower(stop).unwrap_err(),
            CompileError::NotAValue("Entity.stop".into())
        );
        assert_eq!(
            lower(Expr::ident("Savemap")).unwrap_err(),
            CompileError::NotAValue("Savemap".into())
        );

        let mut codegen = Codegen::new();
        let dist = Stmt::call("Entity", "distance_to_point", vec![Expr::num(1)]);
        assert_eq!(
            codegen.generate_stmt(&dist).unwrap_err(),
            CompileError::DiscardedValue("Entity.distance_to_point".into())
        );
        assert_eq!(
            codegen.generate_stmt(&Stmt::Expr(Expr::num(1))).unwrap_err(),
            CompileError::NotAStatement("1".into())
        );
        assert_eq!(
            codegen
                .generate_stmt(&Stmt::call("Entity", "warp", vec![]))
                .unwrap_err(),
            CompileError::UnknownFunction("Entity.warp".into())
        );
        assert_eq!(
            codegen
                .generate_stmt(&Stmt::call("System", "enter_field", vec![Expr::num(1)]))
                .unwrap_err(),
            CompileError::ArgumentCount {
                function: "System.enter_field".into(),
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn call_function_takes_id_first() {
        let stmt = Stmt::call(
            "System",
            "call_function",
            vec![Expr::num(20), Expr::path("Entities", "highwind")],
        );
        let out = generate(&[stmt]).unwrap();
        assert_eq!(
            out,
            [push(op::PUSH_CONSTANT, 3), Emission::bare(call_function(20).unwrap())]
        );

        let stmt = Stmt::call("System", "call_function", vec![Expr::num(0x100), Expr::num(0)]);
        assert_eq!(
            generate(&[stmt]).unwrap_err(),
            CompileError::LiteralOutOfRange(0x100)
        );
    }

    #[test]
    fn if_labels_are_unique() {
        let body = |n| Stmt::If {
            cond: Expr::num(n),
            then_body: vec![Stmt::Return],
        };
        let out = generate(&[body(1), body(2)]).unwrap();
        let labels: Vec<&str> = out
            .iter()
            .filter_map(|e| match e {
                Emission::Label(name) => Some(name.as_str()),
                Emission::Insn { .. } => None,
            })
            .collect();
        assert_eq!(labels, ["__end_if_0", "__end_if_1"]);
    }
}
