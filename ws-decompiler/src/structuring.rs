use ws_ir::expr::Expr;
use ws_ir::stmt::Stmt;
use ws_isa::OpcodeKind;

use crate::decode::Program;
use crate::error::{DecompileError, Result};
use crate::expr_recovery::{ExprStack, recover_insn};

/// Structured statements plus whatever the simulated stack still held at
/// the end. A well-formed function leaves `residual_stack` empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decompiled {
    pub stmts: Vec<Stmt>,
    pub residual_stack: Vec<Expr>,
}

/// Name of the label placed at `offset`.
pub fn label_name(offset: u32) -> String {
    format!("label_{offset:x}")
}

/// Rebuild nested `if` blocks and gotos from a laid-out function body.
pub fn structure_program(program: &Program) -> Result<Decompiled> {
    let mut ctx = StructCtx {
        program,
        processed: vec![false; program.lines.len()],
        stack: ExprStack::new(),
    };

    let mut stmts = ctx.walk()?;
    // A jump to the end of code still needs a label to land on.
    if program.is_jump_target(program.end) {
        stmts.push(Stmt::Label(label_name(program.end)));
    }

    let skipped = ctx.processed.iter().filter(|&&done| !done).count();
    if skipped > 0 {
        log::warn!("{skipped} unreachable instructions dropped");
    }
    let residual_stack = ctx.stack.into_vec();
    if !residual_stack.is_empty() {
        log::warn!(
            "{} values left on the stack at end of function",
            residual_stack.len()
        );
    }

    Ok(Decompiled {
        stmts,
        residual_stack,
    })
}

/// Where the top-level walk continues after a line.
enum Resume {
    Next,
    At(usize),
    End,
}

struct StructCtx<'a> {
    program: &'a Program,
    processed: Vec<bool>,
    stack: ExprStack,
}

impl<'a> StructCtx<'a> {
    /// Top-level walk. Gotos move the cursor; lines already consumed by a
    /// conditional body are skipped.
    fn walk(&mut self) -> Result<Vec<Stmt>> {
        let mut stmts = Vec::new();
        let mut index = 0;

        while index < self.program.lines.len() {
            if self.processed[index] {
                index += 1;
                continue;
            }
            let (stmt, resume) = self.process_line(index)?;
            stmts.extend(stmt);
            index = match resume {
                Resume::Next => index + 1,
                Resume::At(line) => line,
                Resume::End => break,
            };
        }

        Ok(stmts)
    }

    fn process_line(&mut self, index: usize) -> Result<(Option<Stmt>, Resume)> {
        self.processed[index] = true;

        let program = self.program;
        let line = &program.lines[index];
        let line_no = index + 1;

        let mut stmts = Vec::new();
        if program.is_jump_target(line.offset) {
            stmts.push(Stmt::Label(label_name(line.offset)));
        }

        let mut resume = Resume::Next;
        match line.insn.kind() {
            OpcodeKind::Goto => {
                let target = self.target_of(index)?;
                stmts.push(Stmt::Goto(label_name(target)));
                resume = self.resume_at(index, target)?;
            }
            OpcodeKind::GotoIfFalse => {
                let cond = self.stack.pop(line_no, &line.insn.opcode)?;
                let target = self.target_of(index)?;
                let then_body = self.conditional_body(index + 1, target)?;
                stmts.push(Stmt::If { cond, then_body });
                resume = self.resume_at(index, target)?;
            }
            _ => recover_insn(&line.insn, line_no, &mut self.stack, &mut stmts)?,
        }

        let stmt = match stmts.len() {
            0 => None,
            1 => stmts.pop(),
            _ => Some(Stmt::Block(stmts)),
        };
        Ok((stmt, resume))
    }

    /// Lines from `first` up to (not including) `target`, in order. Gotos
    /// inside the body do not move this cursor.
    fn conditional_body(&mut self, first: usize, target: u32) -> Result<Vec<Stmt>> {
        let mut body = Vec::new();
        let mut index = first;
        while index < self.program.lines.len() && self.program.lines[index].offset < target {
            if !self.processed[index] {
                let (stmt, _) = self.process_line(index)?;
                body.extend(stmt);
            }
            index += 1;
        }
        Ok(body)
    }

    fn target_of(&self, index: usize) -> Result<u32> {
        self.program.lines[index]
            .insn
            .jump_target()
            .ok_or(DecompileError::TargetNotFound {
                line: index + 1,
                target: 0,
            })
    }

    fn resume_at(&self, index: usize, target: u32) -> Result<Resume> {
        if target == self.program.end {
            return Ok(Resume::End);
        }
        self.program
            .line_at(target)
            .map(Resume::At)
            .ok_or(DecompileError::TargetNotFound {
                line: index + 1,
                target,
            })
    }
}
