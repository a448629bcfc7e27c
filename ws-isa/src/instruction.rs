use std::fmt;

use crate::listing::format_operand;
use crate::opcode::{Opcode, OpcodeKind};

/// One decoded instruction: an opcode and its inline operand words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: Vec<u16>,
}

impl Instruction {
    pub fn new(opcode: Opcode, operands: Vec<u16>) -> Self {
        Self { opcode, operands }
    }

    /// Instruction width in words (`CALL_FN_<n>` is a single word).
    pub fn width(&self) -> u32 {
        match self.opcode {
            Opcode::CallFunction(_) => 1,
            Opcode::Def(_) => 1 + self.operands.len() as u32,
        }
    }

    #[inline]
    pub fn kind(&self) -> OpcodeKind {
        self.opcode.kind()
    }

    /// Absolute target of a `GOTO`/`GOTO_IF_FALSE`.
    pub fn jump_target(&self) -> Option<u32> {
        if self.opcode.def().is_jump() {
            self.operands.first().map(|&t| t as u32)
        } else {
            None
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        for &operand in &self.operands {
            write!(f, " {}", format_operand(operand))?;
        }
        Ok(())
    }
}
