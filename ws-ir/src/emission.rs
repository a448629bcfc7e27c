use ws_isa::{Instruction, Opcode};

/// An inline operand before layout: a resolved word or a label reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Value(u16),
    Label(String),
}

/// Compiler output before label resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    Insn { opcode: Opcode, operands: Vec<Operand> },
    /// Marks the offset of the next instruction. Zero width.
    Label(String),
}

impl Emission {
    pub fn insn(opcode: Opcode, operands: Vec<Operand>) -> Self {
        Emission::Insn { opcode, operands }
    }

    /// Instruction without inline operands.
    pub fn bare(opcode: Opcode) -> Self {
        Emission::Insn {
            opcode,
            operands: Vec::new(),
        }
    }

    /// Width in code words.
    pub fn width(&self) -> u32 {
        match self {
            Emission::Label(_) => 0,
            Emission::Insn { opcode, .. } => opcode.width(),
        }
    }
}

impl From<Instruction> for Emission {
    fn from(insn: Instruction) -> Self {
        Emission::Insn {
            opcode: insn.opcode,
            operands: insn.operands.into_iter().map(Operand::Value).collect(),
        }
    }
}
