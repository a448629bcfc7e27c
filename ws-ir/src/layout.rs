//! Offset assignment and label resolution for emitted code.

use std::collections::HashMap;

use ws_isa::Instruction;

use crate::emission::{Emission, Operand};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("undefined label {0}")]
    UndefinedLabel(String),
    #[error("label {0} defined more than once")]
    DuplicateLabel(String),
    /// A label lands past the last addressable code word.
    #[error("offset {0:#x} does not fit in a code word")]
    OffsetOverflow(u32),
}

/// Offset of every instruction when the first one sits at `base`.
pub fn offsets(instructions: &[Instruction], base: u32) -> Vec<u32> {
    instructions
        .iter()
        .scan(base, |offset, insn| {
            let here = *offset;
            *offset += insn.width();
            Some(here)
        })
        .collect()
}

/// Offset one past the last instruction.
pub fn end_offset(instructions: &[Instruction], base: u32) -> u32 {
    base + instructions.iter().map(Instruction::width).sum::<u32>()
}

/// Assign label offsets starting from `base`, then replace every label
/// operand by its offset.
pub fn resolve(emissions: &[Emission], base: u32) -> Result<Vec<Instruction>, LayoutError> {
    let labels = label_offsets(emissions, base)?;

    emissions
        .iter()
        .filter_map(|emission| match emission {
            Emission::Label(_) => None,
            Emission::Insn { opcode, operands } => Some((opcode, operands)),
        })
        .map(|(opcode, operands)| {
            let words = operands
                .iter()
                .map(|operand| match operand {
                    Operand::Value(v) => Ok(*v),
                    Operand::Label(name) => {
                        let offset = *labels
                            .get(name.as_str())
                            .ok_or_else(|| LayoutError::UndefinedLabel(name.clone()))?;
                        u16::try_from(offset).map_err(|_| LayoutError::OffsetOverflow(offset))
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Instruction::new(*opcode, words))
        })
        .collect()
}

fn label_offsets(emissions: &[Emission], base: u32) -> Result<HashMap<&str, u32>, LayoutError> {
    let mut labels = HashMap::new();
    let mut offset = base;
    for emission in emissions {
        if let Emission::Label(name) = emission {
            if labels.insert(name.as_str(), offset).is_some() {
                return Err(LayoutError::DuplicateLabel(name.clone()));
            }
        }
        offset += emission.width();
    }
    Ok(labels)
}
