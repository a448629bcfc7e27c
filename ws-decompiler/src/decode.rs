//! Offset pass: places every instruction at its absolute offset and checks
//! that branches land somewhere the structural pass can follow.

use std::collections::BTreeSet;

use ws_isa::{Instruction, OpcodeKind};

use crate::error::{DecompileError, Result};

/// One instruction at its absolute offset.
#[derive(Debug, Clone)]
pub struct Line {
    pub offset: u32,
    pub insn: Instruction,
}

/// A function body ready for structuring.
#[derive(Debug, Clone)]
pub struct Program {
    pub lines: Vec<Line>,
    /// Offsets named by unconditional `GOTO`s; each gets a label.
    pub jump_targets: BTreeSet<u32>,
    /// Offset one past the last instruction.
    pub end: u32,
}

impl Program {
    /// Index of the line starting at `offset`.
    pub fn line_at(&self, offset: u32) -> Option<usize> {
        self.lines.binary_search_by_key(&offset, |l| l.offset).ok()
    }

    pub fn is_jump_target(&self, offset: u32) -> bool {
        self.jump_targets.contains(&offset)
    }
}

/// Lay out `instructions` from `start` and validate branch targets.
pub fn build_program(instructions: &[Instruction], start: u32) -> Result<Program> {
    let mut lines = Vec::with_capacity(instructions.len());
    let mut offset = start;
    for insn in instructions {
        lines.push(Line {
            offset,
            insn: insn.clone(),
        });
        offset += insn.width();
    }

    let mut program = Program {
        lines,
        jump_targets: BTreeSet::new(),
        end: offset,
    };

    for (index, line) in program.lines.iter().enumerate() {
        let Some(target) = line.insn.jump_target() else {
            continue;
        };
        if target != program.end && program.line_at(target).is_none() {
            return Err(DecompileError::TargetNotFound {
                line: index + 1,
                target,
            });
        }
        if line.insn.kind() == OpcodeKind::Goto {
            program.jump_targets.insert(target);
        }
    }

    check_nesting(&program)?;

    log::debug!(
        "laid out {} instructions at {start:04x}..{:04x}, {} jump targets",
        program.lines.len(),
        program.end,
        program.jump_targets.len()
    );
    Ok(program)
}

/// Conditional regions `(offset, target)` must nest: a region that opens
/// inside another has to close at or before the outer one's target.
fn check_nesting(program: &Program) -> Result<()> {
    let mut open: Vec<u32> = Vec::new();

    for (index, line) in program.lines.iter().enumerate() {
        if line.insn.kind() != OpcodeKind::GotoIfFalse {
            continue;
        }
        let Some(target) = line.insn.jump_target() else {
            continue;
        };
        if target <= line.offset {
            return Err(DecompileError::BackwardBranch {
                line: index + 1,
                target,
            });
        }
        while open.last().is_some_and(|&end| end <= line.offset) {
            open.pop();
        }
        if open.last().is_some_and(|&end| target > end) {
            return Err(DecompileError::OverlappingBranch {
                line: index + 1,
                target,
            });
        }
        open.push(target);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ws_isa::parse_listing;

    fn program(text: &str, start: u32) -> Result<Program> {
        build_program(&parse_listing(text).unwrap(), start)
    }

    #[test]
    fn offsets_follow_widths() {
        let p = program("RESET\nPUSH_CONSTANT 03\nCALL_FN_20\nRETURN", 0x100).unwrap();
        let offsets: Vec<u32> = p.lines.iter().map(|l| l.offset).collect();
        assert_eq!(offsets, [0x100, 0x101, 0x103, 0x104]);
        assert_eq!(p.end, 0x105);
        assert_eq!(p.line_at(0x103), Some(2));
        assert_eq!(p.line_at(0x102), None);
    }

    #[test]
    fn only_gotos_are_labelled() {
        let p = program(
            "PUSH_CONSTANT 01\nGOTO_IF_FALSE 0006\nGOTO 0000\nRETURN",
            0,
        )
        .unwrap();
        assert_eq!(p.jump_targets.iter().copied().collect::<Vec<_>>(), [0]);
        assert!(p.is_jump_target(0));
        assert!(!p.is_jump_target(6));
    }

    #[test]
    fn target_must_be_a_boundary() {
        let err = program("PUSH_CONSTANT 01\nGOTO_IF_FALSE 01\nRETURN", 0).unwrap_err();
        assert_eq!(err, DecompileError::TargetNotFound { line: 2, target: 1 });
    }

    #[test]
    fn target_may_be_end_of_code() {
        let p = program("PUSH_CONSTANT 01\nGOTO_IF_FALSE 05\nSTOP", 0).unwrap();
        assert_eq!(p.end, 5);
    }

    #[test]
    fn overlapping_conditionals_are_rejected() {
        // outer: 0..0x0B, inner: 0x04..0x0C
        let text = "PUSH_CONSTANT 01\nGOTO_IF_FALSE 0B\nPUSH_CONSTANT 01\nGOTO_IF_FALSE 0C\nSTOP\nSTOP\nSTOP\nSTOP\nRETURN";
        let err = program(text, 0).unwrap_err();
        assert_eq!(err, DecompileError::OverlappingBranch { line: 4, target: 0x0C });
    }

    #[test]
    fn shared_end_is_nested() {
        let text = "PUSH_CONSTANT 01\nGOTO_IF_FALSE 09\nPUSH_CONSTANT 01\nGOTO_IF_FALSE 09\nSTOP\nRETURN";
        assert!(program(text, 0).is_ok());
    }

    #[test]
    fn backward_conditional_is_rejected() {
        let err = program("STOP\nPUSH_CONSTANT 01\nGOTO_IF_FALSE 00", 0).unwrap_err();
        assert_eq!(err, DecompileError::BackwardBranch { line: 3, target: 0 });
    }
}
