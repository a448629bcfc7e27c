//! Line-oriented text form of bytecode: `MNEMONIC OP OP`, one instruction
//! per line, operands in hex without a `0x` prefix.

use std::fmt::Write;

use crate::instruction::Instruction;
use crate::opcode::lookup_mnemonic;

/// Errors from [`parse_listing`]. Line numbers count non-blank lines from 1.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ListingError {
    #[error("unknown mnemonic {mnemonic} at line {line}")]
    UnknownMnemonic { line: usize, mnemonic: String },
    #[error("{mnemonic} takes {expected} inline operands, got {found} at line {line}")]
    OperandCount {
        line: usize,
        mnemonic: String,
        expected: usize,
        found: usize,
    },
    #[error("invalid operand {text:?} at line {line}")]
    BadOperand { line: usize, text: String },
}

/// Render an operand word: two hex digits below `0x100`, four otherwise.
pub fn format_operand(value: u16) -> String {
    if value < 0x100 {
        format!("{value:02X}")
    } else {
        format!("{value:04X}")
    }
}

/// Parse listing text into instructions.
///
/// Blank lines are skipped. A leading `XXXX:` offset column, as produced by
/// [`format_listing`] with a base offset, is accepted and ignored.
pub fn parse_listing(text: &str) -> Result<Vec<Instruction>, ListingError> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| parse_line(line, i + 1))
        .collect()
}

fn parse_line(line: &str, line_no: usize) -> Result<Instruction, ListingError> {
    let mut tokens = line.split_whitespace().peekable();
    if tokens.peek().is_some_and(|t| is_offset_column(t)) {
        tokens.next();
    }

    let mnemonic = tokens.next().unwrap_or_default();
    let opcode = lookup_mnemonic(mnemonic).ok_or_else(|| ListingError::UnknownMnemonic {
        line: line_no,
        mnemonic: mnemonic.to_string(),
    })?;

    let operands = tokens
        .map(|text| {
            u16::from_str_radix(text, 16).map_err(|_| ListingError::BadOperand {
                line: line_no,
                text: text.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if operands.len() != opcode.inline_params() {
        return Err(ListingError::OperandCount {
            line: line_no,
            mnemonic: mnemonic.to_string(),
            expected: opcode.inline_params(),
            found: operands.len(),
        });
    }

    Ok(Instruction::new(opcode, operands))
}

fn is_offset_column(token: &str) -> bool {
    token
        .strip_suffix(':')
        .is_some_and(|hex| !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// Render instructions as listing text, one per line, without a trailing
/// newline.
///
/// With `base`, every line is prefixed by its word offset (`181E: RESET`),
/// which is the disassembly view of a function starting at `base`.
pub fn format_listing(instructions: &[Instruction], base: Option<u32>) -> String {
    let mut out = String::new();
    let mut offset = base.unwrap_or(0);

    for (i, insn) in instructions.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if base.is_some() {
            let _ = write!(out, "{offset:04X}: ");
        }
        let _ = write!(out, "{insn}");
        offset += insn.width();
    }

    out
}
