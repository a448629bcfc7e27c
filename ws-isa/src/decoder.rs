use crate::instruction::Instruction;
use crate::opcode::lookup;

/// Errors from [`decode`] and [`words_from_le_bytes`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The word at `index` is not a known opcode.
    #[error("unknown opcode {code:#06x} at word {index}")]
    UnknownOpcode { index: usize, code: u16 },
    /// The instruction starting at word `index` needs more inline operands
    /// than the input holds.
    #[error("truncated instruction at word {index}")]
    Truncated { index: usize },
    /// A byte buffer with an odd length cannot hold 16-bit words.
    #[error("bytecode length {0} is not a whole number of words")]
    OddLength(usize),
}

/// Decode a sequence of code words into instructions.
///
/// Offsets are not resolved here: jump operands stay absolute word offsets,
/// which only make sense relative to the function's starting offset.
///
/// ```
/// use ws_isa::decode;
///
/// let insns = decode(&[0x100, 0x110, 0x01, 0x203])?;
/// assert_eq!(insns.len(), 3);
/// assert_eq!(insns[1].to_string(), "PUSH_CONSTANT 01");
/// # Ok::<(), ws_isa::DecodeError>(())
/// ```
pub fn decode(words: &[u16]) -> Result<Vec<Instruction>, DecodeError> {
    let mut instructions = Vec::new();
    let mut index = 0usize;

    while index < words.len() {
        let code = words[index];
        let opcode = lookup(code).ok_or(DecodeError::UnknownOpcode { index, code })?;
        let operands_end = index + 1 + opcode.inline_params();
        let operands = words
            .get(index + 1..operands_end)
            .ok_or(DecodeError::Truncated { index })?;

        instructions.push(Instruction::new(opcode, operands.to_vec()));
        index = operands_end;
    }

    Ok(instructions)
}

/// Split a little-endian byte buffer into code words.
pub fn words_from_le_bytes(bytes: &[u8]) -> Result<Vec<u16>, DecodeError> {
    if bytes.len() % 2 != 0 {
        return Err(DecodeError::OddLength(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}
