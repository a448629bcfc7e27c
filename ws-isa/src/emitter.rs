use crate::instruction::Instruction;

/// Errors from [`encode`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// Instruction `index` carries a different number of inline operands
    /// than its opcode takes.
    #[error("instruction {index} ({mnemonic}) has {found} operands, expected {expected}")]
    OperandCount {
        index: usize,
        mnemonic: String,
        expected: usize,
        found: usize,
    },
}

/// Encode instructions back into code words.
///
/// ```
/// use ws_isa::{decode, encode};
///
/// let words = [0x100, 0x110, 0x01, 0x203];
/// assert_eq!(encode(&decode(&words)?)?, words);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn encode(instructions: &[Instruction]) -> Result<Vec<u16>, EncodeError> {
    let mut words = Vec::with_capacity(instructions.iter().map(|i| i.width() as usize).sum());

    for (index, insn) in instructions.iter().enumerate() {
        let expected = insn.opcode.inline_params();
        if insn.operands.len() != expected {
            return Err(EncodeError::OperandCount {
                index,
                mnemonic: insn.opcode.mnemonic().into_owned(),
                expected,
                found: insn.operands.len(),
            });
        }
        words.push(insn.opcode.code());
        words.extend_from_slice(&insn.operands);
    }

    Ok(words)
}

/// Serialize code words as little-endian bytes.
pub fn words_to_le_bytes(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}
