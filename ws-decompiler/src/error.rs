use ws_isa::{DecodeError, ListingError};

/// Errors from decompilation. `line` is the 1-based instruction index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecompileError {
    #[error(transparent)]
    Listing(#[from] ListingError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("stack underflow for {mnemonic} at line {line}: needs {needed}, have {found}")]
    StackUnderflow {
        line: usize,
        mnemonic: String,
        needed: usize,
        found: usize,
    },
    #[error("target offset {target:x} not found at line {line}")]
    TargetNotFound { line: usize, target: u32 },
    /// A conditional region ends inside a region that started after it.
    #[error("conditional at line {line} jumps to {target:x}, past the end of an enclosing conditional")]
    OverlappingBranch { line: usize, target: u32 },
    #[error("conditional at line {line} jumps backwards to {target:x}")]
    BackwardBranch { line: usize, target: u32 },
}

pub type Result<T, E = DecompileError> = std::result::Result<T, E>;
