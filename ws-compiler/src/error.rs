use ws_ir::LayoutError;
use ws_isa::EncodeError;

/// Tokenizer failures. Lines count from 1.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character {ch:?} at line {line}")]
    UnexpectedChar { ch: char, line: usize },
    #[error("invalid number {text:?} at line {line}")]
    BadNumber { text: String, line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found} at line {line}")]
    Unexpected {
        expected: &'static str,
        found: String,
        line: usize,
    },
    #[error("expected {expected}, found end of input")]
    UnexpectedEnd { expected: &'static str },
}

/// Lowering failures. Each names the source construct it could not encode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("unknown symbol {0}")]
    UnknownSymbol(String),
    #[error("unknown function {0}")]
    UnknownFunction(String),
    #[error("operator {0} has no opcode")]
    UnsupportedOperator(String),
    /// A bare name, or a call whose opcode leaves nothing on the stack.
    #[error("{0} does not produce a value")]
    NotAValue(String),
    #[error("{0} produces a value and cannot be used as a statement")]
    DiscardedValue(String),
    #[error("expression statement must be a call, found {0}")]
    NotAStatement(String),
    #[error("{function} expects {expected} arguments, got {found}")]
    ArgumentCount {
        function: String,
        expected: usize,
        found: usize,
    },
    #[error("{0} requires a numeric literal argument")]
    ExpectedLiteral(String),
    #[error("bit index {0} is outside 0..=7")]
    BitOutOfRange(u32),
    #[error("address {address:#x} is outside the {bank} bank")]
    OffsetOutOfRange { bank: &'static str, address: u32 },
    #[error("literal {0} does not fit in a code word")]
    LiteralOutOfRange(u32),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Any failure of [`compile`](crate::compile).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

pub type Result<T, E = CompileError> = std::result::Result<T, E>;
