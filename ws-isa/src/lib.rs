//! Worldscript instruction set.
//!
//! The world-map script VM runs a stack machine over 16-bit code words.
//! This crate holds the opcode table, the symbolic names used by source
//! text, and conversions between code words, [`Instruction`]s and the
//! line-oriented listing form.

pub mod decoder;
pub mod emitter;
pub mod instruction;
pub mod listing;
pub mod opcode;
pub mod symbols;

pub use decoder::{DecodeError, decode, words_from_le_bytes};
pub use emitter::{EncodeError, encode, words_to_le_bytes};
pub use instruction::Instruction;
pub use listing::{ListingError, format_listing, format_operand, parse_listing};
pub use opcode::{
    Bank, CALL_FUNCTION, Granularity, MathOp, Namespace, OPCODES, Opcode, OpcodeDef, OpcodeFlags,
    OpcodeKind, PushKind, call_function, lookup, lookup_function, lookup_kind, lookup_mnemonic, op,
    table,
};
