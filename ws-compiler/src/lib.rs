//! Worldscript compiler: script text in, bytecode out.
//!
//! Tokenize, parse, insert stack resets, lower to [`Emission`]s and lay the
//! result out at the function's starting offset.

pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod resets;

pub use codegen::{Codegen, generate};
pub use error::{CompileError, Error, LexError, ParseError};
pub use lexer::{Token, TokenKind, tokenize};
pub use parser::parse;
pub use resets::add_resets;

use ws_ir::layout::resolve;
use ws_ir::{Emission, Stmt};
use ws_isa::{Instruction, encode, format_listing};

/// Compile `source` for a function whose first word sits at `start`.
///
/// ```
/// let words = ws_compiler::compile("System.wait(3)\nreturn", 0x100)?;
/// assert_eq!(words, [0x100, 0x110, 0x03, 0x305, 0x306, 0x203]);
/// # Ok::<(), ws_compiler::Error>(())
/// ```
pub fn compile(source: &str, start: u32) -> Result<Vec<u16>, Error> {
    let instructions = compile_to_instructions(source, start)?;
    Ok(encode(&instructions)?)
}

pub fn compile_to_instructions(source: &str, start: u32) -> Result<Vec<Instruction>, Error> {
    let tokens = tokenize(source)?;
    let stmts = parse(&tokens)?;
    log::debug!("parsed {} statements from {} tokens", stmts.len(), tokens.len());
    Ok(compile_stmts(stmts, start)?)
}

/// Compile to listing text, one instruction per line.
pub fn compile_to_listing(source: &str, start: u32) -> Result<String, Error> {
    let instructions = compile_to_instructions(source, start)?;
    Ok(format_listing(&instructions, None))
}

/// Compile an already-built statement list, e.g. one produced by the
/// decompiler.
pub fn compile_stmts(stmts: Vec<Stmt>, start: u32) -> Result<Vec<Instruction>, CompileError> {
    let stmts = add_resets(stmts);
    let emissions: Vec<Emission> = generate(&stmts)?;
    let instructions = resolve(&emissions, start)?;
    log::debug!(
        "{} emissions laid out as {} instructions at {start:#x}",
        emissions.len(),
        instructions.len()
    );
    Ok(instructions)
}
