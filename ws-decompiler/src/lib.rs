//! Worldscript decompiler: bytecode in, structured script text out.
//!
//! The pipeline is an offset pass ([`decode`]), a structural walk with a
//! simulated evaluation stack ([`structuring`], [`expr_recovery`]) and a
//! printer ([`script_emitter`]).

pub mod decode;
pub mod error;
pub mod expr_recovery;
pub mod script_emitter;
pub mod structuring;

use std::fmt::Write;

pub use decode::{Program, build_program};
pub use error::DecompileError;
pub use script_emitter::emit_script;
pub use structuring::{Decompiled, structure_program};

use ws_isa::{Instruction, decode as decode_words, parse_listing};

/// Decompiler switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Prefix the script with a comment block listing every instruction
    /// with its offset; jump targets are starred.
    pub debug: bool,
}

/// Decompile listing text whose first instruction sits at `start`.
pub fn decompile_listing(
    text: &str,
    start: u32,
    options: Options,
) -> Result<String, DecompileError> {
    let instructions = parse_listing(text)?;
    decompile_instructions(&instructions, start, options)
}

/// Decompile raw code words whose first word sits at `start`.
pub fn decompile_words(
    words: &[u16],
    start: u32,
    options: Options,
) -> Result<String, DecompileError> {
    let instructions = decode_words(words)?;
    decompile_instructions(&instructions, start, options)
}

pub fn decompile_instructions(
    instructions: &[Instruction],
    start: u32,
    options: Options,
) -> Result<String, DecompileError> {
    let program = build_program(instructions, start)?;
    let decompiled = structure_program(&program)?;
    let script = emit_script(&decompiled.stmts);

    if !options.debug {
        return Ok(script);
    }
    let mut out = debug_header(&program);
    if !script.is_empty() {
        out.push('\n');
        out.push_str(&script);
    }
    Ok(out)
}

/// Statements and the final simulated stack, before printing.
pub fn decompile_to_ast(
    instructions: &[Instruction],
    start: u32,
) -> Result<Decompiled, DecompileError> {
    let program = build_program(instructions, start)?;
    structure_program(&program)
}

fn debug_header(program: &Program) -> String {
    let mut out = String::new();
    for (i, line) in program.lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let mark = if program.is_jump_target(line.offset) { '*' } else { ' ' };
        let _ = write!(out, "-- {:04X}{mark} {}", line.offset, line.insn);
    }
    out
}
