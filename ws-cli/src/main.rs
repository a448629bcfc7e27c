mod batch;

use std::fmt::Display;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use memmap2::Mmap;
use ws_decompiler::{Options, decompile_listing, decompile_words};
use ws_isa::{
    decode, encode, format_listing, parse_listing, table, words_from_le_bytes, words_to_le_bytes,
};

use crate::batch::Manifest;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "worldscript", about = "FF7 world map script decompiler and compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Disassemble raw little-endian bytecode to a listing
    Disasm {
        input: PathBuf,
        /// Offset of the first code word (hex); adds an offset column
        #[arg(long, value_parser = parse_hex)]
        offset: Option<u32>,
    },
    /// Assemble a listing to raw little-endian bytecode
    Asm {
        input: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decompile listings to script text
    Decompile {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Offset of the first instruction (hex)
        #[arg(long, value_parser = parse_hex)]
        offset: u32,
        /// Prefix the script with an annotated listing
        #[arg(long)]
        debug: bool,
        /// Inputs are raw bytecode instead of listings
        #[arg(long)]
        binary: bool,
    },
    /// Compile script text to a listing
    Compile {
        input: PathBuf,
        /// Offset of the first instruction (hex)
        #[arg(long, value_parser = parse_hex)]
        offset: u32,
        /// Write raw bytecode instead of a listing
        #[arg(long)]
        binary: bool,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decompile every function named in a YAML manifest
    Batch {
        manifest: PathBuf,
        /// Output directory, one `.ws` file per function (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        debug: bool,
    },
    /// Print the opcode table
    Opcodes,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Disasm { input, offset } => cmd_disasm(&input, offset),
        Commands::Asm { input, output } => cmd_asm(&input, output.as_deref()),
        Commands::Decompile {
            inputs,
            offset,
            debug,
            binary,
        } => cmd_decompile(&inputs, offset, Options { debug }, binary),
        Commands::Compile {
            input,
            offset,
            binary,
            output,
        } => cmd_compile(&input, offset, binary, output.as_deref()),
        Commands::Batch {
            manifest,
            output,
            debug,
        } => cmd_batch(&manifest, output.as_deref(), Options { debug }),
        Commands::Opcodes => cmd_opcodes(),
    }
}

/// Hex number with or without a `0x` prefix.
pub(crate) fn parse_hex(text: &str) -> Result<u32, String> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u32::from_str_radix(digits, 16).map_err(|e| format!("{text:?} is not a hex offset: {e}"))
}

fn or_exit<T, E: Display>(result: Result<T, E>) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    })
}

fn read_text(path: &Path) -> String {
    or_exit(fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display())))
}

fn read_words(path: &Path) -> Vec<u16> {
    let file = or_exit(File::open(path).map_err(|e| format!("{}: {e}", path.display())));
    let len = or_exit(file.metadata()).len();
    if len == 0 {
        return Vec::new();
    }
    // SAFETY: the mapping is read-only and dropped before this function returns.
    let map = or_exit(unsafe { Mmap::map(&file) });
    or_exit(words_from_le_bytes(&map))
}

fn write_output(path: Option<&Path>, bytes: &[u8]) {
    let result = match path {
        Some(path) => fs::write(path, bytes).map_err(|e| format!("{}: {e}", path.display())),
        None => io::stdout().write_all(bytes).map_err(|e| e.to_string()),
    };
    or_exit(result);
}

fn cmd_disasm(path: &Path, offset: Option<u32>) {
    let words = read_words(path);
    let instructions = or_exit(decode(&words));
    log::info!("{} words, {} instructions", words.len(), instructions.len());
    println!("{}", format_listing(&instructions, offset));
}

fn cmd_asm(path: &Path, output: Option<&Path>) {
    let instructions = or_exit(parse_listing(&read_text(path)));
    let words = or_exit(encode(&instructions));
    write_output(output, &words_to_le_bytes(&words));
}

fn cmd_decompile(inputs: &[PathBuf], offset: u32, options: Options, binary: bool) {
    let mut failed = 0;
    for input in inputs {
        let result = if binary {
            decompile_words(&read_words(input), offset, options)
        } else {
            decompile_listing(&read_text(input), offset, options)
        };
        if inputs.len() > 1 {
            println!("-- {}", input.display());
        }
        match result {
            Ok(script) => println!("{script}"),
            Err(e) => {
                eprintln!("Error: {}: {e}", input.display());
                failed += 1;
            }
        }
    }
    if failed > 0 {
        process::exit(1);
    }
}

fn cmd_compile(path: &Path, offset: u32, binary: bool, output: Option<&Path>) {
    let source = read_text(path);
    let bytes = if binary {
        let words = or_exit(ws_compiler::compile(&source, offset));
        words_to_le_bytes(&words)
    } else {
        let mut listing = or_exit(ws_compiler::compile_to_listing(&source, offset));
        listing.push('\n');
        listing.into_bytes()
    };
    write_output(output, &bytes);
}

fn cmd_batch(path: &Path, output_dir: Option<&Path>, options: Options) {
    let manifest = or_exit(
        Manifest::from_yaml(&read_text(path)).map_err(|e| format!("{}: {e}", path.display())),
    );

    if let Some(dir) = output_dir {
        fs::create_dir_all(dir).unwrap_or_else(|e| {
            eprintln!("Error creating output directory: {e}");
            process::exit(1);
        });
    }

    let outcomes = manifest.process(options);
    let mut failed = 0;
    for outcome in &outcomes {
        let script = match &outcome.result {
            Ok(script) => script,
            Err(e) => {
                eprintln!("Error: {}: {e}", outcome.name);
                failed += 1;
                continue;
            }
        };
        match output_dir {
            Some(dir) => {
                let out_path = dir.join(format!("{}.ws", outcome.name));
                fs::write(&out_path, format!("{script}\n")).unwrap_or_else(|e| {
                    eprintln!("Error writing {}: {e}", out_path.display());
                    failed += 1;
                });
            }
            None => println!("-- {}\n{script}\n", outcome.name),
        }
    }

    log::info!("{} functions, {failed} failed", outcomes.len());
    if failed > 0 {
        process::exit(1);
    }
}

fn cmd_opcodes() {
    println!("CODE  MNEMONIC             FUNCTION                          POP  INL  RES");
    for def in table() {
        println!(
            "{:04X}  {:<20} {:<33} {:>3}  {:>3}  {}",
            def.code,
            def.mnemonic,
            format!("{}.{}", def.namespace, def.name),
            def.stack_params,
            def.inline_params,
            if def.pushes_result() { "yes" } else { "" },
        );
    }
}
