use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::driver::{self, GenerateConfig, ProgramSource};
use crate::emit::JsonEmitter;

#[derive(Parser)]
#[command(name = "abcgen")]
#[command(about = "Assembles a Panda bytecode program from a compiler's framed JSON stream", version)]
pub struct Cli {
    /// Input file containing the framed JSON stream
    #[arg(short, long, value_name = "INPUT", required_unless_present = "compile_by_pipe")]
    input: Option<PathBuf>,

    /// Output path for the generated program
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Read the stream from the pipe the parent process opened on fd 3
    #[arg(long, default_value_t = false)]
    compile_by_pipe: bool,

    /// Print the adapted (instruction order, type) pairs per function
    #[arg(long, default_value_t = false)]
    display_typeinfo: bool,

    /// Optimization level when the stream does not set one
    #[arg(long, default_value_t = 0)]
    opt_level: i32,

    /// Log level for the bytecode optimizer
    #[arg(long, default_value = "error")]
    opt_log_level: String,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = GenerateConfig {
        display_typeinfo: cli.display_typeinfo,
        opt_level: cli.opt_level,
        opt_log_level: cli.opt_log_level,
    };
    let emitter = JsonEmitter;

    if cli.compile_by_pipe {
        driver::generate_program(ProgramSource::Pipe, &cli.output, &config, &emitter)
            .context("failed to build program from pipe")?;
        return Ok(());
    }

    // clap guarantees `input` when not compiling by pipe.
    let input = cli.input.context("missing input file")?;
    let data = fs::read(&input).with_context(|| format!("failed to read {}", input.display()))?;
    driver::generate_program(ProgramSource::Buffer(&data), &cli.output, &config, &emitter)
        .with_context(|| format!("failed to build program from {}", input.display()))?;
    Ok(())
}
