//! Build orchestration: run the framer over the input, adapt types, emit.

use std::io::Read;
use std::path::Path;

use log::{debug, info};

use crate::asm::program::Program;
use crate::builder::{BuildOptions, FrameReader, ProgramBuilder};
use crate::emit::Emitter;
use crate::error::{BuildError, Result};
use crate::type_adapter::TypeAdapter;

/// Chunk size for pipe reads.
const READ_BUFFER_SIZE: usize = 4096;

/// The parent process hands the stream to the driver on this descriptor
/// when compiling by pipe.
#[cfg(unix)]
const COMPILER_PIPE_FD: std::os::unix::io::RawFd = 3;

pub enum ProgramSource<'a> {
    Buffer(&'a [u8]),
    Pipe,
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub display_typeinfo: bool,
    pub opt_level: i32,
    pub opt_log_level: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        GenerateConfig {
            display_typeinfo: false,
            opt_level: 0,
            opt_log_level: "error".to_string(),
        }
    }
}

/// Builds a program from a whole in-memory stream.
pub fn build_from_buffer(data: &[u8]) -> Result<(Program, BuildOptions)> {
    if data.is_empty() {
        return Err(BuildError::EmptyInput);
    }
    let mut builder = ProgramBuilder::new();
    let mut reader = FrameReader::new();
    reader.feed(data, &mut |frame| builder.handle_frame(frame))?;
    Ok(builder.finish())
}

/// Builds a program from a chunked reader, carrying partial frames across
/// chunk boundaries.
pub fn build_from_reader(mut input: impl Read) -> Result<(Program, BuildOptions)> {
    let mut builder = ProgramBuilder::new();
    let mut reader = FrameReader::new();
    let mut buffer = [0u8; READ_BUFFER_SIZE];
    loop {
        let n = input.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        reader.feed(&buffer[..n], &mut |frame| builder.handle_frame(frame))?;
    }
    debug!("finished reading input stream");
    Ok(builder.finish())
}

/// Runs the whole pipeline and writes the output file.
pub fn generate_program(
    source: ProgramSource<'_>,
    output: &Path,
    config: &GenerateConfig,
    emitter: &dyn Emitter,
) -> Result<()> {
    let (mut program, options) = match source {
        ProgramSource::Buffer(data) => build_from_buffer(data)?,
        ProgramSource::Pipe => build_from_reader(open_pipe()?)?,
    };
    debug!("parsing done, adapting type annotations");

    TypeAdapter::new(config.display_typeinfo).adapt_program(&mut program);

    if options.opt_level != 0 || config.opt_level != 0 {
        let log_level = if config.opt_log_level != "error" {
            &config.opt_log_level
        } else {
            &options.opt_log_level
        };
        info!(
            "bytecode optimizer is unavailable in this build (requested log level {log_level}); \
             emitting unoptimized output"
        );
    }

    emitter.emit(&program, output).map_err(|e| match e {
        BuildError::Emit(_) => e,
        other => BuildError::Emit(other.to_string()),
    })?;
    info!("successfully generated {}", output.display());
    Ok(())
}

#[cfg(unix)]
fn open_pipe() -> Result<std::fs::File> {
    use std::os::unix::io::FromRawFd;
    // Safety: the descriptor is opened by the parent process for this
    // child and is not otherwise owned inside this process.
    Ok(unsafe { std::fs::File::from_raw_fd(COMPILER_PIPE_FD) })
}

#[cfg(not(unix))]
fn open_pipe() -> Result<std::fs::File> {
    Err(BuildError::PipeUnsupported)
}
