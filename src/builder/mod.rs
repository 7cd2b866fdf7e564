//! Incremental program builder: consumes framed JSON messages and grows a
//! [`Program`] until the stream ends.

pub mod framer;
pub mod message;

mod function;
mod literal;
mod module;
mod options;
mod record;

pub use framer::FrameReader;

use crate::asm::literal::LiteralArray;
use crate::asm::program::Program;
use crate::error::{BuildError, Result};
use crate::mutf8;
use message::FrameMsg;

/// Conventional name of the synthetic top-level function of a file.
pub const FUNC_MAIN: &str = "func_main_0";

/// Frame discriminator values; fixed by the encoder contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameType {
    Function,
    Record,
    String,
    LiteralBuffer,
    Module,
    Options,
    TypeInfo,
}

impl FrameType {
    fn from_tag(tag: i64) -> Option<FrameType> {
        match tag {
            0 => Some(FrameType::Function),
            1 => Some(FrameType::Record),
            2 => Some(FrameType::String),
            3 => Some(FrameType::LiteralBuffer),
            4 => Some(FrameType::Module),
            5 => Some(FrameType::Options),
            6 => Some(FrameType::TypeInfo),
            _ => None,
        }
    }
}

/// Options delivered in-band by the OPTIONS frame.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub debug_mode: bool,
    pub log_enabled: bool,
    pub module_mode: bool,
    pub opt_level: i32,
    pub opt_log_level: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            debug_mode: false,
            log_enabled: false,
            module_mode: false,
            opt_level: 0,
            opt_log_level: "error".to_string(),
        }
    }
}

/// Owns the growing program, the in-band options and the literal-array
/// counter, so concurrent builds never share state.
pub struct ProgramBuilder {
    program: Program,
    options: BuildOptions,
    literal_array_count: u32,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        ProgramBuilder {
            program: Program::new(),
            options: BuildOptions::default(),
            literal_array_count: 0,
        }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn finish(self) -> (Program, BuildOptions) {
        (self.program, self.options)
    }

    /// Decodes one un-escaped frame and applies it to the program.
    pub fn handle_frame(&mut self, frame: &str) -> Result<()> {
        let msg: FrameMsg = serde_json::from_str(frame).map_err(|source| BuildError::FrameJson {
            fragment: fragment_of(frame),
            source,
        })?;
        let Some(frame_type) = FrameType::from_tag(msg.t) else {
            return Err(BuildError::UnknownFrameType { tag: msg.t, fragment: fragment_of(frame) });
        };

        match frame_type {
            FrameType::Function => {
                if let Some(fb) = msg.fb {
                    let func = function::parse_function(&self.options, fb)?;
                    self.program.function_table.entry(func.name.clone()).or_insert(func);
                }
            }
            FrameType::Record => {
                if let Some(rb) = msg.rb {
                    let rec = record::parse_record(rb)?;
                    self.program.record_table.entry(rec.name.clone()).or_insert(rec);
                }
            }
            FrameType::String => {
                if let Some(strings) = msg.s {
                    for s in &strings {
                        self.program.strings.insert(mutf8::normalize(s)?);
                    }
                }
            }
            FrameType::LiteralBuffer => {
                if let Some(buffer) = msg.lit_arr {
                    let array = literal::parse_literal_buffer(buffer)?;
                    self.insert_literal_array(array);
                }
            }
            FrameType::Module => {
                if let Some(module) = msg.module {
                    self.handle_module(module)?;
                }
            }
            FrameType::Options => self.handle_options(&msg),
            FrameType::TypeInfo => {
                if let Some(ti) = msg.ti {
                    self.handle_type_info(&ti);
                }
            }
        }
        Ok(())
    }

    /// Registers a literal array under the next free key and returns that
    /// key's numeric value.
    fn insert_literal_array(&mut self, array: LiteralArray) -> u32 {
        let index = self.literal_array_count;
        self.literal_array_count += 1;
        self.program.literalarray_table.insert(index.to_string(), array);
        index
    }
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        ProgramBuilder::new()
    }
}

/// Trims a frame for diagnostics without splitting a UTF-8 sequence.
fn fragment_of(frame: &str) -> String {
    const MAX: usize = 160;
    if frame.len() <= MAX {
        return frame.to_string();
    }
    let mut end = MAX;
    while !frame.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &frame[..end])
}
