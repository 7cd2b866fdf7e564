//! Seam to the assembly emitter. The binary bytecode writer is a separate
//! library; everything behind [`Emitter`] is replaceable by it.

use std::fs;
use std::path::Path;

use log::debug;

use crate::asm::program::Program;
use crate::error::Result;

pub trait Emitter {
    fn emit(&self, program: &Program, output: &Path) -> Result<()>;
}

/// Writes the finished program as pretty-printed JSON.
#[derive(Debug, Default)]
pub struct JsonEmitter;

impl Emitter for JsonEmitter {
    fn emit(&self, program: &Program, output: &Path) -> Result<()> {
        debug!("emitting program to {}", output.display());
        let text = serde_json::to_string_pretty(program)?;
        fs::write(output, text)?;
        Ok(())
    }
}
