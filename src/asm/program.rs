use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::asm::function::Function;
use crate::asm::literal::LiteralArray;
use crate::asm::record::Record;
use crate::mutf8::MUtf8String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Language {
    EcmaScript,
}

/// Aggregate root of the assembled output. Literal arrays are keyed by the
/// stringified insertion counter (`"0"`, `"1"`, ...).
#[derive(Debug, Clone, Serialize)]
pub struct Program {
    pub lang: Language,
    pub function_table: BTreeMap<String, Function>,
    pub record_table: BTreeMap<String, Record>,
    pub strings: BTreeSet<MUtf8String>,
    pub literalarray_table: BTreeMap<String, LiteralArray>,
}

impl Program {
    pub fn new() -> Self {
        Program {
            lang: Language::EcmaScript,
            function_table: BTreeMap::new(),
            record_table: BTreeMap::new(),
            strings: BTreeSet::new(),
            literalarray_table: BTreeMap::new(),
        }
    }
}

impl Default for Program {
    fn default() -> Self {
        Program::new()
    }
}
