use serde::Serialize;

use crate::asm::annotation::ScalarValue;
use crate::mutf8::MUtf8String;

pub const ACC_PUBLIC: u32 = 0x0001;
pub const ACC_ANNOTATION: u32 = 0x2000;

#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub name: String,
    pub whole_line: MUtf8String,
    pub bound_left: i32,
    pub bound_right: i32,
    pub line_number: i32,
    pub is_defined: bool,
    pub metadata: RecordMetadata,
    pub field_list: Vec<Field>,
}

impl Record {
    pub fn new(name: impl Into<String>) -> Self {
        Record {
            name: name.into(),
            whole_line: MUtf8String::default(),
            bound_left: 0,
            bound_right: 0,
            line_number: 0,
            is_defined: true,
            metadata: RecordMetadata::default(),
            field_list: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordMetadata {
    pub attribute: Option<String>,
    pub access_flags: u32,
}

/// A named constant field on a record, e.g. the per-module literal-array
/// index on `_ESModuleRecord`.
#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub name: MUtf8String,
    pub ty: String,
    pub value: ScalarValue,
}
