use serde::Serialize;

/// Per-instruction source position. Outside debug mode only `line_number`
/// survives decoding; the positional fields stay zeroed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InsDebug {
    pub line_number: i32,
    pub column_number: i32,
    pub whole_line: String,
    pub bound_left: u32,
    pub bound_right: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LocalVariable {
    pub name: String,
    pub signature: String,
    pub signature_type: String,
    pub reg: i32,
    pub start: u32,
    pub length: u32,
}
