//! Wire shapes of the framed JSON messages. Field names follow the
//! encoder's abbreviated keys; anything optional on the wire defaults
//! here so the decoders only deal with concrete values.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct FrameMsg {
    pub t: i64,
    pub fb: Option<FunctionMsg>,
    pub rb: Option<RecordMsg>,
    pub s: Option<Vec<String>>,
    pub lit_arr: Option<LiteralBufferMsg>,
    #[serde(rename = "mod")]
    pub module: Option<ModuleMsg>,
    pub ti: Option<TypeInfoMsg>,
    // OPTIONS payload lives at the top level of the frame.
    pub module_mode: Option<bool>,
    pub log_enabled: Option<bool>,
    pub debug_mode: Option<bool>,
    pub opt_level: Option<i32>,
    pub opt_log_level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FunctionMsg {
    #[serde(default)]
    pub n: String,
    pub s: Option<SignatureMsg>,
    #[serde(default)]
    pub r: u32,
    #[serde(default)]
    pub i: Vec<InsMsg>,
    #[serde(default)]
    pub l: Vec<String>,
    #[serde(default)]
    pub ca_tab: Vec<CatchBlockMsg>,
    #[serde(default)]
    pub v: Vec<VariableMsg>,
    pub sf: Option<String>,
    pub sc: Option<String>,
    pub ct: Option<u32>,
    pub ti: Option<Vec<u32>>,
    pub es2t: Option<Vec<SymbolTypeMsg>>,
    pub ds2t: Option<Vec<SymbolTypeMsg>>,
}

#[derive(Debug, Deserialize)]
pub struct SignatureMsg {
    pub rt: Option<String>,
    pub p: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct InsMsg {
    pub o: Option<i32>,
    #[serde(default)]
    pub r: Vec<u32>,
    #[serde(default)]
    pub id: Vec<String>,
    #[serde(default)]
    pub im: Vec<f64>,
    pub l: Option<String>,
    pub d: Option<DebugPosMsg>,
}

#[derive(Debug, Deserialize)]
pub struct DebugPosMsg {
    pub bl: Option<u32>,
    pub br: Option<u32>,
    pub w: Option<String>,
    pub c: Option<i32>,
    pub l: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct VariableMsg {
    pub n: Option<String>,
    pub s: Option<String>,
    pub st: Option<String>,
    pub r: Option<i32>,
    pub start: Option<u32>,
    pub len: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CatchBlockMsg {
    pub tb_lab: Option<String>,
    pub te_lab: Option<String>,
    pub cb_lab: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SymbolTypeMsg {
    pub symbol: Option<String>,
    #[serde(rename = "type")]
    pub ty: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RecordMsg {
    #[serde(default)]
    pub name: String,
    pub whole_line: Option<String>,
    #[serde(default = "default_bound")]
    pub bound_left: i32,
    #[serde(default = "default_bound")]
    pub bound_right: i32,
    #[serde(default = "default_bound")]
    pub line_number: i32,
    pub metadata: Option<RecordMetadataMsg>,
}

fn default_bound() -> i32 {
    -1
}

#[derive(Debug, Deserialize)]
pub struct RecordMetadataMsg {
    pub attribute: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LiteralBufferMsg {
    #[serde(default)]
    pub lb: Vec<LiteralMsg>,
}

/// The payload type of `v` depends on the tag, so it stays a raw JSON
/// value until the literal decoder looks at `t`.
#[derive(Debug, Deserialize)]
pub struct LiteralMsg {
    pub t: u8,
    pub v: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleMsg {
    #[serde(default)]
    pub module_name: String,
    #[serde(default)]
    pub module_requests: Vec<String>,
    #[serde(default)]
    pub regular_import_entries: Vec<RegularImportMsg>,
    #[serde(default)]
    pub namespace_import_entries: Vec<NamespaceImportMsg>,
    #[serde(default)]
    pub local_export_entries: Vec<LocalExportMsg>,
    #[serde(default)]
    pub indirect_export_entries: Vec<IndirectExportMsg>,
    #[serde(default)]
    pub star_export_entries: Vec<u16>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegularImportMsg {
    #[serde(default)]
    pub local_name: String,
    #[serde(default)]
    pub import_name: String,
    #[serde(default)]
    pub module_request: u16,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceImportMsg {
    #[serde(default)]
    pub local_name: String,
    #[serde(default)]
    pub module_request: u16,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalExportMsg {
    #[serde(default)]
    pub local_name: String,
    #[serde(default)]
    pub export_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndirectExportMsg {
    #[serde(default)]
    pub export_name: String,
    #[serde(default)]
    pub import_name: String,
    #[serde(default)]
    pub module_request: u16,
}

#[derive(Debug, Deserialize)]
pub struct TypeInfoMsg {
    #[serde(default)]
    pub tf: bool,
    #[serde(default)]
    pub tsi: u32,
}
