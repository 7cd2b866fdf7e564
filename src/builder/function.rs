//! Decodes FUNCTION frames, including the annotations synthesized from the
//! side-channel type fields.

use log::debug;

use crate::asm::annotation::{
    AnnotationData, AnnotationElement, ArrayValue, ScalarValue, Value, ValueKind,
    ES_CALL_TYPE_ANNOTATION, ES_TYPE_ANNOTATION,
};
use crate::asm::debuginfo::{InsDebug, LocalVariable};
use crate::asm::function::{CatchBlock, Function, Label, Parameter};
use crate::asm::ins::{opcode_by_index, Imm, Ins};
use crate::error::Result;
use crate::mutf8;

use super::message::{FunctionMsg, InsMsg, SymbolTypeMsg};
use super::{BuildOptions, FUNC_MAIN};

pub(crate) fn parse_function(options: &BuildOptions, msg: FunctionMsg) -> Result<Function> {
    let mut return_type = "any".to_string();
    let mut param_count = 0;
    if let Some(signature) = &msg.s {
        if let Some(rt) = &signature.rt {
            return_type = rt.clone();
        }
        param_count = signature.p.unwrap_or(0);
    }
    if options.log_enabled {
        debug!("parsing function {} return type {}", msg.n, return_type);
    }

    let mut func = Function::new(msg.n.clone(), return_type);
    func.params = (0..param_count).map(|_| Parameter { ty: "any".to_string() }).collect();
    func.regs_num = msg.r;

    for ins_msg in msg.i {
        let ins = parse_ins(options, ins_msg)?;
        if options.log_enabled {
            debug!("instruction: {ins}");
        }
        func.ins.push(ins);
    }

    for label_name in msg.l {
        func.label_table
            .insert(label_name.clone(), Label { name: label_name });
    }

    for block in msg.ca_tab {
        let catch_begin = block.cb_lab.unwrap_or_default();
        func.catch_blocks.push(CatchBlock {
            try_begin_label: block.tb_lab.unwrap_or_default(),
            try_end_label: block.te_lab.unwrap_or_default(),
            catch_begin_label: catch_begin.clone(),
            catch_end_label: catch_begin,
        });
    }

    if options.debug_mode {
        for var in msg.v {
            func.local_variable_debug.push(LocalVariable {
                name: var.n.unwrap_or_default(),
                signature: var.s.unwrap_or_default(),
                signature_type: var.st.unwrap_or_default(),
                reg: var.r.unwrap_or(0),
                start: var.start.unwrap_or(0),
                length: var.len.unwrap_or(0),
            });
        }
        func.source_code = msg.sc;
    }
    func.source_file = msg.sf;

    attach_call_type(options, msg.ct, &mut func);
    if let Some(type_info) = msg.ti {
        attach_vreg_types(&type_info, &mut func);
    }
    if func.name == FUNC_MAIN {
        if let Some(exported) = msg.es2t {
            attach_symbol_types(&exported, "exportedSymbols", "exportedSymbolTypes", &mut func);
        }
        if let Some(declared) = msg.ds2t {
            attach_symbol_types(&declared, "declaredSymbols", "declaredSymbolTypes", &mut func);
        }
    }

    Ok(func)
}

fn parse_ins(options: &BuildOptions, msg: InsMsg) -> Result<Ins> {
    let mut ins = Ins::default();
    if let Some(index) = msg.o {
        if let Some(opcode) = opcode_by_index(index) {
            ins.opcode = opcode;
        }
    }
    ins.regs = msg.r;
    ins.ids = msg.id.iter().map(|id| mutf8::normalize(id)).collect::<Result<_>>()?;
    ins.imms = msg.im.iter().map(|&v| Imm::from_number(v)).collect();
    if let Some(label) = msg.l {
        if !label.is_empty() {
            ins.label = Some(label);
        }
    }

    let mut dbg = InsDebug::default();
    if let Some(pos) = msg.d {
        dbg.line_number = pos.l.unwrap_or(0);
        if options.debug_mode {
            dbg.bound_left = pos.bl.unwrap_or(0);
            dbg.bound_right = pos.br.unwrap_or(0);
            dbg.whole_line = pos.w.unwrap_or_default();
            dbg.column_number = pos.c.unwrap_or(0);
        }
    }
    ins.debug = dbg;
    Ok(ins)
}

/// Call-type annotations are suppressed in debug mode and never attached
/// to the top-level function.
fn attach_call_type(options: &BuildOptions, call_type: Option<u32>, func: &mut Function) {
    if options.debug_mode || func.name == FUNC_MAIN {
        return;
    }
    let mut annotation = AnnotationData::new(ES_CALL_TYPE_ANNOTATION);
    annotation.add_element(AnnotationElement {
        name: "callType".to_string(),
        value: Value::Scalar(ScalarValue::U32(call_type.unwrap_or(0))),
    });
    func.metadata.add_annotation(annotation);
}

/// Per-vreg type indices become a flat `[vreg, type, ...]` U32 array.
fn attach_vreg_types(type_info: &[u32], func: &mut Function) {
    let mut values = Vec::with_capacity(type_info.len() * 2);
    for (vreg, &type_index) in type_info.iter().enumerate() {
        values.push(ScalarValue::U32(vreg as u32));
        values.push(ScalarValue::U32(type_index));
    }
    let mut annotation = AnnotationData::new(ES_TYPE_ANNOTATION);
    annotation.add_element(AnnotationElement {
        name: "typeOfVreg".to_string(),
        value: Value::Array(ArrayValue { kind: ValueKind::U32, values }),
    });
    func.metadata.add_annotation(annotation);
}

fn attach_symbol_types(
    entries: &[SymbolTypeMsg],
    symbols_name: &str,
    types_name: &str,
    func: &mut Function,
) {
    let mut symbols = Vec::with_capacity(entries.len());
    let mut types = Vec::with_capacity(entries.len());
    for entry in entries {
        symbols.push(ScalarValue::String(entry.symbol.clone().unwrap_or_default()));
        types.push(ScalarValue::U32(entry.ty.unwrap_or(0)));
    }
    let mut annotation = AnnotationData::new(ES_TYPE_ANNOTATION);
    annotation.add_element(AnnotationElement {
        name: symbols_name.to_string(),
        value: Value::Array(ArrayValue { kind: ValueKind::String, values: symbols }),
    });
    annotation.add_element(AnnotationElement {
        name: types_name.to_string(),
        value: Value::Array(ArrayValue { kind: ValueKind::U32, values: types }),
    });
    func.metadata.add_annotation(annotation);
}
