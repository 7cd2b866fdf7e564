//! Decodes MODULE frames into one literal array per module, laid out as
//! six length-prefixed sections in fixed order, and records the array's
//! index as a field on `_ESModuleRecord`.

use log::debug;

use crate::asm::annotation::{ScalarValue, ES_MODULE_RECORD};
use crate::asm::literal::{Literal, LiteralArray, LiteralTag, LiteralValue};
use crate::asm::record::Field;
use crate::error::Result;
use crate::mutf8::{self, MUtf8String};

use super::message::ModuleMsg;
use super::ProgramBuilder;

impl ProgramBuilder {
    pub(crate) fn handle_module(&mut self, msg: ModuleMsg) -> Result<()> {
        let mut literals = Vec::new();

        push_len(&mut literals, msg.module_requests.len());
        for request in &msg.module_requests {
            push_string(&mut literals, mutf8::normalize(request)?);
        }

        push_len(&mut literals, msg.regular_import_entries.len());
        for entry in &msg.regular_import_entries {
            push_string(&mut literals, mutf8::normalize(&entry.local_name)?);
            push_string(&mut literals, mutf8::normalize(&entry.import_name)?);
            push_request(&mut literals, entry.module_request);
        }

        push_len(&mut literals, msg.namespace_import_entries.len());
        for entry in &msg.namespace_import_entries {
            push_string(&mut literals, mutf8::normalize(&entry.local_name)?);
            push_request(&mut literals, entry.module_request);
        }

        push_len(&mut literals, msg.local_export_entries.len());
        for entry in &msg.local_export_entries {
            push_string(&mut literals, mutf8::normalize(&entry.local_name)?);
            push_string(&mut literals, mutf8::normalize(&entry.export_name)?);
        }

        push_len(&mut literals, msg.indirect_export_entries.len());
        for entry in &msg.indirect_export_entries {
            push_string(&mut literals, mutf8::normalize(&entry.export_name)?);
            push_string(&mut literals, mutf8::normalize(&entry.import_name)?);
            push_request(&mut literals, entry.module_request);
        }

        push_len(&mut literals, msg.star_export_entries.len());
        for &request in &msg.star_export_entries {
            push_request(&mut literals, request);
        }

        let module_name = mutf8::normalize(&msg.module_name)?;
        let index = self.insert_literal_array(LiteralArray::new(literals));
        if self.options().log_enabled {
            debug!("module {module_name} stored as literal array {index}");
        }
        self.add_module_field(module_name, index);
        Ok(())
    }

    /// Records the module's literal-array index on `_ESModuleRecord`; a
    /// no-op when module mode never created that record.
    fn add_module_field(&mut self, module_name: MUtf8String, index: u32) {
        if let Some(record) = self.program.record_table.get_mut(ES_MODULE_RECORD) {
            record.field_list.push(Field {
                name: module_name,
                ty: "u32".to_string(),
                value: ScalarValue::U32(index),
            });
        }
    }
}

fn push_len(out: &mut Vec<Literal>, len: usize) {
    out.push(Literal { tag: LiteralTag::Integer, value: LiteralValue::U32(len as u32) });
}

fn push_string(out: &mut Vec<Literal>, value: MUtf8String) {
    out.push(Literal { tag: LiteralTag::String, value: LiteralValue::String(value) });
}

fn push_request(out: &mut Vec<Literal>, request: u16) {
    out.push(Literal { tag: LiteralTag::MethodAffiliate, value: LiteralValue::U16(request) });
}
