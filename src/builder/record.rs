//! Decodes RECORD and TYPEINFO frames.

use crate::asm::annotation::{ScalarValue, ES_TYPE_INFO_RECORD};
use crate::asm::record::{Field, Record, ACC_PUBLIC};
use crate::error::Result;
use crate::mutf8::{self, MUtf8String};

use super::message::{RecordMsg, TypeInfoMsg};
use super::ProgramBuilder;

pub(crate) fn parse_record(msg: RecordMsg) -> Result<Record> {
    let mut record = Record::new(msg.name);
    record.whole_line = match &msg.whole_line {
        Some(line) => mutf8::normalize(line)?,
        None => MUtf8String::default(),
    };
    record.bound_left = msg.bound_left;
    record.bound_right = msg.bound_right;
    record.line_number = msg.line_number;
    if let Some(metadata) = msg.metadata {
        if let Some(attribute) = metadata.attribute {
            if !attribute.is_empty() {
                record.metadata.attribute = Some(attribute);
            }
        }
    }
    Ok(record)
}

impl ProgramBuilder {
    /// Synthesizes `_ESTypeInfoRecord` carrying the type-summary constants.
    pub(crate) fn handle_type_info(&mut self, msg: &TypeInfoMsg) {
        let mut record = Record::new(ES_TYPE_INFO_RECORD);
        record.metadata.access_flags = ACC_PUBLIC;
        record.field_list.push(Field {
            name: MUtf8String::from("typeFlag"),
            ty: "u8".to_string(),
            value: ScalarValue::U8(u8::from(msg.tf)),
        });
        record.field_list.push(Field {
            name: MUtf8String::from("typeSummaryIndex"),
            ty: "u32".to_string(),
            value: ScalarValue::U32(msg.tsi),
        });
        self.program.record_table.entry(record.name.clone()).or_insert(record);
    }
}
