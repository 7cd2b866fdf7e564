//! Applies the OPTIONS frame: in-band flags plus the annotation records
//! every program carries.

use log::debug;

use crate::asm::annotation::{ES_CALL_TYPE_ANNOTATION, ES_MODULE_RECORD, ES_TYPE_ANNOTATION};
use crate::asm::record::{Record, ACC_ANNOTATION, ACC_PUBLIC};

use super::message::FrameMsg;
use super::ProgramBuilder;

impl ProgramBuilder {
    pub(crate) fn handle_options(&mut self, msg: &FrameMsg) {
        self.insert_record(annotation_record(ES_CALL_TYPE_ANNOTATION));
        self.insert_record(annotation_record(ES_TYPE_ANNOTATION));

        if msg.module_mode == Some(true) {
            self.options.module_mode = true;
            let mut record = Record::new(ES_MODULE_RECORD);
            record.metadata.access_flags = ACC_PUBLIC;
            self.insert_record(record);
        }
        if let Some(log_enabled) = msg.log_enabled {
            self.options.log_enabled = log_enabled;
        }
        if let Some(debug_mode) = msg.debug_mode {
            self.options.debug_mode = debug_mode;
        }
        if let Some(opt_level) = msg.opt_level {
            self.options.opt_level = opt_level;
        }
        // Debug builds are never optimized.
        if self.options.debug_mode {
            self.options.opt_level = 0;
        }
        if let Some(opt_log_level) = &msg.opt_log_level {
            self.options.opt_log_level = opt_log_level.clone();
        }
        if self.options.log_enabled {
            debug!(
                "options: debug_mode={} module_mode={} opt_level={}",
                self.options.debug_mode, self.options.module_mode, self.options.opt_level
            );
        }
    }

    fn insert_record(&mut self, record: Record) {
        self.program.record_table.entry(record.name.clone()).or_insert(record);
    }
}

/// External annotation declaration, referenced by the annotations the
/// function decoder synthesizes.
fn annotation_record(name: &str) -> Record {
    let mut record = Record::new(name);
    record.metadata.attribute = Some("external".to_string());
    record.metadata.access_flags = ACC_ANNOTATION;
    record
}
