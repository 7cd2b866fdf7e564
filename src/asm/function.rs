use std::collections::HashMap;

use serde::Serialize;

use crate::asm::annotation::{AnnotationData, AnnotationElement};
use crate::asm::debuginfo::LocalVariable;
use crate::asm::ins::Ins;

#[derive(Debug, Clone, Serialize)]
pub struct Function {
    pub name: String,
    pub return_type: String,
    pub params: Vec<Parameter>,
    pub regs_num: u32,
    pub ins: Vec<Ins>,
    pub label_table: HashMap<String, Label>,
    pub catch_blocks: Vec<CatchBlock>,
    pub source_file: Option<String>,
    pub source_code: Option<String>,
    pub local_variable_debug: Vec<LocalVariable>,
    pub metadata: FunctionMetadata,
}

impl Function {
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Function {
            name: name.into(),
            return_type: return_type.into(),
            params: Vec::new(),
            regs_num: 0,
            ins: Vec::new(),
            label_table: HashMap::new(),
            catch_blocks: Vec::new(),
            source_file: None,
            source_code: None,
            local_variable_debug: Vec::new(),
            metadata: FunctionMetadata::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    pub ty: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Label {
    pub name: String,
}

/// The encoder carries no distinct catch-end label; the decoder sets it
/// equal to the catch-begin label.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatchBlock {
    pub try_begin_label: String,
    pub try_end_label: String,
    pub catch_begin_label: String,
    pub catch_end_label: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FunctionMetadata {
    pub annotations: Vec<AnnotationData>,
}

impl FunctionMetadata {
    pub fn add_annotation(&mut self, annotation: AnnotationData) {
        self.annotations.push(annotation);
    }

    /// Replaces the element at `(anno_idx, ele_idx)`, appending when
    /// `ele_idx` is one past the end. Out-of-range annotation indices are
    /// ignored.
    pub fn set_or_add_element(&mut self, anno_idx: usize, ele_idx: usize, element: AnnotationElement) {
        let Some(annotation) = self.annotations.get_mut(anno_idx) else {
            return;
        };
        if ele_idx < annotation.elements.len() {
            annotation.elements[ele_idx] = element;
        } else {
            annotation.elements.push(element);
        }
    }
}
