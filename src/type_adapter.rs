//! Rewrites per-vreg type annotations into instruction-order annotations.
//!
//! The encoder records type indices against virtual registers, but the
//! runtime wants locals keyed by the order of the instruction that fills
//! them and arguments keyed by negative ordinals. Argument binding is
//! recovered from the `mov.dyn` prologue, local binding from `sta.dyn`.

use std::collections::HashMap;

use log::info;

use crate::asm::annotation::{
    AnnotationData, AnnotationElement, ArrayValue, ScalarValue, Value, ValueKind, ES_TYPE_ANNOTATION,
};
use crate::asm::function::Function;
use crate::asm::ins::Opcode;
use crate::asm::program::Program;

pub const TYPE_OF_INSTRUCTION: &str = "_TypeOfInstruction";

#[derive(Debug, Default)]
pub struct TypeAdapter {
    display_typeinfo: bool,
}

impl TypeAdapter {
    pub fn new(display_typeinfo: bool) -> Self {
        TypeAdapter { display_typeinfo }
    }

    pub fn adapt_program(&self, program: &mut Program) {
        for (name, func) in program.function_table.iter_mut() {
            if self.display_typeinfo {
                info!("handling types for function {name}");
            }
            self.adapt_function(func);
        }
    }

    fn adapt_function(&self, func: &mut Function) {
        let annotations = &func.metadata.annotations;
        let anno_idx = annotations
            .iter()
            .position(|a| a.name == ES_TYPE_ANNOTATION)
            .unwrap_or(annotations.len());

        let mut ele_idx = 0;
        let mut vreg_type_map: HashMap<i32, i32> = HashMap::new();
        if let Some(annotation) = annotations.get(anno_idx) {
            ele_idx = annotation
                .elements
                .iter()
                .position(|e| e.name == TYPE_OF_INSTRUCTION)
                .unwrap_or(annotation.elements.len());
            if let Some(element) = annotation.elements.get(ele_idx) {
                if let Some(array) = element.value.as_array() {
                    for pair in array.values.chunks_exact(2) {
                        if let (Some(vreg), Some(ty)) = (pair[0].as_i32(), pair[1].as_i32()) {
                            vreg_type_map.entry(vreg).or_insert(ty);
                        }
                    }
                }
            }
        }
        if vreg_type_map.is_empty() {
            return;
        }
        self.handle_function(func, anno_idx, ele_idx, &vreg_type_map);
    }

    fn handle_function(
        &self,
        func: &mut Function,
        anno_idx: usize,
        ele_idx: usize,
        vreg_type_map: &HashMap<i32, i32>,
    ) {
        let mut order_type_map: HashMap<i32, i32> = HashMap::new();
        let mut finished_vregs: Vec<i32> = Vec::new();
        let param_count = func.params.len();
        let mut order: i32 = 0;

        for (i, insn) in func.ins.iter().enumerate() {
            if insn.opcode == Opcode::Invalid {
                continue;
            }
            order += 1;

            let maybe_arg = i < param_count && insn.opcode == Opcode::MovDyn;
            if !maybe_arg && insn.opcode != Opcode::StaDyn {
                continue;
            }

            if maybe_arg {
                let (Some(&vreg), Some(&arg)) = (insn.regs.first(), insn.regs.get(1)) else {
                    continue;
                };
                if vreg as usize >= param_count || arg < func.regs_num {
                    // not an argument binding
                    continue;
                }
                let vreg = vreg as i32;
                if let Some(&ty) = vreg_type_map.get(&vreg) {
                    if !finished_vregs.contains(&vreg) {
                        let arg_order = func.regs_num as i32 - arg as i32 - 1;
                        order_type_map.entry(arg_order).or_insert(ty);
                        finished_vregs.push(vreg);
                    }
                }
                continue;
            }

            // Vregs bound to variables are filled through sta.dyn.
            let Some(&vreg) = insn.regs.first() else {
                continue;
            };
            let vreg = vreg as i32;
            if let Some(&ty) = vreg_type_map.get(&vreg) {
                if !finished_vregs.contains(&vreg) {
                    order_type_map.entry(order - 1).or_insert(ty);
                    finished_vregs.push(vreg);
                }
            }
        }

        self.update_annotation(func, anno_idx, ele_idx, &order_type_map);
    }

    fn update_annotation(
        &self,
        func: &mut Function,
        anno_idx: usize,
        mut ele_idx: usize,
        order_type_map: &HashMap<i32, i32>,
    ) {
        if anno_idx == func.metadata.annotations.len() {
            func.metadata.add_annotation(AnnotationData::new(ES_TYPE_ANNOTATION));
            ele_idx = 0;
        }

        let mut values = Vec::with_capacity(order_type_map.len() * 2);
        for (&order, &ty) in order_type_map {
            values.push(ScalarValue::I32(order));
            values.push(ScalarValue::I32(ty));
        }
        let element = AnnotationElement {
            name: TYPE_OF_INSTRUCTION.to_string(),
            value: Value::Array(ArrayValue { kind: ValueKind::I32, values }),
        };
        func.metadata.set_or_add_element(anno_idx, ele_idx, element);

        if self.display_typeinfo {
            let pairs: Vec<String> = order_type_map.iter().map(|(o, t)| format!("({o}, {t})")).collect();
            info!("(instruction order, type): {}", pairs.join(", "));
        }
    }
}
