use std::collections::HashMap;

use abcgen::asm::annotation::{
    AnnotationData, AnnotationElement, ArrayValue, ScalarValue, Value, ValueKind, ES_TYPE_ANNOTATION,
};
use abcgen::asm::function::{Function, Parameter};
use abcgen::asm::ins::{Ins, Opcode};
use abcgen::asm::program::Program;
use abcgen::type_adapter::{TypeAdapter, TYPE_OF_INSTRUCTION};

fn ins(opcode: Opcode, regs: &[u32]) -> Ins {
    let mut ins = Ins::new(opcode);
    ins.regs = regs.to_vec();
    ins
}

fn type_annotation(pairs: &[(i32, i32)]) -> AnnotationData {
    let mut values = Vec::new();
    for &(vreg, ty) in pairs {
        values.push(ScalarValue::I32(vreg));
        values.push(ScalarValue::I32(ty));
    }
    let mut annotation = AnnotationData::new(ES_TYPE_ANNOTATION);
    annotation.add_element(AnnotationElement {
        name: TYPE_OF_INSTRUCTION.to_string(),
        value: Value::Array(ArrayValue { kind: ValueKind::I32, values }),
    });
    annotation
}

/// `foo(any a0, any a1)` with regs_num 5; a0 and a1 live at v5 and v6.
fn make_foo() -> Function {
    let mut foo = Function::new("foo", "any");
    foo.params = vec![Parameter { ty: "any".to_string() }, Parameter { ty: "any".to_string() }];
    foo.regs_num = 5;
    foo.ins = vec![
        ins(Opcode::MovDyn, &[1, 6]),
        ins(Opcode::MovDyn, &[0, 5]),
        ins(Opcode::EcmaLdlexenvdyn, &[]),
        ins(Opcode::StaDyn, &[4]),
        ins(Opcode::LdaDyn, &[0]),
        ins(Opcode::StaDyn, &[3]),
        ins(Opcode::LdaDyn, &[1]),
        ins(Opcode::EcmaAdd2dyn, &[3]),
        ins(Opcode::StaDyn, &[2]),
        ins(Opcode::LdaDyn, &[2]),
        ins(Opcode::StaDyn, &[3]),
        ins(Opcode::LdaDyn, &[3]),
        ins(Opcode::ReturnDyn, &[]),
    ];
    foo
}

fn extract_typeinfo(func: &Function) -> HashMap<i32, i32> {
    let array = func.metadata.annotations[0].elements[0].value.as_array().unwrap();
    assert_eq!(array.kind, ValueKind::I32);
    assert_eq!(array.values.len() % 2, 0);
    let mut typeinfo = HashMap::new();
    for pair in array.values.chunks_exact(2) {
        typeinfo.insert(pair[0].as_i32().unwrap(), pair[1].as_i32().unwrap());
    }
    typeinfo
}

#[test]
fn variables_and_args_are_rekeyed_by_order() {
    let mut foo = make_foo();
    foo.metadata.add_annotation(type_annotation(&[(0, 1), (1, 1), (2, 1)]));

    let mut program = Program::new();
    program.function_table.insert("foo".to_string(), foo);
    TypeAdapter::default().adapt_program(&mut program);

    let typeinfo = extract_typeinfo(&program.function_table["foo"]);
    assert_eq!(typeinfo.len(), 3);
    // a0 binds to order -1, a1 to -2, and v2 is filled by the sta.dyn at
    // instruction order 8.
    assert_eq!(typeinfo.get(&-1), Some(&1));
    assert_eq!(typeinfo.get(&-2), Some(&1));
    assert_eq!(typeinfo.get(&8), Some(&1));

    assert!(typeinfo.keys().all(|&order| order >= -2));
    assert!(typeinfo.keys().filter(|&&order| order < 0).count() == 2);
}

#[test]
fn invalid_instructions_do_not_advance_the_order() {
    let mut foo = make_foo();
    // An undecodable instruction in the middle must be invisible to the
    // order counter.
    foo.ins.insert(4, Ins::default());
    foo.metadata.add_annotation(type_annotation(&[(2, 7)]));

    let mut program = Program::new();
    program.function_table.insert("foo".to_string(), foo);
    TypeAdapter::default().adapt_program(&mut program);

    let typeinfo = extract_typeinfo(&program.function_table["foo"]);
    assert_eq!(typeinfo, HashMap::from([(8, 7)]));
}

#[test]
fn each_vreg_binds_only_once() {
    let mut foo = make_foo();
    foo.metadata.add_annotation(type_annotation(&[(3, 9)]));

    let mut program = Program::new();
    program.function_table.insert("foo".to_string(), foo);
    TypeAdapter::default().adapt_program(&mut program);

    // v3 receives sta.dyn twice (orders 5 and 10); only the first binds.
    let typeinfo = extract_typeinfo(&program.function_table["foo"]);
    assert_eq!(typeinfo, HashMap::from([(5, 9)]));
}

#[test]
fn mov_dyn_below_window_is_not_an_argument() {
    let mut foo = make_foo();
    // Source register inside the local window: not an argument move.
    foo.ins[0] = ins(Opcode::MovDyn, &[1, 2]);
    foo.metadata.add_annotation(type_annotation(&[(1, 4)]));

    let mut program = Program::new();
    program.function_table.insert("foo".to_string(), foo);
    TypeAdapter::default().adapt_program(&mut program);

    let typeinfo = extract_typeinfo(&program.function_table["foo"]);
    assert!(typeinfo.is_empty());
}

#[test]
fn functions_without_type_annotation_are_untouched() {
    let mut program = Program::new();
    program.function_table.insert("foo".to_string(), make_foo());
    TypeAdapter::default().adapt_program(&mut program);
    assert!(program.function_table["foo"].metadata.annotations.is_empty());
}

#[test]
fn builder_synthesized_u32_pairs_are_readable() {
    // The vreg/type map tolerates the U32 arrays the builder produces.
    let mut foo = make_foo();
    let mut annotation = AnnotationData::new(ES_TYPE_ANNOTATION);
    annotation.add_element(AnnotationElement {
        name: TYPE_OF_INSTRUCTION.to_string(),
        value: Value::Array(ArrayValue {
            kind: ValueKind::U32,
            values: vec![ScalarValue::U32(2), ScalarValue::U32(6)],
        }),
    });
    foo.metadata.add_annotation(annotation);

    let mut program = Program::new();
    program.function_table.insert("foo".to_string(), foo);
    TypeAdapter::default().adapt_program(&mut program);

    let typeinfo = extract_typeinfo(&program.function_table["foo"]);
    assert_eq!(typeinfo, HashMap::from([(8, 6)]));
}
