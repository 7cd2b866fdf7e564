use serde::Serialize;

pub const ES_TYPE_ANNOTATION: &str = "_ESTypeAnnotation";
pub const ES_CALL_TYPE_ANNOTATION: &str = "_ESCallTypeAnnotation";
pub const ES_MODULE_RECORD: &str = "_ESModuleRecord";
pub const ES_TYPE_INFO_RECORD: &str = "_ESTypeInfoRecord";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueKind {
    U8,
    U32,
    I32,
    String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ScalarValue {
    U8(u8),
    U32(u32),
    I32(i32),
    String(String),
}

impl ScalarValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            ScalarValue::U8(_) => ValueKind::U8,
            ScalarValue::U32(_) => ValueKind::U32,
            ScalarValue::I32(_) => ValueKind::I32,
            ScalarValue::String(_) => ValueKind::String,
        }
    }

    /// Numeric scalars reinterpreted as i32; the type adapter reads both the
    /// U32 arrays the builder synthesizes and I32 arrays it wrote itself.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            ScalarValue::U8(v) => Some(i32::from(*v)),
            ScalarValue::U32(v) => Some(*v as i32),
            ScalarValue::I32(v) => Some(*v),
            ScalarValue::String(_) => None,
        }
    }
}

/// A homogeneous array of scalars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayValue {
    pub kind: ValueKind,
    pub values: Vec<ScalarValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Scalar(ScalarValue),
    Array(ArrayValue),
}

impl Value {
    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Value::Array(arr) => Some(arr),
            Value::Scalar(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationElement {
    pub name: String,
    pub value: Value,
}

/// A named annotation. Functions keep these in an ordered list; the same
/// record name may appear more than once and is told apart by position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationData {
    pub name: String,
    pub elements: Vec<AnnotationElement>,
}

impl AnnotationData {
    pub fn new(name: impl Into<String>) -> Self {
        AnnotationData { name: name.into(), elements: Vec::new() }
    }

    pub fn add_element(&mut self, element: AnnotationElement) {
        self.elements.push(element);
    }
}
