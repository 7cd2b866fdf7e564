//! The in-memory assembly program the driver hands to the emitter.

pub mod annotation;
pub mod debuginfo;
pub mod function;
pub mod ins;
pub mod literal;
pub mod program;
pub mod record;

pub use annotation::{AnnotationData, AnnotationElement, ArrayValue, ScalarValue, Value, ValueKind};
pub use debuginfo::{InsDebug, LocalVariable};
pub use function::{CatchBlock, Function, FunctionMetadata, Label, Parameter};
pub use ins::{index_of_opcode, opcode_by_index, Imm, Ins, Opcode, OPCODE_TABLE};
pub use literal::{Literal, LiteralArray, LiteralTag, LiteralValue};
pub use program::{Language, Program};
pub use record::{Field, Record, RecordMetadata, ACC_ANNOTATION, ACC_PUBLIC};
