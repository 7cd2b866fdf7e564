//! Decodes LITERAL_BUFFER frames. Every user literal lands as two array
//! entries: a TAG_VALUE carrying the tag byte, then the tagged value.

use serde_json::Value;

use crate::asm::literal::{Literal, LiteralArray, LiteralTag, LiteralValue};
use crate::error::{BuildError, Result};
use crate::mutf8;

use super::message::{LiteralBufferMsg, LiteralMsg};

pub(crate) fn parse_literal_buffer(msg: LiteralBufferMsg) -> Result<LiteralArray> {
    let mut literals = Vec::with_capacity(msg.lb.len() * 2);
    for literal in msg.lb {
        parse_literal(literal, &mut literals)?;
    }
    Ok(LiteralArray::new(literals))
}

fn parse_literal(msg: LiteralMsg, out: &mut Vec<Literal>) -> Result<()> {
    out.push(Literal { tag: LiteralTag::TagValue, value: LiteralValue::U8(msg.t) });

    // TAG_VALUE never appears as a user tag; it and unknown tags keep the
    // tag entry but carry no value.
    let Some(tag) = LiteralTag::from_u8(msg.t) else {
        return Ok(());
    };
    let value = match tag {
        LiteralTag::Bool => LiteralValue::Bool(payload_bool(&msg)?),
        LiteralTag::Integer => LiteralValue::U32(payload_int(&msg)? as u32),
        LiteralTag::Double => LiteralValue::F64(payload_double(&msg)?),
        LiteralTag::String | LiteralTag::Method | LiteralTag::GeneratorMethod => {
            LiteralValue::String(mutf8::normalize(payload_str(&msg)?)?)
        }
        LiteralTag::Accessor => LiteralValue::U8(0),
        LiteralTag::MethodAffiliate => LiteralValue::U16(payload_uint(&msg)? as u16),
        LiteralTag::NullValue => LiteralValue::U8(0),
        LiteralTag::TagValue => return Ok(()),
    };
    out.push(Literal { tag, value });
    Ok(())
}

fn payload_bool(msg: &LiteralMsg) -> Result<bool> {
    match &msg.v {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(BuildError::LiteralPayload { tag: msg.t, expected: "bool" }),
    }
}

fn payload_int(msg: &LiteralMsg) -> Result<i64> {
    match &msg.v {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or(BuildError::LiteralPayload { tag: msg.t, expected: "integer" }),
        Some(_) => Err(BuildError::LiteralPayload { tag: msg.t, expected: "integer" }),
    }
}

fn payload_uint(msg: &LiteralMsg) -> Result<u64> {
    match &msg.v {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or(BuildError::LiteralPayload { tag: msg.t, expected: "unsigned integer" }),
        Some(_) => Err(BuildError::LiteralPayload { tag: msg.t, expected: "unsigned integer" }),
    }
}

fn payload_double(msg: &LiteralMsg) -> Result<f64> {
    match &msg.v {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or(BuildError::LiteralPayload { tag: msg.t, expected: "number" }),
        Some(_) => Err(BuildError::LiteralPayload { tag: msg.t, expected: "number" }),
    }
}

fn payload_str(msg: &LiteralMsg) -> Result<&str> {
    match &msg.v {
        None | Some(Value::Null) => Ok(""),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(BuildError::LiteralPayload { tag: msg.t, expected: "string" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(json: &str) -> LiteralBufferMsg {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn tag_and_value_alternate() {
        let arr = parse_literal_buffer(buffer(
            r#"{"lb":[{"t":1,"v":true},{"t":2,"v":7},{"t":4,"v":1.5}]}"#,
        ))
        .unwrap();
        let lits = &arr.literals;
        assert_eq!(lits.len(), 6);
        assert_eq!(lits[0].value, LiteralValue::U8(1));
        assert_eq!(lits[1].value, LiteralValue::Bool(true));
        assert_eq!(lits[2].value, LiteralValue::U8(2));
        assert_eq!(lits[3].value, LiteralValue::U32(7));
        assert_eq!(lits[4].value, LiteralValue::U8(4));
        assert_eq!(lits[5].value, LiteralValue::F64(1.5));
    }

    #[test]
    fn unknown_tag_keeps_only_tag_entry() {
        let arr = parse_literal_buffer(buffer(r#"{"lb":[{"t":77,"v":1},{"t":8}]}"#)).unwrap();
        let lits = &arr.literals;
        assert_eq!(lits.len(), 3);
        assert_eq!(lits[0].value, LiteralValue::U8(77));
        assert_eq!(lits[1].value, LiteralValue::U8(8));
        assert_eq!(lits[2], Literal { tag: LiteralTag::Accessor, value: LiteralValue::U8(0) });
    }

    #[test]
    fn missing_payload_defaults() {
        let arr = parse_literal_buffer(buffer(r#"{"lb":[{"t":5}]}"#)).unwrap();
        assert_eq!(arr.literals[1].value, LiteralValue::String("".into()));
    }

    #[test]
    fn mistyped_payload_is_fatal() {
        assert!(parse_literal_buffer(buffer(r#"{"lb":[{"t":1,"v":"yes"}]}"#)).is_err());
    }
}
