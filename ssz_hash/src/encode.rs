//! Canonical SSZ encoding.
//!
//! Basic values are written little-endian. Composite values write their
//! fixed-size children inline and a 4-byte offset for each variable-size
//! child, followed by the variable-size children in order. Absent pointees
//! encode as the zero value of their element type, so types that are
//! recursive through a pointer are rejected up front.

use std::io::Write;

use crate::config::{BYTES_PER_LENGTH_OFFSET, MAX_BYTE_OFFSET};
use crate::error::EncodeError;
use crate::fields::composite_children;
use crate::size::{fixed, pointer_cycle, total, variable_type};
use crate::value::{Shape, SszValue, pointee_or_zero};

/// Write the canonical encoding of `value` to `writer`.
pub fn encode<W: Write>(writer: &mut W, value: &dyn SszValue) -> Result<(), EncodeError> {
    let encoded = encode_to_vec(value)?;
    writer.write_all(&encoded)?;
    Ok(())
}

pub fn encode_to_vec(value: &dyn SszValue) -> Result<Vec<u8>, EncodeError> {
    if let Some(type_name) = pointer_cycle(&value.type_desc()) {
        return Err(EncodeError::RecursivePointer { type_name });
    }
    encode_acyclic(value)
}

/// Encode a value whose type is known to have no pointer cycle.
pub(crate) fn encode_acyclic(value: &dyn SszValue) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    write_value(value, &mut out)?;
    Ok(out)
}

fn write_value(value: &dyn SszValue, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    let desc = value.type_desc();
    match desc.shape() {
        Shape::Basic(kind) => match value.basic() {
            Some(basic) if basic.kind() == kind => {
                basic.write_le(out);
                Ok(())
            }
            _ => Err(EncodeError::ShapeMismatch {
                type_name: desc.name(),
                detail: format!("expected a {kind:?} scalar"),
            }),
        },
        Shape::Vector { .. } | Shape::List { .. } | Shape::Container(_) => {
            let children = composite_children(value)?;
            write_composite(&children, out)
        }
        Shape::Pointer { .. } => match pointee_or_zero(value) {
            Some(pointee) => write_value(pointee.get(), out),
            None => Err(EncodeError::ShapeMismatch {
                type_name: desc.name(),
                detail: "absent pointee without a zero value".to_string(),
            }),
        },
        Shape::Unsupported => Err(EncodeError::Unsupported {
            type_name: desc.name(),
        }),
    }
}

fn write_composite(children: &[&dyn SszValue], out: &mut Vec<u8>) -> Result<(), EncodeError> {
    let variable: Vec<bool> = children
        .iter()
        .map(|c| variable_type(&c.type_desc()))
        .collect();

    if !variable.contains(&true) {
        for child in children {
            write_value(*child, out)?;
        }
        return Ok(());
    }

    let fixed_len: usize = children
        .iter()
        .zip(&variable)
        .map(|(child, &var)| {
            if var {
                BYTES_PER_LENGTH_OFFSET
            } else {
                fixed(*child)
            }
        })
        .sum();

    let mut offset = fixed_len;
    for (child, &var) in children.iter().zip(&variable) {
        if var {
            write_offset(offset, out)?;
            offset += total(*child);
        } else {
            write_value(*child, out)?;
        }
    }

    for (child, _) in children.iter().zip(&variable).filter(|(_, var)| **var) {
        write_value(*child, out)?;
    }

    Ok(())
}

fn write_offset(offset: usize, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    if offset as u64 >= MAX_BYTE_OFFSET {
        return Err(EncodeError::OffsetOverflow { offset });
    }
    out.extend_from_slice(&(offset as u32).to_le_bytes());
    Ok(())
}
