//! Field resolution for containers.

use crate::error::{EncodeError, StrategyError};
use crate::value::{FieldDesc, Shape, SszValue, TypeDesc};

/// Fields whose name contains this marker are neither sized nor hashed.
pub const RESERVED_FIELD_MARKER: &str = "XXX";

#[inline]
pub fn is_reserved(name: &str) -> bool {
    name.contains(RESERVED_FIELD_MARKER)
}

/// Ordered, non-reserved fields of a container type.
pub fn resolve_fields(desc: &TypeDesc) -> Result<Vec<FieldDesc>, StrategyError> {
    match desc.shape() {
        Shape::Container(fields) => Ok(visible(fields).collect()),
        other => Err(StrategyError::FieldResolution {
            type_name: desc.name(),
            reason: format!("expected a container, found {}", shape_name(&other)),
        }),
    }
}

pub(crate) fn visible(fields: Vec<FieldDesc>) -> impl Iterator<Item = FieldDesc> {
    fields.into_iter().filter(|f| !is_reserved(f.name))
}

/// Elements or resolved fields of a composite value, in serialization order.
/// Other shapes have no children.
pub(crate) fn composite_children(value: &dyn SszValue) -> Result<Vec<&dyn SszValue>, EncodeError> {
    let desc = value.type_desc();
    match desc.shape() {
        Shape::Vector { .. } | Shape::List { .. } => (0..value.len())
            .map(|i| {
                value
                    .element(i)
                    .ok_or_else(|| missing(&desc, format!("element {i}")))
            })
            .collect(),
        Shape::Container(fields) => visible(fields)
            .map(|f| {
                value
                    .field(f.selector)
                    .ok_or_else(|| missing(&desc, format!("field `{}`", f.name)))
            })
            .collect(),
        _ => Ok(Vec::new()),
    }
}

fn missing(desc: &TypeDesc, what: String) -> EncodeError {
    EncodeError::ShapeMismatch {
        type_name: desc.name(),
        detail: format!("missing {what}"),
    }
}

fn shape_name(shape: &Shape) -> &'static str {
    match shape {
        Shape::Basic(_) => "a basic type",
        Shape::Vector { .. } => "a vector",
        Shape::List { .. } => "a list",
        Shape::Container(_) => "a container",
        Shape::Pointer { .. } => "a pointer",
        Shape::Unsupported => "an unsupported type",
    }
}
