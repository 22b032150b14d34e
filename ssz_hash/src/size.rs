//! Fixed/variable size classification and serialized lengths.
//!
//! - basic types and vectors of fixed-size elements are fixed-size
//! - lists are always variable-size
//! - containers are variable-size iff any non-reserved field is
//! - pointers take the size class of their element
//!
//! [`size`] is the exact length of the canonical encoding and is what the
//! encoder uses to lay out offsets.
//!
//! A type that reaches itself without passing through a list has no finite
//! zero value. [`pointer_cycle`] finds such types; the public functions here
//! treat them as unsupported and report them as fixed-size with no length.

use std::any::TypeId;
use std::collections::HashSet;

use crate::config::BYTES_PER_LENGTH_OFFSET;
use crate::fields::{composite_children, visible};
use crate::value::{Shape, SszValue, TypeDesc, pointee_or_zero};

pub fn is_variable_size(value: &dyn SszValue) -> bool {
    is_variable_type(&value.type_desc())
}

pub fn is_variable_type(desc: &TypeDesc) -> bool {
    pointer_cycle(desc).is_none() && variable_type(desc)
}

/// Sum of the fixed sizes of a value and everything it contains.
pub fn fixed_size(value: &dyn SszValue) -> usize {
    if pointer_cycle(&value.type_desc()).is_some() {
        return 0;
    }
    fixed(value)
}

/// Serialized length counting one offset for every variable-size child.
pub fn variable_size(value: &dyn SszValue) -> usize {
    if pointer_cycle(&value.type_desc()).is_some() {
        return 0;
    }
    variable(value)
}

pub fn size(value: &dyn SszValue) -> usize {
    if pointer_cycle(&value.type_desc()).is_some() {
        return 0;
    }
    total(value)
}

/// First type reachable from `desc` that leads back to itself through
/// vectors, containers and pointers only.
pub fn pointer_cycle(desc: &TypeDesc) -> Option<&'static str> {
    let mut reachable = Vec::new();
    let mut seen = HashSet::new();
    let mut pending = vec![*desc];
    while let Some(next) = pending.pop() {
        if !seen.insert(next.id()) {
            continue;
        }
        let shape = next.shape();
        pending.extend(inline_children(&shape));
        if let Shape::List { elem } = shape {
            pending.push(elem);
        }
        reachable.push(next);
    }

    let mut done = HashSet::new();
    reachable
        .iter()
        .find_map(|desc| inline_cycle(desc, &mut Vec::new(), &mut done))
}

fn inline_children(shape: &Shape) -> Vec<TypeDesc> {
    match shape {
        Shape::Vector { elem, .. } | Shape::Pointer { elem, .. } => vec![*elem],
        Shape::Container(fields) => visible(fields.clone()).map(|f| f.ty).collect(),
        Shape::Basic(_) | Shape::List { .. } | Shape::Unsupported => Vec::new(),
    }
}

fn inline_cycle(
    desc: &TypeDesc,
    path: &mut Vec<TypeId>,
    done: &mut HashSet<TypeId>,
) -> Option<&'static str> {
    let id = desc.id();
    if done.contains(&id) {
        return None;
    }
    if path.contains(&id) {
        return Some(desc.name());
    }

    path.push(id);
    let found = inline_children(&desc.shape())
        .iter()
        .find_map(|child| inline_cycle(child, path, done));
    path.pop();
    done.insert(id);
    found
}

// The functions below assume the type has no pointer cycle.

pub(crate) fn variable_type(desc: &TypeDesc) -> bool {
    match desc.shape() {
        Shape::Basic(_) | Shape::Unsupported => false,
        Shape::Vector { elem, .. } => variable_type(&elem),
        Shape::List { .. } => true,
        Shape::Container(fields) => visible(fields).any(|f| variable_type(&f.ty)),
        Shape::Pointer { elem, .. } => variable_type(&elem),
    }
}

pub(crate) fn fixed(value: &dyn SszValue) -> usize {
    match value.type_desc().shape() {
        Shape::Basic(kind) => kind.width(),
        Shape::Vector { elem, .. } | Shape::List { elem } => match elem.basic_kind() {
            Some(kind) => value.len() * kind.width(),
            None => children(value).into_iter().map(fixed).sum(),
        },
        Shape::Container(_) => children(value).into_iter().map(fixed).sum(),
        Shape::Pointer { .. } => pointee_or_zero(value).map_or(0, |p| fixed(p.get())),
        Shape::Unsupported => 0,
    }
}

fn variable(value: &dyn SszValue) -> usize {
    match value.type_desc().shape() {
        Shape::Basic(kind) => kind.width(),
        Shape::Vector { elem, .. } | Shape::List { elem } if elem.basic_kind().is_some() => {
            fixed(value)
        }
        Shape::Vector { .. } | Shape::List { .. } | Shape::Container(_) => children(value)
            .into_iter()
            .map(|child| {
                if variable_type(&child.type_desc()) {
                    variable(child) + BYTES_PER_LENGTH_OFFSET
                } else {
                    fixed(child)
                }
            })
            .sum(),
        Shape::Pointer { .. } => pointee_or_zero(value).map_or(0, |p| total(p.get())),
        Shape::Unsupported => 0,
    }
}

pub(crate) fn total(value: &dyn SszValue) -> usize {
    if variable_type(&value.type_desc()) {
        variable(value)
    } else {
        fixed(value)
    }
}

fn children(value: &dyn SszValue) -> Vec<&dyn SszValue> {
    composite_children(value).unwrap_or_default()
}
