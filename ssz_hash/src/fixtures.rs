//! Hand-written container impls shared by unit tests.

use crate::value::{FieldDesc, Shape, SszType, SszValue, TypeDesc};

/// Variable-size container with a reserved field.
#[allow(non_snake_case)]
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Header {
    pub slot: u64,
    pub body: Vec<u8>,
    pub XXX_unrecognized: Vec<u8>,
}

impl SszType for Header {
    fn shape() -> Shape {
        Shape::Container(vec![
            FieldDesc::new("slot", 0, u64::desc()),
            FieldDesc::new("body", 1, Vec::<u8>::desc()),
            FieldDesc::new("XXX_unrecognized", 2, Vec::<u8>::desc()),
        ])
    }
}

impl SszValue for Header {
    fn type_desc(&self) -> TypeDesc {
        TypeDesc::of::<Self>()
    }

    fn field(&self, selector: usize) -> Option<&dyn SszValue> {
        match selector {
            0 => Some(&self.slot),
            1 => Some(&self.body),
            2 => Some(&self.XXX_unrecognized),
            _ => None,
        }
    }
}

/// Fixed-size container.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Checkpoint {
    pub epoch: u64,
    pub root: [u8; 32],
}

impl SszType for Checkpoint {
    fn shape() -> Shape {
        Shape::Container(vec![
            FieldDesc::new("epoch", 0, u64::desc()),
            FieldDesc::new("root", 1, <[u8; 32]>::desc()),
        ])
    }
}

impl SszValue for Checkpoint {
    fn type_desc(&self) -> TypeDesc {
        TypeDesc::of::<Self>()
    }

    fn field(&self, selector: usize) -> Option<&dyn SszValue> {
        match selector {
            0 => Some(&self.epoch),
            1 => Some(&self.root),
            _ => None,
        }
    }
}

/// Two bytes, fixed-size.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Pair {
    pub a: u8,
    pub b: u8,
}

impl SszType for Pair {
    fn shape() -> Shape {
        Shape::Container(vec![
            FieldDesc::new("a", 0, u8::desc()),
            FieldDesc::new("b", 1, u8::desc()),
        ])
    }
}

impl SszValue for Pair {
    fn type_desc(&self) -> TypeDesc {
        TypeDesc::of::<Self>()
    }

    fn field(&self, selector: usize) -> Option<&dyn SszValue> {
        match selector {
            0 => Some(&self.a),
            1 => Some(&self.b),
            _ => None,
        }
    }
}

/// Declares a field it never hands out.
#[derive(Debug, Default)]
pub(crate) struct Broken;

impl SszType for Broken {
    fn shape() -> Shape {
        Shape::Container(vec![FieldDesc::new("ghost", 0, u64::desc())])
    }
}

impl SszValue for Broken {
    fn type_desc(&self) -> TypeDesc {
        TypeDesc::of::<Self>()
    }
}

/// Recursive through a pointer: its zero value never ends.
#[derive(Debug, Default)]
pub(crate) struct Link {
    pub v: u64,
    pub next: Option<Box<Link>>,
}

impl SszType for Link {
    fn shape() -> Shape {
        Shape::Container(vec![
            FieldDesc::new("v", 0, u64::desc()),
            FieldDesc::new("next", 1, Option::<Box<Link>>::desc()),
        ])
    }
}

impl SszValue for Link {
    fn type_desc(&self) -> TypeDesc {
        TypeDesc::of::<Self>()
    }

    fn field(&self, selector: usize) -> Option<&dyn SszValue> {
        match selector {
            0 => Some(&self.v),
            1 => Some(&self.next),
            _ => None,
        }
    }
}

/// Recursive through a list, which is finite.
#[derive(Debug, Default)]
pub(crate) struct Node {
    pub value: u64,
    pub children: Vec<Node>,
}

impl SszType for Node {
    fn shape() -> Shape {
        Shape::Container(vec![
            FieldDesc::new("value", 0, u64::desc()),
            FieldDesc::new("children", 1, Vec::<Node>::desc()),
        ])
    }
}

impl SszValue for Node {
    fn type_desc(&self) -> TypeDesc {
        TypeDesc::of::<Self>()
    }

    fn field(&self, selector: usize) -> Option<&dyn SszValue> {
        match selector {
            0 => Some(&self.value),
            1 => Some(&self.children),
            _ => None,
        }
    }
}

/// Mutually recursive with [`Hop`] through pointers.
#[derive(Debug, Default)]
pub(crate) struct Route {
    pub start: u64,
    pub via: Box<Hop>,
}

#[derive(Debug, Default)]
pub(crate) struct Hop {
    pub back: Option<Box<Route>>,
}

impl SszType for Route {
    fn shape() -> Shape {
        Shape::Container(vec![
            FieldDesc::new("start", 0, u64::desc()),
            FieldDesc::new("via", 1, Box::<Hop>::desc()),
        ])
    }
}

impl SszValue for Route {
    fn type_desc(&self) -> TypeDesc {
        TypeDesc::of::<Self>()
    }

    fn field(&self, selector: usize) -> Option<&dyn SszValue> {
        match selector {
            0 => Some(&self.start),
            1 => Some(&self.via),
            _ => None,
        }
    }
}

impl SszType for Hop {
    fn shape() -> Shape {
        Shape::Container(vec![FieldDesc::new("back", 0, Option::<Box<Route>>::desc())])
    }
}

impl SszValue for Hop {
    fn type_desc(&self) -> TypeDesc {
        TypeDesc::of::<Self>()
    }

    fn field(&self, selector: usize) -> Option<&dyn SszValue> {
        match selector {
            0 => Some(&self.back),
            _ => None,
        }
    }
}
