//! Static description of hashable types and dynamic access to their values.
//!
//! Every hashable type implements two traits:
//! - [`SszType`] describes the type once, as a [`Shape`]
//! - [`SszValue`] is an object-safe view used to walk a value at runtime
//!
//! Shapes refer to their children through [`TypeDesc`], which carries the
//! child's [`TypeId`] and a function producing its shape on demand.
//!
//! Shapes are produced on demand, so a container may hold a `Vec<Self>`.
//! Recursion through a pointer has an infinite size class and is not
//! supported.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;

/// Scalars that pack directly into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
}

impl BasicKind {
    /// Serialized width in bytes.
    pub const fn width(self) -> usize {
        match self {
            BasicKind::Bool | BasicKind::U8 => 1,
            BasicKind::U16 => 2,
            BasicKind::U32 => 4,
            BasicKind::U64 => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
}

impl BasicValue {
    pub fn kind(self) -> BasicKind {
        match self {
            BasicValue::Bool(_) => BasicKind::Bool,
            BasicValue::U8(_) => BasicKind::U8,
            BasicValue::U16(_) => BasicKind::U16,
            BasicValue::U32(_) => BasicKind::U32,
            BasicValue::U64(_) => BasicKind::U64,
        }
    }

    /// Append the little-endian encoding.
    pub fn write_le(self, out: &mut Vec<u8>) {
        match self {
            BasicValue::Bool(v) => out.push(u8::from(v)),
            BasicValue::U8(v) => out.push(v),
            BasicValue::U16(v) => out.extend_from_slice(&v.to_le_bytes()),
            BasicValue::U32(v) => out.extend_from_slice(&v.to_le_bytes()),
            BasicValue::U64(v) => out.extend_from_slice(&v.to_le_bytes()),
        }
    }
}

/// Builds the zero value of a pointer's element type.
pub type ZeroFn = fn() -> Box<dyn SszValue>;

/// Identity and shape of a hashable type.
#[derive(Debug, Clone, Copy)]
pub struct TypeDesc {
    id: TypeId,
    name: &'static str,
    shape: fn() -> Shape,
}

impl TypeDesc {
    pub fn of<T: SszType>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            shape: T::shape,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> Shape {
        (self.shape)()
    }

    pub fn basic_kind(&self) -> Option<BasicKind> {
        match self.shape() {
            Shape::Basic(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self.shape(), Shape::Unsupported)
    }
}

impl PartialEq for TypeDesc {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDesc {}

/// One field of a container, as reported by its [`SszType`] impl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDesc {
    pub name: &'static str,
    /// Index passed to [`SszValue::field`].
    pub selector: usize,
    pub ty: TypeDesc,
}

impl FieldDesc {
    pub fn new(name: &'static str, selector: usize, ty: TypeDesc) -> Self {
        Self { name, selector, ty }
    }
}

/// The closed set of shapes a hashable type can take.
#[derive(Debug, Clone)]
pub enum Shape {
    Basic(BasicKind),
    /// Fixed-length array, `[T; N]`.
    Vector { elem: TypeDesc, len: usize },
    /// Variable-length sequence, `Vec<T>`.
    List { elem: TypeDesc },
    /// Struct with ordered fields.
    Container(Vec<FieldDesc>),
    /// Reference to a single element. `zero` is set when the pointee may be absent.
    Pointer { elem: TypeDesc, zero: Option<ZeroFn> },
    /// Describable but neither encodable nor hashable.
    Unsupported,
}

pub trait SszType: SszValue + Sized + 'static {
    fn shape() -> Shape;

    fn desc() -> TypeDesc {
        TypeDesc::of::<Self>()
    }
}

/// Runtime view of a value. Accessors that do not apply to a shape return
/// their defaults.
pub trait SszValue: Send + Sync {
    fn type_desc(&self) -> TypeDesc;

    fn basic(&self) -> Option<BasicValue> {
        None
    }

    /// Element count of a vector or list.
    fn len(&self) -> usize {
        0
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn element(&self, _index: usize) -> Option<&dyn SszValue> {
        None
    }

    fn field(&self, _selector: usize) -> Option<&dyn SszValue> {
        None
    }

    /// Referenced value of a pointer, `None` when absent.
    fn pointee(&self) -> Option<&dyn SszValue> {
        None
    }
}

/// Either the referenced value or the element type's zero value.
pub enum Pointee<'a> {
    Present(&'a dyn SszValue),
    Zero(Box<dyn SszValue>),
}

impl Pointee<'_> {
    pub fn get(&self) -> &dyn SszValue {
        match self {
            Pointee::Present(value) => *value,
            Pointee::Zero(value) => value.as_ref(),
        }
    }
}

/// Resolve a pointer to the value its encoding is taken from.
pub fn pointee_or_zero(value: &dyn SszValue) -> Option<Pointee<'_>> {
    if let Some(inner) = value.pointee() {
        return Some(Pointee::Present(inner));
    }
    match value.type_desc().shape() {
        Shape::Pointer {
            zero: Some(zero), ..
        } => Some(Pointee::Zero(zero())),
        _ => None,
    }
}

macro_rules! impl_basic {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl SszType for $ty {
                fn shape() -> Shape {
                    Shape::Basic(BasicKind::$kind)
                }
            }

            impl SszValue for $ty {
                fn type_desc(&self) -> TypeDesc {
                    TypeDesc::of::<Self>()
                }

                fn basic(&self) -> Option<BasicValue> {
                    Some(BasicValue::$kind(*self))
                }
            }
        )*
    };
}

impl_basic!(bool => Bool, u8 => U8, u16 => U16, u32 => U32, u64 => U64);

macro_rules! impl_unsupported {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SszType for $ty {
                fn shape() -> Shape {
                    Shape::Unsupported
                }
            }

            impl SszValue for $ty {
                fn type_desc(&self) -> TypeDesc {
                    TypeDesc::of::<Self>()
                }
            }
        )*
    };
}

impl_unsupported!(i8, i16, i32, i64, f32, f64, String);

impl<K, V> SszType for HashMap<K, V>
where
    K: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn shape() -> Shape {
        Shape::Unsupported
    }
}

impl<K, V> SszValue for HashMap<K, V>
where
    K: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn type_desc(&self) -> TypeDesc {
        TypeDesc::of::<Self>()
    }
}

impl<T: SszType, const N: usize> SszType for [T; N] {
    fn shape() -> Shape {
        Shape::Vector {
            elem: T::desc(),
            len: N,
        }
    }
}

impl<T: SszType, const N: usize> SszValue for [T; N] {
    fn type_desc(&self) -> TypeDesc {
        TypeDesc::of::<Self>()
    }

    fn len(&self) -> usize {
        N
    }

    fn element(&self, index: usize) -> Option<&dyn SszValue> {
        self.get(index).map(|v| v as &dyn SszValue)
    }
}

impl<T: SszType> SszType for Vec<T> {
    fn shape() -> Shape {
        Shape::List { elem: T::desc() }
    }
}

impl<T: SszType> SszValue for Vec<T> {
    fn type_desc(&self) -> TypeDesc {
        TypeDesc::of::<Self>()
    }

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn element(&self, index: usize) -> Option<&dyn SszValue> {
        self.get(index).map(|v| v as &dyn SszValue)
    }
}

fn zero_of<T: SszType + Default>() -> Box<dyn SszValue> {
    Box::new(T::default())
}

impl<T: SszType + Default> SszType for Option<T> {
    fn shape() -> Shape {
        Shape::Pointer {
            elem: T::desc(),
            zero: Some(zero_of::<T>),
        }
    }
}

impl<T: SszType + Default> SszValue for Option<T> {
    fn type_desc(&self) -> TypeDesc {
        TypeDesc::of::<Self>()
    }

    fn pointee(&self) -> Option<&dyn SszValue> {
        self.as_ref().map(|v| v as &dyn SszValue)
    }
}

impl<T: SszType> SszType for Box<T> {
    fn shape() -> Shape {
        Shape::Pointer {
            elem: T::desc(),
            zero: None,
        }
    }
}

impl<T: SszType> SszValue for Box<T> {
    fn type_desc(&self) -> TypeDesc {
        TypeDesc::of::<Self>()
    }

    fn pointee(&self) -> Option<&dyn SszValue> {
        Some(&**self as &dyn SszValue)
    }
}

impl<T: SszType> SszType for Arc<T> {
    fn shape() -> Shape {
        Shape::Pointer {
            elem: T::desc(),
            zero: None,
        }
    }
}

impl<T: SszType> SszValue for Arc<T> {
    fn type_desc(&self) -> TypeDesc {
        TypeDesc::of::<Self>()
    }

    fn pointee(&self) -> Option<&dyn SszValue> {
        Some(&**self as &dyn SszValue)
    }
}
