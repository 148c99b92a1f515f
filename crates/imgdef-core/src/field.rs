//! # Field Metadata: Compile-Time Registered Struct Descriptions
//!
//! Every configuration struct describes its own fields through a static
//! table of [`FieldDescriptor`]s plus an accessor that hands out the
//! addressable location of each field. The walker consults only these two
//! things; it never inspects a type any other way.
//!
//! ## Field Shapes
//!
//! - **Leaf**: a scalar the visitors act on (`String`, `bool`, integers,
//!   floats, `Option` of those, string maps).
//! - **Struct**: a pointer to a nested struct, `Box<T>` or `Option<Box<T>>`.
//!   `None` is an absent struct and is skipped.
//! - **Collection**: a `Vec<E>`. Elements that are (non-`None`) pointers to
//!   structs are walked; every other element is ignored.
//!
//! ## Registration
//!
//! The [`describe!`](crate::describe) macro registers a struct:
//!
//! ```
//! use imgdef_core::{describe, FieldDescriptor};
//!
//! #[derive(Default)]
//! struct Snap {
//!     name: String,
//!     channel: String,
//! }
//!
//! describe!(Snap {
//!     name => FieldDescriptor::leaf("SnapName", "name"),
//!     channel => FieldDescriptor::leaf("Channel", "channel")
//!         .omit_empty()
//!         .default_value("stable"),
//! });
//!
//! let mut snap = Snap::default();
//! imgdef_core::apply_defaults(&mut snap).unwrap();
//! assert_eq!(snap.channel, "stable");
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::schema::SchemaDescriptor;

/// Shape of a field as seen by the walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A scalar handed to the visitor.
    Leaf,
    /// A pointer to a nested struct.
    Struct,
    /// A sequence whose struct-pointer elements are walked.
    Collection,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Leaf => "leaf",
            Self::Struct => "struct",
            Self::Collection => "collection",
        })
    }
}

/// Value kind of a leaf. Only `Text` and `Bool` accept default literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    Text,
    Bool,
    Int,
    Uint,
    Float,
    Map,
}

impl LeafKind {
    /// Short lowercase name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::Map => "map",
        }
    }
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative facts about one field of a registered struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Declared (source) name, matched against the schema's required list.
    pub name: &'static str,
    /// Name the field has in the serialized document.
    pub serial_name: &'static str,
    /// Shape the walker should expect.
    pub kind: FieldKind,
    /// Literal written into the leaf when it is at its zero value.
    pub default: Option<&'static str>,
    /// Field may be left empty in the document.
    pub omit_empty: bool,
}

impl FieldDescriptor {
    const fn new(name: &'static str, serial_name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            serial_name,
            kind,
            default: None,
            omit_empty: false,
        }
    }

    /// Describe a scalar field.
    pub const fn leaf(name: &'static str, serial_name: &'static str) -> Self {
        Self::new(name, serial_name, FieldKind::Leaf)
    }

    /// Describe a pointer-to-struct field.
    pub const fn nested(name: &'static str, serial_name: &'static str) -> Self {
        Self::new(name, serial_name, FieldKind::Struct)
    }

    /// Describe a collection field.
    pub const fn collection(name: &'static str, serial_name: &'static str) -> Self {
        Self::new(name, serial_name, FieldKind::Collection)
    }

    /// Mark the field as allowed to be empty.
    pub const fn omit_empty(self) -> Self {
        Self {
            omit_empty: true,
            ..self
        }
    }

    /// Attach a default literal.
    pub const fn default_value(self, literal: &'static str) -> Self {
        Self {
            default: Some(literal),
            ..self
        }
    }

    /// Whether the field must hold a non-zero value.
    ///
    /// True when the field lacks the omit-if-empty marker or the schema
    /// lists its declared name. Either signal alone is sufficient.
    pub fn is_required(&self, schema: &SchemaDescriptor) -> bool {
        !self.omit_empty || schema.requires(self.name)
    }
}

/// Mutable access to a scalar field.
pub trait Leaf {
    /// Value kind of this leaf.
    fn kind(&self) -> LeafKind;

    /// Whether the leaf holds its type's "unset" value.
    fn is_zero(&self) -> bool;

    /// Assign a text value. Returns `false` if this leaf is not text.
    fn set_text(&mut self, _value: &str) -> bool {
        false
    }

    /// Assign a boolean value. Returns `false` if this leaf is not boolean.
    fn set_bool(&mut self, _value: bool) -> bool {
        false
    }
}

/// Addressable location of one field, produced by [`Describe::field_mut`].
pub enum FieldRef<'a> {
    Leaf(&'a mut dyn Leaf),
    /// `None` when the pointer is absent.
    Struct(Option<&'a mut dyn Describe>),
    /// One slot per element, in logical order; `None` for elements that
    /// are not present struct pointers.
    Collection(Vec<Option<&'a mut dyn Describe>>),
}

impl FieldRef<'_> {
    /// Shape of the referenced field.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Leaf(_) => FieldKind::Leaf,
            Self::Struct(_) => FieldKind::Struct,
            Self::Collection(_) => FieldKind::Collection,
        }
    }
}

impl fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(leaf) => write!(f, "Leaf({})", leaf.kind()),
            Self::Struct(node) => match node {
                Some(node) => write!(f, "Struct({})", node.type_name()),
                None => f.write_str("Struct(nil)"),
            },
            Self::Collection(elements) => write!(f, "Collection(len={})", elements.len()),
        }
    }
}

/// A struct that can describe its own fields.
///
/// Implemented by the [`describe!`](crate::describe) macro; hand-written
/// implementations must keep `fields()` and `field_mut()` in step.
pub trait Describe {
    /// Name reported as the parent of missing fields.
    fn type_name(&self) -> &'static str;

    /// Field table in declared order.
    fn fields(&self) -> &'static [FieldDescriptor];

    /// Location of the field at `index` in [`fields`](Describe::fields).
    fn field_mut(&mut self, index: usize) -> Option<FieldRef<'_>>;
}

/// Conversion of a struct field into its [`FieldRef`].
pub trait AsField {
    fn as_field(&mut self) -> FieldRef<'_>;
}

/// Element of a collection field.
pub trait Element {
    /// The element as a struct, if it is a present struct pointer.
    fn as_node(&mut self) -> Option<&mut dyn Describe>;
}

/// Anything the entry points accept as a traversal root.
///
/// Only values that resolve to a struct can be walked; everything else is
/// rejected with [`CoreError::InvalidArgument`](crate::CoreError::InvalidArgument).
pub trait Root {
    /// The value as a struct, if it is one.
    fn as_struct(&mut self) -> Option<&mut dyn Describe>;

    /// Short description of the value's shape, for error messages.
    fn shape(&self) -> &'static str;
}

impl<'a> Root for dyn Describe + 'a {
    fn as_struct(&mut self) -> Option<&mut dyn Describe> {
        Some(self)
    }

    fn shape(&self) -> &'static str {
        "struct"
    }
}

impl<T: Describe> Root for Box<T> {
    fn as_struct(&mut self) -> Option<&mut dyn Describe> {
        Some(&mut **self as &mut dyn Describe)
    }

    fn shape(&self) -> &'static str {
        "pointer"
    }
}

impl<T: Describe> Root for Option<Box<T>> {
    fn as_struct(&mut self) -> Option<&mut dyn Describe> {
        self.as_deref_mut().map(|node| node as &mut dyn Describe)
    }

    fn shape(&self) -> &'static str {
        if self.is_some() {
            "pointer"
        } else {
            "nil pointer"
        }
    }
}

impl<E: Element> Root for Vec<E> {
    fn as_struct(&mut self) -> Option<&mut dyn Describe> {
        None
    }

    fn shape(&self) -> &'static str {
        "collection"
    }
}

impl<T: Describe> AsField for Box<T> {
    fn as_field(&mut self) -> FieldRef<'_> {
        FieldRef::Struct(Some(&mut **self as &mut dyn Describe))
    }
}

impl<T: Describe> AsField for Option<Box<T>> {
    fn as_field(&mut self) -> FieldRef<'_> {
        FieldRef::Struct(self.as_deref_mut().map(|node| node as &mut dyn Describe))
    }
}

impl<E: Element> AsField for Vec<E> {
    fn as_field(&mut self) -> FieldRef<'_> {
        FieldRef::Collection(self.iter_mut().map(Element::as_node).collect())
    }
}

impl<T: Describe> Element for Box<T> {
    fn as_node(&mut self) -> Option<&mut dyn Describe> {
        Some(&mut **self as &mut dyn Describe)
    }
}

impl<T: Describe> Element for Option<Box<T>> {
    fn as_node(&mut self) -> Option<&mut dyn Describe> {
        self.as_deref_mut().map(|node| node as &mut dyn Describe)
    }
}

/// Shared impls for every scalar leaf type: a field, an ignored
/// collection element, and a rejected root.
macro_rules! scalar_field {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl AsField for $ty {
            fn as_field(&mut self) -> FieldRef<'_> {
                FieldRef::Leaf(self)
            }
        }

        impl Element for $ty {
            fn as_node(&mut self) -> Option<&mut dyn Describe> {
                None
            }
        }

        impl Root for $ty {
            fn as_struct(&mut self) -> Option<&mut dyn Describe> {
                None
            }

            fn shape(&self) -> &'static str {
                LeafKind::$kind.as_str()
            }
        }
    )*};
}

macro_rules! numeric_leaf {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Leaf for $ty {
            fn kind(&self) -> LeafKind {
                LeafKind::$kind
            }

            fn is_zero(&self) -> bool {
                *self == <$ty>::default()
            }
        }

        impl Leaf for Option<$ty> {
            fn kind(&self) -> LeafKind {
                LeafKind::$kind
            }

            fn is_zero(&self) -> bool {
                self.is_none()
            }
        }

        scalar_field!($ty => $kind, Option<$ty> => $kind);
    )*};
}

numeric_leaf!(
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    isize => Int,
    u8 => Uint,
    u16 => Uint,
    u32 => Uint,
    u64 => Uint,
    usize => Uint,
    f32 => Float,
    f64 => Float,
);

impl Leaf for String {
    fn kind(&self) -> LeafKind {
        LeafKind::Text
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn set_text(&mut self, value: &str) -> bool {
        value.clone_into(self);
        true
    }
}

impl Leaf for Option<String> {
    fn kind(&self) -> LeafKind {
        LeafKind::Text
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn set_text(&mut self, value: &str) -> bool {
        *self = Some(value.to_owned());
        true
    }
}

impl Leaf for bool {
    fn kind(&self) -> LeafKind {
        LeafKind::Bool
    }

    fn is_zero(&self) -> bool {
        !*self
    }

    fn set_bool(&mut self, value: bool) -> bool {
        *self = value;
        true
    }
}

impl Leaf for Option<bool> {
    fn kind(&self) -> LeafKind {
        LeafKind::Bool
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn set_bool(&mut self, value: bool) -> bool {
        *self = Some(value);
        true
    }
}

impl Leaf for HashMap<String, String> {
    fn kind(&self) -> LeafKind {
        LeafKind::Map
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Leaf for BTreeMap<String, String> {
    fn kind(&self) -> LeafKind {
        LeafKind::Map
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

scalar_field!(
    String => Text,
    Option<String> => Text,
    bool => Bool,
    Option<bool> => Bool,
    HashMap<String, String> => Map,
    BTreeMap<String, String> => Map,
);

/// Register a struct's field table and accessor.
///
/// Each entry pairs a struct field with its [`FieldDescriptor`]; entries
/// are walked in the order written. The type name reported in validation
/// errors is the struct's identifier.
#[macro_export]
macro_rules! describe {
    ($ty:ident { $($field:ident => $descriptor:expr),+ $(,)? }) => {
        impl $crate::Describe for $ty {
            fn type_name(&self) -> &'static str {
                ::core::stringify!($ty)
            }

            fn fields(&self) -> &'static [$crate::FieldDescriptor] {
                const FIELDS: &[$crate::FieldDescriptor] = &[$($descriptor),+];
                FIELDS
            }

            fn field_mut(
                &mut self,
                index: usize,
            ) -> ::core::option::Option<$crate::FieldRef<'_>> {
                let mut _position = 0usize;
                $(
                    if index == _position {
                        return ::core::option::Option::Some(
                            $crate::AsField::as_field(&mut self.$field),
                        );
                    }
                    _position += 1;
                )+
                ::core::option::Option::None
            }
        }

        impl $crate::Root for $ty {
            fn as_struct(&mut self) -> ::core::option::Option<&mut dyn $crate::Describe> {
                ::core::option::Option::Some(self as &mut dyn $crate::Describe)
            }

            fn shape(&self) -> &'static str {
                "struct"
            }
        }
    };
}
