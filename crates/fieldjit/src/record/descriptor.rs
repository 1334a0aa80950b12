// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record type descriptors.
//!
//! A [`RecordType`] lists every field an instance carries, including fields
//! inherited from other declaring types, in declaration order. Each field is
//! described by a [`FieldDescriptor`] which records its [`FieldKind`], its
//! [`Visibility`] and the type that declared it.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Primitive field kinds, stored unboxed inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Char,
}

impl PrimitiveKind {
    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
        }
    }

    /// Returns true for the integer kinds.
    pub const fn is_integral(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Returns true for any numeric kind.
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::F32 | Self::F64
        )
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fully qualified name of a record or object type.
///
/// Namespaces are separated by `.`; the namespace of `game.Player` is `game`
/// and a name without any `.` lives in the root namespace (`""`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName(Arc<str>);

impl TypeName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Namespace part of the name, empty for the root namespace.
    pub fn namespace(&self) -> &str {
        self.0.rsplit_once('.').map_or("", |(ns, _)| ns)
    }

    /// Name without its namespace.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit_once('.').map_or(&*self.0, |(_, name)| name)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Declared kind of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Unboxed primitive, never null.
    Primitive(PrimitiveKind),
    /// Nullable boxed primitive.
    Boxed(PrimitiveKind),
    String,
    Array(Box<FieldKind>),
    List(Box<FieldKind>),
    /// Externally defined type, carried opaquely.
    Object(TypeName),
}

impl FieldKind {
    pub fn array_of(element: FieldKind) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn list_of(element: FieldKind) -> Self {
        Self::List(Box::new(element))
    }

    pub fn object(name: impl Into<TypeName>) -> Self {
        Self::Object(name.into())
    }

    pub const fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    /// Renders the kind as `i32`, `i32?`, `string`, `game.Item[]` or
    /// `list<string>`.
    pub fn canonical_name(&self) -> String {
        match self {
            Self::Primitive(p) => p.name().to_string(),
            Self::Boxed(p) => format!("{}?", p.name()),
            Self::String => "string".to_string(),
            Self::Array(element) => format!("{}[]", element.canonical_name()),
            Self::List(element) => format!("list<{}>", element.canonical_name()),
            Self::Object(name) => name.to_string(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

/// Field visibility, as declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    /// Visible inside the declaring namespace only.
    Package,
    Private,
}

/// Describes one field of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub visibility: Visibility,
    /// Type that declared the field (may differ from the owning record type
    /// for inherited fields).
    pub declaring_type: TypeName,
    pub is_static: bool,
    pub is_final: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind, declaring_type: TypeName) -> Self {
        Self {
            name: name.into(),
            kind,
            visibility: Visibility::Public,
            declaring_type,
            is_static: false,
            is_final: false,
        }
    }
}

/// Record type: a name and its fields in declaration order.
///
/// Field order is the slot order of every [`Record`](super::Record) built
/// from this type.
///
/// Equality and hashing cover the whole layout, not just the name: two types
/// that share a name but differ in their fields are distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordType {
    name: TypeName,
    fields: Vec<FieldDescriptor>,
    /// Hash of `fields`, computed once.
    layout: u64,
}

impl RecordType {
    pub fn new(name: impl Into<TypeName>, fields: Vec<FieldDescriptor>) -> Self {
        let mut hasher = DefaultHasher::new();
        fields.hash(&mut hasher);
        Self {
            name: name.into(),
            fields,
            layout: hasher.finish(),
        }
    }

    pub fn name(&self) -> &TypeName {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Fingerprint of the field list. Equal layouts have equal fingerprints.
    pub fn layout_hash(&self) -> u64 {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Slot of the field `name` declared by `declaring_type`.
    ///
    /// Inherited fields may shadow each other by name, so both parts are
    /// needed to identify a slot.
    pub fn slot_of(&self, declaring_type: &TypeName, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name == name && &f.declaring_type == declaring_type)
    }

    /// Slot of the first field called `name`, whoever declared it.
    pub fn slot_by_name(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

impl Hash for RecordType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.layout.hash(state);
    }
}
