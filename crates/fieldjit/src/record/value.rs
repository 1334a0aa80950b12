// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Boxed field values.

use super::{FieldKind, PrimitiveKind, TypeName};

/// A boxed value as seen by accessor callers.
///
/// Primitive fields are stored unboxed inside a record and boxed into one of
/// the primitive variants on read. Reference fields hold a `FieldValue`
/// directly, `Null` included.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,

    // Primitives
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Char(char),

    // References
    String(String),
    Array(Vec<FieldValue>),
    List(Vec<FieldValue>),
    /// Instance of an externally defined type; the payload is opaque.
    Object { type_name: TypeName, payload: String },
}

impl FieldValue {
    pub fn object(type_name: impl Into<TypeName>, payload: impl Into<String>) -> Self {
        Self::Object {
            type_name: type_name.into(),
            payload: payload.into(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Primitive kind of a boxed primitive value.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        Some(match self {
            Self::Bool(_) => PrimitiveKind::Bool,
            Self::I8(_) => PrimitiveKind::I8,
            Self::I16(_) => PrimitiveKind::I16,
            Self::I32(_) => PrimitiveKind::I32,
            Self::I64(_) => PrimitiveKind::I64,
            Self::F32(_) => PrimitiveKind::F32,
            Self::F64(_) => PrimitiveKind::F64,
            Self::Char(_) => PrimitiveKind::Char,
            _ => return None,
        })
    }

    /// Short label of the runtime shape, used in mismatch errors.
    pub fn type_label(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::String(_) => "string".to_string(),
            Self::Array(_) => "array".to_string(),
            Self::List(_) => "list".to_string(),
            Self::Object { type_name, .. } => type_name.to_string(),
            other => other
                .primitive_kind()
                .map_or_else(String::new, |p| p.name().to_string()),
        }
    }

    /// Whether a field of `kind` may hold this value as a reference.
    ///
    /// Primitive kinds never accept a value here; they go through unboxing.
    pub fn fits_reference(&self, kind: &FieldKind) -> bool {
        match (kind, self) {
            (FieldKind::Primitive(_), _) => false,
            (_, Self::Null) => true,
            (FieldKind::Boxed(p), v) => v.primitive_kind() == Some(*p),
            (FieldKind::String, Self::String(_)) => true,
            (FieldKind::Array(_), Self::Array(_)) => true,
            (FieldKind::List(_), Self::List(_)) => true,
            (FieldKind::Object(expected), Self::Object { type_name, .. }) => expected == type_name,
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Elements of an array or list value.
    pub fn as_elements(&self) -> Option<&[FieldValue]> {
        match self {
            Self::Array(v) | Self::List(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from_primitive! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    char => Char,
    String => String,
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(FieldValue::from(7i32).as_i32(), Some(7));
        assert_eq!(FieldValue::from("name").as_str(), Some("name"));
        assert_eq!(FieldValue::from(None::<i32>), FieldValue::Null);
        let list = FieldValue::from(vec![1i64, 2, 3]);
        assert_eq!(list.as_elements().map(<[FieldValue]>::len), Some(3));
    }

    #[test]
    fn test_fits_reference() {
        let boxed = FieldKind::Boxed(PrimitiveKind::I32);
        assert!(FieldValue::Null.fits_reference(&boxed));
        assert!(FieldValue::I32(3).fits_reference(&boxed));
        assert!(!FieldValue::I64(3).fits_reference(&boxed));
        assert!(!FieldValue::I32(3).fits_reference(&FieldKind::Primitive(PrimitiveKind::I32)));

        let item = FieldKind::object("game.Item");
        assert!(FieldValue::object("game.Item", "sword").fits_reference(&item));
        assert!(!FieldValue::object("game.Block", "dirt").fits_reference(&item));
        assert!(!FieldValue::from("sword").fits_reference(&item));
    }

    #[test]
    fn test_type_labels() {
        assert_eq!(FieldValue::Null.type_label(), "null");
        assert_eq!(FieldValue::I16(1).type_label(), "i16");
        assert_eq!(FieldValue::object("game.Item", "").type_label(), "game.Item");
    }
}
