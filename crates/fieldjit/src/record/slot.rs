// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Unboxed field storage and boxing helpers.
//!
//! Both the reflective and the specialized access paths convert through the
//! functions in this module, so a value written through one path reads back
//! identically through the other.
//!
//! Numeric kinds accept any numeric value and narrow it with `as` semantics
//! (integers wrap, floats truncate toward zero and saturate). `bool` and
//! `char` only accept their own kind.

use super::{FieldKind, FieldValue, PrimitiveKind};
use crate::error::{Error, Result};

/// Storage cell of one record field.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Char(char),
    /// Reference field; may hold `FieldValue::Null`.
    Ref(FieldValue),
}

impl Slot {
    /// Initial content of a freshly created field: zero for primitives,
    /// null for references.
    pub fn zeroed(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Primitive(p) => match p {
                PrimitiveKind::Bool => Self::Bool(false),
                PrimitiveKind::I8 => Self::I8(0),
                PrimitiveKind::I16 => Self::I16(0),
                PrimitiveKind::I32 => Self::I32(0),
                PrimitiveKind::I64 => Self::I64(0),
                PrimitiveKind::F32 => Self::F32(0.0),
                PrimitiveKind::F64 => Self::F64(0.0),
                PrimitiveKind::Char => Self::Char('\0'),
            },
            _ => Self::Ref(FieldValue::Null),
        }
    }

    /// Boxes the slot content.
    pub fn boxed(&self) -> FieldValue {
        match self {
            Self::Bool(v) => FieldValue::Bool(*v),
            Self::I8(v) => FieldValue::I8(*v),
            Self::I16(v) => FieldValue::I16(*v),
            Self::I32(v) => FieldValue::I32(*v),
            Self::I64(v) => FieldValue::I64(*v),
            Self::F32(v) => FieldValue::F32(*v),
            Self::F64(v) => FieldValue::F64(*v),
            Self::Char(v) => FieldValue::Char(*v),
            Self::Ref(v) => v.clone(),
        }
    }
}

/// Converts `value` into the storage form for a field of `kind`.
///
/// Fails with [`Error::TypeMismatch`] when the value is not assignable,
/// including `Null` for a primitive field.
pub fn unbox(kind: &FieldKind, value: FieldValue) -> Result<Slot> {
    match kind {
        FieldKind::Primitive(p) => unbox_primitive(*p, value),
        _ if value.fits_reference(kind) => Ok(Slot::Ref(value)),
        _ => Err(mismatch(kind.canonical_name(), &value)),
    }
}

/// Unboxes `value` into a primitive slot of kind `p`.
pub fn unbox_primitive(p: PrimitiveKind, value: FieldValue) -> Result<Slot> {
    Ok(match p {
        PrimitiveKind::Bool => Slot::Bool(unbox_bool(value)?),
        PrimitiveKind::I8 => Slot::I8(unbox_i8(value)?),
        PrimitiveKind::I16 => Slot::I16(unbox_i16(value)?),
        PrimitiveKind::I32 => Slot::I32(unbox_i32(value)?),
        PrimitiveKind::I64 => Slot::I64(unbox_i64(value)?),
        PrimitiveKind::F32 => Slot::F32(unbox_f32(value)?),
        PrimitiveKind::F64 => Slot::F64(unbox_f64(value)?),
        PrimitiveKind::Char => Slot::Char(unbox_char(value)?),
    })
}

fn mismatch(expected: impl Into<String>, found: &FieldValue) -> Error {
    Error::TypeMismatch {
        expected: expected.into(),
        found: found.type_label(),
    }
}

/// Widened numeric view used by the narrowing helpers.
enum Number {
    Int(i64),
    Float(f64),
}

fn number(value: &FieldValue) -> Option<Number> {
    Some(match *value {
        FieldValue::I8(v) => Number::Int(i64::from(v)),
        FieldValue::I16(v) => Number::Int(i64::from(v)),
        FieldValue::I32(v) => Number::Int(i64::from(v)),
        FieldValue::I64(v) => Number::Int(v),
        FieldValue::F32(v) => Number::Float(f64::from(v)),
        FieldValue::F64(v) => Number::Float(v),
        _ => return None,
    })
}

macro_rules! numeric_unboxer {
    ($(#[$meta:meta])* $name:ident -> $ty:ty) => {
        $(#[$meta])*
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        pub fn $name(value: FieldValue) -> Result<$ty> {
            match number(&value) {
                Some(Number::Int(v)) => Ok(v as $ty),
                Some(Number::Float(v)) => Ok(v as $ty),
                None => Err(mismatch(stringify!($ty), &value)),
            }
        }
    };
}

numeric_unboxer!(unbox_i8 -> i8);
numeric_unboxer!(unbox_i16 -> i16);
numeric_unboxer!(unbox_i32 -> i32);
numeric_unboxer!(unbox_i64 -> i64);
numeric_unboxer!(unbox_f32 -> f32);
numeric_unboxer!(unbox_f64 -> f64);

pub fn unbox_bool(value: FieldValue) -> Result<bool> {
    match value {
        FieldValue::Bool(v) => Ok(v),
        other => Err(mismatch("bool", &other)),
    }
}

pub fn unbox_char(value: FieldValue) -> Result<char> {
    match value {
        FieldValue::Char(v) => Ok(v),
        other => Err(mismatch("char", &other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_narrowing_wraps() {
        assert_eq!(unbox_i8(FieldValue::I32(300)).expect("narrow"), 44);
        assert_eq!(unbox_i32(FieldValue::I64(i64::from(i32::MAX) + 1)).expect("narrow"), i32::MIN);
        assert_eq!(unbox_i16(FieldValue::F64(-2.9)).expect("truncate"), -2);
    }

    #[test]
    fn test_null_never_unboxes_into_primitive() {
        let err = unbox(&FieldKind::Primitive(PrimitiveKind::I32), FieldValue::Null)
            .expect_err("null primitive");
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_bool_and_char_are_exact() {
        assert!(unbox_bool(FieldValue::I32(1)).is_err());
        assert!(unbox_char(FieldValue::I32(65)).is_err());
        assert_eq!(unbox_char(FieldValue::Char('x')).expect("char"), 'x');
    }

    #[test]
    fn test_reference_fields_keep_value() {
        let slot = unbox(&FieldKind::String, FieldValue::from("hi")).expect("string");
        assert_eq!(slot.boxed(), FieldValue::from("hi"));

        let slot = unbox(&FieldKind::Boxed(PrimitiveKind::I64), FieldValue::Null).expect("null");
        assert_eq!(slot, Slot::Ref(FieldValue::Null));

        assert!(unbox(&FieldKind::String, FieldValue::I32(1)).is_err());
    }

    #[test]
    fn test_zeroed_slots() {
        assert_eq!(Slot::zeroed(&FieldKind::Primitive(PrimitiveKind::F64)), Slot::F64(0.0));
        assert_eq!(Slot::zeroed(&FieldKind::String), Slot::Ref(FieldValue::Null));
    }
}
