// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dispatch table synthesis.
//!
//! A specialized accessor is a table with one route per field index. Direct
//! routes hold a getter and a setter closure that capture the slot offset and
//! the storage variant, so a call does no name lookup and no kind dispatch.
//! Delegate routes hand the call back to the generic accessor.

use super::access::{AccessClass, FieldSlot};
use super::key::SpecializationKey;
use crate::accessor::GenericAccessor;
use crate::error::{Error, Result};
use crate::record::slot::{
    unbox_bool, unbox_char, unbox_f32, unbox_f64, unbox_i16, unbox_i32, unbox_i64, unbox_i8,
};
use crate::record::{FieldKind, FieldValue, PrimitiveKind, Record, Slot};
use std::fmt;

pub(crate) type Getter = Box<dyn Fn(&Record) -> Result<FieldValue> + Send + Sync>;
pub(crate) type Setter = Box<dyn Fn(&mut Record, FieldValue) -> Result<()> + Send + Sync>;

/// How one field index is served.
pub(crate) enum Route {
    Direct { getter: Getter, setter: Setter },
    Delegate,
}

/// Synthesized dispatch table, ready to be defined as a type.
pub struct SpecializedDefinition {
    key: SpecializationKey,
    slots: Vec<FieldSlot>,
    routes: Vec<Route>,
}

impl SpecializedDefinition {
    pub fn key(&self) -> &SpecializationKey {
        &self.key
    }

    pub fn slots(&self) -> &[FieldSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of fields served without the generic accessor.
    pub fn direct_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.access == AccessClass::Direct)
            .count()
    }

    pub(crate) fn route(&self, index: usize) -> Option<&Route> {
        self.routes.get(index)
    }
}

impl fmt::Debug for SpecializedDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecializedDefinition")
            .field("key", &self.key)
            .field("slots", &self.slots)
            .finish()
    }
}

/// Build the dispatch table for `source`, preserving its field order.
pub(crate) fn synthesize(key: SpecializationKey, source: &GenericAccessor) -> Result<SpecializedDefinition> {
    let host = source.target_type();
    let mut slots = Vec::with_capacity(source.size());
    let mut routes = Vec::with_capacity(source.size());

    for (index, accessor) in source.fields().iter().enumerate() {
        let slot = FieldSlot::resolve(index, host, accessor)?;
        let route = match slot.access {
            AccessClass::Direct => Route::Direct {
                getter: getter(&slot),
                setter: setter(&slot),
            },
            AccessClass::ReflectionOnly => Route::Delegate,
        };
        slots.push(slot);
        routes.push(route);
    }

    Ok(SpecializedDefinition { key, slots, routes })
}

fn corrupt(offset: usize, expected: &str, found: Option<&Slot>) -> Error {
    Error::TypeMismatch {
        expected: format!("{} in slot {}", expected, offset),
        found: found.map_or_else(|| "missing slot".to_string(), |s| s.boxed().type_label()),
    }
}

macro_rules! primitive_getter {
    ($offset:expr, $variant:ident, $name:literal) => {{
        let offset = $offset;
        Box::new(move |record: &Record| match record.slot(offset) {
            Some(Slot::$variant(v)) => Ok(FieldValue::$variant(*v)),
            other => Err(corrupt(offset, $name, other)),
        }) as Getter
    }};
}

macro_rules! primitive_setter {
    ($offset:expr, $variant:ident, $unbox:path) => {{
        let offset = $offset;
        Box::new(move |record: &mut Record, value: FieldValue| {
            let v = $unbox(value)?;
            match record.slot_mut(offset) {
                Some(slot) => {
                    *slot = Slot::$variant(v);
                    Ok(())
                }
                None => Err(corrupt(offset, stringify!($variant), None)),
            }
        }) as Setter
    }};
}

fn getter(slot: &FieldSlot) -> Getter {
    let offset = slot.slot;
    match slot.kind {
        FieldKind::Primitive(p) => match p {
            PrimitiveKind::Bool => primitive_getter!(offset, Bool, "bool"),
            PrimitiveKind::I8 => primitive_getter!(offset, I8, "i8"),
            PrimitiveKind::I16 => primitive_getter!(offset, I16, "i16"),
            PrimitiveKind::I32 => primitive_getter!(offset, I32, "i32"),
            PrimitiveKind::I64 => primitive_getter!(offset, I64, "i64"),
            PrimitiveKind::F32 => primitive_getter!(offset, F32, "f32"),
            PrimitiveKind::F64 => primitive_getter!(offset, F64, "f64"),
            PrimitiveKind::Char => primitive_getter!(offset, Char, "char"),
        },
        _ => Box::new(move |record: &Record| match record.slot(offset) {
            Some(Slot::Ref(value)) => Ok(value.clone()),
            other => Err(corrupt(offset, "reference", other)),
        }),
    }
}

fn setter(slot: &FieldSlot) -> Setter {
    let offset = slot.slot;
    match &slot.kind {
        FieldKind::Primitive(p) => match p {
            PrimitiveKind::Bool => primitive_setter!(offset, Bool, unbox_bool),
            PrimitiveKind::I8 => primitive_setter!(offset, I8, unbox_i8),
            PrimitiveKind::I16 => primitive_setter!(offset, I16, unbox_i16),
            PrimitiveKind::I32 => primitive_setter!(offset, I32, unbox_i32),
            PrimitiveKind::I64 => primitive_setter!(offset, I64, unbox_i64),
            PrimitiveKind::F32 => primitive_setter!(offset, F32, unbox_f32),
            PrimitiveKind::F64 => primitive_setter!(offset, F64, unbox_f64),
            PrimitiveKind::Char => primitive_setter!(offset, Char, unbox_char),
        },
        kind => {
            let kind = kind.clone();
            Box::new(move |record: &mut Record, value: FieldValue| {
                if !value.fits_reference(&kind) {
                    return Err(Error::TypeMismatch {
                        expected: kind.canonical_name(),
                        found: value.type_label(),
                    });
                }
                match record.slot_mut(offset) {
                    Some(slot) => {
                        *slot = Slot::Ref(value);
                        Ok(())
                    }
                    None => Err(corrupt(offset, "reference", None)),
                }
            })
        }
    }
}
