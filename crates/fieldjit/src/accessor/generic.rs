// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reflective field accessor.
//!
//! A [`GenericAccessor`] exposes the fields of a record type as an ordered,
//! indexable sequence. Every read or write resolves the field by
//! `(declaring type, name)` against the bound record's type, then boxes or
//! unboxes through [`crate::record::slot`]. This is the baseline that
//! specialized accessors must match value for value.

use super::convert::ValueConverter;
use super::defaults::{is_rich_text_array, DefaultInstances};
use super::{AccessSnapshot, AccessStats, FieldAccess};
use crate::error::{Error, Result};
use crate::record::slot::unbox;
use crate::record::{FieldDescriptor, FieldKind, FieldValue, Record, RecordType, SharedRecord};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

/// Restricts an accessor to fields of one kind.
///
/// Filters always apply to the full field list of the record type, so a
/// `(record type, filter)` pair determines the exposed fields exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FieldFilter {
    #[default]
    Any,
    Exact(FieldKind),
}

impl FieldFilter {
    pub fn matches(&self, kind: &FieldKind) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => expected == kind,
        }
    }
}

impl fmt::Display for FieldFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Exact(kind) => write!(f, "{}", kind),
        }
    }
}

/// Reflective handle on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccessor {
    field: FieldDescriptor,
}

impl FieldAccessor {
    pub fn new(field: FieldDescriptor) -> Self {
        Self { field }
    }

    pub fn field(&self) -> &FieldDescriptor {
        &self.field
    }

    pub fn get(&self, record: &Record) -> Result<FieldValue> {
        let offset = self.locate(record)?;
        record
            .slot(offset)
            .map(|slot| slot.boxed())
            .ok_or_else(|| Error::FieldNotFound(self.field.name.clone()))
    }

    pub fn set(&self, record: &mut Record, value: FieldValue) -> Result<()> {
        let offset = self.locate(record)?;
        let slot = unbox(&self.field.kind, value)?;
        match record.slot_mut(offset) {
            Some(cell) => {
                *cell = slot;
                Ok(())
            }
            None => Err(Error::FieldNotFound(self.field.name.clone())),
        }
    }

    fn locate(&self, record: &Record) -> Result<usize> {
        record
            .record_type()
            .slot_of(&self.field.declaring_type, &self.field.name)
            .ok_or_else(|| Error::FieldNotFound(self.field.name.clone()))
    }
}

/// Field list of one filter, computed once per accessor family.
#[derive(Debug)]
struct Shape {
    filter: FieldFilter,
    fields: Vec<FieldAccessor>,
    default_fields: Vec<usize>,
}

impl Shape {
    fn build(record_type: &RecordType, filter: FieldFilter, defaults: &DefaultInstances) -> Self {
        let fields: Vec<FieldAccessor> = record_type
            .fields()
            .iter()
            .filter(|f| !f.is_static && filter.matches(&f.kind))
            .cloned()
            .map(FieldAccessor::new)
            .collect();

        let default_fields = fields
            .iter()
            .enumerate()
            .filter(|(_, a)| {
                let field = a.field();
                !field.kind.is_primitive() && !field.is_final && defaults.has_default(&field.kind)
            })
            .map(|(index, _)| index)
            .collect();

        Self {
            filter,
            fields,
            default_fields,
        }
    }
}

/// State shared by every accessor derived from one `GenericAccessor::new`.
struct Family {
    record_type: Arc<RecordType>,
    defaults: Arc<DefaultInstances>,
    shapes: DashMap<FieldFilter, Arc<Shape>>,
    stats: AccessStats,
}

impl Family {
    fn shape(&self, filter: &FieldFilter) -> Arc<Shape> {
        if let Some(shape) = self.shapes.get(filter) {
            return Arc::clone(shape.value());
        }
        let entry = self.shapes.entry(filter.clone()).or_insert_with(|| {
            Arc::new(Shape::build(&self.record_type, filter.clone(), &self.defaults))
        });
        Arc::clone(entry.value())
    }
}

/// Introspection-based accessor over the fields of one record type.
///
/// Accessors are cheap to clone. Binding a record with
/// [`with_target`](Self::with_target) or restricting the fields with
/// [`with_type`](Self::with_type) returns a new accessor; the original is
/// left untouched.
#[derive(Clone)]
pub struct GenericAccessor {
    family: Arc<Family>,
    shape: Arc<Shape>,
    converter: Option<Arc<dyn ValueConverter>>,
    target: Option<SharedRecord>,
}

impl GenericAccessor {
    /// Accessor over every non-static field of `record_type`.
    pub fn new(record_type: Arc<RecordType>) -> Self {
        Self::with_instances(record_type, DefaultInstances::standard())
    }

    /// Same as [`new`](Self::new) with custom default generation.
    pub fn with_instances(record_type: Arc<RecordType>, defaults: Arc<DefaultInstances>) -> Self {
        let family = Arc::new(Family {
            record_type,
            defaults,
            shapes: DashMap::new(),
            stats: AccessStats::default(),
        });
        let shape = family.shape(&FieldFilter::Any);
        Self {
            family,
            shape,
            converter: None,
            target: None,
        }
    }

    /// Accessor restricted to the fields matching `filter`, bound to the same
    /// record and without a converter.
    pub fn with_type(&self, filter: FieldFilter) -> Self {
        Self {
            family: Arc::clone(&self.family),
            shape: self.family.shape(&filter),
            converter: None,
            target: self.target.clone(),
        }
    }

    pub fn with_converter(&self, converter: Arc<dyn ValueConverter>) -> Self {
        Self {
            converter: Some(converter),
            ..self.clone()
        }
    }

    /// Copy of this accessor bound to `record`.
    pub fn with_target(&self, record: SharedRecord) -> Result<Self> {
        {
            let bound = record.read();
            let found = bound.record_type();
            let expected = &self.family.record_type;
            if !Arc::ptr_eq(found, expected) && **found != **expected {
                return Err(Error::TargetMismatch {
                    expected: expected.name().clone(),
                    found: found.name().clone(),
                });
            }
        }
        Ok(Self {
            target: Some(record),
            ..self.clone()
        })
    }

    pub fn target(&self) -> Option<&SharedRecord> {
        self.target.as_ref()
    }

    pub fn target_type(&self) -> &Arc<RecordType> {
        &self.family.record_type
    }

    pub fn field_filter(&self) -> &FieldFilter {
        &self.shape.filter
    }

    pub fn fields(&self) -> &[FieldAccessor] {
        &self.shape.fields
    }

    /// Indices of the fields that receive a generated default.
    pub fn default_fields(&self) -> &[usize] {
        &self.shape.default_fields
    }

    pub fn default_instances(&self) -> &Arc<DefaultInstances> {
        &self.family.defaults
    }

    pub fn converter(&self) -> Option<&Arc<dyn ValueConverter>> {
        self.converter.as_ref()
    }

    pub fn size(&self) -> usize {
        self.shape.fields.len()
    }

    /// Reflective access counters of the whole accessor family.
    pub fn stats(&self) -> AccessSnapshot {
        self.family.stats.snapshot()
    }

    /// Read field `index`, converted for the caller.
    pub fn read(&self, index: usize) -> Result<FieldValue> {
        let value = self.read_raw(index)?;
        match &self.converter {
            Some(converter) => converter.to_specific(value),
            None => Ok(value),
        }
    }

    /// Like [`read`](Self::read), but `None` when `index` is out of range.
    pub fn read_safely(&self, index: usize) -> Result<Option<FieldValue>> {
        if index < self.size() {
            self.read(index).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Write field `index` after converting the caller's value.
    pub fn write(&self, index: usize, value: FieldValue) -> Result<&Self> {
        let value = match &self.converter {
            Some(converter) => converter.to_generic(value)?,
            None => value,
        };
        self.write_raw(index, value)?;
        Ok(self)
    }

    /// Like [`write`](Self::write), but ignores an out of range `index`.
    pub fn write_safely(&self, index: usize, value: FieldValue) -> Result<&Self> {
        if index < self.size() {
            self.write(index, value)
        } else {
            Ok(self)
        }
    }

    /// Replace field `index` with `f(current)`.
    pub fn modify<F>(&self, index: usize, f: F) -> Result<&Self>
    where
        F: FnOnce(FieldValue) -> FieldValue,
    {
        let current = self.read(index)?;
        self.write(index, f(current))
    }

    /// Every field value, in index order.
    pub fn values(&self) -> Result<Vec<FieldValue>> {
        (0..self.size()).map(|index| self.read(index)).collect()
    }

    /// Fill every default field with a freshly generated default.
    pub fn write_defaults(&self) -> Result<&Self> {
        for &index in self.default_fields() {
            let value = self.default_value(index);
            self.write_raw(index, value)?;
        }
        Ok(self)
    }

    /// Default written into field `index` by `write_defaults`.
    pub(crate) fn default_value(&self, index: usize) -> FieldValue {
        let kind = &self.shape.fields[index].field().kind;
        if is_rich_text_array(kind) {
            return FieldValue::Null;
        }
        self.family
            .defaults
            .get_default(kind)
            .unwrap_or(FieldValue::Null)
    }

    /// Reflective read without the converter.
    pub(crate) fn read_raw(&self, index: usize) -> Result<FieldValue> {
        let accessor = self.field_at(index)?;
        let target = self.target.as_ref().ok_or(Error::NoTarget)?;
        self.family.stats.record_read();
        let record = target.read();
        accessor.get(&record)
    }

    /// Reflective write without the converter.
    pub(crate) fn write_raw(&self, index: usize, value: FieldValue) -> Result<()> {
        let accessor = self.field_at(index)?;
        let target = self.target.as_ref().ok_or(Error::NoTarget)?;
        self.family.stats.record_write();
        let mut record = target.write();
        accessor.set(&mut record, value)
    }

    fn field_at(&self, index: usize) -> Result<&FieldAccessor> {
        self.shape.fields.get(index).ok_or(Error::IndexOutOfRange {
            index,
            length: self.shape.fields.len(),
        })
    }

    /// One-line description used as report context.
    pub fn describe(&self) -> String {
        format!(
            "GenericAccessor[type={}, filter={}, fields={}, converter={}, bound={}]",
            self.family.record_type.name(),
            self.shape.filter,
            self.size(),
            self.converter.as_ref().map_or("none", |c| c.name()),
            self.target.is_some()
        )
    }
}

impl fmt::Debug for GenericAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl FieldAccess for GenericAccessor {
    fn size(&self) -> usize {
        GenericAccessor::size(self)
    }

    fn read(&self, index: usize) -> Result<FieldValue> {
        GenericAccessor::read(self, index)
    }

    fn write(&self, index: usize, value: FieldValue) -> Result<()> {
        GenericAccessor::write(self, index, value).map(|_| ())
    }

    fn write_defaults(&self) -> Result<()> {
        GenericAccessor::write_defaults(self).map(|_| ())
    }

    fn retarget(&self, record: SharedRecord) -> Result<Box<dyn FieldAccess>> {
        Ok(Box::new(self.with_target(record)?))
    }

    fn is_specialized(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::FnConverter;
    use crate::record::{PrimitiveKind, RecordTypeBuilder, Visibility};

    fn entity() -> Arc<RecordType> {
        RecordTypeBuilder::new("game.Entity")
            .field("id", FieldKind::Primitive(PrimitiveKind::I32))
            .field("name", FieldKind::String)
            .private_field("health", FieldKind::Boxed(PrimitiveKind::F32))
            .static_field("COUNT", FieldKind::Primitive(PrimitiveKind::I64))
            .final_field("tags", FieldKind::list_of(FieldKind::String))
            .inherited_field(
                "owner",
                FieldKind::String,
                Visibility::Package,
                "game.base.Owned",
            )
            .build_shared()
    }

    fn bound() -> GenericAccessor {
        let ty = entity();
        GenericAccessor::new(Arc::clone(&ty))
            .with_target(Record::new(&ty).shared())
            .expect("bind")
    }

    #[test]
    fn test_static_fields_are_skipped() {
        let accessor = GenericAccessor::new(entity());
        let names: Vec<_> = accessor
            .fields()
            .iter()
            .map(|f| f.field().name.as_str())
            .collect();
        assert_eq!(names, ["id", "name", "health", "tags", "owner"]);
    }

    #[test]
    fn test_default_fields_exclude_primitives_and_finals() {
        let accessor = GenericAccessor::new(entity());
        assert_eq!(accessor.default_fields(), &[1, 2, 4]);
    }

    #[test]
    fn test_read_write() {
        let accessor = bound();
        accessor
            .write(0, FieldValue::I32(5))
            .expect("write id")
            .write(4, FieldValue::from("alex"))
            .expect("write owner");

        assert_eq!(accessor.read(0).expect("id"), FieldValue::I32(5));
        assert_eq!(accessor.read(4).expect("owner"), FieldValue::from("alex"));
        assert_eq!(accessor.stats().reflective_reads, 2);
        assert_eq!(accessor.stats().reflective_writes, 2);
    }

    #[test]
    fn test_unbound_accessor_fails() {
        let accessor = GenericAccessor::new(entity());
        assert!(matches!(accessor.read(0), Err(Error::NoTarget)));
        assert!(matches!(
            accessor.write(0, FieldValue::I32(1)),
            Err(Error::NoTarget)
        ));
    }

    #[test]
    fn test_index_out_of_range() {
        let accessor = bound();
        assert!(matches!(
            accessor.read(5),
            Err(Error::IndexOutOfRange { index: 5, length: 5 })
        ));
        assert!(matches!(
            accessor.read(usize::MAX),
            Err(Error::IndexOutOfRange { .. })
        ));
        assert_eq!(accessor.read_safely(5).expect("safe read"), None);
        accessor
            .write_safely(9, FieldValue::I32(1))
            .expect("safe write ignored");
    }

    #[test]
    fn test_with_target_rejects_other_type() {
        let other = RecordTypeBuilder::new("game.Block")
            .field("id", FieldKind::Primitive(PrimitiveKind::I32))
            .build_shared();
        let err = GenericAccessor::new(entity())
            .with_target(Record::new(&other).shared())
            .expect_err("mismatch");
        assert!(matches!(err, Error::TargetMismatch { .. }));
    }

    #[test]
    fn test_with_type_filters_and_keeps_target() {
        let accessor = bound();
        accessor.write(1, FieldValue::from("zed")).expect("write");

        let strings = accessor.with_type(FieldFilter::Exact(FieldKind::String));
        assert_eq!(strings.size(), 2);
        assert_eq!(strings.read(0).expect("name"), FieldValue::from("zed"));

        let again = accessor.with_type(FieldFilter::Exact(FieldKind::String));
        assert!(Arc::ptr_eq(&strings.shape, &again.shape));
    }

    #[test]
    fn test_converter_applies_once() {
        let doubling = Arc::new(FnConverter::new(
            "double",
            |v: FieldValue| Ok(FieldValue::I32(v.as_i32().unwrap_or(0) * 2)),
            |v: FieldValue| Ok(FieldValue::I32(v.as_i32().unwrap_or(0) / 2)),
        ));
        let ints = bound()
            .with_type(FieldFilter::Exact(FieldKind::Primitive(PrimitiveKind::I32)))
            .with_converter(doubling);

        ints.write(0, FieldValue::I32(10)).expect("write");
        assert_eq!(ints.read(0).expect("read"), FieldValue::I32(10));
        let raw = ints.with_type(FieldFilter::Exact(FieldKind::Primitive(PrimitiveKind::I32)));
        assert_eq!(raw.read(0).expect("raw"), FieldValue::I32(5));
    }

    #[test]
    fn test_modify_and_values() {
        let accessor = bound();
        accessor
            .modify(0, |v| FieldValue::I32(v.as_i32().unwrap_or(0) + 7))
            .expect("modify");
        let values = accessor.values().expect("values");
        assert_eq!(values.len(), 5);
        assert_eq!(values[0], FieldValue::I32(7));
    }

    #[test]
    fn test_write_defaults() {
        let accessor = bound();
        accessor.write_defaults().expect("defaults");
        assert_eq!(accessor.read(1).expect("name"), FieldValue::String(String::new()));
        assert_eq!(accessor.read(2).expect("health"), FieldValue::F32(0.0));
        assert_eq!(accessor.read(3).expect("tags"), FieldValue::Null);
    }
}
