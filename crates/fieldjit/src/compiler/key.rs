// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Specialization keys.

use crate::accessor::{FieldFilter, GenericAccessor};
use crate::record::{RecordType, TypeName};
use std::fmt;
use std::sync::Arc;

/// Identity of one specialization: the record type and the field filter.
///
/// The record type is compared by its whole layout, so two same-named types
/// with different fields never share a synthesized type. Two accessors with
/// the same key expose the same fields in the same slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpecializationKey {
    record_type: Arc<RecordType>,
    field_filter: FieldFilter,
}

impl SpecializationKey {
    pub fn new(record_type: Arc<RecordType>, field_filter: FieldFilter) -> Self {
        Self {
            record_type,
            field_filter,
        }
    }

    pub fn for_accessor(accessor: &GenericAccessor) -> Self {
        Self::new(
            Arc::clone(accessor.target_type()),
            accessor.field_filter().clone(),
        )
    }

    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type
    }

    pub fn target_type(&self) -> &TypeName {
        self.record_type.name()
    }

    pub fn field_filter(&self) -> &FieldFilter {
        &self.field_filter
    }
}

impl fmt::Display for SpecializationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.record_type.name(), self.field_filter)
    }
}
