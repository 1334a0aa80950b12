// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record instances.

use super::slot::{unbox, Slot};
use super::{FieldValue, RecordType};
use crate::error::{Error, Result};
use parking_lot::RwLock;
use std::sync::Arc;

/// A record bound to accessors. Accessors lock it for each read or write.
pub type SharedRecord = Arc<RwLock<Record>>;

/// Instance of a [`RecordType`], one slot per field.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    record_type: Arc<RecordType>,
    slots: Vec<Slot>,
}

impl Record {
    /// Create a record with zeroed primitives and null references.
    pub fn new(record_type: &Arc<RecordType>) -> Self {
        let slots = record_type
            .fields()
            .iter()
            .map(|f| Slot::zeroed(&f.kind))
            .collect();
        Self {
            record_type: Arc::clone(record_type),
            slots,
        }
    }

    /// Wrap the record so it can be bound to accessors.
    pub fn shared(self) -> SharedRecord {
        Arc::new(RwLock::new(self))
    }

    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type
    }

    pub fn slot(&self, offset: usize) -> Option<&Slot> {
        self.slots.get(offset)
    }

    pub fn slot_mut(&mut self, offset: usize) -> Option<&mut Slot> {
        self.slots.get_mut(offset)
    }

    /// Read the first field called `name`.
    pub fn get(&self, name: &str) -> Result<FieldValue> {
        let offset = self.offset_of(name)?;
        Ok(self.slots[offset].boxed())
    }

    /// Write the first field called `name`.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<()> {
        let offset = self.offset_of(name)?;
        let slot = unbox(&self.record_type.fields()[offset].kind, value.into())?;
        self.slots[offset] = slot;
        Ok(())
    }

    fn offset_of(&self, name: &str) -> Result<usize> {
        self.record_type
            .slot_by_name(name)
            .ok_or_else(|| Error::FieldNotFound(name.to_string()))
    }
}
