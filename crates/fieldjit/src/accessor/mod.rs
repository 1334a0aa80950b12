// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field accessors
//!
//! [`GenericAccessor`] is the reflective baseline. Specialized accessors
//! produced by [`crate::compiler::Specializer`] implement the same
//! [`FieldAccess`] contract, so caches can hand out either one.

mod convert;
mod defaults;
mod generic;

pub use convert::{FnConverter, ValueConverter};
pub use defaults::{
    is_rich_text_array, BannedTypes, CollectionDefaults, DefaultInstances, InstanceProvider,
    PrimitiveDefaults, RegisteredDefaults, RICH_TEXT_ARRAY_TYPE,
};
pub use generic::{FieldAccessor, FieldFilter, GenericAccessor};

use crate::error::Result;
use crate::record::{FieldValue, SharedRecord};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Indexed read/write access to the fields of a bound record.
pub trait FieldAccess: Send + Sync + fmt::Debug {
    fn size(&self) -> usize;

    fn read(&self, index: usize) -> Result<FieldValue>;

    fn write(&self, index: usize, value: FieldValue) -> Result<()>;

    fn write_defaults(&self) -> Result<()>;

    /// Same accessor bound to another record.
    fn retarget(&self, record: SharedRecord) -> Result<Box<dyn FieldAccess>>;

    fn is_specialized(&self) -> bool;
}

/// Reflective access counters.
#[derive(Debug, Default)]
pub struct AccessStats {
    reflective_reads: AtomicU64,
    reflective_writes: AtomicU64,
}

impl AccessStats {
    pub(crate) fn record_read(&self) {
        self.reflective_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_write(&self) {
        self.reflective_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> AccessSnapshot {
        AccessSnapshot {
            reflective_reads: self.reflective_reads.load(Ordering::Relaxed),
            reflective_writes: self.reflective_writes.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`AccessStats`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AccessSnapshot {
    pub reflective_reads: u64,
    pub reflective_writes: u64,
}
