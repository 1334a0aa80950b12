// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-type accessor cache.
//!
//! Hands out the best accessor known for a record type. The first lookup
//! creates a generic accessor and, when a [`BackgroundSpecializer`] is
//! installed, schedules its specialization; the specialized accessor replaces
//! the cache entry as soon as it is delivered.

use crate::accessor::{FieldAccess, GenericAccessor};
use crate::background::{BackgroundSpecializer, CompileListener, Scheduled};
use crate::compiler::SpecializedAccessor;
use crate::error::{Error, Result};
use crate::record::{FieldValue, Record, RecordType, SharedRecord};
use arc_swap::ArcSwapOption;
use dashmap::{DashMap, DashSet};
use std::fmt;
use std::sync::{Arc, Weak};

/// Accessor held by the cache.
#[derive(Debug, Clone)]
pub enum CachedAccessor {
    Generic(GenericAccessor),
    Specialized(SpecializedAccessor),
}

impl CachedAccessor {
    /// Generic accessor behind this entry.
    pub fn generic(&self) -> &GenericAccessor {
        match self {
            Self::Generic(generic) => generic,
            Self::Specialized(specialized) => specialized.generic(),
        }
    }

    pub fn with_target(&self, record: SharedRecord) -> Result<CachedAccessor> {
        Ok(match self {
            Self::Generic(generic) => Self::Generic(generic.with_target(record)?),
            Self::Specialized(specialized) => Self::Specialized(specialized.with_target(record)?),
        })
    }

    pub fn values(&self) -> Result<Vec<FieldValue>> {
        match self {
            Self::Generic(generic) => generic.values(),
            Self::Specialized(specialized) => specialized.values(),
        }
    }
}

impl FieldAccess for CachedAccessor {
    fn size(&self) -> usize {
        match self {
            Self::Generic(generic) => generic.size(),
            Self::Specialized(specialized) => specialized.size(),
        }
    }

    fn read(&self, index: usize) -> Result<FieldValue> {
        match self {
            Self::Generic(generic) => generic.read(index),
            Self::Specialized(specialized) => specialized.read(index),
        }
    }

    fn write(&self, index: usize, value: FieldValue) -> Result<()> {
        match self {
            Self::Generic(generic) => generic.write(index, value).map(|_| ()),
            Self::Specialized(specialized) => specialized.write(index, value).map(|_| ()),
        }
    }

    fn write_defaults(&self) -> Result<()> {
        match self {
            Self::Generic(generic) => generic.write_defaults().map(|_| ()),
            Self::Specialized(specialized) => specialized.write_defaults().map(|_| ()),
        }
    }

    fn retarget(&self, record: SharedRecord) -> Result<Box<dyn FieldAccess>> {
        Ok(Box::new(self.with_target(record)?))
    }

    fn is_specialized(&self) -> bool {
        matches!(self, Self::Specialized(_))
    }
}

/// Accessor cache keyed by record type layout.
///
/// Types that share a name but not their fields get separate entries.
pub struct AccessorCache {
    accessors: DashMap<Arc<RecordType>, CachedAccessor>,
    /// Types scheduled for specialization and not yet delivered.
    compiling: DashSet<Arc<RecordType>>,
    scheduler: ArcSwapOption<BackgroundSpecializer>,
}

impl AccessorCache {
    pub fn new() -> Self {
        Self {
            accessors: DashMap::new(),
            compiling: DashSet::new(),
            scheduler: ArcSwapOption::empty(),
        }
    }

    /// Start specializing accessors handed out from now on.
    pub fn install(&self, scheduler: Arc<BackgroundSpecializer>) {
        self.scheduler.store(Some(scheduler));
    }

    /// Stop scheduling specializations. Returns the removed scheduler.
    pub fn uninstall(&self) -> Option<Arc<BackgroundSpecializer>> {
        self.scheduler.swap(None)
    }

    pub fn scheduler(&self) -> Option<Arc<BackgroundSpecializer>> {
        self.scheduler.load_full()
    }

    /// Accessor for `record_type`, scheduling its specialization if needed.
    pub fn get(self: &Arc<Self>, record_type: &Arc<RecordType>) -> CachedAccessor {
        self.get_with(record_type, true)
    }

    /// Accessor for `record_type`; never schedules a specialization.
    pub fn get_uncompiled(self: &Arc<Self>, record_type: &Arc<RecordType>) -> CachedAccessor {
        self.get_with(record_type, false)
    }

    pub fn get_with(self: &Arc<Self>, record_type: &Arc<RecordType>, compile: bool) -> CachedAccessor {
        let accessor = self
            .accessors
            .entry(Arc::clone(record_type))
            .or_insert_with(|| CachedAccessor::Generic(GenericAccessor::new(Arc::clone(record_type))))
            .clone();

        match &accessor {
            CachedAccessor::Generic(generic) if compile => self.schedule(record_type, generic),
            _ => {}
        }
        accessor
    }

    fn schedule(self: &Arc<Self>, record_type: &Arc<RecordType>, generic: &GenericAccessor) {
        let Some(scheduler) = self.scheduler.load_full() else {
            return;
        };
        if !self.compiling.insert(Arc::clone(record_type)) {
            return;
        }

        let outcome = scheduler.schedule_compilation(
            generic,
            Arc::new(Delivery {
                cache: Arc::downgrade(self),
                record_type: Arc::clone(record_type),
            }),
        );

        match outcome {
            Scheduled::Submitted | Scheduled::Joined => {}
            Scheduled::Skipped | Scheduled::Rejected => {
                self.compiling.remove(record_type);
            }
        }
    }

    /// New record of `record_type` with its default fields filled in.
    pub fn new_record(self: &Arc<Self>, record_type: &Arc<RecordType>) -> Result<SharedRecord> {
        let record = Record::new(record_type).shared();
        self.get(record_type)
            .with_target(Arc::clone(&record))?
            .write_defaults()?;
        Ok(record)
    }

    /// Whether the cached accessor for `record_type` is specialized.
    pub fn is_specialized(&self, record_type: &RecordType) -> bool {
        self.accessors
            .get(record_type)
            .is_some_and(|entry| entry.is_specialized())
    }

    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }
}

/// Listener that swaps a delivered accessor into the cache, or clears the
/// in-flight mark when the job fails so a later lookup can retry.
struct Delivery {
    cache: Weak<AccessorCache>,
    record_type: Arc<RecordType>,
}

impl CompileListener for Delivery {
    fn on_compiled(&self, compiled: &SpecializedAccessor) {
        if let Some(cache) = self.cache.upgrade() {
            cache.accessors.insert(
                Arc::clone(&self.record_type),
                CachedAccessor::Specialized(compiled.clone()),
            );
            cache.compiling.remove(&self.record_type);
            log::debug!("[accessor-cache] {} now specialized", self.record_type.name());
        }
    }

    fn on_failed(&self, error: &Error) {
        if let Some(cache) = self.cache.upgrade() {
            cache.compiling.remove(&self.record_type);
            log::debug!(
                "[accessor-cache] {} stays generic: {}",
                self.record_type.name(),
                error
            );
        }
    }
}

impl Default for AccessorCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AccessorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorCache")
            .field("accessors", &self.accessors.len())
            .field("compiling", &self.compiling.len())
            .field("scheduler", &self.scheduler.load().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FieldKind, PrimitiveKind, RecordTypeBuilder};

    fn player() -> Arc<RecordType> {
        RecordTypeBuilder::new("game.Player")
            .field("level", FieldKind::Primitive(PrimitiveKind::I32))
            .field("name", FieldKind::String)
            .build_shared()
    }

    #[test]
    fn test_without_scheduler_stays_generic() {
        let cache = Arc::new(AccessorCache::new());
        let ty = player();

        let accessor = cache.get(&ty);
        assert!(!accessor.is_specialized());
        assert_eq!(cache.len(), 1);
        assert!(cache.compiling.is_empty());
        assert!(!cache.is_specialized(&ty));
    }

    #[test]
    fn test_same_name_layouts_cached_apart() {
        let cache = Arc::new(AccessorCache::new());
        let ty = player();
        let reordered = RecordTypeBuilder::new("game.Player")
            .field("name", FieldKind::String)
            .field("level", FieldKind::Primitive(PrimitiveKind::I32))
            .build_shared();

        let first = cache.get_uncompiled(&ty);
        let second = cache.get_uncompiled(&reordered);
        assert_eq!(cache.len(), 2);
        assert!(Arc::ptr_eq(first.generic().target_type(), &ty));
        assert!(Arc::ptr_eq(second.generic().target_type(), &reordered));

        // An identical layout built separately shares the entry.
        cache.get_uncompiled(&player());
        assert_eq!(cache.len(), 2);

        let record = cache.new_record(&reordered).expect("record");
        assert_eq!(
            record.read().get("name").expect("name"),
            FieldValue::String(String::new())
        );
    }

    #[test]
    fn test_new_record_has_defaults() {
        let cache = Arc::new(AccessorCache::new());
        let ty = player();

        let record = cache.new_record(&ty).expect("record");
        let record = record.read();
        assert_eq!(record.get("level").expect("level"), FieldValue::I32(0));
        assert_eq!(record.get("name").expect("name"), FieldValue::String(String::new()));
    }

    #[test]
    fn test_cached_accessor_binds() {
        let cache = Arc::new(AccessorCache::new());
        let ty = player();
        let record = Record::new(&ty).shared();

        let bound = cache.get_uncompiled(&ty).with_target(record).expect("bind");
        bound.write(0, FieldValue::I32(4)).expect("write");
        assert_eq!(bound.values().expect("values")[0], FieldValue::I32(4));
    }
}
