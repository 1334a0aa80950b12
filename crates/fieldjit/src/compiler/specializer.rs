// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Specializer: synthesizes and caches specialized accessor types.
//!
//! Synthesis happens at most once per [`SpecializationKey`]. Later compiles
//! with the same key instantiate the cached type, so every accessor for a
//! key shares one `Arc<SpecializedType>`.
//!
//! Each key owns a [`DefinitionCell`]. The map shard is locked only long
//! enough to find or insert the cell; the definition itself runs under the
//! cell's own lock, so a slow definition never delays hits on other keys.

use super::definer::{InProcessDefiner, TypeDefiner};
use super::key::SpecializationKey;
use super::specialized::{SpecializedAccessor, SpecializedType};
use super::table::synthesize;
use crate::accessor::GenericAccessor;
use crate::error::{Error, Result};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// Compile counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CompileStats {
    pub compiles: u64,
    pub hits: u64,
    pub syntheses: u64,
    pub failures: u64,
    pub last_synthesis_ns: u64,
}

#[derive(Debug, Default)]
struct Counters {
    compiles: AtomicU64,
    hits: AtomicU64,
    syntheses: AtomicU64,
    failures: AtomicU64,
    last_synthesis_ns: AtomicU64,
}

/// Per-key slot: the published type, and the lock held while defining it.
#[derive(Default)]
struct DefinitionCell {
    defined: OnceLock<Arc<SpecializedType>>,
    defining: Mutex<()>,
}

/// Synthesizes specialized accessors and caches their types by key.
///
/// Compiling blocks for the duration of synthesis; hosts normally leave it to
/// [`crate::background::BackgroundSpecializer`].
pub struct Specializer {
    compiled: DashMap<SpecializationKey, Arc<DefinitionCell>>,
    definer: Arc<dyn TypeDefiner>,
    counters: Counters,
}

impl Specializer {
    pub fn new() -> Self {
        Self::with_definer(Arc::new(InProcessDefiner::new()))
    }

    pub fn with_definer(definer: Arc<dyn TypeDefiner>) -> Self {
        Self {
            compiled: DashMap::new(),
            definer,
            counters: Counters::default(),
        }
    }

    /// Specialize `source`. The result stays bound to the record `source` is
    /// bound to and keeps its converter.
    ///
    /// Concurrent compiles of one key wait for a single definition. The
    /// definer may compile other keys but must not compile the key it is
    /// defining.
    pub fn compile(self: &Arc<Self>, source: &GenericAccessor) -> Result<SpecializedAccessor> {
        self.counters.compiles.fetch_add(1, Ordering::Relaxed);
        let key = SpecializationKey::for_accessor(source);

        let ty = loop {
            if let Some(ty) = self.cached_type(&key) {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                break ty;
            }

            let cell = Arc::clone(self.compiled.entry(key.clone()).or_default().value());
            let _defining = cell.defining.lock();
            if let Some(ty) = cell.defined.get() {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                break Arc::clone(ty);
            }
            // Dropped after a failed definition while we waited.
            if !self.is_current(&key, &cell) {
                continue;
            }

            match self.generate(key.clone(), source) {
                Ok(ty) => {
                    let _ = cell.defined.set(Arc::clone(&ty));
                    break ty;
                }
                Err(err) => {
                    self.compiled
                        .remove_if(&key, |_, current| Arc::ptr_eq(current, &cell));
                    return Err(err);
                }
            }
        };
        Ok(ty.instantiate(Some(Arc::clone(self)), source.clone()))
    }

    fn is_current(&self, key: &SpecializationKey, cell: &Arc<DefinitionCell>) -> bool {
        self.compiled
            .get(key)
            .is_some_and(|entry| Arc::ptr_eq(entry.value(), cell))
    }

    fn generate(&self, key: SpecializationKey, source: &GenericAccessor) -> Result<Arc<SpecializedType>> {
        let start = Instant::now();
        let target = key.target_type().clone();

        let generated = synthesize(key, source).and_then(|definition| {
            self.definer
                .define(source.target_type(), definition)
                .map_err(|err| Error::CompilationFailure {
                    target: target.clone(),
                    reason: err.to_string(),
                })
        });

        match generated {
            Ok(ty) => {
                let elapsed = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
                self.counters.syntheses.fetch_add(1, Ordering::Relaxed);
                self.counters
                    .last_synthesis_ns
                    .store(elapsed, Ordering::Relaxed);
                log::debug!(
                    "[specializer] defined {} ({} fields, {} direct) in {} ns",
                    ty.name(),
                    ty.definition().len(),
                    ty.definition().direct_count(),
                    elapsed
                );
                Ok(ty)
            }
            Err(err) => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                log::debug!("[specializer] synthesis for {} failed: {}", target, err);
                Err(err)
            }
        }
    }

    /// Published type for `key`. Never waits on a definition in progress.
    pub fn cached_type(&self, key: &SpecializationKey) -> Option<Arc<SpecializedType>> {
        self.compiled
            .get(key)
            .and_then(|entry| entry.value().defined.get().cloned())
    }

    /// Number of cached types.
    pub fn len(&self) -> usize {
        self.compiled
            .iter()
            .filter(|entry| entry.value().defined.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CompileStats {
        CompileStats {
            compiles: self.counters.compiles.load(Ordering::Relaxed),
            hits: self.counters.hits.load(Ordering::Relaxed),
            syntheses: self.counters.syntheses.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
            last_synthesis_ns: self.counters.last_synthesis_ns.load(Ordering::Relaxed),
        }
    }
}

impl Default for Specializer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Specializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Specializer")
            .field("cached", &self.len())
            .field("stats", &self.stats())
            .finish()
    }
}
