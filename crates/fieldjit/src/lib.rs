// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # fieldjit - just-in-time field accessor specialization
//!
//! Reflective field access resolves a field by name and boxes its value on
//! every call. `fieldjit` takes such a generic accessor, synthesizes a
//! dispatch table that reaches each field slot directly, caches the result by
//! shape and delivers it asynchronously from a background worker.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fieldjit::{AccessorCache, BackgroundSpecializer, LogReporter, SpecializerConfig};
//! use fieldjit::record::{FieldKind, PrimitiveKind, RecordTypeBuilder};
//! use fieldjit::FieldAccess;
//! use std::sync::Arc;
//!
//! fn main() -> fieldjit::Result<()> {
//!     let scheduler = Arc::new(BackgroundSpecializer::new(
//!         SpecializerConfig::default(),
//!         Arc::new(LogReporter),
//!     )?);
//!     let cache = Arc::new(AccessorCache::new());
//!     cache.install(Arc::clone(&scheduler));
//!
//!     let player = RecordTypeBuilder::new("game.Player")
//!         .field("level", FieldKind::Primitive(PrimitiveKind::I32))
//!         .field("name", FieldKind::String)
//!         .build_shared();
//!
//!     // Generic at first; specialized once the worker delivers.
//!     let record = cache.new_record(&player)?;
//!     let accessor = cache.get(&player).with_target(record)?;
//!     accessor.write(0, 42.into())?;
//!
//!     scheduler.shutdown_all();
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |  AccessorCache        per-type accessor, swapped on delivery |
//! +-------------------------------------------------------------+
//! |  BackgroundSpecializer  one worker, per-key dedup, listeners |
//! +-------------------------------------------------------------+
//! |  Specializer          synthesis + cache by (type, filter)    |
//! |  SpecializedAccessor  direct routes | delegate routes        |
//! +-------------------------------------------------------------+
//! |  GenericAccessor      reflective baseline                    |
//! |  Record model         RecordType, Record, FieldValue         |
//! +-------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`record`] - runtime record model
//! - [`accessor`] - generic accessor, converters, default instances
//! - [`compiler`] - specialization and specialized accessors
//! - [`background`] - background worker, listeners, error reporting
//! - [`cache`] - per-type accessor cache
//! - [`config`] - worker configuration

pub mod accessor;
pub mod background;
pub mod cache;
pub mod compiler;
pub mod config;
pub mod error;
pub mod record;

pub use accessor::{FieldAccess, FieldFilter, GenericAccessor, ValueConverter};
pub use background::{BackgroundSpecializer, CompileListener, ErrorReporter, LogReporter, Scheduled};
pub use cache::{AccessorCache, CachedAccessor};
pub use compiler::{SpecializationKey, SpecializedAccessor, Specializer};
pub use config::SpecializerConfig;
pub use error::{Error, Result};
