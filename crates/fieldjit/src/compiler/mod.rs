// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Accessor specialization
//!
//! Turns a [`GenericAccessor`](crate::accessor::GenericAccessor) into a
//! [`SpecializedAccessor`] whose reads and writes go straight to record
//! slots. Fields the host type may not touch directly (private fields of
//! another declarer, package fields from another namespace) keep going
//! through the generic accessor.
//!
//! # Example
//!
//! ```rust
//! use fieldjit::accessor::GenericAccessor;
//! use fieldjit::compiler::{AccessClass, Specializer};
//! use fieldjit::record::{FieldKind, FieldValue, PrimitiveKind, Record, RecordTypeBuilder};
//! use std::sync::Arc;
//!
//! let player = RecordTypeBuilder::new("game.Player")
//!     .field("level", FieldKind::Primitive(PrimitiveKind::I32))
//!     .build_shared();
//! let record = Record::new(&player).shared();
//!
//! let specializer = Arc::new(Specializer::new());
//! let generic = GenericAccessor::new(player).with_target(record).unwrap();
//! let compiled = specializer.compile(&generic).unwrap();
//!
//! compiled.write(0, FieldValue::I32(3)).unwrap();
//! assert_eq!(generic.read(0).unwrap(), FieldValue::I32(3));
//! assert_eq!(compiled.route(0), Some(AccessClass::Direct));
//! ```

mod access;
mod definer;
mod key;
mod specialized;
mod specializer;
mod table;

pub use access::{AccessClass, FieldSlot};
pub use definer::{DefineError, InProcessDefiner, TypeDefiner};
pub use key::SpecializationKey;
pub use specialized::{SpecializedAccessor, SpecializedType};
pub use specializer::{CompileStats, Specializer};
pub use table::SpecializedDefinition;
