// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime record model
//!
//! Records whose layout is only known at runtime. Accessors read and write
//! their fields by index, either reflectively (resolving the field by name on
//! every call) or through a specialized dispatch table.
//!
//! # Example
//!
//! ```rust
//! use fieldjit::record::{FieldKind, FieldValue, PrimitiveKind, Record, RecordTypeBuilder};
//!
//! let player = RecordTypeBuilder::new("game.Player")
//!     .field("level", FieldKind::Primitive(PrimitiveKind::I32))
//!     .field("name", FieldKind::String)
//!     .build_shared();
//!
//! let mut record = Record::new(&player);
//! record.set("level", 7).unwrap();
//! assert_eq!(record.get("level").unwrap(), FieldValue::I32(7));
//! assert_eq!(record.get("name").unwrap(), FieldValue::Null);
//! ```

mod builder;
mod descriptor;
mod instance;
pub mod slot;
mod value;

pub use builder::RecordTypeBuilder;
pub use descriptor::{FieldDescriptor, FieldKind, PrimitiveKind, RecordType, TypeName, Visibility};
pub use instance::{Record, SharedRecord};
pub use slot::Slot;
pub use value::FieldValue;
