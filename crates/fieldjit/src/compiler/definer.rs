// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type definition.
//!
//! The specializer hands every synthesized table to a [`TypeDefiner`], which
//! turns it into a named, shareable [`SpecializedType`]. Hosts that need to
//! vet or register definitions supply their own definer.

use super::specialized::SpecializedType;
use super::table::SpecializedDefinition;
use crate::config::generated_type_name;
use crate::record::RecordType;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Definition errors.
#[derive(Debug, Error)]
pub enum DefineError {
    #[error("Definition rejected: {0}")]
    Rejected(String),

    #[error("Definition for {0} has no fields")]
    EmptyDefinition(String),
}

/// Defines synthesized types on behalf of the specializer.
pub trait TypeDefiner: Send + Sync {
    /// Define `definition` as a type owned by `owner`.
    ///
    /// Called once per specialization key; a key is only defined again after
    /// a failed definition. May compile other keys, but not its own.
    fn define(
        &self,
        owner: &RecordType,
        definition: SpecializedDefinition,
    ) -> Result<Arc<SpecializedType>, DefineError>;
}

/// Defines types in process, naming them after
/// [`GENERATED_TYPE_FORMAT`](crate::config::GENERATED_TYPE_FORMAT).
#[derive(Debug)]
pub struct InProcessDefiner {
    next_id: AtomicU64,
    allow_empty: bool,
}

impl InProcessDefiner {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            allow_empty: true,
        }
    }

    /// Reject definitions without fields.
    pub fn strict() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            allow_empty: false,
        }
    }

    /// Number of types defined so far.
    pub fn defined(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed)
    }
}

impl Default for InProcessDefiner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDefiner for InProcessDefiner {
    fn define(
        &self,
        owner: &RecordType,
        definition: SpecializedDefinition,
    ) -> Result<Arc<SpecializedType>, DefineError> {
        if definition.is_empty() && !self.allow_empty {
            return Err(DefineError::EmptyDefinition(owner.name().to_string()));
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let name = generated_type_name(owner.name().as_str(), id);
        Ok(Arc::new(SpecializedType::new(name, definition)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::GenericAccessor;
    use crate::compiler::table::synthesize;
    use crate::compiler::SpecializationKey;
    use crate::record::{FieldKind, PrimitiveKind, RecordTypeBuilder};

    fn definition(ty: &Arc<RecordType>) -> SpecializedDefinition {
        let source = GenericAccessor::new(Arc::clone(ty));
        synthesize(SpecializationKey::for_accessor(&source), &source).expect("synthesize")
    }

    #[test]
    fn test_generated_names() {
        let ty = RecordTypeBuilder::new("game.Player")
            .field("level", FieldKind::Primitive(PrimitiveKind::I32))
            .build_shared();
        let definer = InProcessDefiner::new();

        let first = definer.define(&ty, definition(&ty)).expect("define");
        let second = definer.define(&ty, definition(&ty)).expect("define");

        assert_eq!(first.name(), "game.Player$Specialized_00000000");
        assert_eq!(second.name(), "game.Player$Specialized_00000001");
        assert_eq!(definer.defined(), 2);
    }

    #[test]
    fn test_strict_rejects_empty() {
        let ty = RecordTypeBuilder::new("game.Marker").build_shared();
        assert!(InProcessDefiner::new().define(&ty, definition(&ty)).is_ok());
        let err = InProcessDefiner::strict()
            .define(&ty, definition(&ty))
            .expect_err("empty");
        assert!(matches!(err, DefineError::EmptyDefinition(_)));
    }
}
