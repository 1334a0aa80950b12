// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Specialized accessors.

use super::access::AccessClass;
use super::specializer::Specializer;
use super::table::{Route, SpecializedDefinition};
use crate::accessor::{FieldAccess, GenericAccessor, ValueConverter};
use crate::error::{Error, Result};
use crate::record::{FieldValue, SharedRecord};
use std::fmt;
use std::sync::Arc;

/// A defined specialization, shared by every accessor with the same key.
pub struct SpecializedType {
    name: String,
    definition: SpecializedDefinition,
}

impl SpecializedType {
    pub fn new(name: impl Into<String>, definition: SpecializedDefinition) -> Self {
        Self {
            name: name.into(),
            definition,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn definition(&self) -> &SpecializedDefinition {
        &self.definition
    }

    /// Create an accessor of this type around `generic`, keeping whatever
    /// record `generic` is bound to.
    pub fn instantiate(
        self: &Arc<Self>,
        compiler: Option<Arc<Specializer>>,
        generic: GenericAccessor,
    ) -> SpecializedAccessor {
        SpecializedAccessor {
            ty: Arc::clone(self),
            generic,
            compiler,
        }
    }
}

impl fmt::Debug for SpecializedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecializedType")
            .field("name", &self.name)
            .field("key", self.definition.key())
            .field("fields", &self.definition.len())
            .field("direct", &self.definition.direct_count())
            .finish()
    }
}

/// Accessor that serves reads and writes through a synthesized dispatch
/// table.
///
/// Fields the table cannot reach directly go through the wrapped generic
/// accessor, which also supplies the bound record, the converter and the
/// default rules.
#[derive(Clone)]
pub struct SpecializedAccessor {
    ty: Arc<SpecializedType>,
    generic: GenericAccessor,
    compiler: Option<Arc<Specializer>>,
}

impl SpecializedAccessor {
    pub fn specialized_type(&self) -> &Arc<SpecializedType> {
        &self.ty
    }

    pub fn generic(&self) -> &GenericAccessor {
        &self.generic
    }

    pub fn target(&self) -> Option<&SharedRecord> {
        self.generic.target()
    }

    pub fn size(&self) -> usize {
        self.ty.definition.len()
    }

    /// How field `index` is served, `None` when out of range.
    pub fn route(&self, index: usize) -> Option<AccessClass> {
        self.ty.definition.slots().get(index).map(|s| s.access)
    }

    fn converter(&self) -> Option<&Arc<dyn ValueConverter>> {
        self.generic.converter()
    }

    pub fn read(&self, index: usize) -> Result<FieldValue> {
        let value = self.read_dispatch(index)?;
        match self.converter() {
            Some(converter) => converter.to_specific(value),
            None => Ok(value),
        }
    }

    pub fn read_safely(&self, index: usize) -> Result<Option<FieldValue>> {
        if index < self.size() {
            self.read(index).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn write(&self, index: usize, value: FieldValue) -> Result<&Self> {
        let value = match self.converter() {
            Some(converter) => converter.to_generic(value)?,
            None => value,
        };
        self.write_dispatch(index, value)?;
        Ok(self)
    }

    pub fn write_safely(&self, index: usize, value: FieldValue) -> Result<&Self> {
        if index < self.size() {
            self.write(index, value)
        } else {
            Ok(self)
        }
    }

    pub fn modify<F>(&self, index: usize, f: F) -> Result<&Self>
    where
        F: FnOnce(FieldValue) -> FieldValue,
    {
        let current = self.read(index)?;
        self.write(index, f(current))
    }

    pub fn values(&self) -> Result<Vec<FieldValue>> {
        (0..self.size()).map(|index| self.read(index)).collect()
    }

    /// Fill every default field through the dispatch table. The rich-text
    /// component array is nulled rather than emptied.
    pub fn write_defaults(&self) -> Result<&Self> {
        for &index in self.generic.default_fields() {
            let value = self.generic.default_value(index);
            self.write_dispatch(index, value)?;
        }
        Ok(self)
    }

    /// Bind another record. With a compiler attached the retargeted generic
    /// accessor is compiled again, which hits the cached type.
    pub fn with_target(&self, record: SharedRecord) -> Result<SpecializedAccessor> {
        let generic = self.generic.with_target(record)?;
        match &self.compiler {
            Some(compiler) => compiler.compile(&generic),
            None => Ok(self.ty.instantiate(None, generic)),
        }
    }

    pub fn with_converter(&self, converter: Arc<dyn ValueConverter>) -> SpecializedAccessor {
        self.ty
            .instantiate(self.compiler.clone(), self.generic.with_converter(converter))
    }

    fn read_dispatch(&self, index: usize) -> Result<FieldValue> {
        match self.ty.definition.route(index) {
            Some(Route::Direct { getter, .. }) => {
                let target = self.generic.target().ok_or(Error::NoTarget)?;
                let record = target.read();
                getter(&*record)
            }
            Some(Route::Delegate) => self.generic.read_raw(index),
            None => Err(self.out_of_range(index)),
        }
    }

    fn write_dispatch(&self, index: usize, value: FieldValue) -> Result<()> {
        match self.ty.definition.route(index) {
            Some(Route::Direct { setter, .. }) => {
                let target = self.generic.target().ok_or(Error::NoTarget)?;
                let mut record = target.write();
                setter(&mut *record, value)
            }
            Some(Route::Delegate) => self.generic.write_raw(index, value),
            None => Err(self.out_of_range(index)),
        }
    }

    fn out_of_range(&self, index: usize) -> Error {
        Error::IndexOutOfRange {
            index,
            length: self.size(),
        }
    }
}

impl fmt::Debug for SpecializedAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecializedAccessor")
            .field("type", &self.ty.name)
            .field("generic", &self.generic)
            .field("compiler", &self.compiler.is_some())
            .finish()
    }
}

impl FieldAccess for SpecializedAccessor {
    fn size(&self) -> usize {
        SpecializedAccessor::size(self)
    }

    fn read(&self, index: usize) -> Result<FieldValue> {
        SpecializedAccessor::read(self, index)
    }

    fn write(&self, index: usize, value: FieldValue) -> Result<()> {
        SpecializedAccessor::write(self, index, value).map(|_| ())
    }

    fn write_defaults(&self) -> Result<()> {
        SpecializedAccessor::write_defaults(self).map(|_| ())
    }

    fn retarget(&self, record: SharedRecord) -> Result<Box<dyn FieldAccess>> {
        Ok(Box::new(self.with_target(record)?))
    }

    fn is_specialized(&self) -> bool {
        true
    }
}
