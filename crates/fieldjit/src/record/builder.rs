// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for RecordType.

use super::{FieldDescriptor, FieldKind, RecordType, TypeName, Visibility};
use std::sync::Arc;

/// Builder for creating RecordType instances.
#[derive(Debug)]
pub struct RecordTypeBuilder {
    name: TypeName,
    fields: Vec<FieldDescriptor>,
}

impl RecordTypeBuilder {
    /// Create a new builder for a record type.
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a public field declared by this type.
    pub fn field(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.declared(name, kind, Visibility::Public)
    }

    pub fn public_field(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.declared(name, kind, Visibility::Public)
    }

    pub fn protected_field(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.declared(name, kind, Visibility::Protected)
    }

    pub fn package_field(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.declared(name, kind, Visibility::Package)
    }

    pub fn private_field(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.declared(name, kind, Visibility::Private)
    }

    /// Add a field declared by another type (a supertype or an outer type).
    pub fn inherited_field(
        mut self,
        name: impl Into<String>,
        kind: FieldKind,
        visibility: Visibility,
        declaring_type: impl Into<TypeName>,
    ) -> Self {
        let mut field = FieldDescriptor::new(name, kind, declaring_type.into());
        field.visibility = visibility;
        self.fields.push(field);
        self
    }

    /// Add a static field. Accessors never expose it.
    pub fn static_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        let mut field = FieldDescriptor::new(name, kind, self.name.clone());
        field.is_static = true;
        self.fields.push(field);
        self
    }

    /// Add a public final field. It is accessible but never receives a
    /// generated default.
    pub fn final_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        let mut field = FieldDescriptor::new(name, kind, self.name.clone());
        field.is_final = true;
        self.fields.push(field);
        self
    }

    /// Add a fully specified field descriptor.
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    fn declared(mut self, name: impl Into<String>, kind: FieldKind, visibility: Visibility) -> Self {
        let mut field = FieldDescriptor::new(name, kind, self.name.clone());
        field.visibility = visibility;
        self.fields.push(field);
        self
    }

    /// Build the record type.
    pub fn build(self) -> RecordType {
        RecordType::new(self.name, self.fields)
    }

    /// Build the record type behind an `Arc`, as accessors expect it.
    pub fn build_shared(self) -> Arc<RecordType> {
        Arc::new(self.build())
    }
}
