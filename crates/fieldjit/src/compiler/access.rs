// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field access classification.

use crate::accessor::FieldAccessor;
use crate::error::{Error, Result};
use crate::record::{FieldDescriptor, FieldKind, RecordType, TypeName, Visibility};

/// How a specialized accessor reaches a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessClass {
    /// Read and written through a captured slot offset.
    Direct,
    /// Routed through the generic accessor.
    ReflectionOnly,
}

impl AccessClass {
    /// Whether code hosted by `host` may touch `field` directly.
    ///
    /// Public and protected fields always may. Private fields only when the
    /// host declared them. Package fields when host and declarer share a
    /// namespace; two types in the root namespace share it.
    pub fn classify(host: &TypeName, field: &FieldDescriptor) -> Self {
        let direct = match field.visibility {
            Visibility::Public | Visibility::Protected => true,
            Visibility::Private => host == &field.declaring_type,
            Visibility::Package => host.namespace() == field.declaring_type.namespace(),
        };
        if direct {
            Self::Direct
        } else {
            Self::ReflectionOnly
        }
    }
}

/// One entry of a specialized dispatch table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSlot {
    pub index: usize,
    /// Slot offset inside records of the host type.
    pub slot: usize,
    pub name: String,
    pub declaring_type: TypeName,
    pub kind: FieldKind,
    pub access: AccessClass,
}

impl FieldSlot {
    /// Resolve the field behind accessor `index` against `host` once.
    pub fn resolve(index: usize, host: &RecordType, accessor: &FieldAccessor) -> Result<Self> {
        let field = accessor.field();
        let slot = host
            .slot_of(&field.declaring_type, &field.name)
            .ok_or_else(|| Error::CompilationFailure {
                target: host.name().clone(),
                reason: format!(
                    "field {}.{} is not part of the record layout",
                    field.declaring_type, field.name
                ),
            })?;

        Ok(Self {
            index,
            slot,
            name: field.name.clone(),
            declaring_type: field.declaring_type.clone(),
            kind: field.kind.clone(),
            access: AccessClass::classify(host.name(), field),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PrimitiveKind;

    fn field(visibility: Visibility, declaring: &str) -> FieldDescriptor {
        let mut f = FieldDescriptor::new(
            "x",
            FieldKind::Primitive(PrimitiveKind::I32),
            TypeName::new(declaring),
        );
        f.visibility = visibility;
        f
    }

    #[test]
    fn test_public_and_protected_are_direct() {
        let host = TypeName::new("a.Host");
        assert_eq!(
            AccessClass::classify(&host, &field(Visibility::Public, "b.Other")),
            AccessClass::Direct
        );
        assert_eq!(
            AccessClass::classify(&host, &field(Visibility::Protected, "b.Other")),
            AccessClass::Direct
        );
    }

    #[test]
    fn test_private_requires_same_declarer() {
        let host = TypeName::new("a.Host");
        assert_eq!(
            AccessClass::classify(&host, &field(Visibility::Private, "a.Host")),
            AccessClass::Direct
        );
        assert_eq!(
            AccessClass::classify(&host, &field(Visibility::Private, "a.Base")),
            AccessClass::ReflectionOnly
        );
    }

    #[test]
    fn test_package_requires_same_namespace() {
        let host = TypeName::new("a.Host");
        assert_eq!(
            AccessClass::classify(&host, &field(Visibility::Package, "a.Base")),
            AccessClass::Direct
        );
        assert_eq!(
            AccessClass::classify(&host, &field(Visibility::Package, "b.Base")),
            AccessClass::ReflectionOnly
        );
        assert_eq!(
            AccessClass::classify(&TypeName::new("Host"), &field(Visibility::Package, "Base")),
            AccessClass::Direct
        );
        assert_eq!(
            AccessClass::classify(&TypeName::new("Host"), &field(Visibility::Package, "a.Base")),
            AccessClass::ReflectionOnly
        );
    }

    #[test]
    fn test_classification_is_deterministic() {
        let host = TypeName::new("a.Host");
        let f = field(Visibility::Private, "b.Base");
        let first = AccessClass::classify(&host, &f);
        assert!((0..16).all(|_| AccessClass::classify(&host, &f) == first));
    }
}
