// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Default instances for reference fields.
//!
//! `write_defaults` fills every non-primitive, non-final field for which a
//! default can be generated. Generation asks an ordered list of
//! [`InstanceProvider`]s; the first one that produces a value wins, unless
//! some provider forbids the kind outright.

use crate::record::{FieldKind, FieldValue, PrimitiveKind, TypeName};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Kind of the rich-text component array. Default generation would produce
/// an empty array; accessors write `Null` into such fields instead.
pub const RICH_TEXT_ARRAY_TYPE: &str = "chat.BaseComponent[]";

/// Produces default values for field kinds.
pub trait InstanceProvider: Send + Sync {
    /// Default value for `kind`, if this provider knows one.
    fn create(&self, kind: &FieldKind) -> Option<FieldValue>;

    /// Whether no default may ever be generated for `kind`.
    fn forbids(&self, _kind: &FieldKind) -> bool {
        false
    }
}

/// Zero values for boxed primitives and the empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveDefaults;

impl InstanceProvider for PrimitiveDefaults {
    fn create(&self, kind: &FieldKind) -> Option<FieldValue> {
        match kind {
            FieldKind::Primitive(p) | FieldKind::Boxed(p) => Some(zero(*p)),
            FieldKind::String => Some(FieldValue::String(String::new())),
            _ => None,
        }
    }
}

fn zero(p: PrimitiveKind) -> FieldValue {
    match p {
        PrimitiveKind::Bool => FieldValue::Bool(false),
        PrimitiveKind::I8 => FieldValue::I8(0),
        PrimitiveKind::I16 => FieldValue::I16(0),
        PrimitiveKind::I32 => FieldValue::I32(0),
        PrimitiveKind::I64 => FieldValue::I64(0),
        PrimitiveKind::F32 => FieldValue::F32(0.0),
        PrimitiveKind::F64 => FieldValue::F64(0.0),
        PrimitiveKind::Char => FieldValue::Char('\0'),
    }
}

/// Empty arrays and lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionDefaults;

impl InstanceProvider for CollectionDefaults {
    fn create(&self, kind: &FieldKind) -> Option<FieldValue> {
        match kind {
            FieldKind::Array(_) => Some(FieldValue::Array(Vec::new())),
            FieldKind::List(_) => Some(FieldValue::List(Vec::new())),
            _ => None,
        }
    }
}

/// Fixed defaults for named object types.
#[derive(Debug, Clone, Default)]
pub struct RegisteredDefaults {
    values: HashMap<TypeName, FieldValue>,
}

impl RegisteredDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, type_name: impl Into<TypeName>, value: FieldValue) -> Self {
        self.values.insert(type_name.into(), value);
        self
    }
}

impl InstanceProvider for RegisteredDefaults {
    fn create(&self, kind: &FieldKind) -> Option<FieldValue> {
        match kind {
            FieldKind::Object(name) => self.values.get(name).cloned(),
            _ => None,
        }
    }
}

/// Object types (and arrays or lists of them) that never get a default.
#[derive(Debug, Clone, Default)]
pub struct BannedTypes {
    banned: HashSet<TypeName>,
}

impl BannedTypes {
    pub fn new<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeName>,
    {
        Self {
            banned: types.into_iter().map(Into::into).collect(),
        }
    }
}

impl InstanceProvider for BannedTypes {
    fn create(&self, _kind: &FieldKind) -> Option<FieldValue> {
        None
    }

    fn forbids(&self, kind: &FieldKind) -> bool {
        match kind {
            FieldKind::Object(name) => self.banned.contains(name),
            FieldKind::Array(element) | FieldKind::List(element) => self.forbids(element),
            _ => false,
        }
    }
}

/// Ordered set of instance providers.
#[derive(Clone)]
pub struct DefaultInstances {
    providers: Vec<Arc<dyn InstanceProvider>>,
}

impl DefaultInstances {
    pub fn new(providers: Vec<Arc<dyn InstanceProvider>>) -> Self {
        Self { providers }
    }

    /// Primitive and collection defaults, shared by every accessor that was
    /// not given its own providers.
    pub fn standard() -> Arc<Self> {
        static STANDARD: OnceLock<Arc<DefaultInstances>> = OnceLock::new();
        Arc::clone(STANDARD.get_or_init(|| {
            Arc::new(Self::new(vec![
                Arc::new(PrimitiveDefaults),
                Arc::new(CollectionDefaults),
            ]))
        }))
    }

    /// Append a provider with the lowest priority.
    pub fn with_provider(mut self, provider: Arc<dyn InstanceProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn providers(&self) -> &[Arc<dyn InstanceProvider>] {
        &self.providers
    }

    pub fn get_default(&self, kind: &FieldKind) -> Option<FieldValue> {
        if self.providers.iter().any(|p| p.forbids(kind)) {
            return None;
        }
        self.providers.iter().find_map(|p| p.create(kind))
    }

    pub fn has_default(&self, kind: &FieldKind) -> bool {
        self.get_default(kind).is_some()
    }
}

impl fmt::Debug for DefaultInstances {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultInstances")
            .field("providers", &self.providers.len())
            .finish()
    }
}

/// Whether `kind` is the rich-text component array.
pub fn is_rich_text_array(kind: &FieldKind) -> bool {
    matches!(kind, FieldKind::Array(_)) && kind.canonical_name() == RICH_TEXT_ARRAY_TYPE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_defaults() {
        let defaults = DefaultInstances::standard();
        assert_eq!(
            defaults.get_default(&FieldKind::Boxed(PrimitiveKind::I64)),
            Some(FieldValue::I64(0))
        );
        assert_eq!(
            defaults.get_default(&FieldKind::String),
            Some(FieldValue::String(String::new()))
        );
        assert_eq!(
            defaults.get_default(&FieldKind::list_of(FieldKind::String)),
            Some(FieldValue::List(Vec::new()))
        );
        assert!(!defaults.has_default(&FieldKind::object("game.Item")));
    }

    #[test]
    fn test_first_provider_wins() {
        let defaults = DefaultInstances::new(vec![
            Arc::new(RegisteredDefaults::new().with("game.Item", FieldValue::object("game.Item", "air"))),
            Arc::new(RegisteredDefaults::new().with("game.Item", FieldValue::object("game.Item", "stone"))),
        ]);
        assert_eq!(
            defaults.get_default(&FieldKind::object("game.Item")),
            Some(FieldValue::object("game.Item", "air"))
        );
    }

    #[test]
    fn test_banned_types_override_later_and_earlier_providers() {
        let defaults = DefaultInstances::new(vec![
            Arc::new(CollectionDefaults),
            Arc::new(BannedTypes::new(["game.Entity"])),
        ]);
        assert!(!defaults.has_default(&FieldKind::array_of(FieldKind::object("game.Entity"))));
        assert!(defaults.has_default(&FieldKind::array_of(FieldKind::object("game.Item"))));
    }

    #[test]
    fn test_rich_text_detection() {
        assert!(is_rich_text_array(&FieldKind::array_of(FieldKind::object("chat.BaseComponent"))));
        assert!(!is_rich_text_array(&FieldKind::list_of(FieldKind::object("chat.BaseComponent"))));
        assert!(!is_rich_text_array(&FieldKind::array_of(FieldKind::String)));
    }
}
