// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value converters applied at the accessor boundary.

use crate::error::Result;
use crate::record::FieldValue;
use std::fmt;

/// Two-way conversion between the value stored in a field (generic) and the
/// value handed to callers (specific).
///
/// Accessors apply `to_specific` after every read and `to_generic` before
/// every write, exactly once per call.
pub trait ValueConverter: Send + Sync {
    fn to_specific(&self, generic: FieldValue) -> Result<FieldValue>;

    fn to_generic(&self, specific: FieldValue) -> Result<FieldValue>;

    /// Name shown in accessor descriptions.
    fn name(&self) -> &str {
        "converter"
    }
}

/// Converter built from a pair of closures.
pub struct FnConverter<S, G> {
    name: String,
    to_specific: S,
    to_generic: G,
}

impl<S, G> FnConverter<S, G>
where
    S: Fn(FieldValue) -> Result<FieldValue> + Send + Sync,
    G: Fn(FieldValue) -> Result<FieldValue> + Send + Sync,
{
    pub fn new(name: impl Into<String>, to_specific: S, to_generic: G) -> Self {
        Self {
            name: name.into(),
            to_specific,
            to_generic,
        }
    }
}

impl<S, G> ValueConverter for FnConverter<S, G>
where
    S: Fn(FieldValue) -> Result<FieldValue> + Send + Sync,
    G: Fn(FieldValue) -> Result<FieldValue> + Send + Sync,
{
    fn to_specific(&self, generic: FieldValue) -> Result<FieldValue> {
        (self.to_specific)(generic)
    }

    fn to_generic(&self, specific: FieldValue) -> Result<FieldValue> {
        (self.to_generic)(specific)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<S, G> fmt::Debug for FnConverter<S, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConverter").field("name", &self.name).finish()
    }
}
