// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Crate error type.

use crate::config::ConfigError;
use crate::record::TypeName;
use thiserror::Error;

/// Errors raised by accessors, the specializer and the background scheduler.
#[derive(Debug, Error)]
pub enum Error {
    /// Field index outside `[0, length)`. Never retried.
    #[error("Field index {index} is out of bounds for length {length}")]
    IndexOutOfRange { index: usize, length: usize },

    #[error("Cannot access fields through an accessor without a target record")]
    NoTarget,

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Cannot bind a record of type {found} to an accessor for {expected}")]
    TargetMismatch { expected: TypeName, found: TypeName },

    #[error("Type mismatch: expected {expected}, got {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Value conversion failed: {0}")]
    Conversion(String),

    /// Synthesis or definition of a specialized type failed.
    #[error("Cannot specialize accessor for {target}: {reason}")]
    CompilationFailure { target: TypeName, reason: String },

    #[error("Unable to schedule specialization: {0}")]
    SchedulingRejection(String),

    #[error("Failed to spawn specializer worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for fieldjit operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_message() {
        let err = Error::IndexOutOfRange {
            index: 4,
            length: 3,
        };
        assert_eq!(err.to_string(), "Field index 4 is out of bounds for length 3");
    }

    #[test]
    fn test_config_error_converts() {
        let err: Error = ConfigError::Invalid("bad".into()).into();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.to_string(), "Invalid configuration: bad");
    }
}
