// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compile listeners.
//!
//! Listeners are called from the specializer worker thread, once per job
//! they were registered for. They must be `Send + Sync` and should not block.

use crate::compiler::SpecializedAccessor;
use crate::error::Error;

/// Receives the result of one background specialization.
pub trait CompileListener: Send + Sync {
    fn on_compiled(&self, compiled: &SpecializedAccessor);

    /// The job failed; `on_compiled` will not be called for it.
    fn on_failed(&self, _error: &Error) {}
}

impl<F> CompileListener for F
where
    F: Fn(&SpecializedAccessor) + Send + Sync,
{
    fn on_compiled(&self, compiled: &SpecializedAccessor) {
        self(compiled);
    }
}
