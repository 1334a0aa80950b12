// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared fixtures for integration tests.

#![allow(dead_code)]

use crossbeam::channel::{self, Receiver, Sender};
use fieldjit::background::{ErrorReporter, Report};
use fieldjit::compiler::{
    DefineError, InProcessDefiner, SpecializedDefinition, SpecializedType, TypeDefiner,
};
use fieldjit::record::{FieldKind, PrimitiveKind, Record, RecordType, RecordTypeBuilder, Visibility};
use fieldjit::GenericAccessor;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const WAIT: Duration = Duration::from_secs(5);

/// `a: i32` public, `b: string` public, `c: i32` private and declared by a
/// type in another namespace.
pub fn packet() -> Arc<RecordType> {
    RecordTypeBuilder::new("game.Packet")
        .public_field("a", FieldKind::Primitive(PrimitiveKind::I32))
        .public_field("b", FieldKind::String)
        .inherited_field(
            "c",
            FieldKind::Primitive(PrimitiveKind::I32),
            Visibility::Private,
            "net.Base",
        )
        .build_shared()
}

/// Record type mixing every field kind and visibility.
pub fn kitchen_sink() -> Arc<RecordType> {
    RecordTypeBuilder::new("game.Sink")
        .field("flag", FieldKind::Primitive(PrimitiveKind::Bool))
        .field("tiny", FieldKind::Primitive(PrimitiveKind::I8))
        .protected_field("short", FieldKind::Primitive(PrimitiveKind::I16))
        .field("int", FieldKind::Primitive(PrimitiveKind::I32))
        .private_field("long", FieldKind::Primitive(PrimitiveKind::I64))
        .field("float", FieldKind::Primitive(PrimitiveKind::F32))
        .package_field("double", FieldKind::Primitive(PrimitiveKind::F64))
        .field("letter", FieldKind::Primitive(PrimitiveKind::Char))
        .field("boxed", FieldKind::Boxed(PrimitiveKind::I32))
        .field("text", FieldKind::String)
        .field("items", FieldKind::list_of(FieldKind::String))
        .field("grid", FieldKind::array_of(FieldKind::Primitive(PrimitiveKind::I32)))
        .field("stack", FieldKind::object("game.ItemStack"))
        .inherited_field(
            "hidden",
            FieldKind::Primitive(PrimitiveKind::I32),
            Visibility::Private,
            "game.Base",
        )
        .inherited_field(
            "foreign",
            FieldKind::String,
            Visibility::Package,
            "other.Base",
        )
        .build_shared()
}

pub fn bound(record_type: &Arc<RecordType>) -> GenericAccessor {
    GenericAccessor::new(Arc::clone(record_type))
        .with_target(Record::new(record_type).shared())
        .expect("bind record")
}

/// Reporter that keeps every report.
#[derive(Default)]
pub struct CollectingReporter {
    pub detailed: Mutex<Vec<Report>>,
    pub warnings: Mutex<Vec<Report>>,
}

impl CollectingReporter {
    pub fn detailed_count(&self) -> usize {
        self.detailed.lock().len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.lock().len()
    }
}

impl ErrorReporter for CollectingReporter {
    fn report_detailed(&self, _sender: &str, report: Report) {
        self.detailed.lock().push(report);
    }

    fn report_warning(&self, _sender: &str, report: Report) {
        self.warnings.lock().push(report);
    }
}

/// Definer that counts definitions and delegates to the in-process one.
#[derive(Default)]
pub struct CountingDefiner {
    inner: InProcessDefiner,
    pub calls: AtomicUsize,
}

impl CountingDefiner {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TypeDefiner for CountingDefiner {
    fn define(
        &self,
        owner: &RecordType,
        definition: SpecializedDefinition,
    ) -> Result<Arc<SpecializedType>, DefineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.define(owner, definition)
    }
}

/// Definer that always refuses.
pub struct FailingDefiner;

impl TypeDefiner for FailingDefiner {
    fn define(
        &self,
        owner: &RecordType,
        _definition: SpecializedDefinition,
    ) -> Result<Arc<SpecializedType>, DefineError> {
        Err(DefineError::Rejected(format!("{} is not allowed", owner.name())))
    }
}

/// Definer that blocks every definition until the gate is opened, and
/// signals each time it is entered.
pub struct GatedDefiner {
    inner: InProcessDefiner,
    entered: Sender<()>,
    gate: Receiver<()>,
    pub calls: AtomicUsize,
}

/// Handle used by a test to observe and release a [`GatedDefiner`].
pub struct Gate {
    pub entered: Receiver<()>,
    open: Sender<()>,
}

impl Gate {
    /// Let `n` pending definitions proceed.
    pub fn release(&self, n: usize) {
        for _ in 0..n {
            self.open.send(()).expect("open gate");
        }
    }
}

impl GatedDefiner {
    pub fn new() -> (Arc<Self>, Gate) {
        let (entered_tx, entered_rx) = channel::unbounded();
        let (open_tx, open_rx) = channel::unbounded();
        let definer = Arc::new(Self {
            inner: InProcessDefiner::new(),
            entered: entered_tx,
            gate: open_rx,
            calls: AtomicUsize::new(0),
        });
        (
            definer,
            Gate {
                entered: entered_rx,
                open: open_tx,
            },
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TypeDefiner for GatedDefiner {
    fn define(
        &self,
        owner: &RecordType,
        definition: SpecializedDefinition,
    ) -> Result<Arc<SpecializedType>, DefineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.entered.send(());
        self.gate
            .recv_timeout(WAIT)
            .map_err(|_| DefineError::Rejected("gate never opened".into()))?;
        self.inner.define(owner, definition)
    }
}

/// Definer that refuses its first `failures` definitions, then delegates to
/// the in-process one.
pub struct FlakyDefiner {
    inner: InProcessDefiner,
    failures: AtomicUsize,
    pub calls: AtomicUsize,
}

impl FlakyDefiner {
    pub fn new(failures: usize) -> Self {
        Self {
            inner: InProcessDefiner::new(),
            failures: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TypeDefiner for FlakyDefiner {
    fn define(
        &self,
        owner: &RecordType,
        definition: SpecializedDefinition,
    ) -> Result<Arc<SpecializedType>, DefineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let refused = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if refused {
            return Err(DefineError::Rejected(format!("{} refused for now", owner.name())));
        }
        self.inner.define(owner, definition)
    }
}
