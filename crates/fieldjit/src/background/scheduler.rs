// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Background specialization worker.
//!
//! One worker thread compiles queued accessors in submission order. Requests
//! for a key that is already pending join the existing job, so each key is
//! compiled once however many callers ask for it, and every listener of the
//! job is notified exactly once.
//!
//! The first failed job disables the scheduler: later requests are ignored
//! and the failure goes to the [`ErrorReporter`]. Callers never see it.

use super::listener::CompileListener;
use super::report::{ErrorReporter, Report, REPORT_CANNOT_COMPILE, REPORT_CANNOT_SCHEDULE};
use crate::accessor::GenericAccessor;
use crate::compiler::{SpecializationKey, Specializer};
use crate::config::SpecializerConfig;
use crate::error::{Error, Result};
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Sender name used in reports.
const REPORT_SENDER: &str = "BackgroundSpecializer";

type Listeners = Vec<Arc<dyn CompileListener>>;

/// What `schedule_compilation` did with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduled {
    /// A new job was queued.
    Submitted,
    /// The listener joined a job already pending for the key.
    Joined,
    /// The scheduler is disabled or shut down.
    Skipped,
    /// The queue refused the job; a warning was reported.
    Rejected,
}

struct Job {
    key: SpecializationKey,
    source: GenericAccessor,
}

/// State shared with the worker thread.
struct Shared {
    specializer: Arc<Specializer>,
    reporter: Arc<dyn ErrorReporter>,
    pending: Mutex<HashMap<SpecializationKey, Listeners>>,
    enabled: AtomicBool,
    completed: AtomicU64,
}

impl Shared {
    fn process(&self, job: Job) {
        let Job { key, source } = job;

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.compile_and_notify(&key, &source)))
            .unwrap_or_else(|payload| {
                Err(Error::CompilationFailure {
                    target: key.target_type().clone(),
                    reason: format!("job panicked: {}", panic_message(payload.as_ref())),
                })
            });

        if let Err(err) = result {
            self.enabled.store(false, Ordering::SeqCst);
            let listeners = self.pending.lock().remove(&key).unwrap_or_default();
            self.reporter.report_detailed(
                REPORT_SENDER,
                Report::new(REPORT_CANNOT_COMPILE)
                    .caller_param(source.describe())
                    .error(&err),
            );
            for listener in &listeners {
                let notified = panic::catch_unwind(AssertUnwindSafe(|| listener.on_failed(&err)));
                if notified.is_err() {
                    log::debug!("[background] listener panicked on failure of {}", key);
                }
            }
        }
    }

    fn compile_and_notify(&self, key: &SpecializationKey, source: &GenericAccessor) -> Result<()> {
        let compiled = self.specializer.compile(source)?;

        // Joining and taking the listener set are serialized by this lock.
        let listeners = self.pending.lock().remove(key).unwrap_or_default();
        log::trace!(
            "[background] {} compiled, notifying {} listener(s)",
            key,
            listeners.len()
        );
        for listener in &listeners {
            listener.on_compiled(&compiled);
        }
        self.completed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn run_worker(shared: Arc<Shared>, jobs: Receiver<Job>, _done: Sender<()>) {
    log::debug!("[background] worker started");
    for job in jobs.iter() {
        shared.process(job);
    }
    log::debug!("[background] worker stopped");
}

/// Compiles accessors on a dedicated worker thread.
///
/// Hosts create one scheduler, install it into the consumers that want
/// specialized accessors, and call [`shutdown_all`](Self::shutdown_all) when
/// done. Dropping the scheduler closes the queue without waiting.
pub struct BackgroundSpecializer {
    shared: Arc<Shared>,
    jobs: RwLock<Option<Sender<Job>>>,
    /// Disconnects once the worker has exited.
    done: Receiver<()>,
    worker: Mutex<Option<JoinHandle<()>>>,
    shutdown_delay: Duration,
}

impl BackgroundSpecializer {
    /// Spawn a scheduler with its own specializer.
    pub fn new(config: SpecializerConfig, reporter: Arc<dyn ErrorReporter>) -> Result<Self> {
        Self::with_specializer(config, Arc::new(Specializer::new()), reporter)
    }

    /// Spawn a scheduler compiling through `specializer`.
    pub fn with_specializer(
        config: SpecializerConfig,
        specializer: Arc<Specializer>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Result<Self> {
        config.validate()?;

        let (job_tx, job_rx) = channel::bounded(config.queue_capacity);
        let (done_tx, done_rx) = channel::bounded(1);
        let shared = Arc::new(Shared {
            specializer,
            reporter,
            pending: Mutex::new(HashMap::new()),
            enabled: AtomicBool::new(config.enabled),
            completed: AtomicU64::new(0),
        });

        let worker_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || run_worker(worker_shared, job_rx, done_tx))
            .map_err(Error::WorkerSpawn)?;

        log::debug!(
            "[background] spawned {} (queue capacity {})",
            config.thread_name,
            config.queue_capacity
        );

        Ok(Self {
            shared,
            jobs: RwLock::new(Some(job_tx)),
            done: done_rx,
            worker: Mutex::new(Some(handle)),
            shutdown_delay: config.shutdown_delay(),
        })
    }

    /// Ask for `source` to be specialized in the background; `listener` gets
    /// the result.
    ///
    /// Never blocks and never fails the caller. Nothing happens when the
    /// scheduler is disabled or shut down.
    pub fn schedule_compilation(
        &self,
        source: &GenericAccessor,
        listener: Arc<dyn CompileListener>,
    ) -> Scheduled {
        if !self.is_enabled() {
            return Scheduled::Skipped;
        }
        let jobs = self.jobs.read();
        let Some(sender) = jobs.as_ref() else {
            return Scheduled::Skipped;
        };

        let key = SpecializationKey::for_accessor(source);
        let mut pending = self.shared.pending.lock();
        if let Some(listeners) = pending.get_mut(&key) {
            push_unique(listeners, listener);
            return Scheduled::Joined;
        }
        pending.insert(key.clone(), vec![listener]);

        let job = Job {
            key: key.clone(),
            source: source.clone(),
        };
        match sender.try_send(job) {
            Ok(()) => {
                log::trace!("[background] queued {}", key);
                Scheduled::Submitted
            }
            Err(err) => {
                pending.remove(&key);
                drop(pending);
                let reason = match err {
                    TrySendError::Full(_) => "job queue is full",
                    TrySendError::Disconnected(_) => "worker has stopped",
                };
                self.shared.reporter.report_warning(
                    REPORT_SENDER,
                    Report::new(REPORT_CANNOT_SCHEDULE)
                        .caller_param(source.describe())
                        .error(&Error::SchedulingRejection(reason.to_string())),
                );
                Scheduled::Rejected
            }
        }
    }

    /// Add `listener` to the job pending for `source`'s key, if any.
    pub fn add_listener(&self, source: &GenericAccessor, listener: Arc<dyn CompileListener>) -> bool {
        let key = SpecializationKey::for_accessor(source);
        match self.shared.pending.lock().get_mut(&key) {
            Some(listeners) => {
                push_unique(listeners, listener);
                true
            }
            None => false,
        }
    }

    /// Disable the scheduler and close the queue, waiting up to the
    /// configured delay for queued jobs to finish.
    pub fn shutdown_all(&self) -> bool {
        self.shutdown_all_timeout(self.shutdown_delay)
    }

    /// Disable the scheduler and close the queue, waiting up to `timeout`.
    ///
    /// Returns true once the worker has exited. A worker still busy after the
    /// timeout is left to finish on its own.
    pub fn shutdown_all_timeout(&self, timeout: Duration) -> bool {
        if self.shared.enabled.swap(false, Ordering::SeqCst) {
            log::debug!("[background] disabled by shutdown");
        }
        if self.jobs.write().take().is_some() {
            log::debug!("[background] queue closed, draining for up to {:?}", timeout);
        }

        let finished = matches!(
            self.done.recv_timeout(timeout),
            Err(RecvTimeoutError::Disconnected) | Ok(())
        );
        if finished {
            if let Some(handle) = self.worker.lock().take() {
                let _ = handle.join();
            }
        } else {
            log::debug!("[background] worker still busy after {:?}, detaching", timeout);
        }
        finished
    }

    pub fn is_enabled(&self) -> bool {
        self.shared.enabled.load(Ordering::SeqCst)
    }

    /// Enable or disable scheduling. A scheduler that was shut down stays
    /// inert either way.
    pub fn set_enabled(&self, enabled: bool) {
        self.shared.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn is_shut_down(&self) -> bool {
        self.jobs.read().is_none()
    }

    pub fn specializer(&self) -> &Arc<Specializer> {
        &self.shared.specializer
    }

    /// Number of keys with a job in flight.
    pub fn pending_jobs(&self) -> usize {
        self.shared.pending.lock().len()
    }

    /// Number of jobs compiled and delivered.
    pub fn completed_jobs(&self) -> u64 {
        self.shared.completed.load(Ordering::Relaxed)
    }
}

fn push_unique(listeners: &mut Listeners, listener: Arc<dyn CompileListener>) {
    if !listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
        listeners.push(listener);
    }
}

impl fmt::Debug for BackgroundSpecializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundSpecializer")
            .field("enabled", &self.is_enabled())
            .field("shut_down", &self.is_shut_down())
            .field("pending", &self.pending_jobs())
            .field("completed", &self.completed_jobs())
            .finish()
    }
}

impl Drop for BackgroundSpecializer {
    fn drop(&mut self) {
        self.shutdown_all_timeout(Duration::ZERO);
    }
}
