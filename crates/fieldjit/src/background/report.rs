// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error reporting for background failures.
//!
//! Background jobs have no caller to return an error to. Failures are handed
//! to an [`ErrorReporter`] instead; [`LogReporter`] forwards them to `log`.

use std::fmt;

/// Kind of a reported failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportType(&'static str);

impl ReportType {
    pub const fn new(message: &'static str) -> Self {
        Self(message)
    }

    pub const fn message(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A compile job failed; background specialization is now disabled.
pub const REPORT_CANNOT_COMPILE: ReportType =
    ReportType::new("Cannot compile accessor. Disabling background specialization.");

/// A job could not be queued.
pub const REPORT_CANNOT_SCHEDULE: ReportType =
    ReportType::new("Unable to schedule specialization task.");

/// One reported failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    kind: ReportType,
    context: Vec<String>,
    error: Option<String>,
}

impl Report {
    pub fn new(kind: ReportType) -> Self {
        Self {
            kind,
            context: Vec::new(),
            error: None,
        }
    }

    /// Attach a description of the object being processed.
    pub fn caller_param(mut self, param: impl Into<String>) -> Self {
        self.context.push(param.into());
        self
    }

    pub fn error(mut self, error: &dyn std::error::Error) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn kind(&self) -> ReportType {
        self.kind
    }

    pub fn context(&self) -> &[String] {
        &self.context
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(error) = &self.error {
            write!(f, " Cause: {}", error)?;
        }
        for param in &self.context {
            write!(f, " [{}]", param)?;
        }
        Ok(())
    }
}

/// Sink for failures of background jobs.
pub trait ErrorReporter: Send + Sync {
    /// Hard failure, reported with full context.
    fn report_detailed(&self, sender: &str, report: Report);

    /// Soft failure; the reporting component keeps working.
    fn report_warning(&self, sender: &str, report: Report);
}

/// Reporter backed by the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report_detailed(&self, sender: &str, report: Report) {
        log::error!("[{}] {}", sender, report);
    }

    fn report_warning(&self, sender: &str, report: Report) {
        log::warn!("[{}] {}", sender, report);
    }
}
