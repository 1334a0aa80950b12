// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Background specialization
//!
//! [`BackgroundSpecializer`] runs [`Specializer::compile`](crate::compiler::Specializer::compile)
//! off the caller's thread and delivers results to [`CompileListener`]s.

mod listener;
mod report;
mod scheduler;

pub use listener::CompileListener;
pub use report::{
    ErrorReporter, LogReporter, Report, ReportType, REPORT_CANNOT_COMPILE, REPORT_CANNOT_SCHEDULE,
};
pub use scheduler::{BackgroundSpecializer, Scheduled};
