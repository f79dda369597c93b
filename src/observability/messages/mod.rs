// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit it at its own level with every value attached as a
//! tracing field.
//!
//! # Usage Pattern
//!
//! ```rust
//! use coresync::observability::messages::{orchestrator::CycleStatus, StructuredLog};
//!
//! let msg = CycleStatus {
//!     project: "alpha",
//!     local_count: 3,
//!     file_amount: 5,
//!     remote_requested: 0,
//!     needed: 2,
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod discovery;
pub mod orchestrator;
pub mod pipeline;
pub mod store;
pub mod supervisor;
pub mod watchdog;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Create a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
