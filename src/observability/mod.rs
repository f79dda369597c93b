// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and failure metrics.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging throughout coresync. Message types follow a struct-based pattern with
//! `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep log wording in one place per subsystem
//! * Provide consistent, structured logging output (every value is also a field)
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::discovery` - project folder scanning and manifest validation
//! * `messages::store` - local artifact pool eviction and purging
//! * `messages::pipeline` - generation pass steps
//! * `messages::orchestrator` - per-project control loop
//! * `messages::supervisor` - task supervision and shutdown
//! * `messages::watchdog` - self-update polling and restart
//!
//! Per-project failure counters live in [`metrics`].
//!
//! # Usage
//!
//! ```rust
//! use coresync::observability::messages::{pipeline::PassStarted, StructuredLog};
//!
//! PassStarted {
//!     project: "alpha",
//!     pass: 1,
//!     of: 3,
//! }
//! .log();
//! ```

pub mod messages;
pub mod metrics;
