// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Concrete implementations of the external collaborators.
//!
//! Every generation pass talks to the outside world through the traits in
//! [`crate::traits`]. This module provides the production implementations and,
//! in test builds, in-memory stand-ins.
//!
//! # Available Backends
//!
//! ## Protection
//! - **CommandProtector**: runs the configured protector with the staged file as
//!   both input and output, optionally under a timeout
//!
//! ## Mirror
//! - **ScriptedMirror**: renders a sync script into a temporary file and hands it
//!   to an external tool (the default, for SFTP-style destinations)
//! - **LocalMirror**: makes a directory on a mounted filesystem equal to the
//!   output directory, deleting extras
//!
//! ## Demand
//! - **HttpDemandSource**: `GET` against the project's demand endpoint
//!
//! ## Update
//! - **GitUpdateSource**: compares the working copy with `origin` through the
//!   `git` CLI
//!
//! ## Stub Backend (Test-Only)
//! - Recording protector and mirror, fixed and scripted demand, scripted update
//!   source
//! - **Note**: NOT available in production builds
//!
//! # Examples
//!
//! ```rust
//! use coresync::backends::BackendFactory;
//! use coresync::config::{MirrorConfig, MirrorKind};
//!
//! let mirror = BackendFactory::mirror(&MirrorConfig {
//!     kind: MirrorKind::Local,
//!     ..MirrorConfig::default()
//! });
//! assert_eq!(mirror.name(), "local");
//! ```

pub mod command;
pub mod factory;
pub mod git;
pub mod http;
pub mod mirror;
pub mod process;

#[cfg(test)]
pub mod stub;

pub use command::CommandProtector;
pub use factory::BackendFactory;
pub use git::GitUpdateSource;
pub use http::HttpDemandSource;
pub use mirror::{LocalMirror, ScriptedMirror};
