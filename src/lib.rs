// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // protector, mirror, demand and update backends
pub mod config;     // runtime config + project discovery
pub mod engine;     // orchestrators, supervision, watchdog
pub mod errors;     // error handling
pub mod observability;
pub mod pipeline;   // one generation pass
pub mod store;      // local artifact pool
pub mod traits;     // seams to the outside world
