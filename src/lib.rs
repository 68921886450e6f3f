//! Remotely toggleable render flag ("kill switch") service.
//!
//! A client application asks `GET /api/check-app-status` whether it should
//! render. Operators flip the flag with
//! `POST /api/toggle-app-status?apiKey=...`.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`store`]: The status store trait and its memory, file and MongoDB backends
//! - [`switch`]: Serialized read-negate-write over the injected store
//! - [`api`]: HTTP handlers, routes and OpenAPI docs
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod store;
pub mod switch;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
pub use switch::KillSwitch;
