//! Configuration loading for msalive.
//!
//! Uses figment for YAML-based configuration with sensible defaults and
//! `MSALIVE_*` environment overrides. The defaults target the Microsoft
//! Account (login.live.com) endpoints.

pub mod schema;

pub use schema::{Config, ENV_PREFIX, FlowConfig, HttpConfig, LogConfig};
