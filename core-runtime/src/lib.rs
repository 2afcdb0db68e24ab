//! # Core Runtime Module
//!
//! Ambient infrastructure shared by the link layer:
//! - Logging and tracing setup, with optional forwarding to a host sink
//! - Session configuration with fail-fast validation
//!
//! ## Overview
//!
//! Nothing in here touches the native library directly. `core-link` consumes
//! a validated [`SessionConfig`](config::SessionConfig) and emits `tracing`
//! events that [`logging`] routes to stdout and to the host.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
