//! Config-declared HTTP tools.
//!
//! This crate holds everything that turns a declared tool into an outbound HTTP call:
//! - [`config`]: the startup configuration file
//! - [`registry`]: tool descriptors + name lookup, built once
//! - [`template`]: `{{.args.*}}` / `{{.config.*}}` URL substitution
//! - [`forward`]: the HTTP client
//!
//! It knows nothing about MCP transports or sessions.

pub mod config;
pub mod content;
pub mod error;
pub mod forward;
pub mod registry;
pub mod semantics;
pub mod template;

pub use error::{HttpToolsError, Result};
