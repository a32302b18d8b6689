//! Gemini Image MCP Common Library
//!
//! Shared configuration, error handling, model definitions, transport
//! selection, bearer-token gating and tracing for the Gemini image MCP server.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod tracing;
pub mod transport;

#[cfg(test)]
mod config_test;
#[cfg(test)]
mod error_test;

pub use config::Config;
pub use error::{ConfigError, Error, ErrorKind, Result};
pub use models::{DEFAULT_IMAGE_MODEL, IMAGE_MODELS, ImageModel, ModelRegistry};
pub use server::{McpServerBuilder, ServerError, shutdown_channel};
pub use transport::{Transport, TransportArgs, TransportMode};
