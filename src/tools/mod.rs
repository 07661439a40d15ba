//! Agent tool gateway.
//!
//! A thin HTTP process exposing the backend as a set of agent-callable
//! tools. Every authenticated tool takes an explicit `token` argument;
//! the gateway keeps no per-user state, so one gateway instance can
//! serve many concurrent agent sessions.

pub mod client;
pub mod handlers;
pub mod registry;
pub mod server;

pub use client::{BackendClient, Session};
pub use registry::{registry, ToolSpec};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments: {0}")]
    BadArgs(String),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend request failed: {0}")]
    Http(String),
}
