//! Shared plumbing for MCP servers.
//!
//! - [`init_tracing`] and the `serve_stdio!` macro for standardized startup
//! - [`json_success`] for building `CallToolResult` responses
//! - [`internal_error`] / [`invalid_params`] error constructors
//! - [`EmbeddableMcp`] for calling tools in-process (used heavily by tests)

pub mod embeddable;
pub mod error;
pub mod init;
pub mod result;

pub use embeddable::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use error::{internal_error, invalid_params, McpResult};
pub use init::init_tracing;
pub use result::json_success;

// Re-export rmcp types that every server needs
pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

// Re-export async_trait for implementing EmbeddableMcp
pub use async_trait::async_trait;
