//! System Tools MCP Library
//!
//! Local operating-system introspection and control via MCP: process
//! listing and termination, command execution with timeouts, file
//! operations, environment variables, and system/disk/network statistics.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use systools_mcp::SysToolsMcpServer;
//!
//! let server = SysToolsMcpServer::new();
//! // Use with in-memory transport or serve via stdio
//! ```
//!
//! # Usage as Binary
//!
//! Run directly: `systools-mcp`
//!
//! Or configure in `.mcp.json`:
//! ```json
//! { "mcpServers": { "systools": { "command": "./systools-mcp" } } }
//! ```

pub mod params;
pub mod server;
pub mod sys;
pub mod types;

// Re-export main server type
pub use server::SysToolsMcpServer;

// Re-export parameter types for direct API usage
pub use params::*;

// Re-export EmbeddableMcp trait for in-process usage
pub use mcp_common::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
