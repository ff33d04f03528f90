//! System Tools MCP Server
//!
//! Local operating-system introspection and control via MCP: process
//! listing and termination, command execution with timeouts, file
//! operations, environment variables, and system/disk/network statistics.
//!
//! # Usage
//!
//! Run directly: `systools-mcp`
//!
//! Or configure in `.mcp.json`:
//! ```json
//! { "mcpServers": { "systools": { "command": "./systools-mcp" } } }
//! ```

mod params;
mod server;
mod sys;
mod types;

use server::SysToolsMcpServer;

mcp_common::serve_stdio!(SysToolsMcpServer, "systools_mcp");
