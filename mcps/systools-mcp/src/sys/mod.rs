//! OS adapter modules backing the MCP tools.
//!
//! Each module is a thin layer over the OS facility (or the `sysinfo` /
//! `netstat2` crates) it fronts. Action-performing operations return a
//! [`crate::types::CommandResult`]; enumeration operations return typed
//! records and reserve errors for malformed input.

pub mod disk;
pub mod env;
pub mod exec;
pub mod files;
pub mod info;
pub mod network;
pub mod process;
