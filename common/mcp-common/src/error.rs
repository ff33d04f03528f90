//! Error constructors shared by tool implementations.

use rmcp::ErrorData as McpError;

/// Result alias for MCP tool handlers.
pub type McpResult<T> = Result<T, McpError>;

/// Build an internal error from any message.
pub fn internal_error(message: impl Into<String>) -> McpError {
    McpError::internal_error(message.into(), None)
}

/// Build an invalid-params error from any message.
pub fn invalid_params(message: impl Into<String>) -> McpError {
    McpError::invalid_params(message.into(), None)
}
