//! In-process tool dispatch for MCP servers.
//!
//! Servers implementing [`EmbeddableMcp`] can have their tools listed and
//! called directly, without a transport. Tests use this to exercise the
//! whole tool surface the way a client would.

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("mcp error: {0}")]
    McpError(String),
}

impl From<rmcp::ErrorData> for EmbeddableError {
    fn from(err: rmcp::ErrorData) -> Self {
        EmbeddableError::McpError(err.message.to_string())
    }
}

pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// An MCP server that can execute tools in-process.
///
/// Implementations must be `Send + Sync`; servers built with rmcp's
/// `#[tool_router]` can delegate `list_tools` to their internal router and
/// dispatch `call_tool` by name.
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Server name, matching the name used in MCP configuration files.
    fn server_name(&self) -> &str;

    /// All available tools with their input schemas.
    fn list_tools(&self) -> Vec<Tool>;

    /// Execute a tool by name with JSON parameters.
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    /// Optional human-readable server description.
    fn server_description(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestServer;

    #[async_trait]
    impl EmbeddableMcp for TestServer {
        fn server_name(&self) -> &str {
            "test-server"
        }

        fn list_tools(&self) -> Vec<Tool> {
            vec![]
        }

        async fn call_tool(&self, name: &str, _params: Value) -> EmbeddableResult<CallToolResult> {
            Err(EmbeddableError::ToolNotFound(name.to_string()))
        }
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let server = TestServer;
        let result = server.call_tool("unknown", serde_json::json!({})).await;
        assert!(matches!(result, Err(EmbeddableError::ToolNotFound(_))));
    }
}
