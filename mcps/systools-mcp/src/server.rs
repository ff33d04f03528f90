//! MCP Server implementation for system tools

use std::sync::Arc;

use mcp_common::{
    async_trait, internal_error, invalid_params, json_success, EmbeddableError, EmbeddableMcp,
    EmbeddableResult, McpError,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router,
};
use serde_json::Value;
use sysinfo::System;
use tokio::sync::Mutex;

use crate::params::*;
use crate::sys;
use crate::sys::env::EnvOverlay;
use crate::types::{
    DiskUsageResponse, EnvVarResponse, EnvVarsResponse, ListFilesResponse, ListeningPortsResponse,
    NetworkInfoResponse, ProcessListResponse, ReadFileResponse, SysError,
};

/// The System Tools MCP Server
#[derive(Clone)]
pub struct SysToolsMcpServer {
    system: Arc<Mutex<System>>,
    env: Arc<EnvOverlay>,
    tool_router: ToolRouter<Self>,
}

fn sys_error_to_mcp(err: SysError) -> McpError {
    match &err {
        SysError::NotFound(_) | SysError::InvalidInput(_) => invalid_params(err.to_string()),
        SysError::AccessDenied(_) => McpError::invalid_request(err.to_string(), None),
        SysError::Io(_) => internal_error(err.to_string()),
    }
}

// ============================================================================
// Tool Router Implementation
// ============================================================================

#[tool_router]
impl SysToolsMcpServer {
    pub fn new() -> Self {
        Self {
            system: Arc::new(Mutex::new(System::new_all())),
            env: Arc::new(EnvOverlay::new()),
            tool_router: Self::tool_router(),
        }
    }

    // ------------------------------------------------------------------
    // Process management
    // ------------------------------------------------------------------

    #[tool(
        description = "List running processes with optional name/user filtering and best-effort \
                       CPU/memory/command-line details"
    )]
    async fn list_processes(
        &self,
        Parameters(params): Parameters<ListProcessesParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut sys = self.system.lock().await;
        let processes = sys::process::list_processes(
            &mut sys,
            params.filter_name.as_deref(),
            params.filter_user.as_deref(),
            params.include_details.unwrap_or(false),
        )
        .await;
        let count = processes.len();
        json_success(&ProcessListResponse { processes, count })
    }

    #[tool(
        description = "Terminate a process by PID. Graceful termination with a 5 second exit \
                       wait and escalation to force kill; set force for an immediate kill. \
                       Always returns a result record, never an error"
    )]
    async fn kill_process(
        &self,
        Parameters(params): Parameters<KillProcessParams>,
    ) -> Result<CallToolResult, McpError> {
        // runs on its own snapshot; the shared one stays free for other
        // tools during the exit wait
        let result = sys::process::kill_process(params.pid, params.force.unwrap_or(false)).await;
        json_success(&result)
    }

    #[tool(
        description = "Terminate all processes matching a name (case-insensitive, exact). Each \
                       match gets one signal; killed PIDs are listed in stdout"
    )]
    async fn kill_processes_by_name(
        &self,
        Parameters(params): Parameters<KillProcessesByNameParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut sys = self.system.lock().await;
        let result = sys::process::kill_processes_by_name(
            &mut sys,
            &params.name,
            params.force.unwrap_or(false),
        );
        json_success(&result)
    }

    // ------------------------------------------------------------------
    // System information
    // ------------------------------------------------------------------

    #[tool(
        description = "Get system information: OS, kernel, hostname, architecture, CPU, memory, \
                       swap, boot time and uptime"
    )]
    async fn get_system_info(&self) -> Result<CallToolResult, McpError> {
        let mut sys = self.system.lock().await;
        sys.refresh_cpu_all();
        sys.refresh_memory();
        json_success(&sys::info::get_system_info(&sys))
    }

    #[tool(
        description = "Get disk usage for all mounted partitions, or for the partition \
                       containing a specific path"
    )]
    async fn get_disk_usage(
        &self,
        Parameters(params): Parameters<GetDiskUsageParams>,
    ) -> Result<CallToolResult, McpError> {
        let disks =
            sys::disk::get_disk_usage(params.path.as_deref()).map_err(sys_error_to_mcp)?;
        let count = disks.len();
        json_success(&DiskUsageResponse { disks, count })
    }

    #[tool(
        description = "Get network interface information: MAC and IP addresses plus traffic \
                       and error counters"
    )]
    async fn get_network_info(&self) -> Result<CallToolResult, McpError> {
        let interfaces = sys::network::get_network_info();
        let count = interfaces.len();
        json_success(&NetworkInfoResponse { interfaces, count })
    }

    #[tool(description = "Get TCP ports currently in the LISTEN state with owning processes")]
    async fn get_listening_ports(&self) -> Result<CallToolResult, McpError> {
        let mut sys = self.system.lock().await;
        let ports = sys::network::get_listening_ports(&mut sys).map_err(sys_error_to_mcp)?;
        let count = ports.len();
        json_success(&ListeningPortsResponse { ports, count })
    }

    // ------------------------------------------------------------------
    // File operations
    // ------------------------------------------------------------------

    #[tool(description = "List files and directories, optionally hidden entries and recursive")]
    async fn list_files(
        &self,
        Parameters(params): Parameters<ListFilesParams>,
    ) -> Result<CallToolResult, McpError> {
        let directory = params.directory.unwrap_or_else(|| ".".to_string());
        let files = sys::files::list_files(
            &directory,
            params.include_hidden.unwrap_or(false),
            params.recursive.unwrap_or(false),
        )
        .await
        .map_err(sys_error_to_mcp)?;
        let count = files.len();
        json_success(&ListFilesResponse {
            directory,
            files,
            count,
        })
    }

    #[tool(
        description = "Read a file as UTF-8 text. Read failures are reported in the response \
                       with success=false"
    )]
    async fn read_file(
        &self,
        Parameters(params): Parameters<ReadFileParams>,
    ) -> Result<CallToolResult, McpError> {
        let response = match sys::files::read_file(&params.filepath).await {
            Ok(content) => ReadFileResponse {
                filepath: params.filepath,
                content,
                success: true,
                error: None,
            },
            Err(e) => ReadFileResponse {
                filepath: params.filepath,
                content: String::new(),
                success: false,
                error: Some(e.to_string()),
            },
        };
        json_success(&response)
    }

    #[tool(description = "Write or append text content to a file")]
    async fn write_file(
        &self,
        Parameters(params): Parameters<WriteFileParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = sys::files::write_file(
            &params.filepath,
            &params.content,
            params.append.unwrap_or(false),
        )
        .await;
        json_success(&result)
    }

    // ------------------------------------------------------------------
    // Command execution
    // ------------------------------------------------------------------

    #[tool(
        description = "Execute a command, capturing stdout/stderr and exit code. Runs through \
                       the platform shell by default (the command text is passed verbatim); an \
                       optional timeout kills the child and its process group with exit code 124"
    )]
    async fn execute_command(
        &self,
        Parameters(params): Parameters<ExecuteCommandParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(command = %params.command, "executing command");
        let extra_env = self.env.overlay_pairs();
        let result = sys::exec::execute_command(
            &params.command,
            params.cwd.as_deref(),
            params.timeout,
            params.shell.unwrap_or(true),
            &extra_env,
        )
        .await;
        json_success(&result)
    }

    #[tool(description = "Ping a host to test connectivity")]
    async fn ping_host(
        &self,
        Parameters(params): Parameters<PingHostParams>,
    ) -> Result<CallToolResult, McpError> {
        let extra_env = self.env.overlay_pairs();
        let result =
            sys::exec::ping_host(&params.host, params.count.unwrap_or(4), &extra_env).await;
        json_success(&result)
    }

    // ------------------------------------------------------------------
    // Environment variables
    // ------------------------------------------------------------------

    #[tool(description = "Get all environment variables visible to this server")]
    async fn get_environment_variables(&self) -> Result<CallToolResult, McpError> {
        let variables = self.env.all();
        let count = variables.len();
        json_success(&EnvVarsResponse { variables, count })
    }

    #[tool(description = "Get a specific environment variable")]
    async fn get_environment_variable(
        &self,
        Parameters(params): Parameters<GetEnvVarParams>,
    ) -> Result<CallToolResult, McpError> {
        let value = self.env.get(&params.name);
        json_success(&EnvVarResponse {
            name: params.name,
            exists: value.is_some(),
            value,
        })
    }

    #[tool(
        description = "Set an environment variable for this server session. Applies to commands \
                       spawned after the call; the server's own process environment is untouched"
    )]
    async fn set_environment_variable(
        &self,
        Parameters(params): Parameters<SetEnvVarParams>,
    ) -> Result<CallToolResult, McpError> {
        json_success(&self.env.set(&params.name, &params.value))
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for SysToolsMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "System Tools MCP Server - process listing and termination, command \
                 execution with timeouts, file operations, environment variables, and \
                 system/disk/network statistics."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

impl Default for SysToolsMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for SysToolsMcpServer {
    fn server_name(&self) -> &str {
        "systools"
    }

    fn server_description(&self) -> Option<&str> {
        Some(
            "System Tools MCP Server - process listing and termination, command execution \
             with timeouts, file operations, environment variables, and system/disk/network \
             statistics.",
        )
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        match name {
            "list_processes" => {
                let params: ListProcessesParams = serde_json::from_value(params)?;
                self.list_processes(Parameters(params)).await.map_err(Into::into)
            }

            "kill_process" => {
                let params: KillProcessParams = serde_json::from_value(params)?;
                self.kill_process(Parameters(params)).await.map_err(Into::into)
            }

            "kill_processes_by_name" => {
                let params: KillProcessesByNameParams = serde_json::from_value(params)?;
                self.kill_processes_by_name(Parameters(params))
                    .await
                    .map_err(Into::into)
            }

            "get_system_info" => self.get_system_info().await.map_err(Into::into),

            "get_disk_usage" => {
                let params: GetDiskUsageParams = serde_json::from_value(params)?;
                self.get_disk_usage(Parameters(params)).await.map_err(Into::into)
            }

            "get_network_info" => self.get_network_info().await.map_err(Into::into),

            "get_listening_ports" => self.get_listening_ports().await.map_err(Into::into),

            "list_files" => {
                let params: ListFilesParams = serde_json::from_value(params)?;
                self.list_files(Parameters(params)).await.map_err(Into::into)
            }

            "read_file" => {
                let params: ReadFileParams = serde_json::from_value(params)?;
                self.read_file(Parameters(params)).await.map_err(Into::into)
            }

            "write_file" => {
                let params: WriteFileParams = serde_json::from_value(params)?;
                self.write_file(Parameters(params)).await.map_err(Into::into)
            }

            "execute_command" => {
                let params: ExecuteCommandParams = serde_json::from_value(params)?;
                self.execute_command(Parameters(params)).await.map_err(Into::into)
            }

            "ping_host" => {
                let params: PingHostParams = serde_json::from_value(params)?;
                self.ping_host(Parameters(params)).await.map_err(Into::into)
            }

            "get_environment_variables" => {
                self.get_environment_variables().await.map_err(Into::into)
            }

            "get_environment_variable" => {
                let params: GetEnvVarParams = serde_json::from_value(params)?;
                self.get_environment_variable(Parameters(params))
                    .await
                    .map_err(Into::into)
            }

            "set_environment_variable" => {
                let params: SetEnvVarParams = serde_json::from_value(params)?;
                self.set_environment_variable(Parameters(params))
                    .await
                    .map_err(Into::into)
            }

            _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
        }
    }
}
