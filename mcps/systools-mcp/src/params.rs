//! Parameter types for systools MCP tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListProcessesParams {
    #[schemars(description = "Filter processes by name (case-insensitive substring match)")]
    #[serde(default)]
    pub filter_name: Option<String>,

    #[schemars(description = "Filter processes by exact username")]
    #[serde(default)]
    pub filter_user: Option<String>,

    #[schemars(description = "Include CPU, memory, thread and command-line details (best-effort)")]
    #[serde(default)]
    pub include_details: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct KillProcessParams {
    #[schemars(description = "Process ID to terminate")]
    pub pid: u32,

    #[schemars(description = "Send an immediate kill instead of a graceful termination signal")]
    #[serde(default)]
    pub force: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct KillProcessesByNameParams {
    #[schemars(description = "Process name to match (case-insensitive, exact)")]
    pub name: String,

    #[schemars(description = "Send an immediate kill instead of a graceful termination signal")]
    #[serde(default)]
    pub force: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetDiskUsageParams {
    #[schemars(description = "Specific path to check (default: all mounted partitions)")]
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListFilesParams {
    #[schemars(description = "Directory to list (default: current directory)")]
    #[serde(default)]
    pub directory: Option<String>,

    #[schemars(description = "Include hidden entries (names starting with a dot)")]
    #[serde(default)]
    pub include_hidden: Option<bool>,

    #[schemars(description = "Recurse into subdirectories")]
    #[serde(default)]
    pub recursive: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ReadFileParams {
    #[schemars(description = "Path of the file to read (UTF-8)")]
    pub filepath: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct WriteFileParams {
    #[schemars(description = "Path of the file to write")]
    pub filepath: String,

    #[schemars(description = "Content to write")]
    pub content: String,

    #[schemars(description = "Append instead of overwriting")]
    #[serde(default)]
    pub append: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ExecuteCommandParams {
    #[schemars(description = "Command to execute. Passed to the shell verbatim when shell=true")]
    pub command: String,

    #[schemars(description = "Working directory for the command")]
    #[serde(default)]
    pub cwd: Option<String>,

    #[schemars(description = "Timeout in seconds (default: no timeout)")]
    #[serde(default)]
    pub timeout: Option<f64>,

    #[schemars(
        description = "Run through the platform shell (default: true). When false the \
                       command is split on whitespace with no quoting support"
    )]
    #[serde(default)]
    pub shell: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PingHostParams {
    #[schemars(description = "Hostname or IP address to ping")]
    pub host: String,

    #[schemars(description = "Number of ping packets to send (default: 4)")]
    #[serde(default)]
    pub count: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetEnvVarParams {
    #[schemars(description = "Environment variable name")]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SetEnvVarParams {
    #[schemars(description = "Environment variable name")]
    pub name: String,

    #[schemars(description = "Environment variable value")]
    pub value: String,
}
