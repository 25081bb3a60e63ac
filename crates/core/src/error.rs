use serde::Serialize;
use std::time::Duration;

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Longest upstream body kept in an error message.
const MAX_BODY_IN_MESSAGE: usize = 2048;

/// Errors that can occur while serving a single tool call.
///
/// Every variant is local to one invocation. Nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Missing or mismatching bearer token.
    #[error("Unauthorized: invalid or missing bearer token")]
    Unauthorized,

    /// Upstream answered with a non-2xx status.
    #[error("Upstream error (status {status}): {}", truncate_body(.body))]
    Upstream { status: u16, body: String },

    /// Outbound call exceeded the configured ceiling.
    #[error("Request to {url} timed out after {}s", .timeout.as_secs())]
    Timeout { url: String, timeout: Duration },

    /// Upstream response did not have the expected shape.
    #[error("Malformed upstream data: {0}")]
    MalformedUpstreamData(String),

    /// Network failure before any HTTP status was received.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Tool arguments failed validation.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// No tool is registered under this name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Roast collaborator failed to produce usable output.
    #[error("Roast generation failed: {0}")]
    Roast(String),
}

/// Stable kind tag surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Unauthorized,
    UpstreamError,
    TimeoutError,
    MalformedUpstreamData,
    TransportError,
    InvalidArguments,
    RoastError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Unauthorized",
            Self::UpstreamError => "UpstreamError",
            Self::TimeoutError => "TimeoutError",
            Self::MalformedUpstreamData => "MalformedUpstreamData",
            Self::TransportError => "TransportError",
            Self::InvalidArguments => "InvalidArguments",
            Self::RoastError => "RoastError",
        }
    }

    /// JSON-RPC error code for this kind.
    ///
    /// Argument problems use the standard `-32602`; everything else lives in
    /// the implementation-defined server error range.
    pub fn json_rpc_code(&self) -> i32 {
        match self {
            Self::InvalidArguments => -32602,
            Self::Unauthorized => -32001,
            Self::UpstreamError => -32002,
            Self::TimeoutError => -32003,
            Self::MalformedUpstreamData => -32004,
            Self::TransportError => -32005,
            Self::RoastError => -32006,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Upstream { .. } => ErrorKind::UpstreamError,
            Self::Timeout { .. } => ErrorKind::TimeoutError,
            Self::MalformedUpstreamData(_) => ErrorKind::MalformedUpstreamData,
            Self::Transport(_) => ErrorKind::TransportError,
            Self::InvalidArguments(_) | Self::UnknownTool(_) => ErrorKind::InvalidArguments,
            Self::Roast(_) => ErrorKind::RoastError,
        }
    }

    /// Upstream HTTP status, when the error came from a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedUpstreamData(message.into())
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments(message.into())
    }
}

fn truncate_body(body: &str) -> &str {
    if body.len() <= MAX_BODY_IN_MESSAGE {
        return body;
    }
    let mut end = MAX_BODY_IN_MESSAGE;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
