//! Mapping of HTTP and transport failures into the connection's error codes.
//!
//! The category of a failure only affects what gets logged. The code handed
//! to the supervisor is either the negated HTTP status or
//! [`ERROR_CODE_OTHER`].

use std::fmt;

use tracing::{debug, warn};

use crate::core::ERROR_CODE_OTHER;

/// Failure class reported by the HTTP engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    /// Remote refused the TCP connection.
    ConnectionRefused,
    /// Remote closed the connection before replying.
    RemoteHostClosed,
    /// Name resolution failed.
    HostNotFound,
    /// Request timed out.
    Timeout,
    /// Request was cancelled.
    Cancelled,
    /// Lower-level network failure (TLS, interface, session).
    Network,
    /// Proxy refused, closed, timed out, or demanded authentication.
    Proxy,
    /// Content-level rejection (4xx status, access denied, not found).
    Content,
    /// HTTP protocol violation or unsupported operation.
    Protocol,
    /// Anything the engine could not classify.
    Unknown,
}

impl FailureCategory {
    /// Classify an unsuccessful HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            407 => FailureCategory::Proxy,
            400..=499 => FailureCategory::Content,
            _ => FailureCategory::Unknown,
        }
    }

    /// Short description used in log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            FailureCategory::ConnectionRefused => "connection refused",
            FailureCategory::RemoteHostClosed => "remote host closed",
            FailureCategory::HostNotFound => "host not found",
            FailureCategory::Timeout => "timeout",
            FailureCategory::Cancelled => "cancelled",
            FailureCategory::Network => "network error",
            FailureCategory::Proxy => "proxy error",
            FailureCategory::Content => "content error",
            FailureCategory::Protocol => "protocol error",
            FailureCategory::Unknown => "unknown error",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request that completed without a usable response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFailure {
    /// Failure class.
    pub category: FailureCategory,
    /// HTTP status, if the server answered at all.
    pub status: Option<u16>,
    /// Engine-provided description.
    pub message: String,
}

impl HttpFailure {
    /// Create a failure without an HTTP status.
    pub fn new(category: FailureCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            status: None,
            message: message.into(),
        }
    }

    /// Create a failure for an unsuccessful HTTP status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            category: FailureCategory::from_status(status),
            status: Some(status),
            message: message.into(),
        }
    }
}

/// Map a failed request to the error code reported to the supervisor.
pub fn map_failure(failure: &HttpFailure) -> i32 {
    let code = failure
        .status
        .map_or(ERROR_CODE_OTHER, |status| -i32::from(status));

    warn!(
        category = %failure.category,
        status = ?failure.status,
        "HTTP error: {}",
        failure.message
    );
    debug!(code, "HTTP error, restarting");

    code
}
