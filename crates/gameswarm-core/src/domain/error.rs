//! Domain-level error taxonomy for gameswarm.

/// Gameswarm domain errors.
#[derive(Debug, thiserror::Error)]
pub enum SwarmError {
    #[error("unknown agent: {0}")]
    AgentNotFound(String),

    #[error("remote service unavailable: {message}{}", .status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    RemoteUnavailable {
        status: Option<u16>,
        message: String,
    },

    #[error("malformed recording name: {0}")]
    MalformedRecordingName(String),

    #[error("agent decision failed: {0}")]
    AgentDecision(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SwarmError {
    /// Build a `RemoteUnavailable` from a non-success HTTP response.
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        SwarmError::RemoteUnavailable {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Build a `RemoteUnavailable` for a transport-level failure with no status.
    pub fn unreachable(message: impl Into<String>) -> Self {
        SwarmError::RemoteUnavailable {
            status: None,
            message: message.into(),
        }
    }
}

/// Result type for gameswarm domain operations.
pub type Result<T> = std::result::Result<T, SwarmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swarm_error_display() {
        let err = SwarmError::AgentNotFound("noagent".to_string());
        assert!(err.to_string().contains("unknown agent"));
        assert!(err.to_string().contains("noagent"));

        let err = SwarmError::MalformedRecordingName("bad.name".to_string());
        assert!(err.to_string().contains("malformed recording name"));
    }

    #[test]
    fn test_remote_unavailable_includes_status() {
        let err = SwarmError::remote(503, "service down");
        assert!(err.to_string().contains("503"));

        let err = SwarmError::unreachable("connection refused");
        assert!(!err.to_string().contains("status"));
    }
}
