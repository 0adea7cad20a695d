//! Swarm configuration.
//!
//! All environment access happens here, once, at process start. The
//! resulting [`SwarmConfig`] value is passed into the registry, the
//! HTTP client, and the orchestrator; no component reads the
//! environment on its own.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default per-unit action budget when `MAX_ACTIONS` is unset.
pub const DEFAULT_MAX_ACTIONS: u32 = 80;

/// Default directory holding `*.recording.jsonl` traces.
pub const DEFAULT_RECORDINGS_DIR: &str = "recordings";

/// Explicit configuration for a swarm run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmConfig {
    /// Base URL of the remote game/scoring service, without trailing slash.
    pub root_url: String,
    /// API key sent as `X-API-Key` on every request.
    pub api_key: String,
    /// Maximum actions a single unit may take before it is cut off.
    pub max_actions: u32,
    /// Free-form tags attached to the scorecard on open.
    pub tags: Vec<String>,
    /// Directory where action traces are recorded and discovered.
    pub recordings_dir: PathBuf,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        let scheme = std::env::var("SCHEME").unwrap_or_else(|_| "http".to_string());
        let host = std::env::var("HOST").unwrap_or_else(|_| "localhost".to_string());
        let port = std::env::var("PORT").unwrap_or_else(|_| "8001".to_string());
        SwarmConfig {
            root_url: build_root_url(&scheme, &host, &port),
            api_key: std::env::var("GAME_API_KEY").unwrap_or_default(),
            max_actions: std::env::var("MAX_ACTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_ACTIONS),
            tags: Vec::new(),
            recordings_dir: PathBuf::from(DEFAULT_RECORDINGS_DIR),
        }
    }
}

impl SwarmConfig {
    /// Create a config from environment variables.
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create config for a specific service URL.
    pub fn new(root_url: &str, api_key: &str) -> Self {
        SwarmConfig {
            root_url: root_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            max_actions: DEFAULT_MAX_ACTIONS,
            tags: Vec::new(),
            recordings_dir: PathBuf::from(DEFAULT_RECORDINGS_DIR),
        }
    }

    /// Attach scorecard tags.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Override the per-unit action budget.
    pub fn with_max_actions(mut self, max_actions: u32) -> Self {
        self.max_actions = max_actions;
        self
    }

    /// Override the recordings directory.
    pub fn with_recordings_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.recordings_dir = dir.into();
        self
    }
}

/// Assemble a root URL, hiding the port when it is the scheme default.
pub fn build_root_url(scheme: &str, host: &str, port: &str) -> String {
    let standard = (scheme == "http" && port == "80") || (scheme == "https" && port == "443");
    if standard {
        format!("{scheme}://{host}")
    } else {
        format!("{scheme}://{host}:{port}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_root_url_hides_standard_ports() {
        assert_eq!(build_root_url("http", "example.com", "80"), "http://example.com");
        assert_eq!(
            build_root_url("https", "example.com", "443"),
            "https://example.com"
        );
    }

    #[test]
    fn test_build_root_url_keeps_custom_ports() {
        assert_eq!(
            build_root_url("http", "localhost", "8001"),
            "http://localhost:8001"
        );
        assert_eq!(
            build_root_url("https", "example.com", "80"),
            "https://example.com:80"
        );
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let cfg = SwarmConfig::new("http://localhost:8001/", "key");
        assert_eq!(cfg.root_url, "http://localhost:8001");
        assert_eq!(cfg.max_actions, DEFAULT_MAX_ACTIONS);
    }

    #[test]
    fn test_builder_setters() {
        let cfg = SwarmConfig::new("http://x", "k")
            .with_tags(vec!["experiment".to_string()])
            .with_max_actions(5)
            .with_recordings_dir("/tmp/rec");
        assert_eq!(cfg.tags, vec!["experiment".to_string()]);
        assert_eq!(cfg.max_actions, 5);
        assert_eq!(cfg.recordings_dir, PathBuf::from("/tmp/rec"));
    }
}
