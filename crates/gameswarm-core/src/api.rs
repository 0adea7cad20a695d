//! Remote game/scoring service client.
//!
//! [`GameService`] is the trait seam the orchestrator drives;
//! [`HttpGameService`] is the production implementation over the
//! remote HTTP API. Network failures and non-200 responses surface as
//! [`SwarmError::RemoteUnavailable`] and are never retried here —
//! retry policy, if any, belongs to the transport layer.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::SwarmConfig;
use crate::domain::{FrameResponse, GameAction, Result, SwarmError};
use crate::scorecard::ScorecardReport;

/// One entry in the remote game catalogue.
#[derive(Debug, Clone, Deserialize)]
pub struct GameInfo {
    pub game_id: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Operations the orchestrator needs from the remote service.
#[async_trait]
pub trait GameService: Send + Sync {
    /// Fetch the list of playable game ids.
    async fn list_games(&self) -> Result<Vec<GameInfo>>;

    /// Open a scorecard tagged with `tags`; returns the server-issued card id.
    async fn open_scorecard(&self, tags: &[String]) -> Result<String>;

    /// Close a scorecard and fetch the final report.
    async fn close_scorecard(&self, card_id: &str) -> Result<ScorecardReport>;

    /// Start (or restart) a game session under the given scorecard.
    async fn reset_game(&self, game_id: &str, card_id: &str) -> Result<FrameResponse>;

    /// Submit one in-game action against an open session.
    async fn execute_action(
        &self,
        game_id: &str,
        guid: &str,
        action: &GameAction,
    ) -> Result<FrameResponse>;
}

/// Production `GameService` over the remote HTTP API.
pub struct HttpGameService {
    config: SwarmConfig,
    http_client: reqwest::Client,
}

impl HttpGameService {
    /// Create a new client for the service named in `config`.
    ///
    /// # Errors
    ///
    /// Fails if the underlying TLS/connector setup fails.
    pub fn new(config: SwarmConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("gameswarm/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpGameService {
            config,
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.root_url, path)
    }

    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        let response = self
            .http_client
            .post(self.url(path))
            .header("X-API-Key", &self.config.api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| SwarmError::unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SwarmError::remote(status.as_u16(), truncate(&text, 200)));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl GameService for HttpGameService {
    async fn list_games(&self) -> Result<Vec<GameInfo>> {
        let response = self
            .http_client
            .get(self.url("/api/games"))
            .header("X-API-Key", &self.config.api_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SwarmError::unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SwarmError::remote(status.as_u16(), truncate(&text, 200)));
        }
        Ok(response.json().await?)
    }

    async fn open_scorecard(&self, tags: &[String]) -> Result<String> {
        let value = self
            .post_json("/api/scorecard/open", json!({ "tags": tags }))
            .await?;
        value
            .get("card_id")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| SwarmError::unreachable("scorecard open response missing card_id"))
    }

    async fn close_scorecard(&self, card_id: &str) -> Result<ScorecardReport> {
        let value = self
            .post_json("/api/scorecard/close", json!({ "card_id": card_id }))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn reset_game(&self, game_id: &str, card_id: &str) -> Result<FrameResponse> {
        let value = self
            .post_json(
                "/api/cmd/RESET",
                json!({ "game_id": game_id, "card_id": card_id }),
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn execute_action(
        &self,
        game_id: &str,
        guid: &str,
        action: &GameAction,
    ) -> Result<FrameResponse> {
        let mut body = json!({ "game_id": game_id, "guid": guid });
        if let GameAction::Action6 { x, y } = action {
            body["x"] = json!(x);
            body["y"] = json!(y);
        }
        let path = format!("/api/cmd/{}", action.command_name());
        let value = self.post_json(&path, body).await?;
        Ok(serde_json::from_value(value)?)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s[..end].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_root_and_path() {
        let svc = HttpGameService::new(SwarmConfig::new("http://localhost:8001", "k"))
            .expect("client");
        assert_eq!(svc.url("/api/games"), "http://localhost:8001/api/games");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 3), "hel");
        // multi-byte: must not split the codepoint
        let s = "héllo";
        let t = truncate(s, 2);
        assert!(t.len() <= 2);
        assert!(s.starts_with(&t));
    }

    #[test]
    fn test_game_info_deserializes_extra_fields() {
        let json = serde_json::json!([
            { "game_id": "g1", "title": "First", "version": 2 },
            { "game_id": "g2" }
        ]);
        let games: Vec<GameInfo> = serde_json::from_value(json).expect("deserialize");
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].game_id, "g1");
        assert!(games[1].title.is_none());
    }
}
