//! In-memory fake for the game service trait (testing only)
//!
//! Provides `ScriptedGameService`, which satisfies the [`GameService`]
//! contract without any network dependency: game sessions advance
//! through scripted frames, scorecard open/close calls are counted,
//! and failures can be injected per endpoint.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{GameInfo, GameService};
use crate::domain::{FrameResponse, GameAction, GameState, Result, SwarmError};
use crate::scorecard::ScorecardReport;

/// In-memory `GameService` with scripted frames and call counters.
#[derive(Debug, Default)]
pub struct ScriptedGameService {
    games: Mutex<Vec<String>>,
    /// Frames served per game, popped front-first on each command.
    scripts: Mutex<HashMap<String, VecDeque<FrameResponse>>>,
    /// Every command submitted, in order, as (game_id, action).
    submitted: Mutex<Vec<(String, GameAction)>>,
    /// Optional artificial latency per command, for interrupt tests.
    delay: Mutex<Option<std::time::Duration>>,
    open_calls: AtomicUsize,
    close_calls: AtomicUsize,
    action_calls: AtomicUsize,
    fail_open: AtomicBool,
    fail_list: AtomicBool,
}

impl ScriptedGameService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the games the fake catalogue serves.
    pub fn with_games(self, game_ids: &[&str]) -> Self {
        {
            let mut games = self.games.lock().unwrap();
            *games = game_ids.iter().map(|g| g.to_string()).collect();
        }
        self
    }

    /// Queue scripted frames for a game; served in order, front first.
    pub fn script_frames(&self, game_id: &str, frames: Vec<FrameResponse>) {
        let mut scripts = self.scripts.lock().unwrap();
        scripts.insert(game_id.to_string(), frames.into());
    }

    /// Make `open_scorecard` fail with `RemoteUnavailable`.
    pub fn fail_open(&self) {
        self.fail_open.store(true, Ordering::SeqCst);
    }

    /// Make `list_games` fail with `RemoteUnavailable`.
    pub fn fail_list(&self) {
        self.fail_list.store(true, Ordering::SeqCst);
    }

    pub fn open_calls(&self) -> usize {
        self.open_calls.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    pub fn action_calls(&self) -> usize {
        self.action_calls.load(Ordering::SeqCst)
    }

    /// Add artificial latency to every game command.
    pub fn set_delay(&self, delay: std::time::Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Every command submitted so far, in order.
    pub fn submitted_actions(&self) -> Vec<(String, GameAction)> {
        self.submitted.lock().unwrap().clone()
    }

    async fn simulate_latency(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    /// Default frame when a game has no script left to serve.
    fn default_frame(game_id: &str) -> FrameResponse {
        FrameResponse {
            game_id: game_id.to_string(),
            guid: format!("guid-{game_id}"),
            frame: serde_json::Value::Null,
            state: GameState::NotFinished,
            score: 0,
        }
    }

    fn next_frame(&self, game_id: &str) -> FrameResponse {
        let mut scripts = self.scripts.lock().unwrap();
        scripts
            .get_mut(game_id)
            .and_then(|q| q.pop_front())
            .unwrap_or_else(|| Self::default_frame(game_id))
    }
}

#[async_trait]
impl GameService for ScriptedGameService {
    async fn list_games(&self) -> Result<Vec<GameInfo>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(SwarmError::unreachable("scripted list failure"));
        }
        let games = self.games.lock().unwrap();
        Ok(games
            .iter()
            .map(|g| GameInfo {
                game_id: g.clone(),
                title: None,
            })
            .collect())
    }

    async fn open_scorecard(&self, _tags: &[String]) -> Result<String> {
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(SwarmError::unreachable("scripted open failure"));
        }
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("card-{}", uuid::Uuid::new_v4()))
    }

    async fn close_scorecard(&self, card_id: &str) -> Result<ScorecardReport> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ScorecardReport {
            card_id: card_id.to_string(),
            won: 0,
            played: self.games.lock().unwrap().len() as u32,
            total_actions: self.action_calls() as u64,
            score_data: serde_json::Value::Null,
        })
    }

    async fn reset_game(&self, game_id: &str, _card_id: &str) -> Result<FrameResponse> {
        self.simulate_latency().await;
        self.submitted
            .lock()
            .unwrap()
            .push((game_id.to_string(), GameAction::Reset));
        Ok(self.next_frame(game_id))
    }

    async fn execute_action(
        &self,
        game_id: &str,
        _guid: &str,
        action: &GameAction,
    ) -> Result<FrameResponse> {
        self.simulate_latency().await;
        self.action_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted
            .lock()
            .unwrap()
            .push((game_id.to_string(), action.clone()));
        Ok(self.next_frame(game_id))
    }
}

/// Frame helper for scripting tests.
pub fn frame(game_id: &str, state: GameState, score: i64) -> FrameResponse {
    FrameResponse {
        game_id: game_id.to_string(),
        guid: format!("guid-{game_id}"),
        frame: serde_json::Value::Null,
        state,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_frames_served_in_order() {
        let service = ScriptedGameService::new().with_games(&["g1"]);
        service.script_frames(
            "g1",
            vec![
                frame("g1", GameState::NotFinished, 1),
                frame("g1", GameState::Win, 2),
            ],
        );

        let first = service.reset_game("g1", "card").await.expect("reset");
        assert_eq!(first.score, 1);
        let second = service
            .execute_action("g1", "guid", &GameAction::Action1)
            .await
            .expect("action");
        assert_eq!(second.state, GameState::Win);

        // Script exhausted: defaults kick in
        let third = service
            .execute_action("g1", "guid", &GameAction::Action1)
            .await
            .expect("action");
        assert_eq!(third.state, GameState::NotFinished);
    }

    #[tokio::test]
    async fn test_fail_open_injection() {
        let service = ScriptedGameService::new();
        service.fail_open();
        let result = service.open_scorecard(&[]).await;
        assert!(matches!(
            result.unwrap_err(),
            SwarmError::RemoteUnavailable { .. }
        ));
        assert_eq!(service.open_calls(), 0);
    }
}
