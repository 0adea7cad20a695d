//! Core data model for swarm runs: units of work, outcomes, and the
//! wire shapes exchanged with the remote game service.

use serde::{Deserialize, Serialize};

/// One (agent, game) pairing the orchestrator must drive to completion.
///
/// Created by the orchestrator from the caller-supplied game list and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameUnit {
    /// Identifier of the game to play.
    pub game_id: String,
    /// Registry identifier of the agent assigned to play it.
    pub agent_id: String,
}

impl GameUnit {
    pub fn new(game_id: impl Into<String>, agent_id: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            agent_id: agent_id.into(),
        }
    }
}

/// Terminal outcome of a single [`GameUnit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "detail")]
pub enum RunOutcome {
    /// The agent signalled completion or exhausted its action budget.
    Completed,
    /// The unit failed with an isolated error; siblings keep running.
    Failed(String),
    /// An external cleanup call abandoned the unit mid-run.
    Interrupted,
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed)
    }
}

/// Per-unit execution report returned by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitReport {
    /// The unit this report describes.
    pub unit: GameUnit,
    /// How the unit ended.
    pub outcome: RunOutcome,
    /// Number of actions submitted to the remote game.
    pub actions_taken: u32,
    /// Last score observed before the unit ended, if any frame arrived.
    pub final_score: Option<i64>,
}

/// Orchestrator run lifecycle.
///
/// `Created -> ScorecardOpen -> Executing -> {Completed, Failed, Interrupted}`.
/// A scorecard-open failure short-circuits `Created -> Failed` without
/// ever entering `Executing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwarmState {
    Created,
    ScorecardOpen,
    Executing,
    Completed,
    Failed,
    Interrupted,
}

impl SwarmState {
    /// Whether the run has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SwarmState::Completed | SwarmState::Failed | SwarmState::Interrupted
        )
    }
}

/// Remote-reported state of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    NotPlayed,
    NotFinished,
    Win,
    GameOver,
}

impl GameState {
    /// Whether the session has ended on the remote side.
    pub fn is_over(&self) -> bool {
        matches!(self, GameState::Win | GameState::GameOver)
    }
}

/// Observation snapshot returned by the remote service after each command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameResponse {
    pub game_id: String,
    /// Session identifier issued on reset; carried on every subsequent action.
    #[serde(default)]
    pub guid: String,
    /// Grid payload; shape is owned by the remote service.
    #[serde(default)]
    pub frame: serde_json::Value,
    pub state: GameState,
    #[serde(default)]
    pub score: i64,
}

/// One in-game action an agent can take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "id")]
pub enum GameAction {
    Reset,
    Action1,
    Action2,
    Action3,
    Action4,
    Action5,
    Action6 { x: u32, y: u32 },
}

impl GameAction {
    /// Wire name used in the command endpoint path.
    pub fn command_name(&self) -> &'static str {
        match self {
            GameAction::Reset => "RESET",
            GameAction::Action1 => "ACTION1",
            GameAction::Action2 => "ACTION2",
            GameAction::Action3 => "ACTION3",
            GameAction::Action4 => "ACTION4",
            GameAction::Action5 => "ACTION5",
            GameAction::Action6 { .. } => "ACTION6",
        }
    }

    /// The simple (coordinate-free) actions a policy can sample from.
    pub fn simple() -> &'static [GameAction] {
        const SIMPLE: &[GameAction] = &[
            GameAction::Action1,
            GameAction::Action2,
            GameAction::Action3,
            GameAction::Action4,
            GameAction::Action5,
        ];
        SIMPLE
    }
}

/// Apply a comma-separated id-prefix filter to a game list.
///
/// Order of `full` is preserved; a game is kept when its id starts with
/// any of the comma-separated prefixes. An empty or whitespace-only
/// filter keeps everything.
pub fn filter_games(full: &[String], filter: &str) -> Vec<String> {
    let prefixes: Vec<&str> = filter
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if prefixes.is_empty() {
        return full.to_vec();
    }
    full.iter()
        .filter(|gid| prefixes.iter().any(|p| gid.starts_with(p)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_games_preserves_order() {
        let full = vec!["g1".to_string(), "g2".to_string(), "g3".to_string()];
        let filtered = filter_games(&full, "g1,g3");
        assert_eq!(filtered, vec!["g1".to_string(), "g3".to_string()]);
    }

    #[test]
    fn test_filter_games_prefix_match() {
        let full = vec![
            "zelda01".to_string(),
            "tetris01".to_string(),
            "zelda02".to_string(),
        ];
        let filtered = filter_games(&full, "zelda");
        assert_eq!(filtered, vec!["zelda01".to_string(), "zelda02".to_string()]);
    }

    #[test]
    fn test_filter_games_empty_filter_keeps_all() {
        let full = vec!["g1".to_string(), "g2".to_string()];
        assert_eq!(filter_games(&full, ""), full);
        assert_eq!(filter_games(&full, " , "), full);
    }

    #[test]
    fn test_game_state_terminal() {
        assert!(GameState::Win.is_over());
        assert!(GameState::GameOver.is_over());
        assert!(!GameState::NotFinished.is_over());
        assert!(!GameState::NotPlayed.is_over());
    }

    #[test]
    fn test_swarm_state_terminal() {
        assert!(!SwarmState::Created.is_terminal());
        assert!(!SwarmState::Executing.is_terminal());
        assert!(SwarmState::Completed.is_terminal());
        assert!(SwarmState::Interrupted.is_terminal());
    }

    #[test]
    fn test_action_wire_names() {
        assert_eq!(GameAction::Reset.command_name(), "RESET");
        assert_eq!(GameAction::Action6 { x: 3, y: 7 }.command_name(), "ACTION6");
    }

    #[test]
    fn test_frame_response_deserializes_wire_shape() {
        let json = serde_json::json!({
            "game_id": "zelda01",
            "guid": "abc-123",
            "frame": [[[0, 1], [2, 3]]],
            "state": "NOT_FINISHED",
            "score": 4,
        });
        let frame: FrameResponse = serde_json::from_value(json).expect("deserialize");
        assert_eq!(frame.game_id, "zelda01");
        assert_eq!(frame.state, GameState::NotFinished);
        assert_eq!(frame.score, 4);
    }
}
