//! The agent contract and the built-in `Random` policy.
//!
//! An [`Agent`] is a polymorphic decision-making unit: given the latest
//! observation frame it either chooses the next [`GameAction`] or
//! returns `None` to signal that it has no further action to take.
//! Decision internals of richer policies (prompting, planning, model
//! calls) live outside this crate; they only need to implement this
//! trait to be driven by the orchestrator.

use async_trait::async_trait;
use rand::seq::SliceRandom;

use crate::config::SwarmConfig;
use crate::domain::{FrameResponse, GameAction, GameState, Result};

/// Context handed to agent constructors by the orchestrator.
#[derive(Debug, Clone)]
pub struct AgentContext {
    /// The game this agent instance is bound to.
    pub game_id: String,
    /// Run configuration (budget, recordings directory, service URL).
    pub config: SwarmConfig,
}

/// Decide-given-observation contract implemented by every agent variant.
#[async_trait]
pub trait Agent: Send {
    /// Human-readable agent name; used in recording file names and logs.
    fn name(&self) -> &str;

    /// Choose the next action given the latest observation frame.
    ///
    /// Returning `Ok(None)` signals completion: the agent has no
    /// further action and the orchestrator ends the unit normally.
    ///
    /// # Errors
    ///
    /// A decision failure is isolated to the unit being played; it
    /// never aborts sibling units.
    async fn decide(&mut self, latest: &FrameResponse) -> Result<Option<GameAction>>;
}

/// Uniformly random policy over the simple actions.
///
/// Plays until the remote reports a win or the orchestrator's action
/// budget cuts it off. Useful as a smoke-test opponent and as the
/// minimal conforming reference for the [`Agent`] contract.
pub struct Random {
    name: String,
}

impl Random {
    pub fn new(ctx: &AgentContext) -> Self {
        Self {
            name: format!("random.{}", ctx.game_id),
        }
    }
}

#[async_trait]
impl Agent for Random {
    fn name(&self) -> &str {
        &self.name
    }

    async fn decide(&mut self, latest: &FrameResponse) -> Result<Option<GameAction>> {
        if latest.state == GameState::Win {
            return Ok(None);
        }
        // A finished-but-lost session gets a fresh attempt
        if latest.state == GameState::GameOver || latest.state == GameState::NotPlayed {
            return Ok(Some(GameAction::Reset));
        }
        let mut rng = rand::thread_rng();
        let action = GameAction::simple()
            .choose(&mut rng)
            .cloned()
            .unwrap_or(GameAction::Action1);
        Ok(Some(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> AgentContext {
        AgentContext {
            game_id: "test01".to_string(),
            config: SwarmConfig::new("http://localhost:8001", "key"),
        }
    }

    fn frame(state: GameState) -> FrameResponse {
        FrameResponse {
            game_id: "test01".to_string(),
            guid: "guid".to_string(),
            frame: serde_json::Value::Null,
            state,
            score: 0,
        }
    }

    #[tokio::test]
    async fn test_random_stops_on_win() {
        let mut agent = Random::new(&ctx());
        let action = agent.decide(&frame(GameState::Win)).await.expect("decide");
        assert!(action.is_none());
    }

    #[tokio::test]
    async fn test_random_resets_unplayed_session() {
        let mut agent = Random::new(&ctx());
        let action = agent
            .decide(&frame(GameState::NotPlayed))
            .await
            .expect("decide");
        assert_eq!(action, Some(GameAction::Reset));
    }

    #[tokio::test]
    async fn test_random_picks_simple_action_mid_game() {
        let mut agent = Random::new(&ctx());
        let action = agent
            .decide(&frame(GameState::NotFinished))
            .await
            .expect("decide")
            .expect("some action");
        assert!(GameAction::simple().contains(&action));
    }

    #[test]
    fn test_random_name_includes_game() {
        let agent = Random::new(&ctx());
        assert_eq!(agent.name(), "random.test01");
    }
}
