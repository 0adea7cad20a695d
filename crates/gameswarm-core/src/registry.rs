//! Agent registry: maps human-chosen identifiers to constructible
//! agent variants.
//!
//! The registry is assembled once at process start from an explicit
//! list of (identifier, constructor) pairs — there is no implicit
//! discovery. Two kinds of entries exist: policy variants, constructed
//! fresh per run, and playback variants, each bound to one prior
//! recording file.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::agent::{Agent, AgentContext, Random};
use crate::config::SwarmConfig;
use crate::domain::{Result, SwarmError};
use crate::playback::Playback;
use crate::recorder;

/// Variant kind of a registered agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    /// Live decision-making policy, constructed fresh per run.
    Policy,
    /// Replay of a specific prior recording.
    Playback,
}

/// Constructor invoked when the orchestrator binds an agent to a game.
pub type AgentConstructor = Arc<dyn Fn(&AgentContext) -> Result<Box<dyn Agent>> + Send + Sync>;

/// One registered agent variant.
#[derive(Clone)]
pub struct AgentDescriptor {
    pub id: String,
    pub kind: AgentKind,
    ctor: AgentConstructor,
}

impl AgentDescriptor {
    /// Construct an agent instance bound to the context's game.
    pub fn construct(&self, ctx: &AgentContext) -> Result<Box<dyn Agent>> {
        (self.ctor)(ctx)
    }
}

impl std::fmt::Debug for AgentDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentDescriptor")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Immutable-after-startup map of agent identifiers to descriptors.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    entries: BTreeMap<String, AgentDescriptor>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent variant under `id`.
    ///
    /// Last registration wins: a duplicate identifier overwrites the
    /// previous entry. This is how a playback identifier may shadow a
    /// same-named policy; the overwrite is diagnosed but not fatal.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        kind: AgentKind,
        ctor: AgentConstructor,
    ) {
        let id = id.into();
        if let Some(previous) = self.entries.get(&id) {
            tracing::warn!(
                event = "registry.shadowed",
                agent_id = %id,
                previous_kind = ?previous.kind,
                new_kind = ?kind,
            );
        }
        self.entries.insert(
            id.clone(),
            AgentDescriptor { id, kind, ctor },
        );
    }

    /// Resolve an identifier by case-sensitive exact match.
    pub fn resolve(&self, id: &str) -> Result<&AgentDescriptor> {
        self.entries
            .get(id)
            .ok_or_else(|| SwarmError::AgentNotFound(id.to_string()))
    }

    /// Whether an identifier is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// All registered identifiers, sorted.
    pub fn ids(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Identifiers of playback variants, sorted.
    pub fn playback_ids(&self) -> Vec<String> {
        self.entries
            .values()
            .filter(|d| d.kind == AgentKind::Playback)
            .map(|d| d.id.clone())
            .collect()
    }

    /// Identifiers of policy variants, sorted.
    pub fn policy_ids(&self) -> Vec<String> {
        self.entries
            .values()
            .filter(|d| d.kind == AgentKind::Policy)
            .map(|d| d.id.clone())
            .collect()
    }
}

/// Assemble the default registry: built-in policies plus one playback
/// entry per recording discoverable under the configured directory.
pub fn default_registry(config: &SwarmConfig) -> Result<AgentRegistry> {
    let mut registry = AgentRegistry::new();

    registry.register(
        "random",
        AgentKind::Policy,
        Arc::new(|ctx: &AgentContext| Ok(Box::new(Random::new(ctx)) as Box<dyn Agent>)),
    );

    for name in recorder::list(&config.recordings_dir)? {
        let recording = name.clone();
        registry.register(
            name,
            AgentKind::Playback,
            Arc::new(move |ctx: &AgentContext| {
                Ok(Box::new(Playback::from_recording(
                    &ctx.config.recordings_dir,
                    &recording,
                )?) as Box<dyn Agent>)
            }),
        );
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FrameResponse, GameAction, GameState};
    use async_trait::async_trait;

    struct Fixed(GameAction);

    #[async_trait]
    impl Agent for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }
        async fn decide(&mut self, _latest: &FrameResponse) -> Result<Option<GameAction>> {
            Ok(Some(self.0.clone()))
        }
    }

    fn fixed_ctor(action: GameAction) -> AgentConstructor {
        Arc::new(move |_ctx: &AgentContext| Ok(Box::new(Fixed(action.clone())) as Box<dyn Agent>))
    }

    fn ctx(config: SwarmConfig) -> AgentContext {
        AgentContext {
            game_id: "g1".to_string(),
            config,
        }
    }

    #[test]
    fn test_resolve_exact_case_sensitive() {
        let mut registry = AgentRegistry::new();
        registry.register("random", AgentKind::Policy, fixed_ctor(GameAction::Action1));

        assert!(registry.resolve("random").is_ok());
        match registry.resolve("Random").unwrap_err() {
            SwarmError::AgentNotFound(id) => assert_eq!(id, "Random"),
            other => panic!("Expected AgentNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = AgentRegistry::new();
        registry.register("dup", AgentKind::Policy, fixed_ctor(GameAction::Action1));
        registry.register("dup", AgentKind::Playback, fixed_ctor(GameAction::Action2));

        let descriptor = registry.resolve("dup").expect("resolve");
        assert_eq!(descriptor.kind, AgentKind::Playback);
        assert_eq!(registry.ids().len(), 1);
    }

    #[test]
    fn test_playback_ids_filters_by_kind() {
        let mut registry = AgentRegistry::new();
        registry.register("random", AgentKind::Policy, fixed_ctor(GameAction::Action1));
        registry.register(
            "g1.a.recording.jsonl",
            AgentKind::Playback,
            fixed_ctor(GameAction::Action2),
        );

        assert_eq!(
            registry.playback_ids(),
            vec!["g1.a.recording.jsonl".to_string()]
        );
        assert_eq!(registry.policy_ids(), vec!["random".to_string()]);
    }

    #[test]
    fn test_default_registry_discovers_recordings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config =
            SwarmConfig::new("http://localhost:8001", "k").with_recordings_dir(dir.path());

        crate::recorder::Recorder::create(dir.path(), "g1", "random")
            .expect("create")
            .finalize()
            .expect("finalize");

        let registry = default_registry(&config).expect("registry");
        assert!(registry.contains("random"));
        assert_eq!(
            registry.playback_ids(),
            vec!["g1.random.recording.jsonl".to_string()]
        );
    }

    #[tokio::test]
    async fn test_descriptor_constructs_usable_agent() {
        let mut registry = AgentRegistry::new();
        registry.register("fixed", AgentKind::Policy, fixed_ctor(GameAction::Action4));

        let config = SwarmConfig::new("http://localhost:8001", "k");
        let mut agent = registry
            .resolve("fixed")
            .expect("resolve")
            .construct(&ctx(config))
            .expect("construct");

        let frame = FrameResponse {
            game_id: "g1".to_string(),
            guid: "guid".to_string(),
            frame: serde_json::Value::Null,
            state: GameState::NotFinished,
            score: 0,
        };
        assert_eq!(
            agent.decide(&frame).await.expect("decide"),
            Some(GameAction::Action4)
        );
    }
}
