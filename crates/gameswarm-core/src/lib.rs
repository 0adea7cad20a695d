//! Gameswarm Core Library
//!
//! Swarm orchestration for pluggable agents playing episodic games
//! served by a remote scoring API, with recording/playback of action
//! traces for deterministic replay.

pub mod agent;
pub mod api;
pub mod config;
pub mod domain;
pub mod fakes;
pub mod metrics;
pub mod obs;
pub mod playback;
pub mod recorder;
pub mod registry;
pub mod scorecard;
pub mod shutdown;
pub mod swarm;
pub mod telemetry;

pub use agent::{Agent, AgentContext, Random};
pub use api::{GameInfo, GameService, HttpGameService};
pub use config::{build_root_url, SwarmConfig, DEFAULT_MAX_ACTIONS};
pub use domain::{
    filter_games, FrameResponse, GameAction, GameState, GameUnit, Result, RunOutcome, SwarmError,
    SwarmState, UnitReport,
};
pub use metrics::METRICS;
pub use playback::{Playback, PlaybackState};
pub use recorder::{Recorder, TraceEntry, RECORDING_SUFFIX};
pub use registry::{default_registry, AgentDescriptor, AgentKind, AgentRegistry};
pub use scorecard::{ScorecardClient, ScorecardReport};
pub use shutdown::ShutdownController;
pub use swarm::Swarm;
pub use telemetry::init_tracing;

/// Gameswarm version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
