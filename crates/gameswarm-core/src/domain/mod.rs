//! Domain types shared across the swarm orchestrator.

pub mod error;
pub mod game;

pub use error::{Result, SwarmError};
pub use game::{
    filter_games, FrameResponse, GameAction, GameState, GameUnit, RunOutcome, SwarmState,
    UnitReport,
};
