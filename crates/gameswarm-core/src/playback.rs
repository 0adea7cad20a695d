//! Trace replay agent.
//!
//! [`Playback`] makes a previously recorded action trace look, to the
//! orchestrator, like a live decision-making agent: each decision
//! request returns the next recorded action in order. When the trace is
//! exhausted it signals "no further action" and stays exhausted —
//! replaying again requires a fresh instance bound to the same trace.

use std::path::Path;

use async_trait::async_trait;

use crate::agent::Agent;
use crate::domain::{FrameResponse, GameAction, Result};
use crate::recorder::{self, TraceEntry};

/// Replay cursor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Constructed, no decision requested yet.
    Ready,
    /// Cursor mid-trace.
    Replaying,
    /// Cursor past the end; every further decision returns `None`.
    Exhausted,
}

/// Agent variant that replays a recorded trace in order.
pub struct Playback {
    recording_name: String,
    entries: Vec<TraceEntry>,
    cursor: usize,
    state: PlaybackState,
}

impl Playback {
    /// Load the named recording from `dir`.
    pub fn from_recording(dir: &Path, recording_name: &str) -> Result<Self> {
        // Validates the naming convention before touching the file
        recorder::game_prefix(recording_name)?;
        let entries = recorder::load(&dir.join(recording_name))?;
        Ok(Self::from_entries(recording_name, entries))
    }

    /// Build a playback agent directly from in-memory entries.
    pub fn from_entries(recording_name: &str, entries: Vec<TraceEntry>) -> Self {
        Self {
            recording_name: recording_name.to_string(),
            entries,
            cursor: 0,
            state: PlaybackState::Ready,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Total entries in the bound trace.
    pub fn trace_len(&self) -> usize {
        self.entries.len()
    }
}

#[async_trait]
impl Agent for Playback {
    fn name(&self) -> &str {
        &self.recording_name
    }

    async fn decide(&mut self, _latest: &FrameResponse) -> Result<Option<GameAction>> {
        if self.cursor >= self.entries.len() {
            self.state = PlaybackState::Exhausted;
            return Ok(None);
        }
        let action = self.entries[self.cursor].action.clone();
        self.cursor += 1;
        self.state = PlaybackState::Replaying;
        Ok(Some(action))
    }
}
