//! Action trace persistence.
//!
//! A live run's ordered (observation, action) pairs are appended as
//! JSON lines to `<gameId>.<agentName>.recording.jsonl`. The naming
//! convention is load-bearing: [`game_prefix`] derives the originating
//! game from the file name, which is also the fallback used when the
//! remote game catalogue is unreachable.
//!
//! An in-progress trace is staged under a `.partial` suffix and only
//! renamed into place by [`Recorder::finalize`], so [`list`] never
//! observes half-written traces.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{FrameResponse, GameAction, Result, SwarmError};

/// File suffix every finished recording carries.
pub const RECORDING_SUFFIX: &str = ".recording.jsonl";

const PARTIAL_SUFFIX: &str = ".partial";

/// One recorded (observation, action) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Position in the trace, starting at 0. Insertion order is
    /// semantically significant: playback replays in this order.
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    /// Observation the agent saw before deciding.
    pub observation: FrameResponse,
    /// The action the agent chose.
    pub action: GameAction,
}

/// Append-only writer for one live run's action trace.
pub struct Recorder {
    final_path: PathBuf,
    partial_path: PathBuf,
    writer: BufWriter<File>,
    next_seq: u64,
}

impl Recorder {
    /// Open a fresh trace for `(game_id, agent_name)` under `dir`.
    ///
    /// Any stale partial file for the same pair is truncated.
    pub fn create(dir: &Path, game_id: &str, agent_name: &str) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let name = format!("{game_id}.{agent_name}{RECORDING_SUFFIX}");
        let final_path = dir.join(&name);
        let partial_path = dir.join(format!("{name}{PARTIAL_SUFFIX}"));
        let file = File::create(&partial_path)?;
        Ok(Self {
            final_path,
            partial_path,
            writer: BufWriter::new(file),
            next_seq: 0,
        })
    }

    /// Durably append one trace entry.
    ///
    /// # Errors
    ///
    /// Storage errors are surfaced to the caller, never swallowed —
    /// losing an entry silently would make later playback
    /// non-reproducible.
    pub fn append(&mut self, observation: &FrameResponse, action: &GameAction) -> Result<u64> {
        let entry = TraceEntry {
            seq: self.next_seq,
            timestamp: Utc::now(),
            observation: observation.clone(),
            action: action.clone(),
        };
        serde_json::to_writer(&mut self.writer, &entry)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.next_seq += 1;
        Ok(entry.seq)
    }

    /// Number of entries appended so far.
    pub fn len(&self) -> u64 {
        self.next_seq
    }

    pub fn is_empty(&self) -> bool {
        self.next_seq == 0
    }

    /// Flush and close the trace, renaming it into its discoverable name.
    ///
    /// Returns the final path.
    pub fn finalize(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        drop(self.writer);
        fs::rename(&self.partial_path, &self.final_path)?;
        Ok(self.final_path)
    }

    /// Drop the trace without publishing it.
    pub fn discard(self) -> Result<()> {
        drop(self.writer);
        fs::remove_file(&self.partial_path)?;
        Ok(())
    }
}

/// Enumerate finished recording names under `dir`, sorted.
///
/// Discovery is lazy: the directory is scanned at call time, so traces
/// finalized by concurrent writers appear on the next call.
pub fn list(dir: &Path) -> Result<Vec<String>> {
    let read_dir = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(SwarmError::Io(e)),
    };

    let mut names = Vec::new();
    for entry in read_dir {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(RECORDING_SUFFIX) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Derive the originating game id from a recording name.
///
/// Pure parse of the `<gameId>.<agentName>.recording.jsonl` convention.
///
/// # Errors
///
/// Returns `MalformedRecordingName` when the suffix is absent or the
/// remainder lacks the `<gameId>.<agentName>` shape.
pub fn game_prefix(recording_name: &str) -> Result<String> {
    let stem = recording_name
        .strip_suffix(RECORDING_SUFFIX)
        .ok_or_else(|| SwarmError::MalformedRecordingName(recording_name.to_string()))?;
    let (game_id, agent_name) = stem
        .split_once('.')
        .ok_or_else(|| SwarmError::MalformedRecordingName(recording_name.to_string()))?;
    if game_id.is_empty() || agent_name.is_empty() {
        return Err(SwarmError::MalformedRecordingName(
            recording_name.to_string(),
        ));
    }
    Ok(game_id.to_string())
}

/// Load a finished trace in insertion order.
pub fn load(path: &Path) -> Result<Vec<TraceEntry>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(serde_json::from_str(&line)?);
    }
    Ok(entries)
}
