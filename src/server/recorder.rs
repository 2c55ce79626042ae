//! Match recording.
//!
//! When a match ends the simulation loop hands a `MatchResult` to a
//! `MatchRecorder`. Recording runs on a blocking worker after the result has
//! been announced; a failure is logged by the caller and never retried.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use log::info;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::game::types::{Role, Score};

/// Final outcome of a match. Built once, never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub room_code: String,
    pub winner: Role,
    pub score: Score,
    /// Unix time, in seconds.
    pub finished_at: u64,
}

impl MatchResult {
    pub fn new(room_code: &str, winner: Role, score: Score) -> Self {
        let finished_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            room_code: room_code.to_string(),
            winner,
            score,
            finished_at,
        }
    }
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Codec(#[from] serde_json::Error),
}

pub trait MatchRecorder: Send + Sync {
    fn record(&self, result: &MatchResult) -> Result<(), RecordError>;
}

/// Writes results to the log only.
pub struct LogRecorder;

impl MatchRecorder for LogRecorder {
    fn record(&self, result: &MatchResult) -> Result<(), RecordError> {
        info!(
            "[Recorder] room={} winner={:?} score={}-{}",
            result.room_code, result.winner, result.score.first, result.score.second
        );
        Ok(())
    }
}

/// Appends one JSON object per finished match to a file.
pub struct JsonLinesRecorder {
    path: PathBuf,
    // Serializes appends from concurrent blocking workers.
    write_lock: Mutex<()>,
}

impl JsonLinesRecorder {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }
}

impl MatchRecorder for JsonLinesRecorder {
    fn record(&self, result: &MatchResult) -> Result<(), RecordError> {
        let line = serde_json::to_string(result)?;
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}
