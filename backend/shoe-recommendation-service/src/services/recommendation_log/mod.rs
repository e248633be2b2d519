//! Recommendation Log
//!
//! Append-only record of every recommendation served. Entries receive a
//! monotonic `log_id` from the store and are never overwritten or
//! deduplicated.
//!
//! # Stores
//! - `InMemoryLogStore`: process-local, infallible
//! - `JsonLinesLogStore`: one JSON object per line in a local file

use crate::models::{RecommendationLogEntry, ScoredShoe, ShoeId, UserId};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::convert::Infallible;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Storage backend for recommendation log entries.
///
/// Implementations serialize concurrent writers and assign strictly
/// increasing ids.
pub trait RecommendationLogStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Append one entry, returning it with its assigned id
    fn append(
        &self,
        user_id: UserId,
        shoe_id: ShoeId,
        score: f32,
        timestamp: DateTime<Utc>,
    ) -> Result<RecommendationLogEntry, Self::Error>;

    /// All stored entries in insertion order
    fn entries(&self) -> Result<Vec<RecommendationLogEntry>, Self::Error>;
}

#[derive(Debug, Default)]
struct InMemoryState {
    next_id: u64,
    entries: Vec<RecommendationLogEntry>,
}

#[derive(Debug, Default)]
pub struct InMemoryLogStore {
    state: Mutex<InMemoryState>,
}

impl InMemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecommendationLogStore for InMemoryLogStore {
    type Error = Infallible;

    fn append(
        &self,
        user_id: UserId,
        shoe_id: ShoeId,
        score: f32,
        timestamp: DateTime<Utc>,
    ) -> Result<RecommendationLogEntry, Self::Error> {
        let mut state = self.state.lock();
        state.next_id += 1;
        let entry = RecommendationLogEntry {
            log_id: state.next_id,
            user_id,
            shoe_id,
            timestamp,
            score,
        };
        state.entries.push(entry.clone());
        Ok(entry)
    }

    fn entries(&self) -> Result<Vec<RecommendationLogEntry>, Self::Error> {
        Ok(self.state.lock().entries.clone())
    }
}

#[derive(Debug, Error)]
pub enum LogStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt log entry at line {line}: {source}")]
    Corrupt {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// File-backed store, one JSON object per line
#[derive(Debug)]
pub struct JsonLinesLogStore {
    path: PathBuf,
    // Last assigned id; the lock also serializes file appends
    last_id: Mutex<u64>,
}

impl JsonLinesLogStore {
    /// Open (or lazily create) the log at `path`, resuming ids after the
    /// highest one already stored
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LogStoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        truncate_torn_tail(&path)?;
        let existing = read_entries(&path)?;
        let last_id = existing.iter().map(|e| e.log_id).max().unwrap_or(0);

        info!(
            path = %path.display(),
            entries = existing.len(),
            last_id = last_id,
            "Opened recommendation log"
        );

        Ok(Self {
            path,
            last_id: Mutex::new(last_id),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Drop a trailing line left unterminated by an interrupted append
fn truncate_torn_tail(path: &Path) -> Result<(), LogStoreError> {
    if !path.exists() {
        return Ok(());
    }

    let contents = fs::read(path)?;
    if contents.is_empty() || contents.ends_with(b"\n") {
        return Ok(());
    }

    let keep = contents
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |pos| pos + 1);
    warn!(
        path = %path.display(),
        dropped_bytes = contents.len() - keep,
        "Truncating partial entry at end of recommendation log"
    );
    OpenOptions::new().write(true).open(path)?.set_len(keep as u64)?;
    Ok(())
}

fn read_entries(path: &Path) -> Result<Vec<RecommendationLogEntry>, LogStoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = serde_json::from_str(&line).map_err(|source| LogStoreError::Corrupt {
            line: idx + 1,
            source,
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

impl RecommendationLogStore for JsonLinesLogStore {
    type Error = LogStoreError;

    fn append(
        &self,
        user_id: UserId,
        shoe_id: ShoeId,
        score: f32,
        timestamp: DateTime<Utc>,
    ) -> Result<RecommendationLogEntry, Self::Error> {
        let mut last_id = self.last_id.lock();
        let entry = RecommendationLogEntry {
            log_id: *last_id + 1,
            user_id,
            shoe_id,
            timestamp,
            score,
        };

        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let prev_len = file.metadata()?.len();
        if let Err(e) = file.write_all(line.as_bytes()) {
            // A partial line would make every later read fail
            if let Err(truncate_err) = file.set_len(prev_len) {
                warn!(
                    path = %self.path.display(),
                    error = %truncate_err,
                    "Failed to roll back partial log entry"
                );
            }
            return Err(e.into());
        }

        // Only advance once the entry is durable in the file
        *last_id = entry.log_id;
        Ok(entry)
    }

    fn entries(&self) -> Result<Vec<RecommendationLogEntry>, Self::Error> {
        let _guard = self.last_id.lock();
        read_entries(&self.path)
    }
}

/// Filter for log queries; `None` fields match everything.
/// The time range is half-open: `[start, end)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogQuery {
    pub user_id: Option<UserId>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl LogQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn matches(&self, entry: &RecommendationLogEntry) -> bool {
        self.user_id.map_or(true, |id| entry.user_id == id)
            && self.start.map_or(true, |start| entry.timestamp >= start)
            && self.end.map_or(true, |end| entry.timestamp < end)
    }
}

/// Recommendation log over a pluggable store
#[derive(Debug)]
pub struct RecommendationLog<S> {
    store: S,
}

impl<S: RecommendationLogStore> RecommendationLog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn record(
        &self,
        user_id: UserId,
        shoe_id: ShoeId,
        score: f32,
        timestamp: DateTime<Utc>,
    ) -> Result<RecommendationLogEntry, S::Error> {
        self.store.append(user_id, shoe_id, score, timestamp)
    }

    /// Record every shoe of one served list under the same timestamp
    pub fn record_all(
        &self,
        user_id: UserId,
        served: &[ScoredShoe],
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<RecommendationLogEntry>, S::Error> {
        let entries = served
            .iter()
            .map(|s| self.record(user_id, s.shoe_id, s.score, timestamp))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(user_id = user_id, count = entries.len(), "Recorded recommendations");
        Ok(entries)
    }

    /// Matching entries ordered by timestamp, then id
    pub fn query(&self, query: &LogQuery) -> Result<Vec<RecommendationLogEntry>, S::Error> {
        let mut matched: Vec<RecommendationLogEntry> = self
            .store
            .entries()?
            .into_iter()
            .filter(|entry| query.matches(entry))
            .collect();
        matched.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.log_id.cmp(&b.log_id)));
        Ok(matched)
    }
}
