//! Chat history sinks.
//!
//! Persisting a conversation is the caller's concern. The assistant hands
//! each answered message to a [`HistorySink`] and logs, rather than
//! propagates, any failure.

use std::fmt::Debug;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::intent::Intent;

/// One answered chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub session_id: String,
    pub user_id: String,
    pub message: String,
    pub reply: String,
    pub intent: Intent,
    pub timestamp: DateTime<Utc>,
    pub phone_ids: Vec<u64>,
}

pub trait HistorySink: Send + Sync + Debug {
    fn record(&self, record: &ChatRecord) -> Result<()>;
}

/// Discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHistory;

impl HistorySink for NoopHistory {
    fn record(&self, _record: &ChatRecord) -> Result<()> {
        Ok(())
    }
}

/// Keeps records in memory.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    records: Mutex<Vec<ChatRecord>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ChatRecord> {
        self.records.lock().clone()
    }

    /// Records of one user, oldest first.
    pub fn for_user(&self, user_id: &str) -> Vec<ChatRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HistorySink for InMemoryHistory {
    fn record(&self, record: &ChatRecord) -> Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}

/// Appends records to a file, one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesHistory {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonLinesHistory {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(JsonLinesHistory {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistorySink for JsonLinesHistory {
    fn record(&self, record: &ChatRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut file = self.file.lock();
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}
