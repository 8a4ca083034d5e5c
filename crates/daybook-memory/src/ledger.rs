//! Ledger implementations backed by a single JSON blob.

use crate::error::MemoryError;
use crate::model::MemoryRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use parking_lot::Mutex;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[async_trait]
/// Memory ledger abstraction used by the chat engine and tools.
pub trait MemoryLedger: Send + Sync {
    /// Append a new record stamped with the current instant.
    async fn append(&self, content: &str) -> Result<MemoryRecord, MemoryError>;

    /// Return every record in insertion order.
    async fn all(&self) -> Result<Vec<MemoryRecord>, MemoryError>;

    /// Return records where any term is a case-insensitive substring of the
    /// content, most recent first.
    async fn search(&self, terms: &[String]) -> Result<Vec<MemoryRecord>, MemoryError> {
        let mut matches: Vec<MemoryRecord> = self
            .all()
            .await?
            .into_iter()
            .filter(|record| record.matches_any(terms))
            .collect();
        matches.reverse();
        Ok(matches)
    }

    /// Remove the record with exactly this timestamp; returns whether one existed.
    async fn delete(&self, timestamp: DateTime<Utc>) -> Result<bool, MemoryError>;
}

/// File-backed ledger holding all records in one JSON array blob.
#[derive(Debug)]
pub struct FileMemoryLedger {
    path: PathBuf,
    /// Serialize read-modify-write cycles on the blob.
    write_lock: Mutex<()>,
}

impl FileMemoryLedger {
    /// Create a ledger backed by the given blob path.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        info!("initialized memory ledger (path={})", path.display());
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Load all records from the blob.
    fn load_records(&self) -> Result<Vec<MemoryRecord>, MemoryError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        let value: serde_json::Value = serde_json::from_str(&contents)?;
        if !value.is_array() {
            return Err(MemoryError::InvalidBlob(
                "expected a top-level record array".to_string(),
            ));
        }
        let records: Vec<MemoryRecord> = serde_json::from_value(value)?;
        Ok(records)
    }

    /// Rewrite the blob atomically.
    fn write_records(&self, records: &[MemoryRecord]) -> Result<(), MemoryError> {
        let temp_path = self.path.with_extension("json.tmp");
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            let body = serde_json::to_string_pretty(records)?;
            file.write_all(body.as_bytes())?;
        }
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        fs::rename(temp_path, &self.path)?;
        Ok(())
    }
}

#[async_trait]
impl MemoryLedger for FileMemoryLedger {
    async fn append(&self, content: &str) -> Result<MemoryRecord, MemoryError> {
        let _guard = self.write_lock.lock();
        let record = MemoryRecord::new(content);
        let mut records = self.load_records()?;
        records.push(record.clone());
        self.write_records(&records)?;
        debug!(
            "stored memory record (content_len={}, total={})",
            record.content.len(),
            records.len()
        );
        Ok(record)
    }

    async fn all(&self) -> Result<Vec<MemoryRecord>, MemoryError> {
        let _guard = self.write_lock.lock();
        self.load_records()
    }

    async fn delete(&self, timestamp: DateTime<Utc>) -> Result<bool, MemoryError> {
        let _guard = self.write_lock.lock();
        let mut records = self.load_records()?;
        let before = records.len();
        records.retain(|record| record.timestamp != timestamp);
        let removed = records.len() < before;
        if removed {
            self.write_records(&records)?;
            debug!("deleted memory record (timestamp={timestamp})");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::{FileMemoryLedger, MemoryLedger};
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[tokio::test]
    async fn append_and_read_back_in_order() {
        let temp = tempdir().expect("tempdir");
        let ledger = FileMemoryLedger::new(temp.path().join("memories.json")).expect("ledger");

        let before = Utc::now();
        ledger.append("Likes espresso").await.expect("append");
        ledger.append("Allergic to peanuts").await.expect("append");

        let records = ledger.all().await.expect("all");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].content, "Likes espresso");
        assert_eq!(records[1].content, "Allergic to peanuts");
        assert!(records[0].timestamp >= before);
    }

    #[tokio::test]
    async fn search_matches_any_term_most_recent_first() {
        let temp = tempdir().expect("tempdir");
        let ledger = FileMemoryLedger::new(temp.path().join("memories.json")).expect("ledger");
        ledger.append("Likes espresso").await.expect("append");
        ledger.append("Prefers window seats").await.expect("append");
        ledger.append("Espresso after lunch only").await.expect("append");

        let matches = ledger
            .search(&["ESPRESSO".to_string(), "tea".to_string()])
            .await
            .expect("search");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].content, "Espresso after lunch only");
        assert_eq!(matches[1].content, "Likes espresso");
    }

    #[tokio::test]
    async fn delete_requires_exact_timestamp() {
        let temp = tempdir().expect("tempdir");
        let ledger = FileMemoryLedger::new(temp.path().join("memories.json")).expect("ledger");
        let kept = ledger.append("keep me").await.expect("append");
        let doomed = ledger.append("drop me").await.expect("append");

        assert!(ledger.delete(doomed.timestamp).await.expect("delete"));
        assert!(!ledger.delete(doomed.timestamp).await.expect("repeat"));

        let records = ledger.all().await.expect("all");
        assert_eq!(records, vec![kept]);
    }

    #[tokio::test]
    async fn non_array_blobs_are_rejected() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("memories.json");
        std::fs::write(&path, "{\"records\": []}").expect("write blob");

        let ledger = FileMemoryLedger::new(&path).expect("ledger");
        let err = ledger.all().await.expect_err("invalid blob");
        assert!(matches!(err, super::MemoryError::InvalidBlob(_)));
    }

    #[tokio::test]
    async fn ledger_survives_reopening() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("memories.json");
        {
            let ledger = FileMemoryLedger::new(&path).expect("ledger");
            ledger.append("persisted").await.expect("append");
        }
        let ledger = FileMemoryLedger::new(&path).expect("reopen");
        let records = ledger.all().await.expect("all");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "persisted");
    }
}
