//! Bounded ledger of past alerts.
//!
//! Newest entry first, at most [`HISTORY_LIMIT`] entries. The ledger keeps
//! its own copy of the list: a failed write is reported to the caller but
//! the in-memory list keeps the change.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::dispatch::DispatchReport;
use crate::error::StorageError;
use crate::location::Coordinates;

/// Maximum number of alerts kept.
pub const HISTORY_LIMIT: usize = 10;

/// Outcome of one completed dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredAttempt")]
pub struct AlertAttempt {
    timestamp: String,
    recipient_count: u32,
    success_count: u32,
    location: Option<Coordinates>,
}

impl AlertAttempt {
    /// `success_count` is capped at `recipient_count`.
    pub fn new(
        timestamp: impl Into<String>,
        recipient_count: u32,
        success_count: u32,
        location: Option<Coordinates>,
    ) -> Self {
        debug_assert!(success_count <= recipient_count);
        Self {
            timestamp: timestamp.into(),
            recipient_count,
            success_count: success_count.min(recipient_count),
            location,
        }
    }

    pub fn from_report(report: &DispatchReport) -> Self {
        Self::new(
            report.timestamp.clone(),
            report.total,
            report.success_count,
            report.location,
        )
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn recipient_count(&self) -> u32 {
        self.recipient_count
    }

    pub fn success_count(&self) -> u32 {
        self.success_count
    }

    pub fn location(&self) -> Option<&Coordinates> {
        self.location.as_ref()
    }
}

/// On-disk shape, tolerant of rows written before `recipientCount` existed
/// (those only carried the success tally as `contactCount`).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAttempt {
    timestamp: String,
    #[serde(default)]
    recipient_count: Option<u32>,
    #[serde(alias = "contactCount")]
    success_count: u32,
    #[serde(default)]
    location: Option<Coordinates>,
}

impl From<StoredAttempt> for AlertAttempt {
    fn from(row: StoredAttempt) -> Self {
        let recipients = row
            .recipient_count
            .unwrap_or(row.success_count)
            .max(row.success_count);
        Self::new(row.timestamp, recipients, row.success_count, row.location)
    }
}

/// Persisted list of alert attempts, newest first.
pub trait HistoryStore: Send + Sync {
    fn load(&self) -> Result<Vec<AlertAttempt>, StorageError>;

    fn save(&self, attempts: &[AlertAttempt]) -> Result<(), StorageError>;
}

pub struct HistoryLedger {
    store: Arc<dyn HistoryStore>,
    entries: Mutex<Option<Vec<AlertAttempt>>>,
}

impl HistoryLedger {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self {
            store,
            entries: Mutex::new(None),
        }
    }

    fn entries(&self) -> Result<MutexGuard<'_, Option<Vec<AlertAttempt>>>, StorageError> {
        let mut guard = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if guard.is_none() {
            *guard = Some(self.store.load()?);
        }
        Ok(guard)
    }

    /// Prepend `attempt`, trim to [`HISTORY_LIMIT`] and persist.
    pub fn record(&self, attempt: AlertAttempt) -> Result<(), StorageError> {
        let mut guard = self.entries()?;
        let entries = guard.get_or_insert_with(Vec::new);
        entries.insert(0, attempt);
        entries.truncate(HISTORY_LIMIT);
        self.store.save(entries)
    }

    /// All recorded attempts, newest first.
    pub fn list(&self) -> Result<Vec<AlertAttempt>, StorageError> {
        Ok(self.entries()?.clone().unwrap_or_default())
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(Vec::new());
        self.store.save(&[])
    }
}
