//! Contact and history stores over the SQLite kv table.
//!
//! Each list is one JSON blob under a fixed key, wrapped in a versioned
//! envelope:
//!
//! ```json
//! {"version": 1, "items": [ ... ]}
//! ```
//!
//! A bare JSON array is the unversioned layout written by earlier releases
//! and is read as version 0. Blobs from a newer schema are refused rather
//! than half-read.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::Database;
use crate::contacts::{ContactStore, EmergencyContact};
use crate::error::StorageError;
use crate::history::{AlertAttempt, HistoryStore, HISTORY_LIMIT};

/// Key of the contact list blob.
pub const CONTACTS_KEY: &str = "emergencyContacts";

/// Key of the alert history blob.
pub const ALERT_HISTORY_KEY: &str = "alertHistory";

/// Envelope version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    items: &'a [T],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredList<T> {
    Versioned { version: u32, items: Vec<T> },
    Legacy(Vec<T>),
}

fn read_list<T: DeserializeOwned>(db: &Database, key: &str) -> Result<Vec<T>, StorageError> {
    let Some(raw) = db.kv_get(key)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str::<StoredList<T>>(&raw)? {
        StoredList::Versioned { version, items } if version <= SCHEMA_VERSION => Ok(items),
        StoredList::Versioned { version, .. } => Err(StorageError::UnsupportedVersion {
            key: key.to_string(),
            found: version,
            supported: SCHEMA_VERSION,
        }),
        StoredList::Legacy(items) => {
            tracing::debug!(key, "Reading unversioned list");
            Ok(items)
        }
    }
}

fn write_list<T: Serialize>(db: &Database, key: &str, items: &[T]) -> Result<(), StorageError> {
    let json = serde_json::to_string(&EnvelopeRef {
        version: SCHEMA_VERSION,
        items,
    })?;
    db.kv_set(key, &json)
}

/// [`ContactStore`] persisted under [`CONTACTS_KEY`].
pub struct KvContactStore {
    db: Arc<Database>,
}

impl KvContactStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl ContactStore for KvContactStore {
    fn load(&self) -> Result<Vec<EmergencyContact>, StorageError> {
        read_list(&self.db, CONTACTS_KEY)
    }

    fn save(&self, contacts: &[EmergencyContact]) -> Result<(), StorageError> {
        write_list(&self.db, CONTACTS_KEY, contacts)
    }
}

/// [`HistoryStore`] persisted under [`ALERT_HISTORY_KEY`].
pub struct KvHistoryStore {
    db: Arc<Database>,
}

impl KvHistoryStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl HistoryStore for KvHistoryStore {
    fn load(&self) -> Result<Vec<AlertAttempt>, StorageError> {
        let mut attempts: Vec<AlertAttempt> = read_list(&self.db, ALERT_HISTORY_KEY)?;
        attempts.truncate(HISTORY_LIMIT);
        Ok(attempts)
    }

    fn save(&self, attempts: &[AlertAttempt]) -> Result<(), StorageError> {
        write_list(&self.db, ALERT_HISTORY_KEY, attempts)
    }
}
