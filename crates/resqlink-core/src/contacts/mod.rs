//! Emergency contacts and the store contract they are persisted through.

mod book;

pub use book::{ContactBook, ContactDraft, DEFAULT_RELATIONSHIP};

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// A person who receives the alert message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    /// Opaque, stable identifier.
    pub id: String,
    pub name: String,
    pub phone: String,
    pub relationship: String,
}

/// Ordered, persisted list of emergency contacts.
///
/// Order matters: dispatch walks the list front to back.
pub trait ContactStore: Send + Sync {
    fn load(&self) -> Result<Vec<EmergencyContact>, StorageError>;

    fn save(&self, contacts: &[EmergencyContact]) -> Result<(), StorageError>;
}
