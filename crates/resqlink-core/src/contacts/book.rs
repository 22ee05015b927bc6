//! Contact list editing on top of a [`ContactStore`].

use std::sync::{Arc, OnceLock};

use regex::Regex;

use super::{ContactStore, EmergencyContact};
use crate::error::{CoreError, ValidationError};

/// Relationship assigned when the user leaves the field blank.
pub const DEFAULT_RELATIONSHIP: &str = "Emergency Contact";

fn phone_pattern() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^[\d\s\-\+\(\)]+$").expect("static phone pattern"))
}

/// User-entered contact fields before validation.
#[derive(Debug, Clone, Default)]
pub struct ContactDraft {
    pub name: String,
    pub phone: String,
    pub relationship: String,
}

impl ContactDraft {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            relationship: String::new(),
        }
    }

    pub fn with_relationship(mut self, relationship: impl Into<String>) -> Self {
        self.relationship = relationship.into();
        self
    }

    /// Trim every field and check name, phone and phone format.
    fn validate(&self) -> Result<ContactDraft, ValidationError> {
        let name = self.name.trim();
        let phone = self.phone.trim();
        if name.is_empty() || phone.is_empty() {
            return Err(ValidationError::MissingField);
        }
        if !phone_pattern().is_match(phone) {
            return Err(ValidationError::InvalidPhone(phone.to_string()));
        }
        let relationship = match self.relationship.trim() {
            "" => DEFAULT_RELATIONSHIP,
            other => other,
        };
        Ok(ContactDraft {
            name: name.to_string(),
            phone: phone.to_string(),
            relationship: relationship.to_string(),
        })
    }
}

/// Add, edit and remove operations over the persisted contact list.
///
/// Every mutation loads the current list, applies the change and saves the
/// whole list back, so the store always holds the full ordered snapshot.
pub struct ContactBook {
    store: Arc<dyn ContactStore>,
}

impl ContactBook {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<EmergencyContact>, CoreError> {
        Ok(self.store.load()?)
    }

    /// Append a new contact. Its id is the creation time in epoch millis,
    /// bumped past any existing id so rapid additions never collide.
    pub fn add(&self, draft: &ContactDraft) -> Result<EmergencyContact, CoreError> {
        let draft = draft.validate()?;
        let mut contacts = self.store.load()?;

        let mut id = chrono::Utc::now().timestamp_millis();
        while contacts.iter().any(|c| c.id == id.to_string()) {
            id += 1;
        }

        let contact = EmergencyContact {
            id: id.to_string(),
            name: draft.name,
            phone: draft.phone,
            relationship: draft.relationship,
        };
        contacts.push(contact.clone());
        self.store.save(&contacts)?;
        tracing::info!(contact_id = %contact.id, "Emergency contact added");
        Ok(contact)
    }

    /// Replace the fields of an existing contact, keeping its id and position.
    pub fn update(&self, id: &str, draft: &ContactDraft) -> Result<EmergencyContact, CoreError> {
        let draft = draft.validate()?;
        let mut contacts = self.store.load()?;
        let slot = contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ValidationError::UnknownContact(id.to_string()))?;

        slot.name = draft.name;
        slot.phone = draft.phone;
        slot.relationship = draft.relationship;
        let updated = slot.clone();

        self.store.save(&contacts)?;
        tracing::info!(contact_id = %id, "Emergency contact updated");
        Ok(updated)
    }

    pub fn remove(&self, id: &str) -> Result<EmergencyContact, CoreError> {
        let mut contacts = self.store.load()?;
        let index = contacts
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ValidationError::UnknownContact(id.to_string()))?;
        let removed = contacts.remove(index);
        self.store.save(&contacts)?;
        tracing::info!(contact_id = %id, "Emergency contact removed");
        Ok(removed)
    }
}
