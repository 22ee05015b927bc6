//! Alert fan-out.
//!
//! One dispatch queries the location once, composes the message once and
//! walks the contact list strictly in order, one send at a time with a short
//! pause in between. Every contact is attempted exactly once; failures are
//! tallied and never abort the walk.

use std::time::Duration;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::contacts::EmergencyContact;
use crate::location::{Coordinates, LocationProvider};
use crate::message::{compose_alert_message, format_timestamp};
use crate::transport::MessageTransport;

/// Pause between two consecutive sends.
pub const SEND_PAUSE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SendStatus {
    /// The platform accepted the message.
    Sent,
    /// The transport declined without an error (unsupported or manual).
    NotSent,
    /// The transport raised an error.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientOutcome {
    pub contact_id: String,
    pub contact_name: String,
    #[serde(flatten)]
    pub status: SendStatus,
}

/// Aggregate result of one dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchReport {
    pub success_count: u32,
    pub total: u32,
    /// Human-readable time placed in the message.
    pub timestamp: String,
    /// Fix used in the message, if any.
    pub location: Option<Coordinates>,
    pub message: String,
    /// One entry per contact, in list order.
    pub outcomes: Vec<RecipientOutcome>,
}

impl DispatchReport {
    pub fn failure_count(&self) -> u32 {
        self.total - self.success_count
    }
}

pub struct DispatchEngine<L, T> {
    location: L,
    transport: T,
    pause: Duration,
}

impl<L: LocationProvider, T: MessageTransport> DispatchEngine<L, T> {
    pub fn new(location: L, transport: T) -> Self {
        Self {
            location,
            transport,
            pause: SEND_PAUSE,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send the alert to every contact, in order. Cannot fail.
    pub async fn dispatch(&self, contacts: &[EmergencyContact]) -> DispatchReport {
        let location = self.location.current_location().await;
        let timestamp = format_timestamp(&Local::now());
        let message = compose_alert_message(&timestamp, location.as_ref());

        let mut success_count = 0u32;
        let mut outcomes = Vec::with_capacity(contacts.len());

        for (index, contact) in contacts.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.pause).await;
            }

            let status = match self.transport.send(&contact.phone, &message).await {
                Ok(true) => {
                    success_count += 1;
                    SendStatus::Sent
                }
                Ok(false) => {
                    tracing::warn!(recipient = %contact.name, "Alert not sent");
                    SendStatus::NotSent
                }
                Err(error) => {
                    tracing::error!(recipient = %contact.name, %error, "Failed to send alert");
                    SendStatus::Failed {
                        reason: error.to_string(),
                    }
                }
            };

            outcomes.push(RecipientOutcome {
                contact_id: contact.id.clone(),
                contact_name: contact.name.clone(),
                status,
            });
        }

        let total = contacts.len() as u32;
        tracing::info!(success_count, total, "Emergency alert dispatched");

        DispatchReport {
            success_count,
            total,
            timestamp,
            location,
            message,
            outcomes,
        }
    }
}
