//! Platform SMS capability, chosen once at startup.

use std::fmt;
use std::sync::Arc;

use super::segments::sms_parts;
use super::{MessageTransport, TransportError};

/// Native sender that hands messages to the carrier without user interaction.
pub trait SmsGateway: Send + Sync {
    fn send_text(&self, phone: &str, body: &str) -> Result<(), TransportError>;

    fn send_multipart(&self, phone: &str, parts: &[String]) -> Result<(), TransportError>;
}

/// Opens a pre-filled message for the user to send themselves.
pub trait SmsComposer: Send + Sync {
    fn compose(&self, phone: &str, body: &str) -> Result<(), TransportError>;
}

/// Host platform, as reported by the embedding shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
    Other,
}

/// What this host can do with an outgoing alert.
#[derive(Clone)]
pub enum SmsCapability {
    /// Messages go straight to the carrier.
    DirectSend(Arc<dyn SmsGateway>),
    /// The user is handed a composed message; acceptance is unknown.
    ManualFallback(Arc<dyn SmsComposer>),
    /// Nothing can be sent.
    Unsupported,
}

impl SmsCapability {
    /// Pick the capability for `platform` from whatever hooks the host
    /// provides. iOS never allows silent sending.
    pub fn detect(
        platform: Platform,
        gateway: Option<Arc<dyn SmsGateway>>,
        composer: Option<Arc<dyn SmsComposer>>,
    ) -> Self {
        match (platform, gateway, composer) {
            (Platform::Android, Some(gateway), _) => SmsCapability::DirectSend(gateway),
            (Platform::Android | Platform::Ios, None, Some(composer))
            | (Platform::Ios, Some(_), Some(composer)) => SmsCapability::ManualFallback(composer),
            _ => SmsCapability::Unsupported,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SmsCapability::DirectSend(_) => "direct-send",
            SmsCapability::ManualFallback(_) => "manual-fallback",
            SmsCapability::Unsupported => "unsupported",
        }
    }
}

impl fmt::Debug for SmsCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// [`MessageTransport`] backed by a fixed [`SmsCapability`].
#[derive(Debug, Clone)]
pub struct SmsTransport {
    capability: SmsCapability,
}

impl SmsTransport {
    pub fn new(capability: SmsCapability) -> Self {
        tracing::debug!(capability = capability.name(), "SMS transport ready");
        Self { capability }
    }

    pub fn capability(&self) -> &SmsCapability {
        &self.capability
    }
}

impl MessageTransport for SmsTransport {
    async fn send(&self, phone: &str, message: &str) -> Result<bool, TransportError> {
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(TransportError::InvalidRecipient(phone.to_string()));
        }

        match &self.capability {
            SmsCapability::DirectSend(gateway) => {
                let parts = sms_parts(message);
                if parts.len() > 1 {
                    gateway.send_multipart(phone, &parts)?;
                } else {
                    gateway.send_text(phone, message)?;
                }
                Ok(true)
            }
            SmsCapability::ManualFallback(composer) => {
                tracing::warn!("Native SMS sending not available, using fallback");
                composer.compose(phone, message)?;
                Ok(false)
            }
            SmsCapability::Unsupported => {
                tracing::warn!("SMS sending is not supported on this platform");
                Ok(false)
            }
        }
    }
}
