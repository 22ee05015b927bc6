//! Message transport contract and the SMS capability set behind it.

mod capability;
mod segments;

pub use capability::{Platform, SmsCapability, SmsComposer, SmsGateway, SmsTransport};
pub use segments::{sms_parts, SmsEncoding};

use std::future::Future;

use thiserror::Error;

/// A single send that failed outright (as opposed to one that was not
/// attempted, which is reported as `Ok(false)`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("SMS gateway error: {0}")]
    Gateway(String),

    #[error("Invalid recipient phone number: '{0}'")]
    InvalidRecipient(String),
}

/// Send-one-message primitive used by dispatch.
///
/// `Ok(true)` means the platform accepted the message; no delivery receipt
/// is implied. `Ok(false)` means the message was not sent (unsupported
/// platform or manual hand-off).
pub trait MessageTransport: Send + Sync {
    fn send(
        &self,
        phone: &str,
        message: &str,
    ) -> impl Future<Output = Result<bool, TransportError>> + Send;
}
