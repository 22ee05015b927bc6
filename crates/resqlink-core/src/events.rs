use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dispatch::DispatchReport;

/// Every arming state change produces an Event.
/// Front ends render them; the CLI prints them as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    CountdownArmed {
        remaining: u32,
        recipients: usize,
        at: DateTime<Utc>,
    },
    CountdownTick {
        remaining: u32,
        at: DateTime<Utc>,
    },
    /// Countdown stopped by the user; nothing was sent.
    CountdownCancelled {
        remaining: u32,
        at: DateTime<Utc>,
    },
    /// Dispatch finished. `history_error` is set when the ledger write failed.
    AlertDispatched {
        report: DispatchReport,
        history_error: Option<String>,
        at: DateTime<Utc>,
    },
}
