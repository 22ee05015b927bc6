//! Arming state machine.
//!
//! The controller turns a deliberate user gesture into a delayed dispatch.
//! It owns the countdown timer; the caller drives it by awaiting
//! [`ArmingController::next_tick`] and feeding each tick back through
//! [`ArmingController::tick`], while forwarding a cancel request whenever
//! the user asks for one.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Armed(5) -> Armed(4) ... Armed(1) -> Dispatching -> Idle
//!           \______________ cancel ______________/
//!                          -> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut controller = ArmingController::new(contacts, engine, ledger);
//! controller.arm()?;
//! while controller.next_tick().await.is_some() {
//!     controller.tick().await;
//! }
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::countdown::{CountdownTimer, COUNTDOWN_TICKS, TICK_PERIOD};
use crate::contacts::{ContactStore, EmergencyContact};
use crate::dispatch::DispatchEngine;
use crate::error::ArmError;
use crate::events::Event;
use crate::haptics::{Haptics, NoHaptics, VibrationPattern};
use crate::history::{AlertAttempt, HistoryLedger};
use crate::location::LocationProvider;
use crate::transport::MessageTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ArmingState {
    Idle,
    Armed { remaining: u32 },
    Dispatching,
}

/// Puts the controller back to `Idle` when a dispatch ends, including when
/// the `tick` future is dropped mid-flight.
struct ReturnToIdle<'a>(&'a mut ArmingState);

impl Drop for ReturnToIdle<'_> {
    fn drop(&mut self) {
        *self.0 = ArmingState::Idle;
    }
}

/// Owns the countdown and triggers dispatch on expiry.
pub struct ArmingController<L, T> {
    state: ArmingState,
    timer: Option<CountdownTimer>,
    /// Contacts captured by `arm` for the current cycle.
    recipients: Vec<EmergencyContact>,
    contacts: Arc<dyn ContactStore>,
    engine: DispatchEngine<L, T>,
    ledger: Arc<HistoryLedger>,
    haptics: Arc<dyn Haptics>,
    vibration: bool,
}

impl<L: LocationProvider, T: MessageTransport> ArmingController<L, T> {
    pub fn new(
        contacts: Arc<dyn ContactStore>,
        engine: DispatchEngine<L, T>,
        ledger: Arc<HistoryLedger>,
    ) -> Self {
        Self {
            state: ArmingState::Idle,
            timer: None,
            recipients: Vec::new(),
            contacts,
            engine,
            ledger,
            haptics: Arc::new(NoHaptics),
            vibration: true,
        }
    }

    pub fn with_haptics(mut self, haptics: Arc<dyn Haptics>) -> Self {
        self.haptics = haptics;
        self
    }

    /// Turn vibration feedback on or off.
    pub fn with_vibration(mut self, enabled: bool) -> Self {
        self.vibration = enabled;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> ArmingState {
        self.state
    }

    /// Ticks left before dispatch; the full countdown when not armed.
    pub fn remaining(&self) -> u32 {
        match self.state {
            ArmingState::Armed { remaining } => remaining,
            _ => COUNTDOWN_TICKS,
        }
    }

    /// Whether a countdown timer is currently live.
    pub fn has_timer(&self) -> bool {
        self.timer.is_some()
    }

    pub fn engine(&self) -> &DispatchEngine<L, T> {
        &self.engine
    }

    pub fn ledger(&self) -> &Arc<HistoryLedger> {
        &self.ledger
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the countdown.
    ///
    /// # Errors
    /// `NoContacts` when the contact list is empty, `AlreadyActive` outside
    /// `Idle`, `Storage` when the list cannot be read. No state changes on
    /// error.
    pub fn arm(&mut self) -> Result<Event, ArmError> {
        if self.state != ArmingState::Idle {
            return Err(ArmError::AlreadyActive);
        }
        let recipients = self.contacts.load()?;
        if recipients.is_empty() {
            return Err(ArmError::NoContacts);
        }

        debug_assert!(self.timer.is_none());
        self.timer = Some(CountdownTimer::start(TICK_PERIOD));
        self.state = ArmingState::Armed {
            remaining: COUNTDOWN_TICKS,
        };
        let count = recipients.len();
        self.recipients = recipients;
        pulse(self.haptics.as_ref(), self.vibration, &VibrationPattern::tick());

        tracing::info!(recipients = count, "Emergency countdown armed");
        Ok(Event::CountdownArmed {
            remaining: COUNTDOWN_TICKS,
            recipients: count,
            at: Utc::now(),
        })
    }

    /// Wait for the next timer deadline. Returns `None` at once when no
    /// countdown is running.
    pub async fn next_tick(&mut self) -> Option<Instant> {
        let timer = self.timer.as_mut()?;
        Some(timer.tick().await)
    }

    /// Advance the countdown by one tick; dispatches when it reaches zero.
    ///
    /// A tick outside `Armed` is ignored and returns `None`.
    pub async fn tick(&mut self) -> Option<Event> {
        let ArmingState::Armed { remaining } = self.state else {
            tracing::debug!(state = ?self.state, "Ignoring late countdown tick");
            return None;
        };

        let remaining = remaining.saturating_sub(1);
        pulse(self.haptics.as_ref(), self.vibration, &VibrationPattern::tick());

        if remaining > 0 {
            self.state = ArmingState::Armed { remaining };
            return Some(Event::CountdownTick {
                remaining,
                at: Utc::now(),
            });
        }

        self.timer = None;
        self.state = ArmingState::Dispatching;
        let recipients = std::mem::take(&mut self.recipients);
        let _idle = ReturnToIdle(&mut self.state);

        let report = self.engine.dispatch(&recipients).await;
        pulse(
            self.haptics.as_ref(),
            self.vibration,
            &VibrationPattern::alert_sent(),
        );

        let history_error = match self.ledger.record(AlertAttempt::from_report(&report)) {
            Ok(()) => None,
            Err(error) => {
                tracing::error!(%error, "Error saving alert history");
                Some(error.to_string())
            }
        };

        Some(Event::AlertDispatched {
            report,
            history_error,
            at: Utc::now(),
        })
    }

    /// Abort the countdown. Nothing is sent.
    ///
    /// Returns `None` outside `Armed`; in particular a dispatch in progress
    /// cannot be cancelled.
    pub fn cancel(&mut self) -> Option<Event> {
        let ArmingState::Armed { remaining } = self.state else {
            return None;
        };

        self.timer = None;
        self.recipients.clear();
        self.state = ArmingState::Idle;
        pulse(
            self.haptics.as_ref(),
            self.vibration,
            &VibrationPattern::cancelled(),
        );

        tracing::info!(remaining, "Emergency countdown cancelled");
        Some(Event::CountdownCancelled {
            remaining,
            at: Utc::now(),
        })
    }

    /// Drive the live countdown until it leaves `Armed`, returning the last
    /// event (the dispatch result, unless cancelled elsewhere).
    pub async fn run_countdown(&mut self) -> Option<Event> {
        let mut last = None;
        while self.next_tick().await.is_some() {
            if let Some(event) = self.tick().await {
                last = Some(event);
            }
        }
        last
    }
}

/// Haptic feedback is best effort; failures are logged and dropped.
fn pulse(haptics: &dyn Haptics, enabled: bool, pattern: &VibrationPattern) {
    if !enabled {
        return;
    }
    if let Err(error) = haptics.vibrate(pattern) {
        tracing::debug!(%error, "Ignoring haptics failure");
    }
}
