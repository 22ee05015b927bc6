//! # ResQLink Core Library
//!
//! This library provides the emergency alert orchestration behind ResQLink:
//! a deliberate gesture arms a short countdown, and unless the user cancels
//! it the alert goes out to every stored emergency contact with a
//! best-effort location. The CLI and any mobile shell are thin layers over
//! this crate.
//!
//! ## Architecture
//!
//! - **Arming**: countdown state machine that owns its timer; the caller
//!   awaits ticks and forwards cancel requests
//! - **Dispatch**: sequential fan-out with per-recipient failure accounting
//! - **History**: bounded ledger of past alerts
//! - **Storage**: SQLite kv blobs with a versioned envelope, TOML config
//! - **Collaborators**: traits for contacts, location, transport, haptics
//!
//! ## Key Components
//!
//! - [`ArmingController`]: countdown state machine
//! - [`DispatchEngine`]: alert fan-out
//! - [`HistoryLedger`]: alert history
//! - [`Database`]: persistence
//! - [`Config`]: application configuration management

pub mod arming;
pub mod contacts;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod haptics;
pub mod history;
pub mod location;
pub mod message;
pub mod storage;
pub mod transport;

pub use arming::{ArmingController, ArmingState, COUNTDOWN_TICKS, TICK_PERIOD};
pub use contacts::{ContactBook, ContactDraft, ContactStore, EmergencyContact};
pub use dispatch::{DispatchEngine, DispatchReport, RecipientOutcome, SendStatus};
pub use error::{ArmError, ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use haptics::{Haptics, HapticsError, NoHaptics, VibrationPattern};
pub use history::{AlertAttempt, HistoryLedger, HistoryStore, HISTORY_LIMIT};
pub use location::{
    Coordinates, GeoLocator, LocationProvider, PermissionStatus, PositionRequest, PositionSource,
    StaticPosition,
};
pub use message::compose_alert_message;
pub use storage::{Config, Database, KvContactStore, KvHistoryStore};
pub use transport::{
    MessageTransport, Platform, SmsCapability, SmsComposer, SmsGateway, SmsTransport,
    TransportError,
};
