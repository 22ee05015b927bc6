//! Desktop stand-ins for the phone's SMS, vibration and location hooks.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use resqlink_core::storage::{data_dir, TransportMode};
use resqlink_core::{
    ArmingController, Config, Database, DispatchEngine, GeoLocator, Haptics, HapticsError,
    HistoryLedger, KvContactStore, KvHistoryStore, SmsCapability, SmsComposer, SmsGateway,
    SmsTransport, StaticPosition, TransportError, VibrationPattern,
};
use serde::Serialize;

pub type Controller = ArmingController<GeoLocator<StaticPosition>, SmsTransport>;

#[derive(Serialize)]
struct OutboxEntry<'a> {
    to: &'a str,
    parts: &'a [String],
    at: chrono::DateTime<Utc>,
}

/// Gateway that "sends" by appending each message to `outbox.jsonl`.
pub struct OutboxGateway {
    path: PathBuf,
}

impl OutboxGateway {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn append(&self, to: &str, parts: &[String]) -> Result<(), TransportError> {
        let line = serde_json::to_string(&OutboxEntry {
            to,
            parts,
            at: Utc::now(),
        })
        .map_err(|e| TransportError::Gateway(e.to_string()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| TransportError::Gateway(format!("{}: {e}", self.path.display())))?;
        writeln!(file, "{line}").map_err(|e| TransportError::Gateway(e.to_string()))
    }
}

impl SmsGateway for OutboxGateway {
    fn send_text(&self, phone: &str, body: &str) -> Result<(), TransportError> {
        self.append(phone, &[body.to_string()])
    }

    fn send_multipart(&self, phone: &str, parts: &[String]) -> Result<(), TransportError> {
        self.append(phone, parts)
    }
}

/// Composer that prints the message for the user to send by hand.
pub struct PrintComposer;

impl SmsComposer for PrintComposer {
    fn compose(&self, phone: &str, body: &str) -> Result<(), TransportError> {
        println!("--- send to {phone} ---\n{body}\n");
        Ok(())
    }
}

/// Rings the terminal bell once per pulse in the pattern.
pub struct TerminalBell;

impl Haptics for TerminalBell {
    fn vibrate(&self, pattern: &VibrationPattern) -> Result<(), HapticsError> {
        let pulses = pattern.0.len() / 2;
        let mut err = std::io::stderr();
        err.write_all("\x07".repeat(pulses.max(1)).as_bytes())
            .and_then(|_| err.flush())
            .map_err(|e| HapticsError(e.to_string()))
    }
}

fn capability(mode: TransportMode) -> Result<SmsCapability, Box<dyn std::error::Error>> {
    Ok(match mode {
        TransportMode::Outbox => {
            let outbox = OutboxGateway::new(data_dir()?.join("outbox.jsonl"));
            SmsCapability::DirectSend(Arc::new(outbox))
        }
        TransportMode::Manual => SmsCapability::ManualFallback(Arc::new(PrintComposer)),
        TransportMode::Unsupported => SmsCapability::Unsupported,
    })
}

/// Open storage and wire a controller from the saved configuration.
pub fn controller(config: &Config) -> Result<Controller, Box<dyn std::error::Error>> {
    let db = Arc::new(Database::open()?);
    let contacts = Arc::new(KvContactStore::new(db.clone()));
    let ledger = Arc::new(HistoryLedger::new(Arc::new(KvHistoryStore::new(db))));

    let position = StaticPosition::new(
        config.location.permission(),
        config.location.fixed_position(),
    );
    let engine = DispatchEngine::new(
        GeoLocator::new(position),
        SmsTransport::new(capability(config.transport.mode)?),
    );

    Ok(ArmingController::new(contacts, engine, ledger)
        .with_haptics(Arc::new(TerminalBell))
        .with_vibration(config.alerts.vibration))
}
