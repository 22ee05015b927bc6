mod config;
pub mod database;
mod kv_stores;

pub use config::{AlertsConfig, Config, LocationConfig, TransportConfig, TransportMode};
pub use database::Database;
pub use kv_stores::{
    KvContactStore, KvHistoryStore, ALERT_HISTORY_KEY, CONTACTS_KEY, SCHEMA_VERSION,
};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/resqlink[-dev]/` based on RESQLINK_ENV.
///
/// Set RESQLINK_ENV=dev to use development data directory.
/// RESQLINK_DATA_DIR overrides both and is used verbatim.
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("RESQLINK_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("RESQLINK_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("resqlink-dev")
            } else {
                base_dir.join("resqlink")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
