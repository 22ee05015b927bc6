use std::sync::Arc;

use clap::Subcommand;
use resqlink_core::{Database, HistoryLedger, KvHistoryStore};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List past alerts, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear alert history
    Clear,
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Arc::new(Database::open()?);
    let ledger = HistoryLedger::new(Arc::new(KvHistoryStore::new(db)));

    match action {
        HistoryAction::List { json } => {
            let attempts = ledger.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&attempts)?);
            } else if attempts.is_empty() {
                println!("No emergency alerts sent yet");
            } else {
                println!("Total alerts sent: {}", attempts.len());
                for a in &attempts {
                    let location = a
                        .location()
                        .map(|c| c.maps_url())
                        .unwrap_or_else(|| "no location".to_string());
                    println!(
                        "{}  {}/{} delivered  {}",
                        a.timestamp(),
                        a.success_count(),
                        a.recipient_count(),
                        location
                    );
                }
            }
        }
        HistoryAction::Clear => {
            ledger.clear()?;
            println!("alert history cleared");
        }
    }
    Ok(())
}
