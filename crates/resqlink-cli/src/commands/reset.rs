use resqlink_core::{Config, Database};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let removed = db.kv_clear()?;
    Config::default().save()?;
    tracing::info!(removed, "Application data reset");
    println!("All emergency contacts, alert history and settings were deleted.");
    Ok(())
}
