//! Alert message template.

use chrono::{DateTime, TimeZone};

use crate::location::Coordinates;

/// Location line used when no fix could be obtained.
pub const LOCATION_UNAVAILABLE: &str = "Location unavailable";

/// Human-readable timestamp in the en-US locale style, e.g.
/// `3/7/2026, 9:05:01 PM`.
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Location text for the message: a map link or the unavailable marker.
pub fn location_text(location: Option<&Coordinates>) -> String {
    location
        .map(Coordinates::maps_url)
        .unwrap_or_else(|| LOCATION_UNAVAILABLE.to_string())
}

/// Build the alert body. Only the timestamp and location vary.
pub fn compose_alert_message(timestamp: &str, location: Option<&Coordinates>) -> String {
    format!(
        "🚨 EMERGENCY ALERT from ResQLink 🚨\n\n\
         I need immediate help!\n\n\
         Time: {timestamp}\n\
         Location: {}\n\n\
         This is an automated emergency message.",
        location_text(location)
    )
}
