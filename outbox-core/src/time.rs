//! Transfer timestamp formatting
//!
//! `TransferDate` is stored as text in a fixed format that other tools read
//! directly from the database, so it must never change. The format also
//! sorts lexicographically, which the descending-order history queries
//! rely on.

use chrono::{DateTime, Utc};

/// Storage format for `TransferDate` columns
pub const TRANSFER_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp for storage in the history table
pub fn format_transfer_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TRANSFER_DATE_FORMAT).to_string()
}
