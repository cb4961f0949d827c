//! Log tab rendering helpers

use chrono::{DateTime, Local};

use crate::types::LogEntry;

pub const EMPTY_PLACEHOLDER: &str = "No logs to display";

/// Local wall-clock time of an entry; the raw timestamp if it does not parse
pub fn format_time(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(time) => time.with_timezone(&Local).format("%-I:%M:%S %p").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

pub fn format_entry(entry: &LogEntry) -> String {
    format!("[{}] {}", format_time(&entry.timestamp), entry.message)
}

/// One line per entry, or the placeholder alone
pub fn render_lines(entries: &[LogEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec![EMPTY_PLACEHOLDER.to_string()];
    }
    entries.iter().map(format_entry).collect()
}
