//! Data model shared by the CLI and the desktop app
//!
//! - LogEntry: one line of the session log
//! - FormState: a manual-entry account (also carries additional info)
//! - BusinessInfo / FileUploadResponse: payloads of the API seam

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity tag of a log entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Info,
    Error,
    Success,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "info"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Success => write!(f, "success"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO-8601 (RFC 3339, UTC)
    pub timestamp: String,
    pub message: String,
    #[serde(rename = "type")]
    pub level: LogLevel,
}

/// Value of an additional-info key: free text or a checkbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(flag) => Some(*flag),
            FieldValue::Text(_) => None,
        }
    }
}

/// Open mapping; the UI only ever writes keys from the static catalog
pub type AdditionalInfo = BTreeMap<String, FieldValue>;

/// One account as entered on the Manual Entry tab
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<AdditionalInfo>,
}

impl FormState {
    /// True when at least one of account number, client and city is non-empty
    pub fn has_any_field(&self) -> bool {
        [&self.account_number, &self.client, &self.city]
            .iter()
            .any(|field| non_empty(field).is_some())
    }

    /// Copy with empty strings collapsed to `None`
    pub fn normalized(&self) -> FormState {
        FormState {
            account_number: non_empty(&self.account_number).map(str::to_string),
            client: non_empty(&self.client).map(str::to_string),
            city: non_empty(&self.city).map(str::to_string),
            additional_info: self.additional_info.clone(),
        }
    }

    pub fn account_number_or(&self, fallback: &'static str) -> &str {
        non_empty(&self.account_number).unwrap_or(fallback)
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Business-license lookup result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessInfo {
    pub license_number: String,
    pub business_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub status: String,
}

/// One loosely typed row returned by the upload step
pub type Record = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileUploadResponse {
    pub success: bool,
    pub message: String,
    pub data: Vec<Record>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualEntryResponse {
    pub success: bool,
    pub data: Option<FormState>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeResponse {
    pub results: Vec<BusinessInfo>,
}
