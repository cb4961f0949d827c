//! Additional Info tab
//!
//! Fixed text fields plus groups of independent checkboxes. Checkbox keys
//! are `"<group>-<option>"`; options in one group are not exclusive.
//! Saving only records a log entry.

use crate::form::Form;
use crate::log::LogStore;
use crate::types::FormState;

pub const TEXT_FIELDS: &[&str] = &[
    "Old Account #",
    "Old DBA Name",
    "Account Number for Changes only",
    "Buyer",
    "Receiving Times",
    "Special Instructions",
    "Phone Number",
    "Route #",
    "Salesperson",
    "Account Number",
];

pub const CHECKBOX_GROUPS: &[(&str, &[&str])] = &[
    ("Account Type", &["New Account", "Close Account", "Change or Add Info"]),
    ("Delivery Location", &["Front", "Back", "Side"]),
    ("Delivery Days", &["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]),
    ("Credit Application", &["Yes", "No"]),
    ("Sale Status", &["On Sale", "Off-Sale"]),
    ("Draft Status", &["Ours", "Theirs", "Ours & Theirs", "Other"]),
    ("Market Type", &["Bar", "Restaurant", "Grocery", "Deli", "Convenience", "Other"]),
    ("Buying Status", &["Yes", "No"]),
];

pub fn checkbox_key(group: &str, option: &str) -> String {
    format!("{group}-{option}")
}

/// Every checkbox key in catalog order
pub fn checkbox_keys() -> Vec<String> {
    CHECKBOX_GROUPS
        .iter()
        .flat_map(|(group, options)| options.iter().map(move |option| checkbox_key(group, option)))
        .collect()
}

pub struct AdditionalInfoTab {
    form: Form<FormState>,
    log: LogStore,
}

impl AdditionalInfoTab {
    pub fn new(log: LogStore) -> Self {
        Self {
            form: Form::default(),
            log,
        }
    }

    pub fn form(&self) -> &Form<FormState> {
        &self.form
    }

    pub fn text(&self, field: &str) -> &str {
        self.form.additional_text(field)
    }

    pub fn set_text(&mut self, field: &str, value: impl Into<String>) {
        self.form.handle_additional_info_change(field, value);
    }

    pub fn is_checked(&self, group: &str, option: &str) -> bool {
        self.form.is_checked(&checkbox_key(group, option))
    }

    pub fn set_checked(&mut self, group: &str, option: &str, checked: bool) {
        self.form.handle_checkbox_change(&checkbox_key(group, option), checked);
    }

    /// Nothing is persisted or sent
    pub fn save(&self) {
        self.log.success("Additional information saved");
    }
}
