//! Controlled form state
//!
//! `Form<T>` keeps the current values of one tab's inputs together with
//! the snapshot it was constructed from. Top-level fields are addressed by
//! a typed key; nested additional-info values always take an explicit
//! string key, so there is a single way to reach each value.

use crate::types::{AdditionalInfo, FieldValue, FormState};

/// A value type a `Form` can hold
pub trait FormModel: Clone {
    /// Top-level text fields
    type Field: Copy;

    fn set_field(&mut self, field: Self::Field, value: String);
    fn field(&self, field: Self::Field) -> Option<&str>;
    fn additional_info(&self) -> Option<&AdditionalInfo>;
    fn additional_info_mut(&mut self) -> &mut AdditionalInfo;
}

/// Top-level fields of the Manual Entry tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualField {
    AccountNumber,
    Client,
    City,
}

impl ManualField {
    pub const ALL: [ManualField; 3] = [ManualField::AccountNumber, ManualField::Client, ManualField::City];

    pub fn label(&self) -> &'static str {
        match self {
            ManualField::AccountNumber => "Account Number",
            ManualField::Client => "Business Name",
            ManualField::City => "City",
        }
    }
}

impl FormModel for FormState {
    type Field = ManualField;

    fn set_field(&mut self, field: ManualField, value: String) {
        let slot = match field {
            ManualField::AccountNumber => &mut self.account_number,
            ManualField::Client => &mut self.client,
            ManualField::City => &mut self.city,
        };
        *slot = Some(value);
    }

    fn field(&self, field: ManualField) -> Option<&str> {
        match field {
            ManualField::AccountNumber => self.account_number.as_deref(),
            ManualField::Client => self.client.as_deref(),
            ManualField::City => self.city.as_deref(),
        }
    }

    fn additional_info(&self) -> Option<&AdditionalInfo> {
        self.additional_info.as_ref()
    }

    fn additional_info_mut(&mut self) -> &mut AdditionalInfo {
        self.additional_info.get_or_insert_with(AdditionalInfo::new)
    }
}

#[derive(Debug, Clone)]
pub struct Form<T: FormModel> {
    initial: T,
    data: T,
}

impl<T: FormModel + Default> Default for Form<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: FormModel> Form<T> {
    /// The initial snapshot is owned by the form; later changes to the
    /// caller's value cannot leak into `reset`.
    pub fn new(initial: T) -> Self {
        Self {
            data: initial.clone(),
            initial,
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn set_data(&mut self, data: T) {
        self.data = data;
    }

    /// Text of a top-level field, empty when unset
    pub fn value(&self, field: T::Field) -> &str {
        self.data.field(field).unwrap_or("")
    }

    pub fn handle_change(&mut self, field: T::Field, value: impl Into<String>) {
        self.data.set_field(field, value.into());
    }

    pub fn handle_additional_info_change(&mut self, key: &str, value: impl Into<String>) {
        self.data
            .additional_info_mut()
            .insert(key.to_string(), FieldValue::Text(value.into()));
    }

    pub fn handle_checkbox_change(&mut self, key: &str, checked: bool) {
        self.data
            .additional_info_mut()
            .insert(key.to_string(), FieldValue::Flag(checked));
    }

    /// Text stored under `key`, empty when unset or not text
    pub fn additional_text(&self, key: &str) -> &str {
        self.data
            .additional_info()
            .and_then(|info| info.get(key))
            .and_then(FieldValue::as_text)
            .unwrap_or("")
    }

    /// Checkbox state under `key`; anything but `true` reads as unchecked
    pub fn is_checked(&self, key: &str) -> bool {
        self.data
            .additional_info()
            .and_then(|info| info.get(key))
            .and_then(FieldValue::as_flag)
            .unwrap_or(false)
    }

    pub fn reset(&mut self) {
        self.data = self.initial.clone();
    }
}
