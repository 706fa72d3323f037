//! Form field state for the diagnosis request form.
//!
//! [`FormInput`] holds exactly what the user typed; [`DiagnosisPayload`] is the
//! trimmed copy that leaves the form on submission.

use serde::{Deserialize, Serialize};

/// The two inputs of the diagnosis form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// Website URL to diagnose.
    Url,
    /// Address the report is mailed to.
    Email,
}

impl FormField {
    /// Wire name of the field, as used in JSON bodies and error details.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Email => "email",
        }
    }
}

/// Raw, untrimmed text entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    /// Website URL as typed.
    pub url: String,
    /// E-mail address as typed.
    pub email: String,
}

impl FormInput {
    /// Build input from both field values.
    pub fn new(url: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            email: email.into(),
        }
    }

    /// Current text of one field.
    #[must_use]
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Url => &self.url,
            FormField::Email => &self.email,
        }
    }

    /// Replace the text of one field.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Url => self.url = value,
            FormField::Email => self.email = value,
        }
    }

    /// Trimmed submission payload for the current input.
    #[must_use]
    pub fn payload(&self) -> DiagnosisPayload {
        DiagnosisPayload::new(&self.url, &self.email)
    }
}

/// Whether each field has been focused and left at least once.
///
/// Inline validation messages stay hidden until their field is touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchedState {
    /// URL field was blurred.
    pub url: bool,
    /// E-mail field was blurred.
    pub email: bool,
}

impl TouchedState {
    /// Both fields marked as touched, as after a submit attempt.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            url: true,
            email: true,
        }
    }

    /// Mark one field as touched.
    pub fn touch(&mut self, field: FormField) {
        match field {
            FormField::Url => self.url = true,
            FormField::Email => self.email = true,
        }
    }

    /// Whether `field` has been touched.
    #[must_use]
    pub const fn is_touched(self, field: FormField) -> bool {
        match field {
            FormField::Url => self.url,
            FormField::Email => self.email,
        }
    }

    /// Whether every field has been touched.
    #[must_use]
    pub const fn all_touched(self) -> bool {
        self.url && self.email
    }
}

/// Trimmed `{url, email}` body sent to the intake endpoint.
///
/// # Examples
/// ```
/// use intake::domain::DiagnosisPayload;
///
/// let payload = DiagnosisPayload::new("  example.com ", "a@b.co\n");
/// assert_eq!(payload.url(), "example.com");
/// assert_eq!(
///     serde_json::to_string(&payload)?,
///     r#"{"url":"example.com","email":"a@b.co"}"#
/// );
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisPayload {
    url: String,
    email: String,
}

impl DiagnosisPayload {
    /// Build a payload, trimming surrounding whitespace from both values.
    #[must_use]
    pub fn new(url: &str, email: &str) -> Self {
        Self {
            url: url.trim().to_owned(),
            email: email.trim().to_owned(),
        }
    }

    /// Trimmed website URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Trimmed e-mail address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}
