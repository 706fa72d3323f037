//! URL and e-mail validation for the diagnosis form.
//!
//! Everything here is pure and cheap enough to run on every keystroke. The
//! e-mail rule is a syntactic check only, not RFC 5322 validation.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use super::{FormField, FormInput};

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // local@domain.tld where no part contains whitespace or a second '@'.
        let pattern = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("e-mail regex failed to compile: {error}"))
    })
}

fn has_scheme(value: &str) -> bool {
    ["http://", "https://"].into_iter().any(|scheme| {
        value
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Normalise a URL for validation.
///
/// Trims the input; blank input yields an empty string, input that already
/// carries an `http://` or `https://` scheme (any case) is returned as is, and
/// anything else gets `https://` prepended. The result is for validation only
/// and is never shown to the user or sent to the intake endpoint.
///
/// # Examples
/// ```
/// use intake::domain::validation::normalize_url;
///
/// assert_eq!(normalize_url(" example.com "), "https://example.com");
/// assert_eq!(normalize_url("HTTP://example.com"), "HTTP://example.com");
/// assert_eq!(normalize_url("   "), "");
/// ```
#[must_use]
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if has_scheme(trimmed) {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    }
}

/// Whether `raw` parses as a URL once normalised.
#[must_use]
pub fn is_valid_url(raw: &str) -> bool {
    url_error(raw).is_none()
}

/// Whether `raw` looks like an e-mail address.
#[must_use]
pub fn is_valid_email(raw: &str) -> bool {
    email_error(raw).is_none()
}

fn url_error(raw: &str) -> Option<FieldError> {
    if raw.trim().is_empty() {
        return Some(FieldError::UrlMissing);
    }
    match Url::parse(&normalize_url(raw)) {
        Ok(_) => None,
        Err(_) => Some(FieldError::UrlMalformed),
    }
}

fn email_error(raw: &str) -> Option<FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(FieldError::EmailMissing);
    }
    if email_regex().is_match(trimmed) {
        None
    } else {
        Some(FieldError::EmailMalformed)
    }
}

/// A single field's validation failure.
///
/// `Display` renders the message shown under the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// URL field is blank.
    UrlMissing,
    /// URL does not parse, even with `https://` prepended.
    UrlMalformed,
    /// E-mail field is blank.
    EmailMissing,
    /// E-mail does not match `local@domain.tld`.
    EmailMalformed,
}

impl FieldError {
    /// Field the error belongs to.
    #[must_use]
    pub const fn field(self) -> FormField {
        match self {
            Self::UrlMissing | Self::UrlMalformed => FormField::Url,
            Self::EmailMissing | Self::EmailMalformed => FormField::Email,
        }
    }

    /// Stable code for machine consumers.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::UrlMissing | Self::EmailMissing => "missing_field",
            Self::UrlMalformed => "invalid_url",
            Self::EmailMalformed => "invalid_email",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::UrlMissing => "URLを入力してください",
            Self::UrlMalformed => "URLの形式が正しくありません",
            Self::EmailMissing => "メールアドレスを入力してください",
            Self::EmailMalformed => "メールアドレスの形式が正しくありません",
        };
        f.write_str(message)
    }
}

impl std::error::Error for FieldError {}

/// Per-field outcome of validating a [`FormInput`].
///
/// Derived data: obtain it from [`validate`], never edit it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationResult {
    url: Option<FieldError>,
    email: Option<FieldError>,
}

impl ValidationResult {
    /// Error for `field`, if it failed.
    #[must_use]
    pub const fn error(&self, field: FormField) -> Option<FieldError> {
        match field {
            FormField::Url => self.url,
            FormField::Email => self.email,
        }
    }

    /// URL error, if any.
    #[must_use]
    pub const fn url_error(&self) -> Option<FieldError> {
        self.url
    }

    /// E-mail error, if any.
    #[must_use]
    pub const fn email_error(&self) -> Option<FieldError> {
        self.email
    }

    /// Whether either field failed.
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.url.is_some() || self.email.is_some()
    }

    /// Failing errors in form order (URL first).
    pub fn errors(&self) -> impl Iterator<Item = FieldError> {
        self.url.into_iter().chain(self.email)
    }
}

/// Validate both form fields.
///
/// # Examples
/// ```
/// use intake::domain::FormInput;
/// use intake::domain::validation::{validate, FieldError};
///
/// let result = validate(&FormInput::new("example.com", "not-an-email"));
/// assert_eq!(result.url_error(), None);
/// assert_eq!(result.email_error(), Some(FieldError::EmailMalformed));
/// ```
#[must_use]
pub fn validate(input: &FormInput) -> ValidationResult {
    ValidationResult {
        url: url_error(&input.url),
        email: email_error(&input.email),
    }
}
