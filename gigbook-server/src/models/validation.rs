//! Validation error types and field rules shared by the forms

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// North-American phone number: `555-123-4567`, `(555) 123 4567`, `555.123.4567`
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(?\d{3}\)?[-. ]?\d{3}[-. ]?\d{4}$").expect("invalid phone regex")
});

/// Absolute http(s) URL with a non-empty host
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://[^\s/?#]+[^\s]*$").expect("invalid url regex"));

static FACEBOOK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://([a-z0-9-]+\.)?facebook\.com(/[^\s]*)?$")
        .expect("invalid facebook regex")
});

/// Validation error for a single form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is missing or blank
    Required { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Value doesn't match the required format
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// Value is not one of the allowed choices
    InvalidChoice { field: &'static str, value: String },

    /// Submitted value has the wrong JSON type (e.g. `null` for text)
    WrongType { field: String, reason: String },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Self::Required { field }
            | Self::TooLong { field, .. }
            | Self::InvalidFormat { field, .. }
            | Self::InvalidChoice { field, .. } => *field,
            Self::WrongType { field, .. } => field.as_str(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { field } => write!(f, "{} is required", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::InvalidChoice { field, value } => {
                write!(f, "'{}' is not a valid choice for {}", value, field)
            }
            Self::WrongType { field, reason } => write!(f, "{}: {}", field, reason),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Every field error found in one form submission.
///
/// Forms check all of their fields before giving up, so a rejected
/// submission reports everything that is wrong with it at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(Vec<ValidationError>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the error of a failed rule and hand back a placeholder so the
    /// caller can keep checking the remaining fields.
    pub fn check<T: Default>(&mut self, result: Result<T, ValidationError>) -> T {
        result.unwrap_or_else(|err| {
            self.0.push(err);
            T::default()
        })
    }

    pub fn push(&mut self, err: ValidationError) {
        self.0.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// True if some error was recorded against `field`.
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|err| err.field() == field)
    }

    /// `Ok(value)` when nothing was recorded, otherwise the collected errors.
    pub fn finish<T>(self, value: T) -> Result<T, FormErrors> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

/// Trimmed, non-blank text of at most `max` characters.
pub fn required_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value.to_owned())
}

/// Trimmed text; blank input becomes `None`.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) if v.chars().count() > max => Err(ValidationError::TooLong { field, max }),
        Some(v) => Ok(Some(v.to_owned())),
    }
}

pub fn optional_phone(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    let phone = optional_text(field, value, max)?;
    match phone {
        Some(p) if !PHONE_RE.is_match(&p) => Err(ValidationError::InvalidFormat {
            field,
            reason: "must be a phone number like 555-123-4567",
        }),
        other => Ok(other),
    }
}

pub fn optional_url(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    let url = optional_text(field, value, max)?;
    match url {
        Some(u) if !URL_RE.is_match(&u) => Err(ValidationError::InvalidFormat {
            field,
            reason: "must be an absolute http:// or https:// URL",
        }),
        other => Ok(other),
    }
}

pub fn optional_facebook_url(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    let url = optional_url(field, value, max)?;
    match url {
        Some(u) if !FACEBOOK_RE.is_match(&u) => Err(ValidationError::InvalidFormat {
            field,
            reason: "must link to a facebook.com page",
        }),
        other => Ok(other),
    }
}
