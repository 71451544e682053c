//! Constructors for common validation rules.
//!
//! These are conveniences only: the engine treats every validator as an
//! opaque function, and callers are free to ignore this module entirely.
//!
//! Every helper except [`required`] accepts the empty string, so optional
//! fields stay valid until the user actually types something. Combine with
//! [`required`] semantics by rejecting empties in a custom rule if needed.

use regex::Regex;
use serde_json::Value;

use super::registry::{ValidationOutcome, Validator};

/// Rejects empty strings and null values.
pub fn required() -> Validator {
    Box::new(|value| match value {
        Value::String(text) if text.is_empty() => {
            ValidationOutcome::invalid("this field is required")
        }
        Value::Null => ValidationOutcome::invalid("this field is required"),
        _ => ValidationOutcome::Valid,
    })
}

/// Rejects non-empty strings shorter than `min` characters. Empty strings
/// and non-string values pass.
pub fn min_length(min: usize) -> Validator {
    Box::new(move |value| match value {
        Value::String(text) if !text.is_empty() && text.chars().count() < min => {
            ValidationOutcome::invalid(format!("must be at least {min} characters"))
        }
        _ => ValidationOutcome::Valid,
    })
}

/// Rejects non-empty strings that do not match `regex`, reporting
/// `message`. Empty strings and non-string values pass.
pub fn pattern(regex: Regex, message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value| match value {
        Value::String(text) if !text.is_empty() && !regex.is_match(text) => {
            ValidationOutcome::Invalid(message.clone())
        }
        _ => ValidationOutcome::Valid,
    })
}

/// Rejects non-empty strings outside the given option set. Empty strings
/// and non-string values pass.
pub fn one_of<I, S>(options: I) -> Validator
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let options: Vec<String> = options.into_iter().map(Into::into).collect();
    Box::new(move |value| match value {
        Value::String(text) if !text.is_empty() && !options.iter().any(|option| option == text) => {
            ValidationOutcome::invalid(format!("must be one of: {}", options.join(", ")))
        }
        _ => ValidationOutcome::Valid,
    })
}
