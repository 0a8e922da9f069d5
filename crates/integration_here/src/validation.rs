//! Argument validation
//!
//! Runs synchronously before a request is encoded, so a rejected call never
//! reaches the network.

use crate::error::HereError;

/// Require an optional value to be present
///
/// # Errors
///
/// Returns `HereError::MissingArgument(name)` if `value` is `None`.
pub fn require<T>(value: Option<T>, name: &str) -> Result<T, HereError> {
    value.ok_or_else(|| HereError::missing(name))
}

/// Require an optional string to be present and not blank
///
/// # Errors
///
/// Returns `HereError::MissingArgument(name)` if `value` is `None` or whitespace.
pub fn require_text<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, HereError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| HereError::missing(name))
}

/// Require a sequence to hold at least `min` elements
///
/// # Errors
///
/// Returns `HereError::MissingArgument(name)` if `items` is empty and
/// `HereError::InsufficientArguments` if it holds fewer than `min` elements.
pub fn require_non_empty<'a, T>(items: &'a [T], name: &str, min: usize) -> Result<&'a [T], HereError> {
    if items.is_empty() {
        return Err(HereError::missing(name));
    }
    if items.len() < min {
        return Err(HereError::InsufficientArguments {
            name: name.to_string(),
            required: min,
            actual: items.len(),
        });
    }
    Ok(items)
}

/// Require a stop label to be free of the `;` field separator
///
/// # Errors
///
/// Returns `HereError::InvalidLabel(label)` if `label` contains `;`.
pub fn require_label(label: &str) -> Result<&str, HereError> {
    if label.contains(';') {
        return Err(HereError::InvalidLabel(label.to_string()));
    }
    Ok(label)
}
