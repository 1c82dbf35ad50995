//! # Input Validation Module
//!
//! Validation rules for the two free-text steps of the ordering dialogue:
//! the customer's name and the comma-separated list of items.

use lazy_static::lazy_static;
use regex::Regex;

/// Minimum length (in characters) of a single ordered item
pub const MIN_ITEM_CHARS: usize = 2;
/// Maximum length (in characters) of a single ordered item
pub const MAX_ITEM_CHARS: usize = 50;
/// How much of a rejected item is echoed back to the user
pub const ITEM_PREVIEW_CHARS: usize = 20;
/// Maximum number of items in one order; keeps every message about the
/// order under Telegram's length limit
pub const MAX_ITEMS: usize = 50;

// Latin or Cyrillic letters, whitespace and hyphens; 2 to 50 characters
const NAME_PATTERN: &str = r"^[а-яА-ЯёЁa-zA-Z\s-]{2,50}$";

lazy_static! {
    static ref NAME_REGEX: Regex = Regex::new(NAME_PATTERN).expect("Name pattern should be valid");
}

/// Reasons a customer name is rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// Contains characters other than letters, whitespace and hyphens,
    /// or is outside the 2..=50 character range
    InvalidFormat,
}

impl std::fmt::Display for NameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameError::InvalidFormat => write!(
                f,
                "name must contain only letters, spaces or hyphens and be 2-50 characters long"
            ),
        }
    }
}

impl std::error::Error for NameError {}

/// Reasons an item list is rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemsError {
    /// An item is shorter or longer than allowed. Carries a preview of the
    /// offending item, at most [`ITEM_PREVIEW_CHARS`] characters long.
    InvalidItem { preview: String, truncated: bool },
    /// Nothing was left after dropping empty segments
    Empty,
    /// More than [`MAX_ITEMS`] items
    TooMany { count: usize },
}

impl std::fmt::Display for ItemsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemsError::InvalidItem { preview, .. } => write!(
                f,
                "item '{preview}' must be {MIN_ITEM_CHARS}-{MAX_ITEM_CHARS} characters long"
            ),
            ItemsError::Empty => write!(f, "no items were given"),
            ItemsError::TooMany { count } => {
                write!(f, "{count} items given, at most {MAX_ITEMS} are allowed")
            }
        }
    }
}

impl std::error::Error for ItemsError {}

/// Validates a customer name, returning the trimmed name
pub fn validate_name(input: &str) -> Result<String, NameError> {
    let trimmed = input.trim();

    if !NAME_REGEX.is_match(trimmed) {
        return Err(NameError::InvalidFormat);
    }

    Ok(trimmed.to_string())
}

/// Splits a comma-separated order into trimmed, non-empty items.
///
/// Items are checked in order and the first one outside the allowed length
/// range rejects the whole list. Lists longer than [`MAX_ITEMS`] are rejected.
pub fn parse_items(input: &str) -> Result<Vec<String>, ItemsError> {
    let mut items = Vec::new();

    for segment in input.split(',') {
        let item = segment.trim();
        if item.is_empty() {
            continue;
        }

        let len = item.chars().count();
        if !(MIN_ITEM_CHARS..=MAX_ITEM_CHARS).contains(&len) {
            return Err(ItemsError::InvalidItem {
                preview: item.chars().take(ITEM_PREVIEW_CHARS).collect(),
                truncated: len > ITEM_PREVIEW_CHARS,
            });
        }

        items.push(item.to_string());
    }

    if items.is_empty() {
        return Err(ItemsError::Empty);
    }

    if items.len() > MAX_ITEMS {
        return Err(ItemsError::TooMany { count: items.len() });
    }

    Ok(items)
}
