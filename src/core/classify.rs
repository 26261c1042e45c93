//! Translation-key cell classification
//!
//! A text cell holds a translation key when its trimmed value is 7-bit ASCII
//! and looks like `segment.segment(.segment)*`: it must not start with an
//! uppercase Latin letter or a dot, must not end with a dot, and must carry at
//! least one dot strictly inside. ASCII-only filtering is what separates keys
//! from translated values sharing the same row.

use crate::types::Cell;
use regex::Regex;
use std::sync::LazyLock;

static KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^A-Z.\r\n][^\r\n]*\.[^\r\n]*[^.\r\n]$").expect("key pattern is valid")
});

/// Whether `value` qualifies as a translation key
pub fn is_translation_key(value: &str) -> bool {
    let value = value.trim();
    value.is_ascii() && KEY_PATTERN.is_match(value)
}

/// Whether `cell` is a key cell. Only text cells are considered.
pub fn is_key_cell(cell: &Cell) -> bool {
    cell.as_text().is_some_and(is_translation_key)
}
