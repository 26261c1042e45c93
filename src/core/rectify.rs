//! Rectification rules applied to raw cell text before it is emitted

use crate::error::{ImpexError, ImpexResult};

/// Field delimiter of the impex format
pub const FIELD_SEPARATOR: char = ';';

/// Clean a raw key cell value into a ready-to-emit key field.
///
/// All whitespace is removed, then characters outside `a`-`z` are stripped
/// from both ends. The result is prefixed with the field separator.
///
/// ```
/// use impex_forge::core::rectify_key;
///
/// assert_eq!(rectify_key("; customer.interest.save.changes =").unwrap(),
///            ";customer.interest.save.changes");
/// ```
pub fn rectify_key(raw: &str) -> ImpexResult<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let key = compact
        .trim_start_matches(|c: char| !c.is_ascii_lowercase())
        .trim_end_matches(|c: char| !c.is_ascii_lowercase());

    if key.is_empty() {
        return Err(ImpexError::MalformedKey {
            raw: raw.to_string(),
        });
    }

    let mut field = String::with_capacity(key.len() + 1);
    field.push(FIELD_SEPARATOR);
    field.push_str(key);
    Ok(field)
}

/// Map a language header to the locale code the import expects
pub fn rectify_language(header: &str) -> &str {
    if header.eq_ignore_ascii_case("gr") {
        "el"
    } else if header.eq_ignore_ascii_case("cz") {
        "cs"
    } else if header.to_lowercase().contains("default") {
        "en"
    } else {
        header
    }
}

/// Header field for one language column
pub fn language_field(header: &str) -> String {
    format!("translation[lang={}]", rectify_language(header))
}

/// Replace the field separator inside a value so it stays one field
pub fn escape_value(value: &str) -> String {
    value.replace(FIELD_SEPARATOR, " ")
}
