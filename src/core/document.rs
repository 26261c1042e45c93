//! Impex text generation

use crate::core::rectify::{escape_value, language_field, FIELD_SEPARATOR};
use crate::core::table::TranslationTable;
use std::fmt;

/// Fixed start of the header line
pub const IMPEX_HEADER_PREFIX: &str = "INSERT_UPDATE LocalizationEntry; code[unique=true];";

/// Header line plus one body line per table entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpexDocument {
    header: String,
    body: Vec<String>,
}

impl ImpexDocument {
    /// Render `table`. Returns `None` for an empty table.
    ///
    /// Language fields come from the first entry's group, so the header is
    /// only meaningful for every line when all groups share its columns
    /// (see [`TranslationTable::column_mismatches`]).
    pub fn from_table(table: &TranslationTable) -> Option<Self> {
        let first = table.first()?;

        let languages: Vec<String> = first
            .group
            .headers()
            .map(|h| language_field(&h.label))
            .collect();
        let header = format!("{}{}", IMPEX_HEADER_PREFIX, languages.join(";"));

        let body = table
            .entries()
            .iter()
            .map(|entry| {
                let values: Vec<String> = entry.group.values().map(escape_value).collect();
                format!("{}{}{}", entry.key_field, FIELD_SEPARATOR, values.join(";"))
            })
            .collect();

        Some(Self { header, body })
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// Header and body joined by newlines, without a trailing terminator
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(
            self.header.len() + self.body.iter().map(|l| l.len() + 1).sum::<usize>(),
        );
        out.push_str(&self.header);
        out.push('\n');
        out.push_str(&self.body.join("\n"));
        out
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.render().into_bytes()
    }
}

impl fmt::Display for ImpexDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
