//! Key-row grouping: sheet grid → ordered translation table
//!
//! Every key cell found in the sheet becomes one [`TranslationEntry`]. The
//! cells to its right are joined to the language header row (row 0) by column
//! index, and accumulated per language in left-to-right order.

use crate::config::MalformedKeyPolicy;
use crate::core::classify::is_key_cell;
use crate::core::rectify::rectify_key;
use crate::error::{ImpexError, ImpexResult};
use crate::types::{Cell, CellPosition, Row, Sheet};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

//==============================================================================
// Language columns
//==============================================================================

/// A row-0 cell naming the language of its column. Identity is the column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageHeader {
    pub column: u32,
    pub label: String,
}

impl LanguageHeader {
    fn from_cell(cell: &Cell) -> Self {
        Self {
            column: cell.col(),
            label: cell.display().into_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageColumn {
    pub header: LanguageHeader,
    pub values: Vec<String>,
}

/// Per-language values of one key row, in column encounter order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationGroup {
    columns: Vec<LanguageColumn>,
}

impl TranslationGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` under `header`, opening the column on first use
    pub fn push(&mut self, header: &LanguageHeader, value: impl Into<String>) {
        match self
            .columns
            .iter_mut()
            .find(|c| c.header.column == header.column)
        {
            Some(column) => column.values.push(value.into()),
            None => self.columns.push(LanguageColumn {
                header: header.clone(),
                values: vec![value.into()],
            }),
        }
    }

    pub fn columns(&self) -> &[LanguageColumn] {
        &self.columns
    }

    pub fn headers(&self) -> impl Iterator<Item = &LanguageHeader> {
        self.columns.iter().map(|c| &c.header)
    }

    pub fn column_indices(&self) -> Vec<u32> {
        self.columns.iter().map(|c| c.header.column).collect()
    }

    /// All values flattened in group order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .flat_map(|c| c.values.iter().map(String::as_str))
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

//==============================================================================
// Translation table
//==============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationEntry {
    /// Position of the key cell; the entry's identity
    pub key_cell: CellPosition,
    /// Key text as found in the sheet
    pub raw_key: String,
    /// Rectified key, prefixed with the field separator
    pub key_field: String,
    pub group: TranslationGroup,
}

/// Insertion-ordered map from key cell to its translation group
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    entries: Vec<TranslationEntry>,
    index: HashMap<CellPosition, usize>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `entry`, or replace the entry for the same key cell in place.
    /// Returns `true` when an earlier entry was replaced.
    pub fn upsert(&mut self, entry: TranslationEntry) -> bool {
        match self.index.get(&entry.key_cell) {
            Some(&idx) => {
                self.entries[idx] = entry;
                true
            }
            None => {
                self.index.insert(entry.key_cell, self.entries.len());
                self.entries.push(entry);
                false
            }
        }
    }

    pub fn get(&self, key_cell: CellPosition) -> Option<&TranslationEntry> {
        self.index.get(&key_cell).map(|&idx| &self.entries[idx])
    }

    pub fn entries(&self) -> &[TranslationEntry] {
        &self.entries
    }

    pub fn first(&self) -> Option<&TranslationEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose language columns differ from the first entry's
    pub fn column_mismatches(&self) -> Vec<&TranslationEntry> {
        let Some(first) = self.first() else {
            return Vec::new();
        };
        let expected = first.group.column_indices();
        self.entries
            .iter()
            .skip(1)
            .filter(|e| e.group.column_indices() != expected)
            .collect()
    }
}

//==============================================================================
// Builder
//==============================================================================

/// Scans a sheet and builds its [`TranslationTable`]
pub struct TableBuilder<'a> {
    sheet: &'a Sheet,
    policy: MalformedKeyPolicy,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> TableBuilder<'a> {
    pub fn new(sheet: &'a Sheet) -> Self {
        Self {
            sheet,
            policy: MalformedKeyPolicy::default(),
            cancel: None,
        }
    }

    pub fn malformed_keys(mut self, policy: MalformedKeyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Abort with [`ImpexError::Cancelled`] once `flag` is raised.
    /// Checked before each row.
    pub fn cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn build(&self) -> ImpexResult<TranslationTable> {
        let headers = self.header_lookup();
        let mut table = TranslationTable::new();

        for row in self.sheet.rows() {
            if self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                return Err(ImpexError::Cancelled);
            }

            for key_cell in row.cells.iter().filter(|c| is_key_cell(c)) {
                let raw_key = key_cell.display().into_owned();
                let key_field = match rectify_key(&raw_key) {
                    Ok(field) => field,
                    Err(e) => match self.policy {
                        MalformedKeyPolicy::Skip => {
                            warn!(cell = %key_cell.position, raw = %raw_key, "skipping malformed key");
                            continue;
                        }
                        MalformedKeyPolicy::Abort => return Err(e),
                    },
                };

                let entry = TranslationEntry {
                    key_cell: key_cell.position,
                    raw_key,
                    key_field,
                    group: group_row(row, key_cell, &headers),
                };
                if table.upsert(entry) {
                    debug!(cell = %key_cell.position, "replaced earlier entry for key cell");
                }
            }
        }

        Ok(table)
    }

    /// Column index → language header, from row 0
    fn header_lookup(&self) -> HashMap<u32, LanguageHeader> {
        self.sheet
            .header_row()
            .map(|row| {
                row.cells
                    .iter()
                    .map(|cell| (cell.col(), LanguageHeader::from_cell(cell)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Group the non-empty cells right of `key_cell` by their language header
fn group_row(
    row: &Row,
    key_cell: &Cell,
    headers: &HashMap<u32, LanguageHeader>,
) -> TranslationGroup {
    let mut group = TranslationGroup::new();
    for cell in row.cells.iter().filter(|c| c.col() > key_cell.col()) {
        let value = cell.display();
        if value.is_empty() {
            continue;
        }
        match headers.get(&cell.col()) {
            Some(header) => group.push(header, value),
            None => debug!(cell = %cell.position, "dropping value without language header"),
        }
    }
    group
}
