//! Single-file conversion: one spreadsheet → one `.impex` file

use crate::config::MalformedKeyPolicy;
use crate::core::{ImpexDocument, TableBuilder, TranslationEntry};
use crate::error::{ImpexError, ImpexResult, NOT_REGULAR_FILE};
use crate::excel::WorkbookReader;
use crate::types::Sheet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Extension of generated files
pub const IMPEX_EXTENSION: &str = "impex";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub malformed_keys: MalformedKeyPolicy,
    /// Fail instead of warning when key rows cover different language columns
    pub strict_columns: bool,
}

/// Result of converting one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertOutcome {
    Written { output: PathBuf, entries: usize },
    /// No qualifying key rows; nothing was written
    NoKeys,
}

/// Converts one spreadsheet file
#[derive(Debug, Clone)]
pub struct FileConverter {
    source: PathBuf,
    options: ConvertOptions,
    cancel: Option<Arc<AtomicBool>>,
}

impl FileConverter {
    /// Fails with [`ImpexError::InvalidPath`] unless `source` is a regular file
    pub fn new<P: AsRef<Path>>(source: P) -> ImpexResult<Self> {
        let source = source.as_ref().to_path_buf();
        if !source.is_file() {
            return Err(ImpexError::InvalidPath {
                path: source,
                reason: NOT_REGULAR_FILE,
            });
        }
        Ok(Self {
            source,
            options: ConvertOptions::default(),
            cancel: None,
        })
    }

    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// File name of the source workbook, for reporting
    pub fn workbook_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }

    /// `<target_dir>/<source stem>.impex`
    pub fn output_path(&self, target_dir: &Path) -> PathBuf {
        let stem = self
            .source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        target_dir.join(format!("{}.{}", stem, IMPEX_EXTENSION))
    }

    /// Directory of the source file
    pub fn default_target_dir(&self) -> PathBuf {
        match self.source.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Convert next to the source file
    pub fn convert(&self) -> ImpexResult<ConvertOutcome> {
        self.convert_into(&self.default_target_dir())
    }

    /// Convert into `target_dir`. Writes nothing when no key rows are found.
    pub fn convert_into(&self, target_dir: &Path) -> ImpexResult<ConvertOutcome> {
        debug!(file = %self.workbook_name(), "reading workbook");
        let mut reader = WorkbookReader::open(&self.source)?;
        if reader.sheet_count() > 1 {
            debug!(
                file = %self.workbook_name(),
                sheets = reader.sheet_count(),
                "only the first worksheet is converted"
            );
        }
        let sheet = reader.first_sheet()?;

        let Some(document) = self.render(&sheet)? else {
            info!(file = %self.workbook_name(), "no translation keys found, nothing written");
            return Ok(ConvertOutcome::NoKeys);
        };

        let output = self.output_path(target_dir);
        fs::write(&output, document.to_bytes()).map_err(|source| ImpexError::Write {
            path: output.clone(),
            source,
        })?;

        let entries = document.body().len();
        info!(file = %self.workbook_name(), output = %output.display(), entries, "impex written");
        Ok(ConvertOutcome::Written { output, entries })
    }

    /// Build the impex document for an already loaded sheet
    pub fn render(&self, sheet: &Sheet) -> ImpexResult<Option<ImpexDocument>> {
        let mut builder = TableBuilder::new(sheet).malformed_keys(self.options.malformed_keys);
        if let Some(flag) = &self.cancel {
            builder = builder.cancel_flag(flag);
        }
        let table = builder.build()?;

        let mismatches = table.column_mismatches();
        if let (Some(first), Some(&entry)) = (table.first(), mismatches.first()) {
            if self.options.strict_columns {
                return Err(ImpexError::InconsistentColumns {
                    key: entry.raw_key.clone(),
                    expected: column_labels(first),
                    found: column_labels(entry),
                });
            }
            for &entry in &mismatches {
                warn!(
                    file = %self.workbook_name(),
                    key = %entry.raw_key,
                    expected = ?column_labels(first),
                    found = ?column_labels(entry),
                    "language columns differ from header"
                );
            }
        }

        Ok(ImpexDocument::from_table(&table))
    }
}

fn column_labels(entry: &TranslationEntry) -> Vec<String> {
    entry.group.headers().map(|h| h.label.clone()).collect()
}
