//! Impex Forge - localization spreadsheets to LocalizationEntry impex
//!
//! Each spreadsheet holds one translation key per row and one language per
//! column, with row 0 naming the languages. This library finds the genuine
//! key rows among headers, comments and translated text, groups their values
//! by language and renders an impex header/body block.
//!
//! # Features
//!
//! - Key detection by pattern (ASCII, dotted, not capitalized)
//! - Key cleanup and language code mapping (`gr` → `el`, `cz` → `cs`, `default` → `en`)
//! - Single-file conversion and concurrent batch conversion of a directory
//! - Per-file failure isolation with a per-file time limit
//!
//! # Example
//!
//! ```
//! use impex_forge::core::{ImpexDocument, TableBuilder};
//! use impex_forge::types::Sheet;
//!
//! let sheet = Sheet::from_text_rows([
//!     vec!["key", "GR", "fr"],
//!     vec!["cart.empty", "Άδειο", "Vide"],
//! ]);
//! let table = TableBuilder::new(&sheet).build()?;
//! let doc = ImpexDocument::from_table(&table).expect("one key row");
//!
//! assert_eq!(doc.body()[0], ";cart.empty;Άδειο;Vide");
//! # Ok::<(), impex_forge::error::ImpexError>(())
//! ```

pub mod batch;
pub mod cli;
pub mod config;
pub mod converter;
pub mod core;
pub mod error;
pub mod excel;
pub mod types;

// Re-export commonly used types
pub use batch::{BatchConverter, BatchReport, FileReport};
pub use config::{ImpexConfig, MalformedKeyPolicy};
pub use converter::{ConvertOptions, ConvertOutcome, FileConverter};
pub use error::{ImpexError, ImpexResult};
pub use types::{Cell, CellPosition, CellValue, Row, Sheet};
