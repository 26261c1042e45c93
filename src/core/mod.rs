//! Core conversion logic: key classification, rectification, grouping and
//! impex rendering. Pure functions over a [`Sheet`](crate::types::Sheet); no I/O.

pub mod classify;
pub mod document;
pub mod rectify;
pub mod table;

pub use classify::{is_key_cell, is_translation_key};
pub use document::{ImpexDocument, IMPEX_HEADER_PREFIX};
pub use rectify::{escape_value, language_field, rectify_key, rectify_language};
pub use table::{
    LanguageColumn, LanguageHeader, TableBuilder, TranslationEntry, TranslationGroup,
    TranslationTable,
};
