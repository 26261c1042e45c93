//! Spreadsheet access
//!
//! Opens workbooks with calamine and exposes the first worksheet as a
//! [`Sheet`](crate::types::Sheet) grid for the converter.

mod reader;

pub use reader::{range_to_sheet, WorkbookReader};
