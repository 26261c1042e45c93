//! Workbook reader - spreadsheet file → [`Sheet`] grid

use crate::error::{ImpexError, ImpexResult};
use crate::types::{Cell, CellValue, Sheet};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Opened workbook. Only the first worksheet is ever converted.
pub struct WorkbookReader {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
}

impl WorkbookReader {
    /// Open a workbook, detecting the format from its extension
    pub fn open<P: AsRef<Path>>(path: P) -> ImpexResult<Self> {
        let path = path.as_ref().to_path_buf();
        let workbook = open_workbook_auto(&path).map_err(|e| ImpexError::Workbook {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(Self { path, workbook })
    }

    pub fn sheet_count(&self) -> usize {
        self.workbook.sheet_names().len()
    }

    /// Read worksheet 0 into a grid
    pub fn first_sheet(&mut self) -> ImpexResult<Sheet> {
        let range = self
            .workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ImpexError::Workbook {
                path: self.path.clone(),
                message: "workbook has no worksheets".to_string(),
            })?
            .map_err(|e| ImpexError::Workbook {
                path: self.path.clone(),
                message: format!("failed to read first worksheet: {}", e),
            })?;

        Ok(range_to_sheet(&range))
    }
}

/// Convert a calamine range to a grid with absolute coordinates.
///
/// Calamine ranges begin at the first used cell, so positions are shifted by
/// the range start to keep row 0 as the sheet's real first row.
pub fn range_to_sheet(range: &Range<Data>) -> Sheet {
    let mut sheet = Sheet::new();
    let Some((start_row, start_col)) = range.start() else {
        return sheet;
    };

    for (row, col, data) in range.used_cells() {
        if let Some(value) = cell_value(data) {
            sheet.insert(Cell::new(
                start_row + row as u32,
                start_col + col as u32,
                value,
            ));
        }
    }
    sheet
}

fn cell_value(data: &Data) -> Option<CellValue> {
    match data {
        Data::Empty => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        other => Some(CellValue::Other(other.to_string())),
    }
}
