use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

//==============================================================================
// Cells
//==============================================================================

/// Absolute 0-based position of a cell within a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPosition {
    pub row: u32,
    pub col: u32,
}

impl CellPosition {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}C{}", self.row + 1, self.col + 1)
    }
}

/// Typed cell content. Empty cells are never materialized.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Dates, durations, error cells: anything else, kept as display text
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub position: CellPosition,
    pub value: CellValue,
}

impl Cell {
    pub fn new(row: u32, col: u32, value: CellValue) -> Self {
        Self {
            position: CellPosition::new(row, col),
            value,
        }
    }

    pub fn text(row: u32, col: u32, value: impl Into<String>) -> Self {
        Self::new(row, col, CellValue::Text(value.into()))
    }

    pub fn row(&self) -> u32 {
        self.position.row
    }

    pub fn col(&self) -> u32 {
        self.position.col
    }

    /// String value, only for text cells
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Any cell kind rendered as a string
    pub fn display(&self) -> Cow<'_, str> {
        match &self.value {
            CellValue::Text(s) | CellValue::Other(s) => Cow::Borrowed(s),
            CellValue::Number(n) => Cow::Owned(n.to_string()),
            CellValue::Bool(b) => Cow::Owned(if *b { "TRUE" } else { "FALSE" }.to_string()),
        }
    }
}

//==============================================================================
// Rows and sheets
//==============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub index: u32,
    /// Cells in ascending column order
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            cells: Vec::new(),
        }
    }

    pub fn cell(&self, col: u32) -> Option<&Cell> {
        self.cells
            .binary_search_by_key(&col, Cell::col)
            .ok()
            .map(|idx| &self.cells[idx])
    }
}

/// Read-only grid view of one worksheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    rows: BTreeMap<u32, Row>,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sheet from rows of text, row 0 first. Empty strings leave the
    /// cell unset.
    pub fn from_text_rows<R, C, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sheet = Sheet::new();
        for (row_idx, row) in rows.into_iter().enumerate() {
            for (col_idx, value) in row.into_iter().enumerate() {
                let value = value.as_ref();
                if !value.is_empty() {
                    sheet.insert(Cell::text(row_idx as u32, col_idx as u32, value));
                }
            }
        }
        sheet
    }

    /// Insert a cell, replacing any cell already at that position
    pub fn insert(&mut self, cell: Cell) {
        let row = self
            .rows
            .entry(cell.row())
            .or_insert_with(|| Row::new(cell.row()));
        match row.cells.binary_search_by_key(&cell.col(), Cell::col) {
            Ok(idx) => row.cells[idx] = cell,
            Err(idx) => row.cells.insert(idx, cell),
        }
    }

    pub fn row(&self, index: u32) -> Option<&Row> {
        self.rows.get(&index)
    }

    /// The language header row
    pub fn header_row(&self) -> Option<&Row> {
        self.row(0)
    }

    /// Rows in ascending index order
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.values()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_rows_skips_empty() {
        let sheet = Sheet::from_text_rows([vec!["key", "", "fr"], vec!["", "a.b"]]);
        assert_eq!(sheet.row_count(), 2);
        let header = sheet.header_row().unwrap();
        assert_eq!(header.cells.len(), 2);
        assert_eq!(header.cell(2).and_then(Cell::as_text), Some("fr"));
        assert!(header.cell(1).is_none());
        assert_eq!(sheet.row(1).unwrap().cells[0].position, CellPosition::new(1, 1));
    }

    #[test]
    fn test_insert_keeps_column_order() {
        let mut sheet = Sheet::new();
        sheet.insert(Cell::text(3, 5, "e"));
        sheet.insert(Cell::text(3, 1, "a"));
        sheet.insert(Cell::text(3, 3, "c"));
        sheet.insert(Cell::text(3, 3, "C"));

        let row = sheet.row(3).unwrap();
        let values: Vec<_> = row.cells.iter().map(|c| c.display().into_owned()).collect();
        assert_eq!(values, vec!["a", "C", "e"]);
    }

    #[test]
    fn test_rows_iterate_in_index_order() {
        let mut sheet = Sheet::new();
        sheet.insert(Cell::text(7, 0, "x"));
        sheet.insert(Cell::text(2, 0, "y"));
        sheet.insert(Cell::text(0, 0, "z"));
        let order: Vec<u32> = sheet.rows().map(|r| r.index).collect();
        assert_eq!(order, vec![0, 2, 7]);
    }

    #[test]
    fn test_display_by_kind() {
        assert_eq!(Cell::new(0, 0, CellValue::Number(3.0)).display(), "3");
        assert_eq!(Cell::new(0, 0, CellValue::Number(2.5)).display(), "2.5");
        assert_eq!(Cell::new(0, 0, CellValue::Bool(true)).display(), "TRUE");
        assert!(Cell::new(0, 0, CellValue::Number(1.0)).as_text().is_none());
    }

    #[test]
    fn test_position_display_is_one_based() {
        assert_eq!(CellPosition::new(0, 2).to_string(), "R1C3");
    }
}
