//! Reading the uploaded statement into [`LineItem`]s.
//!
//! The sheet must have exactly three columns, mapped by position to label,
//! prior-year value and current-year value. The first row is a header and its
//! text is ignored. Values that are not numbers (blanks, text, error cells)
//! are read as zero.

use crate::error::{AnalysisError, Result};
use crate::schema::LineItem;
use calamine::{open_workbook_auto, Data, Reader};
use log::{debug, info};
use std::io::Read;
use std::path::Path;

pub const EXPECTED_COLUMNS: usize = 3;

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// A cell as handed over by a spreadsheet backend, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    fn as_label(&self) -> String {
        match self {
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Empty => String::new(),
        }
    }

    fn as_value(&self) -> f64 {
        match self {
            Cell::Number(n) if n.is_finite() => *n,
            Cell::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::String(s) => Cell::Text(s.clone()),
            Data::Empty => Cell::Empty,
            other => Cell::Text(other.to_string()),
        }
    }
}

/// Reads a statement from disk, choosing the backend by file extension.
pub fn read_statement(path: &Path) -> Result<Vec<LineItem>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    info!("Reading statement from {}", path.display());

    if extension == "csv" {
        let file = std::fs::File::open(path)?;
        read_csv(file)
    } else if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        read_workbook(path)
    } else {
        Err(AnalysisError::UnsupportedFormat(format!(
            "'{}' (expected .xlsx, .xls or .csv)",
            path.display()
        )))
    }
}

/// Reads the first worksheet of a workbook.
pub fn read_workbook(path: &Path) -> Result<Vec<LineItem>> {
    let mut workbook = open_workbook_auto(path)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AnalysisError::Spreadsheet("Workbook contains no worksheets".to_string()))??;

    let (height, width) = range.get_size();
    debug!("First worksheet is {} x {}", height, width);

    let grid = range
        .rows()
        .map(|row| row.iter().map(Cell::from).collect())
        .collect();

    rows_from_grid(grid)
}

/// Reads comma-separated text.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<LineItem>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut grid = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        grid.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    rows_from_grid(grid)
}

/// Maps a header-first grid of cells onto line items.
pub fn rows_from_grid(grid: Vec<Vec<Cell>>) -> Result<Vec<LineItem>> {
    let mut rows = grid.into_iter();

    let header = rows
        .next()
        .ok_or_else(|| AnalysisError::Spreadsheet("The sheet is empty".to_string()))?;

    if header.len() != EXPECTED_COLUMNS {
        return Err(AnalysisError::DataShape(format!(
            "Expected exactly {} columns (label, prior year, current year), found {}",
            EXPECTED_COLUMNS,
            header.len()
        )));
    }

    let mut items = Vec::new();
    for (idx, row) in rows.enumerate() {
        if row.len() > EXPECTED_COLUMNS {
            return Err(AnalysisError::DataShape(format!(
                "Row {} has {} columns, expected {}",
                idx + 2,
                row.len(),
                EXPECTED_COLUMNS
            )));
        }

        let cell = |i: usize| row.get(i).cloned().unwrap_or(Cell::Empty);
        items.push(LineItem {
            label: cell(0).as_label(),
            prior_value: cell(1).as_value(),
            current_value: cell(2).as_value(),
        });
    }

    debug!("Parsed {} line items", items.len());
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_header_is_skipped_and_columns_are_positional() {
        let grid = vec![
            vec![text("Item"), text("2023"), text("2024")],
            vec![text("Cash"), Cell::Number(10.0), Cell::Number(12.5)],
        ];
        let items = rows_from_grid(grid).unwrap();
        assert_eq!(items, vec![LineItem::new("Cash", 10.0, 12.5)]);
    }

    #[test]
    fn test_non_numeric_values_become_zero() {
        let grid = vec![
            vec![text("a"), text("b"), text("c")],
            vec![text("Cash"), text(" 42 "), text("n/a")],
            vec![text("Debt"), Cell::Empty, text("1,000")],
            vec![text("Short")],
        ];
        let items = rows_from_grid(grid).unwrap();
        assert_eq!(items[0].prior_value, 42.0);
        assert_eq!(items[0].current_value, 0.0);
        assert_eq!(items[1].prior_value, 0.0);
        assert_eq!(items[1].current_value, 0.0);
        assert_eq!(items[2], LineItem::new("Short", 0.0, 0.0));
    }

    #[test]
    fn test_wrong_column_count_is_data_shape_error() {
        let grid = vec![vec![text("a"), text("b")]];
        assert!(matches!(
            rows_from_grid(grid),
            Err(AnalysisError::DataShape(_))
        ));
    }

    #[test]
    fn test_empty_sheet_is_spreadsheet_error() {
        assert!(matches!(
            rows_from_grid(Vec::new()),
            Err(AnalysisError::Spreadsheet(_))
        ));
    }

    #[test]
    fn test_read_csv() {
        let data = "Chỉ tiêu,Năm trước,Năm sau\nTỔNG CỘNG TÀI SẢN,1000,1200\nNỢ NGẮN HẠN,200,\n";
        let items = read_csv(data.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], LineItem::new("TỔNG CỘNG TÀI SẢN", 1000.0, 1200.0));
        assert_eq!(items[1].current_value, 0.0);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = read_statement(Path::new("statement.pdf")).unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedFormat(_)));
    }
}
