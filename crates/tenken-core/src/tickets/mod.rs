pub mod delimited;
pub mod header;
pub mod spreadsheet;

use crate::error::TenkenError;
use crate::model::{Notice, TicketRow};
use header::{map_columns, Column, ColumnMap};
use serde::Serialize;
use std::path::Path;

/// Tabular input formats accepted for the ticket sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Workbook,
}

impl TableFormat {
    /// Determine the format from a file name's extension.
    pub fn from_filename(name: &str) -> Result<TableFormat, TenkenError> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" | "txt" => Ok(TableFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(TableFormat::Workbook),
            _ => Err(TenkenError::UnsupportedFormat(name.to_string())),
        }
    }

    pub fn from_path(path: &Path) -> Result<TableFormat, TenkenError> {
        Self::from_filename(&path.to_string_lossy())
    }
}

/// Ticket rows loaded from a sheet, plus anything odd noticed while loading.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TicketSheet {
    pub rows: Vec<TicketRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Notice>,
}

/// Load a ticket file from disk, picking the format from its extension.
pub fn load_tickets_file(path: &Path) -> Result<TicketSheet, TenkenError> {
    let format = TableFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    load_tickets(&bytes, format)
}

/// Parse ticket rows from raw file bytes.
pub fn load_tickets(bytes: &[u8], format: TableFormat) -> Result<TicketSheet, TenkenError> {
    let cells = match format {
        TableFormat::Csv => delimited::read_csv(bytes)?,
        TableFormat::Workbook => spreadsheet::read_workbook(bytes)?,
    };
    rows_to_tickets(&cells)
}

/// Convert raw cells (header row first) into ticket rows.
pub fn rows_to_tickets(cells: &[Vec<String>]) -> Result<TicketSheet, TenkenError> {
    let mut iter = cells.iter().skip_while(|row| is_blank(row));
    let header = iter
        .next()
        .ok_or_else(|| TenkenError::TicketParse("no header row found".into()))?;

    let map = map_columns(header);
    let mut warnings = Vec::new();

    for column in Column::ALL {
        if map.get(column).is_none() {
            if column.is_required() {
                return Err(TenkenError::MissingColumn(column.name().into()));
            }
            warnings.push(Notice::warning(
                None,
                format!("column '{}' not found; values left empty", column.name()),
            ));
        }
    }

    let mut rows = Vec::new();
    for (idx, raw) in iter.enumerate() {
        if is_blank(raw) {
            continue;
        }
        let row = build_row(raw, &map);
        if row.target_file.is_empty() {
            warnings.push(Notice::warning(
                None,
                format!("data row {} has no target file", idx + 1),
            ));
        }
        rows.push(row);
    }

    tracing::debug!(rows = rows.len(), warnings = warnings.len(), "loaded ticket sheet");

    Ok(TicketSheet { rows, warnings })
}

fn build_row(raw: &[String], map: &ColumnMap) -> TicketRow {
    let cell = |column: Column| -> String {
        map.get(column)
            .and_then(|idx| raw.get(idx))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    TicketRow {
        date: cell(Column::Date),
        company: cell(Column::Company),
        target_file: cell(Column::TargetFile),
        status: cell(Column::Status),
        notes: cell(Column::Notes),
    }
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}
