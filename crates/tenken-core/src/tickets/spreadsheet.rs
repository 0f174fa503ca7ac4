use std::io::Cursor;

use calamine::{Data, Reader};

use crate::error::TenkenError;

/// Read the first worksheet of an XLSX/XLS/ODS workbook into string cells.
pub fn read_workbook(bytes: &[u8]) -> Result<Vec<Vec<String>>, TenkenError> {
    let cursor = Cursor::new(bytes);
    let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
        .map_err(|e| TenkenError::TicketParse(format!("failed to open workbook: {e}")))?;

    let sheet = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TenkenError::TicketParse("workbook has no worksheets".into()))?
        .map_err(|e| TenkenError::TicketParse(format!("failed to read first worksheet: {e}")))?;

    Ok(sheet
        .rows()
        .map(|row| row.iter().map(cell_as_string).collect())
        .collect())
}

fn cell_as_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => naive.format("%Y-%m-%d").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) => s.split('T').next().unwrap_or(s).to_string(),
        Data::Empty => String::new(),
        _ => format!("{cell}"),
    }
}
