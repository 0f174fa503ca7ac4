use crate::error::TenkenError;

/// Read a CSV ticket file into raw string cells.
///
/// Rows may have differing lengths; a leading UTF-8 BOM is ignored.
pub fn read_csv(bytes: &[u8]) -> Result<Vec<Vec<String>>, TenkenError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| match e.kind() {
            csv::ErrorKind::Utf8 { .. } => TenkenError::TicketParse(format!(
                "line {}: file is not valid UTF-8 (save the CSV as UTF-8)",
                idx + 1
            )),
            _ => TenkenError::TicketParse(format!("line {}: {e}", idx + 1)),
        })?;
        rows.push(record.iter().map(|c| c.trim().to_string()).collect());
    }

    Ok(rows)
}
