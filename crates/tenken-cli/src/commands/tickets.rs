use std::path::PathBuf;
use tenken_core::error::TenkenError;
use tenken_core::tickets::load_tickets_file;

use crate::output;

pub fn run(input_file: PathBuf, output_format: &str) -> Result<(), TenkenError> {
    let sheet = load_tickets_file(&input_file)?;

    match output_format {
        "json" => output::json::print(&sheet)?,
        _ => output::table::print_tickets(&sheet.rows),
    }

    for w in &sheet.warnings {
        eprintln!("  warning: {}", w.message);
    }

    Ok(())
}
