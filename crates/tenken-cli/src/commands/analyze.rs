use std::path::PathBuf;
use tenken_core::analysis::{build_analyzer, extract_finding};
use tenken_core::error::TenkenError;
use tenken_core::extraction::pdftotext::PdftotextExtractor;

use super::AnalyzerArgs;
use crate::output;

pub fn run(
    input_file: PathBuf,
    analyzer_args: AnalyzerArgs,
    output_format: &str,
) -> Result<(), TenkenError> {
    let pdf_bytes = std::fs::read(&input_file)?;
    let filename = input_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let analyzer = build_analyzer(&analyzer_args.config(), analyzer_args.lexicon()?)?;
    let extractor = PdftotextExtractor::new();
    let analysis = extract_finding(&pdf_bytes, &filename, &extractor, analyzer.as_ref());

    match output_format {
        "json" => output::json::print(&analysis.finding)?,
        _ => output::table::print_finding(&filename, &analysis.finding),
    }

    for notice in &analysis.notices {
        eprintln!("  {notice}");
    }

    Ok(())
}
