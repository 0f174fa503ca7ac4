use chrono::Local;
use clap::ValueEnum;
use std::path::PathBuf;
use tenken_core::analysis::build_analyzer;
use tenken_core::delivery::report_filename;
use tenken_core::error::TenkenError;
use tenken_core::extraction::pdftotext::PdftotextExtractor;
use tenken_core::model::{Document, Notice, ReportMeta};
use tenken_core::report::{html::render_html, render_json};
use tenken_core::tickets::load_tickets_file;
use tenken_core::{generate_report, ReportRequest};

use super::AnalyzerArgs;

/// Rendering of a generated report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Html,
    Json,
}

pub struct GenerateArgs {
    pub tickets: PathBuf,
    pub docs: Vec<PathBuf>,
    pub month: String,
    pub property: String,
    pub client: String,
    pub analyzer: AnalyzerArgs,
    pub format: ReportFormat,
    pub out: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
}

pub fn run(args: GenerateArgs) -> Result<(), TenkenError> {
    let tickets = load_tickets_file(&args.tickets)?;
    let (documents, read_notices) = read_documents(&args.docs);

    let config = args.analyzer.config();
    if !config.uses_ai() {
        tracing::info!("no API key configured, using keyword analysis");
    }
    let analyzer = build_analyzer(&config, args.analyzer.lexicon()?)?;
    let extractor = PdftotextExtractor::new();

    let meta = ReportMeta {
        month: args.month,
        property: args.property,
        client: args.client,
    };
    let mut report = generate_report(
        ReportRequest {
            meta,
            tickets,
            documents,
        },
        &extractor,
        analyzer.as_ref(),
    );

    let mut notices = read_notices;
    notices.append(&mut report.notices);
    report.notices = notices;

    let rendered = match args.format {
        ReportFormat::Json => render_json(&report)?,
        ReportFormat::Html => render_html(&report, &Local::now()),
    };

    let target = match (args.out, args.out_dir) {
        (Some(path), _) => Some(path),
        (None, Some(dir)) => Some(dir.join(output_filename(&report.meta, args.format))),
        (None, None) => None,
    };

    for notice in &report.notices {
        eprintln!("  {notice}");
    }

    match target {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            eprintln!(
                "Report for {} row(s), {} with findings, written to {}",
                report.summary.total_rows,
                report.summary.issue_count,
                path.display()
            );
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

/// Read every document that can be read; unreadable paths become notices
/// so the rest of the report is still produced.
fn read_documents(paths: &[PathBuf]) -> (Vec<Document>, Vec<Notice>) {
    let mut documents = Vec::with_capacity(paths.len());
    let mut notices = Vec::new();

    for path in paths {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        match std::fs::read(path) {
            Ok(bytes) => documents.push(Document { filename, bytes }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "document could not be read");
                notices.push(Notice::error(
                    Some(&filename),
                    format!("ファイルを読み込めませんでした: {e}"),
                ));
            }
        }
    }

    (documents, notices)
}

fn output_filename(meta: &ReportMeta, format: ReportFormat) -> String {
    let name = report_filename(meta);
    match format {
        ReportFormat::Html => name,
        ReportFormat::Json => {
            let stem = name.strip_suffix(".html").unwrap_or(&name);
            format!("{stem}.json")
        }
    }
}
