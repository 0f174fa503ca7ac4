pub mod analysis;
pub mod config;
pub mod delivery;
pub mod error;
pub mod extraction;
pub mod join;
pub mod lexicon;
pub mod model;
pub mod report;
pub mod tickets;

use analysis::{extract_finding, FindingAnalyzer};
use extraction::PdfExtractor;
use join::FindingIndex;
use model::{Document, Notice, Report, ReportMeta};
use tickets::TicketSheet;

/// Everything needed to build one report.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub meta: ReportMeta,
    pub tickets: TicketSheet,
    pub documents: Vec<Document>,
}

/// Main API entry point: analyze every document, join the findings onto the
/// ticket rows and assemble the report.
///
/// Documents are processed one after another. A document that cannot be
/// read or analyzed contributes an unknown finding and a notice; it never
/// aborts the run.
pub fn generate_report(
    request: ReportRequest,
    extractor: &dyn PdfExtractor,
    analyzer: &dyn FindingAnalyzer,
) -> Report {
    let ReportRequest {
        meta,
        tickets,
        documents,
    } = request;

    tracing::info!(
        tickets = tickets.rows.len(),
        documents = documents.len(),
        analyzer = analyzer.name(),
        "generating report"
    );

    let mut notices: Vec<Notice> = tickets.warnings;
    let mut index = FindingIndex::new();

    for doc in &documents {
        // A blank name would match every ticket row whose target file is blank.
        if doc.filename.trim().is_empty() {
            tracing::warn!("document without a file name ignored");
            notices.push(Notice::warning(
                None,
                "ファイル名のない文書はチケットと照合できないため無視しました",
            ));
            continue;
        }
        if index.contains(&doc.filename) {
            // Recorded as a duplicate; the document is not analyzed.
            index.insert(&doc.filename, model::Finding::unknown());
            continue;
        }
        let mut analysis = extract_finding(&doc.bytes, &doc.filename, extractor, analyzer);
        notices.append(&mut analysis.notices);
        index.insert(&doc.filename, analysis.finding);
    }

    notices.extend(index.notices(&tickets.rows));

    let rows = join::join(&tickets.rows, &index);
    report::build_report(meta, rows, notices)
}
