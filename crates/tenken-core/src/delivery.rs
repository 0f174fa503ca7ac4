use crate::model::ReportMeta;

pub const FALLBACK_FILENAME: &str = "monthly_report.html";
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Deterministic download name for a report, e.g.
/// `月次報告書_グリーンオーク茅場町_2025年8月.html`.
///
/// Characters that are unsafe in file names become `_`; empty metadata
/// parts are skipped.
pub fn report_filename(meta: &ReportMeta) -> String {
    let parts: Vec<String> = [meta.property.as_str(), meta.month.as_str()]
        .iter()
        .map(|p| sanitize(p))
        .filter(|p| !p.is_empty())
        .collect();

    if parts.is_empty() {
        return FALLBACK_FILENAME.to_string();
    }

    format!("月次報告書_{}.html", parts.join("_"))
}

/// `Content-Disposition` value offering `filename` as an attachment.
///
/// Non-ASCII names go in the RFC 5987 `filename*` parameter with an ASCII
/// fallback for older clients.
pub fn content_disposition(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        urlencoding::encode(filename)
    )
}

fn sanitize(part: &str) -> String {
    let cleaned: String = part
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() || c.is_control() => '_',
            c => c,
        })
        .collect();
    cleaned.trim_matches(|c| c == '_' || c == '.').to_string()
}
