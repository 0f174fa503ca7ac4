use std::fmt::Write;

use chrono::{DateTime, Local};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::model::{NoticeLevel, Report};
use crate::report::row_class;

const STYLE: &str = r#"
body { font-family: "Hiragino Kaku Gothic ProN", "Noto Sans JP", Meiryo, sans-serif; margin: 0; padding: 24px; background: #f5f6f8; color: #222; }
.container { max-width: 1200px; margin: 0 auto; background: #fff; padding: 32px; border-radius: 8px; box-shadow: 0 1px 4px rgba(0,0,0,.08); }
header { border-bottom: 3px solid #2c5282; margin-bottom: 24px; padding-bottom: 12px; }
h1 { font-size: 24px; margin: 0 0 8px; color: #2c5282; }
h2 { font-size: 18px; margin: 28px 0 12px; color: #2c5282; }
.meta { color: #555; font-size: 14px; }
.cards { display: flex; gap: 16px; flex-wrap: wrap; }
.card { flex: 1 1 160px; background: #ebf4ff; border-radius: 6px; padding: 16px; text-align: center; }
.card .label { font-size: 13px; color: #4a5568; }
.card .value { font-size: 28px; font-weight: bold; color: #2c5282; }
.card.alert { background: #fff5f5; }
.card.alert .value { color: #c53030; }
.notices { background: #fffbea; border-left: 4px solid #d69e2e; padding: 8px 16px; font-size: 13px; }
.notices li.error { color: #c53030; }
table { width: 100%; border-collapse: collapse; font-size: 13px; }
th, td { border: 1px solid #cbd5e0; padding: 6px 8px; text-align: left; vertical-align: top; }
th { background: #2c5282; color: #fff; }
tr.urgent td { background: #fed7d7; }
tr.in-progress td { background: #fefcbf; }
footer { margin-top: 24px; font-size: 12px; color: #718096; text-align: right; }
"#;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render a report as a self-contained HTML document.
///
/// Output depends only on `report` and `generated_at`.
pub fn render_html(report: &Report, generated_at: &DateTime<Local>) -> String {
    let mut out = String::with_capacity(8 * 1024 + report.rows.len() * 512);
    let meta = &report.meta;
    let title = format!("{} 月次報告書 {}", meta.property, meta.month);

    out.push_str("<!DOCTYPE html>\n<html lang=\"ja\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", text(title.trim()));
    let _ = writeln!(out, "<style>{STYLE}</style>\n</head>\n<body>\n<div class=\"container\">");

    // Header
    out.push_str("<header>\n");
    let _ = writeln!(out, "<h1>{}</h1>", text(title.trim()));
    out.push_str("<div class=\"meta\">");
    if !meta.client.is_empty() {
        let _ = write!(out, "{} 御中 / ", text(&meta.client));
    }
    let _ = write!(
        out,
        "物件: {} / 対象月: {}",
        text(&meta.property),
        text(&meta.month)
    );
    out.push_str("</div>\n</header>\n");

    // Summary cards
    let s = &report.summary;
    out.push_str("<section>\n<h2>サマリー</h2>\n<div class=\"cards\">\n");
    card(&mut out, "点検件数", &s.total_rows.to_string(), false);
    card(&mut out, "指摘件数", &s.issue_count.to_string(), s.issue_count > 0);
    card(&mut out, "指摘率", &format!("{}%", s.issue_rate), s.issue_count > 0);
    card(&mut out, "協力会社数", &s.company_count.to_string(), false);
    card(&mut out, "対応中", &s.in_progress_count.to_string(), false);
    out.push_str("</div>\n</section>\n");

    // Notices
    if !report.notices.is_empty() {
        out.push_str("<section>\n<h2>処理メッセージ</h2>\n<ul class=\"notices\">\n");
        for notice in &report.notices {
            let class = match notice.level {
                NoticeLevel::Info => "info",
                NoticeLevel::Warning => "warning",
                NoticeLevel::Error => "error",
            };
            let _ = write!(out, "<li class=\"{class}\">");
            if let Some(doc) = &notice.document {
                let _ = write!(out, "{}: ", text(doc));
            }
            let _ = writeln!(out, "{}</li>", text(&notice.message));
        }
        out.push_str("</ul>\n</section>\n");
    }

    // Row listing
    out.push_str("<section>\n<h2>点検結果一覧</h2>\n<table>\n<thead>\n<tr>");
    for heading in [
        "No.",
        "日付",
        "会社名",
        "対象ファイル",
        "ステータス",
        "指摘",
        "指摘内容",
        "是正状況",
        "判定",
        "備考",
    ] {
        let _ = write!(out, "<th>{heading}</th>");
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for (idx, row) in report.rows.iter().enumerate() {
        match row_class(row) {
            Some(class) => {
                let _ = write!(out, "<tr class=\"{}\">", attr(class.css_class()));
            }
            None => out.push_str("<tr>"),
        }
        let t = &row.ticket;
        let f = &row.finding;
        let _ = writeln!(
            out,
            "<td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            idx + 1,
            text(&t.date),
            text(&t.company),
            text(&t.target_file),
            text(&t.status),
            f.has_issue.label(),
            text(&f.summary),
            f.remediation_status.label(),
            text(&f.source.to_string()),
            text(&t.notes),
        );
    }

    out.push_str("</tbody>\n</table>\n</section>\n");

    let _ = writeln!(
        out,
        "<footer>作成日時: {}</footer>",
        generated_at.format(TIMESTAMP_FORMAT)
    );
    out.push_str("</div>\n</body>\n</html>\n");
    out
}

fn card(out: &mut String, label: &str, value: &str, alert: bool) {
    let class = if alert { "card alert" } else { "card" };
    let _ = writeln!(
        out,
        "<div class=\"{class}\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
        text(label),
        text(value)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Finding, HasIssue, JoinedRow, Notice, ReportMeta, TicketRow};
    use crate::report::build_report;
    use chrono::TimeZone;

    fn meta() -> ReportMeta {
        ReportMeta {
            month: "2025年8月".into(),
            property: "グリーンオーク茅場町".into(),
            client: "テスト管理組合".into(),
        }
    }

    fn joined(file: &str, status: &str, has_issue: HasIssue, summary: &str) -> JoinedRow {
        JoinedRow {
            ticket: TicketRow {
                date: "2025-08-01".into(),
                company: "山田設備".into(),
                target_file: file.into(),
                status: status.into(),
                notes: String::new(),
            },
            finding: Finding {
                has_issue,
                summary: summary.into(),
                ..Finding::default()
            },
        }
    }

    fn at(hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 9, 1, hour, 0, 0).unwrap()
    }

    fn tbody(html: &str) -> &str {
        let start = html.find("<tbody>").unwrap();
        let end = html.find("</tbody>").unwrap();
        &html[start..end]
    }

    #[test]
    fn test_one_row_per_joined_row_in_order() {
        let rows = vec![
            joined("c.pdf", "実施済", HasIssue::No, "特記事項なし"),
            joined("a.pdf", "実施済", HasIssue::Yes, "配管から漏水"),
            joined("b.pdf", "対応中", HasIssue::Unknown, ""),
        ];
        let html = render_html(&build_report(meta(), rows, vec![]), &at(9));
        let body = tbody(&html);

        assert_eq!(body.matches("<tr").count(), 3);
        let c = body.find("c.pdf").unwrap();
        let a = body.find("a.pdf").unwrap();
        let b = body.find("b.pdf").unwrap();
        assert!(c < a && a < b);
    }

    #[test]
    fn test_urgent_row_rendering() {
        let rows = vec![joined("a.pdf", "実施済", HasIssue::Yes, "配管から漏水")];
        let html = render_html(&build_report(meta(), rows, vec![]), &at(9));
        let body = tbody(&html);

        assert!(body.contains("<tr class=\"urgent\">"));
        assert!(body.contains("<td>実施済</td>"));
        assert!(body.contains("<td>指摘あり</td>"));
        assert!(body.contains("<td>配管から漏水</td>"));
    }

    #[test]
    fn test_in_progress_row_rendering() {
        let rows = vec![joined("b.pdf", "対応中", HasIssue::No, "")];
        let html = render_html(&build_report(meta(), rows, vec![]), &at(9));
        assert!(tbody(&html).contains("<tr class=\"in-progress\">"));
    }

    #[test]
    fn test_text_is_escaped() {
        let rows = vec![joined("<x>.pdf", "", HasIssue::No, "a & b <script>")];
        let html = render_html(&build_report(meta(), rows, vec![]), &at(9));
        assert!(html.contains("a &amp; b &lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_only_timestamp_differs_between_renders() {
        let report = build_report(
            meta(),
            vec![joined("a.pdf", "実施済", HasIssue::Yes, "漏水")],
            vec![Notice::warning(Some("z.pdf"), "unmatched")],
        );
        let first = render_html(&report, &at(9));
        let again = render_html(&report, &at(9));
        let later = render_html(&report, &at(10));

        assert_eq!(first, again);
        assert_ne!(first, later);
        assert_eq!(
            first.replace("2025-09-01 09:00", "TS"),
            later.replace("2025-09-01 10:00", "TS")
        );
    }

    #[test]
    fn test_summary_cards_and_header() {
        let rows = vec![
            joined("a.pdf", "実施済", HasIssue::Yes, "漏水"),
            joined("b.pdf", "実施済", HasIssue::No, ""),
            joined("c.pdf", "実施済", HasIssue::No, ""),
        ];
        let html = render_html(&build_report(meta(), rows, vec![]), &at(9));
        assert!(html.contains("33.3%"));
        assert!(html.contains("テスト管理組合 御中"));
        assert!(html.contains("<title>グリーンオーク茅場町 月次報告書 2025年8月</title>"));
        assert!(!html.contains("処理メッセージ"));
    }
}
