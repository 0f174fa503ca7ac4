pub mod html;

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::model::{HasIssue, JoinedRow, Notice, RemediationStatus, Report, ReportMeta, ReportSummary};

/// Ticket statuses that mark work as still under way.
const IN_PROGRESS_STATUSES: &[&str] = &["対応中", "作業中", "進行中", "in progress"];

/// Visual emphasis applied to a report row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowClass {
    Urgent,
    InProgress,
}

impl RowClass {
    pub fn css_class(&self) -> &'static str {
        match self {
            RowClass::Urgent => "urgent",
            RowClass::InProgress => "in-progress",
        }
    }
}

/// Rows with an issue are urgent; otherwise rows still being worked on
/// are marked in progress.
pub fn row_class(row: &JoinedRow) -> Option<RowClass> {
    if row.finding.has_issue == HasIssue::Yes {
        Some(RowClass::Urgent)
    } else if is_in_progress(row) {
        Some(RowClass::InProgress)
    } else {
        None
    }
}

pub fn is_in_progress(row: &JoinedRow) -> bool {
    if row.finding.remediation_status == RemediationStatus::InProgress {
        return true;
    }
    let status = row.ticket.status.to_lowercase();
    IN_PROGRESS_STATUSES.iter().any(|s| status.contains(s))
}

/// Aggregate counters over the joined rows.
pub fn summarize(rows: &[JoinedRow]) -> ReportSummary {
    let total_rows = rows.len();
    let issue_count = rows
        .iter()
        .filter(|r| r.finding.has_issue == HasIssue::Yes)
        .count();
    let company_count = rows
        .iter()
        .map(|r| r.ticket.company.trim())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .len();
    let in_progress_count = rows.iter().filter(|r| is_in_progress(r)).count();

    ReportSummary {
        total_rows,
        issue_count,
        issue_rate: issue_rate(issue_count, total_rows),
        company_count,
        in_progress_count,
    }
}

/// Percentage of `issues` over `total`, one decimal place; zero rows give 0.0.
pub fn issue_rate(issues: usize, total: usize) -> Decimal {
    let mut rate = if total == 0 {
        Decimal::ZERO
    } else {
        (Decimal::from(issues as u64) * Decimal::ONE_HUNDRED / Decimal::from(total as u64))
            .round_dp(1)
    };
    rate.rescale(1);
    rate
}

/// Assemble a report from joined rows.
pub fn build_report(meta: ReportMeta, rows: Vec<JoinedRow>, notices: Vec<Notice>) -> Report {
    let summary = summarize(&rows);
    Report {
        meta,
        summary,
        rows,
        notices,
    }
}

/// Machine-readable form of the report.
pub fn render_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Finding, TicketRow};
    use rust_decimal_macros::dec;

    fn row(company: &str, status: &str, has_issue: HasIssue) -> JoinedRow {
        JoinedRow {
            ticket: TicketRow {
                company: company.into(),
                status: status.into(),
                ..TicketRow::default()
            },
            finding: Finding {
                has_issue,
                ..Finding::default()
            },
        }
    }

    #[test]
    fn test_issue_rate_rounding() {
        assert_eq!(issue_rate(1, 3), dec!(33.3));
        assert_eq!(issue_rate(2, 3), dec!(66.7));
        assert_eq!(issue_rate(1, 2).to_string(), "50.0");
        assert_eq!(issue_rate(0, 0).to_string(), "0.0");
    }

    #[test]
    fn test_summarize_counts() {
        let rows = vec![
            row("山田設備", "実施済", HasIssue::Yes),
            row("山田設備", "対応中", HasIssue::No),
            row("佐藤電気", "", HasIssue::Unknown),
            row("", "", HasIssue::Yes),
        ];
        let s = summarize(&rows);
        assert_eq!(s.total_rows, 4);
        assert_eq!(s.issue_count, 2);
        assert_eq!(s.issue_rate, dec!(50.0));
        assert_eq!(s.company_count, 2);
        assert_eq!(s.in_progress_count, 1);
    }

    #[test]
    fn test_summarize_empty() {
        let s = summarize(&[]);
        assert_eq!(s.total_rows, 0);
        assert_eq!(s.issue_rate, Decimal::ZERO);
    }

    #[test]
    fn test_row_class() {
        assert_eq!(row_class(&row("", "実施済", HasIssue::Yes)), Some(RowClass::Urgent));
        assert_eq!(row_class(&row("", "対応中", HasIssue::Yes)), Some(RowClass::Urgent));
        assert_eq!(row_class(&row("", "作業中", HasIssue::No)), Some(RowClass::InProgress));
        assert_eq!(row_class(&row("", "実施済", HasIssue::No)), None);

        let mut r = row("", "", HasIssue::Unknown);
        r.finding.remediation_status = RemediationStatus::InProgress;
        assert_eq!(row_class(&r), Some(RowClass::InProgress));
    }
}
