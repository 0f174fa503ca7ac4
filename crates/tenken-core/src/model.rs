use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One maintenance/inspection task from the uploaded ticket sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRow {
    pub date: String,
    pub company: String,
    /// Declared filename of the inspection document; the join key.
    pub target_file: String,
    pub status: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HasIssue {
    Yes,
    No,
    #[default]
    Unknown,
}

impl HasIssue {
    pub fn label(&self) -> &'static str {
        match self {
            HasIssue::Yes => "指摘あり",
            HasIssue::No => "指摘なし",
            HasIssue::Unknown => "不明",
        }
    }
}

impl fmt::Display for HasIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemediationStatus {
    Done,
    InProgress,
    Planned,
    #[default]
    Unknown,
}

impl RemediationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RemediationStatus::Done => "対応済",
            RemediationStatus::InProgress => "対応中",
            RemediationStatus::Planned => "対応予定",
            RemediationStatus::Unknown => "不明",
        }
    }
}

impl fmt::Display for RemediationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Urgent,
    Important,
    Minor,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Urgent => write!(f, "緊急"),
            Severity::Important => write!(f, "重要"),
            Severity::Minor => write!(f, "軽微"),
        }
    }
}

/// A single line-level observation from the keyword pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingItem {
    pub text: String,
    pub severity: Severity,
}

/// Which analysis path produced a finding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingSource {
    Ai {
        model: String,
    },
    Keyword,
    #[default]
    None,
}

impl fmt::Display for FindingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingSource::Ai { model } => write!(f, "AI ({model})"),
            FindingSource::Keyword => write!(f, "keyword"),
            FindingSource::None => write!(f, "-"),
        }
    }
}

/// Structured result of analyzing one inspection document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub has_issue: HasIssue,
    pub summary: String,
    pub remediation_status: RemediationStatus,
    #[serde(default)]
    pub source: FindingSource,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<FindingItem>,
}

impl Finding {
    /// Default for ticket rows with no matching document.
    pub fn unknown() -> Self {
        Finding::default()
    }

    /// Result for a document that produced no usable text.
    pub fn extraction_failed() -> Self {
        Finding {
            summary: "text extraction failed".into(),
            ..Finding::default()
        }
    }

    /// Unknown finding carrying an error description as its summary.
    pub fn error(message: impl Into<String>) -> Self {
        Finding {
            summary: message.into(),
            ..Finding::default()
        }
    }
}

/// A ticket row enriched with its matched finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedRow {
    #[serde(flatten)]
    pub ticket: TicketRow,
    pub finding: Finding,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Reporting period, free text (e.g. "2025年8月").
    pub month: String,
    pub property: String,
    #[serde(default)]
    pub client: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_rows: usize,
    pub issue_count: usize,
    /// Percentage of rows with an issue, one decimal place.
    pub issue_rate: Decimal,
    pub company_count: usize,
    pub in_progress_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeLevel::Info => write!(f, "info"),
            NoticeLevel::Warning => write!(f, "warning"),
            NoticeLevel::Error => write!(f, "error"),
        }
    }
}

/// A user-facing message produced while building a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    pub message: String,
}

impl Notice {
    pub fn info(document: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, document, message)
    }

    pub fn warning(document: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, document, message)
    }

    pub fn error(document: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, document, message)
    }

    fn new(level: NoticeLevel, document: Option<&str>, message: impl Into<String>) -> Self {
        Notice {
            level,
            document: document.map(str::to_string),
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.document {
            Some(doc) => write!(f, "[{}] {}: {}", self.level, doc, self.message),
            None => write!(f, "[{}] {}", self.level, self.message),
        }
    }
}

/// An uploaded inspection document.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// The fully assembled report, ready to render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub summary: ReportSummary,
    pub rows: Vec<JoinedRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,
}
