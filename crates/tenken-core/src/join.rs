use std::collections::{HashMap, HashSet};

use crate::model::{Finding, JoinedRow, Notice, TicketRow};

/// Findings keyed by the declared document filename.
///
/// A filename may be registered only once. Later documents with the same
/// name are rejected and reported instead of replacing the earlier finding.
#[derive(Debug, Clone, Default)]
pub struct FindingIndex {
    findings: HashMap<String, Finding>,
    order: Vec<String>,
    duplicates: Vec<String>,
}

impl FindingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a finding. Returns false (and records the name) if the
    /// filename was already present.
    pub fn insert(&mut self, filename: &str, finding: Finding) -> bool {
        if self.findings.contains_key(filename) {
            tracing::warn!(document = filename, "duplicate document filename ignored");
            self.duplicates.push(filename.to_string());
            return false;
        }
        self.order.push(filename.to_string());
        self.findings.insert(filename.to_string(), finding);
        true
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.findings.contains_key(filename)
    }

    pub fn get(&self, filename: &str) -> Option<&Finding> {
        self.findings.get(filename)
    }

    /// Filenames that were submitted more than once, in submission order.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    /// Registered documents that no ticket row refers to, in insertion order.
    pub fn unmatched(&self, rows: &[TicketRow]) -> Vec<&str> {
        let referenced: HashSet<&str> = rows.iter().map(|r| r.target_file.as_str()).collect();
        self.order
            .iter()
            .map(String::as_str)
            .filter(|name| !referenced.contains(name))
            .collect()
    }

    /// Notices describing duplicate and orphaned documents.
    pub fn notices(&self, rows: &[TicketRow]) -> Vec<Notice> {
        let mut notices: Vec<Notice> = self
            .duplicates
            .iter()
            .map(|name| {
                Notice::warning(
                    Some(name),
                    "同名のファイルが複数あります。最初のファイルの結果のみ使用しました",
                )
            })
            .collect();

        notices.extend(self.unmatched(rows).into_iter().map(|name| {
            Notice::warning(Some(name), "どのチケットにも対応しないファイルです")
        }));

        notices
    }
}

/// Attach findings to ticket rows by exact filename.
///
/// Every row appears exactly once, in input order. Rows without a matching
/// document receive the unknown finding.
pub fn join(rows: &[TicketRow], index: &FindingIndex) -> Vec<JoinedRow> {
    rows.iter()
        .map(|ticket| JoinedRow {
            ticket: ticket.clone(),
            finding: index
                .get(&ticket.target_file)
                .cloned()
                .unwrap_or_else(Finding::unknown),
        })
        .collect()
}
