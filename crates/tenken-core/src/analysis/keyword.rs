use crate::analysis::{Analysis, FindingAnalyzer};
use crate::error::TenkenError;
use crate::lexicon::schema::KeywordLexicon;
use crate::model::{Finding, FindingItem, FindingSource, HasIssue, RemediationStatus, Severity};

/// Maximum number of items quoted in a keyword summary.
const SUMMARY_ITEMS: usize = 3;
/// Maximum characters per quoted item.
const SUMMARY_ITEM_CHARS: usize = 60;

pub const NO_FINDINGS_SUMMARY: &str = "特記事項なし";

/// Line-level hits from a keyword pass, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordScan {
    pub urgent_items: Vec<FindingItem>,
    pub issues: Vec<FindingItem>,
}

impl KeywordScan {
    pub fn is_empty(&self) -> bool {
        self.urgent_items.is_empty() && self.issues.is_empty()
    }
}

/// Deterministic rule-based analyzer used when no API credential is set,
/// and as the fallback when the AI service cannot be reached.
pub struct KeywordAnalyzer {
    lexicon: KeywordLexicon,
}

impl KeywordAnalyzer {
    pub fn new(lexicon: KeywordLexicon) -> Self {
        KeywordAnalyzer { lexicon }
    }

    /// Scan each non-empty line for urgent and attention keywords.
    ///
    /// A line with an urgent keyword is an urgent item. A line with an
    /// attention keyword is an issue, `Important` when it also carries an
    /// urgent keyword and `Minor` otherwise. One line can produce both.
    pub fn scan(&self, text: &str) -> KeywordScan {
        let mut scan = KeywordScan::default();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let urgent = contains_any(line, &self.lexicon.urgent);
            if urgent {
                scan.urgent_items.push(FindingItem {
                    text: line.to_string(),
                    severity: Severity::Urgent,
                });
            }

            if contains_any(line, &self.lexicon.attention) {
                scan.issues.push(FindingItem {
                    text: line.to_string(),
                    severity: if urgent {
                        Severity::Important
                    } else {
                        Severity::Minor
                    },
                });
            }
        }

        scan
    }

    /// Infer remediation progress from the whole text.
    pub fn remediation(&self, text: &str) -> RemediationStatus {
        let kw = &self.lexicon.remediation;
        if contains_any(text, &kw.done) {
            RemediationStatus::Done
        } else if contains_any(text, &kw.in_progress) {
            RemediationStatus::InProgress
        } else if contains_any(text, &kw.planned) {
            RemediationStatus::Planned
        } else {
            RemediationStatus::Unknown
        }
    }

    /// Reduce a text to a finding.
    pub fn classify(&self, text: &str) -> Finding {
        let scan = self.scan(text);
        let has_issue = if scan.is_empty() {
            HasIssue::No
        } else {
            HasIssue::Yes
        };
        let summary = summarize(&scan);

        let mut items = scan.urgent_items;
        items.extend(scan.issues);

        Finding {
            has_issue,
            summary,
            remediation_status: self.remediation(text),
            source: FindingSource::Keyword,
            items,
        }
    }
}

impl FindingAnalyzer for KeywordAnalyzer {
    fn analyze(&self, _filename: &str, text: &str) -> Result<Analysis, TenkenError> {
        Ok(Analysis::new(self.classify(text)))
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| haystack.contains(k.as_str()))
}

/// Urgent items first, then issues, without repeating a line.
fn summarize(scan: &KeywordScan) -> String {
    if scan.is_empty() {
        return NO_FINDINGS_SUMMARY.to_string();
    }

    let mut picked: Vec<&str> = Vec::new();
    for item in scan.urgent_items.iter().chain(scan.issues.iter()) {
        if picked.len() == SUMMARY_ITEMS {
            break;
        }
        if !picked.contains(&item.text.as_str()) {
            picked.push(&item.text);
        }
    }

    picked
        .iter()
        .map(|t| clip(t, SUMMARY_ITEM_CHARS))
        .collect::<Vec<_>>()
        .join(" / ")
}

fn clip(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::builtin::default_lexicon;

    fn analyzer() -> KeywordAnalyzer {
        KeywordAnalyzer::new(default_lexicon().unwrap())
    }

    #[test]
    fn test_scan_urgent_and_attention() {
        let text = "1. 配管から漏水あり\n\n2. 外壁に劣化\n3. 給水管の腐食による漏水\n4. 異常なし";
        let scan = analyzer().scan(text);

        assert_eq!(scan.urgent_items.len(), 2);
        assert_eq!(scan.urgent_items[0].text, "1. 配管から漏水あり");

        assert_eq!(scan.issues.len(), 2);
        assert_eq!(scan.issues[0].text, "2. 外壁に劣化");
        assert_eq!(scan.issues[0].severity, Severity::Minor);
        assert_eq!(scan.issues[1].severity, Severity::Important);
    }

    #[test]
    fn test_classify_clean_document() {
        let f = analyzer().classify("定期点検を実施しました。\n各設備正常。");
        assert_eq!(f.has_issue, HasIssue::No);
        assert_eq!(f.summary, NO_FINDINGS_SUMMARY);
        assert_eq!(f.remediation_status, RemediationStatus::Unknown);
        assert_eq!(f.source, FindingSource::Keyword);
        assert!(f.items.is_empty());
    }

    #[test]
    fn test_classify_summary_urgent_first_and_deduplicated() {
        let text = "外壁に錆\n配管の腐食と漏水\nポンプ故障\n天井にひび";
        let f = analyzer().classify(text);
        assert_eq!(f.has_issue, HasIssue::Yes);
        // urgent: line2, line3; issues: line1, line2 (dup), line4
        assert_eq!(f.summary, "配管の腐食と漏水 / ポンプ故障 / 外壁に錆");
        assert_eq!(f.items.len(), 5);
    }

    #[test]
    fn test_remediation_priority() {
        let a = analyzer();
        assert_eq!(a.remediation("修理済。次回確認予定"), RemediationStatus::Done);
        assert_eq!(a.remediation("部品手配中"), RemediationStatus::InProgress);
        assert_eq!(a.remediation("来月交換予定"), RemediationStatus::Planned);
        assert_eq!(a.remediation("記載なし"), RemediationStatus::Unknown);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let a = analyzer();
        let text = "排水ポンプ停止\n手すりにサビ\n対応中";
        assert_eq!(a.classify(text), a.classify(text));
    }

    #[test]
    fn test_long_lines_are_clipped() {
        let long = format!("漏水{}", "あ".repeat(100));
        let f = analyzer().classify(&long);
        assert_eq!(f.summary.chars().count(), SUMMARY_ITEM_CHARS + 1);
        assert!(f.summary.ends_with('…'));
    }
}
