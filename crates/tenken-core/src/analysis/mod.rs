pub mod gemini;
pub mod keyword;
pub mod prompt;

use crate::config::AnalyzerConfig;
use crate::error::TenkenError;
use crate::extraction::{document_text, PdfExtractor};
use crate::lexicon::schema::KeywordLexicon;
use crate::model::{Finding, Notice};
use gemini::{AiAnalyzer, GeminiClient};
use keyword::KeywordAnalyzer;

/// A finding plus any messages the analyzer wants shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub finding: Finding,
    pub notices: Vec<Notice>,
}

impl Analysis {
    pub fn new(finding: Finding) -> Self {
        Analysis {
            finding,
            notices: Vec::new(),
        }
    }
}

/// Turns a document's extracted text into a finding.
pub trait FindingAnalyzer: Send + Sync {
    fn analyze(&self, filename: &str, text: &str) -> Result<Analysis, TenkenError>;

    /// Short backend label for logs.
    fn name(&self) -> &str;
}

/// Pick the analyzer for a configuration: AI-backed when a credential is
/// present, keyword rules otherwise.
pub fn build_analyzer(
    config: &AnalyzerConfig,
    lexicon: KeywordLexicon,
) -> Result<Box<dyn FindingAnalyzer>, TenkenError> {
    let keyword = KeywordAnalyzer::new(lexicon);
    match config.api_key.as_deref() {
        Some(key) => {
            let client = GeminiClient::from_config(config, key)?;
            Ok(Box::new(AiAnalyzer::new(
                client,
                config.models.clone(),
                config.text_budget,
                keyword,
            )))
        }
        None => Ok(Box::new(keyword)),
    }
}

/// Extract text from one document and analyze it.
///
/// Never fails: extraction problems, empty text and analyzer errors all
/// become an unknown finding with an explanatory notice. The analyzer is
/// not consulted when no text could be extracted.
pub fn extract_finding(
    pdf_bytes: &[u8],
    filename: &str,
    extractor: &dyn PdfExtractor,
    analyzer: &dyn FindingAnalyzer,
) -> Analysis {
    let pages = match extractor.extract_pages(pdf_bytes) {
        Ok(pages) => pages,
        Err(e) => {
            tracing::warn!(document = filename, backend = extractor.backend_name(), error = %e, "text extraction failed");
            return Analysis {
                finding: Finding::extraction_failed(),
                notices: vec![Notice::error(
                    Some(filename),
                    format!("テキスト抽出に失敗しました: {e}"),
                )],
            };
        }
    };

    let text = document_text(&pages);
    if text.is_empty() {
        tracing::warn!(document = filename, "no text extracted");
        return Analysis {
            finding: Finding::extraction_failed(),
            notices: vec![Notice::warning(
                Some(filename),
                "テキストを抽出できませんでした（画像PDFの可能性があります）",
            )],
        };
    }

    match analyzer.analyze(filename, &text) {
        Ok(analysis) => {
            tracing::info!(
                document = filename,
                analyzer = analyzer.name(),
                has_issue = ?analysis.finding.has_issue,
                "document analyzed"
            );
            analysis
        }
        Err(e) => {
            tracing::error!(document = filename, analyzer = analyzer.name(), error = %e, "analysis failed");
            Analysis {
                finding: Finding::error(format!("analysis failed: {e}")),
                notices: vec![Notice::error(Some(filename), format!("分析に失敗しました: {e}"))],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::PageContent;
    use crate::lexicon::builtin::default_lexicon;
    use crate::model::HasIssue;

    struct FixedExtractor(Result<Vec<&'static str>, ()>);

    impl PdfExtractor for FixedExtractor {
        fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageContent>, TenkenError> {
            match &self.0 {
                Ok(lines) => Ok(vec![PageContent {
                    page_number: 1,
                    lines: lines.iter().map(|s| s.to_string()).collect(),
                }]),
                Err(()) => Err(TenkenError::PdftotextNotFound),
            }
        }

        fn backend_name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingAnalyzer;

    impl FindingAnalyzer for FailingAnalyzer {
        fn analyze(&self, _filename: &str, _text: &str) -> Result<Analysis, TenkenError> {
            Err(TenkenError::InvalidResponse("reply contained no text".into()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_extraction_error_becomes_unknown() {
        let analyzer = KeywordAnalyzer::new(default_lexicon().unwrap());
        let result = extract_finding(b"", "a.pdf", &FixedExtractor(Err(())), &analyzer);
        assert_eq!(result.finding, Finding::extraction_failed());
        assert_eq!(result.notices.len(), 1);
    }

    #[test]
    fn test_analyzer_error_becomes_unknown() {
        let extractor = FixedExtractor(Ok(vec!["配管から漏水"]));
        let result = extract_finding(b"", "a.pdf", &extractor, &FailingAnalyzer);
        assert_eq!(result.finding.has_issue, HasIssue::Unknown);
        assert!(result.finding.summary.contains("analysis failed"));
    }

    #[test]
    fn test_build_analyzer_selects_by_config() {
        let keyword = build_analyzer(&AnalyzerConfig::default(), default_lexicon().unwrap()).unwrap();
        assert_eq!(keyword.name(), "keyword");

        let cfg = AnalyzerConfig::with_api_key(Some("test-key".into()));
        let ai = build_analyzer(&cfg, default_lexicon().unwrap()).unwrap();
        assert_eq!(ai.name(), "ai");
    }
}
