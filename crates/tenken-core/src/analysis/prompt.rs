use crate::error::TenkenError;
use crate::model::{Finding, FindingSource, HasIssue, RemediationStatus};
use serde::Deserialize;
use serde_json::{json, Value};

const SUMMARY_MAX_CHARS: usize = 200;

/// The only reply shape accepted from the model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FindingResponse {
    pub has_issue: HasIssue,
    pub summary: String,
    pub remediation_status: RemediationStatus,
}

impl FindingResponse {
    pub fn into_finding(self, model: &str) -> Finding {
        Finding {
            has_issue: self.has_issue,
            summary: clip(self.summary.trim(), SUMMARY_MAX_CHARS),
            remediation_status: self.remediation_status,
            source: FindingSource::Ai {
                model: model.to_string(),
            },
            items: Vec::new(),
        }
    }
}

/// JSON schema sent with the request so the service constrains its output.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "has_issue": {
                "type": "STRING",
                "enum": ["yes", "no", "unknown"]
            },
            "summary": { "type": "STRING" },
            "remediation_status": {
                "type": "STRING",
                "enum": ["done", "in_progress", "planned", "unknown"]
            }
        },
        "required": ["has_issue", "summary", "remediation_status"]
    })
}

/// Build the analysis prompt for one document.
///
/// `text` is cut to `budget` characters before embedding.
pub fn build_prompt(filename: &str, text: &str, budget: usize) -> String {
    let (excerpt, truncated) = truncate_chars(text, budget);
    let note = if truncated {
        "\n（本文は文字数上限のため途中で省略されています）"
    } else {
        ""
    };

    format!(
        "あなたは建物設備の点検報告書を読むアシスタントです。\n\
以下の報告書（ファイル名: {filename}）を読み、指摘事項の有無・要約・是正対応の状況を判定してください。\n\
\n\
出力は次のキーだけを持つJSONオブジェクトにしてください。\n\
- has_issue: 指摘事項があれば \"yes\"、なければ \"no\"、判断できなければ \"unknown\"\n\
- summary: 指摘内容の日本語要約（100文字以内、指摘がなければ \"特記事項なし\"）\n\
- remediation_status: \"done\"（対応済）/ \"in_progress\"（対応中）/ \"planned\"（対応予定）/ \"unknown\"\n\
\n\
--- 報告書本文 ---\n\
{excerpt}{note}\n\
--- 本文ここまで ---"
    )
}

/// Decode a model reply under the strict contract.
///
/// The reply must be exactly one JSON object with the three expected keys;
/// anything else is rejected rather than scanned for partial content.
pub fn parse_response(reply: &str) -> Result<FindingResponse, TenkenError> {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return Err(TenkenError::InvalidResponse("empty reply".into()));
    }
    serde_json::from_str(trimmed).map_err(|e| TenkenError::InvalidResponse(e.to_string()))
}

/// Cut `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    }
}

fn clip(text: &str, max_chars: usize) -> String {
    match truncate_chars(text, max_chars) {
        (head, true) => format!("{head}…"),
        (all, false) => all.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_conforming_reply() {
        let reply = r#"{"has_issue":"yes","summary":"配管から漏水","remediation_status":"in_progress"}"#;
        let resp = parse_response(reply).unwrap();
        assert_eq!(resp.has_issue, HasIssue::Yes);
        assert_eq!(resp.remediation_status, RemediationStatus::InProgress);

        let finding = resp.into_finding("gemini-2.5-flash");
        assert_eq!(finding.summary, "配管から漏水");
        assert_eq!(
            finding.source,
            FindingSource::Ai {
                model: "gemini-2.5-flash".into()
            }
        );
    }

    #[test]
    fn test_reject_line_prefixed_reply() {
        let reply = "指摘有無: 指摘あり\n要約: 配管から漏水\n対応状況: 対応中";
        assert!(matches!(
            parse_response(reply),
            Err(TenkenError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_reject_unknown_fields_and_values() {
        let extra = r#"{"has_issue":"no","summary":"","remediation_status":"done","confidence":0.9}"#;
        assert!(parse_response(extra).is_err());

        let bad_enum = r#"{"has_issue":"maybe","summary":"","remediation_status":"done"}"#;
        assert!(parse_response(bad_enum).is_err());

        let missing = r#"{"has_issue":"no","summary":""}"#;
        assert!(parse_response(missing).is_err());

        let fenced = "```json\n{\"has_issue\":\"no\",\"summary\":\"\",\"remediation_status\":\"done\"}\n```";
        assert!(parse_response(fenced).is_err());

        assert!(parse_response("  ").is_err());
    }

    #[test]
    fn test_prompt_truncates_to_budget() {
        let text = "あ".repeat(50);
        let prompt = build_prompt("a.pdf", &text, 10);
        assert!(prompt.contains(&"あ".repeat(10)));
        assert!(!prompt.contains(&"あ".repeat(11)));
        assert!(prompt.contains("省略"));
        assert!(prompt.contains("a.pdf"));

        let short = build_prompt("b.pdf", "短い本文", 10);
        assert!(!short.contains("省略"));
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("漏水あり", 2), ("漏水", true));
        assert_eq!(truncate_chars("漏水", 2), ("漏水", false));
        assert_eq!(truncate_chars("", 0), ("", false));
    }
}
