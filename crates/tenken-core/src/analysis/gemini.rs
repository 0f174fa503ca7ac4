use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::analysis::keyword::KeywordAnalyzer;
use crate::analysis::prompt::{build_prompt, parse_response, response_schema};
use crate::analysis::{Analysis, FindingAnalyzer};
use crate::config::AnalyzerConfig;
use crate::error::TenkenError;
use crate::model::{Finding, Notice};

/// Text-generation backend addressed by model name.
pub trait ModelClient: Send + Sync {
    /// Send `prompt` to `model` and return the raw reply text.
    fn generate(&self, model: &str, prompt: &str) -> Result<String, TenkenError>;
}

/// Blocking HTTP client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    endpoint: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(endpoint: &str, api_key: &str, timeout_secs: u64) -> Result<Self, TenkenError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| TenkenError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn from_config(config: &AnalyzerConfig, api_key: &str) -> Result<Self, TenkenError> {
        Self::new(&config.endpoint, api_key, config.timeout_secs)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl ModelClient for GeminiClient {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, TenkenError> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, model);
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        };

        tracing::debug!(model, prompt_chars = prompt.chars().count(), "Gemini request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    TenkenError::Network(format!(
                        "request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    TenkenError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(classify_failure(model, status.as_u16(), &body));
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| TenkenError::InvalidResponse(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .ok_or_else(|| TenkenError::InvalidResponse("reply contained no text".into()))
    }
}

/// Map an HTTP failure onto the error taxonomy.
///
/// The service reports retired or misspelled models either as 404 or as a
/// 400 whose message says the model is not found / not supported.
pub fn classify_failure(model: &str, status: u16, body: &str) -> TenkenError {
    let message = error_message(body);
    let lower = message.to_lowercase();
    let model_missing = lower.contains("not found") || lower.contains("not supported");

    match status {
        404 => TenkenError::ModelUnavailable {
            model: model.to_string(),
            message,
        },
        400 if model_missing => TenkenError::ModelUnavailable {
            model: model.to_string(),
            message,
        },
        401 | 403 => TenkenError::Authentication(message),
        400 if lower.contains("api key") => TenkenError::Authentication(message),
        429 => TenkenError::RateLimit(message),
        _ => TenkenError::Network(format!("HTTP {status}: {message}")),
    }
}

/// Human-readable part of an error body: `error.message` of a JSON error
/// envelope, otherwise the first non-empty line.
fn error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string));

    let message = match from_json {
        Some(m) => m,
        None => body
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("")
            .to_string(),
    };
    message.trim().chars().take(200).collect()
}

/// Analyzer that asks a language model, trying each configured model in turn.
///
/// Unavailable models fall through to the next one. Authentication, rate
/// limit and network failures hand the document to the keyword rules.
/// A reply that breaks the response contract yields an unknown finding.
pub struct AiAnalyzer<C: ModelClient> {
    client: C,
    models: Vec<String>,
    text_budget: usize,
    fallback: KeywordAnalyzer,
}

impl<C: ModelClient> AiAnalyzer<C> {
    pub fn new(client: C, models: Vec<String>, text_budget: usize, fallback: KeywordAnalyzer) -> Self {
        Self {
            client,
            models,
            text_budget,
            fallback,
        }
    }

    fn fall_back(
        &self,
        filename: &str,
        text: &str,
        reason: &str,
        mut notices: Vec<Notice>,
    ) -> Result<Analysis, TenkenError> {
        tracing::warn!(document = filename, reason, "AI analysis unavailable, using keyword rules");
        notices.push(Notice::info(
            Some(filename),
            format!("AI分析を利用できないためキーワード判定を使用しました ({reason})"),
        ));
        let mut analysis = self.fallback.analyze(filename, text)?;
        notices.append(&mut analysis.notices);
        analysis.notices = notices;
        Ok(analysis)
    }
}

impl<C: ModelClient> FindingAnalyzer for AiAnalyzer<C> {
    fn analyze(&self, filename: &str, text: &str) -> Result<Analysis, TenkenError> {
        let prompt = build_prompt(filename, text, self.text_budget);
        let mut notices = Vec::new();

        for model in &self.models {
            match self.client.generate(model, &prompt) {
                Ok(reply) => {
                    return match parse_response(&reply) {
                        Ok(resp) => {
                            tracing::debug!(document = filename, model = %model, "AI finding accepted");
                            Ok(Analysis {
                                finding: resp.into_finding(model),
                                notices,
                            })
                        }
                        Err(e) => {
                            tracing::warn!(document = filename, model = %model, error = %e, "AI reply rejected");
                            notices.push(Notice::error(
                                Some(filename),
                                format!("AI応答の形式が不正です ({model}): {e}"),
                            ));
                            Ok(Analysis {
                                finding: Finding::error("AI response did not match the expected format"),
                                notices,
                            })
                        }
                    };
                }
                Err(TenkenError::ModelUnavailable { model, message }) => {
                    tracing::info!(document = filename, model = %model, "model unavailable, trying next");
                    notices.push(Notice::info(
                        Some(filename),
                        format!("モデル {model} は利用できません: {message}"),
                    ));
                }
                Err(e) if e.is_service_failure() => {
                    return self.fall_back(filename, text, &e.to_string(), notices);
                }
                Err(e) => return Err(e),
            }
        }

        self.fall_back(filename, text, "no configured model is available", notices)
    }

    fn name(&self) -> &str {
        "ai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::builtin::default_lexicon;
    use crate::model::{FindingSource, HasIssue, NoticeLevel, RemediationStatus};
    use std::sync::Mutex;

    /// Replays canned results and records which models were asked.
    struct ScriptedClient {
        replies: Mutex<Vec<Result<String, TenkenError>>>,
        asked: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(mut replies: Vec<Result<String, TenkenError>>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                asked: Mutex::new(Vec::new()),
            }
        }
    }

    impl ModelClient for ScriptedClient {
        fn generate(&self, model: &str, _prompt: &str) -> Result<String, TenkenError> {
            self.asked.lock().unwrap().push(model.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(TenkenError::Network("script exhausted".into())))
        }
    }

    fn analyzer(replies: Vec<Result<String, TenkenError>>) -> AiAnalyzer<ScriptedClient> {
        AiAnalyzer::new(
            ScriptedClient::new(replies),
            vec!["m1".into(), "m2".into()],
            1000,
            KeywordAnalyzer::new(default_lexicon().unwrap()),
        )
    }

    fn unavailable(model: &str) -> TenkenError {
        TenkenError::ModelUnavailable {
            model: model.into(),
            message: "not found".into(),
        }
    }

    const GOOD: &str =
        r#"{"has_issue":"yes","summary":"配管から漏水","remediation_status":"planned"}"#;

    #[test]
    fn test_first_model_answers() {
        let a = analyzer(vec![Ok(GOOD.into())]);
        let result = a.analyze("a.pdf", "本文").unwrap();
        assert_eq!(result.finding.has_issue, HasIssue::Yes);
        assert_eq!(result.finding.remediation_status, RemediationStatus::Planned);
        assert_eq!(result.finding.source, FindingSource::Ai { model: "m1".into() });
        assert!(result.notices.is_empty());
        assert_eq!(*a.client.asked.lock().unwrap(), vec!["m1"]);
    }

    #[test]
    fn test_unavailable_model_falls_through_to_next() {
        let a = analyzer(vec![Err(unavailable("m1")), Ok(GOOD.into())]);
        let result = a.analyze("a.pdf", "本文").unwrap();
        assert_eq!(result.finding.source, FindingSource::Ai { model: "m2".into() });
        assert_eq!(result.notices.len(), 1);
        assert_eq!(*a.client.asked.lock().unwrap(), vec!["m1", "m2"]);
    }

    #[test]
    fn test_all_models_unavailable_uses_keywords() {
        let a = analyzer(vec![Err(unavailable("m1")), Err(unavailable("m2"))]);
        let result = a.analyze("a.pdf", "配管から漏水").unwrap();
        assert_eq!(result.finding.source, FindingSource::Keyword);
        assert_eq!(result.finding.has_issue, HasIssue::Yes);
        assert_eq!(result.notices.len(), 3);
        assert!(result.notices.iter().all(|n| n.level == NoticeLevel::Info));
    }

    #[test]
    fn test_auth_failure_uses_keywords_without_trying_other_models() {
        let a = analyzer(vec![Err(TenkenError::Authentication("bad key".into()))]);
        let result = a.analyze("a.pdf", "外壁に劣化").unwrap();
        assert_eq!(result.finding.source, FindingSource::Keyword);
        assert_eq!(*a.client.asked.lock().unwrap(), vec!["m1"]);
        assert!(result.notices[0].message.contains("bad key"));
    }

    #[test]
    fn test_nonconforming_reply_is_unknown() {
        let a = analyzer(vec![Ok("指摘有無: 指摘あり\n要約: 漏水".into())]);
        let result = a.analyze("a.pdf", "配管から漏水").unwrap();
        assert_eq!(result.finding.has_issue, HasIssue::Unknown);
        assert_eq!(result.finding.source, FindingSource::None);
        assert_eq!(result.notices[0].level, NoticeLevel::Error);
    }

    #[test]
    fn test_classify_failure_statuses() {
        assert!(matches!(
            classify_failure("m", 404, "models/m is not found"),
            TenkenError::ModelUnavailable { .. }
        ));
        assert!(matches!(
            classify_failure("m", 400, "model m is not supported for generateContent"),
            TenkenError::ModelUnavailable { .. }
        ));
        assert!(matches!(
            classify_failure("m", 400, "API key not valid"),
            TenkenError::Authentication(_)
        ));
        assert!(matches!(classify_failure("m", 403, ""), TenkenError::Authentication(_)));
        assert!(matches!(classify_failure("m", 429, "quota"), TenkenError::RateLimit(_)));
        assert!(matches!(classify_failure("m", 500, "boom"), TenkenError::Network(_)));
    }

    #[test]
    fn test_classify_failure_reads_json_error_message() {
        let not_found = r#"{
  "error": {
    "code": 404,
    "message": "models/gemini-1.5-flash is not found for API version v1beta, or is not supported for generateContent.",
    "status": "NOT_FOUND"
  }
}
"#;
        match classify_failure("gemini-1.5-flash", 404, not_found) {
            TenkenError::ModelUnavailable { model, message } => {
                assert_eq!(model, "gemini-1.5-flash");
                assert!(message.starts_with("models/gemini-1.5-flash is not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let bad_key = r#"{
  "error": {
    "code": 400,
    "message": "API key not valid. Please pass a valid API key.",
    "status": "INVALID_ARGUMENT"
  }
}
"#;
        match classify_failure("m", 400, bad_key) {
            TenkenError::Authentication(message) => {
                assert_eq!(message, "API key not valid. Please pass a valid API key.");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let denied = "{\n  \"error\": {\n    \"code\": 403,\n    \"message\": \"Permission denied.\"\n  }\n}";
        assert_eq!(
            classify_failure("m", 403, denied).to_string(),
            "API authentication failed: Permission denied."
        );
    }
}
