use serde::{Deserialize, Serialize};

/// Default Gemini API base.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Models tried in order; later entries are fallbacks for unavailable ones.
pub const DEFAULT_MODELS: &[&str] = &["gemini-2.5-flash", "gemini-2.0-flash", "gemini-1.5-flash"];

/// Maximum characters of document text embedded in a prompt.
pub const DEFAULT_TEXT_BUDGET: usize = 8000;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Settings for finding analysis, passed explicitly into the pipeline.
///
/// With no `api_key` the keyword analyzer is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    pub models: Vec<String>,
    pub endpoint: String,
    pub timeout_secs: u64,
    pub text_budget: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            api_key: None,
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            text_budget: DEFAULT_TEXT_BUDGET,
        }
    }
}

impl AnalyzerConfig {
    /// Config using the given credential; blank keys count as absent.
    pub fn with_api_key(api_key: Option<String>) -> Self {
        AnalyzerConfig {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            ..AnalyzerConfig::default()
        }
    }

    /// Replace the model list when `models` is non-empty.
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        if !models.is_empty() {
            self.models = models;
        }
        self
    }

    pub fn uses_ai(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_means_keyword_mode() {
        assert!(!AnalyzerConfig::with_api_key(Some("  ".into())).uses_ai());
        assert!(!AnalyzerConfig::with_api_key(None).uses_ai());
        assert!(AnalyzerConfig::with_api_key(Some("k".into())).uses_ai());
    }

    #[test]
    fn test_with_models_keeps_defaults_when_empty() {
        let cfg = AnalyzerConfig::default().with_models(vec![]);
        assert_eq!(cfg.models.len(), DEFAULT_MODELS.len());
        let cfg = cfg.with_models(vec!["m1".into()]);
        assert_eq!(cfg.models, vec!["m1"]);
    }

    #[test]
    fn test_api_key_not_serialized() {
        let cfg = AnalyzerConfig::with_api_key(Some("secret".into()));
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("secret"));
    }
}
