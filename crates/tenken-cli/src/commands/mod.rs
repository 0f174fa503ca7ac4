pub mod analyze;
pub mod generate;
pub mod keywords;
pub mod serve;
pub mod tickets;

use clap::Args;
use std::path::PathBuf;
use tenken_core::config::AnalyzerConfig;
use tenken_core::error::TenkenError;
use tenken_core::lexicon::schema::KeywordLexicon;
use tenken_core::lexicon::{builtin, load_lexicon};

/// Flags shared by every command that analyzes documents.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzerArgs {
    /// Gemini API key; keyword rules are used when absent
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model(s) to try in order (default: built-in fallback list)
    #[arg(long = "model", value_name = "NAME")]
    pub models: Vec<String>,

    /// Custom keyword lexicon (JSON) for rule-based analysis
    #[arg(short, long, value_name = "FILE")]
    pub keywords: Option<PathBuf>,
}

impl AnalyzerArgs {
    pub fn config(&self) -> AnalyzerConfig {
        AnalyzerConfig::with_api_key(self.api_key.clone()).with_models(self.models.clone())
    }

    pub fn lexicon(&self) -> Result<KeywordLexicon, TenkenError> {
        match &self.keywords {
            Some(path) => load_lexicon(path),
            None => builtin::default_lexicon(),
        }
    }
}
