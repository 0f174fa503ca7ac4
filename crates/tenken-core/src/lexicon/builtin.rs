use crate::error::TenkenError;
use crate::lexicon::schema::KeywordLexicon;

const KEYWORDS_JA_JSON: &str = include_str!("../../../../rules/keywords-ja.json");

/// Available predefined lexicons.
pub const PRESETS: &[&str] = &["ja"];

/// The lexicon used when none is configured.
pub const DEFAULT_PRESET: &str = "ja";

/// Load a predefined lexicon by name.
pub fn load_preset(name: &str) -> Result<KeywordLexicon, TenkenError> {
    match name {
        "ja" => {
            let lexicon: KeywordLexicon = serde_json::from_str(KEYWORDS_JA_JSON)?;
            Ok(lexicon)
        }
        _ => Err(TenkenError::LexiconInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

/// The default lexicon.
pub fn default_lexicon() -> Result<KeywordLexicon, TenkenError> {
    load_preset(DEFAULT_PRESET)
}
