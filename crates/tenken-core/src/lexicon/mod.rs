pub mod builtin;
pub mod schema;

use crate::error::TenkenError;
use schema::KeywordLexicon;
use std::path::Path;

/// Load a keyword lexicon from a JSON file.
pub fn load_lexicon(path: &Path) -> Result<KeywordLexicon, TenkenError> {
    let content = std::fs::read_to_string(path).map_err(|e| TenkenError::LexiconLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_lexicon(&content, path)
}

/// Parse a lexicon from a JSON string.
pub fn parse_lexicon(json: &str, source: &Path) -> Result<KeywordLexicon, TenkenError> {
    let lexicon: KeywordLexicon =
        serde_json::from_str(json).map_err(|e| TenkenError::LexiconLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_lexicon(&lexicon)?;
    Ok(lexicon)
}

/// Validate that a lexicon is well-formed.
pub fn validate_lexicon(lexicon: &KeywordLexicon) -> Result<(), TenkenError> {
    if lexicon.urgent.is_empty() {
        return Err(TenkenError::LexiconInvalid(
            "urgent keywords must not be empty".into(),
        ));
    }

    if lexicon.attention.is_empty() {
        return Err(TenkenError::LexiconInvalid(
            "attention keywords must not be empty".into(),
        ));
    }

    let sets = [
        ("urgent", &lexicon.urgent),
        ("attention", &lexicon.attention),
        ("remediation.done", &lexicon.remediation.done),
        ("remediation.in_progress", &lexicon.remediation.in_progress),
        ("remediation.planned", &lexicon.remediation.planned),
    ];

    for (set_name, keywords) in sets {
        if keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(TenkenError::LexiconInvalid(format!(
                "'{}' contains an empty keyword",
                set_name
            )));
        }
    }

    Ok(())
}
