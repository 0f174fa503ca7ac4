use serde::{Deserialize, Serialize};

/// Keyword lexicon driving the rule-based finding classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordLexicon {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Any line containing one of these becomes an urgent item.
    pub urgent: Vec<String>,
    /// Any line containing one of these becomes an issue.
    pub attention: Vec<String>,
    #[serde(default)]
    pub remediation: RemediationKeywords,
}

/// Keywords that reveal how far remediation has progressed.
///
/// Checked in the order done, in progress, planned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemediationKeywords {
    #[serde(default)]
    pub done: Vec<String>,
    #[serde(default)]
    pub in_progress: Vec<String>,
    #[serde(default)]
    pub planned: Vec<String>,
}
