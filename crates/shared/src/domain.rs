use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Normalized business inputs captured at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    pub industry: String,
    /// Theme identifier selected when the input was collected.
    pub style: String,
    pub goals: String,
    pub competitors: Vec<String>,
    pub project_descriptions: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoTips {
    pub recommended_keywords: Vec<String>,
    /// Members the advice service adds beyond the keyword list. Kept so the
    /// whole object can be forwarded to the build service untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdviceResult {
    pub copywriting: String,
    pub seo_tips: SeoTips,
    pub design_guidelines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitor_analysis: Option<Value>,
}
