use serde::{Deserialize, Serialize};

use crate::domain::{AdviceResult, SeoTips, UserInput};

pub const ADVICE_PATH: &str = "/generate-portfolio-advice";
pub const BUILD_PATH: &str = "/generate-full-site";

/// Body of the advice request. Field names are case-sensitive; the project
/// descriptions go out camel-cased on this endpoint only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceRequest {
    pub industry: String,
    pub style: String,
    pub goals: String,
    pub competitors: Vec<String>,
    #[serde(rename = "projectDescriptions")]
    pub project_descriptions: String,
}

impl From<&UserInput> for AdviceRequest {
    fn from(input: &UserInput) -> Self {
        Self {
            industry: input.industry.clone(),
            style: input.style.clone(),
            goals: input.goals.clone(),
            competitors: input.competitors.clone(),
            project_descriptions: input.project_descriptions.clone(),
        }
    }
}

pub type AdviceResponse = AdviceResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildRequest {
    pub industry: String,
    pub style: String,
    pub goals: String,
    pub competitors: Vec<String>,
    pub project_descriptions: String,
    pub ai_copy: String,
    pub seo_tips: SeoTips,
    pub design_guidelines: Vec<String>,
    pub theme: String,
}

impl BuildRequest {
    /// Merges retained input and advice with the theme selected right now.
    /// Both `style` and `theme` carry the fresh selection, not the style
    /// recorded when the advice was requested.
    pub fn compose(input: &UserInput, advice: &AdviceResult, theme: &str) -> Self {
        Self {
            industry: input.industry.clone(),
            style: theme.to_string(),
            goals: input.goals.clone(),
            competitors: input.competitors.clone(),
            project_descriptions: input.project_descriptions.clone(),
            ai_copy: advice.copywriting.clone(),
            seo_tips: advice.seo_tips.clone(),
            design_guidelines: advice.design_guidelines.clone(),
            theme: theme.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildResponse {
    pub site_url: String,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
