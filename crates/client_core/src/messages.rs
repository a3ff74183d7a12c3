//! User-visible wording for every log entry the controllers produce.

use shared::domain::{AdviceResult, UserInput};

use crate::error::WorkflowError;

pub const THINKING: &str = "💭 Thinking...";
pub const BUILDING: &str = "🛠️ Building your site...";
pub const NO_ADVICE_WARNING: &str =
    "⚠️ No AI response to generate site from. Run the assistant first.";
pub const BUILD_IN_PROGRESS_WARNING: &str =
    "⚠️ A site build is already running. Wait for it to finish before building again.";

pub fn echo(input: &UserInput) -> String {
    format!(
        "Industry: {}\nTheme: {}\nGoals: {}\nCompetitors: {}\nProjects: {}",
        input.industry,
        input.style,
        input.goals,
        input.competitors.join(", "),
        input.project_descriptions,
    )
}

pub fn advice(advice: &AdviceResult) -> String {
    let guidelines = advice
        .design_guidelines
        .iter()
        .map(|guideline| format!("• {guideline}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "📋 Copywriting Advice:\n{}\n\n🔍 SEO Tips: {}\n🎨 Design Guidelines:\n{}",
        advice.copywriting,
        advice.seo_tips.recommended_keywords.join(", "),
        guidelines,
    )
}

pub fn advice_failed(err: &WorkflowError) -> String {
    format!("❌ Error: {err}")
}

pub fn site_ready(site_url: &str) -> String {
    format!("✅ Site generated: {site_url}")
}

pub fn build_failed(err: &WorkflowError) -> String {
    format!("❌ Error generating site: {err}")
}
