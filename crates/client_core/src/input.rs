use shared::domain::UserInput;

use crate::{types::RawForm, InputSource};

pub const COMPETITOR_DELIMITER: char = ',';

/// Turns raw form fields into a [`UserInput`]. No validation: empty fields
/// stay empty strings.
pub struct InputCollector;

impl InputCollector {
    pub async fn collect(source: &dyn InputSource) -> UserInput {
        Self::normalize(source.read_form().await)
    }

    pub fn normalize(form: RawForm) -> UserInput {
        UserInput {
            competitors: split_competitors(&form.competitors),
            industry: form.industry,
            style: form.theme,
            goals: form.goals,
            project_descriptions: form.project_descriptions,
        }
    }
}

/// Splits on commas, trims, drops blanks. Order and duplicates are kept.
pub fn split_competitors(raw: &str) -> Vec<String> {
    raw.split(COMPETITOR_DELIMITER)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
