use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body returned by the backend on a non-success status.
///
/// FastAPI style services answer with `{"detail": ...}` where `detail` is
/// either a string or a list of validation records carrying a `msg`.
/// Other services use `{"message": "..."}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServiceErrorBody {
    pub fn summary(&self) -> Option<String> {
        let from_detail = match &self.detail {
            Some(Value::String(text)) => Some(text.trim().to_string()),
            Some(Value::Array(items)) => {
                let msgs = items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(text) => Some(text.trim().to_string()),
                        Value::Object(record) => record
                            .get("msg")
                            .and_then(Value::as_str)
                            .map(|msg| msg.trim().to_string()),
                        _ => None,
                    })
                    .filter(|msg| !msg.is_empty())
                    .collect::<Vec<_>>();
                (!msgs.is_empty()).then(|| msgs.join("; "))
            }
            _ => None,
        };

        from_detail
            .filter(|text| !text.is_empty())
            .or_else(|| {
                self.message
                    .as_deref()
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .map(str::to_string)
            })
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
