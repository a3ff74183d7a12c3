use thiserror::Error;

/// Everything that can stop a workflow step short of its happy path.
///
/// Transport, service and malformed-response failures are shown to the user
/// as error entries. The remaining variants never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("a submission is already in flight")]
    ReentrantSubmission,
    #[error("request failed: {0}")]
    TransportFailure(String),
    #[error("server error: {status}{}", detail_suffix(.detail))]
    ServiceFailure { status: u16, detail: Option<String> },
    #[error("unexpected response body: {0}")]
    MalformedResponse(String),
    #[error("no advice available to build from")]
    PreconditionNotMet,
    #[error("a site build is already in progress")]
    BuildInProgress,
}

impl WorkflowError {
    /// Soft failures the user caused by acting out of order.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::PreconditionNotMet | Self::BuildInProgress)
    }

    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            Self::TransportFailure(_) | Self::ServiceFailure { .. } | Self::MalformedResponse(_)
        )
    }
}

impl From<reqwest::Error> for WorkflowError {
    fn from(value: reqwest::Error) -> Self {
        Self::TransportFailure(value.to_string())
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|detail| format!(" ({detail})"))
        .unwrap_or_default()
}
