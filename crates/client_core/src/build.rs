use std::sync::Arc;

use shared::protocol::BuildRequest;
use tracing::{info, warn};
use url::Url;

use crate::{
    error::WorkflowError,
    guard::InFlightGuard,
    messages,
    session::SessionState,
    transport::resolve_site_location,
    types::{BuildOutcome, EntryKind, Message},
    BuildService, InputSource, MessageSink, SitePresenter,
};

/// Builds a site from the last successful advice.
///
/// The theme is read from the input source when the build is triggered, so
/// a theme change after the advice arrived is honoured. Only one build runs
/// at a time; further triggers get a warning entry and send nothing.
pub struct BuildRequestController {
    service: Arc<dyn BuildService>,
    input: Arc<dyn InputSource>,
    sink: Arc<dyn MessageSink>,
    session: Arc<SessionState>,
    presenter: Arc<dyn SitePresenter>,
    site_base: Option<Url>,
    guard: InFlightGuard,
}

impl BuildRequestController {
    pub fn new(
        service: Arc<dyn BuildService>,
        input: Arc<dyn InputSource>,
        sink: Arc<dyn MessageSink>,
        session: Arc<SessionState>,
        presenter: Arc<dyn SitePresenter>,
    ) -> Self {
        Self {
            service,
            input,
            sink,
            session,
            presenter,
            site_base: None,
            guard: InFlightGuard::new(),
        }
    }

    /// Base URL that relative `site_url` values are resolved against.
    pub fn with_site_base(mut self, base: Url) -> Self {
        self.site_base = Some(base);
        self
    }

    pub fn in_flight(&self) -> bool {
        self.guard.is_held()
    }

    pub async fn trigger_build(&self) -> BuildOutcome {
        let Some((input, advice)) = self.session.snapshot().await.ready_pair() else {
            warn!("site build triggered before any advice succeeded");
            return self
                .reject(WorkflowError::PreconditionNotMet, messages::NO_ADVICE_WARNING)
                .await;
        };

        let Some(_permit) = self.guard.try_acquire() else {
            warn!("site build triggered while another build is running");
            return self
                .reject(WorkflowError::BuildInProgress, messages::BUILD_IN_PROGRESS_WARNING)
                .await;
        };

        let theme = self.input.selected_theme().await;
        let request = BuildRequest::compose(&input, &advice, &theme);
        self.sink
            .append(Message::system(EntryKind::Status, messages::BUILDING))
            .await;
        info!(theme = %theme, industry = %request.industry, "requesting site build");

        match self.service.request_build(&request).await {
            Ok(response) => {
                let location = resolve_site_location(self.site_base.as_ref(), &response.site_url);
                self.sink
                    .append(Message::system(
                        EntryKind::SiteLink,
                        messages::site_ready(&response.site_url),
                    ))
                    .await;
                info!(site_url = %response.site_url, %location, "site generated");

                if let Err(err) = self.presenter.present(&location).await {
                    warn!(error = %err, %location, "failed to present generated site");
                }
                BuildOutcome::Built {
                    site_url: response.site_url,
                    location,
                }
            }
            Err(err) => {
                warn!(error = %err, "site build request failed");
                self.sink
                    .append(Message::system(EntryKind::Error, messages::build_failed(&err)))
                    .await;
                BuildOutcome::Failed(err)
            }
        }
    }

    async fn reject(&self, err: WorkflowError, warning: &str) -> BuildOutcome {
        self.sink
            .append(Message::system(EntryKind::Warning, warning))
            .await;
        BuildOutcome::Rejected(err)
    }
}

#[cfg(test)]
#[path = "tests/build_tests.rs"]
mod tests;
