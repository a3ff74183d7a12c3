use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use shared::protocol::{AdviceRequest, AdviceResponse, BuildRequest, BuildResponse};
use tokio::sync::{broadcast, RwLock};
use tracing::info;
use url::Url;

pub mod advice;
pub mod build;
pub mod error;
pub mod guard;
pub mod input;
pub mod message_log;
pub mod messages;
pub mod session;
pub mod transport;
pub mod types;

pub use advice::AdviceRequestController;
pub use build::BuildRequestController;
pub use error::WorkflowError;
pub use input::InputCollector;
pub use message_log::MessageLog;
pub use session::{SessionSnapshot, SessionState};
pub use transport::{HttpPortfolioClient, TransportConfig};
pub use types::{
    BuildOutcome, EntryKind, LogEntry, LogEvent, Message, RawForm, Sender, SubmitOutcome,
};

#[async_trait]
pub trait AdviceService: Send + Sync {
    async fn request_advice(&self, request: &AdviceRequest)
        -> Result<AdviceResponse, WorkflowError>;
}

#[async_trait]
pub trait BuildService: Send + Sync {
    async fn request_build(&self, request: &BuildRequest) -> Result<BuildResponse, WorkflowError>;
}

/// Where form values come from. Read on every submit and, for the theme,
/// again on every build trigger.
#[async_trait]
pub trait InputSource: Send + Sync {
    async fn read_form(&self) -> RawForm;

    async fn selected_theme(&self) -> String {
        self.read_form().await.theme
    }
}

/// Append-only transcript the controllers write to.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Returns the ordinal assigned to the new entry.
    async fn append(&self, message: Message) -> u64;
    /// Adds the pending entry, or replaces its content if one already exists.
    async fn append_pending(&self, content: String) -> u64;
    /// Removes the pending entry if there is one. Returns whether it existed.
    async fn remove_pending(&self) -> bool;
}

/// Opens or otherwise shows a generated site to the user.
#[async_trait]
pub trait SitePresenter: Send + Sync {
    async fn present(&self, location: &str) -> Result<()>;
}

pub struct NoopSitePresenter;

#[async_trait]
impl SitePresenter for NoopSitePresenter {
    async fn present(&self, location: &str) -> Result<()> {
        info!(%location, "site presentation disabled");
        Ok(())
    }
}

/// Editable form backing an [`InputSource`], for front-ends that keep field
/// values in memory rather than in widgets.
#[derive(Default)]
pub struct FormState {
    form: RwLock<RawForm>,
}

impl FormState {
    pub fn new(form: RawForm) -> Self {
        Self {
            form: RwLock::new(form),
        }
    }

    pub async fn update(&self, apply: impl FnOnce(&mut RawForm)) {
        let mut form = self.form.write().await;
        apply(&mut *form);
    }

    pub async fn set_theme(&self, theme: impl Into<String>) {
        self.form.write().await.theme = theme.into();
    }

    pub async fn current(&self) -> RawForm {
        self.form.read().await.clone()
    }
}

#[async_trait]
impl InputSource for FormState {
    async fn read_form(&self) -> RawForm {
        self.current().await
    }

    async fn selected_theme(&self) -> String {
        self.form.read().await.theme.clone()
    }
}

pub struct SessionDependencies {
    pub advice_service: Arc<dyn AdviceService>,
    pub build_service: Arc<dyn BuildService>,
    pub input: Arc<dyn InputSource>,
    pub presenter: Arc<dyn SitePresenter>,
    pub site_base: Option<Url>,
}

/// One assistant session: its transcript, retained state and both
/// controllers. Everything lives as long as this value.
pub struct PortfolioSession {
    log: Arc<MessageLog>,
    state: Arc<SessionState>,
    advice: AdviceRequestController,
    build: BuildRequestController,
}

impl PortfolioSession {
    pub fn new(deps: SessionDependencies) -> Arc<Self> {
        let log = Arc::new(MessageLog::new());
        let state = Arc::new(SessionState::new());
        let sink: Arc<dyn MessageSink> = log.clone();

        let advice = AdviceRequestController::new(
            deps.advice_service,
            deps.input.clone(),
            sink.clone(),
            state.clone(),
        );
        let mut build = BuildRequestController::new(
            deps.build_service,
            deps.input,
            sink,
            state.clone(),
            deps.presenter,
        );
        if let Some(base) = deps.site_base {
            build = build.with_site_base(base);
        }

        Arc::new(Self {
            log,
            state,
            advice,
            build,
        })
    }

    /// Wires both services to the same HTTP client and resolves site links
    /// against its base URL.
    pub fn over_http(
        client: Arc<HttpPortfolioClient>,
        input: Arc<dyn InputSource>,
        presenter: Arc<dyn SitePresenter>,
    ) -> Arc<Self> {
        let site_base = Some(client.base_url().clone());
        Self::new(SessionDependencies {
            advice_service: client.clone(),
            build_service: client,
            input,
            presenter,
            site_base,
        })
    }

    pub async fn submit(&self) -> SubmitOutcome {
        self.advice.submit().await
    }

    pub async fn trigger_build(&self) -> BuildOutcome {
        self.build.trigger_build().await
    }

    pub fn advice_in_flight(&self) -> bool {
        self.advice.in_flight()
    }

    pub fn build_in_flight(&self) -> bool {
        self.build.in_flight()
    }

    pub async fn build_enabled(&self) -> bool {
        self.state.build_enabled().await
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogEvent> {
        self.log.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
