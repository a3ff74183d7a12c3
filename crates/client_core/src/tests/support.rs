//! In-memory collaborators for controller tests.

use std::{collections::VecDeque, sync::Arc};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::AdviceResult,
    protocol::{AdviceRequest, AdviceResponse, BuildRequest, BuildResponse},
};
use tokio::sync::{Mutex, Notify};

use crate::{
    error::WorkflowError, AdviceService, BuildService, FormState, PortfolioSession, RawForm,
    SessionDependencies, SitePresenter,
};

/// Held-open request: the fake signals `entered` when the call arrives and
/// waits for `release` before answering.
#[derive(Default)]
pub(crate) struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    advice_replies: Mutex<VecDeque<Result<AdviceResponse, WorkflowError>>>,
    build_replies: Mutex<VecDeque<Result<BuildResponse, WorkflowError>>>,
    pub advice_calls: Mutex<Vec<AdviceRequest>>,
    pub build_calls: Mutex<Vec<BuildRequest>>,
    advice_gate: Option<Arc<Gate>>,
    build_gate: Option<Arc<Gate>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_advice_gate(mut self, gate: Arc<Gate>) -> Self {
        self.advice_gate = Some(gate);
        self
    }

    pub fn with_build_gate(mut self, gate: Arc<Gate>) -> Self {
        self.build_gate = Some(gate);
        self
    }

    pub async fn reply_advice(&self, reply: Result<AdviceResponse, WorkflowError>) {
        self.advice_replies.lock().await.push_back(reply);
    }

    pub async fn reply_build(&self, reply: Result<BuildResponse, WorkflowError>) {
        self.build_replies.lock().await.push_back(reply);
    }

    pub async fn advice_call_count(&self) -> usize {
        self.advice_calls.lock().await.len()
    }

    pub async fn build_call_count(&self) -> usize {
        self.build_calls.lock().await.len()
    }
}

async fn hold(gate: &Option<Arc<Gate>>) {
    if let Some(gate) = gate {
        gate.entered.notify_one();
        gate.release.notified().await;
    }
}

#[async_trait]
impl AdviceService for FakeBackend {
    async fn request_advice(
        &self,
        request: &AdviceRequest,
    ) -> Result<AdviceResponse, WorkflowError> {
        self.advice_calls.lock().await.push(request.clone());
        hold(&self.advice_gate).await;
        self.advice_replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(WorkflowError::TransportFailure("no scripted reply".into())))
    }
}

#[async_trait]
impl BuildService for FakeBackend {
    async fn request_build(&self, request: &BuildRequest) -> Result<BuildResponse, WorkflowError> {
        self.build_calls.lock().await.push(request.clone());
        hold(&self.build_gate).await;
        self.build_replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(WorkflowError::TransportFailure("no scripted reply".into())))
    }
}

#[derive(Default)]
pub(crate) struct RecordingPresenter {
    pub presented: Mutex<Vec<String>>,
    pub fail: bool,
}

#[async_trait]
impl SitePresenter for RecordingPresenter {
    async fn present(&self, location: &str) -> Result<()> {
        self.presented.lock().await.push(location.to_string());
        if self.fail {
            return Err(anyhow!("no browser available"));
        }
        Ok(())
    }
}

pub(crate) fn bakery_form() -> RawForm {
    RawForm {
        industry: "bakery".into(),
        goals: "sell cakes".into(),
        theme: "modern".into(),
        competitors: "a, b ,c, ".into(),
        project_descriptions: "none".into(),
    }
}

pub(crate) fn sample_advice() -> AdviceResult {
    let mut advice = AdviceResult {
        copywriting: "Fresh bread daily.\nCakes to order.".into(),
        design_guidelines: vec![
            "Use responsive design (CSS Grid/Flexbox)".into(),
            "Optimize images for fast loading".into(),
        ],
        ..AdviceResult::default()
    };
    advice.seo_tips.recommended_keywords = vec!["bakery".into(), "custom cakes".into()];
    advice
}

pub(crate) struct Fixture {
    pub backend: Arc<FakeBackend>,
    pub form: Arc<FormState>,
    pub presenter: Arc<RecordingPresenter>,
    pub session: Arc<PortfolioSession>,
}

pub(crate) fn fixture(backend: FakeBackend) -> Fixture {
    fixture_with_presenter(backend, RecordingPresenter::default())
}

pub(crate) fn fixture_with_presenter(
    backend: FakeBackend,
    presenter: RecordingPresenter,
) -> Fixture {
    let backend = Arc::new(backend);
    let form = Arc::new(FormState::new(bakery_form()));
    let presenter = Arc::new(presenter);
    let session = PortfolioSession::new(SessionDependencies {
        advice_service: backend.clone(),
        build_service: backend.clone(),
        input: form.clone(),
        presenter: presenter.clone(),
        site_base: Some("http://127.0.0.1:8000".parse().expect("base url")),
    });
    Fixture {
        backend,
        form,
        presenter,
        session,
    }
}
