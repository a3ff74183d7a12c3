use std::sync::Arc;

use shared::protocol::AdviceRequest;
use tracing::{debug, info, warn};

use crate::{
    guard::InFlightGuard,
    input::InputCollector,
    messages,
    session::SessionState,
    types::{EntryKind, Message, SubmitOutcome},
    AdviceService, InputSource, MessageSink,
};

/// Drives one advice submission from form input to a stored result.
///
/// `Idle -> Submitting -> (AdviceReady | Failed) -> Idle`. A submit while
/// another is in flight is dropped without touching the log or the network.
pub struct AdviceRequestController {
    service: Arc<dyn AdviceService>,
    input: Arc<dyn InputSource>,
    sink: Arc<dyn MessageSink>,
    session: Arc<SessionState>,
    guard: InFlightGuard,
}

impl AdviceRequestController {
    pub fn new(
        service: Arc<dyn AdviceService>,
        input: Arc<dyn InputSource>,
        sink: Arc<dyn MessageSink>,
        session: Arc<SessionState>,
    ) -> Self {
        Self {
            service,
            input,
            sink,
            session,
            guard: InFlightGuard::new(),
        }
    }

    pub fn in_flight(&self) -> bool {
        self.guard.is_held()
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let Some(_permit) = self.guard.try_acquire() else {
            debug!("advice submission already in flight; dropping trigger");
            return SubmitOutcome::Dropped;
        };

        let input = InputCollector::collect(self.input.as_ref()).await;
        self.sink.append(Message::user(messages::echo(&input))).await;
        self.sink.append_pending(messages::THINKING.to_string()).await;

        info!(
            industry = %input.industry,
            style = %input.style,
            competitors = input.competitors.len(),
            "requesting portfolio advice"
        );
        let request = AdviceRequest::from(&input);
        let result = self.service.request_advice(&request).await;

        // Cleared before the settling entry on both branches.
        self.sink.remove_pending().await;

        match result {
            Ok(advice) => {
                self.session.record_advice(input, advice.clone()).await;
                self.sink
                    .append(Message::system(EntryKind::Advice, messages::advice(&advice)))
                    .await;
                info!(
                    keywords = advice.seo_tips.recommended_keywords.len(),
                    guidelines = advice.design_guidelines.len(),
                    "portfolio advice ready; site build enabled"
                );
                SubmitOutcome::AdviceReady(advice)
            }
            Err(err) => {
                warn!(error = %err, "portfolio advice request failed");
                self.sink
                    .append(Message::system(EntryKind::Error, messages::advice_failed(&err)))
                    .await;
                SubmitOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/advice_tests.rs"]
mod tests;
