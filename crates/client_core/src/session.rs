use shared::domain::{AdviceResult, UserInput};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub last_input: Option<UserInput>,
    pub last_advice: Option<AdviceResult>,
}

impl SessionSnapshot {
    /// The retained input/advice pair, when advice has succeeded at least once.
    pub fn ready_pair(self) -> Option<(UserInput, AdviceResult)> {
        match (self.last_input, self.last_advice) {
            (Some(input), Some(advice)) => Some((input, advice)),
            _ => None,
        }
    }
}

/// Input and advice retained for the lifetime of one assistant session.
///
/// Written only when an advice request succeeds, and then always as a pair,
/// so `last_advice` is never paired with an input it was not produced from.
#[derive(Debug, Default)]
pub struct SessionState {
    inner: RwLock<SessionSnapshot>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_advice(&self, input: UserInput, advice: AdviceResult) {
        let mut inner = self.inner.write().await;
        inner.last_input = Some(input);
        inner.last_advice = Some(advice);
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.read().await.clone()
    }

    pub async fn last_input(&self) -> Option<UserInput> {
        self.inner.read().await.last_input.clone()
    }

    pub async fn last_advice(&self) -> Option<AdviceResult> {
        self.inner.read().await.last_advice.clone()
    }

    pub async fn build_enabled(&self) -> bool {
        let inner = self.inner.read().await;
        inner.last_input.is_some() && inner.last_advice.is_some()
    }
}
