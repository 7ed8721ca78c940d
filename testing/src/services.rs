use async_trait::async_trait;
use parking_lot::Mutex;
use spaceflow_core::{
    IndicatorPresenter, SpaceHandle, SpaceId, SpaceService, SpaceServiceError, UserIndicator,
};
use std::collections::VecDeque;
use tokio::sync::Notify;

type Outcome = Result<(), SpaceServiceError>;

/// A space service that answers from a script.
///
/// Calls succeed unless a failure was queued with
/// [`fail_next_join`](Self::fail_next_join) or
/// [`fail_next_leave`](Self::fail_next_leave). A gated service holds every
/// call until [`release`](Self::release) is called, which lets tests
/// interleave teardown with an in-flight request.
#[derive(Debug, Default)]
pub struct ScriptedSpaceService {
    join_outcomes: Mutex<VecDeque<Outcome>>,
    leave_outcomes: Mutex<VecDeque<Outcome>>,
    join_calls: Mutex<Vec<SpaceId>>,
    leave_calls: Mutex<Vec<SpaceId>>,
    gate: Option<Notify>,
}

impl ScriptedSpaceService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::default()
        }
    }

    /// Let one held call complete.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn fail_next_join(&self, error: SpaceServiceError) {
        self.join_outcomes.lock().push_back(Err(error));
    }

    pub fn fail_next_leave(&self, error: SpaceServiceError) {
        self.leave_outcomes.lock().push_back(Err(error));
    }

    pub fn join_calls(&self) -> Vec<SpaceId> {
        self.join_calls.lock().clone()
    }

    pub fn leave_calls(&self) -> Vec<SpaceId> {
        self.leave_calls.lock().clone()
    }

    async fn hold(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl SpaceService for ScriptedSpaceService {
    async fn join_space(&self, space: &SpaceHandle) -> Result<(), SpaceServiceError> {
        self.join_calls.lock().push(space.id().clone());
        self.hold().await;
        let outcome = self.join_outcomes.lock().pop_front();
        tracing::debug!(space = %space.id(), ?outcome, "Scripted join");
        outcome.unwrap_or(Ok(()))
    }

    async fn leave_space(&self, space: &SpaceHandle) -> Result<(), SpaceServiceError> {
        self.leave_calls.lock().push(space.id().clone());
        self.hold().await;
        let outcome = self.leave_outcomes.lock().pop_front();
        tracing::debug!(space = %space.id(), ?outcome, "Scripted leave");
        outcome.unwrap_or(Ok(()))
    }
}

/// Remembers every indicator shown and retracted.
#[derive(Debug, Default)]
pub struct RecordingIndicators {
    presented: Mutex<Vec<UserIndicator>>,
    retracted: Mutex<Vec<String>>,
}

impl RecordingIndicators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presented(&self) -> Vec<UserIndicator> {
        self.presented.lock().clone()
    }

    pub fn retracted(&self) -> Vec<String> {
        self.retracted.lock().clone()
    }
}

impl IndicatorPresenter for RecordingIndicators {
    fn present(&self, indicator: UserIndicator) {
        self.presented.lock().push(indicator);
    }

    fn retract(&self, id: &str) {
        self.retracted.lock().push(id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_failures_are_consumed_in_order() {
        let service = ScriptedSpaceService::new();
        let space = SpaceHandle::new("!space", "Space");
        service.fail_next_join(SpaceServiceError::Network("offline".into()));

        assert!(service.join_space(&space).await.is_err());
        assert!(service.join_space(&space).await.is_ok());
        assert_eq!(service.join_calls().len(), 2);
        assert!(service.leave_calls().is_empty());
    }

    #[tokio::test]
    async fn test_gate_holds_until_released() {
        let service = ScriptedSpaceService::gated();
        let space = SpaceHandle::new("!space", "Space");
        service.release();

        assert!(service.leave_space(&space).await.is_ok());
    }
}
