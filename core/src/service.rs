//! Services: The Integration Layer
//!
//! A service represents a connection to an external system. Flows only wait
//! on these from spawned tasks, never from inside a transition.

use crate::error::SpaceServiceError;
use crate::ids::SpaceHandle;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Membership operations a space flow triggers.
#[async_trait]
pub trait SpaceService: Send + Sync {
    async fn join_space(&self, space: &SpaceHandle) -> Result<(), SpaceServiceError>;

    async fn leave_space(&self, space: &SpaceHandle) -> Result<(), SpaceServiceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    /// Progress of a running operation; retracted when it completes.
    Info,
    Error,
}

/// A transient, user-facing notice (toast, banner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIndicator {
    pub id: String,
    pub kind: IndicatorKind,
    pub title: String,
}

impl UserIndicator {
    pub fn error(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: IndicatorKind::Error,
            title: title.into(),
        }
    }

    pub fn info(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: IndicatorKind::Info,
            title: title.into(),
        }
    }
}

/// Shows and hides indicators on behalf of flows.
pub trait IndicatorPresenter: Send + Sync {
    fn present(&self, indicator: UserIndicator);

    fn retract(&self, id: &str);
}
