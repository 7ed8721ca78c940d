//! Coordinator - the uniform face of every flow
//!
//! A coordinator owns a state machine, an inbox and (for composite flows)
//! a set of child slots. Parents only ever talk to children through
//! [`FlowCoordinator`]; children only ever talk to parents through the
//! outward sink they were built with.

use crate::factory::{CoordinatorFactory, StandardCoordinatorFactory};
use spaceflow_core::{AppRoute, FlowConfig, IndicatorPresenter, NavigationStack, SpaceService};
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Notify;

pub trait FlowCoordinator: Send {
    /// Present the flow's first screen.
    fn start(&mut self, animated: bool);

    /// Navigate to an app-level route, if this flow can show it.
    fn handle_app_route(&mut self, route: &AppRoute, animated: bool);

    /// Unwind active children, then dismiss this flow's own screens.
    /// Calling it again once torn down does nothing.
    fn clear_route(&mut self, animated: bool);

    /// Handle everything queued in this flow and its children until the
    /// tree is quiescent. Returns the number of messages handled.
    ///
    /// Service calls are spawned on the environment's runtime, or on the
    /// caller's tokio runtime when none was given. Without either they fail
    /// like any other service error.
    fn process_pending(&mut self) -> usize;

    fn is_finished(&self) -> bool;
}

/// Collaborators shared by every coordinator of one tree.
#[derive(Clone)]
pub struct FlowEnvironment {
    pub navigation: Arc<dyn NavigationStack>,
    pub spaces: Arc<dyn SpaceService>,
    pub indicators: Arc<dyn IndicatorPresenter>,
    pub factory: Arc<dyn CoordinatorFactory>,
    pub config: FlowConfig,
    runtime: Option<Handle>,
    wake: Arc<Notify>,
}

impl FlowEnvironment {
    pub fn new(
        navigation: Arc<dyn NavigationStack>,
        spaces: Arc<dyn SpaceService>,
        indicators: Arc<dyn IndicatorPresenter>,
        config: FlowConfig,
    ) -> Self {
        Self {
            navigation,
            spaces,
            indicators,
            factory: Arc::new(StandardCoordinatorFactory),
            config,
            runtime: None,
            wake: Arc::new(Notify::new()),
        }
    }

    pub fn with_factory(mut self, factory: Arc<dyn CoordinatorFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// Run service calls on `runtime` instead of the caller's.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn runtime(&self) -> Option<&Handle> {
        self.runtime.as_ref()
    }

    /// Signal rung whenever any inbox in the tree receives a message.
    pub fn wake(&self) -> Arc<Notify> {
        Arc::clone(&self.wake)
    }

    pub async fn notified(&self) {
        self.wake.notified().await;
    }
}

impl fmt::Debug for FlowEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowEnvironment")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Pump `coordinator` until it finishes, sleeping on the tree's wake
/// signal in between.
pub async fn drive<C>(coordinator: &mut C, env: &FlowEnvironment)
where
    C: FlowCoordinator + ?Sized,
{
    loop {
        coordinator.process_pending();
        if coordinator.is_finished() {
            break;
        }
        env.notified().await;
    }
}
