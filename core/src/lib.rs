//! Spaceflow Core - Domain Types and Collaborator Contracts
//!
//! Everything a flow coordinator talks to lives behind the traits in this
//! crate: the navigation stack it drives, the space service it waits on, the
//! indicator presenter it reports failures to, and the action sinks it emits
//! through. The coordinators themselves live in `spaceflow-runtime`.
//!
//! **IMPORTANT**: Core never renders and never touches the network.

pub mod action;
pub mod config;
pub mod entry;
pub mod error;
pub mod event;
pub mod ids;
pub mod navigation;
pub mod service;
pub mod telemetry;

pub use action::{AppRoute, FlowAction, ScreenAction};
pub use config::FlowConfig;
pub use entry::SpaceEntryPoint;
pub use error::{ConfigError, SpaceServiceError};
pub use event::{ActionSink, EventSource, FnSink, SharedSink};
pub use ids::{FlowId, RoomId, ScreenId, SpaceHandle, SpaceId, UserId};
pub use navigation::{
    DismissCallback, NavigationLayout, NavigationStack, Presentation, Screen, ScreenKind,
    SelectionReceiver,
};
pub use service::{IndicatorKind, IndicatorPresenter, SpaceService, UserIndicator};

pub mod prelude {
    pub use crate::action::{AppRoute, FlowAction, ScreenAction};
    pub use crate::config::FlowConfig;
    pub use crate::entry::SpaceEntryPoint;
    pub use crate::event::{ActionSink, SharedSink};
    pub use crate::ids::{RoomId, SpaceHandle, SpaceId, UserId};
    pub use crate::navigation::{NavigationStack, Presentation, Screen, ScreenKind};
    pub use crate::service::{IndicatorPresenter, SpaceService};
}
