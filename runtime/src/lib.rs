//! # Spaceflow Runtime
//!
//! Coordinators that drive navigation for a space-browsing UI: the
//! composite [`SpaceFlowCoordinator`], the single-screen
//! [`ScreenFlowCoordinator`], and the plumbing they share (inboxes, child
//! slots, task scopes, the coordinator factory).

pub mod coordinator;
pub mod factory;
pub mod inbox;
pub mod screen_flow;
pub mod slot;
pub mod space_flow;
pub mod task;

pub mod prelude {
    pub use crate::coordinator::{FlowCoordinator, FlowEnvironment, drive};
    pub use crate::factory::{CoordinatorFactory, StandardCoordinatorFactory};
    pub use crate::screen_flow::ScreenFlowCoordinator;
    pub use crate::slot::ChildKind;
    pub use crate::space_flow::{
        LeafState, SpaceFlowCoordinator, SpaceFlowEvent, SpaceFlowPayload, SpaceFlowState,
    };
}

pub use coordinator::{FlowCoordinator, FlowEnvironment, drive};
pub use factory::{CoordinatorFactory, StandardCoordinatorFactory};
pub use inbox::{Inbox, Poster};
pub use screen_flow::{ScreenFlowCoordinator, ScreenFlowEvent, ScreenFlowState};
pub use slot::{ChildKind, ChildSlot, ChildSlots, SlotToken};
pub use space_flow::{
    LeafState, SpaceFlowCoordinator, SpaceFlowEvent, SpaceFlowPayload, SpaceFlowState,
};
pub use task::TaskScope;
