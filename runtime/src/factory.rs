//! Factory - how composite flows obtain their children
//!
//! A space flow never names a concrete child type. It asks the factory in
//! its environment, which keeps child construction swappable in tests and
//! lets the host decide where each child's screen goes.

use crate::coordinator::{FlowCoordinator, FlowEnvironment};
use crate::screen_flow::ScreenFlowCoordinator;
use crate::space_flow::SpaceFlowCoordinator;
use spaceflow_core::{
    FlowAction, NavigationLayout, Presentation, RoomId, ScreenKind, SharedSink, SpaceEntryPoint,
    SpaceHandle,
};

pub trait CoordinatorFactory: Send + Sync {
    fn space_flow(
        &self,
        env: &FlowEnvironment,
        entry_point: SpaceEntryPoint,
        presentation: Presentation,
        outward: SharedSink<FlowAction>,
    ) -> Box<dyn FlowCoordinator>;

    fn room_flow(
        &self,
        env: &FlowEnvironment,
        room_id: RoomId,
        outward: SharedSink<FlowAction>,
    ) -> Box<dyn FlowCoordinator>;

    fn members_flow(
        &self,
        env: &FlowEnvironment,
        room_id: RoomId,
        outward: SharedSink<FlowAction>,
    ) -> Box<dyn FlowCoordinator>;

    fn settings_flow(
        &self,
        env: &FlowEnvironment,
        space: SpaceHandle,
        outward: SharedSink<FlowAction>,
    ) -> Box<dyn FlowCoordinator>;

    fn roles_flow(
        &self,
        env: &FlowEnvironment,
        space: SpaceHandle,
        outward: SharedSink<FlowAction>,
    ) -> Box<dyn FlowCoordinator>;
}

/// Nested spaces recurse into [`SpaceFlowCoordinator`]; everything else is
/// a single-screen [`ScreenFlowCoordinator`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardCoordinatorFactory;

impl CoordinatorFactory for StandardCoordinatorFactory {
    fn space_flow(
        &self,
        env: &FlowEnvironment,
        entry_point: SpaceEntryPoint,
        presentation: Presentation,
        outward: SharedSink<FlowAction>,
    ) -> Box<dyn FlowCoordinator> {
        Box::new(SpaceFlowCoordinator::new(
            env.clone(),
            entry_point,
            presentation,
            outward,
        ))
    }

    fn room_flow(
        &self,
        env: &FlowEnvironment,
        room_id: RoomId,
        outward: SharedSink<FlowAction>,
    ) -> Box<dyn FlowCoordinator> {
        // Split layouts keep the space list visible beside the room.
        let presentation = match env.config.layout {
            NavigationLayout::Split => Presentation::Detail,
            NavigationLayout::Stacked => Presentation::Push,
        };
        Box::new(ScreenFlowCoordinator::new(
            env.clone(),
            ScreenKind::Room { room_id },
            presentation,
            outward,
        ))
    }

    fn members_flow(
        &self,
        env: &FlowEnvironment,
        room_id: RoomId,
        outward: SharedSink<FlowAction>,
    ) -> Box<dyn FlowCoordinator> {
        Box::new(ScreenFlowCoordinator::new(
            env.clone(),
            ScreenKind::Members { room_id },
            Presentation::Push,
            outward,
        ))
    }

    fn settings_flow(
        &self,
        env: &FlowEnvironment,
        space: SpaceHandle,
        outward: SharedSink<FlowAction>,
    ) -> Box<dyn FlowCoordinator> {
        Box::new(ScreenFlowCoordinator::new(
            env.clone(),
            ScreenKind::Settings { space },
            Presentation::Push,
            outward,
        ))
    }

    fn roles_flow(
        &self,
        env: &FlowEnvironment,
        space: SpaceHandle,
        outward: SharedSink<FlowAction>,
    ) -> Box<dyn FlowCoordinator> {
        Box::new(ScreenFlowCoordinator::new(
            env.clone(),
            ScreenKind::Roles { space },
            Presentation::Sheet,
            outward,
        ))
    }
}
