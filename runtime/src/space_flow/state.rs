use crate::slot::ChildKind;
use serde::{Deserialize, Serialize};
use spaceflow_core::{RoomId, SpaceEntryPoint, SpaceId};
use spaceflow_flow::{Event, State};

/// States a composite state can return to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafState {
    Initial,
    Space,
    JoinSpace,
    SpaceDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SpaceFlowState {
    Initial,
    /// Primary space screen.
    Space,
    /// Join screen for a space the user is not a member of.
    JoinSpace,
    /// Space screen with the post-join confirmation.
    SpaceDetail,
    PresentingChild {
        child: SpaceId,
        previous: LeafState,
    },
    RoomFlow {
        room: RoomId,
        previous: LeafState,
    },
    MembersFlow {
        previous: LeafState,
    },
    SettingsFlow {
        previous: LeafState,
    },
    RolesFlow {
        previous: LeafState,
    },
    LeftSpace,
    Dismissed,
}

impl SpaceFlowState {
    /// The leaf this state is, if it is one.
    pub fn leaf(&self) -> Option<LeafState> {
        match self {
            SpaceFlowState::Initial => Some(LeafState::Initial),
            SpaceFlowState::Space => Some(LeafState::Space),
            SpaceFlowState::JoinSpace => Some(LeafState::JoinSpace),
            SpaceFlowState::SpaceDetail => Some(LeafState::SpaceDetail),
            _ => None,
        }
    }

    /// The leaf a composite state returns to.
    pub fn previous(&self) -> Option<LeafState> {
        match self {
            SpaceFlowState::PresentingChild { previous, .. }
            | SpaceFlowState::RoomFlow { previous, .. }
            | SpaceFlowState::MembersFlow { previous }
            | SpaceFlowState::SettingsFlow { previous }
            | SpaceFlowState::RolesFlow { previous } => Some(*previous),
            _ => None,
        }
    }

    /// Which child kind this composite state has live.
    pub fn active_child(&self) -> Option<ChildKind> {
        match self {
            SpaceFlowState::PresentingChild { .. } => Some(ChildKind::Space),
            SpaceFlowState::RoomFlow { .. } => Some(ChildKind::Room),
            SpaceFlowState::MembersFlow { .. } => Some(ChildKind::Members),
            SpaceFlowState::SettingsFlow { .. } => Some(ChildKind::Settings),
            SpaceFlowState::RolesFlow { .. } => Some(ChildKind::Roles),
            _ => None,
        }
    }

    /// Leaves a child flow can be started from.
    pub fn is_browsing(&self) -> bool {
        matches!(self, SpaceFlowState::Space | SpaceFlowState::SpaceDetail)
    }
}

impl From<LeafState> for SpaceFlowState {
    fn from(leaf: LeafState) -> Self {
        match leaf {
            LeafState::Initial => SpaceFlowState::Initial,
            LeafState::Space => SpaceFlowState::Space,
            LeafState::JoinSpace => SpaceFlowState::JoinSpace,
            LeafState::SpaceDetail => SpaceFlowState::SpaceDetail,
        }
    }
}

impl State for SpaceFlowState {
    fn name(&self) -> &'static str {
        match self {
            SpaceFlowState::Initial => "initial",
            SpaceFlowState::Space => "space",
            SpaceFlowState::JoinSpace => "joinSpace",
            SpaceFlowState::SpaceDetail => "spaceDetail",
            SpaceFlowState::PresentingChild { .. } => "presentingChild",
            SpaceFlowState::RoomFlow { .. } => "roomFlow",
            SpaceFlowState::MembersFlow { .. } => "membersFlow",
            SpaceFlowState::SettingsFlow { .. } => "settingsFlow",
            SpaceFlowState::RolesFlow { .. } => "rolesFlow",
            SpaceFlowState::LeftSpace => "leftSpace",
            SpaceFlowState::Dismissed => "dismissed",
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, SpaceFlowState::LeftSpace | SpaceFlowState::Dismissed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceFlowEvent {
    Start,
    StartUnjoined,
    JoinedSpace {
        show_confirmation: bool,
    },
    LeftSpace,
    StartChildFlow(SpaceId),
    StopChildFlow,
    StartRoomFlow(RoomId),
    StopRoomFlow,
    StartMembersFlow,
    StopMembersFlow,
    StartSettingsFlow,
    StopSettingsFlow,
    StartRolesFlow,
    StopRolesFlow,
    /// The parent is tearing this flow down.
    Dismiss,
    /// The user removed this flow's screen.
    Finish,
}

impl SpaceFlowEvent {
    pub fn stop(kind: ChildKind) -> Self {
        match kind {
            ChildKind::Space => SpaceFlowEvent::StopChildFlow,
            ChildKind::Room => SpaceFlowEvent::StopRoomFlow,
            ChildKind::Members => SpaceFlowEvent::StopMembersFlow,
            ChildKind::Settings => SpaceFlowEvent::StopSettingsFlow,
            ChildKind::Roles => SpaceFlowEvent::StopRolesFlow,
        }
    }
}

impl Event for SpaceFlowEvent {
    fn name(&self) -> &'static str {
        match self {
            SpaceFlowEvent::Start => "start",
            SpaceFlowEvent::StartUnjoined => "startUnjoined",
            SpaceFlowEvent::JoinedSpace { .. } => "joinedSpace",
            SpaceFlowEvent::LeftSpace => "leftSpace",
            SpaceFlowEvent::StartChildFlow(_) => "startChildFlow",
            SpaceFlowEvent::StopChildFlow => "stopChildFlow",
            SpaceFlowEvent::StartRoomFlow(_) => "startRoomFlow",
            SpaceFlowEvent::StopRoomFlow => "stopRoomFlow",
            SpaceFlowEvent::StartMembersFlow => "startMembersFlow",
            SpaceFlowEvent::StopMembersFlow => "stopMembersFlow",
            SpaceFlowEvent::StartSettingsFlow => "startSettingsFlow",
            SpaceFlowEvent::StopSettingsFlow => "stopSettingsFlow",
            SpaceFlowEvent::StartRolesFlow => "startRolesFlow",
            SpaceFlowEvent::StopRolesFlow => "stopRolesFlow",
            SpaceFlowEvent::Dismiss => "dismiss",
            SpaceFlowEvent::Finish => "finish",
        }
    }
}

/// Data a transition needs beyond the event itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceFlowPayload {
    EntryPoint(SpaceEntryPoint),
    Room(RoomId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_round_trips_through_state() {
        for leaf in [
            LeafState::Initial,
            LeafState::Space,
            LeafState::JoinSpace,
            LeafState::SpaceDetail,
        ] {
            assert_eq!(SpaceFlowState::from(leaf).leaf(), Some(leaf));
        }
    }

    #[test]
    fn test_composites_name_their_child() {
        let state = SpaceFlowState::MembersFlow {
            previous: LeafState::SpaceDetail,
        };
        assert_eq!(state.active_child(), Some(ChildKind::Members));
        assert_eq!(state.previous(), Some(LeafState::SpaceDetail));
        assert_eq!(state.leaf(), None);
        assert!(!state.is_terminal());

        for kind in ChildKind::ALL {
            assert!(SpaceFlowEvent::stop(kind).name().starts_with("stop"));
        }
    }
}
