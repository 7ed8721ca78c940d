use crate::ids::{RoomId, SpaceHandle, SpaceId, UserId};
use serde::{Deserialize, Serialize};

/// What a flow reports to its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowAction {
    /// A call screen must be presented above the whole flow tree.
    PresentCallScreen(RoomId),
    /// A user-verification sheet must be presented by the app.
    VerifyUser(UserId),
    /// The flow has removed itself and can be released.
    Finished,
}

/// User intents reported by a screen's view-model.
///
/// One vocabulary for all screens; each coordinator handles the subset its
/// screens can produce and logs the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenAction {
    SelectRoom(RoomId),
    SelectSpace(SpaceHandle),
    SelectUnjoinedSpace(SpaceHandle),
    DisplayMembers,
    DisplaySettings,
    DisplayRoles,
    /// Join the space shown on the join screen.
    Join,
    /// Leave the space (the user confirmed on the screen).
    Leave,
    /// The space was left from somewhere else; nothing to call.
    LeftSpace,
    StartCall(RoomId),
    VerifyUser(UserId),
    /// The screen was removed by the user (back gesture, sheet swipe).
    Dismiss,
    /// The screen completed its task.
    Finished,
}

/// Deep-link style routes handed down the coordinator tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppRoute {
    Room(RoomId),
    Space(SpaceId),
    UserProfile(UserId),
    Settings,
}
