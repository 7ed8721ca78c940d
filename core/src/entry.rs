use crate::ids::SpaceHandle;
use serde::{Deserialize, Serialize};

/// How a space flow begins. Fixed at construction, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "space", rename_all = "snake_case")]
pub enum SpaceEntryPoint {
    /// Already joined: show the space screen.
    Space(SpaceHandle),
    /// Just joined elsewhere: show the space with the post-join confirmation.
    JoinedSpace(SpaceHandle),
    /// Not joined yet: show the join screen.
    JoinSpace(SpaceHandle),
}

impl SpaceEntryPoint {
    pub fn space(&self) -> &SpaceHandle {
        match self {
            SpaceEntryPoint::Space(space)
            | SpaceEntryPoint::JoinedSpace(space)
            | SpaceEntryPoint::JoinSpace(space) => space,
        }
    }
}
