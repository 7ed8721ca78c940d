use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Protocol room identifier, e.g. `!abc:example.org`.
    RoomId
);
string_id!(
    /// Protocol identifier of a space. Spaces are rooms, so the same string
    /// also addresses the space's own room.
    SpaceId
);
string_id!(
    /// Protocol user identifier, e.g. `@alice:example.org`.
    UserId
);

/// Opaque reference to a space, as handed to a flow by its entry point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpaceHandle {
    id: SpaceId,
    name: String,
}

impl SpaceHandle {
    pub fn new(id: impl Into<SpaceId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> &SpaceId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The room backing this space (members, settings and roles live there).
    pub fn room_id(&self) -> RoomId {
        RoomId::new(self.id.as_str())
    }
}

/// Identity of one coordinator instance, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowId(Uuid);

impl FlowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FlowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one presented screen.
///
/// Dismissal callbacks and screen actions carry it so a coordinator can tell
/// its current screen from one it already replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenId(Uuid);

impl ScreenId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScreenId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_room_shares_the_space_id() {
        let space = SpaceHandle::new("!space:example.org", "Engineering");
        assert_eq!(space.room_id().as_str(), "!space:example.org");
        assert_eq!(space.name(), "Engineering");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&RoomId::new("!room1")).unwrap();
        assert_eq!(json, "\"!room1\"");
        assert_ne!(ScreenId::new(), ScreenId::new());
    }
}
