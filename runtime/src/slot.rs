//! Child slots - one nullable holder per child flow kind
//!
//! A parent keeps its children in fixed, named slots rather than a
//! collection: at most one child of each kind, and the parent's state says
//! which one (if any) is active. Each occupancy gets a fresh generation so
//! actions from a child that has already been replaced are recognisable.

use crate::coordinator::FlowCoordinator;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildKind {
    Space,
    Room,
    Members,
    Settings,
    Roles,
}

impl ChildKind {
    pub const ALL: [ChildKind; 5] = [
        ChildKind::Space,
        ChildKind::Room,
        ChildKind::Members,
        ChildKind::Settings,
        ChildKind::Roles,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ChildKind::Space => "space",
            ChildKind::Room => "room",
            ChildKind::Members => "members",
            ChildKind::Settings => "settings",
            ChildKind::Roles => "roles",
        }
    }
}

impl fmt::Display for ChildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifies one occupancy of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotToken {
    pub kind: ChildKind,
    pub generation: u64,
}

struct Occupant {
    target: String,
    coordinator: Box<dyn FlowCoordinator>,
}

pub struct ChildSlot {
    kind: ChildKind,
    generation: u64,
    occupant: Option<Occupant>,
}

impl ChildSlot {
    pub fn new(kind: ChildKind) -> Self {
        Self {
            kind,
            generation: 0,
            occupant: None,
        }
    }

    pub fn kind(&self) -> ChildKind {
        self.kind
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Id of whatever the child shows (space id, room id).
    pub fn target(&self) -> Option<&str> {
        self.occupant.as_ref().map(|o| o.target.as_str())
    }

    /// Token the next occupant will be filed under.
    pub fn next_token(&self) -> SlotToken {
        SlotToken {
            kind: self.kind,
            generation: self.generation + 1,
        }
    }

    /// Token of the current occupant.
    pub fn token(&self) -> Option<SlotToken> {
        self.occupant.as_ref().map(|_| SlotToken {
            kind: self.kind,
            generation: self.generation,
        })
    }

    /// Whether `token` names the current occupant.
    pub fn accepts(&self, token: SlotToken) -> bool {
        self.token() == Some(token)
    }

    /// Store a started child. `token` must come from [`next_token`](Self::next_token).
    pub fn fill(
        &mut self,
        token: SlotToken,
        target: impl Into<String>,
        coordinator: Box<dyn FlowCoordinator>,
    ) {
        debug_assert_eq!(token, self.next_token());
        debug_assert!(
            self.occupant.is_none(),
            "{} slot already occupied",
            self.kind
        );
        self.generation = token.generation;
        self.occupant = Some(Occupant {
            target: target.into(),
            coordinator,
        });
    }

    /// Empty the slot, handing back the child for teardown.
    pub fn take(&mut self) -> Option<Box<dyn FlowCoordinator>> {
        self.occupant.take().map(|o| o.coordinator)
    }

    pub fn coordinator_mut(&mut self) -> Option<&mut (dyn FlowCoordinator + 'static)> {
        self.occupant.as_mut().map(|o| o.coordinator.as_mut())
    }
}

impl fmt::Debug for ChildSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildSlot")
            .field("kind", &self.kind)
            .field("generation", &self.generation)
            .field("target", &self.target())
            .finish()
    }
}

/// The five slots a space flow owns.
#[derive(Debug)]
pub struct ChildSlots {
    space: ChildSlot,
    room: ChildSlot,
    members: ChildSlot,
    settings: ChildSlot,
    roles: ChildSlot,
}

impl Default for ChildSlots {
    fn default() -> Self {
        Self::new()
    }
}

impl ChildSlots {
    pub fn new() -> Self {
        Self {
            space: ChildSlot::new(ChildKind::Space),
            room: ChildSlot::new(ChildKind::Room),
            members: ChildSlot::new(ChildKind::Members),
            settings: ChildSlot::new(ChildKind::Settings),
            roles: ChildSlot::new(ChildKind::Roles),
        }
    }

    pub fn get(&self, kind: ChildKind) -> &ChildSlot {
        match kind {
            ChildKind::Space => &self.space,
            ChildKind::Room => &self.room,
            ChildKind::Members => &self.members,
            ChildKind::Settings => &self.settings,
            ChildKind::Roles => &self.roles,
        }
    }

    pub fn get_mut(&mut self, kind: ChildKind) -> &mut ChildSlot {
        match kind {
            ChildKind::Space => &mut self.space,
            ChildKind::Room => &mut self.room,
            ChildKind::Members => &mut self.members,
            ChildKind::Settings => &mut self.settings,
            ChildKind::Roles => &mut self.roles,
        }
    }

    pub fn occupied_count(&self) -> usize {
        ChildKind::ALL
            .iter()
            .filter(|kind| self.get(**kind).is_occupied())
            .count()
    }

    /// The occupied slot, if any.
    pub fn active(&self) -> Option<&ChildSlot> {
        ChildKind::ALL
            .iter()
            .map(|kind| self.get(*kind))
            .find(|slot| slot.is_occupied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spaceflow_core::AppRoute;

    #[derive(Default)]
    struct Idle;

    impl FlowCoordinator for Idle {
        fn start(&mut self, _animated: bool) {}
        fn handle_app_route(&mut self, _route: &AppRoute, _animated: bool) {}
        fn clear_route(&mut self, _animated: bool) {}
        fn process_pending(&mut self) -> usize {
            0
        }
        fn is_finished(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_tokens_are_per_occupancy() {
        let mut slot = ChildSlot::new(ChildKind::Room);
        assert_eq!(slot.token(), None);

        let first = slot.next_token();
        slot.fill(first, "!a", Box::new(Idle));
        assert!(slot.accepts(first));
        assert_eq!(slot.target(), Some("!a"));

        assert!(slot.take().is_some());
        assert!(!slot.accepts(first));

        let second = slot.next_token();
        slot.fill(second, "!b", Box::new(Idle));
        assert_ne!(first, second);
        assert!(!slot.accepts(first));
        assert!(slot.accepts(second));
    }

    #[test]
    fn test_registry_reports_active_slot() {
        let mut slots = ChildSlots::new();
        assert_eq!(slots.occupied_count(), 0);
        assert!(slots.active().is_none());

        let members = slots.get_mut(ChildKind::Members);
        let token = members.next_token();
        members.fill(token, "!room", Box::new(Idle));

        assert_eq!(slots.occupied_count(), 1);
        assert_eq!(slots.active().map(|s| s.kind()), Some(ChildKind::Members));
    }
}
