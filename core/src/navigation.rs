//! Navigation - the stack a coordinator drives but does not implement
//!
//! Coordinators never render. They hand [`Screen`] descriptors to a
//! [`NavigationStack`] and supply dismissal callbacks that feed back into
//! their own inbox.

use crate::action::ScreenAction;
use crate::event::SharedSink;
use crate::ids::{RoomId, ScreenId, SpaceHandle};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;

/// Invoked once when a screen leaves the stack, whoever removed it.
pub type DismissCallback = Box<dyn FnOnce() + Send>;

/// Receives the id of the row the primary screen should highlight.
pub type SelectionReceiver = watch::Receiver<Option<String>>;

/// What a screen shows. Rendering is the host application's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum ScreenKind {
    Space {
        space: SpaceHandle,
    },
    SpaceDetail {
        space: SpaceHandle,
        show_confirmation: bool,
    },
    JoinSpace {
        space: SpaceHandle,
    },
    Room {
        room_id: RoomId,
    },
    Members {
        room_id: RoomId,
    },
    Settings {
        space: SpaceHandle,
    },
    Roles {
        space: SpaceHandle,
    },
}

impl ScreenKind {
    pub fn name(&self) -> &'static str {
        match self {
            ScreenKind::Space { .. } => "space",
            ScreenKind::SpaceDetail { .. } => "space_detail",
            ScreenKind::JoinSpace { .. } => "join_space",
            ScreenKind::Room { .. } => "room",
            ScreenKind::Members { .. } => "members",
            ScreenKind::Settings { .. } => "settings",
            ScreenKind::Roles { .. } => "roles",
        }
    }
}

/// A screen handed to the navigation stack.
///
/// Carries the sink its view-model reports actions through and, for
/// list screens, the selection to highlight.
pub struct Screen {
    id: ScreenId,
    kind: ScreenKind,
    actions: SharedSink<ScreenAction>,
    selection: Option<SelectionReceiver>,
}

impl Screen {
    pub fn new(id: ScreenId, kind: ScreenKind, actions: SharedSink<ScreenAction>) -> Self {
        Self {
            id,
            kind,
            actions,
            selection: None,
        }
    }

    pub fn with_selection(mut self, selection: SelectionReceiver) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn id(&self) -> ScreenId {
        self.id
    }

    pub fn kind(&self) -> &ScreenKind {
        &self.kind
    }

    /// Report a user intent, as the screen's view-model would.
    pub fn send(&self, action: ScreenAction) {
        self.actions.send_action(action);
    }

    /// Currently highlighted row, if this screen tracks one.
    pub fn selected(&self) -> Option<String> {
        self.selection.as_ref().and_then(|rx| rx.borrow().clone())
    }
}

impl fmt::Debug for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Screen")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("tracks_selection", &self.selection.is_some())
            .finish()
    }
}

/// Where a flow places its screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presentation {
    /// Replaces the stack's root.
    Root,
    /// Pushed on top of the stack.
    Push,
    /// Shown in the detail column of a split layout.
    Detail,
    /// Presented modally above the stack.
    Sheet,
}

/// Overall arrangement of the app's navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationLayout {
    /// Single stack (phones).
    #[default]
    Stacked,
    /// Sidebar plus detail column (tablets, desktop).
    Split,
}

/// Minimal stack capability a coordinator depends on.
///
/// Implementations are expected to invoke a screen's dismissal callback
/// whenever that screen leaves the stack, including programmatic pops.
pub trait NavigationStack: Send + Sync {
    fn set_root(&self, screen: Option<Screen>, on_dismiss: Option<DismissCallback>);

    fn push(&self, screen: Screen, animated: bool, on_pop: Option<DismissCallback>);

    fn pop(&self, animated: bool);

    fn set_detail(&self, screen: Option<Screen>, animated: bool);

    fn set_sheet(
        &self,
        screen: Option<Screen>,
        animated: bool,
        on_dismiss: Option<DismissCallback>,
    );
}
