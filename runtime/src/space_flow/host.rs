//! Side effects of the space flow's transitions.
//!
//! Effects run after the destination state is assigned. They drive the
//! navigation stack, fill and empty child slots, and never fire events.

use super::state::{SpaceFlowEvent, SpaceFlowPayload, SpaceFlowState};
use crate::coordinator::{FlowCoordinator, FlowEnvironment};
use crate::inbox::Poster;
use crate::slot::{ChildKind, ChildSlots, SlotToken};
use crate::task::TaskScope;
use spaceflow_core::{
    FlowAction, FlowId, Presentation, Screen, ScreenAction, ScreenId, ScreenKind, SharedSink,
    SpaceEntryPoint, SpaceServiceError,
};
use spaceflow_flow::Transition;
use tokio::sync::watch;
use tracing::{debug, error};

type SpaceTransition = Transition<SpaceFlowState, SpaceFlowEvent>;

/// Messages a space flow's inbox carries.
#[derive(Debug)]
pub(crate) enum Inbound {
    Screen {
        screen: ScreenId,
        action: ScreenAction,
    },
    Child {
        token: SlotToken,
        action: FlowAction,
    },
    Task {
        generation: u64,
        outcome: TaskOutcome,
    },
}

#[derive(Debug)]
pub(crate) enum TaskOutcome {
    Joined(Result<(), SpaceServiceError>),
    Left(Result<(), SpaceServiceError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PendingOperation {
    Join,
    Leave,
}

impl PendingOperation {
    /// Indicator shown while the operation runs.
    pub(crate) fn progress_indicator(self) -> &'static str {
        match self {
            PendingOperation::Join => super::JOINING_INDICATOR,
            PendingOperation::Leave => super::LEAVING_INDICATOR,
        }
    }

    pub(crate) fn failure_indicator(self) -> &'static str {
        match self {
            PendingOperation::Join => super::JOIN_FAILED_INDICATOR,
            PendingOperation::Leave => super::LEAVE_FAILED_INDICATOR,
        }
    }
}

pub(crate) struct SpaceFlowHost {
    pub(crate) id: FlowId,
    pub(crate) entry_point: SpaceEntryPoint,
    pub(crate) presentation: Presentation,
    pub(crate) env: FlowEnvironment,
    pub(crate) outward: SharedSink<FlowAction>,
    pub(crate) poster: Poster<Inbound>,
    /// The flow's own screen, if one is on the stack.
    pub(crate) screen: Option<ScreenId>,
    pub(crate) selection: watch::Sender<Option<String>>,
    pub(crate) slots: ChildSlots,
    pub(crate) tasks: TaskScope,
    pub(crate) pending: Option<PendingOperation>,
    /// Animation flag of the dispatch in progress.
    pub(crate) animated: bool,
}

impl SpaceFlowHost {
    pub(crate) fn present_space(&mut self, _: &SpaceTransition, _: Option<SpaceFlowPayload>) {
        let space = self.entry_point.space().clone();
        self.present_own(ScreenKind::Space { space });
    }

    pub(crate) fn present_join_space(&mut self, _: &SpaceTransition, _: Option<SpaceFlowPayload>) {
        let space = self.entry_point.space().clone();
        self.present_own(ScreenKind::JoinSpace { space });
    }

    pub(crate) fn present_joined_space(
        &mut self,
        transition: &SpaceTransition,
        _: Option<SpaceFlowPayload>,
    ) {
        let space = self.entry_point.space().clone();
        let kind = match transition.to {
            SpaceFlowState::SpaceDetail => ScreenKind::SpaceDetail {
                space,
                show_confirmation: true,
            },
            _ => ScreenKind::Space { space },
        };
        self.present_own(kind);
    }

    pub(crate) fn start_child_flow(
        &mut self,
        transition: &SpaceTransition,
        payload: Option<SpaceFlowPayload>,
    ) {
        let entry_point = match (&transition.event, payload) {
            (
                SpaceFlowEvent::StartChildFlow(child),
                Some(SpaceFlowPayload::EntryPoint(entry_point)),
            ) if entry_point.space().id() == child => entry_point,
            (_, other) => unexpected_payload(transition, other.as_ref()),
        };
        let target = entry_point.space().id().to_string();
        let (token, outward) = self.reserve(ChildKind::Space);
        let child =
            self.env
                .factory
                .space_flow(&self.env, entry_point, Presentation::Push, outward);
        self.install(token, target, child, true);
    }

    pub(crate) fn start_room_flow(
        &mut self,
        transition: &SpaceTransition,
        _: Option<SpaceFlowPayload>,
    ) {
        let SpaceFlowEvent::StartRoomFlow(room_id) = &transition.event else {
            unexpected_event(transition);
        };
        let (token, outward) = self.reserve(ChildKind::Room);
        let child = self
            .env
            .factory
            .room_flow(&self.env, room_id.clone(), outward);
        self.install(token, room_id.to_string(), child, true);
    }

    pub(crate) fn start_members_flow(
        &mut self,
        transition: &SpaceTransition,
        payload: Option<SpaceFlowPayload>,
    ) {
        let room_id = match payload {
            Some(SpaceFlowPayload::Room(room_id)) => room_id,
            other => unexpected_payload(transition, other.as_ref()),
        };
        let (token, outward) = self.reserve(ChildKind::Members);
        let target = room_id.to_string();
        let child = self.env.factory.members_flow(&self.env, room_id, outward);
        self.install(token, target, child, false);
    }

    pub(crate) fn start_settings_flow(&mut self, _: &SpaceTransition, _: Option<SpaceFlowPayload>) {
        let space = self.entry_point.space().clone();
        let (token, outward) = self.reserve(ChildKind::Settings);
        let target = space.id().to_string();
        let child = self.env.factory.settings_flow(&self.env, space, outward);
        self.install(token, target, child, false);
    }

    pub(crate) fn start_roles_flow(&mut self, _: &SpaceTransition, _: Option<SpaceFlowPayload>) {
        let space = self.entry_point.space().clone();
        let (token, outward) = self.reserve(ChildKind::Roles);
        let target = space.id().to_string();
        let child = self.env.factory.roles_flow(&self.env, space, outward);
        self.install(token, target, child, false);
    }

    /// Shared by every `stop*` row: release the child of the kind the
    /// previous state had live.
    pub(crate) fn stop_child(&mut self, transition: &SpaceTransition, _: Option<SpaceFlowPayload>) {
        let Some(kind) = transition.from.active_child() else {
            return;
        };
        match self.slots.get_mut(kind).take() {
            // No-op for a child that already finished on its own.
            Some(mut child) => child.clear_route(self.animated),
            None => debug!(flow = %self.id, kind = %kind, "Child slot already empty"),
        }
        if matches!(kind, ChildKind::Space | ChildKind::Room) {
            self.selection.send_replace(None);
        }
    }

    pub(crate) fn did_leave_space(&mut self, _: &SpaceTransition, _: Option<SpaceFlowPayload>) {
        self.remove_own();
        self.teardown();
        self.outward.send_action(FlowAction::Finished);
    }

    /// The user already popped the screen.
    pub(crate) fn did_finish(&mut self, _: &SpaceTransition, _: Option<SpaceFlowPayload>) {
        self.screen = None;
        self.teardown();
        self.outward.send_action(FlowAction::Finished);
    }

    pub(crate) fn dismiss(&mut self, _: &SpaceTransition, _: Option<SpaceFlowPayload>) {
        self.remove_own();
        self.teardown();
    }

    fn reserve(&self, kind: ChildKind) -> (SlotToken, SharedSink<FlowAction>) {
        let token = self.slots.get(kind).next_token();
        let outward = self
            .poster
            .sink(move |action| Inbound::Child { token, action });
        (token, outward)
    }

    fn install(
        &mut self,
        token: SlotToken,
        target: String,
        mut child: Box<dyn FlowCoordinator>,
        selects: bool,
    ) {
        child.start(self.animated);
        if selects {
            self.selection.send_replace(Some(target.clone()));
        }
        debug!(flow = %self.id, kind = %token.kind, target = %target, "Child flow started");
        self.slots.get_mut(token.kind).fill(token, target, child);
    }

    /// Show (or replace) the flow's own screen.
    fn present_own(&mut self, kind: ScreenKind) {
        let id = ScreenId::new();
        let actions = self
            .poster
            .sink(move |action| Inbound::Screen { screen: id, action });
        let screen = Screen::new(id, kind, actions).with_selection(self.selection.subscribe());
        let on_dismiss = self.poster.callback(Inbound::Screen {
            screen: id,
            action: ScreenAction::Dismiss,
        });
        let replacing = self.screen.replace(id).is_some();

        let nav = &self.env.navigation;
        match self.presentation {
            Presentation::Root => nav.set_root(Some(screen), Some(on_dismiss)),
            Presentation::Push => {
                if replacing {
                    nav.pop(false);
                }
                nav.push(screen, self.animated, Some(on_dismiss));
            }
            Presentation::Detail => nav.set_detail(Some(screen), self.animated),
            Presentation::Sheet => nav.set_sheet(Some(screen), self.animated, Some(on_dismiss)),
        }
    }

    fn remove_own(&mut self) {
        if self.screen.take().is_none() {
            return;
        }
        let nav = &self.env.navigation;
        match self.presentation {
            Presentation::Root => nav.set_root(None, None),
            Presentation::Push => nav.pop(self.animated),
            Presentation::Detail => nav.set_detail(None, self.animated),
            Presentation::Sheet => nav.set_sheet(None, self.animated, None),
        }
    }

    fn teardown(&mut self) {
        self.tasks.cancel_all();
        if let Some(pending) = self.pending.take() {
            self.env.indicators.retract(pending.progress_indicator());
        }
        self.selection.send_replace(None);
    }
}

#[cold]
#[track_caller]
fn unexpected_payload(transition: &SpaceTransition, payload: Option<&SpaceFlowPayload>) -> ! {
    error!(
        row = transition.row,
        event = ?transition.event,
        ?payload,
        "Payload does not fit the transition"
    );
    panic!(
        "contract violation: transition `{}` got payload {:?}",
        transition.row, payload
    );
}

#[cold]
#[track_caller]
fn unexpected_event(transition: &SpaceTransition) -> ! {
    error!(row = transition.row, event = ?transition.event, "Event does not fit the transition");
    panic!(
        "contract violation: transition `{}` fired by {:?}",
        transition.row, transition.event
    );
}
