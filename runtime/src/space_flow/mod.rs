//! Space Flow - browsing one space and everything opened from it
//!
//! A `SpaceFlowCoordinator` shows a space (or the screen to join it),
//! opens child flows for rooms, nested spaces, members, settings and roles,
//! and tears itself down when the user leaves or backs out.
//!
//! # Philosophy
//! > One table, one dispatch, one inbox.
//!
//! Every state change goes through the `SpaceFlow` transition table via
//! [`StateMachine::try_event`]. User input, child reports and service
//! completions arrive as inbox messages; nothing re-enters a transition
//! while another one is running.

mod host;
mod state;
mod table;


pub use state::{LeafState, SpaceFlowEvent, SpaceFlowPayload, SpaceFlowState};

use crate::coordinator::{FlowCoordinator, FlowEnvironment};
use crate::inbox::Inbox;
use crate::slot::{ChildKind, ChildSlots, SlotToken};
use crate::task::TaskScope;
use host::{Inbound, PendingOperation, SpaceFlowHost, TaskOutcome};
use spaceflow_core::{
    AppRoute, FlowAction, FlowId, Presentation, ScreenAction, SelectionReceiver, SharedSink,
    SpaceEntryPoint, SpaceHandle, UserIndicator,
};
use spaceflow_flow::{Schematic, State, StateMachine, Timeline};
use std::sync::Arc;
use table::SPACE_FLOW_TABLE;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

const JOINING_INDICATOR: &str = "space-flow.joining";
const LEAVING_INDICATOR: &str = "space-flow.leaving";
const JOIN_FAILED_INDICATOR: &str = "space-flow.join-failed";
const LEAVE_FAILED_INDICATOR: &str = "space-flow.leave-failed";

pub struct SpaceFlowCoordinator {
    machine: StateMachine<SpaceFlowState, SpaceFlowEvent, SpaceFlowPayload, SpaceFlowHost>,
    host: SpaceFlowHost,
    inbox: Inbox<Inbound>,
}

impl SpaceFlowCoordinator {
    pub fn new(
        env: FlowEnvironment,
        entry_point: SpaceEntryPoint,
        presentation: Presentation,
        outward: SharedSink<FlowAction>,
    ) -> Self {
        let inbox = Inbox::new(env.wake());
        let machine = StateMachine::new(SpaceFlowState::Initial, Arc::clone(&SPACE_FLOW_TABLE))
            .with_history_limit(env.config.history_limit);
        let (selection, _) = watch::channel(None);
        let tasks = match env.runtime() {
            Some(runtime) => TaskScope::new().with_runtime(runtime.clone()),
            None => TaskScope::new(),
        };
        let host = SpaceFlowHost {
            id: FlowId::new(),
            entry_point,
            presentation,
            animated: env.config.animated,
            env,
            outward,
            poster: inbox.poster(),
            screen: None,
            selection,
            slots: ChildSlots::new(),
            tasks,
            pending: None,
        };
        debug!(
            flow = %host.id,
            space = %host.entry_point.space().id(),
            ?presentation,
            "Space flow created"
        );
        Self {
            machine,
            host,
            inbox,
        }
    }

    pub fn id(&self) -> FlowId {
        self.host.id
    }

    pub fn entry_point(&self) -> &SpaceEntryPoint {
        &self.host.entry_point
    }

    pub fn space(&self) -> &SpaceHandle {
        self.host.entry_point.space()
    }

    pub fn state(&self) -> &SpaceFlowState {
        self.machine.state()
    }

    pub fn timeline(&self) -> &Timeline {
        self.machine.timeline()
    }

    /// The transition table every space flow runs on.
    pub fn schematic() -> Schematic {
        SPACE_FLOW_TABLE.schematic()
    }

    /// Id of the item the primary screen highlights, as a watch receiver.
    pub fn selection(&self) -> SelectionReceiver {
        self.host.selection.subscribe()
    }

    pub fn occupied_slots(&self) -> usize {
        self.host.slots.occupied_count()
    }

    /// Kind and target of the live child, if any.
    pub fn active_child(&self) -> Option<(ChildKind, &str)> {
        self.host
            .slots
            .active()
            .and_then(|slot| slot.target().map(|target| (slot.kind(), target)))
    }

    pub fn has_pending_operation(&self) -> bool {
        self.host.pending.is_some()
    }

    /// Dispatch `event` directly, with the configured animation default.
    ///
    /// Panics if the table has no row for it from the current state, or
    /// the row needs a payload and none was given.
    pub fn fire(&mut self, event: SpaceFlowEvent, payload: Option<SpaceFlowPayload>) -> bool {
        let animated = self.host.env.config.animated;
        self.fire_animated(event, payload, animated)
    }

    fn fire_animated(
        &mut self,
        event: SpaceFlowEvent,
        payload: Option<SpaceFlowPayload>,
        animated: bool,
    ) -> bool {
        self.host.animated = animated;
        self.machine.try_event(&mut self.host, event, payload)
    }

    /// Process messages until this flow finishes.
    pub async fn run(&mut self) {
        let env = self.host.env.clone();
        crate::coordinator::drive(self, &env).await;
    }

    /// Unwind the live child (if any) back to the leaf screen.
    fn collapse_children(&mut self, animated: bool) {
        while let Some(kind) = self.state().active_child() {
            self.fire_animated(SpaceFlowEvent::stop(kind), None, animated);
        }
    }

    /// Whether a child of `kind` may start now. UI requests that race a
    /// transition are dropped here rather than reaching the table.
    fn admit(&self, kind: ChildKind) -> bool {
        if self.host.slots.get(kind).is_occupied() {
            warn!(flow = %self.id(), kind = %kind, "Child flow already presented, ignoring");
            return false;
        }
        if let Some(active) = self.state().active_child() {
            warn!(
                flow = %self.id(),
                kind = %kind,
                active = %active,
                "Another child flow is presented, ignoring"
            );
            return false;
        }
        if !self.state().is_browsing() {
            warn!(
                flow = %self.id(),
                kind = %kind,
                state = self.state().name(),
                "Not browsing, ignoring child flow request"
            );
            return false;
        }
        true
    }

    fn handle(&mut self, message: Inbound) {
        if self.state().is_terminal() {
            debug!(flow = %self.id(), ?message, "Flow torn down, dropping message");
            return;
        }
        match message {
            Inbound::Screen { screen, action } => {
                if self.host.screen != Some(screen) {
                    debug!(flow = %self.id(), ?action, "Ignoring action from a replaced screen");
                    return;
                }
                self.handle_screen_action(action);
            }
            Inbound::Child { token, action } => self.handle_child_action(token, action),
            Inbound::Task {
                generation,
                outcome,
            } => {
                if !self.host.tasks.is_current(generation) {
                    debug!(flow = %self.id(), ?outcome, "Ignoring stale task completion");
                    return;
                }
                self.handle_task_outcome(outcome);
            }
        }
    }

    fn handle_screen_action(&mut self, action: ScreenAction) {
        let animated = self.host.env.config.animated;
        match action {
            ScreenAction::SelectSpace(space) => {
                self.start_child_space(SpaceEntryPoint::Space(space));
            }
            ScreenAction::SelectUnjoinedSpace(space) => {
                self.start_child_space(SpaceEntryPoint::JoinSpace(space));
            }
            ScreenAction::SelectRoom(room_id) => {
                if self.admit(ChildKind::Room) {
                    self.fire(SpaceFlowEvent::StartRoomFlow(room_id), None);
                }
            }
            ScreenAction::DisplayMembers => {
                if self.admit(ChildKind::Members) {
                    let room = self.space().room_id();
                    self.fire(
                        SpaceFlowEvent::StartMembersFlow,
                        Some(SpaceFlowPayload::Room(room)),
                    );
                }
            }
            ScreenAction::DisplaySettings => {
                if self.admit(ChildKind::Settings) {
                    self.fire(SpaceFlowEvent::StartSettingsFlow, None);
                }
            }
            ScreenAction::DisplayRoles => {
                if !self.host.env.config.roles_enabled {
                    warn!(flow = %self.id(), "Roles flow disabled, ignoring");
                } else if self.admit(ChildKind::Roles) {
                    self.fire(SpaceFlowEvent::StartRolesFlow, None);
                }
            }
            ScreenAction::Join => self.join(),
            ScreenAction::Leave => self.leave(),
            ScreenAction::LeftSpace => self.left_space(animated),
            ScreenAction::Dismiss => {
                self.collapse_children(false);
                self.fire_animated(SpaceFlowEvent::Finish, None, animated);
            }
            other => debug!(
                flow = %self.id(),
                action = ?other,
                "Space screens do not produce this action, ignoring"
            ),
        }
    }

    fn start_child_space(&mut self, entry_point: SpaceEntryPoint) {
        if self.admit(ChildKind::Space) {
            let child = entry_point.space().id().clone();
            self.fire(
                SpaceFlowEvent::StartChildFlow(child),
                Some(SpaceFlowPayload::EntryPoint(entry_point)),
            );
        }
    }

    fn handle_child_action(&mut self, token: SlotToken, action: FlowAction) {
        if !self.host.slots.get(token.kind).accepts(token) {
            debug!(flow = %self.id(), ?token, ?action, "Ignoring action from a released child");
            return;
        }
        match action {
            FlowAction::PresentCallScreen(_) | FlowAction::VerifyUser(_) => {
                self.host.outward.send_action(action);
            }
            FlowAction::Finished => {
                self.fire(SpaceFlowEvent::stop(token.kind), None);
            }
        }
    }

    fn join(&mut self) {
        if *self.state() != SpaceFlowState::JoinSpace {
            warn!(flow = %self.id(), state = self.state().name(), "Join outside the join screen, ignoring");
            return;
        }
        if let Some(pending) = self.host.pending {
            warn!(flow = %self.id(), ?pending, "Membership change in flight, ignoring join");
            return;
        }
        self.begin(PendingOperation::Join);
    }

    fn leave(&mut self) {
        if let Some(pending) = self.host.pending {
            warn!(flow = %self.id(), ?pending, "Membership change in flight, ignoring leave");
            return;
        }
        if matches!(self.state(), SpaceFlowState::Initial) {
            warn!(flow = %self.id(), "Leave before start, ignoring");
            return;
        }
        self.begin(PendingOperation::Leave);
    }

    /// Spawn the service call and show its progress indicator.
    fn begin(&mut self, operation: PendingOperation) {
        let spaces = Arc::clone(&self.host.env.spaces);
        let space = self.space().clone();
        let poster = self.host.poster.clone();
        let generation = self.host.tasks.generation();
        let spawned = self.host.tasks.spawn(async move {
            let outcome = match operation {
                PendingOperation::Join => TaskOutcome::Joined(spaces.join_space(&space).await),
                PendingOperation::Leave => TaskOutcome::Left(spaces.leave_space(&space).await),
            };
            poster.post(Inbound::Task {
                generation,
                outcome,
            });
        });

        let name = self.space().name().to_string();
        let indicators = Arc::clone(&self.host.env.indicators);
        match spawned {
            Ok(()) => {
                self.host.pending = Some(operation);
                let title = match operation {
                    PendingOperation::Join => format!("Joining {name}"),
                    PendingOperation::Leave => format!("Leaving {name}"),
                };
                indicators.present(UserIndicator::info(operation.progress_indicator(), title));
            }
            Err(err) => {
                error!(flow = %self.id(), ?operation, error = %err, "No runtime for membership change");
                indicators.present(UserIndicator::error(
                    operation.failure_indicator(),
                    format!("Could not reach the server for {name}"),
                ));
            }
        }
    }

    fn handle_task_outcome(&mut self, outcome: TaskOutcome) {
        if let Some(pending) = self.host.pending.take() {
            self.host
                .env
                .indicators
                .retract(pending.progress_indicator());
        }
        match outcome {
            TaskOutcome::Joined(Ok(())) => {
                if *self.state() != SpaceFlowState::JoinSpace {
                    debug!(flow = %self.id(), state = self.state().name(), "Joined after leaving the join screen");
                    return;
                }
                info!(flow = %self.id(), space = %self.space().id(), "Joined space");
                let show_confirmation = self.host.env.config.post_join_confirmation;
                self.fire(SpaceFlowEvent::JoinedSpace { show_confirmation }, None);
            }
            TaskOutcome::Joined(Err(err)) => {
                warn!(flow = %self.id(), error = %err, "Failed joining space");
                self.host.env.indicators.present(UserIndicator::error(
                    JOIN_FAILED_INDICATOR,
                    format!("Could not join {}: {err}", self.space().name()),
                ));
            }
            TaskOutcome::Left(Ok(())) => {
                info!(flow = %self.id(), space = %self.space().id(), "Left space");
                let animated = self.host.env.config.animated;
                self.left_space(animated);
            }
            TaskOutcome::Left(Err(err)) => {
                warn!(flow = %self.id(), error = %err, "Failed leaving space");
                self.host.env.indicators.present(UserIndicator::error(
                    LEAVE_FAILED_INDICATOR,
                    format!("Could not leave {}: {err}", self.space().name()),
                ));
            }
        }
    }

    fn left_space(&mut self, animated: bool) {
        self.collapse_children(animated);
        if self.state().leaf() == Some(LeafState::Initial) {
            warn!(flow = %self.id(), "Left space before start, ignoring");
            return;
        }
        self.fire_animated(SpaceFlowEvent::LeftSpace, None, animated);
    }
}

impl FlowCoordinator for SpaceFlowCoordinator {
    fn start(&mut self, animated: bool) {
        let event = match self.host.entry_point {
            SpaceEntryPoint::Space(_) => SpaceFlowEvent::Start,
            SpaceEntryPoint::JoinedSpace(_) => SpaceFlowEvent::JoinedSpace {
                show_confirmation: true,
            },
            SpaceEntryPoint::JoinSpace(_) => SpaceFlowEvent::StartUnjoined,
        };
        self.fire_animated(event, None, animated);
    }

    fn handle_app_route(&mut self, route: &AppRoute, animated: bool) {
        debug!(flow = %self.id(), ?route, "Space flows have no routes, returning to the space");
        self.collapse_children(animated);
    }

    fn clear_route(&mut self, animated: bool) {
        if let Some(kind) = self.state().active_child() {
            if let Some(child) = self.host.slots.get_mut(kind).coordinator_mut() {
                child.clear_route(animated);
            }
            self.fire_animated(SpaceFlowEvent::stop(kind), None, animated);
            return self.clear_route(animated);
        }
        if self.state().leaf().is_some() {
            self.fire_animated(SpaceFlowEvent::Dismiss, None, animated);
        }
    }

    fn process_pending(&mut self) -> usize {
        let mut total = 0;
        loop {
            let mut handled = 0;
            for kind in ChildKind::ALL {
                if let Some(child) = self.host.slots.get_mut(kind).coordinator_mut() {
                    handled += child.process_pending();
                }
            }
            while let Some(message) = self.inbox.try_next() {
                self.handle(message);
                handled += 1;
            }
            if handled == 0 {
                return total;
            }
            total += handled;
        }
    }

    fn is_finished(&self) -> bool {
        self.state().is_terminal()
    }
}

impl std::fmt::Debug for SpaceFlowCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpaceFlowCoordinator")
            .field("id", &self.host.id)
            .field("space", self.space().id())
            .field("state", self.state())
            .field("slots", &self.host.slots)
            .finish()
    }
}
