//! Screen flow - a leaf coordinator around a single screen
//!
//! Room, members, settings and roles flows show one screen and report
//! back when it goes away. They still run on a transition table so that
//! misuse (finishing twice, presenting after teardown) is caught the same
//! way it is in composite flows.

use crate::coordinator::{FlowCoordinator, FlowEnvironment};
use crate::inbox::{Inbox, Poster};
use spaceflow_core::{
    AppRoute, FlowAction, FlowId, Presentation, Screen, ScreenAction, ScreenId, ScreenKind,
    SharedSink,
};
use spaceflow_flow::{
    Destination, Event, EventPattern, State, StateMachine, StatePattern, Timeline, Transition,
    TransitionRow, TransitionTable,
};
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenFlowState {
    Initial,
    Presented,
    /// The screen reported completion or the user dismissed it.
    Finished,
    /// Torn down by the parent.
    Dismissed,
}

impl State for ScreenFlowState {
    fn name(&self) -> &'static str {
        match self {
            ScreenFlowState::Initial => "initial",
            ScreenFlowState::Presented => "presented",
            ScreenFlowState::Finished => "finished",
            ScreenFlowState::Dismissed => "dismissed",
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, ScreenFlowState::Finished | ScreenFlowState::Dismissed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenFlowEvent {
    Present,
    /// `on_screen` is false when the user already removed the screen.
    Finish {
        on_screen: bool,
    },
    Clear,
}

impl Event for ScreenFlowEvent {
    fn name(&self) -> &'static str {
        match self {
            ScreenFlowEvent::Present => "present",
            ScreenFlowEvent::Finish { .. } => "finish",
            ScreenFlowEvent::Clear => "clear",
        }
    }
}

type ScreenFlowTable = TransitionTable<ScreenFlowState, ScreenFlowEvent, (), ScreenFlowHost>;

static SCREEN_FLOW_TABLE: LazyLock<Arc<ScreenFlowTable>> = LazyLock::new(|| {
    Arc::new(
        TransitionTable::new("ScreenFlow")
            .row(
                TransitionRow::new(
                    "present",
                    StatePattern::new(&["initial"], |s: &ScreenFlowState| {
                        matches!(s, ScreenFlowState::Initial)
                    }),
                    EventPattern::new("present", |e: &ScreenFlowEvent| {
                        matches!(e, ScreenFlowEvent::Present)
                    }),
                    Destination::new("presented", |_: &ScreenFlowState, _: &ScreenFlowEvent| {
                        ScreenFlowState::Presented
                    }),
                )
                .effect(ScreenFlowHost::present),
            )
            .row(
                TransitionRow::new(
                    "finish",
                    StatePattern::new(&["presented"], |s: &ScreenFlowState| {
                        matches!(s, ScreenFlowState::Presented)
                    }),
                    EventPattern::new("finish", |e: &ScreenFlowEvent| {
                        matches!(e, ScreenFlowEvent::Finish { .. })
                    }),
                    Destination::new("finished", |_: &ScreenFlowState, _: &ScreenFlowEvent| {
                        ScreenFlowState::Finished
                    }),
                )
                .effect(ScreenFlowHost::finish),
            )
            .row(
                TransitionRow::new(
                    "clear",
                    StatePattern::new(&["initial", "presented"], |s: &ScreenFlowState| {
                        matches!(s, ScreenFlowState::Initial | ScreenFlowState::Presented)
                    }),
                    EventPattern::new("clear", |e: &ScreenFlowEvent| {
                        matches!(e, ScreenFlowEvent::Clear)
                    }),
                    Destination::new("dismissed", |_: &ScreenFlowState, _: &ScreenFlowEvent| {
                        ScreenFlowState::Dismissed
                    }),
                )
                .effect(ScreenFlowHost::clear),
            ),
    )
});

#[derive(Debug)]
struct Inbound {
    screen: ScreenId,
    action: ScreenAction,
}

struct ScreenFlowHost {
    kind: ScreenKind,
    presentation: Presentation,
    env: FlowEnvironment,
    outward: SharedSink<FlowAction>,
    poster: Poster<Inbound>,
    screen: Option<ScreenId>,
    animated: bool,
}

impl ScreenFlowHost {
    fn present(&mut self, _: &Transition<ScreenFlowState, ScreenFlowEvent>, _: Option<()>) {
        let id = ScreenId::new();
        let actions = self
            .poster
            .sink(move |action| Inbound { screen: id, action });
        let screen = Screen::new(id, self.kind.clone(), actions);
        let on_dismiss = self.poster.callback(Inbound {
            screen: id,
            action: ScreenAction::Dismiss,
        });
        self.screen = Some(id);

        let nav = &self.env.navigation;
        match self.presentation {
            Presentation::Root => nav.set_root(Some(screen), Some(on_dismiss)),
            Presentation::Push => nav.push(screen, self.animated, Some(on_dismiss)),
            // Detail screens are replaced, never popped by the user.
            Presentation::Detail => nav.set_detail(Some(screen), self.animated),
            Presentation::Sheet => nav.set_sheet(Some(screen), self.animated, Some(on_dismiss)),
        }
    }

    fn finish(&mut self, transition: &Transition<ScreenFlowState, ScreenFlowEvent>, _: Option<()>) {
        if let ScreenFlowEvent::Finish { on_screen: true } = transition.event {
            self.remove_screen();
        }
        self.screen = None;
        self.outward.send_action(FlowAction::Finished);
    }

    fn clear(&mut self, _: &Transition<ScreenFlowState, ScreenFlowEvent>, _: Option<()>) {
        self.remove_screen();
    }

    fn remove_screen(&mut self) {
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
}

/// Coordinator for one screen: presents it, forwards what the screen asks
/// of the app, and reports `Finished` exactly once.
pub struct ScreenFlowCoordinator {
    id: FlowId,
    machine: StateMachine<ScreenFlowState, ScreenFlowEvent, (), ScreenFlowHost>,
    host: ScreenFlowHost,
    inbox: Inbox<Inbound>,
}

impl ScreenFlowCoordinator {
    pub fn new(
        env: FlowEnvironment,
        kind: ScreenKind,
        presentation: Presentation,
        outward: SharedSink<FlowAction>,
    ) -> Self {
        let inbox = Inbox::new(env.wake());
        let machine = StateMachine::new(ScreenFlowState::Initial, Arc::clone(&SCREEN_FLOW_TABLE))
            .with_history_limit(env.config.history_limit);
        let host = ScreenFlowHost {
            kind,
            presentation,
            animated: env.config.animated,
            env,
            outward,
            poster: inbox.poster(),
            screen: None,
        };
        Self {
            id: FlowId::new(),
            machine,
            host,
            inbox,
        }
    }

    pub fn id(&self) -> FlowId {
        self.id
    }

    pub fn kind(&self) -> &ScreenKind {
        &self.host.kind
    }

    pub fn state(&self) -> ScreenFlowState {
        *self.machine.state()
    }

    pub fn timeline(&self) -> &Timeline {
        self.machine.timeline()
    }

    fn fire(&mut self, event: ScreenFlowEvent, animated: bool) {
        self.host.animated = animated;
        self.machine.try_event(&mut self.host, event, None);
    }

    fn handle(&mut self, message: Inbound) {
        if self.state() != ScreenFlowState::Presented || self.host.screen != Some(message.screen) {
            debug!(flow = %self.id, action = ?message.action, "Ignoring stale screen action");
            return;
        }

        let animated = self.host.env.config.animated;
        match message.action {
            ScreenAction::StartCall(room_id) => self
                .host
                .outward
                .send_action(FlowAction::PresentCallScreen(room_id)),
            ScreenAction::VerifyUser(user_id) => self
                .host
                .outward
                .send_action(FlowAction::VerifyUser(user_id)),
            ScreenAction::Dismiss => {
                self.fire(ScreenFlowEvent::Finish { on_screen: false }, animated)
            }
            ScreenAction::Finished => {
                self.fire(ScreenFlowEvent::Finish { on_screen: true }, animated)
            }
            other => warn!(
                flow = %self.id,
                screen = self.host.kind.name(),
                action = ?other,
                "Screen action not handled by a leaf flow"
            ),
        }
    }
}

impl FlowCoordinator for ScreenFlowCoordinator {
    fn start(&mut self, animated: bool) {
        self.fire(ScreenFlowEvent::Present, animated);
    }

    fn handle_app_route(&mut self, route: &AppRoute, _animated: bool) {
        debug!(flow = %self.id, ?route, "Leaf flow has no routes");
    }

    fn clear_route(&mut self, animated: bool) {
        if self.state().is_terminal() {
            return;
        }
        self.fire(ScreenFlowEvent::Clear, animated);
    }

    fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Some(message) = self.inbox.try_next() {
            self.handle(message);
            handled += 1;
        }
        handled
    }

    fn is_finished(&self) -> bool {
        self.state().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spaceflow_core::{FlowConfig, RoomId, UserId};
    use spaceflow_test::{
        NavOp, RecordingIndicators, RecordingNavigationStack, RecordingSink, ScriptedSpaceService,
    };

    struct Fixture {
        nav: Arc<RecordingNavigationStack>,
        outward: Arc<RecordingSink<FlowAction>>,
        flow: ScreenFlowCoordinator,
    }

    fn fixture(presentation: Presentation) -> Fixture {
        let nav = Arc::new(RecordingNavigationStack::new());
        let outward = Arc::new(RecordingSink::new());
        let env = FlowEnvironment::new(
            nav.clone(),
            Arc::new(ScriptedSpaceService::new()),
            Arc::new(RecordingIndicators::new()),
            FlowConfig::default(),
        );
        let flow = ScreenFlowCoordinator::new(
            env,
            ScreenKind::Room {
                room_id: RoomId::new("!room"),
            },
            presentation,
            outward.clone(),
        );
        Fixture { nav, outward, flow }
    }

    #[test]
    fn test_user_pop_finishes_once() {
        let mut f = fixture(Presentation::Push);
        f.flow.start(false);
        assert_eq!(f.flow.state(), ScreenFlowState::Presented);

        f.nav.simulate_user_pop();
        f.flow.process_pending();

        assert_eq!(f.flow.state(), ScreenFlowState::Finished);
        assert_eq!(f.outward.actions(), vec![FlowAction::Finished]);
        assert!(f.nav.stack_kinds().is_empty());
    }

    #[test]
    fn test_screen_finished_removes_screen() {
        let mut f = fixture(Presentation::Sheet);
        f.flow.start(true);
        f.nav.send_to_sheet(ScreenAction::Finished);
        f.flow.process_pending();

        assert!(f.flow.is_finished());
        assert_eq!(f.nav.sheet_kind(), None);
        assert_eq!(f.outward.actions(), vec![FlowAction::Finished]);
    }

    #[test]
    fn test_forwards_app_level_requests() {
        let mut f = fixture(Presentation::Push);
        f.flow.start(false);
        f.nav
            .send_to_top(ScreenAction::StartCall(RoomId::new("!room")));
        f.nav
            .send_to_top(ScreenAction::VerifyUser(UserId::new("@bob:example.org")));
        f.flow.process_pending();

        assert_eq!(
            f.outward.actions(),
            vec![
                FlowAction::PresentCallScreen(RoomId::new("!room")),
                FlowAction::VerifyUser(UserId::new("@bob:example.org")),
            ]
        );
        assert_eq!(f.flow.state(), ScreenFlowState::Presented);
    }

    #[test]
    fn test_clear_route_is_idempotent_and_silent() {
        let mut f = fixture(Presentation::Push);
        f.flow.start(false);
        f.flow.clear_route(false);
        f.flow.clear_route(false);
        f.flow.process_pending();

        assert_eq!(f.flow.state(), ScreenFlowState::Dismissed);
        assert!(f.outward.actions().is_empty());
        assert_eq!(
            f.nav.ops().iter().filter(|op| **op == NavOp::Pop).count(),
            1
        );
    }

    #[test]
    fn test_detail_presentation_is_replaced_not_pushed() {
        let mut f = fixture(Presentation::Detail);
        f.flow.start(false);
        assert!(matches!(f.nav.detail_kind(), Some(ScreenKind::Room { .. })));

        f.flow.clear_route(false);
        assert_eq!(f.nav.detail_kind(), None);
    }

    #[test]
    #[should_panic(expected = "contract violation")]
    fn test_presenting_twice_is_fatal() {
        let mut f = fixture(Presentation::Push);
        f.flow.start(false);
        f.flow.start(false);
    }
}
