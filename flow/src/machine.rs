//! StateMachine - Table-Driven Dispatch
//!
//! The machine holds the current state and one shared table. Mutation only
//! happens inside [`StateMachine::try_event`]; reads are synchronous and
//! side-effect free.
//!
//! # Contract
//! - first matching row wins
//! - the destination is assigned *before* the row's effect runs
//! - an event with no row, or without a payload its row requires, is a
//!   contract violation: logged, then the process panics

use crate::error::TransitionError;
use crate::state::{Event, State};
use crate::timeline::Timeline;
use crate::transition::{PayloadRule, Transition, TransitionRow, TransitionTable};
use std::sync::Arc;

/// Generic engine over a [`TransitionTable`].
///
/// `H` is the host passed to effects. Keeping it outside the machine lets a
/// coordinator own both the machine and the context its effects mutate
/// without the two borrowing each other.
pub struct StateMachine<S, E, P, H> {
    state: S,
    table: Arc<TransitionTable<S, E, P, H>>,
    timeline: Timeline,
}

impl<S, E, P, H> StateMachine<S, E, P, H>
where
    S: State,
    E: Event,
{
    pub fn new(initial: S, table: Arc<TransitionTable<S, E, P, H>>) -> Self {
        StateMachine {
            state: initial,
            table,
            timeline: Timeline::new(),
        }
    }

    /// Bound the number of transitions kept for debugging.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.timeline = Timeline::with_limit(limit);
        self
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn table(&self) -> &TransitionTable<S, E, P, H> {
        &self.table
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Row that `event` would take from the current state, ignoring payload rules.
    pub fn lookup(&self, event: &E) -> Result<&TransitionRow<S, E, P, H>, TransitionError> {
        self.table
            .find(&self.state, event)
            .ok_or_else(|| undefined(&self.table, &self.state, event))
    }

    /// Row that `event` would take, with the payload rule applied.
    pub fn check(
        &self,
        event: &E,
        has_payload: bool,
    ) -> Result<&TransitionRow<S, E, P, H>, TransitionError> {
        select(&self.table, &self.state, event, has_payload)
    }

    pub fn can_fire(&self, event: &E, has_payload: bool) -> bool {
        self.check(event, has_payload).is_ok()
    }

    /// Dispatch `event`.
    ///
    /// Returns `true` once the transition and its effect have run. Never
    /// returns `false`: an undeclared move terminates instead.
    pub fn try_event(&mut self, host: &mut H, event: E, payload: Option<P>) -> bool {
        let table = Arc::clone(&self.table);
        let row = match select(&table, &self.state, &event, payload.is_some()) {
            Ok(row) => row,
            Err(err) => contract_violation(err),
        };

        let to = row.destination().resolve(&self.state, &event);
        let from = std::mem::replace(&mut self.state, to.clone());

        tracing::debug!(
            table = table.name(),
            row = row.label(),
            from = ?from,
            to = ?to,
            event = ?event,
            "Transition"
        );
        self.timeline
            .record(from.name(), to.name(), event.name(), row.label());

        let transition = Transition {
            from,
            to,
            event,
            row: row.label(),
        };
        if let Some(effect) = row.effect_fn() {
            let _span = tracing::debug_span!(
                "Dispatch",
                flow.table = table.name(),
                flow.row = row.label()
            )
            .entered();
            effect(host, &transition, payload);
        }
        true
    }
}

impl<S, E, P, H> std::fmt::Debug for StateMachine<S, E, P, H>
where
    S: State,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("table", &self.table.name())
            .field("state", &self.state)
            .field("transitions", &self.timeline.total_recorded())
            .finish()
    }
}

fn select<'t, S, E, P, H>(
    table: &'t TransitionTable<S, E, P, H>,
    state: &S,
    event: &E,
    has_payload: bool,
) -> Result<&'t TransitionRow<S, E, P, H>, TransitionError>
where
    S: State,
    E: Event,
{
    let row = table
        .find(state, event)
        .ok_or_else(|| undefined(table, state, event))?;
    if row.payload_rule() == PayloadRule::Required && !has_payload {
        return Err(TransitionError::MissingPayload {
            table: table.name(),
            row: row.label(),
            state: format!("{state:?}"),
            event: format!("{event:?}"),
        });
    }
    Ok(row)
}

fn undefined<S, E, P, H>(
    table: &TransitionTable<S, E, P, H>,
    state: &S,
    event: &E,
) -> TransitionError
where
    S: State,
    E: Event,
{
    TransitionError::Undefined {
        table: table.name(),
        state: format!("{state:?}"),
        event: format!("{event:?}"),
    }
}

#[cold]
#[track_caller]
fn contract_violation(err: TransitionError) -> ! {
    tracing::error!(error = %err, "Contract violation: undeclared transition");
    panic!("contract violation: {err}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::{Destination, EventPattern, StatePattern};

    #[derive(Debug, Clone, PartialEq)]
    enum Door {
        Closed,
        Open,
        Locked,
        Removed,
    }

    impl State for Door {
        fn name(&self) -> &'static str {
            match self {
                Door::Closed => "closed",
                Door::Open => "open",
                Door::Locked => "locked",
                Door::Removed => "removed",
            }
        }

        fn is_terminal(&self) -> bool {
            matches!(self, Door::Removed)
        }
    }

    #[derive(Debug)]
    enum Action {
        Push,
        Pull,
        Lock,
        Remove,
    }

    impl Event for Action {
        fn name(&self) -> &'static str {
            match self {
                Action::Push => "push",
                Action::Pull => "pull",
                Action::Lock => "lock",
                Action::Remove => "remove",
            }
        }
    }

    #[derive(Default)]
    struct Log {
        entered: Vec<&'static str>,
        code: Option<u32>,
    }

    fn note_entered(log: &mut Log, t: &Transition<Door, Action>, _: Option<u32>) {
        log.entered.push(t.to.name());
    }

    fn store_code(log: &mut Log, _: &Transition<Door, Action>, code: Option<u32>) {
        log.code = code;
    }

    fn door_table() -> Arc<TransitionTable<Door, Action, u32, Log>> {
        Arc::new(
            TransitionTable::new("Door")
                .row(
                    TransitionRow::new(
                        "open",
                        StatePattern::new(&["closed"], |s: &Door| matches!(s, Door::Closed)),
                        EventPattern::new("push", |e: &Action| matches!(e, Action::Push)),
                        Destination::new("open", |_: &Door, _: &Action| Door::Open),
                    )
                    .effect(note_entered),
                )
                .row(TransitionRow::new(
                    "shadowed",
                    StatePattern::new(&["closed"], |s: &Door| matches!(s, Door::Closed)),
                    EventPattern::new("push", |e: &Action| matches!(e, Action::Push)),
                    Destination::new("locked", |_: &Door, _: &Action| Door::Locked),
                ))
                .row(
                    TransitionRow::new(
                        "close",
                        StatePattern::new(&["open"], |s: &Door| matches!(s, Door::Open)),
                        EventPattern::new("pull", |e: &Action| matches!(e, Action::Pull)),
                        Destination::new("closed", |_: &Door, _: &Action| Door::Closed),
                    )
                    .effect(note_entered),
                )
                .row(
                    TransitionRow::new(
                        "lock",
                        StatePattern::new(&["closed"], |s: &Door| matches!(s, Door::Closed)),
                        EventPattern::new("lock", |e: &Action| matches!(e, Action::Lock)),
                        Destination::new("locked", |_: &Door, _: &Action| Door::Locked),
                    )
                    .requires_payload()
                    .effect(store_code),
                )
                .row(TransitionRow::new(
                    "remove",
                    StatePattern::new(&["closed", "open"], |s: &Door| {
                        matches!(s, Door::Closed | Door::Open)
                    }),
                    EventPattern::new("remove", |e: &Action| matches!(e, Action::Remove)),
                    Destination::new("removed", |_: &Door, _: &Action| Door::Removed),
                )),
        )
    }

    #[test]
    fn test_first_matching_row_wins() {
        let mut machine = StateMachine::new(Door::Closed, door_table());
        let mut log = Log::default();

        assert_eq!(
            machine
                .table()
                .matching(&Door::Closed, &Action::Push)
                .count(),
            2
        );
        assert!(machine.try_event(&mut log, Action::Push, None));
        assert_eq!(machine.state(), &Door::Open);
        assert_eq!(log.entered, vec!["open"]);
    }

    #[test]
    fn test_effect_receives_payload() {
        let mut machine = StateMachine::new(Door::Closed, door_table());
        let mut log = Log::default();

        machine.try_event(&mut log, Action::Lock, Some(1234));

        assert_eq!(machine.state(), &Door::Locked);
        assert_eq!(log.code, Some(1234));
    }

    #[test]
    #[should_panic(expected = "no transition in `Door`")]
    fn test_undefined_transition_panics() {
        let mut machine = StateMachine::new(Door::Locked, door_table());
        machine.try_event(&mut Log::default(), Action::Pull, None);
    }

    #[test]
    #[should_panic(expected = "requires a payload")]
    fn test_missing_payload_panics() {
        let mut machine = StateMachine::new(Door::Closed, door_table());
        machine.try_event(&mut Log::default(), Action::Lock, None);
    }

    #[test]
    fn test_lookup_does_not_mutate() {
        let machine = StateMachine::new(Door::Open, door_table());

        assert_eq!(
            machine.lookup(&Action::Pull).map(|r| r.label()),
            Ok("close")
        );
        assert!(matches!(
            machine.lookup(&Action::Lock),
            Err(TransitionError::Undefined { table: "Door", .. })
        ));
        assert!(!machine.can_fire(&Action::Push, false));
        assert_eq!(machine.state(), &Door::Open);
        assert!(machine.timeline().is_empty());
    }

    #[test]
    fn test_every_state_event_pair_resolves_or_errors() {
        let states = [Door::Closed, Door::Open, Door::Locked, Door::Removed];
        let table = door_table();
        for state in states {
            let machine = StateMachine::new(state.clone(), Arc::clone(&table));
            for event in [Action::Push, Action::Pull, Action::Lock, Action::Remove] {
                match machine.check(&event, true) {
                    Ok(row) => assert!(row.matches(&state, &event)),
                    Err(err) => assert!(matches!(err, TransitionError::Undefined { .. })),
                }
            }
        }
    }

    #[test]
    fn test_timeline_tracks_transitions() {
        let mut machine = StateMachine::new(Door::Closed, door_table()).with_history_limit(8);
        let mut log = Log::default();

        machine.try_event(&mut log, Action::Push, None);
        machine.try_event(&mut log, Action::Pull, None);
        machine.try_event(&mut log, Action::Remove, None);

        assert_eq!(machine.timeline().path(), vec!["open", "closed", "removed"]);
        assert_eq!(
            machine.timeline().last().map(|e| e.row.as_str()),
            Some("remove")
        );
        assert!(machine.state().is_terminal());
    }

    #[test]
    fn test_schematic_lists_declared_edges() {
        let schematic = door_table().schematic();

        assert_eq!(schematic.name, "Door");
        assert_eq!(schematic.edges_from("closed").count(), 4);
        assert!(schematic.node("removed").is_some());
        let json = serde_json::to_value(&schematic).unwrap();
        assert_eq!(json["edges"][0]["event"], "push");
    }
}
