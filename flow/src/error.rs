use thiserror::Error;

/// Why an event could not be dispatched.
///
/// These are contract violations: every legal caller path is declared in
/// the table up front, so the engine never recovers from them. They exist
/// as values so lookups can be inspected before they are turned into a
/// panic by [`StateMachine::try_event`](crate::StateMachine::try_event).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("no transition in `{table}` for event {event} from state {state}")]
    Undefined {
        table: &'static str,
        state: String,
        event: String,
    },
    #[error("transition `{row}` in `{table}` requires a payload (event {event}, state {state})")]
    MissingPayload {
        table: &'static str,
        row: &'static str,
        state: String,
        event: String,
    },
}
