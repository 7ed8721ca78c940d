//! Transition - Declarative State Transition Rows
//!
//! A flow is described once, as data: an ordered list of rows, each saying
//! "in a state like this, on an event like that, go there and run this".
//! The first row whose patterns both match wins. There is no default row.
//!
//! # Philosophy
//! > Table = the complete list of legal moves
//!
//! Because every legal move is written down, anything else is a bug in the
//! caller, and the engine treats it that way.

use crate::schematic::Schematic;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side effect attached to a row.
///
/// Runs after the destination state has been assigned. `H` is the host the
/// machine is embedded in (usually a coordinator's context); `P` is the
/// optional payload passed alongside the event.
pub type Effect<S, E, P, H> = fn(&mut H, &Transition<S, E>, Option<P>);

/// Matches a set of source states.
///
/// `labels` names the states the predicate accepts; they only feed
/// diagnostics and the schematic, matching is done by `matches`.
pub struct StatePattern<S> {
    labels: &'static [&'static str],
    matches: fn(&S) -> bool,
}

impl<S> StatePattern<S> {
    pub const fn new(labels: &'static [&'static str], matches: fn(&S) -> bool) -> Self {
        StatePattern { labels, matches }
    }

    pub fn labels(&self) -> &'static [&'static str] {
        self.labels
    }

    pub fn matches(&self, state: &S) -> bool {
        (self.matches)(state)
    }
}

/// Matches one event variant (optionally constrained on its fields).
pub struct EventPattern<E> {
    label: &'static str,
    matches: fn(&E) -> bool,
}

impl<E> EventPattern<E> {
    pub const fn new(label: &'static str, matches: fn(&E) -> bool) -> Self {
        EventPattern { label, matches }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn matches(&self, event: &E) -> bool {
        (self.matches)(event)
    }
}

/// Computes the destination from the current state and the event.
///
/// Most rows return a fixed state; "return to where we came from" rows read
/// it out of the current (composite) state.
pub struct Destination<S, E> {
    label: &'static str,
    resolve: fn(&S, &E) -> S,
}

impl<S, E> Destination<S, E> {
    pub const fn new(label: &'static str, resolve: fn(&S, &E) -> S) -> Self {
        Destination { label, resolve }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn resolve(&self, state: &S, event: &E) -> S {
        (self.resolve)(state, event)
    }
}

/// Whether a row can be taken without a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PayloadRule {
    #[default]
    Optional,
    Required,
}

/// One row of a transition table.
pub struct TransitionRow<S, E, P, H> {
    label: &'static str,
    source: StatePattern<S>,
    event: EventPattern<E>,
    destination: Destination<S, E>,
    payload: PayloadRule,
    effect: Option<Effect<S, E, P, H>>,
}

impl<S, E, P, H> TransitionRow<S, E, P, H> {
    pub fn new(
        label: &'static str,
        source: StatePattern<S>,
        event: EventPattern<E>,
        destination: Destination<S, E>,
    ) -> Self {
        TransitionRow {
            label,
            source,
            event,
            destination,
            payload: PayloadRule::Optional,
            effect: None,
        }
    }

    /// Refuse this row when no payload accompanies the event.
    pub fn requires_payload(mut self) -> Self {
        self.payload = PayloadRule::Required;
        self
    }

    /// Attach the side effect run after the state is assigned.
    pub fn effect(mut self, effect: Effect<S, E, P, H>) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn source(&self) -> &StatePattern<S> {
        &self.source
    }

    pub fn event(&self) -> &EventPattern<E> {
        &self.event
    }

    pub fn destination(&self) -> &Destination<S, E> {
        &self.destination
    }

    pub fn payload_rule(&self) -> PayloadRule {
        self.payload
    }

    pub fn has_effect(&self) -> bool {
        self.effect.is_some()
    }

    pub(crate) fn effect_fn(&self) -> Option<Effect<S, E, P, H>> {
        self.effect
    }

    /// Structural match on both patterns (payload rules are checked later).
    pub fn matches(&self, state: &S, event: &E) -> bool {
        self.source.matches(state) && self.event.matches(event)
    }
}

impl<S, E, P, H> fmt::Debug for TransitionRow<S, E, P, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionRow")
            .field("label", &self.label)
            .field("from", &self.source.labels)
            .field("event", &self.event.label)
            .field("to", &self.destination.label)
            .field("payload", &self.payload)
            .field("has_effect", &self.effect.is_some())
            .finish()
    }
}

/// The record of one transition, handed to effects and kept in the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S, E> {
    pub from: S,
    pub to: S,
    pub event: E,
    pub row: &'static str,
}

/// An ordered, named list of rows.
///
/// ## Example
///
/// ```rust,ignore
/// let table = TransitionTable::new("Door")
///     .row(TransitionRow::new(
///         "open",
///         StatePattern::new(&["closed"], |s| matches!(s, Door::Closed)),
///         EventPattern::new("push", |_| true),
///         Destination::new("open", |_, _| Door::Open),
///     ))
///     .row(/* ... */);
/// ```
pub struct TransitionTable<S, E, P, H> {
    name: &'static str,
    rows: Vec<TransitionRow<S, E, P, H>>,
}

impl<S, E, P, H> TransitionTable<S, E, P, H> {
    pub fn new(name: &'static str) -> Self {
        TransitionTable {
            name,
            rows: Vec::new(),
        }
    }

    /// Append a row. Declaration order is evaluation order.
    pub fn row(mut self, row: TransitionRow<S, E, P, H>) -> Self {
        self.rows.push(row);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rows(&self) -> &[TransitionRow<S, E, P, H>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row matching `(state, event)`.
    pub fn find(&self, state: &S, event: &E) -> Option<&TransitionRow<S, E, P, H>> {
        self.rows.iter().find(|row| row.matches(state, event))
    }

    /// Every row matching `(state, event)`, in declaration order.
    ///
    /// Only the first one is ever taken; the rest are shadowed.
    pub fn matching<'a>(
        &'a self,
        state: &'a S,
        event: &'a E,
    ) -> impl Iterator<Item = &'a TransitionRow<S, E, P, H>> + 'a {
        self.rows
            .iter()
            .filter(move |row| row.matches(state, event))
    }

    /// Static view of the table for visualization and review.
    pub fn schematic(&self) -> Schematic {
        Schematic::from_rows(self.name, &self.rows)
    }
}

impl<S, E, P, H> fmt::Debug for TransitionTable<S, E, P, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionTable")
            .field("name", &self.name)
            .field("rows", &self.rows)
            .finish()
    }
}
