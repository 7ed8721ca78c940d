//! Spaceflow Flow - Transition Table Layer
//!
//! This crate defines the **structural** aspects of Spaceflow:
//! - `State` / `Event`: the vocabulary a flow is written in
//! - `TransitionTable`: declarative `(state, event) -> (state, effect)` rows
//! - `StateMachine`: the one generic dispatch function over a table
//! - `Timeline` / `Schematic`: what happened, and what can happen
//!
//! **IMPORTANT**: This layer is Pure Rust - no IO, no Async.

pub mod error;
pub mod machine;
pub mod schematic;
pub mod state;
pub mod timeline;
pub mod transition;

pub use error::TransitionError;
pub use machine::StateMachine;
pub use schematic::{Edge, Node, NodeKind, Schematic};
pub use state::{Event, State};
pub use timeline::{Timeline, TimelineEntry};
pub use transition::{
    Destination, Effect, EventPattern, PayloadRule, StatePattern, Transition, TransitionRow,
    TransitionTable,
};
