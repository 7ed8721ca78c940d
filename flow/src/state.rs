//! State and Event - the vocabulary of a flow
//!
//! All navigation flows through enum-defined states that move on
//! enum-defined events. The engine only needs a stable name for each
//! variant (for logs, the timeline and the schematic) and, for states,
//! whether the flow is over.
//!
//! # Example
//! ```rust
//! use spaceflow_flow::{Event, State};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! enum Door {
//!     Closed,
//!     Open,
//!     Removed,
//! }
//!
//! impl State for Door {
//!     fn name(&self) -> &'static str {
//!         match self {
//!             Door::Closed => "closed",
//!             Door::Open => "open",
//!             Door::Removed => "removed",
//!         }
//!     }
//!
//!     fn is_terminal(&self) -> bool {
//!         matches!(self, Door::Removed)
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct Push;
//!
//! impl Event for Push {
//!     fn name(&self) -> &'static str {
//!         "push"
//!     }
//! }
//! ```

use std::fmt::Debug;

/// A state enum that can participate in a transition table.
///
/// States are cloned into transition records, so keep them small: carry
/// identifiers, not resources.
pub trait State: Clone + Debug + PartialEq {
    /// Stable, variant-level name (no payload)
    fn name(&self) -> &'static str;

    /// Whether the flow has ended in this state
    fn is_terminal(&self) -> bool {
        false
    }
}

/// An event enum that can be fed into a state machine.
pub trait Event: Debug {
    /// Stable, variant-level name (no payload)
    fn name(&self) -> &'static str;
}
