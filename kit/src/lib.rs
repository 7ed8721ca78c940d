//! Spaceflow facade crate.
//!
//! This crate re-exports the core, flow and runtime crates with a single entry point.
//! Enable `test-doubles` to get the recording collaborators from `spaceflow-test`.

pub use spaceflow_core as core;
pub use spaceflow_flow as flow;
pub use spaceflow_runtime as runtime;
#[cfg(feature = "test-doubles")]
pub use spaceflow_test as test;

pub use spaceflow_core::{FlowConfig, SpaceEntryPoint, telemetry};
pub use spaceflow_flow::{Schematic, StateMachine, Timeline, TransitionTable};
pub use spaceflow_runtime::{FlowCoordinator, FlowEnvironment, SpaceFlowCoordinator};

pub mod prelude {
    pub use spaceflow_core::prelude::*;
    pub use spaceflow_flow::{Event, State};
    pub use spaceflow_runtime::prelude::*;
}
