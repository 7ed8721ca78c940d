//! # Spaceflow Test
//!
//! Doubles for the collaborators a coordinator consumes. Each one records
//! what it was asked to do so tests can assert on navigation, service
//! calls, indicators and outward actions without a UI.

pub mod navigation;
pub mod services;
pub mod sink;

pub use navigation::{NavOp, RecordingNavigationStack};
pub use services::{RecordingIndicators, ScriptedSpaceService};
pub use sink::RecordingSink;
