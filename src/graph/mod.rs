//! The assistant/tools state machine.

pub mod runner;
pub mod state;

pub use runner::{TravelGraph, ASSISTANT_SYSTEM_PROMPT};
pub use state::{route, GraphState};
