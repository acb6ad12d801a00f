//! Core types for Wayfinder.

pub mod message;
pub mod usage;
pub mod generation;

pub use message::*;
pub use usage::*;
pub use generation::*;
