//! Wayfinder: a conversational travel assistant on Google Gemini.
//!
//! An assistant node talks to the model with two tools declared
//! (`determine_weather` and `activity_recommendation`); a tools node runs
//! whichever one it asks for and feeds the result back. Conversations are
//! kept per thread id in a [`memory::MemoryStore`].
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use wayfinder::prelude::*;
//!
//! # async fn example() -> wayfinder::error::Result<()> {
//! let config = AdvisorConfig::from_env()?;
//! let graph = TravelGraph::from_config(&config, Arc::new(InMemoryStore::new()))?;
//! let conversation = graph.invoke("1", "What should I do in Paris on July 4th?").await?;
//! if let Some(reply) = conversation.last() {
//!     println!("{}", reply.text());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod generation;
pub mod graph;
pub mod memory;
pub mod models;
pub mod prelude;
pub mod provider;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
