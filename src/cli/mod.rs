//! Command-line surface for the interactive travel assistant.

pub mod render;
pub mod repl;

use std::path::PathBuf;

use clap::Parser;

use crate::config::{AdvisorConfig, CredentialPrompt};
use crate::error::{Result, WayfinderError};
use crate::util::retry::RetryPolicy;

pub use render::render_message;
pub use repl::run_loop;

/// Interactive travel assistant backed by Google Gemini.
#[derive(Parser, Debug)]
#[command(name = "wayfinder", version, about = "Ask about the weather and things to do anywhere")]
pub struct Cli {
    /// Gemini model id (e.g. gemini-2.5-flash)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Conversation thread to continue
    #[arg(short, long)]
    pub thread_id: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Automatic retries per model call
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Maximum graph steps per turn
    #[arg(long)]
    pub recursion_limit: Option<usize>,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Apply flags on top of an already-loaded config.
    pub fn apply_to(&self, config: &mut AdvisorConfig) -> Result<()> {
        if let Some(model) = &self.model {
            config.model = crate::config::parse_model(model)?;
        }
        if let Some(thread_id) = &self.thread_id {
            config.set_thread_id(thread_id.clone())?;
        }
        if let Some(retries) = self.max_retries {
            config.retry = RetryPolicy::with_max_retries(retries);
        }
        if let Some(limit) = self.recursion_limit {
            config.set_recursion_limit(limit)?;
        }
        Ok(())
    }
}

/// Reads the API key from the terminal without echoing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl CredentialPrompt for TerminalPrompt {
    fn prompt_secret(&self, label: &str) -> Result<String> {
        dialoguer::Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| WayfinderError::Authentication(format!("could not read API key: {e}")))
    }
}
