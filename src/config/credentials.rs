//! Credential acquisition seam.

use crate::error::Result;

/// Source of a secret typed by the user (input not echoed).
pub trait CredentialPrompt {
    fn prompt_secret(&self, label: &str) -> Result<String>;
}

impl<F> CredentialPrompt for F
where
    F: Fn(&str) -> Result<String>,
{
    fn prompt_secret(&self, label: &str) -> Result<String> {
        self(label)
    }
}
