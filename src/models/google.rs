//! Google Gemini model definitions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::ModelCapabilities;

/// Google Gemini models.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
pub enum GoogleModel {
    #[strum(serialize = "gemini-2.5-pro")]
    Gemini25Pro,
    #[strum(serialize = "gemini-2.5-flash")]
    Gemini25Flash,
    #[strum(serialize = "gemini-2.5-flash-lite")]
    Gemini25FlashLite,
    #[strum(serialize = "gemini-2.0-flash")]
    Gemini20Flash,
    /// Any other model id the endpoint accepts.
    #[strum(default)]
    Custom(String),
}

impl Default for GoogleModel {
    fn default() -> Self {
        Self::Gemini25Flash
    }
}

impl GoogleModel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Gemini25Pro => "gemini-2.5-pro",
            Self::Gemini25Flash => "gemini-2.5-flash",
            Self::Gemini25FlashLite => "gemini-2.5-flash-lite",
            Self::Gemini20Flash => "gemini-2.0-flash",
            Self::Custom(s) => s,
        }
    }

    pub fn capabilities(&self) -> ModelCapabilities {
        ModelCapabilities {
            max_output_tokens: Some(65_536),
            ..ModelCapabilities::full(1_000_000)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_and_custom_ids() {
        assert_eq!("gemini-2.5-flash".parse::<GoogleModel>().unwrap(), GoogleModel::Gemini25Flash);
        let custom: GoogleModel = "gemini-exp-1206".parse().unwrap();
        assert_eq!(custom, GoogleModel::Custom("gemini-exp-1206".into()));
        assert_eq!(custom.as_str(), "gemini-exp-1206");
    }

    #[test]
    fn default_is_flash() {
        assert_eq!(GoogleModel::default().as_str(), "gemini-2.5-flash");
    }
}
