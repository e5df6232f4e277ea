use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;
use thiserror::Error;

/// Structured answer for a single natural-language query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSuggestion {
    pub command: String,
    pub explanation: String,
    pub known_command: bool,
    pub os: TargetOs,
}

impl CommandSuggestion {
    /// Canonical "I do not know" value substituted whenever validation fails.
    pub fn fallback() -> Self {
        Self {
            command: String::new(),
            explanation: "I do not know this command".to_string(),
            known_command: false,
            os: TargetOs::Unknown,
        }
    }
}

/// OS family a suggested command applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    Windows,
    Linux,
    #[value(skip)]
    Unknown,
}

impl TargetOs {
    /// OS family of the machine tai is running on.
    pub fn detect() -> Self {
        match std::env::consts::OS {
            "windows" => Self::Windows,
            "linux" => Self::Linux,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure modes of a single advise round trip.
///
/// All three are recoverable: the caller reports the condition and falls back
/// to [`CommandSuggestion::fallback`] instead of surfacing a raw error.
#[derive(Debug, Error)]
pub enum AdviseError {
    #[error("model request failed: {0}")]
    Network(anyhow::Error),

    #[error("model response was not JSON: {0}")]
    Malformed(String),

    #[error("model response violated the schema: {0}")]
    SchemaViolation(String),
}
