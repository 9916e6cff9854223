//! Caller input: the question text and the backend selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// A validated, non-blank question.
///
/// Construction trims surrounding whitespace and rejects empty input, so
/// every `Question` that reaches a collaborator is guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question(String);

impl Question {
    pub fn new(text: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Question cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Question {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Which inference backend answers the question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSelector {
    /// Fast hosted LLM.
    #[default]
    Groq,
    /// Remote custom-model endpoint, slower and subject to cold starts.
    Custom,
}

impl ModelSelector {
    pub const ALL: [Self; 2] = [Self::Groq, Self::Custom];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ModelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelSelector {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "groq" => Ok(Self::Groq),
            "custom" => Ok(Self::Custom),
            other => Err(DomainError::validation(format!(
                "Unknown model '{other}'. Must be one of: groq, custom"
            ))),
        }
    }
}
