//! Domain errors for the question-answering pipeline.
//!
//! Two families reach the caller: validation failures (bad input, 4xx) and
//! upstream failures (a collaborator misbehaved, 5xx). Upstream errors always
//! name the collaborator so it can be logged, even when the caller only sees
//! a generic message.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// External collaborators the pipeline depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collaborator {
    /// Embedding provider (Voyage AI).
    Embedding,
    /// Vector store (Postgres with pgvector).
    VectorStore,
    /// Fast hosted inference backend (Groq).
    Groq,
    /// Remote custom-model backend (Modal).
    Custom,
}

impl Collaborator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Embedding => "embedding",
            Self::VectorStore => "vector_store",
            Self::Groq => "groq",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an upstream call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamFailure {
    /// Connection could not be established or was dropped.
    Unreachable(String),
    /// Collaborator answered with a non-success status.
    Status { code: u16, body: String },
    /// Collaborator answered but the payload was unusable.
    Malformed(String),
    /// No answer within the configured deadline.
    Timeout(Duration),
}

impl fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable(reason) => write!(f, "unreachable: {reason}"),
            Self::Status { code, body } => write!(f, "returned HTTP {code}: {body}"),
            Self::Malformed(reason) => write!(f, "malformed response: {reason}"),
            Self::Timeout(after) => write!(f, "timed out after {}ms", after.as_millis()),
        }
    }
}

/// A failure attributed to a specific collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{collaborator} {failure}")]
pub struct UpstreamError {
    pub collaborator: Collaborator,
    pub failure: UpstreamFailure,
}

impl UpstreamError {
    pub fn unreachable(collaborator: Collaborator, reason: impl Into<String>) -> Self {
        Self {
            collaborator,
            failure: UpstreamFailure::Unreachable(reason.into()),
        }
    }

    pub fn status(collaborator: Collaborator, code: u16, body: impl Into<String>) -> Self {
        Self {
            collaborator,
            failure: UpstreamFailure::Status {
                code,
                body: body.into(),
            },
        }
    }

    pub fn malformed(collaborator: Collaborator, reason: impl Into<String>) -> Self {
        Self {
            collaborator,
            failure: UpstreamFailure::Malformed(reason.into()),
        }
    }

    pub fn timeout(collaborator: Collaborator, after: Duration) -> Self {
        Self {
            collaborator,
            failure: UpstreamFailure::Timeout(after),
        }
    }

    /// Classify a `reqwest` transport error.
    pub fn from_reqwest(collaborator: Collaborator, err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::timeout(collaborator, timeout)
        } else if err.is_decode() {
            Self::malformed(collaborator, err.to_string())
        } else {
            Self::unreachable(collaborator, err.to_string())
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.failure, UpstreamFailure::Timeout(_))
    }
}

/// Errors produced by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Caller input was rejected before any outbound call.
    #[error("{0}")]
    Validation(String),

    /// A collaborator failed; the request was aborted.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }

    /// The collaborator responsible, if this is an upstream failure.
    pub fn collaborator(&self) -> Option<Collaborator> {
        match self {
            Self::Upstream(err) => Some(err.collaborator),
            Self::Validation(_) => None,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_display_names_collaborator() {
        let err = UpstreamError::status(Collaborator::Groq, 503, "overloaded");
        assert_eq!(err.to_string(), "groq returned HTTP 503: overloaded");
    }

    #[test]
    fn test_timeout_display() {
        let err = UpstreamError::timeout(Collaborator::Custom, Duration::from_secs(300));
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "custom timed out after 300000ms");
    }

    #[test]
    fn test_domain_error_classification() {
        let validation = DomainError::validation("Question cannot be empty");
        assert!(validation.is_validation());
        assert_eq!(validation.collaborator(), None);

        let upstream: DomainError =
            UpstreamError::malformed(Collaborator::Embedding, "no vector").into();
        assert!(upstream.is_upstream());
        assert_eq!(upstream.collaborator(), Some(Collaborator::Embedding));
    }

    #[test]
    fn test_upstream_cause_is_reported_once() {
        let err: DomainError = UpstreamError::unreachable(Collaborator::Embedding, "connection refused").into();
        let chained = format!("{:#}", anyhow::Error::from(err));

        assert_eq!(chained, "embedding unreachable: connection refused");
    }
}
