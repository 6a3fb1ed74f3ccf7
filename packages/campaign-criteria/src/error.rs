//! Typed errors for campaign criterion mutations.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers have to
//! match on each failure kind instead of one opaque error.

use indexmap::IndexMap;
use thiserror::Error;

/// A failure the remote service reported in one of the three known shapes.
///
/// The variants are mutually exclusive. Anything the service raises that fits
/// none of them is an [`UnclassifiedError`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Credentials were missing or rejected
    #[error("authorization failed: {message}")]
    Authorization { message: String },

    /// The call never produced an API-level answer
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service rejected the batch with field-level detail
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ApiError {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Authorization { .. } => "authorization",
            ApiError::Transport(_) => "transport",
            ApiError::Validation(_) => "validation",
        }
    }
}

/// HTTP-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Request could not be sent or its body could not be read
    #[error("request failed: {0}")]
    Request(String),

    /// Non-success status without a recognizable API fault body
    #[error("status {status}: {body}")]
    Status { status: u16, body: String },
}

/// API validation failure carrying the service's violation entries in order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, violations: Vec<FieldViolation>) -> Self {
        Self {
            message: message.into(),
            violations,
        }
    }
}

/// One violation entry: field/value pairs in the order the service sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldViolation(IndexMap<String, String>);

impl FieldViolation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field/value pair.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldViolation {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A service failure outside the known taxonomy. Never reported as one of the
/// [`ApiError`] kinds; it propagates to the process boundary.
#[derive(Debug, Error)]
#[error("unclassified service failure: {0}")]
pub struct UnclassifiedError(#[source] Box<dyn std::error::Error + Send + Sync>);

impl UnclassifiedError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

/// Everything a [`MutationService`](crate::service::MutationService) can fail with.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Unclassified(#[from] UnclassifiedError),
}

impl ServiceError {
    pub fn unclassified(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        ServiceError::Unclassified(UnclassifiedError::new(source))
    }

    /// Split into a reportable [`ApiError`] or the fatal remainder.
    pub fn classify(self) -> std::result::Result<ApiError, UnclassifiedError> {
        match self {
            ServiceError::Api(e) => Ok(e),
            ServiceError::Unclassified(e) => Err(e),
        }
    }
}

impl From<TransportError> for ServiceError {
    fn from(e: TransportError) -> Self {
        ServiceError::Api(e.into())
    }
}

impl From<ValidationError> for ServiceError {
    fn from(e: ValidationError) -> Self {
        ServiceError::Api(e.into())
    }
}

/// Invalid caller input, caught before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("campaign id must not be empty")]
    EmptyCampaignId,

    #[error("invalid placement URL {url:?}: {reason}")]
    InvalidPlacementUrl { url: String, reason: String },
}

/// Failures of the end-to-end build, submit, report run.
///
/// Classified [`ApiError`]s are not here: they are a reported outcome.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("failed to build operations: {0}")]
    Build(#[from] BuildError),

    #[error(transparent)]
    Unclassified(#[from] UnclassifiedError),

    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),
}

/// Result type alias for service calls.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Result type alias for building operations.
pub type BuildResult<T> = std::result::Result<T, BuildError>;
