use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http_client::HttpError;

/// Caller-input problems detected before any request is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required query string parameter(s): {}", .names.join(", "))]
    MissingParameters { names: Vec<String> },

    #[error("searchforplayers does not support \"endswith\"/\"where=e\" search")]
    UnsupportedSearchMode,

    #[error("invalid provider '{value}', expected one of bf2hub, playbf2, phoenix")]
    InvalidProvider { value: String },

    #[error("parameter '{value}' must be formatted as key=value")]
    MalformedParameter { value: String },
}

/// Classification of a failed stats request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsErrorKind {
    Validation,
    UnknownSource,
    NotFound,
    Source,
}

/// Classified stats error. Exactly one is produced per failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsError {
    kind: StatsErrorKind,
    message: String,
}

impl StatsError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: StatsErrorKind::Validation,
            message: message.into(),
        }
    }

    pub fn unknown_source(endpoint: &str) -> Self {
        Self {
            kind: StatsErrorKind::UnknownSource,
            message: format!("Invalid source provided: '{endpoint}'"),
        }
    }

    pub fn not_found() -> Self {
        Self {
            kind: StatsErrorKind::NotFound,
            message: String::from("Player not found"),
        }
    }

    pub fn source(message: impl Into<String>) -> Self {
        Self {
            kind: StatsErrorKind::Source,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> StatsErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            StatsErrorKind::Validation => "stats.validation",
            StatsErrorKind::UnknownSource => "stats.unknown_source",
            StatsErrorKind::NotFound => "stats.not_found",
            StatsErrorKind::Source => "stats.source_error",
        }
    }

    /// HTTP status a front end should answer with for this classification.
    pub const fn status(&self) -> u16 {
        match self.kind {
            StatsErrorKind::Validation => 422,
            StatsErrorKind::UnknownSource | StatsErrorKind::NotFound => 404,
            StatsErrorKind::Source => 500,
        }
    }

    /// Whether the failure is attributable to the upstream mirror rather than the caller.
    pub const fn is_upstream(&self) -> bool {
        matches!(self.kind, StatsErrorKind::NotFound | StatsErrorKind::Source)
    }

    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            errors: vec![self.message.clone()],
        }
    }
}

impl Display for StatsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for StatsError {}

impl From<ValidationError> for StatsError {
    fn from(error: ValidationError) -> Self {
        Self::validation(error.to_string())
    }
}

impl From<HttpError> for StatsError {
    fn from(error: HttpError) -> Self {
        Self::source(format!("transport error: {}", error.message()))
    }
}

/// List-shaped error body. Always holds a single message today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub errors: Vec<String>,
}
