use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::{EndpointId, ProviderId, StatsError, StatsErrorKind};

/// Response wrapper handed to callers. Carries either data or errors, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<StatsErrorKind>,
}

impl<T> Envelope<T> {
    pub fn success(meta: EnvelopeMeta, data: T) -> Self {
        Self {
            meta,
            data: Some(data),
            errors: Vec::new(),
            error_kind: None,
        }
    }

    pub fn failure(meta: EnvelopeMeta, error: &StatsError) -> Self {
        Self {
            meta,
            data: None,
            errors: error.to_payload().errors,
            error_kind: Some(error.kind()),
        }
    }

    pub fn from_result(meta: EnvelopeMeta, result: Result<T, StatsError>) -> Self {
        match result {
            Ok(data) => Self::success(meta, data),
            Err(error) => Self::failure(meta, &error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.data.is_some()
    }
}

/// Metadata attached to every envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    pub generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<EndpointId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_chain: Vec<ProviderId>,
    pub cache_control: String,
    pub latency_ms: u64,
}

impl EnvelopeMeta {
    pub fn new(request_id: impl Into<String>, cache_control: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            generated_at: now_rfc3339(),
            endpoint: None,
            provider: None,
            source_chain: Vec::new(),
            cache_control: cache_control.into(),
            latency_ms: 0,
        }
    }

    pub fn with_endpoint(mut self, endpoint: EndpointId) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn with_provider(mut self, provider: ProviderId) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_source_chain(mut self, source_chain: Vec<ProviderId>) -> Self {
        self.source_chain = source_chain;
        self
    }

    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}
