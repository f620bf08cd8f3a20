use std::sync::Arc;
use std::time::Instant;

use crate::grouping::group_player;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::normalize::{normalize, DecodedResult, Section};
use crate::protocol::decode_payload;
use crate::registry::{EndpointId, EndpointSpec, Registry};
use crate::request::{build_request, Parameters, StatsRequest};
use crate::{ProviderId, StatsConfig, StatsError, StatsErrorKind};

/// One stats lookup as issued by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsQuery {
    pub endpoint: String,
    /// Provider hint; unknown values fall back to the configured default.
    pub provider: Option<String>,
    pub params: Parameters,
    /// Rebuild weapon/vehicle/class/army records (player info only).
    pub group_values: bool,
}

impl StatsQuery {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_params(mut self, params: Parameters) -> Self {
        self.params.extend(params);
        self
    }

    pub fn grouped(mut self, group_values: bool) -> Self {
        self.group_values = group_values;
        self
    }
}

/// Decoded result together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub endpoint: EndpointId,
    pub provider: ProviderId,
    pub result: DecodedResult,
    pub latency_ms: u64,
}

/// Decodes a raw payload for `spec`. Pure and deterministic.
pub fn decode_response(
    spec: &EndpointSpec,
    raw: &str,
    group_values: bool,
) -> Result<DecodedResult, StatsError> {
    let mut result = normalize(decode_payload(raw)?, spec)?;

    if group_values && spec.id == EndpointId::GetPlayerInfo {
        let grouped = match result.section("player") {
            Some(Section::Single(player)) => Some(group_player(player)),
            Some(Section::Many(rows)) => {
                tracing::warn!(rows = rows.len(), "player section has several rows, not grouping");
                None
            }
            None => None,
        };
        if let Some(grouped) = grouped {
            result.set_grouped(grouped);
        }
    }

    Ok(result)
}

/// Client for the stat mirrors: request building, transport and decoding.
#[derive(Clone)]
pub struct StatsClient {
    registry: &'static Registry,
    http_client: Arc<dyn HttpClient>,
    config: StatsConfig,
}

impl StatsClient {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            registry: Registry::shared(),
            http_client,
            config: StatsConfig::default(),
        }
    }

    /// Real HTTP transport configured from the environment.
    pub fn from_env() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new())).with_config(StatsConfig::from_env())
    }

    pub fn with_config(mut self, config: StatsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_registry(mut self, registry: &'static Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    pub fn registry(&self) -> &'static Registry {
        self.registry
    }

    /// Validates a query and resolves its request target without sending it.
    pub fn prepare(&self, query: &StatsQuery) -> Result<StatsRequest, StatsError> {
        let provider =
            ProviderId::resolve_or(query.provider.as_deref(), self.config.default_provider);
        build_request(
            self.registry,
            &query.endpoint,
            Some(provider.as_str()),
            &query.params,
        )
    }

    /// `decode(endpoint, provider?, parameters)`: fetch and decode in one call.
    pub async fn decode(
        &self,
        endpoint: &str,
        provider: Option<&str>,
        params: &Parameters,
    ) -> Result<DecodedResult, StatsError> {
        let mut query = StatsQuery::new(endpoint).with_params(params.clone());
        query.provider = provider.map(str::to_owned);
        self.fetch(&query).await.map(|fetched| fetched.result)
    }

    pub async fn fetch(&self, query: &StatsQuery) -> Result<Fetched, StatsError> {
        let started = Instant::now();
        let request = self.prepare(query)?;
        let spec = self
            .registry
            .endpoint(request.endpoint)
            .ok_or_else(|| StatsError::unknown_source(request.endpoint.as_str()))?;

        tracing::debug!(
            endpoint = %request.endpoint,
            provider = %request.provider,
            url = %request.url,
            "sending stats request"
        );

        let response = self
            .http_client
            .execute(request.to_http(self.config.timeout_ms))
            .await
            .map_err(|error| {
                tracing::warn!(provider = %request.provider, %error, "transport failure");
                StatsError::from(error)
            })?;

        if !response.is_success() {
            tracing::warn!(
                provider = %request.provider,
                status = response.status,
                "mirror answered with a non-success status"
            );
        }

        let result = decode_response(spec, &response.body, query.group_values).inspect_err(
            |error| {
                if error.kind() == StatsErrorKind::Source {
                    tracing::warn!(endpoint = %request.endpoint, provider = %request.provider, %error, "decode failed");
                }
            },
        )?;

        Ok(Fetched {
            endpoint: request.endpoint,
            provider: request.provider,
            result,
            latency_ms: elapsed_ms(started),
        })
    }
}

pub(crate) fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64
}
