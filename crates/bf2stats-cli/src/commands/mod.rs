mod lookup;
mod profile;
mod sources;

use std::sync::Arc;

use bf2stats_core::{
    EndpointId, Envelope, EnvelopeMeta, Parameters, ProviderId, ReqwestHttpClient, StatsClient,
    StatsConfig, StatsError, ValidationError,
};
use serde_json::Value;
use uuid::Uuid;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Result<Value, StatsError>,
    pub endpoint: Option<EndpointId>,
    pub provider: Option<ProviderId>,
    pub source_chain: Vec<ProviderId>,
    pub latency_ms: u64,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data: Ok(data),
            endpoint: None,
            provider: None,
            source_chain: Vec::new(),
            latency_ms: 0,
        }
    }

    pub fn failed(error: StatsError) -> Self {
        Self {
            data: Err(error),
            ..Self::ok(Value::Null)
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

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let client = build_client(cli);
    let provider = client.config().default_provider;

    let command_result = match &cli.command {
        Command::Query(args) => lookup::query(args, &client).await?,
        Command::Player(args) => lookup::player(args, &client).await?,
        Command::Rank(args) => lookup::by_pid(EndpointId::GetRankInfo, args, &client).await?,
        Command::Awards(args) => lookup::by_pid(EndpointId::GetAwardsInfo, args, &client).await?,
        Command::Unlocks(args) => {
            lookup::by_pid(EndpointId::GetUnlocksInfo, args, &client).await?
        }
        Command::Leaderboard(args) => lookup::leaderboard(args, &client).await?,
        Command::Search(args) => lookup::search(args, &client).await?,
        Command::Profile(args) => {
            profile::run(args, &client, cli.project.map(ProviderId::from)).await?
        }
        Command::Sources => sources::run(client.registry(), provider)?,
    };

    let CommandResult {
        data,
        endpoint,
        provider,
        source_chain,
        latency_ms,
    } = command_result;

    let mut meta = EnvelopeMeta::new(Uuid::new_v4().to_string(), client.config().cache_control())
        .with_source_chain(source_chain)
        .with_latency_ms(latency_ms);
    if let Some(endpoint) = endpoint {
        meta = meta.with_endpoint(endpoint);
    }
    if let Some(provider) = provider {
        meta = meta.with_provider(provider);
    }

    Ok(Envelope::from_result(meta, data))
}

fn build_client(cli: &Cli) -> StatsClient {
    let mut config = StatsConfig::from_env();
    if let Some(project) = cli.project {
        config = config.with_default_provider(project.into());
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }

    StatsClient::new(Arc::new(ReqwestHttpClient::new())).with_config(config)
}

/// Parses repeated `key=value` arguments.
pub fn parse_params(raw: &[String]) -> Result<Parameters, ValidationError> {
    raw.iter()
        .map(|pair| {
            pair.split_once('=')
                .filter(|(key, _)| !key.trim().is_empty())
                .map(|(key, value)| (key.trim().to_owned(), value.to_owned()))
                .ok_or_else(|| ValidationError::MalformedParameter {
                    value: pair.clone(),
                })
        })
        .collect()
}
