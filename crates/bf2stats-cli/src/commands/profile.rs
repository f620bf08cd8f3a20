use std::time::Instant;

use bf2stats_core::{EndpointId, ProviderId, StatsClient};

use crate::cli::PidArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(
    args: &PidArgs,
    client: &StatsClient,
    provider: Option<ProviderId>,
) -> Result<CommandResult, CliError> {
    let started = Instant::now();
    let outcome = client.profile(&args.pid, provider).await;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let result = match outcome {
        Ok(profile) => {
            let answered = profile.provider;
            let source_chain = profile.source_chain.clone();
            CommandResult::ok(serde_json::to_value(&profile)?)
                .with_provider(answered)
                .with_source_chain(source_chain)
        }
        Err(error) => CommandResult::failed(error),
    };

    Ok(result
        .with_endpoint(EndpointId::GetPlayerInfo)
        .with_latency(latency_ms))
}
