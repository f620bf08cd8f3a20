use serde::Serialize;

use bf2stats_core::{EndpointId, ProviderId, Registry};

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct ProviderEntry {
    id: ProviderId,
    base_url: &'static str,
    default: bool,
}

#[derive(Debug, Serialize)]
struct EndpointEntry {
    id: EndpointId,
    path: &'static str,
    required_params: &'static [&'static str],
    property_keys: &'static [&'static str],
    force_array: bool,
}

#[derive(Debug, Serialize)]
struct SourcesResponseData {
    providers: Vec<ProviderEntry>,
    endpoints: Vec<EndpointEntry>,
}

pub fn run(registry: &Registry, default_provider: ProviderId) -> Result<CommandResult, CliError> {
    let providers = registry
        .providers()
        .iter()
        .map(|profile| ProviderEntry {
            id: profile.id,
            base_url: profile.base_url,
            default: profile.id == default_provider,
        })
        .collect::<Vec<_>>();

    let endpoints = registry
        .endpoints()
        .iter()
        .map(|spec| EndpointEntry {
            id: spec.id,
            path: spec.path,
            required_params: spec.required_params,
            property_keys: spec.property_keys,
            force_array: spec.force_array,
        })
        .collect::<Vec<_>>();

    let data = serde_json::to_value(SourcesResponseData {
        providers,
        endpoints,
    })?;

    Ok(CommandResult::ok(data).with_provider(default_provider))
}
