use std::collections::BTreeMap;

use crate::http_client::HttpRequest;
use crate::registry::{EndpointId, EndpointSpec, ProviderProfile, Registry};
use crate::{ProviderId, StatsError, ValidationError};

/// Caller-supplied query parameters.
pub type Parameters = BTreeMap<String, String>;

/// Fully resolved request target for one endpoint on one mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsRequest {
    pub endpoint: EndpointId,
    pub provider: ProviderId,
    /// Merged parameters in wire order.
    pub params: Vec<(String, String)>,
    pub url: String,
    pub headers: BTreeMap<String, String>,
}

impl StatsRequest {
    pub fn to_http(&self, timeout_ms: u64) -> HttpRequest {
        self.headers
            .iter()
            .fold(HttpRequest::get(&self.url), |request, (name, value)| {
                request.with_header(name.as_str(), value.as_str())
            })
            .with_timeout_ms(timeout_ms)
    }
}

/// Resolves an endpoint name, provider hint and parameters into a [`StatsRequest`].
///
/// Checks run in a fixed order: unknown endpoint, missing required
/// parameters, then the unsupported ends-with search.
pub fn build_request(
    registry: &Registry,
    endpoint: &str,
    provider: Option<&str>,
    params: &Parameters,
) -> Result<StatsRequest, StatsError> {
    let spec = registry.endpoint_by_name(endpoint)?;
    let provider = registry
        .provider(ProviderId::resolve(provider))
        .or_else(|| registry.provider(ProviderId::DEFAULT))
        .ok_or_else(|| StatsError::source("no provider profiles registered"))?;

    build_for(spec, provider, params)
}

/// Same as [`build_request`] for an already resolved endpoint and provider.
pub fn build_for(
    spec: &EndpointSpec,
    provider: &ProviderProfile,
    params: &Parameters,
) -> Result<StatsRequest, StatsError> {
    validate_params(spec, params)?;

    let merged = merge_params(spec, params);
    let query = merged
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    let mut url = format!("{}{}", provider.base_url, spec.path);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }

    let headers = provider
        .headers
        .iter()
        .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
        .collect();

    Ok(StatsRequest {
        endpoint: spec.id,
        provider: provider.id,
        params: merged,
        url,
        headers,
    })
}

fn validate_params(spec: &EndpointSpec, params: &Parameters) -> Result<(), ValidationError> {
    let missing = spec
        .required_params
        .iter()
        .filter(|name| {
            !params
                .get(**name)
                .is_some_and(|value| !value.trim().is_empty())
        })
        .map(|name| (*name).to_owned())
        .collect::<Vec<_>>();

    if !missing.is_empty() {
        return Err(ValidationError::MissingParameters { names: missing });
    }

    let ends_with_search = params
        .get("where")
        .is_some_and(|value| value.eq_ignore_ascii_case("e"));
    if spec.id == EndpointId::SearchForPlayers && ends_with_search {
        return Err(ValidationError::UnsupportedSearchMode);
    }

    Ok(())
}

/// Endpoint defaults in registry order with caller overrides, then the
/// remaining caller parameters in key order.
fn merge_params(spec: &EndpointSpec, params: &Parameters) -> Vec<(String, String)> {
    let mut merged = spec
        .default_params
        .iter()
        .map(|(key, default)| {
            let value = params.get(*key).map_or(*default, String::as_str);
            ((*key).to_owned(), value.to_owned())
        })
        .collect::<Vec<_>>();

    merged.extend(
        params
            .iter()
            .filter(|(key, _)| {
                !spec
                    .default_params
                    .iter()
                    .any(|(default_key, _)| *default_key == key.as_str())
            })
            .map(|(key, value)| (key.clone(), value.clone())),
    );

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatsErrorKind;

    fn params(pairs: &[(&str, &str)]) -> Parameters {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn rank_lookup_targets_default_provider() {
        let request = build_request(
            &Registry::standard(),
            "getrankinfo",
            None,
            &params(&[("pid", "45006789")]),
        )
        .expect("valid request");

        assert_eq!(request.provider, ProviderId::Bf2hub);
        assert_eq!(
            request.url,
            "http://official.ranking.bf2hub.com/ASP/getrankinfo.aspx?pid=45006789"
        );
        assert_eq!(
            request.headers.get("Host").map(String::as_str),
            Some("BF2web.gamespy.com")
        );
    }

    #[test]
    fn caller_values_override_defaults_in_place() {
        let request = build_request(
            &Registry::standard(),
            "getleaderboard",
            Some("playbf2"),
            &params(&[("id", "commander"), ("pos", "1")]),
        )
        .expect("valid request");

        assert_eq!(
            request.params,
            vec![
                (String::from("type"), String::from("score")),
                (String::from("id"), String::from("commander")),
                (String::from("pos"), String::from("1")),
            ]
        );
        assert_eq!(
            request.url,
            "http://bf2web.playbf2.ru/ASP/getleaderboard.aspx?type=score&id=commander&pos=1"
        );
    }

    #[test]
    fn values_are_percent_encoded() {
        let request = build_request(
            &Registry::standard(),
            "searchforplayers",
            Some("phoenix"),
            &params(&[("nick", "[CLAN] Bob & co")]),
        )
        .expect("valid request");

        assert!(request.url.ends_with("?nick=%5BCLAN%5D%20Bob%20%26%20co"));
    }

    #[test]
    fn blank_required_parameter_is_rejected() {
        let error = build_request(
            &Registry::standard(),
            "getawardsinfo",
            None,
            &params(&[("pid", "   "), ("extra", "1")]),
        )
        .expect_err("must fail");

        assert_eq!(error.kind(), StatsErrorKind::Validation);
        assert!(error.message().contains("pid"));
    }

    #[test]
    fn ends_with_search_is_rejected_even_with_valid_nick() {
        let error = build_request(
            &Registry::standard(),
            "searchforplayers",
            None,
            &params(&[("nick", "bob"), ("where", "E")]),
        )
        .expect_err("must fail");

        assert_eq!(error.kind(), StatsErrorKind::Validation);
        assert!(error.message().contains("where=e"));
    }

    #[test]
    fn where_parameter_is_only_checked_for_search() {
        let request = build_request(
            &Registry::standard(),
            "getrankinfo",
            None,
            &params(&[("pid", "1"), ("where", "e")]),
        );

        assert!(request.is_ok());
    }

    #[test]
    fn unknown_endpoint_wins_over_missing_parameters() {
        let error = build_request(&Registry::standard(), "getfoo", None, &Parameters::new())
            .expect_err("must fail");

        assert_eq!(error.kind(), StatsErrorKind::UnknownSource);
    }

    #[test]
    fn http_request_carries_headers_and_timeout() {
        let request = build_request(
            &Registry::standard(),
            "getrankinfo",
            Some("bf2hub"),
            &params(&[("pid", "1")]),
        )
        .expect("valid request")
        .to_http(1_500);

        assert_eq!(request.timeout_ms, 1_500);
        assert_eq!(
            request.headers.get("user-agent").map(String::as_str),
            Some("GameSpyHTTP/1.0")
        );
        assert_eq!(
            request.headers.get("host").map(String::as_str),
            Some("BF2web.gamespy.com")
        );
    }
}
