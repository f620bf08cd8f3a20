use std::collections::HashSet;
use std::time::Instant;

use crate::client::{elapsed_ms, Fetched, StatsClient, StatsQuery};
use crate::{ProviderId, StatsError};

/// Successful lookup after walking a provider chain.
#[derive(Debug, Clone)]
pub struct RouteSuccess {
    pub fetched: Fetched,
    /// Providers tried, in order, ending with the one that answered.
    pub source_chain: Vec<ProviderId>,
    pub failures: Vec<(ProviderId, StatsError)>,
    pub latency_ms: u64,
}

/// Every candidate failed, or a caller-side error stopped the walk.
#[derive(Debug, Clone)]
pub struct RouteFailure {
    pub source_chain: Vec<ProviderId>,
    pub error: StatsError,
    pub latency_ms: u64,
}

impl From<RouteFailure> for StatsError {
    fn from(failure: RouteFailure) -> Self {
        failure.error
    }
}

pub type RouteResult = Result<RouteSuccess, RouteFailure>;

impl StatsClient {
    /// Tries each provider in `chain` until one answers.
    ///
    /// `NotFound` and `SourceError` move on to the next provider. Validation
    /// and unknown-endpoint errors would fail the same way everywhere, so they
    /// end the walk immediately. An empty chain means the configured default.
    pub async fn fetch_with_fallback(&self, query: &StatsQuery, chain: &[ProviderId]) -> RouteResult {
        let started = Instant::now();
        let mut planned = dedupe_chain(chain);
        if planned.is_empty() {
            planned.push(self.config().default_provider);
        }

        let mut source_chain = Vec::with_capacity(planned.len());
        let mut failures: Vec<(ProviderId, StatsError)> = Vec::new();

        for provider in planned {
            source_chain.push(provider);
            let attempt = query.clone().with_provider(provider.as_str());

            match self.fetch(&attempt).await {
                Ok(fetched) => {
                    if !failures.is_empty() {
                        tracing::info!(
                            provider = %provider,
                            failed = failures.len(),
                            "provider fallback succeeded"
                        );
                    }
                    return Ok(RouteSuccess {
                        fetched,
                        source_chain,
                        failures,
                        latency_ms: elapsed_ms(started),
                    });
                }
                Err(error) if error.is_upstream() => {
                    tracing::warn!(provider = %provider, %error, "provider failed, trying next");
                    failures.push((provider, error));
                }
                Err(error) => {
                    return Err(RouteFailure {
                        source_chain,
                        error,
                        latency_ms: elapsed_ms(started),
                    });
                }
            }
        }

        let error = failures
            .pop()
            .map(|(_, error)| error)
            .unwrap_or_else(|| StatsError::source("no provider candidates available"));

        Err(RouteFailure {
            source_chain,
            error,
            latency_ms: elapsed_ms(started),
        })
    }
}

fn dedupe_chain(chain: &[ProviderId]) -> Vec<ProviderId> {
    let mut seen = HashSet::new();
    chain
        .iter()
        .copied()
        .filter(|provider| seen.insert(*provider))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::http_client::FixtureHttpClient;
    use crate::StatsErrorKind;

    const BF2HUB: &str = "http://official.ranking.bf2hub.com/";
    const PLAYBF2: &str = "http://bf2web.playbf2.ru/";

    #[tokio::test]
    async fn not_found_falls_through_to_next_provider() {
        let http = FixtureHttpClient::new("E\t998")
            .with_route(BF2HUB, "E\t998")
            .with_route(PLAYBF2, "O\nH\trank\nD\t7");
        let client = StatsClient::new(Arc::new(http));
        let query = StatsQuery::new("getrankinfo").with_param("pid", "1");

        let route = client
            .fetch_with_fallback(&query, &[ProviderId::Bf2hub, ProviderId::Playbf2])
            .await
            .expect("second provider answers");

        assert_eq!(route.fetched.provider, ProviderId::Playbf2);
        assert_eq!(route.source_chain, vec![ProviderId::Bf2hub, ProviderId::Playbf2]);
        assert_eq!(route.failures.len(), 1);
        assert_eq!(route.failures[0].1.kind(), StatsErrorKind::NotFound);
    }

    #[tokio::test]
    async fn validation_error_stops_the_walk() {
        let http = Arc::new(FixtureHttpClient::new("O\nH\trank\nD\t7"));
        let client = StatsClient::new(http.clone());

        let failure = client
            .fetch_with_fallback(
                &StatsQuery::new("getrankinfo"),
                &[ProviderId::Bf2hub, ProviderId::Playbf2],
            )
            .await
            .expect_err("must fail");

        assert_eq!(failure.error.kind(), StatsErrorKind::Validation);
        assert_eq!(failure.source_chain, vec![ProviderId::Bf2hub]);
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn exhausted_chain_reports_last_error() {
        let http = FixtureHttpClient::new("E\t998").with_failing_route(PLAYBF2, "timeout");
        let client = StatsClient::new(Arc::new(http));
        let query = StatsQuery::new("getrankinfo").with_param("pid", "1");

        let failure = client
            .fetch_with_fallback(&query, &[ProviderId::Bf2hub, ProviderId::Playbf2, ProviderId::Bf2hub])
            .await
            .expect_err("must fail");

        assert_eq!(failure.source_chain, vec![ProviderId::Bf2hub, ProviderId::Playbf2]);
        assert_eq!(failure.error.kind(), StatsErrorKind::Source);
    }

    #[tokio::test]
    async fn empty_chain_uses_default_provider() {
        let http = Arc::new(FixtureHttpClient::new("O\nH\trank\nD\t2"));
        let client = StatsClient::new(http.clone());
        let query = StatsQuery::new("getrankinfo").with_param("pid", "1");

        let route = client
            .fetch_with_fallback(&query, &[])
            .await
            .expect("default provider answers");

        assert_eq!(route.source_chain, vec![ProviderId::Bf2hub]);
    }
}
