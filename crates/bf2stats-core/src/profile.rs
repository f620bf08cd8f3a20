//! Multi-call views built on top of single lookups.

use serde::Serialize;

use crate::client::{StatsClient, StatsQuery};
use crate::normalize::{DecodedResult, Record, Section};
use crate::registry::EndpointId;
use crate::{ProviderId, StatsError, StatsErrorKind};

/// Providers tried, in order, when a profile is requested without one.
pub const PROFILE_FALLBACK_CHAIN: [ProviderId; 2] = [ProviderId::Bf2hub, ProviderId::Playbf2];

/// Everything a player profile page shows, all from the same mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerProfile {
    pub provider: ProviderId,
    pub source_chain: Vec<ProviderId>,
    pub info: DecodedResult,
    pub rank: DecodedResult,
    pub unlocks: DecodedResult,
    pub awards: DecodedResult,
}

/// A search result row with the player's rank lookup, when one succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub player: Record,
    pub rank: Option<DecodedResult>,
}

impl StatsClient {
    /// Fetches player info, rank, unlocks and awards, one call after another.
    ///
    /// Without an explicit provider the player info lookup walks
    /// [`PROFILE_FALLBACK_CHAIN`]; the remaining calls go to whichever mirror
    /// answered. Any failure aborts the whole profile.
    pub async fn profile(
        &self,
        pid: &str,
        provider: Option<ProviderId>,
    ) -> Result<PlayerProfile, StatsError> {
        let chain = provider.map_or_else(|| PROFILE_FALLBACK_CHAIN.to_vec(), |p| vec![p]);
        let info_query = StatsQuery::new(EndpointId::GetPlayerInfo.as_str())
            .with_param("pid", pid)
            .grouped(true);

        let route = self.fetch_with_fallback(&info_query, &chain).await?;
        let provider = route.fetched.provider;

        let rank = self.fetch_for_player(EndpointId::GetRankInfo, pid, provider).await?;
        let unlocks = self.fetch_for_player(EndpointId::GetUnlocksInfo, pid, provider).await?;
        let awards = self.fetch_for_player(EndpointId::GetAwardsInfo, pid, provider).await?;

        Ok(PlayerProfile {
            provider,
            source_chain: route.source_chain,
            info: route.fetched.result,
            rank,
            unlocks,
            awards,
        })
    }

    /// Searches by nickname, then looks up the rank of every hit.
    ///
    /// `match_mode` is sent as the `where` parameter and validated like any
    /// other search. A rank lookup that fails upstream leaves `rank` empty
    /// for that hit instead of failing the search.
    pub async fn search_with_ranks(
        &self,
        nick: &str,
        match_mode: Option<&str>,
        provider: Option<ProviderId>,
    ) -> Result<Vec<SearchHit>, StatsError> {
        let provider = provider.unwrap_or(self.config().default_provider);
        let mut query = StatsQuery::new(EndpointId::SearchForPlayers.as_str())
            .with_provider(provider.as_str())
            .with_param("nick", nick);
        if let Some(mode) = match_mode {
            query = query.with_param("where", mode);
        }

        let found = self.fetch(&query).await?;
        let players = found
            .result
            .section("players")
            .map(Section::records)
            .unwrap_or_default();

        let mut hits = Vec::with_capacity(players.len());
        for player in players {
            let rank = match player.get("pid") {
                Some(pid) => match self.fetch_for_player(EndpointId::GetRankInfo, pid, provider).await {
                    Ok(rank) => Some(rank),
                    Err(error) if error.kind() == StatsErrorKind::Validation => None,
                    Err(error) if error.is_upstream() => {
                        tracing::warn!(pid, %error, "rank lookup failed for search hit");
                        None
                    }
                    Err(error) => return Err(error),
                },
                None => None,
            };
            hits.push(SearchHit {
                player: player.clone(),
                rank,
            });
        }

        Ok(hits)
    }

    async fn fetch_for_player(
        &self,
        endpoint: EndpointId,
        pid: &str,
        provider: ProviderId,
    ) -> Result<DecodedResult, StatsError> {
        let query = StatsQuery::new(endpoint.as_str())
            .with_provider(provider.as_str())
            .with_param("pid", pid);
        self.fetch(&query).await.map(|fetched| fetched.result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::http_client::FixtureHttpClient;

    #[tokio::test]
    async fn explicit_provider_disables_fallback() {
        let http = Arc::new(FixtureHttpClient::new("E\t998"));
        let client = StatsClient::new(http.clone());

        let error = client
            .profile("42", Some(ProviderId::Phoenix))
            .await
            .expect_err("must fail");

        assert_eq!(error.kind(), StatsErrorKind::NotFound);
        assert_eq!(http.requests().len(), 1);
    }

    #[tokio::test]
    async fn search_hit_without_pid_has_no_rank() {
        let http = Arc::new(FixtureHttpClient::new("O\nH\tasof\nD\t1\nH\tn\tnick\nD\t1\tbob"));
        let client = StatsClient::new(http.clone());

        let hits = client
            .search_with_ranks("bob", None, None)
            .await
            .expect("search succeeds");

        assert_eq!(hits.len(), 1);
        assert!(hits[0].rank.is_none());
        assert_eq!(http.requests().len(), 1);
    }

    #[tokio::test]
    async fn ends_with_search_is_rejected_before_any_lookup() {
        let http = Arc::new(FixtureHttpClient::new("O\nH\tasof\nD\t1\nH\tn\tpid\tnick\nD\t1\t42\tbob"));
        let client = StatsClient::new(http.clone());

        let error = client
            .search_with_ranks("bob", Some("e"), None)
            .await
            .expect_err("ends-with search is unsupported");

        assert_eq!(error.kind(), StatsErrorKind::Validation);
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn search_match_mode_is_sent_to_the_mirror() {
        let http = Arc::new(FixtureHttpClient::new("O\nH\tasof\nD\t1\nH\tn\tnick\nD\t1\tbob"));
        let client = StatsClient::new(http.clone());

        client
            .search_with_ranks("bob", Some("x"), Some(ProviderId::Playbf2))
            .await
            .expect("search succeeds");

        let requests = http.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "http://bf2web.playbf2.ru/ASP/searchforplayers.aspx?nick=bob&where=x"
        );
    }
}
