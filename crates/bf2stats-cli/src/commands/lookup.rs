use bf2stats_core::{EndpointId, StatsClient, StatsQuery};

use crate::cli::{LeaderboardArgs, PidArgs, PlayerArgs, QueryArgs, SearchArgs};
use crate::error::CliError;

use super::{parse_params, CommandResult};

pub async fn query(args: &QueryArgs, client: &StatsClient) -> Result<CommandResult, CliError> {
    let query = StatsQuery::new(args.endpoint.as_str())
        .with_params(parse_params(&args.params)?)
        .grouped(args.group);
    fetch(&query, client).await
}

pub async fn player(args: &PlayerArgs, client: &StatsClient) -> Result<CommandResult, CliError> {
    let query = StatsQuery::new(EndpointId::GetPlayerInfo.as_str())
        .with_param("pid", args.pid.as_str())
        .grouped(args.group);
    fetch(&query, client).await
}

pub async fn by_pid(
    endpoint: EndpointId,
    args: &PidArgs,
    client: &StatsClient,
) -> Result<CommandResult, CliError> {
    let query = StatsQuery::new(endpoint.as_str()).with_param("pid", args.pid.as_str());
    fetch(&query, client).await
}

pub async fn leaderboard(
    args: &LeaderboardArgs,
    client: &StatsClient,
) -> Result<CommandResult, CliError> {
    let mut query = StatsQuery::new(EndpointId::GetLeaderboard.as_str());
    for (key, value) in [("type", &args.board), ("id", &args.id), ("pos", &args.pos)] {
        if let Some(value) = value {
            query = query.with_param(key, value.as_str());
        }
    }
    fetch(&query, client).await
}

pub async fn search(args: &SearchArgs, client: &StatsClient) -> Result<CommandResult, CliError> {
    if !args.with_ranks {
        let mut query = StatsQuery::new(EndpointId::SearchForPlayers.as_str())
            .with_param("nick", args.nick.as_str());
        if let Some(mode) = &args.match_mode {
            query = query.with_param("where", mode.as_str());
        }
        return fetch(&query, client).await;
    }

    let provider = client.config().default_provider;
    let outcome = client
        .search_with_ranks(&args.nick, args.match_mode.as_deref(), Some(provider))
        .await;
    let result = match outcome {
        Ok(hits) => CommandResult::ok(serde_json::to_value(hits)?),
        Err(error) => CommandResult::failed(error),
    };

    Ok(result
        .with_endpoint(EndpointId::SearchForPlayers)
        .with_provider(provider))
}

async fn fetch(query: &StatsQuery, client: &StatsClient) -> Result<CommandResult, CliError> {
    match client.fetch(query).await {
        Ok(fetched) => Ok(CommandResult::ok(serde_json::to_value(&fetched.result)?)
            .with_endpoint(fetched.endpoint)
            .with_provider(fetched.provider)
            .with_latency(fetched.latency_ms)),
        Err(error) => {
            let mut result = CommandResult::failed(error);
            if let Ok(request) = client.prepare(query) {
                result = result
                    .with_endpoint(request.endpoint)
                    .with_provider(request.provider);
            }
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bf2stats_core::{FixtureHttpClient, StatsErrorKind};

    use super::*;

    fn search_args(match_mode: Option<&str>, with_ranks: bool) -> SearchArgs {
        SearchArgs {
            nick: String::from("bob"),
            match_mode: match_mode.map(str::to_owned),
            with_ranks,
        }
    }

    #[tokio::test]
    async fn ends_with_search_is_rejected_with_or_without_ranks() {
        for with_ranks in [false, true] {
            let http = Arc::new(FixtureHttpClient::new("O\nH\tasof\nD\t1"));
            let client = StatsClient::new(http.clone());

            let result = search(&search_args(Some("e"), with_ranks), &client)
                .await
                .expect("command runs");

            let error = result.data.expect_err("ends-with search is unsupported");
            assert_eq!(error.kind(), StatsErrorKind::Validation, "with_ranks={with_ranks}");
            assert!(http.requests().is_empty(), "with_ranks={with_ranks}");
        }
    }

    #[tokio::test]
    async fn match_mode_reaches_the_mirror_when_ranks_are_requested() {
        let http = Arc::new(FixtureHttpClient::new(
            "O\nH\tasof\nD\t1\nH\tn\tnick\nD\t1\tbob",
        ));
        let client = StatsClient::new(http.clone());

        let result = search(&search_args(Some("a"), true), &client)
            .await
            .expect("command runs");

        assert!(result.data.is_ok());
        let requests = http.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.ends_with("searchforplayers.aspx?nick=bob&where=a"));
    }
}
