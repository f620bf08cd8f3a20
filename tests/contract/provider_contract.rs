use bf2stats_core::{
    build_request, EndpointId, Parameters, ProviderId, Registry, StatsErrorKind,
};

fn params(pairs: &[(&str, &str)]) -> Parameters {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

fn minimal_params(endpoint: EndpointId) -> Parameters {
    match endpoint {
        EndpointId::GetLeaderboard => Parameters::new(),
        EndpointId::SearchForPlayers => params(&[("nick", "bob")]),
        _ => params(&[("pid", "45006789")]),
    }
}

#[test]
fn every_provider_serves_every_endpoint() {
    let registry = Registry::shared();

    for provider in ProviderId::ALL {
        let profile = registry
            .provider(provider)
            .unwrap_or_else(|| panic!("provider '{provider}' is not registered"));

        for endpoint in EndpointId::ALL {
            let spec = registry
                .endpoint(endpoint)
                .unwrap_or_else(|| panic!("endpoint '{endpoint}' is not registered"));
            let request = build_request(
                registry,
                endpoint.as_str(),
                Some(provider.as_str()),
                &minimal_params(endpoint),
            )
            .unwrap_or_else(|error| panic!("provider '{provider}' {endpoint}: {error}"));

            assert_eq!(request.provider, provider);
            assert_eq!(request.endpoint, endpoint);
            assert!(
                request
                    .url
                    .starts_with(&format!("{}{}", profile.base_url, spec.path)),
                "provider '{provider}' {endpoint}: unexpected url {}",
                request.url
            );
            assert_eq!(
                request.headers.get("User-Agent").map(String::as_str),
                Some("GameSpyHTTP/1.0"),
                "provider '{provider}': user agent"
            );
        }
    }
}

#[test]
fn base_urls_end_with_a_slash_so_paths_append_cleanly() {
    for profile in Registry::shared().providers() {
        assert!(
            profile.base_url.ends_with('/'),
            "provider '{}': base url {}",
            profile.id,
            profile.base_url
        );
    }
}

#[test]
fn only_bf2hub_overrides_the_host_header() {
    let registry = Registry::shared();

    for provider in ProviderId::ALL {
        let request = build_request(
            registry,
            "getrankinfo",
            Some(provider.as_str()),
            &params(&[("pid", "1")]),
        )
        .expect("valid request");

        let host = request.headers.get("Host").map(String::as_str);
        if provider == ProviderId::Bf2hub {
            assert_eq!(host, Some("BF2web.gamespy.com"));
        } else {
            assert_eq!(host, None, "provider '{provider}': host header");
        }
    }
}

#[test]
fn unknown_or_missing_provider_falls_back_to_default() {
    let registry = Registry::shared();
    let pid = params(&[("pid", "1")]);

    for hint in [None, Some("nosuchmirror"), Some("")] {
        let request = build_request(registry, "getrankinfo", hint, &pid).expect("valid request");
        assert_eq!(request.provider, ProviderId::DEFAULT, "hint {hint:?}");
    }
}

#[test]
fn missing_pid_is_a_validation_error_whatever_else_is_sent() {
    let registry = Registry::shared();

    for extra in [
        params(&[]),
        params(&[("info", "rank")]),
        params(&[("pid", "   "), ("nick", "bob")]),
    ] {
        for provider in ProviderId::ALL {
            let error = build_request(registry, "getrankinfo", Some(provider.as_str()), &extra)
                .expect_err("pid is required");
            assert_eq!(error.kind(), StatsErrorKind::Validation);
            assert!(error.message().contains("pid"), "message: {}", error.message());
        }
    }
}

#[test]
fn ends_with_search_is_rejected_by_every_provider() {
    let registry = Registry::shared();

    for provider in ProviderId::ALL {
        let error = build_request(
            registry,
            "searchforplayers",
            Some(provider.as_str()),
            &params(&[("nick", "bob"), ("where", "e")]),
        )
        .expect_err("ends-with search is unsupported");
        assert_eq!(error.kind(), StatsErrorKind::Validation);
    }
}

#[test]
fn unregistered_endpoint_is_an_unknown_source() {
    let error = build_request(
        Registry::shared(),
        "getclaninfo",
        None,
        &params(&[("pid", "1")]),
    )
    .expect_err("endpoint is not registered");

    assert_eq!(error.kind(), StatsErrorKind::UnknownSource);
    assert_eq!(error.code(), "stats.unknown_source");
}
