use std::env;

use crate::ProviderId;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Runtime settings for [`StatsClient`](crate::StatsClient).
///
/// # Environment Variables
///
/// | Setting | Primary Env Var | Fallback Env Var | Default |
/// |---------|-----------------|------------------|---------|
/// | cache TTL hint | `BF2STATS_CACHE_TTL` | `CACHE_TTL` | 600 |
/// | request timeout | `BF2STATS_TIMEOUT_MS` | - | 5000 |
/// | default provider | `BF2STATS_PROVIDER` | - | bf2hub |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsConfig {
    /// Emitted for callers as a `Cache-Control` hint; never interpreted here.
    pub cache_ttl_secs: u64,
    pub timeout_ms: u64,
    pub default_provider: ProviderId,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            default_provider: ProviderId::DEFAULT,
        }
    }
}

impl StatsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source. Unparseable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let cache_ttl_secs = lookup("BF2STATS_CACHE_TTL")
            .or_else(|| lookup("CACHE_TTL"))
            .map_or(defaults.cache_ttl_secs, |raw| {
                parse_or(&raw, "cache TTL", defaults.cache_ttl_secs)
            });
        let timeout_ms = lookup("BF2STATS_TIMEOUT_MS").map_or(defaults.timeout_ms, |raw| {
            parse_or(&raw, "timeout", defaults.timeout_ms)
        });
        let default_provider = lookup("BF2STATS_PROVIDER")
            .map_or(defaults.default_provider, |raw| {
                ProviderId::resolve(Some(raw.as_str()))
            });

        Self {
            cache_ttl_secs,
            timeout_ms,
            default_provider,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_default_provider(mut self, provider: ProviderId) -> Self {
        self.default_provider = provider;
        self
    }

    pub fn cache_control(&self) -> String {
        format!("max-age={}", self.cache_ttl_secs)
    }
}

fn parse_or(raw: &str, setting: &str, default: u64) -> u64 {
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(value = raw, "invalid {setting}, using {default}");
        default
    })
}
