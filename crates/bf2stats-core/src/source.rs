use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Identifiers of the stat mirrors speaking the legacy protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Bf2hub,
    Playbf2,
    Phoenix,
}

impl ProviderId {
    pub const ALL: [Self; 3] = [Self::Bf2hub, Self::Playbf2, Self::Phoenix];

    /// Provider used when the caller names none, or names one we do not know.
    pub const DEFAULT: Self = Self::Bf2hub;

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bf2hub => "bf2hub",
            Self::Playbf2 => "playbf2",
            Self::Phoenix => "phoenix",
        }
    }

    /// Lenient lookup: absent or unrecognized ids resolve to [`ProviderId::DEFAULT`].
    pub fn resolve(value: Option<&str>) -> Self {
        Self::resolve_or(value, Self::DEFAULT)
    }

    /// Lenient lookup with a caller-chosen fallback for absent or unrecognized ids.
    pub fn resolve_or(value: Option<&str>, fallback: Self) -> Self {
        match value {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(provider = raw, "unknown provider, using {fallback}");
                fallback
            }),
            None => fallback,
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bf2hub" => Ok(Self::Bf2hub),
            "playbf2" => Ok(Self::Playbf2),
            "phoenix" => Ok(Self::Phoenix),
            other => Err(ValidationError::InvalidProvider {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(" PlayBF2 ".parse::<ProviderId>(), Ok(ProviderId::Playbf2));
    }

    #[test]
    fn resolve_falls_back_to_default() {
        assert_eq!(ProviderId::resolve(None), ProviderId::Bf2hub);
        assert_eq!(ProviderId::resolve(Some("gamespy")), ProviderId::Bf2hub);
        assert_eq!(ProviderId::resolve(Some("phoenix")), ProviderId::Phoenix);
    }

    #[test]
    fn resolve_or_uses_the_given_fallback() {
        let fallback = ProviderId::Playbf2;

        assert_eq!(ProviderId::resolve_or(None, fallback), fallback);
        assert_eq!(ProviderId::resolve_or(Some("gamespy"), fallback), fallback);
        assert_eq!(ProviderId::resolve_or(Some(" Phoenix "), fallback), ProviderId::Phoenix);
    }
}
