//! Static catalog of stat mirrors and the endpoints they serve.
//!
//! The registry is built once and shared read-only; every request borrows it.
//!
//! | Endpoint | Required | Property keys | Force array |
//! |----------|----------|---------------|-------------|
//! | `getplayerinfo` | `pid` | `player` | no |
//! | `getrankinfo` | `pid` | - | no |
//! | `getawardsinfo` | `pid` | `awards` | no |
//! | `getunlocksinfo` | `pid` | `status`, `unlocks` | no |
//! | `getleaderboard` | - | `players` | yes |
//! | `searchforplayers` | `nick` | `players` | yes |

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::{ProviderId, StatsError};

const GAMESPY_USER_AGENT: &str = "GameSpyHTTP/1.0";

const PLAYER_INFO_COLUMNS: &str = "per*,cmb*,twsc,cpcp,cacp,dfcp,kila,heal,rviv,rsup,rpar,tgte,dkas,dsab,cdsc,rank,cmsc,kick,kill,deth,suic,ospm,klpm,klpr,dtpr,bksk,wdsk,bbrs,tcdr,ban,dtpm,lbtl,osaa,vrk,tsql,tsqm,tlwf,mvks,vmks,mvn*,vmr*,fkit,fmap,fveh,fwea,wtm-,wkl-,wdt-,wac-,wkd-,vtm-,vkl-,vdt-,vkd-,vkr-,atm-,awn-,alo-,abr-,ktm-,kkl-,kdt-,kkd-";

/// Endpoint identifiers, named after the `.aspx` pages the mirrors expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointId {
    GetPlayerInfo,
    GetRankInfo,
    GetAwardsInfo,
    GetUnlocksInfo,
    GetLeaderboard,
    SearchForPlayers,
}

impl EndpointId {
    pub const ALL: [Self; 6] = [
        Self::GetPlayerInfo,
        Self::GetRankInfo,
        Self::GetAwardsInfo,
        Self::GetUnlocksInfo,
        Self::GetLeaderboard,
        Self::SearchForPlayers,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetPlayerInfo => "getplayerinfo",
            Self::GetRankInfo => "getrankinfo",
            Self::GetAwardsInfo => "getawardsinfo",
            Self::GetUnlocksInfo => "getunlocksinfo",
            Self::GetLeaderboard => "getleaderboard",
            Self::SearchForPlayers => "searchforplayers",
        }
    }
}

impl Display for EndpointId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndpointId {
    type Err = StatsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim().trim_start_matches('/');
        Self::ALL
            .into_iter()
            .find(|endpoint| endpoint.as_str() == trimmed)
            .ok_or_else(|| StatsError::unknown_source(trimmed))
    }
}

/// Connection profile of one mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub id: ProviderId,
    pub base_url: &'static str,
    pub headers: &'static [(&'static str, &'static str)],
}

/// Request and response shape of one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSpec {
    pub id: EndpointId,
    pub path: &'static str,
    pub default_params: &'static [(&'static str, &'static str)],
    pub required_params: &'static [&'static str],
    /// One key per dataset after the first, in dataset order.
    pub property_keys: &'static [&'static str],
    pub force_array: bool,
}

impl EndpointSpec {
    pub fn property_key(&self, dataset_index: usize) -> Option<&'static str> {
        dataset_index
            .checked_sub(1)
            .and_then(|index| self.property_keys.get(index).copied())
    }
}

/// Immutable provider and endpoint tables.
#[derive(Debug, Clone)]
pub struct Registry {
    providers: Vec<ProviderProfile>,
    endpoints: Vec<EndpointSpec>,
}

impl Registry {
    /// Builds the table of the three known mirrors and six endpoints.
    pub fn standard() -> Self {
        let providers = vec![
            ProviderProfile {
                id: ProviderId::Bf2hub,
                base_url: "http://official.ranking.bf2hub.com/ASP/",
                headers: &[
                    ("User-Agent", GAMESPY_USER_AGENT),
                    ("Host", "BF2web.gamespy.com"),
                ],
            },
            ProviderProfile {
                id: ProviderId::Playbf2,
                base_url: "http://bf2web.playbf2.ru/ASP/",
                headers: &[("User-Agent", GAMESPY_USER_AGENT)],
            },
            ProviderProfile {
                id: ProviderId::Phoenix,
                base_url: "http://bf2.phoenixnetwork.net/ASP/",
                headers: &[("User-Agent", GAMESPY_USER_AGENT)],
            },
        ];

        let endpoints = vec![
            EndpointSpec {
                id: EndpointId::GetPlayerInfo,
                path: "getplayerinfo.aspx",
                default_params: &[("info", PLAYER_INFO_COLUMNS)],
                required_params: &["pid"],
                property_keys: &["player"],
                force_array: false,
            },
            EndpointSpec {
                id: EndpointId::GetRankInfo,
                path: "getrankinfo.aspx",
                default_params: &[],
                required_params: &["pid"],
                property_keys: &[],
                force_array: false,
            },
            EndpointSpec {
                id: EndpointId::GetAwardsInfo,
                path: "getawardsinfo.aspx",
                default_params: &[],
                required_params: &["pid"],
                property_keys: &["awards"],
                force_array: false,
            },
            EndpointSpec {
                id: EndpointId::GetUnlocksInfo,
                path: "getunlocksinfo.aspx",
                default_params: &[],
                required_params: &["pid"],
                property_keys: &["status", "unlocks"],
                force_array: false,
            },
            EndpointSpec {
                id: EndpointId::GetLeaderboard,
                path: "getleaderboard.aspx",
                default_params: &[("type", "score"), ("id", "overall")],
                required_params: &[],
                property_keys: &["players"],
                force_array: true,
            },
            EndpointSpec {
                id: EndpointId::SearchForPlayers,
                path: "searchforplayers.aspx",
                default_params: &[],
                required_params: &["nick"],
                property_keys: &["players"],
                force_array: true,
            },
        ];

        Self {
            providers,
            endpoints,
        }
    }

    /// Process-wide registry, built on first use.
    pub fn shared() -> &'static Self {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(Self::standard)
    }

    pub fn provider(&self, id: ProviderId) -> Option<&ProviderProfile> {
        self.providers.iter().find(|profile| profile.id == id)
    }

    pub fn providers(&self) -> &[ProviderProfile] {
        &self.providers
    }

    pub fn endpoint(&self, id: EndpointId) -> Option<&EndpointSpec> {
        self.endpoints.iter().find(|spec| spec.id == id)
    }

    /// Looks up an endpoint by its wire name; unknown names are `UnknownSource`.
    pub fn endpoint_by_name(&self, name: &str) -> Result<&EndpointSpec, StatsError> {
        let id = name.parse::<EndpointId>()?;
        self.endpoint(id)
            .ok_or_else(|| StatsError::unknown_source(id.as_str()))
    }

    pub fn endpoints(&self) -> &[EndpointSpec] {
        &self.endpoints
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}
