//! # bf2stats Core
//!
//! Decoder and client for the legacy, line-oriented stats protocol spoken by
//! the Battlefield 2 stat mirrors (bf2hub, playbf2, phoenix).
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`registry`] | Provider profiles and endpoint specs |
//! | [`request`] | Parameter merging, validation and request targets |
//! | [`http_client`] | Transport abstraction (reqwest / fixtures) |
//! | [`protocol`] | Line-protocol decoder producing datasets |
//! | [`normalize`] | Dataset to record/list shaping |
//! | [`grouping`] | Per-index weapon/vehicle/class/army records |
//! | [`client`] | End-to-end lookups |
//! | [`routing`] | Provider fallback chains |
//! | [`profile`] | Profile and search views |
//! | [`envelope`] | Response envelope with metadata |
//! | [`config`] | Environment-driven settings |
//! | [`error`] | Error classification |
//!
//! ## Flow
//!
//! ```text
//! StatsQuery ─▶ build_request ─▶ HttpClient ─▶ decode_payload ─▶ normalize ─▶ group_player
//!                    │                │               │              │
//!                    └── Validation   └── Source      └── NotFound   └── Source
//!                        UnknownSource                    Source
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bf2stats_core::{StatsClient, StatsQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), bf2stats_core::StatsError> {
//!     let client = StatsClient::from_env();
//!     let query = StatsQuery::new("getplayerinfo")
//!         .with_param("pid", "45006789")
//!         .grouped(true);
//!
//!     let fetched = client.fetch(&query).await?;
//!     println!("{}", serde_json::to_string_pretty(&fetched.result).unwrap_or_default());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use bf2stats_core::{StatsError, StatsErrorKind};
//!
//! fn handle_error(error: StatsError) {
//!     match error.kind() {
//!         StatsErrorKind::NotFound => {
//!             // Try another mirror
//!         }
//!         StatsErrorKind::Validation | StatsErrorKind::UnknownSource => {
//!             // Report to user
//!         }
//!         StatsErrorKind::Source => {}
//!     }
//! }
//! ```

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod grouping;
pub mod http_client;
pub mod normalize;
pub mod profile;
pub mod protocol;
pub mod registry;
pub mod request;
pub mod routing;
pub mod source;

pub use client::{decode_response, Fetched, StatsClient, StatsQuery};
pub use config::StatsConfig;
pub use envelope::{Envelope, EnvelopeMeta};
pub use error::{ErrorPayload, StatsError, StatsErrorKind, ValidationError};
pub use grouping::{group_player, GroupCategory, GroupedList, GroupedRecord, GroupedStats};
pub use http_client::{
    FixtureHttpClient, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use normalize::{normalize, DecodedResult, Record, Section};
pub use profile::{PlayerProfile, SearchHit, PROFILE_FALLBACK_CHAIN};
pub use protocol::{decode_payload, Dataset};
pub use registry::{EndpointId, EndpointSpec, ProviderProfile, Registry};
pub use request::{build_request, Parameters, StatsRequest};
pub use routing::{RouteFailure, RouteResult, RouteSuccess};
pub use source::ProviderId;
