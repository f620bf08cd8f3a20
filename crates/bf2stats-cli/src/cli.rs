//! CLI argument definitions for bf2stats.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `query` | Raw lookup against any registered endpoint |
//! | `player` | Player info (optionally grouped) |
//! | `rank` | Rank info |
//! | `awards` | Awards |
//! | `unlocks` | Unlock status |
//! | `leaderboard` | Leaderboard page |
//! | `search` | Nickname search |
//! | `profile` | Info, rank, unlocks and awards in one go |
//! | `sources` | Registered mirrors and endpoints |
//!
//! # Examples
//!
//! ```bash
//! bf2stats player 45006789 --group --pretty
//! bf2stats search bob --where b --with-ranks
//! bf2stats query getleaderboard -p type=kit -p id=0 --project playbf2
//! ```

use bf2stats_core::ProviderId;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "bf2stats",
    author,
    version,
    about = "Query Battlefield 2 stat mirrors",
    long_about = "Looks up player statistics, ranks, awards, unlocks and leaderboards on the \
Battlefield 2 stat mirrors and prints them as a JSON envelope.\n\
\n\
Logging goes to stderr and is controlled with RUST_LOG."
)]
pub struct Cli {
    /// Stat mirror to query. Defaults to BF2STATS_PROVIDER or bf2hub.
    #[arg(long, global = true, value_enum)]
    pub project: Option<ProjectSelector>,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Request timeout in milliseconds. Defaults to BF2STATS_TIMEOUT_MS or 5000.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProjectSelector {
    Bf2hub,
    Playbf2,
    Phoenix,
}

impl From<ProjectSelector> for ProviderId {
    fn from(selector: ProjectSelector) -> Self {
        match selector {
            ProjectSelector::Bf2hub => Self::Bf2hub,
            ProjectSelector::Playbf2 => Self::Playbf2,
            ProjectSelector::Phoenix => Self::Phoenix,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up any registered endpoint with raw parameters.
    ///
    ///   bf2stats query getrankinfo -p pid=45006789
    Query(QueryArgs),

    /// Fetch player statistics.
    Player(PlayerArgs),

    /// Fetch rank information.
    Rank(PidArgs),

    /// Fetch awards.
    Awards(PidArgs),

    /// Fetch unlock status.
    Unlocks(PidArgs),

    /// Fetch a leaderboard page.
    Leaderboard(LeaderboardArgs),

    /// Search players by nickname.
    Search(SearchArgs),

    /// Fetch a full player profile. Without --project, bf2hub then playbf2 are tried.
    Profile(PidArgs),

    /// List registered mirrors and endpoints.
    Sources,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Endpoint name, e.g. getplayerinfo.
    pub endpoint: String,

    /// Query parameter as key=value. Repeatable.
    #[arg(short = 'p', long = "param")]
    pub params: Vec<String>,

    /// Group weapon/vehicle/class/army stats (getplayerinfo only).
    #[arg(long, default_value_t = false)]
    pub group: bool,
}

#[derive(Debug, Args)]
pub struct PlayerArgs {
    /// Player id.
    pub pid: String,

    /// Group weapon/vehicle/class/army stats.
    #[arg(long, default_value_t = false)]
    pub group: bool,
}

#[derive(Debug, Args)]
pub struct PidArgs {
    /// Player id.
    pub pid: String,
}

#[derive(Debug, Args)]
pub struct LeaderboardArgs {
    /// Leaderboard type (score, kit, vehicle, weapon, risingstar).
    #[arg(long = "type")]
    pub board: Option<String>,

    /// Board id within the type (overall, commander, a kit or weapon index).
    #[arg(long)]
    pub id: Option<String>,

    /// First position to return.
    #[arg(long)]
    pub pos: Option<String>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Nickname to search for.
    pub nick: String,

    /// Match mode: b (begins with), a (any), x (exact). Ends-with is not supported.
    #[arg(long = "where")]
    pub match_mode: Option<String>,

    /// Also look up the rank of every hit.
    #[arg(long, default_value_t = false)]
    pub with_ranks: bool,
}
