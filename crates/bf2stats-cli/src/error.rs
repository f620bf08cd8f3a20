use bf2stats_core::StatsErrorKind;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] bf2stats_core::ValidationError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}

/// Exit code for an envelope that carries a classified stats error.
pub const fn exit_code_for(kind: StatsErrorKind) -> u8 {
    match kind {
        StatsErrorKind::Validation | StatsErrorKind::UnknownSource => 2,
        StatsErrorKind::NotFound => 3,
        StatsErrorKind::Source => 4,
    }
}
