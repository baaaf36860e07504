//! Errors raised while loading, saving, or checking `config.ron`.

use warpfield_starfield::StarfieldError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write config: {0}")]
    Write(#[source] std::io::Error),

    /// The file is not valid RON for [`Config`](crate::Config).
    #[error("failed to parse config: {0}")]
    Parse(#[source] ron::error::SpannedError),

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] ron::Error),

    /// The starfield or palette section cannot start a session.
    #[error("invalid starfield settings: {0}")]
    Starfield(#[from] StarfieldError),

    /// A display rate of zero.
    #[error("display {field} must be at least 1")]
    ZeroRate { field: &'static str },
}
