use thiserror::Error;
use wot_types::error::ErrorCode;

/// Errors surfaced by the relay aggregator (spec §7 category 2, 3).
///
/// Fetching is best-effort by design and never fails; `publish` returns
/// an error only when every configured relay rejected or timed out, and
/// loading an [`crate::config::AggregatorConfig`] from TOML returns one
/// when the document doesn't parse.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Every relay rejected the event or failed to respond within its
    /// deadline.
    #[error("publish failed: no relay accepted the event")]
    AllRelaysRejected,
    /// No relays were configured at all.
    #[error("no relays configured")]
    NoRelaysConfigured,
    /// A TOML configuration document failed to parse into
    /// [`crate::config::AggregatorConfig`].
    #[error("invalid aggregator config: {0}")]
    InvalidConfig(#[from] toml::de::Error),
}

impl ErrorCode for RelayError {
    fn code(&self) -> &'static str {
        match self {
            Self::AllRelaysRejected => "RELAY_ALL_REJECTED",
            Self::NoRelaysConfigured => "RELAY_NO_RELAYS_CONFIGURED",
            Self::InvalidConfig(_) => "RELAY_INVALID_CONFIG",
        }
    }
}
