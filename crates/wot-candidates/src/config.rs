use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Candidate store configuration (spec §4.6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateStoreConfig {
    /// Age at which a still-pending candidate is lazily expired.
    pub max_age: Duration,
    /// Soft cap enforced by eviction on `add`.
    pub max_candidates: usize,
    /// Default `limit` applied by `list` when the filter doesn't set one.
    pub default_list_limit: usize,
}

impl Default for CandidateStoreConfig {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(24 * 60 * 60),
            max_candidates: 1000,
            default_list_limit: 50,
        }
    }
}

/// Current Unix time in seconds, clamped to zero if the clock is somehow
/// before the epoch.
pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
