use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Aggregator-level configuration (spec §4.3/§5).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Per-relay deadline for a single subscribe or publish operation.
    pub per_relay_deadline: Duration,
    /// Added to `per_relay_deadline` to bound the whole fan-out/merge.
    pub global_deadline_margin: Duration,
    /// Whether `query_attestations` skips revocation filtering.
    pub include_revoked: bool,
}

impl AggregatorConfig {
    /// `per_relay_deadline + global_deadline_margin`.
    pub fn global_deadline(&self) -> Duration {
        self.per_relay_deadline + self.global_deadline_margin
    }

    /// Loads an [`AggregatorConfig`] from a TOML document.
    pub fn from_toml(raw: &str) -> Result<Self, RelayError> {
        toml::from_str(raw).map_err(RelayError::InvalidConfig)
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            per_relay_deadline: Duration::from_secs(12),
            global_deadline_margin: Duration::from_secs(2),
            include_revoked: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_toml_round_trips_a_serialized_config() {
        let serialized = toml::to_string(&AggregatorConfig::default()).unwrap();
        let parsed = AggregatorConfig::from_toml(&serialized).unwrap();
        assert_eq!(parsed, AggregatorConfig::default());
    }

    #[test]
    fn from_toml_rejects_malformed_input() {
        assert!(AggregatorConfig::from_toml("not valid toml = [").is_err());
    }
}
