use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// The Scoring Kernel's configuration (spec §4.1).
///
/// Every field has the default named in the spec; callers running a
/// recursive attester resolution pass a bumped `depth` (the kernel never
/// increments its own `depth` field — the caller's `ResolveAttester`
/// implementation does, one level per recursive call).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub half_life_days: f64,
    pub depth: u32,
    pub max_depth: u32,
    pub negative_trust_gate: u8,
    pub deduplicate: bool,
    pub novelty_multiplier: f64,
    /// Unix seconds. Tests must always set this explicitly; production
    /// callers may rely on [`Default`], which reads the wall clock once.
    pub now: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            half_life_days: 90.0,
            depth: 0,
            max_depth: 2,
            negative_trust_gate: 20,
            deduplicate: true,
            novelty_multiplier: 1.3,
            now: now_unix(),
        }
    }
}

impl ScoringConfig {
    /// Returns a copy of this config with `depth` incremented by one, for
    /// passing into a recursive attester-resolution call.
    pub fn at_depth(&self, depth: u32) -> Self {
        Self { depth, ..*self }
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
