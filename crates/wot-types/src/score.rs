use serde::{Deserialize, Serialize};

use crate::attestation::AttestationType;
use crate::key::{EventId, Key};

/// Why a record contributed zero despite parsing to a recognised type
/// (spec §7 category 4, "policy-gate").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateReason {
    /// A negative attestation with empty or whitespace-only content.
    EmptyContent,
    /// A negative attestation from an attester whose display score is
    /// below `negative_trust_gate`.
    AttesterTrustBelowGate {
        attester_display: u8,
        gate: u8,
    },
}

/// One scored (or gated) record, with full provenance, in the order the
/// kernel processed it (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub id: EventId,
    pub author: Key,
    pub attestation_type: AttestationType,
    pub created_at: i64,
    pub zap_sats: u64,
    pub zap_weight: f64,
    pub decay: f64,
    pub attester_trust: f64,
    pub novel: bool,
    /// Zero when `gate` is `Some`.
    pub contribution: f64,
    pub gate: Option<GateReason>,
}

/// The sybil-resistance metric over the non-gated positive breakdown
/// (spec §4.1 step 5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diversity {
    pub diversity: f64,
    pub unique_attesters: u64,
    pub max_attester_share: f64,
    pub top_attester: Option<Key>,
}

impl Diversity {
    pub fn empty() -> Self {
        Self {
            diversity: 0.0,
            unique_attesters: 0,
            max_attester_share: 0.0,
            top_attester: None,
        }
    }
}

/// The output of one scoring-kernel invocation (spec §3/§4.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub raw: f64,
    pub display: u8,
    pub attestation_count: u64,
    pub positive_count: u64,
    pub negative_count: u64,
    pub gated_count: u64,
    pub breakdown: Vec<BreakdownEntry>,
    pub diversity: Diversity,
}

impl ScoreResult {
    /// The result for a target with zero (or zero surviving) attestations.
    pub fn empty() -> Self {
        Self {
            raw: 0.0,
            display: 0,
            attestation_count: 0,
            positive_count: 0,
            negative_count: 0,
            gated_count: 0,
            breakdown: Vec::new(),
            diversity: Diversity::empty(),
        }
    }
}
