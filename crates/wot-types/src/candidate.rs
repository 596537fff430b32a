use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::attestation::AttestationType;
use crate::key::{CandidateId, EventId, Key};

/// The candidate state machine (spec §4.6):
///
/// ```text
/// pending ──confirm──▶ confirmed ──publish──▶ published (terminal)
/// pending ──reject──▶ rejected (terminal)
/// pending ──time-out──▶ expired (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    Pending,
    Confirmed,
    Rejected,
    Published,
    Expired,
}

impl CandidateStatus {
    /// Terminal states are never revisited by a transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Published | Self::Expired)
    }
}

/// A locally held, mutable, pre-publication attestation proposal
/// (spec §3/§4.6). Owned by the local process until published, at which
/// point `published_event_id` is set and the status becomes terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub status: CandidateStatus,
    pub attestation_type: AttestationType,
    pub target: Key,
    pub comment: String,
    pub event_ref: Option<EventId>,
    /// Free-form origin tag, e.g. `"dvm"`, `"l402"`, `"manual"`.
    pub source: String,
    pub metadata: BTreeMap<String, String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub published_event_id: Option<EventId>,
    /// Set when `reject` is called; `None` otherwise.
    pub rejection_reason: Option<String>,
}
