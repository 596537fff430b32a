use thiserror::Error;
use wot_types::error::ErrorCode;
use wot_types::{CandidateId, CandidateStatus};

/// Errors surfaced by the candidate store (spec §4.6/§7 category 1).
///
/// The store is strict: an illegal transition or a not-found id is
/// returned as an error without mutating any state.
#[derive(Debug, Error)]
pub enum CandidateError {
    #[error("candidate {0} not found")]
    NotFound(CandidateId),
    #[error("candidate {id} is {actual:?}, expected {expected:?}")]
    IllegalTransition {
        id: CandidateId,
        actual: CandidateStatus,
        expected: CandidateStatus,
    },
    #[error("candidate must name an attestation type")]
    MissingType,
    #[error("candidate target must be set")]
    MissingTarget,
    #[error("candidate comment must not be empty")]
    MissingComment,
    #[error("publish failed: {0}")]
    Publish(#[from] wot_relay::RelayError),
}

impl ErrorCode for CandidateError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "CANDIDATE_NOT_FOUND",
            Self::IllegalTransition { .. } => "CANDIDATE_ILLEGAL_TRANSITION",
            Self::MissingType => "CANDIDATE_MISSING_TYPE",
            Self::MissingTarget => "CANDIDATE_MISSING_TARGET",
            Self::MissingComment => "CANDIDATE_MISSING_COMMENT",
            Self::Publish(_) => "CANDIDATE_PUBLISH_FAILED",
        }
    }
}
