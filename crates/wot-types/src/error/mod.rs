//! Shared error primitives for the `ai.wot` data model.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
///
/// Mirrors the rest of the workspace's error types so structured logs and
/// any future API surface can key off a stable identifier instead of the
/// `Display` text, which is free to change wording.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors constructing or parsing a [`crate::Key`] or [`crate::EventId`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The hex string was not exactly 64 characters.
    #[error("expected a 64-character hex string, got {0} characters")]
    InvalidLength(usize),
    /// The string contained non-hex-digit characters.
    #[error("invalid hex encoding")]
    InvalidHex,
}

impl ErrorCode for KeyError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidLength(_) => "KEY_INVALID_LENGTH",
            Self::InvalidHex => "KEY_INVALID_HEX",
        }
    }
}

/// Errors constructing a [`crate::CandidateId`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CandidateIdError {
    /// The hex string was not exactly 16 characters.
    #[error("expected a 16-character hex string, got {0} characters")]
    InvalidLength(usize),
    /// The string contained non-hex-digit characters.
    #[error("invalid hex encoding")]
    InvalidHex,
}

impl ErrorCode for CandidateIdError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidLength(_) => "CANDIDATE_ID_INVALID_LENGTH",
            Self::InvalidHex => "CANDIDATE_ID_INVALID_HEX",
        }
    }
}
