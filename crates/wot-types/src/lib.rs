#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo
    )
)]

//! # ai.wot data model
//!
//! The closed set of semantic types that make up the decentralized
//! reputation engine's data model: keys, attestations and their six
//! recognised types, revocations, payment receipts, service results,
//! candidates, and the scoring kernel's output shape. Nothing in this
//! crate performs I/O; parsing from a raw tag list happens at the edges
//! of each type, following the "typed record, lenient tag parser"
//! guidance in the design notes.

pub mod attestation;
pub mod candidate;
pub mod error;
pub mod payment;
pub mod revocation;
pub mod score;
pub mod service_result;
pub mod tags;

mod key;

pub use attestation::{Attestation, AttestationType};
pub use candidate::{Candidate, CandidateStatus};
pub use key::{CandidateId, EventId, Key};
pub use payment::{parse_payment_receipt, PaymentReceipt, PaymentReceiptEvent};
pub use revocation::{parse_revocation, Revocation, RevocationEvent};
pub use score::{BreakdownEntry, Diversity, GateReason, ScoreResult};
pub use service_result::{parse_service_result, ServiceResult, ServiceResultEvent};
