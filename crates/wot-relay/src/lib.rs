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

//! # ai.wot relay aggregator
//!
//! Concurrent fan-out to a set of relays, commutative merge by event id,
//! revocation-aware attestation fetching, payment-receipt totalling, and
//! the recursive attester-trust resolution that sits on top of
//! `wot-scoring`'s pure kernel (spec §4.3/§4.4). The wire protocol itself
//! — socket handling, reconnection, `REQ`/`EVENT`/`EOSE`/`CLOSE` framing,
//! and signature verification — is an external collaborator behind the
//! [`transport::RelayTransport`] and [`transport::Verifier`] seams.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod merge;
pub mod transport;

pub use aggregator::RelayAggregator;
pub use config::AggregatorConfig;
pub use error::RelayError;
pub use merge::dedup_by_id;
pub use transport::{
    AlwaysValid, Filter, PublishOutcome, RawEvent, RelayTransport, Signer, UnsignedEvent, Verifier,
};
