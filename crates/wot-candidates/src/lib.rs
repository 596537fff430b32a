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

//! # ai.wot candidate store
//!
//! A bounded, durable queue of proposed attestations awaiting human
//! confirmation before publication (spec §4.6). This is the one crate in
//! the workspace that composes the others back together: it depends on
//! `wot-relay` for the `confirm_and_publish` / `publish_all_confirmed`
//! composite operations and on `wot-receipts` so a caller building a
//! candidate from a service result can reuse the canonical comment
//! format. The "watcher that auto-creates candidates" pattern is
//! deliberately left to the caller, who owns whatever live event source
//! feeds `add`.

mod config;
mod error;
mod store;
mod traits;

pub use config::CandidateStoreConfig;
pub use error::CandidateError;
pub use store::{CandidateFilter, CandidateStats, CandidateStore, ConfirmEdits, NewCandidate};
pub use traits::{CandidateListener, CandidatePersistence};
