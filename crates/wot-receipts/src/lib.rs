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

//! # ai.wot receipt constructor
//!
//! Builds a canonical, publish-ready attestation body from a parsed
//! service-result record (spec §4.5). Pure and synchronous: no I/O, no
//! signing, no relay contact — those are the caller's job, composed at
//! the `wot-candidates` boundary.

mod kind_names;
mod receipt;

pub use kind_names::kind_name;
pub use receipt::{build_receipt_body, ReceiptBody, ReceiptOptions};
