//! # ai.wot telemetry
//!
//! Structured logging bootstrap shared by every crate that performs I/O
//! (the relay aggregator and the candidate store). The scoring kernel
//! itself never logs — it is pure and total.

pub mod init;

pub use init::init_tracing;
