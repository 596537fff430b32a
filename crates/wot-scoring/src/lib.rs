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

//! # ai.wot scoring kernel
//!
//! Pure, side-effect-free computation of a [`wot_types::ScoreResult`] from
//! an already-fetched bag of attestations (spec §4.1) plus the category
//! projection built on top of it (spec §4.2). Nothing here performs I/O;
//! recursive attester resolution is injected through the
//! [`resolver::ResolveAttester`] trait so this crate never depends on an
//! async runtime beyond `async-trait`'s plumbing.

pub mod category;
pub mod config;
pub mod kernel;
pub mod resolver;

pub use category::{all_category_scores, category_score, named_categories, Category, UnknownCategory};
pub use config::{now_unix, ScoringConfig};
pub use kernel::score;
pub use resolver::{FixedResolver, NullResolver, ResolveAttester};
