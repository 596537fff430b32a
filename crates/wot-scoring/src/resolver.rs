use async_trait::async_trait;
use wot_types::{Key, ScoreResult};

/// The injected capability through which the kernel recurses into
/// attester-trust resolution (spec §4.1/§9).
///
/// The kernel itself is pure and synchronous in everything except this
/// one seam; implementations typically wrap a relay aggregator with a
/// depth-bounded recursion cache (see `wot-relay`).
#[async_trait]
pub trait ResolveAttester: Send + Sync {
    /// Resolves the trust score of `author` one level deeper than the
    /// caller's current recursion depth.
    async fn resolve(&self, author: &Key) -> ScoreResult;
}

/// A resolver that always returns [`ScoreResult::empty`], useful for
/// scoring at the recursion depth budget or in tests that don't exercise
/// attester-trust dampening.
pub struct NullResolver;

#[async_trait]
impl ResolveAttester for NullResolver {
    async fn resolve(&self, _author: &Key) -> ScoreResult {
        ScoreResult::empty()
    }
}

/// A resolver backed by a fixed map, useful for unit tests that need a
/// specific attester score without standing up a relay aggregator.
pub struct FixedResolver(pub std::collections::HashMap<Key, ScoreResult>);

#[async_trait]
impl ResolveAttester for FixedResolver {
    async fn resolve(&self, author: &Key) -> ScoreResult {
        self.0.get(author).cloned().unwrap_or_else(ScoreResult::empty)
    }
}
