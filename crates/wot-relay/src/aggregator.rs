use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use wot_types::{
    parse_payment_receipt, parse_revocation, Attestation, EventId, Key, ScoreResult,
};
use wot_scoring::{ResolveAttester, ScoringConfig};

use crate::config::AggregatorConfig;
use crate::error::RelayError;
use crate::merge::dedup_by_id;
use crate::transport::{Filter, PublishOutcome, RawEvent, RelayTransport, Verifier};

const ATTESTATION_KIND: u32 = 1985;
const REVOCATION_KIND: u32 = 5;
const PAYMENT_RECEIPT_KIND: u32 = 9735;
const NAMESPACE: &str = "ai.wot";

/// Per-`score()`-invocation memo from key to resolved score, guarded by a
/// single mutex per spec §5's "single lock per structure" guidance. Never
/// shared across invocations — [`RelayAggregator::score`] creates a fresh
/// one every call.
type RecursionCache = Arc<Mutex<HashMap<Key, ScoreResult>>>;

/// Fans out filter-subscriptions and publishes to a set of relays,
/// merges by event id, enforces deadlines, and joins attestations with
/// revocations and payment receipts before handing them to the scoring
/// kernel (spec §4.3).
pub struct RelayAggregator {
    transports: Vec<Arc<dyn RelayTransport>>,
    verifier: Arc<dyn Verifier>,
    config: AggregatorConfig,
    scoring_defaults: ScoringConfig,
}

impl RelayAggregator {
    pub fn new(
        transports: Vec<Arc<dyn RelayTransport>>,
        verifier: Arc<dyn Verifier>,
        config: AggregatorConfig,
        scoring_defaults: ScoringConfig,
    ) -> Self {
        Self {
            transports,
            verifier,
            config,
            scoring_defaults,
        }
    }

    /// Queries every configured relay concurrently and merges the
    /// results by event id, bounded by the per-relay and global
    /// deadlines (spec §4.3/§5).
    async fn fan_out_subscribe(&self, filter: &Filter) -> Vec<RawEvent> {
        if self.transports.is_empty() {
            return Vec::new();
        }
        let per_relay = self.config.per_relay_deadline;
        let global = self.config.global_deadline();

        let tasks = self.transports.iter().map(|transport| {
            let transport = Arc::clone(transport);
            let filter = filter.clone();
            async move {
                match tokio::time::timeout(per_relay, transport.subscribe(&filter, per_relay)).await
                {
                    Ok(events) => events,
                    Err(_) => {
                        tracing::warn!(relay = transport.name(), "relay subscribe deadline exceeded");
                        Vec::new()
                    }
                }
            }
        });

        let merged = match tokio::time::timeout(global, futures::future::join_all(tasks)).await {
            Ok(per_relay_results) => per_relay_results.into_iter().flatten().collect(),
            Err(_) => {
                tracing::warn!("relay fan-out missed the global deadline; returning nothing");
                Vec::new()
            }
        };
        dedup_by_id(merged)
    }

    /// Publishes `event` to every configured relay concurrently. Never
    /// retries; the caller decides whether a partial success is
    /// acceptable. Errors only when every relay rejected or timed out
    /// (spec §4.3/§7).
    pub async fn publish(&self, event: &RawEvent) -> Result<Vec<PublishOutcome>, RelayError> {
        if self.transports.is_empty() {
            return Err(RelayError::NoRelaysConfigured);
        }
        let per_relay = self.config.per_relay_deadline;
        let tasks = self.transports.iter().map(|transport| {
            let transport = Arc::clone(transport);
            async move {
                match tokio::time::timeout(per_relay, transport.publish(event, per_relay)).await {
                    Ok(outcome) => outcome,
                    Err(_) => PublishOutcome {
                        relay: transport.name().to_string(),
                        accepted: false,
                        reason: Some("deadline exceeded".to_string()),
                    },
                }
            }
        });
        let outcomes: Vec<PublishOutcome> = futures::future::join_all(tasks).await;
        if outcomes.iter().all(|o| !o.accepted) {
            return Err(RelayError::AllRelaysRejected);
        }
        Ok(outcomes)
    }

    /// Fetches the attestation bag for `target`: kind 1985, namespace
    /// `ai.wot`, target tag = `target`; verifies signatures; drops
    /// self-attestations; and, unless `include_revoked` overrides to
    /// true, drops attestations revoked by their own author
    /// (spec §4.3/§4.4).
    pub async fn query_attestations(
        &self,
        target: Key,
        include_revoked: Option<bool>,
    ) -> Vec<Attestation> {
        let filter = Filter {
            kinds: vec![ATTESTATION_KIND],
            tag_l_upper: vec![NAMESPACE.to_string()],
            tag_p: vec![target.to_hex()],
            ..Filter::default()
        };
        let raws = self.fan_out_subscribe(&filter).await;

        let attestations: Vec<Attestation> = raws
            .into_iter()
            .filter(|raw| self.verifier.verify(raw))
            .map(RawEvent::into_attestation)
            .filter(|att| att.author != target)
            .collect();

        let include_revoked = include_revoked.unwrap_or(self.config.include_revoked);
        if include_revoked {
            return attestations;
        }

        let authors: Vec<Key> = distinct_authors(&attestations);
        let revoked_by_author = self.query_revocations_by_author(&authors).await;
        attestations
            .into_iter()
            .filter(|att| {
                !revoked_by_author
                    .get(&att.author)
                    .map(|ids| ids.contains(&att.id))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Queries deletion records (kind 5) authored by `authors`,
    /// referencing kind `1985`, and returns the set of revoked ids keyed
    /// by the revoking author — a revocation only removes an attestation
    /// whose own author matches (spec §4.4).
    pub async fn query_revocations_by_author(&self, authors: &[Key]) -> HashMap<Key, HashSet<EventId>> {
        if authors.is_empty() {
            return HashMap::new();
        }
        let filter = Filter {
            kinds: vec![REVOCATION_KIND],
            authors: authors.iter().map(Key::to_hex).collect(),
            ..Filter::default()
        };
        let raws = self.fan_out_subscribe(&filter).await;

        let mut by_author: HashMap<Key, HashSet<EventId>> = HashMap::new();
        for raw in raws {
            if !self.verifier.verify(&raw) {
                continue;
            }
            let event = raw.into_revocation_event();
            if let Some(revocation) = parse_revocation(&event) {
                by_author
                    .entry(revocation.author)
                    .or_default()
                    .extend(revocation.referenced_ids);
            }
        }
        by_author
    }

    /// Sums zap/payment-receipt satoshis (kind 9735) per referenced
    /// attestation id (spec §4.3).
    pub async fn query_zap_totals(&self, ids: &[EventId]) -> HashMap<EventId, u64> {
        if ids.is_empty() {
            return HashMap::new();
        }
        let filter = Filter {
            kinds: vec![PAYMENT_RECEIPT_KIND],
            tag_e: ids.iter().map(EventId::to_hex).collect(),
            ..Filter::default()
        };
        let raws = self.fan_out_subscribe(&filter).await;

        let mut totals: HashMap<EventId, u64> = HashMap::new();
        for raw in raws {
            if !self.verifier.verify(&raw) {
                continue;
            }
            let event = raw.into_payment_receipt_event();
            if let Some(receipt) = parse_payment_receipt(&event) {
                *totals.entry(receipt.referenced_attestation_id).or_insert(0) +=
                    receipt.amount_sats;
            }
        }
        totals
    }

    /// Orchestrator: fetches attestations and zap totals for `target` and
    /// scores them, recursively resolving attester trust up to
    /// `scoring_defaults.max_depth` with a fresh, invocation-scoped
    /// recursion cache (spec §4.3).
    pub async fn score(&self, target: Key) -> ScoreResult {
        let cache: RecursionCache = Arc::new(Mutex::new(HashMap::new()));
        self.score_at_depth(target, 0, cache).await
    }

    async fn score_at_depth(&self, target: Key, depth: u32, cache: RecursionCache) -> ScoreResult {
        let attestations = self.query_attestations(target, None).await;
        let ids: Vec<EventId> = attestations.iter().map(|a| a.id).collect();
        let zap_totals = self.query_zap_totals(&ids).await;

        let config = self.scoring_defaults.at_depth(depth);
        let resolver = RecursiveResolver {
            aggregator: self,
            cache,
            depth,
        };
        wot_scoring::score(&attestations, &zap_totals, &config, &resolver).await
    }
}

fn distinct_authors(attestations: &[Attestation]) -> Vec<Key> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for att in attestations {
        if seen.insert(att.author) {
            out.push(att.author);
        }
    }
    out
}

/// Implements [`ResolveAttester`] over a [`RelayAggregator`], memoising
/// resolved scores in a per-query cache and inserting a placeholder
/// zero-score before recursing so cycles terminate deterministically
/// (spec §4.3/§9).
struct RecursiveResolver<'a> {
    aggregator: &'a RelayAggregator,
    cache: RecursionCache,
    depth: u32,
}

#[async_trait]
impl<'a> ResolveAttester for RecursiveResolver<'a> {
    async fn resolve(&self, author: &Key) -> ScoreResult {
        if let Some(cached) = self.cache.lock().await.get(author) {
            return cached.clone();
        }
        {
            let mut guard = self.cache.lock().await;
            guard.entry(*author).or_insert_with(ScoreResult::empty);
        }
        let result = self
            .aggregator
            .score_at_depth(*author, self.depth + 1, Arc::clone(&self.cache))
            .await;
        self.cache.lock().await.insert(*author, result.clone());
        result
    }
}
