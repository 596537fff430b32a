use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use wot_relay::{AggregatorConfig, AlwaysValid, Filter, PublishOutcome, RawEvent, RelayAggregator, RelayTransport};
use wot_scoring::ScoringConfig;
use wot_types::{EventId, Key};

/// An in-memory relay that serves a fixed pool of events out of a simple
/// tag-aware filter match, standing in for the real socket/wire-framing
/// collaborator in tests.
struct FakeRelay {
    label: String,
    events: Vec<RawEvent>,
}

fn has_tag(tags: &[Vec<String>], name: &str, value: &str) -> bool {
    tags.iter().any(|t| t.len() >= 2 && t[0] == name && t[1] == value)
}

fn matches(filter: &Filter, event: &RawEvent) -> bool {
    if !filter.kinds.is_empty() && !filter.kinds.contains(&event.kind) {
        return false;
    }
    if !filter.authors.is_empty() && !filter.authors.contains(&event.author.to_hex()) {
        return false;
    }
    if !filter.tag_l_upper.is_empty()
        && !filter.tag_l_upper.iter().any(|v| has_tag(&event.tags, "L", v))
    {
        return false;
    }
    if !filter.tag_p.is_empty() && !filter.tag_p.iter().any(|v| has_tag(&event.tags, "p", v)) {
        return false;
    }
    if !filter.tag_e.is_empty() && !filter.tag_e.iter().any(|v| has_tag(&event.tags, "e", v)) {
        return false;
    }
    true
}

#[async_trait]
impl RelayTransport for FakeRelay {
    fn name(&self) -> &str {
        &self.label
    }

    async fn subscribe(&self, filter: &Filter, _deadline: Duration) -> Vec<RawEvent> {
        self.events
            .iter()
            .filter(|e| matches(filter, e))
            .cloned()
            .collect()
    }

    async fn publish(&self, _event: &RawEvent, _deadline: Duration) -> PublishOutcome {
        PublishOutcome {
            relay: self.label.clone(),
            accepted: true,
            reason: None,
        }
    }
}

fn key(byte: u8) -> Key {
    Key::from_bytes([byte; 32])
}

fn event_id(byte: u8) -> EventId {
    EventId::from_bytes([byte; 32])
}

fn attestation_event(id: u8, author: u8, target: u8, created_at: i64) -> RawEvent {
    RawEvent {
        id: event_id(id),
        author: key(author),
        created_at,
        kind: 1985,
        content: "solid work".to_string(),
        tags: vec![
            vec!["L".to_string(), "ai.wot".to_string()],
            vec!["l".to_string(), "service-quality".to_string(), "ai.wot".to_string()],
            vec!["p".to_string(), key(target).to_hex()],
        ],
        sig: vec![],
    }
}

fn revocation_event(id: u8, revoking_author: u8, target_attestation: u8, created_at: i64) -> RawEvent {
    RawEvent {
        id: event_id(id),
        author: key(revoking_author),
        created_at,
        kind: 5,
        content: "retracted".to_string(),
        tags: vec![
            vec!["k".to_string(), "1985".to_string()],
            vec!["e".to_string(), event_id(target_attestation).to_hex()],
        ],
        sig: vec![],
    }
}

fn aggregator(events: Vec<RawEvent>) -> RelayAggregator {
    let relay = Arc::new(FakeRelay {
        label: "fake".to_string(),
        events,
    });
    RelayAggregator::new(
        vec![relay],
        Arc::new(AlwaysValid),
        AggregatorConfig::default(),
        ScoringConfig {
            now: 1_700_000_000,
            ..ScoringConfig::default()
        },
    )
}

#[tokio::test]
async fn self_attestations_are_always_excluded_from_the_score() {
    let target = key(0xCC);
    let attester = key(0xAA);
    let without_self = aggregator(vec![attestation_event(1, attester.as_bytes()[0], 0xCC, 1_700_000_000)]);
    let with_self = aggregator(vec![
        attestation_event(1, attester.as_bytes()[0], 0xCC, 1_700_000_000),
        attestation_event(2, 0xCC, 0xCC, 1_700_000_000),
    ]);

    let a = without_self.score(target).await;
    let b = with_self.score(target).await;
    assert_eq!(a, b, "a self-authored attestation must never affect the target's own score");
}

#[tokio::test]
async fn duplicate_revocations_of_the_same_attestation_are_idempotent() {
    let target = key(0xCC);
    let attester_byte = 0xAA;

    let once_revoked = aggregator(vec![
        attestation_event(1, attester_byte, 0xCC, 1_700_000_000),
        revocation_event(10, attester_byte, 1, 1_700_000_100),
    ]);
    let twice_revoked = aggregator(vec![
        attestation_event(1, attester_byte, 0xCC, 1_700_000_000),
        revocation_event(10, attester_byte, 1, 1_700_000_100),
        revocation_event(11, attester_byte, 1, 1_700_000_200),
    ]);

    let a = once_revoked.score(target).await;
    let b = twice_revoked.score(target).await;
    assert_eq!(a, b, "a repeated revocation of an already-revoked attestation changes nothing");
    assert_eq!(a.attestation_count, 0, "the sole attestation was revoked by its own author");
}

#[tokio::test]
async fn revocation_by_a_different_author_has_no_effect() {
    let target = key(0xCC);
    let attestation_author = 0xAA;
    let impostor = 0xEE;

    let unrevoked = aggregator(vec![attestation_event(1, attestation_author, 0xCC, 1_700_000_000)]);
    let fake_revocation = aggregator(vec![
        attestation_event(1, attestation_author, 0xCC, 1_700_000_000),
        revocation_event(10, impostor, 1, 1_700_000_100),
    ]);

    let a = unrevoked.score(target).await;
    let b = fake_revocation.score(target).await;
    assert_eq!(a, b, "only the attestation's own author can revoke it");
    assert_eq!(b.attestation_count, 1);
}

#[tokio::test]
async fn empty_relay_pool_scores_to_empty_result() {
    let agg = aggregator(vec![]);
    let result = agg.score(key(0x01)).await;
    assert_eq!(result, wot_types::ScoreResult::empty());
}
