use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use wot_candidates::{CandidateFilter, CandidateStore, CandidateStoreConfig, ConfirmEdits, NewCandidate};
use wot_relay::{AggregatorConfig, AlwaysValid, Filter, PublishOutcome, RawEvent, RelayAggregator, RelayTransport, Signer, UnsignedEvent};
use wot_scoring::ScoringConfig;
use wot_types::{AttestationType, EventId, Key};

struct AcceptingRelay;

#[async_trait]
impl RelayTransport for AcceptingRelay {
    fn name(&self) -> &str {
        "accepting"
    }
    async fn subscribe(&self, _filter: &Filter, _deadline: Duration) -> Vec<RawEvent> {
        Vec::new()
    }
    async fn publish(&self, _event: &RawEvent, _deadline: Duration) -> PublishOutcome {
        PublishOutcome {
            relay: "accepting".to_string(),
            accepted: true,
            reason: None,
        }
    }
}

struct RejectingRelay;

#[async_trait]
impl RelayTransport for RejectingRelay {
    fn name(&self) -> &str {
        "rejecting"
    }
    async fn subscribe(&self, _filter: &Filter, _deadline: Duration) -> Vec<RawEvent> {
        Vec::new()
    }
    async fn publish(&self, _event: &RawEvent, _deadline: Duration) -> PublishOutcome {
        PublishOutcome {
            relay: "rejecting".to_string(),
            accepted: false,
            reason: Some("not interested".to_string()),
        }
    }
}

struct FixedSigner(Key);

impl Signer for FixedSigner {
    fn public_key(&self) -> Key {
        self.0
    }
    fn sign(&self, unsigned: UnsignedEvent) -> RawEvent {
        RawEvent {
            id: EventId::from_bytes([0x42; 32]),
            author: unsigned.author,
            created_at: unsigned.created_at,
            kind: unsigned.kind,
            content: unsigned.content,
            tags: unsigned.tags,
            sig: vec![1, 2, 3],
        }
    }
}

#[derive(Default)]
struct RecordingListener {
    seen: Mutex<Vec<String>>,
}

impl wot_candidates::CandidateListener for RecordingListener {
    fn on_change(&self, candidate: &wot_types::Candidate) {
        self.seen.lock().unwrap_or_else(|p| p.into_inner()).push(candidate.id.to_string());
    }
}

fn store() -> CandidateStore {
    CandidateStore::new(CandidateStoreConfig::default(), None, None)
}

fn proposal(target: u8, comment: &str) -> NewCandidate {
    NewCandidate {
        attestation_type: Some(AttestationType::ServiceQuality),
        target: Some(Key::from_bytes([target; 32])),
        comment: comment.to_string(),
        event_ref: None,
        source: "manual".to_string(),
        metadata: Default::default(),
    }
}

#[test]
fn add_rejects_missing_fields() {
    let store = store();
    let mut bad = proposal(0xAA, "fine");
    bad.attestation_type = None;
    assert!(store.add(bad).is_err());

    let mut bad = proposal(0xAA, "fine");
    bad.target = None;
    assert!(store.add(bad).is_err());

    let bad = proposal(0xAA, "   ");
    assert!(store.add(bad).is_err());
}

#[test]
fn state_machine_rejects_illegal_transitions() {
    let store = store();
    let candidate = store.add(proposal(0xAA, "good service")).unwrap();

    store.reject(&candidate.id, "not convincing".to_string()).unwrap();

    // Already terminal: confirming a rejected candidate must fail.
    assert!(store.confirm(&candidate.id, ConfirmEdits::default()).is_err());
}

#[test]
fn list_sorts_newest_first_and_respects_limit() {
    let store = store();
    let _a = store.add(proposal(0xAA, "first")).unwrap();
    std::thread::sleep(Duration::from_millis(5));
    let b = store.add(proposal(0xBB, "second")).unwrap();

    let listed = store.list(&CandidateFilter {
        limit: Some(1),
        ..CandidateFilter::default()
    });
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, b.id);
}

#[test]
fn eviction_prefers_terminal_candidates_over_pending() {
    let mut config = CandidateStoreConfig::default();
    config.max_candidates = 2;
    let store = CandidateStore::new(config, None, None);

    let first = store.add(proposal(0xAA, "will be evicted")).unwrap();
    store.reject(&first.id, "no".to_string()).unwrap();
    let _second = store.add(proposal(0xBB, "still pending")).unwrap();

    // Store is now at capacity with one terminal + one pending; the next
    // add should evict the terminal one, not the pending one.
    let _third = store.add(proposal(0xCC, "newest")).unwrap();

    let all = store.list(&CandidateFilter {
        limit: Some(10),
        ..CandidateFilter::default()
    });
    assert!(all.iter().all(|c| c.id != first.id));
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn confirm_and_publish_marks_published_on_success() {
    let store = store();
    let candidate = store.add(proposal(0xAA, "great service")).unwrap();
    let signer = FixedSigner(Key::from_bytes([0x01; 32]));
    let relays = RelayAggregator::new(
        vec![Arc::new(AcceptingRelay)],
        Arc::new(AlwaysValid),
        AggregatorConfig::default(),
        ScoringConfig::default(),
    );

    let published = store
        .confirm_and_publish(&candidate.id, ConfirmEdits::default(), &signer, &relays)
        .await
        .unwrap();

    assert_eq!(published.status, wot_types::CandidateStatus::Published);
    assert!(published.published_event_id.is_some());
}

#[tokio::test]
async fn confirm_and_publish_leaves_candidate_confirmed_on_publish_failure() {
    let store = store();
    let candidate = store.add(proposal(0xAA, "great service")).unwrap();
    let signer = FixedSigner(Key::from_bytes([0x01; 32]));
    let relays = RelayAggregator::new(
        vec![Arc::new(RejectingRelay)],
        Arc::new(AlwaysValid),
        AggregatorConfig::default(),
        ScoringConfig::default(),
    );

    let result = store
        .confirm_and_publish(&candidate.id, ConfirmEdits::default(), &signer, &relays)
        .await;
    assert!(result.is_err());

    let reloaded = store.list(&CandidateFilter::default());
    let still_confirmed = reloaded.iter().find(|c| c.id == candidate.id).unwrap();
    assert_eq!(still_confirmed.status, wot_types::CandidateStatus::Confirmed);
}

#[tokio::test]
async fn publish_all_confirmed_reports_per_candidate_outcomes() {
    let store = store();
    let a = store.add(proposal(0xAA, "one")).unwrap();
    let b = store.add(proposal(0xBB, "two")).unwrap();
    store.confirm(&a.id, ConfirmEdits::default()).unwrap();
    store.confirm(&b.id, ConfirmEdits::default()).unwrap();

    let signer = FixedSigner(Key::from_bytes([0x01; 32]));
    let relays = RelayAggregator::new(
        vec![Arc::new(AcceptingRelay)],
        Arc::new(AlwaysValid),
        AggregatorConfig::default(),
        ScoringConfig::default(),
    );

    let outcomes = store.publish_all_confirmed(&signer, &relays).await;
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|(_, result)| result.is_ok()));
}

#[test]
fn expired_pending_candidates_are_reflected_in_stats() {
    // `max_age` and `created_at` both resolve to whole Unix seconds, so the
    // sleep below must cross a full second boundary to register as expired.
    let mut config = CandidateStoreConfig::default();
    config.max_age = Duration::from_secs(0);
    let store = CandidateStore::new(config, None, None);

    let _candidate = store.add(proposal(0xAA, "will time out")).unwrap();
    std::thread::sleep(Duration::from_millis(1050));

    let pending = store.list(&CandidateFilter {
        status: Some(wot_types::CandidateStatus::Pending),
        ..CandidateFilter::default()
    });
    assert!(pending.is_empty());
    assert_eq!(store.stats().expired, 1);
}

#[test]
fn listener_is_notified_on_every_transition() {
    let listener = Arc::new(RecordingListener::default());
    let store = CandidateStore::new(CandidateStoreConfig::default(), None, Some(listener.clone()));

    let candidate = store.add(proposal(0xAA, "good")).unwrap();
    store.confirm(&candidate.id, ConfirmEdits::default()).unwrap();

    let seen = listener.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|id| id == &candidate.id.to_string()));
}
