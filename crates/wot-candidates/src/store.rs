use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use rand::RngCore;
use wot_receipts::{build_receipt_body, ReceiptOptions};
use wot_relay::{RelayAggregator, Signer, UnsignedEvent};
use wot_types::{AttestationType, Candidate, CandidateId, CandidateStatus, EventId, Key, ServiceResult};

use crate::config::{now_unix, CandidateStoreConfig};
use crate::error::CandidateError;
use crate::traits::{CandidateListener, CandidatePersistence};

/// Input to [`CandidateStore::add`] (spec §4.6). `attestation_type` and
/// `target` are `Option` here (rather than mandatory fields) because a
/// proposer — e.g. a live watcher composed by the caller — may not always
/// have resolved them yet; `add` rejects a proposal missing either, or
/// carrying an empty `comment`.
#[derive(Debug, Clone, Default)]
pub struct NewCandidate {
    pub attestation_type: Option<AttestationType>,
    pub target: Option<Key>,
    pub comment: String,
    pub event_ref: Option<EventId>,
    pub source: String,
    pub metadata: BTreeMap<String, String>,
}

impl NewCandidate {
    /// Builds a candidate proposal from a service result via the receipt
    /// constructor, tagging its `source` so downstream consumers can tell
    /// a DVM-derived proposal apart from a manually entered one.
    pub fn from_service_result(
        service_result: &ServiceResult,
        options: &ReceiptOptions,
        source: impl Into<String>,
    ) -> Self {
        let body = build_receipt_body(service_result, options);
        Self {
            attestation_type: Some(body.attestation_type),
            target: Some(body.target),
            comment: body.comment,
            event_ref: Some(body.event_ref),
            source: source.into(),
            metadata: BTreeMap::new(),
        }
    }
}

/// Optional edits applied by [`CandidateStore::confirm`] (spec §4.6).
/// `metadata` entries are merged into the candidate's existing map rather
/// than replacing it wholesale.
#[derive(Debug, Clone, Default)]
pub struct ConfirmEdits {
    pub comment: Option<String>,
    pub attestation_type: Option<AttestationType>,
    pub metadata: BTreeMap<String, String>,
}

/// Filter and pagination for [`CandidateStore::list`] (spec §4.6).
#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    pub status: Option<CandidateStatus>,
    pub target: Option<Key>,
    pub source: Option<String>,
    /// Defaults to `config.default_list_limit` when `None`.
    pub limit: Option<usize>,
}

/// Per-status counts returned by [`CandidateStore::stats`] (spec §4.6/§8).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CandidateStats {
    pub pending: usize,
    pub confirmed: usize,
    pub rejected: usize,
    pub published: usize,
    pub expired: usize,
}

/// A bounded, durable, human-in-the-loop queue of proposed attestations
/// (spec §4.6). All mutating operations serialize on a single internal
/// lock, per spec §5's "single lock per structure" rule.
pub struct CandidateStore {
    candidates: Mutex<HashMap<CandidateId, Candidate>>,
    config: CandidateStoreConfig,
    persistence: Option<Arc<dyn CandidatePersistence>>,
    listener: Option<Arc<dyn CandidateListener>>,
}

impl CandidateStore {
    pub fn new(
        config: CandidateStoreConfig,
        persistence: Option<Arc<dyn CandidatePersistence>>,
        listener: Option<Arc<dyn CandidateListener>>,
    ) -> Self {
        Self {
            candidates: Mutex::new(HashMap::new()),
            config,
            persistence,
            listener,
        }
    }

    /// Seeds the store from a previously persisted export. Loaded
    /// candidates keep whatever status they were saved with — a
    /// `rejected` or `published` candidate loaded this way is never
    /// re-exposed as actionable (spec §4.6).
    pub fn load(&self, candidates: Vec<Candidate>) {
        let mut guard = self.lock();
        for candidate in candidates {
            guard.insert(candidate.id.clone(), candidate);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CandidateId, Candidate>> {
        self.candidates.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist_locked(&self, guard: &HashMap<CandidateId, Candidate>) {
        if let Some(persistence) = &self.persistence {
            let export: Vec<Candidate> = guard.values().cloned().collect();
            persistence.save(&export);
        }
    }

    fn notify(&self, candidate: &Candidate) {
        if let Some(listener) = &self.listener {
            listener.on_change(candidate);
        }
    }

    fn evict_if_full(&self, guard: &mut HashMap<CandidateId, Candidate>) {
        if guard.len() < self.config.max_candidates {
            return;
        }
        let victim = guard
            .values()
            .filter(|c| c.status.is_terminal())
            .min_by_key(|c| c.created_at)
            .map(|c| c.id.clone())
            .or_else(|| {
                guard
                    .values()
                    .filter(|c| c.status == CandidateStatus::Pending)
                    .min_by_key(|c| c.created_at)
                    .map(|c| c.id.clone())
            });
        if let Some(id) = victim {
            guard.remove(&id);
        }
    }

    /// Moves any pending candidate past `max_age` to `expired`, returning
    /// the ones that changed so the caller can notify after releasing the
    /// lock (spec §4.6: "reassesses expiry lazily... on the next
    /// enumeration").
    fn reassess_expiry_locked(&self, guard: &mut HashMap<CandidateId, Candidate>) -> Vec<Candidate> {
        let now = now_unix();
        let max_age_secs = self.config.max_age.as_secs() as i64;
        let mut changed = Vec::new();
        for candidate in guard.values_mut() {
            if candidate.status == CandidateStatus::Pending && now - candidate.created_at > max_age_secs {
                candidate.status = CandidateStatus::Expired;
                candidate.updated_at = now;
                changed.push(candidate.clone());
            }
        }
        if !changed.is_empty() {
            self.persist_locked(guard);
        }
        changed
    }

    fn require_status(candidate: &Candidate, expected: CandidateStatus) -> Result<(), CandidateError> {
        if candidate.status != expected {
            return Err(CandidateError::IllegalTransition {
                id: candidate.id.clone(),
                actual: candidate.status,
                expected,
            });
        }
        Ok(())
    }

    /// Validates and enqueues a new pending candidate, evicting an
    /// existing one first if the store is at capacity (spec §4.6).
    pub fn add(&self, input: NewCandidate) -> Result<Candidate, CandidateError> {
        let attestation_type = input.attestation_type.ok_or(CandidateError::MissingType)?;
        let target = input.target.ok_or(CandidateError::MissingTarget)?;
        if input.comment.trim().is_empty() {
            return Err(CandidateError::MissingComment);
        }

        let now = now_unix();
        let candidate = Candidate {
            id: generate_candidate_id(),
            status: CandidateStatus::Pending,
            attestation_type,
            target,
            comment: input.comment,
            event_ref: input.event_ref,
            source: input.source,
            metadata: input.metadata,
            created_at: now,
            updated_at: now,
            published_event_id: None,
            rejection_reason: None,
        };

        let mut guard = self.lock();
        self.evict_if_full(&mut guard);
        guard.insert(candidate.id.clone(), candidate.clone());
        self.persist_locked(&guard);
        drop(guard);

        tracing::info!(id = %candidate.id, target = %candidate.target, "candidate added");
        self.notify(&candidate);
        Ok(candidate)
    }

    /// Lists candidates matching `filter`, newest first, lazily expiring
    /// any stale pending candidates first (spec §4.6).
    pub fn list(&self, filter: &CandidateFilter) -> Vec<Candidate> {
        let mut guard = self.lock();
        let expired = self.reassess_expiry_locked(&mut guard);

        let mut items: Vec<Candidate> = guard
            .values()
            .filter(|c| filter.status.map_or(true, |s| c.status == s))
            .filter(|c| filter.target.map_or(true, |t| c.target == t))
            .filter(|c| filter.source.as_ref().map_or(true, |s| &c.source == s))
            .cloned()
            .collect();
        drop(guard);

        for candidate in &expired {
            self.notify(candidate);
        }

        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items.truncate(filter.limit.unwrap_or(self.config.default_list_limit));
        items
    }

    /// Counts candidates by status, lazily expiring stale pending
    /// candidates first, the same way [`Self::list`] does (spec §4.6:
    /// "Listing/stats reassesses expiry lazily").
    pub fn stats(&self) -> CandidateStats {
        let mut guard = self.lock();
        let expired = self.reassess_expiry_locked(&mut guard);

        let mut stats = CandidateStats::default();
        for candidate in guard.values() {
            match candidate.status {
                CandidateStatus::Pending => stats.pending += 1,
                CandidateStatus::Confirmed => stats.confirmed += 1,
                CandidateStatus::Rejected => stats.rejected += 1,
                CandidateStatus::Published => stats.published += 1,
                CandidateStatus::Expired => stats.expired += 1,
            }
        }
        drop(guard);

        for candidate in &expired {
            self.notify(candidate);
        }
        stats
    }

    fn get(&self, id: &CandidateId) -> Result<Candidate, CandidateError> {
        self.lock()
            .get(id)
            .cloned()
            .ok_or_else(|| CandidateError::NotFound(id.clone()))
    }

    /// Transitions a pending candidate to confirmed, applying optional
    /// edits (spec §4.6).
    pub fn confirm(&self, id: &CandidateId, edits: ConfirmEdits) -> Result<Candidate, CandidateError> {
        let mut guard = self.lock();
        let candidate = guard.get_mut(id).ok_or_else(|| CandidateError::NotFound(id.clone()))?;
        Self::require_status(candidate, CandidateStatus::Pending)?;

        if let Some(comment) = edits.comment {
            candidate.comment = comment;
        }
        if let Some(attestation_type) = edits.attestation_type {
            candidate.attestation_type = attestation_type;
        }
        candidate.metadata.extend(edits.metadata);
        candidate.status = CandidateStatus::Confirmed;
        candidate.updated_at = now_unix();
        let result = candidate.clone();

        self.persist_locked(&guard);
        drop(guard);
        tracing::info!(id = %result.id, "candidate confirmed");
        self.notify(&result);
        Ok(result)
    }

    /// Transitions a pending candidate to rejected, recording `reason`
    /// (spec §4.6).
    pub fn reject(&self, id: &CandidateId, reason: String) -> Result<Candidate, CandidateError> {
        let mut guard = self.lock();
        let candidate = guard.get_mut(id).ok_or_else(|| CandidateError::NotFound(id.clone()))?;
        Self::require_status(candidate, CandidateStatus::Pending)?;

        candidate.status = CandidateStatus::Rejected;
        candidate.rejection_reason = Some(reason);
        candidate.updated_at = now_unix();
        let result = candidate.clone();

        self.persist_locked(&guard);
        drop(guard);
        tracing::info!(id = %result.id, "candidate rejected");
        self.notify(&result);
        Ok(result)
    }

    /// Transitions a confirmed candidate to published, recording the
    /// resulting event id (spec §4.6).
    pub fn mark_published(&self, id: &CandidateId, event_id: EventId) -> Result<Candidate, CandidateError> {
        let mut guard = self.lock();
        let candidate = guard.get_mut(id).ok_or_else(|| CandidateError::NotFound(id.clone()))?;
        Self::require_status(candidate, CandidateStatus::Confirmed)?;

        candidate.status = CandidateStatus::Published;
        candidate.published_event_id = Some(event_id);
        candidate.updated_at = now_unix();
        let result = candidate.clone();

        self.persist_locked(&guard);
        drop(guard);
        tracing::info!(id = %result.id, event_id = %event_id, "candidate published");
        self.notify(&result);
        Ok(result)
    }

    /// Signs and publishes an already-`confirmed` candidate, then marks it
    /// published. Used by both [`Self::confirm_and_publish`] and
    /// [`Self::publish_all_confirmed`].
    async fn publish_confirmed(
        &self,
        id: &CandidateId,
        signer: &dyn Signer,
        relays: &RelayAggregator,
    ) -> Result<Candidate, CandidateError> {
        let candidate = self.get(id)?;
        Self::require_status(&candidate, CandidateStatus::Confirmed)?;

        let unsigned = UnsignedEvent {
            author: signer.public_key(),
            created_at: now_unix(),
            kind: 1985,
            content: candidate.comment.clone(),
            tags: canonical_tags(&candidate),
        };
        let raw = signer.sign(unsigned);
        relays.publish(&raw).await.map_err(CandidateError::Publish)?;
        self.mark_published(id, raw.id)
    }

    /// Atomic convenience: confirm, then sign and publish, then mark
    /// published. A failure in the publish step leaves the candidate in
    /// `confirmed` (spec §4.6).
    pub async fn confirm_and_publish(
        &self,
        id: &CandidateId,
        edits: ConfirmEdits,
        signer: &dyn Signer,
        relays: &RelayAggregator,
    ) -> Result<Candidate, CandidateError> {
        self.confirm(id, edits)?;
        self.publish_confirmed(id, signer, relays).await
    }

    /// Publishes every currently confirmed candidate. Per-candidate
    /// failures are returned alongside their id, never thrown, so one bad
    /// relay round-trip cannot abort the rest of the batch (spec §4.6/§7).
    pub async fn publish_all_confirmed(
        &self,
        signer: &dyn Signer,
        relays: &RelayAggregator,
    ) -> Vec<(CandidateId, Result<Candidate, CandidateError>)> {
        let confirmed = self.list(&CandidateFilter {
            status: Some(CandidateStatus::Confirmed),
            limit: Some(usize::MAX),
            ..CandidateFilter::default()
        });

        let mut results = Vec::with_capacity(confirmed.len());
        for candidate in confirmed {
            let outcome = self.publish_confirmed(&candidate.id, signer, relays).await;
            results.push((candidate.id, outcome));
        }
        results
    }
}

fn canonical_tags(candidate: &Candidate) -> Vec<Vec<String>> {
    let mut tags = vec![
        vec!["L".to_string(), wot_types::tags::NAMESPACE.to_string()],
        vec![
            "l".to_string(),
            candidate.attestation_type.as_tag_str().to_string(),
            wot_types::tags::NAMESPACE.to_string(),
        ],
        vec!["p".to_string(), candidate.target.to_hex()],
    ];
    if let Some(event_ref) = candidate.event_ref {
        tags.push(vec!["e".to_string(), event_ref.to_hex()]);
    }
    tags
}

fn generate_candidate_id() -> CandidateId {
    let mut bytes = [0u8; 8];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    CandidateId::from_bytes(bytes)
}
