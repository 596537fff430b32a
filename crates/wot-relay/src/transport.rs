use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use wot_types::{
    Attestation, EventId, Key, PaymentReceiptEvent, RevocationEvent, ServiceResultEvent,
};

/// A subscribe-with-filter request, matching the assumed relay protocol
/// of spec §6 (`kinds`, `#L`, `#l`, `#p`, `authors`, `ids`, `#e`, `since`,
/// `limit`). The concrete `REQ`/`EOSE`/`CLOSE` wire framing is an external
/// collaborator; this struct is the framing-agnostic filter shape a
/// [`RelayTransport`] translates into wire bytes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Filter {
    pub kinds: Vec<u32>,
    #[serde(rename = "#L")]
    pub tag_l_upper: Vec<String>,
    #[serde(rename = "#l")]
    pub tag_l_lower: Vec<String>,
    #[serde(rename = "#p")]
    pub tag_p: Vec<String>,
    pub authors: Vec<String>,
    pub ids: Vec<String>,
    #[serde(rename = "#e")]
    pub tag_e: Vec<String>,
    pub since: Option<i64>,
    pub limit: Option<u32>,
}

/// The wire-level shape of any event kind this protocol deals with: an
/// attestation, a revocation, a payment receipt, or a service result. All
/// typed parsing happens at the edge, via the `into_*` conversions below
/// (spec §9's "strongly-typed tag-list struct for the raw event").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub id: EventId,
    pub author: Key,
    pub created_at: i64,
    pub kind: u32,
    pub content: String,
    pub tags: Vec<Vec<String>>,
    pub sig: Vec<u8>,
}

impl RawEvent {
    pub fn into_attestation(self) -> Attestation {
        Attestation {
            id: self.id,
            author: self.author,
            created_at: self.created_at,
            content: self.content,
            tags: self.tags,
            sig: self.sig,
        }
    }

    pub fn into_revocation_event(self) -> RevocationEvent {
        RevocationEvent {
            id: self.id,
            author: self.author,
            created_at: self.created_at,
            content: self.content,
            tags: self.tags,
        }
    }

    pub fn into_payment_receipt_event(self) -> PaymentReceiptEvent {
        PaymentReceiptEvent {
            id: self.id,
            author: self.author,
            created_at: self.created_at,
            tags: self.tags,
        }
    }

    pub fn into_service_result_event(self) -> ServiceResultEvent {
        ServiceResultEvent {
            id: self.id,
            author: self.author,
            created_at: self.created_at,
            kind: self.kind,
            content: self.content,
            tags: self.tags,
        }
    }
}

/// The outcome of publishing one event to one relay (spec §4.3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishOutcome {
    pub relay: String,
    pub accepted: bool,
    pub reason: Option<String>,
}

/// The relay-network seam: real socket plumbing, reconnection, and the
/// `REQ`/`EVENT`/`EOSE`/`CLOSE` wire framing of spec §6 live behind this
/// trait, supplied by the caller. `wot-relay` owns only the fan-out,
/// merge, and deadline logic around it.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// A short, stable label for this relay, used in logs and
    /// [`PublishOutcome::relay`].
    fn name(&self) -> &str;

    /// Opens a subscription for `filter`, accumulates events until the
    /// relay signals end-of-stored-events or `deadline` elapses, then
    /// returns whatever arrived. Must never block past `deadline`.
    async fn subscribe(&self, filter: &Filter, deadline: Duration) -> Vec<RawEvent>;

    /// Sends `event` and resolves on the first accepted/rejected reply
    /// for its id, or `deadline`, whichever comes first.
    async fn publish(&self, event: &RawEvent, deadline: Duration) -> PublishOutcome;
}

/// Verifies that an event's detached signature is bound to its claimed
/// author key. The signing/verification primitive itself is an external
/// collaborator (spec §1); this trait is only the seam the aggregator
/// calls into.
pub trait Verifier: Send + Sync {
    fn verify(&self, event: &RawEvent) -> bool;
}

/// A verifier that accepts everything, useful for tests and for callers
/// who verify signatures upstream of the transport layer.
pub struct AlwaysValid;

impl Verifier for AlwaysValid {
    fn verify(&self, _event: &RawEvent) -> bool {
        true
    }
}

/// An as-yet-unsigned event, handed to a [`Signer`] to produce a
/// [`RawEvent`] with `id` and `sig` populated. `id` is expected to be a
/// canonical content hash of the remaining fields, computed by the
/// signer; `wot-relay` never computes it itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsignedEvent {
    pub author: Key,
    pub created_at: i64,
    pub kind: u32,
    pub content: String,
    pub tags: Vec<Vec<String>>,
}

/// The event-signing primitive: an external collaborator per spec §1. Key
/// custody lives entirely behind this trait; `wot-relay` and `wot-candidates`
/// only ever see the public key this signer speaks for.
pub trait Signer: Send + Sync {
    /// The public key this signer produces signatures for.
    fn public_key(&self) -> Key;

    fn sign(&self, unsigned: UnsignedEvent) -> RawEvent;
}
