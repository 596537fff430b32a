use wot_types::Candidate;

/// Durable storage seam: invoked synchronously with the full exported list
/// after every state change (spec §4.6). The store has no file-format
/// opinion of its own — a caller wanting JSON-on-disk persistence wires in
/// an implementation here, following the same inversion pattern as
/// `wot_relay::RelayTransport`.
///
/// A panic or long-running call inside `save` is the implementor's
/// problem; the store only guarantees the call happens, not that it
/// succeeds. Per spec §4.6, any failure signalled by the implementation
/// (e.g. logged and swallowed internally) must never propagate back into
/// the store's in-memory state.
pub trait CandidatePersistence: Send + Sync {
    fn save(&self, candidates: &[Candidate]);
}

/// Change-notification seam, invoked once per successful state transition
/// (spec §4.6), e.g. to drive a UI or webhook.
pub trait CandidateListener: Send + Sync {
    fn on_change(&self, candidate: &Candidate);
}
