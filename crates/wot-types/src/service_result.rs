use serde::{Deserialize, Serialize};

use crate::key::{EventId, Key};
use crate::tags;

/// The wire-level envelope for a service-result event, kind in
/// `[6000, 6999]` (spec §3/§6). Used by the Receipt Constructor only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResultEvent {
    pub id: EventId,
    pub author: Key,
    pub created_at: i64,
    pub kind: u32,
    pub content: String,
    pub tags: Vec<Vec<String>>,
}

/// The range of kinds recognised as service results.
pub const KIND_RANGE: std::ops::RangeInclusive<u32> = 6000..=6999;

/// A parsed service-result record (spec §4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResult {
    pub result_event_id: EventId,
    /// `kind - 1000`, the kind of the originating request.
    pub request_kind: u32,
    pub request_event_id: Option<EventId>,
    pub provider_key: Key,
    pub requester_key: Option<Key>,
    /// Floor-divided from the `amount` tag's millisats, if present.
    pub amount_sats: Option<u64>,
}

/// Parses a [`ServiceResultEvent`] into a [`ServiceResult`].
///
/// Returns `None` if the kind is outside `[6000, 6999]`. Missing `e`/`p`
/// tags and a missing or malformed `amount` tag degrade to `None` fields
/// rather than failing the whole parse (spec §4.5 only requires
/// `provider_key`, which is always the event's author, and the result
/// event id itself, which is always present).
pub fn parse_service_result(event: &ServiceResultEvent) -> Option<ServiceResult> {
    if !KIND_RANGE.contains(&event.kind) {
        return None;
    }
    Some(ServiceResult {
        result_event_id: event.id,
        request_kind: event.kind - 1000,
        request_event_id: tags::parse_first_event_ref(&event.tags),
        provider_key: event.author,
        requester_key: tags::parse_first_p_tag(&event.tags),
        amount_sats: tags::parse_amount_tag(&event.tags).map(|msats| msats / 1000),
    })
}
