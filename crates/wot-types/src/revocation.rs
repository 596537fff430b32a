use serde::{Deserialize, Serialize};

use crate::key::{EventId, Key};
use crate::tags;

/// The wire-level envelope for a deletion event (kind 5), before it has
/// been confirmed to reference kind-1985 attestations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevocationEvent {
    pub id: EventId,
    pub author: Key,
    pub created_at: i64,
    /// Free-form reason; must be non-empty for the event to be well-formed.
    pub content: String,
    pub tags: Vec<Vec<String>>,
}

/// A signed deletion record from the original author of one or more
/// attestations (spec §3). Only effective when `author` matches the
/// attestation's own author — enforced by the relay aggregator, which
/// restricts revocation queries to authors actually present in the
/// attestation bag (spec §4.4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revocation {
    pub id: EventId,
    pub author: Key,
    pub created_at: i64,
    pub referenced_ids: Vec<EventId>,
}

/// Parses a [`RevocationEvent`] into a [`Revocation`].
///
/// Requires the `["k", "1985"]` kind-reference tag, at least one `["e", ...]`
/// reference, and non-empty content (spec §6).
pub fn parse_revocation(event: &RevocationEvent) -> Option<Revocation> {
    if event.content.trim().is_empty() {
        return None;
    }
    if tags::parse_kind_ref_tag(&event.tags) != Some("1985") {
        return None;
    }
    let referenced_ids = tags::parse_event_refs(&event.tags)
        .into_iter()
        .map(|(id, _)| id)
        .collect::<Vec<_>>();
    if referenced_ids.is_empty() {
        return None;
    }
    Some(Revocation {
        id: event.id,
        author: event.author,
        created_at: event.created_at,
        referenced_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rejects_empty_content() {
        let ev = RevocationEvent {
            id: EventId::from_hex(&"1".repeat(64)).unwrap(),
            author: Key::from_hex(&"2".repeat(64)).unwrap(),
            created_at: 0,
            content: "   ".to_string(),
            tags: vec![
                tag(&["k", "1985"]),
                tag(&["e", &"3".repeat(64)]),
            ],
        };
        assert!(parse_revocation(&ev).is_none());
    }

    #[test]
    fn parses_well_formed_revocation() {
        let target_id = EventId::from_hex(&"3".repeat(64)).unwrap();
        let ev = RevocationEvent {
            id: EventId::from_hex(&"1".repeat(64)).unwrap(),
            author: Key::from_hex(&"2".repeat(64)).unwrap(),
            created_at: 0,
            content: "no longer trust this".to_string(),
            tags: vec![tag(&["k", "1985"]), tag(&["e", &"3".repeat(64)])],
        };
        let rev = parse_revocation(&ev).unwrap();
        assert_eq!(rev.referenced_ids, vec![target_id]);
    }
}
