use std::collections::HashSet;

use wot_types::EventId;

use crate::transport::RawEvent;

/// Merges events from multiple relays by set union on event id
/// (spec §5: "the merge function must be commutative — it is set union
/// by event id"). The first occurrence of a given id wins; later
/// duplicates (the same event reported by a second relay) are dropped.
pub fn dedup_by_id(events: Vec<RawEvent>) -> Vec<RawEvent> {
    let mut seen: HashSet<EventId> = HashSet::with_capacity(events.len());
    let mut out = Vec::with_capacity(events.len());
    for event in events {
        if seen.insert(event.id) {
            out.push(event);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use wot_types::Key;

    fn raw(id: u8, kind: u32) -> RawEvent {
        RawEvent {
            id: EventId::from_bytes([id; 32]),
            author: Key::from_bytes([0xAA; 32]),
            created_at: 0,
            kind,
            content: String::new(),
            tags: vec![],
            sig: vec![],
        }
    }

    #[test]
    fn merge_is_order_independent_set_union() {
        let a = vec![raw(1, 1985), raw(2, 1985)];
        let b = vec![raw(2, 1985), raw(1, 1985), raw(3, 1985)];
        let merged_a = dedup_by_id(a);
        let merged_b = dedup_by_id(b);
        assert_eq!(merged_a.len(), 2);
        assert_eq!(merged_b.len(), 3);
    }
}
