//! Tag-list parsing helpers shared by every event kind.
//!
//! An event's `tags` field is an ordered sequence of ordered sequences of
//! strings (`["p", "abc..."]`, `["l", "warning", "ai.wot"]`, ...). These
//! helpers implement the lenient parsing rules from spec §3/§6 in one
//! place so every typed-record parser agrees on what a tag "means".

use crate::key::Key;
use crate::EventId;

/// The byte-exact ASCII namespace string for this protocol.
pub const NAMESPACE: &str = "ai.wot";

/// Returns true if the namespace marker tag `["L", "ai.wot"]` is present.
pub fn has_namespace_marker(tags: &[Vec<String>]) -> bool {
    tags.iter()
        .any(|t| t.len() >= 2 && t[0] == "L" && t[1] == NAMESPACE)
}

/// Parses the attestation-type tag.
///
/// Strict form: `["l", TYPE, "ai.wot"]`. Lenient form: `["l", TYPE]` is
/// accepted only when the separate namespace marker tag is also present,
/// per spec §3's "lenient tag parser" note.
pub fn parse_type_tag<'a>(tags: &'a [Vec<String>]) -> Option<&'a str> {
    if let Some(t) = tags
        .iter()
        .find(|t| t.len() >= 3 && t[0] == "l" && t[2] == NAMESPACE)
    {
        return Some(t[1].as_str());
    }
    if has_namespace_marker(tags) {
        if let Some(t) = tags.iter().find(|t| t.len() == 2 && t[0] == "l") {
            return Some(t[1].as_str());
        }
    }
    None
}

/// Parses the first `["p", TARGET_KEY_HEX]` tag into a [`Key`].
pub fn parse_target_tag(tags: &[Vec<String>]) -> Option<Key> {
    tags.iter()
        .find(|t| t.len() >= 2 && t[0] == "p")
        .and_then(|t| Key::from_hex(&t[1]).ok())
}

/// Parses every `["e", EVENT_ID, RELAY_HINT?]` tag into `(id, relay_hint)`
/// pairs, skipping any whose id does not decode as a 64-hex `EventId`.
pub fn parse_event_refs(tags: &[Vec<String>]) -> Vec<(EventId, Option<String>)> {
    tags.iter()
        .filter(|t| t.len() >= 2 && t[0] == "e")
        .filter_map(|t| {
            EventId::from_hex(&t[1])
                .ok()
                .map(|id| (id, t.get(2).cloned()))
        })
        .collect()
}

/// Parses the first `["e", EVENT_ID, ...]` tag only.
pub fn parse_first_event_ref(tags: &[Vec<String>]) -> Option<EventId> {
    parse_event_refs(tags).into_iter().next().map(|(id, _)| id)
}

/// Parses the first `["p", KEY_HEX]` tag into a [`Key`] (used for
/// requester identification on service-result events, distinct from the
/// attestation target tag only in intent, not shape).
pub fn parse_first_p_tag(tags: &[Vec<String>]) -> Option<Key> {
    parse_target_tag(tags)
}

/// Parses an `["expiration", UNIX_SECS]` tag.
pub fn parse_expiration_tag(tags: &[Vec<String>]) -> Option<i64> {
    tags.iter()
        .find(|t| t.len() >= 2 && t[0] == "expiration")
        .and_then(|t| t[1].parse::<i64>().ok())
}

/// Parses a `["k", KIND_STR]` reference tag (used by revocations to name
/// the kind of event they delete).
pub fn parse_kind_ref_tag(tags: &[Vec<String>]) -> Option<&str> {
    tags.iter()
        .find(|t| t.len() >= 2 && t[0] == "k")
        .map(|t| t[1].as_str())
}

/// Parses the `["description", DOC]` tag's raw string value.
pub fn parse_description_tag<'a>(tags: &'a [Vec<String>]) -> Option<&'a str> {
    tags.iter()
        .find(|t| t.len() >= 2 && t[0] == "description")
        .map(|t| t[1].as_str())
}

/// Parses an `["amount", MILLISATS_DECIMAL]` tag as a non-negative integer.
///
/// Per spec §9's "typed conversion with explicit failure" guidance:
/// non-integer or negative values are treated as absent rather than
/// clamped or defaulted.
pub fn parse_amount_tag(tags: &[Vec<String>]) -> Option<u64> {
    tags.iter()
        .find(|t| t.len() >= 2 && t[0] == "amount")
        .and_then(|t| t[1].parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn strict_type_tag_parses() {
        let tags = vec![tag(&["l", "dispute", "ai.wot"])];
        assert_eq!(parse_type_tag(&tags), Some("dispute"));
    }

    #[test]
    fn lenient_type_tag_requires_namespace_marker() {
        let with_marker = vec![tag(&["L", "ai.wot"]), tag(&["l", "warning"])];
        assert_eq!(parse_type_tag(&with_marker), Some("warning"));

        let without_marker = vec![tag(&["l", "warning"])];
        assert_eq!(parse_type_tag(&without_marker), None);
    }

    #[test]
    fn amount_tag_rejects_non_integer() {
        let tags = vec![tag(&["amount", "not-a-number"])];
        assert_eq!(parse_amount_tag(&tags), None);
    }

    #[test]
    fn amount_tag_parses_valid_value() {
        let tags = vec![tag(&["amount", "21000"])];
        assert_eq!(parse_amount_tag(&tags), Some(21000));
    }
}
