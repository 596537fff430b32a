//! A small, intentionally incomplete lookup table from request kind to a
//! human-readable label for the receipt comment (spec §4.5). Unknown
//! kinds degrade to `KIND-UNKNOWN` rather than failing the whole
//! construction, per §7's "degrade gracefully" policy.

const KNOWN_KINDS: &[(u32, &str)] = &[
    (5000, "text-extraction"),
    (5001, "summarization"),
    (5002, "translation"),
    (5003, "image-generation"),
    (5050, "text-to-speech"),
    (5100, "embedding"),
];

/// Returns the human-readable label for a request kind, or `KIND-UNKNOWN`.
pub fn kind_name(request_kind: u32) -> &'static str {
    KNOWN_KINDS
        .iter()
        .find(|(kind, _)| *kind == request_kind)
        .map(|(_, name)| *name)
        .unwrap_or("KIND-UNKNOWN")
}
