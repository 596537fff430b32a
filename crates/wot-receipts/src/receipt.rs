use wot_types::{AttestationType, EventId, Key, ServiceResult};

use crate::kind_names::kind_name;

/// Overrides accepted by [`build_receipt_body`] (spec §4.5). All fields are
/// optional; the defaults match the spec's stated behaviour.
#[derive(Debug, Clone, Default)]
pub struct ReceiptOptions {
    /// Defaults to [`AttestationType::ServiceQuality`] when `None`.
    pub attestation_type: Option<AttestationType>,
    /// Clamped into `[1, 5]` if present.
    pub rating: Option<u8>,
    /// Appended verbatim as the final comment segment, if present.
    pub free_text: Option<String>,
}

/// A canonical, publish-ready attestation body built from a service result
/// (spec §4.5). Carries no signature or event id of its own; the caller
/// hands this to a `Signer` to produce a publishable event.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptBody {
    pub attestation_type: AttestationType,
    pub target: Key,
    pub comment: String,
    pub event_ref: EventId,
    pub tags: Vec<Vec<String>>,
}

/// Builds a [`ReceiptBody`] from a parsed [`ServiceResult`].
///
/// `provider_key` and `result_event_id` are mandatory inputs in the
/// language-independent design this crate follows; here they are
/// structural fields of [`ServiceResult`] (a [`Key`] and an [`EventId`],
/// never optional), so the "missing input" rejection from that design is
/// already enforced by the type checker — there is no reachable failure
/// mode left to surface at runtime, so this function is infallible.
pub fn build_receipt_body(service_result: &ServiceResult, options: &ReceiptOptions) -> ReceiptBody {
    let attestation_type = options.attestation_type.unwrap_or(AttestationType::ServiceQuality);
    let rating = options.rating.map(|r| r.clamp(1, 5));

    let mut segments = vec!["DVM receipt".to_string()];
    segments.push(format!(
        "kind:{} ({})",
        service_result.request_kind,
        kind_name(service_result.request_kind)
    ));
    if let Some(sats) = service_result.amount_sats {
        segments.push(format!("{sats} sats"));
    }
    if let Some(rating) = rating {
        segments.push(format!("rating:{rating}/5"));
    }
    if let Some(free_text) = &options.free_text {
        segments.push(free_text.clone());
    }
    let comment = segments.join(" | ");

    let tags = vec![
        vec!["L".to_string(), wot_types::tags::NAMESPACE.to_string()],
        vec![
            "l".to_string(),
            attestation_type.as_tag_str().to_string(),
            wot_types::tags::NAMESPACE.to_string(),
        ],
        vec!["p".to_string(), service_result.provider_key.to_hex()],
        vec!["e".to_string(), service_result.result_event_id.to_hex()],
    ];

    ReceiptBody {
        attestation_type,
        target: service_result.provider_key,
        comment,
        event_ref: service_result.result_event_id,
        tags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_result(amount_sats: Option<u64>) -> ServiceResult {
        ServiceResult {
            result_event_id: EventId::from_bytes([0x11; 32]),
            request_kind: 5050,
            request_event_id: Some(EventId::from_bytes([0x22; 32])),
            provider_key: Key::from_bytes([0xAA; 32]),
            requester_key: Some(Key::from_bytes([0xBB; 32])),
            amount_sats,
        }
    }

    #[test]
    fn defaults_to_service_quality_and_targets_the_provider() {
        let body = build_receipt_body(&service_result(None), &ReceiptOptions::default());
        assert_eq!(body.attestation_type, AttestationType::ServiceQuality);
        assert_eq!(body.target, Key::from_bytes([0xAA; 32]));
        assert_eq!(body.event_ref, EventId::from_bytes([0x11; 32]));
    }

    #[test]
    fn comment_omits_absent_segments() {
        let body = build_receipt_body(&service_result(None), &ReceiptOptions::default());
        assert_eq!(body.comment, "DVM receipt | kind:5050 (text-to-speech)");
    }

    #[test]
    fn comment_includes_every_present_segment_in_order() {
        let options = ReceiptOptions {
            attestation_type: None,
            rating: Some(4),
            free_text: Some("fast and accurate".to_string()),
        };
        let body = build_receipt_body(&service_result(Some(21)), &options);
        assert_eq!(
            body.comment,
            "DVM receipt | kind:5050 (text-to-speech) | 21 sats | rating:4/5 | fast and accurate"
        );
    }

    #[test]
    fn rating_is_clamped_into_one_to_five() {
        let options = ReceiptOptions {
            rating: Some(9),
            ..ReceiptOptions::default()
        };
        let body = build_receipt_body(&service_result(None), &options);
        assert!(body.comment.contains("rating:5/5"));

        let options_low = ReceiptOptions {
            rating: Some(0),
            ..ReceiptOptions::default()
        };
        let body_low = build_receipt_body(&service_result(None), &options_low);
        assert!(body_low.comment.contains("rating:1/5"));
    }

    #[test]
    fn unknown_kind_does_not_prevent_construction() {
        let mut result = service_result(None);
        result.request_kind = 9999;
        let body = build_receipt_body(&result, &ReceiptOptions::default());
        assert!(body.comment.contains("KIND-UNKNOWN"));
    }

    #[test]
    fn attestation_type_override_is_honoured() {
        let options = ReceiptOptions {
            attestation_type: Some(AttestationType::WorkCompleted),
            ..ReceiptOptions::default()
        };
        let body = build_receipt_body(&service_result(None), &options);
        assert_eq!(body.attestation_type, AttestationType::WorkCompleted);
        assert!(body.tags.iter().any(|t| t == &vec![
            "l".to_string(),
            "work-completed".to_string(),
            "ai.wot".to_string()
        ]));
    }
}
