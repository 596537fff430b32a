use serde::{Deserialize, Serialize};

use crate::key::{EventId, Key};
use crate::tags;

/// The wire-level envelope for a payment-receipt event (kind 9735).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceiptEvent {
    pub id: EventId,
    pub author: Key,
    pub created_at: i64,
    pub tags: Vec<Vec<String>>,
}

/// A signed record representing a satoshi-denominated payment that
/// references an attestation (spec §3). The scorer only consumes the
/// summed satoshi total per attestation id, so this type keeps only the
/// fields needed to compute that sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub id: EventId,
    pub referenced_attestation_id: EventId,
    pub amount_sats: u64,
}

/// Parses a [`PaymentReceiptEvent`].
///
/// Extracts the `["e", ATTESTATION_ID]` tag and the `["description", DOC]`
/// tag, where `DOC` is a JSON object with a `tags` array containing an
/// `["amount", MILLISATS]` entry. Millisats are floor-divided by 1000.
/// Any parse failure (missing tags, malformed JSON, non-integer amount)
/// yields `None` rather than a default of zero, so a malformed receipt
/// never silently contributes zero weight that looks identical to "no
/// receipt at all" in a way that would mask a bug upstream; callers
/// summing totals simply skip `None`.
pub fn parse_payment_receipt(event: &PaymentReceiptEvent) -> Option<PaymentReceipt> {
    let referenced_attestation_id = tags::parse_first_event_ref(&event.tags)?;
    let description = tags::parse_description_tag(&event.tags)?;
    let doc: serde_json::Value = serde_json::from_str(description).ok()?;
    let doc_tags = doc.get("tags")?.as_array()?;
    let amount_msats = doc_tags.iter().find_map(|t| {
        let arr = t.as_array()?;
        if arr.len() < 2 || arr.first()?.as_str()? != "amount" {
            return None;
        }
        arr.get(1)?.as_str()?.parse::<u64>().ok()
    })?;
    Some(PaymentReceipt {
        id: event.id,
        referenced_attestation_id,
        amount_sats: amount_msats / 1000,
    })
}
