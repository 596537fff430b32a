use serde::{Deserialize, Serialize};

use crate::key::{EventId, Key};

/// The closed set of recognised attestation verdicts, with the type
/// multiplier applied by the scoring kernel (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttestationType {
    ServiceQuality,
    WorkCompleted,
    IdentityContinuity,
    GeneralTrust,
    Warning,
    Dispute,
}

impl AttestationType {
    /// All recognised variants, in no particular order.
    pub const ALL: [AttestationType; 6] = [
        AttestationType::ServiceQuality,
        AttestationType::WorkCompleted,
        AttestationType::IdentityContinuity,
        AttestationType::GeneralTrust,
        AttestationType::Warning,
        AttestationType::Dispute,
    ];

    /// The canonical tag value, e.g. `"service-quality"`.
    pub fn as_tag_str(&self) -> &'static str {
        match self {
            Self::ServiceQuality => "service-quality",
            Self::WorkCompleted => "work-completed",
            Self::IdentityContinuity => "identity-continuity",
            Self::GeneralTrust => "general-trust",
            Self::Warning => "warning",
            Self::Dispute => "dispute",
        }
    }

    /// Parses a tag value, returning `None` for anything not in the
    /// closed set.
    pub fn from_tag_str(s: &str) -> Option<Self> {
        match s {
            "service-quality" => Some(Self::ServiceQuality),
            "work-completed" => Some(Self::WorkCompleted),
            "identity-continuity" => Some(Self::IdentityContinuity),
            "general-trust" => Some(Self::GeneralTrust),
            "warning" => Some(Self::Warning),
            "dispute" => Some(Self::Dispute),
            _ => None,
        }
    }

    /// The per-type weight multiplier used in the scoring kernel.
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::ServiceQuality => 1.5,
            Self::WorkCompleted => 1.2,
            Self::IdentityContinuity => 1.0,
            Self::GeneralTrust => 0.8,
            Self::Warning => -0.8,
            Self::Dispute => -1.5,
        }
    }

    /// True for the negative set (`warning`, `dispute`).
    pub fn is_negative(&self) -> bool {
        matches!(self, Self::Warning | Self::Dispute)
    }
}

/// An immutable signed record about a target peer (spec §3).
///
/// The `tags` field is kept untyped (a raw tag list) because the scoring
/// kernel itself performs type-tag parsing record-by-record — a record
/// with an unparseable or unrecognised type tag is not rejected at
/// construction time, it is routed into the kernel's breakdown with a
/// structured reason (spec §4.1 step 3, §7 category 3/4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attestation {
    /// 64-hex content hash.
    pub id: EventId,
    pub author: Key,
    /// Seconds since Unix epoch.
    pub created_at: i64,
    pub content: String,
    pub tags: Vec<Vec<String>>,
    /// Detached signature bytes; verification is an external collaborator.
    pub sig: Vec<u8>,
}

impl Attestation {
    /// Parses the namespace-qualified type tag, if present and recognised.
    pub fn attestation_type(&self) -> Option<AttestationType> {
        crate::tags::parse_type_tag(&self.tags).and_then(AttestationType::from_tag_str)
    }

    /// Parses the target-key tag.
    pub fn target(&self) -> Option<Key> {
        crate::tags::parse_target_tag(&self.tags)
    }

    /// True if `content` is empty or entirely whitespace.
    pub fn has_empty_content(&self) -> bool {
        self.content.trim().is_empty()
    }
}
