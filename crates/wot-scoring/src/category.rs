use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use wot_types::{Attestation, AttestationType, EventId, ScoreResult};

use crate::config::ScoringConfig;
use crate::kernel;
use crate::resolver::ResolveAttester;

/// A recognised category projection over attestations (spec §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// `service-quality` and `work-completed`.
    Commerce,
    /// `identity-continuity`.
    Identity,
    /// `service-quality` attestations whose content mentions "code"
    /// (case-insensitive).
    Code,
    /// All attestations, unfiltered.
    General,
    /// A bare attestation-type name.
    Type(AttestationType),
}

impl Category {
    /// The canonical name used for category maps and parsing.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Commerce => "commerce",
            Self::Identity => "identity",
            Self::Code => "code",
            Self::General => "general",
            Self::Type(t) => t.as_tag_str(),
        }
    }

    fn matches(&self, att: &Attestation) -> bool {
        match self {
            Self::General => true,
            Self::Identity => att.attestation_type() == Some(AttestationType::IdentityContinuity),
            Self::Commerce => matches!(
                att.attestation_type(),
                Some(AttestationType::ServiceQuality) | Some(AttestationType::WorkCompleted)
            ),
            Self::Code => {
                att.attestation_type() == Some(AttestationType::ServiceQuality)
                    && att.content.to_lowercase().contains("code")
            }
            Self::Type(t) => att.attestation_type() == Some(*t),
        }
    }
}

/// Error returned when a category name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "commerce" => Ok(Self::Commerce),
            "identity" => Ok(Self::Identity),
            "code" => Ok(Self::Code),
            "general" => Ok(Self::General),
            other => AttestationType::from_tag_str(other)
                .map(Self::Type)
                .ok_or_else(|| UnknownCategory(other.to_string())),
        }
    }
}

/// The fixed set of named categories `all_category_scores` reports on.
pub fn named_categories() -> Vec<Category> {
    let mut out = vec![
        Category::Commerce,
        Category::Identity,
        Category::Code,
        Category::General,
    ];
    out.extend(AttestationType::ALL.into_iter().map(Category::Type));
    out
}

/// Filters `attestations` to `category` and scores the remainder
/// (spec §4.2).
pub async fn category_score(
    attestations: &[Attestation],
    zap_totals: &HashMap<EventId, u64>,
    config: &ScoringConfig,
    resolver: &dyn ResolveAttester,
    category: Category,
) -> ScoreResult {
    let filtered: Vec<Attestation> = attestations
        .iter()
        .filter(|a| category.matches(a))
        .cloned()
        .collect();
    kernel::score(&filtered, zap_totals, config, resolver).await
}

/// Scores every named category, keyed by [`Category::name`].
pub async fn all_category_scores(
    attestations: &[Attestation],
    zap_totals: &HashMap<EventId, u64>,
    config: &ScoringConfig,
    resolver: &dyn ResolveAttester,
) -> BTreeMap<&'static str, ScoreResult> {
    let mut out = BTreeMap::new();
    for category in named_categories() {
        let name = category.name();
        let result = category_score(attestations, zap_totals, config, resolver, category).await;
        out.insert(name, result);
    }
    out
}
