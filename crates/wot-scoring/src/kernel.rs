use std::collections::HashMap;

use wot_types::{Attestation, AttestationType, BreakdownEntry, Diversity, EventId, GateReason, Key, ScoreResult};

use crate::config::ScoringConfig;
use crate::resolver::ResolveAttester;

struct Parsed<'a> {
    att: &'a Attestation,
    target: Key,
    atype: AttestationType,
}

fn parse_all(attestations: &[Attestation]) -> Vec<Parsed<'_>> {
    attestations
        .iter()
        .filter_map(|att| {
            let atype = att.attestation_type()?;
            let target = att.target()?;
            Some(Parsed { att, target, atype })
        })
        .collect()
}

/// Deduplicates by `(author, target, type)`, keeping the record with the
/// greatest `created_at`, ties broken by lexicographic max `id`
/// (spec §4.1 step 1).
fn dedup<'a>(parsed: &[Parsed<'a>]) -> Vec<&Parsed<'a>> {
    let mut kept: Vec<(Key, Key, AttestationType, usize)> = Vec::new();
    for (i, p) in parsed.iter().enumerate() {
        let key = (p.att.author, p.target, p.atype);
        if let Some(slot) = kept
            .iter_mut()
            .find(|(a, t, ty, _)| *a == key.0 && *t == key.1 && *ty == key.2)
        {
            let current = &parsed[slot.3];
            if p.att.created_at > current.att.created_at
                || (p.att.created_at == current.att.created_at && p.att.id > current.att.id)
            {
                slot.3 = i;
            }
        } else {
            kept.push((key.0, key.1, key.2, i));
        }
    }
    kept.into_iter().map(|(_, _, _, i)| &parsed[i]).collect()
}

/// Computes, for every `(author, target)` edge in the *original*
/// (pre-dedup) bag, the minimum `created_at` — used to award the novelty
/// bonus to the first-ever attestation on that edge (spec §4.1 step 2,
/// pinned down per spec §9 Open Question 3: novelty is evaluated against
/// the original bag, so a retained record only gets the bonus when its
/// own timestamp equals the edge's earliest timestamp).
fn novelty_floor(parsed: &[Parsed<'_>]) -> HashMap<(Key, Key), i64> {
    let mut floor: HashMap<(Key, Key), i64> = HashMap::new();
    for p in parsed {
        let edge = (p.att.author, p.target);
        floor
            .entry(edge)
            .and_modify(|min| *min = (*min).min(p.att.created_at))
            .or_insert(p.att.created_at);
    }
    floor
}

/// The Scoring Kernel's single entry point (spec §4.1).
///
/// Pure and total: every branch produces a well-formed [`ScoreResult`],
/// there is no error return. The only suspension point is the injected
/// `resolver`, which the kernel awaits while resolving attester trust
/// within `config.max_depth`.
pub async fn score(
    attestations: &[Attestation],
    zap_totals: &HashMap<EventId, u64>,
    config: &ScoringConfig,
    resolver: &dyn ResolveAttester,
) -> ScoreResult {
    let parsed = parse_all(attestations);
    if parsed.is_empty() {
        return ScoreResult::empty();
    }

    let floor = novelty_floor(&parsed);
    let surviving: Vec<&Parsed<'_>> = if config.deduplicate {
        dedup(&parsed)
    } else {
        parsed.iter().collect()
    };

    let mut breakdown = Vec::with_capacity(surviving.len());
    for p in &surviving {
        let entry = score_one(p, zap_totals, config, resolver, &floor).await;
        breakdown.push(entry);
    }

    aggregate(breakdown)
}

async fn score_one(
    p: &Parsed<'_>,
    zap_totals: &HashMap<EventId, u64>,
    config: &ScoringConfig,
    resolver: &dyn ResolveAttester,
    floor: &HashMap<(Key, Key), i64>,
) -> BreakdownEntry {
    let att = p.att;

    if p.atype.is_negative() && att.has_empty_content() {
        return BreakdownEntry {
            id: att.id,
            author: att.author,
            attestation_type: p.atype,
            created_at: att.created_at,
            zap_sats: 0,
            zap_weight: 1.0,
            decay: 0.0,
            attester_trust: 0.0,
            novel: false,
            contribution: 0.0,
            gate: Some(GateReason::EmptyContent),
        };
    }

    let zap_sats = zap_totals.get(&att.id).copied().unwrap_or(0);
    let zap_weight = if zap_sats > 0 {
        1.0 + (1.0 + zap_sats as f64).log2() * 0.5
    } else {
        1.0
    };

    let age_days = (config.now - att.created_at).max(0) as f64 / 86400.0;
    let decay = 0.5f64.powf(age_days / config.half_life_days);

    let (attester_trust, attester_display) = if config.depth < config.max_depth {
        let resolved = resolver.resolve(&att.author).await;
        let trust = if resolved.raw > 0.0 {
            resolved.raw.powf(0.5)
        } else {
            1.0
        };
        (trust, resolved.display)
    } else {
        (1.0, 100)
    };

    if p.atype.is_negative() && attester_display < config.negative_trust_gate {
        return BreakdownEntry {
            id: att.id,
            author: att.author,
            attestation_type: p.atype,
            created_at: att.created_at,
            zap_sats,
            zap_weight,
            decay,
            attester_trust,
            novel: false,
            contribution: 0.0,
            gate: Some(GateReason::AttesterTrustBelowGate {
                attester_display,
                gate: config.negative_trust_gate,
            }),
        };
    }

    let novel = floor
        .get(&(att.author, p.target))
        .map(|min| *min == att.created_at)
        .unwrap_or(false);

    let mut contribution = zap_weight * attester_trust * p.atype.multiplier() * decay;
    if novel {
        contribution *= config.novelty_multiplier;
    }

    BreakdownEntry {
        id: att.id,
        author: att.author,
        attestation_type: p.atype,
        created_at: att.created_at,
        zap_sats,
        zap_weight,
        decay,
        attester_trust,
        novel,
        contribution,
        gate: None,
    }
}

fn aggregate(breakdown: Vec<BreakdownEntry>) -> ScoreResult {
    let raw_sum: f64 = breakdown.iter().map(|b| b.contribution).sum();
    let raw_floor = raw_sum.max(0.0);
    // Open question (spec §9, #1): `display` is derived from the
    // unrounded floored sum, not from the 1/100-rounded `raw`, to avoid
    // compounding two separate roundings into a visibly-off display
    // value for borderline scores.
    let raw = (raw_floor * 100.0).round() / 100.0;
    let display = (raw_floor * 10.0).round().clamp(0.0, 100.0) as u8;

    let attestation_count = breakdown.len() as u64;
    let positive_count = breakdown
        .iter()
        .filter(|b| b.gate.is_none() && b.contribution > 0.0)
        .count() as u64;
    let negative_count = breakdown
        .iter()
        .filter(|b| b.gate.is_none() && b.contribution < 0.0)
        .count() as u64;
    let gated_count = breakdown.iter().filter(|b| b.gate.is_some()).count() as u64;

    let diversity = diversity_from(&breakdown);

    ScoreResult {
        raw,
        display,
        attestation_count,
        positive_count,
        negative_count,
        gated_count,
        breakdown,
        diversity,
    }
}

fn diversity_from(breakdown: &[BreakdownEntry]) -> Diversity {
    let positive: Vec<&BreakdownEntry> = breakdown
        .iter()
        .filter(|b| b.gate.is_none() && b.contribution > 0.0)
        .collect();
    if positive.is_empty() {
        return Diversity::empty();
    }

    let total: f64 = positive.iter().map(|b| b.contribution).sum();
    let mut sums: Vec<(Key, f64)> = Vec::new();
    for b in &positive {
        if let Some(slot) = sums.iter_mut().find(|(author, _)| *author == b.author) {
            slot.1 += b.contribution;
        } else {
            sums.push((b.author, b.contribution));
        }
    }

    let unique = sums.len() as u64;
    let n = positive.len() as u64;
    let mut top_author = None;
    let mut max_sum = f64::MIN;
    for (author, sum) in &sums {
        if *sum > max_sum {
            max_sum = *sum;
            top_author = Some(*author);
        }
    }
    let max_share = if total > 0.0 { max_sum / total } else { 0.0 };
    let coverage = (unique as f64 / n as f64).min(1.0);
    let diversity = ((coverage * (1.0 - max_share)) * 100.0).round() / 100.0;

    Diversity {
        diversity,
        unique_attesters: unique,
        max_attester_share: max_share,
        top_attester: top_author,
    }
}
