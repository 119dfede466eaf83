//! Ranking — safety override, stable score ordering, top-K cut and justifications.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::matching::filter::filter_resources;
use crate::matching::profile::NeedsProfile;
use crate::matching::scorer::RelevanceScorer;
use crate::matching::vocabulary::Vocabulary;
use crate::models::resource::Resource;

/// Ranked entries returned after any safety entries.
pub const RESULT_LIMIT: usize = 3;

const EMERGENCY_MARKER: &str = "911";
const LIFELINE_MARKER: &str = "988";

const EMERGENCY_NAME: &str = "911 Emergency Services";
const EMERGENCY_DESCRIPTION: &str = "Call 911 for immediate emergency assistance.";
const EMERGENCY_JUSTIFICATION: &str =
    "Transcript indicates imminent risk; 911 Emergency should be called for immediate assistance.";

const LIFELINE_NAME: &str = "988 Suicide & Crisis Lifeline";
const LIFELINE_DESCRIPTION: &str =
    "Contact 988 for immediate crisis and suicide prevention assistance.";
const LIFELINE_JUSTIFICATION: &str = "For immediate suicide and crisis prevention support, the 988 Lifeline should be offered in all cases of potential imminent danger.";

const PRIMARY_CONCERN: &str = "Directly addresses the caller's primary concern.";
const IN_AREA: &str = "Located within the caller's geographic area.";
const NO_COST: &str = "No cost/affordable, reducing barriers to access.";
const GENERIC_FIT: &str = "Matches several needs identified in the caller's context.";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A filtered resource with its per-request score.
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    pub resource: &'a Resource,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub resource: Resource,
    pub justification: String,
    /// `None` for safety entries, which bypass scoring.
    pub score: Option<i32>,
    pub safety: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub entries: Vec<RankedEntry>,
}

impl RankedResult {
    pub fn safety_entries(&self) -> impl Iterator<Item = &RankedEntry> {
        self.entries.iter().filter(|e| e.safety)
    }

    pub fn ranked_entries(&self) -> impl Iterator<Item = &RankedEntry> {
        self.entries.iter().filter(|e| !e.safety)
    }

    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.entries.iter().map(|e| &e.resource)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Ranking algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Filters, scores and ranks `candidates` for `profile`.
///
/// Algorithm:
/// 1. Filter (ineligible resources are never scored)
/// 2. Imminent risk: pin a 911 and a 988 entry, synthesizing either when the
///    filtered set has none, then drop every 911/988 resource from the pool
/// 3. Score the pool and stable-sort descending (ties keep catalog order)
/// 4. Take up to `RESULT_LIMIT` and justify each
pub fn rank_resources(
    profile: &NeedsProfile,
    candidates: &[Resource],
    vocabulary: &Vocabulary,
    scorer: &dyn RelevanceScorer,
) -> RankedResult {
    let mut pool = filter_resources(candidates, &profile.context, vocabulary);
    let mut entries = Vec::with_capacity(RESULT_LIMIT + 2);

    if profile.context.is_imminent_risk() {
        entries.push(safety_entry(
            &pool,
            EMERGENCY_MARKER,
            EMERGENCY_NAME,
            EMERGENCY_DESCRIPTION,
            EMERGENCY_JUSTIFICATION,
        ));
        entries.push(safety_entry(
            &pool,
            LIFELINE_MARKER,
            LIFELINE_NAME,
            LIFELINE_DESCRIPTION,
            LIFELINE_JUSTIFICATION,
        ));
        pool.retain(|r| !r.mentions(EMERGENCY_MARKER) && !r.mentions(LIFELINE_MARKER));
    }

    let mut scored: Vec<ScoredCandidate> = pool
        .into_iter()
        .map(|resource| ScoredCandidate {
            resource,
            score: scorer.score(profile, resource),
        })
        .collect();
    scored.sort_by_key(|candidate| Reverse(candidate.score));

    entries.extend(scored.into_iter().take(RESULT_LIMIT).map(|candidate| {
        RankedEntry {
            justification: justify(profile, candidate.resource),
            resource: candidate.resource.clone(),
            score: Some(candidate.score),
            safety: false,
        }
    }));

    RankedResult { entries }
}

fn safety_entry(
    pool: &[&Resource],
    marker: &str,
    fallback_name: &str,
    fallback_description: &str,
    justification: &str,
) -> RankedEntry {
    let resource = pool
        .iter()
        .find(|r| r.mentions(marker))
        .map(|r| (*r).clone())
        .unwrap_or_else(|| Resource::emergency(fallback_name, fallback_description));

    RankedEntry {
        resource,
        justification: justification.to_string(),
        score: None,
        safety: true,
    }
}

/// Builds the justification sentence(s) for a non-safety entry.
pub fn justify(profile: &NeedsProfile, resource: &Resource) -> String {
    let ctx = &profile.context;
    let mut reasons: Vec<String> = Vec::new();

    if let Some(need) = profile.primary_need() {
        let need = need.to_lowercase();
        let first_word = need.split(' ').next().unwrap_or(&need);
        if resource.relevance_text().contains(first_word) {
            reasons.push(PRIMARY_CONCERN.to_string());
        }
    }
    if let Some(location) = &ctx.location {
        if resource.service_area.contains(location) == Some(true) {
            reasons.push(IN_AREA.to_string());
        }
    }
    if resource.cost.contains("free") == Some(true) {
        reasons.push(NO_COST.to_string());
    }
    if let Some(language) = &ctx.language {
        if resource.language.contains(language) == Some(true) {
            reasons.push(format!("Service available in {language}."));
        }
    }

    if reasons.is_empty() {
        GENERIC_FIT.to_string()
    } else {
        reasons.join(" ")
    }
}
