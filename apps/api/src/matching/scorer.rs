//! Resource Scorer — pluggable, trait-based relevance scoring of one filtered
//! resource against a needs profile.
//!
//! Default: `KeywordScorer` (additive integer rules, deterministic, no I/O).
//! `MatchingEngine` holds a `Box<dyn RelevanceScorer>`.

use crate::matching::profile::NeedsProfile;
use crate::models::resource::Resource;

/// Implement this to swap scoring backends without touching ranking code.
pub trait RelevanceScorer: Send + Sync {
    fn score(&self, profile: &NeedsProfile, resource: &Resource) -> i32;

    /// Backend label, for transparency in responses.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordScorer
// ────────────────────────────────────────────────────────────────────────────

const FIRST_WORD_POINTS: i32 = 2;
const JOINED_LABEL_POINTS: i32 = 3;
const VERBATIM_LABEL_POINTS: i32 = 4;
const IN_AREA_POINTS: i32 = 2;
const UNRESTRICTED_AREA_POINTS: i32 = 1;
const FREE_POINTS: i32 = 2;
const COST_PENALTY: i32 = -1;
const MATCH_BONUS: i32 = 1;
const TRAINING_PENALTY: i32 = -3;

/// Additive keyword scorer.
///
/// Rules, applied in order:
/// 1. Need relevance, per need, against `category + description`:
///    first word +2, label without spaces +3, verbatim label +4
/// 2. Proximity: service area mentions the location +2; no service area +1
/// 3. Affordability: free / no cost +2; otherwise −1 for cost-sensitive callers
/// 4. Language match +1
/// 5. Eligibility mentions teen / gender / demographic, +1 each
/// 6. Immediate urgency with 24-hour service +1
/// 7. Training category −3
pub struct KeywordScorer;

impl RelevanceScorer for KeywordScorer {
    fn score(&self, profile: &NeedsProfile, resource: &Resource) -> i32 {
        need_relevance(profile, resource)
            + proximity(profile, resource)
            + affordability(profile, resource)
            + demographic_fit(profile, resource)
            + urgency(profile, resource)
            + training_penalty(resource)
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

pub fn need_relevance(profile: &NeedsProfile, resource: &Resource) -> i32 {
    if profile.needs.is_empty() {
        return 0;
    }
    let text = resource.relevance_text();

    profile
        .needs
        .iter()
        .map(|need| {
            let need = need.to_lowercase();
            let first_word = need.split(' ').next().unwrap_or(&need);
            let mut points = 0;
            if text.contains(first_word) {
                points += FIRST_WORD_POINTS;
            }
            if text.contains(&need.replace(' ', "")) {
                points += JOINED_LABEL_POINTS;
            }
            if text.contains(&need) {
                points += VERBATIM_LABEL_POINTS;
            }
            points
        })
        .sum()
}

fn proximity(profile: &NeedsProfile, resource: &Resource) -> i32 {
    match (&profile.context.location, resource.service_area.is_absent()) {
        (_, true) => UNRESTRICTED_AREA_POINTS,
        (Some(location), false) if resource.service_area.contains(location) == Some(true) => {
            IN_AREA_POINTS
        }
        _ => 0,
    }
}

fn affordability(profile: &NeedsProfile, resource: &Resource) -> i32 {
    match resource.cost.contains_any(&["free", "no cost"]) {
        Some(true) => FREE_POINTS,
        Some(false) if profile.context.is_cost_sensitive() => COST_PENALTY,
        _ => 0,
    }
}

fn demographic_fit(profile: &NeedsProfile, resource: &Resource) -> i32 {
    let ctx = &profile.context;
    let mut points = 0;

    if let Some(language) = &ctx.language {
        if resource.language.contains(language) == Some(true) {
            points += MATCH_BONUS;
        }
    }

    let eligibility = &resource.eligibility;
    if ctx.is_teen() && eligibility.contains("teen") == Some(true) {
        points += MATCH_BONUS;
    }
    for value in [&ctx.gender, &ctx.demographic].into_iter().flatten() {
        if eligibility.contains(value) == Some(true) {
            points += MATCH_BONUS;
        }
    }
    points
}

fn urgency(profile: &NeedsProfile, resource: &Resource) -> i32 {
    if profile.context.is_urgent() && resource.hours.mentions("24") {
        MATCH_BONUS
    } else {
        0
    }
}

fn training_penalty(resource: &Resource) -> i32 {
    if resource.category.contains("training") == Some(true) {
        TRAINING_PENALTY
    } else {
        0
    }
}
