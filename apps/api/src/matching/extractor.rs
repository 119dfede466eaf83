//! Context Extractor — turns a raw transcript into a `NeedsProfile`.
//!
//! Deterministic substring matching over the vocabulary tables; only age and
//! location use word-aware patterns. Heuristics run in a fixed order and the
//! last rule to write a shared field wins.

use std::sync::LazyLock;

use regex::Regex;

use crate::matching::profile::{CallerContext, NeedsProfile, IMMEDIATE};
use crate::matching::vocabulary::{first_label, Vocabulary, VocabularyError};

/// "17 years old", "17 year old", "17-year-old", "17yo".
static AGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})\s*-?\s*(?:years?[\s-]old|yo)").expect("Invalid regex: age pattern")
});

pub struct ContextExtractor {
    vocabulary: Vocabulary,
    /// (bucket label, whole-word trigger pattern), in bucket order.
    location_patterns: Vec<(String, Regex)>,
}

impl ContextExtractor {
    pub fn new(vocabulary: Vocabulary) -> Result<Self, VocabularyError> {
        let location_patterns = vocabulary
            .locations
            .iter()
            .filter(|bucket| !bucket.triggers.is_empty())
            .map(|bucket| {
                let alternatives: Vec<String> =
                    bucket.triggers.iter().map(|t| regex::escape(t)).collect();
                let pattern = format!(r"\b(?:{})\b", alternatives.join("|"));
                Ok((bucket.label.clone(), Regex::new(&pattern)?))
            })
            .collect::<Result<Vec<_>, VocabularyError>>()?;

        Ok(Self {
            vocabulary,
            location_patterns,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn extract(&self, transcript: &str) -> NeedsProfile {
        let text = transcript.to_lowercase();
        let mut profile = NeedsProfile::default();

        for crisis_type in &self.vocabulary.crisis_types {
            if crisis_type.matches(&text) {
                profile.add_need(&crisis_type.label);
                if crisis_type.label == self.vocabulary.imminent_risk_label {
                    profile.context.imminent_risk = Some(true);
                }
            }
        }

        self.extract_signals(&text, &mut profile.context);
        profile
    }

    fn extract_signals(&self, text: &str, ctx: &mut CallerContext) {
        let signals = &self.vocabulary.signals;

        if let Some(age) = AGE_PATTERN
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
        {
            ctx.age = Some(age);
        } else if signals.teen.matches(text) {
            ctx.age_group = Some(signals.teen.label.clone());
        }

        if let Some(gender) = first_label(&signals.genders, text) {
            ctx.gender = Some(gender.to_string());
        }

        for demographic in &signals.demographics {
            if demographic.matches(text) {
                ctx.demographic = Some(demographic.label.clone());
            }
        }

        if signals.single_parent.matches(text) {
            ctx.family = Some(signals.single_parent.label.clone());
        }
        if signals.children.matches(text) {
            ctx.has_children = Some(true);
        }

        if signals.transportation.matches(text) {
            ctx.transportation = Some(signals.transportation.label.clone());
        }
        if signals.cost_sensitive.matches(text) {
            ctx.cost_sensitive = Some(true);
        }

        if let Some((label, _)) = self
            .location_patterns
            .iter()
            .find(|(_, pattern)| pattern.is_match(text))
        {
            ctx.location = Some(label.clone());
        }

        if let Some(language) = first_label(&signals.languages, text) {
            ctx.language = Some(language.to_string());
        }

        if signals.urgency.matches(text) || ctx.is_imminent_risk() {
            ctx.urgency = Some(IMMEDIATE.to_string());
        }
    }
}

impl Default for ContextExtractor {
    fn default() -> Self {
        Self::new(Vocabulary::default()).expect("Default vocabulary must compile")
    }
}
