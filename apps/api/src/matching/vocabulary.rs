//! Vocabulary — the externally loadable trigger-phrase tables behind extraction
//! and question routing.
//!
//! Every table is an ordered list of `TriggerSet`s (label → ordered phrases).
//! Evaluation order is list order, and `TriggerSet::first_match` is the single
//! "first phrase wins" routine shared by all of them.
//!
//! Override file format (TOML, every section optional):
//!
//! ```toml
//! imminent_risk_label = "imminent risk"
//!
//! [[crisis_types]]
//! label = "suicidal ideation"
//! phrases = ["suicidal", "kill myself"]
//!
//! [[locations]]
//! label = "Davidson"
//! triggers = ["davidson", "nashville"]
//! service_area_terms = ["nashville", "davidson", "statewide"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::profile::{FEMALE, IMMEDIATE, MALE, TEEN};

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("Failed to read vocabulary file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid vocabulary TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid vocabulary: {0}")]
    Invalid(String),

    #[error("Invalid location pattern: {0}")]
    Pattern(#[from] regex::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// Trigger sets
// ────────────────────────────────────────────────────────────────────────────

/// A label and the ordered phrases that detect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerSet {
    pub label: String,
    pub phrases: Vec<String>,
}

impl TriggerSet {
    pub fn new(label: &str, phrases: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Returns the first phrase contained in `text`. `text` must already be lower-cased.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.phrases
            .iter()
            .map(String::as_str)
            .find(|phrase| text.contains(phrase))
    }

    pub fn matches(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }
}

/// Returns the label of the first set (in list order) with a matching phrase.
pub fn first_label<'a>(sets: &'a [TriggerSet], text: &str) -> Option<&'a str> {
    sets.iter()
        .find(|set| set.matches(text))
        .map(|set| set.label.as_str())
}

/// A geographic bucket: whole-word triggers in the transcript, and the
/// service-area terms a resource must mention to serve it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationBucket {
    pub label: String,
    pub triggers: Vec<String>,
    pub service_area_terms: Vec<String>,
}

impl LocationBucket {
    fn new(label: &str, triggers: &[&str], service_area_terms: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
            service_area_terms: service_area_terms.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Demographic and situational signal tables, evaluated in field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalVocabulary {
    /// Age-group fallback when no numeric age is found.
    pub teen: TriggerSet,
    /// First matching set wins.
    pub genders: Vec<TriggerSet>,
    /// Every set is evaluated; the last match wins.
    pub demographics: Vec<TriggerSet>,
    pub single_parent: TriggerSet,
    pub children: TriggerSet,
    pub transportation: TriggerSet,
    pub cost_sensitive: TriggerSet,
    /// First matching set wins.
    pub languages: Vec<TriggerSet>,
    pub urgency: TriggerSet,
}

impl Default for SignalVocabulary {
    fn default() -> Self {
        Self {
            teen: TriggerSet::new(TEEN, &["teen"]),
            genders: vec![
                TriggerSet::new(FEMALE, &["woman", "female", "girl"]),
                TriggerSet::new(MALE, &["man", "male", "boy"]),
            ],
            demographics: vec![
                TriggerSet::new("veteran", &["veteran"]),
                TriggerSet::new("lgbtq+", &["lgbt", "gay", "lesbian", "trans"]),
            ],
            single_parent: TriggerSet::new("single mother", &["single mother", "single mom"]),
            children: TriggerSet::new("children", &["child", "children", "son", "daughter"]),
            transportation: TriggerSet::new(
                "limited",
                &["no car", "can't drive", "bus only", "no transportation"],
            ),
            cost_sensitive: TriggerSet::new(
                "cost sensitive",
                &["no money", "can't afford", "broke", "no insurance", "uninsured"],
            ),
            languages: vec![TriggerSet::new("spanish", &["spanish"])],
            urgency: TriggerSet::new(IMMEDIATE, &["urgent", "now", "immediately"]),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Question routing
// ────────────────────────────────────────────────────────────────────────────

/// Maps transcript phrases onto a question-bank category with a result cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    pub phrases: Vec<String>,
    pub limit: usize,
}

impl CategoryRule {
    fn new(category: &str, phrases: &[&str], limit: usize) -> Self {
        Self {
            category: category.to_string(),
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
            limit,
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        self.phrases.iter().any(|phrase| text.contains(phrase.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionRouting {
    /// Evaluated in order; the first matching rule wins.
    pub rules: Vec<CategoryRule>,
    pub fallback_category: String,
    pub fallback_limit: usize,
    /// Cap applied when a caller names the category explicitly.
    pub explicit_limit: usize,
}

impl Default for QuestionRouting {
    fn default() -> Self {
        Self {
            rules: vec![
                CategoryRule::new(
                    "attempt_in_progress",
                    &["suicidal", "suicide", "kill myself", "end my life", "want to die"],
                    3,
                ),
                CategoryRule::new("adolescent", &["teen", "adolescent", "young"], 3),
                CategoryRule::new("veteran", &["veteran"], 3),
                CategoryRule::new("elderly", &["elderly", "senior"], 3),
                CategoryRule::new("recent_suicidal_thoughts", &["depression", "depressed", "sad"], 2),
            ],
            fallback_category: "recent_suicidal_thoughts".to_string(),
            fallback_limit: 2,
            explicit_limit: 3,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Vocabulary
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Crisis-type labels in detection order.
    pub crisis_types: Vec<TriggerSet>,
    /// The crisis-type label that raises the imminent-risk flag.
    pub imminent_risk_label: String,
    pub signals: SignalVocabulary,
    /// First matching bucket wins.
    pub locations: Vec<LocationBucket>,
    pub question_routing: QuestionRouting,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            crisis_types: vec![
                TriggerSet::new(
                    "suicidal ideation",
                    &["suicidal", "want to end my life", "kill myself", "suicide", "can't go on"],
                ),
                TriggerSet::new(
                    "domestic violence",
                    &["abuse", "hit me", "violent home", "partner hurt", "domestic", "beaten"],
                ),
                TriggerSet::new(
                    "homelessness",
                    &["homeless", "no place to stay", "nowhere to go", "live on the street"],
                ),
                TriggerSet::new(
                    "substance use",
                    &["drugs", "addiction", "alcohol", "overdose", "substance", "drinking problem"],
                ),
                TriggerSet::new(
                    "grief",
                    &["loss", "passed away", "grief", "mourning", "lost someone"],
                ),
                TriggerSet::new(
                    "imminent risk",
                    &[
                        "immediate danger",
                        "in danger",
                        "hurt myself",
                        "going to do it now",
                        "can't keep myself safe",
                        "overdose",
                        "gun",
                        "knife",
                    ],
                ),
            ],
            imminent_risk_label: "imminent risk".to_string(),
            signals: SignalVocabulary::default(),
            locations: vec![
                LocationBucket::new(
                    "Davidson",
                    &["davidson", "nashville"],
                    &["nashville", "davidson", "greater nashville", "statewide"],
                ),
                LocationBucket::new(
                    "Middle TN Outside Davidson",
                    &["williamson", "sumner", "rutherford", "robertson"],
                    &[
                        "sumner",
                        "rutherford",
                        "williamson",
                        "robertson",
                        "middle tennessee",
                        "statewide",
                    ],
                ),
            ],
            question_routing: QuestionRouting::default(),
        }
    }
}

impl Vocabulary {
    pub fn from_toml_str(raw: &str) -> Result<Self, VocabularyError> {
        let vocabulary: Vocabulary = toml::from_str(raw)?;
        vocabulary.validated()
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, VocabularyError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| VocabularyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn crisis_type(&self, label: &str) -> Option<&TriggerSet> {
        self.crisis_types.iter().find(|set| set.label == label)
    }

    pub fn location(&self, label: &str) -> Option<&LocationBucket> {
        self.locations.iter().find(|bucket| bucket.label == label)
    }

    /// Lower-cases every phrase and rejects empty ones.
    ///
    /// Matching runs against lower-cased transcripts, so an upper-case phrase
    /// could never fire; an empty phrase would fire on everything.
    fn validated(mut self) -> Result<Self, VocabularyError> {
        let mut phrase_lists: Vec<(&str, &mut Vec<String>)> = Vec::new();
        for set in self.crisis_types.iter_mut() {
            phrase_lists.push(("crisis_types", &mut set.phrases));
        }
        let signals = &mut self.signals;
        phrase_lists.push(("signals.teen", &mut signals.teen.phrases));
        for set in signals.genders.iter_mut() {
            phrase_lists.push(("signals.genders", &mut set.phrases));
        }
        for set in signals.demographics.iter_mut() {
            phrase_lists.push(("signals.demographics", &mut set.phrases));
        }
        phrase_lists.push(("signals.single_parent", &mut signals.single_parent.phrases));
        phrase_lists.push(("signals.children", &mut signals.children.phrases));
        phrase_lists.push(("signals.transportation", &mut signals.transportation.phrases));
        phrase_lists.push(("signals.cost_sensitive", &mut signals.cost_sensitive.phrases));
        for set in signals.languages.iter_mut() {
            phrase_lists.push(("signals.languages", &mut set.phrases));
        }
        phrase_lists.push(("signals.urgency", &mut signals.urgency.phrases));
        for bucket in self.locations.iter_mut() {
            phrase_lists.push(("locations", &mut bucket.triggers));
        }
        for rule in self.question_routing.rules.iter_mut() {
            phrase_lists.push(("question_routing.rules", &mut rule.phrases));
        }

        for (section, phrases) in phrase_lists {
            for phrase in phrases.iter_mut() {
                let normalized = phrase.trim().to_lowercase();
                if normalized.is_empty() {
                    return Err(VocabularyError::Invalid(format!(
                        "empty phrase in {section}"
                    )));
                }
                *phrase = normalized;
            }
        }

        if self.crisis_type(&self.imminent_risk_label).is_none() {
            return Err(VocabularyError::Invalid(format!(
                "imminent_risk_label '{}' names no crisis type",
                self.imminent_risk_label
            )));
        }

        if self.question_routing.fallback_category.trim().is_empty() {
            return Err(VocabularyError::Invalid(
                "question_routing.fallback_category cannot be empty".to_string(),
            ));
        }

        Ok(self)
    }
}
