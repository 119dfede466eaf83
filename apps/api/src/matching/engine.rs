//! Matching Engine — the two entry points callers use: resource selection and
//! question selection. Holds the extractor (and its vocabulary) plus the
//! pluggable scorer; both are read-only after construction.

use serde::Serialize;

use crate::catalog::question_bank::QuestionBank;
use crate::matching::extractor::ContextExtractor;
use crate::matching::profile::NeedsProfile;
use crate::matching::questions::{self, QuestionQuery};
use crate::matching::ranking::{rank_resources, RankedResult};
use crate::matching::scorer::{KeywordScorer, RelevanceScorer};
use crate::matching::vocabulary::{Vocabulary, VocabularyError};
use crate::models::question::Question;
use crate::models::resource::Resource;

/// A ranked shortlist plus the profile it was ranked against.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceSelection {
    pub profile: NeedsProfile,
    pub result: RankedResult,
}

pub struct MatchingEngine {
    extractor: ContextExtractor,
    scorer: Box<dyn RelevanceScorer>,
}

impl MatchingEngine {
    pub fn new(vocabulary: Vocabulary) -> Result<Self, VocabularyError> {
        Ok(Self::with_scorer(
            ContextExtractor::new(vocabulary)?,
            Box::new(KeywordScorer),
        ))
    }

    pub fn with_scorer(extractor: ContextExtractor, scorer: Box<dyn RelevanceScorer>) -> Self {
        Self { extractor, scorer }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.extractor.vocabulary()
    }

    pub fn scorer_backend(&self) -> &'static str {
        self.scorer.backend()
    }

    pub fn select_resources(&self, transcript: &str, candidates: &[Resource]) -> ResourceSelection {
        let profile = self.extractor.extract(transcript);
        let result = rank_resources(&profile, candidates, self.vocabulary(), self.scorer.as_ref());

        tracing::debug!(
            needs = ?profile.needs,
            imminent_risk = profile.context.is_imminent_risk(),
            candidates = candidates.len(),
            returned = result.entries.len(),
            "Resources selected"
        );

        ResourceSelection { profile, result }
    }

    pub fn select_questions(
        &self,
        bank: &QuestionBank,
        query: &QuestionQuery,
        has_rapport: bool,
    ) -> Vec<Question> {
        questions::select_questions(bank, &self.vocabulary().question_routing, query, has_rapport)
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::with_scorer(ContextExtractor::default(), Box::new(KeywordScorer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::question_bank::fixtures::sample_bank;
    use crate::models::resource::TextField;
    use proptest::prelude::*;

    fn resource(name: &str, category: &str) -> Resource {
        Resource {
            name: name.to_string(),
            category: TextField::new(category),
            ..Resource::default()
        }
    }

    fn catalog() -> Vec<Resource> {
        vec![
            resource("Crisis Text 911 Relay", "Crisis"),
            resource("Volunteer Training Hub", "Training"),
            resource("Safe Haven Shelter", "Domestic Violence, Shelter"),
            resource("988 Lifeline Nashville", "Suicide Prevention"),
            resource("Room In The Inn", "Homelessness"),
            resource("Recovery Now", "Substance Use"),
            resource("Alive Hospice Grief", "Grief"),
            resource("Family Counseling", "Counseling"),
        ]
    }

    const IMMINENT_PHRASES: &[&str] = &[
        "immediate danger",
        "in danger",
        "hurt myself",
        "going to do it now",
        "can't keep myself safe",
        "overdose",
        "gun",
        "knife",
    ];

    const FILLER: &[&str] = &[
        "homeless", "suicidal", "teen", "nashville", "sumner", "no money", "woman", "veteran",
        "spanish", "grief", "drugs", "abuse", "hello", "help", "please", "17 years old",
    ];

    fn filler() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(FILLER), 0..8).prop_map(|w| w.join(" "))
    }

    fn subset_of_catalog() -> impl Strategy<Value = Vec<Resource>> {
        prop::sample::subsequence(catalog(), 0..=catalog().len())
    }

    #[test]
    fn test_select_resources_end_to_end() {
        let engine = MatchingEngine::default();
        let selection = engine.select_resources("I'm homeless and have nowhere to go", &catalog());
        assert_eq!(selection.profile.needs, ["homelessness"]);
        assert_eq!(selection.result.entries[0].resource.name, "Room In The Inn");
        assert!(selection
            .result
            .resources()
            .all(|r| r.name != "Volunteer Training Hub"));
    }

    #[test]
    fn test_imminent_risk_prefers_catalog_safety_resources() {
        let engine = MatchingEngine::default();
        let selection = engine.select_resources("he has a gun", &catalog());
        let names: Vec<_> = selection.result.resources().map(|r| r.name.as_str()).collect();
        assert_eq!(names[0], "Crisis Text 911 Relay");
        assert_eq!(names[1], "988 Lifeline Nashville");
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn test_select_questions_uses_vocabulary_routing() {
        let engine = MatchingEngine::default();
        let query = QuestionQuery::Transcript("a teen called".to_string());
        let questions = engine.select_questions(&sample_bank(), &query, false);
        assert_eq!(questions.iter().map(|q| q.id).collect::<Vec<_>>(), [10, 12, 14]);
    }

    #[test]
    fn test_backend_label() {
        assert_eq!(MatchingEngine::default().scorer_backend(), "keyword");
    }

    proptest! {
        #[test]
        fn prop_imminent_risk_pins_911_then_988(
            before in filler(),
            phrase in prop::sample::select(IMMINENT_PHRASES),
            after in filler(),
            candidates in subset_of_catalog(),
        ) {
            let engine = MatchingEngine::default();
            let transcript = format!("{before} {phrase} {after}");
            let entries = engine.select_resources(&transcript, &candidates).result.entries;

            prop_assert!(entries.len() >= 2);
            prop_assert!(entries[0].safety && entries[0].resource.mentions("911"));
            prop_assert!(entries[1].safety && entries[1].resource.mentions("988"));
            prop_assert!(entries[2..].iter().all(|e| !e.safety));
        }

        #[test]
        fn prop_result_is_capped(transcript in filler(), candidates in subset_of_catalog()) {
            let engine = MatchingEngine::default();
            let result = engine.select_resources(&transcript, &candidates).result;

            prop_assert!(result.ranked_entries().count() <= 3);
            prop_assert!(result.entries.len() <= 5);
            prop_assert!(result
                .resources()
                .all(|r| r.category.contains("training") != Some(true)));
        }

        #[test]
        fn prop_selection_is_deterministic(transcript in filler(), candidates in subset_of_catalog()) {
            let engine = MatchingEngine::default();
            let first = engine.select_resources(&transcript, &candidates);
            let second = engine.select_resources(&transcript, &candidates);
            prop_assert_eq!(first.profile, second.profile);
            prop_assert_eq!(first.result, second.result);
        }
    }
}
