//! Question bank — category → ordered question list, with lookup, filtering
//! and statistics.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::question::Question;

/// Tier used for the highest-priority questions.
pub const HIGH_PRIORITY_TIER: u8 = 3;

#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    categories: BTreeMap<String, Vec<Question>>,
    /// question id → category
    id_index: HashMap<u32, String>,
}

/// Multi-criteria question filter. `None` criteria match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionFilter {
    pub category: Option<String>,
    pub escalation_tier: Option<u8>,
    pub risk_level: Option<String>,
    pub tone: Option<String>,
    pub use_after_rapport: Option<bool>,
    /// Keep only rapport-gated questions.
    #[serde(default)]
    pub require_rapport: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionBankStatistics {
    pub total_questions: usize,
    pub categories: BTreeMap<String, usize>,
    pub escalation_tiers: BTreeMap<u8, usize>,
    pub risk_levels: BTreeMap<String, usize>,
    pub tones: BTreeMap<String, usize>,
}

impl QuestionBank {
    /// Builds the bank, keeping each category's authored order. A question id
    /// that appears twice is indexed to the later category.
    pub fn new(categories: BTreeMap<String, Vec<Question>>) -> Self {
        let id_index = categories
            .iter()
            .flat_map(|(category, questions)| {
                questions.iter().map(move |q| (q.id, category.clone()))
            })
            .collect();
        Self {
            categories,
            id_index,
        }
    }

    pub fn categories(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Questions in authored order; empty for an unknown category.
    pub fn questions_for(&self, category: &str) -> &[Question] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn question_by_id(&self, id: u32) -> Option<&Question> {
        let category = self.id_index.get(&id)?;
        self.questions_for(category).iter().find(|q| q.id == id)
    }

    pub fn category_for_question(&self, id: u32) -> Option<&str> {
        self.id_index.get(&id).map(String::as_str)
    }

    pub fn all_question_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.id_index.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Questions for a situation, dropping rapport-gated ones when rapport is
    /// not yet established. Authored order is kept.
    pub fn for_situation(&self, category: &str, has_rapport: bool) -> Vec<Question> {
        self.questions_for(category)
            .iter()
            .filter(|q| has_rapport || !q.use_after_rapport)
            .cloned()
            .collect()
    }

    pub fn filter(&self, filter: &QuestionFilter) -> Vec<Question> {
        let categories: Vec<&str> = match &filter.category {
            Some(category) => vec![category.as_str()],
            None => self.categories(),
        };

        categories
            .into_iter()
            .flat_map(|category| self.questions_for(category))
            .filter(|q| filter.escalation_tier.map_or(true, |t| q.escalation_tier == t))
            .filter(|q| filter.risk_level.as_ref().map_or(true, |r| &q.risk_level == r))
            .filter(|q| filter.tone.as_ref().map_or(true, |t| &q.tone == t))
            .filter(|q| filter.use_after_rapport.map_or(true, |u| q.use_after_rapport == u))
            .filter(|q| !filter.require_rapport || q.use_after_rapport)
            .cloned()
            .collect()
    }

    pub fn high_priority(&self, category: Option<&str>) -> Vec<Question> {
        self.filter(&QuestionFilter {
            category: category.map(str::to_string),
            escalation_tier: Some(HIGH_PRIORITY_TIER),
            ..QuestionFilter::default()
        })
    }

    /// Situation questions, optionally narrowed to one tier, sorted by tier
    /// descending then id ascending.
    pub fn recommendations(
        &self,
        category: &str,
        escalation_tier: Option<u8>,
        has_rapport: bool,
    ) -> Vec<Question> {
        let mut questions: Vec<Question> = self
            .for_situation(category, has_rapport)
            .into_iter()
            .filter(|q| escalation_tier.map_or(true, |t| q.escalation_tier == t))
            .collect();
        questions.sort_by(|a, b| {
            b.escalation_tier
                .cmp(&a.escalation_tier)
                .then_with(|| a.id.cmp(&b.id))
        });
        questions
    }

    pub fn statistics(&self) -> QuestionBankStatistics {
        let mut stats = QuestionBankStatistics::default();

        for (category, questions) in &self.categories {
            stats.categories.insert(category.clone(), questions.len());
        }

        for id in self.all_question_ids() {
            let Some(q) = self.question_by_id(id) else {
                continue;
            };
            stats.total_questions += 1;
            *stats.escalation_tiers.entry(q.escalation_tier).or_insert(0) += 1;
            *stats.risk_levels.entry(q.risk_level.clone()).or_insert(0) += 1;
            *stats.tones.entry(q.tone.clone()).or_insert(0) += 1;
        }

        stats
    }
}
