//! Question Selector — picks a short, rapport-aware list of questions from the
//! bank, either for a named category or for a category inferred from the
//! transcript.

use serde::{Deserialize, Serialize};

use crate::catalog::question_bank::QuestionBank;
use crate::matching::vocabulary::QuestionRouting;
use crate::models::question::Question;

/// What the caller knows about the situation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionQuery {
    /// A question-bank category named directly.
    Category(String),
    /// Free text; the category is inferred from its keywords.
    Transcript(String),
}

/// A resolved category and the cap that applies to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryChoice {
    pub category: String,
    pub limit: usize,
    /// True when no rule matched and the fallback category was used.
    pub fallback: bool,
}

/// First matching rule wins; no match falls back to the general category.
pub fn infer_category(transcript: &str, routing: &QuestionRouting) -> CategoryChoice {
    let text = transcript.to_lowercase();

    match routing.rules.iter().find(|rule| rule.matches(&text)) {
        Some(rule) => CategoryChoice {
            category: rule.category.clone(),
            limit: rule.limit,
            fallback: false,
        },
        None => CategoryChoice {
            category: routing.fallback_category.clone(),
            limit: routing.fallback_limit,
            fallback: true,
        },
    }
}

pub fn resolve_category(query: &QuestionQuery, routing: &QuestionRouting) -> CategoryChoice {
    match query {
        QuestionQuery::Category(category) => CategoryChoice {
            category: category.trim().to_string(),
            limit: routing.explicit_limit,
            fallback: false,
        },
        QuestionQuery::Transcript(transcript) => infer_category(transcript, routing),
    }
}

/// Questions in stored order, rapport-gated ones removed unless rapport is
/// established, capped per category. Unknown categories yield an empty list.
pub fn select_questions(
    bank: &QuestionBank,
    routing: &QuestionRouting,
    query: &QuestionQuery,
    has_rapport: bool,
) -> Vec<Question> {
    let choice = resolve_category(query, routing);

    bank.questions_for(&choice.category)
        .iter()
        .filter(|q| has_rapport || !q.use_after_rapport)
        .take(choice.limit)
        .cloned()
        .collect()
}
