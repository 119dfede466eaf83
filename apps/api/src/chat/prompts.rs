// Prompts for the chat responder. The LLM only ever sees resources and
// questions the matching engine already selected.

use crate::models::question::Question;
use crate::models::resource::ResourceRecord;

pub const MAX_PROMPT_RESOURCES: usize = 5;
pub const MAX_PROMPT_QUESTIONS: usize = 3;

const ROLE_PREAMBLE: &str = "\
    You are an assistant for crisis responders at a suicide prevention center. \
    The person writing to you is a responder (hotline worker, counselor or support staff) \
    helping someone else. They are not the person in crisis.";

const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: The resources and questions below were matched to this situation. \
    Reference them by their exact names. Do NOT invent resources, phone numbers or questions. \
    If nothing below fits, say so and give general support guidance.";

const RESPONSE_REQUIREMENTS: &str = "\
    Your response MUST include:\n\
    1. CONTEXT: acknowledge what the responder is dealing with (1-2 sentences).\n\
    2. RESOURCES: suggest at least one resource by its exact name, with its phone number if listed, \
    and say why it fits.\n\
    3. QUESTIONS: recommend at least one question from the list, word-for-word or naturally adapted, \
    and say why it helps.\n\
    If the situation suggests immediate danger, tell the responder to involve 911 or the \
    988 Suicide & Crisis Lifeline first.\n\
    Keep the reply under 250 words, plain text, no markdown headings.";

pub fn build_system_prompt(resources: &[ResourceRecord], questions: &[Question]) -> String {
    format!(
        "{ROLE_PREAMBLE}\n\n{GROUNDING_INSTRUCTION}\n\n\
        AVAILABLE RESOURCES:\n{resources}\n\
        RELEVANT QUESTIONS:\n{questions}\n\
        {RESPONSE_REQUIREMENTS}",
        resources = format_resources(resources),
        questions = format_questions(questions),
    )
}

fn format_resources(resources: &[ResourceRecord]) -> String {
    if resources.is_empty() {
        return "(No specific resources matched; provide general support.)\n".to_string();
    }

    let mut out = String::new();
    for (i, r) in resources.iter().take(MAX_PROMPT_RESOURCES).enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, r.name.as_deref().unwrap_or("Unnamed")));
        if let Some(description) = r.description.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(&format!("   Description: {description}\n"));
        }
        if !r.categories.is_empty() {
            out.push_str(&format!("   Categories: {}\n", r.categories.join(", ")));
        }
        if let Some(phone) = r.phones.as_ref().and_then(|p| p.preferred()) {
            out.push_str(&format!("   Phone: {phone}\n"));
        }
        if let Some(fees) = r.fees.as_deref() {
            out.push_str(&format!("   Cost: {fees}\n"));
        }
    }
    out
}

fn format_questions(questions: &[Question]) -> String {
    if questions.is_empty() {
        return "(No specific questions matched for this situation.)\n".to_string();
    }

    let mut out = String::new();
    for (i, q) in questions.iter().take(MAX_PROMPT_QUESTIONS).enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, q.question));
        if !q.tone.is_empty() {
            out.push_str(&format!("   (Tone: {})\n", q.tone));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resource::{PhoneNumber, Phones};

    fn record(name: &str) -> ResourceRecord {
        ResourceRecord {
            name: Some(name.to_string()),
            description: Some(format!("{name} description")),
            ..ResourceRecord::default()
        }
    }

    fn question(id: u32, text: &str) -> Question {
        Question {
            id,
            question: text.to_string(),
            tone: "gentle".to_string(),
            risk_level: "low".to_string(),
            escalation_tier: 1,
            use_after_rapport: false,
            notes: String::new(),
        }
    }

    #[test]
    fn test_prompt_lists_at_most_five_resources() {
        let resources: Vec<_> = (1..=7).map(|i| record(&format!("Resource {i}"))).collect();
        let prompt = build_system_prompt(&resources, &[]);
        assert!(prompt.contains("5. Resource 5"));
        assert!(!prompt.contains("Resource 6"));
        assert!(prompt.contains("No specific questions matched"));
    }

    #[test]
    fn test_prompt_includes_phone_and_tone() {
        let mut r = record("Crisis Line");
        r.phones = Some(Phones {
            hotline: Some(PhoneNumber {
                number: Some("988".to_string()),
                kind: None,
            }),
            ..Phones::default()
        });
        let questions: Vec<_> = (1..=4).map(|i| question(i, &format!("Question {i}?"))).collect();
        let prompt = build_system_prompt(&[r], &questions);
        assert!(prompt.contains("Phone: 988"));
        assert!(prompt.contains("(Tone: gentle)"));
        assert!(prompt.contains("3. Question 3?"));
        assert!(!prompt.contains("Question 4?"));
    }

    #[test]
    fn test_prompt_without_resources_says_so() {
        let prompt = build_system_prompt(&[], &[question(1, "Are you safe?")]);
        assert!(prompt.contains("No specific resources matched"));
    }
}
