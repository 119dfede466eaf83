//! Chat Responder — pluggable, trait-based composition of the reply a crisis
//! responder sees, grounded in the resources and questions the engine selected.
//!
//! Default: `TemplateResponder` (rule-based, deterministic, no I/O).
//! `LlmResponder` asks Claude and falls back to the template on any LLM error.
//!
//! `AppState` holds an `Arc<dyn Responder>`, chosen at startup by whether an
//! API key is configured.

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::chat::prompts::build_system_prompt;
use crate::chat::transcript::{ChatTurn, Role};
use crate::llm_client::{LlmClient, Message};
use crate::models::question::Question;
use crate::models::resource::ResourceRecord;

/// What the engine matched for this turn.
#[derive(Debug, Clone, Default)]
pub struct ChatContext {
    pub resources: Vec<ResourceRecord>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub message: String,
    /// "template" | "llm"
    pub generated_by: &'static str,
}

#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, message: &str, history: &[ChatTurn], context: &ChatContext) -> ChatReply;

    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// TemplateResponder
// ────────────────────────────────────────────────────────────────────────────

const CRISIS_PHRASES: &[&str] = &["suicidal", "kill myself", "end my life", "can't go on"];
const IMMEDIATE_RISK_PHRASES: &[&str] = &["right now", "immediately", "going to do it", "plan to"];

const MAX_TEMPLATE_RESOURCES: usize = 3;
const DESCRIPTION_LIMIT: usize = 150;
const DESCRIPTION_CUT: usize = 147;

const CRISIS_OPENING: &str = "I'm really glad you reached out. It takes courage to ask for help, \
    and I want you to know that you're not alone in this. ";
const EMERGENCY_ADVICE: &str = "\n\nIf you're in immediate danger, please call 911 right away, \
    or contact the 988 Suicide & Crisis Lifeline. Your safety is the most important thing right now. ";
const GENERAL_OPENING: &str =
    "Thank you for sharing that with me. I'm here to help you find the support you need. ";
const RESOURCES_INTRO: &str =
    "\n\nBased on what you've shared, I'd like to connect you with some resources that might help: ";
const NO_RESOURCES: &str = "\n\nI want to help you find the right support. ";
const CLOSING: &str = "\n\nRemember, reaching out for help is a sign of strength, not weakness. \
    You deserve support, and there are people who want to help you through this.";

/// Rule-based reply. Reads only the latest message for tone; the resources
/// and questions already reflect the whole transcript.
pub struct TemplateResponder;

impl TemplateResponder {
    pub fn compose(&self, message: &str, context: &ChatContext) -> String {
        let lc = message.to_lowercase();
        let says_any = |phrases: &[&str]| phrases.iter().any(|p| lc.contains(p));
        let crisis = says_any(CRISIS_PHRASES);
        let immediate = says_any(IMMEDIATE_RISK_PHRASES);

        let mut reply = String::new();

        if crisis || immediate {
            reply.push_str(CRISIS_OPENING);
            if immediate {
                reply.push_str(EMERGENCY_ADVICE);
            }
        } else {
            reply.push_str(GENERAL_OPENING);
        }

        if context.resources.is_empty() {
            reply.push_str(NO_RESOURCES);
        } else {
            reply.push_str(RESOURCES_INTRO);
            for resource in context.resources.iter().take(MAX_TEMPLATE_RESOURCES) {
                reply.push_str("\n\n");
                reply.push_str(&describe_resource(resource));
            }
        }

        if let Some(question) = context.questions.first() {
            reply.push_str("\n\n");
            reply.push_str(&as_question(&question.question));
        }

        reply.push_str(CLOSING);
        reply
    }
}

#[async_trait]
impl Responder for TemplateResponder {
    async fn respond(&self, message: &str, _history: &[ChatTurn], context: &ChatContext) -> ChatReply {
        ChatReply {
            message: self.compose(message, context),
            generated_by: self.backend(),
        }
    }

    fn backend(&self) -> &'static str {
        "template"
    }
}

fn describe_resource(resource: &ResourceRecord) -> String {
    let mut line = String::new();

    if let Some(name) = resource.name.as_deref() {
        line.push_str("• ");
        line.push_str(name);
    }

    if let Some(description) = resource.description.as_deref().filter(|d| !d.is_empty()) {
        line.push_str(" - ");
        line.push_str(&truncate(description));
    }

    if let Some(phones) = &resource.phones {
        if let Some(number) = phones.primary_number() {
            line.push_str(&format!(" You can reach them at {number}."));
        } else if let Some(number) = phones.hotline_number() {
            line.push_str(&format!(" Their hotline is {number}."));
        }
    }

    line
}

fn truncate(description: &str) -> String {
    if description.chars().count() > DESCRIPTION_LIMIT {
        let cut: String = description.chars().take(DESCRIPTION_CUT).collect();
        format!("{cut}...")
    } else {
        description.to_string()
    }
}

/// Text ending in '.', '!' or '?' is kept; anything else gets a '?'.
fn as_question(text: &str) -> String {
    if text.ends_with(['?', '.', '!']) {
        text.to_string()
    } else {
        format!("{text}?")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmResponder
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmResponder {
    llm: LlmClient,
    fallback: TemplateResponder,
}

impl LlmResponder {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            fallback: TemplateResponder,
        }
    }
}

/// Maps history to API turns. The API expects the conversation to open with
/// a user turn, so leading assistant turns and unknown roles are dropped.
fn conversation<'a>(history: &'a [ChatTurn], message: &'a str) -> Vec<Message<'a>> {
    history
        .iter()
        .filter_map(|turn| match turn.role {
            Role::User => Some(Message::user(&turn.content)),
            Role::Assistant => Some(Message::assistant(&turn.content)),
            Role::Other => None,
        })
        .skip_while(|m| m.role != "user")
        .chain(std::iter::once(Message::user(message)))
        .collect()
}

#[async_trait]
impl Responder for LlmResponder {
    async fn respond(&self, message: &str, history: &[ChatTurn], context: &ChatContext) -> ChatReply {
        let system = build_system_prompt(&context.resources, &context.questions);
        let messages = conversation(history, message);

        match self.llm.call_text(&system, &messages).await {
            Ok(text) => ChatReply {
                message: text,
                generated_by: self.backend(),
            },
            Err(e) => {
                warn!("LLM response failed, using template fallback: {e}");
                self.fallback.respond(message, history, context).await
            }
        }
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}
