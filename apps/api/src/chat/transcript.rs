use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    #[serde(other)]
    Other,
}

/// One prior turn of a responder conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// Prior user turns followed by the latest message, space-separated.
/// Assistant turns never feed extraction.
pub fn build_transcript(history: &[ChatTurn], message: &str) -> String {
    history
        .iter()
        .filter(|turn| turn.role == Role::User)
        .map(|turn| turn.content.as_str())
        .chain(std::iter::once(message))
        .collect::<Vec<_>>()
        .join(" ")
}
