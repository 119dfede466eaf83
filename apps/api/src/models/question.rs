use serde::{Deserialize, Serialize};

/// A single interview question from the risk-assessment bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub question: String,
    #[serde(default)]
    pub tone: String,
    #[serde(default, alias = "riskLevel")]
    pub risk_level: String,
    /// Ordinal urgency; higher tiers are more direct.
    #[serde(default, alias = "escalationTier")]
    pub escalation_tier: u8,
    #[serde(default, alias = "useAfterRapport")]
    pub use_after_rapport: bool,
    #[serde(default)]
    pub notes: String,
}
