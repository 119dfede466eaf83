use serde::{Deserialize, Serialize};

pub const FEMALE: &str = "female";
pub const MALE: &str = "male";
pub const TEEN: &str = "teen";
pub const IMMEDIATE: &str = "immediate";

/// Situational signals detected in a transcript. Every field is set only when detected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallerContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demographic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_children: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transportation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_sensitive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imminent_risk: Option<bool>,
}

impl CallerContext {
    pub fn is_imminent_risk(&self) -> bool {
        self.imminent_risk == Some(true)
    }

    pub fn is_cost_sensitive(&self) -> bool {
        self.cost_sensitive == Some(true)
    }

    pub fn is_teen(&self) -> bool {
        self.age_group.as_deref() == Some(TEEN)
    }

    pub fn is_urgent(&self) -> bool {
        self.urgency.as_deref() == Some(IMMEDIATE)
    }
}

/// Structured needs derived from one transcript. Built fresh per request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NeedsProfile {
    /// Crisis-type labels in detection order, without duplicates.
    pub needs: Vec<String>,
    pub context: CallerContext,
}

impl NeedsProfile {
    pub fn add_need(&mut self, label: &str) {
        if !self.has_need(label) {
            self.needs.push(label.to_string());
        }
    }

    pub fn primary_need(&self) -> Option<&str> {
        self.needs.first().map(String::as_str)
    }

    pub fn has_need(&self, label: &str) -> bool {
        self.needs.iter().any(|n| n == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_need_suppresses_duplicates() {
        let mut profile = NeedsProfile::default();
        profile.add_need("grief");
        profile.add_need("homelessness");
        profile.add_need("grief");
        assert_eq!(profile.needs, ["grief", "homelessness"]);
        assert_eq!(profile.primary_need(), Some("grief"));
    }

    #[test]
    fn test_empty_context_serializes_to_empty_object() {
        let json = serde_json::to_value(CallerContext::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_flags_default_to_false() {
        let ctx = CallerContext::default();
        assert!(!ctx.is_imminent_risk());
        assert!(!ctx.is_cost_sensitive());
        assert!(!ctx.is_teen());
        assert!(!ctx.is_urgent());
    }
}
