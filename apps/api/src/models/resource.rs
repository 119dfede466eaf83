//! Resource models — the rich catalog record and the flattened view the matcher reads.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Optional text field
// ────────────────────────────────────────────────────────────────────────────

/// A nullable free-text field on a resource.
///
/// An absent field is "unconstrained": every containment query returns `None`
/// and the caller decides what absence means for its rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextField(Option<String>);

impl TextField {
    pub fn new(text: impl Into<String>) -> Self {
        Self(Some(text.into()))
    }

    pub fn absent() -> Self {
        Self(None)
    }

    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Case-insensitive substring test. `None` when the field is absent.
    pub fn contains(&self, needle: &str) -> Option<bool> {
        self.0
            .as_deref()
            .map(|text| text.to_lowercase().contains(&needle.to_lowercase()))
    }

    /// Case-insensitive test against several needles. `None` when the field is absent.
    pub fn contains_any<S: AsRef<str>>(&self, needles: &[S]) -> Option<bool> {
        self.0.as_deref().map(|text| {
            let text = text.to_lowercase();
            needles
                .iter()
                .any(|needle| text.contains(&needle.as_ref().to_lowercase()))
        })
    }

    /// Case-sensitive containment, false when absent.
    pub fn mentions(&self, marker: &str) -> bool {
        self.0.as_deref().is_some_and(|text| text.contains(marker))
    }
}

impl From<Option<String>> for TextField {
    fn from(value: Option<String>) -> Self {
        Self(value)
    }
}

impl From<&str> for TextField {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Matcher view
// ────────────────────────────────────────────────────────────────────────────

/// The flattened resource view consumed by filtering, scoring and ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resource {
    pub name: String,
    pub title: TextField,
    /// Category labels, comma-joined.
    pub category: TextField,
    pub description: TextField,
    pub service_area: TextField,
    pub eligibility: TextField,
    pub cost: TextField,
    pub hours: TextField,
    pub language: TextField,
    pub status: TextField,
    pub phone: TextField,
    pub website: TextField,
}

impl Resource {
    /// A placeholder emergency contact used when the catalog lacks one.
    pub fn emergency(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: TextField::new(description),
            ..Self::default()
        }
    }

    /// True when the name or title carries `marker` (e.g. "911").
    pub fn mentions(&self, marker: &str) -> bool {
        self.name.contains(marker) || self.title.mentions(marker)
    }

    /// Lower-cased `category + description`, the text need relevance is measured against.
    pub fn relevance_text(&self) -> String {
        format!(
            "{}{}",
            self.category.as_deref().unwrap_or(""),
            self.description.as_deref().unwrap_or("")
        )
        .to_lowercase()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog record (persisted shape)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    pub name: Option<String>,
    pub parent_agency: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub description: Option<String>,
    pub location: Option<Location>,
    pub hours: Option<String>,
    pub phones: Option<Phones>,
    pub contact: Option<Contact>,
    pub service_area: Option<ServiceArea>,
    pub eligibility: Option<Eligibility>,
    pub fees: Option<String>,
    pub application_process: Option<String>,
    #[serde(default)]
    pub languages_offered: Vec<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub number: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phones {
    pub primary: Option<PhoneNumber>,
    pub secondary: Option<PhoneNumber>,
    pub toll_free: Option<PhoneNumber>,
    pub hotline: Option<PhoneNumber>,
    pub business: Option<PhoneNumber>,
}

impl Phones {
    pub fn primary_number(&self) -> Option<&str> {
        number_of(&self.primary)
    }

    pub fn hotline_number(&self) -> Option<&str> {
        number_of(&self.hotline)
    }

    /// Primary number, falling back to the hotline.
    pub fn preferred(&self) -> Option<&str> {
        self.primary_number().or_else(|| self.hotline_number())
    }
}

fn number_of(phone: &Option<PhoneNumber>) -> Option<&str> {
    phone.as_ref().and_then(|p| p.number.as_deref())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    pub email: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceArea {
    #[serde(default)]
    pub areas_covered: Vec<String>,
    #[serde(default)]
    pub coverage_by_county: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Eligibility {
    pub general: Option<String>,
    pub adults: Option<bool>,
    pub children: Option<bool>,
    pub families: Option<bool>,
    pub females: Option<bool>,
    pub males: Option<bool>,
    pub teens: Option<bool>,
}

fn join_non_empty(values: &[String]) -> TextField {
    if values.is_empty() {
        TextField::absent()
    } else {
        TextField::new(values.join(", "))
    }
}

impl From<&ResourceRecord> for Resource {
    fn from(record: &ResourceRecord) -> Self {
        Self {
            name: record.name.clone().unwrap_or_default(),
            title: TextField::absent(),
            category: join_non_empty(&record.categories),
            description: record.description.clone().into(),
            service_area: record
                .service_area
                .as_ref()
                .map(|sa| join_non_empty(&sa.areas_covered))
                .unwrap_or_default(),
            eligibility: record
                .eligibility
                .as_ref()
                .and_then(|e| e.general.clone())
                .into(),
            cost: record.fees.clone().into(),
            hours: record.hours.clone().into(),
            language: join_non_empty(&record.languages_offered),
            status: record.status.clone().into(),
            phone: record
                .phones
                .as_ref()
                .and_then(|p| p.preferred().map(str::to_string))
                .into(),
            website: record
                .contact
                .as_ref()
                .and_then(|c| c.website.clone())
                .into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_field_is_unconstrained() {
        let field = TextField::absent();
        assert!(field.is_absent());
        assert_eq!(field.contains("anything"), None);
        assert_eq!(field.contains_any(&["a", "b"]), None);
        assert!(!field.mentions("911"));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let field = TextField::new("Serving Greater Nashville");
        assert_eq!(field.contains("nashville"), Some(true));
        assert_eq!(field.contains("NASHVILLE"), Some(true));
        assert_eq!(field.contains("memphis"), Some(false));
        assert_eq!(field.contains_any(&["memphis", "greater nashville"]), Some(true));
    }

    #[test]
    fn test_missing_fields_deserialize_as_absent() {
        let resource: Resource = serde_json::from_str(r#"{"name": "Food Bank"}"#).unwrap();
        assert_eq!(resource.name, "Food Bank");
        assert!(resource.service_area.is_absent());
        assert!(resource.cost.is_absent());
    }

    #[test]
    fn test_mentions_checks_name_and_title() {
        let mut resource = Resource::emergency("Crisis Line", "24/7 line");
        assert!(!resource.mentions("988"));
        resource.title = TextField::new("Dial 988");
        assert!(resource.mentions("988"));
    }

    #[test]
    fn test_relevance_text_concatenates_without_separator() {
        let resource = Resource {
            category: TextField::new("Grief"),
            description: TextField::new("Support Groups"),
            ..Resource::default()
        };
        assert_eq!(resource.relevance_text(), "griefsupport groups");
    }

    #[test]
    fn test_record_flattens_into_view() {
        let json = r#"{
            "name": "Family Justice Center",
            "categories": ["Domestic Violence", "Legal Aid"],
            "description": "Advocacy for survivors",
            "serviceArea": {"areasCovered": ["Nashville", "Davidson County"], "coverageByCounty": ["Davidson"]},
            "eligibility": {"general": "Women only", "females": true},
            "fees": "Free",
            "hours": "24 hours",
            "languagesOffered": ["English", "Spanish"],
            "phones": {"hotline": {"number": "615-555-0100", "type": "hotline"}},
            "contact": {"website": "https://example.org"}
        }"#;
        let record: ResourceRecord = serde_json::from_str(json).unwrap();
        let view = Resource::from(&record);

        assert_eq!(view.name, "Family Justice Center");
        assert_eq!(view.category.as_deref(), Some("Domestic Violence, Legal Aid"));
        assert_eq!(view.service_area.as_deref(), Some("Nashville, Davidson County"));
        assert_eq!(view.eligibility.as_deref(), Some("Women only"));
        assert_eq!(view.cost.as_deref(), Some("Free"));
        assert_eq!(view.language.as_deref(), Some("English, Spanish"));
        assert_eq!(view.phone.as_deref(), Some("615-555-0100"));
        assert_eq!(view.website.as_deref(), Some("https://example.org"));
    }

    #[test]
    fn test_record_with_empty_lists_flattens_to_absent() {
        let record = ResourceRecord {
            name: Some("Bare".to_string()),
            service_area: Some(ServiceArea::default()),
            ..ResourceRecord::default()
        };
        let view = Resource::from(&record);
        assert!(view.category.is_absent());
        assert!(view.service_area.is_absent());
        assert!(view.language.is_absent());
    }

    #[test]
    fn test_preferred_phone_falls_back_to_hotline() {
        let phones = Phones {
            hotline: Some(PhoneNumber {
                number: Some("988".to_string()),
                kind: None,
            }),
            ..Phones::default()
        };
        assert_eq!(phones.preferred(), Some("988"));
    }
}
