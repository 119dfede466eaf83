//! Catalog loading — reads the resource and question-bank JSON files.
//!
//! Resources: a JSON array of catalog records.
//! Question bank: a JSON object of `category → [question…]` in authored order.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use thiserror::Error;
use tracing::warn;

use crate::catalog::question_bank::QuestionBank;
use crate::catalog::resources::ResourceCatalog;
use crate::models::question::Question;
use crate::models::resource::ResourceRecord;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

fn read(path: &Path) -> Result<String, CatalogError> {
    std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn parse<T: serde::de::DeserializeOwned>(path: &Path, raw: &str) -> Result<T, CatalogError> {
    serde_json::from_str(raw).map_err(|source| CatalogError::Parse {
        path: path.display().to_string(),
        source,
    })
}

pub fn load_resources(path: impl AsRef<Path>) -> Result<ResourceCatalog, CatalogError> {
    let path = path.as_ref();
    let records: Vec<ResourceRecord> = parse(path, &read(path)?)?;

    let unnamed = records.iter().filter(|r| r.name.is_none()).count();
    if unnamed > 0 {
        warn!("{unnamed} resource record(s) in {} have no name", path.display());
    }

    Ok(ResourceCatalog::new(records))
}

pub fn load_question_bank(path: impl AsRef<Path>) -> Result<QuestionBank, CatalogError> {
    let path = path.as_ref();
    let categories: BTreeMap<String, Vec<Question>> = parse(path, &read(path)?)?;
    validate_question_ids(&categories)?;
    Ok(QuestionBank::new(categories))
}

/// Question ids must be unique across the whole bank.
fn validate_question_ids(categories: &BTreeMap<String, Vec<Question>>) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for (category, questions) in categories {
        if let Some(dup) = questions.iter().find(|q| !seen.insert(q.id)) {
            return Err(CatalogError::Invalid(format!(
                "duplicate question id {} in category '{category}'",
                dup.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_resources_flattens_records() {
        let file = file_with(
            r#"[
                {
                    "name": "Room In The Inn",
                    "categories": ["Homelessness", "Shelter"],
                    "description": "Emergency shelter",
                    "serviceArea": {"areasCovered": ["Nashville"], "coverageByCounty": ["Davidson"]},
                    "eligibility": {"general": "Adults only", "adults": true},
                    "fees": "Free",
                    "languagesOffered": ["English", "Spanish"],
                    "phones": {"primary": {"number": "615-251-7019", "type": "main"}}
                },
                {"name": "Bare Listing"}
            ]"#,
        );
        let catalog = load_resources(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);

        let view = &catalog.resources()[0];
        assert_eq!(view.category.as_deref(), Some("Homelessness, Shelter"));
        assert_eq!(view.service_area.as_deref(), Some("Nashville"));
        assert_eq!(view.eligibility.as_deref(), Some("Adults only"));
        assert_eq!(view.cost.as_deref(), Some("Free"));
        assert_eq!(view.language.as_deref(), Some("English, Spanish"));
        assert_eq!(view.phone.as_deref(), Some("615-251-7019"));

        let bare = &catalog.resources()[1];
        assert!(bare.service_area.is_absent());
        assert!(bare.cost.is_absent());
        assert_eq!(catalog.by_county("davidson").len(), 1);
    }

    #[test]
    fn test_load_question_bank_keeps_authored_order() {
        let file = file_with(
            r#"{
                "adolescent": [
                    {"id": 5, "question": "How is school?", "escalationTier": 1},
                    {"id": 2, "question": "Have you thought about suicide?", "escalationTier": 3, "useAfterRapport": true}
                ],
                "veteran": [{"id": 9, "question": "When did you serve?"}]
            }"#,
        );
        let bank = load_question_bank(file.path()).unwrap();
        let ids: Vec<u32> = bank.questions_for("adolescent").iter().map(|q| q.id).collect();
        assert_eq!(ids, [5, 2]);
        assert_eq!(bank.category_for_question(9), Some("veteran"));
    }

    #[test]
    fn test_duplicate_question_ids_are_rejected() {
        let file = file_with(
            r#"{
                "a": [{"id": 1, "question": "One?"}],
                "b": [{"id": 1, "question": "Also one?"}]
            }"#,
        );
        let err = load_question_bank(file.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)));
    }

    #[test]
    fn test_shipped_catalog_loads() {
        let data = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data");
        let catalog = load_resources(data.join("resources.json")).unwrap();
        let bank = load_question_bank(data.join("question_bank.json")).unwrap();
        assert!(!catalog.is_empty());
        assert!(bank.has_category("recent_suicidal_thoughts"));
        assert!(catalog.find_by_name("988 Suicide & Crisis Lifeline").is_some());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_resources("/nonexistent/resources.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let file = file_with(r#"{"not": "an array"}"#);
        let err = load_resources(file.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }
}
