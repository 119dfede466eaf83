//! Resource catalog — the loaded resource records, their flattened matcher
//! views, and lower-cased category/county indexes for browsing.

use std::collections::{BTreeSet, HashMap};

use serde::Deserialize;

use crate::models::resource::{Resource, ResourceRecord};

#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    records: Vec<ResourceRecord>,
    /// `records[i]` flattened; same order as `records`.
    views: Vec<Resource>,
    category_index: HashMap<String, Vec<usize>>,
    county_index: HashMap<String, Vec<usize>>,
}

/// Browse criteria. Empty or missing criteria match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceQuery {
    pub category: Option<String>,
    pub county: Option<String>,
    pub search: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

fn contains_lower(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle))
}

impl ResourceCatalog {
    pub fn new(records: Vec<ResourceRecord>) -> Self {
        let views = records.iter().map(Resource::from).collect();
        let mut category_index: HashMap<String, Vec<usize>> = HashMap::new();
        let mut county_index: HashMap<String, Vec<usize>> = HashMap::new();

        for (i, record) in records.iter().enumerate() {
            for category in &record.categories {
                category_index.entry(category.to_lowercase()).or_default().push(i);
            }
            for county in counties_of(record) {
                county_index.entry(county.to_lowercase()).or_default().push(i);
            }
        }

        Self {
            records,
            views,
            category_index,
            county_index,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Matcher views in catalog order.
    pub fn resources(&self) -> &[Resource] {
        &self.views
    }

    /// Exact (case-insensitive) category lookup through the index.
    pub fn by_category(&self, category: &str) -> Vec<&ResourceRecord> {
        self.lookup(&self.category_index, category)
    }

    /// Exact (case-insensitive) county lookup through the index.
    pub fn by_county(&self, county: &str) -> Vec<&ResourceRecord> {
        self.lookup(&self.county_index, county)
    }

    fn lookup(&self, index: &HashMap<String, Vec<usize>>, key: &str) -> Vec<&ResourceRecord> {
        index
            .get(&key.to_lowercase())
            .map(|ids| ids.iter().map(|&i| &self.records[i]).collect())
            .unwrap_or_default()
    }

    /// Combined browse filter: partial category, partial county, and a term
    /// over name or description. All given criteria must hold.
    pub fn filter(&self, query: &ResourceQuery) -> Vec<&ResourceRecord> {
        let category = non_empty(&query.category);
        let county = non_empty(&query.county);
        let search = non_empty(&query.search);

        self.records
            .iter()
            .filter(|r| {
                category.as_deref().map_or(true, |c| {
                    r.categories.iter().any(|rc| rc.to_lowercase().contains(c))
                })
            })
            .filter(|r| {
                county.as_deref().map_or(true, |c| {
                    counties_of(r).iter().any(|rc| rc.to_lowercase().contains(c))
                })
            })
            .filter(|r| {
                search.as_deref().map_or(true, |term| {
                    contains_lower(r.name.as_deref(), term)
                        || contains_lower(r.description.as_deref(), term)
                })
            })
            .collect()
    }

    /// Finds a record by exact name, then by partial name, both case-insensitive.
    pub fn find_by_name(&self, name: &str) -> Option<&ResourceRecord> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        let named = |r: &&ResourceRecord| r.name.as_deref().map(str::to_lowercase);

        self.records
            .iter()
            .find(|r| named(r).as_deref() == Some(wanted.as_str()))
            .or_else(|| {
                self.records.iter().find(|r| {
                    named(r).is_some_and(|n| {
                        !n.is_empty() && (n.contains(&wanted) || wanted.contains(&n))
                    })
                })
            })
    }

    pub fn categories(&self) -> BTreeSet<&str> {
        self.records
            .iter()
            .flat_map(|r| r.categories.iter().map(String::as_str))
            .collect()
    }

    pub fn counties(&self) -> BTreeSet<&str> {
        self.records
            .iter()
            .flat_map(|r| counties_of(r).iter().map(String::as_str))
            .collect()
    }
}

fn counties_of(record: &ResourceRecord) -> &[String] {
    record
        .service_area
        .as_ref()
        .map(|sa| sa.coverage_by_county.as_slice())
        .unwrap_or(&[])
}


#[cfg(test)]
mod tests {
    use super::fixtures::sample_records;
    use super::*;

    fn names(records: &[&ResourceRecord]) -> Vec<String> {
        records.iter().filter_map(|r| r.name.clone()).collect()
    }

    fn catalog() -> ResourceCatalog {
        ResourceCatalog::new(sample_records())
    }

    #[test]
    fn test_views_follow_record_order() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.resources()[1].name, "YWCA Domestic Violence Shelter");
        assert_eq!(
            catalog.resources()[1].category.as_deref(),
            Some("Domestic Violence, Shelter")
        );
    }

    #[test]
    fn test_category_index_is_case_insensitive() {
        let catalog = catalog();
        assert_eq!(
            names(&catalog.by_category("SHELTER")),
            ["Room In The Inn", "YWCA Domestic Violence Shelter"]
        );
        assert!(catalog.by_category("shelt").is_empty(), "index lookup is exact");
    }

    #[test]
    fn test_county_index() {
        let catalog = catalog();
        assert_eq!(names(&catalog.by_county("williamson")), ["YWCA Domestic Violence Shelter"]);
        assert!(catalog.by_county("Knox").is_empty());
    }

    #[test]
    fn test_search_term_covers_name_and_description() {
        let catalog = catalog();
        let by_term = |term: &str| {
            let query = ResourceQuery {
                search: Some(term.to_string()),
                ..ResourceQuery::default()
            };
            names(&catalog.filter(&query))
        };
        assert_eq!(by_term("inn"), ["Room In The Inn"]);
        assert_eq!(by_term("ABUSE"), ["YWCA Domestic Violence Shelter"]);
        assert!(by_term("knoxville").is_empty());
    }

    #[test]
    fn test_combined_filter() {
        let catalog = catalog();
        let query = ResourceQuery {
            category: Some("shel".to_string()),
            county: Some("david".to_string()),
            search: Some("survivors".to_string()),
        };
        assert_eq!(names(&catalog.filter(&query)), ["YWCA Domestic Violence Shelter"]);
        assert_eq!(catalog.filter(&ResourceQuery::default()).len(), 3);
    }

    #[test]
    fn test_blank_criteria_are_ignored() {
        let query = ResourceQuery {
            category: Some("  ".to_string()),
            ..ResourceQuery::default()
        };
        assert_eq!(catalog().filter(&query).len(), 3);
    }

    #[test]
    fn test_find_by_name_prefers_exact_match() {
        let mut records = sample_records();
        records.insert(
            0,
            super::fixtures::record("Room In The Inn Annex", &["Shelter"], &[], "Overflow"),
        );
        let catalog = ResourceCatalog::new(records);
        assert_eq!(
            catalog.find_by_name("room in the inn").and_then(|r| r.name.as_deref()),
            Some("Room In The Inn")
        );
        assert_eq!(
            catalog.find_by_name("Alive Hospice").and_then(|r| r.name.as_deref()),
            Some("Alive Hospice Grief Support")
        );
        assert!(catalog.find_by_name("Nonexistent Place").is_none());
    }

    #[test]
    fn test_distinct_categories_and_counties() {
        let catalog = catalog();
        assert_eq!(
            catalog.categories().into_iter().collect::<Vec<_>>(),
            ["Domestic Violence", "Grief", "Homelessness", "Shelter"]
        );
        assert_eq!(
            catalog.counties().into_iter().collect::<Vec<_>>(),
            ["Davidson", "Rutherford", "Williamson"]
        );
    }
}
