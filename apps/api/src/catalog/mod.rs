//! Catalog — the read-only resource and question data the matcher runs over.
//!
//! Readers take an `Arc<CatalogSnapshot>` and never hold the lock while
//! working. Reload builds a complete new snapshot off to the side and swaps
//! the pointer; a failed reload leaves the current snapshot in place.

pub mod handlers;
pub mod loader;
pub mod question_bank;
pub mod resources;

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::catalog::loader::{load_question_bank, load_resources, CatalogError};
use crate::catalog::question_bank::QuestionBank;
use crate::catalog::resources::ResourceCatalog;

/// One immutable generation of the catalog.
#[derive(Debug)]
pub struct CatalogSnapshot {
    pub resources: ResourceCatalog,
    pub questions: QuestionBank,
    pub loaded_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn new(resources: ResourceCatalog, questions: QuestionBank) -> Self {
        Self {
            resources,
            questions,
            loaded_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogPaths {
    pub resources: PathBuf,
    pub question_bank: PathBuf,
}

pub struct CatalogStore {
    paths: Option<CatalogPaths>,
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl CatalogStore {
    /// Loads both files; fails if either is missing or malformed.
    pub fn load(paths: CatalogPaths) -> Result<Self, CatalogError> {
        let snapshot = read_snapshot(&paths)?;
        Ok(Self {
            paths: Some(paths),
            current: RwLock::new(Arc::new(snapshot)),
        })
    }

    /// A store over in-memory data; `reload` is unavailable.
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        Self {
            paths: None,
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        // The guarded value is a pointer swap, so a poisoned lock still holds a whole snapshot.
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Re-reads the catalog files and installs the result as the new snapshot.
    pub fn reload(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        let paths = self.paths.as_ref().ok_or_else(|| {
            CatalogError::Invalid("catalog was not loaded from files".to_string())
        })?;
        let fresh = Arc::new(read_snapshot(paths)?);

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&fresh);
        Ok(fresh)
    }
}

fn read_snapshot(paths: &CatalogPaths) -> Result<CatalogSnapshot, CatalogError> {
    let resources = load_resources(&paths.resources)?;
    let questions = load_question_bank(&paths.question_bank)?;

    info!(
        "Catalog loaded: {} resources, {} question categories",
        resources.len(),
        questions.categories().len()
    );

    Ok(CatalogSnapshot::new(resources, questions))
}
