//! Project repository.
//!
//! Read-only lookup of project records and their asset bundles by id.
//! The catalog ships embedded in the binary; tests and tools can load
//! their own JSON with [`ProjectRepository::from_json`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use super::models::{AssetBundle, ProjectRecord};
use crate::error::CatalogError;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    projects: Vec<ProjectRecord>,
    #[serde(default)]
    assets: HashMap<String, Option<AssetBundle>>,
}

/// A record together with its (optional) asset bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    pub record: Arc<ProjectRecord>,
    pub bundle: Option<Arc<AssetBundle>>,
}

/// Repository for project records.
#[derive(Debug, Clone, Default)]
pub struct ProjectRepository {
    order: Vec<String>,
    entries: HashMap<String, ProjectEntry>,
}

impl ProjectRepository {
    /// The catalog embedded in the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(include_str!("projects.json"))
    }

    /// Parse a catalog document: `{"projects": [...], "assets": {"<id>": {...}}}`.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let mut assets = file.assets;
        let mut repo = Self::default();

        for record in file.projects {
            let bundle = assets.remove(&record.id).flatten().map(Arc::new);
            repo.insert(record, bundle)?;
        }

        for orphan in assets.keys() {
            debug!("Asset bundle without a project record: {}", orphan);
        }

        debug!("Catalog loaded with {} projects", repo.order.len());
        Ok(repo)
    }

    /// Add a record. Ids must be unique.
    pub fn insert(
        &mut self,
        record: ProjectRecord,
        bundle: Option<Arc<AssetBundle>>,
    ) -> Result<(), CatalogError> {
        if self.entries.contains_key(&record.id) {
            return Err(CatalogError::DuplicateId(record.id));
        }

        let id = record.id.clone();
        self.order.push(id.clone());
        self.entries.insert(
            id,
            ProjectEntry {
                record: Arc::new(record),
                bundle,
            },
        );
        Ok(())
    }

    /// Look up a project by id.
    pub fn find(&self, id: &str) -> Option<ProjectEntry> {
        self.entries.get(id).cloned()
    }

    /// Project ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_parses() {
        let repo = ProjectRepository::builtin().unwrap();
        assert_eq!(repo.len(), 6);
        assert_eq!(repo.ids().next(), Some("ai-vision-platform"));
    }

    #[test]
    fn test_find_with_bundle() {
        let repo = ProjectRepository::builtin().unwrap();
        let entry = repo.find("iot-system").unwrap();

        assert_eq!(entry.record.title.en, "Climate Chamber IoT Monitoring System");
        let bundle = entry.bundle.unwrap();
        assert!(bundle.video_paths.is_empty());
        assert_eq!(bundle.screenshot_paths.len(), 7);
    }

    #[test]
    fn test_project_without_bundle_is_valid() {
        let repo = ProjectRepository::builtin().unwrap();
        let entry = repo.find("llm-private-cloud").unwrap();
        assert!(entry.bundle.is_none());
    }

    #[test]
    fn test_unknown_id() {
        let repo = ProjectRepository::builtin().unwrap();
        assert!(repo.find("nonexistent-project").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{"projects": [
            {"id": "a", "title": {"zh": "甲", "en": "A"}},
            {"id": "a", "title": {"zh": "乙", "en": "B"}}
        ]}"#;
        assert!(matches!(
            ProjectRepository::from_json(json),
            Err(CatalogError::DuplicateId(id)) if id == "a"
        ));
    }

    #[test]
    fn test_null_bundle_means_absent() {
        let json = r#"{
            "projects": [{"id": "a", "title": {"zh": "甲", "en": "A"}}],
            "assets": {"a": null}
        }"#;
        let repo = ProjectRepository::from_json(json).unwrap();
        assert!(repo.find("a").unwrap().bundle.is_none());
    }
}
