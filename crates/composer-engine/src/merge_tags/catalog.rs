//! The merge-tag catalog.
//!
//! Groups come from a [`MergeTagSource`] (a templating service, a JSON file or
//! the built-in defaults) and are loaded once per session. Search, category
//! filtering and unknown-tag checks all work on the loaded list.

use serde_json::{Map, Value};
use std::future::Future;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::model::{MergeTag, MergeTagGroup};
use super::scan::find_merge_tags;

/// Category filter value that matches every group.
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to fetch merge tags: {0}")]
    Fetch(String),

    #[error("Failed to read merge tag catalog at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse merge tag catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where merge-tag groups come from, typically a templating service.
pub trait MergeTagSource {
    fn fetch_groups(&self) -> impl Future<Output = Result<Vec<MergeTagGroup>, CatalogError>>;
}

/// A fixed list of groups, e.g. the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    groups: Vec<MergeTagGroup>,
}

impl StaticCatalogSource {
    pub fn new(groups: Vec<MergeTagGroup>) -> Self {
        Self { groups }
    }
}

impl MergeTagSource for StaticCatalogSource {
    async fn fetch_groups(&self) -> Result<Vec<MergeTagGroup>, CatalogError> {
        Ok(self.groups.clone())
    }
}

/// Groups stored as a JSON array in a file.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MergeTagSource for FileCatalogSource {
    async fn fetch_groups(&self) -> Result<Vec<MergeTagGroup>, CatalogError> {
        load_groups_from_path(&self.path)
    }
}

pub fn load_groups_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<MergeTagGroup>, CatalogError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// The loaded list of merge-tag groups for a session.
///
/// The catalog owns the groups; views such as [`search`](Self::search) hand
/// out filtered copies and never mutate the loaded list.
#[derive(Debug, Clone, Default)]
pub struct MergeTagCatalog {
    groups: Vec<MergeTagGroup>,
    loaded: bool,
}

impl MergeTagCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog that is already loaded with `groups`.
    pub fn from_groups(groups: Vec<MergeTagGroup>) -> Self {
        Self {
            groups,
            loaded: true,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn groups(&self) -> &[MergeTagGroup] {
        &self.groups
    }

    /// Fetch from `source` and store the result.
    ///
    /// A failed fetch leaves an empty group list and the catalog marked as
    /// not loaded, so the next explicit load tries again.
    pub async fn load<S: MergeTagSource>(&mut self, source: &S) -> &[MergeTagGroup] {
        let result = source.fetch_groups().await;
        self.apply_load(result);
        &self.groups
    }

    /// Store the outcome of a fetch performed elsewhere.
    pub fn apply_load(&mut self, result: Result<Vec<MergeTagGroup>, CatalogError>) {
        match result {
            Ok(groups) => {
                log::debug!("loaded {} merge tag groups", groups.len());
                self.groups = groups;
                self.loaded = true;
            }
            Err(e) => {
                log::warn!("merge tag catalog failed to load: {e}");
                self.groups.clear();
                self.loaded = false;
            }
        }
    }

    /// Groups whose tags match `query` in name, description or tag text,
    /// ignoring case. Groups left without tags are dropped; a blank query
    /// returns every group.
    pub fn search(&self, query: &str) -> Vec<MergeTagGroup> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.groups.clone();
        }
        self.groups
            .iter()
            .filter_map(|group| {
                let tags: Vec<MergeTag> = group
                    .tags
                    .iter()
                    .filter(|tag| tag.matches(&needle))
                    .cloned()
                    .collect();
                (!tags.is_empty()).then(|| MergeTagGroup {
                    category: group.category.clone(),
                    name: group.name.clone(),
                    tags,
                })
            })
            .collect()
    }

    /// Groups in exactly `category`, or every group for [`ALL_CATEGORIES`].
    pub fn filter_by_category(&self, category: &str) -> Vec<MergeTagGroup> {
        if category == ALL_CATEGORIES {
            return self.groups.clone();
        }
        self.groups
            .iter()
            .filter(|group| group.category == category)
            .cloned()
            .collect()
    }

    /// `(category, display name)` pairs in catalog order.
    pub fn categories(&self) -> Vec<(&str, &str)> {
        self.groups
            .iter()
            .map(|g| (g.category.as_str(), g.name.as_str()))
            .collect()
    }

    pub fn tags(&self) -> impl Iterator<Item = &MergeTag> {
        self.groups.iter().flat_map(|g| g.tags.iter())
    }

    /// Look up a tag by its literal text, ignoring whitespace inside the braces.
    pub fn find_by_tag(&self, tag: &str) -> Option<&MergeTag> {
        let wanted = super::scan::token_path(tag.trim())?;
        self.tags().find(|t| t.path() == Some(wanted))
    }

    /// Tokens in `content` the catalog does not offer, deduplicated, in order.
    pub fn unknown_tags(&self, content: &str) -> Vec<String> {
        let mut unknown: Vec<String> = Vec::new();
        for found in find_merge_tags(content) {
            let known = self.tags().any(|t| t.path() == Some(found.path.as_str()));
            if !known && !unknown.contains(&found.literal) {
                unknown.push(found.literal);
            }
        }
        unknown
    }

    /// A data context filled with every tag's example value.
    pub fn example_context(&self) -> Value {
        let mut root = Map::new();
        for tag in self.tags() {
            let (Some(path), Some(example)) = (tag.path(), &tag.example) else {
                continue;
            };
            if !insert_path(&mut root, path, Value::String(example.clone())) {
                log::debug!("example for {} conflicts with another tag path", tag.tag);
            }
        }
        Value::Object(root)
    }
}

fn insert_path(root: &mut Map<String, Value>, path: &str, value: Value) -> bool {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(leaf) = segments.pop() else {
        return false;
    };
    let mut map = root;
    for segment in segments {
        let entry = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        match entry {
            Value::Object(inner) => map = inner,
            _ => return false,
        }
    }
    if map.contains_key(leaf) {
        return false;
    }
    map.insert(leaf.to_string(), value);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge_tags::defaults::default_groups;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct FailingSource;

    impl MergeTagSource for FailingSource {
        async fn fetch_groups(&self) -> Result<Vec<MergeTagGroup>, CatalogError> {
            Err(CatalogError::Fetch("service unavailable".to_string()))
        }
    }

    fn catalog() -> MergeTagCatalog {
        MergeTagCatalog::from_groups(vec![
            MergeTagGroup::new(
                "resident",
                "Resident",
                vec![
                    MergeTag::new("r1", "{{resident.name}}", "Resident Name", "resident")
                        .with_example("Ann Lee"),
                    MergeTag::new("r2", "{{resident.unit}}", "Unit Number", "resident")
                        .with_description("Unit the resident lives in"),
                ],
            ),
            MergeTagGroup::new(
                "association",
                "Association",
                vec![
                    MergeTag::new("a1", "{{association.name}}", "Association Name", "association")
                        .with_example("Maple Court"),
                ],
            ),
        ])
    }

    // ============ Search and filter ============

    #[test]
    fn search_matches_name_description_and_tag() {
        let c = catalog();
        let by_name = c.search("RESIDENT NAME");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].tags[0].tag, "{{resident.name}}");

        let by_description = c.search("lives in");
        assert_eq!(by_description[0].tags[0].id, "r2");

        let by_tag = c.search("association.");
        assert_eq!(by_tag.len(), 1);
        assert_eq!(by_tag[0].category, "association");
    }

    #[test]
    fn search_drops_empty_groups() {
        let c = catalog();
        let found = c.search("unit");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].tags.len(), 1);
        assert!(c.search("zzz-no-match").is_empty());
    }

    #[test]
    fn blank_search_returns_everything() {
        let c = catalog();
        assert_eq!(c.search("  "), c.groups().to_vec());
    }

    #[test]
    fn filter_by_category_is_exact() {
        let c = catalog();
        assert_eq!(c.filter_by_category(ALL_CATEGORIES).len(), 2);
        assert_eq!(c.filter_by_category("resident").len(), 1);
        assert!(c.filter_by_category("Resident").is_empty());
        assert_eq!(
            c.categories(),
            vec![("resident", "Resident"), ("association", "Association")]
        );
    }

    // ============ Loading ============

    #[tokio::test]
    async fn load_from_static_source() {
        let mut c = MergeTagCatalog::new();
        assert!(!c.is_loaded());
        let groups = c
            .load(&StaticCatalogSource::new(default_groups()))
            .await
            .len();
        assert_eq!(groups, default_groups().len());
        assert!(c.is_loaded());
    }

    #[tokio::test]
    async fn failed_load_leaves_empty_unloaded_catalog() {
        let mut c = catalog();
        assert!(c.load(&FailingSource).await.is_empty());
        assert!(!c.is_loaded());
        assert!(c.search("resident").is_empty());
    }

    #[test]
    fn parses_json_groups() {
        let json = r#"[{"category":"resident","name":"Resident","tags":[
            {"id":"r1","tag":"{{resident.name}}","name":"Resident Name","category":"resident"}]}]"#;
        let groups: Vec<MergeTagGroup> = serde_json::from_str(json).unwrap();
        assert_eq!(groups[0].tags[0].description, "");
        assert_eq!(groups[0].tags[0].example, None);
    }

    // ============ Lookups ============

    #[test]
    fn find_by_tag_ignores_inner_whitespace() {
        let c = catalog();
        assert_eq!(c.find_by_tag("{{ resident.unit }}").map(|t| t.id.as_str()), Some("r2"));
        assert!(c.find_by_tag("{{resident.email}}").is_none());
    }

    #[test]
    fn unknown_tags_lists_tokens_outside_the_catalog() {
        let c = catalog();
        let unknown = c.unknown_tags("{{resident.name}} {{resident.email}} {{x.y}} {{resident.email}}");
        assert_eq!(unknown, vec!["{{resident.email}}", "{{x.y}}"]);
    }

    #[test]
    fn example_context_nests_paths() {
        assert_eq!(
            catalog().example_context(),
            json!({ "resident": { "name": "Ann Lee" }, "association": { "name": "Maple Court" } })
        );
    }
}
