//! Merge-tag data types, shaped like the JSON a templating service returns.

use serde::{Deserialize, Serialize};

/// A placeholder token offered to authors, e.g. `{{resident.first_name}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeTag {
    pub id: String,
    /// Literal token text as inserted into content
    pub tag: String,
    /// Display name shown in the picker
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    pub category: String,
}

impl MergeTag {
    pub fn new(
        id: impl Into<String>,
        tag: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            name: name.into(),
            description: String::new(),
            example: None,
            category: category.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Dotted path inside the token, `resident.first_name` for
    /// `{{resident.first_name}}`. `None` when `tag` is not a well-formed token.
    pub fn path(&self) -> Option<&str> {
        super::scan::token_path(&self.tag)
    }

    /// Case-insensitive substring match against name, description and tag.
    /// `needle` must already be lowercase.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tag.to_lowercase().contains(needle)
    }
}

/// Tags sharing a category, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeTagGroup {
    pub category: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<MergeTag>,
}

impl MergeTagGroup {
    pub fn new(category: impl Into<String>, name: impl Into<String>, tags: Vec<MergeTag>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            tags,
        }
    }
}
