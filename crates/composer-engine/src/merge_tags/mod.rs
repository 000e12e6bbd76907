//! # Merge Tags
//!
//! Placeholder tokens such as `{{resident.first_name}}` that authors insert
//! into a message and that get replaced with recipient data before preview
//! or send.
//!
//! - **`model`**: `MergeTag` and `MergeTagGroup`, as delivered by a templating service
//! - **`catalog`**: the loaded group list with search and category filtering
//! - **`picker`**: dialog state for browsing the catalog and inserting a tag
//! - **`scan`**: token grammar and `find_merge_tags`
//! - **`resolver`**: pure, idempotent substitution against a JSON data context
//! - **`defaults`**: the built-in catalog

pub mod catalog;
pub mod defaults;
pub mod model;
pub mod picker;
pub mod resolver;
pub mod scan;

pub use catalog::{
    ALL_CATEGORIES, CatalogError, FileCatalogSource, MergeTagCatalog, MergeTagSource,
    StaticCatalogSource, load_groups_from_path,
};
pub use defaults::{default_catalog, default_groups};
pub use model::{MergeTag, MergeTagGroup};
pub use picker::TagPicker;
pub use resolver::{ResolveOptions, ResolvedContent, lookup, resolve, resolve_with};
pub use scan::{TagMatch, find_merge_tags, token_path};
