//! Tag picker dialog state.
//!
//! The picker loads the catalog lazily the first time it opens. Opening
//! hands out a [`LoadTicket`]; the host fetches groups and reports back with
//! [`TagPicker::complete_load`]. A response that arrives after the dialog
//! closed, or after a newer load started, is dropped.
//!
//! Search and category filtering are exclusive view states: typing a query
//! resets the category to [`ALL_CATEGORIES`], picking a category clears the
//! query. Both are ignored while a load is in flight.

use crate::editing::ContentHandle;
use crate::lifecycle::{LoadGuard, LoadTicket};

use super::catalog::{ALL_CATEGORIES, CatalogError, MergeTagCatalog, MergeTagSource};
use super::model::{MergeTag, MergeTagGroup};

#[derive(Debug)]
pub struct TagPicker {
    catalog: MergeTagCatalog,
    guard: LoadGuard,
    open: bool,
    query: String,
    category: String,
}

impl Default for TagPicker {
    fn default() -> Self {
        Self::new(MergeTagCatalog::new())
    }
}

impl TagPicker {
    pub fn new(catalog: MergeTagCatalog) -> Self {
        Self {
            catalog,
            guard: LoadGuard::new(),
            open: false,
            query: String::new(),
            category: ALL_CATEGORIES.to_string(),
        }
    }

    pub fn catalog(&self) -> &MergeTagCatalog {
        &self.catalog
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.guard.is_loading()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Show the picker. Returns a ticket when the catalog still has to be
    /// fetched; the host completes it with [`complete_load`](Self::complete_load).
    pub fn open(&mut self) -> Option<LoadTicket> {
        self.open = true;
        if self.catalog.is_loaded() {
            return None;
        }
        if self.guard.is_loading() {
            log::debug!("tag picker reopened while a load is in flight, restarting it");
        }
        Some(self.guard.begin())
    }

    /// Open and, when needed, load from `source` in one step.
    pub async fn open_with<S: MergeTagSource>(&mut self, source: &S) {
        if let Some(ticket) = self.open() {
            let result = source.fetch_groups().await;
            self.complete_load(ticket, result);
        }
    }

    /// Deliver a fetch result. Returns `false` when the ticket is stale and
    /// the result was discarded.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<MergeTagGroup>, CatalogError>,
    ) -> bool {
        if !self.guard.finish(ticket) {
            return false;
        }
        self.catalog.apply_load(result);
        true
    }

    /// Hide the picker, resetting its view state and abandoning any load.
    pub fn close(&mut self) {
        self.open = false;
        self.guard.cancel();
        self.query.clear();
        self.category = ALL_CATEGORIES.to_string();
    }

    pub fn set_query(&mut self, query: &str) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.query = query.to_string();
        self.category = ALL_CATEGORIES.to_string();
        true
    }

    pub fn set_category(&mut self, category: &str) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.category = category.to_string();
        self.query.clear();
        true
    }

    /// Groups to display for the current view state; empty while loading.
    pub fn visible_groups(&self) -> Vec<MergeTagGroup> {
        if self.is_loading() {
            return Vec::new();
        }
        if !self.query.trim().is_empty() {
            self.catalog.search(&self.query)
        } else {
            self.catalog.filter_by_category(&self.category)
        }
    }

    /// Insert `tag` into `target` and close the picker.
    pub fn apply(&mut self, tag: &MergeTag, target: &mut dyn ContentHandle) {
        target.insert_at_cursor(&tag.tag);
        self.close();
    }

    fn accepts_input(&self) -> bool {
        self.open && !self.is_loading()
    }
}
