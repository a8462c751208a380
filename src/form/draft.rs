//! The in-progress draft: schema-governed fields plus auxiliary lists.

use crate::core::types::{Record, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An in-progress, not-yet-submitted form record.
///
/// A draft holds two kinds of state: the [`Record`] of schema-governed
/// fields, and named auxiliary lists of free-text items (included items,
/// requirements, photo URLs, schedule entries) that live outside the
/// schema and are merged into the submission at assembly time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Draft {
    record: Record,
    lists: IndexMap<String, Vec<String>>,
}

impl Draft {
    /// Create an empty draft.
    pub fn new() -> Self {
        Self {
            record: Record::new(),
            lists: IndexMap::new(),
        }
    }

    /// The schema-governed field record.
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Set a schema-governed field.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.record.set(name, value);
    }

    /// Get a schema-governed field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.record.get(name)
    }

    /// Append a free-text item to a named list.
    ///
    /// The item is trimmed first; blank items are dropped and `false` is
    /// returned. The list is created on first use.
    pub fn push_item(&mut self, list: impl Into<String>, item: &str) -> bool {
        let trimmed = item.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.lists
            .entry(list.into())
            .or_default()
            .push(trimmed.to_string());
        true
    }

    /// Remove the item at `index` from a named list, returning it.
    pub fn remove_item(&mut self, list: &str, index: usize) -> Option<String> {
        let items = self.lists.get_mut(list)?;
        if index < items.len() {
            Some(items.remove(index))
        } else {
            None
        }
    }

    /// The items of a named list, empty if the list was never touched.
    pub fn items(&self, list: &str) -> &[String] {
        self.lists.get(list).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over the auxiliary lists in creation order.
    pub fn lists(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.lists.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Discard everything: fields and auxiliary lists.
    pub fn clear(&mut self) {
        self.record = Record::new();
        self.lists.clear();
    }
}
