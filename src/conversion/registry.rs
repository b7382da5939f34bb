//! Append-only, name-deduplicated category list.

use std::collections::HashMap;

use crate::ir::{Category, CategoryId, IdSequence};

/// Assigns category ids in first-seen order and never reassigns them.
#[derive(Debug, Default)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
    by_name: HashMap<String, CategoryId>,
    ids: IdSequence<CategoryId>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `name`, appending a new category if it is unseen.
    pub fn register(&mut self, name: &str) -> CategoryId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }

        let id = self.ids.next_id();
        self.categories.push(Category::new(id, name));
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Categories in first-seen order.
    pub fn into_categories(self) -> Vec<Category> {
        self.categories
    }
}
