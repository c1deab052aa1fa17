use dashmap::DashSet;
use std::sync::Arc;

/// Session-scoped set of favorite article ids.
///
/// Clones share the same set, so the store can be handed to every component
/// that needs it. Nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct FavoritesStore {
    ids: Arc<DashSet<String>>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`; returns whether it is a favorite afterwards.
    pub fn toggle(&self, id: &str) -> bool {
        if self.ids.remove(id).is_some() {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Sorted snapshot of the current favorites.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.iter().map(|id| id.key().clone()).collect();
        ids.sort();
        ids
    }
}
