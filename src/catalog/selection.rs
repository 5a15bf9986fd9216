//! Selection bookkeeping that spans every page visited in a session.

use crate::api::ArtworkId;
use std::collections::HashMap;

/// Mapping from artwork id to "selected". A missing id means not selected.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    entries: HashMap<ArtworkId, bool>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, id: ArtworkId) -> bool {
        self.entries.get(&id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, id: ArtworkId, selected: bool) {
        self.entries.insert(id, selected);
    }

    /// Flip the selection of `id` and return the new value
    pub fn toggle(&mut self, id: ArtworkId) -> bool {
        let selected = !self.is_selected(id);
        self.entries.insert(id, selected);
        selected
    }

    /// Forget every entry, on every page
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of ids currently marked selected
    pub fn selected_count(&self) -> usize {
        self.entries.values().filter(|selected| **selected).count()
    }

    /// Number of the given ids that are selected
    pub fn count_in<'a, I>(&self, ids: I) -> usize
    where
        I: IntoIterator<Item = &'a ArtworkId>,
    {
        ids.into_iter().filter(|id| self.is_selected(**id)).count()
    }

    /// Selected ids in ascending order
    pub fn selected_ids(&self) -> Vec<ArtworkId> {
        let mut ids: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_ids_are_not_selected() {
        let selection = SelectionSet::new();
        assert!(!selection.is_selected(42));
        assert_eq!(selection.selected_count(), 0);
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut selection = SelectionSet::new();
        assert!(selection.toggle(7));
        assert!(selection.is_selected(7));
        assert!(!selection.toggle(7));
        assert!(!selection.is_selected(7));
    }

    #[test]
    fn test_false_entries_do_not_count() {
        let mut selection = SelectionSet::new();
        selection.set(1, true);
        selection.set(2, false);
        selection.set(3, true);

        assert_eq!(selection.selected_count(), 2);
        assert_eq!(selection.count_in(&[1, 2, 9]), 1);
        assert_eq!(selection.selected_ids(), vec![1, 3]);
    }

    #[test]
    fn test_clear_forgets_everything() {
        let mut selection = SelectionSet::new();
        selection.set(1, true);
        selection.set(500, true);
        selection.clear();

        assert!(!selection.is_selected(1));
        assert!(!selection.is_selected(500));
        assert_eq!(selection.selected_count(), 0);
    }
}
