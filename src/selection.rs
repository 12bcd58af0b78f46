//! Selection Store
//!
//! Ordered set of at most [`MAX_SELECTED`] locations chosen by the user.
//! Locations are compared by their rounded coordinate pair, so the same
//! point reached from the table or from a map click is one entry.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Location;

/// Upper bound on the number of selected locations
pub const MAX_SELECTED: usize = 5;

/// Result of [`SelectionStore::toggle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// The selection was full and the location was not in it
    Rejected,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SelectionStore {
    selected: Vec<Location>,
}

impl SelectionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the location if selected, otherwise add it while under the cap
    pub fn toggle(&mut self, location: &Location) -> ToggleOutcome {
        if self.remove(location) {
            return ToggleOutcome::Removed;
        }
        if self.is_full() {
            debug!(address = %location.address, "Selection full, rejecting");
            return ToggleOutcome::Rejected;
        }
        self.selected.push(location.clone());
        ToggleOutcome::Added
    }

    /// Drop the location if present. Returns whether anything was removed.
    pub fn remove(&mut self, location: &Location) -> bool {
        let key = location.coordinate_key();
        let before = self.selected.len();
        self.selected.retain(|selected| selected.coordinate_key() != key);
        self.selected.len() != before
    }

    /// Selected locations in insertion order
    #[must_use]
    pub fn list(&self) -> &[Location] {
        &self.selected
    }

    #[must_use]
    pub fn contains(&self, location: &Location) -> bool {
        let key = location.coordinate_key();
        self.selected.iter().any(|selected| selected.coordinate_key() == key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.selected.len() >= MAX_SELECTED
    }

    /// `[latitude, longitude]` pairs in insertion order
    #[must_use]
    pub fn coordinates(&self) -> Vec<[f64; 2]> {
        self.selected
            .iter()
            .map(|location| [location.latitude, location.longitude])
            .collect()
    }

    /// Counter shown under the table, e.g. `Selected 2/5 locations`
    #[must_use]
    pub fn counter_text(&self) -> String {
        format!("Selected {}/{MAX_SELECTED} locations", self.selected.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn location(index: usize) -> Location {
        Location::new(
            index,
            format!("Location {index}"),
            50.0 + index as f64 * 0.1,
            19.0 + index as f64 * 0.1,
        )
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut store = SelectionStore::new();
        let loc = location(0);

        assert_eq!(store.toggle(&loc), ToggleOutcome::Added);
        assert!(store.contains(&loc));
        assert_eq!(store.toggle(&loc), ToggleOutcome::Removed);
        assert!(store.is_empty());
    }

    #[test]
    fn test_never_exceeds_cap() {
        let mut store = SelectionStore::new();
        for i in 0..MAX_SELECTED {
            assert_eq!(store.toggle(&location(i)), ToggleOutcome::Added);
        }
        assert!(store.is_full());

        for i in MAX_SELECTED..MAX_SELECTED + 3 {
            assert_eq!(store.toggle(&location(i)), ToggleOutcome::Rejected);
            assert_eq!(store.len(), MAX_SELECTED);
        }
    }

    #[test]
    fn test_toggle_selected_when_full_still_removes() {
        let mut store = SelectionStore::new();
        for i in 0..MAX_SELECTED {
            store.toggle(&location(i));
        }
        assert_eq!(store.toggle(&location(2)), ToggleOutcome::Removed);
        assert_eq!(store.len(), MAX_SELECTED - 1);
        assert_eq!(store.toggle(&location(9)), ToggleOutcome::Added);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = SelectionStore::new();
        store.toggle(&location(0));
        store.toggle(&location(1));

        assert!(!store.remove(&location(3)));
        let addresses: Vec<&str> = store.list().iter().map(|l| l.address.as_str()).collect();
        assert_eq!(addresses, vec!["Location 0", "Location 1"]);
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let mut store = SelectionStore::new();
        for i in [3, 1, 4] {
            store.toggle(&location(i));
        }
        store.remove(&location(1));
        store.toggle(&location(2));

        let indices: Vec<usize> = store.list().iter().map(|l| l.index).collect();
        assert_eq!(indices, vec![3, 4, 2]);
    }

    #[test]
    fn test_dedup_by_rounded_coordinates() {
        let mut store = SelectionStore::new();
        let from_table = Location::new(0, "Rynek Główny", 50.061_700_1, 19.937_300_2);
        let from_map = Location::new(0, "Rynek Główny", 50.061_699_8, 19.937_299_9);

        assert_eq!(store.toggle(&from_table), ToggleOutcome::Added);
        assert!(store.contains(&from_map));
        assert_eq!(store.toggle(&from_map), ToggleOutcome::Removed);
        assert!(store.is_empty());
    }

    #[rstest]
    #[case(0, "Selected 0/5 locations")]
    #[case(2, "Selected 2/5 locations")]
    #[case(5, "Selected 5/5 locations")]
    fn test_counter_text(#[case] count: usize, #[case] expected: &str) {
        let mut store = SelectionStore::new();
        for i in 0..count {
            store.toggle(&location(i));
        }
        assert_eq!(store.counter_text(), expected);
    }

    #[test]
    fn test_coordinates_in_order() {
        let mut store = SelectionStore::new();
        let (first, second) = (location(1), location(0));
        store.toggle(&first);
        store.toggle(&second);
        assert_eq!(
            store.coordinates(),
            vec![
                [first.latitude, first.longitude],
                [second.latitude, second.longitude]
            ]
        );
    }
}
