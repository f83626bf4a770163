//! Toggleable id sets for chosen services and products.

use std::collections::BTreeSet;

/// Set of selected catalog ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove `id` if present, insert it otherwise.
    ///
    /// Returns whether `id` is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Ids for the wire, in a stable order.
    pub fn to_vec(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut set = SelectionSet::new();
        assert!(set.toggle("s1"));
        assert!(set.contains("s1"));
        assert!(!set.toggle("s1"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_double_toggle_restores_original() {
        let original: SelectionSet = ["a", "b", "c"].into_iter().collect();

        for id in ["a", "b", "z"] {
            let mut set = original.clone();
            set.toggle(id);
            set.toggle(id);
            assert_eq!(set, original, "double toggle of {id}");
        }
    }

    #[test]
    fn test_duplicates_collapse() {
        let set: SelectionSet = ["x", "x", "y"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.to_vec(), vec!["x".to_string(), "y".to_string()]);
    }
}
