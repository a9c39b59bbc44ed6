//! Registry of arrays whose true element type is boolean.
//!
//! The storage has no boolean element type, so boolean arrays are stored as
//! `u8` and their names are recorded here per association. One registry is
//! shared by every attribute set of a dataset: cloning a
//! [`BoolArrayRegistry`] clones the handle, not the contents.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use crate::association::Association;

/// Shared per-association record of boolean array names
#[derive(Debug, Clone, Default)]
pub struct BoolArrayRegistry {
    names: Rc<RefCell<HashMap<Association, BTreeSet<String>>>>,
}

impl BoolArrayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `name` as boolean. Returns false if it was already marked.
    pub fn register(&self, association: Association, name: &str) -> bool {
        self.names
            .borrow_mut()
            .entry(association)
            .or_default()
            .insert(name.to_string())
    }

    /// Clear the mark on `name`. Returns true if it was marked.
    pub fn unregister(&self, association: Association, name: &str) -> bool {
        self.names
            .borrow_mut()
            .get_mut(&association)
            .map(|names| names.remove(name))
            .unwrap_or(false)
    }

    pub fn contains(&self, association: Association, name: &str) -> bool {
        self.names
            .borrow()
            .get(&association)
            .map(|names| names.contains(name))
            .unwrap_or(false)
    }

    /// Marked names for an association, sorted
    pub fn names(&self, association: Association) -> Vec<String> {
        self.names
            .borrow()
            .get(&association)
            .map(|names| names.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Clear every mark for an association
    pub fn clear(&self, association: Association) {
        self.names.borrow_mut().remove(&association);
    }

    /// Check if two handles point at the same registry
    pub fn is_shared_with(&self, other: &BoolArrayRegistry) -> bool {
        Rc::ptr_eq(&self.names, &other.names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_unregister() {
        let registry = BoolArrayRegistry::new();
        assert!(registry.register(Association::Point, "mask"));
        assert!(!registry.register(Association::Point, "mask"));
        assert!(registry.contains(Association::Point, "mask"));
        assert!(!registry.contains(Association::Cell, "mask"));

        assert!(registry.unregister(Association::Point, "mask"));
        assert!(!registry.unregister(Association::Point, "mask"));
        assert!(!registry.contains(Association::Point, "mask"));
    }

    #[test]
    fn test_clones_share_state() {
        let registry = BoolArrayRegistry::new();
        let handle = registry.clone();
        handle.register(Association::Cell, "ghost");

        assert!(registry.contains(Association::Cell, "ghost"));
        assert!(registry.is_shared_with(&handle));
        assert!(!registry.is_shared_with(&BoolArrayRegistry::new()));
    }

    #[test]
    fn test_names_sorted_per_association() {
        let registry = BoolArrayRegistry::new();
        registry.register(Association::Point, "b");
        registry.register(Association::Point, "a");
        registry.register(Association::Field, "c");

        assert_eq!(registry.names(Association::Point), vec!["a", "b"]);
        registry.clear(Association::Point);
        assert!(registry.names(Association::Point).is_empty());
        assert_eq!(registry.names(Association::Field), vec!["c"]);
    }
}
