//! Array storage trait and the in-memory storage engine
//!
//! The `ArrayStorage` trait is everything an attribute set needs from the
//! container it wraps: enumeration, lookup, add, remove, active attribute
//! designation and modification tracking. [`MemoryStorage`] implements it
//! on plain vectors.

use std::collections::HashMap;

use crate::array::{ArrayValue, DataArray};
use crate::association::ArrayKey;

/// Arrays that can be designated as the primary array of their kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActiveAttribute {
    Scalars,
    Vectors,
    Normals,
    TextureCoordinates,
}

impl ActiveAttribute {
    pub fn all() -> [ActiveAttribute; 4] {
        [
            ActiveAttribute::Scalars,
            ActiveAttribute::Vectors,
            ActiveAttribute::Normals,
            ActiveAttribute::TextureCoordinates,
        ]
    }

    /// Components per tuple an array needs to take this role
    pub fn required_components(&self) -> Option<usize> {
        match self {
            ActiveAttribute::Scalars => None,
            ActiveAttribute::Vectors | ActiveAttribute::Normals => Some(3),
            ActiveAttribute::TextureCoordinates => Some(2),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActiveAttribute::Scalars => "SCALARS",
            ActiveAttribute::Vectors => "VECTORS",
            ActiveAttribute::Normals => "NORMALS",
            ActiveAttribute::TextureCoordinates => "TCOORDS",
        }
    }
}

/// Container of named arrays wrapped by an attribute set
///
/// Lookups by [`ArrayKey::Index`] address the array at that position in
/// container order; lookups by name return the first array with that name.
pub trait ArrayStorage {
    /// Number of arrays, named or not
    fn number_of_arrays(&self) -> usize;

    /// Name of the array at `index` (empty for anonymous arrays)
    fn array_name(&self, index: usize) -> Option<&str>;

    /// Numeric array lookup
    fn typed_array(&self, key: &ArrayKey) -> Option<&DataArray>;

    /// Lookup of any array kind
    fn abstract_array(&self, key: &ArrayKey) -> Option<&ArrayValue>;

    /// Insert an array, replacing a named array with the same name
    fn add_array(&mut self, name: &str, array: ArrayValue, deep_copy: bool);

    /// Remove the named array, returning it
    fn remove_array(&mut self, name: &str) -> Option<ArrayValue>;

    /// Name of the array currently designated for `kind`
    fn active_attribute(&self, kind: ActiveAttribute) -> Option<&str>;

    /// Designate (or with `None`, clear) the array for `kind`.
    /// Returns false if no array has that name.
    fn set_active_attribute(&mut self, kind: ActiveAttribute, name: Option<&str>) -> bool;

    /// Record that the container changed
    fn modified(&mut self);

    /// Monotonic modification counter
    fn modified_time(&self) -> u64;
}

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    array: ArrayValue,
}

/// In-memory array storage
///
/// Arrays keep insertion order; replacing a named array keeps its slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Vec<Entry>,
    active: HashMap<ActiveAttribute, String>,
    mtime: u64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    fn entry(&self, key: &ArrayKey) -> Option<&Entry> {
        match key {
            ArrayKey::Name(name) => self.entries.iter().find(|e| &e.name == name),
            ArrayKey::Index(index) => self.entries.get(*index),
        }
    }
}

impl ArrayStorage for MemoryStorage {
    fn number_of_arrays(&self) -> usize {
        self.entries.len()
    }

    fn array_name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.name.as_str())
    }

    fn typed_array(&self, key: &ArrayKey) -> Option<&DataArray> {
        self.entry(key).and_then(|e| e.array.as_numeric())
    }

    fn abstract_array(&self, key: &ArrayKey) -> Option<&ArrayValue> {
        self.entry(key).map(|e| &e.array)
    }

    fn add_array(&mut self, name: &str, array: ArrayValue, deep_copy: bool) {
        let array = if deep_copy { array.deep_copy() } else { array };
        let existing = if name.is_empty() {
            None
        } else {
            self.position(name)
        };

        match existing {
            Some(index) => self.entries[index].array = array,
            None => self.entries.push(Entry {
                name: name.to_string(),
                array,
            }),
        }
    }

    fn remove_array(&mut self, name: &str) -> Option<ArrayValue> {
        let index = self.position(name)?;
        let entry = self.entries.remove(index);
        self.active.retain(|_, active| active.as_str() != name);
        Some(entry.array)
    }

    fn active_attribute(&self, kind: ActiveAttribute) -> Option<&str> {
        self.active.get(&kind).map(|s| s.as_str())
    }

    fn set_active_attribute(&mut self, kind: ActiveAttribute, name: Option<&str>) -> bool {
        match name {
            None => {
                self.active.remove(&kind);
                true
            }
            Some(name) if self.position(name).is_some() => {
                self.active.insert(kind, name.to_string());
                true
            }
            Some(_) => false,
        }
    }

    fn modified(&mut self) {
        self.mtime += 1;
    }

    fn modified_time(&self) -> u64 {
        self.mtime
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(values: Vec<f64>) -> ArrayValue {
        ArrayValue::Numeric(DataArray::from_vec(values))
    }

    #[test]
    fn test_add_and_lookup() {
        let mut storage = MemoryStorage::new();
        storage.add_array("a", numeric(vec![1.0]), false);
        storage.add_array("b", numeric(vec![2.0]), false);

        assert_eq!(storage.number_of_arrays(), 2);
        assert_eq!(storage.array_name(1), Some("b"));
        assert!(storage.typed_array(&ArrayKey::from("a")).is_some());
        assert!(storage.typed_array(&ArrayKey::Index(1)).is_some());
        assert!(storage.typed_array(&ArrayKey::Index(2)).is_none());
    }

    #[test]
    fn test_replace_keeps_slot() {
        let mut storage = MemoryStorage::new();
        storage.add_array("a", numeric(vec![1.0]), false);
        storage.add_array("b", numeric(vec![2.0]), false);
        storage.add_array("a", numeric(vec![3.0]), false);

        assert_eq!(storage.number_of_arrays(), 2);
        assert_eq!(storage.array_name(0), Some("a"));
        let a = storage.typed_array(&ArrayKey::Index(0)).unwrap();
        assert_eq!(a.to_vec::<f64>().unwrap(), vec![3.0]);
    }

    #[test]
    fn test_anonymous_arrays_are_appended() {
        let mut storage = MemoryStorage::new();
        storage.add_array("", numeric(vec![1.0]), false);
        storage.add_array("", numeric(vec![2.0]), false);
        assert_eq!(storage.number_of_arrays(), 2);
    }

    #[test]
    fn test_strings_are_not_typed() {
        let mut storage = MemoryStorage::new();
        let labels = crate::array::StringArray::new(vec!["x".to_string()]);
        storage.add_array("labels", ArrayValue::Strings(labels), false);

        let key = ArrayKey::from("labels");
        assert!(storage.typed_array(&key).is_none());
        assert!(storage.abstract_array(&key).is_some());
    }

    #[test]
    fn test_remove_clears_active() {
        let mut storage = MemoryStorage::new();
        storage.add_array("a", numeric(vec![1.0]), false);
        assert!(storage.set_active_attribute(ActiveAttribute::Scalars, Some("a")));
        assert!(!storage.set_active_attribute(ActiveAttribute::Scalars, Some("missing")));

        assert!(storage.remove_array("a").is_some());
        assert!(storage.remove_array("a").is_none());
        assert_eq!(storage.active_attribute(ActiveAttribute::Scalars), None);
    }

    #[test]
    fn test_modified_time_increases() {
        let mut storage = MemoryStorage::new();
        let before = storage.modified_time();
        storage.modified();
        assert!(storage.modified_time() > before);
    }

    #[test]
    fn test_active_attribute_components() {
        assert_eq!(ActiveAttribute::Vectors.required_components(), Some(3));
        assert_eq!(ActiveAttribute::TextureCoordinates.required_components(), Some(2));
        assert_eq!(ActiveAttribute::Scalars.required_components(), None);
    }
}
