//! Array associations and lookup keys

use serde::{Deserialize, Serialize};

/// The mesh entity an array is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum Association {
    /// One tuple per point
    Point,
    /// One tuple per cell
    Cell,
    /// Dataset-wide values of any length
    Field,
    /// One tuple per table row
    Row,
}

impl Association {
    /// All associations
    pub fn all() -> [Association; 4] {
        [
            Association::Point,
            Association::Cell,
            Association::Field,
            Association::Row,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Association::Point => "POINT",
            Association::Cell => "CELL",
            Association::Field => "FIELD",
            Association::Row => "ROW",
        }
    }

    /// Check if the association supports active scalars, vectors and
    /// texture coordinates
    pub fn has_active_attributes(&self) -> bool {
        !matches!(self, Association::Field)
    }
}

impl std::fmt::Display for Association {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An array name or a position in the container
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArrayKey {
    Name(String),
    Index(usize),
}

impl ArrayKey {
    pub fn as_name(&self) -> Option<&str> {
        match self {
            ArrayKey::Name(name) => Some(name),
            ArrayKey::Index(_) => None,
        }
    }
}

impl std::fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArrayKey::Name(name) => write!(f, "'{}'", name),
            ArrayKey::Index(index) => write!(f, "#{}", index),
        }
    }
}

impl From<&str> for ArrayKey {
    fn from(name: &str) -> Self {
        ArrayKey::Name(name.to_string())
    }
}

impl From<String> for ArrayKey {
    fn from(name: String) -> Self {
        ArrayKey::Name(name)
    }
}

impl From<&String> for ArrayKey {
    fn from(name: &String) -> Self {
        ArrayKey::Name(name.clone())
    }
}

impl From<usize> for ArrayKey {
    fn from(index: usize) -> Self {
        ArrayKey::Index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_association_display() {
        assert_eq!(Association::Point.to_string(), "POINT");
        assert_eq!(Association::Row.to_string(), "ROW");
        assert!(!Association::Field.has_active_attributes());
        assert!(Association::Cell.has_active_attributes());
    }

    #[test]
    fn test_key_conversions() {
        assert_eq!(ArrayKey::from("temp"), ArrayKey::Name("temp".to_string()));
        assert_eq!(ArrayKey::from(2usize), ArrayKey::Index(2));
        assert_eq!(ArrayKey::from(2usize).to_string(), "#2");
        assert_eq!(ArrayKey::from("temp").as_name(), Some("temp"));
    }
}
