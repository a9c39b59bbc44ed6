//! Configuration for implore-attributes
//!
//! Controls how values are normalized before they are stored: matrix
//! component order, scalar broadcasting, the copy mode used by `set`, and
//! the name given to texture coordinate arrays.

use serde::{Deserialize, Serialize};

use crate::error::{AttributeError, AttributeResult};

/// Name under which texture coordinates are stored unless configured otherwise
pub const DEFAULT_TEXTURE_COORDINATES_NAME: &str = "Texture Coordinates";

/// Component order used when a stack of matrices is flattened to vectors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum MatrixOrder {
    /// Each matrix is stored column by column (what the storage expects)
    #[default]
    ColumnMajor,
    /// Each matrix is stored row by row, as given
    RowMajor,
}

/// Attribute set configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributesConfig {
    /// Array name used by `set_texture_coordinates`
    pub texture_coordinates_name: String,
    /// Copy mode passed to the storage by `set` and `update`
    pub deep_copy_on_set: bool,
    /// Component order for flattened matrix stacks
    pub matrix_order: MatrixOrder,
    /// Fill scalars to the required length; when false, a scalar stored in a
    /// constrained association longer than one is a length mismatch
    pub broadcast_scalars: bool,
}

impl Default for AttributesConfig {
    fn default() -> Self {
        Self {
            texture_coordinates_name: DEFAULT_TEXTURE_COORDINATES_NAME.to_string(),
            deep_copy_on_set: false,
            matrix_order: MatrixOrder::ColumnMajor,
            broadcast_scalars: true,
        }
    }
}

impl AttributesConfig {
    /// Attribute settings with every field at its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse attribute settings from TOML; missing keys take their defaults
    #[cfg(feature = "toml-config")]
    pub fn from_toml(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Render these attribute settings as pretty TOML
    #[cfg(feature = "toml-config")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Parse attribute settings from JSON; missing keys take their defaults
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Render these attribute settings as pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> AttributeResult<()> {
        if self.texture_coordinates_name.trim().is_empty() {
            return Err(AttributeError::InvalidConfig(
                "texture_coordinates_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
