//! Dictionary-style access to the arrays of one association
//!
//! A [`DataSetAttributes`] wraps one [`ArrayStorage`] container together with
//! a back-reference to the owning dataset (for point, cell and row counts),
//! the association it serves, and the boolean array registry it shares with
//! its sibling attribute sets.
//!
//! # Normalization on append
//!
//! Values pass through a fixed sequence before they reach the storage:
//!
//! 1. lists become rank-1 arrays
//! 2. boolean arrays are registered and stored as `u8`
//! 3. the first-axis length is checked against [`DataSetAttributes::valid_array_len`]
//! 4. scalars are broadcast to the required length
//! 5. `(N, rows, cols)` matrix stacks are flattened to `(N, rows * cols)`
//! 6. the buffer is made contiguous (copying only when it is not)
//!
//! The stored buffer is owned by the storage. A caller that kept a clone of
//! the array it passed in shares the buffer until either side writes to it.

use std::fmt;
use std::rc::Rc;

use crate::array::{ArrayInput, ArrayValue, DataArray, ScalarType, StringArray};
use crate::association::{ArrayKey, Association};
use crate::config::AttributesConfig;
use crate::dataset::DataSetExtent;
use crate::error::{validation, AttributeError, AttributeResult};
use crate::registry::BoolArrayRegistry;
use crate::storage::{ActiveAttribute, ArrayStorage, MemoryStorage};

/// The named arrays of one association on a dataset
#[derive(Debug)]
pub struct DataSetAttributes<S: ArrayStorage = MemoryStorage> {
    storage: S,
    dataset: Rc<dyn DataSetExtent>,
    association: Association,
    bool_arrays: BoolArrayRegistry,
    config: AttributesConfig,
}

impl<S: ArrayStorage> DataSetAttributes<S> {
    /// Wrap `storage` as the `association` arrays of `dataset`
    pub fn new(
        storage: S,
        dataset: Rc<dyn DataSetExtent>,
        association: Association,
        bool_arrays: BoolArrayRegistry,
    ) -> Self {
        Self {
            storage,
            dataset,
            association,
            bool_arrays,
            config: AttributesConfig::default(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: AttributesConfig) -> Self {
        self.config = config;
        self
    }

    pub fn association(&self) -> Association {
        self.association
    }

    pub fn dataset(&self) -> &dyn DataSetExtent {
        self.dataset.as_ref()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn config(&self) -> &AttributesConfig {
        &self.config
    }

    pub fn bool_arrays(&self) -> &BoolArrayRegistry {
        &self.bool_arrays
    }

    /// Modification counter of the wrapped storage
    pub fn modified_time(&self) -> u64 {
        self.storage.modified_time()
    }

    /// Number of arrays held, including anonymous ones
    pub fn len(&self) -> usize {
        self.storage.number_of_arrays()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Required first-axis length for arrays of this association
    ///
    /// `None` means unconstrained: always for field data, and for row data
    /// when the dataset is not a table.
    pub fn valid_array_len(&self) -> Option<usize> {
        match self.association {
            Association::Point => Some(self.dataset.n_points()),
            Association::Cell => Some(self.dataset.n_cells()),
            Association::Row => self.dataset.n_rows(),
            Association::Field => None,
        }
    }

    // === Lookup ===

    /// Get an array by name or position
    ///
    /// Numeric arrays are looked up first, any other array kind second.
    /// Arrays registered as boolean come back with a `Bool` element type.
    pub fn get(&self, key: impl Into<ArrayKey>) -> AttributeResult<ArrayValue> {
        let key = key.into();
        self.validate_key(&key)?;

        let name = match &key {
            ArrayKey::Name(name) => name.clone(),
            ArrayKey::Index(index) => self
                .storage
                .array_name(*index)
                .unwrap_or_default()
                .to_string(),
        };

        tracing::trace!("Looking up {} in {} data", key, self.association);
        self.value_at(&key, &name)
            .ok_or_else(|| not_found(&key))
    }

    /// Like [`get`](Self::get), with a missing array mapped to `None`
    pub fn get_array_or_none(&self, key: impl Into<ArrayKey>) -> AttributeResult<Option<ArrayValue>> {
        match self.get(key) {
            Ok(value) => Ok(Some(value)),
            Err(AttributeError::KeyNotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Check if a named array exists
    pub fn contains(&self, name: &str) -> bool {
        self.iter().any(|n| n == name)
    }

    /// Iterate over array names in container order
    ///
    /// Anonymous arrays are skipped. The iterator borrows the attribute set,
    /// so call `iter` again to restart.
    pub fn iter(&self) -> Names<'_, S> {
        Names {
            storage: &self.storage,
            index: 0,
        }
    }

    /// Names of all named arrays
    pub fn keys(&self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }

    /// All named arrays
    pub fn values(&self) -> Vec<ArrayValue> {
        self.items().into_iter().map(|(_, value)| value).collect()
    }

    /// All named arrays with their names
    pub fn items(&self) -> Vec<(String, ArrayValue)> {
        (0..self.len())
            .filter_map(|index| {
                let name = self.storage.array_name(index)?;
                if name.is_empty() {
                    return None;
                }
                let value = self.value_at(&ArrayKey::Index(index), name)?;
                Some((name.to_string(), value))
            })
            .collect()
    }

    // === Mutation ===

    /// Insert or replace a named array
    ///
    /// An integer key addresses the name of the array at that position.
    pub fn set(
        &mut self,
        key: impl Into<ArrayKey>,
        value: impl Into<ArrayInput>,
    ) -> AttributeResult<()> {
        let key = key.into();
        let name = self.resolve_name(&key)?;
        self.append(value, &name, self.config.deep_copy_on_set)
    }

    /// Set every pair in `items`, overwriting existing arrays
    pub fn update<I, K, V>(&mut self, items: I) -> AttributeResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ArrayKey>,
        V: Into<ArrayInput>,
    {
        for (key, value) in items {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Normalize `value` and add it to the storage as `name`
    ///
    /// `deep_copy` asks the storage for a private copy of the buffer.
    ///
    /// A boolean value registers `name` as boolean before its length is
    /// checked; the registration is kept if the check then fails.
    pub fn append(
        &mut self,
        value: impl Into<ArrayInput>,
        name: &str,
        deep_copy: bool,
    ) -> AttributeResult<()> {
        let array = match value.into() {
            ArrayInput::Null => {
                return Err(AttributeError::NullValue {
                    name: name.to_string(),
                })
            }
            ArrayInput::Strings(values) => {
                return self.append_strings(StringArray::new(values), name, deep_copy)
            }
            ArrayInput::Scalar(scalar) => scalar.to_array(),
            ArrayInput::List(items) => DataArray::from_scalars(&items),
            ArrayInput::Array(array) => array,
        };

        // Anonymous arrays are never flagged and read back as u8
        let is_bool = array.dtype() == ScalarType::Bool;
        let mut array = if is_bool {
            if !name.is_empty() {
                self.bool_arrays.register(self.association, name);
            }
            array.bool_to_u8()
        } else {
            array
        };

        let required = self.valid_array_len().unwrap_or_else(|| array.len());
        if let Err(err) = self.validate_value_len(name, &array, required) {
            if is_bool && !name.is_empty() {
                tracing::warn!(
                    "Array '{}' stays registered as boolean in {} data after a rejected append",
                    name,
                    self.association
                );
            }
            return Err(err);
        }

        if array.is_scalar() {
            array = array.broadcast_scalar(required);
        }
        if array.ndim() == 3 {
            array = array.flatten_matrices(self.config.matrix_order)?;
        }
        let array = array.into_standard_layout();

        if !is_bool && !name.is_empty() {
            self.bool_arrays.unregister(self.association, name);
        }

        tracing::debug!(
            "Adding array '{}' ({}, shape {:?}) to {} data",
            name,
            array.dtype(),
            array.shape(),
            self.association
        );
        self.storage
            .add_array(name, ArrayValue::Numeric(array), deep_copy);
        self.storage.modified();
        Ok(())
    }

    /// Remove an array by name or position
    pub fn remove(&mut self, key: impl Into<ArrayKey>) -> AttributeResult<()> {
        let key = key.into();
        let name = self.resolve_name(&key)?;
        self.remove_named(&name)
            .map(|_| ())
            .ok_or_else(|| not_found(&key))
    }

    /// Alias for [`remove`](Self::remove)
    pub fn delete(&mut self, key: impl Into<ArrayKey>) -> AttributeResult<()> {
        self.remove(key)
    }

    /// Remove an array and return a private copy of it
    pub fn pop(&mut self, key: impl Into<ArrayKey>) -> AttributeResult<ArrayValue> {
        let key = key.into();
        let name = self.resolve_name(&key)?;
        let value = self
            .value_at(&ArrayKey::Name(name.clone()), &name)
            .ok_or_else(|| not_found(&key))?
            .deep_copy();
        self.remove_named(&name);
        Ok(value)
    }

    /// Remove every named array
    pub fn clear(&mut self) {
        for name in self.keys() {
            self.remove_named(&name);
        }
    }

    // === Active attributes ===

    pub fn active_scalars(&self) -> AttributeResult<Option<DataArray>> {
        self.active(ActiveAttribute::Scalars)
    }

    pub fn active_scalars_name(&self) -> AttributeResult<Option<&str>> {
        self.active_name(ActiveAttribute::Scalars)
    }

    /// Make `name` the active scalars, or clear them with `None`
    pub fn set_active_scalars(&mut self, name: Option<&str>) -> AttributeResult<()> {
        self.set_active(ActiveAttribute::Scalars, name)
    }

    pub fn active_vectors(&self) -> AttributeResult<Option<DataArray>> {
        self.active(ActiveAttribute::Vectors)
    }

    pub fn active_vectors_name(&self) -> AttributeResult<Option<&str>> {
        self.active_name(ActiveAttribute::Vectors)
    }

    /// Make `name` the active vectors; the array must have 3 components
    pub fn set_active_vectors(&mut self, name: Option<&str>) -> AttributeResult<()> {
        self.set_active(ActiveAttribute::Vectors, name)
    }

    pub fn active_normals(&self) -> AttributeResult<Option<DataArray>> {
        self.active(ActiveAttribute::Normals)
    }

    pub fn active_normals_name(&self) -> AttributeResult<Option<&str>> {
        self.active_name(ActiveAttribute::Normals)
    }

    /// Make `name` the active normals; the array must have 3 components
    pub fn set_active_normals(&mut self, name: Option<&str>) -> AttributeResult<()> {
        self.set_active(ActiveAttribute::Normals, name)
    }

    /// The active texture coordinates, if any
    pub fn texture_coordinates(&self) -> Option<DataArray> {
        let name = self
            .storage
            .active_attribute(ActiveAttribute::TextureCoordinates)?;
        self.storage
            .typed_array(&ArrayKey::from(name))
            .map(|array| self.restore_bool(name, array))
    }

    /// Store `value` as the texture coordinates
    ///
    /// The value must be an `(n, 2)` numeric array with one tuple per point
    /// of the dataset, whichever association this set serves.
    pub fn set_texture_coordinates(&mut self, value: impl Into<ArrayInput>) -> AttributeResult<()> {
        self.ensure_active_attributes(ActiveAttribute::TextureCoordinates)?;
        let name = self.config.texture_coordinates_name.clone();

        let array = match value.into() {
            ArrayInput::Array(array) => array,
            other => {
                return Err(AttributeError::TypeMismatch {
                    message: format!(
                        "texture coordinates must be a numeric array, got a {}",
                        other.kind_name()
                    ),
                })
            }
        };

        validation::validate_ndim(&name, 2, &array)?;
        validation::validate_length(&name, self.dataset.n_points(), array.len())?;
        validation::validate_components(&name, 2, &array)?;

        let array = if array.dtype() == ScalarType::Bool {
            self.bool_arrays.register(self.association, &name);
            array.bool_to_u8()
        } else {
            self.bool_arrays.unregister(self.association, &name);
            array
        };

        tracing::debug!("Setting texture coordinates on {} data", self.association);
        self.storage.add_array(
            &name,
            ArrayValue::Numeric(array.into_standard_layout()),
            false,
        );
        self.storage
            .set_active_attribute(ActiveAttribute::TextureCoordinates, Some(&name));
        self.storage.modified();
        Ok(())
    }

    // === Internals ===

    fn validate_key(&self, key: &ArrayKey) -> AttributeResult<()> {
        if let ArrayKey::Index(index) = key {
            validation::validate_index(*index, self.len())?;
        }
        Ok(())
    }

    /// Name addressed by `key`; anonymous arrays have no usable name
    fn resolve_name(&self, key: &ArrayKey) -> AttributeResult<String> {
        match key {
            ArrayKey::Name(name) => Ok(name.clone()),
            ArrayKey::Index(index) => {
                self.validate_key(key)?;
                self.storage
                    .array_name(*index)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .ok_or_else(|| not_found(key))
            }
        }
    }

    fn value_at(&self, key: &ArrayKey, name: &str) -> Option<ArrayValue> {
        if let Some(array) = self.storage.typed_array(key) {
            return Some(ArrayValue::Numeric(self.restore_bool(name, array)));
        }
        self.storage.abstract_array(key).cloned()
    }

    fn restore_bool(&self, name: &str, array: &DataArray) -> DataArray {
        if !name.is_empty() && self.bool_arrays.contains(self.association, name) {
            array.to_bool().unwrap_or_else(|| array.clone())
        } else {
            array.clone()
        }
    }

    fn validate_value_len(&self, name: &str, array: &DataArray, required: usize) -> AttributeResult<()> {
        if array.is_scalar() {
            if !self.config.broadcast_scalars && required != 1 {
                return Err(AttributeError::LengthMismatch {
                    name: name.to_string(),
                    expected: required,
                    actual: 1,
                });
            }
            return Ok(());
        }
        validation::validate_length(name, required, array.len())
    }

    fn append_strings(&mut self, values: StringArray, name: &str, deep_copy: bool) -> AttributeResult<()> {
        let required = self.valid_array_len().unwrap_or(values.len());
        validation::validate_length(name, required, values.len())?;

        if !name.is_empty() {
            self.bool_arrays.unregister(self.association, name);
        }
        tracing::debug!(
            "Adding string array '{}' ({} values) to {} data",
            name,
            values.len(),
            self.association
        );
        self.storage
            .add_array(name, ArrayValue::Strings(values), deep_copy);
        self.storage.modified();
        Ok(())
    }

    fn remove_named(&mut self, name: &str) -> Option<ArrayValue> {
        self.storage.abstract_array(&ArrayKey::from(name))?;

        self.bool_arrays.unregister(self.association, name);
        let removed = self.storage.remove_array(name)?;
        self.storage.modified();
        tracing::debug!("Removed array '{}' from {} data", name, self.association);
        Some(removed)
    }

    fn ensure_active_attributes(&self, kind: ActiveAttribute) -> AttributeResult<()> {
        if !self.association.has_active_attributes() {
            return Err(AttributeError::TypeMismatch {
                message: format!(
                    "{} data has no active {}",
                    self.association,
                    kind.label().to_lowercase()
                ),
            });
        }
        Ok(())
    }

    fn active_name(&self, kind: ActiveAttribute) -> AttributeResult<Option<&str>> {
        self.ensure_active_attributes(kind)?;
        Ok(self.storage.active_attribute(kind))
    }

    fn active(&self, kind: ActiveAttribute) -> AttributeResult<Option<DataArray>> {
        let array = self.active_name(kind)?.and_then(|name| {
            self.storage
                .typed_array(&ArrayKey::from(name))
                .map(|array| self.restore_bool(name, array))
        });
        Ok(array)
    }

    fn set_active(&mut self, kind: ActiveAttribute, name: Option<&str>) -> AttributeResult<()> {
        self.ensure_active_attributes(kind)?;

        if let Some(name) = name {
            let key = ArrayKey::from(name);
            let array = self.storage.typed_array(&key).ok_or_else(|| not_found(&key))?;
            if let Some(components) = kind.required_components() {
                validation::validate_components(name, components, array)?;
            }
        }

        if !self.storage.set_active_attribute(kind, name) {
            return Err(not_found(&ArrayKey::from(name.unwrap_or_default())));
        }
        self.storage.modified();
        tracing::debug!(
            "Active {} of {} data set to {:?}",
            kind.label().to_lowercase(),
            self.association,
            name
        );
        Ok(())
    }
}

fn not_found(key: &ArrayKey) -> AttributeError {
    AttributeError::KeyNotFound {
        key: key.to_string(),
    }
}

/// Iterator over the array names of a [`DataSetAttributes`]
pub struct Names<'a, S: ArrayStorage> {
    storage: &'a S,
    index: usize,
}

impl<'a, S: ArrayStorage> Iterator for Names<'a, S> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        while self.index < self.storage.number_of_arrays() {
            let index = self.index;
            self.index += 1;
            match self.storage.array_name(index) {
                Some(name) if !name.is_empty() => return Some(name),
                _ => continue,
            }
        }
        None
    }
}

impl<'a, S: ArrayStorage> IntoIterator for &'a DataSetAttributes<S> {
    type Item = &'a str;
    type IntoIter = Names<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: ArrayStorage> fmt::Display for DataSetAttributes<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DataSetAttributes")?;
        writeln!(f, "{:<16}: {}", "Association", self.association)?;
        if self.association.has_active_attributes() {
            for (kind, title) in [
                (ActiveAttribute::Scalars, "Active Scalars"),
                (ActiveAttribute::Vectors, "Active Vectors"),
                (ActiveAttribute::TextureCoordinates, "Active Texture"),
                (ActiveAttribute::Normals, "Active Normals"),
            ] {
                let name = self.storage.active_attribute(kind).unwrap_or("None");
                writeln!(f, "{:<16}: {}", title, name)?;
            }
        }

        let items = self.items();
        if items.is_empty() {
            return write!(f, "{:<16}: None", "Contains arrays");
        }
        write!(f, "{:<16}:", "Contains arrays")?;
        for (name, value) in items {
            let (dtype, shape) = match &value {
                ArrayValue::Numeric(array) => (array.dtype().name(), format!("{:?}", array.shape())),
                ArrayValue::Strings(array) => ("str", format!("[{}]", array.len())),
            };
            write!(f, "\n    {:<24}{:<11}{:<16}", name, dtype, shape)?;
            for kind in ActiveAttribute::all() {
                if self.storage.active_attribute(kind) == Some(name.as_str()) {
                    write!(f, "{}", kind.label())?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::MeshExtent;

    fn point_data(n_points: usize) -> DataSetAttributes {
        DataSetAttributes::new(
            MemoryStorage::new(),
            Rc::new(MeshExtent::new(n_points, 1)),
            Association::Point,
            BoolArrayRegistry::new(),
        )
    }

    #[test]
    fn test_scalar_broadcast() {
        let mut attrs = point_data(4);
        attrs.set("temp", 5).unwrap();

        let temp = attrs.get("temp").unwrap().into_numeric().unwrap();
        assert_eq!(temp.to_vec::<i64>().unwrap(), vec![5, 5, 5, 5]);

        attrs.remove("temp").unwrap();
        assert!(!attrs.contains("temp"));
    }

    #[test]
    fn test_index_out_of_range() {
        let attrs = point_data(2);
        assert!(matches!(
            attrs.get(0usize),
            Err(AttributeError::IndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_missing_name() {
        let attrs = point_data(2);
        assert!(matches!(
            attrs.get("nope"),
            Err(AttributeError::KeyNotFound { .. })
        ));
        assert!(attrs.get_array_or_none("nope").unwrap().is_none());
    }

    #[test]
    fn test_null_value_rejected() {
        let mut attrs = point_data(2);
        let result = attrs.append(None::<f64>, "empty", false);
        assert!(matches!(result, Err(AttributeError::NullValue { .. })));
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_anonymous_arrays_hidden_from_keys() {
        let mut attrs = point_data(2);
        attrs.append(vec![1.0, 2.0], "", false).unwrap();
        attrs.append(vec![3.0, 4.0], "named", false).unwrap();

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.keys(), vec!["named"]);
        assert_eq!(attrs.values().len(), 1);
        assert!(matches!(
            attrs.remove(0usize),
            Err(AttributeError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn test_modified_on_mutation() {
        let mut attrs = point_data(2);
        let before = attrs.modified_time();
        attrs.set("a", 1.0).unwrap();
        assert!(attrs.modified_time() > before);
    }

    #[test]
    fn test_replacing_bool_with_float_clears_flag() {
        let mut attrs = point_data(2);
        attrs.set("mask", vec![true, false]).unwrap();
        assert!(attrs.bool_arrays().contains(Association::Point, "mask"));

        attrs.set("mask", vec![0.5, 1.5]).unwrap();
        assert!(!attrs.bool_arrays().contains(Association::Point, "mask"));
        let mask = attrs.get("mask").unwrap().into_numeric().unwrap();
        assert_eq!(mask.dtype(), ScalarType::Float64);
    }

    #[test]
    fn test_display_lists_arrays() {
        let mut attrs = point_data(2);
        attrs.set("temp", vec![1.0, 2.0]).unwrap();
        attrs.set_active_scalars(Some("temp")).unwrap();

        let text = attrs.to_string();
        assert!(text.contains("Association     : POINT"));
        assert!(text.contains("Active Scalars  : temp"));
        assert!(text.contains("float64"));
        assert!(text.contains("SCALARS"));
    }

    #[test]
    fn test_display_empty() {
        let attrs = point_data(2);
        assert!(attrs.to_string().ends_with("Contains arrays : None"));
    }
}
