//! Owning datasets
//!
//! A [`DataSet`] owns one attribute set per association. All four share the
//! dataset's extent (point, cell and row counts) and its boolean array
//! registry.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::association::Association;
use crate::attributes::DataSetAttributes;
use crate::config::AttributesConfig;
use crate::error::AttributeResult;
use crate::registry::BoolArrayRegistry;
use crate::storage::{ArrayStorage, MemoryStorage};

/// Counts an attribute set needs from its owning dataset
pub trait DataSetExtent: std::fmt::Debug {
    fn n_points(&self) -> usize;

    fn n_cells(&self) -> usize;

    /// Row count for tabular datasets
    fn n_rows(&self) -> Option<usize> {
        None
    }
}

/// Point, cell and row counts of a dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshExtent {
    pub n_points: usize,
    pub n_cells: usize,
    pub n_rows: Option<usize>,
}

impl MeshExtent {
    /// Extent of a mesh
    pub fn new(n_points: usize, n_cells: usize) -> Self {
        Self {
            n_points,
            n_cells,
            n_rows: None,
        }
    }

    /// Extent of a table
    pub fn table(n_rows: usize) -> Self {
        Self {
            n_points: 0,
            n_cells: 0,
            n_rows: Some(n_rows),
        }
    }
}

impl DataSetExtent for MeshExtent {
    fn n_points(&self) -> usize {
        self.n_points
    }

    fn n_cells(&self) -> usize {
        self.n_cells
    }

    fn n_rows(&self) -> Option<usize> {
        self.n_rows
    }
}

/// A dataset with point, cell, field and row attribute sets
#[derive(Debug)]
pub struct DataSet<S: ArrayStorage = MemoryStorage> {
    extent: Rc<MeshExtent>,
    bool_arrays: BoolArrayRegistry,
    point_data: DataSetAttributes<S>,
    cell_data: DataSetAttributes<S>,
    field_data: DataSetAttributes<S>,
    row_data: DataSetAttributes<S>,
}

impl DataSet {
    /// Mesh dataset with in-memory storage
    pub fn new(n_points: usize, n_cells: usize) -> Self {
        Self::from_extent(MeshExtent::new(n_points, n_cells))
    }

    /// Tabular dataset with in-memory storage
    pub fn table(n_rows: usize) -> Self {
        Self::from_extent(MeshExtent::table(n_rows))
    }
}

impl<S: ArrayStorage + Default> DataSet<S> {
    /// Dataset with default configuration
    pub fn from_extent(extent: MeshExtent) -> Self {
        Self::build(extent, AttributesConfig::default())
    }

    /// Dataset whose attribute sets all use `config`
    pub fn with_config(extent: MeshExtent, config: AttributesConfig) -> AttributeResult<Self> {
        config.validate()?;
        Ok(Self::build(extent, config))
    }

    fn build(extent: MeshExtent, config: AttributesConfig) -> Self {
        let extent = Rc::new(extent);
        let bool_arrays = BoolArrayRegistry::new();
        let attributes = |association| {
            let dataset: Rc<dyn DataSetExtent> = extent.clone();
            DataSetAttributes::new(S::default(), dataset, association, bool_arrays.clone())
                .with_config(config.clone())
        };

        Self {
            point_data: attributes(Association::Point),
            cell_data: attributes(Association::Cell),
            field_data: attributes(Association::Field),
            row_data: attributes(Association::Row),
            extent,
            bool_arrays,
        }
    }
}

impl<S: ArrayStorage> DataSet<S> {
    pub fn extent(&self) -> &MeshExtent {
        &self.extent
    }

    pub fn n_points(&self) -> usize {
        self.extent.n_points
    }

    pub fn n_cells(&self) -> usize {
        self.extent.n_cells
    }

    /// Registry shared by all attribute sets of this dataset
    pub fn bool_arrays(&self) -> &BoolArrayRegistry {
        &self.bool_arrays
    }

    pub fn point_data(&self) -> &DataSetAttributes<S> {
        &self.point_data
    }

    pub fn point_data_mut(&mut self) -> &mut DataSetAttributes<S> {
        &mut self.point_data
    }

    pub fn cell_data(&self) -> &DataSetAttributes<S> {
        &self.cell_data
    }

    pub fn cell_data_mut(&mut self) -> &mut DataSetAttributes<S> {
        &mut self.cell_data
    }

    pub fn field_data(&self) -> &DataSetAttributes<S> {
        &self.field_data
    }

    pub fn field_data_mut(&mut self) -> &mut DataSetAttributes<S> {
        &mut self.field_data
    }

    pub fn row_data(&self) -> &DataSetAttributes<S> {
        &self.row_data
    }

    pub fn row_data_mut(&mut self) -> &mut DataSetAttributes<S> {
        &mut self.row_data
    }

    /// Attribute set for an association
    pub fn attributes(&self, association: Association) -> &DataSetAttributes<S> {
        match association {
            Association::Point => &self.point_data,
            Association::Cell => &self.cell_data,
            Association::Field => &self.field_data,
            Association::Row => &self.row_data,
        }
    }

    pub fn attributes_mut(&mut self, association: Association) -> &mut DataSetAttributes<S> {
        match association {
            Association::Point => &mut self.point_data,
            Association::Cell => &mut self.cell_data,
            Association::Field => &mut self.field_data,
            Association::Row => &mut self.row_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_lengths_follow_extent() {
        let dataset = DataSet::new(8, 3);
        assert_eq!(dataset.point_data().valid_array_len(), Some(8));
        assert_eq!(dataset.cell_data().valid_array_len(), Some(3));
        assert_eq!(dataset.field_data().valid_array_len(), None);
        assert_eq!(dataset.row_data().valid_array_len(), None);

        let table = DataSet::table(5);
        assert_eq!(table.row_data().valid_array_len(), Some(5));
    }

    #[test]
    fn test_attribute_sets_share_registry() {
        let dataset = DataSet::new(2, 1);
        for association in Association::all() {
            let attrs = dataset.attributes(association);
            assert_eq!(attrs.association(), association);
            assert!(attrs.bool_arrays().is_shared_with(dataset.bool_arrays()));
        }
    }

    #[test]
    fn test_config_applies_to_all_sets() {
        let mut config = AttributesConfig::default();
        config.texture_coordinates_name = "uv".to_string();
        let dataset: DataSet = DataSet::with_config(MeshExtent::new(1, 1), config).unwrap();
        assert_eq!(dataset.cell_data().config().texture_coordinates_name, "uv");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AttributesConfig::default();
        config.texture_coordinates_name = String::new();
        assert!(DataSet::<MemoryStorage>::with_config(MeshExtent::new(1, 1), config).is_err());
    }
}
