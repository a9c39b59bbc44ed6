//! implore-attributes - Dataset attribute containers
//!
//! This crate exposes the arrays attached to a dataset (point data, cell
//! data, field data and row data) through a dictionary-like interface.
//!
//! # Key Components
//!
//! - **DataSetAttributes**: named arrays of one association, with get/set,
//!   append, remove/pop, active scalars/vectors/normals and texture coordinates
//! - **ArrayStorage**: the container an attribute set wraps, with an
//!   in-memory implementation (`MemoryStorage`)
//! - **DataSet**: owns one attribute set per association, sharing point and
//!   cell counts and the boolean array registry
//! - **DataArray**: typed n-dimensional numeric arrays backed by `ndarray`
//!
//! # Example
//!
//! ```rust
//! use implore_attributes::DataSet;
//!
//! let mut mesh = DataSet::new(4, 1);
//! mesh.point_data_mut().set("temp", 5.0).unwrap();
//!
//! let temp = mesh.point_data().get("temp").unwrap().into_numeric().unwrap();
//! assert_eq!(temp.to_vec::<f64>().unwrap(), vec![5.0; 4]);
//! ```
//!
//! # Threading
//!
//! Attribute sets of one dataset share state through `Rc`, so none of the
//! types here are `Send`. Callers that need cross-thread access must wrap the
//! whole dataset themselves.

pub mod array;
pub mod association;
pub mod attributes;
pub mod config;
pub mod dataset;
pub mod error;
pub mod registry;
pub mod storage;

pub use array::{ArrayInput, ArrayValue, DataArray, Element, Scalar, ScalarType, StringArray};
pub use association::{ArrayKey, Association};
pub use attributes::{DataSetAttributes, Names};
pub use config::{AttributesConfig, MatrixOrder, DEFAULT_TEXTURE_COORDINATES_NAME};
pub use dataset::{DataSet, DataSetExtent, MeshExtent};
pub use error::{AttributeError, AttributeResult};
pub use registry::BoolArrayRegistry;
pub use storage::{ActiveAttribute, ArrayStorage, MemoryStorage};

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
