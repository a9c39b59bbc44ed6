//! Shared dataset and array builders for integration tests

use implore_attributes::{DataArray, DataSet};
use ndarray::{Array2, Array3};

/// Route `tracing` output through the test harness
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("implore_attributes=debug")
        .with_test_writer()
        .try_init();
}

/// A mesh with `n_points` points and `n_cells` cells
pub fn mesh(n_points: usize, n_cells: usize) -> DataSet {
    init_tracing();
    DataSet::new(n_points, n_cells)
}

/// A table with `n_rows` rows
#[allow(dead_code)]
pub fn table(n_rows: usize) -> DataSet {
    init_tracing();
    DataSet::table(n_rows)
}

/// `(n, components)` array filled with 0, 1, 2, ... in row-major order
pub fn ramp(n: usize, components: usize) -> Array2<f64> {
    Array2::from_shape_fn((n, components), |(i, j)| (i * components + j) as f64)
}

/// `(n, rows, cols)` stack where element `[k, r, c]` is `100k + 10r + c`
pub fn matrix_stack(n: usize, rows: usize, cols: usize) -> Array3<f64> {
    Array3::from_shape_fn((n, rows, cols), |(k, r, c)| (100 * k + 10 * r + c) as f64)
}

/// Numeric contents of an array as `f64`
#[allow(dead_code)]
pub fn values(array: &DataArray) -> Vec<f64> {
    array.to_f64_vec()
}
