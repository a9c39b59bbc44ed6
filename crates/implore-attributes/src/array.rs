//! Array types exchanged with attribute sets
//!
//! - [`DataArray`]: a typed numeric n-dimensional buffer, one variant per
//!   [`ScalarType`], backed by `ndarray::ArcArray` so handing an array to a
//!   container and reading it back never copies the data
//! - [`StringArray`]: the untyped array kind (names, labels)
//! - [`ArrayValue`]: what a container hands back
//! - [`ArrayInput`]: what callers hand in (scalars, lists, arrays, strings)

use ndarray::{ArcArray, Array1, ArrayD, ArrayViewD, IxDyn, ShapeError};
use serde::{Deserialize, Serialize};

use crate::config::MatrixOrder;

/// Element type of a numeric buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum ScalarType {
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
}

impl ScalarType {
    /// Size in bytes of one element
    pub fn byte_size(&self) -> usize {
        match self {
            ScalarType::Bool | ScalarType::Int8 | ScalarType::UInt8 => 1,
            ScalarType::Int16 | ScalarType::UInt16 => 2,
            ScalarType::Int32 | ScalarType::UInt32 | ScalarType::Float32 => 4,
            ScalarType::Int64 | ScalarType::UInt64 | ScalarType::Float64 => 8,
        }
    }

    /// Check if this is an integer type (booleans excluded)
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ScalarType::Int8
                | ScalarType::UInt8
                | ScalarType::Int16
                | ScalarType::UInt16
                | ScalarType::Int32
                | ScalarType::UInt32
                | ScalarType::Int64
                | ScalarType::UInt64
        )
    }

    /// Check if this is a floating point type
    pub fn is_float(&self) -> bool {
        matches!(self, ScalarType::Float32 | ScalarType::Float64)
    }

    /// Short lowercase name, as printed in summaries
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Int8 => "int8",
            ScalarType::UInt8 => "uint8",
            ScalarType::Int16 => "int16",
            ScalarType::UInt16 => "uint16",
            ScalarType::Int32 => "int32",
            ScalarType::UInt32 => "uint32",
            ScalarType::Int64 => "int64",
            ScalarType::UInt64 => "uint64",
            ScalarType::Float32 => "float32",
            ScalarType::Float64 => "float64",
        }
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed numeric array with dynamic dimensionality
///
/// Cloning is cheap: clones share the buffer until one side writes.
#[derive(Debug, Clone, PartialEq)]
pub enum DataArray {
    Bool(ArcArray<bool, IxDyn>),
    Int8(ArcArray<i8, IxDyn>),
    UInt8(ArcArray<u8, IxDyn>),
    Int16(ArcArray<i16, IxDyn>),
    UInt16(ArcArray<u16, IxDyn>),
    Int32(ArcArray<i32, IxDyn>),
    UInt32(ArcArray<u32, IxDyn>),
    Int64(ArcArray<i64, IxDyn>),
    UInt64(ArcArray<u64, IxDyn>),
    Float32(ArcArray<f32, IxDyn>),
    Float64(ArcArray<f64, IxDyn>),
}

macro_rules! with_array {
    ($data:expr, $arr:ident => $body:expr) => {
        match $data {
            DataArray::Bool($arr) => $body,
            DataArray::Int8($arr) => $body,
            DataArray::UInt8($arr) => $body,
            DataArray::Int16($arr) => $body,
            DataArray::UInt16($arr) => $body,
            DataArray::Int32($arr) => $body,
            DataArray::UInt32($arr) => $body,
            DataArray::Int64($arr) => $body,
            DataArray::UInt64($arr) => $body,
            DataArray::Float32($arr) => $body,
            DataArray::Float64($arr) => $body,
        }
    };
}

macro_rules! map_array {
    ($data:expr, $arr:ident => $body:expr) => {
        match $data {
            DataArray::Bool($arr) => DataArray::Bool($body),
            DataArray::Int8($arr) => DataArray::Int8($body),
            DataArray::UInt8($arr) => DataArray::UInt8($body),
            DataArray::Int16($arr) => DataArray::Int16($body),
            DataArray::UInt16($arr) => DataArray::UInt16($body),
            DataArray::Int32($arr) => DataArray::Int32($body),
            DataArray::UInt32($arr) => DataArray::UInt32($body),
            DataArray::Int64($arr) => DataArray::Int64($body),
            DataArray::UInt64($arr) => DataArray::UInt64($body),
            DataArray::Float32($arr) => DataArray::Float32($body),
            DataArray::Float64($arr) => DataArray::Float64($body),
        }
    };
}

/// Element types that can live in a [`DataArray`]
pub trait Element: Clone + Default + PartialEq + std::fmt::Debug + 'static {
    const SCALAR_TYPE: ScalarType;

    /// Wrap a buffer of this element type
    fn wrap(array: ArcArray<Self, IxDyn>) -> DataArray;

    /// Borrow the buffer if `data` holds this element type
    fn unwrap_ref(data: &DataArray) -> Option<&ArcArray<Self, IxDyn>>;
}

macro_rules! impl_element {
    ($t:ty, $variant:ident) => {
        impl Element for $t {
            const SCALAR_TYPE: ScalarType = ScalarType::$variant;

            fn wrap(array: ArcArray<Self, IxDyn>) -> DataArray {
                DataArray::$variant(array)
            }

            fn unwrap_ref(data: &DataArray) -> Option<&ArcArray<Self, IxDyn>> {
                match data {
                    DataArray::$variant(array) => Some(array),
                    _ => None,
                }
            }
        }
    };
}

impl_element!(bool, Bool);
impl_element!(i8, Int8);
impl_element!(u8, UInt8);
impl_element!(i16, Int16);
impl_element!(u16, UInt16);
impl_element!(i32, Int32);
impl_element!(u32, UInt32);
impl_element!(i64, Int64);
impl_element!(u64, UInt64);
impl_element!(f32, Float32);
impl_element!(f64, Float64);

impl DataArray {
    /// Build a rank-1 array from a vector
    pub fn from_vec<T: Element>(data: Vec<T>) -> Self {
        T::wrap(Array1::from_vec(data).into_dyn().into_shared())
    }

    /// Build an array of the given shape from row-major data
    pub fn from_shape_vec<T: Element>(shape: &[usize], data: Vec<T>) -> Result<Self, ShapeError> {
        let array = ArrayD::from_shape_vec(IxDyn(shape), data)?;
        Ok(T::wrap(array.into_shared()))
    }

    /// Build a zero-dimensional array holding one value
    pub fn scalar<T: Element>(value: T) -> Self {
        T::wrap(ArrayD::from_elem(IxDyn(&[]), value).into_shared())
    }

    /// Get the element type
    pub fn dtype(&self) -> ScalarType {
        match self {
            DataArray::Bool(_) => ScalarType::Bool,
            DataArray::Int8(_) => ScalarType::Int8,
            DataArray::UInt8(_) => ScalarType::UInt8,
            DataArray::Int16(_) => ScalarType::Int16,
            DataArray::UInt16(_) => ScalarType::UInt16,
            DataArray::Int32(_) => ScalarType::Int32,
            DataArray::UInt32(_) => ScalarType::UInt32,
            DataArray::Int64(_) => ScalarType::Int64,
            DataArray::UInt64(_) => ScalarType::UInt64,
            DataArray::Float32(_) => ScalarType::Float32,
            DataArray::Float64(_) => ScalarType::Float64,
        }
    }

    pub fn shape(&self) -> &[usize] {
        with_array!(self, a => a.shape())
    }

    /// Element strides, in elements rather than bytes
    pub fn strides(&self) -> &[isize] {
        with_array!(self, a => a.strides())
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Length along the first axis, 1 for zero-dimensional arrays
    pub fn len(&self) -> usize {
        self.shape().first().copied().unwrap_or(1)
    }

    /// Check if the array holds no elements
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Total number of elements
    pub fn size(&self) -> usize {
        with_array!(self, a => a.len())
    }

    /// Check if the array is zero-dimensional
    pub fn is_scalar(&self) -> bool {
        self.ndim() == 0
    }

    /// Number of components per tuple (product of all trailing axes)
    pub fn n_components(&self) -> usize {
        if self.ndim() <= 1 {
            1
        } else {
            self.shape()[1..].iter().product()
        }
    }

    /// Check if the buffer is contiguous and row-major
    pub fn is_standard_layout(&self) -> bool {
        with_array!(self, a => a.is_standard_layout())
    }

    /// Borrow the typed buffer, if the element type matches
    pub fn as_array<T: Element>(&self) -> Option<&ArcArray<T, IxDyn>> {
        T::unwrap_ref(self)
    }

    /// View the typed buffer, if the element type matches
    pub fn view<T: Element>(&self) -> Option<ArrayViewD<'_, T>> {
        T::unwrap_ref(self).map(|a| a.view())
    }

    /// Copy the elements out in logical (row-major) order
    pub fn to_vec<T: Element>(&self) -> Option<Vec<T>> {
        T::unwrap_ref(self).map(|a| a.iter().cloned().collect())
    }

    /// Convert every element to `f64` in logical order
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            DataArray::Bool(a) => a.iter().map(|&v| if v { 1.0 } else { 0.0 }).collect(),
            DataArray::Int8(a) => a.iter().map(|&v| v as f64).collect(),
            DataArray::UInt8(a) => a.iter().map(|&v| v as f64).collect(),
            DataArray::Int16(a) => a.iter().map(|&v| v as f64).collect(),
            DataArray::UInt16(a) => a.iter().map(|&v| v as f64).collect(),
            DataArray::Int32(a) => a.iter().map(|&v| v as f64).collect(),
            DataArray::UInt32(a) => a.iter().map(|&v| v as f64).collect(),
            DataArray::Int64(a) => a.iter().map(|&v| v as f64).collect(),
            DataArray::UInt64(a) => a.iter().map(|&v| v as f64).collect(),
            DataArray::Float32(a) => a.iter().map(|&v| v as f64).collect(),
            DataArray::Float64(a) => a.iter().copied().collect(),
        }
    }

    /// Copy into a freshly allocated buffer that shares nothing with `self`
    pub fn deep_copy(&self) -> Self {
        map_array!(self, a => a.to_owned().into_shared())
    }

    /// Store booleans as `u8` (0/1); other element types pass through
    pub fn bool_to_u8(self) -> Self {
        match self {
            DataArray::Bool(a) => DataArray::UInt8(a.mapv(u8::from).into_shared()),
            other => other,
        }
    }

    /// Read a `u8` buffer back as booleans
    ///
    /// Returns `None` for element types other than `u8` and `bool`.
    pub fn to_bool(&self) -> Option<Self> {
        match self {
            DataArray::UInt8(a) => Some(DataArray::Bool(a.mapv(|v| v != 0).into_shared())),
            DataArray::Bool(_) => Some(self.clone()),
            _ => None,
        }
    }

    /// Fill a rank-1 buffer of `len` elements with the first value of `self`
    pub(crate) fn broadcast_scalar(self, len: usize) -> Self {
        map_array!(self, a => {
            let value = a.iter().next().cloned().unwrap_or_default();
            ArrayD::from_elem(IxDyn(&[len]), value).into_shared()
        })
    }

    /// Flatten an `(N, rows, cols)` stack of matrices to `(N, rows * cols)`
    ///
    /// With [`MatrixOrder::ColumnMajor`], row-major matrices and non-contiguous
    /// column-major views get axes 1 and 2 swapped first, so the components of
    /// each matrix end up in column-major order. A column-major view then
    /// flattens without a copy.
    pub(crate) fn flatten_matrices(self, order: MatrixOrder) -> Result<Self, ShapeError> {
        Ok(map_array!(self, a => flatten_matrix_stack(a, order)?))
    }

    /// Force contiguous row-major storage, copying only when needed
    pub(crate) fn into_standard_layout(self) -> Self {
        map_array!(self, a => standard_layout(a))
    }

    pub(crate) fn from_scalars(items: &[Scalar]) -> Self {
        if items.is_empty() {
            return DataArray::from_vec(Vec::<f64>::new());
        }
        if items.iter().all(|s| matches!(s, Scalar::Bool(_))) {
            let values = items.iter().map(|s| s.as_f64() != 0.0).collect::<Vec<bool>>();
            DataArray::from_vec(values)
        } else if items.iter().all(|s| !matches!(s, Scalar::Float(_))) {
            DataArray::from_vec(items.iter().map(Scalar::as_i64).collect::<Vec<i64>>())
        } else {
            DataArray::from_vec(items.iter().map(Scalar::as_f64).collect::<Vec<f64>>())
        }
    }
}

fn standard_layout<T: Clone>(array: ArcArray<T, IxDyn>) -> ArcArray<T, IxDyn> {
    if array.is_standard_layout() {
        array
    } else {
        array.as_standard_layout().into_owned().into_shared()
    }
}

/// Row-major matrices, or a column-major view that is not already contiguous
fn needs_transpose(strides: &[isize], rows: usize, cols: usize, standard: bool) -> bool {
    let (row_stride, col_stride) = (strides[1], strides[2]);
    let row_major = row_stride == cols as isize && col_stride == 1;
    let column_major_view = row_stride == 1 && col_stride == rows as isize && !standard;
    row_major || column_major_view
}

fn flatten_matrix_stack<T: Clone>(
    mut array: ArcArray<T, IxDyn>,
    order: MatrixOrder,
) -> Result<ArcArray<T, IxDyn>, ShapeError> {
    let shape = array.shape().to_vec();
    if shape.len() != 3 {
        return Ok(array);
    }
    let (count, rows, cols) = (shape[0], shape[1], shape[2]);

    if order == MatrixOrder::ColumnMajor
        && needs_transpose(array.strides(), rows, cols, array.is_standard_layout())
    {
        array.swap_axes(1, 2);
    }

    let owned = if array.is_standard_layout() {
        array.into_owned()
    } else {
        array.as_standard_layout().into_owned()
    };
    Ok(owned.into_shape_with_order(vec![count, rows * cols])?.into_shared())
}

impl<T: Element> From<ArrayD<T>> for DataArray {
    fn from(array: ArrayD<T>) -> Self {
        T::wrap(array.into_shared())
    }
}

impl<T: Element> From<ArcArray<T, IxDyn>> for DataArray {
    fn from(array: ArcArray<T, IxDyn>) -> Self {
        T::wrap(array)
    }
}

impl<T: Element> From<Vec<T>> for DataArray {
    fn from(data: Vec<T>) -> Self {
        DataArray::from_vec(data)
    }
}

/// A single scalar value supplied by a caller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl Scalar {
    pub fn as_f64(&self) -> f64 {
        match self {
            Scalar::Bool(v) => {
                if *v {
                    1.0
                } else {
                    0.0
                }
            }
            Scalar::Int(v) => *v as f64,
            Scalar::Float(v) => *v,
        }
    }

    pub fn as_i64(&self) -> i64 {
        match self {
            Scalar::Bool(v) => i64::from(*v),
            Scalar::Int(v) => *v,
            Scalar::Float(v) => *v as i64,
        }
    }

    /// Zero-dimensional array holding this value
    pub fn to_array(&self) -> DataArray {
        match self {
            Scalar::Bool(v) => DataArray::scalar(*v),
            Scalar::Int(v) => DataArray::scalar(*v),
            Scalar::Float(v) => DataArray::scalar(*v),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::Float(v as f64)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

/// An untyped array of strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringArray {
    values: Vec<String>,
}

impl StringArray {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An array as held by a container
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValue {
    Numeric(DataArray),
    Strings(StringArray),
}

impl ArrayValue {
    pub fn as_numeric(&self) -> Option<&DataArray> {
        match self {
            ArrayValue::Numeric(array) => Some(array),
            ArrayValue::Strings(_) => None,
        }
    }

    pub fn into_numeric(self) -> Option<DataArray> {
        match self {
            ArrayValue::Numeric(array) => Some(array),
            ArrayValue::Strings(_) => None,
        }
    }

    pub fn as_strings(&self) -> Option<&StringArray> {
        match self {
            ArrayValue::Strings(array) => Some(array),
            ArrayValue::Numeric(_) => None,
        }
    }

    /// Element type, `None` for string arrays
    pub fn dtype(&self) -> Option<ScalarType> {
        self.as_numeric().map(DataArray::dtype)
    }

    /// Length along the first axis
    pub fn len(&self) -> usize {
        match self {
            ArrayValue::Numeric(array) => array.len(),
            ArrayValue::Strings(array) => array.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ArrayValue::Numeric(array) => array.is_empty(),
            ArrayValue::Strings(array) => array.is_empty(),
        }
    }

    pub fn deep_copy(&self) -> Self {
        match self {
            ArrayValue::Numeric(array) => ArrayValue::Numeric(array.deep_copy()),
            ArrayValue::Strings(array) => ArrayValue::Strings(array.clone()),
        }
    }
}

impl From<DataArray> for ArrayValue {
    fn from(array: DataArray) -> Self {
        ArrayValue::Numeric(array)
    }
}

impl From<StringArray> for ArrayValue {
    fn from(array: StringArray) -> Self {
        ArrayValue::Strings(array)
    }
}

/// A value handed to [`DataSetAttributes::append`](crate::DataSetAttributes::append)
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayInput {
    /// No value; always rejected
    Null,
    Scalar(Scalar),
    /// A plain list, converted to a rank-1 array
    List(Vec<Scalar>),
    Array(DataArray),
    Strings(Vec<String>),
}

impl ArrayInput {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ArrayInput::Null => "null",
            ArrayInput::Scalar(_) => "scalar",
            ArrayInput::List(_) => "list",
            ArrayInput::Array(_) => "array",
            ArrayInput::Strings(_) => "string list",
        }
    }
}

macro_rules! impl_scalar_input {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ArrayInput {
                fn from(v: $t) -> Self {
                    ArrayInput::Scalar(Scalar::from(v))
                }
            }

            impl From<Vec<$t>> for ArrayInput {
                fn from(v: Vec<$t>) -> Self {
                    ArrayInput::List(v.into_iter().map(Scalar::from).collect())
                }
            }
        )*
    };
}

impl_scalar_input!(bool, i32, i64, u32, f32, f64);

impl From<Scalar> for ArrayInput {
    fn from(v: Scalar) -> Self {
        ArrayInput::Scalar(v)
    }
}

impl From<Vec<Scalar>> for ArrayInput {
    fn from(v: Vec<Scalar>) -> Self {
        ArrayInput::List(v)
    }
}

impl From<DataArray> for ArrayInput {
    fn from(array: DataArray) -> Self {
        ArrayInput::Array(array)
    }
}

impl<T: Element, D: ndarray::Dimension> From<ndarray::Array<T, D>> for ArrayInput {
    fn from(array: ndarray::Array<T, D>) -> Self {
        ArrayInput::Array(T::wrap(array.into_dyn().into_shared()))
    }
}

impl<T: Element, D: ndarray::Dimension> From<ArcArray<T, D>> for ArrayInput {
    fn from(array: ArcArray<T, D>) -> Self {
        ArrayInput::Array(T::wrap(array.into_dyn()))
    }
}

impl From<Vec<String>> for ArrayInput {
    fn from(v: Vec<String>) -> Self {
        ArrayInput::Strings(v)
    }
}

impl From<Vec<&str>> for ArrayInput {
    fn from(v: Vec<&str>) -> Self {
        ArrayInput::Strings(v.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<ArrayInput>> From<Option<T>> for ArrayInput {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => ArrayInput::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_scalar_type_properties() {
        assert!(ScalarType::Int32.is_integer());
        assert!(!ScalarType::Bool.is_integer());
        assert!(ScalarType::Float32.is_float());
        assert_eq!(ScalarType::Float64.byte_size(), 8);
        assert_eq!(ScalarType::UInt8.to_string(), "uint8");
    }

    #[test]
    fn test_shape_and_components() {
        let array = DataArray::from_shape_vec(&[4, 3], vec![0.0f64; 12]).unwrap();
        assert_eq!(array.len(), 4);
        assert_eq!(array.n_components(), 3);
        assert_eq!(array.dtype(), ScalarType::Float64);

        let scalar = DataArray::scalar(2.5f32);
        assert!(scalar.is_scalar());
        assert_eq!(scalar.len(), 1);
        assert_eq!(scalar.n_components(), 1);
    }

    #[test]
    fn test_bool_packing() {
        let array = DataArray::from_vec(vec![true, false, true]);
        let packed = array.clone().bool_to_u8();
        assert_eq!(packed.to_vec::<u8>().unwrap(), vec![1, 0, 1]);
        assert_eq!(packed.to_bool().unwrap(), array);
        assert!(DataArray::from_vec(vec![1.0f64]).to_bool().is_none());
    }

    #[test]
    fn test_broadcast_scalar() {
        let filled = DataArray::scalar(7i64).broadcast_scalar(3);
        assert_eq!(filled.shape(), &[3]);
        assert_eq!(filled.to_vec::<i64>().unwrap(), vec![7, 7, 7]);
    }

    #[test]
    fn test_flatten_row_major_matrices() {
        // Two 2x2 matrices [[1, 2], [3, 4]] and [[5, 6], [7, 8]]
        let data: Vec<f64> = (1..=8).map(|v| v as f64).collect();
        let array = DataArray::from_shape_vec(&[2, 2, 2], data).unwrap();

        let flat = array.flatten_matrices(MatrixOrder::ColumnMajor).unwrap();
        assert_eq!(flat.shape(), &[2, 4]);
        assert_eq!(
            flat.to_vec::<f64>().unwrap(),
            vec![1.0, 3.0, 2.0, 4.0, 5.0, 7.0, 6.0, 8.0]
        );
    }

    #[test]
    fn test_flatten_row_major_order_keeps_rows() {
        let data: Vec<f64> = (1..=8).map(|v| v as f64).collect();
        let array = DataArray::from_shape_vec(&[2, 2, 2], data.clone()).unwrap();

        let flat = array.flatten_matrices(MatrixOrder::RowMajor).unwrap();
        assert_eq!(flat.to_vec::<f64>().unwrap(), data);
    }

    #[test]
    fn test_flatten_column_major_view_matches_row_major_input() {
        let data: Vec<f64> = (1..=8).map(|v| v as f64).collect();
        let row_major = Array3::from_shape_vec((2, 2, 2), data).unwrap();

        // Same logical matrices, each stored column-major
        let column_major = row_major
            .clone()
            .permuted_axes([0, 2, 1])
            .as_standard_layout()
            .into_owned()
            .permuted_axes([0, 2, 1]);
        assert_eq!(column_major, row_major);
        assert_eq!(column_major.strides(), &[4, 1, 2]);

        let from_rows = DataArray::from(row_major.into_dyn())
            .flatten_matrices(MatrixOrder::ColumnMajor)
            .unwrap();
        let from_columns = DataArray::from(column_major.into_dyn())
            .flatten_matrices(MatrixOrder::ColumnMajor)
            .unwrap();
        assert_eq!(from_rows, from_columns);
    }

    #[test]
    fn test_standard_layout_fixup() {
        let array = ndarray::Array2::from_shape_vec((2, 3), vec![1i32, 2, 3, 4, 5, 6])
            .unwrap()
            .reversed_axes();
        let data = DataArray::from(array.into_dyn());
        assert!(!data.is_standard_layout());

        let fixed = data.into_standard_layout();
        assert!(fixed.is_standard_layout());
        assert_eq!(fixed.to_vec::<i32>().unwrap(), vec![1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn test_deep_copy_detaches() {
        let original = DataArray::from_vec(vec![1.0f64, 2.0]);
        let mut copy = original.deep_copy();
        if let DataArray::Float64(a) = &mut copy {
            if let Some(first) = a.iter_mut().next() {
                *first = 10.0;
            }
        }
        assert_eq!(original.to_vec::<f64>().unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_list_conversion() {
        let bools = DataArray::from_scalars(&[Scalar::Bool(true), Scalar::Bool(false)]);
        assert_eq!(bools.dtype(), ScalarType::Bool);

        let ints = DataArray::from_scalars(&[Scalar::Int(1), Scalar::Bool(true)]);
        assert_eq!(ints.to_vec::<i64>().unwrap(), vec![1, 1]);

        let floats = DataArray::from_scalars(&[Scalar::Int(1), Scalar::Float(0.5)]);
        assert_eq!(floats.to_vec::<f64>().unwrap(), vec![1.0, 0.5]);
    }

    #[test]
    fn test_input_conversions() {
        assert_eq!(ArrayInput::from(None::<f64>), ArrayInput::Null);
        assert_eq!(ArrayInput::from(3i32), ArrayInput::Scalar(Scalar::Int(3)));
        assert!(matches!(ArrayInput::from(vec![1.0, 2.0]), ArrayInput::List(_)));
        assert!(matches!(ArrayInput::from(vec!["a", "b"]), ArrayInput::Strings(_)));
        assert!(matches!(
            ArrayInput::from(ndarray::arr2(&[[1.0f32, 2.0]])),
            ArrayInput::Array(DataArray::Float32(_))
        ));
    }
}
