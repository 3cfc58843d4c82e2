//! Grid abstraction shared by every data source.

use crate::error::{OceanGridError, Result};
use ndarray::ArrayD;

/// A named dimension of a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    /// Dimension name.
    pub name: String,
    /// Number of entries along the dimension.
    pub len: usize,
}

impl Dimension {
    /// Create a new dimension.
    pub fn new(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            len,
        }
    }
}

/// Descriptor of a variable (field) stored in a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableInfo {
    /// Variable name.
    pub name: String,
    /// Dimension names, outermost first.
    pub dim_names: Vec<String>,
    /// Length of each dimension.
    pub shape: Vec<usize>,
    /// Element type (`float32`, `int16`, `string`, ...).
    pub dtype: String,
    /// Attributes in declaration order, rendered as text.
    pub attributes: Vec<(String, String)>,
}

impl VariableInfo {
    /// Look up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the element type is integer or floating point.
    pub fn is_numeric(&self) -> bool {
        self.dtype.starts_with("int")
            || self.dtype.starts_with("uint")
            || self.dtype.starts_with("float")
    }

    /// Whether this is a 1-D coordinate variable (named after its only dimension).
    pub fn is_coordinate(&self) -> bool {
        self.dim_names.len() == 1 && self.dim_names[0] == self.name
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.dim_names.len()
    }
}

/// How one dimension is selected when reading a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Keep the whole dimension.
    All,
    /// Fix the dimension to a single index; it is dropped from the result.
    Index(usize),
}

impl Selection {
    /// Check the selection against a dimension length.
    pub(crate) fn check(self, dim_name: &str, len: usize) -> Result<()> {
        match self {
            Selection::Index(i) if i >= len => Err(OceanGridError::InvalidSlice(format!(
                "index {} out of bounds for dimension '{}' of length {}",
                i, dim_name, len
            ))),
            _ => Ok(()),
        }
    }
}

/// Read-only view of a labeled multi-dimensional dataset.
///
/// Implementations own whatever resource backs the data; dropping the value
/// releases it.
pub trait Grid {
    /// All dimensions in declaration order.
    fn dimensions(&self) -> Vec<Dimension>;

    /// All variables in declaration order.
    fn variables(&self) -> Vec<VariableInfo>;

    /// Global attributes in declaration order.
    fn global_attributes(&self) -> Vec<(String, String)>;

    /// Read a variable as `f64`, with one [`Selection`] per dimension.
    ///
    /// Dimensions selected with [`Selection::Index`] are removed from the
    /// returned array. Fill values are returned as NaN and CF packing
    /// (`scale_factor`, `add_offset`) is already applied.
    fn read(&self, name: &str, selection: &[Selection]) -> Result<ArrayD<f64>>;

    /// Descriptor of a single variable.
    fn variable(&self, name: &str) -> Option<VariableInfo> {
        self.variables().into_iter().find(|v| v.name == name)
    }

    /// Names of all variables.
    fn variable_names(&self) -> Vec<String> {
        self.variables().into_iter().map(|v| v.name).collect()
    }

    /// Whether `dim` has a 1-D coordinate variable.
    fn has_coordinate(&self, dim: &str) -> bool {
        self.variable(dim).is_some_and(|v| v.is_coordinate())
    }

    /// Read the coordinate values of a dimension.
    fn coordinate(&self, dim: &str) -> Result<Vec<f64>> {
        let info = self
            .variable(dim)
            .filter(VariableInfo::is_coordinate)
            .ok_or_else(|| OceanGridError::variable_not_found(dim))?;
        let values = self.read(&info.name, &[Selection::All])?;
        Ok(values.iter().copied().collect())
    }

    /// Read a whole variable.
    fn read_all(&self, name: &str) -> Result<ArrayD<f64>> {
        let info = self
            .variable(name)
            .ok_or_else(|| OceanGridError::variable_not_found(name))?;
        self.read(name, &vec![Selection::All; info.ndim()])
    }
}
