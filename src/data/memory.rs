//! In-memory grid.

use super::{Dimension, Grid, Selection, VariableInfo};
use crate::error::{OceanGridError, Result};
use ndarray::{Array1, ArrayD, Axis, IxDyn};

/// Grid held entirely in memory.
///
/// Useful for synthetic data and for tests that should not touch the
/// filesystem.
///
/// ```
/// use oceangrid::data::{Grid, MemoryGrid};
///
/// let grid = MemoryGrid::new()
///     .with_coordinate("lat", vec![0.0, 1.0])
///     .with_coordinate("lon", vec![10.0, 11.0, 12.0])
///     .with_variable("uo", &["lat", "lon"], vec![0.1; 6])
///     .unwrap();
/// assert_eq!(grid.coordinate("lon").unwrap(), vec![10.0, 11.0, 12.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryGrid {
    dimensions: Vec<Dimension>,
    variables: Vec<(VariableInfo, ArrayD<f64>)>,
    attributes: Vec<(String, String)>,
}

impl MemoryGrid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dimension together with its coordinate variable.
    pub fn with_coordinate(mut self, name: &str, values: Vec<f64>) -> Self {
        let len = values.len();
        self.upsert_dimension(name, len);
        let info = VariableInfo {
            name: name.to_string(),
            dim_names: vec![name.to_string()],
            shape: vec![len],
            dtype: "float64".to_string(),
            attributes: Vec::new(),
        };
        self.push_variable(Array1::from(values).into_dyn(), info);
        self
    }

    /// Add a dimension without a coordinate variable.
    pub fn with_dimension(mut self, name: &str, len: usize) -> Self {
        self.upsert_dimension(name, len);
        self
    }

    /// Add a data variable over existing dimensions, in row-major order.
    pub fn with_variable(mut self, name: &str, dims: &[&str], values: Vec<f64>) -> Result<Self> {
        let shape = dims
            .iter()
            .map(|d| {
                self.dimensions
                    .iter()
                    .find(|dim| dim.name == *d)
                    .map(|dim| dim.len)
                    .ok_or_else(|| OceanGridError::InvalidConfig(format!("unknown dimension '{}'", d)))
            })
            .collect::<Result<Vec<usize>>>()?;

        let data = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|e| {
            OceanGridError::InvalidConfig(format!("variable '{}' does not fit its shape: {}", name, e))
        })?;

        let info = VariableInfo {
            name: name.to_string(),
            dim_names: dims.iter().map(|d| d.to_string()).collect(),
            shape,
            dtype: "float64".to_string(),
            attributes: Vec::new(),
        };
        self.push_variable(data, info);
        Ok(self)
    }

    /// Attach an attribute to an existing variable.
    pub fn with_variable_attribute(mut self, var: &str, key: &str, value: &str) -> Self {
        if let Some((info, _)) = self.variables.iter_mut().find(|(info, _)| info.name == var) {
            info.attributes.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Override the element type reported for a variable.
    pub fn with_dtype(mut self, var: &str, dtype: &str) -> Self {
        if let Some((info, _)) = self.variables.iter_mut().find(|(info, _)| info.name == var) {
            info.dtype = dtype.to_string();
        }
        self
    }

    /// Add a global attribute.
    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.push((key.to_string(), value.to_string()));
        self
    }

    fn upsert_dimension(&mut self, name: &str, len: usize) {
        match self.dimensions.iter_mut().find(|d| d.name == name) {
            Some(dim) => dim.len = len,
            None => self.dimensions.push(Dimension::new(name, len)),
        }
    }

    fn push_variable(&mut self, data: ArrayD<f64>, info: VariableInfo) {
        self.variables.retain(|(existing, _)| existing.name != info.name);
        self.variables.push((info, data));
    }
}

impl Grid for MemoryGrid {
    fn dimensions(&self) -> Vec<Dimension> {
        self.dimensions.clone()
    }

    fn variables(&self) -> Vec<VariableInfo> {
        self.variables.iter().map(|(info, _)| info.clone()).collect()
    }

    fn global_attributes(&self) -> Vec<(String, String)> {
        self.attributes.clone()
    }

    fn read(&self, name: &str, selection: &[Selection]) -> Result<ArrayD<f64>> {
        let (info, data) = self
            .variables
            .iter()
            .find(|(info, _)| info.name == name)
            .ok_or_else(|| OceanGridError::variable_not_found(name))?;

        if selection.len() != info.ndim() {
            return Err(OceanGridError::InvalidSlice(format!(
                "'{}' has {} dimensions but {} selections were given",
                name,
                info.ndim(),
                selection.len()
            )));
        }

        let mut view = data.view();
        // Innermost first so earlier axis numbers stay valid.
        for (axis, sel) in selection.iter().enumerate().rev() {
            sel.check(&info.dim_names[axis], info.shape[axis])?;
            if let Selection::Index(i) = *sel {
                view = view.index_axis_move(Axis(axis), i);
            }
        }
        Ok(view.to_owned())
    }
}
