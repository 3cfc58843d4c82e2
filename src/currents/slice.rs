//! Selection of a single (latitude × longitude) layer.

use super::fields::VelocityFields;
use super::roles::{resolve_roles, CoordinateRole, RoleMap};
use crate::data::{format_time_value, Grid, Selection, VariableInfo};
use crate::error::{OceanGridError, Result};
use ndarray::{Array2, ArrayD, Ix2};
use tracing::{debug, info, warn};

/// Two velocity components on a shared latitude × longitude layer.
#[derive(Debug, Clone)]
pub struct VelocitySlice {
    /// Eastward component, indexed `[lat, lon]`.
    pub u: Array2<f64>,
    /// Northward component, indexed `[lat, lon]`.
    pub v: Array2<f64>,
    /// Latitude coordinate values.
    pub latitudes: Vec<f64>,
    /// Longitude coordinate values.
    pub longitudes: Vec<f64>,
    /// Roles resolved for the eastward variable's dimensions.
    pub roles: RoleMap,
    /// Time index used, if the field has a time dimension.
    pub time_index: Option<usize>,
    /// Depth index used, if the field has a depth dimension.
    pub depth_index: Option<usize>,
}

/// Depth index to use for a dimension of `len` layers.
///
/// Out-of-range requests fall back to the first layer.
pub fn resolve_depth_index(requested: usize, len: usize) -> usize {
    if requested < len {
        requested
    } else {
        0
    }
}

/// Resolve roles for the dimensions of a variable that have coordinate values.
pub fn variable_roles(grid: &dyn Grid, info: &VariableInfo) -> RoleMap {
    let coord_dims: Vec<&str> = info
        .dim_names
        .iter()
        .map(String::as_str)
        .filter(|d| grid.has_coordinate(d))
        .collect();
    resolve_roles(&coord_dims)
}

/// Select one time step and one depth layer of both velocity components.
pub fn select_slice(
    grid: &dyn Grid,
    fields: &VelocityFields,
    time_index: usize,
    depth_index: usize,
) -> Result<VelocitySlice> {
    let u_info = grid
        .variable(&fields.eastward)
        .ok_or_else(|| OceanGridError::variable_not_found(&fields.eastward))?;
    let v_info = grid
        .variable(&fields.northward)
        .ok_or_else(|| OceanGridError::variable_not_found(&fields.northward))?;

    let roles = variable_roles(grid, &u_info);
    info!("Identified coordinates: {}", roles);

    let lat_dim = roles.require(CoordinateRole::Latitude)?.to_string();
    let lon_dim = roles.require(CoordinateRole::Longitude)?.to_string();

    let time_index = match roles.get(CoordinateRole::Time) {
        Some(dim) => {
            let times = grid.coordinate(dim)?;
            let value = times.get(time_index).copied().ok_or_else(|| {
                OceanGridError::InvalidSlice(format!(
                    "time index {} out of range for '{}' of length {}",
                    time_index,
                    dim,
                    times.len()
                ))
            })?;
            let units = grid
                .variable(dim)
                .and_then(|v| v.attribute("units").map(str::to_string));
            info!(
                "Processing data for time: {}",
                format_time_value(value, units.as_deref())
            );
            Some(time_index)
        }
        None => None,
    };

    let depth_index = match roles.get(CoordinateRole::Depth) {
        Some(dim) => {
            let depths = grid.coordinate(dim)?;
            let index = resolve_depth_index(depth_index, depths.len());
            if index == depth_index {
                if let Some(depth) = depths.get(index) {
                    info!("Processing depth layer: {} meters (index: {})", depth, index);
                }
            } else {
                warn!(
                    "Requested depth layer index {} is out of range. Using index 0 instead.",
                    depth_index
                );
            }
            Some(index)
        }
        None => None,
    };

    let u = read_layer(grid, &u_info, &roles, time_index, depth_index, &lat_dim, &lon_dim)?;
    let v = read_layer(grid, &v_info, &roles, time_index, depth_index, &lat_dim, &lon_dim)?;
    if u.dim() != v.dim() {
        return Err(OceanGridError::InvalidSlice(format!(
            "component shapes differ: {:?} vs {:?}",
            u.dim(),
            v.dim()
        )));
    }

    Ok(VelocitySlice {
        u,
        v,
        latitudes: grid.coordinate(&lat_dim)?,
        longitudes: grid.coordinate(&lon_dim)?,
        roles,
        time_index,
        depth_index,
    })
}

/// Read one variable with time and depth fixed, as a `[lat, lon]` array.
fn read_layer(
    grid: &dyn Grid,
    info: &VariableInfo,
    roles: &RoleMap,
    time_index: Option<usize>,
    depth_index: Option<usize>,
    lat_dim: &str,
    lon_dim: &str,
) -> Result<Array2<f64>> {
    let mut kept = Vec::new();
    let selection: Vec<Selection> = info
        .dim_names
        .iter()
        .map(|dim| match (roles.role_of(dim), time_index, depth_index) {
            (Some(CoordinateRole::Time), Some(t), _) => Selection::Index(t),
            (Some(CoordinateRole::Depth), _, Some(d)) => Selection::Index(d),
            _ => {
                kept.push(dim.as_str());
                Selection::All
            }
        })
        .collect();
    debug!("Selecting {:?} from '{}'", selection, info.name);

    let data = grid.read(&info.name, &selection)?;
    to_lat_lon(data, &kept, lat_dim, lon_dim, &info.name)
}

/// Reorder a sliced array to `[lat, lon]`; any other layout is rejected.
fn to_lat_lon(
    data: ArrayD<f64>,
    kept: &[&str],
    lat_dim: &str,
    lon_dim: &str,
    name: &str,
) -> Result<Array2<f64>> {
    let transpose = match kept {
        [a, b] if *a == lat_dim && *b == lon_dim => false,
        [a, b] if *a == lon_dim && *b == lat_dim => true,
        _ => {
            return Err(OceanGridError::InvalidSlice(format!(
                "'{}' must be 2-D ({}, {}) after slicing, got ({})",
                name,
                lat_dim,
                lon_dim,
                kept.join(", ")
            )))
        }
    };

    let layer = data
        .into_dimensionality::<Ix2>()
        .map_err(|e| OceanGridError::InvalidSlice(format!("'{}': {}", name, e)))?;
    Ok(if transpose {
        layer.reversed_axes()
    } else {
        layer
    })
}
