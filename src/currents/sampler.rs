//! Strided grid sampling.

use super::point::{in_valid_range, SamplePoint};
use super::slice::VelocitySlice;
use crate::error::{OceanGridError, Result};
use ndarray::ArrayView2;
use tracing::{info, warn};

/// Number of indices visited when stepping through `len` entries by `stride`.
pub fn sampled_len(len: usize, stride: usize) -> usize {
    if stride == 0 {
        0
    } else {
        len.div_ceil(stride)
    }
}

/// Sample every `stride`-th row and column of a velocity layer.
///
/// `u` and `v` are indexed `[lat, lon]`. Cells with a non-finite component
/// or speed, or a location outside the valid latitude/longitude range, are
/// skipped, as are
/// cells the arrays cannot address (logged with their indices). Points are
/// returned in row-major order.
pub fn sample_points(
    u: ArrayView2<'_, f64>,
    v: ArrayView2<'_, f64>,
    latitudes: &[f64],
    longitudes: &[f64],
    stride: usize,
) -> Result<Vec<SamplePoint>> {
    if stride == 0 {
        return Err(OceanGridError::InvalidConfig(
            "sample stride must be at least 1".to_string(),
        ));
    }

    info!(
        "Processing {}x{} points from original {}x{} grid",
        sampled_len(latitudes.len(), stride),
        sampled_len(longitudes.len(), stride),
        latitudes.len(),
        longitudes.len()
    );

    let mut points = Vec::new();
    for i in (0..latitudes.len()).step_by(stride) {
        for j in (0..longitudes.len()).step_by(stride) {
            let (u_val, v_val) = match (u.get((i, j)), v.get((i, j))) {
                (Some(&u_val), Some(&v_val)) => (u_val, v_val),
                _ => {
                    warn!(
                        "Error processing point ({},{}): outside component array of shape {:?}",
                        i,
                        j,
                        u.dim()
                    );
                    continue;
                }
            };

            if !u_val.is_finite() || !v_val.is_finite() {
                continue;
            }

            let (lat, lon) = (latitudes[i], longitudes[j]);
            if !in_valid_range(lat, lon) {
                continue;
            }

            let point = SamplePoint::new(lat, lon, u_val, v_val);
            // JSON has no representation for an overflowed magnitude
            if !point.speed.is_finite() {
                continue;
            }
            points.push(point);
        }
    }

    info!("Processed {} data points", points.len());
    Ok(points)
}

/// Sample a selected velocity layer.
pub fn sample_slice(slice: &VelocitySlice, stride: usize) -> Result<Vec<SamplePoint>> {
    sample_points(
        slice.u.view(),
        slice.v.view(),
        &slice.latitudes,
        &slice.longitudes,
        stride,
    )
}
