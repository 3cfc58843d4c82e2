//! End-to-end current processing.

use super::fields::discover;
use super::output::{default_output_path, write_points_json};
use super::point::SamplePoint;
use super::sampler::sample_slice;
use super::slice::select_slice;
use crate::config::ProcessOptions;
use crate::data::{Grid, NetcdfGrid};
use crate::error::{OceanGridError, Result};
use std::path::Path;
use tracing::{error, info};

/// Sample the velocity field of a grid without writing anything.
pub fn extract_points(grid: &dyn Grid, options: &ProcessOptions) -> Result<Vec<SamplePoint>> {
    options.validate()?;

    let fields = discover(grid)?;
    info!("Found current variables: {} and {}", fields.eastward, fields.northward);

    let slice = select_slice(grid, &fields, options.time_index, options.depth_index)?;
    sample_slice(&slice, options.stride)
}

/// Sample a grid and write the points to `output`.
///
/// Nothing is written unless sampling succeeds.
pub fn process_grid(
    grid: &dyn Grid,
    output: &Path,
    options: &ProcessOptions,
) -> Result<Vec<SamplePoint>> {
    let points = extract_points(grid, options)?;
    write_points_json(output, &points)?;
    info!("Data saved to {}", output.display());
    Ok(points)
}

/// Open a netCDF file, sample it and write the points as JSON.
///
/// When `output` is `None` the points go to `<input stem>_processed.json`
/// next to the input. The file is closed before this returns, on every
/// path.
pub fn try_process(
    input: &Path,
    output: Option<&Path>,
    options: &ProcessOptions,
) -> Result<Vec<SamplePoint>> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));

    let grid = NetcdfGrid::open(input)?;
    info!("Successfully opened NetCDF file: {}", input.display());
    process_grid(&grid, &output, options)
}

/// Best-effort variant of [`try_process`].
///
/// Failures are logged and yield an empty list. In that case no output
/// file is created or modified.
pub fn process(input: &Path, output: Option<&Path>, options: &ProcessOptions) -> Vec<SamplePoint> {
    match try_process(input, output, options) {
        Ok(points) => points,
        Err(err) => {
            log_failure(&err);
            Vec::new()
        }
    }
}

/// Log a processing failure in the most helpful form for its kind.
pub fn log_failure(err: &OceanGridError) {
    match err {
        OceanGridError::FileNotFound { path } => {
            error!("Error: NetCDF file not found: {}", path.display());
        }
        OceanGridError::MissingVelocityFields { available } => {
            error!("Error: Could not find ocean current velocity variables in the dataset.");
            error!("Available variables: {:?}", available);
        }
        other => {
            error!("Error processing NetCDF file: {}", other);
            let mut source = std::error::Error::source(other);
            while let Some(cause) = source {
                error!("  caused by: {}", cause);
                source = cause.source();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemoryGrid;

    fn surface_grid() -> MemoryGrid {
        MemoryGrid::new()
            .with_coordinate("time", vec![0.0])
            .with_coordinate("lat", vec![0.0, 1.0])
            .with_coordinate("lon", vec![0.0, 1.0])
            .with_variable("uo", &["time", "lat", "lon"], vec![1.0, f64::NAN, 0.0, -1.0])
            .unwrap()
            .with_variable("vo", &["time", "lat", "lon"], vec![0.0, 1.0, 1.0, 0.0])
            .unwrap()
    }

    #[test]
    fn test_extract_points() {
        let points = extract_points(&surface_grid(), &ProcessOptions::with_stride(1)).unwrap();
        assert_eq!(points.len(), 3);
        assert!((points[2].direction_degrees - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_fields_writes_nothing() {
        let grid = MemoryGrid::new()
            .with_coordinate("lat", vec![0.0])
            .with_coordinate("lon", vec![0.0])
            .with_variable("thetao", &["lat", "lon"], vec![15.0])
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.json");

        let err = process_grid(&grid, &output, &ProcessOptions::default()).unwrap_err();
        assert!(matches!(err, OceanGridError::MissingVelocityFields { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_process_missing_input_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.json");
        let points = process(
            &dir.path().join("absent.nc"),
            Some(&output),
            &ProcessOptions::default(),
        );
        assert!(points.is_empty());
        assert!(!output.exists());
    }
}
