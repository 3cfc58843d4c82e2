//! End-to-end processing of small netCDF files written on the fly.

use oceangrid::config::ProcessOptions;
use oceangrid::currents::{read_points_json, try_process};
use oceangrid::data::{Grid, NetcdfGrid, Selection};
use oceangrid::report::analyze_file;
use oceangrid::OceanGridError;
use std::path::Path;

const FILL: f32 = -999.0;
const NLAT: usize = 4;
const NLON: usize = 6;

/// Write a Copernicus-like file: time × depth × latitude × longitude.
///
/// `uo` is stored as float with a fill value, `vo` as packed short.
fn write_currents(path: &Path) {
    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("time", 1).unwrap();
    file.add_dimension("depth", 2).unwrap();
    file.add_dimension("latitude", NLAT).unwrap();
    file.add_dimension("longitude", NLON).unwrap();
    file.add_attribute("title", "test currents").unwrap();

    {
        let mut var = file.add_variable::<f64>("time", &["time"]).unwrap();
        var.put_attribute("units", "hours since 1950-01-01").unwrap();
        var.put_values(&[657_750.0_f64][..], ..).unwrap();
    }
    {
        let mut var = file.add_variable::<f32>("depth", &["depth"]).unwrap();
        var.put_attribute("units", "m").unwrap();
        var.put_values(&[0.494_f32, 1.541][..], ..).unwrap();
    }
    {
        let lats: Vec<f32> = (0..NLAT).map(|i| -30.0 + 20.0 * i as f32).collect();
        let mut var = file.add_variable::<f32>("latitude", &["latitude"]).unwrap();
        var.put_attribute("units", "degrees_north").unwrap();
        var.put_values(&lats, ..).unwrap();
    }
    {
        let lons: Vec<f32> = (0..NLON).map(|j| -150.0 + 60.0 * j as f32).collect();
        let mut var = file.add_variable::<f32>("longitude", &["longitude"]).unwrap();
        var.put_attribute("units", "degrees_east").unwrap();
        var.put_values(&lons, ..).unwrap();
    }

    let layer = NLAT * NLON;
    {
        // Surface layer: 0.5 everywhere except one land cell; second layer: 2.0
        let mut values = vec![0.5_f32; layer];
        values[1] = FILL;
        values.extend(std::iter::repeat(2.0_f32).take(layer));

        let mut var = file
            .add_variable::<f32>("uo", &["time", "depth", "latitude", "longitude"])
            .unwrap();
        var.put_attribute("standard_name", "eastward_sea_water_velocity")
            .unwrap();
        var.put_attribute("units", "m s-1").unwrap();
        var.put_attribute("_FillValue", FILL).unwrap();
        var.put_values(&values, ..).unwrap();
    }
    {
        // Packed: stored 250 with scale 0.002 is 0.5 m/s
        let values = vec![250_i16; 2 * layer];
        let mut var = file
            .add_variable::<i16>("vo", &["time", "depth", "latitude", "longitude"])
            .unwrap();
        var.put_attribute("standard_name", "northward_sea_water_velocity")
            .unwrap();
        var.put_attribute("scale_factor", 0.002_f32).unwrap();
        var.put_attribute("add_offset", 0.0_f32).unwrap();
        var.put_values(&values, ..).unwrap();
    }
}

fn write_temperature_only(path: &Path) {
    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("lat", 2).unwrap();
    file.add_dimension("lon", 2).unwrap();
    {
        let mut var = file.add_variable::<f32>("lat", &["lat"]).unwrap();
        var.put_values(&[0.0_f32, 1.0][..], ..).unwrap();
    }
    {
        let mut var = file.add_variable::<f32>("lon", &["lon"]).unwrap();
        var.put_values(&[0.0_f32, 1.0][..], ..).unwrap();
    }
    {
        let mut var = file.add_variable::<f32>("thetao", &["lat", "lon"]).unwrap();
        var.put_values(&[14.0_f32, 14.5, 15.0, 15.5][..], ..).unwrap();
    }
}

#[test]
fn test_grid_reads_masked_and_unpacked_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("currents.nc");
    write_currents(&path);

    let grid = NetcdfGrid::open(&path).unwrap();
    assert_eq!(grid.dimensions().len(), 4);
    assert!(grid.has_coordinate("latitude"));

    let uo = grid
        .read(
            "uo",
            &[Selection::Index(0), Selection::Index(0), Selection::All, Selection::All],
        )
        .unwrap();
    assert_eq!(uo.shape(), &[NLAT, NLON]);
    assert!(uo[[0, 1]].is_nan());
    assert_eq!(uo[[0, 0]], 0.5);

    let vo = grid.read_all("vo").unwrap();
    assert_eq!(vo.shape(), &[1, 2, NLAT, NLON]);
    assert!(vo.iter().all(|v| (v - 0.5).abs() < 1e-6));

    assert_eq!(grid.variable("vo").unwrap().dtype, "int16");
}

#[test]
fn test_out_of_range_fill_masks_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shorts.nc");
    {
        let mut file = netcdf::create(&path).unwrap();
        file.add_dimension("x", 3).unwrap();
        let mut var = file.add_variable::<i16>("counts", &["x"]).unwrap();
        var.put_attribute("missing_value", 1e20_f64).unwrap();
        var.put_values(&[i16::MAX, 0, i16::MIN][..], ..).unwrap();
    }

    let grid = NetcdfGrid::open(&path).unwrap();
    let counts = grid.read_all("counts").unwrap();
    assert_eq!(counts.iter().copied().collect::<Vec<f64>>(), vec![32767.0, 0.0, -32768.0]);
}

#[test]
fn test_selection_out_of_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("currents.nc");
    write_currents(&path);

    let grid = NetcdfGrid::open(&path).unwrap();
    let err = grid
        .read(
            "uo",
            &[Selection::Index(3), Selection::Index(0), Selection::All, Selection::All],
        )
        .unwrap_err();
    assert!(matches!(err, OceanGridError::InvalidSlice(_)));
}

#[test]
fn test_process_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("currents.nc");
    write_currents(&input);

    let points = try_process(&input, None, &ProcessOptions::with_stride(1)).unwrap();

    // One fill cell dropped from the surface layer
    assert_eq!(points.len(), NLAT * NLON - 1);
    assert!(points.iter().all(|p| (p.u - 0.5).abs() < 1e-6));
    assert!(points.iter().all(|p| (p.direction_degrees - 45.0).abs() < 1e-4));

    let output = dir.path().join("currents_processed.json");
    assert!(output.exists());
    let loaded = read_points_json(&output).unwrap();
    assert_eq!(loaded.len(), points.len());
    assert_eq!(loaded[0].latitude, -30.0);
    assert_eq!(loaded[0].longitude, -150.0);
}

#[test]
fn test_process_second_depth_layer() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("currents.nc");
    let output = dir.path().join("deep.json");
    write_currents(&input);

    let options = ProcessOptions {
        stride: 2,
        time_index: 0,
        depth_index: 1,
    };
    let points = try_process(&input, Some(&output), &options).unwrap();
    assert_eq!(points.len(), 2 * 3);
    assert!(points.iter().all(|p| (p.u - 2.0).abs() < 1e-6));
}

#[test]
fn test_missing_velocity_fields_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("temperature.nc");
    let output = dir.path().join("out.json");
    write_temperature_only(&input);

    let err = try_process(&input, Some(&output), &ProcessOptions::default()).unwrap_err();
    assert!(matches!(err, OceanGridError::MissingVelocityFields { .. }));
    assert!(!output.exists());

    let points = oceangrid::currents::process(&input, Some(&output), &ProcessOptions::default());
    assert!(points.is_empty());
    assert!(!output.exists());
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = try_process(
        &dir.path().join("absent.nc"),
        None,
        &ProcessOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, OceanGridError::FileNotFound { .. }));
}

#[test]
fn test_analyze_report_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("currents.nc");
    write_currents(&path);

    let report = analyze_file(&path).unwrap();
    assert!(report.contains(&format!("NetCDF File: {}", path.display())));
    assert!(report.contains("Dimensions:"));
    assert!(report.contains("latitude: 4"));
    assert!(report.contains("Global Attributes:"));
    assert!(report.contains("test currents"));
    assert!(report.contains("    units: degrees_north\n"));
    assert!(report.contains("    scale_factor: 0.002\n"));
    assert!(report.contains("Found current variable: uo"));
    assert!(report.contains("Found current variable: vo"));
    assert!(report.contains("Analysis complete."));
}

#[test]
fn test_analyze_without_currents_lists_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("temperature.nc");
    write_temperature_only(&path);

    let report = analyze_file(&path).unwrap();
    assert!(!report.contains("Found current variable"));
    assert!(report.contains("Analysis complete."));
}
