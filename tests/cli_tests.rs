//! Command-line behaviour.

use assert_cmd::Command;
use predicates::prelude::*;

fn oceangrid() -> Command {
    Command::cargo_bin("oceangrid").unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    oceangrid()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("fetch"));
}

#[test]
fn test_run_without_input_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    oceangrid()
        .args(["run", "--dir"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("NetCDF file not found"));
}

#[test]
fn test_run_reports_processing_failure_once() {
    let root = tempfile::tempdir().unwrap();
    let data_dir = root.path().join("data").join("ocean_currents");
    std::fs::create_dir_all(&data_dir).unwrap();
    {
        let mut file = netcdf::create(data_dir.join("temperature.nc")).unwrap();
        file.add_dimension("lat", 1).unwrap();
        file.add_dimension("lon", 1).unwrap();
        let mut var = file.add_variable::<f32>("thetao", &["lat", "lon"]).unwrap();
        var.put_values(&[14.0_f32][..], ..).unwrap();
    }

    let output = oceangrid()
        .args(["run", "--input", "temperature.nc", "--dir"])
        .arg(&data_dir)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout
            .matches("Could not find ocean current velocity variables")
            .count(),
        1
    );
    assert!(stdout.contains("Done!"));
    assert!(!root
        .path()
        .join("public/data/ocean_currents/ocean_currents_processed.json")
        .exists());
}

#[test]
fn test_process_missing_file_is_best_effort() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.json");
    oceangrid()
        .arg("process")
        .arg(dir.path().join("missing.nc"))
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("NetCDF file not found"));
    assert!(!output.exists());
}

#[test]
fn test_process_rejects_zero_stride() {
    oceangrid()
        .args(["process", "whatever.nc", "--stride", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("stride must be at least 1"));
}

#[test]
fn test_analyze_missing_file() {
    oceangrid()
        .args(["analyze", "no_such_file.nc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("File not found"));
}

#[test]
fn test_fetch_dry_run_prints_command() {
    oceangrid()
        .args(["fetch", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "copernicusmarine subset --dataset-id cmems_mod_glo_phy-cur_anfc_0.083deg_PT6H-i",
        ))
        .stdout(predicate::str::contains("--variable uo --variable vo"))
        .stdout(predicate::str::contains(
            "--output-filename data/ocean_currents/ocean_currents_data.nc",
        ));
}

#[test]
fn test_fetch_dry_run_with_overrides() {
    oceangrid()
        .args([
            "fetch",
            "--preset",
            "temperature",
            "--min-lat",
            "-10",
            "--max-lat",
            "10",
            "--output",
            "out/t.nc",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("--variable thetao"))
        .stdout(predicate::str::contains("--minimum-latitude -10"))
        .stdout(predicate::str::contains("--maximum-latitude 10"))
        .stdout(predicate::str::contains("--output-filename out/t.nc"));
}

#[test]
fn test_fetch_rejects_inverted_bounds() {
    oceangrid()
        .args(["fetch", "--min-lat", "20", "--max-lat", "10", "--dry-run"])
        .assert()
        .failure();
}
