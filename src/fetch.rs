//! Dataset acquisition through the Copernicus Marine toolbox.
//!
//! A [`SubsetRequest`] describes a spatial/temporal/depth subset of a
//! catalog dataset and renders it as a `copernicusmarine subset` command.
//! Authentication and transport are handled by that tool.

use crate::error::{OceanGridError, Result};
use chrono::NaiveDateTime;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

/// Executable invoked by [`SubsetRequest::run`].
pub const TOOLBOX_PROGRAM: &str = "copernicusmarine";

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Predefined dataset selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Global surface currents (`uo`, `vo`), 1/12°, 6-hourly.
    Currents,
    /// Global potential temperature (`thetao`), 1/12°, 6-hourly.
    Temperature,
}

impl Preset {
    /// Get the preset name.
    pub fn name(self) -> &'static str {
        match self {
            Preset::Currents => "currents",
            Preset::Temperature => "temperature",
        }
    }

    /// Where the download lands when no output is given.
    pub fn default_output(self) -> PathBuf {
        match self {
            Preset::Currents => PathBuf::from("data/ocean_currents/ocean_currents_data.nc"),
            Preset::Temperature => PathBuf::from("data/temperature/temperature_data.nc"),
        }
    }
}

/// Parameters of a subset download.
#[derive(Debug, Clone, PartialEq)]
pub struct SubsetRequest {
    /// Catalog dataset identifier.
    pub dataset_id: String,
    /// Dataset version, if pinned.
    pub dataset_version: Option<String>,
    /// Variables to download.
    pub variables: Vec<String>,
    /// Western bound in degrees east.
    pub minimum_longitude: f64,
    /// Eastern bound in degrees east.
    pub maximum_longitude: f64,
    /// Southern bound in degrees north.
    pub minimum_latitude: f64,
    /// Northern bound in degrees north.
    pub maximum_latitude: f64,
    /// First timestamp, `YYYY-MM-DDTHH:MM:SS`.
    pub start_datetime: String,
    /// Last timestamp, `YYYY-MM-DDTHH:MM:SS`.
    pub end_datetime: String,
    /// Shallowest depth in metres.
    pub minimum_depth: f64,
    /// Deepest depth in metres.
    pub maximum_depth: f64,
    /// Coordinate selection method, e.g. `strict-inside`.
    pub coordinates_selection_method: Option<String>,
    /// netCDF compression level (0-9).
    pub netcdf_compression_level: Option<u8>,
    /// Hide the toolbox progress bar.
    pub disable_progress_bar: bool,
    /// Toolbox log level.
    pub log_level: Option<String>,
    /// Destination file.
    pub output: Option<PathBuf>,
}

impl SubsetRequest {
    /// Request for one of the predefined datasets.
    pub fn preset(preset: Preset) -> Self {
        let (dataset_id, variables) = match preset {
            Preset::Currents => (
                "cmems_mod_glo_phy-cur_anfc_0.083deg_PT6H-i",
                vec!["uo".to_string(), "vo".to_string()],
            ),
            Preset::Temperature => (
                "cmems_mod_glo_phy-thetao_anfc_0.083deg_PT6H-i",
                vec!["thetao".to_string()],
            ),
        };

        Self {
            dataset_id: dataset_id.to_string(),
            dataset_version: Some("202406".to_string()),
            variables,
            minimum_longitude: -148.165518,
            maximum_longitude: 149.072357,
            minimum_latitude: -63.279561,
            maximum_latitude: 80.471717,
            start_datetime: "2025-09-01T00:00:00".to_string(),
            end_datetime: "2025-09-20T00:00:00".to_string(),
            minimum_depth: 0.49402499198913574,
            maximum_depth: 0.49402499198913574,
            coordinates_selection_method: Some("strict-inside".to_string()),
            netcdf_compression_level: Some(1),
            disable_progress_bar: true,
            log_level: Some("ERROR".to_string()),
            output: None,
        }
    }

    /// Check bounds, ordering and required fields.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(OceanGridError::InvalidConfig(msg));

        if self.dataset_id.trim().is_empty() {
            return invalid("dataset id is empty".to_string());
        }
        if self.variables.is_empty() {
            return invalid("at least one variable is required".to_string());
        }
        check_range("longitude", self.minimum_longitude, self.maximum_longitude, -180.0, 180.0)?;
        check_range("latitude", self.minimum_latitude, self.maximum_latitude, -90.0, 90.0)?;
        check_range("depth", self.minimum_depth, self.maximum_depth, 0.0, f64::INFINITY)?;

        let start = parse_datetime("start", &self.start_datetime)?;
        let end = parse_datetime("end", &self.end_datetime)?;
        if start > end {
            return invalid(format!(
                "start {} is after end {}",
                self.start_datetime, self.end_datetime
            ));
        }

        if let Some(level) = self.netcdf_compression_level {
            if level > 9 {
                return invalid(format!("compression level {} is not within 0-9", level));
            }
        }
        Ok(())
    }

    /// Arguments for `copernicusmarine`, starting with the `subset` command.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "subset".to_string(),
            "--dataset-id".to_string(),
            self.dataset_id.clone(),
        ];
        if let Some(version) = &self.dataset_version {
            args.push("--dataset-version".to_string());
            args.push(version.clone());
        }
        for variable in &self.variables {
            args.push("--variable".to_string());
            args.push(variable.clone());
        }

        let mut push = |flag: &str, value: String| {
            args.push(flag.to_string());
            args.push(value);
        };
        push("--start-datetime", self.start_datetime.clone());
        push("--end-datetime", self.end_datetime.clone());
        push("--minimum-longitude", self.minimum_longitude.to_string());
        push("--maximum-longitude", self.maximum_longitude.to_string());
        push("--minimum-latitude", self.minimum_latitude.to_string());
        push("--maximum-latitude", self.maximum_latitude.to_string());
        push("--minimum-depth", self.minimum_depth.to_string());
        push("--maximum-depth", self.maximum_depth.to_string());
        if let Some(method) = &self.coordinates_selection_method {
            push("--coordinates-selection-method", method.clone());
        }
        if let Some(level) = self.netcdf_compression_level {
            push("--netcdf-compression-level", level.to_string());
        }
        if let Some(level) = &self.log_level {
            push("--log-level", level.clone());
        }
        if let Some(output) = &self.output {
            push("--output-filename", output.display().to_string());
        }
        if self.disable_progress_bar {
            args.push("--disable-progress-bar".to_string());
        }
        args
    }

    /// Run the download.
    ///
    /// The output directory is created first. Fails when the toolbox cannot
    /// be started or exits unsuccessfully.
    pub fn run(&self) -> Result<()> {
        self.validate()?;

        if let Some(parent) = self.output.as_deref().and_then(Path::parent) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
                info!("Created directory: {}", parent.display());
            }
        }

        info!("Starting download of {}...", self.dataset_id);
        info!("Executing command: {}", self);

        let output = Command::new(TOOLBOX_PROGRAM)
            .args(self.to_args())
            .output()
            .map_err(|e| OceanGridError::Command(format!("Failed to run {}: {}", TOOLBOX_PROGRAM, e)))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(OceanGridError::Command(format!(
                "{} exited with {}: {}",
                TOOLBOX_PROGRAM,
                output.status,
                stderr.trim()
            )));
        }
        if !stderr.trim().is_empty() {
            warn!("Command stderr: {}", stderr.trim());
        }

        if let Some(path) = &self.output {
            info!("Data successfully downloaded to: {}", path.display());
            match std::fs::metadata(path) {
                Ok(meta) => info!("File size: {:.2} MB", meta.len() as f64 / (1024.0 * 1024.0)),
                Err(e) => warn!("Error accessing file: {}", e),
            }
        }
        Ok(())
    }
}

impl fmt::Display for SubsetRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", TOOLBOX_PROGRAM)?;
        for arg in self.to_args() {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

fn check_range(what: &str, min: f64, max: f64, lower: f64, upper: f64) -> Result<()> {
    if !min.is_finite() || !max.is_finite() {
        return Err(OceanGridError::InvalidConfig(format!("{} bounds must be finite", what)));
    }
    if min > max {
        return Err(OceanGridError::InvalidConfig(format!(
            "minimum {} {} is greater than maximum {}",
            what, min, max
        )));
    }
    if min < lower || max > upper {
        return Err(OceanGridError::InvalidConfig(format!(
            "{} range {}..{} is outside {}..{}",
            what, min, max, lower, upper
        )));
    }
    Ok(())
}

fn parse_datetime(what: &str, value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).map_err(|e| {
        OceanGridError::InvalidConfig(format!("invalid {} datetime '{}': {}", what, value, e))
    })
}
