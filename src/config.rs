//! Processing options and the default file layout.

use crate::error::{OceanGridError, Result};
use std::path::{Path, PathBuf};

/// Sample stride used by `process` when none is given.
pub const DEFAULT_STRIDE: usize = 5;

/// Sample stride used by the combined `run` entry point.
pub const RUN_STRIDE: usize = 8;

/// Data directory used by `run` when none is given.
pub const DEFAULT_DATA_DIR: &str = "data/ocean_currents";

/// Grid file expected by the combined `run` entry point.
pub const DEFAULT_INPUT_FILE: &str = "glo12_rg_6h-i_20251002-06h_3D-uovo_fcst_R20250923.nc";

/// Output location of `run`, relative to the data directory.
pub const RUN_OUTPUT_RELATIVE: [&str; 5] = [
    "..",
    "..",
    "public",
    "data",
    "ocean_currents",
];

/// File name written by `run`.
pub const RUN_OUTPUT_FILE: &str = "ocean_currents_processed.json";

/// Options controlling slice selection and sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Keep every `stride`-th row and column.
    pub stride: usize,
    /// Time step to extract.
    pub time_index: usize,
    /// Depth layer to extract (0 is typically the surface).
    pub depth_index: usize,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            stride: DEFAULT_STRIDE,
            time_index: 0,
            depth_index: 0,
        }
    }
}

impl ProcessOptions {
    /// Options with a given stride and default indices.
    pub fn with_stride(stride: usize) -> Self {
        Self {
            stride,
            ..Self::default()
        }
    }

    /// Check the options before any data is read.
    pub fn validate(&self) -> Result<()> {
        if self.stride == 0 {
            return Err(OceanGridError::InvalidConfig(
                "sample stride must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Input and output paths of the combined entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    /// Grid file to analyze and process.
    pub input: PathBuf,
    /// JSON file to write.
    pub output: PathBuf,
}

impl RunLayout {
    /// Layout rooted at a data directory.
    pub fn new(data_dir: &Path, input_name: &str) -> Self {
        let mut output = data_dir.to_path_buf();
        output.extend(RUN_OUTPUT_RELATIVE);
        output.push(RUN_OUTPUT_FILE);
        Self {
            input: data_dir.join(input_name),
            output,
        }
    }
}
