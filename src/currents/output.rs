//! JSON output of sample points.

use super::point::SamplePoint;
use crate::error::Result;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default output path for an input grid: `<stem>_processed.json` beside it.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_processed.json", stem))
}

/// Write points as a compact JSON array, replacing any existing file.
pub fn write_points_json(path: &Path, points: &[SamplePoint]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, points)?;
    writer.flush()?;
    Ok(())
}

/// Read a JSON array of points.
pub fn read_points_json(path: &Path) -> Result<Vec<SamplePoint>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
