//! Human-readable structure report of a grid.

use crate::data::{Grid, NetcdfGrid, ValueStats, VariableInfo};
use crate::error::Result;
use std::path::Path;

/// Variable names checked for ocean current data, in report order.
pub const CURRENT_VARIABLES: [&str; 6] = ["uo", "vo", "u", "v", "water_u", "water_v"];

/// Substrings that mark a variable as a possible current field.
const CURRENT_HINTS: [&str; 2] = ["current", "velocity"];

/// Open a netCDF file and build its structure report.
pub fn analyze_file(path: &Path) -> Result<String> {
    let grid = NetcdfGrid::open(path)?;
    Ok(structure_report(&grid, &grid.path().display().to_string()))
}

/// Build the structure report of a grid.
pub fn structure_report(grid: &dyn Grid, title: &str) -> String {
    let mut text = String::new();
    let variables = grid.variables();

    text.push_str(&"=".repeat(80));
    text.push('\n');
    text.push_str(&format!("NetCDF File: {}\n", title));
    text.push_str(&"=".repeat(80));
    text.push('\n');

    push_heading(&mut text, "Dimensions:");
    for dim in grid.dimensions() {
        text.push_str(&format!("{}: {}\n", dim.name, dim.len));
    }

    push_heading(&mut text, "Variables:");
    for var in &variables {
        text.push_str(&format!(
            "{}: {}, Dimensions: ({})\n",
            var.name,
            var.dtype,
            var.dim_names.join(", ")
        ));
        push_attributes(&mut text, &var.attributes);
    }

    push_heading(&mut text, "Global Attributes:");
    for (key, value) in grid.global_attributes() {
        text.push_str(&format!("{}: {}\n", key, value));
    }

    let found: Vec<&VariableInfo> = CURRENT_VARIABLES
        .iter()
        .filter_map(|name| variables.iter().find(|v| v.name == *name))
        .collect();

    for var in &found {
        text.push_str(&format!("\nFound current variable: {}\n", var.name));
        text.push_str(&format!("  Shape: {}\n", format_shape(&var.shape)));
        if var.is_numeric() {
            push_statistics(&mut text, grid, var);
        }
    }

    if found.is_empty() {
        text.push_str("\nNo standard ocean current variables found in this dataset.\n");
        text.push_str(
            "Looking for variables with 'current' or 'velocity' in their name or attributes...\n",
        );
        for var in variables.iter().filter(|v| looks_like_current(v)) {
            text.push_str(&format!("\nPotential current variable: {}\n", var.name));
            text.push_str(&format!("  Shape: {}\n", format_shape(&var.shape)));
            text.push_str(&format!("  Dimensions: ({})\n", var.dim_names.join(", ")));
            push_attributes(&mut text, &var.attributes);
        }
    }

    text.push_str("\nAnalysis complete.\n");
    text
}

/// Whether a variable's name or attributes mention currents or velocity.
pub fn looks_like_current(var: &VariableInfo) -> bool {
    let mentions = |s: &str| {
        let lower = s.to_lowercase();
        CURRENT_HINTS.iter().any(|hint| lower.contains(hint))
    };

    mentions(&var.name)
        || var
            .attributes
            .iter()
            .any(|(key, value)| mentions(key) || mentions(value))
}

fn push_heading(text: &mut String, heading: &str) {
    text.push_str(&format!("\n{}\n", heading));
    text.push_str(&"-".repeat(40));
    text.push('\n');
}

fn push_attributes(text: &mut String, attributes: &[(String, String)]) {
    if attributes.is_empty() {
        return;
    }
    text.push_str("  Attributes:\n");
    for (key, value) in attributes {
        text.push_str(&format!("    {}: {}\n", key, value));
    }
}

fn push_statistics(text: &mut String, grid: &dyn Grid, var: &VariableInfo) {
    match grid.read_all(&var.name) {
        Ok(data) => match ValueStats::from_values(data.iter()) {
            Some(stats) => {
                text.push_str(&format!("  Min: {}\n", stats.min));
                text.push_str(&format!("  Max: {}\n", stats.max));
                text.push_str(&format!("  Mean: {}\n", stats.mean));
            }
            None => text.push_str("  No valid values\n"),
        },
        Err(e) => text.push_str(&format!("  Error computing statistics: {}\n", e)),
    }
}

fn format_shape(shape: &[usize]) -> String {
    let dims: Vec<String> = shape.iter().map(|d| d.to_string()).collect();
    format!("({})", dims.join(", "))
}
