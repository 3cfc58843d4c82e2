//! Error types for Oceangrid.
//!
//! This module provides a unified error handling approach using `thiserror`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Oceangrid operations.
pub type Result<T> = std::result::Result<T, OceanGridError>;

/// Errors that can occur in Oceangrid.
#[derive(Debug, Error)]
pub enum OceanGridError {
    /// Input file does not exist.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Failed to read or open a NetCDF file.
    #[error("NetCDF error: {0}")]
    NetCDF(String),

    /// Neither candidate list produced both velocity components.
    #[error("Could not find ocean current velocity variables (available: {})", available.join(", "))]
    MissingVelocityFields {
        /// Every variable name present in the grid.
        available: Vec<String>,
    },

    /// A required coordinate role (latitude, longitude) was not found.
    #[error("Could not identify the {role} dimension")]
    UnresolvedCoordinate {
        /// Name of the missing role.
        role: String,
    },

    /// Named variable is not part of the grid.
    #[error("Variable not found: {name}")]
    VariableNotFound {
        /// Variable name.
        name: String,
    },

    /// Slice selection produced an unusable array.
    #[error("Invalid slice: {0}")]
    InvalidSlice(String),

    /// Invalid option or request parameter.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// External command failed.
    #[error("Command execution failed: {0}")]
    Command(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OceanGridError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create an UnresolvedCoordinate error.
    pub fn unresolved(role: impl Into<String>) -> Self {
        Self::UnresolvedCoordinate { role: role.into() }
    }

    /// Create a VariableNotFound error.
    pub fn variable_not_found(name: impl Into<String>) -> Self {
        Self::VariableNotFound { name: name.into() }
    }
}

impl From<netcdf::Error> for OceanGridError {
    fn from(err: netcdf::Error) -> Self {
        Self::NetCDF(err.to_string())
    }
}
