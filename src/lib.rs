//! Oceangrid - fetch, inspect and down-sample ocean current grids.
//!
//! Oceangrid reads gridded ocean model output (netCDF) and turns the
//! eastward/northward velocity fields into a flat list of points with speed
//! and direction, ready to be drawn on a web map.
//!
//! # Features
//!
//! - Velocity variable discovery by well-known names
//! - Latitude/longitude/depth/time dimension detection by name
//! - Time and depth layer selection with CF time decoding
//! - Strided down-sampling into JSON point lists
//! - Structure reports of netCDF files
//! - Subset downloads through the Copernicus Marine toolbox
//!
//! # Example
//!
//! ```ignore
//! use oceangrid::config::ProcessOptions;
//! use oceangrid::currents;
//! use std::path::Path;
//!
//! let points = currents::try_process(
//!     Path::new("currents.nc"),
//!     Some(Path::new("currents.json")),
//!     &ProcessOptions::with_stride(8),
//! )?;
//! println!("Wrote {} points", points.len());
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod config;
pub mod currents;
pub mod data;
pub mod error;
pub mod fetch;
pub mod report;

pub use error::{OceanGridError, Result};
