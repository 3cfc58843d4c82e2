//! Data reading and representation.
//!
//! This module defines the [`Grid`] abstraction used by the sampler and the
//! structure report, and provides a netCDF-backed and an in-memory
//! implementation of it.

mod grid;
mod memory;
mod reader;
mod stats;
mod time;

pub use grid::{Dimension, Grid, Selection, VariableInfo};
pub use memory::MemoryGrid;
pub use reader::NetcdfGrid;
pub use stats::ValueStats;
pub use time::{format_time_value, CfTimeUnits, TimeUnit};
