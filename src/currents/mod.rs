//! Ocean current grid sampling.
//!
//! The pipeline is: find the velocity variables, resolve which dimensions
//! are latitude/longitude/depth/time, select one layer, then walk it with a
//! fixed stride and emit [`SamplePoint`]s.

mod fields;
mod output;
mod point;
mod process;
mod roles;
mod sampler;
mod slice;

pub use fields::{
    discover, find_velocity_fields, VelocityFields, EASTWARD_CANDIDATES, NORTHWARD_CANDIDATES,
};
pub use output::{default_output_path, read_points_json, write_points_json};
pub use point::{direction_degrees, in_valid_range, speed, PointKind, SamplePoint};
pub use process::{extract_points, log_failure, process, process_grid, try_process};
pub use roles::{classify, resolve_roles, CoordinateRole, RoleMap};
pub use sampler::{sample_points, sample_slice, sampled_len};
pub use slice::{resolve_depth_index, select_slice, variable_roles, VelocitySlice};
