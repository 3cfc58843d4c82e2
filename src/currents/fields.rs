//! Velocity field discovery.

use crate::data::Grid;
use crate::error::{OceanGridError, Result};

/// Candidate names for the eastward component, in order of preference.
pub const EASTWARD_CANDIDATES: [&str; 4] = ["uo", "u", "water_u", "eastward_sea_water_velocity"];

/// Candidate names for the northward component, in order of preference.
pub const NORTHWARD_CANDIDATES: [&str; 4] = ["vo", "v", "water_v", "northward_sea_water_velocity"];

/// Names of the two velocity component variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VelocityFields {
    /// Eastward component.
    pub eastward: String,
    /// Northward component.
    pub northward: String,
}

fn first_present(candidates: &[&str], names: &[String]) -> Option<String> {
    candidates
        .iter()
        .find(|c| names.iter().any(|n| n == *c))
        .map(|c| c.to_string())
}

/// Pick the velocity variables from a list of variable names.
///
/// Fails with `MissingVelocityFields` unless both lists have a match.
pub fn find_velocity_fields(names: &[String]) -> Result<VelocityFields> {
    match (
        first_present(&EASTWARD_CANDIDATES, names),
        first_present(&NORTHWARD_CANDIDATES, names),
    ) {
        (Some(eastward), Some(northward)) => Ok(VelocityFields {
            eastward,
            northward,
        }),
        _ => Err(OceanGridError::MissingVelocityFields {
            available: names.to_vec(),
        }),
    }
}

/// Pick the velocity variables of a grid.
pub fn discover(grid: &dyn Grid) -> Result<VelocityFields> {
    find_velocity_fields(&grid.variable_names())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_preferred_names() {
        let fields = find_velocity_fields(&names(&["u", "v", "uo", "vo"])).unwrap();
        assert_eq!(fields.eastward, "uo");
        assert_eq!(fields.northward, "vo");
    }

    #[test]
    fn test_long_names() {
        let fields = find_velocity_fields(&names(&[
            "northward_sea_water_velocity",
            "eastward_sea_water_velocity",
        ]))
        .unwrap();
        assert_eq!(fields.eastward, "eastward_sea_water_velocity");
        assert_eq!(fields.northward, "northward_sea_water_velocity");
    }

    #[test]
    fn test_mixed_families() {
        let fields = find_velocity_fields(&names(&["water_u", "v"])).unwrap();
        assert_eq!(fields.eastward, "water_u");
        assert_eq!(fields.northward, "v");
    }

    #[test]
    fn test_missing_component() {
        let err = find_velocity_fields(&names(&["uo", "thetao"])).unwrap_err();
        match err {
            OceanGridError::MissingVelocityFields { available } => {
                assert_eq!(available, names(&["uo", "thetao"]));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_no_substring_matching() {
        assert!(find_velocity_fields(&names(&["uo_mean", "vo_mean"])).is_err());
    }
}
