//! Coordinate role resolution.
//!
//! Dimension names are matched case-insensitively against keyword families,
//! in a fixed order. The first family whose keyword appears as a substring
//! decides the role; each role is taken by the first dimension that claims
//! it.

use crate::error::{OceanGridError, Result};
use std::fmt;

/// Semantic meaning of a grid dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateRole {
    /// Degrees north.
    Latitude,
    /// Degrees east.
    Longitude,
    /// Vertical layer.
    Depth,
    /// Time step.
    Time,
}

impl CoordinateRole {
    /// Get the role name.
    pub fn name(self) -> &'static str {
        match self {
            CoordinateRole::Latitude => "latitude",
            CoordinateRole::Longitude => "longitude",
            CoordinateRole::Depth => "depth",
            CoordinateRole::Time => "time",
        }
    }
}

impl fmt::Display for CoordinateRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Keyword families, evaluated in order.
const ROLE_RULES: [(CoordinateRole, &[&str]); 4] = [
    (CoordinateRole::Latitude, &["lat", "latitude"]),
    (CoordinateRole::Longitude, &["lon", "longitude"]),
    (CoordinateRole::Depth, &["depth", "deptht", "z"]),
    (CoordinateRole::Time, &["time", "t"]),
];

/// Classify a single dimension name.
pub fn classify(name: &str) -> Option<CoordinateRole> {
    let lower = name.to_lowercase();
    ROLE_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(role, _)| *role)
}

/// Mapping from role to the dimension name that fills it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleMap {
    latitude: Option<String>,
    longitude: Option<String>,
    depth: Option<String>,
    time: Option<String>,
}

impl RoleMap {
    /// Dimension assigned to a role, if any.
    pub fn get(&self, role: CoordinateRole) -> Option<&str> {
        self.slot(role).as_deref()
    }

    /// Dimension assigned to a role, or an `UnresolvedCoordinate` error.
    pub fn require(&self, role: CoordinateRole) -> Result<&str> {
        self.get(role)
            .ok_or_else(|| OceanGridError::unresolved(role.name()))
    }

    /// Role of a dimension, if it was assigned one.
    pub fn role_of(&self, dim: &str) -> Option<CoordinateRole> {
        [
            CoordinateRole::Latitude,
            CoordinateRole::Longitude,
            CoordinateRole::Depth,
            CoordinateRole::Time,
        ]
        .into_iter()
        .find(|role| self.get(*role) == Some(dim))
    }

    /// Whether no role is assigned.
    pub fn is_empty(&self) -> bool {
        self.latitude.is_none() && self.longitude.is_none() && self.depth.is_none() && self.time.is_none()
    }

    fn slot(&self, role: CoordinateRole) -> &Option<String> {
        match role {
            CoordinateRole::Latitude => &self.latitude,
            CoordinateRole::Longitude => &self.longitude,
            CoordinateRole::Depth => &self.depth,
            CoordinateRole::Time => &self.time,
        }
    }

    fn slot_mut(&mut self, role: CoordinateRole) -> &mut Option<String> {
        match role {
            CoordinateRole::Latitude => &mut self.latitude,
            CoordinateRole::Longitude => &mut self.longitude,
            CoordinateRole::Depth => &mut self.depth,
            CoordinateRole::Time => &mut self.time,
        }
    }
}

impl fmt::Display for RoleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            CoordinateRole::Latitude,
            CoordinateRole::Longitude,
            CoordinateRole::Depth,
            CoordinateRole::Time,
        ]
        .into_iter()
        .filter_map(|role| self.get(role).map(|dim| format!("{}={}", role, dim)))
        .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Resolve roles for an ordered list of dimension names.
///
/// Unmatched names are ignored, and a name whose family is already taken
/// does not fall through to another family.
pub fn resolve_roles<S: AsRef<str>>(names: &[S]) -> RoleMap {
    let mut map = RoleMap::default();
    for name in names {
        let name = name.as_ref();
        if let Some(role) = classify(name) {
            let slot = map.slot_mut(role);
            if slot.is_none() {
                *slot = Some(name.to_string());
            }
        }
    }
    map
}
