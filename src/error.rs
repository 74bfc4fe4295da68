// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all engine-related errors. This should be the *only*
//! error enum that is publicly visible; every subsystem gets its own
//! fallible error enum, composed in here with `#[from]`.

use thiserror::Error;

use crate::config::ConfigError;

/// The *only* publicly visible error from this crate.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("scan cancelled before completion")]
    Cancelled,
}

/// Errors from the geometry primitives (Module A): ray-triangle
/// intersection, polygon containment, facade sampling.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("polygon must have at least 3 vertices, got {count}")]
    TooFewVertices { count: usize },

    #[error("all vertices of polygon for building {building_id} are collinear or coincident")]
    DegeneratePolygon { building_id: String },

    #[error("facade wall for building {building_id} has zero length")]
    ZeroLengthWall { building_id: String },

    #[error("sample_resolution_m must be positive, got {value}")]
    NonPositiveResolution { value: f64 },
}

/// Errors from the antenna pattern table and the analytical standard
/// pattern fallback (Modules B, M).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatternError {
    #[error("pattern table for antenna {antenna_id} has no entries")]
    EmptyTable { antenna_id: String },

    #[error(
        "pattern table angles for antenna {antenna_id} are not monotonically increasing at index {index}"
    )]
    UnsortedAngles { antenna_id: String, index: usize },

    #[error("standard pattern preset '{preset}' is not recognised")]
    UnknownPreset { preset: String },

    #[error("horizontal beamwidth for antenna {antenna_id} must be in (0, 360), got {value}")]
    InvalidBeamwidth { antenna_id: String, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_wraps_config_error() {
        let config_err = ConfigError::NotPositive {
            field: "search_radius_m",
            value: 0.0,
        };
        let engine_err: EngineError = config_err.into();
        assert!(matches!(engine_err, EngineError::Config(_)));
    }

    #[test]
    fn engine_error_wraps_geometry_error() {
        let geom_err = GeometryError::TooFewVertices { count: 2 };
        let engine_err: EngineError = geom_err.into();
        assert!(engine_err.to_string().contains("at least 3 vertices"));
    }
}
