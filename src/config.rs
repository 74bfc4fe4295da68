// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Engine configuration: the knobs enumerated in the external-interfaces
//! contract, validated once at construction time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

/// The field-formula constant `K` in `E = sqrt(K * ERP / gamma) / d`.
///
/// The choice between the Swiss NISV practice and the international
/// free-space derivation is jurisdictional, not a matter of correctness;
/// both are kept selectable and the choice is recorded in
/// [`crate::diagnostics::Diagnostics`] so a downstream report can justify
/// which one it used.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, strum_macros::Display)]
pub enum FieldConstant {
    /// `K = 49`, Swiss NISV practice (validated against official StdB
    /// calculations).
    #[strum(serialize = "NISV (K=49)")]
    Nisv,
    /// `K = 30`, international free-space derivation
    /// (`S = ERP / (4*pi*d^2)`, `E^2 = S * Z0`).
    #[strum(serialize = "free-space (K=30)")]
    FreeSpace,
    /// An explicit, caller-supplied constant.
    #[strum(serialize = "custom")]
    Custom(f64),
}

impl FieldConstant {
    /// The numeric value of `K` used in the field formula.
    pub fn value(self) -> f64 {
        match self {
            FieldConstant::Nisv => 49.0,
            FieldConstant::FreeSpace => 30.0,
            FieldConstant::Custom(k) => k,
        }
    }
}

impl Default for FieldConstant {
    fn default() -> Self {
        FieldConstant::Nisv
    }
}

/// Validated engine configuration. Construct with [`EngineConfig::new`] or
/// start from [`EngineConfig::default`] and override fields with
/// [`EngineConfig::validate`] called explicitly afterwards.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Boundary for `exceeds_limit` \[V/m\].
    pub threshold_v_per_m: f64,
    /// Horizontal filter radius around the site base position \[m\].
    pub search_radius_m: f64,
    /// Facade sampling grid step \[m\].
    pub sample_resolution_m: f64,
    /// The field-formula constant.
    pub k_constant: FieldConstant,
    /// Near-field clamp \[m\].
    pub d_min_m: f64,
    /// Additive LOS attenuation per blocking building \[dB\].
    pub per_blocker_db: f64,
    /// Ray-triangle tolerance used by the LOS analyzer \[m\].
    pub blocker_margin_m: f64,
    /// Discretisation of the tilt sweep \[degrees\]. Must be `>= 1`.
    pub tilt_step_deg: i32,
    /// Parallelism: number of worker threads. `None` means "hardware
    /// threads", matching rayon's own default.
    pub workers: Option<usize>,
    /// Whether the LOS pass only runs for points already exceeding the
    /// threshold (spec default: `true`).
    pub los_only_for_exceeding: bool,
    /// OMEN validator tolerance \[%\].
    pub omen_tolerance_pct: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threshold_v_per_m: DEFAULT_THRESHOLD_V_PER_M,
            search_radius_m: DEFAULT_SEARCH_RADIUS_M,
            sample_resolution_m: DEFAULT_SAMPLE_RESOLUTION_M,
            k_constant: FieldConstant::default(),
            d_min_m: DEFAULT_D_MIN_M,
            per_blocker_db: DEFAULT_PER_BLOCKER_DB,
            blocker_margin_m: DEFAULT_BLOCKER_MARGIN_M,
            tilt_step_deg: DEFAULT_TILT_STEP_DEG,
            workers: None,
            los_only_for_exceeding: true,
            omen_tolerance_pct: DEFAULT_OMEN_TOLERANCE_PCT,
        }
    }
}

impl EngineConfig {
    /// Build a config from defaults and validate it immediately.
    pub fn new() -> Result<Self, ConfigError> {
        let cfg = Self::default();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every invariant the engine relies on. Called automatically by
    /// [`EngineConfig::new`]; callers who build a config by hand (e.g. via
    /// struct-update syntax on `default()`) must call this themselves
    /// before handing the config to the driver.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threshold_v_per_m < 0.0 {
            return Err(ConfigError::Negative {
                field: "threshold_v_per_m",
                value: self.threshold_v_per_m,
            });
        }
        if self.search_radius_m <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "search_radius_m",
                value: self.search_radius_m,
            });
        }
        if self.sample_resolution_m <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "sample_resolution_m",
                value: self.sample_resolution_m,
            });
        }
        if self.d_min_m <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "d_min_m",
                value: self.d_min_m,
            });
        }
        if self.per_blocker_db < 0.0 {
            return Err(ConfigError::Negative {
                field: "per_blocker_db",
                value: self.per_blocker_db,
            });
        }
        if self.blocker_margin_m < 0.0 {
            return Err(ConfigError::Negative {
                field: "blocker_margin_m",
                value: self.blocker_margin_m,
            });
        }
        if self.tilt_step_deg < 1 {
            return Err(ConfigError::TiltStepTooSmall {
                value: self.tilt_step_deg,
            });
        }
        if self.omen_tolerance_pct < 0.0 {
            return Err(ConfigError::Negative {
                field: "omen_tolerance_pct",
                value: self.omen_tolerance_pct,
            });
        }
        Ok(())
    }
}

/// Configuration invalid at construction time. All variants are fatal; the
/// engine never attempts to run with an unvalidated config.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("tilt_step_deg must be at least 1, got {value}")]
    TiltStepTooSmall { value: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.threshold_v_per_m = -1.0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::Negative {
                field: "threshold_v_per_m",
                value: -1.0
            })
        );
    }

    #[test]
    fn zero_radius_is_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.search_radius_m = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn tilt_step_zero_is_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.tilt_step_deg = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn field_constant_values() {
        assert_eq!(FieldConstant::Nisv.value(), 49.0);
        assert_eq!(FieldConstant::FreeSpace.value(), 30.0);
        assert_eq!(FieldConstant::Custom(42.0).value(), 42.0);
    }
}
