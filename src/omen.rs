// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The OMEN validator (spec Module H): evaluate the field kernel directly
//! at reference observation points with a declared expected value, and
//! report how far the computed field deviates.

use strum_macros::Display;

use crate::aggregator;
use crate::config::EngineConfig;
use crate::diagnostics::Diagnostics;
use crate::domain::{Antenna, OmenPoint};
use crate::pattern::PatternRegistry;

/// Pass/fail verdict of one OMEN comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum OmenStatus {
    Ok,
    Deviation,
}

/// The result of comparing one OMEN point's computed field to its
/// declared expected value.
#[derive(Clone, Debug)]
pub struct OmenValidation {
    pub omen_nr: String,
    pub computed_v_per_m: f64,
    pub expected_v_per_m: f64,
    pub abs_deviation_v_per_m: f64,
    pub pct_deviation: f64,
    pub status: OmenStatus,
}

/// Validate every OMEN point in `omen_points` that carries an expected
/// value. Points without one are silently skipped (they exist only for
/// [`crate::assignment`] bookkeeping, not validation).
pub fn validate(
    omen_points: &[OmenPoint],
    antennas: &[Antenna],
    registry: &PatternRegistry,
    config: &EngineConfig,
) -> Vec<OmenValidation> {
    omen_points
        .iter()
        .filter_map(|omen| {
            let expected = omen.e_field_expected?;
            let mut diagnostics = Diagnostics::new();
            let result = aggregator::aggregate(
                "",
                omen.position,
                antennas,
                registry,
                config,
                omen.building_attenuation_db,
                &mut diagnostics,
            );
            let computed = result.e_total_v_per_m;
            let abs_deviation = computed - expected;
            let pct_deviation = if expected.abs() > f64::EPSILON {
                100.0 * abs_deviation / expected
            } else {
                0.0
            };
            let status = if pct_deviation.abs() <= config.omen_tolerance_pct {
                OmenStatus::Ok
            } else {
                OmenStatus::Deviation
            };
            Some(OmenValidation {
                omen_nr: omen.nr.clone(),
                computed_v_per_m: computed,
                expected_v_per_m: expected,
                abs_deviation_v_per_m: abs_deviation,
                pct_deviation,
                status,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Coord3;
    use crate::pattern::StandardPattern;

    fn antenna() -> Antenna {
        Antenna {
            id: "A1".into(),
            mast_id: "M1".into(),
            position: Coord3::new(0.0, 0.0, 0.0),
            azimuth_deg: 0.0,
            tilt_nominal_deg: 0,
            tilt_from_deg: 0,
            tilt_to_deg: 0,
            erp_w: 100.0,
            freq_band_key: "1800".into(),
            pattern_key: "omni".into(),
            is_adaptive: false,
            sub_arrays: 1,
        }
    }

    #[test]
    fn exact_match_is_ok() {
        let antennas = vec![antenna()];
        let registry = PatternRegistry::fallback_only(StandardPattern::OMNI);
        let config = EngineConfig::default();
        let expected = (49.0_f64 * 100.0).sqrt() / 10.0;
        let omen = OmenPoint {
            nr: "OMEN1".into(),
            position: Coord3::new(0.0, 10.0, 0.0),
            building_attenuation_db: 0.0,
            e_field_expected: Some(expected),
        };
        let results = validate(&[omen], &antennas, &registry, &config);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, OmenStatus::Ok);
        assert!(results[0].pct_deviation.abs() < 1e-6);
    }

    #[test]
    fn large_mismatch_is_deviation() {
        let antennas = vec![antenna()];
        let registry = PatternRegistry::fallback_only(StandardPattern::OMNI);
        let config = EngineConfig::default();
        let omen = OmenPoint {
            nr: "OMEN2".into(),
            position: Coord3::new(0.0, 10.0, 0.0),
            building_attenuation_db: 0.0,
            e_field_expected: Some(1.0), // far off the true value
        };
        let results = validate(&[omen], &antennas, &registry, &config);
        assert_eq!(results[0].status, OmenStatus::Deviation);
    }

    #[test]
    fn omen_without_expected_value_is_skipped() {
        let antennas = vec![antenna()];
        let registry = PatternRegistry::fallback_only(StandardPattern::OMNI);
        let config = EngineConfig::default();
        let omen = OmenPoint {
            nr: "OMEN3".into(),
            position: Coord3::new(0.0, 10.0, 0.0),
            building_attenuation_db: 0.0,
            e_field_expected: None,
        };
        let results = validate(&[omen], &antennas, &registry, &config);
        assert!(results.is_empty());
    }
}
