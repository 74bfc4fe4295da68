// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The field kernel (spec Module D): for one sample point and one
//! antenna, sweep the antenna's tilt interval for the worst case, read
//! the pattern, and compute the scalar free-space E-field.

use crate::domain::{Antenna, AntennaContribution};
use crate::geometry::{relative_angles, Coord3};
use crate::pattern::AttenuationPattern;

/// Compute one antenna's contribution at one sample point.
///
/// `k` is the field-formula constant (spec §4.D; see
/// [`crate::config::FieldConstant`]). `d_min` guards the free-space
/// formula against a singularity as distance goes to zero. `tilt_step_deg`
/// is [`crate::config::EngineConfig::tilt_step_deg`], the discretisation of
/// the tilt sweep.
/// `building_attenuation_db` is additional material loss already known at
/// call time (e.g. an OMEN point's declared wall attenuation); it is
/// folded into the same power-sum denominator as the antenna losses. Pass
/// `0.0` when none applies — the LOS pass applies its own attenuation
/// afterwards, on the aggregated total, not here.
pub fn contribution(
    antenna: &Antenna,
    pattern: &dyn AttenuationPattern,
    point: &Coord3,
    k: f64,
    d_min: f64,
    tilt_step_deg: i32,
    building_attenuation_db: f64,
) -> AntennaContribution {
    let tilts = antenna.tilt_sweep(tilt_step_deg);

    let mut best_tilt = tilts[0];
    let mut best_v_atten = f64::INFINITY;
    for &tilt in &tilts {
        let rel = relative_angles(&antenna.position, antenna.azimuth_deg, tilt as f64, point);
        let v_atten = pattern.v_attenuation_db(rel.el_deg);
        if v_atten < best_v_atten {
            best_v_atten = v_atten;
            best_tilt = tilt;
        }
    }

    let rel = relative_angles(&antenna.position, antenna.azimuth_deg, best_tilt as f64, point);
    let h_atten = pattern.h_attenuation_db(rel.az_deg);

    let distance = antenna.position.distance_3d(point);
    let d = distance.max(d_min);

    let gamma_h = db_to_linear(h_atten);
    let gamma_v = db_to_linear(best_v_atten);
    let gamma_bldg = db_to_linear(building_attenuation_db);

    let e = (k * antenna.erp_w / (gamma_h * gamma_v * gamma_bldg)).sqrt() / d;

    AntennaContribution {
        e_v_per_m: e,
        critical_tilt_deg: best_tilt,
        distance_m: distance,
        h_atten_db: h_atten,
        v_atten_db: best_v_atten,
    }
}

fn db_to_linear(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}
