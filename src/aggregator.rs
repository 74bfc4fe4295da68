// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The point aggregator (spec Module E): apply the field kernel across
//! every active antenna at one sample point and power-sum the results.

use crate::config::EngineConfig;
use crate::diagnostics::{Diagnostics, Issue};
use crate::domain::{Antenna, HotspotResult};
use crate::geometry::Coord3;
use crate::kernel;
use crate::pattern::PatternRegistry;

/// Aggregate every active antenna's contribution at one world point into
/// a [`HotspotResult`].
///
/// `building_id` and `building_attenuation_db` let this same routine
/// serve both the facade sampler's points (attenuation `0.0`, a real
/// building id) and the OMEN validator's synthetic points (the OMEN's own
/// declared attenuation, no building association). Any antenna whose
/// `(pattern_key, freq_band_key)` isn't in `registry` falls back to the
/// registry's analytical pattern and is recorded in `diagnostics`.
pub fn aggregate(
    building_id: &str,
    position: Coord3,
    antennas: &[Antenna],
    registry: &PatternRegistry,
    config: &EngineConfig,
    building_attenuation_db: f64,
    diagnostics: &mut Diagnostics,
) -> HotspotResult {
    let k = config.k_constant.value();
    let mut contributions = Vec::new();

    for antenna in antennas.iter().filter(|a| a.is_active()) {
        let (pattern, used_fallback) = registry.resolve(&antenna.pattern_key, &antenna.freq_band_key);
        if used_fallback {
            diagnostics.push(Issue::MissingPattern {
                antenna_id: antenna.id.clone(),
                antenna_type: antenna.pattern_key.clone(),
                freq_band: antenna.freq_band_key.clone(),
            });
        }
        let contribution = kernel::contribution(
            antenna,
            pattern.as_ref(),
            &position,
            k,
            config.d_min_m,
            config.tilt_step_deg,
            building_attenuation_db,
        );
        contributions.push(contribution);
    }

    let e_total = power_sum(&contributions);
    let exceeds_limit = e_total >= config.threshold_v_per_m;

    HotspotResult::new(
        building_id.to_string(),
        position,
        e_total,
        exceeds_limit,
        contributions,
    )
}

/// Record an [`Issue::AntennaFiltered`] for every antenna with non-positive
/// ERP (spec §7: "Antenna with non-positive ERP: filtered out before
/// computation; recorded in diagnostics").
///
/// Antennas don't change per sample point, so this is meant to be called
/// once per site (by [`crate::run_compliance_scan`]), not once per point —
/// [`aggregate`] itself silently skips inactive antennas on every call
/// without re-recording the same diagnostic per point.
pub fn record_filtered_antennas(antennas: &[Antenna], diagnostics: &mut Diagnostics) {
    for antenna in antennas.iter().filter(|a| !a.is_active()) {
        diagnostics.push(Issue::AntennaFiltered {
            antenna_id: antenna.id.clone(),
            reason: format!("non-positive ERP ({} W)", antenna.erp_w),
        });
    }
}

fn power_sum(contributions: &[crate::domain::AntennaContribution]) -> f64 {
    contributions
        .iter()
        .map(|c| c.e_v_per_m * c.e_v_per_m)
        .sum::<f64>()
        .sqrt()
}
