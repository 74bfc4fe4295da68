// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The line-of-sight analyzer (spec Module F): for points whose pre-LOS
//! field already exceeds the threshold, ray-cast from the site's mast to
//! the sample point against every other building's wall mesh and apply a
//! fixed additive attenuation per blocking building.

use crate::constants::DEFAULT_MAST_OFFSET_M;
use crate::domain::{Building, HotspotResult, LosStatus, Site};
use crate::geometry::{fan_triangulate, ray_hits_segment_with_margin, Coord3};

/// The mast origin used for every LOS segment from this site: the base
/// position, raised by `max(antenna height) - base height`, floored at
/// [`DEFAULT_MAST_OFFSET_M`] if no antenna is tall enough to clear it.
fn mast_origin(site: &Site) -> Coord3 {
    let max_antenna_h = site
        .antennas
        .iter()
        .map(|a| a.position.h)
        .fold(f64::NEG_INFINITY, f64::max);
    let offset = if max_antenna_h.is_finite() {
        (max_antenna_h - site.base_position.h).max(DEFAULT_MAST_OFFSET_M)
    } else {
        DEFAULT_MAST_OFFSET_M
    };
    Coord3::new(site.base_position.e, site.base_position.n, site.base_position.h + offset)
}

/// Whether `building` blocks the segment from `origin` to `target`: any
/// wall surface with at least 3 vertices whose fan-triangulation is hit
/// by the ray within the segment's length, outside `margin_m` of either
/// endpoint (spec §6 `blocker_margin_m`).
fn building_blocks(building: &Building, origin: &Coord3, target: &Coord3, margin_m: f64) -> bool {
    let direction = *target - *origin;
    for wall in &building.walls {
        if wall.vertices.len() < 3 {
            continue;
        }
        for tri in fan_triangulate(&wall.vertices) {
            if ray_hits_segment_with_margin(origin, &direction, &tri, margin_m) {
                return true;
            }
        }
    }
    false
}

/// Run the LOS pass on one result in place. No-op if `result` doesn't
/// exceed the threshold pre-LOS (the caller is expected to only invoke
/// this for candidates, per [`crate::config::EngineConfig::los_only_for_exceeding`],
/// but this function re-checks so it's safe to call unconditionally too).
pub fn analyze(
    result: &mut HotspotResult,
    site: &Site,
    buildings: &[Building],
    per_blocker_db: f64,
    blocker_margin_m: f64,
) {
    if !result.exceeds_limit {
        return;
    }

    let origin = mast_origin(site);
    let mut blockers = 0u32;
    for building in buildings {
        if building.id == result.building_id {
            continue;
        }
        if building_blocks(building, &origin, &result.position, blocker_margin_m) {
            blockers += 1;
        }
    }

    let total_blocker_db = per_blocker_db * blockers as f64;
    result.e_field_free = result.e_total_v_per_m;
    result.e_total_v_per_m *= 10f64.powf(-total_blocker_db / 20.0);
    result.blockers_count = blockers;
    result.building_attenuation_db = total_blocker_db;
    result.los_status = if blockers == 0 {
        LosStatus::Los
    } else {
        LosStatus::Nlos
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Antenna, Building, HotspotResult, Surface};

    fn site_with_antenna_height(h: f64) -> Site {
        Site {
            name: "S1".into(),
            base_position: Coord3::new(0.0, 0.0, 0.0),
            antennas: vec![Antenna {
                id: "A1".into(),
                mast_id: "M1".into(),
                position: Coord3::new(0.0, 0.0, h),
                azimuth_deg: 0.0,
                tilt_nominal_deg: 0,
                tilt_from_deg: 0,
                tilt_to_deg: 0,
                erp_w: 100.0,
                freq_band_key: "1800".into(),
                pattern_key: "omni".into(),
                is_adaptive: false,
                sub_arrays: 1,
            }],
            omen_points: vec![],
        }
    }

    fn blocking_building(id: &str, at_n: f64) -> Building {
        Building {
            id: id.to_string(),
            egid: String::new(),
            walls: vec![Surface {
                id: "W1".into(),
                vertices: vec![
                    Coord3::new(-5.0, at_n, 0.0),
                    Coord3::new(5.0, at_n, 0.0),
                    Coord3::new(5.0, at_n, 20.0),
                    Coord3::new(-5.0, at_n, 20.0),
                ],
                outward_normal: None,
            }],
            roofs: vec![],
        }
    }

    #[test]
    fn no_blockers_keeps_los_and_field_unchanged() {
        let site = site_with_antenna_height(20.0);
        let mut result = HotspotResult::new("Target".into(), Coord3::new(0.0, 100.0, 1.5), 6.0, true, vec![]);
        analyze(&mut result, &site, &[], 12.0, 0.0);
        assert_eq!(result.los_status, LosStatus::Los);
        assert_eq!(result.blockers_count, 0);
        assert_eq!(result.e_total_v_per_m, result.e_field_free);
    }

    #[test]
    fn intervening_building_attenuates_and_marks_nlos() {
        let site = site_with_antenna_height(20.0);
        let blocker = blocking_building("Blocker", 50.0);
        let mut result = HotspotResult::new("Target".into(), Coord3::new(0.0, 100.0, 1.5), 6.0, true, vec![]);
        analyze(&mut result, &site, &[blocker], 12.0, 0.0);
        assert_eq!(result.los_status, LosStatus::Nlos);
        assert_eq!(result.blockers_count, 1);
        assert!(result.e_total_v_per_m < result.e_field_free);
        let expected = 6.0 * 10f64.powf(-12.0 / 20.0);
        assert!((result.e_total_v_per_m - expected).abs() < 1e-9);
    }

    #[test]
    fn owning_building_is_excluded_from_blocker_search() {
        let site = site_with_antenna_height(20.0);
        // The target building itself sits "in the way" geometrically but
        // must never count as its own blocker.
        let own_building = blocking_building("Target", 50.0);
        let mut result = HotspotResult::new("Target".into(), Coord3::new(0.0, 100.0, 1.5), 6.0, true, vec![]);
        analyze(&mut result, &site, &[own_building], 12.0, 0.0);
        assert_eq!(result.blockers_count, 0);
    }

    #[test]
    fn non_exceeding_result_is_left_untouched() {
        let site = site_with_antenna_height(20.0);
        let blocker = blocking_building("Blocker", 50.0);
        let mut result = HotspotResult::new("Target".into(), Coord3::new(0.0, 100.0, 1.5), 2.0, false, vec![]);
        analyze(&mut result, &site, &[blocker], 12.0, 0.0);
        assert_eq!(result.los_status, LosStatus::Los);
        assert_eq!(result.e_total_v_per_m, 2.0);
    }

    #[test]
    fn margin_excludes_a_wall_right_at_the_target_endpoint() {
        let site = site_with_antenna_height(20.0);
        // A wall placed 0.2 m short of the target: within a 0.5 m margin
        // of the segment's far endpoint, so it must not count as a
        // separate blocker (it's effectively the target facade itself).
        let blocker = blocking_building("Blocker", 99.8);
        let mut result = HotspotResult::new("Target".into(), Coord3::new(0.0, 100.0, 1.5), 6.0, true, vec![]);
        analyze(&mut result, &site, &[blocker], 12.0, 0.5);
        assert_eq!(result.blockers_count, 0);
    }
}
