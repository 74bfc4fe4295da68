// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! OMEN-to-building assignment (spec Module I) and building-height
//! analytics (spec-expansion Module O): both operate on the same 2D
//! footprint + height-range view of a building that the OMEN-to-building
//! gate needs, so they're grouped in one file.

use crate::constants::{ASSUMED_FLOOR_HEIGHT_M, DEFAULT_FLOOR_HEIGHT_WARNING_M};
use crate::diagnostics::{Diagnostics, Issue};
use crate::domain::{Building, OmenPoint};
use crate::geometry::{convex_hull, point_in_polygon, Coord3, Point2};

const HEIGHT_GATE_MARGIN_M: f64 = 0.5;

/// The 2D convex-hull footprint and height range of one building, derived
/// once and reused for every OMEN candidate check against it.
struct BuildingFootprint<'a> {
    building: &'a Building,
    hull: Vec<Point2>,
    min_h: f64,
    max_h: f64,
}

fn footprint(building: &Building) -> Option<BuildingFootprint<'_>> {
    let mut seen: Vec<Point2> = Vec::new();
    let mut min_h = f64::INFINITY;
    let mut max_h = f64::NEG_INFINITY;
    for v in building.all_vertices() {
        min_h = min_h.min(v.h);
        max_h = max_h.max(v.h);
        let p = Point2::new(v.e, v.n);
        if !seen.iter().any(|q| (q.x - p.x).abs() < 1e-9 && (q.y - p.y).abs() < 1e-9) {
            seen.push(p);
        }
    }
    if seen.len() < 3 {
        return None;
    }
    let hull = convex_hull(&seen);
    let hull = if hull.len() >= 3 { hull } else { seen };
    Some(BuildingFootprint {
        building,
        hull,
        min_h,
        max_h,
    })
}

impl BuildingFootprint<'_> {
    fn contains(&self, position: &Coord3) -> bool {
        let height_ok = position.h >= self.min_h - HEIGHT_GATE_MARGIN_M
            && position.h <= self.max_h + HEIGHT_GATE_MARGIN_M;
        if !height_ok {
            return false;
        }
        point_in_polygon(Point2::new(position.e, position.n), &self.hull)
    }
}

/// Assign each OMEN point to the first building whose footprint and
/// height range contain it. Returns, for each input OMEN (in order), the
/// matched building id or `None`; unmatched OMENs are also recorded as
/// [`Issue::UnassignedOmen`] in `diagnostics`.
pub fn assign_omen_to_buildings<'a>(
    omen_points: &[OmenPoint],
    buildings: &'a [Building],
    diagnostics: &mut Diagnostics,
) -> Vec<Option<&'a str>> {
    let footprints: Vec<BuildingFootprint> = buildings.iter().filter_map(footprint).collect();

    omen_points
        .iter()
        .map(|omen| {
            let owner = footprints
                .iter()
                .find(|fp| fp.contains(&omen.position))
                .map(|fp| fp.building.id.as_str());
            if owner.is_none() {
                diagnostics.push(Issue::UnassignedOmen {
                    omen_id: omen.nr.clone(),
                });
            }
            owner
        })
        .collect()
}

/// A building's height range and estimated storey count (spec-expansion
/// Module O), derived from its total vertical extent.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildingHeightAnalysis {
    pub building_id: String,
    pub min_z: f64,
    pub max_z: f64,
    pub height_m: f64,
    pub estimated_floors: u32,
    pub floor_height_m: f64,
    /// `true` if `floor_height_m` exceeds
    /// [`DEFAULT_FLOOR_HEIGHT_WARNING_M`] — a signal that a fixed-storey
    /// regulatory assumption elsewhere in the pipeline may be
    /// under-counting this building's real extent.
    pub has_high_ceilings: bool,
}

/// Estimate storey count and height range for every building, warning via
/// `diagnostics` (per building) when the implied per-floor height looks
/// implausible (taller than [`DEFAULT_FLOOR_HEIGHT_WARNING_M`]).
///
/// Buildings with no vertices at all (shouldn't occur given the loader
/// contract, but not an invariant this function enforces) are silently
/// skipped rather than producing a nonsensical height range.
pub fn analyze_building_heights(buildings: &[Building], diagnostics: &mut Diagnostics) -> Vec<BuildingHeightAnalysis> {
    buildings
        .iter()
        .filter_map(|building| analyze_one_building_height(building, diagnostics))
        .collect()
}

fn analyze_one_building_height(building: &Building, diagnostics: &mut Diagnostics) -> Option<BuildingHeightAnalysis> {
    let mut min_z = f64::INFINITY;
    let mut max_z = f64::NEG_INFINITY;
    for v in building.all_vertices() {
        min_z = min_z.min(v.h);
        max_z = max_z.max(v.h);
    }
    if !min_z.is_finite() || !max_z.is_finite() {
        return None;
    }
    let height_m = (max_z - min_z).max(0.0);
    let estimated_floors = (height_m / ASSUMED_FLOOR_HEIGHT_M).floor().max(1.0) as u32;
    let floor_height_m = height_m / estimated_floors as f64;
    let has_high_ceilings = floor_height_m > DEFAULT_FLOOR_HEIGHT_WARNING_M;

    if has_high_ceilings {
        diagnostics.push(Issue::ImplausibleFloorHeight {
            building_id: building.id.clone(),
            estimated_m: floor_height_m,
        });
    }

    Some(BuildingHeightAnalysis {
        building_id: building.id.clone(),
        min_z,
        max_z,
        height_m,
        estimated_floors,
        floor_height_m,
        has_high_ceilings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Surface;

    fn box_building(id: &str, e0: f64, n0: f64, size: f64, height: f64) -> Building {
        let wall = Surface {
            id: format!("{id}-W1"),
            vertices: vec![
                Coord3::new(e0, n0, 0.0),
                Coord3::new(e0 + size, n0, 0.0),
                Coord3::new(e0 + size, n0 + size, 0.0),
                Coord3::new(e0, n0 + size, 0.0),
            ],
            outward_normal: None,
        };
        let roof = Surface {
            id: format!("{id}-R1"),
            vertices: vec![
                Coord3::new(e0, n0, height),
                Coord3::new(e0 + size, n0, height),
                Coord3::new(e0 + size, n0 + size, height),
                Coord3::new(e0, n0 + size, height),
            ],
            outward_normal: None,
        };
        Building {
            id: id.to_string(),
            egid: String::new(),
            walls: vec![wall],
            roofs: vec![roof],
        }
    }

    #[test]
    fn omen_inside_footprint_and_height_range_is_assigned() {
        let building = box_building("B1", 0.0, 0.0, 10.0, 15.0);
        let omen = OmenPoint {
            nr: "O1".into(),
            position: Coord3::new(5.0, 5.0, 6.0),
            building_attenuation_db: 0.0,
            e_field_expected: None,
        };
        let mut diagnostics = Diagnostics::new();
        let owners = assign_omen_to_buildings(&[omen], std::slice::from_ref(&building), &mut diagnostics);
        assert_eq!(owners, vec![Some("B1")]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn omen_outside_every_footprint_is_unassigned() {
        let building = box_building("B1", 0.0, 0.0, 10.0, 15.0);
        let omen = OmenPoint {
            nr: "O2".into(),
            position: Coord3::new(1000.0, 1000.0, 6.0),
            building_attenuation_db: 0.0,
            e_field_expected: None,
        };
        let mut diagnostics = Diagnostics::new();
        let owners = assign_omen_to_buildings(&[omen], std::slice::from_ref(&building), &mut diagnostics);
        assert_eq!(owners, vec![None]);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn omen_above_height_range_by_more_than_margin_is_unassigned() {
        let building = box_building("B1", 0.0, 0.0, 10.0, 15.0);
        let omen = OmenPoint {
            nr: "O3".into(),
            position: Coord3::new(5.0, 5.0, 100.0),
            building_attenuation_db: 0.0,
            e_field_expected: None,
        };
        let mut diagnostics = Diagnostics::new();
        let owners = assign_omen_to_buildings(&[omen], std::slice::from_ref(&building), &mut diagnostics);
        assert_eq!(owners, vec![None]);
    }

    #[test]
    fn height_analysis_reports_plausible_storeys() {
        let building = box_building("B1", 0.0, 0.0, 10.0, 15.0);
        let mut diagnostics = Diagnostics::new();
        let analyses = analyze_building_heights(std::slice::from_ref(&building), &mut diagnostics);
        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].building_id, "B1");
        assert_eq!(analyses[0].min_z, 0.0);
        assert_eq!(analyses[0].max_z, 15.0);
        assert_eq!(analyses[0].estimated_floors, 5);
        assert!(!analyses[0].has_high_ceilings);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn implausible_floor_height_is_flagged() {
        // A 4m-tall "building" with only one assumed storey: 4m/floor.
        let building = box_building("B1", 0.0, 0.0, 10.0, 4.0);
        let mut diagnostics = Diagnostics::new();
        let analyses = analyze_building_heights(std::slice::from_ref(&building), &mut diagnostics);
        assert!(analyses[0].has_high_ceilings);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn floor_count_truncates_rather_than_rounds() {
        // 11m / 3m = 3.667: must floor to 3 storeys, not round up to 4.
        let building = box_building("B1", 0.0, 0.0, 10.0, 11.0);
        let mut diagnostics = Diagnostics::new();
        let analyses = analyze_building_heights(std::slice::from_ref(&building), &mut diagnostics);
        assert_eq!(analyses[0].estimated_floors, 3);
        assert!((analyses[0].floor_height_m - 11.0 / 3.0).abs() < 1e-9);
        assert!(analyses[0].has_high_ceilings);
        assert_eq!(diagnostics.len(), 1);
    }
}
