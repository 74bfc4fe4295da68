// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The facade sampler (spec Module C): rasterize polygonal wall/roof
//! surfaces into world-space sample points with outward normals, then
//! filter to the configured search radius.
//!
//! Also covers virtual OMEN sample points (spec-expansion Module N): a
//! site's OMEN points are turned into the same
//! [`crate::domain::FacadeSamplePoint`] shape so the aggregator and driver
//! don't need a separate code path for them.

use crate::diagnostics::{Diagnostics, Issue};
use crate::domain::{Building, FacadeSamplePoint, OmenPoint, SurfaceKind};
use crate::geometry::{plane_frame, plane_normal, point_in_polygon, Coord3, Point2};

/// Sample every wall and roof surface of `building` at `resolution_m`,
/// without yet applying the search-radius filter (that's
/// [`filter_by_radius`]'s job, run once across every building's points so
/// it only has to happen a single time per driver run).
pub fn sample_building(building: &Building, resolution_m: f64, diagnostics: &mut Diagnostics) -> Vec<FacadeSamplePoint> {
    let mut points = Vec::new();
    for (kind, surface) in building.surfaces() {
        if surface.vertices.len() < 3 {
            diagnostics.push(Issue::DegenerateGeometry {
                building_id: building.id.clone(),
                detail: format!("surface {} has fewer than 3 vertices", surface.id),
            });
            continue;
        }

        let normal = match plane_normal(&surface.vertices) {
            Some(n) => n,
            None => {
                diagnostics.push(Issue::DegenerateGeometry {
                    building_id: building.id.clone(),
                    detail: format!("surface {} vertices are collinear", surface.id),
                });
                continue;
            }
        };

        if kind == SurfaceKind::Wall && normal.h.abs() > 0.7 {
            continue;
        }

        points.extend(sample_surface(
            &building.id,
            &surface.vertices,
            normal,
            resolution_m,
        ));
    }
    points
}

fn sample_surface(
    building_id: &str,
    vertices: &[Coord3],
    normal: Coord3,
    resolution_m: f64,
) -> Vec<FacadeSamplePoint> {
    let (u, v) = plane_frame(&normal);
    let origin = vertices[0];

    let projected: Vec<Point2> = vertices
        .iter()
        .map(|p| {
            let rel = *p - origin;
            Point2::new(rel.dot(&u), rel.dot(&v))
        })
        .collect();

    let min_u = projected.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_u = projected.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_v = projected.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_v = projected.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    let mut points = Vec::new();
    let mut pu = min_u + resolution_m / 2.0;
    while pu < max_u {
        let mut pv = min_v + resolution_m / 2.0;
        while pv < max_v {
            let candidate = Point2::new(pu, pv);
            if point_in_polygon(candidate, &projected) {
                let world = origin + u * pu + v * pv;
                points.push(FacadeSamplePoint {
                    building_id: building_id.to_string(),
                    position: world,
                    outward_normal: normal,
                });
            }
            pv += resolution_m;
        }
        pu += resolution_m;
    }
    points
}

/// The four cardinal outward normals a virtual OMEN point is sampled
/// with, in a fixed order (north, east, south, west) so that
/// `synthetic_building_id` suffixes are deterministic across runs.
const VIRTUAL_OMEN_NORMALS: [(&str, Coord3); 4] = [
    ("n", Coord3 { e: 0.0, n: 1.0, h: 0.0 }),
    ("e", Coord3 { e: 1.0, n: 0.0, h: 0.0 }),
    ("s", Coord3 { e: 0.0, n: -1.0, h: 0.0 }),
    ("w", Coord3 { e: -1.0, n: 0.0, h: 0.0 }),
];

/// The synthetic building id a virtual OMEN point at `omen_nr` is tagged
/// with. Exposed so callers (and the LOS pass, which excludes a result's
/// own building) can recognise virtual points without re-deriving the id.
pub fn virtual_omen_building_id(omen_nr: &str) -> String {
    format!("virtual-omen-{omen_nr}")
}

/// Synthesize four virtual facade points (spec-expansion Module N) at
/// each OMEN point in `omen_points` whose corresponding entry in
/// `assignments` is `None` — i.e. it couldn't be matched to any real
/// building by [`crate::assignment::assign_omen_to_buildings`].
///
/// This covers sites where a mast is declared against a building that
/// doesn't yet exist in the loaded geometry (vacant lot, future
/// construction): rather than silently dropping the OMEN from the
/// compliance scan, four points are sampled at its own position with the
/// four cardinal outward normals, tagged with a synthetic building id
/// derived from the OMEN number, and run through the same aggregator and
/// LOS pass as ordinary facade points. There is no owning building to
/// exclude from the LOS blocker search for these points, since the
/// synthetic id never matches a real building's id.
pub fn synthesize_virtual_omen_points(
    omen_points: &[OmenPoint],
    assignments: &[Option<&str>],
) -> Vec<FacadeSamplePoint> {
    omen_points
        .iter()
        .zip(assignments.iter())
        .filter(|(_, assignment)| assignment.is_none())
        .flat_map(|(omen, _)| {
            let building_id = virtual_omen_building_id(&omen.nr);
            VIRTUAL_OMEN_NORMALS.iter().map(move |(_, normal)| FacadeSamplePoint {
                building_id: building_id.clone(),
                position: omen.position,
                outward_normal: *normal,
            })
        })
        .collect()
}

/// Keep only the points whose horizontal distance from `base_position` is
/// within `radius_m`.
pub fn filter_by_radius(
    points: Vec<FacadeSamplePoint>,
    base_position: &Coord3,
    radius_m: f64,
) -> Vec<FacadeSamplePoint> {
    points
        .into_iter()
        .filter(|p| base_position.distance_2d(&p.position) <= radius_m)
        .collect()
}
