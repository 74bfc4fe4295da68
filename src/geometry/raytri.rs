// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Ray-triangle intersection and polygon triangulation, used by the LOS
//! analyzer to decide whether a building blocks a line-of-sight segment.

use crate::constants::GEOMETRY_EPSILON;
use crate::geometry::coord::Coord3;

/// A triangle given by its three world-space vertices.
#[derive(Clone, Copy, Debug)]
pub struct Triangle {
    pub v0: Coord3,
    pub v1: Coord3,
    pub v2: Coord3,
}

/// Möller-Trumbore ray-triangle intersection in double precision.
///
/// `origin` and `direction` describe the ray; `direction` need not be
/// normalized, but the returned `t` is then in units of `direction`'s
/// length, so callers that want a hit-test against a segment of known
/// world length must pass a normalized direction and compare `t` to that
/// length directly (this is what [`ray_hits_segment`] does).
///
/// Returns `None` for a miss, a ray parallel to the triangle's plane, or
/// a degenerate (near-zero-area) triangle.
pub fn intersect(origin: &Coord3, direction: &Coord3, tri: &Triangle) -> Option<f64> {
    let edge1 = tri.v1 - tri.v0;
    let edge2 = tri.v2 - tri.v0;
    let pvec = direction.cross(&edge2);
    let det = edge1.dot(&pvec);
    if det.abs() < GEOMETRY_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let tvec = *origin - tri.v0;
    let u = tvec.dot(&pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let qvec = tvec.cross(&edge1);
    let v = direction.dot(&qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(&qvec) * inv_det;
    Some(t)
}

/// `true` if the segment from `origin` to `origin + direction` (i.e.
/// `direction`'s length is the segment length) crosses `tri`, requiring
/// `0 < t <= segment_length`.
pub fn ray_hits_segment(origin: &Coord3, direction: &Coord3, tri: &Triangle) -> bool {
    ray_hits_segment_with_margin(origin, direction, tri, 0.0)
}

/// As [`ray_hits_segment`], but shrinks the valid hit range by `margin_m`
/// at both ends of the segment: a hit counts only for
/// `margin_m < t <= segment_length - margin_m`. This keeps a triangle
/// right at the mast end (the antenna's own mast structure) or the target
/// end (the facade point's own building, already excluded by id but close
/// to the surface being sampled) from being mistaken for an intervening
/// blocker because of floating-point noise in the input geometry.
pub fn ray_hits_segment_with_margin(
    origin: &Coord3,
    direction: &Coord3,
    tri: &Triangle,
    margin_m: f64,
) -> bool {
    let segment_length = direction.length();
    if segment_length < f64::EPSILON {
        return false;
    }
    let margin_m = margin_m.max(0.0).min(segment_length / 2.0);
    let unit_dir = *direction / segment_length;
    match intersect(origin, &unit_dir, tri) {
        Some(t) => t > margin_m && t <= segment_length - margin_m,
        None => false,
    }
}

/// Fan-triangulate a polygon from its vertex 0: `(v0,v1,v2), (v0,v2,v3),
/// ...`. Triangles whose area is below [`GEOMETRY_EPSILON`] are skipped
/// as degenerate.
pub fn fan_triangulate(vertices: &[Coord3]) -> Vec<Triangle> {
    if vertices.len() < 3 {
        return Vec::new();
    }
    let v0 = vertices[0];
    let mut triangles = Vec::with_capacity(vertices.len().saturating_sub(2));
    for i in 1..vertices.len() - 1 {
        let v1 = vertices[i];
        let v2 = vertices[i + 1];
        let area2 = (v1 - v0).cross(&(v2 - v0)).length();
        if area2 < GEOMETRY_EPSILON {
            continue;
        }
        triangles.push(Triangle { v0, v1, v2 });
    }
    triangles
}
