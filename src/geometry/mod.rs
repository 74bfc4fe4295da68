// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Geometry primitives shared by the facade sampler, the field kernel, the
//! LOS analyzer, and the OMEN-to-building assignment pass (spec Module A).

pub mod angles;
pub mod coord;
pub mod polygon;
pub mod raytri;

pub use angles::{az_el, azimuth_deg, elevation_deg, relative_angles, AzEl};
pub use coord::Coord3;
pub use polygon::{convex_hull, point_in_polygon, Point2};
pub use raytri::{fan_triangulate, intersect, ray_hits_segment, ray_hits_segment_with_margin, Triangle};

/// Compute a plane normal from the first three non-collinear vertices of
/// a surface, via cross product. Returns `None` if no such triple exists
/// in the first handful of vertices tried (i.e. the surface is
/// degenerate).
pub fn plane_normal(vertices: &[Coord3]) -> Option<Coord3> {
    if vertices.len() < 3 {
        return None;
    }
    let v0 = vertices[0];
    for i in 1..vertices.len() - 1 {
        let edge1 = vertices[i] - v0;
        let edge2 = vertices[i + 1] - v0;
        if let Some(n) = edge1.cross(&edge2).normalize() {
            return Some(n);
        }
    }
    None
}

/// Construct a planar `(u, v)` frame on a surface with the given normal,
/// matching the sampler's convention: `u = normalize(z x normal)` unless
/// that's near-zero (normal ~parallel to world z), in which case
/// `u = (1, 0, 0)`; then `v = normalize(normal x u)`.
pub fn plane_frame(normal: &Coord3) -> (Coord3, Coord3) {
    let z_axis = Coord3::new(0.0, 0.0, 1.0);
    let z_cross_n = z_axis.cross(normal);
    let u = if z_cross_n.length() >= 0.01 {
        z_cross_n.normalize().unwrap()
    } else {
        Coord3::new(1.0, 0.0, 0.0)
    };
    let v = normal
        .cross(&u)
        .normalize()
        .unwrap_or_else(|| Coord3::new(0.0, 1.0, 0.0));
    (u, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn plane_normal_of_horizontal_square() {
        let verts = vec![
            Coord3::new(0.0, 0.0, 10.0),
            Coord3::new(1.0, 0.0, 10.0),
            Coord3::new(1.0, 1.0, 10.0),
            Coord3::new(0.0, 1.0, 10.0),
        ];
        let n = plane_normal(&verts).unwrap();
        assert_abs_diff_eq!(n.h.abs(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn plane_normal_skips_collinear_leading_vertices() {
        let verts = vec![
            Coord3::new(0.0, 0.0, 0.0),
            Coord3::new(1.0, 0.0, 0.0),
            Coord3::new(2.0, 0.0, 0.0),
            Coord3::new(2.0, 1.0, 0.0),
        ];
        assert!(plane_normal(&verts).is_some());
    }

    #[test]
    fn plane_normal_of_degenerate_surface_is_none() {
        let verts = vec![
            Coord3::new(0.0, 0.0, 0.0),
            Coord3::new(1.0, 0.0, 0.0),
            Coord3::new(2.0, 0.0, 0.0),
        ];
        assert!(plane_normal(&verts).is_none());
    }

    #[test]
    fn plane_frame_is_orthonormal() {
        let normal = Coord3::new(1.0, 0.0, 0.0);
        let (u, v) = plane_frame(&normal);
        assert_abs_diff_eq!(u.dot(&normal), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(v.dot(&normal), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(u.dot(&v), 0.0, epsilon = 1e-9);
    }
}
