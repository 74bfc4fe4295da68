// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! 2D polygon tests: point-in-polygon and convex hull, both operating on
//! `(e, n)` projections of a planar (or footprint) vertex set.

/// A 2D point, used here purely for polygon tests — not to be confused
/// with [`crate::geometry::coord::Coord3`], which always carries a third
/// component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Ray-casting point-in-polygon test with a horizontal ray cast in the
/// `+x` direction.
///
/// Edge cases are resolved consistently (same polygon, same point always
/// gives the same answer) by using a half-open edge test
/// (`(yi > y) != (yj > y)`), which is the standard trick for not
/// double-counting vertices the ray passes exactly through.
pub fn point_in_polygon(point: Point2, vertices: &[Point2]) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let n = vertices.len();
    let mut j = n - 1;
    for i in 0..n {
        let vi = vertices[i];
        let vj = vertices[j];
        let crosses = (vi.y > point.y) != (vj.y > point.y);
        if crosses {
            let x_intersect = (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x;
            if point.x < x_intersect {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Andrew's monotone-chain convex hull. Returns vertices in
/// counter-clockwise order, deduplicated. Falls back to the (deduplicated,
/// but otherwise as given) input set if fewer than 3 distinct points are
/// present, since a hull isn't meaningful below a triangle.
pub fn convex_hull(points: &[Point2]) -> Vec<Point2> {
    let mut pts = points.to_vec();
    pts.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap().then(a.y.partial_cmp(&b.y).unwrap()));
    pts.dedup_by(|a, b| (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9);

    if pts.len() < 3 {
        return pts;
    }

    fn cross(o: Point2, a: Point2, b: Point2) -> f64 {
        (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
    }

    let mut lower: Vec<Point2> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2
            && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0
        {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point2> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2
            && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0
        {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}
