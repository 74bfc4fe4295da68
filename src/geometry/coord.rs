// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Projected coordinates and the vector algebra the rest of the geometry
//! module is built from.

use std::ops::{Add, Div, Mul, Sub};

/// An ordered triple `(e, n, h)` in a single projected coordinate system.
/// `e` is easting, `n` is northing, `h` is height above datum, all in
/// metres. The core never transforms between coordinate systems; callers
/// are responsible for projecting everything consistently before this
/// point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Coord3 {
    pub e: f64,
    pub n: f64,
    pub h: f64,
}

impl Coord3 {
    pub fn new(e: f64, n: f64, h: f64) -> Self {
        Self { e, n, h }
    }

    /// Euclidean distance to another point, in 3D.
    pub fn distance_3d(&self, other: &Self) -> f64 {
        (*self - *other).length()
    }

    /// Euclidean distance to another point, ignoring height.
    pub fn distance_2d(&self, other: &Self) -> f64 {
        let de = self.e - other.e;
        let dn = self.n - other.n;
        (de * de + dn * dn).sqrt()
    }

    pub fn length(&self) -> f64 {
        (self.e * self.e + self.n * self.n + self.h * self.h).sqrt()
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.e * other.e + self.n * other.n + self.h * other.h
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self {
            e: self.n * other.h - self.h * other.n,
            n: self.h * other.e - self.e * other.h,
            h: self.e * other.n - self.n * other.e,
        }
    }

    /// Unit vector in the same direction, or `None` if the vector is
    /// (numerically) zero.
    pub fn normalize(&self) -> Option<Self> {
        let len = self.length();
        if len < f64::EPSILON {
            None
        } else {
            Some(*self / len)
        }
    }
}

impl Add for Coord3 {
    type Output = Coord3;
    fn add(self, rhs: Self) -> Self {
        Self {
            e: self.e + rhs.e,
            n: self.n + rhs.n,
            h: self.h + rhs.h,
        }
    }
}

impl Sub for Coord3 {
    type Output = Coord3;
    fn sub(self, rhs: Self) -> Self {
        Self {
            e: self.e - rhs.e,
            n: self.n - rhs.n,
            h: self.h - rhs.h,
        }
    }
}

impl Mul<f64> for Coord3 {
    type Output = Coord3;
    fn mul(self, rhs: f64) -> Self {
        Self {
            e: self.e * rhs,
            n: self.n * rhs,
            h: self.h * rhs,
        }
    }
}

impl Div<f64> for Coord3 {
    type Output = Coord3;
    fn div(self, rhs: f64) -> Self {
        Self {
            e: self.e / rhs,
            n: self.n / rhs,
            h: self.h / rhs,
        }
    }
}
