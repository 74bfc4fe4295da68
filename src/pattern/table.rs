// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tabulated antenna radiation patterns (spec Module B): two independent
//! cyclic curves, horizontal and vertical, each linearly interpolated
//! between measured samples.

use crate::error::PatternError;
use crate::geometry::angles::normalize_0_360;
use crate::pattern::AttenuationPattern;

/// One cyclic, sorted sample curve: angles in `[0, 360)` (horizontal) or a
/// full 360 degree cycle about the beam axis (vertical), paired with
/// gains in the same order.
#[derive(Clone, Debug)]
struct Curve {
    angles_deg: Vec<f64>,
    gains_db: Vec<f64>,
    max_gain_db: f64,
}

impl Curve {
    fn new(antenna_id: &str, angles_deg: Vec<f64>, gains_db: Vec<f64>) -> Result<Self, PatternError> {
        if angles_deg.is_empty() {
            return Err(PatternError::EmptyTable {
                antenna_id: antenna_id.to_string(),
            });
        }
        for i in 1..angles_deg.len() {
            if angles_deg[i] <= angles_deg[i - 1] {
                return Err(PatternError::UnsortedAngles {
                    antenna_id: antenna_id.to_string(),
                    index: i,
                });
            }
        }
        let max_gain_db = gains_db.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Ok(Self {
            angles_deg,
            gains_db,
            max_gain_db,
        })
    }

    /// Linear interpolation between neighbouring samples, treating the
    /// curve as cyclic over 360 degrees. `angle` must already be
    /// normalised to `[0, 360)`.
    fn interpolate_cyclic(&self, angle: f64) -> f64 {
        let n = self.angles_deg.len();
        if n == 1 {
            return self.gains_db[0];
        }

        // Find the first sample angle >= `angle`.
        match self
            .angles_deg
            .iter()
            .position(|&a| a >= angle)
        {
            None => {
                // angle is past the last sample; wrap to the first.
                let lo_idx = n - 1;
                let hi_idx = 0;
                let lo = self.angles_deg[lo_idx];
                let hi = self.angles_deg[hi_idx] + 360.0;
                self.lerp(lo, self.gains_db[lo_idx], hi, self.gains_db[hi_idx], angle)
            }
            Some(0) if self.angles_deg[0] == angle => self.gains_db[0],
            Some(0) => {
                // angle is before the first sample; wrap to the last.
                let lo_idx = n - 1;
                let hi_idx = 0;
                let lo = self.angles_deg[lo_idx] - 360.0;
                let hi = self.angles_deg[hi_idx];
                self.lerp(lo, self.gains_db[lo_idx], hi, self.gains_db[hi_idx], angle)
            }
            Some(hi_idx) => {
                let lo_idx = hi_idx - 1;
                self.lerp(
                    self.angles_deg[lo_idx],
                    self.gains_db[lo_idx],
                    self.angles_deg[hi_idx],
                    self.gains_db[hi_idx],
                    angle,
                )
            }
        }
    }

    /// Nearest-edge saturation: used by the vertical curve's out-of-sample
    /// handling is actually the same cyclic interpolation (the vertical
    /// curve is a full 360 degree cycle, so there is no true
    /// "out-of-sample" region) — kept separate in case a future curve
    /// genuinely doesn't span the full circle.
    fn interpolate_saturating(&self, angle: f64) -> f64 {
        if angle <= self.angles_deg[0] {
            return self.gains_db[0];
        }
        if angle >= *self.angles_deg.last().unwrap() {
            return *self.gains_db.last().unwrap();
        }
        self.interpolate_cyclic(angle)
    }

    fn lerp(&self, x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
        if (x1 - x0).abs() < f64::EPSILON {
            return y0;
        }
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}

/// A tabulated antenna pattern: independent horizontal and vertical
/// cyclic curves. Read-only after construction and safe to share across
/// worker threads (`Sync` falls out of only containing owned `Vec<f64>`).
#[derive(Clone, Debug)]
pub struct PatternTable {
    antenna_id: String,
    horizontal: Curve,
    vertical: Curve,
}

impl PatternTable {
    /// Build a pattern table from raw sample arrays. Both curves must be
    /// sorted ascending and non-empty; see [`PatternError`] for the
    /// specific validation failures.
    pub fn new(
        antenna_id: impl Into<String>,
        h_angles: Vec<f64>,
        h_gains: Vec<f64>,
        v_angles: Vec<f64>,
        v_gains: Vec<f64>,
    ) -> Result<Self, PatternError> {
        let antenna_id = antenna_id.into();
        let horizontal = Curve::new(&antenna_id, h_angles, h_gains)?;
        let vertical = Curve::new(&antenna_id, v_angles, v_gains)?;
        Ok(Self {
            antenna_id,
            horizontal,
            vertical,
        })
    }

    pub fn antenna_id(&self) -> &str {
        &self.antenna_id
    }
}

impl AttenuationPattern for PatternTable {
    fn h_attenuation_db(&self, rel_az_deg: f64) -> f64 {
        let angle = normalize_0_360(rel_az_deg);
        let gain = self.horizontal.interpolate_cyclic(angle);
        (self.horizontal.max_gain_db - gain).max(0.0)
    }

    fn v_attenuation_db(&self, rel_el_deg: f64) -> f64 {
        let angle = normalize_0_360(rel_el_deg);
        let gain = self.vertical.interpolate_saturating(angle);
        (self.vertical.max_gain_db - gain).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn four_point_curve() -> (Vec<f64>, Vec<f64>) {
        (
            vec![0.0, 90.0, 180.0, 270.0],
            vec![0.0, -3.0, -10.0, -3.0],
        )
    }

    #[test]
    fn h_attenuation_at_peak_is_zero() {
        let (h_angles, h_gains) = four_point_curve();
        let (v_angles, v_gains) = four_point_curve();
        let table = PatternTable::new("A1", h_angles, h_gains, v_angles, v_gains).unwrap();
        assert_abs_diff_eq!(table.h_attenuation_db(0.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn h_attenuation_interpolates_between_samples() {
        let (h_angles, h_gains) = four_point_curve();
        let (v_angles, v_gains) = four_point_curve();
        let table = PatternTable::new("A1", h_angles, h_gains, v_angles, v_gains).unwrap();
        // Halfway between 0 (gain 0) and 90 (gain -3): gain -1.5, atten 1.5.
        assert_abs_diff_eq!(table.h_attenuation_db(45.0), 1.5, epsilon = 1e-9);
    }

    #[test]
    fn h_attenuation_wraps_past_last_sample() {
        let (h_angles, h_gains) = four_point_curve();
        let (v_angles, v_gains) = four_point_curve();
        let table = PatternTable::new("A1", h_angles, h_gains, v_angles, v_gains).unwrap();
        // Between 270 (gain -3) and 360/0 (gain 0): at 315, gain -1.5, atten 1.5.
        assert_abs_diff_eq!(table.h_attenuation_db(315.0), 1.5, epsilon = 1e-9);
    }

    #[test]
    fn attenuation_is_never_negative() {
        let (h_angles, h_gains) = four_point_curve();
        let (v_angles, v_gains) = four_point_curve();
        let table = PatternTable::new("A1", h_angles, h_gains, v_angles, v_gains).unwrap();
        for deg in (0..360).step_by(7) {
            assert!(table.h_attenuation_db(deg as f64) >= 0.0);
            assert!(table.v_attenuation_db(deg as f64) >= 0.0);
        }
    }

    #[test]
    fn unsorted_angles_are_rejected() {
        let result = PatternTable::new(
            "A1",
            vec![0.0, 90.0, 45.0],
            vec![0.0, -1.0, -2.0],
            vec![0.0],
            vec![0.0],
        );
        assert!(matches!(result, Err(PatternError::UnsortedAngles { .. })));
    }

    #[test]
    fn empty_curve_is_rejected() {
        let result = PatternTable::new("A1", vec![], vec![], vec![0.0], vec![0.0]);
        assert!(matches!(result, Err(PatternError::EmptyTable { .. })));
    }
}
