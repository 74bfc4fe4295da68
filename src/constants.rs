// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. The engine should do as many
calculations as possible in double precision before converting to a lower
precision, if it is ever required.
 */

pub use std::f64::consts::PI;

/// The regulatory installation limit this crate defaults to (Swiss NISV
/// "Anlagegrenzwert" for mobile telephony) \[V/m\].
pub const DEFAULT_THRESHOLD_V_PER_M: f64 = 5.0;

/// Default horizontal search radius around a site's base position \[m\].
pub const DEFAULT_SEARCH_RADIUS_M: f64 = 200.0;

/// Default facade sampling grid step \[m\].
pub const DEFAULT_SAMPLE_RESOLUTION_M: f64 = 1.0;

/// Near-field clamp applied to the antenna-to-point distance \[m\].
pub const DEFAULT_D_MIN_M: f64 = 0.1;

/// Additive attenuation applied per blocking building \[dB\] (ITU-R P.2040
/// "typical reinforced concrete, no windows" worst case).
pub const DEFAULT_PER_BLOCKER_DB: f64 = 12.0;

/// Ray-triangle hit tolerance used when walking a LOS segment \[m\].
pub const DEFAULT_BLOCKER_MARGIN_M: f64 = 0.5;

/// Default integer-degree step of the worst-case tilt sweep.
pub const DEFAULT_TILT_STEP_DEG: i32 = 1;

/// Default tolerance for the OMEN validator's pass/fail comparison \[%\].
pub const DEFAULT_OMEN_TOLERANCE_PCT: f64 = 10.0;

/// Fallback mast height offset above a site's base position, used by the
/// LOS analyzer when no antenna height exceeds it \[m\].
pub const DEFAULT_MAST_OFFSET_M: f64 = 3.0;

/// Epsilon used throughout the geometry primitives: Möller-Trumbore's
/// parallel-ray test, degenerate-triangle-area test, and 2D edge-denominator
/// guards in the point-in-polygon test.
pub const GEOMETRY_EPSILON: f64 = 1e-6;

/// Horizontal distance below which elevation is considered ill-defined and
/// resolved purely from the sign of the height difference.
pub const NEAR_ZERO_HORIZONTAL_DISTANCE_M: f64 = 1e-3;

/// Warning threshold for a building's implied per-floor height \[m\]; above
/// this, [`crate::assignment::analyze_building_heights`] flags the building.
pub const DEFAULT_FLOOR_HEIGHT_WARNING_M: f64 = 3.2;

/// The floor height assumed when estimating a building's storey count from
/// its total height \[m\].
pub const ASSUMED_FLOOR_HEIGHT_M: f64 = 3.0;
