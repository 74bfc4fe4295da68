// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The data model (spec §3): antennas, sites, buildings, OMEN points, and
//! the result types the driver produces. Everything here is a plain,
//! read-only-after-load value type; the mutation discipline ("sample
//! points are produced once; hotspot results are created once by the
//! driver, then mutated exactly once by the LOS pass") is enforced by
//! convention in [`crate::driver`] and [`crate::los`], not by the type
//! system.

use strum_macros::Display;

use crate::geometry::Coord3;

/// A single cellular antenna on a mast.
#[derive(Clone, Debug)]
pub struct Antenna {
    pub id: String,
    pub mast_id: String,
    pub position: Coord3,
    /// `[0, 360)`, 0 = north, clockwise.
    pub azimuth_deg: f64,
    pub tilt_nominal_deg: i32,
    pub tilt_from_deg: i32,
    pub tilt_to_deg: i32,
    pub erp_w: f64,
    pub freq_band_key: String,
    pub pattern_key: String,
    pub is_adaptive: bool,
    pub sub_arrays: u32,
}

impl Antenna {
    /// The inclusive set of integer-degree tilts to sweep: `{tilt_from,
    /// tilt_from + step, ..., tilt_to}`, or `{tilt_nominal}` if the range
    /// collapses to a point. `step_deg` is [`crate::config::EngineConfig::tilt_step_deg`];
    /// the final tilt is always included even if it falls off the
    /// step grid, so the worst case at the boundary is never missed.
    pub fn tilt_sweep(&self, step_deg: i32) -> Vec<i32> {
        if self.tilt_from_deg == self.tilt_to_deg {
            return vec![self.tilt_nominal_deg];
        }
        let step = step_deg.max(1);
        let mut tilts: Vec<i32> = (self.tilt_from_deg..=self.tilt_to_deg)
            .step_by(step as usize)
            .collect();
        if tilts.last() != Some(&self.tilt_to_deg) {
            tilts.push(self.tilt_to_deg);
        }
        tilts
    }

    /// Whether this antenna participates in computation at all.
    pub fn is_active(&self) -> bool {
        self.erp_w > 0.0
    }
}

/// A reference observation point ("OMEN" — Swiss NISV jargon for a
/// measured or predicted compliance point) with an optional expected
/// field value used only by the validator.
#[derive(Clone, Debug)]
pub struct OmenPoint {
    pub nr: String,
    pub position: Coord3,
    pub building_attenuation_db: f64,
    pub e_field_expected: Option<f64>,
}

/// A cellular site: a named location with a set of antennas and OMEN
/// points associated with it.
#[derive(Clone, Debug)]
pub struct Site {
    pub name: String,
    pub base_position: Coord3,
    pub antennas: Vec<Antenna>,
    pub omen_points: Vec<OmenPoint>,
}

impl Site {
    /// Antennas with `erp_w > 0`; the only ones the field kernel sees.
    pub fn active_antennas(&self) -> impl Iterator<Item = &Antenna> {
        self.antennas.iter().filter(|a| a.is_active())
    }
}

/// A planar (approximately) wall or roof surface. `vertices` must have at
/// least 3 entries; triangulation happens on demand via a fan from vertex
/// 0 (see [`crate::geometry::fan_triangulate`]).
#[derive(Clone, Debug)]
pub struct Surface {
    pub id: String,
    pub vertices: Vec<Coord3>,
    pub outward_normal: Option<Coord3>,
}

/// Whether a [`Surface`] is a wall or a roof, which governs whether the
/// facade sampler requires `|normal_z| <= 0.7` before emitting samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum SurfaceKind {
    Wall,
    Roof,
}

/// A building: an opaque external id (`egid`), plus its wall and roof
/// surfaces. Surfaces are topologically independent; the model does not
/// require a watertight mesh.
#[derive(Clone, Debug)]
pub struct Building {
    pub id: String,
    pub egid: String,
    pub walls: Vec<Surface>,
    pub roofs: Vec<Surface>,
}

impl Building {
    /// All vertices across every wall and roof surface.
    pub fn all_vertices(&self) -> impl Iterator<Item = &Coord3> {
        self.walls
            .iter()
            .chain(self.roofs.iter())
            .flat_map(|s| s.vertices.iter())
    }

    /// Every surface, tagged with its kind, in wall-then-roof order.
    pub fn surfaces(&self) -> impl Iterator<Item = (SurfaceKind, &Surface)> {
        self.walls
            .iter()
            .map(|s| (SurfaceKind::Wall, s))
            .chain(self.roofs.iter().map(|s| (SurfaceKind::Roof, s)))
    }
}

/// A single sample point on a building's exterior envelope, produced by
/// the facade sampler.
#[derive(Clone, Debug)]
pub struct FacadeSamplePoint {
    pub building_id: String,
    pub position: Coord3,
    /// Unit length.
    pub outward_normal: Coord3,
}

/// The field contribution of one antenna at one sample point, as computed
/// by the field kernel (spec Module D).
#[derive(Clone, Copy, Debug)]
pub struct AntennaContribution {
    pub e_v_per_m: f64,
    pub critical_tilt_deg: i32,
    pub distance_m: f64,
    pub h_atten_db: f64,
    pub v_atten_db: f64,
}

/// Line-of-sight status of a [`HotspotResult`], populated only after the
/// LOS pass runs (it only runs for points whose pre-LOS field already
/// exceeded the threshold).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum LosStatus {
    /// No blocking building was found along the worst-case segment from
    /// any contributing antenna. The default for points the LOS pass
    /// never examines.
    Los,
    /// At least one blocking building was found.
    Nlos,
}

impl Default for LosStatus {
    fn default() -> Self {
        LosStatus::Los
    }
}

/// The aggregated result for one sample point: total field, whether it
/// exceeds the configured threshold, and per-antenna detail.
///
/// Fields after `contributions` are populated only by the LOS pass, for
/// points whose pre-LOS `e_total_v_per_m` already exceeded the threshold;
/// for every other point they keep their defaults (`Los`, 0 blockers,
/// 0 dB, and `e_field_free == e_total_v_per_m`).
#[derive(Clone, Debug)]
pub struct HotspotResult {
    pub building_id: String,
    pub position: Coord3,
    pub e_total_v_per_m: f64,
    pub exceeds_limit: bool,
    pub contributions: Vec<AntennaContribution>,
    pub los_status: LosStatus,
    pub blockers_count: u32,
    pub building_attenuation_db: f64,
    /// The field before the LOS pass applied any blocker attenuation.
    /// Equal to `e_total_v_per_m` until the LOS pass runs.
    pub e_field_free: f64,
}

impl HotspotResult {
    /// Build a fresh, pre-LOS result. `e_field_free` starts out equal to
    /// the pre-LOS total, matching the "others keep defaults" rule.
    pub fn new(
        building_id: String,
        position: Coord3,
        e_total_v_per_m: f64,
        exceeds_limit: bool,
        contributions: Vec<AntennaContribution>,
    ) -> Self {
        Self {
            building_id,
            position,
            e_total_v_per_m,
            exceeds_limit,
            contributions,
            los_status: LosStatus::default(),
            blockers_count: 0,
            building_attenuation_db: 0.0,
            e_field_free: e_total_v_per_m,
        }
    }
}
