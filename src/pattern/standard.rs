// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Analytical ITU-R F.1336-5 / 3GPP TR 36.814 sector antenna pattern,
//! used as a fallback when no manufacturer pattern table is available for
//! an `(antenna_type, freq_band)` pair (spec Module M).
//!
//! The model is deliberately conservative: its attenuation is everywhere
//! less than or equal to a typical real sector antenna's, so a compliance
//! result computed against it is a safe upper bound.

use crate::error::PatternError;
use crate::geometry::angles::normalize_neg180_180;
use crate::pattern::AttenuationPattern;

/// Parameters of one analytical sector pattern: a 3 dB beamwidth and a
/// maximum attenuation, independently for azimuth and elevation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StandardPattern {
    pub azimuth_3db_beamwidth_deg: f64,
    pub azimuth_max_attenuation_db: f64,
    pub elevation_3db_beamwidth_deg: f64,
    pub elevation_max_attenuation_db: f64,
}

impl StandardPattern {
    /// `65°/7°` sector, the common LTE/4G baseline (3GPP TR 36.814
    /// Section A.2.1.1).
    pub const SECTOR_65_7: StandardPattern = StandardPattern {
        azimuth_3db_beamwidth_deg: 65.0,
        azimuth_max_attenuation_db: 25.0,
        elevation_3db_beamwidth_deg: 7.0,
        elevation_max_attenuation_db: 30.0,
    };

    /// `33°/5°` narrow beam, a 5G NR beamforming worst case (3GPP
    /// TR 38.901 Table 7.3-1).
    pub const SECTOR_33_5_5G: StandardPattern = StandardPattern {
        azimuth_3db_beamwidth_deg: 33.0,
        azimuth_max_attenuation_db: 25.0,
        elevation_3db_beamwidth_deg: 5.0,
        elevation_max_attenuation_db: 30.0,
    };

    /// `90°/7°` sector (ITU-R F.1336-5).
    pub const SECTOR_90_7: StandardPattern = StandardPattern {
        azimuth_3db_beamwidth_deg: 90.0,
        azimuth_max_attenuation_db: 25.0,
        elevation_3db_beamwidth_deg: 7.0,
        elevation_max_attenuation_db: 30.0,
    };

    /// `33°/7°` narrow beam (ITU-R F.1336-5).
    pub const SECTOR_33_7: StandardPattern = StandardPattern {
        azimuth_3db_beamwidth_deg: 33.0,
        azimuth_max_attenuation_db: 25.0,
        elevation_3db_beamwidth_deg: 7.0,
        elevation_max_attenuation_db: 30.0,
    };

    /// Omnidirectional: no horizontal attenuation at all.
    pub const OMNI: StandardPattern = StandardPattern {
        azimuth_3db_beamwidth_deg: 360.0,
        azimuth_max_attenuation_db: 0.0,
        elevation_3db_beamwidth_deg: 7.0,
        elevation_max_attenuation_db: 30.0,
    };

    /// A sector antenna with caller-chosen beamwidths and the standard
    /// 25/30 dB maxima.
    pub fn sector(azimuth_beamwidth_deg: f64, elevation_beamwidth_deg: f64) -> Result<Self, PatternError> {
        if !(azimuth_beamwidth_deg > 0.0 && azimuth_beamwidth_deg <= 360.0) {
            return Err(PatternError::InvalidBeamwidth {
                antenna_id: "standard-sector".to_string(),
                value: azimuth_beamwidth_deg,
            });
        }
        Ok(Self {
            azimuth_3db_beamwidth_deg: azimuth_beamwidth_deg,
            azimuth_max_attenuation_db: 25.0,
            elevation_3db_beamwidth_deg: elevation_beamwidth_deg,
            elevation_max_attenuation_db: 30.0,
        })
    }

    /// Look up a named preset by the identifier a site configuration would
    /// carry (e.g. "sector_65_7", "omni").
    pub fn from_preset(name: &str) -> Result<Self, PatternError> {
        match name {
            "sector_65_7" => Ok(Self::SECTOR_65_7),
            "sector_33_5_5g" => Ok(Self::SECTOR_33_5_5G),
            "sector_90_7" => Ok(Self::SECTOR_90_7),
            "sector_33_7" => Ok(Self::SECTOR_33_7),
            "omni" => Ok(Self::OMNI),
            other => Err(PatternError::UnknownPreset {
                preset: other.to_string(),
            }),
        }
    }
}

impl AttenuationPattern for StandardPattern {
    fn h_attenuation_db(&self, rel_az_deg: f64) -> f64 {
        let phi = normalize_neg180_180(rel_az_deg);
        (12.0 * (phi / self.azimuth_3db_beamwidth_deg).powi(2))
            .min(self.azimuth_max_attenuation_db)
    }

    fn v_attenuation_db(&self, rel_el_deg: f64) -> f64 {
        // `rel_el_deg` already has the electrical tilt subtracted out by
        // the caller (crate::geometry::relative_angles), so no further
        // downtilt adjustment happens here.
        (12.0 * (rel_el_deg / self.elevation_3db_beamwidth_deg).powi(2))
            .min(self.elevation_max_attenuation_db)
    }
}
