// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Propagation and aggregation engine for cellular-site electric-field
//! compliance assessment (Swiss NISV "Anlagegrenzwert" and international
//! free-space practice).
//!
//! This crate is the core engine only: facade sampling, field
//! computation, line-of-sight analysis, and OMEN validation/assignment.
//! Site/building/pattern loading from external file formats, coordinate
//! reprojection, and report export are out of scope — see
//! [`SPEC_FULL.md`](https://example.github.io/emf-hotspot-core) for the
//! full interface contract those collaborators are expected to satisfy.

pub mod aggregator;
pub mod assignment;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod domain;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod kernel;
pub mod los;
pub mod omen;
pub mod pattern;
pub mod sampler;

pub use assignment::BuildingHeightAnalysis;
pub use config::{EngineConfig, FieldConstant};
pub use diagnostics::{Diagnostics, Issue};
pub use domain::{
    Antenna, AntennaContribution, Building, FacadeSamplePoint, HotspotResult, LosStatus,
    OmenPoint, Site, Surface, SurfaceKind,
};
pub use driver::CancellationToken;
pub use error::EngineError;
pub use omen::{OmenStatus, OmenValidation};
pub use pattern::{AttenuationPattern, PatternRegistry, PatternTable, StandardPattern};

/// Everything the compliance scan produces for one site.
pub struct ScanOutput {
    /// Results for every real facade sample point, followed by results
    /// for any virtual OMEN points synthesized for unassigned OMENs
    /// (spec-expansion Module N). Real-point ordering matches the input
    /// sample order; virtual-point results are appended afterwards, so
    /// callers relying on the order-preservation guarantee for real
    /// facade points are unaffected.
    pub hotspot_results: Vec<HotspotResult>,
    pub omen_validations: Vec<OmenValidation>,
    pub omen_assignments: Vec<Option<String>>,
    pub building_height_analyses: Vec<assignment::BuildingHeightAnalysis>,
    pub diagnostics: Diagnostics,
}

/// Run the full pipeline for one site: sample every building's facades,
/// filter to the search radius, fan the aggregator out across sample
/// points (Modules C through G), run the LOS pass on every point that
/// exceeded the threshold (Module F), then validate and assign the
/// site's OMEN points (Modules H, I), synthesize virtual facade points
/// for any OMEN that assignment couldn't place (Module N), and flag
/// implausible building heights (Module O).
///
/// This is the one entry point a caller outside this crate needs; the
/// individual module functions ([`sampler::sample_building`],
/// [`driver::run`], [`los::analyze`], [`omen::validate`],
/// [`assignment::assign_omen_to_buildings`]) remain public for callers
/// that want to run only part of the pipeline (e.g. a CLI subcommand that
/// only validates OMEN points against an already-loaded site).
pub fn run_compliance_scan(
    site: &domain::Site,
    buildings: &[domain::Building],
    registry: &pattern::PatternRegistry,
    config: &config::EngineConfig,
    cancel: &driver::CancellationToken,
    show_progress: bool,
) -> Result<ScanOutput, error::EngineError> {
    config.validate()?;

    let mut diagnostics = diagnostics::Diagnostics::new();
    aggregator::record_filtered_antennas(&site.antennas, &mut diagnostics);

    let mut points = Vec::new();
    for building in buildings {
        points.extend(sampler::sample_building(building, config.sample_resolution_m, &mut diagnostics));
    }
    let points = sampler::filter_by_radius(points, &site.base_position, config.search_radius_m);

    let (mut results, driver_diagnostics) =
        driver::run(&points, &site.antennas, registry, config, cancel, show_progress)
            .ok_or(error::EngineError::Cancelled)?;
    diagnostics.extend(driver_diagnostics);

    for result in &mut results {
        if !config.los_only_for_exceeding || result.exceeds_limit {
            los::analyze(result, site, buildings, config.per_blocker_db, config.blocker_margin_m);
        }
    }

    let omen_validations = omen::validate(&site.omen_points, &site.antennas, registry, config);

    let assignments = assignment::assign_omen_to_buildings(&site.omen_points, buildings, &mut diagnostics);
    let omen_assignments: Vec<Option<String>> = assignments
        .iter()
        .map(|owner| owner.map(str::to_string))
        .collect();

    let virtual_points = sampler::synthesize_virtual_omen_points(&site.omen_points, &assignments);
    if !virtual_points.is_empty() {
        let (mut virtual_results, virtual_diagnostics) =
            driver::run(&virtual_points, &site.antennas, registry, config, cancel, false)
                .ok_or(error::EngineError::Cancelled)?;
        diagnostics.extend(virtual_diagnostics);
        for result in &mut virtual_results {
            if !config.los_only_for_exceeding || result.exceeds_limit {
                los::analyze(result, site, buildings, config.per_blocker_db, config.blocker_margin_m);
            }
        }
        results.extend(virtual_results);
    }

    let building_height_analyses = assignment::analyze_building_heights(buildings, &mut diagnostics);

    Ok(ScanOutput {
        hotspot_results: results,
        omen_validations,
        omen_assignments,
        building_height_analyses,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Coord3;

    fn small_site() -> (Site, Vec<Building>) {
        let antenna = Antenna {
            id: "A1".into(),
            mast_id: "M1".into(),
            position: Coord3::new(0.0, 0.0, 20.0),
            azimuth_deg: 0.0,
            tilt_nominal_deg: 2,
            tilt_from_deg: 0,
            tilt_to_deg: 4,
            erp_w: 500.0,
            freq_band_key: "1800".into(),
            pattern_key: "omni".into(),
            is_adaptive: false,
            sub_arrays: 1,
        };
        let site = Site {
            name: "TestSite".into(),
            base_position: Coord3::new(0.0, 0.0, 0.0),
            antennas: vec![antenna],
            omen_points: vec![],
        };
        let wall = Surface {
            id: "W1".into(),
            vertices: vec![
                Coord3::new(-5.0, 20.0, 0.0),
                Coord3::new(5.0, 20.0, 0.0),
                Coord3::new(5.0, 20.0, 10.0),
                Coord3::new(-5.0, 20.0, 10.0),
            ],
            outward_normal: None,
        };
        let building = Building {
            id: "B1".into(),
            egid: "EGID1".into(),
            walls: vec![wall],
            roofs: vec![],
        };
        (site, vec![building])
    }

    #[test]
    fn full_pipeline_runs_end_to_end() {
        let (site, buildings) = small_site();
        let registry = PatternRegistry::fallback_only(StandardPattern::OMNI);
        let config = EngineConfig::default();
        let cancel = CancellationToken::new();
        let output =
            run_compliance_scan(&site, &buildings, &registry, &config, &cancel, false).unwrap();
        assert!(!output.hotspot_results.is_empty());
        for result in &output.hotspot_results {
            assert_eq!(result.building_id, "B1");
        }
    }

    #[test]
    fn invalid_config_is_rejected_before_sampling() {
        let (site, buildings) = small_site();
        let registry = PatternRegistry::fallback_only(StandardPattern::OMNI);
        let mut config = EngineConfig::default();
        config.search_radius_m = -1.0;
        let cancel = CancellationToken::new();
        let result = run_compliance_scan(&site, &buildings, &registry, &config, &cancel, false);
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn unassignable_omen_gets_virtual_hotspot_results() {
        let (mut site, buildings) = small_site();
        site.omen_points = vec![OmenPoint {
            nr: "OMEN-OFFSITE".into(),
            position: Coord3::new(500.0, 500.0, 5.0),
            building_attenuation_db: 0.0,
            e_field_expected: None,
        }];
        let registry = PatternRegistry::fallback_only(StandardPattern::OMNI);
        let config = EngineConfig::default();
        let cancel = CancellationToken::new();
        let output =
            run_compliance_scan(&site, &buildings, &registry, &config, &cancel, false).unwrap();

        assert_eq!(output.omen_assignments, vec![None]);
        let virtual_building_id = sampler::virtual_omen_building_id("OMEN-OFFSITE");
        let virtual_results: Vec<_> = output
            .hotspot_results
            .iter()
            .filter(|r| r.building_id == virtual_building_id)
            .collect();
        assert_eq!(virtual_results.len(), 4);
    }

    #[test]
    fn building_height_analyses_cover_every_building() {
        let (site, buildings) = small_site();
        let registry = PatternRegistry::fallback_only(StandardPattern::OMNI);
        let config = EngineConfig::default();
        let cancel = CancellationToken::new();
        let output =
            run_compliance_scan(&site, &buildings, &registry, &config, &cancel, false).unwrap();
        assert_eq!(output.building_height_analyses.len(), 1);
        assert_eq!(output.building_height_analyses[0].building_id, "B1");
    }
}
