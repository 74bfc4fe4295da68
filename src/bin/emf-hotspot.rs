// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
A small demonstration binary for the compliance engine.

The executable generated by this file builds a synthetic site in code (a
couple of antennas, one building, a couple of OMEN points — not read from
a file, since file I/O is out of scope for this crate) and runs it
through [`emf_hotspot_core::run_compliance_scan`], printing a
human-readable summary.
 */

use clap::{Parser, Subcommand};
use log::info;

use emf_hotspot_core::{
    Antenna, Building, CancellationToken, EngineConfig, OmenPoint, PatternRegistry, Site,
    StandardPattern, Surface,
};
use emf_hotspot_core::geometry::Coord3;

#[derive(Parser, Debug)]
#[clap(author, version, about = "EMF compliance hotspot engine demo", long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the engine against a small synthetic site and print a summary.
    Demo {
        /// The verbosity of the program.
        #[clap(short, long, parse(from_occurrences))]
        verbosity: u8,

        /// Facade sampling grid resolution, in metres.
        #[clap(long, default_value_t = 2.0)]
        resolution_m: f64,
    },
}

fn setup_logging(level: u8) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}][{}] {}", record.target(), record.level(), message))
        })
        .level(match level {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

fn synthetic_site() -> (Site, Vec<Building>) {
    let mast = Coord3::new(0.0, 0.0, 25.0);
    let antennas = vec![
        Antenna {
            id: "A1".into(),
            mast_id: "M1".into(),
            position: mast,
            azimuth_deg: 0.0,
            tilt_nominal_deg: 2,
            tilt_from_deg: 0,
            tilt_to_deg: 6,
            erp_w: 800.0,
            freq_band_key: "1800".into(),
            pattern_key: "omni".into(),
            is_adaptive: false,
            sub_arrays: 1,
        },
        Antenna {
            id: "A2".into(),
            mast_id: "M1".into(),
            position: mast,
            azimuth_deg: 180.0,
            tilt_nominal_deg: 2,
            tilt_from_deg: 0,
            tilt_to_deg: 6,
            erp_w: 800.0,
            freq_band_key: "2600".into(),
            pattern_key: "omni".into(),
            is_adaptive: false,
            sub_arrays: 1,
        },
    ];

    let omen_points = vec![
        OmenPoint {
            nr: "OMEN-1".into(),
            position: Coord3::new(0.0, 30.0, 12.0),
            building_attenuation_db: 0.0,
            e_field_expected: Some(3.2),
        },
        OmenPoint {
            nr: "OMEN-2".into(),
            position: Coord3::new(0.0, -30.0, 12.0),
            building_attenuation_db: 6.0,
            e_field_expected: None,
        },
    ];

    let site = Site {
        name: "Demo Site".into(),
        base_position: Coord3::new(0.0, 0.0, 0.0),
        antennas,
        omen_points,
    };

    let wall_facing_mast = Surface {
        id: "W1".into(),
        vertices: vec![
            Coord3::new(-6.0, 30.0, 0.0),
            Coord3::new(6.0, 30.0, 0.0),
            Coord3::new(6.0, 30.0, 18.0),
            Coord3::new(-6.0, 30.0, 18.0),
        ],
        outward_normal: None,
    };
    let roof = Surface {
        id: "R1".into(),
        vertices: vec![
            Coord3::new(-6.0, 24.0, 18.0),
            Coord3::new(6.0, 24.0, 18.0),
            Coord3::new(6.0, 36.0, 18.0),
            Coord3::new(-6.0, 36.0, 18.0),
        ],
        outward_normal: None,
    };

    let building = Building {
        id: "Building-1".into(),
        egid: "EGID-001".into(),
        walls: vec![wall_facing_mast],
        roofs: vec![roof],
    };

    (site, vec![building])
}

fn run_demo(resolution_m: f64) -> Result<(), emf_hotspot_core::EngineError> {
    let (site, buildings) = synthetic_site();
    let registry = PatternRegistry::fallback_only(StandardPattern::OMNI);
    let mut config = EngineConfig::default();
    config.sample_resolution_m = resolution_m;
    let cancel = CancellationToken::new();

    info!("running compliance scan for site '{}'", site.name);
    let output = emf_hotspot_core::run_compliance_scan(&site, &buildings, &registry, &config, &cancel, true)?;

    let exceeding = output.hotspot_results.iter().filter(|r| r.exceeds_limit).count();
    println!(
        "{} facade points sampled, {} exceed the {:.1} V/m threshold",
        output.hotspot_results.len(),
        exceeding,
        config.threshold_v_per_m
    );
    if let Some(worst) = output
        .hotspot_results
        .iter()
        .max_by(|a, b| a.e_total_v_per_m.partial_cmp(&b.e_total_v_per_m).unwrap())
    {
        println!(
            "worst point: building {} at ({:.1}, {:.1}, {:.1}) -> {:.3} V/m ({})",
            worst.building_id,
            worst.position.e,
            worst.position.n,
            worst.position.h,
            worst.e_total_v_per_m,
            worst.los_status,
        );
    }

    for validation in &output.omen_validations {
        println!(
            "{}: computed {:.3} V/m, expected {:.3} V/m, {:.1}% deviation -> {}",
            validation.omen_nr,
            validation.computed_v_per_m,
            validation.expected_v_per_m,
            validation.pct_deviation,
            validation.status,
        );
    }

    if !output.diagnostics.is_empty() {
        println!("{} non-fatal diagnostics recorded:", output.diagnostics.len());
        for issue in output.diagnostics.iter() {
            println!("  - {issue}");
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();
    match args.command {
        Command::Demo { verbosity, resolution_m } => {
            setup_logging(verbosity).expect("failed to initialise logging");
            if let Err(e) = run_demo(resolution_m) {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
    }
}
