// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The parallel driver (spec Module G): fan sample points out across
//! worker threads, aggregate each independently (pure, read-only-input
//! computation, so no synchronisation is needed inside the map), and
//! collect results back in input order.
//!
//! Mirrors the per-baseline `into_par_iter().zip(...).for_each(...)`
//! shape the model generator uses for its own embarrassingly-parallel
//! per-element computation, minus the producer/consumer channel
//! machinery that workload doesn't need here: every point's aggregation
//! is a pure function of immutable inputs, so a plain parallel map with
//! an index-preserving collect is enough to satisfy the ordering
//! contract.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use log::debug;
use rayon::prelude::*;

use crate::aggregator;
use crate::config::EngineConfig;
use crate::diagnostics::Diagnostics;
use crate::domain::{Antenna, FacadeSamplePoint, HotspotResult};
use crate::pattern::PatternRegistry;

/// A cooperative cancellation flag. The driver checks it once per sample
/// point (not mid-point); a caller can set it from another thread to
/// abort a long-running batch.
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Number of points below which the driver runs serially rather than
/// paying rayon's fork overhead: `workers * 10`.
fn serial_threshold(workers: usize) -> usize {
    workers.saturating_mul(10)
}

/// Run the aggregator across every sample point.
///
/// Returns `None` if `cancel` was observed between points before every
/// point had been processed — per the concurrency contract, partial
/// results are discarded rather than returned truncated.
pub fn run(
    points: &[FacadeSamplePoint],
    antennas: &[Antenna],
    registry: &PatternRegistry,
    config: &EngineConfig,
    cancel: &CancellationToken,
    show_progress: bool,
) -> Option<(Vec<HotspotResult>, Diagnostics)> {
    let workers = config.workers.unwrap_or_else(rayon::current_num_threads);

    let one_point = |point: &FacadeSamplePoint| -> Option<(HotspotResult, Diagnostics)> {
        if cancel.is_cancelled() {
            return None;
        }
        let mut diagnostics = Diagnostics::new();
        let result = aggregator::aggregate(
            &point.building_id,
            point.position,
            antennas,
            registry,
            config,
            0.0,
            &mut diagnostics,
        );
        Some((result, diagnostics))
    };

    let outcomes: Vec<Option<(HotspotResult, Diagnostics)>> = if points.len() < serial_threshold(workers) {
        debug!(
            "{} points < serial threshold ({}), running serially",
            points.len(),
            serial_threshold(workers)
        );
        points.iter().map(one_point).collect()
    } else {
        debug!("{} points, running in parallel across {} workers", points.len(), workers);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .expect("failed to build rayon thread pool");

        pool.install(|| {
            if show_progress {
                let pb = ProgressBar::new(points.len() as u64);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("{bar:40.cyan/blue} {pos}/{len} points ({eta})")
                        .expect("valid progress bar template"),
                );
                points.par_iter().progress_with(pb).map(one_point).collect()
            } else {
                points.par_iter().map(one_point).collect()
            }
        })
    };

    let mut results = Vec::with_capacity(outcomes.len());
    let mut diagnostics = Diagnostics::new();
    for outcome in outcomes {
        let (result, point_diagnostics) = outcome?;
        results.push(result);
        diagnostics.extend(point_diagnostics);
    }
    Some((results, diagnostics))
}
