// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Non-fatal issue collection.
//!
//! Nothing in this module can cause a run to abort; every `Issue` is
//! something the engine worked around and logged at the point it happened,
//! with [`Diagnostics`] acting as the place those logged events are also
//! recorded so a caller can inspect them without grepping log output.
//!
//! Order matters: issues are reported in the same order their inputs were
//! processed, independent of how many worker threads produced them
//! (`[`crate::driver`] concatenates per-chunk diagnostics in input order,
//! it never sorts or merges them).

use std::fmt;

/// A single non-fatal issue encountered while processing one input item.
#[derive(Clone, Debug, PartialEq)]
pub enum Issue {
    /// A facade polygon had fewer than 3 distinct vertices, or its
    /// triangulation produced a degenerate (near-zero-area) triangle.
    DegenerateGeometry { building_id: String, detail: String },
    /// An antenna referenced an `(antenna_type, freq_band)` pair absent
    /// from the loaded pattern table; the antenna fell back to
    /// [`crate::pattern::standard::StandardPattern`].
    MissingPattern {
        antenna_id: String,
        antenna_type: String,
        freq_band: String,
    },
    /// An antenna was dropped from a site's contribution set entirely
    /// (e.g. zero ERP, or a pattern lookup *and* standard-pattern fallback
    /// both failed).
    AntennaFiltered { antenna_id: String, reason: String },
    /// An OMEN point could not be assigned to any building via the
    /// height-range + point-in-polygon gates.
    UnassignedOmen { omen_id: String },
    /// A building's estimated storey height looks physically implausible.
    ImplausibleFloorHeight {
        building_id: String,
        estimated_m: f64,
    },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::DegenerateGeometry {
                building_id,
                detail,
            } => write!(f, "building {building_id}: degenerate geometry ({detail})"),
            Issue::MissingPattern {
                antenna_id,
                antenna_type,
                freq_band,
            } => write!(
                f,
                "antenna {antenna_id}: no pattern table for ({antenna_type}, {freq_band}), using standard pattern"
            ),
            Issue::AntennaFiltered { antenna_id, reason } => {
                write!(f, "antenna {antenna_id}: filtered ({reason})")
            }
            Issue::UnassignedOmen { omen_id } => {
                write!(f, "OMEN {omen_id}: could not be assigned to a building")
            }
            Issue::ImplausibleFloorHeight {
                building_id,
                estimated_m,
            } => write!(
                f,
                "building {building_id}: implausible estimated floor height ({estimated_m:.2} m)"
            ),
        }
    }
}

/// An ordered collection of [`Issue`]s accumulated over a run.
///
/// Cheap to merge: [`Diagnostics::extend`] just appends, preserving the
/// caller's ordering, which is how the parallel driver stitches per-chunk
/// diagnostics back together.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Diagnostics {
    issues: Vec<Issue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.issues.extend(other.issues);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter()
    }

    pub fn into_vec(self) -> Vec<Issue> {
        self.issues
    }
}

impl IntoIterator for Diagnostics {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

impl FromIterator<Issue> for Diagnostics {
    fn from_iter<T: IntoIterator<Item = Issue>>(iter: T) -> Self {
        Self {
            issues: iter.into_iter().collect(),
        }
    }
}
