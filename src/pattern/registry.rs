// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Lookup from an antenna's `(pattern_key, freq_band_key)` to the loaded
//! [`PatternTable`] for it, falling back to an analytical
//! [`StandardPattern`] when no manufacturer table was loaded.
//!
//! An [`IndexMap`] is used rather than a `HashMap` so iteration order
//! (used only for deterministic diagnostics/debug output, never for
//! compliance results) matches insertion order instead of hash order.

use std::sync::Arc;

use indexmap::IndexMap;
use log::{trace, warn};

use crate::pattern::{AttenuationPattern, PatternTable, StandardPattern};

/// Maps `(pattern_key, freq_band_key)` to a loaded pattern table, with a
/// single fallback pattern used whenever a key is missing.
#[derive(Clone)]
pub struct PatternRegistry {
    tables: IndexMap<(String, String), Arc<PatternTable>>,
    fallback: Arc<dyn AttenuationPattern>,
}

impl PatternRegistry {
    /// Build a registry from loaded tables, keyed by `(pattern_key,
    /// freq_band_key)`, plus the analytical pattern used for any antenna
    /// whose key isn't present.
    pub fn new(
        tables: impl IntoIterator<Item = ((String, String), PatternTable)>,
        fallback: impl AttenuationPattern + 'static,
    ) -> Self {
        Self {
            tables: tables
                .into_iter()
                .map(|(key, table)| (key, Arc::new(table)))
                .collect(),
            fallback: Arc::new(fallback),
        }
    }

    /// A registry with no tables at all, for sites that only ever use the
    /// analytical fallback (e.g. the OMEN validator exercising a
    /// hypothetical pattern).
    pub fn fallback_only(fallback: impl AttenuationPattern + 'static) -> Self {
        Self {
            tables: IndexMap::new(),
            fallback: Arc::new(fallback),
        }
    }

    /// Resolve the pattern for `(pattern_key, freq_band_key)`. Returns the
    /// matched table, or the registry's fallback pattern plus `true` if
    /// none was found (so the caller can record a
    /// [`crate::diagnostics::Issue::MissingPattern`]).
    pub fn resolve(&self, pattern_key: &str, freq_band_key: &str) -> (Arc<dyn AttenuationPattern>, bool) {
        let key = (pattern_key.to_string(), freq_band_key.to_string());
        match self.tables.get(&key) {
            Some(table) => {
                trace!("resolved pattern ({pattern_key}, {freq_band_key}) from table");
                (table.clone() as Arc<dyn AttenuationPattern>, false)
            }
            None => {
                warn!(
                    "no pattern table for ({pattern_key}, {freq_band_key}), using standard pattern fallback"
                );
                (self.fallback.clone(), true)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_loaded_table() {
        let table = PatternTable::new(
            "A1",
            vec![0.0, 180.0],
            vec![0.0, -10.0],
            vec![0.0, 180.0],
            vec![0.0, -10.0],
        )
        .unwrap();
        let registry = PatternRegistry::new(
            [(("typeA".to_string(), "1800".to_string()), table)],
            StandardPattern::SECTOR_65_7,
        );
        let (_, used_fallback) = registry.resolve("typeA", "1800");
        assert!(!used_fallback);
    }

    #[test]
    fn falls_back_when_key_missing() {
        let registry = PatternRegistry::fallback_only(StandardPattern::SECTOR_65_7);
        let (_, used_fallback) = registry.resolve("typeA", "1800");
        assert!(used_fallback);
    }
}
