//! Optimal mining dwell-time lookup table.
//!
//! A unit that travels `t` steps to a cell holding `H`, mines it for `m`
//! turns and then travels `b` steps to a base delivers
//!
//! ```text
//! cargo + H·g^t·(1 - (1 - r)^m)      over      t + m + b turns
//! ```
//!
//! where `r` is the collect rate and `g = 1 + regen` models regrowth while
//! the unit is on its way. Dividing through by `H` leaves a function of
//! `(t, b, cargo/H)` only, so the best `m` is tabulated once per game over
//! distance pairs and a discretised cargo/value ratio, and looked up in
//! O(1) during scoring.

// Bucket arithmetic on small non-negative floats
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use serde::Serialize;

/// Bump whenever the yield model or discretisation changes.
pub const DWELL_TABLE_VERSION: u32 = 1;

/// Longest dwell considered.
pub const MAX_DWELL: usize = 24;

/// Width of one cargo/value ratio bucket.
pub const RATIO_STEP: f64 = 0.25;

/// Number of ratio buckets; the last one absorbs every larger ratio.
pub const RATIO_BUCKETS: usize = 17;

/// Precomputed optimal dwell per (distance to target, distance to base, ratio bucket).
#[derive(Debug, Clone, Serialize)]
pub struct DwellTable {
    /// Format version.
    version: u32,
    /// Largest tabulated distance on either axis.
    max_distance: usize,
    /// Collect rate the table was generated for.
    collect_rate: f64,
    /// Regrowth rate the table was generated for.
    regen_rate: f64,
    /// Flattened `[to_target][to_base][bucket]`, each entry in `1..=MAX_DWELL`.
    entries: Vec<u8>,
}

/// Delivered resource per turn for a normalised cell value of 1.
#[must_use]
pub fn yield_rate(
    ratio: f64,
    to_target: usize,
    to_base: usize,
    dwell: usize,
    collect_rate: f64,
    regen_rate: f64,
) -> f64 {
    let grown = (1.0 + regen_rate).powi(to_target as i32);
    let mined = grown * (1.0 - (1.0 - collect_rate).powi(dwell as i32));
    let turns = (to_target + dwell + to_base).max(1) as f64;
    (ratio + mined) / turns
}

/// Representative ratio of a bucket (its midpoint; the last bucket uses its lower edge).
#[must_use]
pub fn bucket_ratio(bucket: usize) -> f64 {
    if bucket + 1 >= RATIO_BUCKETS {
        (RATIO_BUCKETS - 1) as f64 * RATIO_STEP
    } else {
        (bucket as f64 + 0.5) * RATIO_STEP
    }
}

/// Bucket for a cargo and cell value; an empty cell falls in the last bucket.
#[must_use]
pub fn ratio_bucket(cargo: f64, value: f64) -> usize {
    if value <= 0.0 || !value.is_finite() {
        return RATIO_BUCKETS - 1;
    }
    let ratio = (cargo.max(0.0) / value) / RATIO_STEP;
    if ratio.is_finite() {
        (ratio.floor() as usize).min(RATIO_BUCKETS - 1)
    } else {
        RATIO_BUCKETS - 1
    }
}

impl DwellTable {
    /// Tabulate the optimal dwell for every distance pair up to `max_distance`.
    #[must_use]
    pub fn generate(max_distance: usize, collect_rate: f64, regen_rate: f64) -> Self {
        let side = max_distance + 1;
        let mut entries = Vec::with_capacity(side * side * RATIO_BUCKETS);

        for to_target in 0..side {
            for to_base in 0..side {
                for bucket in 0..RATIO_BUCKETS {
                    let ratio = bucket_ratio(bucket);
                    let mut best = 1;
                    let mut best_rate = f64::NEG_INFINITY;
                    for dwell in 1..=MAX_DWELL {
                        let rate =
                            yield_rate(ratio, to_target, to_base, dwell, collect_rate, regen_rate);
                        // Strict: ties keep the shorter dwell
                        if rate > best_rate {
                            best_rate = rate;
                            best = dwell;
                        }
                    }
                    entries.push(best as u8);
                }
            }
        }

        Self {
            version: DWELL_TABLE_VERSION,
            max_distance,
            collect_rate,
            regen_rate,
            entries,
        }
    }

    /// Table format version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Largest tabulated distance.
    #[must_use]
    pub const fn max_distance(&self) -> usize {
        self.max_distance
    }

    /// Optimal dwell (always at least 1); distances beyond the table are clamped.
    #[must_use]
    pub fn lookup(&self, to_target: usize, to_base: usize, cargo: f64, value: f64) -> usize {
        let side = self.max_distance + 1;
        let t = to_target.min(self.max_distance);
        let b = to_base.min(self.max_distance);
        let bucket = ratio_bucket(cargo, value);
        usize::from(self.entries[(t * side + b) * RATIO_BUCKETS + bucket]).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_positive_everywhere() {
        let table = DwellTable::generate(20, 0.25, 0.02);
        assert_eq!(table.version(), DWELL_TABLE_VERSION);
        for t in 0..=20 {
            for b in 0..=20 {
                for cargo in [0.0, 50.0, 400.0, 5000.0] {
                    let d = table.lookup(t, b, cargo, 200.0);
                    assert!((1..=MAX_DWELL).contains(&d));
                }
            }
        }
    }

    #[test]
    fn test_longer_trips_justify_longer_dwell() {
        let table = DwellTable::generate(20, 0.25, 0.02);
        let near = table.lookup(1, 1, 0.0, 300.0);
        let far = table.lookup(8, 8, 0.0, 300.0);
        assert!(far >= near);
    }

    #[test]
    fn test_heavy_cargo_shortens_dwell() {
        let table = DwellTable::generate(20, 0.25, 0.02);
        let light = table.lookup(3, 3, 0.0, 100.0);
        let heavy = table.lookup(3, 3, 1000.0, 100.0);
        assert!(heavy <= light);
    }

    #[test]
    fn test_lookup_clamps_distance() {
        let table = DwellTable::generate(4, 0.25, 0.0);
        assert_eq!(table.lookup(40, 40, 0.0, 100.0), table.lookup(4, 4, 0.0, 100.0));
        assert_eq!(table.max_distance(), 4);
    }

    #[test]
    fn test_ratio_bucket_edges() {
        assert_eq!(ratio_bucket(0.0, 100.0), 0);
        assert_eq!(ratio_bucket(25.0, 100.0), 1);
        assert_eq!(ratio_bucket(1.0e9, 1.0), RATIO_BUCKETS - 1);
        assert_eq!(ratio_bucket(10.0, 0.0), RATIO_BUCKETS - 1);
    }

    #[test]
    fn test_yield_rate_peaks_inside_range() {
        // Zero travel, zero cargo: first turn of mining is the best rate
        let first = yield_rate(0.0, 0, 0, 1, 0.25, 0.0);
        let later = yield_rate(0.0, 0, 0, 5, 0.25, 0.0);
        assert!(first > later);
    }
}
