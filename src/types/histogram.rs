//! Fixed-size frequency histogram over `[0, 1]`.
//!
//! Each bucket counts how many values fell into it. Histograms of edges that
//! collapse into one are combined by bucket-wise addition, which is
//! commutative and associative, so the result does not depend on merge order.

use std::ops::{AddAssign, Index};

/// Default number of buckets, matching 8-bit affinity discretization.
pub const DEFAULT_BINS: usize = 256;

/// Frequency counter with `BINS` buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram<const BINS: usize = DEFAULT_BINS> {
    counts: [u32; BINS],
    total: u32,
}

impl<const BINS: usize> Histogram<BINS> {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self {
            counts: [0; BINS],
            total: 0,
        }
    }

    /// Number of buckets.
    pub const fn bins(&self) -> usize {
        BINS
    }

    /// Bucket index for a value in `[0, 1]`: `floor(value * (BINS - 1))`.
    ///
    /// Values outside the range are clamped; NaN lands in bucket 0.
    pub fn bucket_for(value: f32) -> usize {
        let scaled = value.clamp(0.0, 1.0) * (BINS - 1) as f32;
        // `as` saturates and maps NaN to 0
        (scaled as usize).min(BINS - 1)
    }

    /// Value represented by a bucket: `bucket / (BINS - 1)`.
    pub fn bucket_value(bucket: usize) -> f32 {
        bucket as f32 / (BINS - 1) as f32
    }

    /// Count one occurrence in `bucket`.
    pub fn inc(&mut self, bucket: usize) {
        self.counts[bucket] += 1;
        self.total += 1;
    }

    /// Count one occurrence of `value` in its bucket.
    pub fn insert(&mut self, value: f32) {
        self.inc(Self::bucket_for(value));
    }

    /// Sum of all bucket counts.
    pub fn sum(&self) -> u32 {
        self.total
    }

    /// Whether no value has been counted.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Add every bucket of `other` into this histogram.
    pub fn merge(&mut self, other: &Self) {
        for (count, add) in self.counts.iter_mut().zip(other.counts.iter()) {
            *count += add;
        }
        self.total += other.total;
    }

    /// Bucket holding the value of 1-based rank `pivot`.
    ///
    /// Scans buckets upward until the running count reaches `pivot`. Returns
    /// `BINS` when the histogram holds fewer than `pivot` values.
    pub fn rank_bucket(&self, pivot: u32) -> usize {
        let mut running = 0u32;
        for (bucket, count) in self.counts.iter().enumerate() {
            running += count;
            if running >= pivot {
                return bucket;
            }
        }
        BINS
    }

    /// Approximate `quantile` (in percent) of the counted values.
    ///
    /// The 1-based pivot rank is `quantile * sum / 100 + 1` with integer
    /// division, so small histograms round towards the lower bucket.
    pub fn quantile(&self, quantile: u8) -> f32 {
        debug_assert!(!self.is_empty(), "quantile of an empty histogram");
        let pivot = (quantile as u64 * self.total as u64 / 100) as u32 + 1;
        Self::bucket_value(self.rank_bucket(pivot))
    }
}

impl<const BINS: usize> Default for Histogram<BINS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const BINS: usize> Index<usize> for Histogram<BINS> {
    type Output = u32;

    fn index(&self, bucket: usize) -> &u32 {
        &self.counts[bucket]
    }
}

impl<const BINS: usize> AddAssign<&Histogram<BINS>> for Histogram<BINS> {
    fn add_assign(&mut self, other: &Histogram<BINS>) {
        self.merge(other);
    }
}
