//! Year range partitioning
//!
//! Splits an inclusive range of years into contiguous, near-equal slices, one
//! per worker process. Slice boundaries are `round(i * splitsize)` where
//! `splitsize = 1.0 / ranks * len` in `f64`, rounded half-to-even, so existing
//! batch layouts produced by the Python driver are reproduced year for year.

use crate::errors::{DriverError, Result};
use tracing::warn;

/// Inclusive range of simulation years
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub begin: i32,
    pub end: i32,
}

impl YearRange {
    /// Create a year range, rejecting ranges whose first year is after the last
    pub fn new(begin: i32, end: i32) -> Result<Self> {
        if begin > end {
            return Err(DriverError::InvalidYearRange { begin, end });
        }
        Ok(Self { begin, end })
    }

    /// All years in the range, in order
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        (self.begin..=self.end).collect()
    }

    /// Number of years in the range
    #[must_use]
    pub fn len(&self) -> usize {
        (i64::from(self.end) - i64::from(self.begin) + 1) as usize
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The years assigned to a single worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSlice {
    /// Zero-based worker index, used to name the worker's control file
    pub worker: usize,
    /// Contiguous, ascending years handled by this worker
    pub years: Vec<i32>,
}

impl YearSlice {
    /// First year of the slice
    #[must_use]
    pub fn first(&self) -> Option<i32> {
        self.years.first().copied()
    }

    /// Last year of the slice
    #[must_use]
    pub fn last(&self) -> Option<i32> {
        self.years.last().copied()
    }
}

/// Splits `seq` into exactly `ranks` contiguous slices of near-equal length.
///
/// Slices may be empty when `ranks` exceeds the sequence length.
///
/// # Errors
///
/// Returns [`DriverError::InvalidWorkerCount`] when `ranks` is zero.
pub fn split_seq<T: Clone>(seq: &[T], ranks: usize) -> Result<Vec<Vec<T>>> {
    if ranks == 0 {
        return Err(DriverError::InvalidWorkerCount(ranks));
    }

    let len = seq.len();
    let splitsize = 1.0 / ranks as f64 * len as f64;
    let boundary = |i: usize| ((i as f64 * splitsize).round_ties_even() as usize).min(len);

    let slices = (0..ranks)
        .map(|i| seq[boundary(i)..boundary(i + 1)].to_vec())
        .collect();

    Ok(slices)
}

/// Assigns the years of `range` to at most `workers` workers.
///
/// The worker count is clamped to the number of years, so workers that would
/// receive no years are dropped and every slice holds at least one year.
///
/// # Errors
///
/// Returns [`DriverError::InvalidWorkerCount`] when `workers` is zero.
pub fn partition_years(range: YearRange, workers: usize) -> Result<Vec<YearSlice>> {
    let slices = split_seq(&range.years(), workers.min(range.len()))?;

    let assigned: Vec<YearSlice> = slices
        .into_iter()
        .filter(|years| !years.is_empty())
        .enumerate()
        .map(|(worker, years)| YearSlice { worker, years })
        .collect();

    if assigned.len() < workers {
        warn!(
            requested = workers,
            used = assigned.len(),
            "more workers than years; idle workers dropped"
        );
    }

    Ok(assigned)
}
