//! Busy intervals and the per-day ordered interval store.
//!
//! Each weekday keeps its busy intervals ordered by start minute. The store
//! is built once per scheduling run and only read afterwards.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Minutes in one day; the exclusive upper bound for interval ends.
pub const MINUTES_PER_DAY: u32 = 1440;

/// Number of days in a scheduling week (0 = Monday ... 6 = Sunday).
pub const DAYS_PER_WEEK: usize = 7;

/// An already-committed time range within one day, in minutes from midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: u32,
    pub end: u32,
}

impl BusyInterval {
    /// Create a validated busy interval.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidInterval`] unless
    /// `start < end <= 1440`.
    pub fn new(start: u32, end: u32) -> Result<Self, ValidationError> {
        let interval = Self { start, end };
        interval.validate()?;
        Ok(interval)
    }

    /// Check the `0 <= start < end <= 1440` invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.start >= self.end || self.end > MINUTES_PER_DAY {
            return Err(ValidationError::InvalidInterval {
                start: i64::from(self.start),
                end: i64::from(self.end),
            });
        }
        Ok(())
    }

    /// Build an interval from signed minute values read from untyped input.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidInterval`] for a negative or
    /// out-of-range minute as well as for `start >= end`.
    pub fn from_signed(start: i64, end: i64) -> Result<Self, ValidationError> {
        match (u32::try_from(start), u32::try_from(end)) {
            (Ok(start), Ok(end)) => Self::new(start, end),
            _ => Err(ValidationError::InvalidInterval { start, end }),
        }
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> u32 {
        self.end - self.start
    }

    /// Check if this interval overlaps the half-open range `[start, end)`
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        self.start < end && self.end > start
    }
}

/// Start-ordered busy intervals for a single day.
///
/// Insertion places a new interval before the first existing one whose
/// start is not less than its own, so equal starts keep input order.
/// Overlapping intervals are kept as independent entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayIntervalList {
    intervals: Vec<BusyInterval>,
}

impl DayIntervalList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert keeping start order.
    pub fn insert(&mut self, interval: BusyInterval) {
        let pos = self
            .intervals
            .iter()
            .position(|existing| existing.start >= interval.start)
            .unwrap_or(self.intervals.len());
        self.intervals.insert(pos, interval);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BusyInterval> {
        self.intervals.iter()
    }

    pub fn as_slice(&self) -> &[BusyInterval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Total busy minutes, counting overlaps once per interval.
    pub fn busy_minutes(&self) -> u32 {
        self.intervals.iter().map(BusyInterval::duration_minutes).sum()
    }
}

impl<'a> IntoIterator for &'a DayIntervalList {
    type Item = &'a BusyInterval;
    type IntoIter = std::slice::Iter<'a, BusyInterval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

/// One [`DayIntervalList`] per weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalStore {
    days: [DayIntervalList; DAYS_PER_WEEK],
}

impl IntervalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(day_index, interval)` pairs, failing on the first
    /// invalid entry.
    ///
    /// # Errors
    /// Returns the first [`ValidationError`] encountered; no partial store is
    /// produced.
    pub fn from_entries(entries: &[(usize, BusyInterval)]) -> Result<Self, ValidationError> {
        let mut store = Self::new();
        for (day, interval) in entries {
            store.insert(*day, *interval)?;
        }
        Ok(store)
    }

    /// Add an interval into day `day`'s ordered list.
    ///
    /// # Errors
    /// Returns [`ValidationError::DayOutOfRange`] for `day > 6` and
    /// [`ValidationError::InvalidInterval`] for a malformed interval.
    pub fn insert(&mut self, day: usize, interval: BusyInterval) -> Result<(), ValidationError> {
        interval.validate()?;
        let list = self
            .days
            .get_mut(day)
            .ok_or(ValidationError::DayOutOfRange {
                day: i64::try_from(day).unwrap_or(i64::MAX),
            })?;
        list.insert(interval);
        Ok(())
    }

    /// Get the intervals of one day, if the index is in range.
    pub fn day(&self, day: usize) -> Option<&DayIntervalList> {
        self.days.get(day)
    }

    /// Iterate days in order, Monday first.
    pub fn days(&self) -> impl Iterator<Item = (usize, &DayIntervalList)> {
        self.days.iter().enumerate()
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(DayIntervalList::is_empty)
    }
}

/// Check a signed day index read from untyped input.
///
/// # Errors
/// Returns [`ValidationError::DayOutOfRange`] outside `0..=6`.
pub fn day_index(day: i64) -> Result<usize, ValidationError> {
    usize::try_from(day)
        .ok()
        .filter(|&index| index < DAYS_PER_WEEK)
        .ok_or(ValidationError::DayOutOfRange { day })
}
