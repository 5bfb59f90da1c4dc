//! Free time computation between busy intervals.
//!
//! Free slots are the complement of the buffered busy intervals of a day.
//! Buffers are applied pairwise between neighbouring intervals in start
//! order; overlapping busy intervals are not merged first, so a long
//! interval that contains a shorter one may leave a trailing slot that
//! starts inside it.

use serde::{Deserialize, Serialize};

use crate::interval::{DayIntervalList, IntervalStore, DAYS_PER_WEEK, MINUTES_PER_DAY};

/// Default gap kept between free time and any busy interval (minutes)
pub const DEFAULT_BUFFER_MINUTES: u32 = 5;

/// Default shortest slot worth keeping (minutes)
pub const DEFAULT_MIN_SLOT_MINUTES: u32 = 5;

/// A schedulable range within one day.
///
/// During assignment a slot is consumed from its front: `start` moves
/// forward and `duration` shrinks while `end` stays put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: u32,
    pub end: u32,
    pub duration: u32,
}

impl FreeSlot {
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start,
            end,
            duration: end.saturating_sub(start),
        }
    }

    /// Check if this slot can hold `minutes` of work
    pub fn can_fit(&self, minutes: u32) -> bool {
        self.duration >= minutes
    }

    /// Take `minutes` off the front of the slot, returning the start of the
    /// consumed range. Returns `None` if the slot is too small.
    pub fn consume(&mut self, minutes: u32) -> Option<u32> {
        if !self.can_fit(minutes) {
            return None;
        }
        let at = self.start;
        self.start += minutes;
        self.duration -= minutes;
        Some(at)
    }
}

/// Calculator for deriving free slots from busy intervals
#[derive(Debug, Clone)]
pub struct GapCalculator {
    /// Minutes kept free on both sides of every busy interval
    buffer_minutes: u32,
    /// Minimum slot duration to emit (in minutes)
    min_slot_minutes: u32,
}

impl GapCalculator {
    /// Create a calculator with the default 5 minute buffer and 5 minute minimum
    pub fn new() -> Self {
        Self {
            buffer_minutes: DEFAULT_BUFFER_MINUTES,
            min_slot_minutes: DEFAULT_MIN_SLOT_MINUTES,
        }
    }

    /// Set the buffer around busy intervals
    pub fn with_buffer(mut self, minutes: u32) -> Self {
        self.buffer_minutes = minutes;
        self
    }

    /// Set the minimum slot duration
    pub fn with_min_slot(mut self, minutes: u32) -> Self {
        self.min_slot_minutes = minutes;
        self
    }

    /// Find free slots in one day.
    ///
    /// An empty day yields a single slot covering the whole day. Otherwise
    /// the leading gap, the gap between each adjacent pair and the trailing
    /// gap are computed with the buffer applied, and only gaps of at least
    /// the minimum duration are kept.
    pub fn free_slots(&self, day: &DayIntervalList) -> Vec<FreeSlot> {
        let busy = day.as_slice();
        let (Some(first), Some(last)) = (busy.first(), busy.last()) else {
            return vec![FreeSlot::new(0, MINUTES_PER_DAY)];
        };

        let buffer = i64::from(self.buffer_minutes);
        let mut slots = Vec::with_capacity(busy.len() + 1);

        self.push_gap(&mut slots, 0, i64::from(first.start) - buffer);

        for pair in busy.windows(2) {
            self.push_gap(
                &mut slots,
                i64::from(pair[0].end) + buffer,
                i64::from(pair[1].start) - buffer,
            );
        }

        self.push_gap(
            &mut slots,
            i64::from(last.end) + buffer,
            i64::from(MINUTES_PER_DAY),
        );

        slots
    }

    /// Find free slots for every day of the week, Monday first.
    pub fn free_slots_for_week(&self, store: &IntervalStore) -> [Vec<FreeSlot>; DAYS_PER_WEEK] {
        let mut week: [Vec<FreeSlot>; DAYS_PER_WEEK] = Default::default();
        for (index, day) in store.days() {
            week[index] = self.free_slots(day);
            tracing::trace!(day = index, slots = week[index].len(), "computed free slots");
        }
        week
    }

    fn push_gap(&self, slots: &mut Vec<FreeSlot>, start: i64, end: i64) {
        // Negative spans come from buffers overrunning a neighbour
        if end - start < i64::from(self.min_slot_minutes) || end <= start {
            return;
        }
        let (Ok(start), Ok(end)) = (u32::try_from(start), u32::try_from(end)) else {
            return;
        };
        slots.push(FreeSlot::new(start, end));
    }
}

impl Default for GapCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to compute one day's free slots with default settings
pub fn compute_free_slots(day: &DayIntervalList) -> Vec<FreeSlot> {
    GapCalculator::new().free_slots(day)
}
