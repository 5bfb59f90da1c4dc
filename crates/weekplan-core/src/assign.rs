//! Global chunk ordering and first-fit placement into free slots.
//!
//! Chunks are placed in priority order. Each chunk goes into the first slot,
//! scanning days Monday to Sunday and slots in start order, that still has
//! room for it. The slot is then consumed from its front. A chunk with no
//! admissible slot is dropped.

use std::cmp::Ordering;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::chunk::TaskChunk;
use crate::gap::FreeSlot;
use crate::interval::DAYS_PER_WEEK;
use crate::priority::PriorityScore;
use crate::task::Task;

/// A chunk placed on the calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledChunk {
    pub task_id: String,
    pub title: String,
    pub chunk_index: u32,
    pub total_chunks: u32,
    /// Minutes from midnight
    pub scheduled_start: u32,
    pub scheduled_end: u32,
    /// Serialized as `YYYY-MM-DD`
    pub scheduled_date: NaiveDate,
}

impl ScheduledChunk {
    pub fn duration_minutes(&self) -> u32 {
        self.scheduled_end - self.scheduled_start
    }
}

/// A chunk waiting for placement along with its parent's ordering keys
#[derive(Debug, Clone)]
pub struct QueuedChunk<'a> {
    pub chunk: TaskChunk,
    pub task: &'a Task,
    pub score: PriorityScore,
}

/// Monday of the week containing `today`.
pub fn week_monday(today: NaiveDate) -> NaiveDate {
    today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
}

/// Order two scored tasks for placement.
///
/// Overdue tasks come before all others whatever their score. Within each
/// group: score descending, then priority class descending, then due date
/// ascending with undated tasks last, then task id ascending.
pub fn compare_tasks(
    a: &Task,
    a_score: &PriorityScore,
    b: &Task,
    b_score: &PriorityScore,
) -> Ordering {
    b_score
        .overdue
        .cmp(&a_score.overdue)
        .then_with(|| b_score.score.total_cmp(&a_score.score))
        .then_with(|| b.priority.rank().cmp(&a.priority.rank()))
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(da), Some(db)) => da.cmp(&db),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.id.cmp(&b.id))
}

/// Order two queued chunks by their parent tasks.
pub fn compare_queued(a: &QueuedChunk<'_>, b: &QueuedChunk<'_>) -> Ordering {
    compare_tasks(a.task, &a.score, b.task, &b.score)
}

/// Sort a chunk queue into placement order. The sort is stable, so chunks
/// of one task stay in chunk index order.
pub fn sort_queue(queue: &mut [QueuedChunk<'_>]) {
    queue.sort_by(compare_queued);
}

/// Result of placing a queue
#[derive(Debug, Clone, Default)]
pub struct Assignment {
    pub scheduled: Vec<ScheduledChunk>,
    pub dropped: Vec<TaskChunk>,
}

/// First-fit placement over one week of free slots
pub struct GreedyAssigner {
    week_start: NaiveDate,
    slots: [Vec<FreeSlot>; DAYS_PER_WEEK],
}

impl GreedyAssigner {
    /// Create an assigner over `slots`, with day 0 falling on `week_start`.
    pub fn new(week_start: NaiveDate, slots: [Vec<FreeSlot>; DAYS_PER_WEEK]) -> Self {
        Self { week_start, slots }
    }

    /// Place a single chunk, returning its calendar entry if any slot fits.
    pub fn place(&mut self, chunk: &TaskChunk) -> Option<ScheduledChunk> {
        for (day, slots) in self.slots.iter_mut().enumerate() {
            let Some(slot) = slots.iter_mut().find(|slot| slot.can_fit(chunk.duration)) else {
                continue;
            };
            let start = slot.consume(chunk.duration)?;

            return Some(ScheduledChunk {
                task_id: chunk.task_id.clone(),
                title: chunk.title.clone(),
                chunk_index: chunk.chunk_index,
                total_chunks: chunk.total_chunks,
                scheduled_start: start,
                scheduled_end: start + chunk.duration,
                scheduled_date: self.week_start + Duration::days(day as i64),
            });
        }
        None
    }

    /// Place every chunk of an already sorted queue in order.
    pub fn assign<'a, I>(&mut self, queue: I) -> Assignment
    where
        I: IntoIterator<Item = QueuedChunk<'a>>,
    {
        let mut assignment = Assignment::default();
        for queued in queue {
            match self.place(&queued.chunk) {
                Some(scheduled) => {
                    tracing::trace!(
                        task_id = %scheduled.task_id,
                        chunk = scheduled.chunk_index,
                        date = %scheduled.scheduled_date,
                        start = scheduled.scheduled_start,
                        "placed chunk"
                    );
                    assignment.scheduled.push(scheduled);
                }
                None => {
                    tracing::debug!(
                        task_id = %queued.chunk.task_id,
                        chunk = queued.chunk.chunk_index,
                        duration = queued.chunk.duration,
                        "no free slot for chunk; dropping"
                    );
                    assignment.dropped.push(queued.chunk);
                }
            }
        }
        assignment
    }

    /// Remaining free slots after placement
    pub fn remaining(&self) -> &[Vec<FreeSlot>; DAYS_PER_WEEK] {
        &self.slots
    }

    pub fn into_remaining(self) -> [Vec<FreeSlot>; DAYS_PER_WEEK] {
        self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::PriorityClass;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn chunk(task_id: &str, duration: u32, index: u32) -> TaskChunk {
        TaskChunk {
            task_id: task_id.into(),
            title: task_id.to_uppercase(),
            duration,
            chunk_index: index,
            total_chunks: index,
        }
    }

    fn score(value: f64) -> PriorityScore {
        PriorityScore {
            score: value,
            days_until_due: 1,
            overdue: false,
            multiplier: 1.0,
        }
    }

    #[test]
    fn test_week_monday() {
        // 2024-03-11 is a Monday
        let monday = date(2024, 3, 11);
        assert_eq!(monday.weekday(), Weekday::Mon);
        for offset in 0..7 {
            assert_eq!(week_monday(monday + Duration::days(offset)), monday);
        }
        // Sunday walks back six days, not forward
        assert_eq!(week_monday(date(2024, 3, 17)), monday);
        assert_eq!(week_monday(date(2024, 3, 18)), date(2024, 3, 18));
    }

    #[test]
    fn test_ordering_tiers() {
        let high = Task::new("b", "", PriorityClass::High);
        let low = Task::new("a", "", PriorityClass::Low);
        let dated = Task::new("z", "", PriorityClass::Low).with_due_date(date(2024, 3, 20));
        let earlier = Task::new("y", "", PriorityClass::Low).with_due_date(date(2024, 3, 19));

        fn q(task: &Task, s: f64) -> QueuedChunk<'_> {
            QueuedChunk {
                chunk: chunk("x", 60, 1),
                task,
                score: score(s),
            }
        }

        // Score wins over class
        assert_eq!(compare_queued(&q(&low, 2.0), &q(&high, 1.0)), Ordering::Less);
        // Class breaks score ties
        assert_eq!(compare_queued(&q(&high, 1.0), &q(&low, 1.0)), Ordering::Less);
        // Earlier due date first, dated before undated
        assert_eq!(compare_queued(&q(&earlier, 1.0), &q(&dated, 1.0)), Ordering::Less);
        assert_eq!(compare_queued(&q(&low, 1.0), &q(&dated, 1.0)), Ordering::Greater);
        // Id as final tie-break
        let other_low = Task::new("c", "", PriorityClass::Low);
        assert_eq!(compare_queued(&q(&low, 1.0), &q(&other_low, 1.0)), Ordering::Less);
    }

    #[test]
    fn test_overdue_outranks_any_score() {
        let fresh = Task::new("fresh", "", PriorityClass::High).with_estimated_hours(2.0);
        let late = Task::new("late", "", PriorityClass::Low).with_estimated_hours(0.1);
        let late_score = PriorityScore {
            score: 10.0,
            days_until_due: 0,
            overdue: true,
            multiplier: 100.0,
        };

        // 0.1h overdue scores 10, 2h due today scores 20
        assert_eq!(
            compare_tasks(&late, &late_score, &fresh, &score(20.0)),
            Ordering::Less
        );
        assert_eq!(
            compare_tasks(&fresh, &score(1.0e9), &late, &late_score),
            Ordering::Greater
        );
    }

    #[test]
    fn test_first_fit_day_major() {
        let monday = date(2024, 3, 11);
        let mut slots: [Vec<FreeSlot>; DAYS_PER_WEEK] = Default::default();
        slots[0] = vec![FreeSlot::new(0, 30), FreeSlot::new(100, 130)];
        slots[1] = vec![FreeSlot::new(0, 1440)];
        let mut assigner = GreedyAssigner::new(monday, slots);

        // Fits nowhere on Monday, lands on Tuesday
        let placed = assigner.place(&chunk("a", 60, 1)).unwrap();
        assert_eq!(placed.scheduled_date, date(2024, 3, 12));
        assert_eq!((placed.scheduled_start, placed.scheduled_end), (0, 60));

        // Small chunk takes Monday's first slot from its front
        let placed = assigner.place(&chunk("b", 20, 1)).unwrap();
        assert_eq!(placed.scheduled_date, monday);
        assert_eq!(placed.scheduled_start, 0);
        assert_eq!(assigner.remaining()[0][0], FreeSlot { start: 20, end: 30, duration: 10 });

        // Next 20 minute chunk skips the shrunken slot
        let placed = assigner.place(&chunk("c", 20, 1)).unwrap();
        assert_eq!(placed.scheduled_start, 100);
    }

    #[test]
    fn test_assign_drops_unplaceable() {
        let monday = date(2024, 3, 11);
        let mut slots: [Vec<FreeSlot>; DAYS_PER_WEEK] = Default::default();
        slots[3] = vec![FreeSlot::new(600, 690)];
        let mut assigner = GreedyAssigner::new(monday, slots);

        let task = Task::new("t", "T", PriorityClass::High);
        let queue = vec![
            QueuedChunk { chunk: chunk("t", 60, 1), task: &task, score: score(1.0) },
            QueuedChunk { chunk: chunk("t", 60, 2), task: &task, score: score(1.0) },
            QueuedChunk { chunk: chunk("t", 30, 3), task: &task, score: score(1.0) },
        ];
        let assignment = assigner.assign(queue);

        assert_eq!(assignment.scheduled.len(), 2);
        assert_eq!(assignment.dropped.len(), 1);
        assert_eq!(assignment.dropped[0].chunk_index, 2);
        assert_eq!(assignment.scheduled[1].scheduled_start, 660);
        assert_eq!(assignment.scheduled[1].scheduled_date, date(2024, 3, 14));
        assert_eq!(assigner.remaining()[3][0].duration, 0);
    }

    #[test]
    fn test_scheduled_date_serializes_as_iso() {
        let chunk = ScheduledChunk {
            task_id: "t".into(),
            title: "T".into(),
            chunk_index: 1,
            total_chunks: 1,
            scheduled_start: 0,
            scheduled_end: 60,
            scheduled_date: date(2024, 3, 11),
        };
        let json = serde_json::to_value(&chunk).unwrap();
        assert_eq!(json["scheduled_date"], "2024-03-11");
    }
}
