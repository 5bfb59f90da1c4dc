//! Weekly scheduler for task work chunks.
//!
//! This module wires the pipeline together:
//! - Builds the per-day busy interval store (rejecting bad input)
//! - Computes buffered free slots for each weekday
//! - Scores and chunks every task, then orders all chunks globally
//! - Places chunks first-fit into the week, dropping what does not fit
//!
//! Each run is a pure function of its inputs and the `today` anchor.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assign::{compare_tasks, sort_queue, week_monday, GreedyAssigner, QueuedChunk, ScheduledChunk};
use crate::chunk::{Chunker, TaskChunk};
use crate::config::SchedulerConfig;
use crate::error::ValidationError;
use crate::gap::{FreeSlot, GapCalculator};
use crate::interval::{BusyInterval, IntervalStore, DAYS_PER_WEEK};
use crate::priority::{PriorityCalculator, PriorityConfig, PriorityScore};
use crate::task::Task;

/// Full outcome of a scheduling run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekPlan {
    /// Monday the week's day indices are anchored to
    pub week_start: NaiveDate,
    pub scheduled: Vec<ScheduledChunk>,
    /// Chunks no slot could hold, in placement order
    pub dropped: Vec<TaskChunk>,
    /// Free time left after placement, Monday first
    pub remaining: [Vec<FreeSlot>; DAYS_PER_WEEK],
}

/// A task with its score and chunk plan, as ordered for placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedTask {
    pub task_id: String,
    pub title: String,
    pub score: PriorityScore,
    pub chunk_minutes: Vec<u32>,
}

/// Weekly scheduler
pub struct WeeklyScheduler {
    config: SchedulerConfig,
}

impl WeeklyScheduler {
    /// Create a scheduler with the default constants
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    fn gap_calculator(&self) -> GapCalculator {
        GapCalculator::new()
            .with_buffer(self.config.buffer_minutes)
            .with_min_slot(self.config.min_slot_minutes)
    }

    fn chunker(&self) -> Chunker {
        Chunker::new().with_max_chunk(self.config.max_chunk_minutes)
    }

    fn priority_calculator(&self, today: NaiveDate) -> PriorityCalculator {
        PriorityCalculator::with_config(PriorityConfig::from_scheduler_config(today, &self.config))
    }

    /// Free slots for each weekday given the busy intervals.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for any malformed interval or day index.
    pub fn free_slots(
        &self,
        busy: &[(usize, BusyInterval)],
    ) -> Result<[Vec<FreeSlot>; DAYS_PER_WEEK], ValidationError> {
        let store = IntervalStore::from_entries(busy)?;
        Ok(self.gap_calculator().free_slots_for_week(&store))
    }

    /// Build the globally ordered chunk queue.
    fn build_queue<'a>(&self, tasks: &'a [Task], today: NaiveDate) -> Vec<QueuedChunk<'a>> {
        let calculator = self.priority_calculator(today);
        let chunker = self.chunker();

        let mut queue: Vec<QueuedChunk<'a>> = tasks
            .iter()
            .flat_map(|task| {
                let score = calculator.calculate(task);
                chunker
                    .chunk(task)
                    .into_iter()
                    .map(move |chunk| QueuedChunk { chunk, task, score })
            })
            .collect();

        sort_queue(&mut queue);
        queue
    }

    /// Score and chunk tasks, returned in placement order. Every task is
    /// listed once, including tasks with no effort left to place.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for the first malformed task.
    pub fn rank(&self, tasks: &[Task], today: NaiveDate) -> Result<Vec<RankedTask>, ValidationError> {
        validate_tasks(tasks)?;

        let calculator = self.priority_calculator(today);
        let chunker = self.chunker();

        let mut scored: Vec<(&Task, PriorityScore)> = tasks
            .iter()
            .map(|task| (task, calculator.calculate(task)))
            .collect();
        scored.sort_by(|(a, a_score), (b, b_score)| compare_tasks(a, a_score, b, b_score));

        let ranked = scored
            .into_iter()
            .map(|(task, score)| RankedTask {
                task_id: task.id.clone(),
                title: task.title.clone(),
                score,
                chunk_minutes: chunker.durations(task.estimated_minutes()),
            })
            .collect();
        Ok(ranked)
    }

    /// Run the whole pipeline, keeping the dropped chunks and leftover time.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] if any task or busy interval is
    /// malformed; nothing is scheduled in that case.
    pub fn plan(
        &self,
        tasks: &[Task],
        busy: &[(usize, BusyInterval)],
        today: NaiveDate,
    ) -> Result<WeekPlan, ValidationError> {
        validate_tasks(tasks)?;
        let slots = self.free_slots(busy)?;

        let queue = self.build_queue(tasks, today);
        tracing::debug!(
            tasks = tasks.len(),
            chunks = queue.len(),
            "built chunk queue"
        );

        let week_start = week_monday(today);
        let mut assigner = GreedyAssigner::new(week_start, slots);
        let assignment = assigner.assign(queue);

        tracing::debug!(
            scheduled = assignment.scheduled.len(),
            dropped = assignment.dropped.len(),
            %week_start,
            "schedule generated"
        );

        Ok(WeekPlan {
            week_start,
            scheduled: assignment.scheduled,
            dropped: assignment.dropped,
            remaining: assigner.into_remaining(),
        })
    }

    /// Generate the week's scheduled chunks.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] if any task or busy interval is malformed.
    pub fn generate_schedule(
        &self,
        tasks: &[Task],
        busy: &[(usize, BusyInterval)],
        today: NaiveDate,
    ) -> Result<Vec<ScheduledChunk>, ValidationError> {
        self.plan(tasks, busy, today).map(|plan| plan.scheduled)
    }
}

impl Default for WeeklyScheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_tasks(tasks: &[Task]) -> Result<(), ValidationError> {
    tasks.iter().try_for_each(Task::validate)
}

/// Convenience function to generate a schedule with default settings
pub fn generate_schedule(
    tasks: &[Task],
    busy: &[(usize, BusyInterval)],
    today: NaiveDate,
) -> Result<Vec<ScheduledChunk>, ValidationError> {
    WeeklyScheduler::new().generate_schedule(tasks, busy, today)
}

/// Minutes of each task's estimate that did not make it into `scheduled`.
///
/// Tasks that were fully placed are omitted. Keyed by task id.
pub fn unscheduled_minutes_by_task(
    tasks: &[Task],
    scheduled: &[ScheduledChunk],
) -> BTreeMap<String, u32> {
    let mut placed: BTreeMap<&str, u32> = BTreeMap::new();
    for chunk in scheduled {
        *placed.entry(chunk.task_id.as_str()).or_default() += chunk.duration_minutes();
    }

    tasks
        .iter()
        .filter_map(|task| {
            let estimated = task.estimated_minutes();
            let done = placed.get(task.id.as_str()).copied().unwrap_or(0);
            (estimated > done).then(|| (task.id.clone(), estimated - done))
        })
        .collect()
}
