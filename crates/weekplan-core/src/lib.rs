//! # Weekplan Core Library
//!
//! This library provides the weekly task-scheduling engine behind weekplan.
//! Given a set of outstanding tasks and the busy intervals of each weekday,
//! it proposes a conflict-free calendar of work sessions for the current
//! week. The `weekplan-cli` binary is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Interval store**: per-day, start-ordered busy intervals
//! - **Gap calculator**: buffered free slots between busy intervals
//! - **Prioritizer**: urgency score from due date, effort and overdue state
//! - **Chunker**: splits estimated effort into bounded work units
//! - **Greedy assigner**: orders all chunks and places them first-fit
//!
//! Everything runs synchronously and without I/O; a run is a pure function
//! of its inputs and the `today` anchor.
//!
//! ## Key Components
//!
//! - [`WeeklyScheduler`]: Pipeline entry point
//! - [`generate_schedule`]: One-call scheduling with default constants
//! - [`Config`]: Persisted configuration

pub mod assign;
pub mod chunk;
pub mod config;
pub mod error;
pub mod gap;
pub mod interval;
pub mod priority;
pub mod scheduler;
pub mod task;

pub use assign::{week_monday, GreedyAssigner, ScheduledChunk};
pub use chunk::{chunk_task, Chunker, TaskChunk};
pub use config::{Config, DisplayConfig, SchedulerConfig, TimeFormat};
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use gap::{compute_free_slots, FreeSlot, GapCalculator};
pub use interval::{day_index, BusyInterval, DayIntervalList, IntervalStore};
pub use priority::{calculate_priority, PriorityCalculator, PriorityScore};
pub use scheduler::{
    generate_schedule, unscheduled_minutes_by_task, RankedTask, WeekPlan, WeeklyScheduler,
};
pub use task::{PriorityClass, Task, TaskRecord, MAX_ESTIMATED_HOURS};
