//! Splitting a task's estimated effort into bounded work units.

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Default upper bound on a single chunk (minutes)
pub const DEFAULT_MAX_CHUNK_MINUTES: u32 = 60;

/// One unit of work cut from a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskChunk {
    pub task_id: String,
    pub title: String,
    pub duration: u32,
    /// 1-based position within the task
    pub chunk_index: u32,
    pub total_chunks: u32,
}

/// Cuts tasks into chunks of at most `max_chunk_minutes`
#[derive(Debug, Clone)]
pub struct Chunker {
    max_chunk_minutes: u32,
}

impl Chunker {
    pub fn new() -> Self {
        Self {
            max_chunk_minutes: DEFAULT_MAX_CHUNK_MINUTES,
        }
    }

    /// Set the chunk size cap; zero is treated as one minute.
    pub fn with_max_chunk(mut self, minutes: u32) -> Self {
        self.max_chunk_minutes = minutes.max(1);
        self
    }

    /// Durations of the chunks for `total_minutes` of work: as many full
    /// chunks as fit, then the remainder if any.
    pub fn durations(&self, total_minutes: u32) -> Vec<u32> {
        let full = total_minutes / self.max_chunk_minutes;
        let remainder = total_minutes % self.max_chunk_minutes;

        let mut durations = vec![self.max_chunk_minutes; full as usize];
        if remainder > 0 {
            durations.push(remainder);
        }
        durations
    }

    /// Chunk a task. A zero-effort task yields no chunks.
    pub fn chunk(&self, task: &Task) -> Vec<TaskChunk> {
        let durations = self.durations(task.estimated_minutes());
        let total_chunks = durations.len() as u32;

        durations
            .into_iter()
            .zip(1..)
            .map(|(duration, chunk_index)| TaskChunk {
                task_id: task.id.clone(),
                title: task.title.clone(),
                duration,
                chunk_index,
                total_chunks,
            })
            .collect()
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to chunk a task with the default 60 minute cap
pub fn chunk_task(task: &Task) -> Vec<TaskChunk> {
    Chunker::new().chunk(task)
}
