//! JSON input files for tasks and busy intervals.

use std::path::Path;

use serde::Deserialize;
use weekplan_core::{day_index, BusyInterval, CoreError, Result, Task};

/// One busy interval as written in a busy file
#[derive(Debug, Deserialize)]
struct BusyEntry {
    day: i64,
    start: i64,
    end: i64,
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| CoreError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a JSON array of tasks. Malformed tasks fail the whole file.
pub fn read_tasks(path: &Path) -> Result<Vec<Task>> {
    let tasks: Vec<Task> = serde_json::from_str(&read_file(path)?)?;
    tracing::debug!(count = tasks.len(), path = %path.display(), "loaded tasks");
    Ok(tasks)
}

/// Read a JSON array of `{day, start, end}` entries. No file means no busy time.
///
/// Out-of-range days and minutes, negative ones included, fail with a
/// validation error rather than a JSON one.
pub fn read_busy(path: Option<&Path>) -> Result<Vec<(usize, BusyInterval)>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let entries: Vec<BusyEntry> = serde_json::from_str(&read_file(path)?)?;
    tracing::debug!(count = entries.len(), path = %path.display(), "loaded busy intervals");

    entries
        .into_iter()
        .map(|e| -> Result<(usize, BusyInterval)> {
            Ok((day_index(e.day)?, BusyInterval::from_signed(e.start, e.end)?))
        })
        .collect()
}
