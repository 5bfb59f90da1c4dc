//! Tasks as seen by the scheduler.
//!
//! [`TaskRecord`] is the loose shape read from callers; [`Task`] is the
//! validated form the engine works with. Deserializing a `Task` goes
//! through `TaskRecord`, so a malformed file fails with the same
//! [`ValidationError`] a programmatic caller would get.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Declared importance of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityClass {
    Low,
    Medium,
    High,
}

impl PriorityClass {
    /// Numeric rank used as a tie-breaker (high = 3, medium = 2, low = 1)
    pub fn rank(&self) -> u8 {
        match self {
            PriorityClass::Low => 1,
            PriorityClass::Medium => 2,
            PriorityClass::High => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityClass::Low => "low",
            PriorityClass::Medium => "medium",
            PriorityClass::High => "high",
        }
    }
}

impl fmt::Display for PriorityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityClass {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(PriorityClass::Low),
            "medium" => Ok(PriorityClass::Medium),
            "high" => Ok(PriorityClass::High),
            _ => Err(ValidationError::InvalidPriorityClass(s.to_string())),
        }
    }
}

/// Largest accepted effort estimate, in hours
pub const MAX_ESTIMATED_HOURS: f64 = 1000.0;

/// Strings treated as "no due date"
const UNSPECIFIED_DUE_DATES: &[&str] = &["", "none", "unspecified"];

/// Parse a due date string.
///
/// Accepts `YYYY-MM-DD`, an RFC 3339 timestamp (its date part), or one of
/// the "unspecified" sentinels, which map to `None`.
pub fn parse_due_date(task_id: &str, value: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let trimmed = value.trim();
    if UNSPECIFIED_DUE_DATES
        .iter()
        .any(|s| trimmed.eq_ignore_ascii_case(s))
    {
        return Ok(None);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(ts.date_naive()));
    }

    Err(ValidationError::InvalidDueDate {
        task_id: task_id.to_string(),
        value: value.to_string(),
    })
}

/// Raw task input as supplied by callers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
}

/// A validated task ready for scheduling. Never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    pub id: String,
    pub title: String,
    /// `None` means no due date
    pub due_date: Option<NaiveDate>,
    pub priority: PriorityClass,
    pub estimated_hours: f64,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, priority: PriorityClass) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            due_date: None,
            priority,
            estimated_hours: 1.0,
        }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = hours;
        self
    }

    /// Check the fields a hand-built task could get wrong.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingTaskId);
        }
        if !self.estimated_hours.is_finite()
            || self.estimated_hours < 0.0
            || self.estimated_hours > MAX_ESTIMATED_HOURS
        {
            return Err(ValidationError::InvalidEstimate {
                task_id: self.id.clone(),
                hours: self.estimated_hours,
            });
        }
        Ok(())
    }

    /// Total estimated effort rounded to whole minutes.
    ///
    /// Clamped to `0..=MAX_ESTIMATED_HOURS * 60`; [`Task::validate`] rejects
    /// anything outside that range.
    pub fn estimated_minutes(&self) -> u32 {
        let minutes = (self.estimated_hours * 60.0).round();
        if minutes.is_nan() {
            return 0;
        }
        minutes.clamp(0.0, MAX_ESTIMATED_HOURS * 60.0) as u32
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = ValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let id = record
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or(ValidationError::MissingTaskId)?;
        let priority = record.priority.parse()?;
        let due_date = match record.due_date.as_deref() {
            Some(value) => parse_due_date(&id, value)?,
            None => None,
        };

        let task = Task {
            title: record.title.unwrap_or_default(),
            due_date,
            priority,
            estimated_hours: record.estimated_hours.unwrap_or(1.0),
            id,
        };
        task.validate()?;
        Ok(task)
    }
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            id: Some(task.id.clone()),
            title: Some(task.title.clone()),
            due_date: task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
            priority: task.priority.as_str().to_string(),
            estimated_hours: Some(task.estimated_hours),
        }
    }
}
