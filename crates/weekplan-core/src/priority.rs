//! Task urgency scoring.
//!
//! The score is the average number of hours per remaining day a task needs,
//! scaled by a multiplier:
//! - Overdue tasks: fixed dominant multiplier (default x100), nothing else
//! - Otherwise the first matching effort/deadline tier:
//!   - < 3h and due within 1 day: x10
//!   - < 6h and due within 2 days: x8
//!   - < 12h and due within 3 days: x6
//!   - < 18h and due within 4 days: x4
//!   - due within 5 days: x2
//!   - else x1
//!
//! Tasks without a due date are treated as due far in the future.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;
use crate::task::Task;

/// Urgency tiers as `(max_hours_exclusive, max_days_inclusive, multiplier)`.
const URGENCY_TIERS: &[(f64, i64, f64)] = &[
    (3.0, 1, 10.0),
    (6.0, 2, 8.0),
    (12.0, 3, 6.0),
    (18.0, 4, 4.0),
    (f64::INFINITY, 5, 2.0),
];

/// Priority calculation configuration
#[derive(Debug, Clone)]
pub struct PriorityConfig {
    /// Reference date for deadline calculations
    pub today: NaiveDate,
    /// Days until due assumed for tasks with no due date
    pub undated_horizon_days: i64,
    /// Multiplier applied to overdue tasks
    pub overdue_multiplier: f64,
}

impl PriorityConfig {
    pub fn new(today: NaiveDate) -> Self {
        Self::from_scheduler_config(today, &SchedulerConfig::default())
    }

    pub fn from_scheduler_config(today: NaiveDate, config: &SchedulerConfig) -> Self {
        Self {
            today,
            undated_horizon_days: config.undated_horizon_days,
            overdue_multiplier: config.overdue_multiplier,
        }
    }
}

/// Breakdown of a task's priority score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityScore {
    /// Final score, higher = more urgent
    pub score: f64,
    /// Whole days left until the due date, never negative
    pub days_until_due: i64,
    pub overdue: bool,
    /// Multiplier applied to the hours-per-day base
    pub multiplier: f64,
}

/// Priority calculator for tasks
pub struct PriorityCalculator {
    config: PriorityConfig,
}

impl PriorityCalculator {
    /// Create a calculator anchored at `today` with default constants
    pub fn new(today: NaiveDate) -> Self {
        Self {
            config: PriorityConfig::new(today),
        }
    }

    /// Create with custom config
    pub fn with_config(config: PriorityConfig) -> Self {
        Self { config }
    }

    /// Calculate the priority score for a task
    pub fn calculate(&self, task: &Task) -> PriorityScore {
        let (days_until_due, overdue) = match task.due_date {
            Some(due) => {
                let days = (due - self.config.today).num_days();
                (days.max(0), days < 0)
            }
            None => (self.config.undated_horizon_days, false),
        };

        let hours = task.estimated_hours;
        let base = hours / days_until_due.max(1) as f64;

        let multiplier = if overdue {
            self.config.overdue_multiplier
        } else {
            urgency_multiplier(hours, days_until_due)
        };

        PriorityScore {
            score: base * multiplier,
            days_until_due,
            overdue,
            multiplier,
        }
    }

    /// Calculate scores for multiple tasks
    ///
    /// # Returns
    /// Vector of (task_id, score) tuples in input order
    pub fn calculate_all(&self, tasks: &[Task]) -> Vec<(String, PriorityScore)> {
        tasks
            .iter()
            .map(|task| (task.id.clone(), self.calculate(task)))
            .collect()
    }
}

/// Multiplier of the first tier matching `(hours, days_until_due)`
fn urgency_multiplier(hours: f64, days_until_due: i64) -> f64 {
    URGENCY_TIERS
        .iter()
        .find(|(max_hours, max_days, _)| hours < *max_hours && days_until_due <= *max_days)
        .map(|(_, _, multiplier)| *multiplier)
        .unwrap_or(1.0)
}

/// Convenience function to score a single task with default constants
pub fn calculate_priority(task: &Task, today: NaiveDate) -> PriorityScore {
    PriorityCalculator::new(today).calculate(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::PriorityClass;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 13).unwrap()
    }

    fn task(hours: f64, due_in_days: Option<i64>) -> Task {
        let t = Task::new("t", "Task", PriorityClass::Medium).with_estimated_hours(hours);
        match due_in_days {
            Some(days) => t.with_due_date(today() + Duration::days(days)),
            None => t,
        }
    }

    #[test]
    fn test_undated_task() {
        let score = calculate_priority(&task(365.0, None), today());
        assert_eq!(score.days_until_due, 365);
        assert!(!score.overdue);
        assert_eq!(score.multiplier, 1.0);
        assert!((score.score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_due_today_small_task() {
        let score = calculate_priority(&task(1.0, Some(0)), today());
        assert_eq!(score.days_until_due, 0);
        assert!(!score.overdue);
        // 1h / max(0,1) * 10
        assert_eq!(score.score, 10.0);
    }

    #[test]
    fn test_overdue_multiplier_only() {
        let score = calculate_priority(&task(2.0, Some(-3)), today());
        assert!(score.overdue);
        assert_eq!(score.days_until_due, 0);
        assert_eq!(score.multiplier, 100.0);
        assert_eq!(score.score, 200.0);
    }

    #[test]
    fn test_tiers_first_match() {
        let cases = [
            (2.0, 1, 10.0),
            (3.0, 1, 8.0), // not < 3h, falls to the 6h tier
            (5.0, 2, 8.0),
            (11.0, 3, 6.0),
            (17.0, 4, 4.0),
            (40.0, 5, 2.0),
            (2.0, 6, 1.0),
            (20.0, 4, 2.0), // >= 18h but within 5 days
        ];
        for (hours, days, expected) in cases {
            let score = calculate_priority(&task(hours, Some(days)), today());
            assert_eq!(
                score.multiplier, expected,
                "hours={hours} days={days} should use x{expected}"
            );
            assert!((score.score - hours / days as f64 * expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_overdue_beats_large_due_tomorrow() {
        let overdue = calculate_priority(&task(0.5, Some(-1)), today());
        let urgent = calculate_priority(&task(2.5, Some(1)), today());
        assert!(overdue.score > urgent.score);
    }

    #[test]
    fn test_custom_horizon() {
        let calc = PriorityCalculator::with_config(PriorityConfig {
            today: today(),
            undated_horizon_days: 5,
            overdue_multiplier: 100.0,
        });
        let score = calc.calculate(&task(10.0, None));
        assert_eq!(score.days_until_due, 5);
        assert_eq!(score.multiplier, 2.0);
    }

    #[test]
    fn test_calculate_all_keeps_order() {
        let tasks = vec![
            Task::new("a", "A", PriorityClass::Low),
            Task::new("b", "B", PriorityClass::High),
        ];
        let scores = PriorityCalculator::new(today()).calculate_all(&tasks);
        assert_eq!(scores[0].0, "a");
        assert_eq!(scores[1].0, "b");
    }
}
