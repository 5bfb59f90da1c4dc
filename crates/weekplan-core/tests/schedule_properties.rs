//! Property tests for chunking and placement.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use weekplan_core::{
    chunk_task, generate_schedule, BusyInterval, PriorityClass, ScheduledChunk, Task,
    WeeklyScheduler,
};

const BUFFER: u32 = 5;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 13).unwrap()
}

fn priority_strategy() -> impl Strategy<Value = PriorityClass> {
    prop_oneof![
        Just(PriorityClass::Low),
        Just(PriorityClass::Medium),
        Just(PriorityClass::High),
    ]
}

fn tasks_strategy() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(
        (0u32..=600, priority_strategy(), prop::option::of(-5i64..20)),
        0..8,
    )
    .prop_map(|drafts| {
        drafts
            .into_iter()
            .enumerate()
            .map(|(i, (minutes, priority, due))| {
                let task = Task::new(format!("task-{i}"), format!("Task {i}"), priority)
                    .with_estimated_hours(f64::from(minutes) / 60.0);
                match due {
                    Some(days) => task.with_due_date(today() + Duration::days(days)),
                    None => task,
                }
            })
            .collect()
    })
}

/// Disjoint busy intervals: sorted unique cut points taken pairwise.
fn busy_strategy() -> impl Strategy<Value = Vec<(usize, BusyInterval)>> {
    prop::collection::vec(prop::collection::btree_set(0u32..=1440, 0..10), 7).prop_map(
        |days: Vec<BTreeSet<u32>>| {
            days.into_iter()
                .enumerate()
                .flat_map(|(day, cuts)| {
                    let cuts: Vec<u32> = cuts.into_iter().collect();
                    cuts.chunks_exact(2)
                        .map(|pair| (day, BusyInterval { start: pair[0], end: pair[1] }))
                        .collect::<Vec<_>>()
                })
                .collect()
        },
    )
}

/// Tasks of any size, each either overdue or due within the next few days.
fn mixed_urgency_strategy() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec((1u32..=3000, priority_strategy(), -10i64..=5), 1..8).prop_map(
        |drafts| {
            drafts
                .into_iter()
                .enumerate()
                .map(|(i, (minutes, priority, due))| {
                    Task::new(format!("task-{i}"), format!("Task {i}"), priority)
                        .with_estimated_hours(f64::from(minutes) / 60.0)
                        .with_due_date(today() + Duration::days(due))
                })
                .collect()
        },
    )
}

fn is_overdue(tasks: &[Task], task_id: &str) -> bool {
    tasks
        .iter()
        .any(|t| t.id == task_id && t.due_date.is_some_and(|due| due < today()))
}

fn day_index(chunk: &ScheduledChunk) -> usize {
    (chunk.scheduled_date - weekplan_core::week_monday(today())).num_days() as usize
}

proptest! {
    #[test]
    fn chunking_conserves_minutes(minutes in 0u32..=3000) {
        let task = Task::new("t", "T", PriorityClass::Low)
            .with_estimated_hours(f64::from(minutes) / 60.0);
        let chunks = chunk_task(&task);

        prop_assert_eq!(chunks.iter().map(|c| c.duration).sum::<u32>(), minutes);
        prop_assert!(chunks.iter().all(|c| c.duration > 0 && c.duration <= 60));
        prop_assert!(chunks.iter().all(|c| c.total_chunks as usize == chunks.len()));
        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.chunk_index as usize, i + 1);
        }
    }

    #[test]
    fn placements_avoid_busy_time_and_each_other(
        tasks in tasks_strategy(),
        busy in busy_strategy(),
    ) {
        let scheduled = generate_schedule(&tasks, &busy, today()).unwrap();

        for chunk in &scheduled {
            let day = day_index(chunk);
            prop_assert!(day < 7);
            prop_assert!(chunk.scheduled_end <= 1440);
            prop_assert!(chunk.duration_minutes() <= 60);

            for (busy_day, interval) in &busy {
                if *busy_day != day {
                    continue;
                }
                let guarded_start = interval.start.saturating_sub(BUFFER);
                let guarded_end = interval.end + BUFFER;
                prop_assert!(
                    chunk.scheduled_end <= guarded_start || chunk.scheduled_start >= guarded_end,
                    "chunk {:?} hits busy {:?}", chunk, interval
                );
            }
        }

        for (i, a) in scheduled.iter().enumerate() {
            for b in &scheduled[i + 1..] {
                if a.scheduled_date == b.scheduled_date {
                    prop_assert!(
                        a.scheduled_end <= b.scheduled_start || b.scheduled_end <= a.scheduled_start
                    );
                }
            }
        }
    }

    #[test]
    fn never_places_more_than_estimated(
        tasks in tasks_strategy(),
        busy in busy_strategy(),
    ) {
        let scheduled = generate_schedule(&tasks, &busy, today()).unwrap();
        for task in &tasks {
            let placed: u32 = scheduled
                .iter()
                .filter(|c| c.task_id == task.id)
                .map(ScheduledChunk::duration_minutes)
                .sum();
            prop_assert!(placed <= task.estimated_minutes());
        }
    }

    #[test]
    fn schedule_is_deterministic(
        tasks in tasks_strategy(),
        busy in busy_strategy(),
    ) {
        let first = generate_schedule(&tasks, &busy, today()).unwrap();
        let second = generate_schedule(&tasks, &busy, today()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn overdue_chunks_are_placed_before_all_others(
        tasks in mixed_urgency_strategy(),
        busy in busy_strategy(),
    ) {
        let plan = WeeklyScheduler::new().plan(&tasks, &busy, today()).unwrap();

        let flags: Vec<bool> = plan
            .scheduled
            .iter()
            .map(|c| is_overdue(&tasks, &c.task_id))
            .collect();
        if let Some(first_fresh) = flags.iter().position(|overdue| !overdue) {
            prop_assert!(
                flags[first_fresh..].iter().all(|overdue| !overdue),
                "overdue chunk placed after a non-overdue one: {:?}", flags
            );
        }

        let ranked = WeeklyScheduler::new().rank(&tasks, today()).unwrap();
        let ranked_flags: Vec<bool> = ranked.iter().map(|r| r.score.overdue).collect();
        let mut sorted = ranked_flags.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        prop_assert_eq!(ranked_flags, sorted);
    }
}
