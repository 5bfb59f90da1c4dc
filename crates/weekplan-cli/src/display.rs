//! Human-readable rendering of schedules and free time.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use weekplan_core::{FreeSlot, RankedTask, ScheduledChunk, TimeFormat};

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Formats minutes since midnight as a clock time
pub fn format_minutes(minutes: u32, format: TimeFormat) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    match format {
        TimeFormat::TwentyFourHour => format!("{:02}:{:02}", hours, mins),
        TimeFormat::TwelveHour => {
            // 1440 is end-of-day midnight
            let suffix = if (12..24).contains(&hours) { "PM" } else { "AM" };
            let h12 = match hours % 12 {
                0 => 12,
                h => h,
            };
            format!("{}:{:02} {}", h12, mins, suffix)
        }
    }
}

fn format_range(start: u32, end: u32, format: TimeFormat) -> String {
    format!("{}-{}", format_minutes(start, format), format_minutes(end, format))
}

/// Sessions grouped by date, each day sorted by start time
pub fn render_schedule(scheduled: &[ScheduledChunk], format: TimeFormat) -> String {
    if scheduled.is_empty() {
        return "No sessions scheduled.\n".to_string();
    }

    let mut by_date: BTreeMap<NaiveDate, Vec<&ScheduledChunk>> = BTreeMap::new();
    for chunk in scheduled {
        by_date.entry(chunk.scheduled_date).or_default().push(chunk);
    }

    let mut out = String::new();
    for (date, mut chunks) in by_date {
        chunks.sort_by_key(|c| c.scheduled_start);
        let day = DAY_NAMES[date.weekday().num_days_from_monday() as usize];
        out.push_str(&format!("{day} {date}\n"));
        for c in chunks {
            out.push_str(&format!(
                "  {}  {} ({}/{})\n",
                format_range(c.scheduled_start, c.scheduled_end, format),
                display_title(&c.title, &c.task_id),
                c.chunk_index,
                c.total_chunks
            ));
        }
    }
    out
}

/// Tasks with minutes left over after placement
pub fn render_unscheduled(missing: &BTreeMap<String, u32>) -> String {
    if missing.is_empty() {
        return String::new();
    }
    let mut out = String::from("Unscheduled:\n");
    for (task_id, minutes) in missing {
        out.push_str(&format!("  {task_id}: {minutes} min\n"));
    }
    out
}

/// Free slots for each weekday of the week starting at `week_start`
pub fn render_free_slots(week: &[Vec<FreeSlot>], week_start: NaiveDate, format: TimeFormat) -> String {
    let mut out = String::new();
    for (index, slots) in week.iter().enumerate() {
        let date = week_start + Duration::days(index as i64);
        let name = DAY_NAMES.get(index).copied().unwrap_or("?");
        let total: u32 = slots.iter().map(|s| s.duration).sum();
        out.push_str(&format!("{name} {date}  ({total} min free)\n"));
        for slot in slots {
            out.push_str(&format!("  {}\n", format_range(slot.start, slot.end, format)));
        }
    }
    out
}

/// Ranked tasks in placement order
pub fn render_ranking(ranked: &[RankedTask]) -> String {
    if ranked.is_empty() {
        return "No tasks.\n".to_string();
    }
    let mut out = String::new();
    for (position, task) in ranked.iter().enumerate() {
        let due = if task.score.overdue {
            "overdue".to_string()
        } else {
            format!("due in {}d", task.score.days_until_due)
        };
        let chunks: Vec<String> = task.chunk_minutes.iter().map(u32::to_string).collect();
        out.push_str(&format!(
            "{:>2}. {:<24} score {:>8.3} (x{}, {})  chunks [{}]\n",
            position + 1,
            display_title(&task.title, &task.task_id),
            task.score.score,
            task.score.multiplier,
            due,
            chunks.join(", ")
        ));
    }
    out
}

fn display_title<'a>(title: &'a str, task_id: &'a str) -> &'a str {
    if title.is_empty() {
        task_id
    } else {
        title
    }
}
