//! Weekly schedule commands for CLI.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use weekplan_core::{unscheduled_minutes_by_task, week_monday, Config, WeeklyScheduler};

use crate::display;
use crate::input::{read_busy, read_tasks};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Generate this week's work sessions
    Generate {
        /// JSON file with an array of tasks
        #[arg(long)]
        tasks: PathBuf,
        /// JSON file with an array of {day, start, end} busy intervals
        #[arg(long)]
        busy: Option<PathBuf>,
        /// Anchor date (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Print scheduled chunks as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show free time per weekday
    Gaps {
        /// JSON file with an array of {day, start, end} busy intervals
        #[arg(long)]
        busy: Option<PathBuf>,
        /// Anchor date (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Print free slots as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show tasks in scheduling order with their scores
    Rank {
        /// JSON file with an array of tasks
        #[arg(long)]
        tasks: PathBuf,
        /// Anchor date (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Print the ranking as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let scheduler = WeeklyScheduler::with_config(config.scheduler.clone());
    let time_format = config.display.time_format;

    match action {
        ScheduleAction::Generate {
            tasks,
            busy,
            today,
            json,
        } => {
            let tasks = read_tasks(&tasks)?;
            let busy = read_busy(busy.as_deref())?;
            let today = today.unwrap_or_else(|| Local::now().date_naive());

            let scheduled = scheduler.generate_schedule(&tasks, &busy, today)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&scheduled)?);
            } else {
                println!("Week of {}", week_monday(today));
                print!("{}", display::render_schedule(&scheduled, time_format));
                if config.display.show_unscheduled {
                    let missing = unscheduled_minutes_by_task(&tasks, &scheduled);
                    print!("{}", display::render_unscheduled(&missing));
                }
            }
        }
        ScheduleAction::Gaps { busy, today, json } => {
            let busy = read_busy(busy.as_deref())?;
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let week = scheduler.free_slots(&busy)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&week)?);
            } else {
                print!(
                    "{}",
                    display::render_free_slots(&week, week_monday(today), time_format)
                );
            }
        }
        ScheduleAction::Rank { tasks, today, json } => {
            let tasks = read_tasks(&tasks)?;
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let ranked = scheduler.rank(&tasks, today)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&ranked)?);
            } else {
                print!("{}", display::render_ranking(&ranked));
            }
        }
    }
    Ok(())
}
