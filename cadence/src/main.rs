//! cadence - daily habit tracker CLI
//!
//! Tracks recurring habits: mark daily completions, watch streaks and
//! consistency scores, and generate weekly reports.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Database: $XDG_DATA_HOME/cadence/habits.db (~/.local/share/cadence/habits.db)
//! - Logs: $XDG_STATE_HOME/cadence/cadence.log (~/.local/state/cadence/cadence.log)
//! - Config: $XDG_CONFIG_HOME/cadence/config.toml (~/.config/cadence/config.toml)

use anyhow::{Context, Result};
use cadence_core::types::parse_date;
use cadence_core::{
    Config, DashboardData, Database, HabitStats, HabitUpdate, HistoryDay, ReportGenerator,
    ReportOutcome, StatsEngine, WeeklyReport,
};
use chrono::Local;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Daily habit tracker with streaks, consistency scores, and weekly reports")]
#[command(version)]
struct Args {
    /// Emit machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List habits with their stats
    List {
        /// Include deactivated habits
        #[arg(long)]
        all: bool,
    },

    /// Show one habit's stats
    Show {
        /// Habit ID
        id: i64,
    },

    /// Update a habit's name, description, or active flag
    Edit {
        /// Habit ID
        id: i64,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// Activate or deactivate the habit
        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete a habit and its completion history
    Remove {
        /// Habit ID
        id: i64,
    },

    /// Toggle a completion for today or a given date
    Toggle {
        /// Habit ID
        id: i64,

        /// Completion date (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show a habit's calendar history
    History {
        /// Habit ID
        id: i64,

        /// Days to look back (default from config)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Show the cross-habit dashboard
    Dashboard,

    /// Weekly reports
    #[command(subcommand)]
    Report(ReportCommand),
}

#[derive(Subcommand)]
enum ReportCommand {
    /// Generate the report for the week that just ended
    Generate,
    /// Show the most recent report
    Latest,
    /// List all generated reports
    List,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Ensure XDG environment variables are set before using core library
    Config::ensure_xdg_env();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging (best-effort for a short-lived CLI)
    let _log_guard = cadence_core::logging::init(&config.logging).ok();

    let db_path = Config::database_path();
    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    let engine = StatsEngine::with_window(&db, config.analytics.window_days);

    match args.command {
        Command::Add { name, description } => {
            let habit = db
                .create_habit(&name, description.as_deref())
                .context("failed to create habit")?;
            tracing::info!(habit_id = habit.id, "Habit created");
            let stats = engine.habit_stats(habit.id)?;
            if args.json {
                print_json(&stats)?;
            } else {
                println!("Created habit #{}: {}", habit.id, habit.name);
            }
        }

        Command::List { all } => {
            let habits = db.list_habits(all).context("failed to list habits")?;
            let mut stats = Vec::with_capacity(habits.len());
            for habit in &habits {
                stats.push(engine.habit_stats(habit.id)?);
            }
            if args.json {
                print_json(&stats)?;
            } else if stats.is_empty() {
                println!("No habits yet. Create one with `cadence add <name>`.");
            } else {
                for s in &stats {
                    print_habit_line(s);
                }
            }
        }

        Command::Show { id } => {
            let stats = engine.habit_stats(id)?;
            if args.json {
                print_json(&stats)?;
            } else {
                print_habit_detail(&stats);
            }
        }

        Command::Edit {
            id,
            name,
            description,
            active,
        } => {
            let update = HabitUpdate {
                name,
                description: description.map(Some),
                is_active: active,
            };
            let habit = db.update_habit(id, &update)?;
            tracing::info!(habit_id = habit.id, "Habit updated");
            if args.json {
                print_json(&engine.habit_stats(habit.id)?)?;
            } else {
                let state = if habit.is_active { "active" } else { "inactive" };
                println!("Updated habit #{}: {} ({})", habit.id, habit.name, state);
            }
        }

        Command::Remove { id } => {
            if !db.delete_habit(id)? {
                anyhow::bail!("habit not found: {}", id);
            }
            tracing::info!(habit_id = id, "Habit deleted");
            if args.json {
                print_json(&serde_json::json!({ "deleted": id }))?;
            } else {
                println!("Deleted habit #{} and its completion history.", id);
            }
        }

        Command::Toggle { id, date } => {
            let date = match date {
                Some(s) => parse_date(&s)?,
                None => Local::now().date_naive(),
            };
            let completed = db.toggle_completion(id, date)?;
            tracing::info!(habit_id = id, %date, completed, "Completion toggled");
            let stats = engine.habit_stats(id)?;
            if args.json {
                print_json(&serde_json::json!({
                    "completed": completed,
                    "date": date,
                    "stats": stats,
                }))?;
            } else {
                let verb = if completed { "Completed" } else { "Cleared" };
                println!("{} {} for {}", verb, stats.habit.name, date);
                print_habit_line(&stats);
            }
        }

        Command::History { id, days } => {
            let days = days.unwrap_or(config.analytics.history_days);
            let history = engine.history(id, days)?;
            if args.json {
                print_json(&history)?;
            } else {
                print_history(&history);
            }
        }

        Command::Dashboard => {
            let data = engine.dashboard()?;
            if args.json {
                print_json(&data)?;
            } else {
                print_dashboard(&data);
            }
        }

        Command::Report(report_cmd) => match report_cmd {
            ReportCommand::Generate => {
                let outcome = ReportGenerator::new(&db)
                    .generate()
                    .context("failed to generate report")?;
                match &outcome {
                    ReportOutcome::Generated(report) => {
                        if args.json {
                            print_json(report)?;
                        } else {
                            println!("Generated report for week of {}.", report.week_start);
                            print_report(report);
                        }
                    }
                    ReportOutcome::AlreadyExists(report) => {
                        if args.json {
                            print_json(report)?;
                        } else {
                            println!(
                                "Report for week of {} already exists (generated {}).",
                                report.week_start,
                                report.generated_at.format("%Y-%m-%d %H:%M")
                            );
                            print_report(report);
                        }
                    }
                    ReportOutcome::NoActiveHabits => {
                        if args.json {
                            print_json(&serde_json::json!({ "message": "no active habits" }))?;
                        } else {
                            println!("No active habits - nothing to report.");
                        }
                    }
                }
            }
            ReportCommand::Latest => match db.latest_report()? {
                Some(report) => {
                    if args.json {
                        print_json(&report)?;
                    } else {
                        print_report(&report);
                    }
                }
                None => {
                    if args.json {
                        print_json(&serde_json::json!({ "message": "no reports" }))?;
                    } else {
                        println!("No reports generated yet.");
                    }
                }
            },
            ReportCommand::List => {
                let reports = db.list_reports()?;
                if args.json {
                    print_json(&reports)?;
                } else if reports.is_empty() {
                    println!("No reports generated yet.");
                } else {
                    for report in &reports {
                        println!(
                            "Week {} .. {}: {} habits, {} completions, score {:.1}",
                            report.week_start,
                            report.week_end,
                            report.total_habits,
                            report.total_completions,
                            report.overall_score
                        );
                    }
                }
            }
        },
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_habit_line(stats: &HabitStats) {
    let marker = if stats.habit.is_active { "" } else { " (inactive)" };
    println!(
        "{} #{:<3} {:<24} streak {:<3} best {:<3} score {:>5.1}{}",
        stats.health.icon,
        stats.habit.id,
        stats.habit.name,
        stats.current_streak,
        stats.longest_streak,
        stats.consistency_score,
        marker
    );
}

fn print_habit_detail(stats: &HabitStats) {
    println!("#{} {}", stats.habit.id, stats.habit.name);
    if let Some(desc) = &stats.habit.description {
        println!("  {}", desc);
    }
    println!(
        "  Created:     {}",
        stats.habit.created_at.format("%Y-%m-%d")
    );
    println!("  Streak:      {} (best {})", stats.current_streak, stats.longest_streak);
    println!(
        "  Consistency: {:.1}% ({} {})",
        stats.consistency_score,
        stats.health.icon,
        stats.health.status
    );
    println!("  Completions: {} total", stats.total_completions);
}

fn print_history(history: &[HistoryDay]) {
    for day in history {
        let mark = if day.completed { "x" } else { "." };
        println!("{}  [{}]", day.date, mark);
    }
    let done = history.iter().filter(|h| h.completed).count();
    println!("{} of {} days completed", done, history.len());
}

fn print_dashboard(data: &DashboardData) {
    println!("Dashboard for {}", data.date);
    println!(
        "  Overall: {:.1}% {} {}   Habits: {}   Completed today: {}",
        data.overall_score,
        data.overall_health.icon,
        data.overall_health.status,
        data.total_habits,
        data.today_completions
    );
    println!();
    for stats in &data.habits {
        print_habit_line(stats);
    }
}

fn print_report(report: &WeeklyReport) {
    println!(
        "Weekly report {} .. {} (generated {})",
        report.week_start,
        report.week_end,
        report.generated_at.format("%Y-%m-%d %H:%M")
    );
    println!(
        "  Habits: {}   Completions: {}   Overall score: {:.1}",
        report.total_habits, report.total_completions, report.overall_score
    );
    for entry in &report.habit_reports {
        println!(
            "  - {:<24} {}/7 days, score {:>5.1}, streak {:<3} [{}]",
            entry.habit_name,
            entry.completions,
            entry.consistency_score,
            entry.streak,
            entry.health_status
        );
    }
}
