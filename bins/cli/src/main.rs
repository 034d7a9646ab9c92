//! Bursar command line
//!
//! Answers schedule and budget questions against a JSON snapshot and prints
//! the results as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use bursar_core::repository::{Clock, FixedClock, SystemClock};
use bursar_core::service::{BudgetPlanService, ScheduleService};
use bursar_shared::AppConfig;
use bursar_shared::types::{BudgetPlanId, ScheduleId, UserId};
use bursar_store::InMemoryStore;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Snapshot file (overrides `store.snapshot_path`)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Next due date of a schedule
    Next {
        /// Schedule ID
        schedule: ScheduleId,
    },
    /// Occurrences of a schedule inside a date window
    Occurrences {
        /// Schedule ID
        schedule: ScheduleId,
        /// First day of the window
        #[arg(long)]
        from: NaiveDate,
        /// Last day of the window, inclusive
        #[arg(long)]
        to: NaiveDate,
    },
    /// Payments of all active schedules; defaults to the upcoming window
    Payments {
        /// First day of the window
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,
        /// Last day of the window, inclusive
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
    },
    /// Budget plan report, optionally finalizing the plan
    Plan {
        /// Plan ID
        #[arg(long, conflicts_with = "year")]
        id: Option<BudgetPlanId>,
        /// Plan year
        #[arg(long)]
        year: Option<i32>,
        /// Finalize the plan and write the snapshot back
        #[arg(long, requires = "user")]
        finalize: bool,
        /// User recorded as finalizer
        #[arg(long)]
        user: Option<UserId>,
    },
}

enum RunClock {
    System(SystemClock),
    Fixed(FixedClock),
}

impl Clock for RunClock {
    fn now(&self) -> DateTime<Utc> {
        match self {
            Self::System(clock) => clock.now(),
            Self::Fixed(clock) => clock.now(),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let snapshot_path = cli
        .snapshot
        .clone()
        .unwrap_or_else(|| config.store.snapshot_path.clone());

    let store = Arc::new(InMemoryStore::load(&snapshot_path)?);
    let clock = Arc::new(match cli.today {
        Some(today) => RunClock::Fixed(FixedClock(today)),
        None => RunClock::System(SystemClock),
    });
    info!(snapshot = %snapshot_path.display(), today = %clock.today(), "Bursar ready");

    match cli.command {
        Command::Next { schedule } => {
            let service =
                ScheduleService::new(store, clock, config.projection.upcoming_days);
            print_json(&service.next_payment(schedule)?)
        }
        Command::Occurrences { schedule, from, to } => {
            let service =
                ScheduleService::new(store, clock, config.projection.upcoming_days);
            print_json(&service.occurrences(schedule, from, to)?)
        }
        Command::Payments { from, to } => {
            let service =
                ScheduleService::new(store, clock, config.projection.upcoming_days);
            let projection = match (from, to) {
                (Some(from), Some(to)) => service.payments_between(from, to)?,
                _ => service.upcoming_payments()?,
            };
            print_json(&projection)
        }
        Command::Plan {
            id,
            year,
            finalize,
            user,
        } => {
            let service = BudgetPlanService::new(Arc::clone(&store), clock);
            let plan_id = match (id, year) {
                (Some(id), _) => id,
                (None, Some(year)) => service.plan_for_year(year)?.id,
                (None, None) => bail!("either --id or --year is required"),
            };

            if finalize && let Some(user) = user {
                let plan = service.finalize(plan_id, user)?;
                store.upsert_plan(plan)?;
                store.save(&snapshot_path)?;
                info!(plan_id = %plan_id, "Snapshot updated");
            }

            print_json(&service.report(plan_id)?)
        }
    }
}
