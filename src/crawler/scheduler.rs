//! Daily run scheduler
//!
//! This module handles:
//! - Computing the next local wall-clock occurrence of the daily run time
//! - Tracking the scheduler state (idle, waiting, running)
//! - Firing the registered job when it is due and isolating its failures
//! - The blocking poll loop behind `run_scheduler`

use crate::config::{parse_run_at, Config, ScheduleConfig};
use crate::crawler::coordinator::Scraper;
use crate::{ConfigError, ScraperError};
use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDate, NaiveTime, TimeZone};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Longest local-time gap searched past, in minutes
const MAX_GAP_MINUTES: i64 = 4 * 60;

/// Lifecycle of the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No job registered yet
    Idle,

    /// Job registered, waiting for its next fire time
    Waiting,

    /// Job currently executing
    Running,
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Waiting => "waiting",
            Self::Running => "running",
        };
        f.write_str(name)
    }
}

/// A fixed local wall-clock time, once per calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    at: NaiveTime,
}

impl DailySchedule {
    pub fn new(at: NaiveTime) -> Self {
        Self { at }
    }

    /// Builds the schedule from the `[schedule]` section
    pub fn from_config(config: &ScheduleConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(parse_run_at(&config.run_at)?))
    }

    /// The configured time of day
    pub fn at(&self) -> NaiveTime {
        self.at
    }

    /// Returns the first occurrence strictly after `now`, in the zone of `now`
    pub fn next_after<Tz: TimeZone>(&self, now: DateTime<Tz>) -> DateTime<Tz> {
        let tz = now.timezone();
        let today = now.date_naive();
        let candidate = self.on_date(&tz, today);
        if candidate > now {
            return candidate;
        }

        let tomorrow = today.succ_opt().unwrap_or(NaiveDate::MAX);
        self.on_date(&tz, tomorrow)
    }

    /// Resolves the wall-clock time on `date` to an instant in `tz`
    ///
    /// An ambiguous time (clocks going back) resolves to its earlier instant; a
    /// time inside a gap (clocks going forward) moves to the first valid local
    /// minute after the gap.
    fn on_date<Tz: TimeZone>(&self, tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
        let wall = date.and_time(self.at);
        (0..=MAX_GAP_MINUTES)
            .find_map(|m| tz.from_local_datetime(&(wall + ChronoDuration::minutes(m))).earliest())
            .unwrap_or_else(|| tz.from_utc_datetime(&wall))
    }
}

/// Single-job scheduler driven by an external clock
///
/// The caller supplies the current time to every call, so the poll loop and the
/// tests share the same logic.
#[derive(Debug)]
pub struct Scheduler {
    schedule: DailySchedule,
    state: SchedulerState,
    next_run: Option<DateTime<Local>>,
    runs: u64,
    failures: u64,
}

impl Scheduler {
    pub fn new(schedule: DailySchedule) -> Self {
        Self {
            schedule,
            state: SchedulerState::Idle,
            next_run: None,
            runs: 0,
            failures: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Next fire time, once registered
    pub fn next_run(&self) -> Option<DateTime<Local>> {
        self.next_run
    }

    /// Number of completed runs, successful or not
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Number of runs that ended in an error
    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Registers the job, moving Idle → Waiting
    ///
    /// The first run is today if the configured time is still ahead of `now`,
    /// tomorrow otherwise.
    pub fn register(&mut self, now: DateTime<Local>) -> DateTime<Local> {
        let next = self.schedule.next_after(now);
        self.next_run = Some(next);
        self.state = SchedulerState::Waiting;
        next
    }

    /// Returns true if the registered job should fire at `now`
    pub fn is_due(&self, now: DateTime<Local>) -> bool {
        self.state == SchedulerState::Waiting && self.next_run.is_some_and(|next| now >= next)
    }

    /// Runs the job if it is due at `now`
    ///
    /// A failing job is logged and counted; the scheduler goes back to waiting
    /// for the next day either way. Returns true if the job ran.
    pub async fn run_pending<F, Fut, T, E>(&mut self, now: DateTime<Local>, job: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
        E: fmt::Display,
    {
        if !self.is_due(now) {
            return false;
        }

        self.state = SchedulerState::Running;
        tracing::info!("Starting scheduled book scraping...");

        match job().await {
            Ok(items) => {
                tracing::info!("Scheduled run scraped {} books", items.len());
            }
            Err(e) => {
                self.failures += 1;
                tracing::error!("Error during scheduled scraping: {}", e);
            }
        }

        self.runs += 1;
        let next = self.schedule.next_after(now);
        self.next_run = Some(next);
        self.state = SchedulerState::Waiting;
        tracing::info!("Next scheduled run at {}", next.format("%Y-%m-%d %H:%M %Z"));

        true
    }
}

/// Runs a persisted full scrape every day at the configured time
///
/// Blocks forever; the process has to be terminated to stop it. Only
/// configuration and client construction errors are returned.
pub async fn run_scheduler(config: Config) -> Result<(), ScraperError> {
    let schedule = DailySchedule::from_config(&config.schedule)?;
    let poll_interval = Duration::from_secs(config.schedule.poll_interval_secs);
    let scraper = Scraper::new(config)?;

    let mut scheduler = Scheduler::new(schedule);
    let first = scheduler.register(Local::now());
    tracing::info!(
        "Scheduler started: book scraping is scheduled for {} daily, first run at {}",
        schedule.at().format("%H:%M"),
        first.format("%Y-%m-%d %H:%M %Z")
    );

    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        scheduler
            .run_pending(Local::now(), || scraper.scrape_books(true))
            .await;
    }
}
