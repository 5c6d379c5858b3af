// src/scheduler.rs

//! Cooperative job scheduler.
//!
//! One loop polls for due jobs and runs each to completion before looking
//! again, so two cycles never overlap. A cycle that panics is logged and the
//! loop carries on. Jobs:
//!
//! - check: every `check_interval_secs`
//! - summary: daily at `summary_time` (local time)

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Days, Local, NaiveTime, TimeZone};
use tokio::time::MissedTickBehavior;

use crate::error::Result;
use crate::models::ScheduleConfig;
use crate::pipeline::Pipeline;

/// Work the scheduler can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Check,
    Summary,
}

/// Runs the cycles behind each job kind.
#[async_trait]
pub trait CycleRunner: Send + Sync {
    async fn run_check(&self);
    async fn run_summary(&self);
}

#[async_trait]
impl CycleRunner for Pipeline {
    async fn run_check(&self) {
        self.run_check_cycle().await;
    }

    async fn run_summary(&self) {
        self.run_summary_cycle().await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cadence {
    Every(chrono::Duration),
    DailyAt(NaiveTime),
}

impl Cadence {
    fn next_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> DateTime<Tz> {
        match self {
            Cadence::Every(interval) => after.clone() + *interval,
            Cadence::DailyAt(at) => next_daily_run(after, *at),
        }
    }
}

#[derive(Debug, Clone)]
struct Job {
    kind: JobKind,
    cadence: Cadence,
    next_run: DateTime<Local>,
}

/// Next occurrence of the local time `at` strictly after `after`.
///
/// Times skipped by a DST jump resolve to the following day's occurrence.
pub fn next_daily_run<Tz: TimeZone>(after: &DateTime<Tz>, at: NaiveTime) -> DateTime<Tz> {
    let tz = after.timezone();
    let today = after.date_naive();

    for offset in 0..=2 {
        let Some(date) = today.checked_add_days(Days::new(offset)) else {
            break;
        };
        if let Some(candidate) = tz.from_local_datetime(&date.and_time(at)).earliest() {
            if candidate > *after {
                return candidate;
            }
        }
    }
    after.clone() + chrono::Duration::days(1)
}

/// Single-loop scheduler for the check and summary jobs.
#[derive(Debug, Clone)]
pub struct Scheduler {
    jobs: Vec<Job>,
    poll_interval: Duration,
}

impl Scheduler {
    /// Build the schedule, with the first runs computed from `now`.
    ///
    /// The check job is first due one interval after `now`; the startup
    /// check is run by the caller.
    pub fn from_config(config: &ScheduleConfig, now: DateTime<Local>) -> Result<Self> {
        let summary_at = config.summary_time()?;
        let interval_secs = config.check_interval_secs.min(u64::from(u32::MAX));
        let check = Cadence::Every(chrono::Duration::seconds(interval_secs as i64));
        let summary = Cadence::DailyAt(summary_at);

        let jobs = vec![
            Job {
                kind: JobKind::Check,
                cadence: check,
                next_run: check.next_after(&now),
            },
            Job {
                kind: JobKind::Summary,
                cadence: summary,
                next_run: summary.next_after(&now),
            },
        ];

        Ok(Self {
            jobs,
            poll_interval: Duration::from_secs(config.poll_interval_secs.max(1)),
        })
    }

    /// When `kind` will next run.
    pub fn next_run(&self, kind: JobKind) -> Option<DateTime<Local>> {
        self.jobs
            .iter()
            .find(|job| job.kind == kind)
            .map(|job| job.next_run)
    }

    /// Indices of due jobs, earliest first.
    fn due(&self, now: DateTime<Local>) -> Vec<usize> {
        let mut due: Vec<usize> = (0..self.jobs.len())
            .filter(|&i| self.jobs[i].next_run <= now)
            .collect();
        due.sort_by_key(|&i| self.jobs[i].next_run);
        due
    }

    /// Run every due job in turn, each to completion, and reschedule it.
    ///
    /// Returns the kinds that ran, including jobs whose cycle panicked.
    pub async fn run_pending(&mut self, runner: &Arc<dyn CycleRunner>) -> Vec<JobKind> {
        let mut ran = Vec::new();

        for idx in self.due(Local::now()) {
            let kind = self.jobs[idx].kind;
            log::debug!("Running {:?} job", kind);

            let task_runner = Arc::clone(runner);
            let handle = tokio::spawn(async move {
                match kind {
                    JobKind::Check => task_runner.run_check().await,
                    JobKind::Summary => task_runner.run_summary().await,
                }
            });
            if let Err(e) = handle.await {
                log::error!("{:?} job aborted: {}", kind, e);
            }

            let job = &mut self.jobs[idx];
            job.next_run = job.cadence.next_after(&Local::now());
            log::debug!("Next {:?} run at {}", kind, job.next_run.format("%Y-%m-%d %H:%M:%S"));
            ran.push(kind);
        }

        ran
    }

    /// Poll for due jobs until `shutdown` resolves.
    ///
    /// A running cycle is never interrupted; shutdown is observed between polls.
    pub async fn run<F>(mut self, runner: Arc<dyn CycleRunner>, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    log::info!("Scheduler stopping.");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_pending(&runner).await;
                }
            }
        }
    }
}
