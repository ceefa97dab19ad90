//! Daily polling scheduler and the yearly detection entry point.
//!
//! The scheduler fires a job once per day at a fixed wall-clock time. The job
//! used in production, [`YearlyDetection`], re-checks the calendar date and
//! only does work on the configured trigger day.

mod clock;
mod yearly;

pub use clock::{Clock, SystemClock};
pub use yearly::{DetectionOutcome, YearlyDetection, YearlyRunError, YearlyTrigger};

use chrono::{Duration as ChronoDuration, NaiveDateTime, NaiveTime};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;
use tracing::{debug, info};

/// "Every day at `at`". The first run is the next occurrence of `at` strictly
/// after the first poll, so starting the process at 10:00 with `at = 00:00`
/// waits for the following midnight.
#[derive(Debug, Clone)]
pub struct DailySchedule {
    at: NaiveTime,
    next_run: Option<NaiveDateTime>,
}

impl DailySchedule {
    pub fn new(at: NaiveTime) -> Self {
        Self { at, next_run: None }
    }

    pub fn next_run(&self) -> Option<NaiveDateTime> {
        self.next_run
    }

    /// Returns whether the job is due at `now` and advances to the next day
    /// when it is.
    pub fn poll(&mut self, now: NaiveDateTime) -> bool {
        let at = self.at;
        let next = *self
            .next_run
            .get_or_insert_with(|| occurrence_after(at, now));
        if now < next {
            return false;
        }
        self.next_run = Some(occurrence_after(at, now));
        true
    }
}

fn occurrence_after(at: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        today + ChronoDuration::days(1)
    }
}

/// Stops a running [`Scheduler`]. Cloneable so the job itself can hold one.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    stop: Sender<()>,
}

impl SchedulerHandle {
    pub fn stop(&self) {
        // A closed channel means the scheduler has already exited.
        let _ = self.stop.send(());
    }
}

/// Single periodic timer driving one job. Polls the clock every
/// `poll_interval`; the wait is interrupted by [`SchedulerHandle::stop`].
pub struct Scheduler<C: Clock> {
    schedule: DailySchedule,
    poll_interval: Duration,
    clock: C,
    stop_tx: Sender<()>,
    stop_rx: Receiver<()>,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(schedule: DailySchedule, poll_interval: Duration, clock: C) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel();
        Self {
            schedule,
            poll_interval,
            clock,
            stop_tx,
            stop_rx,
        }
    }

    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            stop: self.stop_tx.clone(),
        }
    }

    /// Blocks until stopped. Each due tick runs `job` to completion before the
    /// next poll.
    pub fn run<F>(mut self, mut job: F)
    where
        F: FnMut(NaiveDateTime),
    {
        info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            "scheduler started"
        );

        loop {
            let now = self.clock.now();
            if self.schedule.poll(now) {
                debug!(%now, "scheduled job due");
                job(now);
            }

            match self.stop_rx.recv_timeout(self.poll_interval) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        info!("scheduler stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .expect("valid timestamp")
    }

    fn midnight() -> NaiveTime {
        NaiveTime::from_hms_opt(0, 0, 0).expect("valid time")
    }

    struct ScriptedClock {
        ticks: RefCell<VecDeque<NaiveDateTime>>,
        last: NaiveDateTime,
    }

    impl ScriptedClock {
        fn new(ticks: Vec<NaiveDateTime>) -> Self {
            let last = *ticks.last().expect("at least one tick");
            Self {
                ticks: RefCell::new(ticks.into()),
                last,
            }
        }
    }

    impl Clock for ScriptedClock {
        fn now(&self) -> NaiveDateTime {
            self.ticks.borrow_mut().pop_front().unwrap_or(self.last)
        }
    }

    #[test]
    fn first_run_waits_for_next_occurrence() {
        let mut schedule = DailySchedule::new(midnight());
        assert!(!schedule.poll(at(2024, 12, 31, 10, 0)));
        assert_eq!(schedule.next_run(), Some(at(2025, 1, 1, 0, 0)));
        assert!(!schedule.poll(at(2024, 12, 31, 23, 59)));
        assert!(schedule.poll(at(2025, 1, 1, 0, 1)));
        assert_eq!(schedule.next_run(), Some(at(2025, 1, 2, 0, 0)));
    }

    #[test]
    fn fires_once_per_day() {
        let mut schedule = DailySchedule::new(NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        assert!(!schedule.poll(at(2025, 3, 1, 5, 0)));
        assert!(schedule.poll(at(2025, 3, 1, 6, 0)));
        assert!(!schedule.poll(at(2025, 3, 1, 6, 1)));
        assert!(!schedule.poll(at(2025, 3, 1, 23, 0)));
        assert!(schedule.poll(at(2025, 3, 2, 6, 0)));
    }

    #[test]
    fn missed_days_fire_once_on_resume() {
        let mut schedule = DailySchedule::new(midnight());
        assert!(!schedule.poll(at(2025, 1, 1, 12, 0)));
        assert!(schedule.poll(at(2025, 1, 5, 9, 0)));
        assert!(!schedule.poll(at(2025, 1, 5, 9, 1)));
        assert_eq!(schedule.next_run(), Some(at(2025, 1, 6, 0, 0)));
    }

    #[test]
    fn stop_before_run_exits_after_first_poll() {
        let clock = ScriptedClock::new(vec![at(2025, 6, 1, 12, 0)]);
        let scheduler = Scheduler::new(
            DailySchedule::new(midnight()),
            Duration::from_secs(3600),
            clock,
        );
        scheduler.handle().stop();

        let mut fired = 0;
        scheduler.run(|_| fired += 1);
        assert_eq!(fired, 0);
    }

    #[test]
    fn job_runs_when_due_and_can_stop_the_loop() {
        let clock = ScriptedClock::new(vec![
            at(2024, 12, 31, 23, 58),
            at(2024, 12, 31, 23, 59),
            at(2025, 1, 1, 0, 0),
        ]);
        let scheduler = Scheduler::new(
            DailySchedule::new(midnight()),
            Duration::from_millis(1),
            clock,
        );
        let handle = scheduler.handle();

        let mut fired_at = Vec::new();
        scheduler.run(|now| {
            fired_at.push(now);
            handle.stop();
        });
        assert_eq!(fired_at, vec![at(2025, 1, 1, 0, 0)]);
    }
}
