//! Cooperative timer for the match clock and delayed transitions.
//!
//! Nothing here sleeps or spawns. The host advances the scheduler's clock
//! and drains whatever fell due, in due-time order:
//!
//! ```text
//! host ──advance(dt)──▶ GameManager ──pop_due(until)──▶ Scheduler
//!                           ▲                              │
//!                           └────── Fired::Tick / Task ────┘
//! ```
//!
//! Deferred tasks carry the epoch they were scheduled in. Bumping the epoch
//! (on restart or teardown) makes every older task inert.

use std::time::Duration;

/// Work deferred until after a presentation delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Reveal the shot: goal or miss
    ResolveShot { success: bool },
    /// Move to the next possession or end the match
    AdvancePossession,
}

/// Something that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fired {
    Tick,
    Task(Task),
}

#[derive(Debug, Clone, Copy)]
struct Interval {
    period: Duration,
    next_due: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Deferred {
    due: Duration,
    epoch: u64,
    seq: u64,
    task: Task,
}

/// Interval timer plus a queue of epoch-tagged deferred tasks.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    epoch: u64,
    next_seq: u64,
    interval: Option<Interval>,
    pending: Vec<Deferred>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler clock: total time advanced so far.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Start (or restart) the interval; the first tick is one period away.
    pub fn start_interval(&mut self, period: Duration) {
        let period = period.max(Duration::from_millis(1));
        self.interval = Some(Interval {
            period,
            next_due: self.now + period,
        });
    }

    /// Stop the interval. Safe to call when already stopped.
    pub fn stop_interval(&mut self) {
        self.interval = None;
    }

    pub fn is_interval_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Run `task` after `delay`, tied to the current epoch.
    pub fn schedule(&mut self, delay: Duration, task: Task) {
        self.pending.push(Deferred {
            due: self.now + delay,
            epoch: self.epoch,
            seq: self.next_seq,
            task,
        });
        self.next_seq += 1;
    }

    /// Invalidate every pending task and stop the interval.
    pub fn cancel_all(&mut self) {
        self.epoch += 1;
        self.stop_interval();
        let epoch = self.epoch;
        self.pending.retain(|d| d.epoch == epoch);
    }

    /// Number of live deferred tasks.
    pub fn pending_count(&self) -> usize {
        self.pending.iter().filter(|d| d.epoch == self.epoch).count()
    }

    /// Pop the earliest event due at or before `until`, moving the clock to it.
    ///
    /// A tick and a task due at the same instant fire tick first; tasks due
    /// together fire in scheduling order. Returns `None` once nothing else
    /// is due; call [`settle`](Self::settle) afterwards.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired> {
        let epoch = self.epoch;
        self.pending.retain(|d| d.epoch == epoch);

        let next_task = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, d)| d.due <= until)
            .min_by_key(|(_, d)| (d.due, d.seq))
            .map(|(index, d)| (index, d.due));
        let next_tick = self
            .interval
            .map(|i| i.next_due)
            .filter(|due| *due <= until);

        match (next_tick, next_task) {
            (Some(tick), Some((_, task_due))) if tick <= task_due => Some(self.fire_tick(tick)),
            (Some(tick), None) => Some(self.fire_tick(tick)),
            (_, Some((index, due))) => {
                let deferred = self.pending.remove(index);
                self.now = self.now.max(due);
                Some(Fired::Task(deferred.task))
            }
            (None, None) => None,
        }
    }

    /// Move the clock to `until` once everything due has been drained.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    fn fire_tick(&mut self, due: Duration) -> Fired {
        self.now = self.now.max(due);
        if let Some(interval) = self.interval.as_mut() {
            interval.next_due = due + interval.period;
        }
        Fired::Tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut Scheduler, until: Duration) -> Vec<Fired> {
        let mut fired = Vec::new();
        while let Some(f) = scheduler.pop_due(until) {
            fired.push(f);
        }
        scheduler.settle(until);
        fired
    }

    #[test]
    fn test_interval_ticks() {
        let mut scheduler = Scheduler::new();
        scheduler.start_interval(Duration::from_millis(100));

        assert!(drain(&mut scheduler, Duration::from_millis(99)).is_empty());
        assert_eq!(drain(&mut scheduler, Duration::from_millis(350)).len(), 3);
        assert_eq!(scheduler.now(), Duration::from_millis(350));
        assert_eq!(drain(&mut scheduler, Duration::from_millis(400)).len(), 1);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut scheduler = Scheduler::new();
        scheduler.start_interval(Duration::from_millis(100));
        scheduler.stop_interval();
        scheduler.stop_interval();
        assert!(!scheduler.is_interval_running());
        assert!(drain(&mut scheduler, Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn test_tasks_fire_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Duration::from_millis(2000), Task::AdvancePossession);
        scheduler.schedule(Duration::from_millis(1500), Task::ResolveShot { success: true });

        let fired = drain(&mut scheduler, Duration::from_secs(3));
        assert_eq!(
            fired,
            vec![
                Fired::Task(Task::ResolveShot { success: true }),
                Fired::Task(Task::AdvancePossession),
            ]
        );
    }

    #[test]
    fn test_ticks_interleave_with_tasks() {
        let mut scheduler = Scheduler::new();
        scheduler.start_interval(Duration::from_millis(100));
        scheduler.schedule(Duration::from_millis(150), Task::AdvancePossession);

        let fired = drain(&mut scheduler, Duration::from_millis(200));
        assert_eq!(
            fired,
            vec![Fired::Tick, Fired::Task(Task::AdvancePossession), Fired::Tick]
        );
    }

    #[test]
    fn test_cancel_all_drops_stale_tasks() {
        let mut scheduler = Scheduler::new();
        scheduler.start_interval(Duration::from_millis(100));
        scheduler.schedule(Duration::from_millis(500), Task::AdvancePossession);
        assert_eq!(scheduler.pending_count(), 1);

        scheduler.cancel_all();
        assert_eq!(scheduler.pending_count(), 0);
        assert!(drain(&mut scheduler, Duration::from_secs(1)).is_empty());

        scheduler.schedule(Duration::from_millis(100), Task::AdvancePossession);
        assert_eq!(drain(&mut scheduler, Duration::from_secs(2)).len(), 1);
    }
}
