//! Manually advanced clock

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;
use supplytrack_core::{TimerEffects, TimerId, TimerTask};

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due: Duration,
    period: Option<Duration>,
    task: TimerTask,
}

#[derive(Debug, Default)]
struct ClockState {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<TimerId, Scheduled>,
}

impl ClockState {
    /// Earliest timer due at or before `deadline`; ties go to the older timer
    fn next_due(&self, deadline: Duration) -> Option<TimerId> {
        self.timers
            .iter()
            .filter(|(_, scheduled)| scheduled.due <= deadline)
            .min_by_key(|(id, scheduled)| (scheduled.due, **id))
            .map(|(id, _)| *id)
    }

    fn fire(&mut self, id: TimerId) -> Option<TimerTask> {
        let scheduled = self.timers.get_mut(&id)?;
        let task = scheduled.task;
        self.now = self.now.max(scheduled.due);
        match scheduled.period {
            Some(period) => scheduled.due += period,
            None => {
                self.timers.remove(&id);
            }
        }
        Some(task)
    }
}

/// Timer handler driven by explicit clock advances
#[derive(Debug, Clone, Default)]
pub struct ManualTimers {
    state: Rc<RefCell<ClockState>>,
}

impl ManualTimers {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed virtual time
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Timers still scheduled
    pub fn pending(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Whether `timer` is still scheduled
    pub fn is_scheduled(&self, timer: TimerId) -> bool {
        self.state.borrow().timers.contains_key(&timer)
    }

    /// Scheduled tasks with their next due time, soonest first
    pub fn scheduled(&self) -> Vec<(Duration, TimerTask)> {
        let state = self.state.borrow();
        let mut tasks: Vec<_> = state
            .timers
            .values()
            .map(|scheduled| (scheduled.due, scheduled.task))
            .collect();
        tasks.sort_by_key(|(due, _)| *due);
        tasks
    }

    /// Move the clock forward by `by`, firing every timer that falls due in
    /// order. `on_fire` runs with no borrow held, so it may schedule or cancel
    /// timers on another handle to this clock.
    pub fn advance(&self, by: Duration, mut on_fire: impl FnMut(TimerId, TimerTask)) {
        let deadline = self.now() + by;
        loop {
            let fired = {
                let mut state = self.state.borrow_mut();
                state
                    .next_due(deadline)
                    .and_then(|id| state.fire(id).map(|task| (id, task)))
            };
            match fired {
                Some((id, task)) => on_fire(id, task),
                None => break,
            }
        }
        self.state.borrow_mut().now = deadline;
    }

    fn insert(&self, delay: Duration, period: Option<Duration>, task: TimerTask) -> TimerId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = TimerId::new(state.next_id);
        let due = state.now + delay;
        state.timers.insert(id, Scheduled { due, period, task });
        id
    }
}

impl TimerEffects for ManualTimers {
    fn schedule_once(&mut self, delay: Duration, task: TimerTask) -> TimerId {
        self.insert(delay, None, task)
    }

    fn schedule_repeating(&mut self, interval: Duration, task: TimerTask) -> TimerId {
        let interval = interval.max(Duration::from_millis(1));
        self.insert(interval, Some(interval), task)
    }

    fn cancel(&mut self, timer: TimerId) -> bool {
        self.state.borrow_mut().timers.remove(&timer).is_some()
    }
}
