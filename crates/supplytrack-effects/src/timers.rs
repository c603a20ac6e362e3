//! Tokio timer handler
//!
//! Each timer is a spawned task that sleeps and then posts
//! `ClientInput::TimerFired` to the event loop's queue. Cancelling aborts the
//! task, so a cancelled timer never reaches the client.

use std::collections::HashMap;
use std::time::Duration;
use supplytrack_core::{ClientInput, TimerEffects, TimerId, TimerTask};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::trace;

/// Timer handler backed by tokio tasks
#[derive(Debug)]
pub struct TokioTimers {
    handle: Handle,
    inputs: UnboundedSender<ClientInput>,
    next_id: u64,
    tasks: HashMap<TimerId, JoinHandle<()>>,
}

impl TokioTimers {
    /// Create a handler spawning onto `handle` and posting to `inputs`
    pub fn new(handle: Handle, inputs: UnboundedSender<ClientInput>) -> Self {
        Self {
            handle,
            inputs,
            next_id: 0,
            tasks: HashMap::new(),
        }
    }

    /// Timers whose tasks are still alive
    pub fn active(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }

    fn allocate(&mut self) -> TimerId {
        // Finished one-shot timers are dropped lazily
        self.tasks.retain(|_, task| !task.is_finished());
        self.next_id += 1;
        TimerId::new(self.next_id)
    }
}

impl TimerEffects for TokioTimers {
    fn schedule_once(&mut self, delay: Duration, task: TimerTask) -> TimerId {
        let timer = self.allocate();
        let inputs = self.inputs.clone();
        let join = self.handle.spawn(async move {
            time::sleep(delay).await;
            let _ = inputs.send(ClientInput::TimerFired { timer, task });
        });
        self.tasks.insert(timer, join);
        trace!(%timer, ?task, delay_ms = delay.as_millis() as u64, "Timer scheduled");
        timer
    }

    fn schedule_repeating(&mut self, interval: Duration, task: TimerTask) -> TimerId {
        let timer = self.allocate();
        let inputs = self.inputs.clone();
        let period = interval.max(Duration::from_millis(1));
        let join = self.handle.spawn(async move {
            let mut ticks = time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if inputs.send(ClientInput::TimerFired { timer, task }).is_err() {
                    break;
                }
            }
        });
        self.tasks.insert(timer, join);
        trace!(%timer, ?task, interval_ms = period.as_millis() as u64, "Repeating timer scheduled");
        timer
    }

    fn cancel(&mut self, timer: TimerId) -> bool {
        match self.tasks.remove(&timer) {
            Some(task) => {
                let pending = !task.is_finished();
                task.abort();
                pending
            }
            None => false,
        }
    }
}

impl Drop for TokioTimers {
    fn drop(&mut self) {
        for task in self.tasks.values() {
            task.abort();
        }
    }
}
