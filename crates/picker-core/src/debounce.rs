//! Quiescence-window debouncing.
//!
//! [`Debouncer`] is the clock-injected state machine; [`spawn_debounced`]
//! drives one on a tokio task and forwards settled values over a channel.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, trace};

pub const DEFAULT_WINDOW: Duration = Duration::from_millis(300);

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DebounceState<T> {
    Idle,
    Pending { value: T, deadline: Instant },
}

#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    state: DebounceState<T>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: DebounceState::Idle,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn state(&self) -> &DebounceState<T> {
        &self.state
    }

    /// Replaces any pending value and restarts the window from `now`.
    pub fn update(&mut self, value: T, now: Instant) {
        self.state = DebounceState::Pending {
            value,
            deadline: now + self.window,
        };
    }

    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            DebounceState::Idle => None,
            DebounceState::Pending { deadline, .. } => Some(*deadline),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, DebounceState::Pending { .. })
    }

    /// Emits the pending value once its deadline has passed, returning to idle.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if deadline <= now => {}
            _ => return None,
        }
        match std::mem::replace(&mut self.state, DebounceState::Idle) {
            DebounceState::Pending { value, .. } => Some(value),
            DebounceState::Idle => None,
        }
    }

    /// Drops the pending value, if any, without emitting it.
    pub fn cancel(&mut self) -> Option<T> {
        match std::mem::replace(&mut self.state, DebounceState::Idle) {
            DebounceState::Pending { value, .. } => Some(value),
            DebounceState::Idle => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DebounceInput<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> DebounceInput<T> {
    /// Returns false once the driver has been torn down.
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

/// Owns the driver task. Cancelling or dropping it aborts the task, so a
/// pending value is never emitted after teardown.
#[derive(Debug)]
pub struct DebounceHandle {
    task: JoinHandle<()>,
}

impl DebounceHandle {
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for DebounceHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn spawn_debounced<T>(
    window: Duration,
) -> (DebounceInput<T>, mpsc::UnboundedReceiver<T>, DebounceHandle)
where
    T: Send + 'static,
{
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let (output_tx, output_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run_driver(Debouncer::new(window), input_rx, output_tx));
    (DebounceInput { tx: input_tx }, output_rx, DebounceHandle { task })
}

async fn run_driver<T>(
    mut debouncer: Debouncer<T>,
    mut input: mpsc::UnboundedReceiver<T>,
    output: mpsc::UnboundedSender<T>,
) {
    let mut input_open = true;
    loop {
        if !input_open && !debouncer.is_pending() {
            break;
        }
        let deadline = debouncer.deadline().unwrap_or_else(Instant::now);
        tokio::select! {
            value = input.recv(), if input_open => match value {
                Some(value) => {
                    trace!("debounce window restarted");
                    debouncer.update(value, Instant::now());
                }
                None => input_open = false,
            },
            _ = sleep_until(deadline), if debouncer.is_pending() => {
                if let Some(value) = debouncer.poll(Instant::now())
                    && output.send(value).is_err()
                {
                    break;
                }
            }
        }
    }
    debug!("debounce driver stopped");
}
