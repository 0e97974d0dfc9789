// scheduler.rs - Fixed-interval stepping gated on the display refresh

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

/// Where the step loop is currently suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No loop is pending.
    #[default]
    Idle,
    /// Waiting for the inter-generation delay to elapse.
    Delay,
    /// Delay elapsed, waiting for the next display refresh.
    AwaitingFrame,
}

/// Refresh signal raised by the host once per rendered frame.
#[derive(Debug, Clone, Default)]
pub struct FrameSignal {
    notify: Arc<Notify>,
}

impl FrameSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wake a loop waiting for its next frame. Frames nobody waits on are
    /// dropped: a step only runs on a refresh that follows its delay.
    pub fn frame(&self) {
        self.notify.notify_waiters();
    }
}

/// State driven by the step loop.
pub trait Tick: Send + 'static {
    /// Loop generation currently allowed to run. Any loop launched with a
    /// different epoch is stale and must not touch the state.
    fn epoch(&self) -> u64;

    fn set_phase(&mut self, phase: Phase);

    /// Run one step; `Break` ends the loop.
    fn tick(&mut self) -> ControlFlow<()>;
}

/// Lock that survives a panic in another holder. Every mutation leaves the
/// grid consistent, so a poisoned guard is still usable.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("recovering poisoned simulation lock");
        poisoned.into_inner()
    })
}

/// Owns the pending step loop: at most one task at a time.
pub struct Scheduler {
    runtime: Handle,
    frames: FrameSignal,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(runtime: Handle, interval: Duration) -> Self {
        Self {
            runtime,
            frames: FrameSignal::new(),
            interval,
            task: None,
        }
    }

    pub fn frames(&self) -> &FrameSignal {
        &self.frames
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Replace any running loop with a fresh one bound to `epoch`.
    pub fn launch<T: Tick>(&mut self, target: Arc<Mutex<T>>, epoch: u64) {
        self.cancel();
        let frames = self.frames.clone();
        let interval = self.interval;
        self.task = Some(self.runtime.spawn(run_loop(target, frames, interval, epoch)));
    }

    /// Abort the pending delay or frame wait, whichever is outstanding.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Record `phase` unless this loop went stale. Returns whether to go on.
fn enter<T: Tick>(target: &Mutex<T>, epoch: u64, phase: Phase) -> bool {
    let mut state = lock(target);
    if state.epoch() != epoch {
        return false;
    }
    state.set_phase(phase);
    true
}

async fn run_loop<T: Tick>(target: Arc<Mutex<T>>, frames: FrameSignal, interval: Duration, epoch: u64) {
    loop {
        if !enter(&target, epoch, Phase::Delay) {
            return;
        }
        tokio::time::sleep(interval).await;

        // registered before the phase is published, so a frame raised right
        // after cannot slip past
        let next_frame = frames.notify.notified();
        if !enter(&target, epoch, Phase::AwaitingFrame) {
            return;
        }
        next_frame.await;

        let flow = {
            let mut state = lock(&target);
            if state.epoch() != epoch {
                trace!(epoch, "stale step loop woke up");
                return;
            }
            state.tick()
        };
        if flow.is_break() {
            return;
        }
    }
}
