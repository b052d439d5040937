//! Headless harness for exercising Trailmark components in tests.
//!
//! [`TestRuntime`] owns a runtime wired to a [`ManualScheduler`] and drives
//! frame callbacks with synthetic 60 FPS timestamps, so animation-dependent
//! behavior can be tested without a windowing backend.

use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use trailmark_core::{Runtime, RuntimeHandle, RuntimeScheduler};

/// Nanoseconds per synthetic frame (~60 FPS).
pub const FRAME_STEP_NANOS: u64 = 16_666_667;

/// Scheduler that records frame requests instead of waking an event loop.
pub struct ManualScheduler {
    requests: AtomicUsize,
}

impl ManualScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            requests: AtomicUsize::new(0),
        })
    }

    /// Total number of frame requests observed.
    pub fn requested_frames(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl RuntimeScheduler for ManualScheduler {
    fn schedule_frame(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

/// Test-owned runtime with a manually advanced frame clock.
pub struct TestRuntime {
    runtime: Runtime,
    scheduler: Arc<ManualScheduler>,
    now_nanos: Cell<u64>,
}

impl TestRuntime {
    pub fn new() -> Self {
        let scheduler = ManualScheduler::new();
        Self {
            runtime: Runtime::new(scheduler.clone()),
            scheduler,
            now_nanos: Cell::new(0),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    /// Current synthetic time in nanoseconds.
    pub fn now_nanos(&self) -> u64 {
        self.now_nanos.get()
    }

    pub fn requested_frames(&self) -> usize {
        self.scheduler.requested_frames()
    }

    /// Whether any callback is waiting for a frame.
    pub fn has_pending_frames(&self) -> bool {
        self.runtime.has_frame_callbacks()
    }

    /// Advances time by one frame step and drains callbacks.
    pub fn advance_frame(&self) {
        self.advance_frame_by(FRAME_STEP_NANOS);
    }

    /// Advances time by `step_nanos` and drains callbacks.
    pub fn advance_frame_by(&self, step_nanos: u64) {
        let now = self.now_nanos.get() + step_nanos;
        self.now_nanos.set(now);
        self.runtime.drain_frame_callbacks(now);
    }

    /// Advances `count` frames at the default step.
    pub fn advance_frames(&self, count: usize) {
        for _ in 0..count {
            self.advance_frame();
        }
    }

    /// Pumps frames until no callbacks remain.
    ///
    /// Panics after `max_frames` to catch animations that never settle.
    pub fn run_until_settled(&self, max_frames: usize) -> usize {
        let mut frames = 0;
        while self.runtime.has_frame_callbacks() {
            if frames >= max_frames {
                panic!("run_until_settled exceeded {max_frames} frames");
            }
            self.advance_frame();
            frames += 1;
        }
        frames
    }
}

impl Default for TestRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn advance_frame_moves_clock_and_drains() {
        let rt = TestRuntime::new();
        let seen = Rc::new(Cell::new(0u64));

        let seen_clone = Rc::clone(&seen);
        rt.handle()
            .register_frame_callback(move |time| seen_clone.set(time));
        rt.advance_frame();

        assert_eq!(seen.get(), FRAME_STEP_NANOS);
        assert_eq!(rt.now_nanos(), FRAME_STEP_NANOS);
    }

    #[test]
    fn run_until_settled_stops_when_idle() {
        let rt = TestRuntime::new();
        rt.handle().register_frame_callback(|_| {});
        let frames = rt.run_until_settled(10);
        assert_eq!(frames, 1);
        assert!(!rt.has_pending_frames());
    }
}
