use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use smallvec::SmallVec;

use crate::frame_clock::FrameClock;
use crate::platform::RuntimeScheduler;

/// Identifier for a registered frame callback.
pub type FrameCallbackId = u64;

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<Box<dyn FnOnce(u64) + 'static>>,
}

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    needs_frame: Cell<bool>,
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_frame_callback_id: Cell<u64>,
}

impl RuntimeInner {
    fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            scheduler,
            needs_frame: Cell::new(false),
            frame_callbacks: RefCell::new(VecDeque::new()),
            next_frame_callback_id: Cell::new(1),
        }
    }

    fn schedule(&self) {
        self.needs_frame.set(true);
        self.scheduler.schedule_frame();
    }

    fn register_frame_callback(&self, callback: Box<dyn FnOnce(u64) + 'static>) -> FrameCallbackId {
        let id = self.next_frame_callback_id.get();
        self.next_frame_callback_id.set(id + 1);
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        self.schedule();
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        let mut callbacks = self.frame_callbacks.borrow_mut();
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
        if callbacks.is_empty() {
            self.needs_frame.set(false);
        }
    }

    fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        // Callbacks registered while draining (an animation scheduling its
        // next frame) must wait for the next drain, so swap the queue out
        // before invoking anything.
        let mut callbacks = self.frame_callbacks.borrow_mut();
        let mut pending: SmallVec<[Box<dyn FnOnce(u64) + 'static>; 4]> =
            SmallVec::with_capacity(callbacks.len());
        while let Some(mut entry) = callbacks.pop_front() {
            if let Some(callback) = entry.callback.take() {
                pending.push(callback);
            }
        }
        drop(callbacks);
        if !pending.is_empty() {
            log::trace!(
                "draining {} frame callbacks at {frame_time_nanos}ns",
                pending.len()
            );
        }
        for callback in pending {
            callback(frame_time_nanos);
        }
        if self.frame_callbacks.borrow().is_empty() {
            self.needs_frame.set(false);
        }
    }

    fn has_frame_callbacks(&self) -> bool {
        !self.frame_callbacks.borrow().is_empty()
    }
}

/// Owner of the frame callback queue. Created once per view by the host.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new(scheduler)),
        }
    }

    /// Returns a weak handle suitable for embedding in long-lived components.
    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Runs all callbacks registered for this frame.
    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        self.inner.drain_frame_callbacks(frame_time_nanos);
    }

    /// Whether any callback is waiting for the next frame.
    pub fn has_frame_callbacks(&self) -> bool {
        self.inner.has_frame_callbacks()
    }

    /// Whether a frame has been requested and not yet drained.
    pub fn needs_frame(&self) -> bool {
        self.inner.needs_frame.get()
    }
}

/// Weak handle to a [`Runtime`].
///
/// All operations become no-ops once the runtime is dropped, so a component
/// outliving its view cannot schedule work against a dead queue.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl RuntimeHandle {
    pub fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        self.inner
            .upgrade()
            .map(|inner| inner.register_frame_callback(Box::new(callback)))
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }

    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_frame_callbacks(frame_time_nanos);
        }
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_frame_callbacks())
            .unwrap_or(false)
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingScheduler {
        requests: AtomicUsize,
    }

    impl CountingScheduler {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                requests: AtomicUsize::new(0),
            })
        }
    }

    impl RuntimeScheduler for CountingScheduler {
        fn schedule_frame(&self) {
            self.requests.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn register_schedules_a_frame() {
        let scheduler = CountingScheduler::new();
        let runtime = Runtime::new(scheduler.clone());
        let handle = runtime.handle();

        assert!(!runtime.needs_frame());
        handle.register_frame_callback(|_| {});
        assert!(runtime.needs_frame());
        assert_eq!(scheduler.requests.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drain_runs_callbacks_with_frame_time() {
        let runtime = Runtime::new(CountingScheduler::new());
        let handle = runtime.handle();
        let seen = Rc::new(Cell::new(0u64));

        let seen_clone = Rc::clone(&seen);
        handle.register_frame_callback(move |time| seen_clone.set(time));
        runtime.drain_frame_callbacks(42);

        assert_eq!(seen.get(), 42);
        assert!(!runtime.needs_frame());
    }

    #[test]
    fn cancel_removes_pending_callback() {
        let runtime = Runtime::new(CountingScheduler::new());
        let handle = runtime.handle();
        let fired = Rc::new(Cell::new(false));

        let fired_clone = Rc::clone(&fired);
        let id = handle
            .register_frame_callback(move |_| fired_clone.set(true))
            .unwrap();
        handle.cancel_frame_callback(id);
        runtime.drain_frame_callbacks(1);

        assert!(!fired.get());
    }

    #[test]
    fn callback_registered_during_drain_waits_for_next_frame() {
        let runtime = Runtime::new(CountingScheduler::new());
        let handle = runtime.handle();
        let count = Rc::new(Cell::new(0u32));

        let count_clone = Rc::clone(&count);
        let reentrant = handle.clone();
        handle.register_frame_callback(move |_| {
            count_clone.set(count_clone.get() + 1);
            let count_inner = Rc::clone(&count_clone);
            reentrant.register_frame_callback(move |_| {
                count_inner.set(count_inner.get() + 1);
            });
        });

        runtime.drain_frame_callbacks(1);
        assert_eq!(count.get(), 1);
        runtime.drain_frame_callbacks(2);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn handle_outliving_runtime_is_inert() {
        let runtime = Runtime::new(CountingScheduler::new());
        let handle = runtime.handle();
        drop(runtime);

        assert!(handle.register_frame_callback(|_| {}).is_none());
        assert!(!handle.has_frame_callbacks());
    }
}
