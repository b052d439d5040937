//! Platform abstraction for runtime scheduling.
//!
//! The trait lets Trailmark delegate frame scheduling to the host event
//! loop, enabling integration with different environments without depending
//! directly on a windowing system.

/// Schedules work for the Trailmark runtime.
///
/// Implementations are responsible for triggering frame processing on
/// behalf of the runtime. They must be safe to use from multiple threads
/// because wake-ups can originate off the UI thread.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}
