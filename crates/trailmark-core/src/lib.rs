//! Runtime primitives for Trailmark.
//!
//! Trailmark components run single-threaded on a host event loop. The host
//! implements [`RuntimeScheduler`] to receive frame requests and pumps
//! registered callbacks through [`RuntimeHandle::drain_frame_callbacks`]
//! once per frame with the frame timestamp in nanoseconds.
//!
//! [`MutableState`] provides observable value cells so presentation code can
//! watch the active section or an animated offset without polling.

mod frame_clock;
mod platform;
mod runtime;
mod state;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use platform::RuntimeScheduler;
pub use runtime::{FrameCallbackId, Runtime, RuntimeHandle};
pub use state::{MutableState, State, WatcherRegistration};
