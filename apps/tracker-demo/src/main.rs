//! Scripted visitor session for the Trailmark tracker.
//!
//! Runs headless: a fake page model stands in for the presentation layer,
//! frames are pumped with synthetic 60 FPS timestamps, and marker/scroll
//! motion is logged. Run with `RUST_LOG=debug` to see section transitions.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use trailmark_animation::{Motion, SpringSpec, TweenSpec};
use trailmark_core::{Runtime, RuntimeScheduler};
use trailmark_nav::{
    DragSample, PositionTracker, SectionId, SectionRegistry, TrackBounds, TrackerConfig, Viewport,
};

const FRAME_STEP_NANOS: u64 = 16_666_667;

/// The demo pumps frames itself, so frame requests need no wake-up.
struct InlineScheduler;

impl RuntimeScheduler for InlineScheduler {
    fn schedule_frame(&self) {}
}

/// Fake single-page portfolio: five anchors at fixed document offsets.
struct Page {
    scroll_y: Cell<f32>,
}

impl Page {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            scroll_y: Cell::new(0.0),
        })
    }

    fn document_top(anchor: &str) -> Option<f32> {
        match anchor {
            "home" => Some(0.0),
            "about" => Some(820.0),
            "experience" => Some(1710.0),
            "projects" => Some(2580.0),
            "contact" => Some(3390.0),
            _ => None,
        }
    }
}

impl Viewport for Page {
    fn anchor_top(&self, anchor: &str) -> Option<f32> {
        Self::document_top(anchor).map(|top| top - self.scroll_y.get())
    }

    fn scroll_y(&self) -> f32 {
        self.scroll_y.get()
    }

    fn set_scroll_y(&self, y: f32) {
        self.scroll_y.set(y);
    }

    fn max_scroll_y(&self) -> f32 {
        3800.0
    }
}

fn settle(runtime: &Runtime, now_nanos: &mut u64, tracker: &PositionTracker, page: &Page) {
    let mut frames = 0u32;
    while runtime.has_frame_callbacks() && frames < 600 {
        *now_nanos += FRAME_STEP_NANOS;
        runtime.drain_frame_callbacks(*now_nanos);
        frames += 1;
        if frames % 10 == 0 {
            log::info!(
                "  frame {frames:3}: marker at {:6.2}%, scroll at {:7.1}px",
                tracker.marker_offset().get(),
                page.scroll_y()
            );
        }
    }
    log::info!(
        "settled after {frames} frames: marker {:.2}%, scroll {:.1}px",
        tracker.marker_offset().get(),
        page.scroll_y()
    );
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let runtime = Runtime::new(Arc::new(InlineScheduler));
    let page = Page::new();
    let config = TrackerConfig {
        marker_motion: Motion::Spring(SpringSpec::bouncy()),
        scroll_motion: Motion::Tween(TweenSpec::linear(250)),
        ..TrackerConfig::default()
    };
    let tracker = PositionTracker::new(
        SectionRegistry::default(),
        Rc::clone(&page) as Rc<dyn Viewport>,
        config,
        &runtime.handle(),
    );
    let track = TrackBounds::new(40.0, 1200.0);
    let mut now_nanos = 0u64;

    log::info!("page loaded, marker parked at `{}`", tracker.active());

    log::info!("visitor clicks `projects`");
    tracker.select_section(SectionId::Projects);
    settle(&runtime, &mut now_nanos, &tracker, &page);

    log::info!("visitor clicks `experience`, then `contact` before it lands");
    tracker.select_section(SectionId::Experience);
    now_nanos += FRAME_STEP_NANOS;
    runtime.drain_frame_callbacks(now_nanos);
    tracker.select_section(SectionId::Contact);
    settle(&runtime, &mut now_nanos, &tracker, &page);

    let release_x = track.left + track.width * 0.18;
    log::info!("visitor drags the marker and releases at 18% of the track");
    let resolved = tracker.resolve_from_drag(DragSample::new(release_x, track));
    log::info!("drag resolved to `{resolved}`");
    settle(&runtime, &mut now_nanos, &tracker, &page);

    log::info!("visitor sweeps the pointer across the hero band");
    for step in 0..=8 {
        let x = track.left + track.width * (step as f32 / 8.0);
        let angle = tracker.tilt_from_pointer(x, track);
        log::info!("  pointer at x={x:7.1} tilts the marker {angle:+.1} deg");
    }

    log::info!(
        "session over: active `{}`, marker {:.2}%, scroll {:.1}px",
        tracker.active(),
        tracker.marker_offset().get(),
        page.scroll_y()
    );
}
