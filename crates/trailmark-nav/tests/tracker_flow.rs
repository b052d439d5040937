//! End-to-end session against a fake page: nav clicks, a drag release,
//! pointer sweeps, and the resulting marker and scroll motion.

use std::cell::Cell;
use std::rc::Rc;

use trailmark_nav::{
    DragSample, PositionTracker, SectionId, TrackBounds, TrackerConfig, Viewport,
};
use trailmark_testing::TestRuntime;

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
            "about" => Some(780.0),
            "experience" => Some(1640.0),
            "projects" => Some(2510.0),
            "contact" => Some(3320.0),
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
        3600.0
    }
}

#[test]
fn visitor_session_moves_marker_and_scroll_together() {
    let rt = TestRuntime::new();
    let page = Page::new();
    let tracker = PositionTracker::with_defaults(Rc::clone(&page) as Rc<dyn Viewport>, &rt.handle());
    let track = TrackBounds::new(40.0, 1200.0);

    // Page load: marker parked at home, nothing in flight.
    assert_eq!(tracker.active(), SectionId::Home);
    assert_eq!(tracker.marker_offset().get(), 8.0);

    // Visitor clicks "projects" in the nav.
    tracker.select_section(SectionId::Projects);
    assert_eq!(tracker.active(), SectionId::Projects);
    rt.run_until_settled(600);
    assert!((tracker.marker_offset().get() - 78.0).abs() < 0.01);
    let projects_top = page.anchor_top("projects").unwrap();
    assert!((projects_top - TrackerConfig::default().header_offset).abs() < 0.01);

    // Mid-scroll they change their mind: contact before the scroll lands.
    tracker.select_section(SectionId::Experience);
    rt.advance_frames(3);
    tracker.select_section(SectionId::Contact);
    assert_eq!(tracker.active(), SectionId::Contact);
    rt.run_until_settled(600);
    assert!((tracker.marker_offset().get() - 92.0).abs() < 0.01);
    let contact_top = page.anchor_top("contact").unwrap();
    assert!((contact_top - 64.0).abs() < 0.01);

    // They grab the marker and drop it at 18% of the track: nearest is home.
    let release_x = track.left + track.width * 0.18;
    let resolved = tracker.resolve_from_drag(DragSample::new(release_x, track));
    assert_eq!(resolved, SectionId::Home);
    rt.run_until_settled(600);
    assert!((tracker.marker_offset().get() - 8.0).abs() < 0.01);
    assert_eq!(page.scroll_y(), 0.0);

    // Idle pointer sweeps tilt the marker but never change the section.
    for step in 0..=10 {
        let x = track.left + track.width * (step as f32 / 10.0);
        let angle = tracker.tilt_from_pointer(x, track);
        assert!((-10.0..=10.0).contains(&angle));
    }
    assert_eq!(tracker.active(), SectionId::Home);
    assert!(!rt.has_pending_frames());
}
