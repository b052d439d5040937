use std::rc::Rc;

use trailmark_animation::{Animatable, Motion, SpringSpec, TweenSpec};
use trailmark_core::{MutableState, RuntimeHandle, State};

use crate::scroll::{ScrollCoordinator, Viewport};
use crate::section::{SectionId, SectionRegistry};
use crate::track::{nearest_section, DragSample, TiltSpec, TrackBounds};

/// Presentation tuning for the tracker. None of these values affect which
/// section a gesture resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Motion of the marker along the track.
    pub marker_motion: Motion,
    /// Motion of the smooth scroll toward a section anchor.
    pub scroll_motion: Motion,
    /// Height of the fixed header band the scroll target clears, in pixels.
    pub header_offset: f32,
    /// Cosmetic head-tilt range.
    pub tilt: TiltSpec,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            // Under-damped so the marker overshoots slightly, matching the
            // page's original springy feel.
            marker_motion: Motion::Spring(SpringSpec {
                damping_ratio: 0.78,
                ..SpringSpec::critically_damped()
            }),
            scroll_motion: Motion::Tween(TweenSpec::default()),
            header_offset: 64.0,
            tilt: TiltSpec::default(),
        }
    }
}

/// Owns the active-section state and drives the marker and the scroll.
///
/// All three inputs funnel through here: explicit selection (nav click or
/// track waypoint), drag release on the marker, and pointer movement for
/// the cosmetic tilt. Selection updates are synchronous; only the rendered
/// marker offset and the scroll position catch up over frames, and a new
/// selection retargets both rather than queueing behind them.
pub struct PositionTracker {
    registry: Rc<SectionRegistry>,
    config: TrackerConfig,
    active: MutableState<SectionId>,
    marker: Animatable<f32>,
    scroll: ScrollCoordinator,
}

impl PositionTracker {
    pub fn new(
        registry: SectionRegistry,
        viewport: Rc<dyn Viewport>,
        config: TrackerConfig,
        runtime: &RuntimeHandle,
    ) -> Self {
        let registry = Rc::new(registry);
        let initial = SectionId::Home;
        let marker = Animatable::new(registry.position_of(initial), runtime.clone());
        let scroll = ScrollCoordinator::new(
            Rc::clone(&registry),
            viewport,
            config.header_offset,
            config.scroll_motion,
            runtime,
        );
        Self {
            registry,
            config,
            active: MutableState::new(initial),
            marker,
            scroll,
        }
    }

    /// Creates a tracker over the default page layout and tuning.
    pub fn with_defaults(viewport: Rc<dyn Viewport>, runtime: &RuntimeHandle) -> Self {
        Self::new(
            SectionRegistry::default(),
            viewport,
            TrackerConfig::default(),
            runtime,
        )
    }

    /// Makes `id` the active section.
    ///
    /// The active state updates synchronously; the marker retargets toward
    /// `position_of(id)` and the page scrolls to the section's anchor.
    pub fn select_section(&self, id: SectionId) {
        log::debug!("section selected: `{id}`");
        self.active.set(id);
        self.marker
            .animate_to(self.registry.position_of(id), self.config.marker_motion);
        self.scroll.scroll_to(id);
    }

    /// Resolves a drag release to the nearest section and selects it.
    ///
    /// Total: any pointer coordinate clamps into the track, and the closed
    /// section set always yields a nearest match.
    pub fn resolve_from_drag(&self, sample: DragSample) -> SectionId {
        let percent = sample.percent();
        let id = nearest_section(&self.registry, percent);
        log::trace!("drag released at {percent:.1}% resolves to `{id}`");
        self.select_section(id);
        id
    }

    /// Cosmetic tilt angle for the current pointer position.
    ///
    /// Pure; never touches the active section.
    pub fn tilt_from_pointer(&self, pointer_x: f32, track: TrackBounds) -> f32 {
        self.config.tilt.angle_at(pointer_x, track)
    }

    /// The currently active section.
    pub fn active(&self) -> SectionId {
        self.active.get()
    }

    /// Observable view of the active section, for nav highlighting.
    pub fn active_state(&self) -> State<SectionId> {
        self.active.as_state()
    }

    /// Observable rendered marker offset along the track, 0–100.
    pub fn marker_offset(&self) -> State<f32> {
        self.marker.state()
    }

    /// Track position the marker is currently heading for.
    pub fn marker_target(&self) -> f32 {
        self.marker.target()
    }

    /// Whether the marker is still traveling.
    pub fn is_marker_animating(&self) -> bool {
        self.marker.is_animating()
    }

    /// Whether the smooth scroll is still in flight.
    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_scrolling()
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }
}

#[cfg(test)]
#[path = "tests/tracker_tests.rs"]
mod tests;
