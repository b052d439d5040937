use std::rc::Rc;

use trailmark_animation::{Animatable, Motion};
use trailmark_core::{RuntimeHandle, WatcherRegistration};

use crate::section::{SectionId, SectionRegistry};

/// The scrollable page, as seen by the coordinator.
///
/// Implemented by the presentation layer; the coordinator only reads anchor
/// geometry and writes the scroll position.
pub trait Viewport {
    /// Top of the anchor's content region relative to the viewport, or
    /// `None` while the anchor is not mounted.
    fn anchor_top(&self, anchor: &str) -> Option<f32>;

    /// Current vertical scroll position in pixels.
    fn scroll_y(&self) -> f32;

    /// Applies a new vertical scroll position.
    fn set_scroll_y(&self, y: f32);

    /// Upper bound for the scroll position.
    fn max_scroll_y(&self) -> f32 {
        f32::INFINITY
    }
}

/// Smooth-scrolls the page so a section's anchor sits just below the fixed
/// header band.
///
/// The animated position is written through to the [`Viewport`] on every
/// frame; a new `scroll_to` retargets the in-flight scroll.
pub struct ScrollCoordinator {
    registry: Rc<SectionRegistry>,
    viewport: Rc<dyn Viewport>,
    header_offset: f32,
    motion: Motion,
    position: Animatable<f32>,
    _sync: WatcherRegistration<f32>,
}

impl ScrollCoordinator {
    pub fn new(
        registry: Rc<SectionRegistry>,
        viewport: Rc<dyn Viewport>,
        header_offset: f32,
        motion: Motion,
        runtime: &RuntimeHandle,
    ) -> Self {
        let position = Animatable::new(viewport.scroll_y(), runtime.clone());
        let sync_viewport = Rc::clone(&viewport);
        let sync = position.state().watch(move |y| {
            sync_viewport.set_scroll_y(*y);
        });
        Self {
            registry,
            viewport,
            header_offset,
            motion,
            position,
            _sync: sync,
        }
    }

    /// Scrolls so that the anchor for `id` lands `header_offset` pixels
    /// below the top of the viewport.
    ///
    /// A missing anchor (content not mounted) is a silent no-op; anchors
    /// are static in normal operation, so this only logs.
    pub fn scroll_to(&self, id: SectionId) {
        let anchor = self.registry.anchor_of(id);
        let Some(anchor_top) = self.viewport.anchor_top(anchor) else {
            log::debug!("anchor `{anchor}` is not mounted, skipping scroll");
            return;
        };

        let current = self.viewport.scroll_y();
        let target = (anchor_top + current - self.header_offset)
            .clamp(0.0, self.viewport.max_scroll_y());

        log::debug!("scrolling to `{anchor}`: {current} -> {target}");
        // The page may have been scrolled externally since the last frame,
        // so rebase the animated position before retargeting.
        self.position.snap_to(current);
        self.position.animate_to(target, self.motion);
    }

    /// Whether a smooth scroll is still in flight.
    pub fn is_scrolling(&self) -> bool {
        self.position.is_animating()
    }
}
