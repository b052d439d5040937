//! Pure geometry over the horizontal track: drag resolution and pointer
//! tilt. Nothing here touches tracker state.

use crate::section::{SectionId, SectionRegistry};

/// Bounding box of the track at one instant, in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackBounds {
    pub left: f32,
    pub width: f32,
}

impl TrackBounds {
    pub fn new(left: f32, width: f32) -> Self {
        Self { left, width }
    }

    /// Pointer position as a percent of track width, clamped to 0–100.
    ///
    /// A degenerate track (`width <= 0`) resolves to 0 so the function
    /// stays total.
    pub fn percent_at(&self, pointer_x: f32) -> f32 {
        if self.width <= f32::EPSILON {
            return 0.0;
        }
        ((pointer_x - self.left) / self.width).clamp(0.0, 1.0) * 100.0
    }

    /// Normalized pointer offset in [0, 1] from the left edge.
    pub fn normalized_at(&self, pointer_x: f32) -> f32 {
        if self.width <= f32::EPSILON {
            return 0.5;
        }
        ((pointer_x - self.left) / self.width).clamp(0.0, 1.0)
    }
}

/// Snapshot taken when a drag gesture releases: the absolute pointer
/// coordinate and the track bounds at that instant. Consumed once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSample {
    pub pointer_x: f32,
    pub track: TrackBounds,
}

impl DragSample {
    pub fn new(pointer_x: f32, track: TrackBounds) -> Self {
        Self { pointer_x, track }
    }

    /// Release position as a percent of track width, clamped to 0–100.
    pub fn percent(&self) -> f32 {
        self.track.percent_at(self.pointer_x)
    }
}

/// Section whose track position is nearest to `percent`.
///
/// The scan runs in declaration order with a strict `<` comparison, so an
/// exact midpoint resolves to the earlier section (lowest index wins).
/// Total: the registry is non-empty and closed, so there is always a match.
pub fn nearest_section(registry: &SectionRegistry, percent: f32) -> SectionId {
    let mut best = SectionId::ALL[0];
    let mut best_distance = f32::INFINITY;
    for record in registry.iter() {
        let distance = (percent - record.percent).abs();
        if distance < best_distance {
            best = record.id;
            best_distance = distance;
        }
    }
    best
}

/// Cosmetic head-tilt range for the marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltSpec {
    /// Maximum deflection in degrees; the angle spans ±`max_degrees`.
    pub max_degrees: f32,
}

impl TiltSpec {
    pub fn new(max_degrees: f32) -> Self {
        Self { max_degrees }
    }

    /// Maps the pointer's normalized horizontal offset linearly onto
    /// ±`max_degrees`. Pure and bounded for any input; a centered pointer
    /// yields 0°.
    pub fn angle_at(&self, pointer_x: f32, track: TrackBounds) -> f32 {
        (track.normalized_at(pointer_x) - 0.5) * 2.0 * self.max_degrees
    }
}

impl Default for TiltSpec {
    /// The page's `(x - 0.5) * 20` handler: ±10°.
    fn default() -> Self {
        Self::new(10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> TrackBounds {
        TrackBounds::new(100.0, 1000.0)
    }

    #[test]
    fn percent_is_clamped_to_track() {
        assert_eq!(track().percent_at(100.0), 0.0);
        assert_eq!(track().percent_at(1100.0), 100.0);
        assert_eq!(track().percent_at(0.0), 0.0);
        assert_eq!(track().percent_at(5000.0), 100.0);
        assert_eq!(track().percent_at(600.0), 50.0);
    }

    #[test]
    fn degenerate_track_stays_total() {
        let degenerate = TrackBounds::new(10.0, 0.0);
        assert_eq!(degenerate.percent_at(500.0), 0.0);
        assert_eq!(TiltSpec::default().angle_at(500.0, degenerate), 0.0);
    }

    #[test]
    fn drag_sample_percent_uses_bounds_at_release() {
        let sample = DragSample::new(350.0, TrackBounds::new(100.0, 1000.0));
        assert_eq!(sample.percent(), 25.0);
    }

    #[test]
    fn nearest_section_prefers_smaller_distance() {
        let registry = SectionRegistry::default();
        // |20 - 8| = 12 vs |20 - 30| = 10: about wins.
        assert_eq!(nearest_section(&registry, 20.0), SectionId::About);
        // |18 - 8| = 10 vs |18 - 30| = 12: home wins.
        assert_eq!(nearest_section(&registry, 18.0), SectionId::Home);
    }

    #[test]
    fn nearest_section_tie_breaks_to_earliest() {
        let registry = SectionRegistry::default();
        // 42 is equidistant (12) from about at 30 and experience at 54.
        assert_eq!(nearest_section(&registry, 42.0), SectionId::About);
    }

    #[test]
    fn nearest_section_is_total_over_clamped_range() {
        let registry = SectionRegistry::default();
        assert_eq!(nearest_section(&registry, 0.0), SectionId::Home);
        assert_eq!(nearest_section(&registry, 100.0), SectionId::Contact);
    }

    #[test]
    fn tilt_is_linear_and_bounded() {
        let tilt = TiltSpec::default();
        let track = track();

        assert_eq!(tilt.angle_at(600.0, track), 0.0);
        assert_eq!(tilt.angle_at(100.0, track), -10.0);
        assert_eq!(tilt.angle_at(1100.0, track), 10.0);
        // Out-of-bounds pointers clamp to the range ends.
        assert_eq!(tilt.angle_at(-400.0, track), -10.0);
        assert_eq!(tilt.angle_at(9999.0, track), 10.0);

        // Linear: quarter of the track maps to half the deflection.
        assert!((tilt.angle_at(350.0, track) - -5.0).abs() < 1e-4);
    }
}
