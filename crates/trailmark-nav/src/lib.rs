//! Section-synchronized position tracking.
//!
//! A page is divided into a fixed set of sections, each mapped to a
//! percentage along a horizontal track and to an anchor in the page content.
//! [`PositionTracker`] owns the active section, resolves nav clicks and
//! drag releases to a section, animates a marker offset along the track,
//! and asks the [`ScrollCoordinator`] to bring the matching anchor into
//! view below a fixed-height header.
//!
//! All state transitions are synchronous inside the input handlers; only
//! the rendered marker offset and the scroll position catch up over frames.

mod scroll;
mod section;
mod track;
mod tracker;

pub use scroll::{ScrollCoordinator, Viewport};
pub use section::{RegistryError, SectionId, SectionRecord, SectionRegistry, SECTION_COUNT};
pub use track::{nearest_section, DragSample, TiltSpec, TrackBounds};
pub use tracker::{PositionTracker, TrackerConfig};
