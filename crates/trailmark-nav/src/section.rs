use std::fmt;

use smallvec::SmallVec;

/// Number of sections on the page.
pub const SECTION_COUNT: usize = 5;

/// Identifier for one of the fixed content regions of the page.
///
/// Declaration order is significant: it defines left-to-right placement on
/// the track and tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    Home,
    About,
    Experience,
    Projects,
    Contact,
}

impl SectionId {
    /// All sections in declaration order.
    pub const ALL: [SectionId; SECTION_COUNT] = [
        SectionId::Home,
        SectionId::About,
        SectionId::Experience,
        SectionId::Projects,
        SectionId::Contact,
    ];

    /// Index in declaration order.
    pub fn index(self) -> usize {
        match self {
            SectionId::Home => 0,
            SectionId::About => 1,
            SectionId::Experience => 2,
            SectionId::Projects => 3,
            SectionId::Contact => 4,
        }
    }

    /// Stable lowercase name, matching the page anchor convention.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::Home => "home",
            SectionId::About => "about",
            SectionId::Experience => "experience",
            SectionId::Projects => "projects",
            SectionId::Contact => "contact",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the section registry: a section, its track position, and
/// the anchor naming its content region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionRecord {
    pub id: SectionId,
    /// Position along the track, 0–100.
    pub percent: f32,
    /// Anchor of the section's content region in the page.
    pub anchor: &'static str,
}

impl SectionRecord {
    pub fn new(id: SectionId, percent: f32, anchor: &'static str) -> Self {
        Self {
            id,
            percent,
            anchor,
        }
    }
}

/// Registry construction failure.
///
/// The registry is the only fallible point of the subsystem; once built,
/// every lookup is total over the closed [`SectionId`] set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegistryError {
    /// The record list does not cover every section exactly once.
    WrongSectionCount { found: usize },
    /// A record appears out of declaration order (or duplicates an id).
    OutOfOrder { expected: SectionId, found: SectionId },
    /// A percent lies outside 0–100.
    PercentOutOfRange { id: SectionId, percent: f32 },
    /// Positions must strictly increase in declaration order.
    NonIncreasingPercent {
        id: SectionId,
        percent: f32,
        previous: f32,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::WrongSectionCount { found } => {
                write!(f, "expected {SECTION_COUNT} section records, found {found}")
            }
            RegistryError::OutOfOrder { expected, found } => {
                write!(f, "expected section `{expected}` at this index, found `{found}`")
            }
            RegistryError::PercentOutOfRange { id, percent } => {
                write!(f, "section `{id}` position {percent} is outside 0-100")
            }
            RegistryError::NonIncreasingPercent {
                id,
                percent,
                previous,
            } => write!(
                f,
                "section `{id}` position {percent} does not increase past {previous}"
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Ordered mapping from [`SectionId`] to track position and page anchor.
///
/// Invariants, checked at construction: one record per section, in
/// declaration order, with unique strictly increasing percents in 0–100.
/// Lookups after construction are total and infallible.
#[derive(Debug, Clone)]
pub struct SectionRegistry {
    records: SmallVec<[SectionRecord; SECTION_COUNT]>,
}

impl SectionRegistry {
    pub fn new(records: impl IntoIterator<Item = SectionRecord>) -> Result<Self, RegistryError> {
        let records: SmallVec<[SectionRecord; SECTION_COUNT]> = records.into_iter().collect();

        if records.len() != SECTION_COUNT {
            return Err(RegistryError::WrongSectionCount {
                found: records.len(),
            });
        }

        let mut previous: Option<f32> = None;
        for (index, record) in records.iter().enumerate() {
            let expected = SectionId::ALL[index];
            if record.id != expected {
                return Err(RegistryError::OutOfOrder {
                    expected,
                    found: record.id,
                });
            }
            if !(0.0..=100.0).contains(&record.percent) {
                return Err(RegistryError::PercentOutOfRange {
                    id: record.id,
                    percent: record.percent,
                });
            }
            if let Some(previous) = previous {
                if record.percent <= previous {
                    return Err(RegistryError::NonIncreasingPercent {
                        id: record.id,
                        percent: record.percent,
                        previous,
                    });
                }
            }
            previous = Some(record.percent);
        }

        Ok(Self { records })
    }

    /// Track position of `id`, 0–100. Total over the closed section set.
    pub fn position_of(&self, id: SectionId) -> f32 {
        self.records[id.index()].percent
    }

    /// Page anchor of `id`. Total over the closed section set.
    pub fn anchor_of(&self, id: SectionId) -> &'static str {
        self.records[id.index()].anchor
    }

    /// Records in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &SectionRecord> {
        self.records.iter()
    }
}

impl Default for SectionRegistry {
    /// The portfolio page layout: five sections spread along the track.
    fn default() -> Self {
        Self::new([
            SectionRecord::new(SectionId::Home, 8.0, "home"),
            SectionRecord::new(SectionId::About, 30.0, "about"),
            SectionRecord::new(SectionId::Experience, 54.0, "experience"),
            SectionRecord::new(SectionId::Projects, 78.0, "projects"),
            SectionRecord::new(SectionId::Contact, 92.0, "contact"),
        ])
        .expect("default registry satisfies the ordering invariants")
    }
}
