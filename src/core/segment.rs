use serde::{Deserialize, Serialize};

use crate::core::types::{ChromosomeId, MapId, SegmentId};

/// A display map: one assembly or species laid out next to the others
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMap {
    pub id: MapId,

    /// Human readable name (e.g. "Rat RGSC 6.0")
    pub name: String,

    /// Units per base pair; carried for collaborators, never interpreted here
    #[serde(default = "default_scale")]
    pub scale: u32,
}

fn default_scale() -> u32 {
    1
}

impl DisplayMap {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: MapId::new(id),
            name: name.into(),
            scale: default_scale(),
        }
    }
}

/// A chromosome belonging to a display map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chromosome {
    pub id: ChromosomeId,
    pub name: String,
    pub map: MapId,

    /// Length in the map's coordinate space
    pub length: i64,
}

/// The currently displayed span of one chromosome.
///
/// `drawing_start` may exceed `drawing_stop`, in which case the segment is
/// drawn in reverse orientation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub chromosome: ChromosomeId,
    pub map: MapId,
    pub drawing_start: i64,
    pub drawing_stop: i64,
}

impl Segment {
    /// Smaller of the two drawing bounds
    #[must_use]
    pub fn lower(&self) -> i64 {
        self.drawing_start.min(self.drawing_stop)
    }

    /// Larger of the two drawing bounds
    #[must_use]
    pub fn upper(&self) -> i64 {
        self.drawing_start.max(self.drawing_stop)
    }

    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.drawing_start > self.drawing_stop
    }

    /// Clamp a genomic position into the drawn span
    #[must_use]
    pub fn clamp(&self, position: i64) -> i64 {
        position.clamp(self.lower(), self.upper())
    }

    /// Whether `[start, stop]` intersects the drawn span
    #[must_use]
    pub fn overlaps(&self, start: i64, stop: i64) -> bool {
        start <= self.upper() && stop >= self.lower()
    }
}
