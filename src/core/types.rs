use serde::{Deserialize, Serialize};

/// Identifier of a display map (one species/assembly shown side by side with others)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapId(pub String);

impl MapId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::fmt::Display for MapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// External link identifier shared by homologous annotations
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(pub String);

impl LinkId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::fmt::Display for LinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! index_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub usize);

        impl $name {
            #[must_use]
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

index_id!(
    /// Index of a chromosome in the display catalog
    ChromosomeId,
    "chrom#"
);
index_id!(
    /// Index of a displayed segment; also its position in display order
    SegmentId,
    "seg#"
);
index_id!(
    /// Index of an annotation in the display catalog
    AnnotationId,
    "ann#"
);
index_id!(
    /// Slot of an interval in the selection arena
    IntervalId,
    "iv#"
);

/// Which intervals a reconciliation pass considers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileMode {
    /// Only root (user-made) intervals
    Roots,
    /// Only propagated child intervals
    Children,
    /// Roots pass followed by the children pass
    #[default]
    Both,
}

impl ReconcileMode {
    #[must_use]
    pub fn includes_roots(self) -> bool {
        matches!(self, Self::Roots | Self::Both)
    }

    #[must_use]
    pub fn includes_children(self) -> bool {
        matches!(self, Self::Children | Self::Both)
    }
}

/// Visibility of a final interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntervalState {
    #[default]
    Active,
    /// Contained in an interval propagated from a different parent; kept for context
    Suppressed,
}

impl std::fmt::Display for IntervalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Suppressed => write!(f, "suppressed"),
        }
    }
}
