//! # synteny-select
//!
//! Selection-interval management for comparative genome map displays.
//!
//! A comparative map display shows chromosome segments from several maps
//! (species or assemblies) side by side. Annotations on different maps that
//! share a link identifier are homologs ("siblings"). When a user selects a
//! range on one segment, the selection is carried onto every displayed segment
//! showing a homolog of something inside it.
//!
//! `synteny-select` keeps that set of ranges consistent:
//!
//! - **Propagation**: root selections spawn child intervals over homologs
//! - **Containment**: intervals inside others are absorbed, or suppressed when
//!   they come from a different parent
//! - **Coalescing**: overlaps and small gaps merge unless features between
//!   them have homologs that contradict the merge
//! - **Parent/child links**: every child knows the root it came from
//!
//! ## Example
//!
//! ```rust,no_run
//! use synteny_select::{DisplayCatalog, ReconcileMode, Selection};
//!
//! let catalog = DisplayCatalog::load_from_file(std::path::Path::new("display.json")).unwrap();
//! let segment = catalog.find_segment("rat:1").unwrap();
//!
//! let mut selection = Selection::new(&catalog);
//! selection.add_interval(segment, 1_000_000, 2_500_000);
//! selection.verify(ReconcileMode::Both);
//!
//! for interval in selection.visible_intervals() {
//!     println!("{}: {}-{}", interval.id(), interval.start(), interval.stop());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Display registry, position index and sibling graph
//! - [`core`]: Core data types for maps, segments, annotations and intervals
//! - [`selection`]: Selection aggregate, propagation and reconciliation
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod selection;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::siblings::SiblingGraph;
pub use catalog::store::{CatalogError, DisplayCatalog};
pub use core::annotation::Annotation;
pub use core::geometry::{LinearGeometry, PixelSpan, SegmentGeometry};
pub use core::interval::{Interval, IntervalPhase};
pub use core::segment::{Chromosome, DisplayMap, Segment};
pub use core::types::*;
pub use selection::reconcile::{IntervalReconciler, ReconcileReport};
pub use selection::store::{Selection, SelectionConfig, SelectionSnapshot};
