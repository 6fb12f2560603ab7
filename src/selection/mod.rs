//! Selection management: the [`Selection`](store::Selection) aggregate and the
//! machinery it drives.
//!
//! Selecting a range on one segment creates a root interval. When the interval
//! is finalized, the [`CorrespondenceBuilder`](correspondence::CorrespondenceBuilder)
//! places a child interval over every homolog of the annotations it covers.
//! Then the [`IntervalReconciler`](reconcile::IntervalReconciler) collapses
//! contained, overlapping and nearby intervals on the affected segments.
//!
//! ## Example
//!
//! ```rust
//! use synteny_select::catalog::store::DisplayCatalog;
//! use synteny_select::selection::store::Selection;
//!
//! let catalog = DisplayCatalog::from_json(r#"{
//!     "version": "1.0.0",
//!     "maps": [{"id": "rat", "name": "Rat"}, {"id": "human", "name": "Human"}],
//!     "chromosomes": [
//!         {"map": "rat", "name": "1", "length": 100000},
//!         {"map": "human", "name": "7", "length": 100000}
//!     ],
//!     "segments": [{"map": "rat", "chromosome": "1"}, {"map": "human", "chromosome": "7"}],
//!     "annotations": [
//!         {"name": "Egfr", "map": "rat", "chromosome": "1", "start": 500, "stop": 600, "links": ["7"]},
//!         {"name": "EGFR", "map": "human", "chromosome": "7", "start": 1500, "stop": 1600, "links": ["7"]}
//!     ]
//! }"#).unwrap();
//!
//! let rat = catalog.find_segment("rat:1").unwrap();
//! let human = catalog.find_segment("human:7").unwrap();
//!
//! let mut selection = Selection::new(&catalog);
//! let root = selection.add_interval(rat, 400, 700).unwrap();
//!
//! let propagated = selection.intervals_on(human);
//! assert_eq!(propagated.len(), 1);
//! assert_eq!((propagated[0].start(), propagated[0].stop()), (1500, 1600));
//! assert_eq!(propagated[0].parent(), Some(root));
//! ```

pub mod arena;
pub mod correspondence;
pub mod instrument;
pub mod reconcile;
pub mod store;
