//! The display registry: maps, chromosomes, displayed segments and annotations.
//!
//! [`DisplayCatalog`](store::DisplayCatalog) owns everything the selection
//! engine reads but never mutates. It keeps a positional index per
//! chromosome ([`FeatureIndex`](index::FeatureIndex)) and the homology
//! relation between annotations ([`SiblingGraph`](siblings::SiblingGraph)).
//!
//! ## Example
//!
//! ```rust
//! use synteny_select::catalog::store::DisplayCatalog;
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
//! let egfr = catalog.find_annotations("Egfr")[0];
//! assert_eq!(catalog.siblings().siblings(egfr).len(), 1);
//! ```
//!
//! ## Catalog Format
//!
//! Segments are listed in display order; a segment without `start`/`stop`
//! shows its whole chromosome, and `start > stop` shows it reversed.
//! Annotations refer to chromosomes by `map` and `chromosome` name.

pub mod index;
pub mod siblings;
pub mod store;
