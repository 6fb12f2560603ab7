//! Command-line interface for synteny-select.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **select**: Apply selections to a display catalog and print the reconciled intervals
//! - **siblings**: List the homologs of an annotation and where they are displayed
//! - **catalog**: Summarize or export a display catalog
//!
//! ## Usage
//!
//! ```text
//! # Select a gene and see where it propagates
//! synteny-select select display.json --annotation Egfr
//!
//! # Select a raw range; JSON output for scripting
//! synteny-select select display.json --range rat:1:1000000-2500000 --format json
//!
//! # Homologs of a gene
//! synteny-select siblings display.json Egfr
//!
//! # Re-export a catalog with a fresh timestamp
//! synteny-select catalog export display.json out.json
//! ```

use clap::{Parser, Subcommand};

pub mod catalog;
pub mod select;
pub mod siblings;

#[derive(Parser)]
#[command(name = "synteny-select")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Propagate and reconcile selections across comparative genome maps")]
#[command(
    long_about = "synteny-select keeps the selected ranges of a comparative map display consistent.\n\nSelecting a range on one chromosome segment carries it onto every displayed segment showing a homolog, then:\n- Absorbs intervals contained in others\n- Merges overlapping and nearby intervals\n- Keeps merges from crossing features whose homologs disagree"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select annotations or ranges and print the reconciled intervals
    Select(select::SelectArgs),

    /// List homologs of an annotation
    Siblings(siblings::SiblingsArgs),

    /// Inspect the display catalog
    Catalog(catalog::CatalogArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
