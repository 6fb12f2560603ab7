use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::catalog::store::DisplayCatalog;
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List the displayed segments with their annotation counts
    Show {
        /// Display catalog (JSON)
        #[arg(required = true)]
        catalog: PathBuf,
    },

    /// Validate a catalog and write it back out
    Export {
        /// Display catalog (JSON)
        #[arg(required = true)]
        catalog: PathBuf,

        /// Output file path
        #[arg(required = true)]
        output: PathBuf,
    },
}

pub fn run(args: CatalogArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        CatalogCommands::Show { catalog } => run_show(catalog, format, verbose),
        CatalogCommands::Export { catalog, output } => run_export(catalog, output),
    }
}

struct SegmentSummary {
    label: String,
    start: i64,
    stop: i64,
    reversed: bool,
    annotations: usize,
}

fn run_show(catalog_path: PathBuf, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let catalog = DisplayCatalog::load_from_file(&catalog_path)?;

    if verbose {
        eprintln!(
            "Loaded catalog with {} maps, {} chromosomes and {} annotations",
            catalog.maps().len(),
            catalog.chromosomes().len(),
            catalog.len()
        );
    }

    let summaries: Vec<SegmentSummary> = catalog
        .segments()
        .iter()
        .map(|s| SegmentSummary {
            label: catalog.segment_label(s.id),
            start: s.drawing_start,
            stop: s.drawing_stop,
            reversed: s.is_reversed(),
            annotations: catalog.segment_features(s.id, s.lower(), s.upper()).len(),
        })
        .collect();

    match format {
        OutputFormat::Text => {
            let label_width = summaries
                .iter()
                .map(|s| s.label.len())
                .max()
                .unwrap_or(7)
                .max(7);

            println!(
                "Display Catalog ({} maps, {} segments, {} annotations, {} linked groups)\n",
                catalog.maps().len(),
                summaries.len(),
                catalog.len(),
                catalog.siblings().linked_group_count()
            );
            println!(
                "{:<label_w$} {:>12} {:>12} {:>9} {:>11}",
                "Segment",
                "Start",
                "Stop",
                "Reversed",
                "Annotations",
                label_w = label_width
            );
            println!("{}", "-".repeat(label_width + 12 + 12 + 9 + 11 + 4));
            for s in &summaries {
                println!(
                    "{:<label_w$} {:>12} {:>12} {:>9} {:>11}",
                    s.label,
                    s.start,
                    s.stop,
                    if s.reversed { "yes" } else { "no" },
                    s.annotations,
                    label_w = label_width
                );
            }
        }
        OutputFormat::Json => {
            let segments: Vec<_> = summaries
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "segment": s.label,
                        "start": s.start,
                        "stop": s.stop,
                        "reversed": s.reversed,
                        "annotations": s.annotations,
                    })
                })
                .collect();
            let output = serde_json::json!({
                "maps": catalog.maps(),
                "annotation_count": catalog.len(),
                "linked_groups": catalog.siblings().linked_group_count(),
                "segments": segments,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("segment\tstart\tstop\treversed\tannotations");
            for s in &summaries {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    s.label, s.start, s.stop, s.reversed, s.annotations
                );
            }
        }
    }

    Ok(())
}

fn run_export(catalog_path: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let catalog = DisplayCatalog::load_from_file(&catalog_path)?;
    let json = catalog.to_json()?;
    std::fs::write(&output, json)?;
    eprintln!(
        "Exported {} segments and {} annotations to {}",
        catalog.segments().len(),
        catalog.len(),
        output.display()
    );
    Ok(())
}
