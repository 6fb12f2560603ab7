use std::path::PathBuf;

use anyhow::bail;
use clap::Args;

use crate::catalog::store::DisplayCatalog;
use crate::cli::OutputFormat;
use crate::core::annotation::Annotation;
use crate::selection::correspondence::CorrespondenceBuilder;

#[derive(Args)]
pub struct SiblingsArgs {
    /// Display catalog (JSON)
    #[arg(required = true)]
    pub catalog: PathBuf,

    /// Annotation name or external id
    #[arg(required = true)]
    pub annotation: String,
}

/// One homolog and the segment it would be placed on
struct SiblingRow<'a> {
    source: &'a Annotation,
    sibling: &'a Annotation,
    location: String,
    displayed_on: Option<String>,
}

pub fn run(args: SiblingsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let catalog = DisplayCatalog::load_from_file(&args.catalog)?;

    if verbose {
        eprintln!(
            "Loaded catalog with {} annotations in {} linked groups",
            catalog.len(),
            catalog.siblings().linked_group_count()
        );
    }

    let sources = catalog.find_annotations(&args.annotation);
    if sources.is_empty() {
        bail!("Annotation '{}' not found in catalog", args.annotation);
    }

    let builder = CorrespondenceBuilder::new(&catalog);
    let mut rows = Vec::new();
    for &source in sources {
        let Some(source_annotation) = catalog.annotation(source) else {
            continue;
        };
        for sibling in catalog.siblings().siblings(source) {
            let Some(annotation) = catalog.annotation(sibling) else {
                continue;
            };
            rows.push(SiblingRow {
                source: source_annotation,
                sibling: annotation,
                location: location(&catalog, annotation),
                displayed_on: builder
                    .placement_segment(annotation)
                    .map(|s| catalog.segment_label(s)),
            });
        }
    }

    match format {
        OutputFormat::Text => print_text_siblings(&args.annotation, &rows),
        OutputFormat::Json => print_json_siblings(&args.annotation, &rows)?,
        OutputFormat::Tsv => print_tsv_siblings(&rows),
    }

    Ok(())
}

fn location(catalog: &DisplayCatalog, annotation: &Annotation) -> String {
    match catalog.chromosome(annotation.chromosome) {
        Some(c) => format!("{}:{}:{}-{}", c.map, c.name, annotation.start, annotation.stop),
        None => format!("{}-{}", annotation.start, annotation.stop),
    }
}

fn print_text_siblings(query: &str, rows: &[SiblingRow<'_>]) {
    println!("Homologs of {} ({} found)\n", query, rows.len());
    if rows.is_empty() {
        println!("  (none)");
        return;
    }

    let name_width = rows
        .iter()
        .map(|r| r.sibling.name.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let location_width = rows
        .iter()
        .map(|r| r.location.len())
        .max()
        .unwrap_or(8)
        .max(8);

    println!(
        "{:<name_w$} {:<loc_w$} {}",
        "Name",
        "Location",
        "Displayed",
        name_w = name_width,
        loc_w = location_width
    );
    println!("{}", "-".repeat(name_width + location_width + 12));
    for row in rows {
        println!(
            "{:<name_w$} {:<loc_w$} {}",
            row.sibling.name,
            row.location,
            row.displayed_on.as_deref().unwrap_or("-"),
            name_w = name_width,
            loc_w = location_width
        );
    }
}

fn print_json_siblings(query: &str, rows: &[SiblingRow<'_>]) -> anyhow::Result<()> {
    let siblings: Vec<_> = rows
        .iter()
        .map(|r| {
            serde_json::json!({
                "source": r.source.name,
                "name": r.sibling.name,
                "external_id": r.sibling.external_id,
                "location": r.location,
                "links": r.sibling.links,
                "displayed_on": r.displayed_on,
            })
        })
        .collect();

    let output = serde_json::json!({
        "query": query,
        "count": rows.len(),
        "siblings": siblings,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_siblings(rows: &[SiblingRow<'_>]) {
    println!("source\tname\tlocation\tdisplayed_on");
    for row in rows {
        println!(
            "{}\t{}\t{}\t{}",
            row.source.name,
            row.sibling.name,
            row.location,
            row.displayed_on.as_deref().unwrap_or(""),
        );
    }
}
