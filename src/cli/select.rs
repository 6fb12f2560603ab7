use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use clap::Args;

use crate::catalog::store::DisplayCatalog;
use crate::cli::OutputFormat;
use crate::core::interval::Interval;
use crate::core::types::{AnnotationId, IntervalState, ReconcileMode, SegmentId};
use crate::selection::correspondence::CorrespondenceBuilder;
use crate::selection::instrument::TracingSink;
use crate::selection::reconcile::DEFAULT_COALESCE_FRACTION;
use crate::selection::store::{Selection, SelectionConfig};

#[derive(Args)]
pub struct SelectArgs {
    /// Display catalog (JSON)
    #[arg(required = true)]
    pub catalog: PathBuf,

    /// Annotation to select, by name or external id; append `@map:chromosome`
    /// to pick the segment (defaults to the first segment showing it)
    #[arg(short, long = "annotation")]
    pub annotations: Vec<String>,

    /// Range to select, as `map:chromosome:start-stop`
    #[arg(short, long = "range")]
    pub ranges: Vec<String>,

    /// Run a full reconciliation pass after all selections are applied
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Gaps smaller than this fraction of the chromosome length are merged
    #[arg(long, default_value_t = DEFAULT_COALESCE_FRACTION)]
    pub coalesce_fraction: f64,

    /// Do not propagate selections to homologous segments
    #[arg(long)]
    pub no_propagate: bool,

    /// Hide suppressed intervals
    #[arg(long)]
    pub visible_only: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ModeArg {
    Roots,
    Children,
    Both,
}

impl From<ModeArg> for ReconcileMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Roots => ReconcileMode::Roots,
            ModeArg::Children => ReconcileMode::Children,
            ModeArg::Both => ReconcileMode::Both,
        }
    }
}

pub fn run(args: SelectArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if args.annotations.is_empty() && args.ranges.is_empty() {
        bail!("Nothing to select: pass --annotation and/or --range");
    }
    if !(0.0..=1.0).contains(&args.coalesce_fraction) {
        bail!(
            "--coalesce-fraction must be between 0 and 1, got {}",
            args.coalesce_fraction
        );
    }

    let catalog = DisplayCatalog::load_from_file(&args.catalog)
        .with_context(|| format!("Failed to load catalog {}", args.catalog.display()))?;

    if verbose {
        eprintln!(
            "Loaded catalog with {} segments and {} annotations",
            catalog.segments().len(),
            catalog.len()
        );
    }

    let config = SelectionConfig {
        coalesce_fraction: args.coalesce_fraction,
        propagate: !args.no_propagate,
    };
    let mut selection = Selection::with_config(&catalog, config).with_sink(TracingSink);

    for request in &args.annotations {
        let (segment, annotation) = resolve_annotation(&catalog, request)?;
        if selection.add_annotation(segment, annotation).is_none() && verbose {
            eprintln!("Annotation '{request}' was already selected");
        }
    }
    for request in &args.ranges {
        let (segment, start, stop) = parse_range(&catalog, request)?;
        selection.add_interval(segment, start, stop);
    }

    if let Some(mode) = args.mode {
        let report = selection.verify(mode.into());
        if verbose {
            eprintln!(
                "Reconciliation: {} merged, {} dropped, {} suppressed",
                report.merged, report.dropped, report.suppressed
            );
        }
    }

    let intervals = if args.visible_only {
        selection.visible_intervals()
    } else {
        selection.intervals()
    };

    match format {
        OutputFormat::Text => print_text_intervals(&catalog, &intervals),
        OutputFormat::Json => {
            let mut snapshot = selection.snapshot();
            if args.visible_only {
                snapshot.intervals.retain(|i| i.state == IntervalState::Active);
            }
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        OutputFormat::Tsv => print_tsv_intervals(&catalog, &intervals),
    }

    Ok(())
}

/// Resolve `name` or `name@map:chromosome` to an annotation and the segment to select it on
fn resolve_annotation(
    catalog: &DisplayCatalog,
    request: &str,
) -> anyhow::Result<(SegmentId, AnnotationId)> {
    let (name, label) = match request.split_once('@') {
        Some((name, label)) => (name, Some(label)),
        None => (request, None),
    };

    let candidates = catalog.find_annotations(name);
    if candidates.is_empty() {
        bail!("Annotation '{name}' not found in catalog");
    }

    if let Some(label) = label {
        let segment = catalog
            .find_segment(label)
            .ok_or_else(|| anyhow!("Segment '{label}' is not displayed"))?;
        let chromosome = catalog.segment(segment).map(|s| s.chromosome);
        let annotation = candidates
            .iter()
            .copied()
            .find(|&a| catalog.annotation(a).map(|a| a.chromosome) == chromosome)
            .ok_or_else(|| anyhow!("Annotation '{name}' is not on {label}"))?;
        return Ok((segment, annotation));
    }

    let builder = CorrespondenceBuilder::new(catalog);
    candidates
        .iter()
        .find_map(|&a| {
            let annotation = catalog.annotation(a)?;
            builder.placement_segment(annotation).map(|s| (s, a))
        })
        .ok_or_else(|| anyhow!("Annotation '{name}' is not on any displayed segment"))
}

/// Parse `map:chromosome:start-stop`
fn parse_range(catalog: &DisplayCatalog, request: &str) -> anyhow::Result<(SegmentId, i64, i64)> {
    let (label, coords) = request
        .rsplit_once(':')
        .ok_or_else(|| anyhow!("Invalid range '{request}': expected map:chromosome:start-stop"))?;
    let (start, stop) = coords
        .split_once('-')
        .ok_or_else(|| anyhow!("Invalid range '{request}': expected start-stop"))?;
    let start: i64 = start
        .trim()
        .parse()
        .with_context(|| format!("Invalid start in range '{request}'"))?;
    let stop: i64 = stop
        .trim()
        .parse()
        .with_context(|| format!("Invalid stop in range '{request}'"))?;
    let segment = catalog
        .find_segment(label)
        .ok_or_else(|| anyhow!("Segment '{label}' is not displayed"))?;
    Ok((segment, start, stop))
}

fn parent_label(interval: &Interval) -> String {
    interval
        .parent()
        .map_or_else(|| "-".to_string(), |p| p.to_string())
}

fn print_text_intervals(catalog: &DisplayCatalog, intervals: &[&Interval]) {
    let labels: Vec<String> = intervals
        .iter()
        .map(|i| i.segment().map(|s| catalog.segment_label(s)).unwrap_or_default())
        .collect();
    let segment_width = labels.iter().map(String::len).max().unwrap_or(7).max(7);

    println!("Selection ({} intervals)\n", intervals.len());
    println!(
        "{:<8} {:<seg_w$} {:>12} {:>12} {:<10} {:<8}",
        "ID",
        "Segment",
        "Start",
        "Stop",
        "State",
        "Parent",
        seg_w = segment_width
    );
    println!("{}", "-".repeat(8 + segment_width + 12 + 12 + 10 + 8 + 5));

    for (interval, label) in intervals.iter().zip(&labels) {
        println!(
            "{:<8} {:<seg_w$} {:>12} {:>12} {:<10} {:<8}",
            interval.id().to_string(),
            label,
            interval.start(),
            interval.stop(),
            interval.state().to_string(),
            parent_label(interval),
            seg_w = segment_width
        );
    }
}

fn print_tsv_intervals(catalog: &DisplayCatalog, intervals: &[&Interval]) {
    println!("id\tsegment\tstart\tstop\tstate\tparent");
    for interval in intervals {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            interval.id().index(),
            interval
                .segment()
                .map(|s| catalog.segment_label(s))
                .unwrap_or_default(),
            interval.start(),
            interval.stop(),
            interval.state(),
            interval.parent().map_or_else(String::new, |p| p.index().to_string()),
        );
    }
}
