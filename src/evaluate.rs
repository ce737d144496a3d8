use anyhow::{Context, Result};
use chrono::Local;
use futures::stream::{FuturesUnordered, StreamExt};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::buffered_eprintln;
use crate::config::Config;
use crate::gde::{evaluate_elements, evaluate_family, evaluate_structure, normalize};
use crate::ingest::{read_sheet, resolve_source, sheet_delimiter, source::PHOTO_DIR, ReportRequest};
use crate::report::{FamilyFailure, FamilyReport, Report};

/// Everything a worker needs to evaluate one family on its own.
#[derive(Debug, Clone)]
pub struct FamilyJob {
    pub position: usize,
    pub name: String,
    pub path: PathBuf,
    pub importance: u8,
    pub importance_description: String,
    /// Delimiter override for this family's sheet
    pub delimiter: Option<char>,
}

/// Read, normalize and score one family.
///
/// Blocking: reads the sheet from disk. Tolerated data problems are
/// reported through the warning buffer, structural problems are errors.
/// `default_delimiter` applies unless the job overrides it or the sheet is a
/// `.tsv` file.
pub fn evaluate_source(job: &FamilyJob, default_delimiter: char) -> Result<FamilyReport> {
    let source = resolve_source(&job.path)?;
    let delimiter = job
        .delimiter
        .unwrap_or_else(|| sheet_delimiter(&source.sheet, default_delimiter));
    let original = read_sheet(&source.sheet, delimiter)?;
    let table = normalize(&original)
        .with_context(|| format!("Invalid inspection table in {}", source.sheet.display()))?;

    let elements = evaluate_elements(&table);
    let result = evaluate_family(elements, f64::from(job.importance));

    if table.coerced_cells > 0 {
        buffered_eprintln!(
            "Warning: {}: {} non-numeric factor cell(s) read as 0",
            job.name,
            table.coerced_cells
        );
    }
    if source.is_directory && source.photos.is_empty() {
        buffered_eprintln!("Warning: {}: no photos found in {}/", job.name, PHOTO_DIR);
    }

    Ok(FamilyReport {
        position: job.position,
        name: job.name.clone(),
        sheet: source.sheet,
        importance: job.importance,
        importance_description: job.importance_description.clone(),
        result,
        photos: source.photos,
        observations: table.observations().count(),
        coerced_cells: table.coerced_cells,
        original,
    })
}

/// Evaluate every family of a request and aggregate the structure grade.
///
/// Families are evaluated in parallel, each on its own blocking task. A
/// family that fails is recorded in `Report::failures` and the others carry
/// on; only when every family fails is the whole request an error.
pub async fn evaluate_request(
    request: &ReportRequest,
    config: &Config,
    verbose: bool,
) -> Result<Report> {
    let vocabulary = config.vocabulary();
    let delimiter = config.delimiter();

    let mut futures = FuturesUnordered::new();
    for (idx, family) in request.families.iter().enumerate() {
        let job = FamilyJob {
            position: idx + 1,
            name: family.display_name(),
            path: family.path.clone(),
            importance: family.importance,
            importance_description: vocabulary
                .describe(family.importance)
                .unwrap_or_default()
                .to_string(),
            delimiter: family.delimiter(),
        };
        if verbose {
            eprintln!("Evaluating family {}: {} ({})", job.position, job.name, job.path.display());
        }
        futures.push(async move {
            let started = Instant::now();
            let position = job.position;
            let name = job.name.clone();
            let joined = tokio::task::spawn_blocking(move || evaluate_source(&job, delimiter)).await;
            (position, name, started.elapsed(), joined)
        });
    }

    let mut families = Vec::new();
    let mut failures = Vec::new();

    while let Some((position, name, elapsed, joined)) = futures.next().await {
        match joined.map_err(anyhow::Error::from).and_then(|r| r) {
            Ok(family) => {
                if verbose {
                    eprintln!(
                        "  {}: {} elements ({} damaged), {} observations in {}",
                        family.name,
                        family.result.elements.len(),
                        family.result.participating(),
                        family.observations,
                        humantime::format_duration(Duration::from_millis(elapsed.as_millis() as u64))
                    );
                }
                families.push(family);
            }
            Err(e) => {
                eprintln!("Family failed: {} - {:#}", name, e);
                failures.push(FamilyFailure {
                    position,
                    name,
                    error: format!("{:#}", e),
                });
            }
        }
    }

    if families.is_empty() && !request.families.is_empty() {
        anyhow::bail!("All families failed. Check the inspection sheets listed in the request.");
    }

    families.sort_by_key(|f| f.position);
    failures.sort_by_key(|f| f.position);

    if verbose && !failures.is_empty() {
        eprintln!("{} of {} families failed", failures.len(), request.families.len());
    }

    let structure = evaluate_structure(families.iter().map(|f| &f.result));

    Ok(Report {
        title: request
            .title
            .clone()
            .unwrap_or_else(|| config.report_title().to_string()),
        generated_at: Local::now(),
        families,
        failures,
        structure,
    })
}
