//! CLI output formatting for both commands.
//!
//! # Output Format
//!
//! ## Generate
//!
//! ```text
//! Created preview directory: night/previews
//! Found 3 FITS files. Generating previews...
//!   -> Saved preview for M31_0001.fits
//!   -> Could not process M31_0002.fits: FITS header has no END card
//!   -> Saved preview for M31_0003.fits (flat image)
//!
//! Preview generation complete: 2 saved, 1 failed.
//! ```
//!
//! ## Clean
//!
//! ```text
//! Found 2 remaining previews. Checking 3 FITS files.
//!
//! --- DRY RUN MODE ---
//! No files will be deleted. The following files are marked for removal:
//!   -> M31_0002.fits
//!
//! To delete these files, run this command again with the --force flag.
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::clean::{CleanOutcome, CleanPlan, DeleteResult};
use crate::generate::{FileOutcome, GenerateReport, PreviewEvent};
use crate::naming::display_name;

/// `"1 FITS file"` / `"3 FITS files"`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

// ============================================================================
// Generate output
// ============================================================================

/// Format a single generate progress event as display lines.
pub fn format_preview_event(event: &PreviewEvent) -> Vec<String> {
    match event {
        PreviewEvent::CreatedPreviewDir(dir) => {
            vec![format!("Created preview directory: {}", dir.display())]
        }
        PreviewEvent::NoRawFiles(dir) => vec![format!(
            "No FITS files found in '{}'. Nothing to do.",
            dir.display()
        )],
        PreviewEvent::Found { count } => vec![format!(
            "Found {}. Generating previews...",
            plural(*count, "FITS file")
        )],
        PreviewEvent::Processed(FileOutcome::Saved { source, flat, .. }) => {
            let suffix = if *flat { " (flat image)" } else { "" };
            vec![format!(
                "  -> Saved preview for {}{}",
                display_name(source),
                suffix
            )]
        }
        PreviewEvent::Processed(FileOutcome::Failed { source, error }) => vec![format!(
            "  -> Could not process {}: {}",
            display_name(source),
            error
        )],
    }
}

pub fn print_preview_event(event: &PreviewEvent) {
    for line in format_preview_event(event) {
        println!("{}", line);
    }
}

/// Format the closing summary of a generate run.
///
/// Empty when nothing was processed; the `NoRawFiles` event already said so.
pub fn format_generate_summary(report: &GenerateReport) -> Vec<String> {
    if report.outcomes.is_empty() {
        return Vec::new();
    }
    vec![
        String::new(),
        format!(
            "Preview generation complete: {} saved, {} failed.",
            report.saved(),
            report.failed()
        ),
    ]
}

pub fn print_generate_summary(report: &GenerateReport) {
    for line in format_generate_summary(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Clean output
// ============================================================================

fn plan_header(preview_count: usize, raw_count: usize) -> String {
    format!(
        "Found {} remaining {}. Checking {}.",
        preview_count,
        if preview_count == 1 { "preview" } else { "previews" },
        plural(raw_count, "FITS file")
    )
}

fn format_dry_run(plan: &CleanPlan) -> Vec<String> {
    let mut lines = vec![
        plan_header(plan.preview_count, plan.raw_count),
        String::new(),
        "--- DRY RUN MODE ---".to_string(),
        "No files will be deleted. The following files are marked for removal:".to_string(),
    ];
    lines.extend(
        plan.candidates
            .iter()
            .map(|path| format!("  -> {}", display_name(path))),
    );
    lines.push(String::new());
    lines.push("To delete these files, run this command again with the --force flag.".to_string());
    lines
}

fn format_deletions(plan: &CleanPlan, results: &[DeleteResult]) -> Vec<String> {
    let mut lines = vec![
        plan_header(plan.preview_count, plan.raw_count),
        String::new(),
        format!("--- DELETING {} ---", plural(plan.candidates.len(), "FITS FILE")),
    ];

    let mut deleted = 0;
    for result in results {
        match result {
            DeleteResult::Deleted(path) => {
                deleted += 1;
                lines.push(format!("  -> DELETED: {}", display_name(path)));
            }
            DeleteResult::Failed { path, error } => {
                lines.push(format!(
                    "  -> ERROR: Could not delete {}: {}",
                    display_name(path),
                    error
                ));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Cleanup complete: {} deleted, {} failed.",
        deleted,
        results.len() - deleted
    ));
    lines
}

/// Format the result of a clean run.
pub fn format_clean_outcome(outcome: &CleanOutcome) -> Vec<String> {
    match outcome {
        CleanOutcome::NoPreviews => {
            vec!["Warning: No preview files found. No FITS files will be deleted.".to_string()]
        }
        CleanOutcome::NothingToClean {
            preview_count,
            raw_count,
        } => vec![
            plan_header(*preview_count, *raw_count),
            "All FITS files have a matching preview. Nothing to clean.".to_string(),
        ],
        CleanOutcome::DryRun(plan) => format_dry_run(plan),
        CleanOutcome::Deleted { plan, results } => format_deletions(plan, results),
    }
}

pub fn print_clean_outcome(outcome: &CleanOutcome) {
    for line in format_clean_outcome(outcome) {
        println!("{}", line);
    }
}
