//! Removal of raw captures whose preview was deleted.
//!
//! The triage workflow is: run `generate`, flip through `previews/`, delete
//! the previews of bad frames (clouds, trailing, focus), then run `clean`.
//! Every raw capture whose base name no longer has a `previews/<base>.jpg`
//! is a deletion candidate.
//!
//! ```text
//! a.fits  b.fit          previews/a.jpg
//!   │       │                 │
//!   └── a ──┼──────── a ──────┘   keep a.fits
//!           └─ b (no preview)     candidate: b.fit
//! ```
//!
//! ## Safety Rules
//!
//! - Nothing happens unless both the source directory and `previews/` exist.
//! - An empty `previews/` deletes nothing: it almost always means previews
//!   were never generated or the wrong directory was given.
//! - Without `force` the candidates are only reported (dry run).
//! - Previews are only ever read, never touched.
//!
//! Deletions are independent: a failure on one file is recorded and the rest
//! still run. There is no rollback; files already removed stay removed.

use crate::naming;
use crate::scan;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Ensure both '{}' and its 'previews' subfolder exist.", .0.display())]
    MissingDirectories(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw captures without a matching preview.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanPlan {
    /// Number of distinct preview base names.
    pub preview_count: usize,
    /// Number of raw captures checked.
    pub raw_count: usize,
    /// Captures to delete, in sorted order.
    pub candidates: Vec<PathBuf>,
}

/// Result of deleting one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteResult {
    Deleted(PathBuf),
    Failed { path: PathBuf, error: String },
}

impl DeleteResult {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteResult::Deleted(_))
    }
}

/// What a `clean` run did.
#[derive(Debug, Clone, PartialEq)]
pub enum CleanOutcome {
    /// `previews/` holds no preview; nothing was checked or deleted.
    NoPreviews,
    /// Every raw capture has a preview.
    NothingToClean { preview_count: usize, raw_count: usize },
    /// Candidates found, nothing deleted.
    DryRun(CleanPlan),
    /// Candidates found and deletion attempted for each.
    Deleted {
        plan: CleanPlan,
        results: Vec<DeleteResult>,
    },
}

/// Compute the captures whose base name is absent from `preview_bases`.
///
/// Pure: no filesystem access. `raw_files` order is preserved.
pub fn plan_cleanup(raw_files: Vec<PathBuf>, preview_bases: &BTreeSet<String>) -> CleanPlan {
    let raw_count = raw_files.len();
    let candidates = raw_files
        .into_iter()
        .filter(|raw| naming::base_name(raw).is_some_and(|base| !preview_bases.contains(base)))
        .collect();

    CleanPlan {
        preview_count: preview_bases.len(),
        raw_count,
        candidates,
    }
}

/// Delete each candidate independently, recording every result.
pub fn delete_candidates(candidates: &[PathBuf]) -> Vec<DeleteResult> {
    candidates
        .iter()
        .map(|path| match std::fs::remove_file(path) {
            Ok(()) => {
                tracing::info!(file = %path.display(), "deleted raw capture");
                DeleteResult::Deleted(path.clone())
            }
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "delete failed");
                DeleteResult::Failed {
                    path: path.clone(),
                    error: e.to_string(),
                }
            }
        })
        .collect()
}

/// Find raw captures in `source` without a preview; delete them when `force` is set.
pub fn clean(source: &Path, force: bool) -> Result<CleanOutcome, CleanError> {
    let preview_dir = scan::preview_dir(source);
    if !source.is_dir() || !preview_dir.is_dir() {
        return Err(CleanError::MissingDirectories(source.to_path_buf()));
    }

    let preview_bases = scan::preview_base_names(&preview_dir)?;
    if preview_bases.is_empty() {
        return Ok(CleanOutcome::NoPreviews);
    }

    let plan = plan_cleanup(scan::raw_files(source)?, &preview_bases);
    tracing::debug!(
        previews = plan.preview_count,
        raw = plan.raw_count,
        candidates = plan.candidates.len(),
        force,
        "cleanup planned"
    );

    if plan.candidates.is_empty() {
        return Ok(CleanOutcome::NothingToClean {
            preview_count: plan.preview_count,
            raw_count: plan.raw_count,
        });
    }

    if !force {
        return Ok(CleanOutcome::DryRun(plan));
    }

    let results = delete_candidates(&plan.candidates);
    Ok(CleanOutcome::Deleted { plan, results })
}
