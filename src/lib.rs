//! # fits-triage
//!
//! Quick-look triage for a night of astronomical captures. Point it at a
//! directory of FITS files, page through the stretched JPEG previews it
//! writes, delete the bad ones, and let it remove the matching raw files.
//!
//! # Workflow
//!
//! ```text
//! 1. generate   night/*.fits       →  night/previews/*.jpg   (stretch + encode)
//! 2. (you)      delete previews of frames you reject
//! 3. clean      night/previews/    →  lists, or with --force deletes, orphaned raws
//! ```
//!
//! The preview directory is the only state shared between the two commands.
//! A raw capture survives `clean` exactly when a preview with its base name
//! is still present.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | File classification: raw capture, preview, base name |
//! | [`scan`] | Non-recursive directory listing of raws and previews |
//! | [`imaging`] | FITS decoding, percentile + asinh stretch, JPEG encoding |
//! | [`generate`] | `generate` command: one preview per raw capture |
//! | [`clean`] | `clean` command: dry run or deletion of orphaned raws |
//! | [`config`] | Optional per-directory `fits-triage.toml` |
//! | [`output`] | CLI output formatting for both commands |
//!
//! # Design Decisions
//!
//! ## Fixed Stretch
//!
//! Every preview is stretched the same way: a 5th/99.5th percentile window
//! followed by an asinh curve. Faint nebulosity becomes visible while stars
//! stay unclipped, and two previews from the same night are directly
//! comparable. The window is computed per image, so no calibration is needed.
//!
//! ## Pure-Rust FITS Reader
//!
//! Only the primary HDU's first image plane is read, by a small parser in
//! [`imaging`]. No cfitsio, so the binary has no system dependencies.
//!
//! ## Dry Run by Default
//!
//! `clean` never deletes without `--force`, and refuses to delete anything
//! when `previews/` is empty: an empty preview folder almost always means
//! previews were never generated, not that every frame was rejected.

pub mod clean;
pub mod config;
pub mod generate;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
