//! Preview generation for a directory of raw captures.
//!
//! For every raw capture (`*.fit*`) directly inside the source directory,
//! writes a stretched grayscale JPEG into `previews/`:
//!
//! ```text
//! night-2024-09-14/
//! ├── M31_0001.fits
//! ├── M31_0002.fits        # corrupt → reported, no preview
//! └── previews/            # created on first run
//!     └── M31_0001.jpg
//! ```
//!
//! ## Failure Handling
//!
//! Only a missing source directory (or an unreadable one) stops the batch.
//! Per-file problems become [`FileOutcome::Failed`] entries in the
//! [`GenerateReport`] and the batch moves on to the next capture.
//!
//! Two captures with the same base name (`M31.fit` and `M31.fits`) would
//! write the same preview. The first one in sorted order that renders
//! successfully wins; later ones are reported as failures rather than
//! silently overwriting it. A capture that fails to decode does not block
//! the next one with the same base name.
//!
//! ## Progress
//!
//! Files are processed one at a time. Each step is reported to the caller
//! through a [`PreviewEvent`] callback so the CLI can print as it goes.

use crate::config::PreviewConfig;
use crate::imaging::{
    PreviewBackend, PreviewSettings, Quality, RenderedPreview, RustBackend, render_preview,
};
use crate::naming;
use crate::scan;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Directory not found at '{}'", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome for a single raw capture.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Saved {
        source: PathBuf,
        preview: PathBuf,
        /// Rendered flat gray because the capture had no usable range.
        flat: bool,
    },
    Failed {
        source: PathBuf,
        error: String,
    },
}

impl FileOutcome {
    pub fn source(&self) -> &Path {
        match self {
            FileOutcome::Saved { source, .. } | FileOutcome::Failed { source, .. } => source,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, FileOutcome::Saved { .. })
    }
}

/// Progress events emitted while generating.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewEvent {
    /// The `previews/` directory did not exist and was created.
    CreatedPreviewDir(PathBuf),
    /// No raw capture matched in the source directory.
    NoRawFiles(PathBuf),
    /// Raw captures found, processing starts.
    Found { count: usize },
    /// One capture finished, successfully or not.
    Processed(FileOutcome),
}

/// Per-file outcomes of one `generate` run, in processing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateReport {
    pub outcomes: Vec<FileOutcome>,
}

impl GenerateReport {
    pub fn saved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_saved()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.saved()
    }
}

impl From<&PreviewConfig> for PreviewSettings {
    fn from(config: &PreviewConfig) -> Self {
        Self {
            quality: Quality::new(config.quality),
            max_size: config.max_size,
        }
    }
}

/// Generate previews for every raw capture in `source`.
pub fn generate(
    source: &Path,
    config: &PreviewConfig,
    on_event: impl FnMut(&PreviewEvent),
) -> Result<GenerateReport, GenerateError> {
    generate_with_backend(&RustBackend::new(), source, config, on_event)
}

/// Generate previews using a specific backend (allows testing with mock).
pub fn generate_with_backend(
    backend: &impl PreviewBackend,
    source: &Path,
    config: &PreviewConfig,
    mut on_event: impl FnMut(&PreviewEvent),
) -> Result<GenerateReport, GenerateError> {
    if !source.is_dir() {
        return Err(GenerateError::DirectoryNotFound(source.to_path_buf()));
    }

    let preview_dir = scan::preview_dir(source);
    if !preview_dir.is_dir() {
        std::fs::create_dir_all(&preview_dir)?;
        on_event(&PreviewEvent::CreatedPreviewDir(preview_dir.clone()));
    }

    let raw_files = scan::raw_files(source)?;
    if raw_files.is_empty() {
        on_event(&PreviewEvent::NoRawFiles(source.to_path_buf()));
        return Ok(GenerateReport::default());
    }
    on_event(&PreviewEvent::Found {
        count: raw_files.len(),
    });

    let settings = PreviewSettings::from(config);
    let mut claimed: HashMap<String, PathBuf> = HashMap::new();
    let mut report = GenerateReport::default();

    for raw in raw_files {
        let base = naming::base_name(&raw).map(str::to_owned);
        let owner = base.as_ref().and_then(|b| claimed.get(b));
        let outcome = match owner {
            Some(owner) => FileOutcome::Failed {
                error: format!(
                    "base name collides with {}",
                    naming::display_name(owner)
                ),
                source: raw,
            },
            None => render_one(backend, raw, &preview_dir, &settings),
        };

        // Only a written preview owns its base name; a failed capture
        // leaves it free for the next file sharing it.
        if let (FileOutcome::Saved { source, .. }, Some(base)) = (&outcome, base) {
            claimed.insert(base, source.clone());
        }

        on_event(&PreviewEvent::Processed(outcome.clone()));
        report.outcomes.push(outcome);
    }

    Ok(report)
}

fn render_one(
    backend: &impl PreviewBackend,
    raw: PathBuf,
    preview_dir: &Path,
    settings: &PreviewSettings,
) -> FileOutcome {
    let started = Instant::now();
    match render_preview(backend, &raw, preview_dir, settings) {
        Ok(RenderedPreview {
            output,
            width,
            height,
            normalization,
            flat,
        }) => {
            tracing::debug!(
                file = %raw.display(),
                width,
                height,
                vmin = normalization.map(|n| n.vmin),
                vmax = normalization.map(|n| n.vmax),
                flat,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "preview written"
            );
            FileOutcome::Saved {
                source: raw,
                preview: output,
                flat,
            }
        }
        Err(e) => {
            tracing::debug!(file = %raw.display(), error = %e, "preview failed");
            FileOutcome::Failed {
                source: raw,
                error: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, ramp};
    use crate::test_helpers::{
        file_names, fits_bytes, touch, write_constant_fits, write_corrupt_fits,
        write_gradient_fits,
    };
    use tempfile::TempDir;

    fn run(backend: &MockBackend, dir: &Path) -> (GenerateReport, Vec<PreviewEvent>) {
        let mut events = Vec::new();
        let report = generate_with_backend(backend, dir, &PreviewConfig::default(), |e| {
            events.push(e.clone())
        })
        .unwrap();
        (report, events)
    }

    // =========================================================================
    // Mock backend: batch logic only
    // =========================================================================

    #[test]
    fn missing_directory_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");

        let result =
            generate_with_backend(&MockBackend::new(), &missing, &PreviewConfig::default(), |_| {});
        assert!(matches!(result, Err(GenerateError::DirectoryNotFound(_))));
        assert!(!missing.exists());
    }

    #[test]
    fn file_instead_of_directory_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let file = touch(tmp.path(), "a.fits");

        let result =
            generate_with_backend(&MockBackend::new(), &file, &PreviewConfig::default(), |_| {});
        assert!(matches!(result, Err(GenerateError::DirectoryNotFound(_))));
    }

    #[test]
    fn creates_preview_dir_and_reports_it() {
        let tmp = TempDir::new().unwrap();

        let (_, events) = run(&MockBackend::new(), tmp.path());

        assert!(tmp.path().join("previews").is_dir());
        assert_eq!(
            events[0],
            PreviewEvent::CreatedPreviewDir(tmp.path().join("previews"))
        );
    }

    #[test]
    fn existing_preview_dir_not_reported() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("previews")).unwrap();

        let (_, events) = run(&MockBackend::new(), tmp.path());
        assert_eq!(events, vec![PreviewEvent::NoRawFiles(tmp.path().to_path_buf())]);
    }

    #[test]
    fn no_raw_files_returns_empty_report() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "notes.txt");

        let backend = MockBackend::new();
        let (report, events) = run(&backend, tmp.path());

        assert!(report.outcomes.is_empty());
        assert!(events.contains(&PreviewEvent::NoRawFiles(tmp.path().to_path_buf())));
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn one_preview_per_decodable_capture() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.fits");
        touch(tmp.path(), "b.fit");
        touch(tmp.path(), "c.fits");

        let backend = MockBackend::new()
            .with_image("a.fits", ramp(4, 4))
            .with_image("c.fits", ramp(4, 4));
        let (report, events) = run(&backend, tmp.path());

        assert_eq!(report.saved(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(backend.encoded_outputs(), vec!["a.jpg", "c.jpg"]);
        assert!(events.contains(&PreviewEvent::Found { count: 3 }));
        assert!(matches!(
            &report.outcomes[1],
            FileOutcome::Failed { source, .. } if source.ends_with("b.fit")
        ));
    }

    #[test]
    fn duplicate_base_name_reported_not_overwritten() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "m31.fit");
        touch(tmp.path(), "m31.fits");

        let backend = MockBackend::new()
            .with_image("m31.fit", ramp(2, 2))
            .with_image("m31.fits", ramp(2, 2));
        let (report, _) = run(&backend, tmp.path());

        assert_eq!(backend.encoded_outputs(), vec!["m31.jpg"]);
        assert_eq!(
            report.outcomes[1],
            FileOutcome::Failed {
                source: tmp.path().join("m31.fits"),
                error: "base name collides with m31.fit".to_string(),
            }
        );
    }

    #[test]
    fn failed_capture_does_not_claim_base_name() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "m31.fit");
        touch(tmp.path(), "m31.fits");

        let backend = MockBackend::new().with_image("m31.fits", ramp(4, 4));
        let (report, _) = run(&backend, tmp.path());

        assert_eq!(backend.encoded_outputs(), vec!["m31.jpg"]);
        assert!(matches!(
            &report.outcomes[0],
            FileOutcome::Failed { source, .. } if source.ends_with("m31.fit")
        ));
        assert!(matches!(
            &report.outcomes[1],
            FileOutcome::Saved { source, .. } if source.ends_with("m31.fits")
        ));
    }

    #[test]
    fn config_quality_reaches_backend() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.fits");
        let backend = MockBackend::new().with_image("a.fits", ramp(2, 2));
        let config = PreviewConfig {
            quality: 70,
            max_size: None,
        };

        generate_with_backend(&backend, tmp.path(), &config, |_| {}).unwrap();

        assert!(matches!(
            backend.get_operations().last(),
            Some(crate::imaging::backend::tests::RecordedOp::Encode { quality: 70, .. })
        ));
    }

    // =========================================================================
    // Real backend: synthetic FITS files on disk
    // =========================================================================

    #[test]
    fn corrupt_and_valid_capture_produce_one_preview() {
        let tmp = TempDir::new().unwrap();
        write_gradient_fits(tmp.path(), "good.fits", 32, 16);
        write_corrupt_fits(tmp.path(), "bad.fits");

        let report = generate(tmp.path(), &PreviewConfig::default(), |_| {}).unwrap();

        assert_eq!(report.saved(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(file_names(&tmp.path().join("previews")), vec!["good.jpg"]);
        let preview = tmp.path().join("previews/good.jpg");
        assert_eq!(image::image_dimensions(&preview).unwrap(), (32, 16));
    }

    #[test]
    fn oversized_header_fails_without_stopping_batch() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("a_bad.fits"),
            fits_bytes(-64, &[1 << 30, 1 << 30], &[], &[0; 8]),
        )
        .unwrap();
        write_gradient_fits(tmp.path(), "b_good.fits", 8, 8);

        let report = generate(tmp.path(), &PreviewConfig::default(), |_| {}).unwrap();

        assert_eq!((report.saved(), report.failed()), (1, 1));
        assert_eq!(file_names(&tmp.path().join("previews")), vec!["b_good.jpg"]);
    }

    #[test]
    fn running_twice_overwrites_previews() {
        let tmp = TempDir::new().unwrap();
        write_gradient_fits(tmp.path(), "a.fits", 8, 8);

        let first = generate(tmp.path(), &PreviewConfig::default(), |_| {}).unwrap();
        let second = generate(tmp.path(), &PreviewConfig::default(), |_| {}).unwrap();

        assert_eq!(first.saved(), 1);
        assert_eq!(second.saved(), 1);
        assert_eq!(file_names(&tmp.path().join("previews")), vec!["a.jpg"]);
    }

    #[test]
    fn constant_capture_is_saved_flat() {
        let tmp = TempDir::new().unwrap();
        write_constant_fits(tmp.path(), "flat.fits", 4, 4);

        let report = generate(tmp.path(), &PreviewConfig::default(), |_| {}).unwrap();

        assert!(matches!(
            &report.outcomes[0],
            FileOutcome::Saved { flat: true, .. }
        ));
        let img = image::open(tmp.path().join("previews/flat.jpg"))
            .unwrap()
            .to_luma8();
        let level = img.get_pixel(0, 0)[0];
        assert!((120..=136).contains(&level), "expected mid-gray, got {level}");
    }

    #[test]
    fn max_size_downscales_preview() {
        let tmp = TempDir::new().unwrap();
        write_gradient_fits(tmp.path(), "big.fits", 64, 32);
        let config = PreviewConfig {
            quality: 90,
            max_size: Some(16),
        };

        generate(tmp.path(), &config, |_| {}).unwrap();

        let preview = tmp.path().join("previews/big.jpg");
        assert_eq!(image::image_dimensions(&preview).unwrap(), (16, 8));
    }

    #[test]
    fn bright_corner_lands_at_top_right() {
        // gradient_pixels puts the brightest pixel last: top row in FITS order.
        let tmp = TempDir::new().unwrap();
        write_gradient_fits(tmp.path(), "star.fits", 16, 16);

        generate(tmp.path(), &PreviewConfig::default(), |_| {}).unwrap();

        let img = image::open(tmp.path().join("previews/star.jpg"))
            .unwrap()
            .to_luma8();
        let top_right = img.get_pixel(15, 0)[0];
        let bottom_left = img.get_pixel(0, 15)[0];
        assert!(top_right > bottom_left);
    }
}
