use std::fmt;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::archive::{build_batch_archive, BatchItem};
use crate::config::EditorConfig;
use crate::detect::PanelDetector;
use crate::error::Result;
use crate::ordering::PanelNaming;
use crate::session::EditorSession;
use crate::source::SourceImage;

/// Batch processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchStage {
    Loading,
    Detecting,
    Packaging,
}

impl fmt::Display for BatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading images"),
            Self::Detecting => write!(f, "Detecting panels"),
            Self::Packaging => write!(f, "Packaging archive"),
        }
    }
}

/// Progress callbacks for batch runs. All methods default to no-ops.
pub trait ProgressReporter: Send + Sync {
    /// A stage has started. `total_items` is the number of files, if known.
    fn begin_stage(&self, _stage: BatchStage, _total_items: Option<usize>) {}

    /// Work on `name` is about to start.
    fn item_started(&self, _name: &str) {}

    /// `items_done` files of the current stage are finished.
    fn advance(&self, _items_done: usize) {}

    fn finish_stage(&self) {}
}

pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// A file the batch had to skip.
#[derive(Clone, Debug)]
pub struct BatchFailure {
    pub source_name: String,
    pub reason: String,
}

/// Outcome of a batch run: the panels of every processed file plus the
/// files that failed.
#[derive(Clone, Debug, Default)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn panel_count(&self) -> usize {
        self.items.iter().map(|i| i.panels.len()).sum()
    }

    /// Archive with one folder per processed file.
    pub fn build_archive(&self, naming: PanelNaming) -> Result<Vec<u8>> {
        build_batch_archive(&self.items, naming)
    }

    /// [`build_archive`](Self::build_archive), reported as the
    /// `Packaging` stage. One item per folder written.
    pub fn package(
        &self,
        naming: PanelNaming,
        reporter: &dyn ProgressReporter,
    ) -> Result<Vec<u8>> {
        let folders = self.items.iter().filter(|i| !i.panels.is_empty()).count();
        reporter.begin_stage(BatchStage::Packaging, Some(folders));
        let bytes = self.build_archive(naming);
        if bytes.is_ok() {
            reporter.advance(folders);
        }
        reporter.finish_stage();
        bytes
    }
}

/// Detect and extract panels for each source, strictly one after another.
///
/// A file whose detection or extraction fails is recorded in
/// `failures` and the batch moves on.
pub fn run_batch_sources(
    sources: Vec<SourceImage>,
    config: &EditorConfig,
    detector: &dyn PanelDetector,
    reporter: &dyn ProgressReporter,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    let total = sources.len();
    reporter.begin_stage(BatchStage::Detecting, Some(total));

    for (i, source) in sources.into_iter().enumerate() {
        let name = source.name().to_string();
        reporter.item_started(&name);
        match process_source(source, config, detector) {
            Ok(item) => {
                info!(
                    source = %name,
                    panels = item.panels.len(),
                    "[{}/{}] Processed",
                    i + 1,
                    total
                );
                report.items.push(item);
            }
            Err(e) => {
                warn!(source = %name, error = %e, "[{}/{}] Failed", i + 1, total);
                report.failures.push(BatchFailure {
                    source_name: name,
                    reason: e.to_string(),
                });
            }
        }
        reporter.advance(i + 1);
    }
    reporter.finish_stage();
    Ok(report)
}

/// Load every file, then run [`run_batch_sources`]. Files that cannot be
/// read or decoded are recorded as failures.
pub fn run_batch_files(
    paths: &[PathBuf],
    config: &EditorConfig,
    detector: &dyn PanelDetector,
    reporter: &dyn ProgressReporter,
) -> Result<BatchReport> {
    config.validate()?;
    let timeout = config.decode_timeout();
    let mut sources = Vec::with_capacity(paths.len());
    let mut failures = Vec::new();

    reporter.begin_stage(BatchStage::Loading, Some(paths.len()));
    for (i, path) in paths.iter().enumerate() {
        let name = path.display().to_string();
        reporter.item_started(&name);
        match SourceImage::open(path, timeout) {
            Ok(source) => sources.push(source),
            Err(e) => {
                warn!(path = %name, error = %e, "Skipping unreadable image");
                failures.push(BatchFailure {
                    source_name: name,
                    reason: e.to_string(),
                });
            }
        }
        reporter.advance(i + 1);
    }
    reporter.finish_stage();

    let mut report = run_batch_sources(sources, config, detector, reporter)?;
    failures.append(&mut report.failures);
    report.failures = failures;
    Ok(report)
}

/// One file through a fresh session at zoom 1, so detection coordinates
/// and native pixels coincide.
fn process_source(
    source: SourceImage,
    config: &EditorConfig,
    detector: &dyn PanelDetector,
) -> Result<BatchItem> {
    let source_name = source.name().to_string();
    let mut session = EditorSession::new(config.clone())?;
    session.load_image(source);
    session.set_zoom(1.0)?;
    session.run_detection(detector)?;
    Ok(BatchItem {
        source_name,
        panels: session.previews().to_vec(),
    })
}
