use image::DynamicImage;
use jobshot_core::{JobRecord, PayPolicy, Sequence, SequenceExhausted};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::assemble::RecordAssembler;
use crate::capture::{capture_with_fallback, CaptureError, RegionCapture};
use crate::preprocess;
use crate::recognizer::{OcrBackend, OcrError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load capture: {0}")]
    Image(#[from] image::ImageError),
    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] crate::preprocess::PreprocessError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
    #[error(transparent)]
    Sequence(#[from] SequenceExhausted),
}

/// File name of the stored capture for listing `index`.
pub fn screenshot_name(index: u32) -> String {
    format!("job_{index:04}.png")
}

/// Orchestrates, one listing at a time: preprocess → store capture → OCR → assemble.
pub struct ListingPipeline<R: OcrBackend> {
    recognizer: R,
    assembler: RecordAssembler,
    screenshots_dir: PathBuf,
}

impl<R: OcrBackend> ListingPipeline<R> {
    pub fn new(recognizer: R, policy: PayPolicy, screenshots_dir: PathBuf) -> Self {
        Self {
            recognizer,
            assembler: RecordAssembler::new(policy),
            screenshots_dir,
        }
    }

    /// Process one captured listing. The sequence index is only consumed when
    /// a record comes out; on error the caller keeps its `Sequence`.
    pub async fn process_listing(
        &self,
        image: &DynamicImage,
        page: u32,
        seq: Sequence,
    ) -> Result<(JobRecord, Sequence), PipelineError> {
        // 1. Preprocess.
        let image_bytes = preprocess::prepare_image(image)?;

        // 2. Persist the untouched capture so the record can point at it.
        let dest = self.screenshots_dir.join(screenshot_name(seq.peek()));
        let (id, next) = seq.claim(page, dest.clone())?;
        tokio::fs::create_dir_all(&self.screenshots_dir).await?;
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
        tokio::fs::write(&dest, &png).await?;

        // 3. Run OCR.
        let raw_text = self.recognizer.recognize(&image_bytes)?;

        // 4. Assemble.
        let record = self.assembler.assemble(&raw_text, id);
        let pay = record.pay_text().unwrap_or_else(|| "-".into());
        tracing::info!(
            index = record.index(),
            page,
            title = record.title().unwrap_or("-"),
            pay = %pay,
            "listing extracted"
        );
        Ok((record, next))
    }

    /// Process a listing screenshot already on disk.
    pub async fn process_file(
        &self,
        path: &Path,
        page: u32,
        seq: Sequence,
    ) -> Result<(JobRecord, Sequence), PipelineError> {
        let bytes = tokio::fs::read(path).await?;
        let image = image::load_from_memory(&bytes)?;
        self.process_listing(&image, page, seq).await
    }

    /// Process every listing on a page in order. Listings whose capture or
    /// OCR fails are logged and skipped; the rest of the page continues.
    pub async fn process_page<C: RegionCapture + ?Sized>(
        &self,
        capture: &mut C,
        page: u32,
        mut seq: Sequence,
    ) -> (Vec<JobRecord>, Sequence) {
        let count = match capture.listing_count() {
            Ok(0) => {
                tracing::warn!(page, "no listings found on page");
                return (Vec::new(), seq);
            }
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(page, error = %e, "listing discovery failed");
                return (Vec::new(), seq);
            }
        };
        tracing::info!(page, count, "processing page");

        let mut records = Vec::with_capacity(count);
        for i in 0..count {
            let image = match capture_with_fallback(capture, i) {
                Ok(img) => img,
                Err(e) => {
                    tracing::warn!(page, listing = i, error = %e, "capture failed, skipping listing");
                    continue;
                }
            };
            match self.process_listing(&image, page, seq).await {
                Ok((record, next)) => {
                    records.push(record);
                    seq = next;
                }
                Err(e) => {
                    tracing::warn!(page, listing = i, error = %e, "listing skipped");
                }
            }
        }

        tracing::info!(page, extracted = records.len(), "page done");
        (records, seq)
    }
}

// ── Watch-folder integration ──────────────────────────────────────────────────

/// Spawn a notify watcher on `watch_dir` that sends new file paths to `tx`.
/// The returned watcher must be kept alive for watching to continue.
pub fn spawn_intake_watcher(
    watch_dir: &Path,
    tx: mpsc::Sender<PathBuf>,
) -> notify::Result<impl notify::Watcher> {
    use notify::{EventKind, RecursiveMode, Watcher};

    let mut watcher = notify::recommended_watcher(move |event: notify::Result<notify::Event>| {
        if let Ok(ev) = event {
            if matches!(ev.kind, EventKind::Create(_)) {
                for path in ev.paths {
                    let _ = tx.try_send(path);
                }
            }
        }
    })?;

    watcher.watch(watch_dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
