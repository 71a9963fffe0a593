use anyhow::{Context, Result};
use jobshot_core::{Config, JobRecord, ListingId, OcrConfig, Sequence};
use jobshot_export::{export_csv, RunSummary};
use jobshot_ocr::capture::is_image_path;
use jobshot_ocr::{spawn_intake_watcher, DirectoryCapture, ListingPipeline, OcrBackend, RecordAssembler};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

/// Grace period between a file appearing and reading it, so the writer can finish.
const WRITE_SETTLE: Duration = Duration::from_millis(250);

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => Config::load(p).with_context(|| format!("loading config {}", p.display())),
        None => Ok(Config::default()),
    }
}

// ── scan ──────────────────────────────────────────────────────────────────────

pub async fn scan(config: &Config, dir: &Path, out: Option<PathBuf>) -> Result<()> {
    let pages = discover_pages(dir).with_context(|| format!("reading {}", dir.display()))?;
    for (_, page_dir) in &pages {
        ensure_distinct(page_dir, &config.output.screenshots_dir)?;
    }
    let pipeline = build_pipeline(config)?;

    let mut seq = Sequence::start();
    let mut records = Vec::new();
    for (page, page_dir) in pages {
        let mut capture = DirectoryCapture::open(&page_dir)
            .with_context(|| format!("opening page {}", page_dir.display()))?;
        let (page_records, next) = pipeline.process_page(&mut capture, page, seq).await;
        records.extend(page_records);
        seq = next;
    }

    finish(config, out, &records)
}

/// Results pages under `dir`: subdirectories named `page-N`, `page_N` or `N`,
/// in page order. A directory without any is a single page 1.
pub fn discover_pages(dir: &Path) -> std::io::Result<Vec<(u32, PathBuf)>> {
    let mut pages = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(n) = path.file_name().and_then(|n| n.to_str()).and_then(page_number) {
            pages.push((n, path));
        }
    }

    if pages.is_empty() {
        return Ok(vec![(1, dir.to_path_buf())]);
    }
    pages.sort();
    Ok(pages)
}

fn page_number(name: &str) -> Option<u32> {
    let digits = name
        .strip_prefix("page-")
        .or_else(|| name.strip_prefix("page_"))
        .unwrap_or(name);
    digits.parse::<u32>().ok().filter(|&n| n > 0)
}

// ── watch ─────────────────────────────────────────────────────────────────────

pub async fn watch(config: &Config, dir: &Path, page: u32, out: Option<PathBuf>) -> Result<()> {
    ensure_distinct(dir, &config.output.screenshots_dir)?;
    let pipeline = build_pipeline(config)?;

    // The channel bridges the notify watcher thread and the async loop.
    let (tx, mut rx) = mpsc::channel::<PathBuf>(64);
    let _watcher = spawn_intake_watcher(dir, tx)
        .with_context(|| format!("watching {}", dir.display()))?;
    tracing::info!(dir = %dir.display(), page, "watching for screenshots, Ctrl-C to finish");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut seq = Sequence::start();
    let mut records = Vec::new();
    loop {
        tokio::select! {
            received = rx.recv() => {
                let Some(path) = received else { break };
                if !is_image_path(&path) {
                    continue;
                }
                tokio::time::sleep(WRITE_SETTLE).await;
                match pipeline.process_file(&path, page, seq).await {
                    Ok((record, next)) => {
                        records.push(record);
                        seq = next;
                    }
                    Err(e) => tracing::warn!(path = %path.display(), error = %e, "screenshot skipped"),
                }
            }
            _ = &mut ctrl_c => {
                tracing::info!("stopping watch");
                break;
            }
        }
    }

    finish(config, out, &records)
}

// ── parse ─────────────────────────────────────────────────────────────────────

pub fn parse(config: &Config, file: Option<&Path>) -> Result<()> {
    let text = match file {
        Some(p) => std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            buf
        }
    };

    let record = parse_text(config, &text);
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn parse_text(config: &Config, text: &str) -> JobRecord {
    let id = ListingId { index: 1, page: 1, screenshot: PathBuf::new() };
    RecordAssembler::new(config.pay.clone()).assemble(text, id)
}

// ── Shared ────────────────────────────────────────────────────────────────────

fn build_pipeline(config: &Config) -> Result<ListingPipeline<Box<dyn OcrBackend>>> {
    let recognizer = build_recognizer(&config.ocr)?;
    Ok(ListingPipeline::new(
        recognizer,
        config.pay.clone(),
        config.output.screenshots_dir.clone(),
    ))
}

#[cfg(feature = "tesseract")]
fn build_recognizer(ocr: &OcrConfig) -> Result<Box<dyn OcrBackend>> {
    use jobshot_ocr::recognizer::tesseract_backend::TesseractRecognizer;

    let data_path = ocr.data_path.as_ref().map(|p| p.display().to_string());
    Ok(Box::new(TesseractRecognizer::new(data_path, &ocr.language)))
}

#[cfg(not(feature = "tesseract"))]
fn build_recognizer(_ocr: &OcrConfig) -> Result<Box<dyn OcrBackend>> {
    Err(jobshot_ocr::OcrError::NotAvailable.into())
}

/// Stored captures are named `job_NNNN.png`; writing them into an input
/// directory would overwrite the screenshots being read.
fn ensure_distinct(input: &Path, screenshots_dir: &Path) -> Result<()> {
    if resolve(input) == resolve(screenshots_dir) {
        anyhow::bail!(
            "input directory {} is also output.screenshots_dir; choose a different screenshots_dir",
            input.display()
        );
    }
    Ok(())
}

/// Canonical path when it exists, otherwise the absolute, lexically
/// normalized path.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(p) = path.canonicalize() {
        return p;
    }
    let absolute = std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf());
    let mut out = PathBuf::new();
    for part in absolute.components() {
        match part {
            std::path::Component::CurDir => {}
            std::path::Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

fn finish(config: &Config, out: Option<PathBuf>, records: &[JobRecord]) -> Result<()> {
    let path = out
        .or_else(|| config.output.csv.clone())
        .unwrap_or_else(default_csv_name);
    export_csv(&path, records).with_context(|| format!("writing {}", path.display()))?;

    let summary = RunSummary::from_records(records);
    tracing::info!(
        total = summary.total,
        with_pay = summary.with_pay,
        with_employment = summary.with_employment,
        "run complete"
    );
    println!("{summary}");
    println!("Saved {}", path.display());
    Ok(())
}

fn default_csv_name() -> PathBuf {
    PathBuf::from(format!("jobs-{}.csv", chrono::Local::now().format("%Y%m%d-%H%M%S")))
}
