//! Directory batch processing.
//!
//! Runs the outline engine over every `*.pdf` in a directory with a rayon
//! worker pool. Files are independent; an unreadable file yields a
//! fallback outline (filename title, no entries) instead of aborting the
//! run.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use crate::classify::title_from_filename;
use crate::config::ExtractOptions;
use crate::engine::OutlineEngine;
use crate::error::{Error, Result};
use crate::extract::LopdfSource;
use crate::model::{DocumentOutline, OutlineMetadata};

/// Result of processing one file in a batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Source file path
    pub path: PathBuf,
    /// The extracted outline, or the fallback when `recovered` is set
    pub outline: DocumentOutline,
    /// True when the file was unreadable and the outline is a fallback
    pub recovered: bool,
}

/// All outcomes of one batch run, in input order.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
    pub elapsed_ms: f64,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of files that produced a fallback outline.
    pub fn recovered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.recovered).count()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// List the PDF files in `dir`, sorted by path.
///
/// Matching is by `.pdf` extension, case-insensitive. Subdirectories are
/// not descended into.
pub fn pdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Process one file, never failing: unreadable input becomes a fallback
/// outline with the cleaned filename as title and no entries.
pub fn process_file(path: &Path, engine: &OutlineEngine) -> BatchOutcome {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document.pdf");
    let extracted = fs::read(path)
        .map_err(Error::from)
        .and_then(|data| engine.extract(&LopdfSource::new(&data), filename));
    match extracted {
        Ok(outline) => BatchOutcome {
            path: path.to_path_buf(),
            outline,
            recovered: false,
        },
        Err(err) => {
            log::warn!("{}: {}; using fallback outline", path.display(), err);
            BatchOutcome {
                path: path.to_path_buf(),
                outline: fallback_outline(filename),
                recovered: true,
            }
        }
    }
}

/// Process every PDF in `dir` in parallel.
pub fn process_directory(dir: &Path, options: &ExtractOptions) -> Result<BatchReport> {
    process_directory_with(dir, options, |_| {})
}

/// Like [`process_directory`], invoking `on_done` as each file finishes.
///
/// The callback runs on worker threads, in completion order.
pub fn process_directory_with<F>(
    dir: &Path,
    options: &ExtractOptions,
    on_done: F,
) -> Result<BatchReport>
where
    F: Fn(&BatchOutcome) + Send + Sync,
{
    let started = Instant::now();
    let files = pdf_files(dir)?;
    log::debug!("batch: {} pdf files under {}", files.len(), dir.display());

    let engine = OutlineEngine::new(options.clone());
    let mut outcomes: Vec<(usize, BatchOutcome)> = files
        .par_iter()
        .enumerate()
        .map(|(idx, path)| {
            let outcome = process_file(path, &engine);
            on_done(&outcome);
            (idx, outcome)
        })
        .collect();
    outcomes.sort_by_key(|(idx, _)| *idx);

    Ok(BatchReport {
        outcomes: outcomes.into_iter().map(|(_, o)| o).collect(),
        elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
    })
}

fn fallback_outline(filename: &str) -> DocumentOutline {
    DocumentOutline {
        title: title_from_filename(filename),
        outline: Vec::new(),
        metadata: OutlineMetadata {
            total_pages: 0,
            processing_time_ms: 0.0,
            truncated: false,
            font_metrics: BTreeMap::new(),
        },
    }
}
