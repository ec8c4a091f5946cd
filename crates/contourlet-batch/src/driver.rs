// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Directory pass: apply the transform to every discovered image, write the
// results, and accumulate per-file statistics.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use contourlet_core::error::{ContourletError, Result};
use contourlet_core::{BatchConfig, BatchSummary, EnhanceStatus, PassthroughReason};
use contourlet_filter::{ContourletTransform, enhance_file};
use rayon::prelude::*;
use tracing::{error, info, instrument, warn};

use crate::backup::backup_directory;
use crate::discover::discover_images;

/// Files between progress log lines.
const PROGRESS_INTERVAL: usize = 10;

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Enhanced,
    /// Written unmodified because the transform degraded.
    Passthrough(PassthroughReason),
    /// Not written. Holds the error message.
    Failed(String),
}

/// Runs one directory pass with a fixed configuration.
pub struct BatchDriver {
    config: BatchConfig,
    transform: ContourletTransform,
}

impl BatchDriver {
    pub fn new(config: BatchConfig) -> Result<Self> {
        config.validate()?;
        let transform = ContourletTransform::new(config.transform)?;
        Ok(Self { config, transform })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Process every image in the input directory.
    ///
    /// Per-file errors are counted and reported in the summary. The pass is
    /// refused before any file is touched when the input directory is
    /// missing, when a requested backup cannot be written
    /// ([`ContourletError::BackupFailed`]), or when the output directory
    /// cannot be created.
    #[instrument(skip(self), fields(input = %self.config.input_dir.display()))]
    pub fn run(&self) -> Result<BatchSummary> {
        let started_at = Utc::now();
        let input_dir = &self.config.input_dir;
        if !input_dir.is_dir() {
            return Err(ContourletError::MissingInput(input_dir.clone()));
        }

        let backup = if self.config.backup {
            let target = self.config.resolved_backup_dir();
            let outcome = backup_directory(input_dir, &target).map_err(|e| {
                error!(backup_dir = %target.display(), error = %e, "Backup failed; refusing to process");
                ContourletError::BackupFailed {
                    target: target.clone(),
                    reason: e.to_string(),
                }
            })?;
            Some(outcome)
        } else {
            None
        };

        let files = discover_images(input_dir)?;
        let output_dir = self.config.resolved_output_dir();
        std::fs::create_dir_all(&output_dir)?;

        info!(
            total = files.len(),
            output = %output_dir.display(),
            jobs = self.config.jobs,
            "Batch started"
        );

        let outcomes = self.process_all(&files, &output_dir)?;

        let mut summary = BatchSummary {
            total: files.len(),
            processed: 0,
            failed: 0,
            failed_files: Vec::new(),
            passthrough_files: Vec::new(),
            backup,
            started_at,
            finished_at: started_at,
        };
        for (path, outcome) in files.iter().zip(outcomes) {
            let name = file_name(path);
            match outcome {
                FileOutcome::Enhanced => summary.processed += 1,
                FileOutcome::Passthrough(_) => {
                    summary.processed += 1;
                    summary.passthrough_files.push(name);
                }
                FileOutcome::Failed(_) => {
                    summary.failed += 1;
                    summary.failed_files.push(name);
                }
            }
        }
        summary.finished_at = Utc::now();

        info!(
            total = summary.total,
            processed = summary.processed,
            failed = summary.failed,
            passthrough = summary.passthrough_files.len(),
            "Batch finished"
        );
        Ok(summary)
    }

    /// Outcomes in the same order as `files`, regardless of worker count.
    fn process_all(&self, files: &[PathBuf], output_dir: &Path) -> Result<Vec<FileOutcome>> {
        let done = AtomicUsize::new(0);
        let total = files.len();
        let process = |path: &PathBuf| {
            let outcome = self.process_file(path, output_dir);
            let n = done.fetch_add(1, Ordering::Relaxed) + 1;
            if n % PROGRESS_INTERVAL == 0 {
                info!(done = n, total, "Batch progress");
            }
            outcome
        };

        if self.config.jobs == 1 {
            return Ok(files.iter().map(process).collect());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs)
            .build()
            .map_err(|e| ContourletError::WorkerPool(e.to_string()))?;
        Ok(pool.install(|| files.par_iter().map(process).collect()))
    }

    fn process_file(&self, path: &Path, output_dir: &Path) -> FileOutcome {
        let Some(name) = path.file_name() else {
            return FileOutcome::Failed("path has no file name".into());
        };
        let output = output_dir.join(name);
        match enhance_file(&self.transform, path, Some(&output)) {
            Ok(enhancement) => match enhancement.status {
                EnhanceStatus::Enhanced(_) => FileOutcome::Enhanced,
                EnhanceStatus::Passthrough(reason) => FileOutcome::Passthrough(reason),
            },
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Failed to process image");
                FileOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Write the summary as pretty-printed JSON.
pub fn write_report(summary: &BatchSummary, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path.as_ref(), json)?;
    info!(path = %path.as_ref().display(), "Report written");
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
