// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Backup of the input directory before an in-place pass.

use std::path::Path;

use contourlet_core::BackupOutcome;
use contourlet_core::error::{ContourletError, Result};
use tracing::{info, instrument, warn};

/// Copy the tree under `source` to `target`.
///
/// If `target` already exists nothing is copied and the existing backup is
/// left as it is.
#[instrument(skip_all, fields(source = %source.display(), target = %target.display()))]
pub fn backup_directory(source: &Path, target: &Path) -> Result<BackupOutcome> {
    if target.exists() {
        warn!("backup already exists; leaving it untouched");
        return Ok(BackupOutcome::AlreadyExists);
    }
    if !source.is_dir() {
        return Err(ContourletError::MissingInput(source.to_path_buf()));
    }

    std::fs::create_dir_all(target)?;
    let files = copy_tree(source, target, target)?;
    info!(files, "backup created");
    Ok(BackupOutcome::Created { files })
}

/// Recursive copy returning the number of files written. `skip` is never
/// descended into, so a target nested inside the source is not copied into
/// itself.
fn copy_tree(source: &Path, target: &Path, skip: &Path) -> Result<usize> {
    let mut files = 0;
    for entry in std::fs::read_dir(source)? {
        let entry = entry?;
        let path = entry.path();
        if path == skip {
            continue;
        }
        let dest = target.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            std::fs::create_dir_all(&dest)?;
            files += copy_tree(&path, &dest, skip)?;
        } else {
            std::fs::copy(&path, &dest)?;
            files += 1;
        }
    }
    Ok(files)
}
