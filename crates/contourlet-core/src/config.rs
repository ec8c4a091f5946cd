// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transform and batch configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ContourletError, Result};

/// Upper bound on pyramid depth. Each level halves the image, so anything
/// beyond this is truncated by the builder anyway.
pub const MAX_LEVELS: usize = 16;

/// Upper bound on the number of orientations in the filter bank.
pub const MAX_DIRECTIONS: usize = 180;

/// Parameters of the enhancement transform.
///
/// Fixed at construction of a transform and applied uniformly to every image
/// processed through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Pyramid depth, level 0 included.
    pub num_levels: usize,
    /// Number of orientations in the directional filter bank.
    pub num_directions: usize,
}

impl TransformConfig {
    pub fn new(num_levels: usize, num_directions: usize) -> Result<Self> {
        let config = Self {
            num_levels,
            num_directions,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.num_levels == 0 || self.num_levels > MAX_LEVELS {
            return Err(ContourletError::InvalidConfig(format!(
                "num_levels must be in 1..={MAX_LEVELS}, got {}",
                self.num_levels
            )));
        }
        if self.num_directions == 0 || self.num_directions > MAX_DIRECTIONS {
            return Err(ContourletError::InvalidConfig(format!(
                "num_directions must be in 1..={MAX_DIRECTIONS}, got {}",
                self.num_directions
            )));
        }
        Ok(())
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            num_levels: 2,
            num_directions: 8,
        }
    }
}

/// Settings for one directory pass of the batch driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Directory scanned for `.jpg` / `.png` files.
    pub input_dir: PathBuf,
    /// Where enhanced images are written when originals are kept.
    /// Defaults to the sibling `<input>_contourlet`.
    pub output_dir: Option<PathBuf>,
    /// Overwrite the input files in place.
    pub replace_originals: bool,
    /// Copy the input directory before processing.
    pub backup: bool,
    /// Backup target. Defaults to the sibling `<input>_original`.
    pub backup_dir: Option<PathBuf>,
    /// Worker threads: 1 is sequential, 0 uses every available core.
    pub jobs: usize,
    /// Transform parameters.
    pub transform: TransformConfig,
}

impl BatchConfig {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            ..Self::default()
        }
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Directory the enhanced images end up in.
    pub fn resolved_output_dir(&self) -> PathBuf {
        if self.replace_originals {
            return self.input_dir.clone();
        }
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => sibling_dir(&self.input_dir, "contourlet"),
        }
    }

    pub fn resolved_backup_dir(&self) -> PathBuf {
        match &self.backup_dir {
            Some(dir) => dir.clone(),
            None => sibling_dir(&self.input_dir, "original"),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.transform.validate()
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("dataset/images"),
            output_dir: None,
            replace_originals: true,
            backup: false,
            backup_dir: None,
            jobs: 1,
            transform: TransformConfig::default(),
        }
    }
}

/// `dataset/images` + `"original"` -> `dataset/images_original`.
///
/// Paths without a final name (`.`, `..`) are resolved on disk first so the
/// sibling lands next to the directory rather than inside it.
fn sibling_dir(dir: &Path, suffix: &str) -> PathBuf {
    let resolved = match dir.file_name() {
        Some(_) => dir.to_path_buf(),
        None => std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf()),
    };
    match resolved.file_name() {
        Some(name) => resolved.with_file_name(format!("{}_{suffix}", name.to_string_lossy())),
        None => resolved.join(format!("images_{suffix}")),
    }
}
