// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// contourlet-batch: directory batch driver for the contourlet transform.
//
// Discovers images in a directory, optionally backs the directory up, runs
// the transform over every file (sequentially or on a rayon pool), and
// summarises the pass.

pub mod backup;
pub mod discover;
pub mod driver;

pub use backup::backup_directory;
pub use discover::{IMAGE_EXTENSIONS, discover_images, is_image_file};
pub use driver::{BatchDriver, FileOutcome, write_report};
