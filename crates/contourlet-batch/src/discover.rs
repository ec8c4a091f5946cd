// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image discovery: the `.jpg` / `.png` files directly inside a directory.

use std::path::{Path, PathBuf};

use contourlet_core::error::{ContourletError, Result};
use tracing::debug;

/// Extensions picked up by the batch driver, matched in any letter case.
pub const IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "png"];

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Regular image files directly inside `dir`, sorted by file name.
/// Subdirectories are not searched.
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ContourletError::MissingInput(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image_file(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    debug!(dir = %dir.display(), count = files.len(), "images discovered");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_match_ignores_case() {
        for name in ["a.jpg", "b.JPG", "c.png", "d.PNG", "e.Png"] {
            assert!(is_image_file(Path::new(name)), "{name}");
        }
        for name in ["f.jpeg", "g.txt", "h", "png"] {
            assert!(!is_image_file(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn only_top_level_images_sorted() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let dir = tmp.path();
        for name in ["b.png", "a.JPG", "notes.txt"] {
            std::fs::write(dir.join(name), b"x").expect("write");
        }
        std::fs::create_dir(dir.join("nested.png")).expect("mkdir");
        std::fs::create_dir(dir.join("sub")).expect("mkdir");
        std::fs::write(dir.join("sub").join("c.png"), b"x").expect("write");

        let files = discover_images(dir).expect("dir exists");
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["a.JPG", "b.png"]);
    }

    #[test]
    fn missing_dir_is_reported() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let missing = tmp.path().join("nope");
        assert!(matches!(
            discover_images(&missing),
            Err(ContourletError::MissingInput(path)) if path == missing
        ));
    }
}
