//! Directory scanning and sidecar pairing.
//!
//! Walks a folder tree, picks out image files, and pairs each one with its
//! sidecar annotation:
//!
//! ```text
//! photos/
//! ├── cats/
//! │   ├── 001.jpg          → entry, annotation read from 001.txt
//! │   ├── 001.txt
//! │   └── 002.PNG          → entry, 002.txt created empty
//! ├── notes.md             (ignored: not an image)
//! └── dog.gif              → entry, dog.txt created empty
//! ```
//!
//! ## Side effects
//!
//! Scanning writes: any image without a sidecar gets an empty one, so every
//! returned entry points at a file that exists.
//!
//! ## Partial results
//!
//! Only a missing root is fatal. Anything that goes wrong for a single file
//! (permission denied, a file vanishing mid-walk, a strict-mode decode
//! failure) is recorded in [`ScanReport::skipped`] and the walk continues.
//!
//! ## Symlinks
//!
//! A symlink to an image file is scanned like the file itself. Symlinked
//! directories are listed but not descended into.
//!
//! ## Ordering
//!
//! Entries come out in filesystem enumeration order. Nothing sorts them,
//! and callers must not rely on the order being stable.

use crate::annotation::{self, AnnotationError};
use crate::config::AppConfig;
use crate::paths;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Folder does not exist: {0}")]
    NotFound(PathBuf),
}

/// One image paired with its annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageEntry {
    /// Image path, forward slashes.
    pub image_path: String,
    /// Sidecar path: `image_path` with the extension replaced by `.txt`.
    pub txt_path: String,
    /// Full sidecar content; empty for a freshly created sidecar.
    pub annotation: String,
}

/// A file the scan had to leave out, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Outcome of a scan: everything that paired cleanly, plus what didn't.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub entries: Vec<ImageEntry>,
    pub skipped: Vec<SkippedFile>,
}

/// Scan `root` recursively for images and pair each with its sidecar.
pub fn scan(root: &Path, config: &AppConfig) -> Result<ScanReport, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotFound(root.to_path_buf()));
    }

    let mut report = ScanReport::default();

    for item in WalkDir::new(root) {
        let entry = match item {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(paths::normalize_path)
                    .unwrap_or_else(|| paths::normalize_path(root));
                skip(&mut report, path, err.to_string());
                continue;
            }
        };

        // Symlinks to files count; symlinked directories are not descended.
        if !entry.path().is_file() || !paths::is_allowed(entry.path(), &config.files.extensions) {
            continue;
        }

        match pair_image(entry.path(), config) {
            Ok(image) => report.entries.push(image),
            Err(err) => skip(&mut report, paths::normalize_path(entry.path()), err.to_string()),
        }
    }

    tracing::debug!(
        root = %root.display(),
        entries = report.entries.len(),
        skipped = report.skipped.len(),
        "scan finished"
    );

    Ok(report)
}

fn skip(report: &mut ScanReport, path: String, reason: String) {
    tracing::warn!(path = %path, reason = %reason, "skipping file during scan");
    report.skipped.push(SkippedFile { path, reason });
}

/// Ensure the sidecar exists, read it, and build the entry.
fn pair_image(image_path: &Path, config: &AppConfig) -> Result<ImageEntry, AnnotationError> {
    let txt_path = paths::sidecar_path(image_path);
    annotation::ensure_annotation(&txt_path)?;
    let annotation = annotation::read_annotation(&txt_path, config.files.decode_errors)?;

    Ok(ImageEntry {
        image_path: paths::normalize_path(image_path),
        txt_path: paths::normalize_path(&txt_path),
        annotation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DecodeErrors, Profile};
    use std::fs;
    use tempfile::TempDir;

    fn config() -> AppConfig {
        Profile::Development.defaults()
    }

    /// Sort by image path so assertions don't depend on walk order.
    fn sorted(mut entries: Vec<ImageEntry>) -> Vec<ImageEntry> {
        entries.sort_by(|a, b| a.image_path.cmp(&b.image_path));
        entries
    }

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"not decoded during scan").unwrap();
    }

    #[test]
    fn missing_root_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = scan(&tmp.path().join("nope"), &config());
        assert!(matches!(result, Err(ScanError::NotFound(_))));
    }

    #[test]
    fn root_that_is_a_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.jpg");
        touch(&file);
        assert!(matches!(scan(&file, &config()), Err(ScanError::NotFound(_))));
    }

    #[test]
    fn empty_directory_yields_no_entries() {
        let tmp = TempDir::new().unwrap();
        let report = scan(tmp.path(), &config()).unwrap();
        assert!(report.entries.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn creates_missing_sidecar_with_empty_annotation() {
        let tmp = TempDir::new().unwrap();
        let img = tmp.path().join("cat.jpg");
        touch(&img);

        let report = scan(tmp.path(), &config()).unwrap();

        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].annotation, "");
        let txt = tmp.path().join("cat.txt");
        assert!(txt.exists());
        assert_eq!(fs::read_to_string(txt).unwrap(), "");
    }

    #[test]
    fn reads_existing_sidecar_verbatim() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("cat.png"));
        fs::write(tmp.path().join("cat.txt"), "tabby, indoors\n").unwrap();

        let report = scan(tmp.path(), &config()).unwrap();
        assert_eq!(report.entries[0].annotation, "tabby, indoors\n");
    }

    #[test]
    fn txt_path_is_image_path_with_txt_extension() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("sub/dog.JPEG"));

        let report = scan(tmp.path(), &config()).unwrap();
        let entry = &report.entries[0];
        assert!(entry.image_path.ends_with("sub/dog.JPEG"));
        assert_eq!(
            entry.txt_path,
            format!("{}txt", entry.image_path.strip_suffix("JPEG").unwrap())
        );
    }

    #[test]
    fn walks_nested_directories_and_ignores_non_images() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.jpg"));
        touch(&tmp.path().join("one/b.gif"));
        touch(&tmp.path().join("one/two/three/c.bmp"));
        touch(&tmp.path().join("one/notes.md"));
        touch(&tmp.path().join("one/clip.webp"));

        let report = scan(tmp.path(), &config()).unwrap();
        let names: Vec<String> = sorted(report.entries)
            .into_iter()
            .map(|e| e.image_path.rsplit('/').next().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.gif", "c.bmp"]);

        // No sidecar for ignored files
        assert!(!tmp.path().join("one/notes.txt").exists());
        assert!(!tmp.path().join("one/clip.txt").exists());
    }

    #[test]
    fn sidecar_text_files_are_not_entries() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.jpg"));
        fs::write(tmp.path().join("a.txt"), "x").unwrap();

        let report = scan(tmp.path(), &config()).unwrap();
        assert_eq!(report.entries.len(), 1);
    }

    #[test]
    fn paths_use_forward_slashes() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("deep/er/x.png"));

        let report = scan(tmp.path(), &config()).unwrap();
        assert!(!report.entries[0].image_path.contains('\\'));
        assert!(!report.entries[0].txt_path.contains('\\'));
    }

    #[test]
    fn invalid_utf8_is_replaced_by_default() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.jpg"));
        fs::write(tmp.path().join("a.txt"), b"caf\xe9").unwrap();

        let report = scan(tmp.path(), &config()).unwrap();
        assert_eq!(report.entries[0].annotation, "caf\u{FFFD}");
    }

    #[test]
    fn strict_decode_failure_skips_only_that_file() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("bad.jpg"));
        fs::write(tmp.path().join("bad.txt"), b"\xff\xff").unwrap();
        touch(&tmp.path().join("good.jpg"));

        let mut config = config();
        config.files.decode_errors = DecodeErrors::Strict;

        let report = scan(tmp.path(), &config).unwrap();
        assert_eq!(report.entries.len(), 1);
        assert!(report.entries[0].image_path.ends_with("good.jpg"));
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].path.ends_with("bad.jpg"));
    }

    #[test]
    fn unwritable_sidecar_location_is_skipped() {
        // A directory squatting on the sidecar name makes the create fail
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("blocked.jpg"));
        fs::create_dir(tmp.path().join("blocked.txt")).unwrap();
        touch(&tmp.path().join("fine.png"));

        let report = scan(tmp.path(), &config()).unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.skipped.len(), 1);
    }

    #[test]
    fn rescan_after_edit_returns_new_text() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.jpg"));
        let first = scan(tmp.path(), &config()).unwrap();

        annotation::write_annotation(Path::new(&first.entries[0].txt_path), "edited").unwrap();

        let second = scan(tmp.path(), &config()).unwrap();
        assert_eq!(second.entries[0].annotation, "edited");
    }

    #[test]
    fn custom_extension_set() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.jpg"));
        touch(&tmp.path().join("b.webp"));

        let mut config = config();
        config.files.extensions = vec![".webp".to_string()];

        let report = scan(tmp.path(), &config).unwrap();
        assert_eq!(report.entries.len(), 1);
        assert!(report.entries[0].image_path.ends_with("b.webp"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_image_is_scanned() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("root");
        let real = tmp.path().join("store").join("real.jpg");
        touch(&real);
        touch(&root.join("plain.jpg"));
        std::os::unix::fs::symlink(&real, root.join("link.jpg")).unwrap();

        let report = scan(&root, &config()).unwrap();
        let names: Vec<_> = sorted(report.entries)
            .into_iter()
            .map(|e| e.image_path.rsplit('/').next().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["link.jpg", "plain.jpg"]);
        assert!(root.join("link.txt").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_is_not_descended() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("root");
        touch(&tmp.path().join("elsewhere").join("hidden.jpg"));
        fs::create_dir_all(&root).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("elsewhere"), root.join("linked")).unwrap();

        let report = scan(&root, &config()).unwrap();
        assert!(report.entries.is_empty());
    }
}
