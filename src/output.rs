//! CLI output formatting for the `scan` command.
//!
//! # Output Format
//!
//! ```text
//! Images (3)
//! 001 cats/001.jpg
//!     Annotation: a tabby asleep on a windowsill
//! 002 cats/002.png
//!     Annotation: (empty)
//! 003 dog.gif
//!     Annotation: (empty)
//!
//! Skipped (1)
//!     locked/003.jpg: Failed to read annotation locked/003.txt: Permission denied
//! ```
//!
//! Image paths are shown relative to the scanned root and sorted, so the
//! listing is stable even though the walk order is not. Only the first line
//! of each annotation is shown, truncated.
//!
//! [`format_scan_output`] returns lines and does no I/O; [`print_scan_output`]
//! writes them to stdout.

use crate::paths;
use crate::scan::ScanReport;
use std::path::Path;

const ANNOTATION_PREVIEW: usize = 60;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// `path` relative to `root` when it lies under it, else unchanged.
fn display_path(path: &str, root: &str) -> String {
    let root = root.trim_end_matches('/');
    match path.strip_prefix(root).and_then(|rest| rest.strip_prefix('/')) {
        Some(rest) if !root.is_empty() => rest.to_string(),
        _ => path.to_string(),
    }
}

fn annotation_preview(annotation: &str) -> String {
    let first_line = annotation.lines().next().unwrap_or("").trim();
    if first_line.is_empty() {
        "(empty)".to_string()
    } else {
        truncate_desc(first_line, ANNOTATION_PREVIEW)
    }
}

/// Format a scan report for the terminal.
pub fn format_scan_output(report: &ScanReport, root: &Path) -> Vec<String> {
    let root = paths::normalize_path(root);
    let mut lines = Vec::new();

    let mut entries: Vec<_> = report
        .entries
        .iter()
        .map(|e| (display_path(&e.image_path, &root), &e.annotation))
        .collect();
    entries.sort();

    lines.push(format!("Images ({})", entries.len()));
    for (i, (path, annotation)) in entries.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), path));
        lines.push(format!("    Annotation: {}", annotation_preview(annotation)));
    }

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push(format!("Skipped ({})", report.skipped.len()));
        for skipped in &report.skipped {
            lines.push(format!(
                "    {}: {}",
                display_path(&skipped.path, &root),
                skipped.reason
            ));
        }
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(report: &ScanReport, root: &Path) {
    for line in format_scan_output(report, root) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{ImageEntry, SkippedFile};

    fn entry(image: &str, annotation: &str) -> ImageEntry {
        ImageEntry {
            image_path: image.to_string(),
            txt_path: image.rsplit_once('.').unwrap().0.to_string() + ".txt",
            annotation: annotation.to_string(),
        }
    }

    #[test]
    fn format_index_padding() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn truncate_desc_short_and_exact() {
        assert_eq!(truncate_desc("Short text", 40), "Short text");
        let text = "a".repeat(40);
        assert_eq!(truncate_desc(&text, 40), text);
    }

    #[test]
    fn truncate_desc_long() {
        let text = "a".repeat(50);
        assert_eq!(truncate_desc(&text, 40), format!("{}...", "a".repeat(40)));
    }

    #[test]
    fn truncate_desc_multibyte() {
        assert_eq!(truncate_desc("猫猫猫猫", 2), "猫猫...");
    }

    #[test]
    fn display_path_strips_root() {
        assert_eq!(display_path("/data/photos/a.jpg", "/data/photos"), "a.jpg");
        assert_eq!(display_path("/data/photos/a.jpg", "/data/photos/"), "a.jpg");
        assert_eq!(display_path("/data/photos2/a.jpg", "/data/photos"), "/data/photos2/a.jpg");
        assert_eq!(display_path("/elsewhere/a.jpg", "/data"), "/elsewhere/a.jpg");
    }

    #[test]
    fn annotation_preview_first_line() {
        assert_eq!(annotation_preview(""), "(empty)");
        assert_eq!(annotation_preview("  \n"), "(empty)");
        assert_eq!(annotation_preview("a cat\nsecond line"), "a cat");
    }

    #[test]
    fn scan_output_sorted_with_annotations() {
        let report = ScanReport {
            entries: vec![
                entry("/root/b/2.png", ""),
                entry("/root/a.jpg", "a red bicycle"),
            ],
            skipped: vec![],
        };
        let lines = format_scan_output(&report, Path::new("/root"));
        assert_eq!(
            lines,
            vec![
                "Images (2)",
                "001 a.jpg",
                "    Annotation: a red bicycle",
                "002 b/2.png",
                "    Annotation: (empty)",
            ]
        );
    }

    #[test]
    fn scan_output_lists_skipped_files() {
        let report = ScanReport {
            entries: vec![],
            skipped: vec![SkippedFile {
                path: "/root/bad.jpg".into(),
                reason: "invalid UTF-8".into(),
            }],
        };
        let lines = format_scan_output(&report, Path::new("/root"));
        assert_eq!(
            lines,
            vec!["Images (0)", "", "Skipped (1)", "    bad.jpg: invalid UTF-8"]
        );
    }
}
