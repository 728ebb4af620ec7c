//! Path conventions shared by the scanner and the HTTP layer.
//!
//! - [`normalize`] renders any path with forward slashes, so the browser
//!   sees one separator regardless of host OS.
//! - [`is_allowed`] and [`mime_type`] classify files by extension.
//! - [`sidecar_path`] pairs an image with its `.txt` annotation.
//! - [`resolve_request_path`] turns a path taken from a URL into the file
//!   the server should open.

use std::path::{Path, PathBuf};

/// Replace every backslash with a forward slash.
pub fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

/// [`normalize`] for a [`Path`].
pub fn normalize_path(path: &Path) -> String {
    normalize(&path.to_string_lossy())
}

/// Lowercased extension including the leading dot, e.g. `".jpg"`.
///
/// Returns `None` for names without an extension (`README`, `.hidden`).
fn dotted_extension(filename: &Path) -> Option<String> {
    filename
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
}

/// Whether `filename` has one of the configured image extensions.
///
/// `extensions` carry their leading dot (`".png"`); comparison is
/// case-insensitive on both sides.
pub fn is_allowed(filename: &Path, extensions: &[String]) -> bool {
    match dotted_extension(filename) {
        Some(ext) => extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(&ext)),
        None => false,
    }
}

/// MIME type for an image file, `image/jpeg` when the extension is unknown.
pub fn mime_type(filename: &Path) -> &'static str {
    match dotted_extension(filename).as_deref() {
        Some(".png") => "image/png",
        Some(".gif") => "image/gif",
        Some(".bmp") => "image/bmp",
        Some(".jpg") | Some(".jpeg") => "image/jpeg",
        _ => "image/jpeg",
    }
}

/// Sidecar annotation for an image: same stem, `.txt` extension.
///
/// `photos/cat.PNG` → `photos/cat.txt`
pub fn sidecar_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("txt")
}

/// Resolve a path taken from a request URL.
///
/// Absolute paths are used as given. Anything else is joined onto `cwd`,
/// the server's working directory. No sandboxing is applied; the server is
/// meant for a trusted, local, single-user setup.
pub fn resolve_request_path(raw: &str, cwd: &Path) -> PathBuf {
    let path = Path::new(raw);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
