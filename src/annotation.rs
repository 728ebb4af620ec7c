//! Sidecar annotation files.
//!
//! Every image can have a plain-text sidecar with the same stem:
//! `cats/001.jpg` pairs with `cats/001.txt`. The sidecar holds free-form
//! caption text and is read and written whole. Content is never trimmed;
//! what the user typed is what is stored.
//!
//! Sidecars are UTF-8. How invalid byte sequences are handled on read is
//! set by [`DecodeErrors`]:
//!
//! - `Replace` substitutes U+FFFD, so a corrupt sidecar still loads.
//! - `Strict` fails the read with [`AnnotationError::InvalidUtf8`].

use crate::config::DecodeErrors;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is not valid UTF-8: {source}")]
    InvalidUtf8 {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },
}

/// Read the full text of an annotation file.
pub fn read_annotation(path: &Path, policy: DecodeErrors) -> Result<String, AnnotationError> {
    let bytes = fs::read(path).map_err(|source| AnnotationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    match policy {
        DecodeErrors::Replace => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        DecodeErrors::Strict => {
            String::from_utf8(bytes).map_err(|source| AnnotationError::InvalidUtf8 {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Replace the full content of an annotation file, creating it if needed.
pub fn write_annotation(path: &Path, content: &str) -> Result<(), AnnotationError> {
    fs::write(path, content).map_err(|source| AnnotationError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Make sure an annotation file exists, creating it empty when absent.
///
/// An existing file is left untouched.
pub fn ensure_annotation(path: &Path) -> Result<(), AnnotationError> {
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
        .map_err(|source| AnnotationError::Write {
            path: path.to_path_buf(),
            source,
        })
}
