//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::calculate_fit_dimensions;
use super::params::{Quality, ThumbnailParams};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions<B: ImageBackend + ?Sized>(backend: &B, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Configuration for thumbnail generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbnailConfig {
    /// Bounding box edge; the longer side of the output lands on this.
    pub size: u32,
    pub quality: Quality,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            size: 150,
            quality: Quality::default(),
        }
    }
}

/// An encoded thumbnail ready to be served.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Plan a thumbnail operation without executing it.
pub fn plan_thumbnail(
    source: &Path,
    original_dims: (u32, u32),
    config: &ThumbnailConfig,
) -> ThumbnailParams {
    let (width, height) = calculate_fit_dimensions(original_dims, config.size);

    ThumbnailParams {
        source: source.to_path_buf(),
        width,
        height,
        quality: config.quality,
    }
}

/// Create a JPEG thumbnail for `source`, bounded by `config.size`.
pub fn create_thumbnail<B: ImageBackend + ?Sized>(
    backend: &B,
    source: &Path,
    config: &ThumbnailConfig,
) -> Result<Thumbnail> {
    let dims = get_dimensions(backend, source)?;
    let params = plan_thumbnail(source, dims, config);
    let jpeg = backend.thumbnail(&params)?;

    Ok(Thumbnail {
        jpeg,
        width: params.width,
        height: params.height,
    })
}
