//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the output size of a bounded thumbnail.
///
/// A single uniform scale factor `min(target / width, target / height)` is
/// applied to both edges, so the longer edge lands exactly on `target` and
/// the aspect ratio is preserved. Results are rounded to the nearest pixel
/// and never drop below 1.
///
/// The factor is applied unconditionally: sources smaller than `target`
/// are scaled up.
///
/// # Examples
/// ```
/// # use annotate_gallery::imaging::calculate_fit_dimensions;
/// // 400x200 landscape into a 150px box → 150x75
/// assert_eq!(calculate_fit_dimensions((400, 200), 150), (150, 75));
///
/// // 300x600 portrait into a 150px box → 75x150
/// assert_eq!(calculate_fit_dimensions((300, 600), 150), (75, 150));
/// ```
pub fn calculate_fit_dimensions(source: (u32, u32), target: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    if src_w == 0 || src_h == 0 {
        return (src_w, src_h);
    }

    let ratio = f64::min(
        target as f64 / src_w as f64,
        target as f64 / src_h as f64,
    );

    let w = (src_w as f64 * ratio).round().max(1.0) as u32;
    let h = (src_h as f64 * ratio).round().max(1.0) as u32;
    (w, h)
}
