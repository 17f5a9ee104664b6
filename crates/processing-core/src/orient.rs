//! Rotation into detector orientation plus salt-and-pepper removal.

use flowbeat_frame_model::Image;

use crate::ops::{median3x3, rotate_ccw};

/// Rotate 90° counter-clockwise, then apply a 3×3 median.
///
/// Input columns (flow pools) become rows; input rows (video frames)
/// become columns.
pub fn orient_and_denoise(image: &Image) -> Image {
    median3x3(&rotate_ccw(image))
}
