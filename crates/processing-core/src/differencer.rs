//! Directional edge isolation.
//!
//! The rotated frame is split into two equal row bands. Shifting the bands
//! against each other and taking the per-sample minimum keeps only
//! structure that leans one way across the split; the difference of the two
//! lean directions gives a pair of opposite-direction edge fields.

use flowbeat_common::{DifferencerConfig, FlowbeatError, FlowbeatResult};
use flowbeat_frame_model::{FieldPair, Image};

use crate::ops::{
    binarize, close_with, dilate_with, elementwise_min, roll_columns, subtract_clipped,
};
use crate::shape_error;

/// Build the two directional difference fields of a rotated frame.
///
/// The frame must have exactly `2 * split_row` rows.
pub fn directional_fields(image: &Image, config: &DifferencerConfig) -> FlowbeatResult<FieldPair> {
    let split = config.split_row;
    let expected = config.expected_rows();
    if image.height() != expected {
        return Err(FlowbeatError::shape(format!(
            "rotated frame has {} rows, but splitting at row {split} needs exactly {expected}",
            image.height()
        )));
    }
    if image.width() == 0 {
        return Err(FlowbeatError::shape("rotated frame has no columns"));
    }

    let binary = binarize(image, config.binarize_threshold);
    let top = binary.row_range(0, split);
    let bottom = binary.row_range(split, expected);

    let shift = config.edge_shift as isize;
    let lean_a = elementwise_min(&roll_columns(&top, -shift), &roll_columns(&bottom, shift))
        .map_err(shape_error)?;
    let lean_b = elementwise_min(&roll_columns(&top, shift), &roll_columns(&bottom, -shift))
        .map_err(shape_error)?;

    let diff_a = subtract_clipped(&lean_a, &lean_b).map_err(shape_error)?;
    let diff_b = subtract_clipped(&lean_b, &lean_a).map_err(shape_error)?;

    FieldPair::new(diff_a, diff_b)
        .and_then(|raw| raw.map(|field| pre_filter(field, config)))
        .map_err(shape_error)
}

/// Join fragmented edge responses and re-centre them horizontally.
pub fn pre_filter(field: &Image, config: &DifferencerConfig) -> Image {
    let field = dilate_with(field, &config.pre_dilate);
    let field = close_with(&field, &config.pre_close);
    let field = dilate_with(&field, &config.post_dilate);
    roll_columns(&field, -(config.realign_shift as isize))
}
