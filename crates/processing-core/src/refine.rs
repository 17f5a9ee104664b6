//! Cross-gated refinement of the directional fields.

use flowbeat_common::{FlowbeatResult, RefineConfig};
use flowbeat_frame_model::{FieldPair, GridError, Image};

use crate::ops::{binarize, close_with, dilate_with, mask_and, median3x3};
use crate::shape_error;

/// Refine both fields, each gated by a mask grown from the other.
///
/// The first output is field `b` gated by the mask of `a`, the second is
/// field `a` gated by the mask of `b`.
pub fn refine_fields(pair: &FieldPair, config: &RefineConfig) -> FlowbeatResult<FieldPair> {
    let first = gate(pair.a(), pair.b(), config).map_err(shape_error)?;
    let second = gate(pair.b(), pair.a(), config).map_err(shape_error)?;
    FieldPair::new(first, second).map_err(shape_error)
}

/// Threshold, dilate and close `primary` into a binary mask.
pub fn build_mask(primary: &Image, config: &RefineConfig) -> Image {
    let mask = binarize(primary, config.mask_threshold);
    let mask = dilate_with(&mask, &config.mask_dilate);
    close_with(&mask, &config.mask_close)
}

fn gate(primary: &Image, secondary: &Image, config: &RefineConfig) -> Result<Image, GridError> {
    let mask = build_mask(primary, config);
    let gated = mask_and(secondary, &mask)?;
    let gated = binarize(&gated, config.gate_threshold);
    let gated = dilate_with(&gated, &config.gate_dilate);
    Ok(median3x3(&gated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowbeat_frame_model::Grid;

    fn block(width: usize, height: usize, blocks: &[(usize, usize, usize, usize)]) -> Image {
        let mut data = vec![0u8; width * height];
        for &(x0, x1, y0, y1) in blocks {
            for y in y0..y1 {
                for x in x0..x1 {
                    data[y * width + x] = 255;
                }
            }
        }
        Grid::from_vec(width, height, data).unwrap()
    }

    #[test]
    fn empty_primary_blocks_everything() {
        let a = Grid::new_fill(40, 20, 0u8);
        let b = block(40, 20, &[(5, 15, 5, 15)]);
        let pair = FieldPair::new(a, b).unwrap();

        let refined = refine_fields(&pair, &RefineConfig::default()).unwrap();
        assert_eq!(refined.shape(), (20, 40));
        assert!(refined.a().data().iter().all(|&v| v == 0));
        // `a` is empty, so nothing survives the second gate either.
        assert!(refined.b().data().iter().all(|&v| v == 0));
    }

    #[test]
    fn mask_keeps_nearby_and_drops_distant_structure() {
        let primary = block(40, 20, &[(5, 15, 5, 15)]);
        let secondary = block(40, 20, &[(8, 12, 8, 12), (30, 34, 8, 12)]);
        let pair = FieldPair::new(primary, secondary).unwrap();

        let refined = refine_fields(&pair, &RefineConfig::default()).unwrap();
        let first = refined.a();
        assert_eq!(first.get(10, 10), Some(&255));
        for y in 0..20 {
            assert!(first.row(y)[25..].iter().all(|&v| v == 0));
        }
    }

    #[test]
    fn mask_is_binary() {
        let primary = Grid::from_rows(vec![vec![0u8, 70, 71, 200]; 4]).unwrap();
        let mask = build_mask(&primary, &RefineConfig::default());
        assert!(mask.data().iter().all(|&v| v == 0 || v == 255));
        assert!(mask.data().iter().any(|&v| v == 255));
    }

    #[test]
    fn weak_samples_below_mask_threshold_do_not_open_the_gate() {
        let primary = block(40, 20, &[(5, 15, 5, 15)]).map(|&v| if v > 0 { 70 } else { 0 });
        let secondary = block(40, 20, &[(8, 12, 8, 12)]);
        let pair = FieldPair::new(primary, secondary).unwrap();
        let refined = refine_fields(&pair, &RefineConfig::default()).unwrap();
        assert!(refined.a().data().iter().all(|&v| v == 0));
    }
}
