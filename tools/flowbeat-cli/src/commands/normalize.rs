//! Export the normalized frame as an image.

use std::path::PathBuf;

use flowbeat_common::PipelineConfig;
use flowbeat_frame_model::{parse_frame_json, RawFrame};
use flowbeat_processing_core::normalize::normalize;
use image::GrayImage;

pub fn run(pipeline: &PipelineConfig, frame_path: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&frame_path)
        .map_err(|e| anyhow::anyhow!("Failed to read frame {}: {e}", frame_path.display()))?;
    let frame = parse_frame_json(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse frame {}: {e}", frame_path.display()))?;

    let image = normalized_image(&frame, pipeline.normalize.clip_ceiling())?;
    image
        .save(&output)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", output.display()))?;

    tracing::info!(
        width = image.width(),
        height = image.height(),
        "wrote normalized frame"
    );
    println!(
        "Wrote {}x{} normalized frame to {}",
        image.width(),
        image.height(),
        output.display()
    );
    Ok(())
}

/// One grayscale pixel per raw sample; video frames run down the image.
fn normalized_image(frame: &RawFrame, ceiling: f64) -> anyhow::Result<GrayImage> {
    if frame.is_empty() {
        anyhow::bail!("Frame is empty");
    }

    let normalized = normalize(frame, ceiling);
    let width = u32::try_from(normalized.width())?;
    let height = u32::try_from(normalized.height())?;
    GrayImage::from_raw(width, height, normalized.into_data())
        .ok_or_else(|| anyhow::anyhow!("Normalized frame does not fit a {width}x{height} image"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowbeat_frame_model::Grid;

    #[test]
    fn pixels_follow_the_raw_layout() {
        let frame = Grid::from_rows(vec![vec![0, 100, 200], vec![50_000, 0, 0]]).unwrap();
        let image = normalized_image(&frame, 200.0).unwrap();

        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(1, 0).0, [127]);
        assert_eq!(image.get_pixel(2, 0).0, [255]);
        assert_eq!(image.get_pixel(0, 1).0, [255]);
        assert_eq!(image.get_pixel(1, 1).0, [0]);
    }

    #[test]
    fn empty_frame_is_rejected() {
        let frame: RawFrame = Grid::from_vec(0, 0, vec![]).unwrap();
        assert!(normalized_image(&frame, 9216.0).is_err());
    }
}
