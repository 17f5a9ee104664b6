//! Run the action detector on one frame file.

use std::path::PathBuf;

use flowbeat_common::PipelineConfig;
use flowbeat_frame_model::{events_to_table, parse_frame_json};
use flowbeat_processing_core::ActionDetector;

pub fn run(
    mut pipeline: PipelineConfig,
    frame_path: PathBuf,
    output: Option<PathBuf>,
    min_distance: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    if let Some(distance) = min_distance {
        pipeline.extract.min_distance = distance;
    }
    let detector = ActionDetector::new(pipeline)?;

    let content = std::fs::read_to_string(&frame_path)
        .map_err(|e| anyhow::anyhow!("Failed to read frame {}: {e}", frame_path.display()))?;
    let frame = parse_frame_json(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse frame {}: {e}", frame_path.display()))?;

    tracing::info!(
        frames = frame.height(),
        pools = frame.width(),
        "loaded frame from {}",
        frame_path.display()
    );

    let events = detector.process(&frame)?;
    let table = events_to_table(&events)?;

    if let Some(path) = output {
        std::fs::write(&path, serde_json::to_string(&table)?)?;
        println!("Wrote {} actions to {}", table.len(), path.display());
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string(&table)?);
    } else {
        println!("Detected {} actions", events.len());
        for event in &events {
            println!("  {:>6}  {}", event.position, event.category);
        }
    }

    Ok(())
}
