//! The action detector: raw frame in, ordered action events out.
//!
//! # Stages
//!
//! 1. **Normalize** raw samples into 8-bit intensity.
//! 2. **Orient** the frame (rotate 90° counter-clockwise) and remove speckle.
//! 3. **Difference** the two row halves into opposite-direction edge fields.
//! 4. **Refine** each field through a mask grown from the other.
//! 5. **Project** the refined fields into one signed score per column.
//! 6. **Extract** peaks and valleys and label them as events.

use flowbeat_common::{FlowbeatError, FlowbeatResult, PipelineConfig};
use flowbeat_frame_model::{ActionEvent, Extremum, FieldPair, Grid, Image, ScoreSeries};

use crate::differencer::directional_fields;
use crate::extract::{find_extrema, group_extrema, label_events};
use crate::normalize::normalize;
use crate::orient::orient_and_denoise;
use crate::projector::project;
use crate::refine::refine_fields;

/// Every intermediate value of one detector run.
#[derive(Debug, Clone)]
pub struct PipelineTrace {
    pub normalized: Image,
    pub oriented: Image,
    pub fields: FieldPair,
    pub refined: FieldPair,
    pub scores: ScoreSeries,
    /// Extrema before grouping.
    pub extrema: Vec<Extremum>,
    /// One extremum per same-kind run.
    pub grouped: Vec<Extremum>,
    pub events: Vec<ActionEvent>,
}

/// Converts one raw frame into action events.
///
/// Holds only immutable configuration, so one detector can serve any number
/// of threads.
#[derive(Debug, Clone)]
pub struct ActionDetector {
    config: PipelineConfig,
}

impl ActionDetector {
    /// Create a detector, rejecting unusable tunables.
    pub fn new(config: PipelineConfig) -> FlowbeatResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a detector with the reference tunables.
    pub fn with_defaults() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Check that `frame` fits the configured row split.
    ///
    /// Rotation turns frame columns into rows, so the frame needs exactly
    /// `2 * split_row` columns.
    pub fn check_frame<T>(&self, frame: &Grid<T>) -> FlowbeatResult<()> {
        if frame.is_empty() {
            return Err(FlowbeatError::shape(format!(
                "frame is empty ({} rows x {} columns)",
                frame.height(),
                frame.width()
            )));
        }

        let expected = self.config.differencer.expected_rows();
        if frame.width() != expected {
            return Err(FlowbeatError::shape(format!(
                "frame has {} columns; splitting at row {} after rotation needs exactly {expected}",
                frame.width(),
                self.config.differencer.split_row
            )));
        }
        Ok(())
    }

    /// Run the pipeline and return the events.
    pub fn process<T>(&self, frame: &Grid<T>) -> FlowbeatResult<Vec<ActionEvent>>
    where
        T: Copy + Into<f64>,
    {
        Ok(self.process_with_trace(frame)?.events)
    }

    /// Run the pipeline and keep every intermediate result.
    pub fn process_with_trace<T>(&self, frame: &Grid<T>) -> FlowbeatResult<PipelineTrace>
    where
        T: Copy + Into<f64>,
    {
        self.check_frame(frame)?;
        let config = &self.config;

        let normalized = normalize(frame, config.normalize.clip_ceiling());
        tracing::debug!(
            rows = normalized.height(),
            cols = normalized.width(),
            "normalized frame"
        );

        let oriented = orient_and_denoise(&normalized);
        tracing::debug!(
            rows = oriented.height(),
            cols = oriented.width(),
            "oriented frame"
        );

        let fields = directional_fields(&oriented, &config.differencer)?;
        let refined = refine_fields(&fields, &config.refine)?;
        tracing::debug!(
            rows = refined.shape().0,
            cols = refined.shape().1,
            "refined directional fields"
        );

        let scores = project(&refined);
        let extrema = find_extrema(&scores, &config.extract);
        let grouped = group_extrema(&extrema, &scores);
        let events = label_events(&grouped, &config.extract);
        tracing::debug!(
            scores = scores.len(),
            extrema = extrema.len(),
            grouped = grouped.len(),
            "extracted extrema"
        );

        tracing::info!(actions = events.len(), "Detected {} actions", events.len());

        Ok(PipelineTrace {
            normalized,
            oriented,
            fields,
            refined,
            scores,
            extrema,
            grouped,
            events,
        })
    }
}

impl Default for ActionDetector {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Run the detector with the reference tunables.
pub fn process<T>(frame: &Grid<T>) -> FlowbeatResult<Vec<ActionEvent>>
where
    T: Copy + Into<f64>,
{
    ActionDetector::with_defaults().process(frame)
}
