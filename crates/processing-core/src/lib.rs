//! Flowbeat Processing Core: the action detector
//!
//! Turns one optical-flow magnitude frame into timed action events:
//! - **Primitives:** binarize, dilate/erode/close, circular shift, median
//! - **Stages:** normalize, orient, directional differencing, masked
//!   refinement, projection, peak/valley extraction
//! - **Detector:** [`ActionDetector`] composes the stages left to right
//!
//! This crate is pure computation: no I/O, no shared state.
//! All inputs are data; all outputs are data.

pub mod differencer;
pub mod extract;
pub mod normalize;
pub mod ops;
pub mod orient;
pub mod pipeline;
pub mod projector;
pub mod refine;

pub use pipeline::{process, ActionDetector, PipelineTrace};

use flowbeat_common::FlowbeatError;
use flowbeat_frame_model::GridError;

pub(crate) fn shape_error(err: GridError) -> FlowbeatError {
    FlowbeatError::shape(err.to_string())
}
