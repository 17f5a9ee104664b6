//! Flowbeat Frame Model
//!
//! Value types passed between the stages of the action detector:
//! - [`Grid`]: row-major 2-D samples ([`Image`] for 8-bit, [`RawFrame`] for input)
//! - [`FieldPair`]: two same-shape directional edge fields
//! - [`ScoreSeries`] and [`Extremum`]: the 1-D signal and its turning points
//! - [`ActionEvent`]: the `(position, category)` output unit
//!
//! Every value is owned and immutable once a stage hands it on.

pub mod event;
pub mod field;
pub mod grid;
pub mod series;

pub use event::{events_to_table, ActionEvent};
pub use field::FieldPair;
pub use grid::{parse_frame_json, Grid, GridError, Image, RawFrame};
pub use series::{Extremum, ExtremumKind, ScoreSeries};
