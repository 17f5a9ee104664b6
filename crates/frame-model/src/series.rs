//! The 1-D score signal and its turning points.

use serde::{Deserialize, Serialize};

/// One score per column of the projected fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreSeries(Vec<f64>);

impl ScoreSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<f64> {
        self.0.get(position).copied()
    }

    /// Series with every value sign-flipped; valleys become peaks.
    pub fn negated(&self) -> Self {
        Self(self.0.iter().map(|v| -v).collect())
    }

    /// Whether every sample equals the first one.
    pub fn is_flat(&self) -> bool {
        self.0.windows(2).all(|w| w[0] == w[1])
    }
}

impl From<Vec<f64>> for ScoreSeries {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// Direction of a turning point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtremumKind {
    Peak,
    Valley,
}

/// A local maximum or minimum of a [`ScoreSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremum {
    pub position: usize,
    pub value: f64,
    pub kind: ExtremumKind,
}

impl Extremum {
    pub fn new(position: usize, value: f64, kind: ExtremumKind) -> Self {
        Self {
            position,
            value,
            kind,
        }
    }
}
