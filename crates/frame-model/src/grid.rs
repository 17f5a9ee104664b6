//! Row-major 2-D sample grids.

/// Errors raised while constructing a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("size mismatch: {width}x{height} grid needs {expected} samples, got {actual}")]
    SizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("ragged rows: row {row} has {actual} samples, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("shape mismatch: {left:?} vs {right:?} (rows, cols)")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("position {position} does not fit a 32-bit event table")]
    PositionOverflow { position: usize },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A `width × height` grid stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// 8-bit intensity image.
pub type Image = Grid<u8>;

/// Raw detector input as handed over by the flow extractor
/// (rows are video frames, columns are spatial pools).
pub type RawFrame = Grid<i32>;

impl<T> Grid<T> {
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, GridError> {
        let expected = width.saturating_mul(height);
        if data.len() != expected {
            return Err(GridError::SizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a grid from a list of equally long rows.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let mut data = Vec::with_capacity(width * height);

        for (row, samples) in rows.into_iter().enumerate() {
            if samples.len() != width {
                return Err(GridError::RaggedRows {
                    row,
                    expected: width,
                    actual: samples.len(),
                });
            }
            data.extend(samples);
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(height, width)`, matching row-major indexing.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x)
    }

    /// Row `y`. Panics when `y` is out of range.
    pub fn row(&self, y: usize) -> &[T] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // `chunks_exact(0)` panics, and a zero-width grid has no samples anyway.
        self.data.chunks_exact(self.width.max(1))
    }

    pub fn same_shape<U>(&self, other: &Grid<U>) -> bool {
        self.shape() == other.shape()
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl<T: Clone> Grid<T> {
    pub fn new_fill(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Copy rows `[start, end)` into a new grid.
    pub fn row_range(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.height);
        let start = start.min(end);
        Self {
            width: self.width,
            height: end - start,
            data: self.data[start * self.width..end * self.width].to_vec(),
        }
    }
}

/// Parse a raw frame from a JSON array of integer rows.
pub fn parse_frame_json(json: &str) -> Result<RawFrame, GridError> {
    let rows: Vec<Vec<i32>> = serde_json::from_str(json)?;
    Grid::from_rows(rows)
}
