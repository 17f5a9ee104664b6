//! Image primitives the pipeline stages are composed from.
//!
//! Binary images hold `0` or `255`. All operations return a new image and
//! leave their inputs untouched.
//!
//! Morphology uses rectangular all-ones structuring elements anchored at
//! `(rows / 2, cols / 2)`. The element is not reflected, so
//! `dilate(y, x) = max src(y + dy, x + dx)` over the element offsets, and
//! samples falling outside the image are skipped rather than padded.

use flowbeat_common::KernelSpec;
use flowbeat_frame_model::{Grid, GridError, Image};

/// Rectangular all-ones structuring element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuringElement {
    rows: usize,
    cols: usize,
}

impl StructuringElement {
    /// A `rows × cols` element. Zero dimensions are bumped to 1.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(row, col)` of the anchor inside the element.
    pub fn anchor(&self) -> (usize, usize) {
        (self.rows / 2, self.cols / 2)
    }

    /// Inclusive `[lo, hi]` window around `i` along an axis of length `len`,
    /// clipped to the axis.
    fn window(i: usize, size: usize, len: usize) -> (usize, usize) {
        let before = size / 2;
        let after = size - 1 - before;
        (i.saturating_sub(before), (i + after).min(len - 1))
    }
}

impl From<&KernelSpec> for StructuringElement {
    fn from(spec: &KernelSpec) -> Self {
        Self::new(spec.rows, spec.cols)
    }
}

/// `> threshold → 255`, otherwise `0`.
pub fn binarize(src: &Image, threshold: u8) -> Image {
    src.map(|&v| if v > threshold { 255 } else { 0 })
}

/// Grey-level dilation, applied `iterations` times.
pub fn dilate(src: &Image, element: StructuringElement, iterations: usize) -> Image {
    let mut out = src.clone();
    for _ in 0..iterations {
        out = rank_filter(&out, element, u8::max, u8::MIN);
    }
    out
}

/// Grey-level erosion, applied `iterations` times.
pub fn erode(src: &Image, element: StructuringElement, iterations: usize) -> Image {
    let mut out = src.clone();
    for _ in 0..iterations {
        out = rank_filter(&out, element, u8::min, u8::MAX);
    }
    out
}

/// Morphological closing: `iterations` dilations followed by as many erosions.
pub fn close(src: &Image, element: StructuringElement, iterations: usize) -> Image {
    erode(&dilate(src, element, iterations), element, iterations)
}

/// Dilate with a configured kernel.
pub fn dilate_with(src: &Image, kernel: &KernelSpec) -> Image {
    dilate(src, kernel.into(), kernel.iterations)
}

/// Close with a configured kernel.
pub fn close_with(src: &Image, kernel: &KernelSpec) -> Image {
    close(src, kernel.into(), kernel.iterations)
}

/// Rectangular max/min filter, done as a row pass followed by a column pass.
fn rank_filter(
    src: &Image,
    element: StructuringElement,
    pick: fn(u8, u8) -> u8,
    identity: u8,
) -> Image {
    let (height, width) = src.shape();
    if src.is_empty() {
        return src.clone();
    }

    let mut horizontal = Vec::with_capacity(width * height);
    for row in src.rows() {
        for x in 0..width {
            let (lo, hi) = StructuringElement::window(x, element.cols, width);
            horizontal.push(row[lo..=hi].iter().fold(identity, |acc, &v| pick(acc, v)));
        }
    }

    let mut data = vec![identity; width * height];
    for y in 0..height {
        let (lo, hi) = StructuringElement::window(y, element.rows, height);
        for x in 0..width {
            data[y * width + x] = (lo..=hi)
                .map(|yy| horizontal[yy * width + x])
                .fold(identity, pick);
        }
    }

    debug_assert_eq!(data.len(), width * height);
    Grid::from_vec(width, height, data).unwrap_or_else(|_| src.clone())
}

/// Circular shift along the column axis.
///
/// Positive `shift` moves samples right, negative moves them left; samples
/// leaving one edge re-enter at the other.
pub fn roll_columns<T: Copy>(src: &Grid<T>, shift: isize) -> Grid<T> {
    let width = src.width();
    if width == 0 {
        return src.clone();
    }

    let offset = shift.rem_euclid(width as isize) as usize;
    let mut data = Vec::with_capacity(src.data().len());
    for row in src.rows() {
        data.extend((0..width).map(|x| row[(x + width - offset) % width]));
    }
    debug_assert_eq!(data.len(), width * src.height());
    Grid::from_vec(width, src.height(), data).unwrap_or_else(|_| src.clone())
}

/// 3×3 median filter with replicated borders.
pub fn median3x3(src: &Image) -> Image {
    let (height, width) = src.shape();
    if src.is_empty() {
        return src.clone();
    }

    let data = src.data();
    let mut out = Vec::with_capacity(data.len());
    let mut window = [0u8; 9];
    for y in 0..height {
        for x in 0..width {
            let mut n = 0;
            for dy in -1isize..=1 {
                let yy = (y as isize + dy).clamp(0, height as isize - 1) as usize;
                for dx in -1isize..=1 {
                    let xx = (x as isize + dx).clamp(0, width as isize - 1) as usize;
                    window[n] = data[yy * width + xx];
                    n += 1;
                }
            }
            window.sort_unstable();
            out.push(window[4]);
        }
    }
    debug_assert_eq!(out.len(), width * height);
    Grid::from_vec(width, height, out).unwrap_or_else(|_| src.clone())
}

/// Keep `src` where `mask` is non-zero, zero elsewhere.
pub fn mask_and(src: &Image, mask: &Image) -> Result<Image, GridError> {
    zip_with(src, mask, |v, m| if m != 0 { v } else { 0 })
}

/// Per-sample minimum of two images.
pub fn elementwise_min(a: &Image, b: &Image) -> Result<Image, GridError> {
    zip_with(a, b, u8::min)
}

/// `clip(a - b, 0, 255)`, computed without unsigned wraparound.
pub fn subtract_clipped(a: &Image, b: &Image) -> Result<Image, GridError> {
    zip_with(a, b, |x, y| (i16::from(x) - i16::from(y)).clamp(0, 255) as u8)
}

fn zip_with(a: &Image, b: &Image, f: impl Fn(u8, u8) -> u8) -> Result<Image, GridError> {
    if !a.same_shape(b) {
        return Err(GridError::ShapeMismatch {
            left: a.shape(),
            right: b.shape(),
        });
    }
    let data = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(&x, &y)| f(x, y))
        .collect();
    Grid::from_vec(a.width(), a.height(), data)
}

/// Rotate 90° counter-clockwise: `new[i][j] = old[j][W - 1 - i]`.
pub fn rotate_ccw<T: Copy>(src: &Grid<T>) -> Grid<T> {
    let (height, width) = src.shape();
    let data = src.data();
    let mut out = Vec::with_capacity(data.len());
    for i in 0..width {
        let col = width - 1 - i;
        out.extend((0..height).map(|j| data[j * width + col]));
    }
    debug_assert_eq!(out.len(), height * width);
    Grid::from_vec(height, width, out).unwrap_or_else(|_| src.clone())
}
