//! Raw frame normalization into 8-bit intensity.

use flowbeat_frame_model::{Grid, Image};

/// Clip samples above `ceiling`, stretch the clipped range to `[0, 255]`
/// and truncate to `u8`.
///
/// A constant frame has no range to stretch and maps to all zeros.
pub fn normalize<T>(frame: &Grid<T>, ceiling: f64) -> Image
where
    T: Copy + Into<f64>,
{
    let clipped: Vec<f64> = frame
        .data()
        .iter()
        .map(|&v| {
            let v: f64 = v.into();
            if v > ceiling {
                ceiling
            } else {
                v
            }
        })
        .collect();

    let (min, max) = clipped
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let data: Vec<u8> = if max > min {
        let range = max - min;
        clipped
            .iter()
            .map(|&v| ((v - min) * 255.0 / range).clamp(0.0, 255.0) as u8)
            .collect()
    } else {
        vec![0; clipped.len()]
    };

    debug_assert_eq!(data.len(), frame.width() * frame.height());
    Grid::from_vec(frame.width(), frame.height(), data)
        .unwrap_or_else(|_| Grid::new_fill(frame.width(), frame.height(), 0))
}
