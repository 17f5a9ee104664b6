//! Column projection of the refined fields into a score series.

use flowbeat_frame_model::{FieldPair, ScoreSeries};

/// Divisor for column-sum differences: two fully lit samples score `1.0`.
pub const SCORE_SCALE: f64 = 255.0 * 2.0;

/// `score[j] = (Σ first[.][j] - Σ second[.][j]) / SCORE_SCALE`.
pub fn project(pair: &FieldPair) -> ScoreSeries {
    let first = column_sums(pair.a().rows(), pair.shape().1);
    let second = column_sums(pair.b().rows(), pair.shape().1);

    first
        .iter()
        .zip(&second)
        .map(|(a, b)| (a - b) / SCORE_SCALE)
        .collect::<Vec<_>>()
        .into()
}

fn column_sums<'a>(rows: impl Iterator<Item = &'a [u8]>, width: usize) -> Vec<f64> {
    let mut sums = vec![0.0; width];
    for row in rows {
        for (sum, &v) in sums.iter_mut().zip(row) {
            *sum += f64::from(v);
        }
    }
    sums
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowbeat_frame_model::Grid;

    #[test]
    fn scores_are_signed_column_differences() {
        let a = Grid::from_rows(vec![vec![0u8, 255, 0], vec![0, 255, 0]]).unwrap();
        let b = Grid::from_rows(vec![vec![0u8, 0, 255], vec![0, 0, 0]]).unwrap();
        let scores = project(&FieldPair::new(a, b).unwrap());
        assert_eq!(scores.values(), &[0.0, 1.0, -0.5]);
    }

    #[test]
    fn identical_fields_score_flat_zero() {
        let field = Grid::new_fill(7, 90, 255u8);
        let scores = project(&FieldPair::new(field.clone(), field).unwrap());
        assert_eq!(scores.len(), 7);
        assert!(scores.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn tall_fields_do_not_overflow() {
        let a = Grid::new_fill(2, 5000, 255u8);
        let b = Grid::new_fill(2, 5000, 0u8);
        let scores = project(&FieldPair::new(a, b).unwrap());
        assert_eq!(scores.values(), &[2500.0, 2500.0]);
    }
}
