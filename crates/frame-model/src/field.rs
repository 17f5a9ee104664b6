//! Pairs of opposite-direction edge fields.

use crate::grid::{GridError, Image};

/// Two same-shape binary fields responding to opposite edge directions.
///
/// Field `a` comes from the stack whose top half is shifted left; field `b`
/// from the stack whose top half is shifted right.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPair {
    a: Image,
    b: Image,
}

impl FieldPair {
    pub fn new(a: Image, b: Image) -> Result<Self, GridError> {
        if !a.same_shape(&b) {
            return Err(GridError::ShapeMismatch {
                left: a.shape(),
                right: b.shape(),
            });
        }
        Ok(Self { a, b })
    }

    pub fn a(&self) -> &Image {
        &self.a
    }

    pub fn b(&self) -> &Image {
        &self.b
    }

    /// `(height, width)` shared by both fields.
    pub fn shape(&self) -> (usize, usize) {
        self.a.shape()
    }

    /// Apply `f` to each field independently.
    pub fn map(&self, mut f: impl FnMut(&Image) -> Image) -> Result<Self, GridError> {
        Self::new(f(&self.a), f(&self.b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn rejects_mismatched_shapes() {
        let a = Grid::new_fill(4, 2, 0u8);
        let b = Grid::new_fill(2, 4, 0u8);
        let err = FieldPair::new(a, b).unwrap_err();
        assert!(matches!(
            err,
            GridError::ShapeMismatch {
                left: (2, 4),
                right: (4, 2)
            }
        ));
    }

    #[test]
    fn map_keeps_pair_shape() {
        let pair = FieldPair::new(Grid::new_fill(3, 2, 1u8), Grid::new_fill(3, 2, 2u8)).unwrap();
        let doubled = pair.map(|img| img.map(|v| v * 2)).unwrap();
        assert_eq!(doubled.shape(), (2, 3));
        assert!(doubled.a().data().iter().all(|&v| v == 2));
        assert!(doubled.b().data().iter().all(|&v| v == 4));
    }
}
