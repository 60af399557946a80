use serde::{Deserialize, Serialize};

use crate::config;

/// Signed coupling coefficients keyed by ordered (source, target) type pair.
/// Not symmetric: `(a, b)` and `(b, a)` are independent cells, so one type can
/// chase another that ignores it. Positive repels, negative attracts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionMatrix {
    type_count: usize,
    coeffs: Vec<f64>,
}

impl InteractionMatrix {
    pub fn new(type_count: usize) -> Self {
        Self {
            type_count,
            coeffs: vec![0.0; type_count * type_count],
        }
    }

    /// Build from the configuration panel's integer weights (in
    /// [`config::MIN_WEIGHT`], [`config::MAX_WEIGHT`]), scaled down to
    /// displacement coefficients the same way the panel hands them to the
    /// solver. Short rows are zero-filled.
    pub fn from_weights(rows: &[Vec<i32>]) -> Self {
        let mut matrix = Self::new(rows.len());
        for (a, row) in rows.iter().enumerate() {
            for (b, &weight) in row.iter().enumerate().take(rows.len()) {
                matrix.set(a, b, weight as f64 * config::WEIGHT_SCALE);
            }
        }
        matrix
    }

    pub fn type_count(&self) -> usize {
        self.type_count
    }

    /// `None` for out-of-range indices; the solver treats that the same as a
    /// zero coefficient.
    pub fn coefficient(&self, a: usize, b: usize) -> Option<f64> {
        if a < self.type_count && b < self.type_count {
            Some(self.coeffs[a * self.type_count + b])
        } else {
            None
        }
    }

    /// Out-of-range indices are ignored; any finite signed value is accepted
    /// as-is, no normalization.
    pub fn set(&mut self, a: usize, b: usize, value: f64) {
        if a < self.type_count && b < self.type_count {
            self.coeffs[a * self.type_count + b] = value;
        }
    }

    /// Resize to `new_count` types, preserving entries at matching indices and
    /// zero-filling new cells. Only legal between resets, never mid-step.
    pub fn resize(&mut self, new_count: usize) {
        let mut next = vec![0.0; new_count * new_count];
        let keep = self.type_count.min(new_count);
        for a in 0..keep {
            for b in 0..keep {
                next[a * new_count + b] = self.coeffs[a * self.type_count + b];
            }
        }
        self.type_count = new_count;
        self.coeffs = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_pairs_are_independent() {
        let mut matrix = InteractionMatrix::new(3);
        matrix.set(0, 1, 2.5);
        assert_eq!(matrix.coefficient(0, 1), Some(2.5));
        assert_eq!(matrix.coefficient(1, 0), Some(0.0), "reverse cell untouched");
        matrix.set(1, 0, -1.0);
        assert_eq!(matrix.coefficient(0, 1), Some(2.5));
        assert_eq!(matrix.coefficient(1, 0), Some(-1.0));
    }

    #[test]
    fn out_of_range_lookup_is_none() {
        let matrix = InteractionMatrix::new(2);
        assert_eq!(matrix.coefficient(2, 0), None);
        assert_eq!(matrix.coefficient(0, 2), None);
    }

    #[test]
    fn out_of_range_set_is_ignored() {
        let mut matrix = InteractionMatrix::new(2);
        matrix.set(5, 5, 1.0);
        assert_eq!(matrix.type_count(), 2);
        assert!(matrix.coefficient(5, 5).is_none());
    }

    #[test]
    fn resize_preserves_matching_cells() {
        let mut matrix = InteractionMatrix::new(2);
        matrix.set(0, 0, 1.0);
        matrix.set(0, 1, 2.0);
        matrix.set(1, 0, 3.0);
        matrix.set(1, 1, 4.0);

        matrix.resize(3);
        assert_eq!(matrix.coefficient(0, 1), Some(2.0));
        assert_eq!(matrix.coefficient(1, 1), Some(4.0));
        assert_eq!(matrix.coefficient(2, 2), Some(0.0), "new cells zero-filled");

        matrix.resize(1);
        assert_eq!(matrix.coefficient(0, 0), Some(1.0));
        assert_eq!(matrix.coefficient(0, 1), None);
    }

    #[test]
    fn weights_are_scaled() {
        let matrix = InteractionMatrix::from_weights(&[vec![0, -5], vec![3]]);
        assert_eq!(matrix.coefficient(0, 1), Some(-5.0 * config::WEIGHT_SCALE));
        assert_eq!(matrix.coefficient(1, 0), Some(3.0 * config::WEIGHT_SCALE));
        assert_eq!(matrix.coefficient(1, 1), Some(0.0), "short rows zero-filled");
    }
}
