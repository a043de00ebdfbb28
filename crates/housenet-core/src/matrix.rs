use rand::distributions::{Distribution, Standard};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::dtype::Float;
use crate::error::{MatrixError, MatrixResult};

/// Dense row-major 2-D matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Matrix<T: Float> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Float> Matrix<T> {
    /// Builds a matrix from a flat row-major buffer.
    pub fn new(data: Vec<T>, rows: usize, cols: usize) -> MatrixResult<Self> {
        if data.len() != rows * cols {
            return Err(MatrixError::InvalidOperation(format!(
                "buffer of length {} cannot fill a {}x{} matrix",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { data, rows, cols })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![T::ZERO; rows * cols],
            rows,
            cols,
        }
    }

    pub fn full(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Uniform samples in `[low, high)` drawn from the given RNG.
    pub fn rand(rows: usize, cols: usize, low: T, high: T, rng: &mut StdRng) -> Self
    where
        Standard: Distribution<T>,
    {
        let span = high - low;
        let data = (0..rows * cols)
            .map(|_| low + rng.gen::<T>() * span)
            .collect();
        Self { data, rows, cols }
    }

    pub fn from_rows(rows: &[Vec<T>]) -> MatrixResult<Self> {
        if rows.is_empty() {
            return Err(MatrixError::EmptyMatrix);
        }
        let cols = rows[0].len();
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(MatrixError::ShapeMismatch {
                    expected: (rows.len(), cols),
                    got: (rows.len(), row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, index: usize) -> MatrixResult<&[T]> {
        if index >= self.rows {
            return Err(MatrixError::RowOutOfBounds {
                index,
                rows: self.rows,
            });
        }
        Ok(&self.data[index * self.cols..(index + 1) * self.cols])
    }

    pub fn column(&self, index: usize) -> MatrixResult<Vec<T>> {
        if index >= self.cols {
            return Err(MatrixError::ColOutOfBounds {
                index,
                cols: self.cols,
            });
        }
        Ok((0..self.rows).map(|r| self.get(r, index)).collect())
    }

    /// Gathers the given rows into a new matrix, in the order given.
    pub fn select_rows(&self, indices: &[usize]) -> MatrixResult<Self> {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &i in indices {
            data.extend_from_slice(self.row(i)?);
        }
        Ok(Self {
            data,
            rows: indices.len(),
            cols: self.cols,
        })
    }

    /// Column-wise concatenation. All inputs must have the same row count.
    pub fn hstack(parts: &[&Matrix<T>]) -> MatrixResult<Self> {
        let first = parts.first().ok_or(MatrixError::EmptyMatrix)?;
        let rows = first.rows;
        let cols: usize = parts.iter().map(|m| m.cols).sum();
        for m in parts {
            if m.rows != rows {
                return Err(MatrixError::ShapeMismatch {
                    expected: (rows, m.cols),
                    got: (m.rows, m.cols),
                });
            }
        }
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for m in parts {
                data.extend_from_slice(&m.data[r * m.cols..(r + 1) * m.cols]);
            }
        }
        Ok(Self { data, rows, cols })
    }

    pub fn matmul(&self, other: &Matrix<T>) -> MatrixResult<Self> {
        if self.cols != other.rows {
            return Err(MatrixError::InnerDimMismatch {
                left: self.cols,
                right: other.rows,
            });
        }
        let mut out = Self::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.get(i, k);
                if a == T::ZERO {
                    continue;
                }
                for j in 0..other.cols {
                    let v = out.get(i, j) + a * other.get(k, j);
                    out.set(i, j, v);
                }
            }
        }
        Ok(out)
    }

    pub fn t(&self) -> Self {
        let mut out = Self::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.set(c, r, self.get(r, c));
            }
        }
        out
    }

    fn zip<F: Fn(T, T) -> T>(&self, other: &Matrix<T>, f: F) -> MatrixResult<Self> {
        if self.shape() == other.shape() {
            let data = self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect();
            return Ok(Self {
                data,
                rows: self.rows,
                cols: self.cols,
            });
        }
        // Row broadcast: [n, c] op [1, c].
        if other.rows == 1 && other.cols == self.cols {
            let mut out = Self::zeros(self.rows, self.cols);
            for r in 0..self.rows {
                for c in 0..self.cols {
                    out.set(r, c, f(self.get(r, c), other.get(0, c)));
                }
            }
            return Ok(out);
        }
        Err(MatrixError::ShapeMismatch {
            expected: self.shape(),
            got: other.shape(),
        })
    }

    pub fn add(&self, other: &Matrix<T>) -> MatrixResult<Self> {
        self.zip(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Matrix<T>) -> MatrixResult<Self> {
        self.zip(other, |a, b| a - b)
    }

    pub fn mul(&self, other: &Matrix<T>) -> MatrixResult<Self> {
        self.zip(other, |a, b| a * b)
    }

    pub fn div(&self, other: &Matrix<T>) -> MatrixResult<Self> {
        self.zip(other, |a, b| a / b)
    }

    pub fn add_scalar(&self, s: T) -> Self {
        self.apply(|v| v + s)
    }

    pub fn mul_scalar(&self, s: T) -> Self {
        self.apply(|v| v * s)
    }

    pub fn apply<F: Fn(T) -> T>(&self, f: F) -> Self {
        Self {
            data: self.data.iter().map(|&v| f(v)).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    pub fn sum(&self) -> T {
        self.data.iter().copied().sum()
    }

    pub fn mean(&self) -> T {
        if self.data.is_empty() {
            return T::ZERO;
        }
        self.sum() / T::from_usize(self.data.len())
    }

    /// Per-column sum, returned as a 1-row matrix.
    pub fn sum_axis0(&self) -> Self {
        let mut out = Self::zeros(1, self.cols);
        for r in 0..self.rows {
            for c in 0..self.cols {
                let v = out.get(0, c) + self.get(r, c);
                out.set(0, c, v);
            }
        }
        out
    }

    pub fn mean_axis0(&self) -> Self {
        let n = T::from_usize(self.rows.max(1));
        self.sum_axis0().apply(|v| v / n)
    }

    /// Per-column population standard deviation, as a 1-row matrix.
    pub fn std_axis0(&self) -> Self {
        let means = self.mean_axis0();
        let mut out = Self::zeros(1, self.cols);
        let n = T::from_usize(self.rows.max(1));
        for c in 0..self.cols {
            let m = means.get(0, c);
            let mut acc = T::ZERO;
            for r in 0..self.rows {
                let d = self.get(r, c) - m;
                acc += d * d;
            }
            out.set(0, c, (acc / n).sqrt());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    fn m(data: &[f64], rows: usize, cols: usize) -> Matrix<f64> {
        Matrix::new(data.to_vec(), rows, cols).unwrap()
    }

    #[test]
    fn new_rejects_bad_length() {
        assert!(Matrix::new(vec![1.0, 2.0, 3.0], 2, 2).is_err());
    }

    #[test]
    fn matmul_small() {
        let a = m(&[1.0, 2.0, 3.0, 4.0], 2, 2);
        let b = m(&[5.0, 6.0, 7.0, 8.0], 2, 2);
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.data(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn matmul_inner_dim_mismatch() {
        let a = m(&[1.0, 2.0], 1, 2);
        let b = m(&[1.0, 2.0], 1, 2);
        assert!(matches!(
            a.matmul(&b),
            Err(MatrixError::InnerDimMismatch { .. })
        ));
    }

    #[test]
    fn row_broadcast_add() {
        let a = m(&[1.0, 2.0, 3.0, 4.0], 2, 2);
        let bias = m(&[10.0, 20.0], 1, 2);
        let c = a.add(&bias).unwrap();
        assert_eq!(c.data(), &[11.0, 22.0, 13.0, 24.0]);
    }

    #[test]
    fn elementwise_shape_mismatch() {
        let a = m(&[1.0, 2.0], 1, 2);
        let b = m(&[1.0, 2.0], 2, 1);
        assert!(a.add(&b).is_err());
    }

    #[test]
    fn transpose_round_trip() {
        let a = m(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        assert_eq!(a.t().t(), a);
        assert_eq!(a.t().get(2, 1), 6.0);
    }

    #[test]
    fn axis0_reductions() {
        let a = m(&[1.0, 10.0, 3.0, 20.0], 2, 2);
        assert_eq!(a.sum_axis0().data(), &[4.0, 30.0]);
        assert_eq!(a.mean_axis0().data(), &[2.0, 15.0]);
        let s = a.std_axis0();
        assert_relative_eq!(s.get(0, 0), 1.0);
        assert_relative_eq!(s.get(0, 1), 5.0);
    }

    #[test]
    fn select_rows_gathers_in_order() {
        let a = m(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2);
        let picked = a.select_rows(&[2, 0]).unwrap();
        assert_eq!(picked.data(), &[5.0, 6.0, 1.0, 2.0]);
    }

    #[test]
    fn hstack_concatenates_columns() {
        let a = m(&[1.0, 2.0], 2, 1);
        let b = m(&[3.0, 4.0, 5.0, 6.0], 2, 2);
        let c = Matrix::hstack(&[&a, &b]).unwrap();
        assert_eq!(c.shape(), (2, 3));
        assert_eq!(c.data(), &[1.0, 3.0, 4.0, 2.0, 5.0, 6.0]);
    }

    #[test]
    fn rand_is_deterministic_for_a_seed() {
        let mut r1 = StdRng::seed_from_u64(7);
        let mut r2 = StdRng::seed_from_u64(7);
        let a = Matrix::<f64>::rand(3, 3, -1.0, 1.0, &mut r1);
        let b = Matrix::<f64>::rand(3, 3, -1.0, 1.0, &mut r2);
        assert_eq!(a, b);
        assert!(a.data().iter().all(|v| (-1.0..1.0).contains(v)));
    }
}
