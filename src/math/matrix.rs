use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::math::element::Element;

/// Dense 2-D container with value semantics. Elements are stored flat in
/// row-major order: element (r, c) lives at index `r * cols + c`.
///
/// Operations that combine two matrices require exact shape compatibility
/// and panic on mismatch — a wrong shape is a bug in the caller, never
/// recoverable input. Nothing here broadcasts or truncates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T: Element> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Element> Matrix<T> {
    /// Allocates a rows × cols matrix with every element zero.
    pub fn zeros(rows: usize, cols: usize) -> Matrix<T> {
        assert!(rows > 0 && cols > 0, "matrix dimensions must be positive");
        Matrix {
            rows,
            cols,
            data: vec![T::zero(); rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(row < self.rows, "row {} out of range ({})", row, self.rows);
        assert!(col < self.cols, "col {} out of range ({})", col, self.cols);
        self.data[row * self.cols + col]
    }

    pub fn get_flat(&self, index: usize) -> T {
        assert!(
            index < self.data.len(),
            "index {} out of range ({})",
            index,
            self.data.len()
        );
        self.data[index]
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        assert!(row < self.rows, "row {} out of range ({})", row, self.rows);
        assert!(col < self.cols, "col {} out of range ({})", col, self.cols);
        self.data[row * self.cols + col] = value;
    }

    pub fn set_flat(&mut self, index: usize, value: T) {
        assert!(
            index < self.data.len(),
            "index {} out of range ({})",
            index,
            self.data.len()
        );
        self.data[index] = value;
    }

    pub fn fill(&mut self, value: T) {
        for x in &mut self.data {
            *x = value;
        }
    }

    /// Fills with independent uniform draws in [min, max] for integer
    /// element types, [min, max) for floating ones.
    pub fn fill_uniform<R: Rng + ?Sized>(&mut self, min: T, max: T, rng: &mut R) {
        for x in &mut self.data {
            *x = T::sample_uniform(rng, min, max);
        }
    }

    /// Fills with independent Gaussian draws. Floating element types only.
    pub fn fill_normal<R: Rng + ?Sized>(&mut self, mean: T, stddev: T, rng: &mut R) {
        for x in &mut self.data {
            *x = T::sample_normal(rng, mean, stddev);
        }
    }

    /// In-place elementwise addition. Shapes must match exactly.
    pub fn add(&mut self, rhs: &Matrix<T>) {
        self.assert_same_shape(rhs);
        for (x, &y) in self.data.iter_mut().zip(rhs.data.iter()) {
            *x = *x + y;
        }
    }

    /// In-place elementwise subtraction. Shapes must match exactly.
    pub fn subtract(&mut self, rhs: &Matrix<T>) {
        self.assert_same_shape(rhs);
        for (x, &y) in self.data.iter_mut().zip(rhs.data.iter()) {
            *x = *x - y;
        }
    }

    /// In-place elementwise (Hadamard) product. Shapes must match exactly.
    pub fn hadamard(&mut self, rhs: &Matrix<T>) {
        self.assert_same_shape(rhs);
        for (x, &y) in self.data.iter_mut().zip(rhs.data.iter()) {
            *x = *x * y;
        }
    }

    /// In-place multiplication of every element by `scalar`.
    pub fn scale(&mut self, scalar: T) {
        for x in &mut self.data {
            *x = *x * scalar;
        }
    }

    /// Returns a new (cols × rows) matrix with result(j, i) = self(i, j).
    pub fn transpose(&self) -> Matrix<T> {
        let mut out = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        out
    }

    /// Standard matrix product: (self.rows × rhs.cols), requires
    /// self.cols == rhs.rows. One accumulator per output cell, k ascending,
    /// so the accumulation order is deterministic.
    pub fn mat_mul(&self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_eq!(
            self.cols, rhs.rows,
            "shape mismatch in matrix product: {}x{} * {}x{}",
            self.rows, self.cols, rhs.rows, rhs.cols
        );
        let mut out = Matrix::zeros(self.rows, rhs.cols);
        for i in 0..self.rows {
            for j in 0..rhs.cols {
                let mut sum = T::zero();
                for k in 0..self.cols {
                    sum = sum + self.data[i * self.cols + k] * rhs.data[k * rhs.cols + j];
                }
                out.data[i * rhs.cols + j] = sum;
            }
        }
        out
    }

    pub fn sum(&self) -> T {
        let mut total = T::zero();
        for &x in &self.data {
            total = total + x;
        }
        total
    }

    /// sum() / (rows · cols), computed in T's own arithmetic (integer
    /// matrices get an integer mean).
    pub fn mean(&self) -> T {
        self.sum() / T::from_f64((self.rows * self.cols) as f64)
    }

    /// In-place elementwise map.
    pub fn apply<F: Fn(T) -> T>(&mut self, f: F) {
        for x in &mut self.data {
            *x = f(*x);
        }
    }

    /// Flat index of the maximum element; the first occurrence wins on
    /// ties. This is the convention used for classification decoding.
    pub fn argmax(&self) -> usize {
        let mut max_index = 0;
        let mut max_val = self.data[0];
        for (i, &x) in self.data.iter().enumerate().skip(1) {
            if x > max_val {
                max_val = x;
                max_index = i;
            }
        }
        max_index
    }

    fn assert_same_shape(&self, rhs: &Matrix<T>) {
        assert_eq!(
            (self.rows, self.cols),
            (rhs.rows, rhs.cols),
            "shape mismatch in elementwise op: {}x{} vs {}x{}",
            self.rows,
            self.cols,
            rhs.rows,
            rhs.cols
        );
    }
}
