use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::math::element::Element;
use crate::math::matrix::Matrix;

/// The closed set of weight-initialization strategies.
///
/// Each strategy mutates a weight matrix in place given its fan-in (number
/// of inputs feeding each neuron) and fan-out (number of neurons it feeds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Initializer {
    /// Uniform in [-0.5, 0.5]; ignores fan-in/fan-out.
    Uniform,
    /// Glorot: uniform in ±√(6 / (fan_in + fan_out)).
    Xavier,
    /// Gaussian with mean 0 and stddev √(2 / fan_in) for floating element
    /// types. Integer matrices get uniform ±1 instead.
    He,
    /// All zero. Meant for biases or degenerate tests — zero weights never
    /// break symmetry.
    Zeros,
}

impl Initializer {
    pub fn apply<T: Element, R: Rng + ?Sized>(
        &self,
        matrix: &mut Matrix<T>,
        fan_in: usize,
        fan_out: usize,
        rng: &mut R,
    ) {
        match self {
            Initializer::Uniform => {
                matrix.fill_uniform(T::from_f64(-0.5), T::from_f64(0.5), rng);
            }
            Initializer::Xavier => {
                let limit = (6.0 / (fan_in + fan_out) as f64).sqrt();
                matrix.fill_uniform(T::from_f64(-limit), T::from_f64(limit), rng);
            }
            Initializer::He => {
                if T::FLOATING {
                    let stddev = (2.0 / fan_in as f64).sqrt();
                    matrix.fill_normal(T::zero(), T::from_f64(stddev), rng);
                } else {
                    matrix.fill_uniform(T::from_f64(-1.0), T::from_f64(1.0), rng);
                }
            }
            Initializer::Zeros => {
                matrix.fill(T::zero());
            }
        }
    }

    /// Looks up an initializer by tag. Lookup is total: an unrecognized tag
    /// falls back to `Uniform` — deliberate policy, mirroring the
    /// activation registry.
    pub fn from_name(name: &str) -> Initializer {
        match name {
            "Uniform" => Initializer::Uniform,
            "Xavier" => Initializer::Xavier,
            "He" => Initializer::He,
            "Zeros" => Initializer::Zeros,
            _ => Initializer::Uniform,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Initializer::Uniform => "Uniform",
            Initializer::Xavier => "Xavier",
            Initializer::He => "He",
            Initializer::Zeros => "Zeros",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn filled(init: Initializer, fan_in: usize, fan_out: usize) -> Matrix<f64> {
        let mut rng = StdRng::seed_from_u64(11);
        let mut m = Matrix::zeros(fan_out, fan_in);
        init.apply(&mut m, fan_in, fan_out, &mut rng);
        m
    }

    #[test]
    fn uniform_ignores_fans() {
        let m = filled(Initializer::Uniform, 50, 50);
        for i in 0..50 * 50 {
            assert!((-0.5..0.5).contains(&m.get_flat(i)));
        }
    }

    #[test]
    fn xavier_respects_limit() {
        let m = filled(Initializer::Xavier, 8, 4);
        let limit = (6.0f64 / 12.0).sqrt();
        for i in 0..32 {
            let v = m.get_flat(i);
            assert!(v >= -limit && v < limit);
        }
    }

    #[test]
    fn he_spread_tracks_fan_in() {
        let m = filled(Initializer::He, 100, 100);
        let expected_stddev = (2.0f64 / 100.0).sqrt();
        let mean = m.mean();
        let mut sq = m.clone();
        sq.apply(|x| x * x);
        let var = sq.mean() - mean * mean;
        assert!(mean.abs() < 0.02);
        assert!((var.sqrt() - expected_stddev).abs() < 0.05);
    }

    #[test]
    fn he_on_integer_matrix_uses_bounded_uniform() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut m: Matrix<i32> = Matrix::zeros(20, 20);
        Initializer::He.apply(&mut m, 20, 20, &mut rng);
        let mut nonzero = false;
        for i in 0..400 {
            let v = m.get_flat(i);
            assert!((-1..=1).contains(&v));
            nonzero |= v != 0;
        }
        assert!(nonzero);
    }

    #[test]
    fn zeros_leaves_everything_zero() {
        let m = filled(Initializer::Zeros, 5, 5);
        assert_eq!(m.sum(), 0.0);
    }

    #[test]
    fn unknown_tag_falls_back_to_uniform() {
        assert_eq!(Initializer::from_name("Orthogonal"), Initializer::Uniform);
        assert_eq!(Initializer::from_name("He"), Initializer::He);
    }
}
