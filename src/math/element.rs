use std::f64::consts::PI;
use std::fmt::Debug;

use num_traits::Num;
use rand::Rng;

/// The closed set of numeric element types a [`Matrix`](crate::Matrix) can
/// hold. Covers the sampling and byte-codec hooks the rest of the crate
/// needs so that matrix and network code never has to know the concrete
/// type.
///
/// Integer types sample uniformly *inclusive* of both bounds; floating
/// types use the usual half-open `[min, max)` range. Normal sampling is
/// only defined for floating types and panics otherwise.
pub trait Element: Num + Copy + PartialOrd + Debug {
    /// True for f32/f64. Initializers branch on this (He falls back to a
    /// bounded uniform for integer matrices).
    const FLOATING: bool;

    /// Byte width of one element in the binary model format.
    const BYTE_WIDTH: usize;

    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;

    fn sample_uniform<R: Rng + ?Sized>(rng: &mut R, min: Self, max: Self) -> Self;
    fn sample_normal<R: Rng + ?Sized>(rng: &mut R, mean: Self, stddev: Self) -> Self;

    /// Appends this element's little-endian bytes to `out`.
    fn write_le(self, out: &mut Vec<u8>);

    /// Decodes one element from exactly `BYTE_WIDTH` little-endian bytes.
    fn read_le(bytes: &[u8]) -> Self;
}

/// Samples a single value from N(0, 1) using the Box-Muller transform.
/// Both u1 and u2 must be uniform on (0, 1].
fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // Draw two independent uniform samples in (0, 1] to avoid log(0).
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = 1.0 - rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

impl Element for f64 {
    const FLOATING: bool = true;
    const BYTE_WIDTH: usize = 8;

    fn from_f64(v: f64) -> Self {
        v
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn sample_uniform<R: Rng + ?Sized>(rng: &mut R, min: Self, max: Self) -> Self {
        rng.gen_range(min..max)
    }

    fn sample_normal<R: Rng + ?Sized>(rng: &mut R, mean: Self, stddev: Self) -> Self {
        mean + standard_normal(rng) * stddev
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn read_le(bytes: &[u8]) -> Self {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        f64::from_le_bytes(buf)
    }
}

impl Element for f32 {
    const FLOATING: bool = true;
    const BYTE_WIDTH: usize = 4;

    fn from_f64(v: f64) -> Self {
        v as f32
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn sample_uniform<R: Rng + ?Sized>(rng: &mut R, min: Self, max: Self) -> Self {
        rng.gen_range(min..max)
    }

    fn sample_normal<R: Rng + ?Sized>(rng: &mut R, mean: Self, stddev: Self) -> Self {
        mean + (standard_normal(rng) as f32) * stddev
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn read_le(bytes: &[u8]) -> Self {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(bytes);
        f32::from_le_bytes(buf)
    }
}

impl Element for i32 {
    const FLOATING: bool = false;
    const BYTE_WIDTH: usize = 4;

    fn from_f64(v: f64) -> Self {
        v as i32
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn sample_uniform<R: Rng + ?Sized>(rng: &mut R, min: Self, max: Self) -> Self {
        rng.gen_range(min..=max)
    }

    fn sample_normal<R: Rng + ?Sized>(_rng: &mut R, _mean: Self, _stddev: Self) -> Self {
        panic!("normal sampling requires a floating-point element type")
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn read_le(bytes: &[u8]) -> Self {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(bytes);
        i32::from_le_bytes(buf)
    }
}

impl Element for i64 {
    const FLOATING: bool = false;
    const BYTE_WIDTH: usize = 8;

    fn from_f64(v: f64) -> Self {
        v as i64
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn sample_uniform<R: Rng + ?Sized>(rng: &mut R, min: Self, max: Self) -> Self {
        rng.gen_range(min..=max)
    }

    fn sample_normal<R: Rng + ?Sized>(_rng: &mut R, _mean: Self, _stddev: Self) -> Self {
        panic!("normal sampling requires a floating-point element type")
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn read_le(bytes: &[u8]) -> Self {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        i64::from_le_bytes(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn integer_uniform_is_inclusive_of_both_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut saw_min = false;
        let mut saw_max = false;
        for _ in 0..1000 {
            let v = i32::sample_uniform(&mut rng, 0, 2);
            assert!((0..=2).contains(&v));
            saw_min |= v == 0;
            saw_max |= v == 2;
        }
        assert!(saw_min && saw_max);
    }

    #[test]
    fn float_uniform_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = f64::sample_uniform(&mut rng, -0.5, 0.5);
            assert!((-0.5..0.5).contains(&v));
        }
    }

    #[test]
    fn normal_samples_center_on_mean() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 10_000;
        let sum: f64 = (0..n)
            .map(|_| f64::sample_normal(&mut rng, 3.0, 0.5))
            .sum();
        let mean = sum / n as f64;
        assert!((mean - 3.0).abs() < 0.05);
    }

    #[test]
    #[should_panic]
    fn integer_normal_sampling_panics() {
        let mut rng = StdRng::seed_from_u64(7);
        let _ = i32::sample_normal(&mut rng, 0, 1);
    }

    #[test]
    fn little_endian_round_trip() {
        let mut buf = Vec::new();
        1.5f64.write_le(&mut buf);
        (-3i32).write_le(&mut buf);
        assert_eq!(buf.len(), 12);
        assert_eq!(f64::read_le(&buf[..8]), 1.5);
        assert_eq!(i32::read_le(&buf[8..]), -3);
    }
}
