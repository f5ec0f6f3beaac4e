//! Complex baseband sample type
//!
//! A pair of IEEE-754 doubles. Every sample entering the pipeline must be
//! finite (§3): neither component may be NaN or infinite. Producers that
//! cannot guarantee this call [`Complex::sanitize`] before pushing samples
//! into the pipeline.

use std::ops::{Add, AddAssign, Mul, Sub};

/// A single complex baseband I/Q sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    pub i: f64,
    pub q: f64,
}

impl Complex {
    #[inline]
    pub fn new(i: f64, q: f64) -> Self {
        Self { i, q }
    }

    #[inline]
    pub fn zero() -> Self {
        Self { i: 0.0, q: 0.0 }
    }

    /// Magnitude `sqrt(i^2 + q^2)`.
    #[inline]
    pub fn mag(self) -> f64 {
        (self.i * self.i + self.q * self.q).sqrt()
    }

    /// Complex conjugate.
    #[inline]
    pub fn conj(self) -> Self {
        Self { i: self.i, q: -self.q }
    }

    /// True if neither component is NaN or infinite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.i.is_finite() && self.q.is_finite()
    }

    /// Replace non-finite components with zero, satisfying the §3 invariant
    /// that no sample entering the pipeline is NaN or infinite.
    #[inline]
    pub fn sanitize(self) -> Self {
        Self {
            i: if self.i.is_finite() { self.i } else { 0.0 },
            q: if self.q.is_finite() { self.q } else { 0.0 },
        }
    }

    /// Mix this sample down by multiplying with `e^{-j*phase}`, i.e.
    /// `self * (cos(phase), -sin(phase))`. Used by the Costas PLL (§4.4).
    #[inline]
    pub fn mix(self, phase: f64) -> Self {
        let (sin, cos) = phase.sin_cos();
        self * Complex::new(cos, -sin)
    }
}

impl Add for Complex {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self { i: self.i + rhs.i, q: self.q + rhs.q }
    }
}

impl AddAssign for Complex {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.i += rhs.i;
        self.q += rhs.q;
    }
}

impl Sub for Complex {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self { i: self.i - rhs.i, q: self.q - rhs.q }
    }
}

impl Mul for Complex {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            i: self.i * rhs.i - self.q * rhs.q,
            q: self.i * rhs.q + self.q * rhs.i,
        }
    }
}

impl Mul<f64> for Complex {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self { i: self.i * rhs, q: self.q * rhs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mag() {
        assert!((Complex::new(3.0, 4.0).mag() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_sanitize_removes_nan() {
        let c = Complex::new(f64::NAN, f64::INFINITY).sanitize();
        assert_eq!(c, Complex::new(0.0, 0.0));
    }

    #[test]
    fn test_mix_unit_rotation() {
        let c = Complex::new(1.0, 0.0);
        let mixed = c.mix(std::f64::consts::FRAC_PI_2);
        assert!((mixed.i - 0.0).abs() < 1e-9);
        assert!((mixed.q - (-1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_mul_conjugate_is_magnitude_squared() {
        let c = Complex::new(2.0, 3.0);
        let prod = c * c.conj();
        assert!((prod.i - 13.0).abs() < 1e-12);
        assert!(prod.q.abs() < 1e-12);
    }
}
