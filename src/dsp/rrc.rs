//! Root-raised-cosine interpolating matched filter (§4.2)
//!
//! Unlike a plain matched filter, this one does not change sample rate by
//! itself: the demodulator calls [`RrcFilter::apply`] `F` times per input
//! sample, feeding the same input each time, to realise `F`x interpolation
//! (§4.5 drive loop).

use std::f64::consts::PI;

use crate::complex::Complex;

/// Interpolating RRC filter with a decrementing ring buffer.
#[derive(Debug, Clone)]
pub struct RrcFilter {
    order: usize,
    coeffs: Vec<f64>,
    mem: Vec<Complex>,
    idm: usize,
}

impl RrcFilter {
    /// `order` sets the tap count `T = 2*order + 1`; `interp_factor` (`F`)
    /// and `oversample_factor` (`osf`) together set the time granularity of
    /// each tap; `alpha` is the roll-off.
    pub fn new(order: usize, interp_factor: usize, oversample_factor: usize, alpha: f64) -> Self {
        let taps = 2 * order + 1;
        let mut coeffs = vec![0.0; taps];
        let denom = (oversample_factor * interp_factor) as f64;

        for (i, coeff) in coeffs.iter_mut().enumerate() {
            *coeff = if i == order {
                1.0 - alpha + 4.0 * alpha / PI
            } else {
                let tau = (order as f64 - i as f64).abs() / denom;
                let m = PI * tau;
                let q = 4.0 * alpha * tau;
                ((m * (1.0 - alpha)).sin() + q * (m * (1.0 + alpha)).cos()) / (m * (1.0 - q * q))
            };
        }

        Self {
            order,
            coeffs,
            mem: vec![Complex::zero(); taps],
            idm: 0,
        }
    }

    /// Build an RRC filter with the order and roll-off used for Meteor-M2
    /// QPSK downlinks (order 24, α = 0.6, no oversampling), at the given
    /// interpolation factor.
    pub fn default_for_interp_factor(interp_factor: usize) -> Self {
        Self::new(24, interp_factor, 1, 0.6)
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn taps(&self) -> usize {
        self.coeffs.len()
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    /// Feed one sample through the filter, returning the filtered output.
    pub fn apply(&mut self, x: Complex) -> Complex {
        let t = self.coeffs.len();
        self.mem[self.idm] = x;

        let mut out = Complex::zero();
        for j in 0..t {
            out += self.mem[(self.idm + j) % t] * self.coeffs[j];
        }

        self.idm = if self.idm == 0 { t - 1 } else { self.idm - 1 };
        out
    }
}
