//! Recursive Chebyshev Type I IIR filter (§4.1)
//!
//! Classic pole-pair design: start from poles on the unit circle, warp them
//! onto an ellipse for the requested ripple, run the analog-to-digital
//! bilinear transform, then the low-pass/high-pass frequency transform, and
//! cascade each pair's five coefficients into a running `P+3`-wide scratch.
//! Both I and Q share one complex filter state (§3).

use std::f64::consts::PI;

use crate::complex::Complex;
use crate::error::{LrptError, LrptResult};

/// Frequency-selectivity the filter is designed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    LowPass,
    HighPass,
    BandPass,
}

/// A recursive (IIR) Chebyshev Type I filter over complex samples.
#[derive(Debug, Clone)]
pub struct ChebyshevFilter {
    poles: usize,
    a: Vec<f64>,
    b: Vec<f64>,
    x_mem: Vec<Complex>,
    y_mem: Vec<Complex>,
    ri: usize,
}

impl ChebyshevFilter {
    pub const MAX_POLES: usize = 252;

    /// Design a new filter. `num_poles` must be even and at most
    /// [`Self::MAX_POLES`]; `ripple_percent` of 0 yields a Butterworth
    /// response (no ellipse warp).
    pub fn new(
        bandwidth_hz: f64,
        sample_rate_hz: f64,
        ripple_percent: f64,
        num_poles: usize,
        kind: FilterKind,
    ) -> LrptResult<Self> {
        if num_poles == 0 || num_poles % 2 != 0 || num_poles > Self::MAX_POLES {
            return Err(LrptError::InvalidParam(format!(
                "num_poles must be even and <= {}, got {num_poles}",
                Self::MAX_POLES
            )));
        }

        let p = num_poles;
        let w = 2.0 * PI * (bandwidth_hz / 2.0) / sample_rate_hz;
        let t = 2.0 * (0.5f64).tan();
        let is_highpass = kind == FilterKind::HighPass;
        let k = match kind {
            FilterKind::HighPass => -((w + 1.0) / 2.0).cos() / ((w - 1.0) / 2.0).cos(),
            FilterKind::LowPass => ((1.0 - w) / 2.0).sin() / ((1.0 + w) / 2.0).sin(),
            FilterKind::BandPass => 1.0,
        };

        // Running cascade, P+3 wide scratch per §4.1 step 4.
        let mut a = vec![0.0; p + 3];
        let mut b = vec![0.0; p + 3];
        a[2] = 1.0;
        b[2] = 1.0;

        for pair in 1..=(p / 2) {
            let theta = PI / (2.0 * p as f64) + (pair - 1) as f64 * PI / p as f64;
            let mut rp = -theta.cos();
            let mut ip = theta.sin();

            if ripple_percent > 0.0 {
                let es = ((100.0 / (100.0 - ripple_percent)).powi(2) - 1.0).sqrt();
                let vx = (1.0 / es).asinh() / p as f64;
                let kx = ((1.0 / es).acosh() / p as f64).cosh();
                rp *= vx.sinh() / kx;
                ip *= vx.cosh() / kx;
            }

            // Bilinear transform: s-plane pole -> z-plane biquad.
            let m = rp * rp + ip * ip;
            let d = 4.0 - 4.0 * rp * t + m * t * t;
            let x0 = t * t / d;
            let x1 = 2.0 * x0;
            let x2 = x0;
            let y1 = (8.0 - 2.0 * m * t * t) / d;
            let y2 = (-4.0 - 4.0 * rp * t - m * t * t) / d;

            // Low-pass -> low-pass/high-pass frequency transform.
            let d = 1.0 + y1 * k - y2 * k * k;
            let a0 = (x0 - x1 * k + x2 * k * k) / d;
            let mut a1 = (-2.0 * x0 * k + x1 + x1 * k * k - 2.0 * x2 * k) / d;
            let a2 = (x0 * k * k - x1 * k + x2) / d;
            let mut b1 = (2.0 * k + y1 + y1 * k * k - 2.0 * y2 * k) / d;
            let b2 = (-(k * k) - y1 * k + y2) / d;
            if is_highpass {
                a1 = -a1;
                b1 = -b1;
            }

            let ta = a.clone();
            let tb = b.clone();
            for i in 2..=(p + 2) {
                a[i] = a0 * ta[i] + a1 * ta[i - 1] + a2 * ta[i - 2];
                b[i] = tb[i] - b1 * tb[i - 1] - b2 * tb[i - 2];
            }
        }

        b[2] = 0.0;
        // Drop the two leading scratch entries, keeping P+1 coefficients
        // a[0..=P], b[0..=P]; negate b per §4.1 step 5.
        let mut a: Vec<f64> = (0..=p).map(|i| a[i + 2]).collect();
        let b: Vec<f64> = (0..=p).map(|i| -b[i + 2]).collect();

        // Gain normalisation (§4.1 step 6).
        let (mut sa, mut sb) = (0.0, 0.0);
        for i in 0..=p {
            let sign = if is_highpass && i % 2 == 1 { -1.0 } else { 1.0 };
            sa += a[i] * sign;
            sb += b[i] * sign;
        }
        let gain = sa / (1.0 - sb);
        for coeff in &mut a {
            *coeff /= gain;
        }

        Ok(Self {
            poles: p,
            a,
            b,
            x_mem: vec![Complex::zero(); p + 1],
            y_mem: vec![Complex::zero(); p + 1],
            ri: 0,
        })
    }

    pub fn poles(&self) -> usize {
        self.poles
    }

    /// Run one complex sample through the filter, advancing its ring state.
    pub fn apply(&mut self, x: Complex) -> Complex {
        let p = self.poles;
        let len = p + 1;
        let mut idx = self.ri;
        let mut y = x * self.a[0];
        for j in 1..=p {
            idx = (idx + 1) % len;
            y += self.x_mem[idx] * self.a[j] + self.y_mem[idx] * self.b[j];
        }
        self.ri = idx;
        self.x_mem[idx] = x;
        self.y_mem[idx] = y;
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_odd_pole_count() {
        assert!(ChebyshevFilter::new(1000.0, 8000.0, 0.5, 3, FilterKind::LowPass).is_err());
    }

    #[test]
    fn test_rejects_oversized_pole_count() {
        assert!(ChebyshevFilter::new(1000.0, 8000.0, 0.5, 254, FilterKind::LowPass).is_err());
    }

    #[test]
    fn test_state_array_lengths_match_pole_count() {
        let filt = ChebyshevFilter::new(1000.0, 8000.0, 0.5, 4, FilterKind::LowPass).unwrap();
        assert_eq!(filt.x_mem.len(), 5);
        assert_eq!(filt.y_mem.len(), 5);
        assert_eq!(filt.a.len(), 5);
        assert_eq!(filt.b.len(), 5);
    }

    #[test]
    fn test_lowpass_dc_converges_to_same_dc_value() {
        let mut filt = ChebyshevFilter::new(1000.0, 8000.0, 0.5, 8, FilterKind::LowPass).unwrap();
        let dc = Complex::new(3.0, -2.0);
        let mut last = Complex::zero();
        for _ in 0..(5 * filt.poles() + 200) {
            last = filt.apply(dc);
        }
        assert!((last.i - 3.0).abs() < 1e-6, "I did not converge: {}", last.i);
        assert!((last.q - (-2.0)).abs() < 1e-6, "Q did not converge: {}", last.q);
    }

    #[test]
    fn test_applied_twice_converges_within_tolerance() {
        let mut filt_a = ChebyshevFilter::new(1500.0, 8000.0, 1.0, 6, FilterKind::LowPass).unwrap();
        let mut filt_b = ChebyshevFilter::new(1500.0, 8000.0, 1.0, 6, FilterKind::LowPass).unwrap();
        let dc = Complex::new(1.0, 1.0);
        let mut out = Complex::zero();
        for _ in 0..500 {
            out = filt_b.apply(filt_a.apply(dc));
        }
        assert!((out.i - 1.0).abs() < 1e-4);
        assert!((out.q - 1.0).abs() < 1e-4);
    }
}
