//! Costas phase-locked loop with hysteretic lock detection (§4.4)
//!
//! A 2nd-order PLL (NCO phase/frequency pair, alpha/beta loop gains
//! recomputed from damping and bandwidth) in the style of `modem/unified.rs`,
//! combined with a BPSK Costas loop structure as in the psk31 reference
//! example, generalised to QPSK/OQPSK decision-directed phase error with a
//! tanh lookup table and a two-state (locked/unlocked) bandwidth/window
//! switch.

use std::f64::consts::PI;

use crate::complex::Complex;
use crate::error::{LrptError, LrptResult};

/// Which QPSK variant the phase-error computation is tuned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PllMode {
    Qpsk,
    Oqpsk,
}

impl PllMode {
    fn error_scale(self) -> f64 {
        match self {
            PllMode::Qpsk => 43.0,
            PllMode::Oqpsk => 80.0,
        }
    }
}

/// Decision-directed Costas loop tracking carrier phase and frequency.
#[derive(Debug, Clone)]
pub struct CostasPll {
    phase: f64,
    freq: f64,
    alpha: f64,
    beta: f64,
    zeta: f64,
    bw_unlocked: f64,
    bw: f64,
    w_avg_unlocked: f64,
    w_avg: f64,
    err_avg: f64,
    delta: f64,
    locked: bool,
    mode: PllMode,
    locked_threshold: f64,
    unlocked_threshold: f64,
    tanh_lut: [f64; 256],
}

impl CostasPll {
    pub const DAMPING: f64 = std::f64::consts::FRAC_1_SQRT_2;
    pub const INITIAL_FREQ: f64 = 0.001;
    pub const LOCKED_ERROR_DIVISOR: f64 = 10.0;
    pub const W_DELTA: f64 = 100.0;
    pub const LOCK_WINDOW_MULTIPLIER: f64 = 10.0;
    pub const LOCK_BANDWIDTH_DIVISOR: f64 = 4.0;
    pub const MAX_LOCKED_FREQ: f64 = 0.8;

    /// `bw` is the unlocked-state loop bandwidth in rad/symbol;
    /// `unlocked_threshold` must be strictly greater than `locked_threshold`;
    /// `interp_factor` sets the unlocked averaging window `20000 / F`.
    pub fn new(
        bw: f64,
        locked_threshold: f64,
        unlocked_threshold: f64,
        mode: PllMode,
        interp_factor: usize,
    ) -> LrptResult<Self> {
        if unlocked_threshold <= locked_threshold {
            return Err(LrptError::InvalidParam(
                "unlocked_threshold must be strictly greater than locked_threshold".into(),
            ));
        }
        if interp_factor == 0 {
            return Err(LrptError::InvalidParam("interp_factor must be >= 1".into()));
        }

        let mut tanh_lut = [0.0; 256];
        for (idx, slot) in tanh_lut.iter_mut().enumerate() {
            let value = idx as f64 - 128.0;
            *slot = value.tanh();
        }

        let w_avg_unlocked = 20000.0 / interp_factor as f64;
        let mut pll = Self {
            phase: 0.0,
            freq: Self::INITIAL_FREQ,
            alpha: 0.0,
            beta: 0.0,
            zeta: Self::DAMPING,
            bw_unlocked: bw,
            bw,
            w_avg_unlocked,
            w_avg: w_avg_unlocked,
            err_avg: 1.0e6,
            delta: 0.0,
            locked: false,
            mode,
            locked_threshold,
            unlocked_threshold,
            tanh_lut,
        };
        pll.recompute_coeffs();
        Ok(pll)
    }

    /// Build a PLL with the lock thresholds (0.5 / 0.515) used for
    /// Meteor-M2 QPSK downlinks, at the given unlocked-state bandwidth.
    pub fn default_for_qpsk(bw: f64, interp_factor: usize) -> LrptResult<Self> {
        Self::new(bw, 0.5, 0.515, PllMode::Qpsk, interp_factor)
    }

    fn recompute_coeffs(&mut self) {
        let bw = self.bw;
        let zeta = self.zeta;
        let denom = 1.0 + 2.0 * zeta * bw + bw * bw;
        self.alpha = 4.0 * zeta * bw / denom;
        self.beta = 4.0 * bw * bw / denom;
    }

    #[inline]
    fn tanh_lookup(&self, value: f64) -> f64 {
        let idx = (value.round() as i64).clamp(-128, 127) + 128;
        self.tanh_lut[idx as usize]
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Current |error| moving average (§6 observability hook).
    pub fn error_average(&self) -> f64 {
        self.err_avg
    }

    pub fn frequency(&self) -> f64 {
        self.freq
    }

    /// Mix a sample down by the current NCO phase and advance the NCO.
    pub fn mix(&mut self, x: Complex) -> Complex {
        let y = x.mix(self.phase);
        self.phase = (self.phase + self.freq).rem_euclid(2.0 * PI);
        y
    }

    /// Decision-directed phase-error between the current sample `x` and its
    /// co-sample `co` (identical to `x` for plain QPSK; the quadrature arm
    /// sample for OQPSK).
    pub fn phase_error(&self, x: Complex, co: Complex) -> f64 {
        (self.tanh_lookup(x.i) * x.q - self.tanh_lookup(co.q) * co.i) / self.mode.error_scale()
    }

    /// Apply one phase/frequency correction from a computed `error`,
    /// returning the (possibly locked-state-scaled) error actually applied.
    pub fn correct(&mut self, error: f64) -> f64 {
        let mut error = error.clamp(-1.0, 1.0);

        self.err_avg = ((self.w_avg - 1.0) * self.err_avg + error.abs()) / self.w_avg;
        self.phase = (self.phase + self.alpha * error).rem_euclid(2.0 * PI);

        if self.locked {
            error /= Self::LOCKED_ERROR_DIVISOR;
        }

        self.delta = ((Self::W_DELTA - 1.0) * self.delta + self.beta * error) / Self::W_DELTA;
        self.freq += self.delta;

        self.update_lock_state();

        if self.freq.abs() >= Self::MAX_LOCKED_FREQ {
            self.freq = 0.0;
        }
        error
    }

    fn update_lock_state(&mut self) {
        if !self.locked {
            if self.err_avg < self.locked_threshold {
                self.locked = true;
                self.bw = self.bw_unlocked / Self::LOCK_BANDWIDTH_DIVISOR;
                self.w_avg = self.w_avg_unlocked * Self::LOCK_WINDOW_MULTIPLIER;
                self.recompute_coeffs();
            }
        } else if self.err_avg > self.unlocked_threshold {
            self.locked = false;
            self.bw = self.bw_unlocked;
            self.w_avg = self.w_avg_unlocked;
            self.recompute_coeffs();
        }
    }
}
