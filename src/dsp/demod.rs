//! Gardner symbol-timing recovery and the demodulator orchestrator (§4.5)
//!
//! Owns one AGC, one RRC, one Costas PLL and drives them through the
//! interpolate -> AGC -> Gardner-gate -> mix -> emit pipeline described in
//! §2. QPSK and OQPSK share this one routine and diverge only in how the
//! mid-point and decision samples are built (§9 design note: function-
//! pointer dispatch on QPSK/OQPSK becomes one tagged-enum branch here).

use crate::complex::Complex;
use crate::dsp::agc::Agc;
use crate::dsp::costas::{CostasPll, PllMode};
use crate::dsp::rrc::RrcFilter;
use crate::error::LrptError;
use crate::error::LrptResult;
use crate::iq::IqSequence;
use crate::qpsk::{clamp_i8, QpskSequence};

/// Demodulator parameters, bundled since the pipeline has no use for them
/// individually outside construction.
#[derive(Debug, Clone, Copy)]
pub struct DemodulatorConfig {
    pub sample_rate_hz: f64,
    pub symbol_rate_hz: f64,
    pub interp_factor: usize,
    pub rrc_order: usize,
    pub rrc_oversample: usize,
    pub rrc_alpha: f64,
    pub pll_bandwidth: f64,
    pub pll_locked_threshold: f64,
    pub pll_unlocked_threshold: f64,
    pub mode: PllMode,
}

impl DemodulatorConfig {
    /// Parameters tuned for a Meteor-M2 LRPT downlink sampled well above
    /// its ~72 ksym/s QPSK symbol rate.
    pub fn default_for_sample_rate(sample_rate_hz: f64) -> Self {
        Self {
            sample_rate_hz,
            symbol_rate_hz: 72_000.0,
            interp_factor: 4,
            rrc_order: 24,
            rrc_oversample: 1,
            rrc_alpha: 0.6,
            pll_bandwidth: 0.035,
            pll_locked_threshold: 0.5,
            pll_unlocked_threshold: 0.515,
            mode: PllMode::Qpsk,
        }
    }
}

/// Owns the per-instance state of the RRC/AGC/PLL/Gardner pipeline and
/// turns a batch of complex samples into a batch of soft QPSK symbols.
pub struct Demodulator {
    agc: Agc,
    pll: CostasPll,
    rrc: RrcFilter,
    mode: PllMode,
    interp_factor: usize,
    sp: f64,
    resync_offset: f64,
    before: Complex,
    middle: Complex,
    inphase: Complex,
    prev_i: f64,
}

impl Demodulator {
    pub fn new(config: DemodulatorConfig) -> LrptResult<Self> {
        if config.interp_factor == 0 {
            return Err(LrptError::InvalidParam("interp_factor must be >= 1".into()));
        }
        if config.sample_rate_hz <= 0.0 || config.symbol_rate_hz <= 0.0 {
            return Err(LrptError::InvalidParam(
                "sample_rate_hz and symbol_rate_hz must be positive".into(),
            ));
        }

        let rrc = RrcFilter::new(
            config.rrc_order,
            config.interp_factor,
            config.rrc_oversample,
            config.rrc_alpha,
        );
        let pll = CostasPll::new(
            config.pll_bandwidth,
            config.pll_locked_threshold,
            config.pll_unlocked_threshold,
            config.mode,
            config.interp_factor,
        )?;
        let sp = config.interp_factor as f64 * config.sample_rate_hz / config.symbol_rate_hz;

        Ok(Self {
            agc: Agc::new(),
            pll,
            rrc,
            mode: config.mode,
            interp_factor: config.interp_factor,
            sp,
            resync_offset: 0.0,
            before: Complex::zero(),
            middle: Complex::zero(),
            inphase: Complex::zero(),
            prev_i: 0.0,
        })
    }

    pub fn symbol_period(&self) -> f64 {
        self.sp
    }

    pub fn is_locked(&self) -> bool {
        self.pll.is_locked()
    }

    pub fn agc_gain(&self) -> f64 {
        self.agc.gain()
    }

    pub fn pll_error_average(&self) -> f64 {
        self.pll.error_average()
    }

    /// Demodulate a block of complex samples, appending emitted soft
    /// symbols to the caller-owned `out` sequence (§6 consumer contract).
    pub fn process(&mut self, input: &IqSequence, out: &mut QpskSequence) {
        for &c in input.as_slice() {
            for _ in 0..self.interp_factor {
                let x = self.rrc.apply(c);
                self.step(x, out);
            }
        }
    }

    fn step(&mut self, x: Complex, out: &mut QpskSequence) {
        let h = self.sp / 2.0;
        let h1 = h + 1.0;

        if self.resync_offset >= h && self.resync_offset < h1 {
            if self.mode == PllMode::Oqpsk {
                let a = self.agc.apply(x);
                self.inphase = self.pll.mix(a);
                self.middle = Complex::new(self.prev_i, self.inphase.q);
                self.prev_i = self.inphase.i;
            } else {
                self.middle = self.agc.apply(x);
            }
            self.resync_offset += 1.0;
            return;
        }

        if self.resync_offset >= self.sp {
            let mut current = if self.mode == PllMode::Oqpsk {
                let a = self.agc.apply(x);
                let quad = self.pll.mix(a);
                let c = Complex::new(self.prev_i, quad.q);
                self.prev_i = quad.i;
                c
            } else {
                self.agc.apply(x)
            };

            self.resync_offset -= self.sp;

            let te = (current.q - self.before.q) * self.middle.q;
            self.resync_offset += te * self.sp / 2_000_000.0;

            self.before = current;

            if self.mode == PllMode::Qpsk {
                current = self.pll.mix(current);
            }

            let co = if self.mode == PllMode::Oqpsk { self.middle } else { current };
            let error = self.pll.phase_error(current, co);
            self.pll.correct(error);

            self.resync_offset += 1.0;

            out.push((clamp_i8(current.i / 2.0), clamp_i8(current.q / 2.0)));
            return;
        }

        self.resync_offset += 1.0;
    }
}
